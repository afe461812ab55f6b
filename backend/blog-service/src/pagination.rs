/// Page-number pagination for listings
///
/// Pages are 1-based. Page 1 of an empty listing is valid; asking for page 0,
/// a page past the end or a page that is not a number is a missing resource.
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// `?page=N` query string
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
}

impl PageParams {
    pub fn number(&self) -> Result<Option<u32>> {
        parse_page(self.page.as_deref())
    }
}

/// Raw `page` values are kept as text so a malformed number ends up as a 404
/// rather than a query parse error.
pub fn parse_page(raw: Option<&str>) -> Result<Option<u32>> {
    raw.map(|value| {
        value
            .trim()
            .parse::<u32>()
            .map_err(|_| AppError::NotFound(format!("invalid page '{}'", value)))
    })
    .transpose()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    pub fn new(page: Option<u32>, per_page: u32) -> Result<Self> {
        let page = page.unwrap_or(1);
        if page == 0 {
            return Err(AppError::NotFound("invalid page 0".to_string()));
        }

        Ok(Self {
            page,
            per_page: per_page.max(1),
        })
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.per_page)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total_count: i64,
    pub num_pages: u32,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Page<T> {
    /// Build the envelope, rejecting pages that lie past the last one.
    pub fn new(items: Vec<T>, total_count: i64, request: PageRequest) -> Result<Self> {
        let per_page = i64::from(request.per_page);
        // An empty listing still has one (empty) page.
        let num_pages = (((total_count.max(0) + per_page - 1) / per_page) as u32).max(1);

        if request.page > num_pages {
            return Err(AppError::NotFound(format!(
                "page {} is past the last page",
                request.page
            )));
        }

        Ok(Self {
            items,
            page: request.page,
            per_page: request.per_page,
            total_count,
            num_pages,
            has_next: request.page < num_pages,
            has_previous: request.page > 1,
        })
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total_count: self.total_count,
            num_pages: self.num_pages,
            has_next: self.has_next,
            has_previous: self.has_previous,
        }
    }
}
