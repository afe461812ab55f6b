use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

use super::{truncate_chars, DISPLAY_LEN};

/// Thematic grouping of posts, addressed by its slug.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub slug: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(truncate_chars(&self.title, DISPLAY_LEN))
    }
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub title: String,
    pub description: String,
    pub slug: String,
    pub is_published: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub slug: Option<String>,
    pub is_published: Option<bool>,
}

impl CategoryChanges {
    pub fn apply(self, category: &mut Category) {
        if let Some(title) = self.title {
            category.title = title;
        }
        if let Some(description) = self.description {
            category.description = description;
        }
        if let Some(slug) = self.slug {
            category.slug = slug;
        }
        if let Some(is_published) = self.is_published {
            category.is_published = is_published;
        }
    }
}
