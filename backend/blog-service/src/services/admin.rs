/// Admin service - staff-only catalogue and moderation operations
use std::sync::Arc;
use validator::Validate;

use super::{check_references, current_user};
use crate::error::{AppError, Result};
use crate::forms::{
    AdminCommentQuery, AdminPostQuery, CategoryForm, CategoryPatch, LocationForm, LocationPatch,
    PostModerationForm,
};
use crate::metrics;
use crate::middleware::check_staff;
use crate::models::{
    Category, CategoryChanges, CommentDetails, Location, LocationChanges, NewCategory,
    NewLocation, PostDetails, PostModeration,
};
use crate::pagination::{parse_page, Page, PageRequest};
use crate::repository::{BlogRepository, CommentFilter, PostFilter};

pub struct AdminService {
    repo: Arc<dyn BlogRepository>,
    per_page: u32,
}

impl AdminService {
    pub fn new(repo: Arc<dyn BlogRepository>, per_page: u32) -> Self {
        Self { repo, per_page }
    }

    /// Every admin handler goes through here first.
    pub async fn authorize(&self, user_id: i64) -> Result<()> {
        let user = current_user(self.repo.as_ref(), user_id).await?;
        check_staff(&user)
    }

    // ---- categories ----

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        self.repo.list_categories(false).await
    }

    pub async fn create_category(&self, form: CategoryForm) -> Result<Category> {
        form.validate()?;
        let category = self
            .repo
            .create_category(NewCategory {
                title: form.title,
                description: form.description,
                slug: form.slug,
                is_published: form.is_published,
            })
            .await?;

        metrics::record_write("category", "create");
        tracing::info!(category_id = category.id, slug = %category.slug, "category created");
        Ok(category)
    }

    pub async fn update_category(&self, id: i64, patch: CategoryPatch) -> Result<Category> {
        patch.validate()?;
        let category = self
            .repo
            .update_category(
                id,
                CategoryChanges {
                    title: patch.title,
                    description: patch.description,
                    slug: patch.slug,
                    is_published: patch.is_published,
                },
            )
            .await?;

        metrics::record_write("category", "update");
        Ok(category)
    }

    pub async fn delete_category(&self, id: i64) -> Result<()> {
        if !self.repo.delete_category(id).await? {
            return Err(AppError::NotFound(format!("category {} not found", id)));
        }
        metrics::record_write("category", "delete");
        tracing::info!(category_id = id, "category deleted");
        Ok(())
    }

    // ---- locations ----

    pub async fn list_locations(&self) -> Result<Vec<Location>> {
        self.repo.list_locations(false).await
    }

    pub async fn create_location(&self, form: LocationForm) -> Result<Location> {
        form.validate()?;
        let location = self
            .repo
            .create_location(NewLocation {
                name: form.name,
                is_published: form.is_published,
            })
            .await?;

        metrics::record_write("location", "create");
        Ok(location)
    }

    pub async fn update_location(&self, id: i64, patch: LocationPatch) -> Result<Location> {
        patch.validate()?;
        let location = self
            .repo
            .update_location(
                id,
                LocationChanges {
                    name: patch.name,
                    is_published: patch.is_published,
                },
            )
            .await?;

        metrics::record_write("location", "update");
        Ok(location)
    }

    pub async fn delete_location(&self, id: i64) -> Result<()> {
        if !self.repo.delete_location(id).await? {
            return Err(AppError::NotFound(format!("location {} not found", id)));
        }
        metrics::record_write("location", "delete");
        Ok(())
    }

    // ---- posts ----

    /// All posts regardless of visibility, optionally searched by title and
    /// narrowed to one category.
    pub async fn list_posts(&self, query: AdminPostQuery) -> Result<Page<PostDetails>> {
        let request = PageRequest::new(parse_page(query.page.as_deref())?, self.per_page)?;
        let filter = PostFilter {
            category_id: query.category,
            title_search: query.search.filter(|s| !s.trim().is_empty()),
            ..Default::default()
        };

        let (items, total) = self.repo.list_posts(&filter, request).await?;
        Page::new(items, total, request)
    }

    pub async fn moderate_post(&self, id: i64, form: PostModerationForm) -> Result<PostDetails> {
        check_references(
            self.repo.as_ref(),
            form.category.flatten(),
            form.location.flatten(),
        )
        .await?;

        self.repo
            .moderate_post(
                id,
                PostModeration {
                    pub_date: form.pub_date,
                    category_id: form.category,
                    location_id: form.location,
                    is_published: form.is_published,
                },
            )
            .await?;

        metrics::record_write("post", "moderate");
        tracing::info!(post_id = id, "post moderated");

        self.repo
            .find_post_details(id)
            .await?
            .ok_or_else(|| AppError::post_not_found(id))
    }

    // ---- comments ----

    pub async fn list_comments(&self, query: AdminCommentQuery) -> Result<Page<CommentDetails>> {
        let request = PageRequest::new(parse_page(query.page.as_deref())?, self.per_page)?;
        let filter = CommentFilter {
            post_id: query.post,
            author_id: query.author,
        };

        let (items, total) = self.repo.list_comments(&filter, Some(request)).await?;
        Page::new(items, total, request)
    }

    pub async fn delete_comment(&self, id: i64) -> Result<()> {
        if !self.repo.delete_comment(id).await? {
            return Err(AppError::comment_not_found(id));
        }
        metrics::record_write("comment", "moderate_delete");
        tracing::info!(comment_id = id, "comment removed by staff");
        Ok(())
    }
}
