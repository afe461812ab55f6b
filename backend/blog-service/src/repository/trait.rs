use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{
    Category, CategoryChanges, Comment, CommentDetails, Location, LocationChanges, NewCategory,
    NewLocation, NewPost, NewUser, Post, PostChanges, PostDetails, PostModeration, User,
    UserChanges,
};
use crate::pagination::PageRequest;

/// Narrowing applied to post listings. Every field is optional; an empty
/// filter matches all posts.
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    /// Keep only posts publicly visible at this moment
    pub public_at: Option<DateTime<Utc>>,
    pub category_id: Option<i64>,
    pub author_id: Option<i64>,
    /// Case-insensitive substring of the title
    pub title_search: Option<String>,
}

impl PostFilter {
    pub fn public(now: DateTime<Utc>) -> Self {
        Self {
            public_at: Some(now),
            ..Default::default()
        }
    }

    /// Same predicate the SQL implementation applies, for in-process checks.
    pub fn matches(&self, post: &PostDetails) -> bool {
        if let Some(now) = self.public_at {
            if !post.is_public_at(now) {
                return false;
            }
        }
        if let Some(category_id) = self.category_id {
            if post.category.as_ref().map(|c| c.id) != Some(category_id) {
                return false;
            }
        }
        if let Some(author_id) = self.author_id {
            if post.author.id != author_id {
                return false;
            }
        }
        if let Some(term) = &self.title_search {
            if !post.title.to_lowercase().contains(&term.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Default)]
pub struct CommentFilter {
    pub post_id: Option<i64>,
    pub author_id: Option<i64>,
}

impl CommentFilter {
    pub fn for_post(post_id: i64) -> Self {
        Self {
            post_id: Some(post_id),
            author_id: None,
        }
    }
}

/// Persistence operations for every blog entity.
///
/// Updates of a missing row fail with `AppError::NotFound`; deletes report
/// whether a row was removed. Unique clashes surface as `AppError::Conflict`.
#[async_trait]
pub trait BlogRepository: Send + Sync {
    // ---- users ----

    async fn create_user(&self, user: NewUser) -> Result<User>;

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn update_user(&self, id: i64, changes: UserChanges) -> Result<User>;

    // ---- categories ----

    async fn create_category(&self, category: NewCategory) -> Result<Category>;

    async fn find_category(&self, id: i64) -> Result<Option<Category>>;

    async fn find_category_by_slug(&self, slug: &str) -> Result<Option<Category>>;

    /// Ordered by title
    async fn list_categories(&self, published_only: bool) -> Result<Vec<Category>>;

    async fn update_category(&self, id: i64, changes: CategoryChanges) -> Result<Category>;

    /// Posts in the category keep existing with no category.
    async fn delete_category(&self, id: i64) -> Result<bool>;

    // ---- locations ----

    async fn create_location(&self, location: NewLocation) -> Result<Location>;

    async fn find_location(&self, id: i64) -> Result<Option<Location>>;

    /// Ordered by name
    async fn list_locations(&self, published_only: bool) -> Result<Vec<Location>>;

    async fn update_location(&self, id: i64, changes: LocationChanges) -> Result<Location>;

    /// Posts at the location keep existing with no location.
    async fn delete_location(&self, id: i64) -> Result<bool>;

    // ---- posts ----

    async fn create_post(&self, post: NewPost) -> Result<Post>;

    async fn find_post(&self, id: i64) -> Result<Option<Post>>;

    async fn find_post_details(&self, id: i64) -> Result<Option<PostDetails>>;

    async fn update_post(&self, id: i64, changes: PostChanges) -> Result<Post>;

    async fn moderate_post(&self, id: i64, changes: PostModeration) -> Result<Post>;

    /// Removes the post's comments as well.
    async fn delete_post(&self, id: i64) -> Result<bool>;

    /// Newest `pub_date` first. Returns the requested page and the total
    /// number of matching posts.
    async fn list_posts(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<(Vec<PostDetails>, i64)>;

    // ---- comments ----

    async fn create_comment(&self, post_id: i64, author_id: i64, text: &str) -> Result<Comment>;

    async fn find_comment(&self, id: i64) -> Result<Option<Comment>>;

    async fn update_comment(&self, id: i64, text: &str) -> Result<Comment>;

    async fn delete_comment(&self, id: i64) -> Result<bool>;

    /// Oldest first. `page = None` returns every match.
    async fn list_comments(
        &self,
        filter: &CommentFilter,
        page: Option<PageRequest>,
    ) -> Result<(Vec<CommentDetails>, i64)>;

    /// Health check (optional)
    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
