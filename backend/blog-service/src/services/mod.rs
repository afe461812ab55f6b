/// Business logic layer for blog-service
///
/// Services hold the repository handle and apply the rules handlers must not
/// skip: post visibility, author ownership, staff checks and form validation.
pub mod admin;
pub mod auth;
pub mod comments;
pub mod posts;
pub mod profiles;

pub use admin::AdminService;
pub use auth::{AuthService, TokenResponse};
pub use comments::CommentService;
pub use posts::{CategoryPosts, PostService, PostWithComments};
pub use profiles::{ProfilePage, ProfileService};

use crate::error::{AppError, Result};
use crate::models::User;
use crate::repository::BlogRepository;

/// Resolve the account behind a token. A deleted or deactivated account is
/// treated as logged out.
pub(crate) async fn current_user(repo: &dyn BlogRepository, user_id: i64) -> Result<User> {
    match repo.find_user_by_id(user_id).await? {
        Some(user) if user.is_active => Ok(user),
        _ => Err(AppError::Unauthorized("login required".to_string())),
    }
}

/// Category and location references submitted in a form must exist.
pub(crate) async fn check_references(
    repo: &dyn BlogRepository,
    category_id: Option<i64>,
    location_id: Option<i64>,
) -> Result<()> {
    if let Some(id) = category_id {
        if repo.find_category(id).await?.is_none() {
            return Err(AppError::Validation(format!("category {} does not exist", id)));
        }
    }
    if let Some(id) = location_id {
        if repo.find_location(id).await?.is_none() {
            return Err(AppError::Validation(format!("location {} does not exist", id)));
        }
    }
    Ok(())
}
