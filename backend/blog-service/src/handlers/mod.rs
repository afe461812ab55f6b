/// HTTP handlers for blog-service
///
/// Handlers stay thin: they pull the caller and payload out of the request,
/// hand them to a service from `crate::services` and serialize the result.
pub mod admin;
pub mod auth;
pub mod categories;
pub mod comments;
pub mod health;
pub mod posts;
pub mod profiles;

pub use auth::{login, register};
pub use categories::{category_posts, list_categories};
pub use comments::{create_comment, delete_comment, update_comment};
pub use health::{health_summary, liveness_check, readiness_check};
pub use posts::{create_post, delete_post, get_post, list_posts, update_post};
pub use profiles::{edit_profile, get_profile};
