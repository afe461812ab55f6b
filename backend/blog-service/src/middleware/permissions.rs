/// Authorization checks for blog content
///
/// Visibility and ownership failures are reported as `NotFound` so a caller
/// cannot probe for posts or comments they are not allowed to see.
use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};
use crate::models::{Comment, Post, PostDetails, User};

/// Result type for permission checks
pub type PermissionResult = Result<()>;

/// A post is visible to its author at all times and to everyone else once
/// it is public.
pub fn check_post_visibility(
    post: &PostDetails,
    viewer_id: Option<i64>,
    now: DateTime<Utc>,
) -> PermissionResult {
    if viewer_id == Some(post.author.id) || post.is_public_at(now) {
        Ok(())
    } else {
        Err(AppError::post_not_found(post.id))
    }
}

/// Only the author may edit or delete a post
pub fn check_post_ownership(user_id: i64, post: &Post) -> PermissionResult {
    if post.author_id == user_id {
        Ok(())
    } else {
        Err(AppError::post_not_found(post.id))
    }
}

/// Only the author may edit or delete a comment, and the comment must sit
/// under the post named in the path.
pub fn check_comment_ownership(user_id: i64, post_id: i64, comment: &Comment) -> PermissionResult {
    if comment.post_id == post_id && comment.author_id == user_id {
        Ok(())
    } else {
        Err(AppError::comment_not_found(comment.id))
    }
}

pub fn check_staff(user: &User) -> PermissionResult {
    if user.is_staff && user.is_active {
        Ok(())
    } else {
        Err(AppError::Forbidden("staff access required".to_string()))
    }
}
