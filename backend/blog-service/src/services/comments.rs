/// Comment service - adding, editing and removing comments under a post
use chrono::Utc;
use std::sync::Arc;
use validator::Validate;

use super::current_user;
use crate::error::{AppError, Result};
use crate::forms::CommentForm;
use crate::metrics;
use crate::middleware::{check_comment_ownership, check_post_visibility};
use crate::models::{AuthorRef, Comment, CommentDetails};
use crate::repository::BlogRepository;

pub struct CommentService {
    repo: Arc<dyn BlogRepository>,
}

impl CommentService {
    pub fn new(repo: Arc<dyn BlogRepository>) -> Self {
        Self { repo }
    }

    /// Comment on a post the caller is allowed to see
    pub async fn create(
        &self,
        user_id: i64,
        post_id: i64,
        form: CommentForm,
    ) -> Result<CommentDetails> {
        let author = current_user(self.repo.as_ref(), user_id).await?;
        let post = self
            .repo
            .find_post_details(post_id)
            .await?
            .ok_or_else(|| AppError::post_not_found(post_id))?;
        check_post_visibility(&post, Some(author.id), Utc::now())?;

        form.validate()?;
        let comment = self
            .repo
            .create_comment(post_id, author.id, &form.text)
            .await?;

        metrics::record_write("comment", "create");
        tracing::info!(post_id, comment_id = comment.id, "comment added");

        Ok(CommentDetails {
            id: comment.id,
            text: comment.text,
            post_id,
            post_title: post.title,
            author: AuthorRef {
                id: author.id,
                username: author.username,
            },
            created_at: comment.created_at,
        })
    }

    pub async fn update(
        &self,
        user_id: i64,
        post_id: i64,
        comment_id: i64,
        form: CommentForm,
    ) -> Result<CommentDetails> {
        self.owned_comment(user_id, post_id, comment_id).await?;
        form.validate()?;

        let comment = self.repo.update_comment(comment_id, &form.text).await?;
        metrics::record_write("comment", "update");
        tracing::info!(post_id, comment_id, "comment edited");

        self.details(comment).await
    }

    pub async fn delete(&self, user_id: i64, post_id: i64, comment_id: i64) -> Result<()> {
        self.owned_comment(user_id, post_id, comment_id).await?;

        if !self.repo.delete_comment(comment_id).await? {
            return Err(AppError::comment_not_found(comment_id));
        }

        metrics::record_write("comment", "delete");
        tracing::info!(post_id, comment_id, "comment deleted");
        Ok(())
    }

    async fn owned_comment(&self, user_id: i64, post_id: i64, comment_id: i64) -> Result<Comment> {
        let comment = self
            .repo
            .find_comment(comment_id)
            .await?
            .ok_or_else(|| AppError::comment_not_found(comment_id))?;
        check_comment_ownership(user_id, post_id, &comment)?;
        Ok(comment)
    }

    async fn details(&self, comment: Comment) -> Result<CommentDetails> {
        let post = self
            .repo
            .find_post(comment.post_id)
            .await?
            .ok_or_else(|| AppError::post_not_found(comment.post_id))?;
        let author = self
            .repo
            .find_user_by_id(comment.author_id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("comment {} has no author", comment.id)))?;

        Ok(CommentDetails {
            id: comment.id,
            text: comment.text,
            post_id: post.id,
            post_title: post.title,
            author: AuthorRef {
                id: author.id,
                username: author.username,
            },
            created_at: comment.created_at,
        })
    }
}
