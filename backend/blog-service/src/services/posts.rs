/// Post service - public listings, post pages and author-side editing
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use validator::Validate;

use super::{check_references, current_user};
use crate::error::{AppError, Result};
use crate::forms::PostForm;
use crate::metrics;
use crate::middleware::{check_post_ownership, check_post_visibility};
use crate::models::{Category, CommentDetails, NewPost, PostChanges, PostDetails};
use crate::pagination::{Page, PageRequest};
use crate::repository::{BlogRepository, CommentFilter, PostFilter};

/// Post page payload: the post and every comment on it, oldest first.
#[derive(Debug, Serialize)]
pub struct PostWithComments {
    pub post: PostDetails,
    pub comments: Vec<CommentDetails>,
}

#[derive(Debug, Serialize)]
pub struct CategoryPosts {
    pub category: Category,
    pub posts: Page<PostDetails>,
}

pub struct PostService {
    repo: Arc<dyn BlogRepository>,
    per_page: u32,
}

impl PostService {
    pub fn new(repo: Arc<dyn BlogRepository>, per_page: u32) -> Self {
        Self { repo, per_page }
    }

    /// Run a listing query and wrap it in a page envelope.
    pub(crate) async fn page_of(
        repo: &dyn BlogRepository,
        filter: &PostFilter,
        request: PageRequest,
    ) -> Result<Page<PostDetails>> {
        let (items, total) = repo.list_posts(filter, request).await?;
        Ok(Page::new(items, total, request)?.map(PostDetails::without_hidden_location))
    }

    /// Home page: every publicly visible post, newest first
    pub async fn index(&self, page: Option<u32>) -> Result<Page<PostDetails>> {
        let request = PageRequest::new(page, self.per_page)?;
        Self::page_of(self.repo.as_ref(), &PostFilter::public(Utc::now()), request).await
    }

    /// Single post with its comments. Hidden posts are only shown to their author.
    pub async fn detail(&self, post_id: i64, viewer_id: Option<i64>) -> Result<PostWithComments> {
        let post = self
            .repo
            .find_post_details(post_id)
            .await?
            .ok_or_else(|| AppError::post_not_found(post_id))?;

        check_post_visibility(&post, viewer_id, Utc::now())?;

        let (comments, _) = self
            .repo
            .list_comments(&CommentFilter::for_post(post_id), None)
            .await?;

        Ok(PostWithComments {
            post: post.without_hidden_location(),
            comments,
        })
    }

    /// Public posts of a published category
    pub async fn category_posts(&self, slug: &str, page: Option<u32>) -> Result<CategoryPosts> {
        let category = self
            .repo
            .find_category_by_slug(slug)
            .await?
            .filter(|c| c.is_published)
            .ok_or_else(|| AppError::NotFound(format!("category '{}' not found", slug)))?;

        let request = PageRequest::new(page, self.per_page)?;
        let filter = PostFilter {
            category_id: Some(category.id),
            ..PostFilter::public(Utc::now())
        };
        let posts = Self::page_of(self.repo.as_ref(), &filter, request).await?;

        Ok(CategoryPosts { category, posts })
    }

    pub async fn create(&self, author_id: i64, form: PostForm) -> Result<PostDetails> {
        form.validate()?;
        let author = current_user(self.repo.as_ref(), author_id).await?;
        check_references(self.repo.as_ref(), Some(form.category), form.location).await?;

        let post = self
            .repo
            .create_post(NewPost {
                title: form.title,
                text: form.text,
                pub_date: form.pub_date.unwrap_or_else(Utc::now),
                image: form.image,
                author_id: author.id,
                category_id: Some(form.category),
                location_id: form.location,
            })
            .await?;

        metrics::record_write("post", "create");
        tracing::info!(post_id = post.id, author_id = author.id, "post created");

        self.reload(post.id).await
    }

    pub async fn update(&self, user_id: i64, post_id: i64, form: PostForm) -> Result<PostDetails> {
        let post = self
            .repo
            .find_post(post_id)
            .await?
            .ok_or_else(|| AppError::post_not_found(post_id))?;
        check_post_ownership(user_id, &post)?;

        form.validate()?;
        check_references(self.repo.as_ref(), Some(form.category), form.location).await?;

        self.repo
            .update_post(
                post_id,
                PostChanges {
                    title: form.title,
                    text: form.text,
                    pub_date: form.pub_date.unwrap_or(post.pub_date),
                    image: form.image,
                    category_id: Some(form.category),
                    location_id: form.location,
                },
            )
            .await?;

        metrics::record_write("post", "update");
        tracing::info!(post_id, "post updated");

        self.reload(post_id).await
    }

    pub async fn delete(&self, user_id: i64, post_id: i64) -> Result<()> {
        let post = self
            .repo
            .find_post(post_id)
            .await?
            .ok_or_else(|| AppError::post_not_found(post_id))?;
        check_post_ownership(user_id, &post)?;

        if !self.repo.delete_post(post_id).await? {
            return Err(AppError::post_not_found(post_id));
        }

        metrics::record_write("post", "delete");
        tracing::info!(post_id, "post deleted");
        Ok(())
    }

    async fn reload(&self, post_id: i64) -> Result<PostDetails> {
        self.repo
            .find_post_details(post_id)
            .await?
            .map(PostDetails::without_hidden_location)
            .ok_or_else(|| AppError::post_not_found(post_id))
    }
}
