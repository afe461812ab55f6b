//! In-memory repository
//!
//! Mirrors the PostgreSQL schema semantics (unique usernames and slugs,
//! SET NULL on category/location removal, cascading post deletion) so it can
//! stand in for the database during development and in tests.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::r#trait::{BlogRepository, CommentFilter, PostFilter};
use crate::error::{AppError, Result};
use crate::models::{
    AuthorRef, Category, CategoryChanges, CategoryRef, Comment, CommentDetails, Location,
    LocationChanges, LocationRef, NewCategory, NewLocation, NewPost, NewUser, Post, PostChanges,
    PostDetails, PostModeration, User, UserChanges,
};
use crate::pagination::PageRequest;

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    categories: BTreeMap<i64, Category>,
    locations: BTreeMap<i64, Location>,
    posts: BTreeMap<i64, Post>,
    comments: BTreeMap<i64, Comment>,
    last_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn post_details(&self, post: &Post) -> Result<PostDetails> {
        let author = self.users.get(&post.author_id).ok_or_else(|| {
            AppError::Internal(format!("post {} references missing author", post.id))
        })?;

        let category = post
            .category_id
            .and_then(|id| self.categories.get(&id))
            .map(|c| CategoryRef {
                id: c.id,
                title: c.title.clone(),
                slug: c.slug.clone(),
                is_published: c.is_published,
            });

        let location = post
            .location_id
            .and_then(|id| self.locations.get(&id))
            .map(|l| LocationRef {
                id: l.id,
                name: l.name.clone(),
                is_published: l.is_published,
            });

        let comment_count = self
            .comments
            .values()
            .filter(|c| c.post_id == post.id)
            .count() as i64;

        Ok(PostDetails {
            id: post.id,
            title: post.title.clone(),
            text: post.text.clone(),
            pub_date: post.pub_date,
            image: post.image.clone(),
            author: AuthorRef {
                id: author.id,
                username: author.username.clone(),
            },
            category,
            location,
            is_published: post.is_published,
            created_at: post.created_at,
            comment_count,
        })
    }

    fn comment_details(&self, comment: &Comment) -> Result<CommentDetails> {
        let post = self.posts.get(&comment.post_id).ok_or_else(|| {
            AppError::Internal(format!("comment {} references missing post", comment.id))
        })?;
        let author = self.users.get(&comment.author_id).ok_or_else(|| {
            AppError::Internal(format!("comment {} references missing author", comment.id))
        })?;

        Ok(CommentDetails {
            id: comment.id,
            text: comment.text.clone(),
            post_id: post.id,
            post_title: post.title.clone(),
            author: AuthorRef {
                id: author.id,
                username: author.username.clone(),
            },
            created_at: comment.created_at,
        })
    }

    fn username_taken(&self, username: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| u.username == username && Some(u.id) != except)
    }

    fn slug_taken(&self, slug: &str, except: Option<i64>) -> bool {
        self.categories
            .values()
            .any(|c| c.slug == slug && Some(c.id) != except)
    }
}

/// Thread-safe in-memory store behind a single `RwLock`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBlogRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryBlogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| AppError::Internal("Failed to acquire read lock".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| AppError::Internal("Failed to acquire write lock".to_string()))
    }
}

#[async_trait]
impl BlogRepository for InMemoryBlogRepository {
    async fn create_user(&self, user: NewUser) -> Result<User> {
        let mut tables = self.write()?;
        if tables.username_taken(&user.username, None) {
            return Err(AppError::Conflict("username already exists".to_string()));
        }

        let created = User {
            id: tables.next_id(),
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            password_hash: user.password_hash,
            is_staff: user.is_staff,
            is_active: true,
            date_joined: Utc::now(),
        };
        tables.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn update_user(&self, id: i64, changes: UserChanges) -> Result<User> {
        let mut tables = self.write()?;
        if tables.username_taken(&changes.username, Some(id)) {
            return Err(AppError::Conflict("username already exists".to_string()));
        }

        let user = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("user {} not found", id)))?;
        user.username = changes.username;
        user.email = changes.email;
        user.first_name = changes.first_name;
        user.last_name = changes.last_name;
        Ok(user.clone())
    }

    async fn create_category(&self, category: NewCategory) -> Result<Category> {
        let mut tables = self.write()?;
        if tables.slug_taken(&category.slug, None) {
            return Err(AppError::Conflict("category slug already exists".to_string()));
        }

        let created = Category {
            id: tables.next_id(),
            title: category.title,
            description: category.description,
            slug: category.slug,
            is_published: category.is_published,
            created_at: Utc::now(),
        };
        tables.categories.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_category(&self, id: i64) -> Result<Option<Category>> {
        Ok(self.read()?.categories.get(&id).cloned())
    }

    async fn find_category_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        Ok(self
            .read()?
            .categories
            .values()
            .find(|c| c.slug == slug)
            .cloned())
    }

    async fn list_categories(&self, published_only: bool) -> Result<Vec<Category>> {
        let mut categories: Vec<Category> = self
            .read()?
            .categories
            .values()
            .filter(|c| !published_only || c.is_published)
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        Ok(categories)
    }

    async fn update_category(&self, id: i64, changes: CategoryChanges) -> Result<Category> {
        let mut tables = self.write()?;
        if let Some(slug) = &changes.slug {
            if tables.slug_taken(slug, Some(id)) {
                return Err(AppError::Conflict("category slug already exists".to_string()));
            }
        }

        let category = tables
            .categories
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("category {} not found", id)))?;
        changes.apply(category);
        Ok(category.clone())
    }

    async fn delete_category(&self, id: i64) -> Result<bool> {
        let mut tables = self.write()?;
        if tables.categories.remove(&id).is_none() {
            return Ok(false);
        }
        for post in tables.posts.values_mut() {
            if post.category_id == Some(id) {
                post.category_id = None;
            }
        }
        Ok(true)
    }

    async fn create_location(&self, location: NewLocation) -> Result<Location> {
        let mut tables = self.write()?;
        let created = Location {
            id: tables.next_id(),
            name: location.name,
            is_published: location.is_published,
            created_at: Utc::now(),
        };
        tables.locations.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_location(&self, id: i64) -> Result<Option<Location>> {
        Ok(self.read()?.locations.get(&id).cloned())
    }

    async fn list_locations(&self, published_only: bool) -> Result<Vec<Location>> {
        let mut locations: Vec<Location> = self
            .read()?
            .locations
            .values()
            .filter(|l| !published_only || l.is_published)
            .cloned()
            .collect();
        locations.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(locations)
    }

    async fn update_location(&self, id: i64, changes: LocationChanges) -> Result<Location> {
        let mut tables = self.write()?;
        let location = tables
            .locations
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("location {} not found", id)))?;
        changes.apply(location);
        Ok(location.clone())
    }

    async fn delete_location(&self, id: i64) -> Result<bool> {
        let mut tables = self.write()?;
        if tables.locations.remove(&id).is_none() {
            return Ok(false);
        }
        for post in tables.posts.values_mut() {
            if post.location_id == Some(id) {
                post.location_id = None;
            }
        }
        Ok(true)
    }

    async fn create_post(&self, post: NewPost) -> Result<Post> {
        let mut tables = self.write()?;
        if !tables.users.contains_key(&post.author_id) {
            return Err(AppError::NotFound(format!("user {} not found", post.author_id)));
        }

        let created = Post {
            id: tables.next_id(),
            title: post.title,
            text: post.text,
            pub_date: post.pub_date,
            image: post.image,
            author_id: post.author_id,
            category_id: post.category_id,
            location_id: post.location_id,
            is_published: true,
            created_at: Utc::now(),
        };
        tables.posts.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_post(&self, id: i64) -> Result<Option<Post>> {
        Ok(self.read()?.posts.get(&id).cloned())
    }

    async fn find_post_details(&self, id: i64) -> Result<Option<PostDetails>> {
        let tables = self.read()?;
        tables
            .posts
            .get(&id)
            .map(|post| tables.post_details(post))
            .transpose()
    }

    async fn update_post(&self, id: i64, changes: PostChanges) -> Result<Post> {
        let mut tables = self.write()?;
        let post = tables
            .posts
            .get_mut(&id)
            .ok_or_else(|| AppError::post_not_found(id))?;
        changes.apply(post);
        Ok(post.clone())
    }

    async fn moderate_post(&self, id: i64, changes: PostModeration) -> Result<Post> {
        let mut tables = self.write()?;
        let post = tables
            .posts
            .get_mut(&id)
            .ok_or_else(|| AppError::post_not_found(id))?;
        changes.apply(post);
        Ok(post.clone())
    }

    async fn delete_post(&self, id: i64) -> Result<bool> {
        let mut tables = self.write()?;
        if tables.posts.remove(&id).is_none() {
            return Ok(false);
        }
        tables.comments.retain(|_, c| c.post_id != id);
        Ok(true)
    }

    async fn list_posts(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<(Vec<PostDetails>, i64)> {
        let tables = self.read()?;

        let mut matching = Vec::new();
        for post in tables.posts.values() {
            let details = tables.post_details(post)?;
            if filter.matches(&details) {
                matching.push(details);
            }
        }
        matching.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.id.cmp(&a.id)));

        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok((items, total))
    }

    async fn create_comment(&self, post_id: i64, author_id: i64, text: &str) -> Result<Comment> {
        let mut tables = self.write()?;
        if !tables.posts.contains_key(&post_id) {
            return Err(AppError::post_not_found(post_id));
        }

        let created = Comment {
            id: tables.next_id(),
            text: text.to_string(),
            post_id,
            author_id,
            created_at: Utc::now(),
        };
        tables.comments.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_comment(&self, id: i64) -> Result<Option<Comment>> {
        Ok(self.read()?.comments.get(&id).cloned())
    }

    async fn update_comment(&self, id: i64, text: &str) -> Result<Comment> {
        let mut tables = self.write()?;
        let comment = tables
            .comments
            .get_mut(&id)
            .ok_or_else(|| AppError::comment_not_found(id))?;
        comment.text = text.to_string();
        Ok(comment.clone())
    }

    async fn delete_comment(&self, id: i64) -> Result<bool> {
        Ok(self.write()?.comments.remove(&id).is_some())
    }

    async fn list_comments(
        &self,
        filter: &CommentFilter,
        page: Option<PageRequest>,
    ) -> Result<(Vec<CommentDetails>, i64)> {
        let tables = self.read()?;

        let mut matching: Vec<&Comment> = tables
            .comments
            .values()
            .filter(|c| filter.post_id.map_or(true, |id| c.post_id == id))
            .filter(|c| filter.author_id.map_or(true, |id| c.author_id == id))
            .collect();
        matching.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        let total = matching.len() as i64;
        let (skip, take) = match page {
            Some(p) => (p.offset() as usize, p.limit() as usize),
            None => (0, usize::MAX),
        };

        let items = matching
            .into_iter()
            .skip(skip)
            .take(take)
            .map(|c| tables.comment_details(c))
            .collect::<Result<Vec<_>>>()?;
        Ok((items, total))
    }
}
