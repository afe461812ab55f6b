use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::debug;

use super::like_pattern;
use super::r#trait::{BlogRepository, CommentFilter, PostFilter};
use crate::error::{AppError, Result};
use crate::models::{
    AuthorRef, Category, CategoryChanges, CategoryRef, Comment, CommentDetails, Location,
    LocationChanges, LocationRef, NewCategory, NewLocation, NewPost, NewUser, Post, PostChanges,
    PostDetails, PostModeration, User, UserChanges,
};
use crate::pagination::PageRequest;

const USER_COLUMNS: &str = "id, username, email, first_name, last_name, password_hash, \
                            is_staff, is_active, date_joined";

const CATEGORY_COLUMNS: &str = "id, title, description, slug, is_published, created_at";

const LOCATION_COLUMNS: &str = "id, name, is_published, created_at";

const POST_COLUMNS: &str = "id, title, text, pub_date, image, author_id, category_id, \
                            location_id, is_published, created_at";

const COMMENT_COLUMNS: &str = "id, text, post_id, author_id, created_at";

/// Post joined with author, category, location and comment count.
const POST_DETAILS_SELECT: &str = r#"
    SELECT p.id, p.title, p.text, p.pub_date, p.image, p.is_published, p.created_at,
           p.author_id, u.username AS author_username,
           c.id AS category_id, c.title AS category_title, c.slug AS category_slug,
           c.is_published AS category_is_published,
           l.id AS location_id, l.name AS location_name, l.is_published AS location_is_published,
           (SELECT COUNT(*) FROM comments cm WHERE cm.post_id = p.id) AS comment_count
    FROM posts p
    JOIN users u ON u.id = p.author_id
    LEFT JOIN categories c ON c.id = p.category_id
    LEFT JOIN locations l ON l.id = p.location_id
"#;

/// Binds: $1 public_at, $2 category id, $3 author id, $4 title pattern
const POST_FILTER_WHERE: &str = r#"
    WHERE ($1::TIMESTAMPTZ IS NULL
           OR (p.is_published AND (c.id IS NULL OR c.is_published) AND p.pub_date <= $1))
      AND ($2::BIGINT IS NULL OR p.category_id = $2)
      AND ($3::BIGINT IS NULL OR p.author_id = $3)
      AND ($4::TEXT IS NULL OR p.title ILIKE $4)
"#;

const COMMENT_DETAILS_SELECT: &str = r#"
    SELECT cm.id, cm.text, cm.post_id, p.title AS post_title,
           cm.author_id, u.username AS author_username, cm.created_at
    FROM comments cm
    JOIN posts p ON p.id = cm.post_id
    JOIN users u ON u.id = cm.author_id
    WHERE ($1::BIGINT IS NULL OR cm.post_id = $1)
      AND ($2::BIGINT IS NULL OR cm.author_id = $2)
"#;

#[derive(FromRow)]
struct PostDetailsRow {
    id: i64,
    title: String,
    text: String,
    pub_date: DateTime<Utc>,
    image: Option<String>,
    is_published: bool,
    created_at: DateTime<Utc>,
    author_id: i64,
    author_username: String,
    category_id: Option<i64>,
    category_title: Option<String>,
    category_slug: Option<String>,
    category_is_published: Option<bool>,
    location_id: Option<i64>,
    location_name: Option<String>,
    location_is_published: Option<bool>,
    comment_count: i64,
}

impl From<PostDetailsRow> for PostDetails {
    fn from(row: PostDetailsRow) -> Self {
        let category = match (
            row.category_id,
            row.category_title,
            row.category_slug,
            row.category_is_published,
        ) {
            (Some(id), Some(title), Some(slug), Some(is_published)) => Some(CategoryRef {
                id,
                title,
                slug,
                is_published,
            }),
            _ => None,
        };

        let location = match (row.location_id, row.location_name, row.location_is_published) {
            (Some(id), Some(name), Some(is_published)) => Some(LocationRef {
                id,
                name,
                is_published,
            }),
            _ => None,
        };

        PostDetails {
            id: row.id,
            title: row.title,
            text: row.text,
            pub_date: row.pub_date,
            image: row.image,
            author: AuthorRef {
                id: row.author_id,
                username: row.author_username,
            },
            category,
            location,
            is_published: row.is_published,
            created_at: row.created_at,
            comment_count: row.comment_count,
        }
    }
}

#[derive(FromRow)]
struct CommentDetailsRow {
    id: i64,
    text: String,
    post_id: i64,
    post_title: String,
    author_id: i64,
    author_username: String,
    created_at: DateTime<Utc>,
}

impl From<CommentDetailsRow> for CommentDetails {
    fn from(row: CommentDetailsRow) -> Self {
        CommentDetails {
            id: row.id,
            text: row.text,
            post_id: row.post_id,
            post_title: row.post_title,
            author: AuthorRef {
                id: row.author_id,
                username: row.author_username,
            },
            created_at: row.created_at,
        }
    }
}

/// Turn unique violations into `Conflict`, everything else stays a database error.
fn map_unique(err: sqlx::Error, what: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict(format!("{} already exists", what))
        }
        _ => AppError::Database(err),
    }
}

/// PostgreSQL repository (source of truth)
#[derive(Clone)]
pub struct PostgresBlogRepository {
    pool: PgPool,
}

impl PostgresBlogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlogRepository for PostgresBlogRepository {
    async fn create_user(&self, user: NewUser) -> Result<User> {
        let sql = format!(
            r#"
            INSERT INTO users (username, email, first_name, last_name, password_hash, is_staff)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        );

        let created = sqlx::query_as::<_, User>(&sql)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.password_hash)
            .bind(user.is_staff)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_unique(e, "username"))?;

        debug!(user_id = created.id, "Inserted user");
        Ok(created)
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn update_user(&self, id: i64, changes: UserChanges) -> Result<User> {
        let sql = format!(
            r#"
            UPDATE users
            SET username = $1, email = $2, first_name = $3, last_name = $4
            WHERE id = $5
            RETURNING {USER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(&changes.username)
            .bind(&changes.email)
            .bind(&changes.first_name)
            .bind(&changes.last_name)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_unique(e, "username"))?
            .ok_or_else(|| AppError::NotFound(format!("user {} not found", id)))
    }

    async fn create_category(&self, category: NewCategory) -> Result<Category> {
        let sql = format!(
            r#"
            INSERT INTO categories (title, description, slug, is_published)
            VALUES ($1, $2, $3, $4)
            RETURNING {CATEGORY_COLUMNS}
            "#
        );

        Ok(sqlx::query_as::<_, Category>(&sql)
            .bind(&category.title)
            .bind(&category.description)
            .bind(&category.slug)
            .bind(category.is_published)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_unique(e, "category slug"))?)
    }

    async fn find_category(&self, id: i64) -> Result<Option<Category>> {
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1");
        Ok(sqlx::query_as::<_, Category>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_category_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE slug = $1");
        Ok(sqlx::query_as::<_, Category>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_categories(&self, published_only: bool) -> Result<Vec<Category>> {
        let sql = format!(
            r#"
            SELECT {CATEGORY_COLUMNS} FROM categories
            WHERE ($1 = FALSE OR is_published)
            ORDER BY title, id
            "#
        );
        Ok(sqlx::query_as::<_, Category>(&sql)
            .bind(published_only)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn update_category(&self, id: i64, changes: CategoryChanges) -> Result<Category> {
        let sql = format!(
            r#"
            UPDATE categories
            SET title = COALESCE($1, title),
                description = COALESCE($2, description),
                slug = COALESCE($3, slug),
                is_published = COALESCE($4, is_published)
            WHERE id = $5
            RETURNING {CATEGORY_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Category>(&sql)
            .bind(changes.title)
            .bind(changes.description)
            .bind(changes.slug)
            .bind(changes.is_published)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_unique(e, "category slug"))?
            .ok_or_else(|| AppError::NotFound(format!("category {} not found", id)))
    }

    async fn delete_category(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_location(&self, location: NewLocation) -> Result<Location> {
        let sql = format!(
            "INSERT INTO locations (name, is_published) VALUES ($1, $2) RETURNING {LOCATION_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Location>(&sql)
            .bind(&location.name)
            .bind(location.is_published)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn find_location(&self, id: i64) -> Result<Option<Location>> {
        let sql = format!("SELECT {LOCATION_COLUMNS} FROM locations WHERE id = $1");
        Ok(sqlx::query_as::<_, Location>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_locations(&self, published_only: bool) -> Result<Vec<Location>> {
        let sql = format!(
            r#"
            SELECT {LOCATION_COLUMNS} FROM locations
            WHERE ($1 = FALSE OR is_published)
            ORDER BY name, id
            "#
        );
        Ok(sqlx::query_as::<_, Location>(&sql)
            .bind(published_only)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn update_location(&self, id: i64, changes: LocationChanges) -> Result<Location> {
        let sql = format!(
            r#"
            UPDATE locations
            SET name = COALESCE($1, name),
                is_published = COALESCE($2, is_published)
            WHERE id = $3
            RETURNING {LOCATION_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Location>(&sql)
            .bind(changes.name)
            .bind(changes.is_published)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("location {} not found", id)))
    }

    async fn delete_location(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM locations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_post(&self, post: NewPost) -> Result<Post> {
        let sql = format!(
            r#"
            INSERT INTO posts (title, text, pub_date, image, author_id, category_id, location_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {POST_COLUMNS}
            "#
        );

        let created = sqlx::query_as::<_, Post>(&sql)
            .bind(&post.title)
            .bind(&post.text)
            .bind(post.pub_date)
            .bind(&post.image)
            .bind(post.author_id)
            .bind(post.category_id)
            .bind(post.location_id)
            .fetch_one(&self.pool)
            .await?;

        debug!(post_id = created.id, author_id = created.author_id, "Inserted post");
        Ok(created)
    }

    async fn find_post(&self, id: i64) -> Result<Option<Post>> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1");
        Ok(sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_post_details(&self, id: i64) -> Result<Option<PostDetails>> {
        let sql = format!("{POST_DETAILS_SELECT} WHERE p.id = $1");
        let row = sqlx::query_as::<_, PostDetailsRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(PostDetails::from))
    }

    async fn update_post(&self, id: i64, changes: PostChanges) -> Result<Post> {
        let sql = format!(
            r#"
            UPDATE posts
            SET title = $1, text = $2, pub_date = $3, image = $4,
                category_id = $5, location_id = $6
            WHERE id = $7
            RETURNING {POST_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Post>(&sql)
            .bind(&changes.title)
            .bind(&changes.text)
            .bind(changes.pub_date)
            .bind(&changes.image)
            .bind(changes.category_id)
            .bind(changes.location_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::post_not_found(id))
    }

    async fn moderate_post(&self, id: i64, changes: PostModeration) -> Result<Post> {
        let sql = format!(
            r#"
            UPDATE posts
            SET pub_date = COALESCE($1, pub_date),
                category_id = CASE WHEN $2::BOOLEAN THEN $3::BIGINT ELSE category_id END,
                location_id = CASE WHEN $4::BOOLEAN THEN $5::BIGINT ELSE location_id END,
                is_published = COALESCE($6, is_published)
            WHERE id = $7
            RETURNING {POST_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Post>(&sql)
            .bind(changes.pub_date)
            .bind(changes.category_id.is_some())
            .bind(changes.category_id.flatten())
            .bind(changes.location_id.is_some())
            .bind(changes.location_id.flatten())
            .bind(changes.is_published)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::post_not_found(id))
    }

    async fn delete_post(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_posts(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<(Vec<PostDetails>, i64)> {
        let title_pattern = filter.title_search.as_deref().map(like_pattern);

        let count_sql = format!(
            r#"
            SELECT COUNT(*)
            FROM posts p
            LEFT JOIN categories c ON c.id = p.category_id
            {POST_FILTER_WHERE}
            "#
        );
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(filter.public_at)
            .bind(filter.category_id)
            .bind(filter.author_id)
            .bind(title_pattern.as_deref())
            .fetch_one(&self.pool)
            .await?;

        let list_sql = format!(
            "{POST_DETAILS_SELECT} {POST_FILTER_WHERE} ORDER BY p.pub_date DESC, p.id DESC LIMIT $5 OFFSET $6"
        );
        let rows = sqlx::query_as::<_, PostDetailsRow>(&list_sql)
            .bind(filter.public_at)
            .bind(filter.category_id)
            .bind(filter.author_id)
            .bind(title_pattern.as_deref())
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok((rows.into_iter().map(PostDetails::from).collect(), total))
    }

    async fn create_comment(&self, post_id: i64, author_id: i64, text: &str) -> Result<Comment> {
        let sql = format!(
            r#"
            INSERT INTO comments (text, post_id, author_id)
            VALUES ($1, $2, $3)
            RETURNING {COMMENT_COLUMNS}
            "#
        );

        Ok(sqlx::query_as::<_, Comment>(&sql)
            .bind(text)
            .bind(post_id)
            .bind(author_id)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn find_comment(&self, id: i64) -> Result<Option<Comment>> {
        let sql = format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1");
        Ok(sqlx::query_as::<_, Comment>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn update_comment(&self, id: i64, text: &str) -> Result<Comment> {
        let sql = format!("UPDATE comments SET text = $1 WHERE id = $2 RETURNING {COMMENT_COLUMNS}");
        sqlx::query_as::<_, Comment>(&sql)
            .bind(text)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::comment_not_found(id))
    }

    async fn delete_comment(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_comments(
        &self,
        filter: &CommentFilter,
        page: Option<PageRequest>,
    ) -> Result<(Vec<CommentDetails>, i64)> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM comments cm
            WHERE ($1::BIGINT IS NULL OR cm.post_id = $1)
              AND ($2::BIGINT IS NULL OR cm.author_id = $2)
            "#,
        )
        .bind(filter.post_id)
        .bind(filter.author_id)
        .fetch_one(&self.pool)
        .await?;

        let sql = format!(
            "{COMMENT_DETAILS_SELECT} ORDER BY cm.created_at ASC, cm.id ASC LIMIT $3::BIGINT OFFSET $4"
        );
        let rows = sqlx::query_as::<_, CommentDetailsRow>(&sql)
            .bind(filter.post_id)
            .bind(filter.author_id)
            .bind(page.map(|p| p.limit()))
            .bind(page.map_or(0, |p| p.offset()))
            .fetch_all(&self.pool)
            .await?;

        Ok((rows.into_iter().map(CommentDetails::from).collect(), total))
    }

    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
