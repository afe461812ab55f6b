/// Blog Service Library
///
/// Blogicum: authors publish posts (optionally scheduled for later) into
/// categories and locations, readers comment on them, and staff curate the
/// catalogue through the admin endpoints.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers
/// - `services`: Business logic layer (visibility, ownership, validation)
/// - `repository`: Storage trait with PostgreSQL and in-memory implementations
/// - `models`: Entities and read views
/// - `forms`: Request payloads and validation rules
/// - `middleware`: Bearer-token extractors and permission checks
/// - `security`: Password hashing and JWT issuing
/// - `routes`: Route table
pub mod config;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod repository;
pub mod routes;
pub mod security;
pub mod services;

use std::sync::Arc;

pub use config::Config;
pub use error::{AppError, Result};

use repository::{BlogRepository, InMemoryBlogRepository};
use security::JwtKeys;

/// Shared state handed to every handler through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn BlogRepository>,
    pub config: Arc<Config>,
    pub jwt: JwtKeys,
}

impl AppState {
    pub fn new(repo: Arc<dyn BlogRepository>, config: Config) -> Self {
        let jwt = JwtKeys::new(&config.auth);
        Self {
            repo,
            config: Arc::new(config),
            jwt,
        }
    }

    /// State backed by a fresh in-memory repository.
    pub fn in_memory(config: Config) -> Self {
        Self::new(Arc::new(InMemoryBlogRepository::new()), config)
    }

    pub fn per_page(&self) -> u32 {
        self.config.blog.paginate_by
    }
}
