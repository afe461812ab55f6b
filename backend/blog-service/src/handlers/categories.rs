use actix_web::{web, HttpResponse};

use crate::error::Result;
use crate::pagination::PageParams;
use crate::services::PostService;
use crate::AppState;

/// Published categories ordered by title
pub async fn list_categories(state: web::Data<AppState>) -> Result<HttpResponse> {
    let categories = state.repo.list_categories(true).await?;
    Ok(HttpResponse::Ok().json(categories))
}

/// A published category and its public posts
pub async fn category_posts(
    state: web::Data<AppState>,
    slug: web::Path<String>,
    query: web::Query<PageParams>,
) -> Result<HttpResponse> {
    let listing = PostService::new(state.repo.clone(), state.per_page())
        .category_posts(&slug, query.number()?)
        .await?;
    Ok(HttpResponse::Ok().json(listing))
}
