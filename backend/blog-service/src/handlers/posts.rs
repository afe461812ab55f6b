/// Post handlers - public listing, post page and author CRUD
use actix_web::{web, HttpResponse};

use crate::error::Result;
use crate::forms::PostForm;
use crate::middleware::{AuthUser, MaybeUser};
use crate::pagination::PageParams;
use crate::services::PostService;
use crate::AppState;

fn service(state: &AppState) -> PostService {
    PostService::new(state.repo.clone(), state.per_page())
}

/// Public posts, newest first
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<PageParams>,
) -> Result<HttpResponse> {
    let page = service(&state).index(query.number()?).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// Get a post and its comments
pub async fn get_post(
    state: web::Data<AppState>,
    viewer: MaybeUser,
    post_id: web::Path<i64>,
) -> Result<HttpResponse> {
    let detail = service(&state).detail(*post_id, viewer.id()).await?;
    Ok(HttpResponse::Ok().json(detail))
}

pub async fn create_post(
    state: web::Data<AppState>,
    user: AuthUser,
    form: web::Json<PostForm>,
) -> Result<HttpResponse> {
    let post = service(&state).create(user.id, form.into_inner()).await?;
    Ok(HttpResponse::Created().json(post))
}

pub async fn update_post(
    state: web::Data<AppState>,
    user: AuthUser,
    post_id: web::Path<i64>,
    form: web::Json<PostForm>,
) -> Result<HttpResponse> {
    let post = service(&state)
        .update(user.id, *post_id, form.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(post))
}

pub async fn delete_post(
    state: web::Data<AppState>,
    user: AuthUser,
    post_id: web::Path<i64>,
) -> Result<HttpResponse> {
    service(&state).delete(user.id, *post_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
