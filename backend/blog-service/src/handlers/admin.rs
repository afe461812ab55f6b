/// Staff-only administration endpoints
///
/// Every handler checks the caller's staff flag before touching data;
/// authenticated non-staff callers get 403.
use actix_web::{web, HttpResponse};

use crate::error::Result;
use crate::forms::{
    AdminCommentQuery, AdminPostQuery, CategoryForm, CategoryPatch, LocationForm, LocationPatch,
    PostModerationForm,
};
use crate::middleware::AuthUser;
use crate::services::AdminService;
use crate::AppState;

async fn staff_service(state: &AppState, user: &AuthUser) -> Result<AdminService> {
    let service = AdminService::new(state.repo.clone(), state.per_page());
    service.authorize(user.id).await?;
    Ok(service)
}

pub async fn list_categories(state: web::Data<AppState>, user: AuthUser) -> Result<HttpResponse> {
    let categories = staff_service(&state, &user).await?.list_categories().await?;
    Ok(HttpResponse::Ok().json(categories))
}

pub async fn create_category(
    state: web::Data<AppState>,
    user: AuthUser,
    form: web::Json<CategoryForm>,
) -> Result<HttpResponse> {
    let category = staff_service(&state, &user)
        .await?
        .create_category(form.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(category))
}

pub async fn update_category(
    state: web::Data<AppState>,
    user: AuthUser,
    id: web::Path<i64>,
    patch: web::Json<CategoryPatch>,
) -> Result<HttpResponse> {
    let category = staff_service(&state, &user)
        .await?
        .update_category(*id, patch.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(category))
}

pub async fn delete_category(
    state: web::Data<AppState>,
    user: AuthUser,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    staff_service(&state, &user).await?.delete_category(*id).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn list_locations(state: web::Data<AppState>, user: AuthUser) -> Result<HttpResponse> {
    let locations = staff_service(&state, &user).await?.list_locations().await?;
    Ok(HttpResponse::Ok().json(locations))
}

pub async fn create_location(
    state: web::Data<AppState>,
    user: AuthUser,
    form: web::Json<LocationForm>,
) -> Result<HttpResponse> {
    let location = staff_service(&state, &user)
        .await?
        .create_location(form.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(location))
}

pub async fn update_location(
    state: web::Data<AppState>,
    user: AuthUser,
    id: web::Path<i64>,
    patch: web::Json<LocationPatch>,
) -> Result<HttpResponse> {
    let location = staff_service(&state, &user)
        .await?
        .update_location(*id, patch.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(location))
}

pub async fn delete_location(
    state: web::Data<AppState>,
    user: AuthUser,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    staff_service(&state, &user).await?.delete_location(*id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// All posts, searchable by title and filterable by category
pub async fn list_posts(
    state: web::Data<AppState>,
    user: AuthUser,
    query: web::Query<AdminPostQuery>,
) -> Result<HttpResponse> {
    let page = staff_service(&state, &user)
        .await?
        .list_posts(query.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

pub async fn moderate_post(
    state: web::Data<AppState>,
    user: AuthUser,
    id: web::Path<i64>,
    form: web::Json<PostModerationForm>,
) -> Result<HttpResponse> {
    let post = staff_service(&state, &user)
        .await?
        .moderate_post(*id, form.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(post))
}

pub async fn list_comments(
    state: web::Data<AppState>,
    user: AuthUser,
    query: web::Query<AdminCommentQuery>,
) -> Result<HttpResponse> {
    let page = staff_service(&state, &user)
        .await?
        .list_comments(query.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

pub async fn delete_comment(
    state: web::Data<AppState>,
    user: AuthUser,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    staff_service(&state, &user).await?.delete_comment(*id).await?;
    Ok(HttpResponse::NoContent().finish())
}
