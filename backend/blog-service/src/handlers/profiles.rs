/// Profile handlers
use actix_web::{web, HttpResponse};

use crate::error::Result;
use crate::forms::UserEditForm;
use crate::middleware::{AuthUser, MaybeUser};
use crate::pagination::PageParams;
use crate::services::ProfileService;
use crate::AppState;

pub async fn get_profile(
    state: web::Data<AppState>,
    viewer: MaybeUser,
    username: web::Path<String>,
    query: web::Query<PageParams>,
) -> Result<HttpResponse> {
    let page = ProfileService::new(state.repo.clone(), state.per_page())
        .profile(&username, viewer.id(), query.number()?)
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

/// Edit the caller's own profile
pub async fn edit_profile(
    state: web::Data<AppState>,
    user: AuthUser,
    form: web::Json<UserEditForm>,
) -> Result<HttpResponse> {
    let profile = ProfileService::new(state.repo.clone(), state.per_page())
        .edit(user.id, form.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(profile))
}
