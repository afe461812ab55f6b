/// Comment handlers
use actix_web::{web, HttpResponse};

use crate::error::Result;
use crate::forms::CommentForm;
use crate::middleware::AuthUser;
use crate::services::CommentService;
use crate::AppState;

pub async fn create_comment(
    state: web::Data<AppState>,
    user: AuthUser,
    post_id: web::Path<i64>,
    form: web::Json<CommentForm>,
) -> Result<HttpResponse> {
    let comment = CommentService::new(state.repo.clone())
        .create(user.id, *post_id, form.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(comment))
}

pub async fn update_comment(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<(i64, i64)>,
    form: web::Json<CommentForm>,
) -> Result<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = CommentService::new(state.repo.clone())
        .update(user.id, post_id, comment_id, form.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(comment))
}

pub async fn delete_comment(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    CommentService::new(state.repo.clone())
        .delete(user.id, post_id, comment_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
