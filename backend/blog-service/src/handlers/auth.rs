/// Registration and login endpoints
use actix_web::{web, HttpResponse};

use crate::error::Result;
use crate::forms::{LoginForm, RegistrationForm};
use crate::services::AuthService;
use crate::AppState;

fn service(state: &AppState) -> AuthService {
    AuthService::new(state.repo.clone(), state.jwt.clone())
}

pub async fn register(
    state: web::Data<AppState>,
    form: web::Json<RegistrationForm>,
) -> Result<HttpResponse> {
    let profile = service(&state).register(form.into_inner()).await?;
    Ok(HttpResponse::Created().json(profile))
}

pub async fn login(state: web::Data<AppState>, form: web::Json<LoginForm>) -> Result<HttpResponse> {
    let token = service(&state).login(form.into_inner()).await?;
    Ok(HttpResponse::Ok().json(token))
}
