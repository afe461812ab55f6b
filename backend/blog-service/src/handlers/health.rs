/// Health endpoints
use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::AppState;

/// Storage ping
pub async fn health_summary(state: web::Data<AppState>) -> HttpResponse {
    match state.repo.health_check().await {
        Ok(()) => HttpResponse::Ok().json(json!({
            "status": "healthy",
            "service": "blog-service",
            "storage": "ok",
        })),
        Err(e) => {
            tracing::warn!(error = %e, "storage health check failed");
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "unhealthy",
                "service": "blog-service",
                "storage": "unavailable",
            }))
        }
    }
}

pub async fn readiness_check(state: web::Data<AppState>) -> HttpResponse {
    match state.repo.health_check().await {
        Ok(()) => HttpResponse::Ok().json(json!({ "ready": true })),
        Err(_) => HttpResponse::ServiceUnavailable().json(json!({ "ready": false })),
    }
}

pub async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "alive" }))
}
