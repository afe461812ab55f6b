/// Route table for blog-service
use actix_web::{web, HttpRequest};

use crate::error::AppError;
use crate::handlers::{self, admin};
use crate::metrics;

fn json_error(err: actix_web::error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Validation(err.to_string()).into()
}

fn query_error(err: actix_web::error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Validation(err.to_string()).into()
}

/// Register every endpoint. `AppState` must already be attached as app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .route("/metrics", web::get().to(metrics::serve_metrics))
        .route("/api/v1/health", web::get().to(handlers::health_summary))
        .route("/api/v1/health/ready", web::get().to(handlers::readiness_check))
        .route("/api/v1/health/live", web::get().to(handlers::liveness_check))
        .service(
            web::scope("/api/v1")
                .service(
                    web::scope("/auth")
                        .route("/register", web::post().to(handlers::register))
                        .route("/login", web::post().to(handlers::login)),
                )
                .service(
                    web::scope("/posts")
                        .service(
                            web::resource("")
                                .route(web::get().to(handlers::list_posts))
                                .route(web::post().to(handlers::create_post)),
                        )
                        .service(
                            web::resource("/{post_id}")
                                .route(web::get().to(handlers::get_post))
                                .route(web::put().to(handlers::update_post))
                                .route(web::delete().to(handlers::delete_post)),
                        )
                        .service(
                            web::resource("/{post_id}/comments")
                                .route(web::post().to(handlers::create_comment)),
                        )
                        .service(
                            web::resource("/{post_id}/comments/{comment_id}")
                                .route(web::put().to(handlers::update_comment))
                                .route(web::delete().to(handlers::delete_comment)),
                        ),
                )
                .service(
                    web::scope("/categories")
                        .service(web::resource("").route(web::get().to(handlers::list_categories)))
                        .service(
                            web::resource("/{slug}").route(web::get().to(handlers::category_posts)),
                        ),
                )
                .service(
                    web::scope("/profile")
                        .service(web::resource("").route(web::put().to(handlers::edit_profile)))
                        .service(
                            web::resource("/{username}").route(web::get().to(handlers::get_profile)),
                        ),
                )
                .service(
                    web::scope("/admin")
                        .service(
                            web::resource("/categories")
                                .route(web::get().to(admin::list_categories))
                                .route(web::post().to(admin::create_category)),
                        )
                        .service(
                            web::resource("/categories/{id}")
                                .route(web::patch().to(admin::update_category))
                                .route(web::delete().to(admin::delete_category)),
                        )
                        .service(
                            web::resource("/locations")
                                .route(web::get().to(admin::list_locations))
                                .route(web::post().to(admin::create_location)),
                        )
                        .service(
                            web::resource("/locations/{id}")
                                .route(web::patch().to(admin::update_location))
                                .route(web::delete().to(admin::delete_location)),
                        )
                        .service(web::resource("/posts").route(web::get().to(admin::list_posts)))
                        .service(
                            web::resource("/posts/{id}").route(web::patch().to(admin::moderate_post)),
                        )
                        .service(
                            web::resource("/comments").route(web::get().to(admin::list_comments)),
                        )
                        .service(
                            web::resource("/comments/{id}")
                                .route(web::delete().to(admin::delete_comment)),
                        ),
                ),
        );
}
