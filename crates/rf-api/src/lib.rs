//! # rf-api
//!
//! The HTTP routing and orchestration layer for Rusty-Forum.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod middleware;

use actix_web::web;
use rf_core::AppError;

pub use auth::AuthenticatedUser;
pub use error::ApiError;
pub use handlers::AppState;

/// Configures the forum routes.
///
/// # Developer Note
/// Scoped so the binary can mount the API under a prefix (e.g., /api/v1/).
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // Unparseable bodies get the same `fail` envelope as validation errors.
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        log::debug!("rejected request body: {}", err);
        ApiError(AppError::MissingField("request body".to_string())).into()
    }));

    cfg.service(
        web::scope("")
            .route("/users", web::post().to(handlers::register_user))
            .route("/authentications", web::post().to(handlers::login))
            .route("/threads", web::post().to(handlers::add_thread))
            .route("/threads/{thread_id}", web::get().to(handlers::get_thread))
            .route("/threads/{thread_id}/comments", web::post().to(handlers::add_comment))
            .route(
                "/threads/{thread_id}/comments/{comment_id}",
                web::delete().to(handlers::delete_comment),
            )
            .route(
                "/threads/{thread_id}/comments/{comment_id}/replies",
                web::post().to(handlers::add_reply),
            )
            .route(
                "/threads/{thread_id}/comments/{comment_id}/replies/{reply_id}",
                web::delete().to(handlers::delete_reply),
            )
            .route(
                "/threads/{thread_id}/comments/{comment_id}/likes",
                web::put().to(handlers::toggle_like),
            ),
    );
}
