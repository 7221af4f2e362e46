//! # gd-api
//!
//! The web routing and orchestration layer for GradDrive.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;

use actix_web::web;

/// Configures the routes for the portal API.
///
/// # Developer Note
/// We use a scoped configuration to allow the main binary to mount
/// the API under different paths if needed (e.g., /api/v1/).
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Identity
            .route("/auth/passkey", web::post().to(handlers::auth::verify_passkey))
            .route("/auth/signup", web::post().to(handlers::auth::signup))
            .route("/auth/login", web::post().to(handlers::auth::login))
            .route("/auth/logout", web::post().to(handlers::auth::logout))
            // Posters
            .route("/posters", web::get().to(handlers::catalog::list_posters))
            .route("/posters", web::post().to(handlers::catalog::create_poster))
            .route("/posters/{id}", web::get().to(handlers::catalog::get_poster))
            .route("/posters/{id}", web::put().to(handlers::catalog::update_poster))
            .route("/posters/{id}", web::delete().to(handlers::catalog::delete_poster))
            .route("/posters/{id}/download", web::post().to(handlers::catalog::bump_poster))
            // Cap designs
            .route("/cap-designs", web::get().to(handlers::catalog::list_cap_designs))
            .route("/cap-designs", web::post().to(handlers::catalog::create_cap_design))
            .route("/cap-designs/{id}", web::get().to(handlers::catalog::get_cap_design))
            .route("/cap-designs/{id}", web::put().to(handlers::catalog::update_cap_design))
            .route("/cap-designs/{id}", web::delete().to(handlers::catalog::delete_cap_design))
            .route(
                "/cap-designs/{id}/download",
                web::post().to(handlers::catalog::bump_cap_design),
            )
            // Ebooks
            .route("/ebooks", web::get().to(handlers::catalog::list_ebooks))
            .route("/ebooks", web::post().to(handlers::catalog::create_ebook))
            .route("/ebooks/{id}", web::get().to(handlers::catalog::get_ebook))
            .route("/ebooks/{id}", web::put().to(handlers::catalog::update_ebook))
            .route("/ebooks/{id}", web::delete().to(handlers::catalog::delete_ebook))
            .route("/ebooks/{id}/download", web::post().to(handlers::catalog::bump_ebook))
            // Photographers
            .route("/photographers", web::get().to(handlers::catalog::list_photographers))
            .route("/photographers", web::post().to(handlers::catalog::create_photographer))
            .route("/photographers/{id}", web::get().to(handlers::catalog::get_photographer))
            .route("/photographers/{id}", web::put().to(handlers::catalog::update_photographer))
            .route(
                "/photographers/{id}",
                web::delete().to(handlers::catalog::delete_photographer),
            )
            // Administration
            .route("/users", web::get().to(handlers::admin::list_users))
            .route("/users/{id}/role", web::put().to(handlers::admin::set_user_role))
            .route("/logs", web::get().to(handlers::admin::recent_logs))
            .route("/analytics", web::get().to(handlers::admin::analytics))
            .route("/analytics/downloads", web::get().to(handlers::admin::download_totals))
            // Blobs and the download proxy
            .route("/uploads/{folder}", web::post().to(handlers::uploads::upload))
            .route("/uploads/{path:.*}", web::delete().to(handlers::uploads::delete_upload))
            .route("/download", web::get().to(handlers::proxy::download)),
    );
}
