//! # GradDrive Binary
//!
//! The entry point that assembles the portal based on compile-time features.

use actix_web::{web, App, HttpServer};
use gd_api::middleware;
use gd_api::state::AppState;
use std::env;
use std::sync::Arc;

// Feature-gated imports: This is the "Compiled-to-Order" magic
#[cfg(feature = "db-sqlite")]
use gd_db_sqlite::SqlitePortalRepo;

#[cfg(feature = "storage-local")]
use gd_storage_local::LocalBlobStore;

#[cfg(feature = "auth-simple")]
use gd_auth_simple::SimpleAuthenticator;

fn env_or(key: &str, fallback: &str) -> String {
    env::var(key).unwrap_or_else(|_| fallback.to_string())
}

fn env_required(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} must be set"))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let bind_addr = env_or("GD_BIND_ADDR", "127.0.0.1:8080");
    let database_url = env_or("GD_DATABASE_URL", "sqlite:grad_drive.db");
    let upload_root = env_or("GD_UPLOAD_ROOT", "./data/uploads");
    let upload_url_prefix = env_or("GD_UPLOAD_URL_PREFIX", "/static/uploads");

    // 1. Initialize Database Implementation
    #[cfg(feature = "db-sqlite")]
    let repo = SqlitePortalRepo::new(&database_url)
        .await
        .expect("Failed to init SQLite");

    // 2. Initialize Storage Implementation
    #[cfg(feature = "storage-local")]
    let blobs = LocalBlobStore::new(upload_root.clone().into(), upload_url_prefix.clone());

    // 3. Initialize Auth Implementation
    #[cfg(feature = "auth-simple")]
    let auth = SimpleAuthenticator::new(
        &env_required("GD_TOKEN_SECRET"),
        &env_required("GD_ADMIN_PASSKEY"),
        &env_required("GD_SUPER_ADMIN_PASSKEY"),
    );

    // 4. Wrap in AppState (Using dynamic dispatch for maximum flexibility)
    let state = web::Data::new(AppState::new(
        Arc::new(repo),
        Arc::new(blobs),
        Arc::new(auth),
    ));

    log::info!("🚀 GradDrive starting on http://{bind_addr}");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::standard_middleware())
            .wrap(middleware::cors_policy())
            .configure(gd_api::configure_routes)
            .service(actix_files::Files::new(&upload_url_prefix, &upload_root))
    })
    .bind(bind_addr)?
    .run()
    .await
}
