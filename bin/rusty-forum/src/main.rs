//! # Rusty-Forum Binary
//!
//! The entry point that assembles the application based on compile-time features.

mod settings;

use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use rf_api::{configure_routes, middleware, AppState};
use secrecy::ExposeSecret;

use settings::Settings;

// Feature-gated imports: pick plugins at compile time
#[cfg(feature = "db-sqlite")]
use rf_db_sqlite::SqliteForumRepo;

#[cfg(all(feature = "db-memory", not(feature = "db-sqlite")))]
use rf_db_memory::MemoryForumRepo;

#[cfg(feature = "auth-simple")]
use rf_auth_simple::SimpleAuthProvider;

#[cfg(not(any(feature = "db-sqlite", feature = "db-memory")))]
compile_error!("enable a storage plugin: `db-sqlite` or `db-memory`");

#[cfg(not(feature = "auth-simple"))]
compile_error!("enable an auth plugin: `auth-simple`");

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let settings = Settings::from_env()?;

    // 1. Initialize Database Implementation
    #[cfg(feature = "db-sqlite")]
    let repo = Arc::new(SqliteForumRepo::new(&settings.database_url).await?);

    #[cfg(all(feature = "db-memory", not(feature = "db-sqlite")))]
    let repo = {
        log::warn!("using the in-memory store; data is lost on shutdown");
        Arc::new(MemoryForumRepo::new())
    };

    // 2. Initialize Auth Implementation
    let auth = Arc::new(SimpleAuthProvider::new(
        settings.token_secret.expose_secret(),
        settings.access_token_age_secs,
    ));

    // 3. One store backs every repository port
    let state = web::Data::new(AppState::new(
        repo.clone(),
        repo.clone(),
        repo.clone(),
        repo.clone(),
        repo,
        auth,
    ));

    log::info!("🚀 Rusty-Forum starting on http://{}", settings.bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::standard_middleware())
            .wrap(middleware::cors_policy())
            .configure(configure_routes)
    })
    .bind(settings.bind_addr.as_str())?
    .run()
    .await?;

    Ok(())
}
