//! Blog API - Main Application Entry Point
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Select the article store (PostgreSQL, or in-process for `memory:`)
//! 3. Run database migrations when using PostgreSQL
//! 4. Build HTTP router with routes and middleware
//! 5. Start server on configured port

use std::sync::Arc;

use blog_api::{
    AppState, config, db,
    services::auth_gate::AuthGate,
    store::{ArticleStore, MemoryArticleStore, PgArticleStore},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Reads RUST_LOG (defaults to "info")
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    for name in config.insecure_defaults() {
        tracing::warn!("{} is using its development default; set it before deploying", name);
    }

    let store: Arc<dyn ArticleStore> = if config.uses_memory_store() {
        tracing::warn!("Using in-memory article store; articles are lost on restart");
        Arc::new(MemoryArticleStore::new())
    } else {
        let pool = db::create_pool(&config.database_url).await?;
        tracing::info!("Database pool created");

        db::run_migrations(&pool).await?;
        tracing::info!("Database migrations complete");

        Arc::new(PgArticleStore::new(pool))
    };

    let state = AppState::new(store, AuthGate::new(&config));
    let app = blog_api::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
