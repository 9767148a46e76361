//! Blog API - REST backend for blog articles with a single shared admin password.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Storage**: `ArticleStore` trait, PostgreSQL via sqlx or in-process memory
//! - **Authentication**: admin password exchanged for a 24 hour HS256 bearer token
//! - **Format**: JSON requests/responses
//!
//! Reads are public. Creating, updating and deleting articles requires
//! `Authorization: Bearer <token>`.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod store;

use std::sync::Arc;

use axum::{
    Router,
    handler::Handler,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{services::auth_gate::AuthGate, store::ArticleStore};

/// Shared state handed to every handler.
///
/// Both members are immutable after startup; the only shared resource
/// touched per request is the article store.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ArticleStore>,
    pub gate: Arc<AuthGate>,
}

impl AppState {
    pub fn new(store: Arc<dyn ArticleStore>, gate: AuthGate) -> Self {
        Self {
            store,
            gate: Arc::new(gate),
        }
    }
}

/// Build the HTTP router.
///
/// The admin guard wraps only the protected handlers, not whole paths, so a
/// method no route serves still gets 405 rather than an auth failure.
pub fn router(state: AppState) -> Router {
    let require_admin =
        axum_middleware::from_fn_with_state(state.clone(), middleware::auth::require_admin);

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            "/api/articles",
            get(handlers::articles::list_articles)
                .post(handlers::articles::create_article.layer(require_admin.clone())),
        )
        .route(
            "/api/articles/{id}",
            get(handlers::articles::get_article)
                .put(handlers::articles::update_article.layer(require_admin.clone()))
                .delete(handlers::articles::delete_article.layer(require_admin.clone())),
        )
        .route("/api/auth/login", post(handlers::auth::login))
        .route(
            "/api/auth/check",
            get(handlers::auth::check.layer(require_admin)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
