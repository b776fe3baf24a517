//! carousel-mg library - carousel slide relationship migration service
//!
//! Exposes the migration engine plus an axum router so the migration can be
//! triggered over HTTP as well as from the CLI.

use axum::Router;
use sqlx::SqlitePool;

pub mod api;
pub mod migrate;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};
    use tower_http::trace::TraceLayer;

    Router::new()
        .route("/api/migrate", post(api::migrate_handler))
        .route("/api/analyze", get(api::analyze_handler))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
