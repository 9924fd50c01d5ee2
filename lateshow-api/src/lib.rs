//! lateshow-api library - HTTP layer of the Late Show API
//!
//! Guests, episodes and rated appearances served over HTTP/JSON from a
//! SQLite store.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod startup;

pub use crate::error::{ApiError, ApiResult};

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

    Router::new()
        .route("/", get(api::home))
        .route("/episodes", get(api::list_episodes))
        .route(
            "/episodes/:id",
            get(api::get_episode).delete(api::delete_episode),
        )
        .route("/guests", get(api::list_guests))
        .route("/guests/:id", get(api::get_guest))
        .route("/appearances", post(api::create_appearance))
        .route("/health", get(api::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
