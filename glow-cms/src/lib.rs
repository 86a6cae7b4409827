//! glow-cms library - Content Management backend
//!
//! HTTP service for the Glow beauty-professional platform covering the
//! digital-layout persistence and engagement-analytics slice: magazine
//! issue layouts, card/magazine event ingestion, dashboard aggregation,
//! and condensed-card section sync.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod analytics;
pub mod api;
pub mod cards;
pub mod layouts;

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
        .route("/digital-layouts", get(api::list_layouts).post(api::create_layout))
        .route("/digital-layouts/batch", post(api::batch_upload_layouts))
        .route("/analytics/card-dashboard", get(api::card_dashboard))
        .route("/analytics/card-events", post(api::ingest_card_events))
        .route(
            "/analytics/magazine-dashboard/:issue_id/pages",
            get(api::magazine_page_stats),
        )
        .route("/analytics/magazine-events", post(api::ingest_magazine_events))
        .route("/cards/condensed-sync", post(api::condensed_sync))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
