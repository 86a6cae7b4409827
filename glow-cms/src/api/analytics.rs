//! Analytics endpoints: event ingestion and dashboards

use axum::{
    extract::{Path, Query, State},
    Json,
};
use glow_common::{api::ApiResponse, Error};
use serde::{Deserialize, Serialize};

use crate::analytics::{
    aggregate, ingest, CardSummary, CreateCardEvent, CreateMagazineEvent, DateRange, PageStats,
};
use crate::AppState;

/// Query parameters carrying the semantic date-range token
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQuery {
    pub date_range: Option<String>,
}

impl DashboardQuery {
    /// Missing or unrecognized tokens fall back to the 30-day default
    fn range(&self) -> DateRange {
        self.date_range
            .as_deref()
            .map(DateRange::parse)
            .unwrap_or(DateRange::DEFAULT)
    }
}

/// POST body for both event-ingestion endpoints
#[derive(Debug, Deserialize)]
pub struct IngestRequest<E> {
    #[serde(default)]
    pub events: Vec<E>,
}

/// `{ success, count }` answer for event ingestion
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub success: bool,
    pub count: usize,
}

/// GET /analytics/card-dashboard?dateRange=30d
pub async fn card_dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<ApiResponse<Vec<CardSummary>>>, Error> {
    let summaries = aggregate::card_dashboard(&state.db, query.range()).await?;
    Ok(Json(ApiResponse::ok(summaries)))
}

/// POST /analytics/card-events
///
/// Best-effort: malformed events are skipped, the count reflects what
/// was actually persisted.
pub async fn ingest_card_events(
    State(state): State<AppState>,
    Json(request): Json<IngestRequest<CreateCardEvent>>,
) -> Result<Json<IngestResponse>, Error> {
    let report = ingest::ingest_card_events(&state.db, request.events).await?;
    Ok(Json(IngestResponse {
        success: true,
        count: report.accepted(),
    }))
}

/// GET /analytics/magazine-dashboard/:issueId/pages?dateRange=30d
pub async fn magazine_page_stats(
    State(state): State<AppState>,
    Path(issue_id): Path<String>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<ApiResponse<Vec<PageStats>>>, Error> {
    let stats = aggregate::page_stats(&state.db, &issue_id, query.range()).await?;
    Ok(Json(ApiResponse::ok(stats)))
}

/// POST /analytics/magazine-events
pub async fn ingest_magazine_events(
    State(state): State<AppState>,
    Json(request): Json<IngestRequest<CreateMagazineEvent>>,
) -> Result<Json<IngestResponse>, Error> {
    let report = ingest::ingest_magazine_events(&state.db, request.events).await?;
    Ok(Json(IngestResponse {
        success: true,
        count: report.accepted(),
    }))
}
