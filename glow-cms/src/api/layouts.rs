//! Digital-layout endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use glow_common::{api::ApiResponse, Error};
use serde::Deserialize;

use crate::layouts::{self, DigitalLayout, LayoutInput};
use crate::AppState;

/// Query parameters for layout listing
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutListQuery {
    pub issue_id: Option<String>,
}

/// POST /digital-layouts body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLayoutRequest {
    pub issue_id: String,
    #[serde(flatten)]
    pub layout: LayoutInput,
}

/// POST /digital-layouts/batch body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUploadRequest {
    pub issue_id: String,
    #[serde(default)]
    pub layouts: Vec<LayoutInput>,
}

/// GET /digital-layouts?issueId=…
///
/// Returns the issue's layouts in position order; an issue with no
/// layouts answers with an empty list.
pub async fn list_layouts(
    State(state): State<AppState>,
    Query(query): Query<LayoutListQuery>,
) -> Result<Json<ApiResponse<Vec<DigitalLayout>>>, Error> {
    let issue_id = query
        .issue_id
        .ok_or_else(|| Error::InvalidInput("issueId query parameter is required".to_string()))?;

    let layouts = layouts::list(&state.db, &issue_id).await?;
    Ok(Json(ApiResponse::ok(layouts)))
}

/// POST /digital-layouts
pub async fn create_layout(
    State(state): State<AppState>,
    Json(request): Json<CreateLayoutRequest>,
) -> Result<Json<ApiResponse<Vec<DigitalLayout>>>, Error> {
    let created = layouts::create(&state.db, &request.issue_id, request.layout).await?;
    Ok(Json(ApiResponse::ok(vec![created])))
}

/// POST /digital-layouts/batch
///
/// Atomically replaces the issue's full layout set with the submitted
/// one; clients always send the complete desired set.
pub async fn batch_upload_layouts(
    State(state): State<AppState>,
    Json(request): Json<BatchUploadRequest>,
) -> Result<Json<ApiResponse<Vec<DigitalLayout>>>, Error> {
    let layouts = layouts::batch_replace(&state.db, &request.issue_id, request.layouts).await?;
    Ok(Json(ApiResponse::ok(layouts)))
}
