//! Condensed-card section sync endpoint

use axum::{extract::State, Json};
use glow_common::{api::ApiResponse, Error};
use serde::Deserialize;

use crate::cards::{apply_sync, CondensedEntry, SectionConfig};
use crate::AppState;

/// POST /cards/condensed-sync body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CondensedSyncRequest {
    #[serde(default)]
    pub sections: Vec<SectionConfig>,
    #[serde(default)]
    pub entries: Vec<CondensedEntry>,
}

/// POST /cards/condensed-sync
///
/// Pure projection over the submitted configuration; returns the merged
/// condensed-entry list. Nothing is persisted here — the admin client
/// saves the card document itself.
pub async fn condensed_sync(
    State(_state): State<AppState>,
    Json(request): Json<CondensedSyncRequest>,
) -> Result<Json<ApiResponse<Vec<CondensedEntry>>>, Error> {
    let merged = apply_sync(&request.sections, &request.entries);
    Ok(Json(ApiResponse::ok(merged)))
}
