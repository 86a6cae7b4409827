//! Digital layout persistence
//!
//! Layout documents belong to exactly one magazine issue. Mutation is
//! either single-insert (`create`) or whole-set replacement
//! (`batch_replace`); the replace runs in one transaction so readers
//! never observe a mixed old/new set for an issue.

use chrono::{DateTime, Utc};
use glow_common::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use std::collections::HashSet;
use uuid::Uuid;

/// A single positioned object inside a layout.
///
/// Known object kinds are tagged variants; anything else is preserved
/// verbatim as `Custom` so admin-authored payloads survive a round trip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum LayoutObject {
    Known(KnownObject),
    Custom(serde_json::Value),
}

/// Object kinds the renderer understands natively
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum KnownObject {
    #[serde(rename_all = "camelCase")]
    Text {
        content: String,
        x: f64,
        y: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        font: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Image {
        url: String,
        x: f64,
        y: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        width: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        height: Option<f64>,
    },
    #[serde(rename_all = "camelCase")]
    Shape {
        shape: String,
        x: f64,
        y: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fill: Option<String>,
    },
}

/// Persisted layout document
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DigitalLayout {
    pub id: String,
    pub issue_id: String,
    pub position: i64,
    pub template: String,
    pub objects: Vec<LayoutObject>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied layout fields for create and batch-replace.
///
/// Position is never caller-supplied: a batch's submission order is the
/// desired order, and single creates append at the end. This keeps the
/// stored order and the order returned to the submitter identical.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutInput {
    /// Explicit document id; generated when absent
    #[serde(default)]
    pub id: Option<String>,
    /// Named template reference (required)
    #[serde(default)]
    pub template: String,
    #[serde(default)]
    pub objects: Vec<LayoutObject>,
}

/// List all layouts for an issue, ordered by position.
///
/// An issue with zero layouts yields an empty Vec; only an invalid issue
/// context (blank id) is an error.
pub async fn list(pool: &SqlitePool, issue_id: &str) -> Result<Vec<DigitalLayout>> {
    require_issue_id(issue_id)?;

    let rows = sqlx::query(
        "SELECT id, issue_id, position, template, objects, created_at, updated_at
         FROM digital_layouts WHERE issue_id = ? ORDER BY position",
    )
    .bind(issue_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(layout_from_row).collect()
}

/// Insert a single layout for an issue
pub async fn create(
    pool: &SqlitePool,
    issue_id: &str,
    input: LayoutInput,
) -> Result<DigitalLayout> {
    require_issue_id(issue_id)?;
    validate_input(&input)?;

    // Read-then-insert runs in one transaction so concurrent creates on
    // the same issue cannot claim the same position
    let mut tx = pool.begin().await?;

    let next_position: i64 =
        sqlx::query_scalar("SELECT COALESCE(MAX(position) + 1, 0) FROM digital_layouts WHERE issue_id = ?")
            .bind(issue_id)
            .fetch_one(&mut *tx)
            .await?;

    let layout = materialize(issue_id, input, next_position, Utc::now())?;
    sqlx::query(
        "INSERT INTO digital_layouts (id, issue_id, position, template, objects, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&layout.id)
    .bind(&layout.issue_id)
    .bind(layout.position)
    .bind(&layout.template)
    .bind(objects_json(&layout.objects)?)
    .bind(layout.created_at)
    .bind(layout.updated_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(layout)
}

/// Replace the full layout set of an issue in one transaction.
///
/// Validates the whole batch before writing; on validation failure the
/// existing set is untouched. Positions are assigned from batch index,
/// so a later `list` returns exactly the submitted order.
pub async fn batch_replace(
    pool: &SqlitePool,
    issue_id: &str,
    inputs: Vec<LayoutInput>,
) -> Result<Vec<DigitalLayout>> {
    require_issue_id(issue_id)?;
    validate_batch(&inputs)?;

    let now = Utc::now();
    let layouts = inputs
        .into_iter()
        .enumerate()
        .map(|(index, input)| materialize(issue_id, input, index as i64, now))
        .collect::<Result<Vec<_>>>()?;

    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM digital_layouts WHERE issue_id = ?")
        .bind(issue_id)
        .execute(&mut *tx)
        .await?;

    for layout in &layouts {
        sqlx::query(
            "INSERT INTO digital_layouts (id, issue_id, position, template, objects, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&layout.id)
        .bind(&layout.issue_id)
        .bind(layout.position)
        .bind(&layout.template)
        .bind(objects_json(&layout.objects)?)
        .bind(layout.created_at)
        .bind(layout.updated_at)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(layouts)
}

fn require_issue_id(issue_id: &str) -> Result<()> {
    if issue_id.trim().is_empty() {
        return Err(Error::NotFound("issue".to_string()));
    }
    Ok(())
}

fn validate_input(input: &LayoutInput) -> Result<()> {
    if input.template.trim().is_empty() {
        return Err(Error::InvalidInput(
            "layout is missing a template reference".to_string(),
        ));
    }
    Ok(())
}

/// Whole-batch validation: nothing is written unless every input passes
fn validate_batch(inputs: &[LayoutInput]) -> Result<()> {
    let mut seen_ids = HashSet::new();
    for input in inputs {
        validate_input(input)?;
        if let Some(id) = &input.id {
            if !seen_ids.insert(id.as_str()) {
                return Err(Error::InvalidInput(format!(
                    "duplicate layout id in batch: {}",
                    id
                )));
            }
        }
    }
    Ok(())
}

fn materialize(
    issue_id: &str,
    input: LayoutInput,
    position: i64,
    now: DateTime<Utc>,
) -> Result<DigitalLayout> {
    Ok(DigitalLayout {
        id: input.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
        issue_id: issue_id.to_string(),
        position,
        template: input.template,
        objects: input.objects,
        created_at: now,
        updated_at: now,
    })
}

fn objects_json(objects: &[LayoutObject]) -> Result<String> {
    serde_json::to_string(objects)
        .map_err(|e| Error::Internal(format!("layout objects not serializable: {}", e)))
}

fn layout_from_row(row: &SqliteRow) -> Result<DigitalLayout> {
    let objects_raw: String = row.try_get("objects")?;
    let objects: Vec<LayoutObject> = serde_json::from_str(&objects_raw)
        .map_err(|e| Error::Internal(format!("stored layout objects unreadable: {}", e)))?;

    Ok(DigitalLayout {
        id: row.try_get("id")?,
        issue_id: row.try_get("issue_id")?,
        position: row.try_get("position")?,
        template: row.try_get("template")?,
        objects,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
