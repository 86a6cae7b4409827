//! Dashboard aggregation
//!
//! Summaries are derived on every read by grouping stored events inside
//! the resolved date interval. Rows with event types the application no
//! longer recognizes are excluded rather than failing the whole read.

use glow_common::{Error, Result};
use serde::Serialize;
use sqlx::SqlitePool;

use super::range::DateRange;
use super::types::{CardEventType, MagazineEventType};

/// Aggregated engagement for one professional's card
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CardSummary {
    pub card_id: String,
    pub views: i64,
    pub shares: i64,
    pub link_clicks: i64,
    pub save_contacts: i64,
    pub total_events: i64,
    /// Mean view duration in milliseconds, when any view carried one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_view_duration_ms: Option<f64>,
}

/// Aggregated engagement for one page of a magazine issue
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageStats {
    pub page_id: String,
    pub page_views: i64,
    pub link_clicks: i64,
    pub shares: i64,
    pub total_events: i64,
    /// Mean dwell time in milliseconds, when page views carried one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_dwell_ms: Option<f64>,
}

#[derive(sqlx::FromRow)]
struct GroupedRow {
    subject: String,
    event_type: String,
    count: i64,
    avg_duration: Option<f64>,
}

/// Per-card summaries over the resolved interval, ordered by card id.
///
/// An empty event set yields an empty list, never an error.
pub async fn card_dashboard(pool: &SqlitePool, range: DateRange) -> Result<Vec<CardSummary>> {
    let (start, end) = range.resolve(chrono::Utc::now());

    let rows: Vec<GroupedRow> = sqlx::query_as(
        "SELECT card_id AS subject, event_type, COUNT(*) AS count, AVG(duration_ms) AS avg_duration
         FROM card_events
         WHERE occurred_at >= ? AND occurred_at < ?
         GROUP BY card_id, event_type
         ORDER BY card_id",
    )
    .bind(start.unwrap_or(i64::MIN))
    .bind(end)
    .fetch_all(pool)
    .await?;

    let mut summaries: Vec<CardSummary> = Vec::new();
    for row in rows {
        // Unknown stored types are dropped from the summary
        let Some(event_type) = CardEventType::parse(&row.event_type) else {
            continue;
        };

        if summaries.last().map(|s| s.card_id.as_str()) != Some(row.subject.as_str()) {
            summaries.push(CardSummary {
                card_id: row.subject.clone(),
                ..Default::default()
            });
        }
        let summary = summaries.last_mut().unwrap();

        summary.total_events += row.count;
        match event_type {
            CardEventType::View => {
                summary.views += row.count;
                summary.avg_view_duration_ms = row.avg_duration;
            }
            CardEventType::Share => summary.shares += row.count,
            CardEventType::LinkClick => summary.link_clicks += row.count,
            CardEventType::SaveContact => summary.save_contacts += row.count,
        }
    }

    Ok(summaries)
}

/// Per-page summaries for one issue over the resolved interval.
///
/// Only an invalid issue context (blank id) is an error; an issue with
/// no events yields an empty list.
pub async fn page_stats(
    pool: &SqlitePool,
    issue_id: &str,
    range: DateRange,
) -> Result<Vec<PageStats>> {
    if issue_id.trim().is_empty() {
        return Err(Error::NotFound("issue".to_string()));
    }

    let (start, end) = range.resolve(chrono::Utc::now());

    let rows: Vec<GroupedRow> = sqlx::query_as(
        "SELECT page_id AS subject, event_type, COUNT(*) AS count, AVG(duration_ms) AS avg_duration
         FROM magazine_events
         WHERE issue_id = ? AND occurred_at >= ? AND occurred_at < ?
         GROUP BY page_id, event_type
         ORDER BY page_id",
    )
    .bind(issue_id)
    .bind(start.unwrap_or(i64::MIN))
    .bind(end)
    .fetch_all(pool)
    .await?;

    let mut stats: Vec<PageStats> = Vec::new();
    for row in rows {
        let Some(event_type) = MagazineEventType::parse(&row.event_type) else {
            continue;
        };

        if stats.last().map(|s| s.page_id.as_str()) != Some(row.subject.as_str()) {
            stats.push(PageStats {
                page_id: row.subject.clone(),
                ..Default::default()
            });
        }
        let page = stats.last_mut().unwrap();

        page.total_events += row.count;
        match event_type {
            MagazineEventType::PageView => {
                page.page_views += row.count;
                page.avg_dwell_ms = row.avg_duration;
            }
            MagazineEventType::LinkClick => page.link_clicks += row.count,
            MagazineEventType::Share => page.shares += row.count,
        }
    }

    Ok(stats)
}
