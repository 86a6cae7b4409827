//! Best-effort event ingestion
//!
//! A batch is validated item by item: malformed events are skipped and
//! logged, valid events are appended as immutable rows. The batch as a
//! whole only fails for structural reasons (size cap exceeded) or when
//! the store itself errors.

use chrono::Utc;
use glow_common::{Error, Result};
use sqlx::SqlitePool;
use tracing::warn;
use uuid::Uuid;

use super::types::{CardEventType, CreateCardEvent, CreateMagazineEvent, MagazineEventType};

/// Maximum number of events accepted per ingest call
pub const MAX_BATCH_SIZE: usize = 100;

/// Clock skew tolerated before a timestamp counts as implausible.
/// Anything further in the future would be invisible to every
/// dashboard range, so it is skipped at the door instead.
const MAX_FUTURE_SKEW_MS: i64 = 5 * 60 * 1000;

/// Per-item ingestion outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Accepted,
    Skipped(&'static str),
}

/// Result of one ingest call. The HTTP boundary only exposes
/// `accepted()`; the per-item outcomes exist for logging and tests.
#[derive(Debug)]
pub struct IngestReport {
    pub outcomes: Vec<ItemOutcome>,
}

impl IngestReport {
    /// Number of events actually persisted
    pub fn accepted(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ItemOutcome::Accepted))
            .count()
    }
}

/// Ingest a batch of card events, skipping malformed items
pub async fn ingest_card_events(
    pool: &SqlitePool,
    events: Vec<CreateCardEvent>,
) -> Result<IngestReport> {
    check_batch_size(events.len())?;

    let recorded_at = Utc::now();
    let mut outcomes = Vec::with_capacity(events.len());

    for event in events {
        let outcome = match validate_card_event(&event, recorded_at) {
            Ok((event_type, occurred_at)) => {
                sqlx::query(
                    "INSERT INTO card_events (id, card_id, event_type, occurred_at, referrer, duration_ms, recorded_at)
                     VALUES (?, ?, ?, ?, ?, ?, ?)",
                )
                .bind(Uuid::new_v4().to_string())
                .bind(&event.card_id)
                .bind(event_type.as_str())
                .bind(occurred_at)
                .bind(&event.referrer)
                .bind(event.duration_ms)
                .bind(recorded_at)
                .execute(pool)
                .await?;
                ItemOutcome::Accepted
            }
            Err(reason) => {
                warn!("Skipping malformed card event: {}", reason);
                ItemOutcome::Skipped(reason)
            }
        };
        outcomes.push(outcome);
    }

    Ok(IngestReport { outcomes })
}

/// Ingest a batch of magazine events, skipping malformed items
pub async fn ingest_magazine_events(
    pool: &SqlitePool,
    events: Vec<CreateMagazineEvent>,
) -> Result<IngestReport> {
    check_batch_size(events.len())?;

    let recorded_at = Utc::now();
    let mut outcomes = Vec::with_capacity(events.len());

    for event in events {
        let outcome = match validate_magazine_event(&event, recorded_at) {
            Ok((event_type, occurred_at)) => {
                sqlx::query(
                    "INSERT INTO magazine_events (id, issue_id, page_id, event_type, occurred_at, duration_ms, recorded_at)
                     VALUES (?, ?, ?, ?, ?, ?, ?)",
                )
                .bind(Uuid::new_v4().to_string())
                .bind(&event.issue_id)
                .bind(&event.page_id)
                .bind(event_type.as_str())
                .bind(occurred_at)
                .bind(event.duration_ms)
                .bind(recorded_at)
                .execute(pool)
                .await?;
                ItemOutcome::Accepted
            }
            Err(reason) => {
                warn!("Skipping malformed magazine event: {}", reason);
                ItemOutcome::Skipped(reason)
            }
        };
        outcomes.push(outcome);
    }

    Ok(IngestReport { outcomes })
}

fn check_batch_size(len: usize) -> Result<()> {
    if len > MAX_BATCH_SIZE {
        return Err(Error::InvalidInput(format!(
            "event batch exceeds maximum size of {}",
            MAX_BATCH_SIZE
        )));
    }
    Ok(())
}

fn validate_card_event(
    event: &CreateCardEvent,
    now: chrono::DateTime<Utc>,
) -> std::result::Result<(CardEventType, i64), &'static str> {
    if event.card_id.trim().is_empty() {
        return Err("missing cardId");
    }
    let occurred_at = plausible_timestamp(event.occurred_at, now)?;
    let event_type = CardEventType::parse(&event.event_type).ok_or("unknown eventType")?;
    Ok((event_type, occurred_at))
}

fn validate_magazine_event(
    event: &CreateMagazineEvent,
    now: chrono::DateTime<Utc>,
) -> std::result::Result<(MagazineEventType, i64), &'static str> {
    if event.issue_id.trim().is_empty() {
        return Err("missing issueId");
    }
    if event.page_id.trim().is_empty() {
        return Err("missing pageId");
    }
    let occurred_at = plausible_timestamp(event.occurred_at, now)?;
    let event_type = MagazineEventType::parse(&event.event_type).ok_or("unknown eventType")?;
    Ok((event_type, occurred_at))
}

fn plausible_timestamp(
    occurred_at: Option<chrono::DateTime<Utc>>,
    now: chrono::DateTime<Utc>,
) -> std::result::Result<i64, &'static str> {
    let millis = occurred_at.ok_or("missing occurredAt")?.timestamp_millis();
    if millis > now.timestamp_millis() + MAX_FUTURE_SKEW_MS {
        return Err("occurredAt in the future");
    }
    Ok(millis)
}
