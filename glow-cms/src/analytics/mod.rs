//! Engagement analytics: event ingestion and dashboard aggregation
//!
//! Events are append-only; summaries are recomputed on every read by
//! scanning the resolved date interval, never stored.

pub mod aggregate;
pub mod ingest;
pub mod range;
pub mod types;

pub use aggregate::{card_dashboard, page_stats, CardSummary, PageStats};
pub use ingest::{ingest_card_events, ingest_magazine_events, IngestReport, MAX_BATCH_SIZE};
pub use range::DateRange;
pub use types::{CardEventType, CreateCardEvent, CreateMagazineEvent, MagazineEventType};
