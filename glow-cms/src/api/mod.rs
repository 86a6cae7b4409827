//! HTTP API handlers for glow-cms

pub mod analytics;
pub mod cards;
pub mod health;
pub mod layouts;

pub use analytics::{card_dashboard, ingest_card_events, ingest_magazine_events, magazine_page_stats};
pub use cards::condensed_sync;
pub use health::health_routes;
pub use layouts::{batch_upload_layouts, create_layout, list_layouts};
