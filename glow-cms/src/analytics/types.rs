//! Analytics event types
//!
//! Wire structs keep `event_type` as a plain string so a single bad
//! event never fails deserialization of the whole batch; per-item
//! validation happens in the ingestor.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Event kinds recorded against a professional's digital card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardEventType {
    View,
    Share,
    LinkClick,
    SaveContact,
}

impl CardEventType {
    /// Column encoding, also the wire spelling
    pub fn as_str(self) -> &'static str {
        match self {
            CardEventType::View => "view",
            CardEventType::Share => "share",
            CardEventType::LinkClick => "linkClick",
            CardEventType::SaveContact => "saveContact",
        }
    }

    /// Parse the wire/column spelling; `None` for unknown kinds
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "view" => Some(CardEventType::View),
            "share" => Some(CardEventType::Share),
            "linkClick" => Some(CardEventType::LinkClick),
            "saveContact" => Some(CardEventType::SaveContact),
            _ => None,
        }
    }
}

/// Event kinds recorded against a magazine issue page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MagazineEventType {
    PageView,
    LinkClick,
    Share,
}

impl MagazineEventType {
    pub fn as_str(self) -> &'static str {
        match self {
            MagazineEventType::PageView => "pageView",
            MagazineEventType::LinkClick => "linkClick",
            MagazineEventType::Share => "share",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pageView" => Some(MagazineEventType::PageView),
            "linkClick" => Some(MagazineEventType::LinkClick),
            "share" => Some(MagazineEventType::Share),
            _ => None,
        }
    }
}

/// Client-submitted card event, prior to validation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCardEvent {
    #[serde(default)]
    pub card_id: String,
    #[serde(default)]
    pub event_type: String,
    #[serde(default)]
    pub occurred_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub referrer: Option<String>,
    #[serde(default)]
    pub duration_ms: Option<i64>,
}

/// Client-submitted magazine event, prior to validation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMagazineEvent {
    #[serde(default)]
    pub issue_id: String,
    #[serde(default)]
    pub page_id: String,
    #[serde(default)]
    pub event_type: String,
    #[serde(default)]
    pub occurred_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_ms: Option<i64>,
}
