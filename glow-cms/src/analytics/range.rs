//! Date-range token resolution
//!
//! Dashboard queries carry a semantic token (`7d`, `30d`, `90d`, `all`)
//! that is resolved to a concrete interval at query time.

use chrono::{DateTime, Duration, Utc};

/// Semantic date-range token.
///
/// Resolution covers `[now - N days, now]`: the resolving millisecond
/// itself is included, so events ingested in the same instant as the
/// dashboard read still count. Callers compare with `occurred_at < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRange {
    SevenDays,
    ThirtyDays,
    NinetyDays,
    All,
}

impl DateRange {
    /// Default applied when a query omits or mangles the token
    pub const DEFAULT: DateRange = DateRange::ThirtyDays;

    /// Parse a token, falling back to the 30-day default for anything
    /// unrecognized. Unknown tokens are not an error.
    pub fn parse(token: &str) -> Self {
        match token {
            "7d" => DateRange::SevenDays,
            "30d" => DateRange::ThirtyDays,
            "90d" => DateRange::NinetyDays,
            "all" => DateRange::All,
            _ => DateRange::DEFAULT,
        }
    }

    /// Resolve to `(start_ms, end_ms)` epoch-millisecond bounds at `now`.
    ///
    /// `end_ms` is exclusive and sits one millisecond past `now`, so an
    /// event stamped exactly at `now` falls inside the interval.
    /// `None` start means unbounded (`all`).
    pub fn resolve(self, now: DateTime<Utc>) -> (Option<i64>, i64) {
        let end = now.timestamp_millis() + 1;
        let start = match self {
            DateRange::SevenDays => Some(now - Duration::days(7)),
            DateRange::ThirtyDays => Some(now - Duration::days(30)),
            DateRange::NinetyDays => Some(now - Duration::days(90)),
            DateRange::All => None,
        };
        (start.map(|s| s.timestamp_millis()), end)
    }
}
