//! Table schema definitions
//!
//! All statements are idempotent (CREATE TABLE IF NOT EXISTS) so schema
//! application is safe on every startup.

use crate::Result;
use sqlx::SqlitePool;

/// Create all tables and indexes if they do not exist
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_digital_layouts_table(pool).await?;
    create_card_events_table(pool).await?;
    create_magazine_events_table(pool).await?;
    Ok(())
}

/// Digital layout documents, scoped by magazine issue.
///
/// `objects` holds the layout-object payload as a JSON array; `position`
/// preserves submission order within an issue.
async fn create_digital_layouts_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS digital_layouts (
            id TEXT PRIMARY KEY NOT NULL,
            issue_id TEXT NOT NULL,
            position INTEGER NOT NULL,
            template TEXT NOT NULL,
            objects TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_digital_layouts_issue ON digital_layouts(issue_id, position)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Append-only card engagement events. Rows are never updated or deleted
/// by the application.
async fn create_card_events_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS card_events (
            id TEXT PRIMARY KEY NOT NULL,
            card_id TEXT NOT NULL,
            event_type TEXT NOT NULL,
            occurred_at INTEGER NOT NULL,
            referrer TEXT,
            duration_ms INTEGER,
            recorded_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_card_events_card ON card_events(card_id, occurred_at)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Append-only magazine engagement events, keyed by issue and page.
async fn create_magazine_events_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS magazine_events (
            id TEXT PRIMARY KEY NOT NULL,
            issue_id TEXT NOT NULL,
            page_id TEXT NOT NULL,
            event_type TEXT NOT NULL,
            occurred_at INTEGER NOT NULL,
            duration_ms INTEGER,
            recorded_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_magazine_events_issue ON magazine_events(issue_id, occurred_at)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
