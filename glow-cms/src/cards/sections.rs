//! Section-mapping sync between card configurations
//!
//! A card has a primary "sections" configuration and a condensed-card
//! view with its own content entries. Adding a section must materialize
//! a matching condensed entry, but manual customization of existing
//! entries is never overwritten. The projection is one-way and
//! idempotent, and performs no I/O.

use serde::{Deserialize, Serialize};

/// One section of the primary card configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SectionConfig {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// One content entry of the condensed-card configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CondensedEntry {
    /// Section this entry corresponds to
    pub section_id: String,
    pub position: i64,
    #[serde(default)]
    pub hidden: bool,
}

/// Entries that must be added so every section has a condensed
/// counterpart. Existing entries are left alone; new entries are
/// appended after the current maximum position, in section order.
pub fn sync_sections(
    sections: &[SectionConfig],
    existing: &[CondensedEntry],
) -> Vec<CondensedEntry> {
    let mut next_position = existing
        .iter()
        .map(|e| e.position.saturating_add(1))
        .max()
        .unwrap_or(0);

    let mut added = Vec::new();
    for section in sections {
        let covered = existing.iter().any(|e| e.section_id == section.id)
            || added
                .iter()
                .any(|e: &CondensedEntry| e.section_id == section.id);
        if covered {
            continue;
        }

        added.push(CondensedEntry {
            section_id: section.id.clone(),
            position: next_position,
            hidden: false,
        });
        next_position = next_position.saturating_add(1);
    }

    added
}

/// Merged condensed-entry list: existing entries untouched, synthesized
/// entries appended
pub fn apply_sync(sections: &[SectionConfig], existing: &[CondensedEntry]) -> Vec<CondensedEntry> {
    let mut merged = existing.to_vec();
    merged.extend(sync_sections(sections, existing));
    merged
}
