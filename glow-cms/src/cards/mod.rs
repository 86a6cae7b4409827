//! Digital-card configuration logic

pub mod sections;

pub use sections::{apply_sync, sync_sections, CondensedEntry, SectionConfig};
