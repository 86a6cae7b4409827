//! Database access layer shared by Glow services
//!
//! SQLite is used as a transactional document store: each row is written
//! atomically, and multi-row replace operations run inside a single
//! transaction so readers never observe a partial set.

mod init;
mod schema;

pub use init::{connect_memory, init_database};
pub use schema::create_schema;
