//! Shared HTTP API types

pub mod types;

pub use types::{ApiResponse, ErrorResponse};
