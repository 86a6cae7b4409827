//! # Glow Common Library
//!
//! Shared code for the Glow platform backend services:
//! - Error taxonomy and result alias
//! - Configuration loading and data folder resolution
//! - Database initialization and schema
//! - API envelope types shared across HTTP surfaces

pub mod api;
pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
