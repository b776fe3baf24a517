//! HTTP API for the migration service

pub mod health;
pub mod migrate;

pub use health::{health_check, health_routes};
pub use migrate::{analyze_handler, migrate_handler, ApiError};
