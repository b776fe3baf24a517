//! # Carousel Common Library
//!
//! Shared code for the carousel slide migration tooling:
//! - Error types
//! - Legacy schema constants and database path resolution
//! - Database access layer (pool init, schema probing, canonical join queries)

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
