//! Database models and queries

pub mod init;
pub mod join;
pub mod models;
pub mod schema;

pub use init::*;
pub use join::*;
pub use models::*;
pub use schema::*;
