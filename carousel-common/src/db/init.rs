//! Database initialization
//!
//! Opens (or creates) the SQLite database and ensures the canonical join
//! table exists. Creation is idempotent (CREATE TABLE IF NOT EXISTS), safe
//! to call on every startup.

use crate::config::CANONICAL_JOIN_TABLE;
use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create the canonical join table if
/// needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new().connect(&db_url).await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // Set busy timeout
    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    create_canonical_join_table(&pool).await?;

    Ok(pool)
}

/// Create the canonical join table (idempotent)
pub async fn create_canonical_join_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            ID INTEGER PRIMARY KEY AUTOINCREMENT,
            ParentID INTEGER NOT NULL,
            ParentClass TEXT NOT NULL,
            SlideID INTEGER NOT NULL,
            SortOrder INTEGER NOT NULL DEFAULT 0
        )
        "#,
        CANONICAL_JOIN_TABLE
    ))
    .execute(pool)
    .await?;

    Ok(())
}
