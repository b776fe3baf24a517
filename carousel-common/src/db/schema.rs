//! Schema probing
//!
//! Read-only introspection of the SQLite schema via `sqlite_master` and
//! `pragma_table_info`. Every migration step is gated on these probes so the
//! engine degrades to a no-op when no legacy structure is present.

use crate::Result;
use sqlx::SqlitePool;

/// Schema prober - answers "does table T exist?" / "does table T have
/// column C?" without side effects. Never errors for non-existent tables.
pub struct SchemaProber;

impl SchemaProber {
    /// Check if a table exists
    pub async fn table_exists(pool: &SqlitePool, table_name: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM sqlite_master
                WHERE type='table' AND name = ?
            )
            "#,
        )
        .bind(table_name)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Check if a column exists on a table
    ///
    /// `pragma_table_info` returns zero rows for a missing table, so this
    /// answers false rather than erroring when the table is absent.
    pub async fn column_exists(pool: &SqlitePool, table_name: &str, column: &str) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM pragma_table_info(?) WHERE name = ?")
                .bind(table_name)
                .bind(column)
                .fetch_one(pool)
                .await?;

        Ok(count > 0)
    }
}
