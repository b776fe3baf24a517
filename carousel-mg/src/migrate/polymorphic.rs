//! Polymorphic-field scanner
//!
//! The oldest schema stored the parent reference directly on the slide row
//! as a `ParentClass`/`ParentID` pair. This scanner reads slides where that
//! pair is populated and non-zero. Polymorphic storage carried no ordering
//! information, so every emitted fact has sort order 0.

use carousel_common::config::{
    SLIDE_PARENT_CLASS_COLUMN, SLIDE_PARENT_ID_COLUMN, SLIDE_TABLE,
};
use carousel_common::db::models::AssociationFact;
use carousel_common::db::schema::SchemaProber;
use carousel_common::Result;
use sqlx::SqlitePool;

use super::report::Reporter;
use super::ScanOutcome;

/// Scan slide rows carrying the legacy polymorphic parent pair.
///
/// Emits zero facts when either legacy column is absent from the slide
/// table. Rows with an empty class or non-positive ID are filtered at the
/// query, matching the fact invariant.
pub async fn scan_polymorphic_fields(
    pool: &SqlitePool,
    report: &mut Reporter,
) -> Result<ScanOutcome> {
    let has_parent_class =
        SchemaProber::column_exists(pool, SLIDE_TABLE, SLIDE_PARENT_CLASS_COLUMN).await?;
    let has_parent_id =
        SchemaProber::column_exists(pool, SLIDE_TABLE, SLIDE_PARENT_ID_COLUMN).await?;

    if !has_parent_class || !has_parent_id {
        report.line("No polymorphic parent fields found in slides.");
        return Ok(ScanOutcome::default());
    }

    let rows = sqlx::query_as::<_, (i64, String, i64)>(&format!(
        r#"
        SELECT ID, {class}, {parent}
        FROM {table}
        WHERE {class} IS NOT NULL
          AND {class} != ''
          AND {parent} > 0
        "#,
        class = SLIDE_PARENT_CLASS_COLUMN,
        parent = SLIDE_PARENT_ID_COLUMN,
        table = SLIDE_TABLE,
    ))
    .fetch_all(pool)
    .await?;

    let facts = rows
        .into_iter()
        .map(|(slide_id, parent_class, parent_id)| AssociationFact {
            parent_id,
            parent_class,
            slide_id,
            sort_order: 0,
        })
        .collect();

    Ok(ScanOutcome { facts, skipped: 0 })
}
