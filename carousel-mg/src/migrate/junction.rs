//! Implicit-junction scanner
//!
//! Historical schema versions created differently named junction tables with
//! differently named reference columns. This scanner reads every candidate
//! table that exists and normalizes each row into an `AssociationFact`
//! through a fixed priority list of column adapters.
//!
//! Extraction is lossy by design: a row whose columns match no known variant
//! (or whose resolved IDs are zero) is skipped and counted, never an error.

use carousel_common::config::{LEGACY_JUNCTION_TABLES, PLACEHOLDER_PARENT_CLASS};
use carousel_common::db::models::AssociationFact;
use carousel_common::db::schema::SchemaProber;
use carousel_common::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::report::Reporter;
use super::ScanOutcome;

/// Maps one recognized parent-reference column to the parent class hint its
/// naming convention implies
struct ParentColumnAdapter {
    column: &'static str,
    class_hint: &'static str,
}

/// Recognized parent-ID column variants, in match priority order.
///
/// `PageID` and the extension-owner column cannot identify the concrete
/// content subtype, so they yield the generic placeholder; `SiteTreeID`
/// carries the base class name directly.
const PARENT_COLUMN_ADAPTERS: [ParentColumnAdapter; 3] = [
    ParentColumnAdapter {
        column: "PageID",
        class_hint: PLACEHOLDER_PARENT_CLASS,
    },
    ParentColumnAdapter {
        column: "SiteTreeID",
        class_hint: "SilverStripe\\CMS\\Model\\SiteTree",
    },
    ParentColumnAdapter {
        column: "Dynamic_CarouselPageExtensionID",
        class_hint: PLACEHOLDER_PARENT_CLASS,
    },
];

/// Recognized slide-ID column variants, in match priority order
const SLIDE_COLUMNS: [&str; 2] = ["Dynamic_SlideID", "SlideID"];

/// Recognized sort-order column; absent means unordered legacy data
const SORT_ORDER_COLUMN: &str = "SortOrder";

/// Read an integer column by name, treating both an absent column and a
/// NULL value as "not present in this row shape"
fn column_i64(row: &SqliteRow, name: &str) -> Option<i64> {
    match row.try_get::<Option<i64>, _>(name) {
        Ok(value) => value,
        Err(_) => None,
    }
}

/// Normalize one junction row into an association fact, if possible.
///
/// The first parent variant present (non-NULL) in the row decides both the
/// parent ID and the class hint; NULL values fall through to the next
/// variant. Returns None when no variant matched or an ID is not positive.
fn adapt_row(row: &SqliteRow) -> Option<AssociationFact> {
    let (parent_id, class_hint) = PARENT_COLUMN_ADAPTERS.iter().find_map(|adapter| {
        column_i64(row, adapter.column).map(|id| (id, adapter.class_hint))
    })?;

    let slide_id = SLIDE_COLUMNS
        .iter()
        .find_map(|column| column_i64(row, column))?;

    if parent_id <= 0 || slide_id <= 0 {
        return None;
    }

    let sort_order = column_i64(row, SORT_ORDER_COLUMN).unwrap_or(0);

    Some(AssociationFact {
        parent_id,
        parent_class: class_hint.to_string(),
        slide_id,
        sort_order,
    })
}

/// Scan every candidate junction table that exists and emit one fact per
/// resolvable row. Reads only; source tables are never modified.
pub async fn scan_junction_tables(pool: &SqlitePool, report: &mut Reporter) -> Result<ScanOutcome> {
    let mut outcome = ScanOutcome::default();

    for table_name in LEGACY_JUNCTION_TABLES {
        if !SchemaProber::table_exists(pool, table_name).await? {
            continue;
        }

        report.line(format!("Migrating from table: {}", table_name));

        let rows = sqlx::query(&format!("SELECT * FROM {}", table_name))
            .fetch_all(pool)
            .await?;

        for row in &rows {
            match adapt_row(row) {
                Some(fact) => outcome.facts.push(fact),
                None => outcome.skipped += 1,
            }
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrate::report::OutputMode;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_db() -> SqlitePool {
        SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_page_slides_shape() {
        let pool = setup_test_db().await;

        sqlx::query("CREATE TABLE Page_Slides (PageID INTEGER, Dynamic_SlideID INTEGER, SortOrder INTEGER)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO Page_Slides VALUES (5, 9, 2)")
            .execute(&pool)
            .await
            .unwrap();

        let mut report = Reporter::new(OutputMode::Http);
        let outcome = scan_junction_tables(&pool, &mut report).await.unwrap();

        assert_eq!(outcome.skipped, 0);
        assert_eq!(
            outcome.facts,
            vec![AssociationFact {
                parent_id: 5,
                parent_class: "Page".to_string(),
                slide_id: 9,
                sort_order: 2,
            }]
        );
    }

    #[tokio::test]
    async fn test_sitetree_slides_shape_yields_concrete_hint() {
        let pool = setup_test_db().await;

        sqlx::query("CREATE TABLE SiteTree_Slides (SiteTreeID INTEGER, SlideID INTEGER)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO SiteTree_Slides VALUES (3, 4)")
            .execute(&pool)
            .await
            .unwrap();

        let mut report = Reporter::new(OutputMode::Http);
        let outcome = scan_junction_tables(&pool, &mut report).await.unwrap();

        assert_eq!(outcome.facts.len(), 1);
        assert_eq!(
            outcome.facts[0].parent_class,
            "SilverStripe\\CMS\\Model\\SiteTree"
        );
        // No SortOrder column in this shape: legacy data carried no ordering
        assert_eq!(outcome.facts[0].sort_order, 0);
    }

    #[tokio::test]
    async fn test_extension_owner_shape() {
        let pool = setup_test_db().await;

        sqlx::query(
            "CREATE TABLE Dynamic_CarouselPageExtension_Slides \
             (Dynamic_CarouselPageExtensionID INTEGER, Dynamic_SlideID INTEGER, SortOrder INTEGER)",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO Dynamic_CarouselPageExtension_Slides VALUES (11, 12, 1)")
            .execute(&pool)
            .await
            .unwrap();

        let mut report = Reporter::new(OutputMode::Http);
        let outcome = scan_junction_tables(&pool, &mut report).await.unwrap();

        assert_eq!(outcome.facts.len(), 1);
        assert_eq!(outcome.facts[0].parent_id, 11);
        assert_eq!(outcome.facts[0].parent_class, "Page");
    }

    #[tokio::test]
    async fn test_unresolvable_rows_are_skipped_and_counted() {
        let pool = setup_test_db().await;

        sqlx::query("CREATE TABLE Page_Slides (PageID INTEGER, Dynamic_SlideID INTEGER, SortOrder INTEGER)")
            .execute(&pool)
            .await
            .unwrap();
        // Zero sentinel parent, NULL slide, and one good row
        sqlx::query("INSERT INTO Page_Slides VALUES (0, 9, 1)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO Page_Slides VALUES (5, NULL, 1)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO Page_Slides VALUES (5, 9, 1)")
            .execute(&pool)
            .await
            .unwrap();

        let mut report = Reporter::new(OutputMode::Http);
        let outcome = scan_junction_tables(&pool, &mut report).await.unwrap();

        assert_eq!(outcome.facts.len(), 1);
        assert_eq!(outcome.skipped, 2);
    }

    #[tokio::test]
    async fn test_null_parent_variant_falls_through() {
        let pool = setup_test_db().await;

        // Both PageID and SiteTreeID present; PageID is NULL so the
        // SiteTreeID variant should win for that row
        sqlx::query(
            "CREATE TABLE Page_Slides (PageID INTEGER, SiteTreeID INTEGER, SlideID INTEGER)",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO Page_Slides VALUES (NULL, 8, 2)")
            .execute(&pool)
            .await
            .unwrap();

        let mut report = Reporter::new(OutputMode::Http);
        let outcome = scan_junction_tables(&pool, &mut report).await.unwrap();

        assert_eq!(outcome.facts.len(), 1);
        assert_eq!(outcome.facts[0].parent_id, 8);
        assert_eq!(
            outcome.facts[0].parent_class,
            "SilverStripe\\CMS\\Model\\SiteTree"
        );
    }

    #[tokio::test]
    async fn test_no_candidate_tables_yields_nothing() {
        let pool = setup_test_db().await;

        let mut report = Reporter::new(OutputMode::Http);
        let outcome = scan_junction_tables(&pool, &mut report).await.unwrap();

        assert!(outcome.facts.is_empty());
        assert_eq!(outcome.skipped, 0);
    }
}
