//! Canonical join queries
//!
//! The canonical join table is the only table this tooling writes. Rows are
//! created once and never mutated or deleted here; `SortOrder` is fixed at
//! creation and not merged across re-runs.

use crate::config::CANONICAL_JOIN_TABLE;
use crate::db::models::{AssociationFact, CanonicalJoin};
use crate::Result;
use sqlx::SqlitePool;

/// Find an existing canonical join by its natural key
pub async fn find_by_triple(
    pool: &SqlitePool,
    parent_id: i64,
    parent_class: &str,
    slide_id: i64,
) -> Result<Option<CanonicalJoin>> {
    let join = sqlx::query_as::<_, CanonicalJoin>(&format!(
        r#"
        SELECT ID, ParentID, ParentClass, SlideID, SortOrder
        FROM {}
        WHERE ParentID = ? AND ParentClass = ? AND SlideID = ?
        "#,
        CANONICAL_JOIN_TABLE
    ))
    .bind(parent_id)
    .bind(parent_class)
    .bind(slide_id)
    .fetch_optional(pool)
    .await?;

    Ok(join)
}

/// Insert a new canonical join row, returning its row id
pub async fn insert(pool: &SqlitePool, fact: &AssociationFact) -> Result<i64> {
    let result = sqlx::query(&format!(
        "INSERT INTO {} (ParentID, ParentClass, SlideID, SortOrder) VALUES (?, ?, ?, ?)",
        CANONICAL_JOIN_TABLE
    ))
    .bind(fact.parent_id)
    .bind(&fact.parent_class)
    .bind(fact.slide_id)
    .bind(fact.sort_order)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Insert the fact's triple unless a row with the same natural key already
/// exists. Returns true when a row was created.
///
/// Check-then-insert is not atomic; the migration assumes a single runner.
/// Two concurrent runners can race this check and create duplicate triples.
pub async fn upsert(pool: &SqlitePool, fact: &AssociationFact) -> Result<bool> {
    if find_by_triple(pool, fact.parent_id, &fact.parent_class, fact.slide_id)
        .await?
        .is_some()
    {
        return Ok(false);
    }

    insert(pool, fact).await?;
    Ok(true)
}

/// Total number of canonical join rows
pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", CANONICAL_JOIN_TABLE))
        .fetch_one(pool)
        .await?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init::create_canonical_join_table;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .unwrap();
        create_canonical_join_table(&pool).await.unwrap();
        pool
    }

    fn fact(parent_id: i64, parent_class: &str, slide_id: i64, sort_order: i64) -> AssociationFact {
        AssociationFact {
            parent_id,
            parent_class: parent_class.to_string(),
            slide_id,
            sort_order,
        }
    }

    #[tokio::test]
    async fn test_upsert_creates_then_skips() {
        let pool = setup_test_db().await;

        let f = fact(5, "ArticlePage", 9, 2);
        assert!(upsert(&pool, &f).await.unwrap());
        assert!(!upsert(&pool, &f).await.unwrap());

        assert_eq!(count(&pool).await.unwrap(), 1);

        let existing = find_by_triple(&pool, 5, "ArticlePage", 9)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(existing.sort_order, 2);
    }

    #[tokio::test]
    async fn test_upsert_distinguishes_parent_class() {
        let pool = setup_test_db().await;

        // Same parent/slide ids under different parent classes are distinct
        // associations
        assert!(upsert(&pool, &fact(5, "ArticlePage", 9, 0)).await.unwrap());
        assert!(upsert(&pool, &fact(5, "HomePage", 9, 0)).await.unwrap());

        assert_eq!(count(&pool).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_sort_order_not_merged_on_rerun() {
        let pool = setup_test_db().await;

        assert!(upsert(&pool, &fact(1, "Page", 2, 7)).await.unwrap());
        // Re-run with a different sort order: existing row wins
        assert!(!upsert(&pool, &fact(1, "Page", 2, 99)).await.unwrap());

        let existing = find_by_triple(&pool, 1, "Page", 2).await.unwrap().unwrap();
        assert_eq!(existing.sort_order, 7);
    }

    #[tokio::test]
    async fn test_find_by_triple_missing() {
        let pool = setup_test_db().await;
        assert!(find_by_triple(&pool, 1, "Page", 2).await.unwrap().is_none());
    }
}
