//! Parent type resolution
//!
//! Junction tables whose column convention cannot distinguish a concrete
//! content subtype yield the generic placeholder hint. This module resolves
//! the placeholder to the concrete runtime type by looking the record up in
//! the base-type table. Lookups go through an explicit registry value rather
//! than any runtime reflection.

use carousel_common::config::{
    BASE_TYPE_CLASS_COLUMN, BASE_TYPE_TABLE, PLACEHOLDER_PARENT_CLASS,
};
use carousel_common::db::models::AssociationFact;
use carousel_common::db::schema::SchemaProber;
use carousel_common::Result;
use sqlx::SqlitePool;

/// Maps the placeholder parent type to the table and column holding the
/// concrete runtime type name for records of the common base type
pub struct BaseTypeRegistry {
    pub placeholder: &'static str,
    pub table: &'static str,
    pub class_column: &'static str,
}

/// The one registry entry this schema needs: placeholder `Page` records live
/// in the site-tree base table
pub const PAGE_REGISTRY: BaseTypeRegistry = BaseTypeRegistry {
    placeholder: PLACEHOLDER_PARENT_CLASS,
    table: BASE_TYPE_TABLE,
    class_column: BASE_TYPE_CLASS_COLUMN,
};

impl BaseTypeRegistry {
    /// Look up the concrete type name of a base-type record by ID
    async fn concrete_class(&self, pool: &SqlitePool, id: i64) -> Result<Option<String>> {
        if !SchemaProber::table_exists(pool, self.table).await? {
            return Ok(None);
        }

        let class: Option<String> = sqlx::query_scalar(&format!(
            "SELECT {} FROM {} WHERE ID = ?",
            self.class_column, self.table
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(class.filter(|c| !c.is_empty()))
    }

    /// Resolve a fact's parent class hint.
    ///
    /// Facts with an already-concrete hint pass through without a query.
    /// When the placeholder cannot be resolved (the referenced parent no
    /// longer exists), the placeholder is retained and downstream dedup
    /// operates on it as-is - a known accuracy limitation.
    pub async fn resolve(&self, pool: &SqlitePool, fact: AssociationFact) -> Result<AssociationFact> {
        if fact.parent_class != self.placeholder {
            return Ok(fact);
        }

        match self.concrete_class(pool, fact.parent_id).await? {
            Some(class) => Ok(AssociationFact {
                parent_class: class,
                ..fact
            }),
            None => Ok(fact),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .unwrap();

        sqlx::query("CREATE TABLE SiteTree (ID INTEGER PRIMARY KEY, ClassName TEXT, Title TEXT)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO SiteTree VALUES (5, 'ArticlePage', 'News')")
            .execute(&pool)
            .await
            .unwrap();

        pool
    }

    fn placeholder_fact(parent_id: i64) -> AssociationFact {
        AssociationFact {
            parent_id,
            parent_class: "Page".to_string(),
            slide_id: 9,
            sort_order: 0,
        }
    }

    #[tokio::test]
    async fn test_placeholder_resolves_to_concrete_class() {
        let pool = setup_test_db().await;

        let resolved = PAGE_REGISTRY
            .resolve(&pool, placeholder_fact(5))
            .await
            .unwrap();

        assert_eq!(resolved.parent_class, "ArticlePage");
        assert_eq!(resolved.parent_id, 5);
        assert_eq!(resolved.slide_id, 9);
    }

    #[tokio::test]
    async fn test_missing_parent_retains_placeholder() {
        let pool = setup_test_db().await;

        let resolved = PAGE_REGISTRY
            .resolve(&pool, placeholder_fact(404))
            .await
            .unwrap();

        assert_eq!(resolved.parent_class, "Page");
    }

    #[tokio::test]
    async fn test_concrete_hint_passes_through() {
        let pool = setup_test_db().await;

        let fact = AssociationFact {
            parent_id: 5,
            parent_class: "SilverStripe\\CMS\\Model\\SiteTree".to_string(),
            slide_id: 9,
            sort_order: 0,
        };

        let resolved = PAGE_REGISTRY.resolve(&pool, fact.clone()).await.unwrap();
        assert_eq!(resolved, fact);
    }

    #[tokio::test]
    async fn test_missing_base_table_retains_placeholder() {
        let pool = SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .unwrap();

        let resolved = PAGE_REGISTRY
            .resolve(&pool, placeholder_fact(5))
            .await
            .unwrap();

        assert_eq!(resolved.parent_class, "Page");
    }
}
