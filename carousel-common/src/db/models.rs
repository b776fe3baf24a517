//! Database models

use serde::{Deserialize, Serialize};

/// A single normalized parent-slide association extracted from any legacy
/// source. Transient: produced by the scanners, resolved, then upserted into
/// the canonical join table. Never persisted directly.
///
/// Scanners only emit facts with `parent_id > 0` and `slide_id > 0`; source
/// rows violating that are dropped before a fact is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationFact {
    pub parent_id: i64,
    /// Parent type hint. May be the generic placeholder until resolved.
    pub parent_class: String,
    pub slide_id: i64,
    pub sort_order: i64,
}

/// The unified, deduplicated persisted representation of a parent-slide
/// association. `(parent_id, parent_class, slide_id)` is the natural key:
/// no two rows share it.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CanonicalJoin {
    #[sqlx(rename = "ID")]
    pub id: i64,
    #[sqlx(rename = "ParentID")]
    pub parent_id: i64,
    #[sqlx(rename = "ParentClass")]
    pub parent_class: String,
    #[sqlx(rename = "SlideID")]
    pub slide_id: i64,
    #[sqlx(rename = "SortOrder")]
    pub sort_order: i64,
}
