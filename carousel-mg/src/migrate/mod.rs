//! Carousel slide relationship migration engine
//!
//! Consolidates the legacy representations of the parent-slide association
//! (polymorphic fields on the slide row, historical junction tables) into
//! the canonical join table, without creating duplicate triples. Safe to
//! re-run any number of times: every write is gated on a natural-key lookup.
//!
//! There is no transaction around the run. A storage failure mid-run leaves
//! the rows written so far in place; re-running converges to the same final
//! state because duplicates are never created.

use carousel_common::config::{
    LEGACY_JUNCTION_TABLES, SLIDE_PARENT_CLASS_COLUMN, SLIDE_PARENT_ID_COLUMN, SLIDE_TABLE,
};
use carousel_common::db::models::AssociationFact;
use carousel_common::db::schema::SchemaProber;
use carousel_common::db::{create_canonical_join_table, join};
use carousel_common::Result;
use sqlx::SqlitePool;

pub mod junction;
pub mod polymorphic;
pub mod report;
pub mod resolver;

use report::Reporter;
use resolver::PAGE_REGISTRY;

/// Facts extracted by one scanner, plus the rows it could not resolve
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub facts: Vec<AssociationFact>,
    pub skipped: u64,
}

/// Final counters for one migration run
#[derive(Debug, Default, PartialEq, Eq)]
pub struct MigrationOutcome {
    /// Legacy structure was present and the scanners ran
    pub legacy_structure_found: bool,
    /// Joins created from junction-table rows
    pub junction_migrated: u64,
    /// Joins created from polymorphic slide fields
    pub polymorphic_migrated: u64,
    /// Source rows dropped because no known column shape matched
    pub skipped_unresolved: u64,
}

impl MigrationOutcome {
    pub fn total_migrated(&self) -> u64 {
        self.junction_migrated + self.polymorphic_migrated
    }
}

/// Run the full migration once.
///
/// Probes the schema first and degrades to a no-op when no legacy shape is
/// present. Otherwise scans both legacy sources, resolves placeholder parent
/// types, and upserts every fact into the canonical join table.
pub async fn run_migration(pool: &SqlitePool, report: &mut Reporter) -> Result<MigrationOutcome> {
    report.line("Starting migration of carousel slides to the canonical join structure...");

    report.line("Step 1: Checking for existing data structure...");
    if !legacy_structure_exists(pool, report).await? {
        report.line("No old structure found or migration already completed. Nothing to migrate.");
        return Ok(MigrationOutcome::default());
    }

    // The join table may not exist yet on databases that never ran the
    // modern schema build
    create_canonical_join_table(pool).await?;

    let mut outcome = MigrationOutcome {
        legacy_structure_found: true,
        ..MigrationOutcome::default()
    };

    report.line("Step 2: Migrating junction table relationships...");
    let junction_scan = junction::scan_junction_tables(pool, report).await?;
    outcome.skipped_unresolved = junction_scan.skipped;

    for fact in junction_scan.facts {
        let fact = PAGE_REGISTRY.resolve(pool, fact).await?;
        if join::upsert(pool, &fact).await? {
            outcome.junction_migrated += 1;
            report.line(format!(
                "  Migrated: Parent {}#{} -> Slide#{}",
                fact.parent_class, fact.parent_id, fact.slide_id
            ));
        }
    }

    report.line("Step 3: Migrating slides with polymorphic parent fields...");
    let polymorphic_scan = polymorphic::scan_polymorphic_fields(pool, report).await?;

    for fact in polymorphic_scan.facts {
        if join::upsert(pool, &fact).await? {
            outcome.polymorphic_migrated += 1;
            report.line(format!(
                "  Migrated: Parent {}#{} -> Slide#{}",
                fact.parent_class, fact.parent_id, fact.slide_id
            ));
        }
    }

    report.line("Step 4: Migration completed successfully!");
    report.line(format!(
        "Migrated {} relationships from legacy junction tables",
        outcome.junction_migrated
    ));
    report.line(format!(
        "Migrated {} relationships from polymorphic parent fields",
        outcome.polymorphic_migrated
    ));
    if outcome.skipped_unresolved > 0 {
        report.line(format!(
            "Skipped {} junction rows with no resolvable parent or slide reference",
            outcome.skipped_unresolved
        ));
    }
    report.line(format!(
        "Total relationships migrated: {}",
        outcome.total_migrated()
    ));

    if outcome.total_migrated() > 0 {
        report.blank();
        report.line("Optional cleanup (run manually if desired):");
        report.line(format!(
            "- Remove {} and {} columns from {}",
            SLIDE_PARENT_CLASS_COLUMN, SLIDE_PARENT_ID_COLUMN, SLIDE_TABLE
        ));
        report.line("- Drop legacy junction tables if they exist");
    }

    Ok(outcome)
}

/// Check whether any legacy shape is present.
///
/// Requires the slide table itself to exist; without it there is nothing
/// the junction rows could refer to.
async fn legacy_structure_exists(pool: &SqlitePool, report: &mut Reporter) -> Result<bool> {
    if !SchemaProber::table_exists(pool, SLIDE_TABLE).await? {
        return Ok(false);
    }

    let has_parent_class =
        SchemaProber::column_exists(pool, SLIDE_TABLE, SLIDE_PARENT_CLASS_COLUMN).await?;
    let has_parent_id =
        SchemaProber::column_exists(pool, SLIDE_TABLE, SLIDE_PARENT_ID_COLUMN).await?;

    let mut has_junction_table = false;
    for table_name in LEGACY_JUNCTION_TABLES {
        if SchemaProber::table_exists(pool, table_name).await? {
            report.line(format!("Found legacy junction table: {}", table_name));
            has_junction_table = true;
            break;
        }
    }

    Ok(has_parent_class || has_parent_id || has_junction_table)
}

/// Per-table existence and row count from the analysis pass
#[derive(Debug, PartialEq, Eq)]
pub struct JunctionTableStatus {
    pub table: &'static str,
    /// None when the table does not exist
    pub row_count: Option<i64>,
}

/// Read-only findings about the legacy data still in the database
#[derive(Debug, Default)]
pub struct AnalysisOutcome {
    pub slide_table_exists: bool,
    pub has_parent_class: bool,
    pub has_parent_id: bool,
    pub total_slides: i64,
    pub slides_with_legacy_parent: i64,
    pub junction_tables: Vec<JunctionTableStatus>,
}

/// Inspect the legacy structures without writing anything.
///
/// Reports which legacy columns and junction tables are present and how
/// much data they still hold, so an operator can judge whether the
/// migration is needed and whether manual cleanup is safe.
pub async fn run_analysis(pool: &SqlitePool, report: &mut Reporter) -> Result<AnalysisOutcome> {
    report.line("Analyzing carousel slide data...");

    let mut outcome = AnalysisOutcome::default();

    outcome.slide_table_exists = SchemaProber::table_exists(pool, SLIDE_TABLE).await?;
    if !outcome.slide_table_exists {
        report.line(format!("{} table does not exist.", SLIDE_TABLE));
        return Ok(outcome);
    }

    outcome.has_parent_class =
        SchemaProber::column_exists(pool, SLIDE_TABLE, SLIDE_PARENT_CLASS_COLUMN).await?;
    outcome.has_parent_id =
        SchemaProber::column_exists(pool, SLIDE_TABLE, SLIDE_PARENT_ID_COLUMN).await?;

    if outcome.has_parent_class {
        report.line(format!(
            "Found {} field in {} table.",
            SLIDE_PARENT_CLASS_COLUMN, SLIDE_TABLE
        ));
    }
    if outcome.has_parent_id {
        report.line(format!(
            "Found {} field in {} table.",
            SLIDE_PARENT_ID_COLUMN, SLIDE_TABLE
        ));
    }

    outcome.total_slides = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", SLIDE_TABLE))
        .fetch_one(pool)
        .await?;
    report.line(format!("Total slides in database: {}", outcome.total_slides));

    if outcome.has_parent_class && outcome.has_parent_id {
        outcome.slides_with_legacy_parent = sqlx::query_scalar(&format!(
            r#"
            SELECT COUNT(*)
            FROM {table}
            WHERE {class} IS NOT NULL
              AND {class} != ''
              AND {parent} > 0
            "#,
            table = SLIDE_TABLE,
            class = SLIDE_PARENT_CLASS_COLUMN,
            parent = SLIDE_PARENT_ID_COLUMN,
        ))
        .fetch_one(pool)
        .await?;

        report.line(format!(
            "Slides with legacy polymorphic parent data: {}",
            outcome.slides_with_legacy_parent
        ));
    }

    report.blank();
    report.line("Checking for legacy junction tables:");

    for table_name in LEGACY_JUNCTION_TABLES {
        if SchemaProber::table_exists(pool, table_name).await? {
            let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table_name))
                .fetch_one(pool)
                .await?;
            report.line(format!("  + {}: {} relationships", table_name, count));
            outcome.junction_tables.push(JunctionTableStatus {
                table: table_name,
                row_count: Some(count),
            });
        } else {
            report.line(format!("  - {}: not found", table_name));
            outcome.junction_tables.push(JunctionTableStatus {
                table: table_name,
                row_count: None,
            });
        }
    }

    Ok(outcome)
}
