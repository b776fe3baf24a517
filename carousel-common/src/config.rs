//! Legacy schema constants and database path resolution
//!
//! The legacy table and column names below are a fixed, known set carried
//! over from the historical schema versions of the carousel module. They are
//! configuration constants, never discovered dynamically.

use crate::{Error, Result};
use std::path::PathBuf;

/// The slide table shared by every historical schema version.
pub const SLIDE_TABLE: &str = "Dynamic_Slide";

/// Legacy polymorphic parent-reference columns on the slide table.
pub const SLIDE_PARENT_CLASS_COLUMN: &str = "ParentClass";
pub const SLIDE_PARENT_ID_COLUMN: &str = "ParentID";

/// Candidate legacy junction tables, in scan priority order.
///
/// Each historical schema version generated a differently named implicit
/// junction table; any subset of these may be present in a given database.
pub const LEGACY_JUNCTION_TABLES: [&str; 3] = [
    "Dynamic_CarouselPageExtension_Slides",
    "Page_Slides",
    "SiteTree_Slides",
];

/// Generic placeholder parent type, used when a junction table's column
/// convention cannot identify the concrete content subtype.
pub const PLACEHOLDER_PARENT_CLASS: &str = "Page";

/// Base-type table used to resolve the placeholder to a concrete type.
pub const BASE_TYPE_TABLE: &str = "SiteTree";

/// Column on the base-type table holding the concrete runtime type name.
pub const BASE_TYPE_CLASS_COLUMN: &str = "ClassName";

/// Canonical join table written by the migration.
pub const CANONICAL_JOIN_TABLE: &str = "Dynamic_CarouselSlideJoin";

/// Environment variable overriding the database path.
pub const DB_ENV_VAR: &str = "CAROUSEL_DB";

/// Resolve the database path following the priority order:
/// 1. Command-line argument (highest priority)
/// 2. `CAROUSEL_DB` environment variable
/// 3. TOML config file (`database` key)
/// 4. OS-dependent default data directory (fallback)
pub fn resolve_database_path(cli_arg: Option<&str>) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(DB_ENV_VAR) {
        return PathBuf::from(path);
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = config_file_path() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(database) = config.get("database").and_then(|v| v.as_str()) {
                    return PathBuf::from(database);
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    default_database_path()
}

/// Get the configuration file path for the platform
fn config_file_path() -> Result<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("carousel").join("config.toml"));

    if let Some(path) = user_config {
        if path.exists() {
            return Ok(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/carousel/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::Config("No config file found".to_string()))
}

/// OS-dependent default database path
fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("carousel").join("carousel.db"))
        .unwrap_or_else(|| PathBuf::from("./carousel.db"))
}
