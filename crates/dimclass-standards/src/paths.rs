//! Vocabulary directory path resolution.

use std::path::PathBuf;

/// Environment variable for overriding the vocabulary directory.
pub const STANDARDS_ENV_VAR: &str = "DIMCLASS_STANDARDS_DIR";

/// File name of the unit-of-measure table.
pub const UNITS_FILE: &str = "units.csv";

/// File name of the county name list.
pub const COUNTIES_FILE: &str = "counties.csv";

/// File name of the foreign country name list.
pub const COUNTRIES_FILE: &str = "countries.csv";

/// Get the vocabulary directory set through `DIMCLASS_STANDARDS_DIR`, if any.
///
/// When unset, the tables compiled into the binary are used.
pub fn standards_dir_override() -> Option<PathBuf> {
    std::env::var_os(STANDARDS_ENV_VAR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Workspace `standards/` directory (source of the embedded tables).
pub fn workspace_standards_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../standards")
}
