//! The full set of data tables used by the parsers.

use std::collections::BTreeSet;
use std::path::Path;

use crate::error::StandardsError;
use crate::hash::sha256_hex;
use crate::names::parse_name_list;
use crate::paths::{COUNTIES_FILE, COUNTRIES_FILE, UNITS_FILE, standards_dir_override};
use crate::units::{UnitTable, parse_unit_table};
use crate::csv_utils::read_file;

const EMBEDDED_UNITS: &str = include_str!("../../../standards/units.csv");
const EMBEDDED_COUNTIES: &str = include_str!("../../../standards/counties.csv");
const EMBEDDED_COUNTRIES: &str = include_str!("../../../standards/countries.csv");

/// Checksum of one table that went into a [`Vocabulary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSource {
    /// File name or path the table was read from.
    pub name: String,
    pub sha256: String,
}

/// Unit table plus county and country name lists.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    pub units: UnitTable,
    pub counties: BTreeSet<String>,
    pub countries: BTreeSet<String>,
    sources: Vec<TableSource>,
}

impl Vocabulary {
    /// Tables compiled into the binary from the workspace `standards/` directory.
    pub fn embedded() -> Result<Self, StandardsError> {
        Self::from_sources(
            (Path::new(UNITS_FILE), EMBEDDED_UNITS.as_bytes()),
            (Path::new(COUNTIES_FILE), EMBEDDED_COUNTIES.as_bytes()),
            (Path::new(COUNTRIES_FILE), EMBEDDED_COUNTRIES.as_bytes()),
        )
    }

    /// Loads the three tables from a directory.
    pub fn load_dir(dir: &Path) -> Result<Self, StandardsError> {
        let units_path = dir.join(UNITS_FILE);
        let counties_path = dir.join(COUNTIES_FILE);
        let countries_path = dir.join(COUNTRIES_FILE);
        let units = read_file(&units_path)?;
        let counties = read_file(&counties_path)?;
        let countries = read_file(&countries_path)?;
        Self::from_sources(
            (&units_path, &units),
            (&counties_path, &counties),
            (&countries_path, &countries),
        )
    }

    /// `DIMCLASS_STANDARDS_DIR` when set, otherwise the embedded tables.
    pub fn load_default() -> Result<Self, StandardsError> {
        match standards_dir_override() {
            Some(dir) => {
                tracing::info!(dir = %dir.display(), "loading vocabulary from override directory");
                Self::load_dir(&dir)
            }
            None => Self::embedded(),
        }
    }

    /// Layers an additional unit CSV on top of the current unit table.
    pub fn with_extra_units(mut self, path: &Path) -> Result<Self, StandardsError> {
        let bytes = read_file(path)?;
        let extra = parse_unit_table(&bytes, path)?;
        tracing::info!(path = %path.display(), rows = extra.len(), "extra unit table loaded");
        self.units.extend(extra);
        self.sources.push(TableSource {
            name: path.display().to_string(),
            sha256: sha256_hex(&bytes),
        });
        Ok(self)
    }

    /// Checksums of every table, in load order.
    pub fn sources(&self) -> &[TableSource] {
        &self.sources
    }

    /// Single checksum identifying the exact tables used in a run.
    pub fn fingerprint(&self) -> String {
        let joined = self
            .sources
            .iter()
            .map(|s| s.sha256.as_str())
            .collect::<Vec<_>>()
            .join(":");
        sha256_hex(joined.as_bytes())
    }

    fn from_sources(
        units: (&Path, &[u8]),
        counties: (&Path, &[u8]),
        countries: (&Path, &[u8]),
    ) -> Result<Self, StandardsError> {
        let sources = [units, counties, countries]
            .iter()
            .map(|(path, bytes)| TableSource {
                name: path.display().to_string(),
                sha256: sha256_hex(bytes),
            })
            .collect();
        Ok(Self {
            units: parse_unit_table(units.1, units.0)?,
            counties: parse_name_list(counties.1, counties.0)?,
            countries: parse_name_list(countries.1, countries.0)?,
            sources,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dimclass_model::UnitType;

    #[test]
    fn test_embedded_tables_load() {
        let vocabulary = Vocabulary::embedded().unwrap();
        assert_eq!(
            vocabulary.units.get("procente").unwrap().unit_type,
            UnitType::Percentage
        );
        assert!(vocabulary.counties.contains("bihor"));
        assert!(vocabulary.counties.contains("bucuresti"));
        assert!(vocabulary.countries.contains("franta"));
        assert_eq!(vocabulary.sources().len(), 3);
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let a = Vocabulary::embedded().unwrap();
        let b = Vocabulary::embedded().unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
    }

    #[test]
    fn test_workspace_dir_matches_embedded() {
        let dir = crate::paths::workspace_standards_dir();
        let loaded = Vocabulary::load_dir(&dir).unwrap();
        let embedded = Vocabulary::embedded().unwrap();
        assert_eq!(loaded.fingerprint(), embedded.fingerprint());
        assert_eq!(loaded.units.len(), embedded.units.len());
    }
}
