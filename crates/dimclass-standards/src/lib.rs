//! Vocabulary tables for dimension classification.
//!
//! The unit-of-measure table and the county / foreign-country name lists are
//! CSV data under the workspace `standards/` directory. They are embedded in
//! the binary, can be replaced wholesale through `DIMCLASS_STANDARDS_DIR`, and
//! the unit table can be extended per run with extra CSV files.

#![deny(unsafe_code)]

mod csv_utils;
pub mod error;
pub mod hash;
pub mod names;
pub mod paths;
pub mod units;
pub mod vocabulary;

pub use crate::error::StandardsError;
pub use crate::names::{load_name_list, parse_name_list};
pub use crate::units::{UnitEntry, UnitTable, load_unit_table, parse_unit_table};
pub use crate::vocabulary::{TableSource, Vocabulary};
