//! Input loading for dimension classification runs.

#![deny(unsafe_code)]

pub mod error;
pub mod occurrences;

pub use error::IngestError;
pub use occurrences::{IngestReport, SkippedRows, read_occurrences, read_occurrences_from};
