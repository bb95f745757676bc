//! Result store for classification runs.
//!
//! Renders the Classified Options and Dataset Profiles relations as CSV or
//! JSON, writes them with a run manifest, and commits all three files
//! atomically into an output directory.

#![deny(unsafe_code)]

pub mod error;
pub mod format;
pub mod manifest;
pub mod rows;
pub mod store;
pub mod writers;

pub use error::OutputError;
pub use format::OutputFormat;
pub use manifest::{ManifestCounts, RunManifest, SourceChecksum};
pub use rows::{PROFILE_COLUMNS, ProfileRecord, ProfileRow, round_coverage};
pub use store::{COMMIT_JOURNAL, CommitReport, ResultStore};
pub use writers::{CLASSIFIED_OPTIONS, DATASET_PROFILES, OPTION_COLUMNS, RUN_MANIFEST_FILE};
