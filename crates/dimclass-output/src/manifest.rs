//! Run manifest written next to the two relations.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::format::OutputFormat;

/// Name and SHA-256 of one vocabulary table used by the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceChecksum {
    pub name: String,
    pub sha256: String,
}

/// Row and option counts of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestCounts {
    pub rows_read: usize,
    pub occurrences: usize,
    pub skipped_rows: usize,
    pub malformed_labels: usize,
    pub distinct_options: usize,
    pub unmatched_options: usize,
    pub datasets: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub tool: String,
    pub tool_version: String,
    /// RFC 3339 UTC timestamp.
    pub generated_at: String,
    pub input_path: String,
    pub input_sha256: String,
    /// Fingerprint over all vocabulary tables.
    pub vocabulary_sha256: String,
    pub vocabulary_sources: Vec<SourceChecksum>,
    pub format: OutputFormat,
    /// Restricted to one dataset, when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix: Option<String>,
    pub counts: ManifestCounts,
    /// Relation files written by the commit, relative to the output directory.
    #[serde(default)]
    pub files: Vec<String>,
}

impl RunManifest {
    pub fn new(
        input_path: impl Into<String>,
        input_sha256: impl Into<String>,
        vocabulary_sha256: impl Into<String>,
        format: OutputFormat,
    ) -> Self {
        Self {
            tool: "dimclass".to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            input_path: input_path.into(),
            input_sha256: input_sha256.into(),
            vocabulary_sha256: vocabulary_sha256.into(),
            vocabulary_sources: Vec::new(),
            format,
            matrix: None,
            counts: ManifestCounts::default(),
            files: Vec::new(),
        }
    }

    pub fn with_sources(mut self, sources: Vec<SourceChecksum>) -> Self {
        self.vocabulary_sources = sources;
        self
    }

    pub fn with_matrix(mut self, matrix: Option<String>) -> Self {
        self.matrix = matrix;
        self
    }

    pub fn with_counts(mut self, counts: ManifestCounts) -> Self {
        self.counts = counts;
        self
    }
}
