//! One full classification run: load, classify, aggregate, commit.

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing::{info, info_span, warn};

use dimclass_core::{ParserRegistry, RunOptions, RunOutput, run_classification_with_progress};
use dimclass_ingest::{SkippedRows, read_occurrences_from};
use dimclass_model::OptionOccurrence;
use dimclass_output::{
    CommitReport, ManifestCounts, OutputFormat, ResultStore, RunManifest, SourceChecksum,
};
use dimclass_standards::Vocabulary;
use dimclass_standards::hash::sha256_hex;

/// Everything needed to run a batch.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    /// Extra unit tables, later files overriding earlier ones.
    pub extra_units: Vec<PathBuf>,
    pub dry_run: bool,
    pub options: RunOptions,
}

/// Progress callbacks during classification.
pub trait RunProgress: Sync {
    /// Called once with the number of distinct options about to be parsed.
    fn start(&self, _distinct_options: u64) {}

    /// Called after each distinct option is parsed.
    fn parsed(&self) {}

    fn finish(&self) {}
}

/// Progress sink that ignores every event.
pub struct NoProgress;

impl RunProgress for NoProgress {}

/// Result of a run, with or without committed outputs.
#[derive(Debug)]
pub struct RunReport {
    pub output: RunOutput,
    pub rows_read: usize,
    pub skipped: SkippedRows,
    pub manifest: RunManifest,
    /// `None` for dry runs and runs restricted to one matrix.
    pub committed: Option<CommitReport>,
}

/// Loads the default vocabulary and layers the extra unit tables on top.
pub fn load_vocabulary(extra_units: &[PathBuf]) -> Result<Vocabulary> {
    let mut vocabulary = Vocabulary::load_default().context("load vocabulary")?;
    for path in extra_units {
        vocabulary = vocabulary
            .with_extra_units(path)
            .with_context(|| format!("load unit table {}", path.display()))?;
    }
    Ok(vocabulary)
}

/// Executes a run and commits the outputs.
///
/// Nothing is written for dry runs or for runs restricted to one matrix, whose
/// relations would replace the full outputs with a single dataset. A full run
/// that yields no occurrences is refused rather than committed.
pub fn execute(request: &RunRequest, progress: &dyn RunProgress) -> Result<RunReport> {
    let run_span = info_span!("run", input = %request.input.display());
    let _run_guard = run_span.enter();

    let vocabulary = load_vocabulary(&request.extra_units)?;
    let registry = ParserRegistry::from_vocabulary(&vocabulary);
    info!(
        units = vocabulary.units.len(),
        counties = vocabulary.counties.len(),
        countries = vocabulary.countries.len(),
        fingerprint = %vocabulary.fingerprint(),
        "vocabulary loaded"
    );

    let ingest_start = Instant::now();
    let input_bytes = fs::read(&request.input)
        .with_context(|| format!("read input {}", request.input.display()))?;
    let input_sha256 = sha256_hex(&input_bytes);
    let ingest = read_occurrences_from(input_bytes.as_slice(), &request.input)
        .with_context(|| format!("parse input {}", request.input.display()))?;
    info!(
        rows = ingest.rows_read,
        occurrences = ingest.occurrences.len(),
        duration_ms = ingest_start.elapsed().as_millis(),
        "ingest complete"
    );
    if ingest.skipped.total() > 0 {
        warn!(
            invalid_option_id = ingest.skipped.invalid_option_id,
            missing_matrix_code = ingest.skipped.missing_matrix_code,
            "rows skipped"
        );
    }

    let classify_start = Instant::now();
    progress.start(distinct_option_count(
        &ingest.occurrences,
        request.options.matrix.as_deref(),
    ));
    let output = run_classification_with_progress(
        &ingest.occurrences,
        &registry,
        &request.options,
        &|| progress.parsed(),
    );
    progress.finish();
    info!(
        distinct_options = output.options.len(),
        datasets = output.profiles.len(),
        duration_ms = classify_start.elapsed().as_millis(),
        "classification complete"
    );

    let summary = &output.summary;
    for (dim_type, counts) in &summary.by_dim_type {
        info!(
            dim_type = %dim_type,
            options = counts.options,
            unmatched = counts.unmatched,
            "options per dimension type"
        );
    }
    info!(
        unmatched = summary.unmatched_total(),
        unknown_unit_labels = summary.unknown_unit_labels,
        unknown_geo_labels = summary.unknown_geo_labels,
        datasets_mixing_units = summary.datasets_mixing_units,
        residence_overlaps = summary.residence_overlaps,
        cache_hits = summary.cache.hits,
        cache_misses = summary.cache.misses,
        "run summary"
    );

    let manifest = RunManifest::new(
        request.input.display().to_string(),
        input_sha256,
        vocabulary.fingerprint(),
        request.format,
    )
    .with_sources(
        vocabulary
            .sources()
            .iter()
            .map(|source| SourceChecksum {
                name: source.name.clone(),
                sha256: source.sha256.clone(),
            })
            .collect(),
    )
    .with_matrix(request.options.matrix.clone())
    .with_counts(ManifestCounts {
        rows_read: ingest.rows_read,
        occurrences: summary.occurrences,
        skipped_rows: ingest.skipped.total(),
        malformed_labels: summary.malformed_labels,
        distinct_options: summary.distinct_options,
        unmatched_options: summary.unmatched_total(),
        datasets: summary.datasets,
    });

    let committed = if request.dry_run {
        info!("dry run, outputs not written");
        None
    } else if let Some(matrix) = &request.options.matrix {
        info!(matrix = %matrix, "restricted run, outputs not written");
        None
    } else {
        if summary.occurrences == 0 {
            bail!(
                "no valid occurrences in {}, previous outputs in {} left in place",
                request.input.display(),
                request.output_dir.display()
            );
        }
        let store = ResultStore::new(&request.output_dir, request.format);
        let report = store
            .commit(&output.options, &output.profiles, &manifest)
            .with_context(|| format!("write outputs to {}", request.output_dir.display()))?;
        Some(report)
    };

    Ok(RunReport {
        output,
        rows_read: ingest.rows_read,
        skipped: ingest.skipped,
        manifest,
        committed,
    })
}

/// Distinct option ids the run will parse, after the matrix filter.
pub fn distinct_option_count(occurrences: &[OptionOccurrence], matrix: Option<&str>) -> u64 {
    let ids: HashSet<_> = occurrences
        .iter()
        .filter(|o| matrix.is_none_or(|m| o.matrix_code().eq_ignore_ascii_case(m)))
        .map(|o| o.option_id)
        .collect();
    ids.len() as u64
}
