//! Full classification run: dispatch, classify, aggregate, summarize.

use std::collections::{BTreeMap, HashMap};

use dimclass_model::{ClassifiedOption, DatasetProfile, DimType, DimensionKey, OptionOccurrence};
use rayon::prelude::*;

use crate::aggregate::{DimensionOptions, aggregate_dataset};
use crate::cache::{CacheStats, ClassificationCache, ClassificationRequest};
use crate::dispatch::{Dispatch, ParserRegistry};
use crate::summary::RunSummary;

/// Options controlling a classification run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Parse distinct option ids on the rayon pool.
    pub parallel: bool,
    /// Restrict the run to one dataset.
    pub matrix: Option<String>,
    /// Classify synchronously and record a per-option trace.
    pub debug: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            matrix: None,
            debug: false,
        }
    }
}

impl RunOptions {
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_matrix(mut self, matrix: Option<String>) -> Self {
        self.matrix = matrix;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// Dispatch decision and classified options of one dimension (debug mode).
#[derive(Debug, Clone)]
pub struct DimensionTrace {
    pub key: DimensionKey,
    pub label: String,
    pub dispatch: Dispatch,
    /// Distinct options in input order.
    pub options: Vec<ClassifiedOption>,
}

/// Everything a run produces.
#[derive(Debug)]
pub struct RunOutput {
    /// One entry per distinct option id, sorted by id.
    pub options: Vec<ClassifiedOption>,
    /// One profile per dataset, sorted by matrix code.
    pub profiles: Vec<DatasetProfile>,
    pub summary: RunSummary,
    /// Only filled in debug mode.
    pub trace: Vec<DimensionTrace>,
}

impl RunOutput {
    pub fn cache_stats(&self) -> CacheStats {
        self.summary.cache
    }
}

/// Runs classification and aggregation over all occurrences.
pub fn run_classification(
    occurrences: &[OptionOccurrence],
    registry: &ParserRegistry,
    options: &RunOptions,
) -> RunOutput {
    run_classification_with_progress(occurrences, registry, options, &|| {})
}

/// Like [`run_classification`], calling `on_parsed` after each distinct option is parsed.
pub fn run_classification_with_progress(
    occurrences: &[OptionOccurrence],
    registry: &ParserRegistry,
    options: &RunOptions,
    on_parsed: &(dyn Fn() + Sync),
) -> RunOutput {
    let selected: Vec<&OptionOccurrence> = occurrences
        .iter()
        .filter(|o| {
            options
                .matrix
                .as_deref()
                .is_none_or(|matrix| o.matrix_code().eq_ignore_ascii_case(matrix))
        })
        .collect();
    tracing::info!(
        occurrences = selected.len(),
        matrix = options.matrix.as_deref().unwrap_or("*"),
        "classifying option occurrences"
    );

    let dispatches = dispatch_dimensions(&selected, registry);
    let requests: Vec<ClassificationRequest<'_>> = selected
        .iter()
        .map(|o| ClassificationRequest {
            option_id: o.option_id,
            raw_label: o.raw_label.as_deref(),
            dim_type: dim_type_of(&dispatches, &o.dimension.key),
        })
        .collect();

    let mut cache = ClassificationCache::new();
    if options.parallel && !options.debug {
        cache.classify_parallel(registry, &requests, on_parsed);
    } else {
        for request in &requests {
            let before = cache.stats().misses;
            cache.get_or_compute(registry, *request);
            if cache.stats().misses > before {
                on_parsed();
            }
        }
    }
    let stats = cache.stats();
    tracing::info!(
        distinct = cache.len(),
        hits = stats.hits,
        misses = stats.misses,
        conflicts = stats.conflicts,
        "classification finished"
    );

    let trace = if options.debug {
        build_trace(&selected, &dispatches, &cache)
    } else {
        Vec::new()
    };

    let datasets = group_datasets(&selected, &dispatches, &cache);
    let profiles: Vec<DatasetProfile> = if options.parallel {
        datasets
            .par_iter()
            .map(|(matrix, dimensions)| aggregate_dataset(matrix, dimensions))
            .collect()
    } else {
        datasets
            .iter()
            .map(|(matrix, dimensions)| aggregate_dataset(matrix, dimensions))
            .collect()
    };
    tracing::info!(datasets = profiles.len(), "dataset profiles built");

    let classified = cache.into_sorted_options();
    let summary = RunSummary::build(selected.len(), &classified, &profiles, stats);
    RunOutput {
        options: classified,
        profiles,
        summary,
        trace,
    }
}

fn dim_type_of(dispatches: &HashMap<DimensionKey, Dispatch>, key: &DimensionKey) -> DimType {
    dispatches
        .get(key)
        .map_or(DimType::Indicator, |dispatch| dispatch.dim_type)
}

/// Dispatches every distinct dimension once, using its first-seen label.
fn dispatch_dimensions(
    occurrences: &[&OptionOccurrence],
    registry: &ParserRegistry,
) -> HashMap<DimensionKey, Dispatch> {
    let mut dispatches: HashMap<DimensionKey, Dispatch> = HashMap::new();
    for occurrence in occurrences {
        let definition = &occurrence.dimension;
        if !dispatches.contains_key(&definition.key) {
            let dispatch = registry.dispatch_detailed(&definition.label);
            tracing::debug!(
                matrix = %definition.key.matrix_code,
                dim_code = %definition.key.dim_code,
                label = %definition.label,
                dim_type = %dispatch.dim_type,
                "dimension dispatched"
            );
            dispatches.insert(definition.key.clone(), dispatch);
        }
    }
    dispatches
}

/// Groups occurrences per dataset and dimension, keyed by matrix code.
fn group_datasets<'a>(
    occurrences: &[&'a OptionOccurrence],
    dispatches: &HashMap<DimensionKey, Dispatch>,
    cache: &'a ClassificationCache,
) -> Vec<(&'a str, Vec<DimensionOptions<'a>>)> {
    let mut grouped: BTreeMap<&'a str, BTreeMap<&'a str, DimensionOptions<'a>>> = BTreeMap::new();
    for &occurrence in occurrences {
        let key = &occurrence.dimension.key;
        let Some(option) = cache.get(occurrence.option_id) else {
            continue;
        };
        grouped
            .entry(key.matrix_code.as_str())
            .or_default()
            .entry(key.dim_code.as_str())
            .or_insert_with(|| DimensionOptions {
                dim_code: key.dim_code.as_str(),
                dim_type: dim_type_of(dispatches, key),
                options: Vec::new(),
            })
            .options
            .push(option);
    }
    grouped
        .into_iter()
        .map(|(matrix, dimensions)| (matrix, dimensions.into_values().collect()))
        .collect()
}

fn build_trace(
    occurrences: &[&OptionOccurrence],
    dispatches: &HashMap<DimensionKey, Dispatch>,
    cache: &ClassificationCache,
) -> Vec<DimensionTrace> {
    let mut traces: Vec<DimensionTrace> = Vec::new();
    let mut index: HashMap<&DimensionKey, usize> = HashMap::new();
    for &occurrence in occurrences {
        let key = &occurrence.dimension.key;
        let Some(dispatch) = dispatches.get(key) else {
            continue;
        };
        let idx = *index.entry(key).or_insert_with(|| {
            traces.push(DimensionTrace {
                key: key.clone(),
                label: occurrence.dimension.label.clone(),
                dispatch: dispatch.clone(),
                options: Vec::new(),
            });
            traces.len() - 1
        });
        let trace = &mut traces[idx];
        if trace
            .options
            .iter()
            .any(|o| o.option_id == occurrence.option_id)
        {
            continue;
        }
        if let Some(option) = cache.get(occurrence.option_id) {
            tracing::debug!(
                option_id = option.option_id,
                dim_type = %trace.dispatch.dim_type,
                confidence = option.parse_confidence,
                label = option.raw_label.as_deref().unwrap_or("<malformed>"),
                "option classified"
            );
            trace.options.push(option.clone());
        }
    }
    traces
}
