//! Classification of statistical dimension labels.
//!
//! A dimension label is dispatched to one semantic type; every option label
//! of that dimension is then parsed by the matching [`DimensionParser`] into
//! structured fields with a confidence. Option ids are parsed once per run
//! through the [`ClassificationCache`], and the classified options of each
//! dataset are rolled up into a [`DatasetProfile`](dimclass_model::DatasetProfile).

#![deny(unsafe_code)]

pub mod aggregate;
pub mod cache;
pub mod dispatch;
pub mod normalize;
pub mod parsers;
pub mod pipeline;
pub mod summary;

pub use aggregate::{
    DimensionOptions, MIXED_GRANULARITY_SHARE, aggregate_dataset, assign_archetype,
    dominant_granularity, primary_unit_type,
};
pub use cache::{CacheStats, ClassificationCache, ClassificationRequest};
pub use dispatch::{DimensionParser, Dispatch, ParserRegistry};
pub use normalize::{contains_phrase, fold_diacritics, normalize};
pub use pipeline::{
    DimensionTrace, RunOptions, RunOutput, run_classification, run_classification_with_progress,
};
pub use summary::{DimTypeCounts, LabelCount, RunSummary, TOP_UNKNOWN_GEO, TOP_UNKNOWN_UNITS};
