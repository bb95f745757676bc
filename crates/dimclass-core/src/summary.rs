//! Post-run statistics.

use std::collections::{BTreeMap, HashMap};

use dimclass_model::{Archetype, ClassifiedOption, DatasetProfile, DimType, GeoLevel, UnitType};
use serde::Serialize;

use crate::cache::CacheStats;
use crate::normalize::normalize;

/// Number of unknown unit labels kept in the summary.
pub const TOP_UNKNOWN_UNITS: usize = 25;

/// Number of unknown geography labels kept in the summary.
pub const TOP_UNKNOWN_GEO: usize = 20;

/// Option counts for one dimension type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DimTypeCounts {
    pub options: usize,
    /// Options with confidence 0.
    pub unmatched: usize,
}

impl DimTypeCounts {
    pub fn unmatched_fraction(&self) -> f64 {
        if self.options == 0 {
            0.0
        } else {
            self.unmatched as f64 / self.options as f64
        }
    }
}

/// A normalized label with the number of distinct options carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

/// Run-level statistics reported after classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub occurrences: usize,
    pub distinct_options: usize,
    pub malformed_labels: usize,
    pub datasets: usize,
    pub by_dim_type: BTreeMap<DimType, DimTypeCounts>,
    pub archetypes: BTreeMap<Archetype, usize>,
    /// Distinct unknown unit labels, before truncation.
    pub unknown_unit_labels: usize,
    pub top_unknown_units: Vec<LabelCount>,
    /// Distinct unknown geography labels, before truncation.
    pub unknown_geo_labels: usize,
    pub top_unknown_geo: Vec<LabelCount>,
    pub datasets_mixing_units: usize,
    pub residence_overlaps: usize,
    pub cache: CacheStats,
}

impl RunSummary {
    pub fn build(
        occurrences: usize,
        options: &[ClassifiedOption],
        profiles: &[DatasetProfile],
        cache: CacheStats,
    ) -> Self {
        let mut by_dim_type: BTreeMap<DimType, DimTypeCounts> = BTreeMap::new();
        let mut unknown_units: HashMap<String, usize> = HashMap::new();
        let mut unknown_geo: HashMap<String, usize> = HashMap::new();
        let mut malformed_labels = 0;

        for option in options {
            let counts = by_dim_type.entry(option.dim_type).or_default();
            counts.options += 1;
            if option.is_unmatched() {
                counts.unmatched += 1;
            }
            let Some(label) = option.raw_label.as_deref() else {
                malformed_labels += 1;
                continue;
            };
            if option.unit().is_some_and(|u| u.unit_type == UnitType::Other) {
                *unknown_units.entry(normalize(label)).or_default() += 1;
            }
            if option.geo().is_some_and(|g| g.level == GeoLevel::Unknown) {
                *unknown_geo.entry(normalize(label)).or_default() += 1;
            }
        }

        let mut archetypes: BTreeMap<Archetype, usize> = BTreeMap::new();
        for profile in profiles {
            *archetypes.entry(profile.archetype).or_default() += 1;
        }

        Self {
            occurrences,
            distinct_options: options.len(),
            malformed_labels,
            datasets: profiles.len(),
            by_dim_type,
            archetypes,
            unknown_unit_labels: unknown_units.len(),
            top_unknown_units: top_labels(unknown_units, TOP_UNKNOWN_UNITS),
            unknown_geo_labels: unknown_geo.len(),
            top_unknown_geo: top_labels(unknown_geo, TOP_UNKNOWN_GEO),
            datasets_mixing_units: profiles.iter().filter(|p| !p.is_unit_aggregable()).count(),
            residence_overlaps: profiles.iter().filter(|p| p.residence_overlap).count(),
            cache,
        }
    }

    /// Options with confidence 0 across all types.
    pub fn unmatched_total(&self) -> usize {
        self.by_dim_type.values().map(|c| c.unmatched).sum()
    }
}

/// Highest counts first, ties by label.
fn top_labels(counts: HashMap<String, usize>, limit: usize) -> Vec<LabelCount> {
    let mut labels: Vec<LabelCount> = counts
        .into_iter()
        .map(|(label, count)| LabelCount { label, count })
        .collect();
    labels.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    labels.truncate(limit);
    labels
}
