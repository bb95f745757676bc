//! Dataset-level aggregation of classified options into a profile.

use std::collections::{BTreeMap, BTreeSet};

use dimclass_model::{
    Archetype, ClassifiedOption, DatasetProfile, DimType, GeoLevel, TimeGranularity, UnitType,
};

/// Minimum share a granularity needs to make a time axis `mixed`.
pub const MIXED_GRANULARITY_SHARE: f64 = 0.10;

/// Classified option occurrences of one dimension of a dataset.
#[derive(Debug, Clone)]
pub struct DimensionOptions<'a> {
    pub dim_code: &'a str,
    pub dim_type: DimType,
    /// One entry per occurrence, duplicates included.
    pub options: Vec<&'a ClassifiedOption>,
}

/// Archetype from the dimension flags, most specific first.
pub fn assign_archetype(
    has_time: bool,
    has_geo: bool,
    has_gender: bool,
    has_age: bool,
    has_residence: bool,
) -> Archetype {
    match (has_time, has_geo) {
        (true, true) => Archetype::GeoTime,
        (true, false) if has_gender || has_age => Archetype::Demographic,
        (true, false) if has_residence => Archetype::TimeResidence,
        (true, false) => Archetype::TimeSeries,
        (false, _) => Archetype::Other,
    }
}

/// Builds the profile of one dataset.
pub fn aggregate_dataset(matrix_code: &str, dimensions: &[DimensionOptions<'_>]) -> DatasetProfile {
    let has = |dim_type: DimType| dimensions.iter().any(|d| d.dim_type == dim_type);
    let options_of = |dim_type: DimType| {
        dimensions
            .iter()
            .filter(move |d| d.dim_type == dim_type)
            .flat_map(|d| d.options.iter().copied())
    };

    let has_time = has(DimType::Time);
    let has_geo = has(DimType::Geo);
    let has_gender = has(DimType::Gender);
    let has_age = has(DimType::Age);
    let has_residence = has(DimType::Residence);

    let mut granularities: BTreeMap<TimeGranularity, usize> = BTreeMap::new();
    let mut years: Vec<i32> = Vec::new();
    for time in options_of(DimType::Time).filter_map(ClassifiedOption::time) {
        *granularities.entry(time.granularity).or_default() += 1;
        years.extend(time.year);
    }

    let geo_levels: BTreeSet<GeoLevel> = options_of(DimType::Geo)
        .filter_map(|option| option.geo().map(|geo| geo.level))
        .collect();
    let residence_overlap = has_residence && geo_levels.contains(&GeoLevel::Residence);

    let mut unit_counts: BTreeMap<UnitType, usize> = BTreeMap::new();
    for unit in options_of(DimType::Unit).filter_map(ClassifiedOption::unit) {
        *unit_counts.entry(unit.unit_type).or_default() += 1;
    }

    let occurrences: Vec<&ClassifiedOption> = dimensions
        .iter()
        .flat_map(|d| d.options.iter().copied())
        .collect();
    let covered = occurrences.iter().filter(|o| o.is_high_confidence()).count();
    let parse_coverage = if occurrences.is_empty() {
        0.0
    } else {
        covered as f64 / occurrences.len() as f64
    };

    DatasetProfile {
        matrix_code: matrix_code.to_string(),
        has_time,
        time_granularity: dominant_granularity(&granularities),
        time_year_min: years.iter().min().copied(),
        time_year_max: years.iter().max().copied(),
        has_geo,
        geo_levels,
        has_gender,
        has_age,
        has_residence,
        unit_types: unit_counts.keys().copied().collect(),
        primary_unit_type: primary_unit_type(&unit_counts),
        dim_count: dimensions.len(),
        archetype: assign_archetype(has_time, has_geo, has_gender, has_age, has_residence),
        parse_coverage,
        residence_overlap,
    }
}

/// Mode of the time granularities.
///
/// `other` only counts when nothing else was parsed. More than one
/// granularity at or above [`MIXED_GRANULARITY_SHARE`] gives `mixed`.
pub fn dominant_granularity(counts: &BTreeMap<TimeGranularity, usize>) -> Option<TimeGranularity> {
    let parsed: Vec<(TimeGranularity, usize)> = counts
        .iter()
        .filter(|(granularity, count)| **granularity != TimeGranularity::Other && **count > 0)
        .map(|(granularity, count)| (*granularity, *count))
        .collect();

    if parsed.is_empty() {
        return counts
            .get(&TimeGranularity::Other)
            .filter(|count| **count > 0)
            .map(|_| TimeGranularity::Other);
    }

    let total: usize = parsed.iter().map(|(_, count)| count).sum();
    let significant = parsed
        .iter()
        .filter(|(_, count)| *count as f64 / total as f64 >= MIXED_GRANULARITY_SHARE)
        .count();
    if significant > 1 {
        return Some(TimeGranularity::Mixed);
    }

    // Ties resolve to the first granularity in declaration order.
    parsed
        .iter()
        .fold(None, |best: Option<(TimeGranularity, usize)>, &(g, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((g, count)),
        })
        .map(|(granularity, _)| granularity)
}

/// Most frequent unit type; ties prefer non-`other`, then the lexically smaller token.
pub fn primary_unit_type(counts: &BTreeMap<UnitType, usize>) -> Option<UnitType> {
    counts
        .iter()
        .max_by(|(a, a_count), (b, b_count)| {
            a_count
                .cmp(b_count)
                .then_with(|| (**b == UnitType::Other).cmp(&(**a == UnitType::Other)))
                .then_with(|| b.as_str().cmp(a.as_str()))
        })
        .map(|(unit_type, _)| *unit_type)
}
