//! Property-based tests for classification invariants.

use std::sync::LazyLock;

use dimclass_core::{ParserRegistry, assign_archetype, normalize};
use dimclass_model::{Archetype, DimType, ParsedFields, TimeFields};
use dimclass_standards::Vocabulary;
use proptest::prelude::*;

static REGISTRY: LazyLock<ParserRegistry> = LazyLock::new(|| {
    ParserRegistry::from_vocabulary(&Vocabulary::embedded().expect("embedded vocabulary"))
});

const ROMAN: [&str; 4] = ["I", "II", "III", "IV"];

fn dim_type() -> impl Strategy<Value = DimType> {
    prop::sample::select(DimType::ALL.to_vec())
}

proptest! {
    /// `Trimestrul <roman> <year>` round-trips to (year, quarter).
    #[test]
    fn prop_quarter_round_trip(year in 1990i32..=2030, quarter in 1u8..=4) {
        let label = format!("Trimestrul {} {}", ROMAN[usize::from(quarter - 1)], year);
        let outcome = REGISTRY.classify(DimType::Time, Some(&label));
        prop_assert_eq!(outcome.fields, ParsedFields::Time(TimeFields::quarterly(year, quarter)));
        prop_assert_eq!(outcome.confidence, 1.0);
    }

    /// Any label under any type gives the same type back and a confidence in [0, 1].
    #[test]
    fn prop_classification_is_total_and_bounded(label in "\\PC{0,40}", dim_type in dim_type()) {
        let outcome = REGISTRY.classify(dim_type, Some(&label));
        prop_assert_eq!(outcome.fields.dim_type(), dim_type);
        prop_assert!((0.0..=1.0).contains(&outcome.confidence));
    }

    /// Classifying the same label twice gives identical results.
    #[test]
    fn prop_classification_is_idempotent(label in "\\PC{0,40}", dim_type in dim_type()) {
        let first = REGISTRY.classify(dim_type, Some(&label));
        let second = REGISTRY.classify(dim_type, Some(&label));
        prop_assert_eq!(first, second);
    }

    /// Dispatch always yields one of the seven types and is stable.
    #[test]
    fn prop_dispatch_is_deterministic(label in "\\PC{0,60}") {
        let first = REGISTRY.dispatch(&label);
        prop_assert!(DimType::ALL.contains(&first));
        prop_assert_eq!(first, REGISTRY.dispatch(&label));
    }

    /// Normalization is idempotent.
    #[test]
    fn prop_normalize_idempotent(text in "[a-zA-Z0-9ăâîșşțţĂÂÎȘŞȚŢ ,.:()-]{0,60}") {
        let once = normalize(&text);
        prop_assert_eq!(normalize(&once), once.clone());
    }

    /// Archetype follows the priority table for every flag combination.
    #[test]
    fn prop_archetype_priority(
        has_time: bool,
        has_geo: bool,
        has_gender: bool,
        has_age: bool,
        has_residence: bool,
    ) {
        let expected = if has_time && has_geo {
            Archetype::GeoTime
        } else if has_time && (has_gender || has_age) {
            Archetype::Demographic
        } else if has_time && has_residence {
            Archetype::TimeResidence
        } else if has_time {
            Archetype::TimeSeries
        } else {
            Archetype::Other
        };
        let archetype = assign_archetype(has_time, has_geo, has_gender, has_age, has_residence);
        prop_assert_eq!(archetype, expected);
        prop_assert_eq!(
            archetype,
            assign_archetype(has_time, has_geo, has_gender, has_age, has_residence)
        );
    }
}
