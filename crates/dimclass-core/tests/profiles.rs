//! Dataset profiles built by full runs.

use dimclass_core::{ParserRegistry, RunOptions, run_classification};
use dimclass_model::{Archetype, GeoLevel, OptionOccurrence, TimeGranularity, UnitType};
use dimclass_standards::Vocabulary;

fn registry() -> ParserRegistry {
    ParserRegistry::from_vocabulary(&Vocabulary::embedded().unwrap())
}

fn occ(id: u64, label: &str, dim_label: &str, matrix: &str, dim_code: &str) -> OptionOccurrence {
    OptionOccurrence::new(id, label, dim_label, matrix, dim_code)
}

fn population_by_county() -> Vec<OptionOccurrence> {
    vec![
        occ(1, "Total", "Judete", "POP107D", "1"),
        occ(2, "Bihor", "Judete", "POP107D", "1"),
        occ(3, "Cluj", "Judete", "POP107D", "1"),
        occ(10, "Anul 2019", "Perioade", "POP107D", "2"),
        occ(11, "Anul 2020", "Perioade", "POP107D", "2"),
        occ(12, "Anul 2021", "Perioade", "POP107D", "2"),
        occ(20, "Numar persoane", "UM: Numar persoane", "POP107D", "3"),
    ]
}

#[test]
fn geo_time_profile() {
    let output = run_classification(&population_by_county(), &registry(), &RunOptions::default());
    assert_eq!(output.profiles.len(), 1);
    let profile = &output.profiles[0];
    assert_eq!(profile.archetype, Archetype::GeoTime);
    assert_eq!(profile.time_granularity, Some(TimeGranularity::Annual));
    assert_eq!(profile.geo_level_tokens(), vec!["county", "national"]);
    assert!(profile.is_unit_aggregable());

    let json = serde_json::to_string_pretty(profile).unwrap();
    insta::assert_snapshot!("geo_time_profile", json);
}

#[test]
fn demographic_profile_with_mixed_units() {
    let occurrences = vec![
        occ(30, "Masculin", "Sexe", "POP201A", "1"),
        occ(31, "Feminin", "Sexe", "POP201A", "1"),
        occ(32, "0-4 ani", "Grupe de varsta", "POP201A", "2"),
        occ(33, "85 ani si peste", "Grupe de varsta", "POP201A", "2"),
        occ(34, "Trimestrul I 2021", "Trimestre", "POP201A", "3"),
        occ(35, "Trimestrul II 2021", "Trimestre", "POP201A", "3"),
        occ(36, "Procente", "UM: Diverse", "POP201A", "4"),
        occ(37, "Numar persoane", "UM: Diverse", "POP201A", "4"),
        occ(38, "Grade Celsius", "UM: Diverse", "POP201A", "4"),
    ];
    let output = run_classification(&occurrences, &registry(), &RunOptions::default());
    let profile = &output.profiles[0];

    assert_eq!(profile.archetype, Archetype::Demographic);
    assert!(profile.has_gender && profile.has_age && profile.has_time);
    assert_eq!(profile.time_granularity, Some(TimeGranularity::Quarterly));
    assert_eq!(profile.time_year_min, Some(2021));
    assert_eq!(profile.unit_type_tokens(), vec!["count", "other", "percentage"]);
    assert!(!profile.is_unit_aggregable());
    assert_eq!(profile.primary_unit_type, Some(UnitType::Count));
    assert_eq!(profile.dim_count, 4);
    assert!((profile.parse_coverage - 8.0 / 9.0).abs() < 1e-9);

    assert_eq!(output.summary.unknown_unit_labels, 1);
    assert_eq!(output.summary.top_unknown_units[0].label, "grade celsius");
    assert_eq!(output.summary.datasets_mixing_units, 1);
}

#[test]
fn residence_overlap_is_flagged() {
    let occurrences = vec![
        occ(40, "Anul 2020", "Ani", "LOC101B", "1"),
        occ(41, "Urban", "Localitati", "LOC101B", "2"),
        occ(42, "Bihor", "Localitati", "LOC101B", "2"),
        occ(43, "Mediul urban", "Medii de rezidenta", "LOC101B", "3"),
    ];
    let output = run_classification(&occurrences, &registry(), &RunOptions::default());
    let profile = &output.profiles[0];
    assert!(profile.residence_overlap);
    assert!(profile.geo_levels.contains(&GeoLevel::Residence));
    assert_eq!(profile.archetype, Archetype::GeoTime);
    assert_eq!(output.summary.residence_overlaps, 1);
}

#[test]
fn matrix_filter_and_debug_trace() {
    let mut occurrences = population_by_county();
    occurrences.push(occ(50, "Anul 2020", "Ani", "OTHER01", "1"));
    let options = RunOptions::default()
        .with_matrix(Some("pop107d".to_string()))
        .with_debug(true);
    let output = run_classification(&occurrences, &registry(), &options);

    assert_eq!(output.profiles.len(), 1);
    assert_eq!(output.profiles[0].matrix_code, "POP107D");
    assert_eq!(output.trace.len(), 3);
    assert_eq!(output.trace[0].dispatch.dim_type, dimclass_model::DimType::Geo);
    assert_eq!(output.trace[0].options.len(), 3);
    assert_eq!(output.summary.occurrences, 7);
}

#[test]
fn time_only_dataset_with_unparsed_periods() {
    let occurrences = vec![
        occ(60, "Anii 1990-1995", "Perioade", "IND01", "1"),
        occ(61, "Anii 1996-2000", "Perioade", "IND01", "1"),
        occ(62, "Agricultura", "Activitati", "IND01", "2"),
    ];
    let output = run_classification(&occurrences, &registry(), &RunOptions::default());
    let profile = &output.profiles[0];
    assert_eq!(profile.archetype, Archetype::TimeSeries);
    assert_eq!(profile.time_granularity, Some(TimeGranularity::Other));
    assert_eq!(profile.time_year_min, None);
    assert!((profile.parse_coverage - 1.0 / 3.0).abs() < 1e-9);
}
