//! Result store commit and rollback tests.

use std::collections::BTreeSet;
use std::fs;

use dimclass_model::{
    Archetype, ClassifiedOption, DatasetProfile, DimType, GeoFields, GeoLevel, ParseOutcome,
    ParsedFields, TimeFields, TimeGranularity, UnitType,
};
use dimclass_output::{
    ManifestCounts, OutputError, OutputFormat, ResultStore, RunManifest, SourceChecksum,
};
use tempfile::tempdir;

fn options() -> Vec<ClassifiedOption> {
    vec![
        ClassifiedOption::new(
            1,
            Some("Anul 2009".to_string()),
            ParseOutcome::matched(ParsedFields::Time(TimeFields::annual(2009))),
        ),
        ClassifiedOption::new(
            2,
            Some("MACROREGIUNEA UNU".to_string()),
            ParseOutcome::matched(ParsedFields::Geo(GeoFields::new(
                GeoLevel::Macroregion,
                "Macroregiunea Unu",
            ))),
        ),
        ClassifiedOption::new(3, None, ParseOutcome::unmatched(DimType::Geo)),
    ]
}

fn profiles() -> Vec<DatasetProfile> {
    vec![DatasetProfile {
        matrix_code: "POP107D".to_string(),
        has_time: true,
        time_granularity: Some(TimeGranularity::Annual),
        time_year_min: Some(2009),
        time_year_max: Some(2009),
        has_geo: true,
        geo_levels: BTreeSet::from([GeoLevel::Macroregion, GeoLevel::Unknown]),
        has_gender: false,
        has_age: false,
        has_residence: false,
        unit_types: BTreeSet::new(),
        primary_unit_type: None::<UnitType>,
        dim_count: 2,
        archetype: Archetype::GeoTime,
        parse_coverage: 2.0 / 3.0,
        residence_overlap: false,
    }]
}

fn manifest() -> RunManifest {
    RunManifest::new("input.csv", "ab".repeat(32), "cd".repeat(32), OutputFormat::Csv)
        .with_sources(vec![SourceChecksum {
            name: "units.csv".to_string(),
            sha256: "ef".repeat(32),
        }])
        .with_counts(ManifestCounts {
            rows_read: 3,
            occurrences: 3,
            distinct_options: 3,
            unmatched_options: 1,
            malformed_labels: 1,
            datasets: 1,
            ..ManifestCounts::default()
        })
}

#[test]
fn commit_writes_relations_and_manifest() {
    let dir = tempdir().unwrap();
    let store = ResultStore::new(dir.path().join("out"), OutputFormat::Csv);

    let report = store.commit(&options(), &profiles(), &manifest()).unwrap();

    let options_csv = fs::read_to_string(&report.classified_options).unwrap();
    assert_eq!(options_csv.lines().count(), 4);
    assert!(options_csv.contains("2,geo,,,,,,macroregion,,Macroregiunea Unu,"));

    let profiles_csv = fs::read_to_string(&report.dataset_profiles).unwrap();
    let mut reader = csv::Reader::from_reader(profiles_csv.as_bytes());
    let headers = reader.headers().unwrap().clone();
    let record = reader.records().next().unwrap().unwrap();
    let column = |name: &str| {
        let idx = headers.iter().position(|h| h == name).unwrap();
        record.get(idx).unwrap().to_string()
    };
    assert_eq!(column("geo_levels"), r#"["macroregion","unknown"]"#);
    assert_eq!(column("unit_types"), "[]");
    assert_eq!(column("primary_unit_type"), "");
    assert_eq!(column("parse_coverage"), "0.667");
    assert_eq!(column("archetype"), "geo_time");

    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report.manifest).unwrap()).unwrap();
    assert_eq!(manifest["tool"], "dimclass");
    assert_eq!(manifest["format"], "csv");
    assert_eq!(manifest["counts"]["distinct_options"], 3);
    assert_eq!(
        manifest["files"],
        serde_json::json!(["classified_options.csv", "dataset_profiles.csv"])
    );

    let leftovers: Vec<_> = fs::read_dir(store.dir())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".tmp") || name.ends_with(".bak"))
        .collect();
    assert!(leftovers.is_empty(), "leftover files: {leftovers:?}");
}

#[test]
fn commit_replaces_previous_outputs() {
    let dir = tempdir().unwrap();
    let store = ResultStore::new(dir.path(), OutputFormat::Json);
    fs::write(store.options_path(), "old").unwrap();

    store.commit(&options(), &profiles(), &manifest()).unwrap();

    let options: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(store.options_path()).unwrap()).unwrap();
    assert_eq!(options.as_array().unwrap().len(), 3);
    let profiles: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(store.profiles_path()).unwrap()).unwrap();
    assert_eq!(profiles[0]["geo_levels"], serde_json::json!(["macroregion", "unknown"]));
    assert!(!dir.path().join("classified_options.json.bak").exists());
}

#[test]
fn failed_commit_keeps_previous_outputs() {
    let dir = tempdir().unwrap();
    let store = ResultStore::new(dir.path(), OutputFormat::Csv);
    fs::write(store.options_path(), "previous options").unwrap();
    fs::write(store.profiles_path(), "previous profiles").unwrap();
    fs::write(store.manifest_path(), "previous manifest").unwrap();
    // A directory where the manifest backup goes makes the last swap fail.
    let blocker = dir.path().join("run_manifest.json.bak");
    fs::create_dir(&blocker).unwrap();
    fs::write(blocker.join("keep"), "x").unwrap();

    let err = store
        .commit(&options(), &profiles(), &manifest())
        .unwrap_err();
    assert!(matches!(err, OutputError::AtomicWriteFailed { .. }), "{err}");

    assert_eq!(fs::read_to_string(store.options_path()).unwrap(), "previous options");
    assert_eq!(fs::read_to_string(store.profiles_path()).unwrap(), "previous profiles");
    assert_eq!(fs::read_to_string(store.manifest_path()).unwrap(), "previous manifest");
    let temps: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".tmp"))
        .collect();
    assert!(temps.is_empty(), "leftover temps: {temps:?}");
}

#[test]
fn failed_first_commit_leaves_no_outputs() {
    let dir = tempdir().unwrap();
    let store = ResultStore::new(dir.path(), OutputFormat::Csv);
    // The manifest target is a non-empty directory, so it cannot be replaced.
    fs::create_dir(store.manifest_path()).unwrap();
    fs::write(store.manifest_path().join("keep"), "x").unwrap();
    fs::create_dir(dir.path().join("run_manifest.json.bak")).unwrap();
    fs::write(dir.path().join("run_manifest.json.bak").join("keep"), "x").unwrap();

    assert!(store.commit(&options(), &profiles(), &manifest()).is_err());
    assert!(!store.options_path().exists());
    assert!(!store.profiles_path().exists());
}

fn stray_files(dir: &std::path::Path) -> Vec<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".tmp") || name.ends_with(".bak") || name.starts_with(".commit"))
        .collect()
}

#[test]
fn recover_restores_outputs_after_crash_between_swaps() {
    let dir = tempdir().unwrap();
    let store = ResultStore::new(dir.path(), OutputFormat::Csv);
    store.commit(&options(), &profiles(), &manifest()).unwrap();
    let options_before = fs::read(store.options_path()).unwrap();
    let profiles_before = fs::read(store.profiles_path()).unwrap();
    let manifest_before = fs::read(store.manifest_path()).unwrap();

    // State left by a process killed after the first of three renames.
    fs::write(
        store.journal_path(),
        "classified_options.csv\tprevious\ndataset_profiles.csv\tprevious\nrun_manifest.json\tprevious\n",
    )
    .unwrap();
    fs::rename(
        store.options_path(),
        dir.path().join("classified_options.csv.bak"),
    )
    .unwrap();
    fs::write(store.options_path(), "option_id\n99\n").unwrap();
    fs::write(dir.path().join(".dataset_profiles.csv.tmp"), "matrix_code\nNEW1\n").unwrap();
    fs::write(dir.path().join(".run_manifest.json.tmp"), "{}").unwrap();

    assert!(store.recover().unwrap());

    assert_eq!(fs::read(store.options_path()).unwrap(), options_before);
    assert_eq!(fs::read(store.profiles_path()).unwrap(), profiles_before);
    assert_eq!(fs::read(store.manifest_path()).unwrap(), manifest_before);
    let leftovers = stray_files(dir.path());
    assert!(leftovers.is_empty(), "leftover files: {leftovers:?}");
    assert!(!store.recover().unwrap());
}

#[test]
fn recover_removes_outputs_of_interrupted_first_commit() {
    let dir = tempdir().unwrap();
    let store = ResultStore::new(dir.path(), OutputFormat::Csv);
    fs::write(
        store.journal_path(),
        "classified_options.csv\tnew\ndataset_profiles.csv\tnew\nrun_manifest.json\tnew\n",
    )
    .unwrap();
    fs::write(store.options_path(), "option_id\n1\n").unwrap();
    fs::write(dir.path().join(".dataset_profiles.csv.tmp"), "matrix_code\n").unwrap();

    assert!(store.recover().unwrap());

    assert!(!store.options_path().exists());
    assert!(!store.profiles_path().exists());
    assert!(stray_files(dir.path()).is_empty());
}

#[test]
fn commit_recovers_before_writing() {
    let dir = tempdir().unwrap();
    let store = ResultStore::new(dir.path(), OutputFormat::Csv);
    fs::write(store.journal_path(), "classified_options.csv\tnew\n").unwrap();
    fs::write(store.options_path(), "partial").unwrap();

    let report = store.commit(&options(), &profiles(), &manifest()).unwrap();

    assert_eq!(
        fs::read_to_string(&report.classified_options).unwrap().lines().count(),
        4
    );
    assert!(stray_files(dir.path()).is_empty());
}

#[test]
fn corrupt_journal_blocks_commit() {
    let dir = tempdir().unwrap();
    let store = ResultStore::new(dir.path(), OutputFormat::Csv);
    fs::write(store.journal_path(), "classified_options.csv\tsometimes\n").unwrap();

    let err = store
        .commit(&options(), &profiles(), &manifest())
        .unwrap_err();

    assert!(matches!(err, OutputError::CorruptJournal { .. }), "{err}");
    assert!(!store.options_path().exists());
}
