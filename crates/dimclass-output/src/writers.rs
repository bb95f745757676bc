//! In-memory rendering of the output files.

use dimclass_model::{ClassifiedOption, ClassifiedOptionRow, DatasetProfile};
use serde::Serialize;

use crate::error::OutputError;
use crate::format::OutputFormat;
use crate::manifest::RunManifest;
use crate::rows::{PROFILE_COLUMNS, ProfileRecord, ProfileRow};

/// File stem of the Classified Options relation.
pub const CLASSIFIED_OPTIONS: &str = "classified_options";

/// File stem of the Dataset Profiles relation.
pub const DATASET_PROFILES: &str = "dataset_profiles";

pub const RUN_MANIFEST_FILE: &str = "run_manifest.json";

/// Column order of the Classified Options relation.
pub const OPTION_COLUMNS: &[&str] = &[
    "option_id",
    "dim_type",
    "year",
    "quarter",
    "month",
    "semester",
    "time_granularity",
    "geo_level",
    "siruta_code",
    "geo_name_clean",
    "gender",
    "age_min",
    "age_max",
    "unit_type",
    "unit_scale",
    "currency",
    "parse_confidence",
    "raw_label",
];

/// Renders the classified options, one row per option id.
pub fn render_options(
    options: &[ClassifiedOption],
    format: OutputFormat,
) -> Result<Vec<u8>, OutputError> {
    let rows: Vec<ClassifiedOptionRow> = options.iter().map(ClassifiedOption::to_row).collect();
    match format {
        OutputFormat::Csv => to_csv(CLASSIFIED_OPTIONS, OPTION_COLUMNS, &rows),
        OutputFormat::Json => to_json(CLASSIFIED_OPTIONS, &rows),
    }
}

/// Renders the dataset profiles, one row per dataset.
pub fn render_profiles(
    profiles: &[DatasetProfile],
    format: OutputFormat,
) -> Result<Vec<u8>, OutputError> {
    match format {
        OutputFormat::Csv => {
            let rows: Vec<ProfileRow> = profiles.iter().map(ProfileRow::from).collect();
            to_csv(DATASET_PROFILES, PROFILE_COLUMNS, &rows)
        }
        OutputFormat::Json => {
            let records: Vec<ProfileRecord> = profiles.iter().map(ProfileRecord::from).collect();
            to_json(DATASET_PROFILES, &records)
        }
    }
}

pub fn render_manifest(manifest: &RunManifest) -> Result<Vec<u8>, OutputError> {
    to_json("run_manifest", manifest)
}

/// Serializes rows with a header line, which is written even when there are no rows.
fn to_csv<T: Serialize>(
    file: &'static str,
    columns: &[&str],
    rows: &[T],
) -> Result<Vec<u8>, OutputError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if rows.is_empty() {
        writer
            .write_record(columns)
            .map_err(|source| OutputError::Csv { file, source })?;
    }
    for row in rows {
        writer
            .serialize(row)
            .map_err(|source| OutputError::Csv { file, source })?;
    }
    writer.into_inner().map_err(|e| OutputError::Csv {
        file,
        source: csv::Error::from(e.into_error()),
    })
}

fn to_json<T: Serialize + ?Sized>(file: &'static str, value: &T) -> Result<Vec<u8>, OutputError> {
    let mut bytes =
        serde_json::to_vec_pretty(value).map_err(|source| OutputError::Json { file, source })?;
    bytes.push(b'\n');
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dimclass_model::{ParseOutcome, ParsedFields, TimeFields};

    fn options() -> Vec<ClassifiedOption> {
        vec![
            ClassifiedOption::new(
                101,
                Some("Trimestrul IV 2020".to_string()),
                ParseOutcome::matched(ParsedFields::Time(TimeFields::quarterly(2020, 4))),
            ),
            ClassifiedOption::new(
                102,
                Some("Anii 2010-2012".to_string()),
                ParseOutcome::unmatched(dimclass_model::DimType::Time),
            ),
        ]
    }

    #[test]
    fn test_options_csv_header_and_nulls() {
        let bytes = render_options(&options(), OutputFormat::Csv).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some(
                "option_id,dim_type,year,quarter,month,semester,time_granularity,geo_level,\
                 siruta_code,geo_name_clean,gender,age_min,age_max,unit_type,unit_scale,\
                 currency,parse_confidence,raw_label"
            )
        );
        assert_eq!(
            lines.next(),
            Some("101,time,2020,4,,,quarterly,,,,,,,,,,1.0,Trimestrul IV 2020")
        );
        assert_eq!(
            lines.next(),
            Some("102,time,,,,,other,,,,,,,,,,0.0,Anii 2010-2012")
        );
    }

    #[test]
    fn test_options_json_is_array() {
        let bytes = render_options(&options(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["quarter"], 4);
        assert!(rows[1]["year"].is_null());
    }

    #[test]
    fn test_empty_relations_keep_header() {
        let profiles = String::from_utf8(render_profiles(&[], OutputFormat::Csv).unwrap()).unwrap();
        assert_eq!(profiles, format!("{}\n", PROFILE_COLUMNS.join(",")));
        let options = String::from_utf8(render_options(&[], OutputFormat::Csv).unwrap()).unwrap();
        assert_eq!(options.lines().collect::<Vec<_>>(), vec![OPTION_COLUMNS.join(",")]);
    }

    #[test]
    fn test_column_lists_match_serialized_headers() {
        let text = String::from_utf8(render_options(&options(), OutputFormat::Csv).unwrap()).unwrap();
        assert_eq!(text.lines().next(), Some(OPTION_COLUMNS.join(",").as_str()));
    }
}
