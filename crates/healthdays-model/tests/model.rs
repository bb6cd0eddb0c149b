//! Tests for healthdays-model types.

use std::io::Write;

use healthdays_model::{
    CleanRecord, ColumnMap, ConfigError, DrinkingCategory, ExecutionMode, Generation,
    ProcessingOptions, SmokingCategory, SurveyField,
};
use tempfile::NamedTempFile;

fn temp_toml(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".toml").expect("create temp toml");
    file.write_all(contents.as_bytes()).expect("write toml");
    file
}

#[test]
fn column_map_loads_overrides() {
    let file = temp_toml("avg_drinks_per_day = \"AVEDRNK3\"\nage_group = \"AGEG5YR\"\n");
    let map = ColumnMap::load(file.path()).expect("load column map");
    assert_eq!(map.column(SurveyField::AvgDrinksPerDay), "AVEDRNK3");
    assert_eq!(map.column(SurveyField::AgeGroup), "AGEG5YR");
    assert_eq!(map.column(SurveyField::DaysDrankLast30), "ALCDAY5");
}

#[test]
fn column_map_reports_parse_errors_with_path() {
    let file = temp_toml("age_group = [1, 2]\n");
    let err = ColumnMap::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains(&file.path().display().to_string()));
}

#[test]
fn column_map_missing_file() {
    let err = ColumnMap::load(std::path::Path::new("/nonexistent/columns.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn column_map_iter_is_in_source_order() {
    let map = ColumnMap::default();
    let columns: Vec<&str> = map.iter().map(|(_, c)| c).collect();
    assert_eq!(
        columns,
        vec!["AVEDRNK2", "ALCDAY5", "SMOKDAY2", "_AGEG5YR", "PHYSHLTH"]
    );
}

#[test]
fn clean_record_serializes() {
    let record = CleanRecord {
        row: 7,
        healthy_days: 30,
        generation: Generation::GenerationX,
        drinking: DrinkingCategory::Moderate,
        smoking: SmokingCategory::None,
    };
    let json = serde_json::to_string(&record).expect("serialize record");
    let round: CleanRecord = serde_json::from_str(&json).expect("deserialize record");
    assert_eq!(round, record);
}

#[test]
fn processing_options_builder() {
    let options = ProcessingOptions::new()
        .with_mode(ExecutionMode::Parallel)
        .with_fail_fast(true);
    assert_eq!(options.mode, ExecutionMode::Parallel);
    assert!(options.fail_fast);
    assert!(!options.log_data);
}
