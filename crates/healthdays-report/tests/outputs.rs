//! File output tests for the clean table and JSON report.

use std::fs;

use healthdays_model::{
    CleanRecord, DrinkingCategory, Generation, ProcessingOptions, RawRecord, SmokingCategory,
};
use healthdays_report::{
    Factor, OutputFormat, ReportError, SurveyReport, XPT_DATASET_NAME, write_clean_table,
};
use healthdays_transform::run_pipeline;
use healthdays_xpt::read_xpt;

fn clean(row: usize, healthy_days: u8, generation: Generation, drinking: DrinkingCategory) -> CleanRecord {
    CleanRecord {
        row,
        healthy_days,
        generation,
        drinking,
        smoking: SmokingCategory::None,
    }
}

fn sample() -> Vec<CleanRecord> {
    vec![
        clean(0, 30, Generation::Millennial, DrinkingCategory::None),
        clean(1, 28, Generation::Millennial, DrinkingCategory::Moderate),
        clean(2, 25, Generation::Millennial, DrinkingCategory::Heavy),
        clean(3, 30, Generation::Millennial, DrinkingCategory::None),
        clean(4, 20, Generation::GenerationX, DrinkingCategory::Moderate),
        clean(5, 22, Generation::GenerationX, DrinkingCategory::None),
        clean(6, 18, Generation::GenerationX, DrinkingCategory::Heavy),
        clean(7, 10, Generation::BabyBoomer, DrinkingCategory::None),
        clean(8, 15, Generation::BabyBoomer, DrinkingCategory::Moderate),
        clean(9, 12, Generation::BabyBoomer, DrinkingCategory::Heavy),
        clean(10, 14, Generation::BabyBoomer, DrinkingCategory::None),
        clean(11, 9, Generation::BabyBoomer, DrinkingCategory::Moderate),
    ]
}

#[test]
fn csv_codes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clean.csv");
    write_clean_table(&path, &sample(), OutputFormat::CsvCodes).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 13);
    assert_eq!(lines[0], "healthy_days,generation,drinking,smoking");
    assert_eq!(lines[3], "25,0,2,0");
    assert_eq!(lines[12], "9,2,1,0");
}

#[test]
fn xpt_file_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clean.xpt");
    write_clean_table(&path, &sample(), OutputFormat::Xpt).unwrap();

    let dataset = read_xpt(&path).unwrap();
    assert_eq!(dataset.name, XPT_DATASET_NAME);
    assert_eq!(dataset.num_rows(), 12);
    let names: Vec<&str> = dataset.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["HLTHDAYS", "GENERATN", "DRINKING", "SMOKING"]);
    assert_eq!(dataset.rows[7][0].as_f64(), Some(10.0));
    assert_eq!(dataset.rows[7][1].as_f64(), Some(2.0));
}

#[test]
fn unwritable_path_reports_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("clean.csv");
    let err = write_clean_table(&path, &sample(), OutputFormat::CsvLabels).unwrap_err();
    assert!(matches!(err, ReportError::Io { .. }));
    assert!(err.to_string().contains("clean.csv"));
}

#[test]
fn generation_anova_detects_difference() {
    let report = SurveyReport::build(&sample(), &Default::default());
    let generation = report.factor(Factor::Generation).unwrap();
    assert_eq!(generation.groups.len(), 3);

    let anova = generation.anova.as_ref().unwrap();
    assert_eq!((anova.df_between, anova.df_within), (2, 9));
    assert!(anova.f_statistic > 10.0);
    assert!(anova.p_value < 0.01);
    assert!(anova.eta_squared > 0.5 && anova.eta_squared < 1.0);
}

#[test]
fn json_report_round_trip() {
    let raw = vec![
        RawRecord {
            row: 0,
            avg_drinks_per_day: Some(5),
            days_drank_last_30: Some(103),
            smoking_frequency: Some(1),
            age_group: Some(2),
            unhealthy_days_last_30: Some(88),
        },
        RawRecord {
            row: 1,
            avg_drinks_per_day: None,
            days_drank_last_30: Some(888),
            smoking_frequency: Some(3),
            age_group: Some(14),
            unhealthy_days_last_30: Some(2),
        },
    ];
    let output = run_pipeline(&raw, &ProcessingOptions::new()).unwrap();
    let report = SurveyReport::build(&output.records, &output.tally).with_source("llcp.csv");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    report.write_json(&path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let parsed: SurveyReport = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, report);
    assert_eq!(parsed.rows.read, 2);
    assert_eq!(parsed.rows.rejected, 1);
    assert_eq!(parsed.rows.rejections[0].reason, "sentinel age_group");
    assert_eq!(parsed.source.as_deref(), Some("llcp.csv"));

    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["factors"][0]["factor"], "generation");
}
