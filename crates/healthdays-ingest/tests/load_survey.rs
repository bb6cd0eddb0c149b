use std::fs;
use std::path::PathBuf;

use healthdays_ingest::{IngestError, SourceFormat, extract_raw_records, load_survey};
use healthdays_model::{ColumnMap, RawRecord};
use healthdays_xpt::{XptColumn, XptDataset, XptValue, XptWriterOptions, write_xpt};
use tempfile::TempDir;

fn temp_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write file");
    path
}

#[test]
fn loads_csv_with_blank_cells() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_file(
        &dir,
        "extract.csv",
        "AVEDRNK2,ALCDAY5,SMOKDAY2,_AGEG5YR,PHYSHLTH\n\
         3,215,1,5,88\n\
         ,888,3,2,10\n\
         77,101,2,14,99\n",
    );

    let (df, format) = load_survey(&path, &ColumnMap::default()).expect("load csv");
    assert_eq!(format, SourceFormat::Csv);
    assert_eq!(df.height(), 3);

    let records = extract_raw_records(&df, &ColumnMap::default()).expect("extract");
    assert_eq!(records[1].avg_drinks_per_day, None);
    assert_eq!(records[1].days_drank_last_30, Some(888));
    assert_eq!(records[2].age_group, Some(14));
}

#[test]
fn loads_xpt_with_missing_values_and_denormal_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("llcp.xpt");

    let mut dataset = XptDataset::with_columns(
        "LLCP",
        ["AVEDRNK2", "ALCDAY5", "SMOKDAY2", "_AGEG5YR", "PHYSHLTH"]
            .into_iter()
            .map(XptColumn::numeric)
            .collect(),
    );
    dataset
        .add_row(vec![
            XptValue::numeric_missing(),
            XptValue::numeric(888.0),
            XptValue::numeric(3.0),
            XptValue::numeric(1.0),
            // Smallest positive IBM float, how BRFSS stores zero.
            XptValue::numeric(5.397_605_346_934_028e-79),
        ])
        .unwrap();
    write_xpt(&path, &dataset, XptWriterOptions::default()).unwrap();

    let (df, format) = load_survey(&path, &ColumnMap::default()).expect("load xpt");
    assert_eq!(format, SourceFormat::Xpt);

    let records = extract_raw_records(&df, &ColumnMap::default()).expect("extract");
    assert_eq!(
        records,
        vec![RawRecord {
            row: 0,
            avg_drinks_per_day: None,
            days_drank_last_30: Some(888),
            smoking_frequency: Some(3),
            age_group: Some(1),
            unhealthy_days_last_30: Some(0),
        }]
    );
}

#[test]
fn xpt_extra_variables_are_not_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("llcp_full.xpt");

    let mut dataset = XptDataset::with_columns(
        "LLCP",
        vec![
            XptColumn::character("_STATE", 2),
            XptColumn::numeric("AVEDRNK2"),
            XptColumn::numeric("MENTHLTH"),
            XptColumn::numeric("ALCDAY5"),
            XptColumn::numeric("SMOKDAY2"),
            XptColumn::character("SEQNO", 10),
            XptColumn::numeric("_AGEG5YR"),
            XptColumn::numeric("PHYSHLTH"),
        ],
    );
    dataset
        .add_row(vec![
            XptValue::character("53"),
            XptValue::numeric(2.0),
            XptValue::numeric(15.0),
            XptValue::numeric(203.0),
            XptValue::numeric(1.0),
            XptValue::character("2020000001"),
            XptValue::numeric(6.0),
            XptValue::numeric(12.0),
        ])
        .unwrap();
    write_xpt(&path, &dataset, XptWriterOptions::default()).unwrap();

    let (df, _) = load_survey(&path, &ColumnMap::default()).expect("load xpt");
    let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
    assert_eq!(names, ["AVEDRNK2", "ALCDAY5", "SMOKDAY2", "_AGEG5YR", "PHYSHLTH"]);

    let records = extract_raw_records(&df, &ColumnMap::default()).expect("extract");
    assert_eq!(
        records,
        vec![RawRecord {
            row: 0,
            avg_drinks_per_day: Some(2),
            days_drank_last_30: Some(203),
            smoking_frequency: Some(1),
            age_group: Some(6),
            unhealthy_days_last_30: Some(12),
        }]
    );
}

#[test]
fn csv_extra_columns_are_not_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_file(
        &dir,
        "wide.csv",
        "_STATE,avedrnk2,ALCDAY5,MENTHLTH,SMOKDAY2,_AGEG5YR,PHYSHLTH,SEQNO\n\
         WA,3,215,4,1,5,88,2020000001\n",
    );

    let (df, _) = load_survey(&path, &ColumnMap::default()).expect("load csv");
    assert_eq!(df.width(), 5);
    assert!(df.column("_STATE").is_err());
    assert!(df.column("SEQNO").is_err());

    let records = extract_raw_records(&df, &ColumnMap::default()).expect("extract");
    assert_eq!(records[0].avg_drinks_per_day, Some(3));
    assert_eq!(records[0].unhealthy_days_last_30, Some(88));
}

#[test]
fn mapped_column_absent_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_file(
        &dir,
        "partial.csv",
        "AVEDRNK2,ALCDAY5,SMOKDAY2,PHYSHLTH,SEQNO\n3,215,1,88,1\n",
    );

    let (df, _) = load_survey(&path, &ColumnMap::default()).expect("load csv");
    assert_eq!(df.width(), 4);
    let err = extract_raw_records(&df, &ColumnMap::default()).unwrap_err();
    assert!(matches!(err, IngestError::MissingColumn { ref column, .. } if column == "_AGEG5YR"));
}

#[test]
fn custom_column_map() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_file(
        &dir,
        "renamed.csv",
        "drinks,days,smoke,age,phys\n2,204,3,7,1\n",
    );
    let map = ColumnMap {
        avg_drinks_per_day: "drinks".to_string(),
        days_drank_last_30: "days".to_string(),
        smoking_frequency: "smoke".to_string(),
        age_group: "age".to_string(),
        unhealthy_days_last_30: "phys".to_string(),
    };
    let (df, _) = load_survey(&path, &map).unwrap();
    let records = extract_raw_records(&df, &map).unwrap();
    assert_eq!(records[0].days_drank_last_30, Some(204));
}

#[test]
fn missing_file_and_bad_extension() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_survey(&dir.path().join("absent.csv"), &ColumnMap::default()).unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));

    let path = temp_file(&dir, "extract.json", "{}");
    let err = load_survey(&path, &ColumnMap::default()).unwrap_err();
    assert!(matches!(err, IngestError::UnsupportedFormat { .. }));
}

#[test]
fn corrupt_xpt_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_file(&dir, "broken.xpt", &" ".repeat(800));
    let err = load_survey(&path, &ColumnMap::default()).unwrap_err();
    assert!(matches!(err, IngestError::Xpt { .. }));
    assert!(err.to_string().contains("broken.xpt"));
}
