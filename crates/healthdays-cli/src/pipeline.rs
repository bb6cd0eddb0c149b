//! Survey run pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Ingest**: Load the extract and read one raw record per row
//! 2. **Recode**: Drop unscorable rows and recode the rest
//! 3. **Report**: Group statistics and ANOVA per factor
//! 4. **Output**: Write the clean table and the JSON report
//!
//! Each stage takes the output of the previous stage and returns typed results.
//! The binary wraps every stage in its own span.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use healthdays_ingest::{SourceFormat, extract_raw_records, load_survey};
use healthdays_model::{CleanRecord, ColumnMap, ProcessingOptions, RawRecord};
use healthdays_report::{OutputFormat, SurveyReport, write_clean_table};
use healthdays_transform::{PipelineOutput, run_pipeline};

/// Loads the column map from `path`, or the BRFSS defaults without one.
pub fn load_columns(path: Option<&Path>) -> Result<ColumnMap> {
    match path {
        Some(path) => {
            let columns = ColumnMap::load(path)
                .with_context(|| format!("load column map {}", path.display()))?;
            debug!(path = %path.display(), columns = ?columns, "column map loaded");
            Ok(columns)
        }
        None => Ok(ColumnMap::default()),
    }
}

// ============================================================================
// Stage 1: Ingest
// ============================================================================

/// Result of the ingest stage.
#[derive(Debug)]
pub struct IngestResult {
    /// One record per source row, in source order.
    pub records: Vec<RawRecord>,
    pub format: SourceFormat,
    /// Number of mapped columns found in the extract.
    pub column_count: usize,
}

/// Loads the mapped columns of the extract and reads the five survey answers
/// from every row.
pub fn ingest(input: &Path, columns: &ColumnMap) -> Result<IngestResult> {
    let (df, format) = load_survey(input, columns)
        .with_context(|| format!("load survey {}", input.display()))?;
    let records = extract_raw_records(&df, columns)
        .with_context(|| format!("read survey answers from {}", input.display()))?;
    Ok(IngestResult {
        records,
        format,
        column_count: df.width(),
    })
}

// ============================================================================
// Stage 2: Recode
// ============================================================================

/// Filters and recodes the records.
///
/// Fails only in fail-fast mode, on the first invariant violation. Otherwise
/// violations are returned in the output for the caller to report.
pub fn recode(records: &[RawRecord], options: &ProcessingOptions) -> Result<PipelineOutput> {
    run_pipeline(records, options).context("recode stopped at first invariant violation")
}

// ============================================================================
// Stage 3: Report
// ============================================================================

/// Builds the run report from the recoded output.
pub fn build_report(input: &Path, output: &PipelineOutput) -> SurveyReport {
    SurveyReport::build(&output.records, &output.tally).with_source(input.display().to_string())
}

// ============================================================================
// Stage 4: Output
// ============================================================================

/// Where and how to write the run's files.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub table: PathBuf,
    pub format: OutputFormat,
    pub report_json: Option<PathBuf>,
}

/// Files actually written by the output stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputPaths {
    pub table: Option<PathBuf>,
    pub report_json: Option<PathBuf>,
}

/// Writes the clean table and, when requested, the JSON report.
///
/// A run that recoded nothing writes no table; that is logged as a warning
/// rather than failing the run.
pub fn output(
    config: &OutputConfig,
    records: &[CleanRecord],
    report: &SurveyReport,
) -> Result<OutputPaths> {
    let mut paths = OutputPaths::default();

    if records.is_empty() {
        warn!(
            path = %config.table.display(),
            "no records survived recoding, clean table not written"
        );
    } else {
        write_clean_table(&config.table, records, config.format)
            .with_context(|| format!("write clean table {}", config.table.display()))?;
        paths.table = Some(config.table.clone());
    }

    if let Some(path) = &config.report_json {
        report
            .write_json(path)
            .with_context(|| format!("write report {}", path.display()))?;
        debug!(path = %path.display(), "report written");
        paths.report_json = Some(path.clone());
    }

    Ok(paths)
}

/// Clean table path used when none is given: `<stem>_clean.<ext>` beside the
/// input.
pub fn default_output_path(input: &Path, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("survey");
    input.with_file_name(format!("{stem}_clean.{}", format.extension()))
}
