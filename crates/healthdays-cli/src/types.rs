use std::path::PathBuf;

use healthdays_cli::pipeline::OutputPaths;
use healthdays_ingest::SourceFormat;
use healthdays_model::{ExecutionMode, RecodeError};
use healthdays_report::{OutputFormat, SurveyReport};

#[derive(Debug)]
pub struct RunResult {
    pub input: PathBuf,
    pub source_format: SourceFormat,
    pub mode: ExecutionMode,
    pub output_format: OutputFormat,
    pub report: SurveyReport,
    pub violations: Vec<RecodeError>,
    pub outputs: OutputPaths,
    pub dry_run: bool,
    pub has_errors: bool,
}
