//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use healthdays_report::OutputFormat;

#[derive(Parser)]
#[command(
    name = "healthdays",
    version,
    about = "Recode survey drinking, smoking, and age answers and test for differences in healthy days",
    long_about = "Recode a BRFSS-style survey extract into an analysis-ready table.\n\n\
                  Drops rows with missing or sentinel answers, derives healthy days,\n\
                  generation, drinking and smoking categories, writes the clean table,\n\
                  and reports group statistics with a one-way ANOVA per factor."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Show the raw days-drank code in the passthrough warning.
    ///
    /// Off by default; the code is logged as [REDACTED].
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Recode a survey extract and report on it.
    Run(RunArgs),

    /// List the survey fields read from the extract.
    Fields(FieldsArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Survey extract (.csv or .xpt).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// TOML file mapping field names to source column names.
    #[arg(long = "columns", value_name = "PATH")]
    pub columns: Option<PathBuf>,

    /// Clean table path (default: <INPUT stem>_clean.<ext> next to INPUT).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Clean table format.
    #[arg(long = "output-format", value_enum, default_value = "csv-codes")]
    pub output_format: OutputFormatArg,

    /// Also write the report as JSON.
    #[arg(long = "report-json", value_name = "PATH")]
    pub report_json: Option<PathBuf>,

    /// Recode rows on all cores. Output order is unchanged.
    #[arg(long = "parallel")]
    pub parallel: bool,

    /// Stop at the first invariant violation.
    #[arg(long = "fail-fast")]
    pub fail_fast: bool,

    /// Report without writing any files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct FieldsArgs {
    /// Show the column names from this TOML map instead of the defaults.
    #[arg(long = "columns", value_name = "PATH")]
    pub columns: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    /// CSV with numeric category codes.
    CsvCodes,
    /// CSV with category labels.
    CsvLabels,
    /// SAS Transport V5 with numeric codes.
    Xpt,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::CsvCodes => OutputFormat::CsvCodes,
            OutputFormatArg::CsvLabels => OutputFormat::CsvLabels,
            OutputFormatArg::Xpt => OutputFormat::Xpt,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
