use std::time::Instant;

use anyhow::Result;
use comfy_table::{CellAlignment, Table};
use tracing::{info, info_span};

use healthdays_cli::logging::log_data_enabled;
use healthdays_cli::pipeline::{
    IngestResult, OutputConfig, OutputPaths, build_report, default_output_path, ingest,
    load_columns, output, recode,
};
use healthdays_model::{ExecutionMode, ProcessingOptions, SurveyField};
use healthdays_report::OutputFormat;

use crate::cli::{FieldsArgs, RunArgs};
use crate::summary::{align_column, apply_table_style, header_cell};
use crate::types::RunResult;

pub fn run_fields(args: &FieldsArgs) -> Result<()> {
    let columns = load_columns(args.columns.as_deref())?;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Column"),
        header_cell("Description"),
        header_cell("Accepted codes"),
        header_cell("Sentinels"),
        header_cell("Blank"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 5, CellAlignment::Center);
    for field in SurveyField::ALL {
        let sentinels = field
            .sentinels()
            .iter()
            .map(u16::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let blank = if field.is_required() { "drop" } else { "allowed" };
        table.add_row(vec![
            field.as_str(),
            columns.column(field),
            field.description(),
            field.accepted_codes(),
            sentinels.as_str(),
            blank,
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_survey(args: &RunArgs) -> Result<RunResult> {
    let input = &args.input;
    let run_span = info_span!("run", input = %input.display());
    let _run_guard = run_span.enter();

    let columns = load_columns(args.columns.as_deref())?;
    let mode = if args.parallel {
        ExecutionMode::Parallel
    } else {
        ExecutionMode::Sequential
    };
    let options = ProcessingOptions::new()
        .with_mode(mode)
        .with_fail_fast(args.fail_fast)
        .with_log_data(log_data_enabled());
    let output_format = OutputFormat::from(args.output_format);

    // =========================================================================
    // Stage 1: Ingest
    // =========================================================================
    let ingest_span = info_span!("ingest", input = %input.display());
    let ingest_start = Instant::now();
    let IngestResult {
        records: raw_records,
        format: source_format,
        column_count,
    } = ingest_span.in_scope(|| ingest(input, &columns))?;
    info!(
        format = %source_format,
        rows = raw_records.len(),
        columns = column_count,
        duration_ms = ingest_start.elapsed().as_millis(),
        "ingest complete"
    );

    // =========================================================================
    // Stage 2: Recode
    // =========================================================================
    let recode_span = info_span!(
        "recode",
        mode = mode.as_str(),
        fail_fast = options.fail_fast
    );
    let recode_start = Instant::now();
    let recoded = recode_span.in_scope(|| recode(&raw_records, &options))?;
    info!(
        rows = recoded.tally.seen,
        rejected = recoded.tally.rejected,
        recoded = recoded.tally.recoded,
        violations = recoded.tally.violations,
        duration_ms = recode_start.elapsed().as_millis(),
        "recode complete"
    );

    // =========================================================================
    // Stage 3: Report
    // =========================================================================
    let report_span = info_span!("report", records = recoded.records.len());
    let report = report_span.in_scope(|| build_report(input, &recoded));

    // =========================================================================
    // Stage 4: Output
    // =========================================================================
    let outputs = if args.dry_run {
        info!("dry run, no files written");
        OutputPaths::default()
    } else {
        let config = OutputConfig {
            table: args
                .output
                .clone()
                .unwrap_or_else(|| default_output_path(input, output_format)),
            format: output_format,
            report_json: args.report_json.clone(),
        };
        let output_span = info_span!("output", format = %output_format);
        output_span.in_scope(|| output(&config, &recoded.records, &report))?
    };

    let has_errors = !recoded.violations.is_empty();
    Ok(RunResult {
        input: input.clone(),
        source_format,
        mode,
        output_format,
        report,
        violations: recoded.violations,
        outputs,
        dry_run: args.dry_run,
        has_errors,
    })
}
