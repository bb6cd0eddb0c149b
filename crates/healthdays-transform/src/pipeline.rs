//! Filter and recoder chained over many records.
//!
//! [`RecodeIter`] is the lazy form: it pulls raw records one at a time,
//! skips rejected ones, and yields recoded records or invariant violations.
//! [`run_pipeline`] drives a whole slice either through that iterator or
//! across the rayon pool, and returns the same records in the same order
//! either way.

use std::collections::BTreeMap;

use healthdays_model::{
    CleanRecord, ExecutionMode, ProcessingOptions, RawRecord, RecodeError, SurveyField,
};
use rayon::prelude::*;
use tracing::{debug, error, trace, warn};

use crate::filter::{RejectReason, Rejection, screen};
use crate::recode::{is_days_passthrough, recode};

const REDACTED_VALUE: &str = "[REDACTED]";

/// Counts kept while records move through the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RejectionTally {
    pub seen: usize,
    pub rejected: usize,
    pub recoded: usize,
    pub violations: usize,
    /// Accepted rows whose days-drank code was outside every known unit
    /// range and was used unchanged.
    pub days_passthrough: usize,
    by_reason: BTreeMap<RejectReason, usize>,
}

impl RejectionTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows dropped for `reason`. A row with several reasons counts once
    /// under each.
    pub fn count(&self, reason: RejectReason) -> usize {
        self.by_reason.get(&reason).copied().unwrap_or(0)
    }

    /// Reasons with a non-zero count, in a stable order.
    pub fn by_reason(&self) -> impl Iterator<Item = (RejectReason, usize)> + '_ {
        self.by_reason.iter().map(|(reason, count)| (*reason, *count))
    }

    fn record_rejection(&mut self, rejection: &Rejection) {
        self.rejected += 1;
        for reason in &rejection.reasons {
            *self.by_reason.entry(*reason).or_insert(0) += 1;
        }
    }

    /// Counts and logs an outcome, returning what the caller should yield.
    fn observe(
        &mut self,
        outcome: Outcome,
        log_data: bool,
    ) -> Option<Result<CleanRecord, RecodeError>> {
        self.seen += 1;
        match outcome {
            Outcome::Rejected(rejection) => {
                let reasons: Vec<String> =
                    rejection.reasons.iter().map(RejectReason::label).collect();
                trace!(row = rejection.row, reasons = ?reasons, "record rejected");
                self.record_rejection(&rejection);
                None
            }
            Outcome::Recoded {
                record,
                days_passthrough,
            } => {
                if let Some(days) = days_passthrough {
                    self.days_passthrough += 1;
                    warn!(
                        row = record.row,
                        field = %SurveyField::DaysDrankLast30,
                        value = %shown(days, log_data),
                        "days drank code outside known unit ranges, used unchanged"
                    );
                }
                self.recoded += 1;
                Some(Ok(record))
            }
            Outcome::Violation(err) => {
                self.violations += 1;
                error!(row = err.row(), field = %err.field(), "{err}");
                Some(Err(err))
            }
        }
    }
}

/// One record after screening and recoding.
enum Outcome {
    Rejected(Rejection),
    Recoded {
        record: CleanRecord,
        days_passthrough: Option<u16>,
    },
    Violation(RecodeError),
}

fn process(record: &RawRecord) -> Outcome {
    if let Err(rejection) = screen(record) {
        return Outcome::Rejected(rejection);
    }
    match recode(record) {
        Ok(clean) => Outcome::Recoded {
            record: clean,
            days_passthrough: record
                .days_drank_last_30
                .filter(|days| is_days_passthrough(*days)),
        },
        Err(err) => Outcome::Violation(err),
    }
}

fn shown(value: u16, log_data: bool) -> String {
    if log_data {
        value.to_string()
    } else {
        REDACTED_VALUE.to_string()
    }
}

/// Lazy filter and recode over raw records.
///
/// Rejected records are skipped and counted. Records that pass the filter
/// but fail the recoder are yielded as errors so the caller decides whether
/// to stop.
pub struct RecodeIter<I> {
    inner: I,
    tally: RejectionTally,
    log_data: bool,
}

impl<I> RecodeIter<I>
where
    I: Iterator<Item = RawRecord>,
{
    pub fn new(inner: I) -> Self {
        Self {
            inner,
            tally: RejectionTally::new(),
            log_data: false,
        }
    }

    /// Show raw values in passthrough warnings instead of redacting them.
    pub fn with_log_data(mut self, log_data: bool) -> Self {
        self.log_data = log_data;
        self
    }

    /// Counts so far.
    pub fn tally(&self) -> &RejectionTally {
        &self.tally
    }

    pub fn into_tally(self) -> RejectionTally {
        self.tally
    }
}

impl<I> Iterator for RecodeIter<I>
where
    I: Iterator<Item = RawRecord>,
{
    type Item = Result<CleanRecord, RecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let raw = self.inner.next()?;
            if let Some(item) = self.tally.observe(process(&raw), self.log_data) {
                return Some(item);
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.inner.size_hint().1)
    }
}

/// Adds [`recoded`](RecodeExt::recoded) to any iterator of raw records.
pub trait RecodeExt: Iterator<Item = RawRecord> + Sized {
    fn recoded(self) -> RecodeIter<Self> {
        RecodeIter::new(self)
    }
}

impl<I: Iterator<Item = RawRecord>> RecodeExt for I {}

/// Result of running the pipeline over a whole extract.
#[derive(Debug, Clone, Default)]
pub struct PipelineOutput {
    /// Recoded records in source order.
    pub records: Vec<CleanRecord>,
    /// Invariant violations in source order. Empty when `fail_fast` is set,
    /// since the first one aborts the run.
    pub violations: Vec<RecodeError>,
    pub tally: RejectionTally,
}

impl PipelineOutput {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Filters and recodes every record.
///
/// With `fail_fast` the first invariant violation (lowest row) is returned
/// as the error. Otherwise violations are collected into the output.
pub fn run_pipeline(
    records: &[RawRecord],
    options: &ProcessingOptions,
) -> Result<PipelineOutput, RecodeError> {
    debug!(
        records = records.len(),
        mode = options.mode.as_str(),
        fail_fast = options.fail_fast,
        "running recode pipeline"
    );

    let output = match options.mode {
        ExecutionMode::Sequential => run_sequential(records, options)?,
        ExecutionMode::Parallel => run_parallel(records, options)?,
    };

    debug!(
        seen = output.tally.seen,
        rejected = output.tally.rejected,
        recoded = output.tally.recoded,
        violations = output.tally.violations,
        "recode pipeline finished"
    );
    Ok(output)
}

fn run_sequential(
    records: &[RawRecord],
    options: &ProcessingOptions,
) -> Result<PipelineOutput, RecodeError> {
    let mut iter = records.iter().copied().recoded().with_log_data(options.log_data);
    let mut output = PipelineOutput::default();
    for item in iter.by_ref() {
        match item {
            Ok(record) => output.records.push(record),
            Err(err) if options.fail_fast => return Err(err),
            Err(err) => output.violations.push(err),
        }
    }
    output.tally = iter.into_tally();
    Ok(output)
}

fn run_parallel(
    records: &[RawRecord],
    options: &ProcessingOptions,
) -> Result<PipelineOutput, RecodeError> {
    let outcomes: Vec<Outcome> = records.par_iter().map(process).collect();

    // Logging and counting happen here, in source order.
    let mut output = PipelineOutput::default();
    let mut tally = RejectionTally::new();
    for outcome in outcomes {
        match tally.observe(outcome, options.log_data) {
            Some(Ok(record)) => output.records.push(record),
            Some(Err(err)) if options.fail_fast => return Err(err),
            Some(Err(err)) => output.violations.push(err),
            None => {}
        }
    }
    output.tally = tally;
    Ok(output)
}
