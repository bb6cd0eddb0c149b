//! Serializable run report.
//!
//! Collects the row counts from the pipeline, the healthy-day summary per
//! factor level, and the ANOVA of each factor into one structure that the CLI
//! prints and can save as JSON.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use healthdays_model::{CleanRecord, DrinkingCategory, Generation, SmokingCategory};
use healthdays_transform::RejectionTally;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::anova::{OneWayAnova, one_way_anova};
use crate::error::{ReportError, Result};
use crate::stats::GroupStats;

/// Label of the group covering every record.
pub const OVERALL_LEVEL: &str = "All";

/// A predictor the outcome is grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    Generation,
    Drinking,
    Smoking,
}

impl Factor {
    pub const ALL: [Factor; 3] = [Factor::Generation, Factor::Drinking, Factor::Smoking];

    pub fn as_str(&self) -> &'static str {
        match self {
            Factor::Generation => "generation",
            Factor::Drinking => "drinking",
            Factor::Smoking => "smoking",
        }
    }

    /// Category labels in code order.
    pub fn levels(&self) -> Vec<&'static str> {
        match self {
            Factor::Generation => Generation::ALL.iter().map(Generation::as_str).collect(),
            Factor::Drinking => DrinkingCategory::ALL
                .iter()
                .map(DrinkingCategory::as_str)
                .collect(),
            Factor::Smoking => SmokingCategory::ALL
                .iter()
                .map(SmokingCategory::as_str)
                .collect(),
        }
    }

    /// Code of the record's level for this factor.
    pub fn code_of(&self, record: &CleanRecord) -> u8 {
        match self {
            Factor::Generation => record.generation.code(),
            Factor::Drinking => record.drinking.code(),
            Factor::Smoking => record.smoking.code(),
        }
    }
}

/// Count of rows dropped for one reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectionCount {
    pub reason: String,
    pub field: String,
    pub count: usize,
}

/// Row counts of a pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowCounts {
    pub read: usize,
    pub rejected: usize,
    pub recoded: usize,
    pub invariant_violations: usize,
    pub days_passthrough: usize,
    pub rejections: Vec<RejectionCount>,
}

impl From<&RejectionTally> for RowCounts {
    fn from(tally: &RejectionTally) -> Self {
        Self {
            read: tally.seen,
            rejected: tally.rejected,
            recoded: tally.recoded,
            invariant_violations: tally.violations,
            days_passthrough: tally.days_passthrough,
            rejections: tally
                .by_reason()
                .map(|(reason, count)| RejectionCount {
                    reason: reason.label(),
                    field: reason.field().as_str().to_string(),
                    count,
                })
                .collect(),
        }
    }
}

/// Healthy-day summary and ANOVA for one factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorReport {
    pub factor: Factor,
    /// One entry per level with at least one record, in code order.
    pub groups: Vec<GroupStats>,
    /// `None` when the test cannot be run, see [`one_way_anova`].
    pub anova: Option<OneWayAnova>,
}

impl FactorReport {
    pub fn build(factor: Factor, records: &[CleanRecord]) -> Self {
        let levels = factor.levels();
        let mut samples: Vec<Vec<f64>> = vec![Vec::new(); levels.len()];
        for record in records {
            samples[usize::from(factor.code_of(record))].push(f64::from(record.healthy_days));
        }

        let groups = levels
            .iter()
            .zip(&samples)
            .filter_map(|(level, values)| GroupStats::new(*level, values))
            .collect();
        let anova = one_way_anova(factor.as_str(), &samples);
        if anova.is_none() {
            debug!(factor = factor.as_str(), "not enough variation for ANOVA");
        }

        Self {
            factor,
            groups,
            anova,
        }
    }
}

/// Everything the run produced, apart from the table itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyReport {
    /// Input file, when known.
    pub source: Option<String>,
    /// Local time the report was built (RFC 3339).
    pub generated_at: String,
    pub rows: RowCounts,
    /// Summary over every recoded record. `None` when nothing was recoded.
    pub overall: Option<GroupStats>,
    pub factors: Vec<FactorReport>,
}

impl SurveyReport {
    pub fn build(records: &[CleanRecord], tally: &RejectionTally) -> Self {
        let healthy: Vec<f64> = records.iter().map(|r| f64::from(r.healthy_days)).collect();
        Self {
            source: None,
            generated_at: chrono::Local::now().to_rfc3339(),
            rows: RowCounts::from(tally),
            overall: GroupStats::new(OVERALL_LEVEL, &healthy),
            factors: Factor::ALL
                .into_iter()
                .map(|factor| FactorReport::build(factor, records))
                .collect(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn factor(&self, factor: Factor) -> Option<&FactorReport> {
        self.factors.iter().find(|f| f.factor == factor)
    }

    /// Writes the report as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), self).map_err(|source| {
            ReportError::Json {
                path: path.to_path_buf(),
                source,
            }
        })
    }
}
