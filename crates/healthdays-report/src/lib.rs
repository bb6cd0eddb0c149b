//! Report generation for recoded survey data.
//!
//! This crate turns recoded records into the run's outputs:
//!
//! - **Group statistics**: healthy days per level of each factor
//! - **ANOVA**: one-way analysis of variance of healthy days on each factor
//! - **Clean table**: CSV with numeric codes or labels, or SAS Transport
//! - **JSON report**: row counts, group statistics, and tests

pub mod anova;
mod error;
mod output;
mod report;
mod stats;

pub use anova::{OneWayAnova, f_survival, one_way_anova, regularized_incomplete_beta};
pub use error::{ReportError, Result};
pub use output::{
    OutputFormat, XPT_DATASET_NAME, build_xpt_dataset, render_csv, write_clean_table,
};
pub use report::{
    Factor, FactorReport, OVERALL_LEVEL, RejectionCount, RowCounts, SurveyReport,
};
pub use stats::GroupStats;
