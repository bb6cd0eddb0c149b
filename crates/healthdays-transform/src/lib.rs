//! Filtering and recoding of raw survey records.
//!
//! A raw record first goes through [`screen`], which drops rows that cannot
//! be scored. Surviving rows go through [`recode`], which turns the overloaded
//! survey codes into a healthy-day count and three categorical predictors.
//! [`pipeline`] chains the two over many records, and [`frame`] turns the
//! result into a Polars DataFrame.

pub mod filter;
pub mod frame;
pub mod pipeline;
pub mod recode;

pub use filter::{RejectReason, Rejection, screen};
pub use frame::{CleanFrame, CodingStyle, FrameError};
pub use pipeline::{PipelineOutput, RecodeExt, RecodeIter, RejectionTally, run_pipeline};
pub use recode::{
    SMOKING_REMAP, drinking_category, generation, healthy_days, is_days_passthrough,
    normalize_days_drank, recode, remap_smoking, smoking_category, weekly_drinks,
};
