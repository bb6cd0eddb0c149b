//! Configuration options for the recoding pipeline.

use serde::{Deserialize, Serialize};

/// How records move through the filter and recoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// One lazy pass over the records.
    #[default]
    Sequential,
    /// Records split across the rayon thread pool. Output order is unchanged.
    Parallel,
}

impl ExecutionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::Sequential => "sequential",
            ExecutionMode::Parallel => "parallel",
        }
    }
}

/// Options controlling pipeline behavior.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessingOptions {
    pub mode: ExecutionMode,

    /// Stop at the first invariant violation instead of collecting them all.
    pub fail_fast: bool,

    /// Show the raw days-drank code in the passthrough warning.
    ///
    /// Off by default: the warning logs `[REDACTED]` in its place. No other
    /// log event carries respondent answers.
    pub log_data: bool,
}

impl ProcessingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    pub fn with_log_data(mut self, log_data: bool) -> Self {
        self.log_data = log_data;
        self
    }
}
