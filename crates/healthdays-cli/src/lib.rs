//! CLI library components for the healthdays tool.

pub mod logging;
pub mod pipeline;
