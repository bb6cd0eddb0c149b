//! Shared types for the healthdays survey pipeline.

pub mod columns;
pub mod enums;
pub mod error;
pub mod field;
pub mod options;
pub mod record;

pub use columns::ColumnMap;
pub use enums::{DrinkingCategory, Generation, SmokingCategory};
pub use error::{ConfigError, RecodeError, Result};
pub use field::SurveyField;
pub use options::{ExecutionMode, ProcessingOptions};
pub use record::{CleanRecord, RawRecord};
