//! Survey extract ingestion.
//!
//! Loads a CSV or SAS Transport file into a Polars DataFrame and pulls the
//! five survey answers out of it as [`RawRecord`](healthdays_model::RawRecord)s.

pub mod error;
pub mod records;
pub mod source;
pub mod xpt;

pub use error::{IngestError, Result};
pub use records::{extract_raw_records, resolve_columns};
pub use source::{SourceFormat, load_survey, read_csv_frame};
pub use xpt::{dataset_to_frame, read_xpt_frame};
