//! SAS Transport (XPT) V5 reader and writer.
//!
//! The BRFSS survey extract is distributed as a V5 transport file, and the
//! recoded table can be written back in the same format. Only single-member
//! files are supported.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use healthdays_xpt::{XptColumn, XptDataset, XptValue, XptWriterOptions, read_xpt, write_xpt};
//!
//! let survey = read_xpt(Path::new("LLCP2020.XPT")).unwrap();
//! println!("{} ({} rows)", survey.name, survey.num_rows());
//!
//! let mut out = XptDataset::with_columns("HEALTH", vec![XptColumn::numeric("HDAYS")]);
//! out.add_row(vec![XptValue::numeric(30.0)]).unwrap();
//! write_xpt(Path::new("health.xpt"), &out, XptWriterOptions::default()).unwrap();
//! ```

mod error;
pub mod float;
pub mod header;
mod options;
mod reader;
mod types;
mod writer;

pub use error::{Result, XptError};
pub use options::{XptReaderOptions, XptWriterOptions};
pub use reader::{XptReader, parse_xpt, read_xpt};
pub use types::{MissingValue, NumericValue, XptColumn, XptDataset, XptType, XptValue};
pub use writer::{XptWriter, write_xpt};
