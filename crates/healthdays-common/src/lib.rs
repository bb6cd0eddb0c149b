//! Shared utilities for the healthdays crates.
//!
//! Survey answers arrive as whatever dtype the source reader inferred
//! (integers from CSV, IBM-converted floats from SAS Transport files). The
//! helpers here turn Polars `AnyValue`s into answer codes and plain values.

pub mod lookup;
pub mod polars;

pub use lookup::CaseInsensitiveSet;

pub use polars::{CodeError, any_to_code, any_to_f64, format_numeric, parse_f64};
