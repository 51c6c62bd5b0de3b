//! Turns the raw job file into normalized [`jobmap_core::JobRecord`]s.
//!
//! [`load`] parses tabular text and attaches synthetic coordinates;
//! [`DataClient`] fetches that text from a file path or an HTTP URL.

pub mod error;
pub mod fetch;
pub mod records;

pub use error::LoadError;
pub use fetch::{DataClient, DataSource};
pub use records::{load, LoadReport, RowDiagnostic, COLUMNS};
