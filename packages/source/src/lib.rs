#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Wildfire incident loader and normalizer.
//!
//! [`Loader`] reads the raw incident CSV, parses timestamps, derives the
//! calendar fields, attaches regions, converts acres to hectares, imputes
//! missing durations, and drops implausible records. The output is a single
//! immutable [`IncidentTable`](wildfire_source_models::IncidentTable).
//!
//! Loading is all-or-nothing: any data integrity error aborts the load and
//! no partial table is returned.

pub mod cache;
pub mod imputation;
pub mod loader;
pub mod parsing;
pub mod progress;

use wildfire_fire_models::SizeClass;

pub use cache::{SourceKey, TableCache};
pub use loader::{LoadReport, LoadedTable, Loader};

/// Errors that can occur while loading the incident table.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// I/O error reading the source file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV itself is malformed (bad quoting, ragged rows, etc.).
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A date/time or numeric field could not be parsed.
    #[error("Parse error in row {row}, field {field}: '{value}' ({message})")]
    Parse {
        /// 1-based data row number (header excluded).
        row: u64,
        /// Source column name.
        field: &'static str,
        /// The raw cell content.
        value: String,
        /// What was expected.
        message: String,
    },

    /// A state code is missing from the region lookup.
    #[error("Unknown state code '{code}' in row {row}")]
    UnknownState {
        /// 1-based data row number (header excluded).
        row: u64,
        /// The unrecognized code.
        code: String,
    },

    /// A size class has missing durations but no observed ones to impute from.
    #[error("Cannot impute durations for size class {class}: no observed durations in that class")]
    Imputation {
        /// The size class that could not be imputed.
        class: SizeClass,
    },
}
