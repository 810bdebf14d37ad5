#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation engine and derived-metric builder for wildfire incidents.
//!
//! Every function here is a pure transform over an immutable
//! [`IncidentTable`](wildfire_source_models::IncidentTable) or over a table
//! already derived from one. Nothing is cached and nothing is mutated, so
//! independent tables can be computed concurrently over the same input;
//! [`catalogue::build_catalogue`] does exactly that.

pub mod catalogue;
pub mod derived;
pub mod rollup;
pub mod stats;

#[cfg(test)]
mod fixtures;

use thiserror::Error;
use wildfire_analytics_models::Dimension;

pub use catalogue::{build_catalogue, build_table, state_profile};
pub use derived::{linear_regression, rolling_columns, rolling_mean, row_percentages, trend};
pub use rollup::{crosstab, regroup, regroup_with_ci, rollup, rollup_with_ci};

/// Errors raised while deriving a table. These are local to one table and
/// never invalidate the incident table or other derived tables.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Fewer than two distinct x values were given to a regression.
    #[error("Regression needs at least two distinct x values, got {distinct}")]
    Regression {
        /// Number of distinct x values supplied.
        distinct: usize,
    },

    /// A requested subset of incidents has no rows.
    #[error("No incidents for {what}")]
    EmptyGroup {
        /// Which subset was empty.
        what: String,
    },

    /// A cross-tab row sums to zero, so it cannot be normalized.
    #[error("Row '{row}' has a zero total and cannot be expressed as percentages")]
    ZeroRowTotal {
        /// The offending row key.
        row: String,
    },

    /// A rolling window of zero was requested.
    #[error("Rolling window must be at least 1, got {window}")]
    InvalidWindow {
        /// The requested window.
        window: usize,
    },

    /// A regroup named a dimension that the inner table is not grouped by.
    #[error("Cannot regroup by {dimension}: inner table is grouped by {inner}")]
    InvalidRegroup {
        /// The dimension that is not in the inner key.
        dimension: Dimension,
        /// The inner table's dimensions, for the message.
        inner: String,
    },
}
