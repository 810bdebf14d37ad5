#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Result types for the wildfire aggregation engine.
//!
//! Every derived table is an immutable projection of the normalized
//! incident table. Tables are identified by their grouping dimensions and
//! value kind only; they carry no lifecycle of their own and are safe to
//! discard and recompute.

pub mod catalogue;
pub mod tables;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use wildfire_fire_models::{Cause, DayOfWeek, GeneralCause, Region, Season, SizeClass};

pub use catalogue::{Catalogue, CatalogueEntry, DerivedTable, StateProfile, TableName};
pub use tables::{
    CiRow, CiTable, CrossTab, PercentTable, Regression, RollingTable, RollupRow, RollupTable,
    Trend, TrendPoint,
};

/// A field of the normalized incident table that rows can be grouped by.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Dimension {
    /// Discovery year
    Year,
    /// Discovery month (1-12)
    Month,
    /// Discovery weekday
    DayOfWeek,
    /// Discovery day of year (1-366)
    DayOfYear,
    /// Discovery season
    Season,
    /// Two-letter state code
    State,
    /// Normalized cause category
    Cause,
    /// NWCG general cause
    GeneralCause,
    /// Region of the state
    Region,
    /// NWCG size class
    SizeClass,
}

impl Dimension {
    /// Returns all variants.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Year,
            Self::Month,
            Self::DayOfWeek,
            Self::DayOfYear,
            Self::Season,
            Self::State,
            Self::Cause,
            Self::GeneralCause,
            Self::Region,
            Self::SizeClass,
        ]
    }

    /// The semantic order of the dimension's categories, for dimensions with
    /// a fixed vocabulary. Open-ended dimensions (years, states, day of year)
    /// return `None`: their natural key order is already meaningful.
    #[must_use]
    pub fn display_order(self) -> Option<Vec<KeyValue>> {
        match self {
            Self::Year | Self::DayOfYear | Self::State => None,
            Self::Month => Some((1..=12).map(KeyValue::Month).collect()),
            Self::DayOfWeek => Some(
                DayOfWeek::all()
                    .iter()
                    .map(|&d| KeyValue::DayOfWeek(d))
                    .collect(),
            ),
            Self::Season => Some(Season::all().iter().map(|&s| KeyValue::Season(s)).collect()),
            Self::Cause => Some(Cause::all().iter().map(|&c| KeyValue::Cause(c)).collect()),
            Self::GeneralCause => Some(
                GeneralCause::all()
                    .iter()
                    .map(|&g| KeyValue::GeneralCause(g))
                    .collect(),
            ),
            Self::Region => Some(Region::all().iter().map(|&r| KeyValue::Region(r)).collect()),
            Self::SizeClass => Some(
                SizeClass::all()
                    .iter()
                    .map(|&s| KeyValue::SizeClass(s))
                    .collect(),
            ),
        }
    }
}

/// A typed grouping key.
///
/// Keys of the same dimension order semantically (months chronologically,
/// size classes A to G, causes in display order), so a `BTreeMap` keyed on
/// `Vec<KeyValue>` yields rows in a meaningful order without label sorting.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum KeyValue {
    /// Discovery year
    Year(i32),
    /// Month number, 1-12
    Month(u32),
    /// Weekday
    DayOfWeek(DayOfWeek),
    /// Day of year, 1-366
    DayOfYear(u32),
    /// Season
    Season(Season),
    /// State code
    State(String),
    /// Cause category
    Cause(Cause),
    /// General cause
    GeneralCause(GeneralCause),
    /// Region
    Region(Region),
    /// Size class
    SizeClass(SizeClass),
}

impl KeyValue {
    /// The dimension this key belongs to.
    #[must_use]
    pub const fn dimension(&self) -> Dimension {
        match self {
            Self::Year(_) => Dimension::Year,
            Self::Month(_) => Dimension::Month,
            Self::DayOfWeek(_) => Dimension::DayOfWeek,
            Self::DayOfYear(_) => Dimension::DayOfYear,
            Self::Season(_) => Dimension::Season,
            Self::State(_) => Dimension::State,
            Self::Cause(_) => Dimension::Cause,
            Self::GeneralCause(_) => Dimension::GeneralCause,
            Self::Region(_) => Dimension::Region,
            Self::SizeClass(_) => Dimension::SizeClass,
        }
    }

    /// The year, if this is a year key.
    #[must_use]
    pub const fn as_year(&self) -> Option<i32> {
        match self {
            Self::Year(year) => Some(*year),
            _ => None,
        }
    }
}

impl std::fmt::Display for KeyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Year(year) => write!(f, "{year}"),
            Self::Month(month) => match wildfire_fire_models::month_label(*month) {
                Some(label) => f.write_str(label),
                None => write!(f, "{month}"),
            },
            Self::DayOfWeek(day) => write!(f, "{day}"),
            Self::DayOfYear(day) => write!(f, "{day}"),
            Self::Season(season) => write!(f, "{season}"),
            Self::State(state) => f.write_str(state),
            Self::Cause(cause) => write!(f, "{cause}"),
            Self::GeneralCause(cause) => write!(f, "{cause}"),
            Self::Region(region) => write!(f, "{region}"),
            Self::SizeClass(class) => write!(f, "{class}"),
        }
    }
}

/// A numeric column that can be aggregated.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ValueColumn {
    /// Burnt area in hectares
    FireSize,
    /// Days from discovery to containment
    Duration,
    /// Latitude
    Latitude,
    /// Longitude
    Longitude,
}

impl ValueColumn {
    /// Unit suffix for axis labels.
    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Self::FireSize => "ha",
            Self::Duration => "days",
            Self::Latitude | Self::Longitude => "deg",
        }
    }
}

/// Aggregate computed per group.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Statistic {
    /// Number of rows in the group
    Count,
    /// Sum of the value column
    Sum,
    /// Arithmetic mean of the value column
    Mean,
}

/// Default trailing window, in years, for rolling series.
pub const DEFAULT_ROLLING_WINDOW: usize = 10;

/// Tunables for the table catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct AnalysisConfig {
    /// Window size for the rolling fires-by-region series.
    pub rolling_window: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            rolling_window: DEFAULT_ROLLING_WINDOW,
        }
    }
}

impl AnalysisConfig {
    /// Sets the rolling window.
    #[must_use]
    pub const fn with_rolling_window(mut self, window: usize) -> Self {
        self.rolling_window = window;
        self
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    #[test]
    fn month_keys_order_chronologically() {
        let mut keys = vec![KeyValue::Month(12), KeyValue::Month(2), KeyValue::Month(10)];
        keys.sort();
        assert_eq!(
            keys,
            vec![KeyValue::Month(2), KeyValue::Month(10), KeyValue::Month(12)]
        );
        assert_eq!(KeyValue::Month(2).to_string(), "Feb");
    }

    #[test]
    fn cause_keys_order_by_declaration() {
        let mut keys = vec![
            KeyValue::Cause(Cause::OtherUnknown),
            KeyValue::Cause(Cause::IndividualsMistake),
            KeyValue::Cause(Cause::Natural),
        ];
        keys.sort();
        assert_eq!(keys[0], KeyValue::Cause(Cause::IndividualsMistake));
        assert_eq!(keys[2], KeyValue::Cause(Cause::OtherUnknown));
    }

    #[test]
    fn display_order_covers_fixed_vocabularies() {
        assert_eq!(Dimension::Month.display_order().unwrap().len(), 12);
        assert_eq!(Dimension::Region.display_order().unwrap().len(), 10);
        assert_eq!(Dimension::SizeClass.display_order().unwrap().len(), 7);
        assert!(Dimension::Year.display_order().is_none());
        for dimension in Dimension::all() {
            if let Some(order) = dimension.display_order() {
                assert!(order.iter().all(|key| key.dimension() == *dimension));
            }
        }
    }

    #[test]
    fn key_values_serialize_untagged() {
        let json = serde_json::to_string(&vec![
            KeyValue::Year(2001),
            KeyValue::State("CA".to_string()),
            KeyValue::SizeClass(SizeClass::C),
        ])
        .unwrap();
        assert_eq!(json, r#"[2001,"CA","C"]"#);
    }

    #[test]
    fn dimension_parses_snake_case() {
        assert_eq!(Dimension::from_str("size_class").unwrap(), Dimension::SizeClass);
        assert_eq!(ValueColumn::from_str("FIRE_SIZE").unwrap(), ValueColumn::FireSize);
    }

    #[test]
    fn config_defaults_fill_missing_fields() {
        let config: AnalysisConfig = toml::from_str("").unwrap();
        assert_eq!(config.rolling_window, DEFAULT_ROLLING_WINDOW);

        let config: AnalysisConfig = toml::from_str("rolling_window = 5").unwrap();
        assert_eq!(config.rolling_window, 5);
    }
}
