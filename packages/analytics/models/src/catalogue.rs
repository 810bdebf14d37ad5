//! The named table catalogue handed to the presentation layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use wildfire_fire_models::Region;

use crate::{CiTable, CrossTab, PercentTable, RollingTable, RollupTable, Trend};

/// Every table the catalogue produces.
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
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum TableName {
    FiresByYear,
    FiresByYearAndMonth,
    FiresByDayOfWeekAndYear,
    MeanFireSizeByYear,
    TotalFireSizeByYear,
    MeanFireSizeByYearAndState,
    TotalFireSizeByYearAndState,
    MeanFireSizeByState,
    FireSizeByMonthCi,
    DurationByMonthCi,
    FireSizeByMonthAndCauseCi,
    DurationByMonthAndCauseCi,
    FiresByMonthAndCauseCi,
    FiresByMonthAndHumanCauseCi,
    SizeClassByCausePercent,
    RegionByCausePercent,
    FiresByYearAndRegion,
    FireSizeTrend,
    DurationTrend,
    MeanDurationByYear,
    MeanDurationByState,
    MeanDurationByYearAndState,
    MeanFireSizeByYearAndCause,
    MeanDurationByYearAndCause,
    FiresByYearAndCause,
    MeanFiresPerYearByState,
    MeanFireSizeByDayOfWeekAndCause,
    FiresByYearAndRegionRolling,
}

impl TableName {
    /// Returns all variants in catalogue order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::FiresByYear,
            Self::FiresByYearAndMonth,
            Self::FiresByDayOfWeekAndYear,
            Self::MeanFireSizeByYear,
            Self::TotalFireSizeByYear,
            Self::MeanFireSizeByYearAndState,
            Self::TotalFireSizeByYearAndState,
            Self::MeanFireSizeByState,
            Self::FireSizeByMonthCi,
            Self::DurationByMonthCi,
            Self::FireSizeByMonthAndCauseCi,
            Self::DurationByMonthAndCauseCi,
            Self::FiresByMonthAndCauseCi,
            Self::FiresByMonthAndHumanCauseCi,
            Self::SizeClassByCausePercent,
            Self::RegionByCausePercent,
            Self::FiresByYearAndRegion,
            Self::FireSizeTrend,
            Self::DurationTrend,
            Self::MeanDurationByYear,
            Self::MeanDurationByState,
            Self::MeanDurationByYearAndState,
            Self::MeanFireSizeByYearAndCause,
            Self::MeanDurationByYearAndCause,
            Self::FiresByYearAndCause,
            Self::MeanFiresPerYearByState,
            Self::MeanFireSizeByDayOfWeekAndCause,
            Self::FiresByYearAndRegionRolling,
        ]
    }

    /// Human-readable title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::FiresByYear => "Number of fires per year",
            Self::FiresByYearAndMonth => "Number of fires per month, by year",
            Self::FiresByDayOfWeekAndYear => "Number of fires per weekday, by year",
            Self::MeanFireSizeByYear => "Mean fire size per year",
            Self::TotalFireSizeByYear => "Total burnt area per year",
            Self::MeanFireSizeByYearAndState => "Mean fire size per year and state",
            Self::TotalFireSizeByYearAndState => "Total burnt area per year and state",
            Self::MeanFireSizeByState => "Mean fire size per state (average of yearly means)",
            Self::FireSizeByMonthCi => "Mean fire size per month with 95% CI",
            Self::DurationByMonthCi => "Mean fire duration per month with 95% CI",
            Self::FireSizeByMonthAndCauseCi => "Mean fire size per month and cause with 95% CI",
            Self::DurationByMonthAndCauseCi => {
                "Mean fire duration per month and cause with 95% CI"
            }
            Self::FiresByMonthAndCauseCi => {
                "Mean number of fires per month and cause over years with 95% CI"
            }
            Self::FiresByMonthAndHumanCauseCi => {
                "Mean number of human-caused fires per month and detailed cause with 95% CI"
            }
            Self::SizeClassByCausePercent => "Share of causes within each size class",
            Self::RegionByCausePercent => "Share of causes within each region",
            Self::FiresByYearAndRegion => "Number of fires per year and region",
            Self::FireSizeTrend => "Trend of mean fire size over years",
            Self::DurationTrend => "Trend of mean fire duration over years",
            Self::MeanDurationByYear => "Mean fire duration per year",
            Self::MeanDurationByState => "Mean fire duration per state (average of yearly means)",
            Self::MeanDurationByYearAndState => "Mean fire duration per year and state",
            Self::MeanFireSizeByYearAndCause => "Mean fire size per year and cause",
            Self::MeanDurationByYearAndCause => "Mean fire duration per year and cause",
            Self::FiresByYearAndCause => "Number of fires per year and cause",
            Self::MeanFiresPerYearByState => "Mean number of fires per year, by state",
            Self::MeanFireSizeByDayOfWeekAndCause => "Mean fire size per weekday and cause",
            Self::FiresByYearAndRegionRolling => "Rolling mean of fires per year and region",
        }
    }
}

/// Any derived table, tagged by shape for JSON consumers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DerivedTable {
    Rollup(RollupTable),
    Ci(CiTable),
    CrossTab(CrossTab),
    Percent(PercentTable),
    Rolling(RollingTable),
    Trend(Trend),
}

/// Outcome of building one named table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CatalogueEntry {
    /// The table was built.
    Available {
        /// The table.
        table: DerivedTable,
    },
    /// The table could not be built from this input. Other tables are
    /// unaffected.
    Unavailable {
        /// Why the builder failed.
        reason: String,
    },
}

impl CatalogueEntry {
    /// The table, if it was built.
    #[must_use]
    pub const fn table(&self) -> Option<&DerivedTable> {
        match self {
            Self::Available { table } => Some(table),
            Self::Unavailable { .. } => None,
        }
    }
}

/// Every named table computed from one incident table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalogue {
    /// Entries keyed by table name.
    pub entries: BTreeMap<TableName, CatalogueEntry>,
}

impl Catalogue {
    /// Entry for `name`.
    #[must_use]
    pub fn get(&self, name: TableName) -> Option<&CatalogueEntry> {
        self.entries.get(&name)
    }

    /// The built table for `name`, if available.
    #[must_use]
    pub fn table(&self, name: TableName) -> Option<&DerivedTable> {
        self.get(name).and_then(CatalogueEntry::table)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalogue has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names of the tables that could not be built.
    #[must_use]
    pub fn unavailable(&self) -> Vec<TableName> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.table().is_none())
            .map(|(name, _)| *name)
            .collect()
    }
}

/// Tables for a single state's detail page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateProfile {
    /// Two-letter code.
    pub state: String,
    /// Full state name.
    pub state_name: String,
    /// Region of the state.
    pub region: Region,
    /// Number of incidents in the state.
    pub incidents: usize,
    /// Fires per year and cause.
    pub fires_by_year_and_cause: CrossTab,
    /// Fires per year and month.
    pub fires_by_year_and_month: CrossTab,
    /// Total burnt area per year.
    pub total_fire_size_by_year: RollupTable,
    /// Cause shares within each year.
    pub cause_percent_by_year: PercentTable,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    #[test]
    fn names_round_trip_kebab_case() {
        for name in TableName::all() {
            let label = name.to_string();
            assert!(!label.contains('_'));
            assert_eq!(TableName::from_str(&label).unwrap(), *name);
        }
        assert_eq!(TableName::FireSizeByMonthCi.as_ref(), "fire-size-by-month-ci");
    }

    #[test]
    fn names_are_distinct() {
        let mut labels: Vec<String> = TableName::all().iter().map(ToString::to_string).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), TableName::all().len());
    }

    #[test]
    fn entries_serialize_with_status_tag() {
        let mut catalogue = Catalogue::default();
        catalogue.entries.insert(
            TableName::FireSizeTrend,
            CatalogueEntry::Unavailable {
                reason: "no trend".to_string(),
            },
        );
        let json = serde_json::to_value(&catalogue).unwrap();
        assert_eq!(json["entries"]["fire-size-trend"]["status"], "unavailable");
        assert_eq!(catalogue.unavailable(), vec![TableName::FireSizeTrend]);
    }
}
