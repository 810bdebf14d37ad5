#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Raw and normalized wildfire incident records.
//!
//! The loader reads [`RawIncident`] rows straight from the source CSV and
//! turns them into [`NormalizedIncident`] records. The full set of
//! normalized rows is wrapped in an immutable [`IncidentTable`], the single
//! source of truth that every rollup reads from.

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use wildfire_fire_models::{Cause, DayOfWeek, GeneralCause, Region, Season, SizeClass};

/// One row of the source CSV, exactly as read.
///
/// Every field is kept as text so the loader can report which field of which
/// row failed to parse. Columns not listed here are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawIncident {
    /// Unique incident identifier.
    #[serde(rename = "FPA_ID", default)]
    pub fpa_id: Option<String>,
    /// Discovery date, optionally with a time component.
    #[serde(rename = "DISCOVERY_DATE", default)]
    pub discovery_date: Option<String>,
    /// Containment date. Frequently empty.
    #[serde(rename = "CONT_DATE", default)]
    pub cont_date: Option<String>,
    /// Burnt area in acres.
    #[serde(rename = "FIRE_SIZE", default)]
    pub fire_size: Option<String>,
    /// Size class letter as reported by the source. Optional.
    #[serde(rename = "FIRE_SIZE_CLASS", default)]
    pub fire_size_class: Option<String>,
    /// NWCG general cause label.
    #[serde(rename = "NWCG_GENERAL_CAUSE", default)]
    pub general_cause: Option<String>,
    /// Two-letter state code.
    #[serde(rename = "STATE", default)]
    pub state: Option<String>,
    /// Latitude (WGS84).
    #[serde(rename = "LATITUDE", default)]
    pub latitude: Option<String>,
    /// Longitude (WGS84).
    #[serde(rename = "LONGITUDE", default)]
    pub longitude: Option<String>,
}

/// A wildfire incident with all derived fields attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedIncident {
    /// Original incident identifier.
    pub incident_id: String,
    /// When the fire was discovered.
    pub discovered_at: NaiveDateTime,
    /// When the fire was contained, if reported.
    pub contained_at: Option<NaiveDateTime>,
    /// Discovery year.
    pub year: i32,
    /// Discovery month, 1-12.
    pub month: u32,
    /// Discovery day of week.
    pub day_of_week: DayOfWeek,
    /// Discovery day of year, 1-366.
    pub day_of_year: u32,
    /// Discovery season.
    pub season: Season,
    /// Burnt area in hectares.
    pub fire_size: f64,
    /// Size class derived from the reported acreage.
    pub size_class: SizeClass,
    /// Fine-grained NWCG general cause.
    pub general_cause: GeneralCause,
    /// Normalized cause category.
    pub cause: Cause,
    /// Two-letter state code.
    pub state: String,
    /// Full state name.
    pub state_name: String,
    /// Region looked up from the state code.
    pub region: Region,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Days between discovery and containment, or the size-class median
    /// when containment was not reported.
    pub duration_days: f64,
    /// Whether [`Self::duration_days`] was imputed.
    pub duration_imputed: bool,
}

/// The immutable normalized incident table.
///
/// Cloning is cheap: clones share the same underlying rows. There is no way
/// to mutate rows in place; [`Self::filter`] returns a new table.
#[derive(Debug, Clone, Default)]
pub struct IncidentTable {
    rows: Arc<[NormalizedIncident]>,
}

impl IncidentTable {
    /// Wraps normalized rows into a table.
    #[must_use]
    pub fn new(rows: Vec<NormalizedIncident>) -> Self {
        Self { rows: rows.into() }
    }

    /// Number of incidents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no incidents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates incidents in load order.
    pub fn iter(&self) -> std::slice::Iter<'_, NormalizedIncident> {
        self.rows.iter()
    }

    /// Borrows all incidents as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[NormalizedIncident] {
        &self.rows
    }

    /// Returns a new table holding only the incidents that match.
    #[must_use]
    pub fn filter(&self, predicate: impl Fn(&NormalizedIncident) -> bool) -> Self {
        Self::new(self.rows.iter().filter(|row| predicate(row)).cloned().collect())
    }

    /// Distinct discovery years, ascending.
    #[must_use]
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.rows.iter().map(|row| row.year).collect();
        years.sort_unstable();
        years.dedup();
        years
    }

    /// Whether two handles share the same underlying rows.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.rows, &other.rows)
    }
}

impl<'a> IntoIterator for &'a IncidentTable {
    type Item = &'a NormalizedIncident;
    type IntoIter = std::slice::Iter<'a, NormalizedIncident>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<NormalizedIncident> for IncidentTable {
    fn from_iter<T: IntoIterator<Item = NormalizedIncident>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn incident(id: &str, year: i32, state: &str) -> NormalizedIncident {
        let discovered_at = NaiveDate::from_ymd_opt(year, 6, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        NormalizedIncident {
            incident_id: id.to_string(),
            discovered_at,
            contained_at: None,
            year,
            month: 6,
            day_of_week: DayOfWeek::Monday,
            day_of_year: 152,
            season: Season::Summer,
            fire_size: 1.0,
            size_class: SizeClass::B,
            general_cause: GeneralCause::Natural,
            cause: Cause::Natural,
            state: state.to_string(),
            state_name: String::new(),
            region: Region::SouthWest,
            latitude: 0.0,
            longitude: 0.0,
            duration_days: 1.0,
            duration_imputed: false,
        }
    }

    #[test]
    fn filter_returns_new_table() {
        let table: IncidentTable = vec![
            incident("a", 2001, "CA"),
            incident("b", 2000, "TX"),
            incident("c", 2001, "CA"),
        ]
        .into_iter()
        .collect();

        let ca = table.filter(|row| row.state == "CA");
        assert_eq!(ca.len(), 2);
        assert_eq!(table.len(), 3);
        assert!(!ca.ptr_eq(&table));
    }

    #[test]
    fn years_are_sorted_and_distinct() {
        let table = IncidentTable::new(vec![
            incident("a", 2003, "CA"),
            incident("b", 2001, "CA"),
            incident("c", 2003, "CA"),
        ]);
        assert_eq!(table.years(), vec![2001, 2003]);
    }

    #[test]
    fn clones_share_rows() {
        let table = IncidentTable::new(vec![incident("a", 2000, "CA")]);
        let clone = table.clone();
        assert!(clone.ptr_eq(&table));
    }
}
