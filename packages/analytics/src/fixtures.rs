//! Synthetic incidents for unit tests.

use chrono::{Datelike as _, NaiveDate};
use wildfire_fire_models::{DayOfWeek, GeneralCause, Season, SizeClass, StateRegions};
use wildfire_source_models::{IncidentTable, NormalizedIncident};

/// An incident discovered on the first of `month`, with `fire_size` in
/// hectares and `duration` in days.
pub fn incident(
    year: i32,
    month: u32,
    state: &str,
    general_cause: GeneralCause,
    fire_size: f64,
    duration: f64,
) -> NormalizedIncident {
    let regions = StateRegions::default();
    let info = regions.info(state).unwrap();
    let date = NaiveDate::from_ymd_opt(year, month, 1).unwrap();

    NormalizedIncident {
        incident_id: format!("{state}-{year}-{month}-{fire_size}"),
        discovered_at: date.and_hms_opt(0, 0, 0).unwrap(),
        contained_at: None,
        year,
        month,
        day_of_week: DayOfWeek::from_monday_index(date.weekday().num_days_from_monday()).unwrap(),
        day_of_year: date.ordinal(),
        season: Season::from_month(month),
        fire_size,
        size_class: SizeClass::from_acres(fire_size / wildfire_fire_models::ACRES_TO_HECTARES),
        general_cause,
        cause: general_cause.cause(),
        state: info.code.clone(),
        state_name: info.name.clone(),
        region: info.region,
        latitude: 0.0,
        longitude: 0.0,
        duration_days: duration,
        duration_imputed: false,
    }
}

pub fn table(rows: Vec<NormalizedIncident>) -> IncidentTable {
    IncidentTable::new(rows)
}
