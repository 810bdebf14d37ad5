//! Raw CSV to normalized incident table.
//!
//! The load runs in two passes. The first pass parses every row and derives
//! every field except the duration. The second pass computes the per-class
//! duration medians, fills in missing durations, and drops rows whose
//! duration falls outside `[0, MAX_DURATION_DAYS]`.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use chrono::{Datelike as _, NaiveDateTime, Weekday};
use serde::Serialize;
use wildfire_fire_models::{
    ACRES_TO_HECTARES, DayOfWeek, GeneralCause, MAX_DURATION_DAYS, Season, SizeClass,
    StateRegions,
};
use wildfire_source_models::{IncidentTable, NormalizedIncident, RawIncident};

use crate::SourceError;
use crate::imputation::ClassMedians;
use crate::parsing::{days_between, non_empty, parse_f64, parse_timestamp};
use crate::progress::{ProgressCallback, null_progress};

/// Counters describing what a load did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    /// Data rows read from the source.
    pub rows_read: u64,
    /// Rows whose duration was imputed from the size-class median.
    pub imputed: u64,
    /// Rows dropped for an implausible duration.
    pub dropped: u64,
    /// Rows whose reported size class disagreed with the derived one.
    pub class_mismatches: u64,
}

/// A loaded table together with its [`LoadReport`].
#[derive(Debug, Clone)]
pub struct LoadedTable {
    /// The normalized incidents.
    pub table: IncidentTable,
    /// What the load did.
    pub report: LoadReport,
}

/// Reads raw incident CSVs into normalized tables.
pub struct Loader<'a> {
    regions: &'a StateRegions,
    progress: Arc<dyn ProgressCallback>,
}

/// A parsed row still waiting for its duration.
struct PendingRow {
    incident: NormalizedIncident,
    observed_duration: Option<f64>,
    class_mismatch: bool,
}

impl<'a> Loader<'a> {
    /// Creates a loader that resolves regions through `regions`.
    #[must_use]
    pub fn new(regions: &'a StateRegions) -> Self {
        Self {
            regions,
            progress: null_progress(),
        }
    }

    /// Reports per-row progress to `progress`.
    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressCallback>) -> Self {
        self.progress = progress;
        self
    }

    /// Loads a CSV file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the file cannot be read or any row fails
    /// validation.
    pub fn load_path(&self, path: &Path) -> Result<LoadedTable, SourceError> {
        log::info!("Loading incidents from {}", path.display());
        let file = File::open(path)?;
        self.load_reader(file)
    }

    /// Loads CSV content already held in memory (e.g. an uploaded file).
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if any row fails validation.
    pub fn load_bytes(&self, bytes: &[u8]) -> Result<LoadedTable, SourceError> {
        self.load_reader(bytes)
    }

    /// Loads CSV content from any reader.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the CSV is malformed, a field fails to
    /// parse, a state code is unknown, or a duration cannot be imputed.
    pub fn load_reader<R: Read>(&self, reader: R) -> Result<LoadedTable, SourceError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        self.progress.set_message("Parsing incidents".to_string());

        let mut report = LoadReport::default();
        let mut pending = Vec::new();

        for result in csv_reader.deserialize::<RawIncident>() {
            report.rows_read += 1;
            let raw = result?;
            let row = self.parse_row(report.rows_read, &raw)?;
            if row.class_mismatch {
                report.class_mismatches += 1;
            }
            pending.push(row);
            self.progress.inc(1);
        }

        let medians = ClassMedians::from_observations(
            pending
                .iter()
                .map(|row| (row.incident.size_class, row.observed_duration)),
        );

        let mut rows = Vec::with_capacity(pending.len());
        for PendingRow {
            mut incident,
            observed_duration,
            ..
        } in pending
        {
            let (duration, imputed) = medians.resolve(incident.size_class, observed_duration)?;
            if imputed {
                report.imputed += 1;
            }
            if !(0.0..=MAX_DURATION_DAYS).contains(&duration) {
                report.dropped += 1;
                continue;
            }
            incident.duration_days = duration;
            incident.duration_imputed = imputed;
            rows.push(incident);
        }

        if report.class_mismatches > 0 {
            log::warn!(
                "{} rows reported a size class that disagrees with their acreage; using the derived class",
                report.class_mismatches
            );
        }

        log::info!(
            "Loaded {} incidents from {} rows ({} durations imputed, {} implausible durations dropped)",
            rows.len(),
            report.rows_read,
            report.imputed,
            report.dropped,
        );

        self.progress
            .finish(format!("Loaded {} incidents", rows.len()));

        Ok(LoadedTable {
            table: IncidentTable::new(rows),
            report,
        })
    }

    /// Parses and derives every field of one row except the final duration.
    fn parse_row(&self, row: u64, raw: &RawIncident) -> Result<PendingRow, SourceError> {
        let incident_id = required(row, "FPA_ID", raw.fpa_id.as_ref())?.to_string();

        let discovered_at = parse_required(
            row,
            "DISCOVERY_DATE",
            raw.discovery_date.as_ref(),
            parse_timestamp,
            "expected a date such as 2004-07-15",
        )?;

        let contained_at = non_empty(raw.cont_date.as_ref())
            .map(|value| {
                parse_timestamp(value).ok_or_else(|| {
                    parse_error(row, "CONT_DATE", value, "expected a date such as 2004-07-15")
                })
            })
            .transpose()?;

        let acres = parse_required(
            row,
            "FIRE_SIZE",
            raw.fire_size.as_ref(),
            parse_f64,
            "expected a number of acres",
        )?;
        if acres < 0.0 {
            return Err(parse_error(
                row,
                "FIRE_SIZE",
                &acres.to_string(),
                "expected a non-negative area",
            ));
        }
        let size_class = SizeClass::from_acres(acres);

        let class_mismatch = match non_empty(raw.fire_size_class.as_ref()) {
            Some(value) => {
                let reported: SizeClass = value.parse().map_err(|_| {
                    parse_error(row, "FIRE_SIZE_CLASS", value, "expected a size class A-G")
                })?;
                reported != size_class
            }
            None => false,
        };

        let general_cause = GeneralCause::parse_label(raw.general_cause.as_deref().unwrap_or(""))
            .map_err(|e| {
                parse_error(
                    row,
                    "NWCG_GENERAL_CAUSE",
                    &e.label,
                    "expected an NWCG general cause",
                )
            })?;

        let code = required(row, "STATE", raw.state.as_ref())?;
        let state = self
            .regions
            .info(code)
            .ok_or_else(|| SourceError::UnknownState {
                row,
                code: code.to_string(),
            })?;

        let latitude = parse_required(
            row,
            "LATITUDE",
            raw.latitude.as_ref(),
            parse_f64,
            "expected a latitude",
        )?;
        let longitude = parse_required(
            row,
            "LONGITUDE",
            raw.longitude.as_ref(),
            parse_f64,
            "expected a longitude",
        )?;

        #[allow(clippy::cast_precision_loss)]
        let observed_duration = contained_at.map(|end| days_between(discovered_at, end) as f64);

        let month = discovered_at.month();

        Ok(PendingRow {
            incident: NormalizedIncident {
                incident_id,
                discovered_at,
                contained_at,
                year: discovered_at.year(),
                month,
                day_of_week: day_of_week(discovered_at),
                day_of_year: discovered_at.ordinal(),
                season: Season::from_month(month),
                fire_size: acres * ACRES_TO_HECTARES,
                size_class,
                general_cause,
                cause: general_cause.cause(),
                state: state.code.clone(),
                state_name: state.name.clone(),
                region: state.region,
                latitude,
                longitude,
                duration_days: 0.0,
                duration_imputed: false,
            },
            observed_duration,
            class_mismatch,
        })
    }
}

fn day_of_week(at: NaiveDateTime) -> DayOfWeek {
    match at.weekday() {
        Weekday::Mon => DayOfWeek::Monday,
        Weekday::Tue => DayOfWeek::Tuesday,
        Weekday::Wed => DayOfWeek::Wednesday,
        Weekday::Thu => DayOfWeek::Thursday,
        Weekday::Fri => DayOfWeek::Friday,
        Weekday::Sat => DayOfWeek::Saturday,
        Weekday::Sun => DayOfWeek::Sunday,
    }
}

fn parse_error(row: u64, field: &'static str, value: &str, message: &str) -> SourceError {
    SourceError::Parse {
        row,
        field,
        value: value.to_string(),
        message: message.to_string(),
    }
}

fn required<'r>(
    row: u64,
    field: &'static str,
    cell: Option<&'r String>,
) -> Result<&'r str, SourceError> {
    non_empty(cell).ok_or_else(|| parse_error(row, field, "", "missing value"))
}

fn parse_required<T>(
    row: u64,
    field: &'static str,
    cell: Option<&String>,
    parse: impl Fn(&str) -> Option<T>,
    expected: &str,
) -> Result<T, SourceError> {
    let value = required(row, field, cell)?;
    parse(value).ok_or_else(|| parse_error(row, field, value, expected))
}
