#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Wildfire cause taxonomy, size classes, and calendar labels.
//!
//! This crate defines the canonical categorical vocabulary used across the
//! entire wildfire-map pipeline. The loader collapses the fine-grained NWCG
//! general cause into the five [`Cause`] categories, derives [`SizeClass`]
//! from the reported acreage, and attaches a [`Region`] through the
//! [`StateRegions`] lookup.
//!
//! Every enum exposes `all()` in semantic (display) order. Downstream
//! consumers must use those lists rather than sorting labels, since month
//! and cause labels do not sort lexically into their meaningful order.

pub mod regions;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use regions::{Region, StateInfo, StateRegions};

/// Multiplier converting the source's acre measurements into hectares.
pub const ACRES_TO_HECTARES: f64 = 0.404_686;

/// Longest plausible fire duration in days. Longer fires are dropped at load.
pub const MAX_DURATION_DAYS: f64 = 200.0;

/// Two-sided z-score for a 95% confidence interval.
pub const CI_Z_95: f64 = 1.96;

/// Short month labels, January first.
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Returns the short label for a 1-based month number.
#[must_use]
pub fn month_label(month: u32) -> Option<&'static str> {
    let idx = usize::try_from(month.checked_sub(1)?).ok()?;
    MONTH_LABELS.get(idx).copied()
}

/// Normalized wildfire cause.
///
/// The fourteen NWCG general causes collapse into these five categories via
/// [`GeneralCause::cause`].
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
#[strum(ascii_case_insensitive)]
pub enum Cause {
    /// Negligence: debris burning, campfires, equipment, smoking, etc.
    #[serde(rename = "Individuals' mistake")]
    #[strum(to_string = "Individuals' mistake")]
    IndividualsMistake,
    /// Arson and incendiarism
    #[serde(rename = "Criminal")]
    #[strum(to_string = "Criminal")]
    Criminal,
    /// Power lines and railroads
    #[serde(rename = "Infrastructure accident")]
    #[strum(to_string = "Infrastructure accident")]
    InfrastructureAccident,
    /// Lightning
    #[serde(rename = "Natural (lightning)")]
    #[strum(to_string = "Natural (lightning)")]
    Natural,
    /// Missing or undetermined cause
    #[serde(rename = "Other/Unknown")]
    #[strum(to_string = "Other/Unknown")]
    OtherUnknown,
}

impl Cause {
    /// Returns all variants in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::IndividualsMistake,
            Self::Criminal,
            Self::InfrastructureAccident,
            Self::Natural,
            Self::OtherUnknown,
        ]
    }
}

/// NWCG general cause as reported in the raw incident table.
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
#[strum(ascii_case_insensitive)]
pub enum GeneralCause {
    #[serde(rename = "Power generation/transmission/distribution")]
    #[strum(to_string = "Power generation/transmission/distribution")]
    PowerGeneration,
    #[serde(rename = "Natural")]
    #[strum(to_string = "Natural")]
    Natural,
    #[serde(rename = "Debris and open burning")]
    #[strum(to_string = "Debris and open burning")]
    DebrisBurning,
    #[serde(rename = "Missing data/not specified/undetermined")]
    #[strum(to_string = "Missing data/not specified/undetermined")]
    MissingData,
    #[serde(rename = "Recreation and ceremony")]
    #[strum(to_string = "Recreation and ceremony")]
    Recreation,
    #[serde(rename = "Equipment and vehicle use")]
    #[strum(to_string = "Equipment and vehicle use")]
    EquipmentUse,
    #[serde(rename = "Arson/incendiarism")]
    #[strum(to_string = "Arson/incendiarism")]
    Arson,
    #[serde(rename = "Fireworks")]
    #[strum(to_string = "Fireworks")]
    Fireworks,
    #[serde(rename = "Other causes")]
    #[strum(to_string = "Other causes")]
    OtherCauses,
    #[serde(rename = "Railroad operations and maintenance")]
    #[strum(to_string = "Railroad operations and maintenance")]
    Railroad,
    #[serde(rename = "Smoking")]
    #[strum(to_string = "Smoking")]
    Smoking,
    #[serde(rename = "Misuse of fire by a minor")]
    #[strum(to_string = "Misuse of fire by a minor")]
    MinorMisuse,
    #[serde(rename = "Firearms and explosives use")]
    #[strum(to_string = "Firearms and explosives use")]
    Firearms,
    #[serde(rename = "Undetermined")]
    #[strum(to_string = "Undetermined")]
    Undetermined,
}

impl GeneralCause {
    /// Returns the normalized [`Cause`] this general cause collapses into.
    #[must_use]
    pub const fn cause(self) -> Cause {
        match self {
            Self::DebrisBurning
            | Self::Recreation
            | Self::EquipmentUse
            | Self::Fireworks
            | Self::OtherCauses
            | Self::Smoking
            | Self::MinorMisuse
            | Self::Firearms => Cause::IndividualsMistake,

            Self::Arson => Cause::Criminal,

            Self::PowerGeneration | Self::Railroad => Cause::InfrastructureAccident,

            Self::Natural => Cause::Natural,

            Self::MissingData | Self::Undetermined => Cause::OtherUnknown,
        }
    }

    /// Parses a raw general-cause cell.
    ///
    /// Empty cells are treated as [`Self::MissingData`].
    ///
    /// # Errors
    ///
    /// Returns an error if the label is not one of the known general causes.
    pub fn parse_label(raw: &str) -> Result<Self, InvalidLabelError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::MissingData);
        }
        trimmed.parse().map_err(|_| InvalidLabelError {
            kind: "general cause",
            label: trimmed.to_string(),
        })
    }

    /// Returns all general causes that collapse into the given [`Cause`].
    #[must_use]
    pub fn for_cause(cause: Cause) -> Vec<Self> {
        Self::all()
            .iter()
            .copied()
            .filter(|general| general.cause() == cause)
            .collect()
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::PowerGeneration,
            Self::Natural,
            Self::DebrisBurning,
            Self::MissingData,
            Self::Recreation,
            Self::EquipmentUse,
            Self::Arson,
            Self::Fireworks,
            Self::OtherCauses,
            Self::Railroad,
            Self::Smoking,
            Self::MinorMisuse,
            Self::Firearms,
            Self::Undetermined,
        ]
    }
}

/// NWCG fire size class, ordered from smallest (A) to largest (G).
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
#[strum(ascii_case_insensitive)]
pub enum SizeClass {
    /// Under 0.26 acres
    A,
    /// 0.26 to 9.9 acres
    B,
    /// 10 to 99.9 acres
    C,
    /// 100 to 299 acres
    D,
    /// 300 to 999 acres
    E,
    /// 1,000 to 4,999 acres
    F,
    /// 5,000 acres or more
    G,
}

impl SizeClass {
    /// Classifies a fire by its burnt area in acres.
    ///
    /// Monotonic: a larger fire never lands in a smaller class.
    #[must_use]
    pub fn from_acres(acres: f64) -> Self {
        if acres < 0.26 {
            Self::A
        } else if acres < 10.0 {
            Self::B
        } else if acres < 100.0 {
            Self::C
        } else if acres < 300.0 {
            Self::D
        } else if acres < 1000.0 {
            Self::E
        } else if acres < 5000.0 {
            Self::F
        } else {
            Self::G
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::A,
            Self::B,
            Self::C,
            Self::D,
            Self::E,
            Self::F,
            Self::G,
        ]
    }
}

/// Meteorological season of the discovery date.
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
#[strum(ascii_case_insensitive)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    /// Maps a 1-based month to its season (December through February is
    /// winter).
    #[must_use]
    pub const fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Self::Spring,
            6..=8 => Self::Summer,
            9..=11 => Self::Fall,
            _ => Self::Winter,
        }
    }

    /// Returns all variants in calendar order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Winter, Self::Spring, Self::Summer, Self::Fall]
    }
}

/// Day of the week, Monday first.
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
#[strum(ascii_case_insensitive)]
pub enum DayOfWeek {
    #[strum(to_string = "Mon")]
    Monday,
    #[strum(to_string = "Tue")]
    Tuesday,
    #[strum(to_string = "Wed")]
    Wednesday,
    #[strum(to_string = "Thu")]
    Thursday,
    #[strum(to_string = "Fri")]
    Friday,
    #[strum(to_string = "Sat")]
    Saturday,
    #[strum(to_string = "Sun")]
    Sunday,
}

impl DayOfWeek {
    /// Creates a day from its zero-based index counted from Monday.
    #[must_use]
    pub fn from_monday_index(index: u32) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|idx| Self::all().get(idx).copied())
    }

    /// Returns all variants, Monday first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Monday,
            Self::Tuesday,
            Self::Wednesday,
            Self::Thursday,
            Self::Friday,
            Self::Saturday,
            Self::Sunday,
        ]
    }
}

/// Error returned when a raw categorical label does not match the taxonomy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidLabelError {
    /// Which vocabulary the label was checked against.
    pub kind: &'static str,
    /// The offending label.
    pub label: String,
}

impl std::fmt::Display for InvalidLabelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown {} label '{}'", self.kind, self.label)
    }
}

impl std::error::Error for InvalidLabelError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn general_cause_parent_consistency() {
        for general in GeneralCause::all() {
            let parent = general.cause();
            let siblings = GeneralCause::for_cause(parent);
            assert!(
                siblings.contains(general),
                "{general:?} claims parent {parent:?} but isn't in for_cause result"
            );
        }
    }

    #[test]
    fn taxonomy_sizes() {
        assert_eq!(GeneralCause::all().len(), 14);
        assert_eq!(Cause::all().len(), 5);
        assert_eq!(GeneralCause::for_cause(Cause::IndividualsMistake).len(), 8);
        for cause in Cause::all() {
            assert!(
                !GeneralCause::for_cause(*cause).is_empty(),
                "{cause:?} has no general causes"
            );
        }
    }

    #[test]
    fn parses_general_cause_labels() {
        assert_eq!(
            GeneralCause::parse_label("Arson/incendiarism").unwrap(),
            GeneralCause::Arson
        );
        assert_eq!(
            GeneralCause::parse_label("  natural ").unwrap(),
            GeneralCause::Natural
        );
        assert_eq!(
            GeneralCause::parse_label("").unwrap(),
            GeneralCause::MissingData
        );
        assert!(GeneralCause::parse_label("Meteor strike").is_err());
    }

    #[test]
    fn cause_display_labels() {
        assert_eq!(Cause::IndividualsMistake.to_string(), "Individuals' mistake");
        assert_eq!(Cause::Natural.to_string(), "Natural (lightning)");
        assert_eq!(
            "other/unknown".parse::<Cause>().unwrap(),
            Cause::OtherUnknown
        );
    }

    #[test]
    fn size_class_is_monotonic() {
        let samples = [
            0.0, 0.1, 0.25, 0.26, 5.0, 9.9, 10.0, 99.9, 100.0, 299.0, 300.0, 999.0, 1000.0,
            4999.0, 5000.0, 1.0e6,
        ];
        for pair in samples.windows(2) {
            assert!(
                SizeClass::from_acres(pair[0]) <= SizeClass::from_acres(pair[1]),
                "{} -> {:?} but {} -> {:?}",
                pair[0],
                SizeClass::from_acres(pair[0]),
                pair[1],
                SizeClass::from_acres(pair[1])
            );
        }
        assert_eq!(SizeClass::from_acres(0.1), SizeClass::A);
        assert_eq!(SizeClass::from_acres(150.0), SizeClass::D);
        assert_eq!(SizeClass::from_acres(12_000.0), SizeClass::G);
    }

    #[test]
    fn season_from_month() {
        assert_eq!(Season::from_month(12), Season::Winter);
        assert_eq!(Season::from_month(1), Season::Winter);
        assert_eq!(Season::from_month(4), Season::Spring);
        assert_eq!(Season::from_month(7), Season::Summer);
        assert_eq!(Season::from_month(10), Season::Fall);
    }

    #[test]
    fn month_labels_are_calendar_ordered() {
        assert_eq!(month_label(1), Some("Jan"));
        assert_eq!(month_label(12), Some("Dec"));
        assert_eq!(month_label(0), None);
        assert_eq!(month_label(13), None);
    }

    #[test]
    fn day_of_week_index() {
        assert_eq!(DayOfWeek::from_monday_index(0), Some(DayOfWeek::Monday));
        assert_eq!(DayOfWeek::from_monday_index(6), Some(DayOfWeek::Sunday));
        assert_eq!(DayOfWeek::from_monday_index(7), None);
        assert_eq!(DayOfWeek::Saturday.to_string(), "Sat");
    }
}
