//! State to region lookup.
//!
//! Every two-letter state code in [`STATES`] (the 50 states, DC, and
//! Puerto Rico) maps to exactly one of the ten [`Region`] labels. The loader
//! treats a code missing from the lookup as a hard error rather than a
//! silently dropped row.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Geographic region of the United States used for regional rollups.
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
pub enum Region {
    East,
    West,
    North,
    South,
    Center,
    #[serde(rename = "North-East")]
    #[strum(to_string = "North-East")]
    NorthEast,
    #[serde(rename = "North-West")]
    #[strum(to_string = "North-West")]
    NorthWest,
    #[serde(rename = "South-East")]
    #[strum(to_string = "South-East")]
    SouthEast,
    #[serde(rename = "South-West")]
    #[strum(to_string = "South-West")]
    SouthWest,
    Tropical,
}

impl Region {
    /// Returns all variants in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::East,
            Self::West,
            Self::North,
            Self::South,
            Self::Center,
            Self::NorthEast,
            Self::NorthWest,
            Self::SouthEast,
            Self::SouthWest,
            Self::Tropical,
        ]
    }
}

/// Built-in `(code, full name, region)` rows.
pub const STATES: &[(&str, &str, Region)] = &[
    ("AL", "Alabama", Region::SouthEast),
    ("AK", "Alaska", Region::North),
    ("AZ", "Arizona", Region::SouthWest),
    ("AR", "Arkansas", Region::Center),
    ("CA", "California", Region::SouthWest),
    ("CO", "Colorado", Region::Center),
    ("CT", "Connecticut", Region::NorthEast),
    ("DE", "Delaware", Region::NorthEast),
    ("DC", "District of Columbia", Region::NorthEast),
    ("FL", "Florida", Region::SouthEast),
    ("GA", "Georgia", Region::SouthEast),
    ("HI", "Hawaii", Region::Tropical),
    ("ID", "Idaho", Region::NorthWest),
    ("IL", "Illinois", Region::Center),
    ("IN", "Indiana", Region::NorthEast),
    ("IA", "Iowa", Region::Center),
    ("KS", "Kansas", Region::Center),
    ("KY", "Kentucky", Region::East),
    ("LA", "Louisiana", Region::SouthEast),
    ("ME", "Maine", Region::NorthEast),
    ("MD", "Maryland", Region::NorthEast),
    ("MA", "Massachusetts", Region::NorthEast),
    ("MI", "Michigan", Region::NorthEast),
    ("MN", "Minnesota", Region::North),
    ("MS", "Mississippi", Region::SouthEast),
    ("MO", "Missouri", Region::Center),
    ("MT", "Montana", Region::NorthWest),
    ("NE", "Nebraska", Region::Center),
    ("NV", "Nevada", Region::West),
    ("NH", "New Hampshire", Region::NorthEast),
    ("NJ", "New Jersey", Region::NorthEast),
    ("NM", "New Mexico", Region::South),
    ("NY", "New York", Region::NorthEast),
    ("NC", "North Carolina", Region::East),
    ("ND", "North Dakota", Region::North),
    ("OH", "Ohio", Region::NorthEast),
    ("OK", "Oklahoma", Region::South),
    ("OR", "Oregon", Region::NorthWest),
    ("PA", "Pennsylvania", Region::NorthEast),
    ("PR", "Puerto Rico", Region::Tropical),
    ("RI", "Rhode Island", Region::NorthEast),
    ("SC", "South Carolina", Region::East),
    ("SD", "South Dakota", Region::North),
    ("TN", "Tennessee", Region::East),
    ("TX", "Texas", Region::South),
    ("UT", "Utah", Region::West),
    ("VT", "Vermont", Region::NorthEast),
    ("VA", "Virginia", Region::East),
    ("WA", "Washington", Region::NorthWest),
    ("WV", "West Virginia", Region::NorthEast),
    ("WI", "Wisconsin", Region::North),
    ("WY", "Wyoming", Region::NorthWest),
];

/// One row of the state lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateInfo {
    /// Two-letter state code (e.g. "CA").
    pub code: String,
    /// Full state name (e.g. "California").
    pub name: String,
    /// Region the state belongs to.
    pub region: Region,
}

/// Immutable state code lookup passed explicitly into the loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateRegions {
    states: BTreeMap<String, StateInfo>,
}

impl StateRegions {
    /// Builds a lookup from `(code, name, region)` rows. Codes are stored
    /// uppercase; a later duplicate replaces an earlier one.
    #[must_use]
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = (&'a str, &'a str, Region)>) -> Self {
        let states = rows
            .into_iter()
            .map(|(code, name, region)| {
                let code = code.trim().to_uppercase();
                (
                    code.clone(),
                    StateInfo {
                        code,
                        name: name.to_string(),
                        region,
                    },
                )
            })
            .collect();

        Self { states }
    }

    /// Looks up the full lookup row for a state code (case-insensitive).
    #[must_use]
    pub fn info(&self, code: &str) -> Option<&StateInfo> {
        let key = code.trim();
        self.states
            .get(key)
            .or_else(|| self.states.get(&key.to_uppercase()))
    }

    /// Iterates rows ordered by state code.
    pub fn iter(&self) -> impl Iterator<Item = &StateInfo> {
        self.states.values()
    }

    /// Number of state codes in the lookup.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether the lookup is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl Default for StateRegions {
    fn default() -> Self {
        Self::from_rows(STATES.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_lookup_is_total() {
        let lookup = StateRegions::default();
        assert_eq!(lookup.len(), 52);
        for (code, _, region) in STATES {
            let found = lookup.info(code).map(|info| info.region);
            assert_eq!(found, Some(*region), "{code} resolved to {found:?}");
            assert!(Region::all().contains(&found.unwrap()));
        }
    }

    #[test]
    fn every_region_is_used() {
        for region in Region::all() {
            assert!(
                STATES.iter().any(|(_, _, r)| r == region),
                "{region:?} has no states"
            );
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let lookup = StateRegions::default();
        assert_eq!(lookup.info("ca").unwrap().region, Region::SouthWest);
        assert_eq!(lookup.info(" tx ").unwrap().region, Region::South);
        assert_eq!(lookup.info("pr").unwrap().name, "Puerto Rico");
    }

    #[test]
    fn unknown_code_is_absent() {
        let lookup = StateRegions::default();
        assert!(lookup.info("ZZ").is_none());
        assert!(lookup.info("").is_none());
    }

    #[test]
    fn region_labels() {
        assert_eq!(Region::NorthEast.to_string(), "North-East");
        assert_eq!("south-west".parse::<Region>().unwrap(), Region::SouthWest);
        assert_eq!(Region::all().len(), 10);
    }
}
