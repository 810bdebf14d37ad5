//! Median duration imputation by size class.
//!
//! Containment dates are missing for a large share of the source records.
//! Those durations are filled with the median observed duration of the
//! fires in the same [`SizeClass`]. Medians are computed once over every
//! observed duration in the input, before the plausibility filter runs, so
//! the result depends only on the input table.

use std::collections::BTreeMap;

use wildfire_fire_models::SizeClass;

use crate::SourceError;

/// Median of a set of values. The mean of the two middle values is used for
/// even-sized input. Returns `None` for empty input.
#[must_use]
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some(f64::midpoint(values[mid - 1], values[mid]))
    } else {
        Some(values[mid])
    }
}

/// Per-class medians of the observed durations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassMedians {
    medians: BTreeMap<SizeClass, f64>,
}

impl ClassMedians {
    /// Computes medians from `(class, observed duration)` pairs. Entries
    /// with `None` duration are ignored.
    #[must_use]
    pub fn from_observations(
        observations: impl IntoIterator<Item = (SizeClass, Option<f64>)>,
    ) -> Self {
        let mut by_class: BTreeMap<SizeClass, Vec<f64>> = BTreeMap::new();
        for (class, duration) in observations {
            if let Some(duration) = duration {
                by_class.entry(class).or_default().push(duration);
            }
        }

        let medians = by_class
            .into_iter()
            .filter_map(|(class, mut values)| median(&mut values).map(|m| (class, m)))
            .collect();

        Self { medians }
    }

    /// Median for a class, if any duration was observed in it.
    #[must_use]
    pub fn get(&self, class: SizeClass) -> Option<f64> {
        self.medians.get(&class).copied()
    }

    /// Resolves the duration for a record: the observed value if present,
    /// otherwise the class median.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Imputation`] if the duration is missing and no
    /// duration was observed for the class.
    pub fn resolve(
        &self,
        class: SizeClass,
        observed: Option<f64>,
    ) -> Result<(f64, bool), SourceError> {
        match observed {
            Some(duration) => Ok((duration, false)),
            None => self
                .get(class)
                .map(|m| (m, true))
                .ok_or(SourceError::Imputation { class }),
        }
    }
}
