//! Grouped aggregates over the incident table.
//!
//! Groups are keyed by `Vec<KeyValue>` in a `BTreeMap`, so output rows come
//! out in semantic key order (years ascending, months chronological, causes
//! in display order). Groups with no rows never appear.

use std::collections::{BTreeMap, BTreeSet};

use wildfire_analytics_models::{
    CiRow, CiTable, CrossTab, Dimension, KeyValue, RollupRow, RollupTable, Statistic, ValueColumn,
};
use wildfire_source_models::{IncidentTable, NormalizedIncident};

use crate::AnalyticsError;
use crate::stats::{Summary, summarize};

/// Extracts the grouping key of `incident` along `dimension`.
#[must_use]
pub fn key_of(incident: &NormalizedIncident, dimension: Dimension) -> KeyValue {
    match dimension {
        Dimension::Year => KeyValue::Year(incident.year),
        Dimension::Month => KeyValue::Month(incident.month),
        Dimension::DayOfWeek => KeyValue::DayOfWeek(incident.day_of_week),
        Dimension::DayOfYear => KeyValue::DayOfYear(incident.day_of_year),
        Dimension::Season => KeyValue::Season(incident.season),
        Dimension::State => KeyValue::State(incident.state.clone()),
        Dimension::Cause => KeyValue::Cause(incident.cause),
        Dimension::GeneralCause => KeyValue::GeneralCause(incident.general_cause),
        Dimension::Region => KeyValue::Region(incident.region),
        Dimension::SizeClass => KeyValue::SizeClass(incident.size_class),
    }
}

/// Extracts the numeric value of `incident` in `column`.
#[must_use]
pub const fn value_of(incident: &NormalizedIncident, column: ValueColumn) -> f64 {
    match column {
        ValueColumn::FireSize => incident.fire_size,
        ValueColumn::Duration => incident.duration_days,
        ValueColumn::Latitude => incident.latitude,
        ValueColumn::Longitude => incident.longitude,
    }
}

fn group_incidents(
    table: &IncidentTable,
    dimensions: &[Dimension],
    value: ValueColumn,
) -> BTreeMap<Vec<KeyValue>, Vec<f64>> {
    let mut groups: BTreeMap<Vec<KeyValue>, Vec<f64>> = BTreeMap::new();
    for incident in table {
        let keys = dimensions.iter().map(|d| key_of(incident, *d)).collect();
        groups.entry(keys).or_default().push(value_of(incident, value));
    }
    groups
}

#[allow(clippy::cast_precision_loss)]
const fn pick(summary: &Summary, statistic: Statistic) -> f64 {
    match statistic {
        Statistic::Count => summary.n as f64,
        Statistic::Sum => summary.sum,
        Statistic::Mean => summary.mean,
    }
}

fn ci_row(keys: Vec<KeyValue>, summary: &Summary) -> CiRow {
    CiRow {
        keys,
        mean: summary.mean,
        std: summary.std,
        n: summary.n,
        ci: summary.ci,
    }
}

/// Groups `table` by `dimensions` and computes `statistic` of `value` per
/// group. `value` is ignored for [`Statistic::Count`].
#[must_use]
pub fn rollup(
    table: &IncidentTable,
    dimensions: &[Dimension],
    value: ValueColumn,
    statistic: Statistic,
) -> RollupTable {
    let rows = group_incidents(table, dimensions, value)
        .into_iter()
        .filter_map(|(keys, values)| {
            summarize(&values).map(|summary| RollupRow {
                keys,
                value: pick(&summary, statistic),
            })
        })
        .collect();

    RollupTable {
        dimensions: dimensions.to_vec(),
        value_column: value,
        statistic,
        rows,
    }
}

/// Groups `table` by `dimensions` and computes the mean of `value` with its
/// sample deviation, size, and 95% confidence interval per group.
#[must_use]
pub fn rollup_with_ci(
    table: &IncidentTable,
    dimensions: &[Dimension],
    value: ValueColumn,
) -> CiTable {
    let rows = group_incidents(table, dimensions, value)
        .into_iter()
        .filter_map(|(keys, values)| summarize(&values).map(|summary| ci_row(keys, &summary)))
        .collect();

    CiTable {
        dimensions: dimensions.to_vec(),
        value_column: value,
        rows,
    }
}

/// Projects each inner row onto `outer` and collects the inner values per
/// outer group.
fn group_rollup(
    inner: &RollupTable,
    outer: &[Dimension],
) -> Result<BTreeMap<Vec<KeyValue>, Vec<f64>>, AnalyticsError> {
    let positions = outer
        .iter()
        .map(|dimension| {
            inner
                .position_of(*dimension)
                .ok_or_else(|| AnalyticsError::InvalidRegroup {
                    dimension: *dimension,
                    inner: inner
                        .dimensions
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", "),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut groups: BTreeMap<Vec<KeyValue>, Vec<f64>> = BTreeMap::new();
    for row in &inner.rows {
        let keys = positions.iter().map(|&p| row.keys[p].clone()).collect();
        groups.entry(keys).or_default().push(row.value);
    }
    Ok(groups)
}

/// Aggregates an already-aggregated table a second time, over the coarser
/// key `outer`. Each inner row counts once regardless of how many incidents
/// it summarized, which is what makes "mean by state of yearly means"
/// insensitive to uneven yearly coverage.
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidRegroup`] if `outer` names a dimension
/// the inner table is not grouped by.
pub fn regroup(
    inner: &RollupTable,
    outer: &[Dimension],
    statistic: Statistic,
) -> Result<RollupTable, AnalyticsError> {
    let rows = group_rollup(inner, outer)?
        .into_iter()
        .filter_map(|(keys, values)| {
            summarize(&values).map(|summary| RollupRow {
                keys,
                value: pick(&summary, statistic),
            })
        })
        .collect();

    Ok(RollupTable {
        dimensions: outer.to_vec(),
        value_column: inner.value_column,
        statistic,
        rows,
    })
}

/// Like [`regroup`] but reports the mean of the inner values with its
/// sample statistics. Used for "mean yearly count per month, with CI".
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidRegroup`] if `outer` names a dimension
/// the inner table is not grouped by.
pub fn regroup_with_ci(
    inner: &RollupTable,
    outer: &[Dimension],
) -> Result<CiTable, AnalyticsError> {
    let rows = group_rollup(inner, outer)?
        .into_iter()
        .filter_map(|(keys, values)| summarize(&values).map(|summary| ci_row(keys, &summary)))
        .collect();

    Ok(CiTable {
        dimensions: outer.to_vec(),
        value_column: inner.value_column,
        rows,
    })
}

/// Counts incidents for every pair of observed `row` and `column` keys.
/// Pairs with no incidents are explicit zeros.
#[must_use]
pub fn crosstab(table: &IncidentTable, row: Dimension, column: Dimension) -> CrossTab {
    let mut counts: BTreeMap<(KeyValue, KeyValue), u64> = BTreeMap::new();
    let mut row_keys = BTreeSet::new();
    let mut column_keys = BTreeSet::new();

    for incident in table {
        let r = key_of(incident, row);
        let c = key_of(incident, column);
        row_keys.insert(r.clone());
        column_keys.insert(c.clone());
        *counts.entry((r, c)).or_default() += 1;
    }

    let row_keys: Vec<KeyValue> = row_keys.into_iter().collect();
    let column_keys: Vec<KeyValue> = column_keys.into_iter().collect();

    let cells = row_keys
        .iter()
        .map(|r| {
            column_keys
                .iter()
                .map(|c| counts.get(&(r.clone(), c.clone())).copied().unwrap_or(0))
                .collect()
        })
        .collect();

    CrossTab {
        row_dimension: row,
        column_dimension: column,
        row_keys,
        column_keys,
        cells,
    }
}
