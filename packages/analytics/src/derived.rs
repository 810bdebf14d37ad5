//! Metrics derived from rollups: row percentages, least-squares trends, and
//! trailing rolling means.

use wildfire_analytics_models::{
    CrossTab, Dimension, KeyValue, PercentTable, Regression, RollingTable, Statistic, Trend,
    TrendPoint, ValueColumn,
};
use wildfire_source_models::IncidentTable;

use crate::AnalyticsError;
use crate::rollup::rollup;
use crate::stats::mean;

/// Expresses every cell as a percentage of its row total.
///
/// # Errors
///
/// Returns [`AnalyticsError::ZeroRowTotal`] if any row sums to zero.
#[allow(clippy::cast_precision_loss)]
pub fn row_percentages(tab: &CrossTab) -> Result<PercentTable, AnalyticsError> {
    let cells = tab
        .cells
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let total = tab.row_total(i);
            if total == 0 {
                return Err(AnalyticsError::ZeroRowTotal {
                    row: tab.row_keys[i].to_string(),
                });
            }
            let total = total as f64;
            Ok(row.iter().map(|&c| 100.0 * c as f64 / total).collect())
        })
        .collect::<Result<Vec<Vec<f64>>, _>>()?;

    Ok(PercentTable {
        row_dimension: tab.row_dimension,
        column_dimension: tab.column_dimension,
        row_keys: tab.row_keys.clone(),
        column_keys: tab.column_keys.clone(),
        cells,
    })
}

/// Fits `y = slope * x + intercept` by ordinary least squares.
///
/// # Errors
///
/// Returns [`AnalyticsError::Regression`] if the points have fewer than two
/// distinct x values.
#[allow(clippy::cast_precision_loss)]
pub fn linear_regression(points: &[(f64, f64)]) -> Result<Regression, AnalyticsError> {
    let mut xs: Vec<f64> = points.iter().map(|(x, _)| *x).collect();
    xs.sort_by(f64::total_cmp);
    xs.dedup();
    if xs.len() < 2 {
        return Err(AnalyticsError::Regression { distinct: xs.len() });
    }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (mut sxx, mut sxy, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in points {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }

    let slope = sxy / sxx;
    let intercept = slope.mul_add(-mean_x, mean_y);
    let r_value = if syy > 0.0 {
        sxy / (sxx * syy).sqrt()
    } else {
        0.0
    };

    Ok(Regression {
        slope,
        intercept,
        r_value,
        n: points.len(),
    })
}

/// Trailing mean over `window` consecutive values. Position `i` is defined
/// only once a full window ends there, so the first `window - 1` positions
/// are `None`.
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidWindow`] if `window` is zero.
pub fn rolling_mean(values: &[f64], window: usize) -> Result<Vec<Option<f64>>, AnalyticsError> {
    if window == 0 {
        return Err(AnalyticsError::InvalidWindow { window });
    }

    Ok((0..values.len())
        .map(|i| {
            (i + 1)
                .checked_sub(window)
                .and_then(|start| mean(&values[start..=i]))
        })
        .collect())
}

/// Applies [`rolling_mean`] down every column of a cross-tab. Rows are
/// taken as the series axis in their current order.
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidWindow`] if `window` is zero.
#[allow(clippy::cast_precision_loss)]
pub fn rolling_columns(tab: &CrossTab, window: usize) -> Result<RollingTable, AnalyticsError> {
    let columns = (0..tab.column_keys.len())
        .map(|j| {
            let values: Vec<f64> = tab.column(j).into_iter().map(|c| c as f64).collect();
            rolling_mean(&values, window)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let cells = (0..tab.row_keys.len())
        .map(|i| columns.iter().map(|column| column[i]).collect())
        .collect();

    Ok(RollingTable {
        row_dimension: tab.row_dimension,
        column_dimension: tab.column_dimension,
        window,
        row_keys: tab.row_keys.clone(),
        column_keys: tab.column_keys.clone(),
        cells,
    })
}

/// Yearly means of `column` with their least-squares line.
///
/// # Errors
///
/// Returns [`AnalyticsError::Regression`] if the table spans fewer than two
/// years.
pub fn trend(table: &IncidentTable, column: ValueColumn) -> Result<Trend, AnalyticsError> {
    let yearly = rollup(table, &[Dimension::Year], column, Statistic::Mean);

    let points: Vec<TrendPoint> = yearly
        .rows
        .iter()
        .filter_map(|row| {
            row.keys
                .first()
                .and_then(KeyValue::as_year)
                .map(|year| TrendPoint {
                    year,
                    value: row.value,
                })
        })
        .collect();

    let xy: Vec<(f64, f64)> = points
        .iter()
        .map(|p| (f64::from(p.year), p.value))
        .collect();
    let regression = linear_regression(&xy)?;

    log::debug!(
        "{column} trend: slope {:.4} per year, r = {:.3}",
        regression.slope,
        regression.r_value
    );

    Ok(Trend {
        value_column: column,
        points,
        regression,
    })
}
