//! Derived table shapes.
//!
//! Rollups are sparse: a group with no rows is absent, never a zero row.
//! Cross-tabulations are dense: every (row, column) pair of observed keys has
//! a cell, with explicit zeros.

use serde::Serialize;

use crate::{Dimension, KeyValue, Statistic, ValueColumn};

/// One group of a [`RollupTable`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RollupRow {
    /// Group key, one value per grouping dimension.
    pub keys: Vec<KeyValue>,
    /// The aggregate for the group.
    pub value: f64,
}

/// A grouped aggregate: one row per non-empty group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RollupTable {
    /// Grouping dimensions, in key order.
    pub dimensions: Vec<Dimension>,
    /// The aggregated column. Informational for [`Statistic::Count`].
    pub value_column: ValueColumn,
    /// The aggregate computed per group.
    pub statistic: Statistic,
    /// Groups, ordered by key unless reordered with [`Self::ordered_by`].
    pub rows: Vec<RollupRow>,
}

impl RollupTable {
    /// Number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no group was produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Aggregate for an exact key, if the group exists.
    #[must_use]
    pub fn get(&self, keys: &[KeyValue]) -> Option<f64> {
        self.rows
            .iter()
            .find(|row| row.keys == keys)
            .map(|row| row.value)
    }

    /// Position of `dimension` in the group key.
    #[must_use]
    pub fn position_of(&self, dimension: Dimension) -> Option<usize> {
        self.dimensions.iter().position(|d| *d == dimension)
    }

    /// Reorders rows by the explicit category list `order`, applied to the
    /// key at `position`. Rows with a key missing from `order` keep their
    /// relative order after the listed ones.
    #[must_use]
    pub fn ordered_by(mut self, position: usize, order: &[KeyValue]) -> Self {
        sort_by_explicit_order(&mut self.rows, |row| &row.keys, position, order);
        self
    }
}

/// One group of a [`CiTable`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CiRow {
    /// Group key.
    pub keys: Vec<KeyValue>,
    /// Mean of the group.
    pub mean: f64,
    /// Sample standard deviation (n - 1). `None` for a single observation.
    pub std: Option<f64>,
    /// Sample size.
    pub n: u64,
    /// 95% confidence interval half-width. `None` for a single observation.
    pub ci: Option<f64>,
}

/// Grouped means with their sample statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CiTable {
    /// Grouping dimensions, in key order.
    pub dimensions: Vec<Dimension>,
    /// The aggregated column.
    pub value_column: ValueColumn,
    /// Groups.
    pub rows: Vec<CiRow>,
}

impl CiTable {
    /// Number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no group was produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row for an exact key, if the group exists.
    #[must_use]
    pub fn get(&self, keys: &[KeyValue]) -> Option<&CiRow> {
        self.rows.iter().find(|row| row.keys == keys)
    }

    /// See [`RollupTable::ordered_by`].
    #[must_use]
    pub fn ordered_by(mut self, position: usize, order: &[KeyValue]) -> Self {
        sort_by_explicit_order(&mut self.rows, |row| &row.keys, position, order);
        self
    }
}

/// Record counts for every (row key, column key) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossTab {
    /// Dimension of the row keys.
    pub row_dimension: Dimension,
    /// Dimension of the column keys.
    pub column_dimension: Dimension,
    /// Row keys.
    pub row_keys: Vec<KeyValue>,
    /// Column keys.
    pub column_keys: Vec<KeyValue>,
    /// `cells[row][column]`.
    pub cells: Vec<Vec<u64>>,
}

impl CrossTab {
    /// Count for a (row, column) pair, if both keys are present.
    #[must_use]
    pub fn get(&self, row: &KeyValue, column: &KeyValue) -> Option<u64> {
        let i = self.row_keys.iter().position(|k| k == row)?;
        let j = self.column_keys.iter().position(|k| k == column)?;
        Some(self.cells[i][j])
    }

    /// Sum of the row at `index`.
    #[must_use]
    pub fn row_total(&self, index: usize) -> u64 {
        self.cells.get(index).map_or(0, |row| row.iter().sum())
    }

    /// Sum of every cell.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.cells.iter().flatten().sum()
    }

    /// Values of the column at `index`, top to bottom.
    #[must_use]
    pub fn column(&self, index: usize) -> Vec<u64> {
        self.cells.iter().map(|row| row[index]).collect()
    }

    /// Rebuilds the table over an explicit key order. Keys not present in
    /// the original become all-zero rows or columns; keys left out are
    /// dropped.
    #[must_use]
    pub fn reindexed(&self, row_keys: &[KeyValue], column_keys: &[KeyValue]) -> Self {
        let cells = row_keys
            .iter()
            .map(|row| {
                column_keys
                    .iter()
                    .map(|column| self.get(row, column).unwrap_or(0))
                    .collect()
            })
            .collect();

        Self {
            row_dimension: self.row_dimension,
            column_dimension: self.column_dimension,
            row_keys: row_keys.to_vec(),
            column_keys: column_keys.to_vec(),
            cells,
        }
    }
}

/// A cross-tabulation with each row expressed as a share of its total.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentTable {
    /// Dimension of the row keys.
    pub row_dimension: Dimension,
    /// Dimension of the column keys.
    pub column_dimension: Dimension,
    /// Row keys.
    pub row_keys: Vec<KeyValue>,
    /// Column keys.
    pub column_keys: Vec<KeyValue>,
    /// `cells[row][column]`, percent of the row total.
    pub cells: Vec<Vec<f64>>,
}

impl PercentTable {
    /// Percentage for a (row, column) pair, if both keys are present.
    #[must_use]
    pub fn get(&self, row: &KeyValue, column: &KeyValue) -> Option<f64> {
        let i = self.row_keys.iter().position(|k| k == row)?;
        let j = self.column_keys.iter().position(|k| k == column)?;
        Some(self.cells[i][j])
    }
}

/// Trailing-window means of every column of a cross-tabulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RollingTable {
    /// Dimension of the row keys (the series axis).
    pub row_dimension: Dimension,
    /// Dimension of the column keys.
    pub column_dimension: Dimension,
    /// Window size.
    pub window: usize,
    /// Row keys.
    pub row_keys: Vec<KeyValue>,
    /// Column keys.
    pub column_keys: Vec<KeyValue>,
    /// `cells[row][column]`. The first `window - 1` rows are `None`.
    pub cells: Vec<Vec<Option<f64>>>,
}

/// Ordinary least squares fit `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Regression {
    /// Slope.
    pub slope: f64,
    /// Intercept.
    pub intercept: f64,
    /// Pearson correlation coefficient. Zero when all y values are equal.
    pub r_value: f64,
    /// Number of points fitted.
    pub n: usize,
}

impl Regression {
    /// Fitted value at `x`.
    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.slope.mul_add(x, self.intercept)
    }
}

/// One yearly point of a [`Trend`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    /// Year.
    pub year: i32,
    /// Yearly mean of the value column.
    pub value: f64,
}

/// Yearly means of a column with their regression line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trend {
    /// The column averaged per year.
    pub value_column: ValueColumn,
    /// Yearly means, ascending by year.
    pub points: Vec<TrendPoint>,
    /// Fit over `points`.
    pub regression: Regression,
}

/// Stable sort of `rows` by the index of `key(row)[position]` in `order`.
fn sort_by_explicit_order<T>(
    rows: &mut [T],
    key: impl Fn(&T) -> &[KeyValue],
    position: usize,
    order: &[KeyValue],
) {
    rows.sort_by_key(|row| {
        key(row)
            .get(position)
            .and_then(|k| order.iter().position(|o| o == k))
            .unwrap_or(order.len())
    });
}

#[cfg(test)]
mod tests {
    use wildfire_fire_models::Cause;

    use super::*;

    fn tab() -> CrossTab {
        CrossTab {
            row_dimension: Dimension::State,
            column_dimension: Dimension::Cause,
            row_keys: vec![KeyValue::State("CA".to_string())],
            column_keys: vec![
                KeyValue::Cause(Cause::Natural),
                KeyValue::Cause(Cause::Criminal),
            ],
            cells: vec![vec![2, 1]],
        }
    }

    #[test]
    fn reindex_adds_zero_rows_and_drops_unlisted_columns() {
        let tab = tab();
        let rows = [
            KeyValue::State("CA".to_string()),
            KeyValue::State("TX".to_string()),
        ];
        let columns = [KeyValue::Cause(Cause::Natural)];
        let reindexed = tab.reindexed(&rows, &columns);

        assert_eq!(reindexed.cells, vec![vec![2], vec![0]]);
        assert_eq!(reindexed.row_total(1), 0);
    }

    #[test]
    fn explicit_order_overrides_key_order() {
        let table = RollupTable {
            dimensions: vec![Dimension::Month],
            value_column: ValueColumn::FireSize,
            statistic: Statistic::Count,
            rows: [1, 6, 12]
                .into_iter()
                .map(|m| RollupRow {
                    keys: vec![KeyValue::Month(m)],
                    value: f64::from(m),
                })
                .collect(),
        };
        let order = [KeyValue::Month(12), KeyValue::Month(1)];
        let ordered = table.ordered_by(0, &order);
        let months: Vec<_> = ordered.rows.iter().map(|r| r.keys[0].clone()).collect();
        assert_eq!(
            months,
            vec![KeyValue::Month(12), KeyValue::Month(1), KeyValue::Month(6)]
        );
    }

    #[test]
    fn regression_predicts_on_line() {
        let fit = Regression {
            slope: 3.0,
            intercept: 7.0,
            r_value: 1.0,
            n: 10,
        };
        assert!((fit.predict(2.0) - 13.0).abs() < 1e-12);
    }
}
