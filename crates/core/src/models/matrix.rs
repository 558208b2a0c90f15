use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::price::PricePoint;

/// Canonical column name a single-asset view also answers to, so downstream
/// consumers can treat single- and multi-asset views uniformly.
pub const CLOSE_COLUMN: &str = "Close";

/// Date-indexed, symbol-columned table of closing prices.
///
/// The column list is fixed at construction. Every row carries exactly one
/// cell per column, `None` where the provider had no close for that symbol
/// on that date. Dates are ascending and unique — the union of trading days
/// across the requested symbols. A matrix is never mutated after
/// construction; filtering builds a new one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceMatrix {
    columns: Vec<String>,
    dates: Vec<NaiveDate>,
    /// Row-major: `cells[row][col]`, `columns.len()` cells per row.
    cells: Vec<Vec<Option<f64>>>,
    /// When set, [`CLOSE_COLUMN`] resolves to this column in addition to
    /// its own name. Set by the view filter on single-asset views.
    close_alias: Option<String>,
}

impl PriceMatrix {
    /// The empty matrix: no columns, no rows. What a degraded load returns.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Assemble a matrix from per-symbol close series.
    ///
    /// The date index is the sorted union of the dates of all series; a
    /// series that has no close on one of those dates gets a `None` cell
    /// there. An empty series therefore becomes an all-null column.
    /// Column order follows `series` order.
    pub fn from_series<N: Into<String>>(series: Vec<(N, Vec<PricePoint>)>) -> Self {
        let mut columns = Vec::with_capacity(series.len());
        let mut by_symbol: Vec<BTreeMap<NaiveDate, f64>> = Vec::with_capacity(series.len());
        let mut all_dates: BTreeSet<NaiveDate> = BTreeSet::new();

        for (name, points) in series {
            columns.push(name.into());
            let mut closes = BTreeMap::new();
            for point in points {
                all_dates.insert(point.date);
                closes.insert(point.date, point.close);
            }
            by_symbol.push(closes);
        }

        let dates: Vec<NaiveDate> = all_dates.into_iter().collect();
        let cells = dates
            .iter()
            .map(|date| by_symbol.iter().map(|closes| closes.get(date).copied()).collect())
            .collect();

        Self {
            columns,
            dates,
            cells,
            close_alias: None,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// True when the matrix has no rows.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.dates.len()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Resolve a column name to its index. The canonical [`CLOSE_COLUMN`]
    /// name resolves through the alias when one is set.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        if let Some(idx) = self.columns.iter().position(|c| c == name) {
            return Some(idx);
        }
        if name == CLOSE_COLUMN {
            if let Some(target) = &self.close_alias {
                return self.columns.iter().position(|c| c == target);
            }
        }
        None
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// The close for `name` on `date`, if that cell exists and is non-null.
    pub fn value(&self, date: NaiveDate, name: &str) -> Option<f64> {
        let col = self.column_index(name)?;
        let row = self.dates.binary_search(&date).ok()?;
        self.cells[row][col]
    }

    /// All cells of one column, in date order (`None` where no close).
    pub fn column_cells(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let col = self.column_index(name)?;
        Some(self.cells.iter().map(|row| row[col]).collect())
    }

    /// The non-null observations of one column as a date-sorted series.
    pub fn column_points(&self, name: &str) -> Option<Vec<PricePoint>> {
        let col = self.column_index(name)?;
        Some(
            self.dates
                .iter()
                .zip(&self.cells)
                .filter_map(|(date, row)| {
                    row[col].map(|close| PricePoint { date: *date, close })
                })
                .collect(),
        )
    }

    /// Non-null cells of the column at `col`, in date order.
    /// Used by the performance calculator, which works on column indices.
    pub fn column_observations(&self, col: usize) -> impl Iterator<Item = f64> + '_ {
        self.cells.iter().filter_map(move |row| row[col])
    }

    /// Project the matrix onto `column_indices` and the inclusive date range
    /// `[from, to]`. Produces a fresh matrix; the alias is not carried over
    /// (the view filter re-applies it where appropriate).
    pub(crate) fn slice(
        &self,
        column_indices: &[usize],
        from: NaiveDate,
        to: NaiveDate,
    ) -> Self {
        let columns = column_indices
            .iter()
            .map(|&idx| self.columns[idx].clone())
            .collect();

        let mut dates = Vec::new();
        let mut cells = Vec::new();
        for (date, row) in self.dates.iter().zip(&self.cells) {
            if *date < from || *date > to {
                continue;
            }
            dates.push(*date);
            cells.push(column_indices.iter().map(|&idx| row[idx]).collect());
        }

        Self {
            columns,
            dates,
            cells,
            close_alias: None,
        }
    }

    /// Expose `column` under the canonical [`CLOSE_COLUMN`] name as well.
    /// No-op alias when the column is already named "Close".
    pub(crate) fn with_close_alias(mut self, column: &str) -> Self {
        self.close_alias = Some(column.to_string());
        self
    }

    /// The column the canonical name currently points at, if any.
    pub fn close_alias(&self) -> Option<&str> {
        self.close_alias.as_deref()
    }
}
