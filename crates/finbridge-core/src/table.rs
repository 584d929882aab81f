//! Statement table abstraction and the tabular-to-record adapter.
//!
//! The free backend answers statement queries with a table: one column per
//! report date (most recent first), one row per native field label.
//! [`StatementTable`] models that shape explicitly so the adapter depends on
//! a defined contract instead of the backend's evolving response surface,
//! and [`statements_from_table`] folds it into normalized
//! [`FinancialStatement`] records.

use crate::FinancialStatement;

/// Tabular statement data in the free backend's native orientation.
///
/// Columns are report-date labels in native order, rows are native field
/// labels such as `"Total Revenue"`. The missing-value marker is `None`;
/// non-finite numbers are coerced to missing on insertion so NaN cannot
/// travel further.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatementTable {
    columns: Vec<String>,
    rows: Vec<String>,
    values: Vec<Vec<Option<f64>>>,
}

impl StatementTable {
    pub fn with_columns(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Append a row. Values are aligned to the column count: short rows are
    /// padded with missing entries, excess entries are dropped.
    pub fn push_row(&mut self, label: impl Into<String>, values: Vec<Option<f64>>) {
        let mut row: Vec<Option<f64>> = values
            .into_iter()
            .map(|value| value.filter(|v| v.is_finite()))
            .collect();
        row.resize(self.columns.len(), None);
        row.truncate(self.columns.len());

        self.rows.push(label.into());
        self.values.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn value_at(&self, row: usize, column: usize) -> Option<f64> {
        self.values
            .get(row)
            .and_then(|values| values.get(column))
            .copied()
            .flatten()
    }

    pub fn is_missing(&self, row: usize, column: usize) -> bool {
        self.value_at(row, column).is_none()
    }

    /// A table with no report-date columns or no rows carries no statements.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() || self.rows.is_empty()
    }
}

/// Normalize a native field label into a stable machine-friendly key:
/// lowercase, spaces replaced with underscores. Deterministic by
/// construction, so the same label always yields the same key.
pub fn normalize_label(label: &str) -> String {
    label.replace(' ', "_").to_ascii_lowercase()
}

/// Format a column label as a report period: the `YYYY-MM-DD` prefix when the
/// label is date-like, otherwise the label verbatim.
pub fn report_period_label(label: &str) -> String {
    if let Some(prefix) = label.get(..10) {
        if parse_iso_date(prefix).is_some() {
            return prefix.to_owned();
        }
    }
    label.to_owned()
}

pub(crate) fn parse_iso_date(input: &str) -> Option<time::Date> {
    let format = time::format_description::parse("[year]-[month]-[day]").ok()?;
    time::Date::parse(input, &format).ok()
}

/// Convert a statement table into normalized records.
///
/// At most `limit` columns are taken in native order (most recent first).
/// Each retained column becomes one record keyed by the normalized row
/// labels; missing table entries stay absent. An empty table yields an empty
/// vector, which is a valid outcome rather than an error.
pub fn statements_from_table(table: &StatementTable, limit: usize) -> Vec<FinancialStatement> {
    if table.is_empty() {
        return Vec::new();
    }

    table
        .columns()
        .iter()
        .take(limit)
        .enumerate()
        .map(|(column, label)| {
            let mut statement = FinancialStatement::new(report_period_label(label));
            for (row, row_label) in table.rows().iter().enumerate() {
                statement.set(normalize_label(row_label), table.value_at(row, column));
            }
            statement
        })
        .collect()
}
