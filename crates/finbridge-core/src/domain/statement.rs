use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::{ReportPeriod, Ticker};

/// The three statement families served by both backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    IncomeStatement,
    BalanceSheet,
    CashFlowStatement,
}

impl StatementKind {
    pub const ALL: [Self; 3] = [
        Self::IncomeStatement,
        Self::BalanceSheet,
        Self::CashFlowStatement,
    ];

    /// Commercial API endpoint path for this statement family.
    pub const fn endpoint_path(self) -> &'static str {
        match self {
            Self::IncomeStatement => "/financials/income-statements/",
            Self::BalanceSheet => "/financials/balance-sheets/",
            Self::CashFlowStatement => "/financials/cash-flow-statements/",
        }
    }

    /// Array field holding the records in the commercial JSON envelope.
    pub const fn envelope_field(self) -> &'static str {
        match self {
            Self::IncomeStatement => "income_statements",
            Self::BalanceSheet => "balance_sheets",
            Self::CashFlowStatement => "cash_flow_statements",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IncomeStatement => "income_statement",
            Self::BalanceSheet => "balance_sheet",
            Self::CashFlowStatement => "cash_flow_statement",
        }
    }
}

/// One normalized statement record.
///
/// A fixed `report_period` ISO date plus a map of normalized field name to
/// numeric value. A field the backend reported as missing is present with a
/// `None` value and serializes as `null`; NaN never survives construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialStatement {
    pub report_period: String,
    #[serde(flatten)]
    fields: BTreeMap<String, Option<f64>>,
}

impl FinancialStatement {
    pub fn new(report_period: impl Into<String>) -> Self {
        Self {
            report_period: report_period.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Insert a field, coercing non-finite values to absent.
    pub fn set(&mut self, name: impl Into<String>, value: Option<f64>) {
        self.fields
            .insert(name.into(), value.filter(|v| v.is_finite()));
    }

    pub fn value(&self, name: &str) -> Option<f64> {
        self.fields.get(name).copied().flatten()
    }

    /// Whether the field is carried at all (absent fields and `null` fields
    /// both answer to [`value`](Self::value) with `None`).
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

// The commercial payload mixes numeric statement lines with string metadata
// (ticker, currency). Deserialization keeps the numeric-or-null entries and
// drops the rest, so both backends land on the same record shape.
impl<'de> Deserialize<'de> for FinancialStatement {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawStatement {
            #[serde(default)]
            report_period: String,
            #[serde(flatten)]
            rest: BTreeMap<String, serde_json::Value>,
        }

        let raw = RawStatement::deserialize(deserializer)?;
        let mut statement = FinancialStatement::new(raw.report_period);
        for (name, value) in raw.rest {
            match value {
                serde_json::Value::Number(number) => {
                    statement.set(name, number.as_f64());
                }
                serde_json::Value::Null => statement.set(name, None),
                _ => {}
            }
        }
        Ok(statement)
    }
}

/// Ordered statement records, most recent period first, `len <= limit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementSeries {
    pub ticker: Ticker,
    pub period: ReportPeriod,
    pub statements: Vec<FinancialStatement>,
}

impl StatementSeries {
    pub fn new(ticker: Ticker, period: ReportPeriod, statements: Vec<FinancialStatement>) -> Self {
        Self {
            ticker,
            period,
            statements,
        }
    }

    pub fn empty(ticker: Ticker, period: ReportPeriod) -> Self {
        Self::new(ticker, period, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_finite_values_become_absent() {
        let mut statement = FinancialStatement::new("2023-09-30");
        statement.set("total_revenue", Some(f64::NAN));
        statement.set("net_income", Some(97_000_000_000.0));

        assert_eq!(statement.value("total_revenue"), None);
        assert!(statement.contains("total_revenue"));
        assert_eq!(statement.value("net_income"), Some(97_000_000_000.0));
    }

    #[test]
    fn serializes_flat_with_nulls_for_absent_fields() {
        let mut statement = FinancialStatement::new("2023-09-30");
        statement.set("gross_profit", None);
        statement.set("total_revenue", Some(1.0));

        let json = serde_json::to_value(&statement).expect("must serialize");
        assert_eq!(json["report_period"], "2023-09-30");
        assert_eq!(json["gross_profit"], serde_json::Value::Null);
        assert_eq!(json["total_revenue"], 1.0);
    }

    #[test]
    fn deserialization_drops_non_numeric_metadata() {
        let json = serde_json::json!({
            "report_period": "2024-03-31",
            "ticker": "AAPL",
            "currency": "USD",
            "revenue": 90_000_000_000.0,
            "gross_profit": null,
        });

        let statement: FinancialStatement =
            serde_json::from_value(json).expect("must deserialize");
        assert_eq!(statement.report_period, "2024-03-31");
        assert_eq!(statement.value("revenue"), Some(90_000_000_000.0));
        assert!(statement.contains("gross_profit"));
        assert_eq!(statement.value("gross_profit"), None);
        assert!(!statement.contains("ticker"));
        assert!(!statement.contains("currency"));
    }
}
