use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::Ticker;

/// OHLCV record for one trading interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Point-in-time quote for a ticker.
///
/// `price` follows the first-present-wins rule: the backend's current price,
/// else its regular market price. Fields the backend does not report stay
/// `None`, never zero. `timestamp` records capture time as RFC3339.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub ticker: Ticker,
    pub price: Option<f64>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<u64>,
    pub market_cap: Option<f64>,
    pub timestamp: String,
}

/// Fixed set of valuation and profitability ratios, each optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialMetricsSnapshot {
    pub ticker: Ticker,
    pub market_cap: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub forward_pe: Option<f64>,
    pub peg_ratio: Option<f64>,
    pub price_to_book: Option<f64>,
    pub price_to_sales: Option<f64>,
    pub enterprise_value: Option<f64>,
    pub ev_to_revenue: Option<f64>,
    pub ev_to_ebitda: Option<f64>,
    pub profit_margin: Option<f64>,
    pub operating_margin: Option<f64>,
    pub return_on_assets: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub revenue: Option<f64>,
    pub revenue_per_share: Option<f64>,
    pub earnings_per_share: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub beta: Option<f64>,
    #[serde(rename = "52_week_high")]
    pub week_52_high: Option<f64>,
    #[serde(rename = "52_week_low")]
    pub week_52_low: Option<f64>,
}

/// Identifies which backend services requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    FinancialDatasets,
    YahooFinance,
}

impl ProviderKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FinancialDatasets => "financial_datasets",
            Self::YahooFinance => "yahoo_finance",
        }
    }
}

impl Display for ProviderKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only snapshot of the process-wide provider decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderStatus {
    pub provider: ProviderKind,
    pub financial_datasets_available: bool,
    pub yahoo_finance_available: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_serialize_with_payload_field_names() {
        let metrics = FinancialMetricsSnapshot {
            ticker: Ticker::parse("AAPL").expect("valid ticker"),
            market_cap: Some(3.0e12),
            pe_ratio: None,
            forward_pe: None,
            peg_ratio: None,
            price_to_book: None,
            price_to_sales: None,
            enterprise_value: None,
            ev_to_revenue: None,
            ev_to_ebitda: None,
            profit_margin: None,
            operating_margin: None,
            return_on_assets: None,
            return_on_equity: None,
            revenue: None,
            revenue_per_share: None,
            earnings_per_share: None,
            dividend_yield: None,
            beta: None,
            week_52_high: Some(199.62),
            week_52_low: None,
        };

        let json = serde_json::to_value(&metrics).expect("must serialize");
        assert_eq!(json["52_week_high"], 199.62);
        assert_eq!(json["52_week_low"], serde_json::Value::Null);
        assert_eq!(json["ticker"], "AAPL");
    }

    #[test]
    fn provider_kind_snake_case_round_trip() {
        let json = serde_json::to_value(ProviderKind::FinancialDatasets).expect("must serialize");
        assert_eq!(json, "financial_datasets");
        let parsed: ProviderKind =
            serde_json::from_value(serde_json::json!("yahoo_finance")).expect("must parse");
        assert_eq!(parsed, ProviderKind::YahooFinance);
    }
}
