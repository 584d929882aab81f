//! Typed data model shared by both backends.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Ticker`] | Uppercased equity ticker |
//! | [`ReportPeriod`] | `annual` / `quarterly` / `ttm` |
//! | [`StatementKind`] | Income statement / balance sheet / cash flow |
//! | [`FinancialStatement`] | One normalized statement record |
//! | [`StatementSeries`] | Most-recent-first statement records |
//! | [`PriceBar`] | OHLCV bar |
//! | [`PriceSnapshot`] | Point-in-time quote |
//! | [`FinancialMetricsSnapshot`] | Valuation/profitability ratios |
//! | [`ProviderStatus`] | Active-backend snapshot |

mod models;
mod period;
mod statement;
mod ticker;

pub use models::{
    FinancialMetricsSnapshot, PriceBar, PriceSnapshot, ProviderKind, ProviderStatus,
};
pub use period::{chart_interval, PriceInterval, ReportPeriod};
pub use statement::{FinancialStatement, StatementKind, StatementSeries};
pub use ticker::Ticker;
