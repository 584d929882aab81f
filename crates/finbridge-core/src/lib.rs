//! # Finbridge Core
//!
//! Provider abstraction and normalization layer for standardized financial
//! data: income statements, balance sheets, cash-flow statements, price
//! history, price snapshots, and derived valuation metrics for an equity
//! ticker, served by one of two interchangeable backends.
//!
//! ## Overview
//!
//! - **Commercial backend**: the paid structured-data HTTP API. Records
//!   arrive already normalized and pass through verbatim.
//! - **Free backend**: public market-data endpoints answering with tabular
//!   statement data, adapted into the same record shape by the table
//!   adapter.
//!
//! Which backend services a request is a process-wide decision made once
//! from environment state: the commercial backend is active only when both
//! its API key and an explicit opt-in flag are configured; otherwise the
//! free backend is used unconditionally.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Provider selection and capability descriptor |
//! | [`domain`] | Ticker, periods, statements, prices, metrics |
//! | [`error`] | Validation and provider error types |
//! | [`http_client`] | Transport seam (reqwest in production) |
//! | [`providers`] | The two backend clients |
//! | [`table`] | Statement table abstraction + record adapter |
//! | [`tools`] | Agent-facing operations |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use finbridge_core::{FinancialTools, ReportPeriod, StatementQuery, Ticker};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let tools = FinancialTools::from_env();
//!
//!     let query = StatementQuery::new(Ticker::parse("AAPL")?, ReportPeriod::Annual);
//!     let series = tools.income_statements(&query).await?;
//!
//!     for statement in &series.statements {
//!         println!("{}: {:?}", statement.report_period, statement.value("total_revenue"));
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Control Flow
//!
//! ```text
//! FinancialTools ──▶ ProviderConfig (read-only check)
//!        │
//!        ├─ commercial ──▶ FinancialDatasetsClient ──▶ envelope unwrap
//!        │
//!        └─ free ──▶ YahooFinanceClient ──▶ StatementTable ──▶ adapter
//! ```
//!
//! ## Error Handling
//!
//! Every failure propagates unchanged to the caller; there is no retry,
//! caching, or rate limiting at this layer. Empty series are valid results,
//! distinguished from configuration and upstream errors:
//!
//! ```rust
//! use finbridge_core::ProviderError;
//!
//! fn describe(error: &ProviderError) -> &'static str {
//!     match error {
//!         ProviderError::Configuration(_) => "backend not configured/available",
//!         ProviderError::Upstream { .. } => "backend answered non-2xx",
//!         ProviderError::Transport(_) => "no HTTP response at all",
//!         ProviderError::Decode(_) => "payload shape mismatch",
//!         ProviderError::Validation(_) => "bad request input",
//!     }
//! }
//! ```
//!
//! ## Security
//!
//! API keys are attached as request headers, never query parameters, so they
//! cannot leak through URLs or request logs.

pub mod config;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod providers;
pub mod table;
pub mod tools;

pub use config::{
    ProviderConfig, FINANCIAL_DATASETS_API_KEY_VAR, USE_FINANCIAL_DATASETS_VAR,
};
pub use domain::{
    chart_interval, FinancialMetricsSnapshot, FinancialStatement, PriceBar, PriceInterval,
    PriceSnapshot, ProviderKind, ProviderStatus, ReportPeriod, StatementKind, StatementSeries,
    Ticker,
};
pub use error::{ProviderError, ValidationError};
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};
pub use providers::{FinancialDatasetsClient, YahooFinanceClient, FINANCIAL_DATASETS_BASE_URL};
pub use table::{normalize_label, report_period_label, statements_from_table, StatementTable};
pub use tools::{
    FinancialTools, ReportPeriodRange, StatementQuery, DEFAULT_STATEMENT_LIMIT,
};
