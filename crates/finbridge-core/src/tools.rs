//! Agent-facing operations.
//!
//! One operation per statement/price/metric type. Statement operations
//! dispatch on the process-wide provider decision: the commercial backend
//! receives an equivalent request (range filters translated to its named
//! query parameters) and its JSON envelope is unwrapped; the free backend
//! receives the same request minus the range filters, which it does not
//! support and which are deliberately ignored. Callers can detect that
//! asymmetry through [`FinancialTools::supports_range_filters`] instead of
//! inferring it from results.

use std::sync::Arc;

use crate::config::ProviderConfig;
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::providers::{FinancialDatasetsClient, YahooFinanceClient};
use crate::{
    FinancialMetricsSnapshot, FinancialStatement, PriceBar, PriceSnapshot, ProviderError,
    ProviderStatus, ReportPeriod, StatementKind, StatementSeries, Ticker,
};

pub const DEFAULT_STATEMENT_LIMIT: usize = 10;

/// Optional report-period bounds, ISO `YYYY-MM-DD`.
///
/// Only honored by the commercial backend; the free backend returns the full
/// series and leaves filtering to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportPeriodRange {
    pub gt: Option<String>,
    pub gte: Option<String>,
    pub lt: Option<String>,
    pub lte: Option<String>,
}

impl ReportPeriodRange {
    pub fn is_unbounded(&self) -> bool {
        self.gt.is_none() && self.gte.is_none() && self.lt.is_none() && self.lte.is_none()
    }

    /// Set bounds as commercial query parameters, in a stable order.
    pub fn bounds(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("report_period_gt", self.gt.as_deref()),
            ("report_period_gte", self.gte.as_deref()),
            ("report_period_lt", self.lt.as_deref()),
            ("report_period_lte", self.lte.as_deref()),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|value| (name, value)))
    }
}

/// Parameters shared by the three statement operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementQuery {
    pub ticker: Ticker,
    pub period: ReportPeriod,
    pub limit: usize,
    pub range: ReportPeriodRange,
}

impl StatementQuery {
    pub fn new(ticker: Ticker, period: ReportPeriod) -> Self {
        Self {
            ticker,
            period,
            limit: DEFAULT_STATEMENT_LIMIT,
            range: ReportPeriodRange::default(),
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_range(mut self, range: ReportPeriodRange) -> Self {
        self.range = range;
        self
    }
}

/// The public tool surface handed to the agent.
///
/// Holds the provider decision (resolved once, read repeatedly) and one
/// client per backend. All state is read-only after construction, so the
/// value can be shared across concurrent requests freely.
pub struct FinancialTools {
    config: ProviderConfig,
    financial_datasets: Option<FinancialDatasetsClient>,
    yahoo: YahooFinanceClient,
}

impl FinancialTools {
    /// Resolve provider selection from the environment and wire both clients
    /// to a production transport.
    pub fn from_env() -> Self {
        Self::with_http_client(ProviderConfig::from_env(), Arc::new(ReqwestHttpClient::new()))
    }

    /// Construct against an explicit configuration and transport. This is
    /// the seam tests use to swap in canned transports.
    pub fn with_http_client(config: ProviderConfig, http_client: Arc<dyn HttpClient>) -> Self {
        let financial_datasets = config
            .financial_datasets_api_key()
            .and_then(|key| FinancialDatasetsClient::new(http_client.clone(), key).ok());
        let yahoo = YahooFinanceClient::new(http_client)
            .with_availability(config.yahoo_finance_available());

        Self {
            config,
            financial_datasets,
            yahoo,
        }
    }

    pub async fn income_statements(
        &self,
        query: &StatementQuery,
    ) -> Result<StatementSeries, ProviderError> {
        self.statements(StatementKind::IncomeStatement, query).await
    }

    pub async fn balance_sheets(
        &self,
        query: &StatementQuery,
    ) -> Result<StatementSeries, ProviderError> {
        self.statements(StatementKind::BalanceSheet, query).await
    }

    pub async fn cash_flow_statements(
        &self,
        query: &StatementQuery,
    ) -> Result<StatementSeries, ProviderError> {
        self.statements(StatementKind::CashFlowStatement, query).await
    }

    /// OHLCV history between two `YYYY-MM-DD` dates. Served by the free
    /// backend regardless of selection.
    pub async fn prices(
        &self,
        ticker: &Ticker,
        interval: &str,
        interval_multiplier: u32,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<PriceBar>, ProviderError> {
        self.yahoo
            .price_history(ticker, interval, interval_multiplier, start_date, end_date)
            .await
    }

    pub async fn price_snapshot(&self, ticker: &Ticker) -> Result<PriceSnapshot, ProviderError> {
        self.yahoo.price_snapshot(ticker).await
    }

    /// Valuation/profitability ratios. The underlying snapshot always
    /// reflects trailing values; `_period` is accepted for call-shape parity
    /// with the statement operations.
    pub async fn financial_metrics(
        &self,
        ticker: &Ticker,
        _period: ReportPeriod,
    ) -> Result<FinancialMetricsSnapshot, ProviderError> {
        self.yahoo.financial_metrics(ticker).await
    }

    /// Read-only snapshot of the provider decision and backend availability.
    pub fn provider_status(&self) -> ProviderStatus {
        self.config.status()
    }

    /// Whether report-period range filters reach the active backend. False
    /// means they are accepted but ignored.
    pub fn supports_range_filters(&self) -> bool {
        self.config.commercial_selected()
    }

    async fn statements(
        &self,
        kind: StatementKind,
        query: &StatementQuery,
    ) -> Result<StatementSeries, ProviderError> {
        if self.config.commercial_selected() {
            let client = self.financial_datasets.as_ref().ok_or_else(|| {
                ProviderError::configuration(
                    "financial_datasets is selected but its API key is not configured",
                )
            })?;

            let params = commercial_params(query);
            let envelope = client.call(kind.endpoint_path(), &params).await?;
            let statements = unwrap_envelope(&envelope, kind)?;
            Ok(StatementSeries::new(
                query.ticker.clone(),
                query.period,
                statements,
            ))
        } else {
            self.yahoo
                .statements(&query.ticker, kind, query.period, query.limit)
                .await
        }
    }
}

fn commercial_params(query: &StatementQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("ticker", query.ticker.as_str().to_owned()),
        ("period", query.period.as_str().to_owned()),
        ("limit", query.limit.to_string()),
    ];
    params.extend(
        query
            .range
            .bounds()
            .map(|(name, value)| (name, value.to_owned())),
    );
    params
}

fn unwrap_envelope(
    envelope: &serde_json::Value,
    kind: StatementKind,
) -> Result<Vec<FinancialStatement>, ProviderError> {
    match envelope.get(kind.envelope_field()) {
        // An envelope without the named collection carries no records.
        None | Some(serde_json::Value::Null) => Ok(Vec::new()),
        Some(records) => serde_json::from_value(records.clone())
            .map_err(|e| ProviderError::decode(e.to_string())),
    }
}
