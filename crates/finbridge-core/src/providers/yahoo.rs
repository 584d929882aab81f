//! Free market-data backend client.
//!
//! Statements come from the fundamentals-timeseries endpoint and are folded
//! into a [`StatementTable`] before the table adapter shapes them into
//! records; price history uses the v8 chart endpoint; snapshot and metrics
//! project a fixed field set out of the v10 quoteSummary modules.
//!
//! Every operation first checks the capability flag resolved at startup; an
//! unavailable backend fails immediately with a configuration error instead
//! of surfacing as an empty result.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::Deserialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::http_client::{HttpClient, HttpRequest};
use crate::table::{parse_iso_date, statements_from_table, StatementTable};
use crate::{
    chart_interval, FinancialMetricsSnapshot, PriceBar, PriceSnapshot, ProviderError,
    ReportPeriod, StatementKind, StatementSeries, Ticker, ValidationError,
};

const TIMESERIES_URL: &str =
    "https://query1.finance.yahoo.com/ws/fundamentals-timeseries/v1/finance/timeseries";
const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const QUOTE_SUMMARY_URL: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary";
const QUOTE_SUMMARY_MODULES: &str = "price,summaryDetail,defaultKeyStatistics,financialData";

// Earliest period1 the timeseries endpoint accepts.
const TIMESERIES_START_EPOCH: i64 = 493_590_046;

const REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Statement lines requested from the timeseries endpoint, per family.
/// Row labels derive from these keys, so the normalized field names are
/// stable across calls.
const INCOME_STATEMENT_KEYS: &[&str] = &[
    "TotalRevenue",
    "CostOfRevenue",
    "GrossProfit",
    "OperatingExpense",
    "SellingGeneralAndAdministration",
    "ResearchAndDevelopment",
    "OperatingIncome",
    "InterestExpense",
    "PretaxIncome",
    "TaxProvision",
    "NetIncome",
    "BasicEPS",
    "DilutedEPS",
    "EBITDA",
    "EBIT",
];

const BALANCE_SHEET_KEYS: &[&str] = &[
    "TotalAssets",
    "CurrentAssets",
    "CashAndCashEquivalents",
    "Receivables",
    "Inventory",
    "NetPPE",
    "Goodwill",
    "TotalLiabilitiesNetMinorityInterest",
    "CurrentLiabilities",
    "AccountsPayable",
    "CurrentDebt",
    "LongTermDebt",
    "StockholdersEquity",
    "RetainedEarnings",
    "WorkingCapital",
];

const CASH_FLOW_KEYS: &[&str] = &[
    "OperatingCashFlow",
    "InvestingCashFlow",
    "FinancingCashFlow",
    "FreeCashFlow",
    "CapitalExpenditure",
    "DepreciationAndAmortization",
    "StockBasedCompensation",
    "ChangeInWorkingCapital",
    "RepurchaseOfCapitalStock",
    "CashDividendsPaid",
    "EndCashPosition",
];

pub struct YahooFinanceClient {
    http_client: Arc<dyn HttpClient>,
    available: bool,
}

impl YahooFinanceClient {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            available: true,
        }
    }

    /// Mark the backend unavailable. Selection is unaffected; operations
    /// fail with a configuration error when actually attempted.
    pub fn with_availability(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    fn ensure_available(&self) -> Result<(), ProviderError> {
        if self.available {
            Ok(())
        } else {
            Err(ProviderError::configuration(
                "yahoo_finance backend is not available in this environment",
            ))
        }
    }

    async fn fetch(&self, url: String) -> Result<String, ProviderError> {
        let request = HttpRequest::get(url)
            .with_header("referer", "https://finance.yahoo.com/")
            .with_timeout_ms(REQUEST_TIMEOUT_MS);

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| ProviderError::transport(e.message()))?;

        if !response.is_success() {
            return Err(ProviderError::upstream(response.status, response.body));
        }

        Ok(response.body)
    }

    /// Fetch one statement family as a normalized series.
    ///
    /// `ttm` aliases the annual series; a ticker with no filings yields an
    /// empty series, not an error.
    pub async fn statements(
        &self,
        ticker: &Ticker,
        kind: StatementKind,
        period: ReportPeriod,
        limit: usize,
    ) -> Result<StatementSeries, ProviderError> {
        self.ensure_available()?;

        let prefix = match period {
            ReportPeriod::Quarterly => "quarterly",
            ReportPeriod::Annual | ReportPeriod::Ttm => "annual",
        };
        let types = timeseries_keys(kind)
            .iter()
            .map(|key| format!("{prefix}{key}"))
            .collect::<Vec<_>>()
            .join(",");

        let url = format!(
            "{TIMESERIES_URL}/{symbol}?symbol={symbol}&type={types}&period1={start}&period2={end}",
            symbol = urlencoding::encode(ticker.as_str()),
            start = TIMESERIES_START_EPOCH,
            end = OffsetDateTime::now_utc().unix_timestamp(),
        );

        let body = self.fetch(url).await?;
        let table = timeseries_table(&body, prefix)?;
        let statements = statements_from_table(&table, limit);
        Ok(StatementSeries::new(ticker.clone(), period, statements))
    }

    /// Fetch OHLCV history between two `YYYY-MM-DD` dates.
    pub async fn price_history(
        &self,
        ticker: &Ticker,
        interval: &str,
        interval_multiplier: u32,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<PriceBar>, ProviderError> {
        self.ensure_available()?;

        let url = format!(
            "{CHART_URL}/{symbol}?period1={start}&period2={end}&interval={interval}",
            symbol = urlencoding::encode(ticker.as_str()),
            start = date_to_unix(start_date)?,
            end = date_to_unix(end_date)?,
            interval = chart_interval(interval, interval_multiplier),
        );

        let body = self.fetch(url).await?;
        price_bars(&body)
    }

    /// Fetch a point-in-time quote projected into the snapshot shape.
    pub async fn price_snapshot(&self, ticker: &Ticker) -> Result<PriceSnapshot, ProviderError> {
        self.ensure_available()?;

        let summary = self.fetch_quote_summary(ticker).await?;
        let price = summary.price.unwrap_or_default();
        let detail = summary.summary_detail.unwrap_or_default();
        let financial = summary.financial_data.unwrap_or_default();

        let captured_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .expect("UTC timestamp is RFC3339 formattable");

        Ok(PriceSnapshot {
            ticker: ticker.clone(),
            // Current price when reported, else the regular market price.
            price: raw(&financial.current_price).or_else(|| raw(&price.regular_market_price)),
            open: raw(&price.regular_market_open).or_else(|| raw(&detail.open)),
            high: raw(&price.regular_market_day_high).or_else(|| raw(&detail.day_high)),
            low: raw(&price.regular_market_day_low).or_else(|| raw(&detail.day_low)),
            close: raw(&price.regular_market_previous_close)
                .or_else(|| raw(&detail.previous_close)),
            volume: raw(&price.regular_market_volume)
                .or_else(|| raw(&detail.volume))
                .map(|v| v as u64),
            market_cap: raw(&price.market_cap).or_else(|| raw(&detail.market_cap)),
            timestamp: captured_at,
        })
    }

    /// Fetch the valuation/profitability ratio snapshot. Fields the backend
    /// does not report stay absent.
    pub async fn financial_metrics(
        &self,
        ticker: &Ticker,
    ) -> Result<FinancialMetricsSnapshot, ProviderError> {
        self.ensure_available()?;

        let summary = self.fetch_quote_summary(ticker).await?;
        let price = summary.price.unwrap_or_default();
        let detail = summary.summary_detail.unwrap_or_default();
        let stats = summary.default_key_statistics.unwrap_or_default();
        let financial = summary.financial_data.unwrap_or_default();

        Ok(FinancialMetricsSnapshot {
            ticker: ticker.clone(),
            market_cap: raw(&price.market_cap).or_else(|| raw(&detail.market_cap)),
            pe_ratio: raw(&detail.trailing_pe),
            forward_pe: raw(&detail.forward_pe).or_else(|| raw(&stats.forward_pe)),
            peg_ratio: raw(&stats.peg_ratio),
            price_to_book: raw(&stats.price_to_book),
            price_to_sales: raw(&detail.price_to_sales_trailing_12_months),
            enterprise_value: raw(&stats.enterprise_value),
            ev_to_revenue: raw(&stats.enterprise_to_revenue),
            ev_to_ebitda: raw(&stats.enterprise_to_ebitda),
            profit_margin: raw(&financial.profit_margins),
            operating_margin: raw(&financial.operating_margins),
            return_on_assets: raw(&financial.return_on_assets),
            return_on_equity: raw(&financial.return_on_equity),
            revenue: raw(&financial.total_revenue),
            revenue_per_share: raw(&financial.revenue_per_share),
            earnings_per_share: raw(&stats.trailing_eps),
            dividend_yield: raw(&detail.dividend_yield),
            beta: raw(&detail.beta).or_else(|| raw(&stats.beta)),
            week_52_high: raw(&detail.fifty_two_week_high),
            week_52_low: raw(&detail.fifty_two_week_low),
        })
    }

    async fn fetch_quote_summary(
        &self,
        ticker: &Ticker,
    ) -> Result<QuoteSummaryResult, ProviderError> {
        let url = format!(
            "{QUOTE_SUMMARY_URL}/{symbol}?modules={QUOTE_SUMMARY_MODULES}",
            symbol = urlencoding::encode(ticker.as_str()),
        );

        let body = self.fetch(url).await?;
        let parsed: QuoteSummaryResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::decode(e.to_string()))?;

        Ok(parsed
            .quote_summary
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .unwrap_or_default())
    }
}

const fn timeseries_keys(kind: StatementKind) -> &'static [&'static str] {
    match kind {
        StatementKind::IncomeStatement => INCOME_STATEMENT_KEYS,
        StatementKind::BalanceSheet => BALANCE_SHEET_KEYS,
        StatementKind::CashFlowStatement => CASH_FLOW_KEYS,
    }
}

/// Split a timeseries key into a spaced label: `TotalRevenue` becomes
/// `Total Revenue`, acronym runs stay intact (`NetPPE` becomes `Net PPE`).
fn display_label(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let mut label = String::with_capacity(key.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_ascii_uppercase() {
            let prev = chars[i - 1];
            let starts_word = chars.get(i + 1).is_some_and(|next| next.is_ascii_lowercase());
            if prev.is_ascii_lowercase() || (prev.is_ascii_uppercase() && starts_word) {
                label.push(' ');
            }
        }
        label.push(c);
    }

    label
}

fn date_to_unix(input: &str) -> Result<i64, ProviderError> {
    let date = parse_iso_date(input).ok_or_else(|| ValidationError::InvalidDate {
        value: input.to_owned(),
    })?;
    Ok(date.midnight().assume_utc().unix_timestamp())
}

fn format_date(unix: i64) -> Option<String> {
    let ts = OffsetDateTime::from_unix_timestamp(unix).ok()?;
    Some(format!(
        "{:04}-{:02}-{:02}",
        ts.year(),
        u8::from(ts.month()),
        ts.day()
    ))
}

fn raw(value: &Option<RawValue>) -> Option<f64> {
    value.and_then(RawValue::value)
}

// ============================================================================
// Fundamentals timeseries parsing
// ============================================================================

fn timeseries_table(body: &str, prefix: &str) -> Result<StatementTable, ProviderError> {
    let parsed: TimeseriesResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::decode(e.to_string()))?;

    let mut series: Vec<(String, BTreeMap<String, Option<f64>>)> = Vec::new();
    let mut dates: BTreeSet<String> = BTreeSet::new();

    for result in parsed.timeseries.result.unwrap_or_default() {
        let Some(type_name) = result.meta.types.first() else {
            continue;
        };
        let Some(raw_entries) = result.series.get(type_name) else {
            continue;
        };
        let entries: Vec<Option<TimeseriesEntry>> =
            serde_json::from_value(raw_entries.clone()).unwrap_or_default();

        let key = type_name
            .strip_prefix(prefix)
            .unwrap_or(type_name)
            .to_owned();
        let mut values = BTreeMap::new();
        for entry in entries.into_iter().flatten() {
            let value = entry.reported_value.and_then(RawValue::value);
            dates.insert(entry.as_of_date.clone());
            values.insert(entry.as_of_date, value);
        }

        if !values.is_empty() {
            series.push((key, values));
        }
    }

    // Native column order is most recent report date first.
    let columns: Vec<String> = dates.into_iter().rev().collect();
    let mut table = StatementTable::with_columns(columns.clone());
    for (key, values) in series {
        let row = columns
            .iter()
            .map(|date| values.get(date).copied().flatten())
            .collect();
        table.push_row(display_label(&key), row);
    }

    Ok(table)
}

#[derive(Debug, Clone, Deserialize)]
struct TimeseriesResponse {
    timeseries: TimeseriesData,
}

#[derive(Debug, Clone, Deserialize)]
struct TimeseriesData {
    #[serde(default)]
    result: Option<Vec<TimeseriesResult>>,
}

#[derive(Debug, Clone, Deserialize)]
struct TimeseriesResult {
    meta: TimeseriesMeta,
    #[serde(flatten)]
    series: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
struct TimeseriesMeta {
    #[serde(rename = "type")]
    types: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct TimeseriesEntry {
    #[serde(rename = "asOfDate")]
    as_of_date: String,
    #[serde(rename = "reportedValue", default)]
    reported_value: Option<RawValue>,
}

// ============================================================================
// Chart parsing
// ============================================================================

fn price_bars(body: &str) -> Result<Vec<PriceBar>, ProviderError> {
    let parsed: ChartResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::decode(e.to_string()))?;

    let Some(result) = parsed.chart.result.unwrap_or_default().into_iter().next() else {
        return Ok(Vec::new());
    };
    let timestamps = result.timestamp.unwrap_or_default();
    let Some(quote) = result.indicators.quote.into_iter().next() else {
        return Ok(Vec::new());
    };

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        // A bar is only emitted when the backend reported the full record.
        let (Some(Some(open)), Some(Some(high)), Some(Some(low)), Some(Some(close)), Some(Some(volume))) = (
            quote.open.get(i).copied(),
            quote.high.get(i).copied(),
            quote.low.get(i).copied(),
            quote.close.get(i).copied(),
            quote.volume.get(i).copied(),
        ) else {
            continue;
        };
        let Some(date) = format_date(ts) else {
            continue;
        };

        bars.push(PriceBar {
            date,
            open,
            high,
            low,
            close,
            volume: volume.max(0) as u64,
        });
    }

    Ok(bars)
}

#[derive(Debug, Clone, Deserialize)]
struct ChartResponse {
    chart: ChartData,
}

#[derive(Debug, Clone, Deserialize)]
struct ChartData {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Clone, Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<i64>>,
}

// ============================================================================
// Quote summary parsing
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
struct QuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummaryData,
}

#[derive(Debug, Clone, Deserialize)]
struct QuoteSummaryData {
    #[serde(default)]
    result: Option<Vec<QuoteSummaryResult>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct QuoteSummaryResult {
    #[serde(default)]
    price: Option<PriceModule>,
    #[serde(rename = "summaryDetail", default)]
    summary_detail: Option<SummaryDetailModule>,
    #[serde(rename = "defaultKeyStatistics", default)]
    default_key_statistics: Option<KeyStatisticsModule>,
    #[serde(rename = "financialData", default)]
    financial_data: Option<FinancialDataModule>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PriceModule {
    #[serde(rename = "regularMarketPrice", default)]
    regular_market_price: Option<RawValue>,
    #[serde(rename = "regularMarketOpen", default)]
    regular_market_open: Option<RawValue>,
    #[serde(rename = "regularMarketDayHigh", default)]
    regular_market_day_high: Option<RawValue>,
    #[serde(rename = "regularMarketDayLow", default)]
    regular_market_day_low: Option<RawValue>,
    #[serde(rename = "regularMarketPreviousClose", default)]
    regular_market_previous_close: Option<RawValue>,
    #[serde(rename = "regularMarketVolume", default)]
    regular_market_volume: Option<RawValue>,
    #[serde(rename = "marketCap", default)]
    market_cap: Option<RawValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SummaryDetailModule {
    #[serde(default)]
    open: Option<RawValue>,
    #[serde(rename = "dayHigh", default)]
    day_high: Option<RawValue>,
    #[serde(rename = "dayLow", default)]
    day_low: Option<RawValue>,
    #[serde(rename = "previousClose", default)]
    previous_close: Option<RawValue>,
    #[serde(default)]
    volume: Option<RawValue>,
    #[serde(rename = "marketCap", default)]
    market_cap: Option<RawValue>,
    #[serde(rename = "trailingPE", default)]
    trailing_pe: Option<RawValue>,
    #[serde(rename = "forwardPE", default)]
    forward_pe: Option<RawValue>,
    #[serde(rename = "priceToSalesTrailing12Months", default)]
    price_to_sales_trailing_12_months: Option<RawValue>,
    #[serde(rename = "dividendYield", default)]
    dividend_yield: Option<RawValue>,
    #[serde(default)]
    beta: Option<RawValue>,
    #[serde(rename = "fiftyTwoWeekHigh", default)]
    fifty_two_week_high: Option<RawValue>,
    #[serde(rename = "fiftyTwoWeekLow", default)]
    fifty_two_week_low: Option<RawValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct KeyStatisticsModule {
    #[serde(rename = "forwardPE", default)]
    forward_pe: Option<RawValue>,
    #[serde(rename = "pegRatio", default)]
    peg_ratio: Option<RawValue>,
    #[serde(rename = "priceToBook", default)]
    price_to_book: Option<RawValue>,
    #[serde(rename = "enterpriseValue", default)]
    enterprise_value: Option<RawValue>,
    #[serde(rename = "enterpriseToRevenue", default)]
    enterprise_to_revenue: Option<RawValue>,
    #[serde(rename = "enterpriseToEbitda", default)]
    enterprise_to_ebitda: Option<RawValue>,
    #[serde(rename = "trailingEps", default)]
    trailing_eps: Option<RawValue>,
    #[serde(default)]
    beta: Option<RawValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct FinancialDataModule {
    #[serde(rename = "currentPrice", default)]
    current_price: Option<RawValue>,
    #[serde(rename = "profitMargins", default)]
    profit_margins: Option<RawValue>,
    #[serde(rename = "operatingMargins", default)]
    operating_margins: Option<RawValue>,
    #[serde(rename = "returnOnAssets", default)]
    return_on_assets: Option<RawValue>,
    #[serde(rename = "returnOnEquity", default)]
    return_on_equity: Option<RawValue>,
    #[serde(rename = "totalRevenue", default)]
    total_revenue: Option<RawValue>,
    #[serde(rename = "revenuePerShare", default)]
    revenue_per_share: Option<RawValue>,
}

/// Numeric values arrive wrapped with formatting metadata; only the raw
/// finite number is kept.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
struct RawValue {
    #[serde(default)]
    raw: Option<f64>,
}

impl RawValue {
    fn value(self) -> Option<f64> {
        self.raw.filter(|v| v.is_finite())
    }
}
