use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Reporting period for financial statements.
///
/// `Ttm` is trailing twelve months. The free backend has no separate TTM
/// series and serves the annual one in its place, which is a deliberate
/// approximation rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    Annual,
    Quarterly,
    Ttm,
}

impl ReportPeriod {
    pub const ALL: [Self; 3] = [Self::Annual, Self::Quarterly, Self::Ttm];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Annual => "annual",
            Self::Quarterly => "quarterly",
            Self::Ttm => "ttm",
        }
    }
}

impl Display for ReportPeriod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportPeriod {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "annual" => Ok(Self::Annual),
            "quarterly" => Ok(Self::Quarterly),
            "ttm" => Ok(Self::Ttm),
            other => Err(ValidationError::InvalidReportPeriod {
                value: other.to_owned(),
            }),
        }
    }
}

/// Price-history interval vocabulary accepted by the public operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceInterval {
    Minute,
    Day,
    Week,
    Month,
    Year,
}

impl PriceInterval {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "minute" => Some(Self::Minute),
            "day" => Some(Self::Day),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            "year" => Some(Self::Year),
            _ => None,
        }
    }
}

/// Translate an abstract `(interval, multiplier)` pair into the free
/// backend's interval vocabulary.
///
/// The mapping is total: week/month/year have a single native granularity
/// (the multiplier is ignored), and an unrecognized token falls back to
/// daily bars.
pub fn chart_interval(token: &str, multiplier: u32) -> String {
    match PriceInterval::from_token(token) {
        Some(PriceInterval::Minute) => format!("{multiplier}m"),
        Some(PriceInterval::Day) => format!("{multiplier}d"),
        Some(PriceInterval::Week) => String::from("1wk"),
        Some(PriceInterval::Month) => String::from("1mo"),
        Some(PriceInterval::Year) => String::from("1y"),
        None => String::from("1d"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_period_tokens() {
        assert_eq!(ReportPeriod::from_str("TTM").expect("must parse"), ReportPeriod::Ttm);
        let err = ReportPeriod::from_str("monthly").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidReportPeriod { .. }));
    }

    #[test]
    fn chart_interval_mapping_is_total() {
        assert_eq!(chart_interval("minute", 5), "5m");
        assert_eq!(chart_interval("day", 1), "1d");
        assert_eq!(chart_interval("week", 3), "1wk");
        assert_eq!(chart_interval("month", 12), "1mo");
        assert_eq!(chart_interval("year", 2), "1y");
        assert_eq!(chart_interval("unknown-token", 7), "1d");
    }
}
