//! Process-wide provider selection.
//!
//! Resolved once at startup from environment state and read-only afterwards;
//! components receive the resolved [`ProviderConfig`] instead of re-deriving
//! it per call. There is no hot-reload.

use std::env;

use log::{info, warn};

use crate::{ProviderKind, ProviderStatus};

/// Environment variable holding the commercial API key.
pub const FINANCIAL_DATASETS_API_KEY_VAR: &str = "FINANCIAL_DATASETS_API_KEY";
/// Opt-in flag; must be explicitly truthy in addition to the key.
pub const USE_FINANCIAL_DATASETS_VAR: &str = "USE_FINANCIAL_DATASETS";

/// Capability descriptor for both backends.
///
/// The commercial backend is selected only when a non-empty API key is
/// configured AND the opt-in flag is truthy; in every other combination the
/// free backend is used unconditionally. Free-backend availability is
/// independent of selection: it can be the selected provider yet unavailable,
/// which surfaces as an error only when an operation is attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    financial_datasets_api_key: Option<String>,
    use_financial_datasets: bool,
    yahoo_finance_available: bool,
}

impl ProviderConfig {
    pub fn new(
        financial_datasets_api_key: Option<String>,
        use_financial_datasets: bool,
        yahoo_finance_available: bool,
    ) -> Self {
        Self {
            financial_datasets_api_key: financial_datasets_api_key
                .filter(|key| !key.trim().is_empty()),
            use_financial_datasets,
            yahoo_finance_available,
        }
    }

    /// Resolve the configuration from the environment. Idempotent: repeated
    /// calls against the same environment yield the same decision.
    pub fn from_env() -> Self {
        let api_key = env::var(FINANCIAL_DATASETS_API_KEY_VAR).ok();
        let opt_in = env::var(USE_FINANCIAL_DATASETS_VAR)
            .map(|value| is_truthy(&value))
            .unwrap_or(false);

        let config = Self::new(api_key, opt_in, true);
        match config.active_provider() {
            ProviderKind::FinancialDatasets => {
                info!("financial data provider: financial_datasets (API key + opt-in present)");
            }
            ProviderKind::YahooFinance => {
                info!("financial data provider: yahoo_finance (free tier)");
            }
        }
        config
    }

    /// Selection decision, fixed for the process lifetime.
    pub fn active_provider(&self) -> ProviderKind {
        if self.financial_datasets_api_key.is_some() && self.use_financial_datasets {
            ProviderKind::FinancialDatasets
        } else {
            ProviderKind::YahooFinance
        }
    }

    pub fn commercial_selected(&self) -> bool {
        self.active_provider() == ProviderKind::FinancialDatasets
    }

    pub fn financial_datasets_api_key(&self) -> Option<&str> {
        self.financial_datasets_api_key.as_deref()
    }

    pub fn yahoo_finance_available(&self) -> bool {
        self.yahoo_finance_available
    }

    /// Mark the free backend unavailable (its transport could not be set up).
    pub fn without_yahoo_finance(mut self) -> Self {
        warn!("yahoo_finance backend marked unavailable; free-tier operations will fail");
        self.yahoo_finance_available = false;
        self
    }

    /// Read-only status snapshot exposed to callers.
    pub fn status(&self) -> ProviderStatus {
        ProviderStatus {
            provider: self.active_provider(),
            financial_datasets_available: self.financial_datasets_api_key.is_some(),
            yahoo_finance_available: self.yahoo_finance_available,
        }
    }
}

fn is_truthy(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commercial_requires_key_and_opt_in() {
        let key = Some(String::from("fd-key"));

        let both = ProviderConfig::new(key.clone(), true, true);
        assert_eq!(both.active_provider(), ProviderKind::FinancialDatasets);

        let key_only = ProviderConfig::new(key.clone(), false, true);
        assert_eq!(key_only.active_provider(), ProviderKind::YahooFinance);

        let flag_only = ProviderConfig::new(None, true, true);
        assert_eq!(flag_only.active_provider(), ProviderKind::YahooFinance);

        let neither = ProviderConfig::new(None, false, true);
        assert_eq!(neither.active_provider(), ProviderKind::YahooFinance);
    }

    #[test]
    fn blank_key_counts_as_absent() {
        let config = ProviderConfig::new(Some(String::from("   ")), true, true);
        assert_eq!(config.active_provider(), ProviderKind::YahooFinance);
        assert!(!config.status().financial_datasets_available);
    }

    #[test]
    fn selection_is_stable_across_reads() {
        let config = ProviderConfig::new(Some(String::from("fd-key")), true, true);
        for _ in 0..3 {
            assert_eq!(config.active_provider(), ProviderKind::FinancialDatasets);
        }
    }

    #[test]
    fn status_reports_availability_independent_of_selection() {
        let config = ProviderConfig::new(Some(String::from("fd-key")), false, false);
        let status = config.status();

        assert_eq!(status.provider, ProviderKind::YahooFinance);
        assert!(status.financial_datasets_available);
        assert!(!status.yahoo_finance_available);
    }

    #[test]
    fn opt_in_flag_parsing() {
        assert!(is_truthy("true"));
        assert!(is_truthy("TRUE"));
        assert!(is_truthy(" true "));
        assert!(!is_truthy("false"));
        assert!(!is_truthy("1"));
        assert!(!is_truthy(""));
    }
}
