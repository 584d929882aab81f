//! Behavior tests for provider selection.
//!
//! The commercial backend is active only when both the API key and the
//! explicit opt-in flag are configured; every other combination falls back
//! to the free backend, deterministically.

use std::sync::Arc;

use finbridge_tests::{
    commercial_config, free_config, FinancialTools, ProviderConfig, ProviderKind,
    RoutedHttpClient,
};

#[test]
fn commercial_backend_requires_both_key_and_opt_in() {
    let combinations = [
        (Some("fd-key"), true, ProviderKind::FinancialDatasets),
        (Some("fd-key"), false, ProviderKind::YahooFinance),
        (None, true, ProviderKind::YahooFinance),
        (None, false, ProviderKind::YahooFinance),
    ];

    for (key, opt_in, expected) in combinations {
        let config = ProviderConfig::new(key.map(String::from), opt_in, true);
        assert_eq!(
            config.active_provider(),
            expected,
            "key={key:?} opt_in={opt_in}"
        );
    }
}

#[test]
fn selection_is_deterministic_across_repeated_reads() {
    let config = commercial_config();
    let first = config.active_provider();
    for _ in 0..5 {
        assert_eq!(config.active_provider(), first);
        assert_eq!(config.status(), config.status());
    }
}

#[test]
fn status_reports_each_backend_availability_independently() {
    // Key present but no opt-in: the free backend is selected while the
    // commercial one still reports as available.
    let config = ProviderConfig::new(Some(String::from("fd-key")), false, true);
    let status = config.status();

    assert_eq!(status.provider, ProviderKind::YahooFinance);
    assert!(status.financial_datasets_available);
    assert!(status.yahoo_finance_available);
}

#[test]
fn free_backend_can_be_selected_while_unavailable() {
    // Unavailability must not flip the selection; it only surfaces when an
    // operation is attempted.
    let config = free_config().without_yahoo_finance();
    let status = config.status();

    assert_eq!(status.provider, ProviderKind::YahooFinance);
    assert!(!status.yahoo_finance_available);
}

#[test]
fn tools_expose_the_selection_as_a_status_query() {
    let tools = FinancialTools::with_http_client(
        commercial_config(),
        Arc::new(RoutedHttpClient::new()),
    );

    let status = tools.provider_status();
    assert_eq!(status.provider, ProviderKind::FinancialDatasets);
    assert!(status.financial_datasets_available);
    assert!(tools.supports_range_filters());

    let free_tools =
        FinancialTools::with_http_client(free_config(), Arc::new(RoutedHttpClient::new()));
    assert_eq!(free_tools.provider_status().provider, ProviderKind::YahooFinance);
    assert!(!free_tools.supports_range_filters());
}
