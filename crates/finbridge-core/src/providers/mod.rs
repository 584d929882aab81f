//! Backend clients.
//!
//! [`financial_datasets`] wraps the paid structured-data API;
//! [`yahoo`] adapts the free market-data endpoints. Exactly one of them
//! services a given request; the dispatch decision lives in
//! [`crate::tools`].

pub mod financial_datasets;
pub mod yahoo;

pub use financial_datasets::{FinancialDatasetsClient, FINANCIAL_DATASETS_BASE_URL};
pub use yahoo::YahooFinanceClient;
