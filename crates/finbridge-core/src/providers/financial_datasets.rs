//! Commercial structured-data API client.
//!
//! Thin authenticated GET wrapper: the provider returns records that are
//! already normalized, so the payload passes through verbatim. The API key
//! travels in the `x-api-key` header only, never in the URL.

use std::sync::Arc;

use crate::http_client::{HttpClient, HttpRequest};
use crate::ProviderError;

pub const FINANCIAL_DATASETS_BASE_URL: &str = "https://api.financialdatasets.ai";

const REQUEST_TIMEOUT_MS: u64 = 15_000;

pub struct FinancialDatasetsClient {
    http_client: Arc<dyn HttpClient>,
    api_key: String,
    base_url: String,
}

impl FinancialDatasetsClient {
    /// Callers must have confirmed the commercial backend is selected before
    /// constructing this client; an empty key is rejected here so a
    /// misconfigured process fails loudly instead of fetching nothing.
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        api_key: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ProviderError::configuration(
                "financial_datasets API key is not configured",
            ));
        }

        Ok(Self {
            http_client,
            api_key,
            base_url: String::from(FINANCIAL_DATASETS_BASE_URL),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Issue a GET against `endpoint` with the given query parameters and
    /// return the JSON envelope. A non-2xx status propagates with its body
    /// intact; there is no retry or backoff at this layer.
    pub async fn call(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<serde_json::Value, ProviderError> {
        let query = params
            .iter()
            .map(|(name, value)| format!("{name}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");
        let url = if query.is_empty() {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}{}?{}", self.base_url, endpoint, query)
        };

        let request = HttpRequest::get(url)
            .with_header("x-api-key", &self.api_key)
            .with_timeout_ms(REQUEST_TIMEOUT_MS);

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| ProviderError::transport(e.message()))?;

        if !response.is_success() {
            return Err(ProviderError::upstream(response.status, response.body));
        }

        serde_json::from_str(&response.body).map_err(|e| ProviderError::decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::HttpResponse;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;

    struct CannedHttpClient {
        response: HttpResponse,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl CannedHttpClient {
        fn new(response: HttpResponse) -> Self {
            Self {
                response,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn last_request(&self) -> HttpRequest {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .last()
                .cloned()
                .expect("a request should have been issued")
        }
    }

    impl HttpClient for CannedHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, crate::http_client::HttpError>> + Send + 'a>>
        {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request);
            let response = self.response.clone();
            Box::pin(async move { Ok(response) })
        }
    }

    #[tokio::test]
    async fn sends_api_key_as_header_not_query_parameter() {
        let client = Arc::new(CannedHttpClient::new(HttpResponse::ok_json("{}")));
        let api = FinancialDatasetsClient::new(client.clone(), "secret-key").expect("configured");

        api.call(
            "/financials/income-statements/",
            &[("ticker", String::from("AAPL"))],
        )
        .await
        .expect("call should succeed");

        let request = client.last_request();
        assert_eq!(
            request.headers.get("x-api-key").map(String::as_str),
            Some("secret-key")
        );
        assert!(!request.url.contains("secret-key"));
        assert!(request.url.starts_with(FINANCIAL_DATASETS_BASE_URL));
    }

    #[tokio::test]
    async fn non_success_status_propagates_with_body_intact() {
        let client = Arc::new(CannedHttpClient::new(HttpResponse {
            status: 402,
            body: String::from("{\"error\":\"payment required\"}"),
        }));
        let api = FinancialDatasetsClient::new(client, "secret-key").expect("configured");

        let error = api
            .call("/financials/balance-sheets/", &[])
            .await
            .expect_err("must fail");

        match error {
            ProviderError::Upstream { status, body } => {
                assert_eq!(status, 402);
                assert!(body.contains("payment required"));
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[test]
    fn empty_key_is_a_loud_configuration_error() {
        let client = Arc::new(CannedHttpClient::new(HttpResponse::ok_json("{}")));
        let error = FinancialDatasetsClient::new(client, "  ").expect_err("must fail");
        assert!(error.is_configuration());
    }
}
