use thiserror::Error;

/// Validation errors for request inputs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("ticker cannot be empty")]
    EmptyTicker,
    #[error("ticker length {len} exceeds max {max}")]
    TickerTooLong { len: usize, max: usize },
    #[error("invalid report period '{value}', expected one of annual, quarterly, ttm")]
    InvalidReportPeriod { value: String },
    #[error("invalid date '{value}', expected YYYY-MM-DD")]
    InvalidDate { value: String },
}

/// Errors surfaced by the provider layer.
///
/// Nothing here is retried locally. Every failure propagates unchanged to the
/// caller, which owns retry/degrade policy. An empty statement or price series
/// is a valid result, never an error.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// A backend was invoked while not configured or not available. Surfaced
    /// loudly so misconfiguration is never mistaken for "no data".
    #[error("{0}")]
    Configuration(String),

    /// The backend answered with a non-success HTTP status. The status and
    /// body are carried intact.
    #[error("upstream returned status {status}")]
    Upstream { status: u16, body: String },

    /// The request never produced an HTTP response (connect failure, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend payload did not match the expected shape.
    #[error("failed to decode upstream payload: {0}")]
    Decode(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ProviderError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn upstream(status: u16, body: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            body: body.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}
