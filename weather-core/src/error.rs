use reqwest::StatusCode;

/// Errors produced while fetching or shaping weather data.
///
/// Handlers collapse every upstream variant into the same user-facing page,
/// but the variants are kept apart so logs say what actually went wrong.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("upstream request failed: {0}")]
    UpstreamRequest(#[from] reqwest::Error),

    #[error("upstream request timed out (after retry)")]
    Timeout,

    #[error("upstream returned status {status}: {body}")]
    UpstreamStatus { status: StatusCode, body: String },

    #[error("unexpected upstream response: {0}")]
    SchemaMismatch(String),

    #[error("location not found: '{0}'")]
    LocationNotFound(String),

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDateFormat(String),

    #[error("no hourly samples to aggregate")]
    EmptyDataset,

    #[error("chart rendering failed: {0}")]
    Chart(String),
}

impl WeatherError {
    /// True for failures caused by the upstream services or their data.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            WeatherError::UpstreamRequest(_)
                | WeatherError::Timeout
                | WeatherError::UpstreamStatus { .. }
                | WeatherError::SchemaMismatch(_)
                | WeatherError::LocationNotFound(_)
                | WeatherError::EmptyDataset
        )
    }
}

pub type Result<T, E = WeatherError> = std::result::Result<T, E>;
