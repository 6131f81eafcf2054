use thiserror::Error;

/// Result type alias for Slack operations
pub type Result<T> = std::result::Result<T, SlackError>;

/// Errors that can occur when talking to Slack
#[derive(Debug, Error)]
pub enum SlackError {
    /// Webhook input was not a non-empty string or a sequence of strings
    #[error("can only handle strings or array of strings. You provided: {value}")]
    InvalidWebhook {
        /// The rejected input, rendered for diagnostics
        value: String,
    },

    /// A webhook or API endpoint is not an absolute URL
    #[error("Invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// API options did not describe a set of named parameters
    #[error("API options must serialize to a JSON object, got {0}")]
    InvalidOptions(String),

    /// Failed to build HTTP client
    #[error("Failed to build HTTP client: {0}")]
    BuildHttpClient(#[source] reqwest::Error),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[source] reqwest_middleware::Error),

    /// Failed to serialize a payload or options
    #[error("Failed to serialize request: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl SlackError {
    pub(crate) fn invalid_webhook(value: impl std::fmt::Debug) -> Self {
        Self::InvalidWebhook {
            value: format!("{value:?}"),
        }
    }

    /// Check if the error is retryable
    ///
    /// Returns `true` for network/connection errors and timeouts. Error
    /// statuses are not errors; they come back as a [`ResponseRecord`](crate::ResponseRecord).
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(source) => match source {
                reqwest_middleware::Error::Reqwest(err) => err.is_connect() || err.is_timeout(),
                reqwest_middleware::Error::Middleware(inner) => inner
                    .downcast_ref::<reqwest::Error>()
                    .is_some_and(|err| err.is_connect() || err.is_timeout()),
            },
            _ => false,
        }
    }
}
