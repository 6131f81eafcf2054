use std::time::Duration;

use crate::retry::RetryPolicy;
use crate::webhooks::Webhooks;

/// Root of the Slack Web API; method names are appended to it
pub const DEFAULT_BASE_URL: &str = "https://slack.com/api/";

/// Default per-request timeout (10 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Settings for a [`SlackClient`](crate::SlackClient)
///
/// # Example
///
/// ```rust
/// use slack_dispatch::SlackConfig;
/// use std::time::Duration;
///
/// let config = SlackConfig::new()
///     .with_token("xoxb-token")
///     .with_timeout(Duration::from_secs(5))
///     .with_max_attempts(5)
///     .with_webhooks(vec!["https://hooks.slack.com/services/T/B/X"]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SlackConfig {
    /// Web API token, merged into every `api` call as the `token` parameter
    pub token: Option<String>,
    /// Per-attempt request timeout
    pub timeout: Duration,
    /// Attempts per request, including the first
    pub max_attempts: u32,
    /// Webhooks stored when the client is built
    pub webhooks: Option<Webhooks>,
    /// Web API base URL, must end with `/`
    pub base_url: String,
}

impl SlackConfig {
    /// Create a configuration with the defaults
    ///
    /// No token, no webhooks, a 10 second timeout and 3 attempts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the Web API token
    ///
    /// It is sent as the `token` parameter of every `api` call. Webhooks do not use it.
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    /// Set the per-attempt timeout
    ///
    /// Each retry gets the full timeout again.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the attempt budget
    ///
    /// Counts the first attempt too, so 1 disables retries. 0 is treated as 1.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Set the webhooks stored when the client is built
    ///
    /// They are validated by [`SlackClient::new`](crate::SlackClient::new).
    pub fn with_webhooks(mut self, webhooks: impl Into<Webhooks>) -> Self {
        self.webhooks = Some(webhooks.into());
        self
    }

    /// Set the Web API base URL
    ///
    /// Method names are appended as-is, so keep the trailing `/`.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    pub(crate) fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts)
    }
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            token: None,
            timeout: DEFAULT_TIMEOUT,
            max_attempts: RetryPolicy::DEFAULT_MAX_ATTEMPTS,
            webhooks: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}
