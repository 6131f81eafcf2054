use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::config::SlackConfig;
use crate::dispatch;
use crate::errors::{Result, SlackError};
use crate::response::ResponseRecord;
use crate::types::{MessageOptions, Payload};
use crate::webhooks::{WebhookSet, Webhooks};

/// Client for Slack incoming webhooks and the Slack Web API
///
/// The client owns its list of webhooks. Mutating it needs `&mut self`, while
/// `webhook` and `api` only read it, so a dispatch always works on the list as
/// it was when the call started. Sharing one client between tasks that also
/// mutate it is left to the caller (e.g. behind a lock or by cloning).
///
/// # Example
///
/// ```rust,no_run
/// use slack_dispatch::{MessageOptions, SlackClient, SlackConfig};
/// use serde_json::json;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut client = SlackClient::new(
///         SlackConfig::new()
///             .with_token("xoxb-token")
///             .with_webhooks("https://hooks.slack.com/services/T000/B000/XXXX"),
///     )?;
///
///     client.add_webhooks(vec!["https://hooks.slack.com/services/T000/B000/YYYY"])?;
///
///     let options = MessageOptions::new()
///         .with_channel("#development")
///         .with_text("Deploy finished")
///         .with_icon_emoji(":rocket:");
///     let responses = client.webhook(&options).await?;
///     assert_eq!(responses.len(), 2);
///
///     let response = client.api("api.test", &json!({ "foo": "bar" })).await?;
///     assert!(response.is_ok());
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct SlackClient {
    client: ClientWithMiddleware,
    config: SlackConfig,
    webhooks: WebhookSet,
}

impl SlackClient {
    /// Create a new Slack client
    ///
    /// Webhooks from `config` are validated and stored.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configured webhooks are invalid
    /// - The HTTP client cannot be built
    pub fn new(config: SlackConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(SlackError::BuildHttpClient)?;

        let client = ClientBuilder::new(client).build();

        Self::with_client(client, config)
    }

    /// Create a new client with a custom reqwest middleware client
    ///
    /// This allows you to add custom middleware (logging, auth, etc.).
    /// `config.timeout` is not applied; configure it on `client` instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured webhooks are invalid.
    pub fn with_client(client: ClientWithMiddleware, config: SlackConfig) -> Result<Self> {
        let webhooks = WebhookSet::initialize(config.webhooks.clone())?;

        Ok(Self {
            client,
            config,
            webhooks,
        })
    }

    /// Append one or more webhooks
    ///
    /// # Errors
    ///
    /// Returns [`SlackError::InvalidWebhook`] and stores nothing if any URL is empty.
    pub fn add_webhooks(&mut self, webhooks: impl Into<Webhooks>) -> Result<&mut Self> {
        self.webhooks.add(webhooks.into())?;
        Ok(self)
    }

    /// Replace every stored webhook with the given ones
    ///
    /// # Errors
    ///
    /// Returns [`SlackError::InvalidWebhook`] if any URL is empty. The stored
    /// webhooks are cleared before validation, so they stay empty in that case.
    pub fn set_webhooks(&mut self, webhooks: impl Into<Webhooks>) -> Result<&mut Self> {
        self.webhooks.replace(webhooks.into())?;
        Ok(self)
    }

    /// Remove every stored webhook equal to one of the given URLs
    ///
    /// URLs that are not stored are ignored.
    pub fn remove_webhooks(&mut self, webhooks: impl Into<Webhooks>) -> &mut Self {
        self.webhooks.remove(&webhooks.into());
        self
    }

    /// Currently stored webhooks, in dispatch order
    pub fn webhooks(&self) -> &[String] {
        self.webhooks.as_slice()
    }

    pub fn config(&self) -> &SlackConfig {
        &self.config
    }

    /// Post a message to every stored webhook
    ///
    /// All webhooks are called concurrently and the responses are returned in
    /// the order the webhooks are stored. Error statuses such as `404
    /// no_service` come back as records; 5xx and 429 are retried first.
    ///
    /// # Errors
    ///
    /// Fails as a whole if any single webhook fails after its retries:
    /// - A stored webhook is not a valid URL
    /// - The HTTP request fails (connection refused, timeout)
    #[instrument(
        name = "SlackClient::webhook",
        skip_all,
        fields(webhook_count = self.webhooks.as_slice().len())
    )]
    pub async fn webhook(&self, options: &MessageOptions) -> Result<Vec<ResponseRecord>> {
        let urls = self.webhooks.snapshot();
        if urls.is_empty() {
            debug!("No webhooks to post to");
            return Ok(Vec::new());
        }

        let payload = Payload::build(options);
        let responses =
            dispatch::send_webhooks(&self.client, self.config.retry_policy(), &payload, &urls)
                .await?;

        debug!("Message posted to all webhooks");
        Ok(responses)
    }

    /// Same as [`webhook`](Self::webhook), also handing the outcome to `callback`
    ///
    /// `callback` runs exactly once, after the dispatch settles, with the same
    /// outcome that is returned.
    pub async fn webhook_with_callback<F>(
        &self,
        options: &MessageOptions,
        callback: F,
    ) -> Result<Vec<ResponseRecord>>
    where
        F: FnOnce(std::result::Result<&[ResponseRecord], &SlackError>),
    {
        let result = self.webhook(options).await;
        callback(result.as_deref());
        result
    }

    /// Call a Slack Web API method
    ///
    /// `options` must serialize to a JSON object (or `()` for none). The
    /// configured token is added as the `token` parameter. `files.upload` is
    /// sent as a multipart POST, every other method as a GET with a query
    /// string.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `options` is not an object
    /// - The HTTP request fails (connection refused, timeout)
    #[instrument(name = "SlackClient::api", skip(self, options))]
    pub async fn api<T>(&self, method: &str, options: &T) -> Result<ResponseRecord>
    where
        T: Serialize + ?Sized,
    {
        let params = dispatch::api_params(options, self.config.token.as_deref())?;

        dispatch::call_api(
            &self.client,
            self.config.retry_policy(),
            &self.config.base_url,
            method,
            params,
        )
        .await
    }

    /// Same as [`api`](Self::api), also handing the outcome to `callback`
    pub async fn api_with_callback<T, F>(
        &self,
        method: &str,
        options: &T,
        callback: F,
    ) -> Result<ResponseRecord>
    where
        T: Serialize + ?Sized,
        F: FnOnce(std::result::Result<&ResponseRecord, &SlackError>),
    {
        let result = self.api(method, options).await;
        callback(result.as_ref());
        result
    }
}
