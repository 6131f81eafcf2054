//! Sending requests to webhooks and Web API methods.

use futures::future::try_join_all;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::Form;
use reqwest_middleware::ClientWithMiddleware;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::errors::{Result, SlackError};
use crate::response::ResponseRecord;
use crate::retry::RetryPolicy;
use crate::types::Payload;

/// The one Web API method sent as a multipart POST; every other method is a GET
pub const FILES_UPLOAD: &str = "files.upload";

fn parse_url(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|source| SlackError::InvalidUrl {
        url: url.to_string(),
        source,
    })
}

/// Buffer a response into a record, whatever its status
async fn read_response(response: reqwest::Response) -> Result<ResponseRecord> {
    ResponseRecord::read(response)
        .await
        .map_err(|err| SlackError::Request(err.into()))
}

/// POST the serialized payload to every URL concurrently
///
/// Responses come back in URL order. The first failure fails the whole call;
/// requests still in flight are dropped.
pub(crate) async fn send_webhooks(
    client: &ClientWithMiddleware,
    retry: RetryPolicy,
    payload: &Payload,
    urls: &[String],
) -> Result<Vec<ResponseRecord>> {
    let body = serde_json::to_vec(payload).map_err(SlackError::Serialize)?;

    try_join_all(
        urls.iter()
            .map(|url| send_webhook(client, retry, url, &body)),
    )
    .await
}

#[instrument(name = "slack::send_webhook", skip_all)]
async fn send_webhook(
    client: &ClientWithMiddleware,
    retry: RetryPolicy,
    url: &str,
    body: &[u8],
) -> Result<ResponseRecord> {
    let target = parse_url(url)?;
    // Webhook paths are credentials, only the host is logged
    debug!(host = target.host_str().unwrap_or_default(), "Posting to webhook");

    let record = retry
        .run(move || {
            let request = client
                .post(target.clone())
                .header(CONTENT_TYPE, "application/json")
                .body(body.to_vec());
            async move {
                let response = request.send().await.map_err(SlackError::Request)?;
                read_response(response).await
            }
        })
        .await?;

    if record.status.is_success() {
        debug!(status = %record.status, "Webhook delivered");
    } else {
        warn!(status = %record.status, "Webhook answered with an error status");
    }
    Ok(record)
}

/// Flatten API options into string parameters
///
/// Options must serialize to a JSON object (or to nothing at all). `null`
/// members are dropped, strings are sent as-is and any other value as its JSON
/// text. A configured token overrides one passed in the options.
pub(crate) fn api_params<T>(options: &T, token: Option<&str>) -> Result<Vec<(String, String)>>
where
    T: Serialize + ?Sized,
{
    let map = match serde_json::to_value(options).map_err(SlackError::Serialize)? {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => return Err(SlackError::InvalidOptions(other.to_string())),
    };

    let mut params: Vec<(String, String)> = map
        .into_iter()
        .filter(|(key, value)| !value.is_null() && !(token.is_some() && key == "token"))
        .map(|(key, value)| match value {
            Value::String(text) => (key, text),
            other => (key, other.to_string()),
        })
        .collect();

    if let Some(token) = token {
        params.push(("token".to_string(), token.to_string()));
    }

    Ok(params)
}

/// Issue a single Web API call to `base_url + method`
#[instrument(name = "slack::call_api", skip(client, retry, base_url, params))]
pub(crate) async fn call_api(
    client: &ClientWithMiddleware,
    retry: RetryPolicy,
    base_url: &str,
    method: &str,
    params: Vec<(String, String)>,
) -> Result<ResponseRecord> {
    let endpoint = parse_url(&format!("{base_url}{method}"))?;
    let upload = method == FILES_UPLOAD;

    debug!(url = %endpoint, upload, param_count = params.len(), "Calling Slack API");

    let record = retry
        .run(move || {
            let request = if upload {
                let form = params
                    .iter()
                    .fold(Form::new(), |form, (key, value)| {
                        form.text(key.clone(), value.clone())
                    });
                client.post(endpoint.clone()).multipart(form)
            } else {
                client.get(endpoint.clone()).query(&params)
            };
            async move {
                let response = request.send().await.map_err(SlackError::Request)?;
                read_response(response).await
            }
        })
        .await?;

    debug!(status = %record.status, ok = record.is_ok(), "Slack API responded");
    Ok(record)
}
