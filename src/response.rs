use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde_json::Value;

/// Response body, parsed as JSON when possible
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    /// Body that is not valid JSON, e.g. the plain `ok` incoming webhooks answer with
    Raw(String),
}

impl ResponseBody {
    /// Parse the body as JSON, keeping the original text when that fails
    pub fn parse(text: String) -> Self {
        match serde_json::from_str(&text) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Raw(text),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Raw(_) => None,
        }
    }

    pub fn as_raw(&self) -> Option<&str> {
        match self {
            Self::Json(_) => None,
            Self::Raw(text) => Some(text.as_str()),
        }
    }
}

/// One HTTP exchange with Slack
///
/// Any status Slack answers with is kept, including 4xx and 5xx.
#[derive(Debug, Clone)]
pub struct ResponseRecord {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: ResponseBody,
}

impl ResponseRecord {
    pub(crate) async fn read(response: reqwest::Response) -> reqwest::Result<Self> {
        let status = response.status();
        let headers = response.headers().clone();
        let text = response.text().await?;

        Ok(Self {
            status,
            headers,
            body: ResponseBody::parse(text),
        })
    }

    /// Whether Slack asked to try again later (5xx or 429)
    pub(crate) fn is_transient(&self) -> bool {
        self.status.is_server_error() || self.status == StatusCode::TOO_MANY_REQUESTS
    }

    /// Whether the body carries Slack's `"ok": true` envelope
    ///
    /// Web API methods report failures this way, with a 200 status.
    pub fn is_ok(&self) -> bool {
        self.body
            .as_json()
            .and_then(|body| body.get("ok"))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// The Web API `error` code, if Slack reported one
    pub fn error(&self) -> Option<&str> {
        self.body.as_json()?.get("error")?.as_str()
    }
}
