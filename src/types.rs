use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Display, Formatter};

/// Channel used when a message does not name one
pub const DEFAULT_CHANNEL: &str = "#general";

/// Who gets to see a message posted through a webhook
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    /// Only visible to the user who triggered it
    #[default]
    Ephemeral,
    /// Visible to everyone in the channel
    InChannel,
}

impl Display for ResponseType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseType::Ephemeral => write!(f, "ephemeral"),
            ResponseType::InChannel => write!(f, "in_channel"),
        }
    }
}

/// Caller-supplied description of a webhook message
///
/// Every field is optional; [`Payload::build`] fills in the defaults.
///
/// # Example
///
/// ```rust
/// use slack_dispatch::{MessageOptions, ResponseType};
///
/// let options = MessageOptions::new()
///     .with_channel("#development")
///     .with_text("You cannot kill the battery!")
///     .with_username("Metal bot")
///     .with_icon_emoji(":metal:")
///     .with_response_type(ResponseType::InChannel);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MessageOptions {
    pub channel: Option<String>,
    pub text: Option<String>,
    pub username: Option<String>,
    /// Emoji name (`:metal:`) or an icon URL
    pub icon_emoji: Option<String>,
    pub attachments: Option<Value>,
    pub response_type: Option<ResponseType>,
    pub link_names: Option<bool>,
}

impl MessageOptions {
    /// Create empty options
    ///
    /// Every field falls back to its default when the payload is built.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target channel
    ///
    /// Defaults to `#general` when not set.
    pub fn with_channel(mut self, channel: &str) -> Self {
        self.channel = Some(channel.to_string());
        self
    }

    /// Set the message text
    ///
    /// Sent as an empty string when not set.
    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    /// Set the display name of the sender
    ///
    /// Left out of the payload when not set, so the webhook's own name is used.
    pub fn with_username(mut self, username: &str) -> Self {
        self.username = Some(username.to_string());
        self
    }

    /// Set the icon
    ///
    /// Values starting with `http` are sent as `icon_url`, anything else as
    /// `icon_emoji`.
    pub fn with_icon_emoji(mut self, icon: &str) -> Self {
        self.icon_emoji = Some(icon.to_string());
        self
    }

    /// Set message attachments
    ///
    /// The value is passed to Slack as given, usually an array of attachment objects.
    pub fn with_attachments(mut self, attachments: Value) -> Self {
        self.attachments = Some(attachments);
        self
    }

    /// Set who can see the message
    ///
    /// Defaults to [`ResponseType::Ephemeral`].
    pub fn with_response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = Some(response_type);
        self
    }

    /// Ask Slack to linkify `@user` and `#channel` names in the text
    pub fn with_link_names(mut self, link_names: bool) -> Self {
        self.link_names = Some(link_names);
        self
    }
}

/// Message icon, serialized as exactly one of `icon_emoji` or `icon_url`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Icon {
    #[serde(rename = "icon_emoji")]
    Emoji(String),
    #[serde(rename = "icon_url")]
    Url(String),
}

impl Icon {
    /// Classify an icon value; absent or empty becomes an empty emoji
    pub fn detect(value: Option<&str>) -> Self {
        match value {
            Some(value) if value.starts_with("http") => Icon::Url(value.to_string()),
            Some(value) => Icon::Emoji(value.to_string()),
            None => Icon::Emoji(String::new()),
        }
    }
}

/// JSON body posted to every incoming webhook
///
/// See: <https://api.slack.com/messaging/webhooks>
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payload {
    pub response_type: ResponseType,
    pub channel: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_names: Option<bool>,
    #[serde(flatten)]
    pub icon: Icon,
}

impl Payload {
    /// Derive the webhook payload from message options, applying defaults
    pub fn build(options: &MessageOptions) -> Self {
        Self {
            response_type: options.response_type.unwrap_or_default(),
            channel: options
                .channel
                .clone()
                .unwrap_or_else(|| DEFAULT_CHANNEL.to_string()),
            text: options.text.clone().unwrap_or_default(),
            username: options.username.clone(),
            attachments: options.attachments.clone(),
            link_names: options.link_names,
            icon: Icon::detect(options.icon_emoji.as_deref()),
        }
    }
}

impl From<&MessageOptions> for Payload {
    fn from(options: &MessageOptions) -> Self {
        Self::build(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_for_empty_options() {
        let payload = Payload::build(&MessageOptions::new());
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(
            json,
            json!({
                "response_type": "ephemeral",
                "channel": "#general",
                "text": "",
                "icon_emoji": "",
            })
        );
    }

    #[test]
    fn test_icon_url_detection() {
        let options = MessageOptions::new().with_icon_emoji("http://x/icon.png");
        let json = serde_json::to_value(Payload::build(&options)).unwrap();

        assert_eq!(json["icon_url"], "http://x/icon.png");
        assert!(json.get("icon_emoji").is_none());
    }

    #[test]
    fn test_icon_emoji_detection() {
        let options = MessageOptions::new().with_icon_emoji("smile");
        let json = serde_json::to_value(Payload::build(&options)).unwrap();

        assert_eq!(json["icon_emoji"], "smile");
        assert!(json.get("icon_url").is_none());
    }

    #[test]
    fn test_empty_icon_is_empty_emoji() {
        assert_eq!(Icon::detect(Some("")), Icon::Emoji(String::new()));
        assert_eq!(Icon::detect(None), Icon::Emoji(String::new()));
        assert_eq!(
            Icon::detect(Some("https://cdn/a.png")),
            Icon::Url("https://cdn/a.png".to_string())
        );
    }

    #[test]
    fn test_all_fields_pass_through() {
        let attachments = json!([{ "fallback": "plain", "color": "#36a64f" }]);
        let options = MessageOptions::new()
            .with_channel("#development")
            .with_text("hello")
            .with_username("Metal bot")
            .with_icon_emoji(":metal:")
            .with_attachments(attachments.clone())
            .with_response_type(ResponseType::InChannel)
            .with_link_names(true);

        let json = serde_json::to_value(Payload::from(&options)).unwrap();

        assert_eq!(
            json,
            json!({
                "response_type": "in_channel",
                "channel": "#development",
                "text": "hello",
                "username": "Metal bot",
                "attachments": attachments,
                "link_names": true,
                "icon_emoji": ":metal:",
            })
        );
    }

    #[test]
    fn test_build_is_deterministic() {
        let options = MessageOptions::new().with_text("same").with_icon_emoji("smile");
        assert_eq!(Payload::build(&options), Payload::build(&options));
    }

    #[test]
    fn test_response_type_display() {
        assert_eq!(ResponseType::Ephemeral.to_string(), "ephemeral");
        assert_eq!(ResponseType::InChannel.to_string(), "in_channel");
    }

    #[test]
    fn test_options_deserialize() {
        let options: MessageOptions = serde_json::from_value(json!({
            "channel": "#ops",
            "response_type": "in_channel",
        }))
        .unwrap();
        assert_eq!(options.channel.as_deref(), Some("#ops"));
        assert_eq!(options.response_type, Some(ResponseType::InChannel));
    }
}
