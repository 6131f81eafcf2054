//! # Slack Dispatch
//!
//! A Rust client library for posting messages to Slack
//! [incoming webhooks](https://api.slack.com/messaging/webhooks) and calling
//! [Web API](https://api.slack.com/web) methods.
//!
//! ## Features
//!
//! - Keep a list of webhooks and add, replace or remove entries
//! - Post one message to every webhook concurrently
//! - Call any Web API method, with `files.upload` sent as multipart
//! - Bounded, immediate retry on network errors, 5xx and 429
//! - JSON response bodies parsed, anything else kept as text
//!
//! ## Example
//!
//! ```rust,no_run
//! use slack_dispatch::{MessageOptions, SlackClient, SlackConfig};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SlackClient::new(
//!         SlackConfig::new()
//!             .with_timeout(Duration::from_secs(10))
//!             .with_webhooks("https://hooks.slack.com/services/T000/B000/XXXX"),
//!     )?;
//!
//!     let message = MessageOptions::new()
//!         .with_channel("#development")
//!         .with_text("You cannot kill the battery!")
//!         .with_username("Metal bot")
//!         .with_icon_emoji(":metal:");
//!
//!     client.webhook(&message).await?;
//!
//!     let response = client.api("api.test", &()).await?;
//!     println!("api.test ok: {}", response.is_ok());
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod dispatch;
mod errors;
mod response;
mod retry;
mod types;
mod webhooks;

pub use client::SlackClient;
pub use config::{SlackConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use dispatch::FILES_UPLOAD;
pub use errors::{Result, SlackError};
pub use response::{ResponseBody, ResponseRecord};
pub use types::{Icon, MessageOptions, Payload, ResponseType, DEFAULT_CHANNEL};
pub use webhooks::Webhooks;
