use serde::Deserialize;
use serde_json::Value;

use crate::errors::{Result, SlackError};

/// One webhook URL or several, as accepted by the webhook mutators
///
/// Deserializes from either a JSON string or an array of strings, so it can be
/// read straight out of a configuration file.
///
/// ```rust
/// use slack_dispatch::Webhooks;
///
/// let one: Webhooks = "https://hooks.slack.com/services/T/B/X".into();
/// let many: Webhooks = vec!["https://a.example", "https://b.example"].into();
/// assert_eq!(many.urls().len(), 2);
/// # let _ = one;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Webhooks {
    Single(String),
    Many(Vec<String>),
}

impl Webhooks {
    /// Check that the input can be stored
    ///
    /// A single URL must be non-empty, and so must every element of a
    /// sequence. An empty sequence is accepted.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Single(url) if url.is_empty() => Err(SlackError::invalid_webhook(url)),
            Self::Single(_) => Ok(()),
            Self::Many(urls) => match urls.iter().find(|url| url.is_empty()) {
                Some(_) => Err(SlackError::invalid_webhook(urls)),
                None => Ok(()),
            },
        }
    }

    /// The URLs carried by this input, in order
    pub fn urls(&self) -> &[String] {
        match self {
            Self::Single(url) => std::slice::from_ref(url),
            Self::Many(urls) => urls,
        }
    }
}

impl From<String> for Webhooks {
    fn from(url: String) -> Self {
        Self::Single(url)
    }
}

impl From<&str> for Webhooks {
    fn from(url: &str) -> Self {
        Self::Single(url.to_string())
    }
}

impl From<&String> for Webhooks {
    fn from(url: &String) -> Self {
        Self::Single(url.clone())
    }
}

impl From<Vec<String>> for Webhooks {
    fn from(urls: Vec<String>) -> Self {
        Self::Many(urls)
    }
}

impl From<Vec<&str>> for Webhooks {
    fn from(urls: Vec<&str>) -> Self {
        Self::Many(urls.into_iter().map(str::to_string).collect())
    }
}

impl From<&[String]> for Webhooks {
    fn from(urls: &[String]) -> Self {
        Self::Many(urls.to_vec())
    }
}

impl<const N: usize> From<[&str; N]> for Webhooks {
    fn from(urls: [&str; N]) -> Self {
        Self::Many(urls.iter().map(|url| url.to_string()).collect())
    }
}

/// Accepts untyped input such as a parsed configuration value
///
/// Anything other than a string or an array made only of strings is rejected
/// with [`SlackError::InvalidWebhook`] carrying the offending value.
impl TryFrom<Value> for Webhooks {
    type Error = SlackError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::String(url) => Ok(Self::Single(url)),
            Value::Array(items) => {
                let mut urls = Vec::with_capacity(items.len());
                for item in &items {
                    match item {
                        Value::String(url) => urls.push(url.clone()),
                        other => return Err(SlackError::invalid_webhook(other)),
                    }
                }
                Ok(Self::Many(urls))
            }
            other => Err(SlackError::invalid_webhook(other)),
        }
    }
}

/// Ordered collection of webhook URLs owned by one client
///
/// Duplicates are kept; every stored URL receives every dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct WebhookSet {
    urls: Vec<String>,
}

impl WebhookSet {
    /// Seed the set from optional constructor input
    pub(crate) fn initialize(input: Option<Webhooks>) -> Result<Self> {
        let mut set = Self::default();
        if let Some(webhooks) = input {
            set.add(webhooks)?;
        }
        Ok(set)
    }

    /// Append the input after validating it; the set is untouched on failure
    pub(crate) fn add(&mut self, input: Webhooks) -> Result<()> {
        input.validate()?;
        match input {
            Webhooks::Single(url) => self.urls.push(url),
            Webhooks::Many(urls) => self.urls.extend(urls),
        }
        Ok(())
    }

    /// Clear the set, then add the input
    ///
    /// Clearing happens first, so invalid input leaves the set empty.
    pub(crate) fn replace(&mut self, input: Webhooks) -> Result<()> {
        self.urls.clear();
        self.add(input)
    }

    /// Drop every stored entry equal to any of the given URLs
    pub(crate) fn remove(&mut self, input: &Webhooks) {
        let targets = input.urls();
        self.urls.retain(|url| !targets.contains(url));
    }

    pub(crate) fn as_slice(&self) -> &[String] {
        &self.urls
    }

    pub(crate) fn snapshot(&self) -> Vec<String> {
        self.urls.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::quickcheck;
    use serde_json::json;

    const FIRST: &str = "https://hooks.slack.com/services/T000/B000/first";
    const SECOND: &str = "https://hooks.slack.com/services/T000/B000/second";

    fn set_of(urls: &[&str]) -> WebhookSet {
        WebhookSet::initialize(Some(urls.to_vec().into())).unwrap()
    }

    #[test]
    fn test_validate_accepts_string_and_sequences() {
        assert!(Webhooks::from(FIRST).validate().is_ok());
        assert!(Webhooks::from(vec![FIRST, SECOND]).validate().is_ok());
        assert!(Webhooks::Many(vec![]).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_strings() {
        assert!(matches!(
            Webhooks::from("").validate(),
            Err(SlackError::InvalidWebhook { .. })
        ));
        assert!(matches!(
            Webhooks::from(vec![FIRST, ""]).validate(),
            Err(SlackError::InvalidWebhook { .. })
        ));
    }

    #[test]
    fn test_try_from_value_rejects_non_strings() {
        let err = Webhooks::try_from(json!(42)).unwrap_err();
        assert!(err.to_string().contains("You provided: Number(42)"));

        let err = Webhooks::try_from(json!([FIRST, 7])).unwrap_err();
        assert!(matches!(err, SlackError::InvalidWebhook { .. }));

        assert!(Webhooks::try_from(json!(true)).is_err());
        assert!(Webhooks::try_from(json!({ "url": FIRST })).is_err());
    }

    #[test]
    fn test_try_from_value_accepts_strings() {
        assert_eq!(
            Webhooks::try_from(json!(FIRST)).unwrap(),
            Webhooks::Single(FIRST.to_string())
        );
        assert_eq!(
            Webhooks::try_from(json!([FIRST, SECOND])).unwrap(),
            Webhooks::from(vec![FIRST, SECOND])
        );
    }

    #[test]
    fn test_deserialize_untagged() {
        let one: Webhooks = serde_json::from_value(json!(FIRST)).unwrap();
        assert_eq!(one, Webhooks::from(FIRST));
        let many: Webhooks = serde_json::from_value(json!([FIRST, SECOND])).unwrap();
        assert_eq!(many.urls(), [FIRST.to_string(), SECOND.to_string()]);
        assert!(serde_json::from_value::<Webhooks>(json!([FIRST, 1])).is_err());
    }

    #[test]
    fn test_initialize_empty_and_single() {
        assert!(WebhookSet::initialize(None).unwrap().as_slice().is_empty());
        assert_eq!(
            WebhookSet::initialize(Some(FIRST.into())).unwrap().as_slice(),
            [FIRST]
        );
        assert!(WebhookSet::initialize(Some("".into())).is_err());
    }

    #[test]
    fn test_initialize_copies_input() {
        let mut urls = vec![FIRST.to_string()];
        let set = WebhookSet::initialize(Some(Webhooks::from(urls.as_slice()))).unwrap();
        urls.push(SECOND.to_string());
        assert_eq!(set.as_slice(), [FIRST]);
    }

    #[test]
    fn test_add_keeps_order_and_duplicates() {
        let mut set = set_of(&[FIRST]);
        set.add(vec![SECOND, FIRST].into()).unwrap();
        assert_eq!(set.as_slice(), [FIRST, SECOND, FIRST]);
    }

    #[test]
    fn test_add_invalid_leaves_set_unchanged() {
        let mut set = set_of(&[FIRST]);
        assert!(set.add(vec![SECOND, ""].into()).is_err());
        assert_eq!(set.as_slice(), [FIRST]);
    }

    #[test]
    fn test_replace_swaps_contents() {
        let mut set = set_of(&[FIRST]);
        set.replace(vec![SECOND].into()).unwrap();
        assert_eq!(set.as_slice(), [SECOND]);
    }

    #[test]
    fn test_replace_invalid_leaves_set_empty() {
        let mut set = set_of(&[FIRST, SECOND]);
        assert!(set.replace(vec!["", FIRST].into()).is_err());
        assert!(set.as_slice().is_empty());
    }

    #[test]
    fn test_remove_filters_every_match() {
        let mut set = set_of(&[FIRST, SECOND, FIRST]);
        set.remove(&FIRST.into());
        assert_eq!(set.as_slice(), [SECOND]);
    }

    #[test]
    fn test_remove_sequence_and_missing_values() {
        let mut set = set_of(&[FIRST, SECOND]);
        set.remove(&vec!["https://not.stored", FIRST].into());
        assert_eq!(set.as_slice(), [SECOND]);
        set.remove(&"".into());
        assert_eq!(set.as_slice(), [SECOND]);
    }

    quickcheck! {
        fn prop_add_then_remove_restores_set(stored: Vec<String>, extra: String) -> bool {
            let stored: Vec<String> = stored.into_iter().filter(|url| !url.is_empty() && *url != extra).collect();
            let mut set = WebhookSet::initialize(Some(stored.clone().into())).unwrap();
            if extra.is_empty() {
                return set.add(extra.into()).is_err() && set.as_slice() == stored.as_slice();
            }
            set.add(extra.clone().into()).unwrap();
            set.remove(&extra.into());
            set.as_slice() == stored.as_slice()
        }

        fn prop_remove_is_idempotent(stored: Vec<String>, target: String) -> bool {
            let stored: Vec<String> = stored.into_iter().filter(|url| !url.is_empty()).collect();
            let mut once = WebhookSet::initialize(Some(stored.into())).unwrap();
            once.remove(&target.clone().into());
            let mut twice = once.clone();
            twice.remove(&target.into());
            once == twice
        }

        fn prop_replace_twice_keeps_last(first: Vec<String>, second: Vec<String>) -> bool {
            let first: Vec<String> = first.into_iter().filter(|url| !url.is_empty()).collect();
            let second: Vec<String> = second.into_iter().filter(|url| !url.is_empty()).collect();
            let mut set = WebhookSet::default();
            set.replace(first.into()).unwrap();
            set.replace(second.clone().into()).unwrap();
            set.as_slice() == second.as_slice()
        }
    }
}
