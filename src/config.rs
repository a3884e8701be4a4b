use std::time::Duration;

use url::Url;

use crate::error::{NotifyError, Result};

pub const DEFAULT_WEBHOOK_HOST: &str = "discord.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// How and where to deliver notifications for one run.
#[derive(Debug, Clone)]
pub struct DeliveryConfig {
    /// Full webhook URL. Takes precedence over `webhook_id`/`webhook_token`.
    pub webhook_url: String,
    pub webhook_id: String,
    pub webhook_token: String,
    /// Hex color override, e.g. `#ff00ff`. Empty means "derive from status".
    pub color: String,
    pub messages: Vec<String>,
    pub files: Vec<String>,
    pub identity: Identity,
    pub timeout: Duration,
}

/// Sender fields shared by every request in a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Identity {
    pub username: String,
    pub avatar_url: String,
    pub tts: bool,
    pub wait: bool,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            webhook_id: String::new(),
            webhook_token: String::new(),
            color: String::new(),
            messages: Vec::new(),
            files: Vec::new(),
            identity: Identity::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl DeliveryConfig {
    /// Returns true if a color override is set.
    pub fn has_color_override(&self) -> bool {
        !self.color.is_empty()
    }

    /// Checks the whole config before any request and returns the endpoint.
    pub fn validate(&self) -> Result<Url> {
        if self.timeout.is_zero() {
            return Err(NotifyError::Config(
                "request timeout must be greater than zero".to_string(),
            ));
        }
        self.webhook_url()
    }

    /// Resolves the endpoint every request goes to.
    ///
    /// An explicit URL must be absolute http(s). Otherwise both id and token
    /// are required and the URL is built on [`DEFAULT_WEBHOOK_HOST`].
    pub fn webhook_url(&self) -> Result<Url> {
        if !self.webhook_url.is_empty() {
            let url = Url::parse(&self.webhook_url).map_err(|e| {
                NotifyError::Config(format!("invalid webhook url '{}': {}", self.webhook_url, e))
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(NotifyError::Config(format!(
                    "webhook url must be http or https, got '{}'",
                    url.scheme()
                )));
            }
            return Ok(url);
        }

        if self.webhook_id.is_empty() || self.webhook_token.is_empty() {
            return Err(NotifyError::Config(
                "missing discord config: set a webhook url or both webhook id and token"
                    .to_string(),
            ));
        }

        let raw = format!(
            "https://{}/api/webhooks/{}/{}",
            DEFAULT_WEBHOOK_HOST, self.webhook_id, self.webhook_token
        );
        Url::parse(&raw)
            .map_err(|e| NotifyError::Config(format!("invalid webhook id or token: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_url_from_id_and_token() {
        let config = DeliveryConfig {
            webhook_id: "123".to_string(),
            webhook_token: "abc".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.webhook_url().unwrap().as_str(),
            "https://discord.com/api/webhooks/123/abc"
        );
    }

    #[test]
    fn explicit_url_takes_precedence() {
        let config = DeliveryConfig {
            webhook_url: "http://localhost:8080/api/webhooks/1/t".to_string(),
            webhook_id: "123".to_string(),
            webhook_token: "abc".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.webhook_url().unwrap().as_str(),
            "http://localhost:8080/api/webhooks/1/t"
        );
    }

    #[test]
    fn missing_credentials_are_rejected() {
        for (id, token) in [("", ""), ("123", ""), ("", "abc")] {
            let config = DeliveryConfig {
                webhook_id: id.to_string(),
                webhook_token: token.to_string(),
                ..Default::default()
            };
            assert!(matches!(config.webhook_url(), Err(NotifyError::Config(_))));
        }
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let config = DeliveryConfig {
            webhook_id: "123".to_string(),
            webhook_token: "abc".to_string(),
            timeout: Duration::ZERO,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(NotifyError::Config(_))));

        let config = DeliveryConfig {
            timeout: Duration::from_secs(1),
            ..config
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn malformed_url_is_rejected() {
        for url in ["not a url", "/relative/path", "ftp://example.com/hook"] {
            let config = DeliveryConfig {
                webhook_url: url.to_string(),
                ..Default::default()
            };
            assert!(
                matches!(config.webhook_url(), Err(NotifyError::Config(_))),
                "{} should be rejected",
                url
            );
        }
    }
}
