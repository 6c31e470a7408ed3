//! SDK configuration.
//!
//! A [`Configuration`] is built once by the host app and checked with
//! [`Configuration::validate`] before any session starts, so a bad setup
//! fails at startup with a clear message instead of in the middle of a
//! payment.
//!
//! # Example
//!
//! ```
//! use payze::config::{Configuration, ServiceEnvironment};
//! use payze::localization::Language;
//!
//! let config = Configuration::from_json(r#"{"environment": "production", "language": "uzbek"}"#)
//!     .unwrap();
//! assert_eq!(config.environment, ServiceEnvironment::Production);
//! assert_eq!(config.language, Language::Uzbek);
//! assert_eq!(config.base_url().unwrap().as_str(), "https://paygate.payze.uz/");
//! config.validate().unwrap();
//! ```

use crate::holder::HolderNameRule;
use crate::localization::Language;
use crate::redirect::RedirectClassifier;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Default timeout applied to every gateway call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Hosts the step-up web view may finish on.
pub const DEFAULT_GATEWAY_HOSTS: [&str; 3] =
    ["paygate.payze.dev", "paygate.payze.io", "paygate.payze.uz"];

/// Backend the SDK talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ServiceEnvironment {
    /// Sandbox gateway.
    Development,
    /// Live gateway.
    Production,
}

impl ServiceEnvironment {
    /// Base URL of the gateway API.
    pub const fn base_url_str(&self) -> &'static str {
        match self {
            Self::Development => "https://paygate.payze.dev",
            Self::Production => "https://paygate.payze.uz",
        }
    }
}

/// Errors raised while loading or checking the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    Parse(String),

    /// The redirect host allow-list is empty.
    #[error("at least one gateway host is required")]
    NoGatewayHosts,

    /// A redirect host is blank.
    #[error("gateway host at index {index} is blank")]
    BlankGatewayHost {
        /// Index in the allow-list.
        index: usize,
    },

    /// The request timeout is zero.
    #[error("request timeout must be greater than zero")]
    ZeroTimeout,

    /// The base URL cannot be parsed.
    #[error("invalid base url '{0}'")]
    InvalidBaseUrl(String),

    /// A session was built without a required collaborator.
    #[error("no {0} collaborator was provided")]
    MissingCollaborator(&'static str),
}

fn default_gateway_hosts() -> Vec<String> {
    DEFAULT_GATEWAY_HOSTS.iter().map(|h| h.to_string()).collect()
}

fn default_timeout_ms() -> u64 {
    duration_to_ms(DEFAULT_REQUEST_TIMEOUT)
}

fn duration_to_ms(timeout: Duration) -> u64 {
    u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)
}

/// Settings shared by every payment session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    /// Gateway environment.
    pub environment: ServiceEnvironment,

    /// Language of the messages surfaced to the user.
    #[serde(default)]
    pub language: Language,

    /// Hosts whose terminating redirects end the step-up flow.
    #[serde(default = "default_gateway_hosts")]
    pub gateway_hosts: Vec<String>,

    /// Timeout of each gateway call, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Rule applied to the cardholder name.
    #[serde(default)]
    pub holder_name_rule: HolderNameRule,

    /// Overrides the environment's base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Configuration {
    /// Creates a configuration with defaults for everything but the environment.
    pub fn new(environment: ServiceEnvironment) -> Self {
        Self {
            environment,
            language: Language::default(),
            gateway_hosts: default_gateway_hosts(),
            request_timeout_ms: default_timeout_ms(),
            holder_name_rule: HolderNameRule::default(),
            base_url: None,
        }
    }

    /// Parses a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Sets the message language.
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Replaces the redirect host allow-list.
    pub fn with_gateway_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.gateway_hosts = hosts.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the gateway call timeout, kept to millisecond precision.
    ///
    /// A positive timeout below one millisecond is rounded up so it never
    /// turns into zero.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = match duration_to_ms(timeout) {
            0 if !timeout.is_zero() => 1,
            ms => ms,
        };
        self
    }

    /// Sets the cardholder name rule.
    pub fn with_holder_name_rule(mut self, rule: HolderNameRule) -> Self {
        self.holder_name_rule = rule;
        self
    }

    /// Points the SDK at another gateway, e.g. a local mock.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Timeout of each gateway call.
    #[inline]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Resolved gateway base URL.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let raw = self
            .base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.base_url_str());
        Url::parse(raw).map_err(|_| ConfigError::InvalidBaseUrl(raw.to_string()))
    }

    /// Redirect classifier over the configured host allow-list.
    pub fn redirect_classifier(&self) -> RedirectClassifier {
        RedirectClassifier::new(self.gateway_hosts.iter().cloned())
    }

    /// Checks the configuration; call once at startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gateway_hosts.is_empty() {
            return Err(ConfigError::NoGatewayHosts);
        }

        if let Some(index) = self.gateway_hosts.iter().position(|h| h.trim().is_empty()) {
            return Err(ConfigError::BlankGatewayHost { index });
        }

        if self.request_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        self.base_url()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Configuration::new(ServiceEnvironment::Development);
        assert_eq!(config.language, Language::English);
        assert_eq!(config.request_timeout(), DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(config.gateway_hosts.len(), 3);
        assert_eq!(config.holder_name_rule, HolderNameRule::AnyLetter);
        assert_eq!(
            config.base_url().unwrap().as_str(),
            "https://paygate.payze.dev/"
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_with_overrides() {
        let config = Configuration::from_json(
            r#"{
                "environment": "development",
                "gatewayHosts": ["gw.example"],
                "requestTimeoutMs": 5000,
                "holderNameRule": "twoTokens",
                "baseUrl": "http://127.0.0.1:8080"
            }"#,
        )
        .unwrap();

        assert_eq!(config.gateway_hosts, vec!["gw.example".to_string()]);
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.holder_name_rule, HolderNameRule::TwoTokens);
        assert_eq!(config.base_url().unwrap().port(), Some(8080));
    }

    #[test]
    fn test_from_json_requires_environment() {
        assert!(matches!(
            Configuration::from_json("{}"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let base = Configuration::new(ServiceEnvironment::Production);

        let config = base.clone().with_gateway_hosts(Vec::<String>::new());
        assert_eq!(config.validate(), Err(ConfigError::NoGatewayHosts));

        let config = base.clone().with_gateway_hosts(["gw.example", " "]);
        assert_eq!(
            config.validate(),
            Err(ConfigError::BlankGatewayHost { index: 1 })
        );

        let config = base.clone().with_request_timeout(Duration::ZERO);
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeout));

        let config = base.clone().with_request_timeout(Duration::from_millis(500));
        assert_eq!(config.validate(), Ok(()));

        let config = base.with_base_url("not a url");
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidBaseUrl("not a url".into()))
        );
    }

    #[test]
    fn test_request_timeout_keeps_milliseconds() {
        let base = Configuration::new(ServiceEnvironment::Development);

        let config = base.clone().with_request_timeout(Duration::from_millis(1500));
        assert_eq!(config.request_timeout(), Duration::from_millis(1500));
        assert_eq!(config.request_timeout_ms, 1500);

        let config = base.with_request_timeout(Duration::from_micros(10));
        assert_eq!(config.request_timeout(), Duration::from_millis(1));
        assert!(config.validate().is_ok());
    }
}
