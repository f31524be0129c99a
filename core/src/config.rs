//! Client configuration loaded from serde sources or the environment.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Deserialize;

use crate::error::ApiError;

pub const DEFAULT_URL: &str = "http://127.0.0.1:9200";

/// Connection settings for a `Client`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Pre-encoded API key, sent as `Authorization: ApiKey <key>`.
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
    /// Extra headers sent with every request.
    pub headers: Vec<(String, String)>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            username: None,
            password: None,
            api_key: None,
            timeout_secs: None,
            headers: Vec::new(),
        }
    }
}

impl ClientConfig {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            ..Self::default()
        }
    }

    /// Read `ELASTICSEARCH_URL`, `ELASTICSEARCH_USERNAME`,
    /// `ELASTICSEARCH_PASSWORD`, `ELASTICSEARCH_API_KEY` and
    /// `ELASTICSEARCH_TIMEOUT_SECS`. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(url) = lookup("ELASTICSEARCH_URL") {
            config.url = url;
        }
        config.username = lookup("ELASTICSEARCH_USERNAME");
        config.password = lookup("ELASTICSEARCH_PASSWORD");
        config.api_key = lookup("ELASTICSEARCH_API_KEY");
        if let Some(secs) = lookup("ELASTICSEARCH_TIMEOUT_SECS") {
            let secs = secs.trim().parse().map_err(|_| {
                ApiError::InvalidArgument(format!("ELASTICSEARCH_TIMEOUT_SECS is not a number: {secs}"))
            })?;
            config.timeout_secs = Some(secs);
        }
        Ok(config)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Parse and normalize the base URL, without a trailing slash.
    pub fn base_url(&self) -> Result<String, ApiError> {
        let parsed = url::Url::parse(&self.url).map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", self.url)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidUrl(format!("unsupported scheme: {}", parsed.scheme())));
        }
        Ok(self.url.trim_end_matches('/').to_string())
    }

    /// Headers attached to every request, including authorization.
    pub fn default_headers(&self) -> Vec<(String, String)> {
        let mut headers = Vec::new();
        if let Some(key) = &self.api_key {
            headers.push(("authorization".to_string(), format!("ApiKey {key}")));
        } else if let Some(user) = &self.username {
            let password = self.password.as_deref().unwrap_or_default();
            let token = STANDARD.encode(format!("{user}:{password}"));
            headers.push(("authorization".to_string(), format!("Basic {token}")));
        }
        headers.extend(self.headers.iter().cloned());
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_localhost() {
        let config = ClientConfig::default();
        assert_eq!(config.url, DEFAULT_URL);
        assert!(config.default_headers().is_empty());
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn from_lookup_reads_all_variables() {
        let config = ClientConfig::from_lookup(|key| match key {
            "ELASTICSEARCH_URL" => Some("http://search:9200/".into()),
            "ELASTICSEARCH_USERNAME" => Some("elastic".into()),
            "ELASTICSEARCH_PASSWORD" => Some("changeme".into()),
            "ELASTICSEARCH_TIMEOUT_SECS" => Some("30".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.base_url().unwrap(), "http://search:9200");
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(
            config.default_headers(),
            vec![("authorization".to_string(), "Basic ZWxhc3RpYzpjaGFuZ2VtZQ==".to_string())]
        );
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let err = ClientConfig::from_lookup(|key| {
            (key == "ELASTICSEARCH_TIMEOUT_SECS").then(|| "soon".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(_)));
    }

    #[test]
    fn api_key_wins_over_basic_auth() {
        let config = ClientConfig {
            username: Some("u".into()),
            api_key: Some("abc".into()),
            ..ClientConfig::default()
        };
        assert_eq!(config.default_headers()[0].1, "ApiKey abc");
    }

    #[test]
    fn invalid_urls_are_rejected() {
        assert!(matches!(ClientConfig::new("not a url").base_url(), Err(ApiError::InvalidUrl(_))));
        assert!(matches!(ClientConfig::new("ftp://host").base_url(), Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: ClientConfig = serde_json::from_str(r#"{"timeout_secs":5}"#).unwrap();
        assert_eq!(config.url, DEFAULT_URL);
        assert_eq!(config.timeout_secs, Some(5));
    }
}
