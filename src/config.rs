use serde::Deserialize;
use url::Url;

use crate::error::{Error, Result};

use std::{fs, path::Path, path::PathBuf, time::Duration};

/// Scroll cursor lifetime used when nothing else is configured.
pub const DEFAULT_SCROLL_TTL: Duration = Duration::from_secs(3 * 60);

/// Connection settings for one cluster endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EsConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// PEM bundle used to validate the server certificate. Switches the
    /// endpoint to https when present.
    pub ca_cert: Option<PathBuf>,
    pub scroll_ttl_secs: u64,
    pub request_timeout_secs: Option<u64>,
    pub clear_scroll_on_abort: bool,
}

impl Default for EsConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_owned(),
            port: 9200,
            username: None,
            password: None,
            ca_cert: None,
            scroll_ttl_secs: DEFAULT_SCROLL_TTL.as_secs(),
            request_timeout_secs: None,
            clear_scroll_on_abort: true,
        }
    }
}

impl EsConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn scheme(&self) -> &'static str {
        if self.ca_cert.is_some() {
            "https"
        } else {
            "http"
        }
    }

    pub fn url(&self) -> Result<Url> {
        if self.host.is_empty() {
            return Err(Error::ConfigError("empty elasticsearch host".to_owned()));
        }

        Ok(Url::parse(&format!(
            "{}://{}:{}",
            self.scheme(),
            self.host,
            self.port
        ))?)
    }

    /// Basic-auth pair, only when both halves are configured.
    pub fn basic_auth(&self) -> Option<(String, String)> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some((user.clone(), pass.clone())),
            _ => None,
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn scroll_config(&self) -> ScrollConfig {
        ScrollConfig {
            ttl: Duration::from_secs(self.scroll_ttl_secs),
            clear_on_abort: self.clear_scroll_on_abort,
        }
    }
}

/// Per-session scroll settings. Every session gets its own copy, so two
/// exports never influence each other's cursor lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollConfig {
    pub ttl: Duration,
    pub clear_on_abort: bool,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_SCROLL_TTL,
            clear_on_abort: true,
        }
    }
}

impl ScrollConfig {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.ttl == Duration::from_secs(0) {
            return Err(Error::UsageError(
                "scroll ttl must be greater than zero".to_owned(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_uses_plain_http() {
        let config = EsConfig::default();
        assert_eq!(config.url().unwrap().as_str(), "http://localhost:9200/");
        assert!(config.basic_auth().is_none());
        assert_eq!(config.scroll_config().ttl, DEFAULT_SCROLL_TTL);
    }

    #[test]
    fn test_ca_cert_switches_to_https() {
        let config = EsConfig::from_json_str(
            r#"{
  "host": "es.internal",
  "port": 9243,
  "username": "elastic",
  "password": "changeme",
  "ca_cert": "/etc/es/ca.pem",
  "scroll_ttl_secs": 60
}"#,
        )
        .unwrap();

        assert_eq!(config.url().unwrap().as_str(), "https://es.internal:9243/");
        assert_eq!(
            config.basic_auth(),
            Some(("elastic".to_owned(), "changeme".to_owned()))
        );
        assert_eq!(config.scroll_config().ttl, Duration::from_secs(60));
        assert!(config.scroll_config().clear_on_abort);
    }

    #[test]
    fn test_username_without_password_sends_no_auth() {
        let config = EsConfig::from_json_str(r#"{"username": "elastic"}"#).unwrap();
        assert!(config.basic_auth().is_none());
    }

    #[test]
    fn test_zero_ttl_is_rejected() {
        let config = ScrollConfig::default().with_ttl(Duration::from_secs(0));
        assert!(matches!(config.validate(), Err(Error::UsageError(_))));
    }

    #[test]
    fn test_malformed_config_is_parse_error() {
        assert!(matches!(
            EsConfig::from_json_str("{ port: nope"),
            Err(Error::ParseError(_))
        ));
    }
}
