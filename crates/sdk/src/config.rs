//! Client configuration
//!
//! An immutable value handed to `SearchClient::connect`; nothing is global.

use searchlink_core::domain::WaitOptions;
use searchlink_core::error::{ClientError, Result};
use searchlink_infra_http::{HttpConfig, DEFAULT_REQUEST_TIMEOUT};
use std::time::Duration;

pub const DEFAULT_HOST: &str = "http://127.0.0.1:7700";

pub const ENV_URL: &str = "SEARCHLINK_URL";
pub const ENV_API_KEY: &str = "SEARCHLINK_API_KEY";
pub const ENV_TIMEOUT_SECS: &str = "SEARCHLINK_TIMEOUT_SECS";
pub const ENV_WAIT_TIMEOUT_SECS: &str = "SEARCHLINK_WAIT_TIMEOUT_SECS";
pub const ENV_WAIT_INTERVAL_MS: &str = "SEARCHLINK_WAIT_INTERVAL_MS";

/// Connection and polling settings for a `SearchClient`
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub host: String,
    pub api_key: Option<String>,
    pub request_timeout: Duration,
    /// Used by `wait_for_task` when no options are passed
    pub wait: WaitOptions,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HOST)
    }
}

impl ClientConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            api_key: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            wait: WaitOptions::default(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_wait_options(mut self, wait: WaitOptions) -> Self {
        self.wait = wait;
        self
    }

    /// Load from `SEARCHLINK_*` environment variables
    ///
    /// # Environment Variables
    ///
    /// - `SEARCHLINK_URL`: engine URL (default: http://127.0.0.1:7700)
    /// - `SEARCHLINK_API_KEY`: API key (default: none)
    /// - `SEARCHLINK_TIMEOUT_SECS`: per-request timeout (default: 30)
    /// - `SEARCHLINK_WAIT_TIMEOUT_SECS`: task wait budget (default: 5)
    /// - `SEARCHLINK_WAIT_INTERVAL_MS`: task poll interval (default: 500)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as `from_env` with an injectable variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(lookup(ENV_URL).unwrap_or_else(|| DEFAULT_HOST.to_string()));
        config.api_key = lookup(ENV_API_KEY).filter(|key| !key.is_empty());

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            config.request_timeout = Duration::from_secs(parse_number(ENV_TIMEOUT_SECS, &raw)?);
        }

        let mut wait = WaitOptions::default();
        if let Some(raw) = lookup(ENV_WAIT_TIMEOUT_SECS) {
            let secs: f64 = raw.trim().parse().map_err(|_| invalid(ENV_WAIT_TIMEOUT_SECS, &raw))?;
            wait = WaitOptions::from_secs_f64(secs, wait.interval.as_secs_f64())?;
        }
        if let Some(raw) = lookup(ENV_WAIT_INTERVAL_MS) {
            wait = wait.with_interval(Duration::from_millis(parse_number(
                ENV_WAIT_INTERVAL_MS,
                &raw,
            )?));
        }
        wait.validate()?;
        config.wait = wait;

        Ok(config)
    }

    pub(crate) fn http_config(&self) -> HttpConfig {
        let mut http = HttpConfig::new(self.host.clone());
        http.api_key = self.api_key.clone();
        http.request_timeout = self.request_timeout;
        http
    }
}

fn parse_number(name: &str, raw: &str) -> Result<u64> {
    raw.trim().parse().map_err(|_| invalid(name, raw))
}

fn invalid(name: &str, raw: &str) -> ClientError {
    ClientError::InvalidConfig(format!("{} has an invalid value: {:?}", name, raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.wait, WaitOptions::default());
    }

    #[test]
    fn test_reads_all_variables() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_URL, "https://search.example.com"),
            (ENV_API_KEY, "masterKey"),
            (ENV_TIMEOUT_SECS, "10"),
            (ENV_WAIT_TIMEOUT_SECS, "30.5"),
            (ENV_WAIT_INTERVAL_MS, "250"),
        ]))
        .unwrap();

        assert_eq!(config.host, "https://search.example.com");
        assert_eq!(config.api_key.as_deref(), Some("masterKey"));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.wait.timeout, Duration::from_millis(30_500));
        assert_eq!(config.wait.interval, Duration::from_millis(250));
    }

    #[test]
    fn test_empty_api_key_is_none() {
        let config = ClientConfig::from_lookup(lookup(&[(ENV_API_KEY, "")])).unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_rejects_garbage_values() {
        assert!(matches!(
            ClientConfig::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "soon")])),
            Err(ClientError::InvalidConfig(_))
        ));
        assert!(matches!(
            ClientConfig::from_lookup(lookup(&[(ENV_WAIT_INTERVAL_MS, "0")])),
            Err(ClientError::InvalidConfig(_))
        ));
    }
}
