// ReqwestTransport - Transport port over reqwest

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use searchlink_core::error::{ClientError, Result};
use searchlink_core::port::{Method, RawResponse, Transport};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Per-request timeout (30s)
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP connection settings
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Base URL of the engine, e.g. `http://127.0.0.1:7700`
    pub host: String,
    /// Sent as `Authorization: Bearer <key>` when present
    pub api_key: Option<String>,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl HttpConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            api_key: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: format!("searchlink/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Transport backed by a pooled reqwest client
///
/// Cheap to share: the inner client is reference counted, so concurrent
/// calls and task waits reuse the same connection pool.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base: Url,
}

impl ReqwestTransport {
    /// Build a transport for `config.host`
    ///
    /// # Errors
    /// - ClientError::InvalidConfig for a non-http(s) host or a bad API key
    /// - ClientError::Transport if the client cannot be built
    pub fn new(config: HttpConfig) -> Result<Self> {
        let base = parse_host(&config.host)?;

        let mut headers = HeaderMap::new();
        if let Some(key) = &config.api_key {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", key))
                .map_err(|e| ClientError::InvalidConfig(format!("Invalid API key: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::Transport(format!("Failed to create client: {}", e)))?;

        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn parse_host(host: &str) -> Result<Url> {
    let url = Url::parse(host)
        .map_err(|e| ClientError::InvalidConfig(format!("Invalid host {:?}: {}", host, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ClientError::InvalidConfig(format!(
            "Unsupported scheme {:?} in host {:?}",
            other, host
        ))),
    }
}

fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<RawResponse> {
        let url = self.url_for(path);
        debug!(%method, %url, "Sending request");

        let mut request = self.client.request(to_reqwest(method), &url);
        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!(%method, %url, error = %e, "Request failed");
            ClientError::Transport(format!("{} {}: {}", method, url, e))
        })?;

        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Transport(format!("Failed to read body: {}", e)))?;

        debug!(%method, %url, status, bytes = bytes.len(), "Received response");
        Ok(RawResponse::new(status, bytes.to_vec()))
    }
}
