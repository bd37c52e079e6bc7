//! Reqwest-backed gateway.
//!
//! Owns transport details only: URL joining, the bearer header, JSON
//! bodies, timeouts, and mapping HTTP statuses onto [`GatewayError`].

use std::time::Duration;

use courtside_protocol::{Codec, Credential, JsonCodec, Method};
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde_json::Value;

use crate::{GatewayError, RemoteGateway};

/// Where the authority listens when nothing else is configured.
const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Connection settings for [`HttpGateway`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Scheme, host and optional path prefix of the authority,
    /// e.g. `https://fantasy.example.com/api`.
    pub base_url: String,

    /// Upper bound for one request, connect through body.
    ///
    /// Default: 10 seconds.
    pub timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// A [`RemoteGateway`] that performs HTTP requests against one authority.
///
/// Cheap to share: wrap it in an `Arc` and hand clones to the session,
/// roster and league components.
pub struct HttpGateway {
    client: Client,
    base_url: String,
    codec: JsonCodec,
}

impl HttpGateway {
    /// Builds a gateway from its configuration.
    ///
    /// # Errors
    /// Returns [`GatewayError::InvalidConfig`] when the base URL isn't an
    /// http(s) URL or the HTTP client cannot be constructed.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(GatewayError::InvalidConfig(format!(
                "base url must start with http:// or https://, got {:?}",
                config.base_url
            )));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::InvalidConfig(e.to_string()))?;

        tracing::debug!(base_url = %base_url, "HTTP gateway ready");
        Ok(Self {
            client,
            base_url,
            codec: JsonCodec,
        })
    }

    /// The normalized base URL (no trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl RemoteGateway for HttpGateway {
    async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        credential: Option<&Credential>,
    ) -> Result<Value, GatewayError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .client
            .request(to_reqwest_method(method), &url)
            .header(ACCEPT, "application/json");
        if let Some(credential) = credential {
            request = request.bearer_auth(credential.as_str());
        }
        if let Some(body) = &body {
            request = request.json(body);
        }

        tracing::debug!(%method, path, "dispatching request");
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(map_transport_error)?;

        if !status.is_success() {
            let err = GatewayError::from_status(status.as_u16(), &bytes);
            tracing::debug!(%method, path, status = status.as_u16(), error = %err, "request failed");
            return Err(err);
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(self.codec.decode(&bytes)?)
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn map_transport_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Unreachable(format!("request timed out: {err}"))
    } else {
        GatewayError::Unreachable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash() {
        let gateway = HttpGateway::new(GatewayConfig {
            base_url: "http://localhost:8000/api/".into(),
            ..GatewayConfig::default()
        })
        .unwrap();
        assert_eq!(gateway.base_url(), "http://localhost:8000/api");
    }

    #[test]
    fn test_new_rejects_non_http_url() {
        let result = HttpGateway::new(GatewayConfig {
            base_url: "localhost:8000".into(),
            ..GatewayConfig::default()
        });
        assert!(matches!(result, Err(GatewayError::InvalidConfig(_))));
    }

    #[test]
    fn test_gateway_config_default() {
        let config = GatewayConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }
}
