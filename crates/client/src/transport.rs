//! HTTP transport to the reconstruction service.
//!
//! [`ReconstructionTransport`] is the seam the orchestrator talks to;
//! [`HttpTransport`] is the [`reqwest`] implementation. Exactly one POST
//! is made per call: no retries, no client-side timeout beyond reqwest's
//! defaults.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;

/// Errors from the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The endpoint is not a valid absolute URL.
    #[error("Invalid endpoint '{0}'")]
    InvalidEndpoint(String),

    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("Service error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The body was not the JSON we expected.
    #[error("Invalid response body: {0}")]
    Decode(String),
}

/// Sends one JSON request body and returns the JSON reply.
#[async_trait]
pub trait ReconstructionTransport: Send + Sync {
    async fn post(
        &self,
        endpoint: &str,
        bearer: Option<&str>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, TransportError>;
}

/// Decide whether the credential may be attached for `endpoint`.
///
/// The token is only sent when the endpoint's host is `expected_host` or a
/// subdomain of it. Unparseable endpoints never get the token.
pub fn bearer_for<'a>(endpoint: &str, token: Option<&'a str>, expected_host: &str) -> Option<&'a str> {
    let token = token.filter(|t| !t.trim().is_empty())?;
    let url = reqwest::Url::parse(endpoint).ok()?;
    let host = url.host_str()?.to_ascii_lowercase();
    let expected = expected_host.trim().trim_start_matches('.').to_ascii_lowercase();
    if expected.is_empty() {
        return None;
    }

    let matches = host == expected || host.ends_with(&format!(".{expected}"));
    matches.then_some(token)
}

/// [`reqwest`]-backed transport.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Return the response unchanged on 2xx, or an
    /// [`TransportError::Api`] with status and body text otherwise.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, TransportError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(TransportError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl ReconstructionTransport for HttpTransport {
    async fn post(
        &self,
        endpoint: &str,
        bearer: Option<&str>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, TransportError> {
        let url = reqwest::Url::parse(endpoint)
            .map_err(|_| TransportError::InvalidEndpoint(endpoint.to_string()))?;

        let mut request = self.client.post(url).json(body);
        if let Some(token) = bearer {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        tracing::info!(endpoint, authorized = bearer.is_some(), "Calling reconstruction service");
        let response = Self::ensure_success(request.send().await?).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_sent_to_expected_host_and_subdomains() {
        assert_eq!(
            bearer_for("https://api.runpod.ai/v2/abc/runsync", Some("t"), "runpod.ai"),
            Some("t")
        );
        assert_eq!(bearer_for("https://runpod.ai/x", Some("t"), "runpod.ai"), Some("t"));
    }

    #[test]
    fn token_withheld_from_other_hosts() {
        assert_eq!(bearer_for("https://evil.example/runpod.ai", Some("t"), "runpod.ai"), None);
        assert_eq!(bearer_for("https://notrunpod.ai/x", Some("t"), "runpod.ai"), None);
        assert_eq!(bearer_for("not a url", Some("t"), "runpod.ai"), None);
    }

    #[test]
    fn no_token_no_header() {
        assert_eq!(bearer_for("https://api.runpod.ai/x", None, "runpod.ai"), None);
        assert_eq!(bearer_for("https://api.runpod.ai/x", Some(" "), "runpod.ai"), None);
    }
}
