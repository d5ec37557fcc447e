//! reqwest-backed GraphQL transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, instrument, trace};
use url::Url;

use graphgen_core::error::{TransportError, TransportResult};
use graphgen_core::ports::{GraphqlRequest, ResponseEnvelope, Transport};

/// Longest response body kept in a [`TransportError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// Per-request timeout.
    pub timeout: Duration,
    /// Bearer token sent as `Authorization` header.
    pub bearer_token: Option<String>,
    /// Extra headers applied to every request.
    pub headers: Vec<(String, String)>,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            bearer_token: None,
            headers: Vec::new(),
        }
    }
}

/// HTTP adapter implementing the Transport port.
///
/// One POST per call; non-2xx statuses and undecodable bodies are errors.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport from configuration.
    pub fn new(config: HttpTransportConfig) -> TransportResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = &config.bearer_token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| TransportError::Http(format!("invalid bearer token: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| TransportError::Http(format!("invalid header name {name}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| TransportError::Http(format!("invalid header value: {e}")))?;
            headers.insert(name, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| TransportError::Http(e.to_string()))?;

        debug!(timeout = ?config.timeout, "HTTP transport ready");
        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip_all, fields(url = %url))]
    async fn post(&self, url: &str, request: &GraphqlRequest) -> TransportResult<ResponseEnvelope> {
        let url = Url::parse(url).map_err(|e| TransportError::Http(format!("invalid url: {e}")))?;
        trace!(bytes = request.query.len(), "POST");

        let response = self
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::Http(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: truncate(body),
            });
        }

        serde_json::from_str(&body).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

fn truncate(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY {
        let mut end = MAX_ERROR_BODY;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
    }
    body
}
