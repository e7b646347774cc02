use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::fmt;
use ts_core::{DecodingParameters, Error, Result};
use url::Url;
use crate::InferenceConfig;

/// Body sent to the summarization endpoint.
#[derive(Debug, Serialize)]
pub struct InferenceRequest<'a> {
    pub inputs: &'a str,
    pub parameters: &'a DecodingParameters,
}

/// Status and raw body of one completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The per-attempt socket timeout elapsed.
    Timeout,
    /// DNS failure, refused connection and other faults below HTTP.
    Network(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Timeout => write!(f, "request timed out"),
            TransportError::Network(msg) => write!(f, "{}", msg),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

#[async_trait]
pub trait InferenceTransport: Send + Sync {
    async fn send(&self, request: &InferenceRequest<'_>) -> std::result::Result<RawResponse, TransportError>;
}

pub struct HttpTransport {
    client: Client,
    endpoint: Url,
    api_token: Option<String>,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("client", &"<reqwest::Client>")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_token", &self.api_token.as_deref().map(|_| "<redacted>"))
            .finish()
    }
}

impl HttpTransport {
    pub fn new(config: &InferenceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: config.endpoint()?,
            api_token: config.api_token.clone(),
        })
    }
}

#[async_trait]
impl InferenceTransport for HttpTransport {
    async fn send(&self, request: &InferenceRequest<'_>) -> std::result::Result<RawResponse, TransportError> {
        let mut builder = self.client.post(self.endpoint.clone()).json(request);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(RawResponse { status, body })
    }
}
