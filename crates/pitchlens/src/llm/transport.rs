//! HTTP transport for the text-generation endpoint.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;

use super::client::InferenceError;
use crate::error::{PitchlensError, Result};

/// Generation parameters sent with every request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationParameters {
    pub max_length: u32,
    pub temperature: f64,
}

/// Request body for the text-generation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    pub inputs: String,
    pub parameters: GenerationParameters,
}

/// Status and raw body of one endpoint response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Sends a generation request and returns the raw response.
///
/// Implementations must be thread-safe so a client can be shared by the
/// web shell's blocking workers.
pub trait Transport: Send + Sync {
    /// Perform one request. `Err` means no HTTP response was received.
    fn send(
        &self,
        request: &GenerationRequest,
    ) -> std::result::Result<TransportResponse, InferenceError>;

    /// Name of this transport (for logging).
    fn name(&self) -> &str;
}

/// Blocking `reqwest` transport with bearer authentication.
pub struct HttpTransport {
    client: Client,
    endpoint: String,
    api_token: String,
}

impl HttpTransport {
    pub fn new(
        endpoint: impl Into<String>,
        api_token: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| PitchlensError::Config(format!("Failed to create HTTP client: {}", e)))?;

        let transport = Self {
            client,
            endpoint: endpoint.into(),
            api_token: api_token.into(),
        };
        // Reject tokens that cannot be sent as a header up front
        transport.build_headers()?;
        Ok(transport)
    }

    /// Build headers for API requests.
    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", self.api_token))
            .map_err(|e| PitchlensError::Config(format!("Invalid API token: {}", e)))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        Ok(headers)
    }
}

impl Transport for HttpTransport {
    fn send(
        &self,
        request: &GenerationRequest,
    ) -> std::result::Result<TransportResponse, InferenceError> {
        let headers = self
            .build_headers()
            .map_err(|e| InferenceError::Transport(e.to_string()))?;

        let response = self
            .client
            .post(&self.endpoint)
            .headers(headers)
            .json(request)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    InferenceError::Transport(format!(
                        "Failed to connect to {}: {}",
                        self.endpoint, e
                    ))
                } else if e.is_timeout() {
                    InferenceError::Transport(format!("Request timed out: {}", e))
                } else {
                    InferenceError::Transport(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status().as_u16();
        let body = response.text().map_err(|e| {
            InferenceError::Transport(format!("Failed to read response body: {}", e))
        })?;

        Ok(TransportResponse { status, body })
    }

    fn name(&self) -> &str {
        "http"
    }
}
