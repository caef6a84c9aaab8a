//! Retrying client for the remote text-generation endpoint.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use super::config::{InferenceConfig, SecretProvider};
use super::prompts::Analyzable;
use super::transport::{
    GenerationParameters, GenerationRequest, HttpTransport, Transport, TransportResponse,
};
use crate::error::Result;

/// Status the endpoint returns while the model is still loading.
const STATUS_WARMING_UP: u16 = 503;

/// Why a generation did not produce text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InferenceError {
    /// The model kept answering 503 until the attempt budget ran out.
    #[error("model still unavailable after {attempts} attempts (status {status})")]
    RetriesExhausted {
        attempts: u32,
        status: u16,
        body: String,
    },

    /// The endpoint answered with a non-retryable status.
    #[error("endpoint returned status {status}")]
    Remote { status: u16, body: String },

    /// No HTTP response was received.
    #[error("transport error: {0}")]
    Transport(String),

    /// A 200 response whose body had no generated text.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl InferenceError {
    /// Text shown to users in place of an analysis.
    pub const SENTINEL: &'static str = "Unable to generate analysis due to repeated API errors.";

    /// HTTP status behind the failure, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            InferenceError::RetriesExhausted { status, .. }
            | InferenceError::Remote { status, .. } => Some(*status),
            InferenceError::Transport(_) | InferenceError::MalformedResponse(_) => None,
        }
    }

    /// Short machine-readable name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            InferenceError::RetriesExhausted { .. } => "retries_exhausted",
            InferenceError::Remote { .. } => "remote_error",
            InferenceError::Transport(_) => "transport_error",
            InferenceError::MalformedResponse(_) => "malformed_response",
        }
    }

    /// Whether the failure came from the model never finishing its warm-up.
    pub fn is_transient(&self) -> bool {
        matches!(self, InferenceError::RetriesExhausted { .. })
    }
}

/// Outcome of one generation: trimmed text or a typed failure.
pub type Generation = std::result::Result<String, InferenceError>;

/// Blocks the calling thread between attempts.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration);
}

/// Sleeps on the current thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: String,
}

/// Sends prompts to the endpoint, retrying while the model warms up.
///
/// A 200 returns immediately. A 503 waits `retry_delay` and tries again,
/// up to `retry_attempts` requests in total; no wait follows the final
/// attempt. Any other status stops at once.
pub struct InferenceClient {
    config: InferenceConfig,
    transport: Arc<dyn Transport>,
    sleeper: Arc<dyn Sleeper>,
}

impl InferenceClient {
    /// Create a client for the configured HTTP endpoint.
    pub fn new(config: InferenceConfig, secret: &dyn SecretProvider) -> Result<Self> {
        config.validate()?;
        let token = secret.api_token()?;
        let transport = HttpTransport::new(&config.endpoint, token, config.request_timeout)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client over any transport (e.g. [`super::MockTransport`]).
    pub fn with_transport(config: InferenceConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            transport,
            sleeper: Arc::new(ThreadSleeper),
        }
    }

    /// Replace how the client waits between attempts.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Name of the underlying transport.
    pub fn transport_name(&self) -> &str {
        self.transport.name()
    }

    /// Build the prompt for a record and generate its analysis.
    pub fn analyze<R: Analyzable>(&self, record: &R) -> Generation {
        log::debug!("Requesting analysis for {} {}", R::KIND, record.player_id());
        self.generate(&record.prompt())
    }

    /// Generate text for a prompt, applying the retry policy.
    pub fn generate(&self, prompt: &str) -> Generation {
        let request = GenerationRequest {
            inputs: prompt.to_string(),
            parameters: GenerationParameters {
                max_length: self.config.max_length,
                temperature: self.config.temperature,
            },
        };
        let attempts = self.config.retry_attempts.max(1);
        let mut last_unavailable = None;

        for attempt in 1..=attempts {
            log::debug!(
                "Attempt {}/{} via {} transport",
                attempt,
                attempts,
                self.transport.name()
            );

            let response = self.transport.send(&request).inspect_err(|e| {
                log::error!("Inference request failed: {}", e);
            })?;

            match response.status {
                200 => return parse_generated_text(&response),
                STATUS_WARMING_UP => {
                    if attempt < attempts {
                        log::warn!(
                            "Attempt {}/{}: model is loading. Retrying in {} seconds...",
                            attempt,
                            attempts,
                            self.config.retry_delay.as_secs()
                        );
                        self.sleeper.sleep(self.config.retry_delay);
                    } else {
                        log::warn!(
                            "Attempt {}/{}: model is loading. Giving up.",
                            attempt,
                            attempts
                        );
                    }
                    last_unavailable = Some(response);
                }
                status => {
                    log::error!("Error {}: {}", status, response.body);
                    return Err(InferenceError::Remote {
                        status,
                        body: response.body,
                    });
                }
            }
        }

        let last =
            last_unavailable.unwrap_or_else(|| TransportResponse::new(STATUS_WARMING_UP, ""));
        Err(InferenceError::RetriesExhausted {
            attempts,
            status: last.status,
            body: last.body,
        })
    }
}

fn parse_generated_text(response: &TransportResponse) -> Generation {
    let parsed: Vec<GeneratedText> = serde_json::from_str(&response.body).map_err(|e| {
        log::error!("Unexpected response body: {}", response.body);
        InferenceError::MalformedResponse(e.to_string())
    })?;

    parsed
        .into_iter()
        .next()
        .map(|g| g.generated_text.trim().to_string())
        .ok_or_else(|| InferenceError::MalformedResponse("empty result array".to_string()))
}
