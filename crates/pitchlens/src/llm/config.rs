//! Inference endpoint configuration and credential sources.

use std::time::Duration;

use crate::error::{PitchlensError, Result};

/// Hosted text-generation model used when no endpoint is configured.
pub const DEFAULT_ENDPOINT: &str =
    "https://api-inference.huggingface.co/models/tiiuae/falcon-7b-instruct";

/// Environment variable holding the bearer token.
pub const TOKEN_ENV: &str = "HF_API_TOKEN";

/// Environment variable overriding the endpoint URL.
pub const ENDPOINT_ENV: &str = "PITCHLENS_ENDPOINT";

/// Configuration for the inference client.
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    /// Text-generation endpoint URL.
    pub endpoint: String,

    /// Maximum output length in tokens.
    pub max_length: u32,

    /// Sampling temperature.
    pub temperature: f64,

    /// Total number of requests made before giving up on a warming model.
    pub retry_attempts: u32,

    /// Wait between attempts while the model is warming up.
    pub retry_delay: Duration,

    /// Per-request HTTP timeout (None = transport default).
    pub request_timeout: Option<Duration>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            max_length: 500,
            temperature: 0.75,
            retry_attempts: 5,
            retry_delay: Duration::from_secs(30),
            request_timeout: Some(Duration::from_secs(120)),
        }
    }
}

impl InferenceConfig {
    /// Defaults, with the endpoint taken from `PITCHLENS_ENDPOINT` if set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            if !endpoint.trim().is_empty() {
                config.endpoint = endpoint.trim().to_string();
            }
        }
        config
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_retry(mut self, attempts: u32, delay: Duration) -> Self {
        self.retry_attempts = attempts;
        self.retry_delay = delay;
        self
    }

    pub fn with_generation(mut self, max_length: u32, temperature: f64) -> Self {
        self.max_length = max_length;
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(PitchlensError::Config("Endpoint URL is empty".to_string()));
        }
        if self.retry_attempts == 0 {
            return Err(PitchlensError::Config(
                "retry_attempts must be at least 1".to_string(),
            ));
        }
        if !self.temperature.is_finite() || self.temperature < 0.0 {
            return Err(PitchlensError::Config(format!(
                "Invalid temperature: {}",
                self.temperature
            )));
        }
        Ok(())
    }
}

/// Source of the bearer token for the inference endpoint.
pub trait SecretProvider: Send + Sync {
    fn api_token(&self) -> Result<String>;
}

/// Reads the token from an environment variable.
#[derive(Debug, Clone)]
pub struct EnvSecret {
    var: String,
}

impl EnvSecret {
    /// Read from `HF_API_TOKEN`.
    pub fn new() -> Self {
        Self::with_var(TOKEN_ENV)
    }

    pub fn with_var(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvSecret {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretProvider for EnvSecret {
    fn api_token(&self) -> Result<String> {
        let token = std::env::var(&self.var).map_err(|_| {
            PitchlensError::Config(format!("{} environment variable not set", self.var))
        })?;
        if token.trim().is_empty() {
            return Err(PitchlensError::Config(format!("{} is empty", self.var)));
        }
        Ok(token.trim().to_string())
    }
}

/// A token supplied directly, e.g. by a secret store integration.
#[derive(Clone)]
pub struct StaticSecret(String);

impl StaticSecret {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl std::fmt::Debug for StaticSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticSecret(***)")
    }
}

impl SecretProvider for StaticSecret {
    fn api_token(&self) -> Result<String> {
        if self.0.trim().is_empty() {
            return Err(PitchlensError::Config("API token is empty".to_string()));
        }
        Ok(self.0.clone())
    }
}
