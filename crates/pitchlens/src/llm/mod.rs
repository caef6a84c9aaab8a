//! Remote text-generation client.
//!
//! This module turns a player or goalkeeper record into a prompt and asks a
//! hosted text-generation model for a performance summary:
//! - Prompt templates embedding each metric by name
//! - A blocking HTTP transport with bearer authentication
//! - A bounded retry loop for models that are still warming up
//!
//! # Example
//!
//! ```no_run
//! use pitchlens::{EnvSecret, InferenceClient, InferenceConfig};
//!
//! // Reads HF_API_TOKEN
//! let client = InferenceClient::new(InferenceConfig::from_env(), &EnvSecret::new()).unwrap();
//! let text = client.generate("Analyze ...").unwrap_or_else(|e| {
//!     eprintln!("{e}");
//!     pitchlens::InferenceError::SENTINEL.to_string()
//! });
//! ```

mod client;
mod config;
mod mock;
mod prompts;
mod transport;

pub use client::{Generation, InferenceClient, InferenceError, Sleeper, ThreadSleeper};
pub use config::{
    DEFAULT_ENDPOINT, ENDPOINT_ENV, EnvSecret, InferenceConfig, SecretProvider, StaticSecret,
    TOKEN_ENV,
};
pub use mock::{MockTransport, RecordingSleeper};
pub use prompts::{
    Analyzable, GOALKEEPER_TEMPLATE, INSTRUCTION, MetricValue, Metrics, PLAYER_TEMPLATE,
    PromptField, PromptTemplate,
};
pub use transport::{
    GenerationParameters, GenerationRequest, HttpTransport, Transport, TransportResponse,
};
