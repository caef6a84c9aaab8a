//! Offline transport and sleeper for tests and demos.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use serde_json::json;

use super::client::{InferenceError, Sleeper};
use super::transport::{GenerationRequest, Transport, TransportResponse};

/// Transport that replays scripted responses and records every request.
///
/// Once the script runs out (or when created with [`MockTransport::new`]),
/// it answers 200 with a canned analysis built from the prompt's metrics.
pub struct MockTransport {
    script: Mutex<VecDeque<TransportResponse>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl MockTransport {
    /// A transport that always succeeds.
    pub fn new() -> Self {
        Self::scripted(Vec::new())
    }

    /// A transport that returns `responses` in order.
    pub fn scripted(responses: Vec<TransportResponse>) -> Self {
        Self {
            script: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    fn canned(prompt: &str) -> TransportResponse {
        let metrics = prompt.lines().nth(1).unwrap_or("no metrics");
        let text = format!(
            "Mock analysis based on {} Keep up the strengths and work on consistency.",
            metrics
        );
        TransportResponse::new(200, json!([{ "generated_text": text }]).to_string())
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MockTransport {
    fn send(&self, request: &GenerationRequest) -> Result<TransportResponse, InferenceError> {
        let mut requests = self
            .requests
            .lock()
            .map_err(|_| InferenceError::Transport("mock transport poisoned".to_string()))?;
        requests.push(request.clone());

        let next = self
            .script
            .lock()
            .map_err(|_| InferenceError::Transport("mock transport poisoned".to_string()))?
            .pop_front();

        Ok(next.unwrap_or_else(|| Self::canned(&request.inputs)))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Sleeper that records requested delays instead of waiting.
#[derive(Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        if let Ok(mut sleeps) = self.sleeps.lock() {
            sleeps.push(duration);
        }
    }
}
