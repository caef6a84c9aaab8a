//! CLI command implementations.

pub mod analyze;
pub mod ids;
pub mod serve;

use std::sync::Arc;
use std::time::Duration;

use pitchlens::{Analyzer, EnvSecret, InferenceClient, InferenceConfig, MockTransport, RecordStore};

use crate::cli::{LlmArgs, RosterArgs};

/// Load the four roster files named on the command line.
pub fn load_roster(roster: &RosterArgs) -> Result<RecordStore, Box<dyn std::error::Error>> {
    for path in [&roster.team1, &roster.team2, &roster.keeper1, &roster.keeper2] {
        if !path.exists() {
            return Err(format!("File not found: {}", path.display()).into());
        }
    }

    Ok(RecordStore::from_files(
        &roster.team1,
        &roster.team2,
        &roster.keeper1,
        &roster.keeper2,
    )?)
}

/// Inference settings from the environment and command-line overrides.
pub fn inference_config(llm: &LlmArgs) -> pitchlens::Result<InferenceConfig> {
    let mut config = InferenceConfig::from_env();
    if let Some(ref endpoint) = llm.endpoint {
        config = config.with_endpoint(endpoint.clone());
    }

    let timeout = (llm.timeout > 0).then(|| Duration::from_secs(llm.timeout));
    let config = config
        .with_generation(llm.max_length, llm.temperature)
        .with_timeout(timeout);
    config.validate()?;
    Ok(config)
}

/// Build the analyzer for the selected backend.
pub fn build_analyzer(llm: &LlmArgs) -> Result<Analyzer, Box<dyn std::error::Error>> {
    let config = inference_config(llm)?;

    let client = if llm.mock_llm {
        InferenceClient::with_transport(config, Arc::new(MockTransport::new()))
    } else {
        InferenceClient::new(config, &EnvSecret::new())?
    };

    log::debug!(
        "Using {} transport for {}",
        client.transport_name(),
        client.config().endpoint
    );

    Ok(Analyzer::new(client))
}
