//! Serve command - open the web UI for interactive analysis.

use colored::Colorize;

use crate::cli::LlmArgs;
use crate::server::{app, state::AppState};

pub fn run(port: u16, no_open: bool, llm: LlmArgs) -> Result<(), Box<dyn std::error::Error>> {
    let analyzer = super::build_analyzer(&llm)?;
    let state = AppState::new(analyzer);

    let url = format!("http://localhost:{}", port);
    println!();
    println!(
        "{} {}",
        "Starting analysis server at".cyan().bold(),
        url.white().bold()
    );
    println!();
    println!(
        "  Model: {}",
        if llm.mock_llm {
            "mock (offline)".to_string()
        } else {
            state.analyzer.client().config().endpoint.clone()
        }
    );
    println!();
    println!("Press {} to stop the server", "Ctrl+C".yellow().bold());
    println!();

    if !no_open {
        if let Err(e) = open::that(&url) {
            eprintln!("{} Could not open browser: {}", "Warning:".yellow(), e);
        }
    }

    // The blocking HTTP client must not be dropped inside the runtime
    let analyzer = state.analyzer.clone();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let shutdown = async {
            tokio::signal::ctrl_c().await.ok();
            println!();
            println!("{}", "Shutting down...".yellow());
        };

        app::run_server(state, port, shutdown).await
    })?;

    drop(runtime);
    drop(analyzer);
    Ok(())
}
