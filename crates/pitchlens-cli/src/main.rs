//! Pitchlens CLI - soccer performance analysis.

mod cli;
mod commands;
mod server;
mod web;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    // A local .env may carry HF_API_TOKEN
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Commands::Ids { roster, role } => commands::ids::run(roster, role),

        Commands::Analyze {
            roster,
            role,
            id,
            output,
            json,
            llm,
        } => commands::analyze::run(roster, role, id, output, json, llm, cli.verbose),

        Commands::Serve { port, no_open, llm } => commands::serve::run(port, no_open, llm),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
