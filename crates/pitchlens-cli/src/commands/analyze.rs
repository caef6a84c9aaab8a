//! Analyze command - generate a performance analysis for one player.

use std::path::PathBuf;

use colored::Colorize;
use pitchlens::{PlayerId, Role, Session};

use crate::cli::{LlmArgs, RosterArgs};

pub fn run(
    roster: RosterArgs,
    role: Role,
    id: String,
    output: Option<PathBuf>,
    json: bool,
    llm: LlmArgs,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = super::load_roster(&roster)?;

    if verbose {
        for (slot, source) in store.sources() {
            println!(
                "  {:12} {:20} {} rows  {}",
                slot.to_string(),
                source.label,
                source.row_count,
                source.hash
            );
        }
        println!();
    }

    let analyzer = super::build_analyzer(&llm)?;
    let id = PlayerId::new(id);

    let title = match role {
        Role::Player => "Player",
        Role::Goalkeeper => "Goalkeeper",
    };

    if !json {
        println!(
            "{} {} {}",
            "Analyzing".cyan().bold(),
            title.to_lowercase(),
            id.to_string().white().bold()
        );
    }

    let results = analyzer.analyze_selection(&store, role, &id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        println!();
        println!(
            "{}",
            format!("Performance Analysis for {} ID: {}", title, id)
                .yellow()
                .bold()
        );
        for result in &results {
            match result.error() {
                None => println!("{}", result.text()),
                Some(e) => {
                    println!("{}", result.text().red());
                    if verbose {
                        println!("  ({})", e.kind());
                    }
                }
            }
        }
    }

    if let Some(path) = output {
        let mut session = Session::new();
        session.record(role, results);
        session.save_csv(&path)?;

        if !json {
            println!();
            println!(
                "{} {}",
                "Saved to".green().bold(),
                path.display().to_string().white()
            );
        }
    }

    Ok(())
}
