//! Example: Analyze one player from four roster files, offline.
//!
//! Usage:
//!   cargo run --example analyze -- <team1> <team2> <keeper1> <keeper2> <player_id>

use std::env;
use std::sync::Arc;

use pitchlens::{
    Analyzer, InferenceClient, InferenceConfig, MockTransport, PlayerId, RecordStore, Role,
    Session,
};

fn main() -> pitchlens::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 6 {
        eprintln!(
            "Usage: cargo run --example analyze -- <team1> <team2> <keeper1> <keeper2> <player_id>"
        );
        std::process::exit(1);
    }

    let store = RecordStore::from_files(&args[1], &args[2], &args[3], &args[4])?;

    println!("## Sources");
    for (slot, source) in store.sources() {
        println!(
            "  {:12} {} ({} rows, sha256 {})",
            slot.description(),
            source.label,
            source.row_count,
            &source.hash[..12.min(source.hash.len())]
        );
    }
    println!();

    println!("## Player IDs");
    let ids: Vec<String> = store.player_ids().iter().map(|id| id.to_string()).collect();
    println!("  {}", ids.join(", "));
    println!();

    // Mock transport, no API token needed
    let client =
        InferenceClient::with_transport(InferenceConfig::default(), Arc::new(MockTransport::new()));
    let analyzer = Analyzer::new(client);

    let id = PlayerId::new(args[5].as_str());
    let results = analyzer.analyze_selection(&store, Role::Player, &id)?;

    println!("## Performance Analysis for Player ID: {}", id);
    for result in &results {
        println!("  {}", result.text());
    }
    println!();

    let mut session = Session::new();
    session.record(Role::Player, results);
    println!("## CSV export");
    print!("{}", session.to_csv()?);

    Ok(())
}
