//! Ids command - list selectable player and goalkeeper IDs.

use colored::Colorize;
use pitchlens::{PlayerId, Role};

use crate::cli::RosterArgs;

pub fn run(roster: RosterArgs, role: Option<Role>) -> Result<(), Box<dyn std::error::Error>> {
    let store = super::load_roster(&roster)?;

    if role.is_none_or(|r| r == Role::Player) {
        print_ids("Player IDs", &store.player_ids());
    }
    if role.is_none_or(|r| r == Role::Goalkeeper) {
        print_ids("Goalkeeper IDs", &store.goalkeeper_ids());
    }

    Ok(())
}

fn print_ids(title: &str, ids: &[PlayerId]) {
    println!("{} ({})", title.cyan().bold(), ids.len());
    for id in ids {
        println!("  {}", id);
    }
}
