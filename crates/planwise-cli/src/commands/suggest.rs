//! Suggestion command.
//!
//! Suggestions are not persisted: each run recomputes them from the stored
//! history, so they are accepted by their position in the listing.

use clap::Args;

use crate::common::{open_planner, print_json, CliResult};

#[derive(Args)]
pub struct SuggestArgs {
    /// Accept the suggestions at these 1-based positions
    #[arg(long, num_args = 1..)]
    accept: Vec<usize>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: SuggestArgs) -> CliResult {
    let mut planner = open_planner()?;
    let zone = planner.zone();
    let suggestions = planner.refresh_suggestions()?.to_vec();

    if args.accept.is_empty() {
        if args.json {
            print_json(&suggestions)?;
        } else if suggestions.is_empty() {
            println!("No suggestions right now.");
        } else {
            for (i, s) in suggestions.iter().enumerate() {
                let when = zone.to_local(s.suggested_date).format("%a %Y-%m-%d %H:%M");
                let minutes = s
                    .duration_minutes
                    .map(|m| format!(" ({m} min)"))
                    .unwrap_or_default();
                println!("{}. {}{minutes} [{}] {when}", i + 1, s.title, s.category);
                println!("   {}", s.reason);
            }
        }
        return Ok(());
    }

    let mut accepted = Vec::new();
    for position in &args.accept {
        let suggestion = position
            .checked_sub(1)
            .and_then(|i| suggestions.get(i))
            .ok_or_else(|| format!("no suggestion at position {position}"))?;
        accepted.push(planner.accept_suggestion(&suggestion.id)?);
    }

    if args.json {
        print_json(&accepted)?;
    } else {
        for task in &accepted {
            println!("Task created: {} ({})", task.id, task.title);
        }
    }
    Ok(())
}
