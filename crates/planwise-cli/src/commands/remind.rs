use clap::Args;

use crate::common::{open_planner, print_json, CliResult};

#[derive(Args)]
pub struct RemindArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Print reminders due within the last minute. Meant to be polled.
pub fn run(args: RemindArgs) -> CliResult {
    let planner = open_planner()?;
    let due = planner.due_reminders()?;

    if args.json {
        return print_json(&due);
    }
    if due.is_empty() {
        return Ok(());
    }
    let categories = planner.category_labels()?;
    for notice in &due {
        println!("{}", notice.heading());
        println!("{}", notice.body(&categories));
    }
    Ok(())
}
