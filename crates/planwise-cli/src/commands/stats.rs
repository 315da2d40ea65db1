use clap::Args;

use crate::common::{open_planner, print_json, CliResult};

#[derive(Args)]
pub struct StatsArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: StatsArgs) -> CliResult {
    let planner = open_planner()?;
    let stats = planner.statistics()?;

    if args.json {
        return print_json(&stats);
    }

    let c = &stats.completion;
    println!("Completed {}/{} ({}%)", c.completed, c.total, c.rate);

    if !stats.by_category.is_empty() {
        println!();
        println!("By category:");
        for entry in &stats.by_category {
            println!("  {:<16} {}", entry.label, entry.count);
        }
    }

    println!();
    println!("This week:");
    for day in &stats.week {
        println!(
            "  {} {}  done {:>2}  pending {:>2}",
            day.label, day.date, day.completed, day.pending
        );
    }
    Ok(())
}
