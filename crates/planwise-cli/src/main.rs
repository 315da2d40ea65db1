use clap::{Parser, Subcommand};

mod commands;
mod common;

#[derive(Parser)]
#[command(name = "planwise", version, about = "Planwise CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Recurring routines
    Routine {
        #[command(subcommand)]
        action: commands::routine::RoutineAction,
    },
    /// Category registry
    Category {
        #[command(subcommand)]
        action: commands::category::CategoryAction,
    },
    /// Free-form notes
    Note {
        #[command(subcommand)]
        action: commands::note::NoteAction,
    },
    /// Show or accept suggestions
    Suggest(commands::suggest::SuggestArgs),
    /// Print reminders that are due now
    Remind(commands::remind::RemindArgs),
    /// Task statistics
    Stats(commands::stats::StatsArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Task { action } => commands::task::run(action),
        Commands::Routine { action } => commands::routine::run(action),
        Commands::Category { action } => commands::category::run(action),
        Commands::Note { action } => commands::note::run(action),
        Commands::Suggest(args) => commands::suggest::run(args),
        Commands::Remind(args) => commands::remind::run(args),
        Commands::Stats(args) => commands::stats::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
