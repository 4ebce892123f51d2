use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod common;

#[derive(Parser)]
#[command(name = "daystreak-cli", version, about = "Daystreak CLI")]
struct Cli {
    /// Database path override (defaults to ~/.config/daystreak/daystreak.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a check-in for an account at a height
    Checkin {
        #[arg(long)]
        account: String,
        #[arg(long)]
        height: u64,
    },
    /// Streak queries
    Streak {
        #[command(subcommand)]
        action: commands::streak::StreakAction,
    },
    /// Global statistics
    Stats,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let db = cli.db.as_deref();
    let result = match cli.command {
        Commands::Checkin { account, height } => commands::checkin::run(db, &account, height),
        Commands::Streak { action } => commands::streak::run(db, action),
        Commands::Stats => commands::stats::run(db),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
