use std::path::Path;

use clap::Subcommand;

use crate::common::open_ledger;

#[derive(Subcommand)]
pub enum StreakAction {
    /// Stored streak record for an account
    Show {
        #[arg(long)]
        account: String,
    },
    /// Risk assessment at a height
    Risk {
        #[arg(long)]
        account: String,
        #[arg(long)]
        height: u64,
    },
    /// Combined record + eligibility snapshot
    Info {
        #[arg(long)]
        account: String,
        #[arg(long)]
        height: u64,
    },
    /// Whether a check-in at this height would succeed
    CanCheckin {
        #[arg(long)]
        account: String,
        #[arg(long)]
        height: u64,
    },
}

pub fn run(db: Option<&Path>, action: StreakAction) -> Result<(), Box<dyn std::error::Error>> {
    let ledger = open_ledger(db)?;

    match action {
        StreakAction::Show { account } => match ledger.get_user_streak(&account)? {
            Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
            None => println!("no check-ins recorded for {account}"),
        },
        StreakAction::Risk { account, height } => {
            let risk = ledger.is_streak_at_risk(&account, height)?;
            println!("{}", serde_json::to_string_pretty(&risk)?);
        }
        StreakAction::Info { account, height } => {
            let info = ledger.streak_info(&account, height)?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        StreakAction::CanCheckin { account, height } => {
            println!("{}", ledger.can_check_in(&account, height)?);
        }
    }
    Ok(())
}
