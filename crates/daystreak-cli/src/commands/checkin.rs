use std::path::Path;

use daystreak_core::LedgerError;

use crate::common::open_ledger;

pub fn run(db: Option<&Path>, account: &str, height: u64) -> Result<(), Box<dyn std::error::Error>> {
    let ledger = open_ledger(db)?;

    match ledger.check_in(account, height) {
        Ok(outcome) => {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            Ok(())
        }
        // Expected outcome, not a fault: report it and exit cleanly.
        Err(LedgerError::AlreadyCheckedIn { day }) => {
            println!("already checked in for day {day}");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
