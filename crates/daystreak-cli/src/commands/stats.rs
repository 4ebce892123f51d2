use std::path::Path;

use crate::common::open_ledger;

pub fn run(db: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let ledger = open_ledger(db)?;
    let stats = ledger.get_global_stats()?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
