use std::path::Path;

use daystreak_core::{Config, StreakLedger};

/// Open the ledger, honoring a `--db` override and the configured bucket
/// size.
pub fn open_ledger(db: Option<&Path>) -> Result<StreakLedger, Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let ledger = match db {
        Some(path) => StreakLedger::open(path)?,
        None => StreakLedger::open_default()?,
    };
    Ok(ledger.with_bucket_size(config.bucket.blocks_per_day))
}
