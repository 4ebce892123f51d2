mod store;

pub use store::StreakDb;

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns `~/.config/daystreak[-dev]/` based on DAYSTREAK_ENV.
///
/// Set DAYSTREAK_ENV=dev to use a separate development data directory.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("DAYSTREAK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("daystreak-dev")
    } else {
        base_dir.join("daystreak")
    };

    std::fs::create_dir_all(&dir).map_err(|source| StorageError::DataDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
