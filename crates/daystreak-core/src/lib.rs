//! # Daystreak Core Library
//!
//! Core business logic for Daystreak, a per-account daily check-in streak
//! ledger. Time never comes from the wall clock: the caller supplies a
//! monotonically non-decreasing height (block height or tick counter) and
//! the ledger buckets it into day indices.
//!
//! ## Architecture
//!
//! - **Bucket**: pure height-to-day-index conversion
//! - **Ledger**: the check-in state machine (continue / reset / start) plus
//!   eligibility, risk, and aggregate queries
//! - **Storage**: SQLite-backed keyed store, one transaction per check-in
//! - **Config**: TOML-based configuration for the bucket size
//!
//! ## Key Components
//!
//! - [`StreakLedger`]: the operation surface callers use
//! - [`StreakDb`]: record persistence
//! - [`Config`]: application configuration

pub mod bucket;
pub mod config;
pub mod error;
pub mod ledger;
pub mod storage;

pub use bucket::{day_index, BLOCKS_PER_DAY};
pub use config::Config;
pub use error::{LedgerError, Result, StorageError};
pub use ledger::{
    AccountStreak, CheckInOutcome, GlobalStats, RiskAssessment, StreakInfo, StreakLedger,
};
pub use storage::StreakDb;
