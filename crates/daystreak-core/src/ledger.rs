//! Daily check-in streak ledger.
//!
//! Per-account records plus one global aggregate, updated by a deterministic
//! state machine: a check-in either starts a streak, continues it (previous
//! day checked in), or resets it (a day was skipped). Same-day repeats are
//! rejected without touching state.
//!
//! The decision logic is pure (`transition`, `assess_risk`); [`StreakLedger`]
//! wires it to the SQLite store and serializes writers behind a mutex so the
//! account record and the global stats always move together.

use std::path::Path;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::bucket::{day_index_with, BLOCKS_PER_DAY};
use crate::error::{LedgerError, Result};
use crate::storage::StreakDb;

/// Streak record for one account.
///
/// Created lazily on the account's first check-in and never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountStreak {
    /// Opaque account identifier (the record key)
    pub account: String,

    /// Consecutive days checked in, ending at `last_check_in_day`
    pub current_streak: u32,

    /// Maximum `current_streak` ever observed for this account
    pub longest_streak: u32,

    /// Lifetime check-in count, incremented once per successful check-in
    pub total_check_ins: u64,

    /// Day index of the most recent successful check-in
    pub last_check_in_day: u64,
}

/// Aggregate across all accounts. Zeros until the first ever check-in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalStats {
    /// Distinct accounts that have ever checked in
    pub total_users: u64,

    /// Sum of `total_check_ins` over all account records
    pub total_check_ins: u64,
}

/// What a successful check-in did to the account's record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInOutcome {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_check_ins: u64,
    /// True iff this check-in extended an unbroken streak from the previous day
    pub streak_continued: bool,
}

/// Whether the account's streak is in danger at the given height.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// The account has not checked in today and has a streak to lose
    pub at_risk: bool,

    /// Full days skipped since the last check-in (0 while still savable)
    pub days_missed: u64,

    /// The streak is already broken; the next check-in resets it to 1
    pub will_break: bool,
}

/// Combined read-only snapshot for display: the record plus eligibility.
///
/// Unknown accounts get zeros and `can_check_in_now = true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakInfo {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_check_ins: u64,
    pub last_check_in_day: Option<u64>,
    pub can_check_in_now: bool,
}

/// Outcome of the pure check-in transition: the record to persist and what
/// the change was.
#[derive(Debug)]
struct Transition {
    record: AccountStreak,
    streak_continued: bool,
    first_check_in: bool,
}

/// Pure check-in state machine.
///
/// Decides, from the stored record (if any) and today's day index, what the
/// new record looks like. Does not touch storage.
fn transition(existing: Option<&AccountStreak>, account: &str, today: u64) -> Result<Transition> {
    match existing {
        None => Ok(Transition {
            record: AccountStreak {
                account: account.to_string(),
                current_streak: 1,
                longest_streak: 1,
                total_check_ins: 1,
                last_check_in_day: today,
            },
            streak_continued: false,
            first_check_in: true,
        }),
        Some(prev) => {
            if today == prev.last_check_in_day {
                return Err(LedgerError::AlreadyCheckedIn { day: today });
            }
            if today < prev.last_check_in_day {
                // Heights are trusted to be non-decreasing; fail fast
                // instead of silently regressing the streak.
                return Err(LedgerError::HeightRegression {
                    last_day: prev.last_check_in_day,
                    current_day: today,
                });
            }

            let streak_continued = today - prev.last_check_in_day == 1;
            let current_streak = if streak_continued {
                prev.current_streak + 1
            } else {
                1
            };

            Ok(Transition {
                record: AccountStreak {
                    account: prev.account.clone(),
                    current_streak,
                    longest_streak: prev.longest_streak.max(current_streak),
                    total_check_ins: prev.total_check_ins + 1,
                    last_check_in_day: today,
                },
                streak_continued,
                first_check_in: false,
            })
        }
    }
}

/// Pure risk rule.
///
/// `delta == 1` means today is still open: checking in now saves the streak.
/// `delta >= 2` means at least one full day was skipped and the streak is
/// already gone. Accounts with no record (or a zero streak) have nothing to
/// lose and are never at risk.
fn assess_risk(existing: Option<&AccountStreak>, today: u64) -> RiskAssessment {
    let record = match existing {
        Some(r) if r.current_streak > 0 => r,
        _ => return RiskAssessment::default(),
    };

    // A regressed height reads as delta 0: risk is a pure query and must
    // not fail on behalf of a future write.
    let delta = today.saturating_sub(record.last_check_in_day);
    match delta {
        0 => RiskAssessment::default(),
        1 => RiskAssessment {
            at_risk: true,
            days_missed: 0,
            will_break: false,
        },
        _ => RiskAssessment {
            at_risk: true,
            days_missed: delta - 1,
            will_break: true,
        },
    }
}

/// Streak ledger over a SQLite-backed keyed store.
///
/// All writers go through the mutex, so the read-modify-write of an account
/// record and the matching global-stats bump are observed atomically.
pub struct StreakLedger {
    db: Mutex<StreakDb>,
    blocks_per_day: u64,
}

impl StreakLedger {
    /// Open the ledger at the default data directory.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_default() -> Result<Self> {
        Ok(Self::from_db(StreakDb::open_default()?))
    }

    /// Open the ledger at an explicit database path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_db(StreakDb::open(path)?))
    }

    /// Open an in-memory ledger (for tests and throwaway use).
    ///
    /// # Errors
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_memory() -> Result<Self> {
        Ok(Self::from_db(StreakDb::open_memory()?))
    }

    fn from_db(db: StreakDb) -> Self {
        Self {
            db: Mutex::new(db),
            blocks_per_day: BLOCKS_PER_DAY,
        }
    }

    /// Override the heights-per-day bucket size (default 144).
    pub fn with_bucket_size(mut self, blocks_per_day: u64) -> Self {
        self.blocks_per_day = blocks_per_day;
        self
    }

    /// Day index for a height under this ledger's bucket size.
    pub fn day_index(&self, height: u64) -> u64 {
        day_index_with(height, self.blocks_per_day)
    }

    /// Record a check-in for `account` at `height`.
    ///
    /// The account record and the global stats are persisted in a single
    /// transaction; on any error nothing is mutated.
    ///
    /// # Errors
    /// [`LedgerError::AlreadyCheckedIn`] if the account already checked in
    /// during the same day bucket, [`LedgerError::HeightRegression`] if the
    /// height maps to a day before the stored last check-in.
    pub fn check_in(&self, account: &str, height: u64) -> Result<CheckInOutcome> {
        let today = self.day_index(height);
        let mut db = self.lock_db();

        let existing = db.get_account(account)?;
        let t = transition(existing.as_ref(), account, today)?;
        db.apply_check_in(&t.record, t.first_check_in)?;

        Ok(CheckInOutcome {
            current_streak: t.record.current_streak,
            longest_streak: t.record.longest_streak,
            total_check_ins: t.record.total_check_ins,
            streak_continued: t.streak_continued,
        })
    }

    /// Whether `check_in(account, height)` would succeed right now.
    ///
    /// # Errors
    /// Returns an error only if storage fails.
    pub fn can_check_in(&self, account: &str, height: u64) -> Result<bool> {
        let today = self.day_index(height);
        let db = self.lock_db();
        let existing = db.get_account(account)?;
        Ok(match existing {
            None => true,
            Some(r) => today > r.last_check_in_day,
        })
    }

    /// Snapshot of the account's record, or `None` if it never checked in.
    ///
    /// # Errors
    /// Returns an error only if storage fails.
    pub fn get_user_streak(&self, account: &str) -> Result<Option<AccountStreak>> {
        Ok(self.lock_db().get_account(account)?)
    }

    /// Snapshot of the global aggregate. Zeros before the first check-in.
    ///
    /// # Errors
    /// Returns an error only if storage fails.
    pub fn get_global_stats(&self) -> Result<GlobalStats> {
        Ok(self.lock_db().global_stats()?)
    }

    /// Assess whether the account's streak is in danger at `height`.
    ///
    /// # Errors
    /// Returns an error only if storage fails.
    pub fn is_streak_at_risk(&self, account: &str, height: u64) -> Result<RiskAssessment> {
        let today = self.day_index(height);
        let existing = self.lock_db().get_account(account)?;
        Ok(assess_risk(existing.as_ref(), today))
    }

    /// Combined record + eligibility snapshot for display.
    ///
    /// # Errors
    /// Returns an error only if storage fails.
    pub fn streak_info(&self, account: &str, height: u64) -> Result<StreakInfo> {
        let today = self.day_index(height);
        let existing = self.lock_db().get_account(account)?;
        Ok(match existing {
            None => StreakInfo {
                current_streak: 0,
                longest_streak: 0,
                total_check_ins: 0,
                last_check_in_day: None,
                can_check_in_now: true,
            },
            Some(r) => StreakInfo {
                current_streak: r.current_streak,
                longest_streak: r.longest_streak,
                total_check_ins: r.total_check_ins,
                last_check_in_day: Some(r.last_check_in_day),
                can_check_in_now: today > r.last_check_in_day,
            },
        })
    }

    fn lock_db(&self) -> std::sync::MutexGuard<'_, StreakDb> {
        // A poisoned mutex means a panic mid-read; the store itself commits
        // transactionally, so the data is still consistent.
        self.db.lock().unwrap_or_else(|e| e.into_inner())
    }
}
