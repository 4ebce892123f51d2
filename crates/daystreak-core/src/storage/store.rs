//! SQLite-backed keyed store for streak records.
//!
//! One row per account in `streaks`, one fixed row (`id = 0`) in
//! `global_stats`. A check-in writes both inside a single transaction so a
//! reader never sees one updated without the other.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::StorageError;
use crate::ledger::{AccountStreak, GlobalStats};

use super::data_dir;

/// Database handle for streak records and the global aggregate.
pub struct StreakDb {
    conn: Connection,
}

impl StreakDb {
    /// Open the database at `~/.config/daystreak/daystreak.db`.
    ///
    /// Creates the file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_default() -> Result<Self, StorageError> {
        Self::open(data_dir()?.join("daystreak.db"))
    }

    /// Open the database at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let conn = Connection::open(path.as_ref()).map_err(|source| StorageError::OpenFailed {
            path: path.as_ref().to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    ///
    /// # Errors
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(|source| StorageError::OpenFailed {
            path: ":memory:".into(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS streaks (
                    account           TEXT PRIMARY KEY,
                    current_streak    INTEGER NOT NULL,
                    longest_streak    INTEGER NOT NULL,
                    total_check_ins   INTEGER NOT NULL,
                    last_check_in_day INTEGER NOT NULL
                );

                CREATE TABLE IF NOT EXISTS global_stats (
                    id              INTEGER PRIMARY KEY CHECK (id = 0),
                    total_users     INTEGER NOT NULL,
                    total_check_ins INTEGER NOT NULL
                );

                -- Seed the singleton row so reads never special-case absence
                INSERT OR IGNORE INTO global_stats (id, total_users, total_check_ins)
                VALUES (0, 0, 0);",
            )
            .map_err(|e| StorageError::MigrationFailed(e.to_string()))
    }

    /// Fetch the streak record for `account`, if it has ever checked in.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn get_account(&self, account: &str) -> Result<Option<AccountStreak>, StorageError> {
        self.conn
            .query_row(
                "SELECT account, current_streak, longest_streak, total_check_ins, last_check_in_day
                 FROM streaks WHERE account = ?1",
                params![account],
                |row| {
                    Ok(AccountStreak {
                        account: row.get(0)?,
                        current_streak: row.get(1)?,
                        longest_streak: row.get(2)?,
                        total_check_ins: row.get(3)?,
                        last_check_in_day: row.get(4)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    /// Fetch the global aggregate.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn global_stats(&self) -> Result<GlobalStats, StorageError> {
        self.conn
            .query_row(
                "SELECT total_users, total_check_ins FROM global_stats WHERE id = 0",
                [],
                |row| {
                    Ok(GlobalStats {
                        total_users: row.get(0)?,
                        total_check_ins: row.get(1)?,
                    })
                },
            )
            .map_err(Into::into)
    }

    /// Persist a check-in: upsert the account record and bump the global
    /// aggregate in one transaction.
    ///
    /// `first_check_in` marks a brand-new account and also increments
    /// `total_users`.
    ///
    /// # Errors
    /// Returns an error if any statement or the commit fails; on error the
    /// transaction rolls back and nothing is written.
    pub fn apply_check_in(
        &mut self,
        record: &AccountStreak,
        first_check_in: bool,
    ) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO streaks (account, current_streak, longest_streak, total_check_ins, last_check_in_day)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(account) DO UPDATE SET
                current_streak = excluded.current_streak,
                longest_streak = excluded.longest_streak,
                total_check_ins = excluded.total_check_ins,
                last_check_in_day = excluded.last_check_in_day",
            params![
                record.account,
                record.current_streak,
                record.longest_streak,
                record.total_check_ins,
                record.last_check_in_day,
            ],
        )?;

        let new_users: u64 = if first_check_in { 1 } else { 0 };
        tx.execute(
            "UPDATE global_stats
             SET total_users = total_users + ?1,
                 total_check_ins = total_check_ins + 1
             WHERE id = 0",
            params![new_users],
        )?;

        tx.commit()?;
        Ok(())
    }

    /// Recompute the aggregate from the account rows.
    ///
    /// Used by tests and diagnostics to verify that `global_stats` never
    /// drifts from the per-account records.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn recompute_global_stats(&self) -> Result<GlobalStats, StorageError> {
        self.conn
            .query_row(
                "SELECT COUNT(*), COALESCE(SUM(total_check_ins), 0) FROM streaks",
                [],
                |row| {
                    Ok(GlobalStats {
                        total_users: row.get(0)?,
                        total_check_ins: row.get(1)?,
                    })
                },
            )
            .map_err(Into::into)
    }
}
