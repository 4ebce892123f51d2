//! Integration tests for the streak ledger.
//!
//! Walks full check-in histories through an in-memory ledger and verifies
//! the streak state machine, the global aggregate, and the read-only
//! queries against each other.

use daystreak_core::{GlobalStats, LedgerError, StreakLedger};

#[test]
fn test_reference_check_in_sequence() {
    let ledger = StreakLedger::open_memory().unwrap();

    // Day 0: first ever check-in.
    let outcome = ledger.check_in("alice", 0).unwrap();
    assert_eq!(outcome.current_streak, 1);
    assert_eq!(outcome.total_check_ins, 1);
    assert!(!outcome.streak_continued);

    // Same day (height 100 < 144): rejected, nothing changes.
    let err = ledger.check_in("alice", 100).unwrap_err();
    assert!(matches!(err, LedgerError::AlreadyCheckedIn { day: 0 }));
    let record = ledger.get_user_streak("alice").unwrap().unwrap();
    assert_eq!(record.current_streak, 1);
    assert_eq!(record.total_check_ins, 1);

    // Day 1 (height 144): streak continues.
    let outcome = ledger.check_in("alice", 144).unwrap();
    assert_eq!(outcome.current_streak, 2);
    assert!(outcome.streak_continued);

    // Day 3 (height 432), day 2 skipped: streak resets, longest stays 2.
    let outcome = ledger.check_in("alice", 432).unwrap();
    assert_eq!(outcome.current_streak, 1);
    assert!(!outcome.streak_continued);
    assert_eq!(outcome.longest_streak, 2);
}

#[test]
fn test_longest_streak_survives_reset() {
    let ledger = StreakLedger::open_memory().unwrap();

    // Three consecutive days.
    for day in 0..3u64 {
        ledger.check_in("alice", day * 144).unwrap();
    }

    // Skip a day, start over.
    ledger.check_in("alice", 4 * 144).unwrap();

    let record = ledger.get_user_streak("alice").unwrap().unwrap();
    assert_eq!(record.longest_streak, 3);
    assert_eq!(record.current_streak, 1);
    assert_eq!(record.total_check_ins, 4);
}

#[test]
fn test_longest_streak_never_decreases() {
    let ledger = StreakLedger::open_memory().unwrap();

    // Alternating runs of consecutive days and gaps.
    let days: [u64; 9] = [0, 1, 2, 5, 6, 7, 8, 11, 12];
    let mut max_seen = 0;
    let mut prev_longest = 0;

    for day in days {
        let outcome = ledger.check_in("alice", day * 144).unwrap();
        max_seen = max_seen.max(outcome.current_streak);
        assert_eq!(outcome.longest_streak, max_seen);
        assert!(outcome.longest_streak >= prev_longest);
        assert!(outcome.longest_streak >= outcome.current_streak);
        prev_longest = outcome.longest_streak;
    }

    // Longest run above is days 5..=8.
    assert_eq!(prev_longest, 4);
}

#[test]
fn test_global_stats_across_accounts() {
    let ledger = StreakLedger::open_memory().unwrap();

    assert_eq!(ledger.get_global_stats().unwrap(), GlobalStats::default());

    ledger.check_in("alice", 0).unwrap();
    ledger.check_in("bob", 0).unwrap();

    let stats = ledger.get_global_stats().unwrap();
    assert_eq!(stats.total_users, 2);
    assert_eq!(stats.total_check_ins, 2);

    // More check-ins by existing accounts bump check-ins, not users.
    ledger.check_in("alice", 144).unwrap();
    ledger.check_in("bob", 300).unwrap();

    let stats = ledger.get_global_stats().unwrap();
    assert_eq!(stats.total_users, 2);
    assert_eq!(stats.total_check_ins, 4);
}

#[test]
fn test_aggregate_matches_sum_of_records() {
    let ledger = StreakLedger::open_memory().unwrap();

    let histories: [(&str, &[u64]); 3] = [
        ("alice", &[0, 1, 2, 4]),
        ("bob", &[1, 3]),
        ("carol", &[2, 3, 4, 5, 6]),
    ];

    let mut expected_check_ins = 0u64;
    for (account, days) in histories {
        for &day in days {
            ledger.check_in(account, day * 144).unwrap();
            expected_check_ins += 1;
        }
    }

    let stats = ledger.get_global_stats().unwrap();
    assert_eq!(stats.total_users, 3);
    assert_eq!(stats.total_check_ins, expected_check_ins);

    let sum: u64 = ["alice", "bob", "carol"]
        .iter()
        .map(|a| ledger.get_user_streak(a).unwrap().unwrap().total_check_ins)
        .sum();
    assert_eq!(stats.total_check_ins, sum);
}

#[test]
fn test_eligibility_agrees_with_check_in_result() {
    let ledger = StreakLedger::open_memory().unwrap();

    for (account, height) in [("alice", 0), ("alice", 100), ("alice", 144), ("bob", 50)] {
        let eligible = ledger.can_check_in(account, height).unwrap();
        match ledger.check_in(account, height) {
            Ok(_) => assert!(eligible, "{account}@{height} succeeded but was not eligible"),
            Err(LedgerError::AlreadyCheckedIn { .. }) => {
                assert!(!eligible, "{account}@{height} was eligible but rejected")
            }
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
}

#[test]
fn test_risk_probe_after_missed_day() {
    let ledger = StreakLedger::open_memory().unwrap();

    ledger.check_in("alice", 0).unwrap();

    // Height 300 is day 2: day 1 was skipped, streak already broken.
    let risk = ledger.is_streak_at_risk("alice", 300).unwrap();
    assert!(risk.at_risk);
    assert_eq!(risk.days_missed, 1);
    assert!(risk.will_break);

    // The very next check-in indeed resets to 1.
    let outcome = ledger.check_in("alice", 300).unwrap();
    assert_eq!(outcome.current_streak, 1);
    assert!(!outcome.streak_continued);
}

#[test]
fn test_risk_probe_same_day_and_next_day() {
    let ledger = StreakLedger::open_memory().unwrap();

    ledger.check_in("alice", 0).unwrap();

    // Still day 0: nothing to worry about.
    let risk = ledger.is_streak_at_risk("alice", 100).unwrap();
    assert!(!risk.at_risk);

    // Day 1, not yet checked in: savable.
    let risk = ledger.is_streak_at_risk("alice", 144).unwrap();
    assert!(risk.at_risk);
    assert_eq!(risk.days_missed, 0);
    assert!(!risk.will_break);

    // Unknown account: never at risk.
    let risk = ledger.is_streak_at_risk("bob", 144).unwrap();
    assert!(!risk.at_risk);
}

#[test]
fn test_height_regression_fails_and_mutates_nothing() {
    let ledger = StreakLedger::open_memory().unwrap();

    ledger.check_in("alice", 432).unwrap(); // day 3

    let err = ledger.check_in("alice", 144).unwrap_err(); // day 1
    assert!(matches!(
        err,
        LedgerError::HeightRegression {
            last_day: 3,
            current_day: 1
        }
    ));

    let record = ledger.get_user_streak("alice").unwrap().unwrap();
    assert_eq!(record.last_check_in_day, 3);
    assert_eq!(record.total_check_ins, 1);
    assert_eq!(ledger.get_global_stats().unwrap().total_check_ins, 1);
}

#[test]
fn test_state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("daystreak.db");

    {
        let ledger = StreakLedger::open(&path).unwrap();
        ledger.check_in("alice", 0).unwrap();
        ledger.check_in("alice", 144).unwrap();
    }

    let ledger = StreakLedger::open(&path).unwrap();
    let record = ledger.get_user_streak("alice").unwrap().unwrap();
    assert_eq!(record.current_streak, 2);

    // Continuing the streak after reopen still works.
    let outcome = ledger.check_in("alice", 288).unwrap();
    assert_eq!(outcome.current_streak, 3);
    assert!(outcome.streak_continued);
}

#[test]
fn test_streak_info_matches_record_and_eligibility() {
    let ledger = StreakLedger::open_memory().unwrap();

    ledger.check_in("alice", 0).unwrap();
    ledger.check_in("alice", 144).unwrap();

    let info = ledger.streak_info("alice", 200).unwrap();
    let record = ledger.get_user_streak("alice").unwrap().unwrap();

    assert_eq!(info.current_streak, record.current_streak);
    assert_eq!(info.longest_streak, record.longest_streak);
    assert_eq!(info.total_check_ins, record.total_check_ins);
    assert_eq!(info.last_check_in_day, Some(record.last_check_in_day));
    assert_eq!(
        info.can_check_in_now,
        ledger.can_check_in("alice", 200).unwrap()
    );
}
