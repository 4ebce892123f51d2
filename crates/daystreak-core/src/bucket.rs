//! Height-to-day bucketing.
//!
//! The ledger never looks at wall-clock time. The caller supplies a
//! monotonically non-decreasing height (a block height or any tick counter)
//! and this module maps it onto discrete day indices by integer division.
//! Two heights fall in the same day iff they share a bucket
//! `[k * bucket, (k + 1) * bucket)`.

/// Heights per day at a ~10-minute tick interval over 24 hours.
pub const BLOCKS_PER_DAY: u64 = 144;

/// Day index for a height at the default bucket size.
pub fn day_index(height: u64) -> u64 {
    day_index_with(height, BLOCKS_PER_DAY)
}

/// Day index for a height at an explicit bucket size.
///
/// A zero bucket size would make every height its own day and divide by
/// zero; it is clamped to 1.
pub fn day_index_with(height: u64, blocks_per_day: u64) -> u64 {
    height / blocks_per_day.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_boundaries_are_half_open() {
        assert_eq!(day_index(0), 0);
        assert_eq!(day_index(143), 0);
        assert_eq!(day_index(144), 1);
        assert_eq!(day_index(287), 1);
        assert_eq!(day_index(288), 2);
    }

    #[test]
    fn test_same_bucket_same_day() {
        assert_eq!(day_index(100), day_index(0));
        assert_ne!(day_index(100), day_index(144));
    }

    #[test]
    fn test_custom_bucket_size() {
        assert_eq!(day_index_with(9, 10), 0);
        assert_eq!(day_index_with(10, 10), 1);
        assert_eq!(day_index_with(25, 10), 2);
    }

    #[test]
    fn test_zero_bucket_size_clamped() {
        assert_eq!(day_index_with(42, 0), 42);
    }
}
