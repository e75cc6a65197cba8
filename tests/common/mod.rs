//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;
pub mod fakes;

use std::time::Duration;

/// Shorthand for a millisecond duration
pub fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

/// Assert every scheduled save is at least `interval` after the previous one
pub fn assert_spacing(scheduled: &[Duration], interval: Duration) {
    for pair in scheduled.windows(2) {
        assert!(
            pair[1] - pair[0] >= interval,
            "Saves at {:?} and {:?} are closer than {:?}",
            pair[0],
            pair[1],
            interval
        );
    }
}
