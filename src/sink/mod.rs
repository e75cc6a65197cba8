//! Persistence of sampled frames
//!
//! The scheduler hands each frame it decides to keep to a
//! [`PersistenceSink`] together with the path to write it to. A failed write
//! is an ordinary return value here; the scheduler records it and carries on.
//!
//! # File Naming
//!
//! Samples are named `{prefix}_{index:06}_{timestamp}.{ext}` where the
//! timestamp is the local wall time with microsecond precision
//! (`%Y%m%d_%H%M%S_%6f`). The zero-padded index keeps names unique and
//! sortable even when two saves land in the same microsecond.

pub mod image_file;

pub use image_file::ImageFileSink;

use crate::error::Result;
use crate::types::Frame;
use chrono::{DateTime, Local};
use std::path::Path;

/// Timestamp layout used in sample file names
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S_%6f";

/// Destination for sampled frames
#[cfg_attr(test, mockall::automock)]
pub trait PersistenceSink {
    /// Encode `frame` and write it to `path`
    ///
    /// `quality` is in 0-100; formats without a quality knob ignore it.
    fn write(&mut self, frame: &Frame, path: &Path, quality: u8) -> Result<()>;
}

/// Build the file name for a sample
pub fn sample_file_name(prefix: &str, index: u64, taken_at: DateTime<Local>, extension: &str) -> String {
    format!(
        "{}_{:06}_{}.{}",
        prefix,
        index,
        taken_at.format(TIMESTAMP_FORMAT),
        extension
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    #[test]
    fn test_sample_file_name_layout() {
        let at = Local
            .with_ymd_and_hms(2024, 3, 9, 14, 5, 7)
            .unwrap()
            + chrono::Duration::microseconds(42);
        assert_eq!(
            sample_file_name("img", 7, at, "jpg"),
            "img_000007_20240309_140507_000042.jpg"
        );
    }

    #[test]
    fn test_index_wider_than_padding() {
        let at = Local.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let name = sample_file_name("cat", 1_234_567, at, "png");
        assert!(name.starts_with("cat_1234567_"));
    }

    proptest! {
        #[test]
        fn test_names_never_collide_for_increasing_indices(
            start in 0u64..1_000_000,
            steps in prop::collection::vec(1u64..5, 1..60),
            micros in prop::collection::vec(0i64..3, 1..60),
        ) {
            // Property: strictly increasing indices give distinct names, even
            // when timestamps repeat
            let base = Local.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
            let mut index = start;
            let mut names = std::collections::HashSet::new();
            for (step, offset) in steps.iter().zip(micros.iter().cycle()) {
                index += step;
                let at = base + chrono::Duration::microseconds(*offset);
                prop_assert!(names.insert(sample_file_name("img", index, at, "jpg")));
            }
        }

        #[test]
        fn test_names_sort_chronologically_within_a_session(
            count in 1usize..40,
            gap_us in 1i64..2_000_000,
        ) {
            // Property: in-session names sort the same way they were taken
            let base = Local.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
            let names: Vec<_> = (0..count)
                .map(|i| {
                    let at = base + chrono::Duration::microseconds(gap_us * i as i64);
                    sample_file_name("img", i as u64, at, "jpg")
                })
                .collect();
            let mut sorted = names.clone();
            sorted.sort();
            prop_assert_eq!(sorted, names);
        }
    }
}
