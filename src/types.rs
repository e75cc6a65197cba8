//! Core data types for framecollect
//!
//! This module contains the values that flow between the frame source, the
//! sampling scheduler, the persistence sink and the status display.

use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// A single image sample obtained from a [`FrameSource`](crate::source::FrameSource)
///
/// Frames are only valid for the tick that produced them. The scheduler
/// either hands one to the sink or drops it.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Pixel data
    pub image: RgbImage,
    /// Capture sequence number assigned by the source (0-based)
    pub sequence: u64,
}

impl Frame {
    /// Create a new frame
    pub fn new(image: RgbImage, sequence: u64) -> Self {
        Self { image, sequence }
    }

    /// Frame width in pixels
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Frame height in pixels
    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Result of a single persistence attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SampleOutcome {
    /// The frame was encoded and written
    Saved,
    /// The write failed; the message describes why
    Failed(String),
}

impl SampleOutcome {
    /// Check if the write succeeded
    pub fn is_saved(&self) -> bool {
        matches!(self, SampleOutcome::Saved)
    }
}

/// A persisted (or attempted) sample
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleRecord {
    /// Attempt index used in the file name
    pub index: u64,
    /// File name within the output directory
    pub file_name: String,
    /// Full path the frame was written to
    pub path: PathBuf,
    /// Clock reading at which the save was scheduled
    pub scheduled_at: Duration,
    /// Whether the write succeeded
    pub outcome: SampleOutcome,
}

/// State of the sampling state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionState {
    /// Waiting for the source to settle
    #[default]
    Warmup,
    /// Inside the sampling window
    Sampling,
    /// The window elapsed
    Completed,
    /// The user stopped the session early
    Cancelled,
}

impl SessionState {
    /// Check if the session has ended
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Completed | SessionState::Cancelled)
    }

    /// Display name for the state
    pub fn display_name(&self) -> &'static str {
        match self {
            SessionState::Warmup => "Warmup",
            SessionState::Sampling => "Sampling",
            SessionState::Completed => "Completed",
            SessionState::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Status emitted once per tick
///
/// The `Display` impl renders the overlay text shown on top of the frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusUpdate {
    /// Number of frames written successfully so far
    pub saved: u64,
    /// Time left in the sampling window (never negative)
    pub remaining: Duration,
    /// Configured sampling interval
    pub interval: Duration,
}

impl fmt::Display for StatusUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Saved: {} | remaining: {:4.1}s | interval={:?}s | 'q' to quit",
            self.saved,
            self.remaining.as_secs_f64(),
            self.interval.as_secs_f64()
        )
    }
}

/// Final summary of a capture session that ended without a fatal error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Terminal state: `Completed` or `Cancelled`
    pub outcome: SessionState,
    /// Frames written successfully
    pub saved: u64,
    /// Persistence attempts
    pub attempted: u64,
    /// Failed persistence attempts
    pub failed: u64,
    /// Ticks observed during the sampling window
    pub ticks: u64,
    /// Time spent sampling, from warmup exit to loop exit
    pub elapsed: Duration,
    /// Every attempted sample, in order
    pub records: Vec<SampleRecord>,
}

impl SessionReport {
    /// Message announced when the session ends
    pub fn end_message(&self, duration: Duration) -> String {
        match self.outcome {
            SessionState::Cancelled => "Stopped early by user.".to_string(),
            _ => format!(
                "Done. Captured for {:?}s, saved {} images.",
                duration.as_secs_f64(),
                self.saved
            ),
        }
    }
}
