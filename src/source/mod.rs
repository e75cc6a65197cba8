//! Frame sources
//!
//! This module provides the [`FrameSource`] trait the scheduler captures
//! from, and the sources that ship with the crate:
//!
//! - [`PatternSource`] - synthetic test patterns, no hardware needed
//! - [`DirectorySource`] - replays image files from a directory
//!
//! Camera drivers live outside this crate; anything that can hand over an
//! RGB image on demand can implement the trait.

pub mod directory;
pub mod pattern;

pub use directory::DirectorySource;
pub use pattern::PatternSource;

use crate::config::{CollectConfig, SourceKind};
use crate::error::{CollectError, Result};
use crate::types::Frame;
use std::time::{Duration, Instant};

/// Unified interface for frame sources
///
/// `capture` may block for as long as the source needs to produce the next
/// frame. The scheduler does nothing else while it waits.
///
/// # Example
///
/// ```ignore
/// fn grab_one(source: &mut dyn FrameSource) -> Result<Frame> {
///     source.start()?;
///     let frame = source.capture();
///     source.stop();
///     frame
/// }
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait FrameSource {
    /// Initialise the source; called once before warmup
    fn start(&mut self) -> Result<()> {
        Ok(())
    }

    /// Block until the next frame is available
    ///
    /// Errors are fatal to the capture session.
    fn capture(&mut self) -> Result<Frame>;

    /// Release the source; called on every exit path, never fails
    fn stop(&mut self) {}

    /// Configured frame size as (width, height)
    fn resolution(&self) -> (u32, u32);

    /// Human readable description for logs
    fn describe(&self) -> String;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn start(&mut self) -> Result<()> {
        (**self).start()
    }

    fn capture(&mut self) -> Result<Frame> {
        (**self).capture()
    }

    fn stop(&mut self) {
        (**self).stop()
    }

    fn resolution(&self) -> (u32, u32) {
        (**self).resolution()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Build the source selected in the config
pub fn from_config(config: &CollectConfig) -> Result<Box<dyn FrameSource>> {
    let pacing = FramePacer::from_fps(config.source.fps);
    match config.source.kind {
        SourceKind::Pattern => Ok(Box::new(
            PatternSource::new(config.width, config.height, config.source.pattern)
                .with_pacer(pacing),
        )),
        SourceKind::Directory => {
            let dir = config.source.directory.clone().ok_or_else(|| {
                CollectError::Config("directory source requires a replay directory".to_string())
            })?;
            Ok(Box::new(
                DirectorySource::new(dir, config.width, config.height)
                    .looping(config.source.looping)
                    .with_pacer(pacing),
            ))
        }
    }
}

/// Holds a source to a target frame rate
///
/// Sleeps out whatever is left of the frame period since the previous
/// frame was handed out.
#[derive(Debug, Clone, Default)]
pub struct FramePacer {
    period: Option<Duration>,
    last_frame: Option<Instant>,
}

impl FramePacer {
    /// Pacer for the given rate; 0 (or less) disables pacing
    pub fn from_fps(fps: f64) -> Self {
        let period = (fps.is_finite() && fps > 0.0).then(|| Duration::from_secs_f64(1.0 / fps));
        Self {
            period,
            last_frame: None,
        }
    }

    /// Frame period, if pacing is enabled
    pub fn period(&self) -> Option<Duration> {
        self.period
    }

    /// Block until the next frame is due
    pub fn wait(&mut self) {
        if let (Some(period), Some(last)) = (self.period, self.last_frame) {
            let elapsed = last.elapsed();
            if elapsed < period {
                std::thread::sleep(period - elapsed);
            }
        }
        self.last_frame = Some(Instant::now());
    }

    /// Forget the previous frame time
    pub fn reset(&mut self) {
        self.last_frame = None;
    }
}
