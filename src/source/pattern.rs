//! Synthetic test-pattern source
//!
//! Produces frames without any capture hardware, which makes it handy for
//! dry runs of a collection setup and for exercising the sampling loop.
//!
//! # Patterns
//!
//! - [`PatternKind::Gradient`] - diagonal RGB gradient that scrolls each frame
//! - [`PatternKind::Bars`] - eight vertical color bars
//! - [`PatternKind::Checkerboard`] - 32px squares that invert each frame
//! - [`PatternKind::Noise`] - per-pixel pseudo-random values
//!
//! # Example
//!
//! ```ignore
//! use framecollect::source::{FrameSource, FramePacer, PatternSource};
//! use framecollect::config::PatternKind;
//!
//! let mut source = PatternSource::new(640, 480, PatternKind::Bars)
//!     .with_pacer(FramePacer::from_fps(30.0));
//! let frame = source.capture()?;
//! ```

use super::{FramePacer, FrameSource};
use crate::config::PatternKind;
use crate::error::{CollectError, Result};
use crate::types::Frame;
use image::{Rgb, RgbImage};
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};

const CHECKER_SIZE: u32 = 32;

const NOISE_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

const BAR_COLORS: [[u8; 3]; 8] = [
    [255, 255, 255],
    [255, 255, 0],
    [0, 255, 255],
    [0, 255, 0],
    [255, 0, 255],
    [255, 0, 0],
    [0, 0, 255],
    [0, 0, 0],
];

/// Frame source that draws a synthetic pattern
#[derive(Debug)]
pub struct PatternSource {
    width: u32,
    height: u32,
    pattern: PatternKind,
    pacer: FramePacer,
    sequence: u64,
    rng: SmallRng,
    started: bool,
}

impl PatternSource {
    /// Create a new pattern source
    pub fn new(width: u32, height: u32, pattern: PatternKind) -> Self {
        Self {
            width,
            height,
            pattern,
            pacer: FramePacer::default(),
            sequence: 0,
            rng: SmallRng::seed_from_u64(NOISE_SEED),
            started: false,
        }
    }

    /// Pace frame delivery
    pub fn with_pacer(mut self, pacer: FramePacer) -> Self {
        self.pacer = pacer;
        self
    }

    /// Pattern being drawn
    pub fn pattern(&self) -> PatternKind {
        self.pattern
    }

    fn render(&mut self) -> RgbImage {
        let (w, h) = (self.width, self.height);
        let phase = self.sequence;
        match self.pattern {
            PatternKind::Gradient => RgbImage::from_fn(w, h, |x, y| {
                let shift = (phase * 4 % 256) as u32;
                let r = ((x * 255 / w.max(1) + shift) % 256) as u8;
                let g = ((y * 255 / h.max(1) + shift) % 256) as u8;
                let b = (((x + y) / 2 + shift) % 256) as u8;
                Rgb([r, g, b])
            }),
            PatternKind::Bars => RgbImage::from_fn(w, h, |x, _| {
                let bar = (x as u64 * BAR_COLORS.len() as u64 / w.max(1) as u64) as usize;
                Rgb(BAR_COLORS[bar.min(BAR_COLORS.len() - 1)])
            }),
            PatternKind::Checkerboard => RgbImage::from_fn(w, h, |x, y| {
                let cell = (x / CHECKER_SIZE + y / CHECKER_SIZE) as u64 + phase;
                if cell % 2 == 0 {
                    Rgb([255, 255, 255])
                } else {
                    Rgb([0, 0, 0])
                }
            }),
            PatternKind::Noise => {
                let mut img = RgbImage::new(w, h);
                self.rng.fill_bytes(&mut img);
                img
            }
        }
    }
}

impl FrameSource for PatternSource {
    fn start(&mut self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CollectError::Source(format!(
                "invalid pattern size {}x{}",
                self.width, self.height
            )));
        }
        self.sequence = 0;
        self.rng = SmallRng::seed_from_u64(NOISE_SEED);
        self.pacer.reset();
        self.started = true;
        tracing::debug!("Pattern source started: {}", self.describe());
        Ok(())
    }

    fn capture(&mut self) -> Result<Frame> {
        if !self.started {
            return Err(CollectError::Source("pattern source not started".to_string()));
        }
        self.pacer.wait();
        let image = self.render();
        let frame = Frame::new(image, self.sequence);
        self.sequence += 1;
        Ok(frame)
    }

    fn stop(&mut self) {
        self.started = false;
    }

    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn describe(&self) -> String {
        format!(
            "{:?} pattern {}x{}",
            self.pattern, self.width, self.height
        )
        .to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_requires_start() {
        let mut source = PatternSource::new(8, 8, PatternKind::Gradient);
        assert!(source.capture().is_err());
        source.start().unwrap();
        assert!(source.capture().is_ok());
    }

    #[test]
    fn test_frames_have_configured_size_and_sequence() {
        let mut source = PatternSource::new(40, 30, PatternKind::Checkerboard);
        source.start().unwrap();
        let first = source.capture().unwrap();
        let second = source.capture().unwrap();
        assert_eq!((first.width(), first.height()), (40, 30));
        assert_eq!(first.sequence, 0);
        assert_eq!(second.sequence, 1);
    }

    #[test]
    fn test_checkerboard_inverts() {
        let mut source = PatternSource::new(64, 64, PatternKind::Checkerboard);
        source.start().unwrap();
        let a = source.capture().unwrap();
        let b = source.capture().unwrap();
        assert_ne!(a.image.get_pixel(0, 0), b.image.get_pixel(0, 0));
    }

    #[test]
    fn test_bars_cover_width() {
        let mut source = PatternSource::new(80, 4, PatternKind::Bars);
        source.start().unwrap();
        let frame = source.capture().unwrap();
        assert_eq!(frame.image.get_pixel(0, 0), &Rgb([255, 255, 255]));
        assert_eq!(frame.image.get_pixel(79, 0), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_noise_changes_between_frames() {
        let mut source = PatternSource::new(16, 16, PatternKind::Noise);
        source.start().unwrap();
        let a = source.capture().unwrap();
        let b = source.capture().unwrap();
        assert_ne!(a.image.as_raw(), b.image.as_raw());
    }

    #[test]
    fn test_noise_fills_every_channel() {
        let mut source = PatternSource::new(32, 32, PatternKind::Noise);
        source.start().unwrap();
        let frame = source.capture().unwrap();
        for channel in 0..3 {
            let distinct: std::collections::HashSet<u8> =
                frame.image.pixels().map(|p| p.0[channel]).collect();
            assert!(distinct.len() > 64, "channel {} has {} values", channel, distinct.len());
        }
    }

    #[test]
    fn test_noise_replays_after_restart() {
        let mut source = PatternSource::new(8, 8, PatternKind::Noise);
        source.start().unwrap();
        let first = source.capture().unwrap();
        source.stop();
        source.start().unwrap();
        let again = source.capture().unwrap();
        assert_eq!(first.image.as_raw(), again.image.as_raw());
    }

    #[test]
    fn test_restart_resets_sequence() {
        let mut source = PatternSource::new(4, 4, PatternKind::Gradient);
        source.start().unwrap();
        source.capture().unwrap();
        source.stop();
        source.start().unwrap();
        assert_eq!(source.capture().unwrap().sequence, 0);
    }

    #[test]
    fn test_zero_size_fails_to_start() {
        let mut source = PatternSource::new(0, 10, PatternKind::Bars);
        assert!(source.start().is_err());
    }
}
