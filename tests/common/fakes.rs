//! Deterministic fakes for driving the scheduler without hardware

use framecollect::error::{CollectError, Result};
use framecollect::{
    Clock, Frame, FrameSource, ManualClock, PersistenceSink, SampleOutcome, SampleRecord,
    StatusDisplay, StatusUpdate,
};
use image::RgbImage;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Frame source that advances a [`ManualClock`] before each capture
///
/// `gaps[i]` is the time that passes before capture `i`; once the list is
/// used up every capture advances the clock by `step`.
pub struct ScriptedSource {
    clock: ManualClock,
    gaps: Vec<Duration>,
    step: Duration,
    captured: u64,
    fail_at: Option<u64>,
    pub starts: u32,
    pub stops: u32,
}

impl ScriptedSource {
    /// First frame arrives immediately, then one every `step`
    pub fn every(clock: &ManualClock, step: Duration) -> Self {
        Self::with_gaps(clock, vec![Duration::ZERO], step)
    }

    pub fn with_gaps(clock: &ManualClock, gaps: Vec<Duration>, step: Duration) -> Self {
        Self {
            clock: clock.clone(),
            gaps,
            step,
            captured: 0,
            fail_at: None,
            starts: 0,
            stops: 0,
        }
    }

    /// Fail capture number `n` (0-based) with a source error
    pub fn failing_at(mut self, n: u64) -> Self {
        self.fail_at = Some(n);
        self
    }

    pub fn captured(&self) -> u64 {
        self.captured
    }
}

impl FrameSource for ScriptedSource {
    fn start(&mut self) -> Result<()> {
        self.starts += 1;
        Ok(())
    }

    fn capture(&mut self) -> Result<Frame> {
        let gap = self
            .gaps
            .get(self.captured as usize)
            .copied()
            .unwrap_or(self.step);
        self.clock.advance(gap);

        if self.fail_at == Some(self.captured) {
            return Err(CollectError::Source("stream error".to_string()));
        }

        let frame = Frame::new(RgbImage::new(4, 4), self.captured);
        self.captured += 1;
        Ok(frame)
    }

    fn stop(&mut self) {
        self.stops += 1;
    }

    fn resolution(&self) -> (u32, u32) {
        (4, 4)
    }

    fn describe(&self) -> String {
        "scripted source".to_string()
    }
}

/// Wraps a real source and advances a [`ManualClock`] by a fixed step per frame
pub struct ClockedSource<S> {
    inner: S,
    clock: ManualClock,
    step: Duration,
    first: bool,
}

impl<S: FrameSource> ClockedSource<S> {
    pub fn new(inner: S, clock: &ManualClock, step: Duration) -> Self {
        Self {
            inner,
            clock: clock.clone(),
            step,
            first: true,
        }
    }
}

impl<S: FrameSource> FrameSource for ClockedSource<S> {
    fn start(&mut self) -> Result<()> {
        self.inner.start()
    }

    fn capture(&mut self) -> Result<Frame> {
        if !self.first {
            self.clock.advance(self.step);
        }
        self.first = false;
        self.inner.capture()
    }

    fn stop(&mut self) {
        self.inner.stop()
    }

    fn resolution(&self) -> (u32, u32) {
        self.inner.resolution()
    }

    fn describe(&self) -> String {
        self.inner.describe()
    }
}

/// Sink that records every write instead of touching the filesystem
#[derive(Default)]
pub struct RecordingSink {
    pub writes: Vec<(PathBuf, u8)>,
    pub written_at: Vec<Duration>,
    fail: bool,
    clock: Option<ManualClock>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every write fails
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Record the clock reading of each write
    pub fn timed(clock: &ManualClock) -> Self {
        Self {
            clock: Some(clock.clone()),
            ..Self::default()
        }
    }
}

impl PersistenceSink for RecordingSink {
    fn write(&mut self, _frame: &Frame, path: &Path, quality: u8) -> Result<()> {
        self.writes.push((path.to_path_buf(), quality));
        if let Some(clock) = &self.clock {
            self.written_at.push(clock.now());
        }
        if self.fail {
            Err(CollectError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full",
            )))
        } else {
            Ok(())
        }
    }
}

/// Display that records everything it is told
#[derive(Default)]
pub struct RecordingDisplay {
    pub statuses: Vec<StatusUpdate>,
    pub reports: Vec<SampleRecord>,
    pub announcements: Vec<String>,
    pub opens: u32,
    pub closes: u32,
    cancel_after_saves: Option<u64>,
    cancel_after_ticks: Option<usize>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation once `saved` reaches `n`
    pub fn cancel_after_saves(n: u64) -> Self {
        Self {
            cancel_after_saves: Some(n),
            ..Self::default()
        }
    }

    /// Request cancellation once `n` statuses were shown
    pub fn cancel_after_ticks(n: usize) -> Self {
        Self {
            cancel_after_ticks: Some(n),
            ..Self::default()
        }
    }

    pub fn failures(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, SampleOutcome::Failed(_)))
            .count()
    }

    pub fn count_announced(&self, message: &str) -> usize {
        self.announcements.iter().filter(|m| *m == message).count()
    }
}

impl StatusDisplay for RecordingDisplay {
    fn open(&mut self) -> Result<()> {
        self.opens += 1;
        Ok(())
    }

    fn show(&mut self, _frame: &Frame, status: &StatusUpdate) {
        self.statuses.push(*status);
    }

    fn cancel_requested(&mut self) -> bool {
        let by_saves = match (self.cancel_after_saves, self.statuses.last()) {
            (Some(n), Some(status)) => status.saved >= n,
            _ => false,
        };
        let by_ticks = self
            .cancel_after_ticks
            .map(|n| self.statuses.len() >= n)
            .unwrap_or(false);
        by_saves || by_ticks
    }

    fn report_sample(&mut self, record: &SampleRecord) {
        self.reports.push(record.clone());
    }

    fn announce(&mut self, message: &str) {
        self.announcements.push(message.to_string());
    }

    fn close(&mut self) {
        self.closes += 1;
    }
}
