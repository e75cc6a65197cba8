//! Time-boxed, rate-limited frame sampling
//!
//! [`SamplingScheduler`] runs one capture session:
//!
//! ```text
//! Warmup ──(warmup elapsed)──> Sampling ──(now > end)──> Completed
//!                                  └──(cancel requested)──> Cancelled
//! ```
//!
//! During `Sampling` every captured frame is one tick. A frame is persisted
//! when `now >= next_save_at && now <= ends_at`, after which the next save
//! is scheduled `interval` after *this* decision (trailing scheduling), so
//! saves are never closer than `interval` no matter how fast the source is.
//! A failed write still moves the schedule forward.
//!
//! Status is shown for every tick before cancellation and completion are
//! checked, so the tick that crosses `ends_at` is still displayed.
//!
//! The source and display are released on every exit path, including a
//! fatal capture error, by the guards in this module.

use crate::clock::Clock;
use crate::display::StatusDisplay;
use crate::error::{Result, ResultExt};
use crate::sink::{sample_file_name, PersistenceSink};
use crate::source::FrameSource;
use crate::types::{Frame, SampleOutcome, SampleRecord, SessionReport, SessionState, StatusUpdate};
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::time::Duration;

/// Validated timing and output settings for a session
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingPlan {
    /// Length of the sampling window
    pub duration: Duration,
    /// Minimum spacing between saves; zero saves every frame
    pub interval: Duration,
    /// Settling time before the window opens
    pub warmup: Duration,
    /// Directory samples are written into
    pub output_dir: PathBuf,
    /// File name prefix
    pub prefix: String,
    /// File extension without the dot
    pub extension: String,
    /// Encoding quality (0-100)
    pub quality: u8,
}

impl SamplingPlan {
    /// Upper bound on persisted samples: `ceil(duration / interval) + 1`
    ///
    /// `None` when the interval is zero, where the bound is the tick count.
    pub fn max_samples(&self) -> Option<u64> {
        if self.interval.is_zero() {
            return None;
        }
        let d = self.duration.as_nanos();
        let i = self.interval.as_nanos();
        let slots = d.div_ceil(i);
        Some(u64::try_from(slots).unwrap_or(u64::MAX).saturating_add(1))
    }
}

/// Mutable progress of one capture session
#[derive(Debug, Clone)]
pub struct CaptureSession {
    warmup_deadline: Duration,
    started_at: Duration,
    ends_at: Duration,
    interval: Duration,
    next_save_at: Duration,
    saved: u64,
    attempted: u64,
    failed: u64,
    ticks: u64,
    prefix: String,
    duration: Duration,
    state: SessionState,
}

impl CaptureSession {
    /// Session in `Warmup`, waiting for the source to settle
    ///
    /// `source_started_at` is when the source came up; the warmup deadline
    /// is measured from there.
    pub fn warming_up(source_started_at: Duration, plan: &SamplingPlan) -> Self {
        let warmup_deadline = source_started_at.saturating_add(plan.warmup);
        Self {
            warmup_deadline,
            started_at: warmup_deadline,
            ends_at: warmup_deadline.saturating_add(plan.duration),
            interval: plan.interval,
            next_save_at: warmup_deadline,
            saved: 0,
            attempted: 0,
            failed: 0,
            ticks: 0,
            prefix: plan.prefix.clone(),
            duration: plan.duration,
            state: SessionState::Warmup,
        }
    }

    /// Open the sampling window at `now` and enter `Sampling`
    ///
    /// The first tick at or after `now` may save. Only a session still in
    /// `Warmup` is affected.
    pub fn open_window(&mut self, now: Duration) {
        if self.state != SessionState::Warmup {
            return;
        }
        self.started_at = now;
        self.ends_at = now.saturating_add(self.duration);
        self.next_save_at = now;
        self.state = SessionState::Sampling;
    }

    /// Warmup and window opening in one step
    pub fn begin(source_started_at: Duration, now: Duration, plan: &SamplingPlan) -> Self {
        let mut session = Self::warming_up(source_started_at, plan);
        session.open_window(now);
        session
    }

    /// Whether a frame taken at `now` should be persisted
    pub fn is_due(&self, now: Duration) -> bool {
        self.state == SessionState::Sampling && now >= self.next_save_at && now <= self.ends_at
    }

    /// Schedule the next save `interval` after this decision
    pub fn schedule_next(&mut self, now: Duration) {
        let next = now.saturating_add(self.interval);
        if next > self.next_save_at {
            self.next_save_at = next;
        }
    }

    /// Count a persistence attempt
    pub fn record_attempt(&mut self, outcome: &SampleOutcome) {
        self.attempted += 1;
        match outcome {
            SampleOutcome::Saved => self.saved += 1,
            SampleOutcome::Failed(_) => self.failed += 1,
        }
    }

    /// Count a tick
    pub fn tick(&mut self) {
        self.ticks += 1;
    }

    /// Mark the session as stopped by the user
    ///
    /// Cancellation is only honoured while sampling.
    pub fn cancel(&mut self) {
        if self.state == SessionState::Sampling {
            self.state = SessionState::Cancelled;
        }
    }

    /// Mark the window as elapsed
    pub fn complete(&mut self) {
        if self.state == SessionState::Sampling {
            self.state = SessionState::Completed;
        }
    }

    /// Current state of the session
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Time left in the window, never negative
    pub fn remaining(&self, now: Duration) -> Duration {
        self.ends_at.saturating_sub(now)
    }

    /// Whether the window has closed
    pub fn is_expired(&self, now: Duration) -> bool {
        now > self.ends_at
    }

    /// Status for the overlay at `now`
    pub fn status(&self, now: Duration) -> StatusUpdate {
        StatusUpdate {
            saved: self.saved,
            remaining: self.remaining(now),
            interval: self.interval,
        }
    }

    /// Index for the next sample file
    pub fn next_index(&self) -> u64 {
        self.attempted
    }

    pub fn warmup_deadline(&self) -> Duration {
        self.warmup_deadline
    }

    pub fn started_at(&self) -> Duration {
        self.started_at
    }

    pub fn ends_at(&self) -> Duration {
        self.ends_at
    }

    pub fn next_save_at(&self) -> Duration {
        self.next_save_at
    }

    pub fn saved(&self) -> u64 {
        self.saved
    }

    pub fn attempted(&self) -> u64 {
        self.attempted
    }

    pub fn failed(&self) -> u64 {
        self.failed
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn is_cancelled(&self) -> bool {
        self.state == SessionState::Cancelled
    }
}

/// Stops the source when dropped
struct SourceGuard<'a, S: FrameSource + ?Sized>(&'a mut S);

impl<S: FrameSource + ?Sized> Deref for SourceGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.0
    }
}

impl<S: FrameSource + ?Sized> DerefMut for SourceGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.0
    }
}

impl<S: FrameSource + ?Sized> Drop for SourceGuard<'_, S> {
    fn drop(&mut self) {
        tracing::debug!("Stopping frame source");
        self.0.stop();
    }
}

/// Closes the display when dropped
struct DisplayGuard<'a, D: StatusDisplay + ?Sized>(&'a mut D);

impl<D: StatusDisplay + ?Sized> Deref for DisplayGuard<'_, D> {
    type Target = D;

    fn deref(&self) -> &D {
        self.0
    }
}

impl<D: StatusDisplay + ?Sized> DerefMut for DisplayGuard<'_, D> {
    fn deref_mut(&mut self) -> &mut D {
        self.0
    }
}

impl<D: StatusDisplay + ?Sized> Drop for DisplayGuard<'_, D> {
    fn drop(&mut self) {
        tracing::debug!("Closing status display");
        self.0.close();
    }
}

/// Drives one capture session
#[derive(Debug, Clone)]
pub struct SamplingScheduler<C: Clock> {
    clock: C,
    plan: SamplingPlan,
}

impl<C: Clock> SamplingScheduler<C> {
    pub fn new(clock: C, plan: SamplingPlan) -> Self {
        Self { clock, plan }
    }

    pub fn plan(&self) -> &SamplingPlan {
        &self.plan
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Run a full session: warmup, sampling window, end message
    ///
    /// Returns the report for a completed or cancelled session. A capture
    /// error ends the session with `Err`; files already written stay on
    /// disk. The source is stopped and the display closed in every case.
    pub fn run<S, P, D>(&self, source: &mut S, sink: &mut P, display: &mut D) -> Result<SessionReport>
    where
        S: FrameSource + ?Sized,
        P: PersistenceSink + ?Sized,
        D: StatusDisplay + ?Sized,
    {
        source.start().context("Failed to start frame source")?;
        let mut source = SourceGuard(source);
        display.open().context("Failed to open status display")?;
        let mut display = DisplayGuard(display);

        let mut session = CaptureSession::warming_up(self.clock.now(), &self.plan);
        tracing::info!(
            "Capturing from {} for {:.1}s, one sample every {:?}s",
            source.describe(),
            self.plan.duration.as_secs_f64(),
            self.plan.interval.as_secs_f64()
        );

        display.announce(&format!(
            "Warmup for {:.1}s...",
            self.plan.warmup.as_secs_f64()
        ));
        self.clock.sleep(self.plan.warmup);

        session.open_window(self.clock.now());
        let mut records = Vec::new();
        tracing::debug!(
            "{}: window {:?} -> {:?}",
            session.state(),
            session.started_at(),
            session.ends_at()
        );

        loop {
            let frame = source.capture().context("Frame capture failed")?;
            let now = self.clock.now();
            session.tick();

            if session.is_due(now) {
                let record = self.persist(&mut session, &mut *sink, &frame, now);
                display.report_sample(&record);
                records.push(record);
            }

            display.show(&frame, &session.status(now));

            if display.cancel_requested() {
                session.cancel();
                break;
            }

            if session.is_expired(now) {
                session.complete();
                break;
            }
        }

        let report = SessionReport {
            outcome: session.state(),
            saved: session.saved(),
            attempted: session.attempted(),
            failed: session.failed(),
            ticks: session.ticks(),
            elapsed: self.clock.now().saturating_sub(session.started_at()),
            records,
        };

        let message = report.end_message(self.plan.duration);
        tracing::info!(
            saved = report.saved,
            failed = report.failed,
            ticks = report.ticks,
            "{}",
            message
        );
        display.announce(&message);

        Ok(report)
    }

    fn persist<P: PersistenceSink + ?Sized>(
        &self,
        session: &mut CaptureSession,
        sink: &mut P,
        frame: &Frame,
        now: Duration,
    ) -> SampleRecord {
        let index = session.next_index();
        let file_name = sample_file_name(
            session.prefix(),
            index,
            self.clock.wall_time(),
            &self.plan.extension,
        );
        let path = self.plan.output_dir.join(&file_name);

        let outcome = match sink.write(frame, &path, self.plan.quality) {
            Ok(()) => {
                tracing::debug!("Saved: {}", path.display());
                SampleOutcome::Saved
            }
            Err(e) => {
                tracing::warn!("Failed to save: {}: {}", path.display(), e);
                SampleOutcome::Failed(e.to_string())
            }
        };

        session.record_attempt(&outcome);
        session.schedule_next(now);

        SampleRecord {
            index,
            file_name,
            path,
            scheduled_at: now,
            outcome,
        }
    }
}
