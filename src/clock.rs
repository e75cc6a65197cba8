//! Injectable time source for the sampling scheduler
//!
//! Every time read in the sampling loop goes through [`Clock`], so the
//! scheduler can be driven with [`ManualClock`] in tests without sleeping.

use chrono::{DateTime, Local};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Time source used by the scheduler
pub trait Clock {
    /// Monotonic time since the clock's origin
    fn now(&self) -> Duration;

    /// Wall-clock time, used for sample file names
    fn wall_time(&self) -> DateTime<Local>;

    /// Block for the given duration
    fn sleep(&self, duration: Duration);
}

/// Real clock backed by [`Instant`] and the local time zone
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn wall_time(&self) -> DateTime<Local> {
        Local::now()
    }

    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Manually advanced clock
///
/// Clones share the same counter, so a fake frame source can advance the
/// clock the scheduler reads. `sleep` advances instead of blocking.
#[derive(Debug, Clone)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
    wall_origin: DateTime<Local>,
}

impl ManualClock {
    /// Create a clock reading zero, with wall time pinned to now
    pub fn new() -> Self {
        Self::with_wall_origin(Local::now())
    }

    /// Create a clock whose wall time starts at `wall_origin`
    pub fn with_wall_origin(wall_origin: DateTime<Local>) -> Self {
        Self {
            nanos: Arc::new(AtomicU64::new(0)),
            wall_origin,
        }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        self.nanos.fetch_add(duration_nanos(by), Ordering::SeqCst);
    }

    /// Jump to an absolute reading (must not go backwards)
    pub fn set(&self, to: Duration) {
        let target = duration_nanos(to);
        self.nanos.fetch_max(target, Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }

    fn wall_time(&self) -> DateTime<Local> {
        let elapsed = chrono::Duration::from_std(self.now()).unwrap_or(chrono::Duration::zero());
        self.wall_origin + elapsed
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}

fn duration_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}
