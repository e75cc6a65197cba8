//! # framecollect: time-boxed frame sampling for image datasets
//!
//! Collects a bounded set of images from a frame source over a fixed
//! wall-clock window. Frames are persisted no more often than a configured
//! interval, a live status line is shown while sampling, and the user can
//! stop the run early.
//!
//! ## Architecture
//!
//! - **Scheduler**: [`SamplingScheduler`] owns the warmup/sampling/completion
//!   state machine and decides, per captured frame, whether to keep it
//! - **Clock**: all time reads go through [`Clock`] so the loop can be driven
//!   deterministically in tests
//! - **Sources**: [`FrameSource`] implementations produce frames on demand
//! - **Sinks**: [`PersistenceSink`] implementations encode and write frames
//! - **Display**: [`StatusDisplay`] shows the overlay and carries the
//!   cancellation signal
//!
//! Data flows `FrameSource -> SamplingScheduler -> {PersistenceSink, StatusDisplay}`
//! in a single synchronous loop.
//!
//! ## Output
//!
//! One file per persisted sample, named `{prefix}_{index:06}_{timestamp}.{ext}`
//! inside the output directory. No manifest is written; the directory
//! listing is the dataset.
//!
//! ## Example
//!
//! ```ignore
//! use framecollect::{
//!     clock::SystemClock,
//!     config::CollectConfig,
//!     display::TerminalDisplay,
//!     sink::ImageFileSink,
//!     source,
//!     SamplingScheduler,
//! };
//!
//! let config = CollectConfig::default();
//! config.validate()?;
//! std::fs::create_dir_all(&config.output_dir)?;
//!
//! let mut source = source::from_config(&config)?;
//! let mut sink = ImageFileSink::new(config.format);
//! let mut display = TerminalDisplay::stderr().listen_stdin();
//!
//! let scheduler = SamplingScheduler::new(SystemClock::new(), config.plan());
//! let report = scheduler.run(source.as_mut(), &mut sink, &mut display)?;
//! println!("saved {} images", report.saved);
//! ```

pub mod cli;
pub mod clock;
pub mod config;
pub mod display;
pub mod error;
pub mod scheduler;
pub mod sink;
pub mod source;
pub mod types;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::CollectConfig;
pub use display::StatusDisplay;
pub use error::{CollectError, Result};
pub use scheduler::{CaptureSession, SamplingPlan, SamplingScheduler};
pub use sink::PersistenceSink;
pub use source::FrameSource;
pub use types::{Frame, SampleOutcome, SampleRecord, SessionReport, SessionState, StatusUpdate};
