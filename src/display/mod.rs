//! Live status output and cancellation
//!
//! The [`StatusDisplay`] is shown every frame together with the overlay
//! text, and is also where the user's "stop now" request comes from. The
//! scheduler only ever polls it, so any input mechanism (a key press, a
//! signal, a test flag) can sit behind `cancel_requested`.

pub mod terminal;

pub use terminal::TerminalDisplay;

use crate::error::Result;
use crate::types::{Frame, SampleRecord, StatusUpdate};

/// Status output plus the cancellation signal
#[cfg_attr(test, mockall::automock)]
pub trait StatusDisplay {
    /// Acquire the display; called once before warmup
    fn open(&mut self) -> Result<()> {
        Ok(())
    }

    /// Show the current frame with its status overlay
    fn show(&mut self, frame: &Frame, status: &StatusUpdate);

    /// Non-blocking check for a user stop request
    fn cancel_requested(&mut self) -> bool;

    /// Report the outcome of a persistence attempt
    fn report_sample(&mut self, _record: &SampleRecord) {}

    /// Print a session-level message (warmup notice, end of run)
    fn announce(&mut self, _message: &str) {}

    /// Release the display; called on every exit path, never fails
    fn close(&mut self) {}
}
