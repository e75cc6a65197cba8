//! Terminal status display
//!
//! Redraws the overlay on a single line of the terminal and prints one line
//! per attempted save. Typing `q` followed by Enter, or pressing Ctrl-C,
//! stops the session: watcher threads forward the request over a crossbeam
//! channel, which the scheduler polls with `try_recv` once per tick.
//!
//! A second Ctrl-C exits the process immediately, for sources that block
//! in `capture` and never reach the next poll.

use super::StatusDisplay;
use crate::types::{Frame, SampleOutcome, SampleRecord, StatusUpdate};
use crossbeam_channel::{Receiver, Sender, TryRecvError};
use std::io::{BufRead, Stderr, Write};
use std::time::{Duration, Instant};

/// Minimum time between overlay redraws when nothing was saved
const REDRAW_INTERVAL: Duration = Duration::from_millis(100);

/// Exit status after a second Ctrl-C (128 + SIGINT)
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Status display that writes to a terminal (stderr by default)
pub struct TerminalDisplay<W: Write = Stderr> {
    out: W,
    cancel_tx: Sender<()>,
    cancel_rx: Option<Receiver<()>>,
    cancelled: bool,
    last_draw: Option<Instant>,
    last_saved: Option<u64>,
    line_dirty: bool,
}

impl TerminalDisplay<Stderr> {
    /// Display on stderr with no cancellation input
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

impl<W: Write> TerminalDisplay<W> {
    /// Display writing to `out`
    pub fn new(out: W) -> Self {
        let (cancel_tx, cancel_rx) = crossbeam_channel::bounded(1);
        Self {
            out,
            cancel_tx,
            cancel_rx: Some(cancel_rx),
            cancelled: false,
            last_draw: None,
            last_saved: None,
            line_dirty: false,
        }
    }

    /// Take cancellation requests from a channel instead of the built-in one
    pub fn with_cancel_channel(mut self, rx: Receiver<()>) -> Self {
        self.cancel_rx = Some(rx);
        self
    }

    /// Sender that requests cancellation when sent to
    pub fn cancel_handle(&self) -> Sender<()> {
        self.cancel_tx.clone()
    }

    /// Take cancellation requests from stdin (`q` + Enter)
    pub fn listen_stdin(self) -> Self {
        let tx = self.cancel_handle();
        let spawned = std::thread::Builder::new()
            .name("stdin-cancel".to_string())
            .spawn(move || {
                let stdin = std::io::stdin();
                for line in stdin.lock().lines() {
                    match line {
                        Ok(line) if is_quit_command(&line) => {
                            let _ = tx.try_send(());
                            break;
                        }
                        Ok(_) => continue,
                        Err(_) => break,
                    }
                }
            });

        if let Err(e) = spawned {
            tracing::warn!("Could not watch stdin for cancellation: {}", e);
        }
        self
    }

    /// Treat Ctrl-C as a cancellation request
    ///
    /// The first interrupt is forwarded like a `q`; the second exits the
    /// process with status 130.
    pub fn listen_ctrl_c(self) -> Self {
        let tx = self.cancel_handle();
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_io()
            .build()
        {
            Ok(runtime) => runtime,
            Err(e) => {
                tracing::warn!("Could not watch Ctrl-C for cancellation: {}", e);
                return self;
            }
        };

        let spawned = std::thread::Builder::new()
            .name("ctrl-c-cancel".to_string())
            .spawn(move || {
                runtime.block_on(async move {
                    let mut interrupts = 0u32;
                    while tokio::signal::ctrl_c().await.is_ok() {
                        interrupts += 1;
                        if interrupts > 1 {
                            tracing::warn!("Interrupted again, exiting");
                            std::process::exit(INTERRUPTED_EXIT_CODE);
                        }
                        tracing::info!("Interrupt received, stopping after this frame");
                        let _ = tx.try_send(());
                    }
                });
            });

        if let Err(e) = spawned {
            tracing::warn!("Could not watch Ctrl-C for cancellation: {}", e);
        }
        self
    }

    /// Consume the display and return the writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn finish_line(&mut self) {
        if self.line_dirty {
            let _ = writeln!(self.out);
            self.line_dirty = false;
        }
    }

    fn should_redraw(&self, status: &StatusUpdate) -> bool {
        // The closing status is always drawn
        if status.remaining.is_zero() {
            return true;
        }
        match (self.last_draw, self.last_saved) {
            (Some(at), Some(saved)) => saved != status.saved || at.elapsed() >= REDRAW_INTERVAL,
            _ => true,
        }
    }
}

fn is_quit_command(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case("q")
}

impl<W: Write> StatusDisplay for TerminalDisplay<W> {
    fn show(&mut self, frame: &Frame, status: &StatusUpdate) {
        if !self.should_redraw(status) {
            return;
        }
        let _ = write!(
            self.out,
            "\r\x1b[2K{} | {}x{} #{}",
            status,
            frame.width(),
            frame.height(),
            frame.sequence
        );
        let _ = self.out.flush();
        self.line_dirty = true;
        self.last_draw = Some(Instant::now());
        self.last_saved = Some(status.saved);
    }

    fn cancel_requested(&mut self) -> bool {
        if self.cancelled {
            return true;
        }
        if let Some(rx) = &self.cancel_rx {
            match rx.try_recv() {
                Ok(()) => self.cancelled = true,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => {}
            }
        }
        self.cancelled
    }

    fn report_sample(&mut self, record: &SampleRecord) {
        self.finish_line();
        let _ = match &record.outcome {
            SampleOutcome::Saved => writeln!(self.out, "Saved: {}", record.path.display()),
            SampleOutcome::Failed(reason) => writeln!(
                self.out,
                "Failed to save: {} ({})",
                record.path.display(),
                reason
            ),
        };
    }

    fn announce(&mut self, message: &str) {
        self.finish_line();
        let _ = writeln!(self.out, "{}", message);
        let _ = self.out.flush();
    }

    fn close(&mut self) {
        self.finish_line();
        let _ = self.out.flush();
        self.cancel_rx = None;
    }
}
