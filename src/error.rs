//! Error handling for framecollect
//!
//! This module defines the error type shared by the scheduler and its
//! collaborators, and a Result alias for use throughout the crate.
//!
//! Only source failures are fatal to a session. Write failures are turned
//! into failed [`SampleRecord`](crate::types::SampleRecord)s by the
//! scheduler and never reach the caller as an `Err`.

use thiserror::Error;

/// Main error type for framecollect operations
#[derive(Error, Debug)]
pub enum CollectError {
    /// The frame source could not produce a frame
    #[error("Frame source error: {0}")]
    Source(String),

    /// The frame source has no more frames to give
    #[error("Frame source exhausted: {0}")]
    SourceExhausted(String),

    /// Errors from image decoding/encoding
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Errors related to configuration loading/saving/validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors related to the status display
    #[error("Display error: {0}")]
    Display(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CollectError>,
    },
}

impl CollectError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CollectError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Whether this error ends a capture session
    ///
    /// Source failures (including exhaustion) are fatal. Everything else is
    /// either a setup problem reported before the session starts or a
    /// per-sample failure.
    pub fn is_source_failure(&self) -> bool {
        match self {
            CollectError::Source(_) | CollectError::SourceExhausted(_) => true,
            CollectError::WithContext { source, .. } => source.is_source_failure(),
            _ => false,
        }
    }
}

/// Result type alias for framecollect operations
pub type Result<T> = std::result::Result<T, CollectError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| CollectError::Io(e).with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| CollectError::Io(e).with_context(f()))
    }
}
