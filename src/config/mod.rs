//! Configuration module for framecollect
//!
//! This module holds the configuration surface consumed by the sampling
//! scheduler and the frame source/sink it is wired to:
//! - Output location and file naming (directory, prefix, format, quality)
//! - Timing (duration, interval, warmup)
//! - Capture resolution and which frame source to use
//!
//! # Config File Location
//!
//! When no explicit file is given, the binary looks for `config.toml` in the
//! platform-appropriate config directory under `dev.framecollect`:
//!
//! - **Linux**: `~/.config/dev.framecollect/`
//! - **macOS**: `~/Library/Application Support/dev.framecollect/`
//! - **Windows**: `%APPDATA%\dev.framecollect\`
//!
//! # Example
//!
//! ```ignore
//! use framecollect::config::CollectConfig;
//!
//! let mut config = CollectConfig::load("collect.toml")?;
//! config.duration_secs = 60.0;
//! config.validate()?;
//! let plan = config.plan();
//! ```

use crate::error::{CollectError, Result};
use crate::scheduler::SamplingPlan;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application identifier for config directories
pub const APP_ID: &str = "dev.framecollect";

/// Default config filename
pub const CONFIG_FILE: &str = "config.toml";

/// Default output directory
pub const DEFAULT_OUTPUT_DIR: &str = "captured_images";

/// Default filename prefix
pub const DEFAULT_PREFIX: &str = "img";

/// Default capture duration in seconds
pub const DEFAULT_DURATION_SECS: f64 = 20.0;

/// Default spacing between saves in seconds
pub const DEFAULT_INTERVAL_SECS: f64 = 0.5;

/// Default source settling time in seconds
pub const DEFAULT_WARMUP_SECS: f64 = 1.5;

/// Default encoding quality
pub const DEFAULT_QUALITY: u8 = 95;

// ==================== Config Directory ====================

/// Get the application config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs_next::config_dir().map(|p| p.join(APP_ID))
}

/// Get the path to the default config file
pub fn default_config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join(CONFIG_FILE))
}

// ==================== Output Format ====================

/// Image format used for persisted samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossy JPEG, honours the quality setting
    #[default]
    Jpeg,
    /// Lossless PNG, quality is ignored
    Png,
}

impl OutputFormat {
    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Jpeg => write!(f, "JPEG"),
            OutputFormat::Png => write!(f, "PNG"),
        }
    }
}

// ==================== Source Config ====================

/// Which frame source to capture from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Synthetic test pattern
    #[default]
    Pattern,
    /// Replay image files from a directory
    Directory,
}

/// Synthetic pattern drawn by the pattern source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    /// Diagonal gradient that scrolls every frame
    #[default]
    Gradient,
    /// Vertical SMPTE-style color bars
    Bars,
    /// Checkerboard that inverts every frame
    Checkerboard,
    /// Pseudo-random noise
    Noise,
}

/// Frame source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Source implementation to use
    #[serde(default)]
    pub kind: SourceKind,

    /// Pattern for the synthetic source
    #[serde(default)]
    pub pattern: PatternKind,

    /// Target frame rate; 0 delivers frames as fast as they can be made
    #[serde(default = "default_fps")]
    pub fps: f64,

    /// Directory to replay from (directory source only)
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Start over when the directory runs out of images
    #[serde(default)]
    pub looping: bool,
}

fn default_fps() -> f64 {
    30.0
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::Pattern,
            pattern: PatternKind::Gradient,
            fps: default_fps(),
            directory: None,
            looping: false,
        }
    }
}

// ==================== Collect Config ====================

/// Complete configuration for one capture session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectConfig {
    /// Directory samples are written into
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Filename prefix
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Length of the sampling window in seconds
    #[serde(default = "default_duration_secs")]
    pub duration_secs: f64,

    /// Minimum spacing between saves in seconds; `<= 0` saves every frame
    #[serde(default = "default_interval_secs")]
    pub interval_secs: f64,

    /// Settling time before sampling starts, in seconds
    #[serde(default = "default_warmup_secs")]
    pub warmup_secs: f64,

    /// Capture width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Capture height in pixels
    #[serde(default = "default_height")]
    pub height: u32,

    /// Encoding quality (0-100)
    #[serde(default = "default_quality")]
    pub quality: u8,

    /// Output image format
    #[serde(default)]
    pub format: OutputFormat,

    /// Frame source settings
    #[serde(default)]
    pub source: SourceConfig,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

fn default_duration_secs() -> f64 {
    DEFAULT_DURATION_SECS
}

fn default_interval_secs() -> f64 {
    DEFAULT_INTERVAL_SECS
}

fn default_warmup_secs() -> f64 {
    DEFAULT_WARMUP_SECS
}

fn default_width() -> u32 {
    1280
}

fn default_height() -> u32 {
    720
}

fn default_quality() -> u8 {
    DEFAULT_QUALITY
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            prefix: default_prefix(),
            duration_secs: DEFAULT_DURATION_SECS,
            interval_secs: DEFAULT_INTERVAL_SECS,
            warmup_secs: DEFAULT_WARMUP_SECS,
            width: default_width(),
            height: default_height(),
            quality: DEFAULT_QUALITY,
            format: OutputFormat::default(),
            source: SourceConfig::default(),
        }
    }
}

impl CollectConfig {
    /// Load a config file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CollectError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        toml::from_str(&content).map_err(|e| {
            CollectError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })
    }

    /// Load the config from the default location, if one exists there
    pub fn load_default_location() -> Result<Option<Self>> {
        match default_config_path() {
            Some(path) if path.exists() => Self::load(&path).map(Some),
            _ => Ok(None),
        }
    }

    /// Save the config to disk as TOML
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                CollectError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| CollectError::Serialization(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content).map_err(|e| {
            CollectError::Config(format!("Failed to write config file {:?}: {}", path, e))
        })
    }

    /// Check every value before a session is started
    pub fn validate(&self) -> Result<()> {
        if !self.duration_secs.is_finite() || self.duration_secs < 0.0 {
            return Err(CollectError::Config(format!(
                "duration must be a non-negative number of seconds, got {}",
                self.duration_secs
            )));
        }
        if !self.warmup_secs.is_finite() || self.warmup_secs < 0.0 {
            return Err(CollectError::Config(format!(
                "warmup must be a non-negative number of seconds, got {}",
                self.warmup_secs
            )));
        }
        if !self.interval_secs.is_finite() {
            return Err(CollectError::Config(format!(
                "interval must be a finite number of seconds, got {}",
                self.interval_secs
            )));
        }
        if self.width == 0 || self.height == 0 {
            return Err(CollectError::Config(format!(
                "capture size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.quality > 100 {
            return Err(CollectError::Config(format!(
                "quality must be between 0 and 100, got {}",
                self.quality
            )));
        }
        if self.prefix.is_empty() {
            return Err(CollectError::Config("prefix must not be empty".to_string()));
        }
        if self.prefix.contains(['/', '\\']) {
            return Err(CollectError::Config(format!(
                "prefix must not contain path separators: {:?}",
                self.prefix
            )));
        }
        if !self.source.fps.is_finite() || self.source.fps < 0.0 {
            return Err(CollectError::Config(format!(
                "source fps must be a non-negative number, got {}",
                self.source.fps
            )));
        }
        if self.source.kind == SourceKind::Directory && self.source.directory.is_none() {
            return Err(CollectError::Config(
                "directory source requires a replay directory".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the scheduler's plan from this config
    ///
    /// Call [`validate`](Self::validate) first. A non-positive interval maps
    /// to a zero interval, which saves every frame.
    pub fn plan(&self) -> SamplingPlan {
        SamplingPlan {
            duration: secs_to_duration(self.duration_secs),
            interval: secs_to_duration(self.interval_secs),
            warmup: secs_to_duration(self.warmup_secs),
            output_dir: self.output_dir.clone(),
            prefix: self.prefix.clone(),
            extension: self.format.extension().to_string(),
            quality: self.quality,
        }
    }
}

fn secs_to_duration(secs: f64) -> Duration {
    if secs.is_finite() && secs > 0.0 {
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    } else {
        Duration::ZERO
    }
}
