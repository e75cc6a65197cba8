//! Command line interface
//!
//! Flags mirror [`CollectConfig`] and override whatever the config file
//! (explicit `--config`, or the default location) provides.

use crate::config::{CollectConfig, OutputFormat, PatternKind, SourceKind};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Collect images from a frame source for a fixed duration
#[derive(Debug, Parser)]
#[command(name = "framecollect", version, about)]
pub struct Args {
    /// TOML config file (defaults to the platform config directory)
    #[arg(long, env = "FRAMECOLLECT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output directory
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Filename prefix
    #[arg(long)]
    pub prefix: Option<String>,

    /// Capture duration in seconds
    #[arg(long)]
    pub duration: Option<f64>,

    /// Seconds between saves (0 or less saves every frame)
    #[arg(long, allow_negative_numbers = true)]
    pub interval: Option<f64>,

    /// Seconds to wait before starting saves
    #[arg(long)]
    pub warmup: Option<f64>,

    /// Capture width
    #[arg(long)]
    pub width: Option<u32>,

    /// Capture height
    #[arg(long)]
    pub height: Option<u32>,

    /// Encoding quality (0-100)
    #[arg(long = "jpeg-quality", alias = "quality")]
    pub quality: Option<u8>,

    /// Output image format
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Frame source
    #[arg(long, value_enum)]
    pub source: Option<SourceArg>,

    /// Test pattern for the pattern source
    #[arg(long, value_enum)]
    pub pattern: Option<PatternArg>,

    /// Source frame rate (0 = as fast as possible)
    #[arg(long)]
    pub fps: Option<f64>,

    /// Directory to replay images from (implies --source directory)
    #[arg(long)]
    pub replay_dir: Option<PathBuf>,

    /// Loop the replay directory instead of stopping when it runs out
    #[arg(long = "loop")]
    pub looping: bool,

    /// Do not watch stdin for 'q' to stop early
    #[arg(long)]
    pub no_stdin: bool,

    /// Print the session report as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Also write logs to this file
    #[arg(long, env = "FRAMECOLLECT_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Write the effective configuration to this file and exit
    #[arg(long)]
    pub write_config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Jpeg,
    Png,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Jpeg => OutputFormat::Jpeg,
            FormatArg::Png => OutputFormat::Png,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceArg {
    Pattern,
    Directory,
}

impl From<SourceArg> for SourceKind {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Pattern => SourceKind::Pattern,
            SourceArg::Directory => SourceKind::Directory,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PatternArg {
    Gradient,
    Bars,
    Checkerboard,
    Noise,
}

impl From<PatternArg> for PatternKind {
    fn from(arg: PatternArg) -> Self {
        match arg {
            PatternArg::Gradient => PatternKind::Gradient,
            PatternArg::Bars => PatternKind::Bars,
            PatternArg::Checkerboard => PatternKind::Checkerboard,
            PatternArg::Noise => PatternKind::Noise,
        }
    }
}

impl Args {
    /// Load the base config and apply flag overrides
    pub fn resolve_config(&self) -> Result<CollectConfig> {
        let base = match &self.config {
            Some(path) => CollectConfig::load(path)?,
            None => CollectConfig::load_default_location()?.unwrap_or_default(),
        };
        Ok(self.apply(base))
    }

    /// Apply flag overrides to `config`
    pub fn apply(&self, mut config: CollectConfig) -> CollectConfig {
        if let Some(out) = &self.out {
            config.output_dir = out.clone();
        }
        if let Some(prefix) = &self.prefix {
            config.prefix = prefix.clone();
        }
        if let Some(duration) = self.duration {
            config.duration_secs = duration;
        }
        if let Some(interval) = self.interval {
            config.interval_secs = interval;
        }
        if let Some(warmup) = self.warmup {
            config.warmup_secs = warmup;
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(quality) = self.quality {
            config.quality = quality;
        }
        if let Some(format) = self.format {
            config.format = format.into();
        }
        if let Some(pattern) = self.pattern {
            config.source.pattern = pattern.into();
        }
        if let Some(fps) = self.fps {
            config.source.fps = fps;
        }
        if let Some(dir) = &self.replay_dir {
            config.source.directory = Some(dir.clone());
            config.source.kind = SourceKind::Directory;
        }
        if let Some(source) = self.source {
            config.source.kind = source.into();
        }
        if self.looping {
            config.source.looping = true;
        }
        config
    }
}
