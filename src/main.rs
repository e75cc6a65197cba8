//! framecollect - Main Entry Point
//!
//! Collects images from a frame source for a fixed duration, keeping at
//! most one frame per interval.

use anyhow::Context;
use clap::Parser;
use framecollect::{
    cli::Args, clock::SystemClock, display::TerminalDisplay, sink::ImageFileSink, source,
    SamplingScheduler,
};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let _log_guard = init_logging(args.log_file.as_deref())?;

    let config = args
        .resolve_config()
        .context("Failed to load configuration")?;

    if let Some(path) = &args.write_config {
        config.save(path)?;
        tracing::info!("Wrote configuration to {}", path.display());
        return Ok(());
    }

    config.validate()?;
    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            config.output_dir.display()
        )
    })?;

    let mut source = source::from_config(&config)?;
    let mut sink = ImageFileSink::new(config.format);
    let mut display = TerminalDisplay::stderr().listen_ctrl_c();
    if !args.no_stdin {
        display = display.listen_stdin();
    }

    let scheduler = SamplingScheduler::new(SystemClock::new(), config.plan());
    let report = match scheduler.run(source.as_mut(), &mut sink, &mut display) {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Capture session aborted: {}", e);
            return Err(e.into());
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}

fn init_logging(log_file: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,framecollect=info"));
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let Some(path) = log_file else {
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .init();
        return Ok(None);
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("Invalid log file path {}", path.display()))?;

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer),
        )
        .init();

    Ok(Some(guard))
}
