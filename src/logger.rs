//! Diagnostic logging setup.
//!
//! Wires the `log` macros used throughout the crate to a fern dispatcher
//! writing to stderr and, optionally, a log file. Call once at startup.

use anyhow::Result;
use log::LevelFilter;

use crate::config::LoggingConfig;

fn parse_level(level: &str) -> LevelFilter {
    match level {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

/// Initialize logging from configuration. A disabled config installs
/// nothing, leaving the `log` macros as no-ops.
pub fn init(config: &LoggingConfig) -> Result<()> {
    if !config.enabled {
        return Ok(());
    }

    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(parse_level(&config.level))
        .chain(std::io::stderr());

    if let Some(path) = &config.file {
        dispatch = dispatch.chain(fern::log_file(path)?);
    }

    dispatch.apply()?;
    Ok(())
}
