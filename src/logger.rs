use std::fs::File;
use std::path::Path;

use anyhow::{anyhow, Context};
use time::format_description;
use tracing::{subscriber::set_global_default, Level};
use tracing_subscriber::{fmt::writer::BoxMakeWriter, FmtSubscriber};

const TIME_FORMAT: &str = "[year]-[month]-[day] [hour]:[minute]:[second]";

/// Send every trace event of the arbiter to the file at `path`.
///
/// # Errors
/// If the file cannot be created or a global subscriber is already set.
pub fn init_logger(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("could not create log file '{}'", path.display()))?;
    let writer = BoxMakeWriter::new(file);
    let local_offset = time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC);
    let timer = tracing_subscriber::fmt::time::OffsetTime::new(
        local_offset,
        format_description::parse(TIME_FORMAT).context("invalid time format")?,
    );

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::TRACE)
        .with_ansi(false)
        .with_timer(timer)
        .with_writer(writer)
        .finish();

    set_global_default(subscriber).map_err(|_| {
        anyhow!("Could not set global default tracing subscriber. Consider disabling logs if you are already setting a subscriber.")
    })
}

/// Print warnings (or everything down to `DEBUG` when `verbose`) to stderr.
///
/// Does nothing if a global subscriber is already set.
pub fn init_stderr_logger(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .without_time()
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    let _ = set_global_default(subscriber);
}
