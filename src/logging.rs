//! Structured logging setup and elapsed-time events
//!
//! [`set_default_logger`] installs a JSON subscriber on stdout at `INFO`.
//! [`configure_logger`] installs one built from a [`LoggingConfig`], and
//! [`build_dispatch`] builds the same subscriber without installing it so that
//! embedding applications and tests can scope it with
//! `tracing::dispatcher::with_default`.

use std::time::{Duration, Instant};
use tracing::{Dispatch, Level, debug, error, info, trace, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

use crate::config::{LogFormat, LogTarget, LoggingConfig};
use crate::constants::LOG_ELAPSED_PRECISION;
use crate::error::{Error, Result};

pub use crate::constants::{
    LOG_ELAPSED_TIME_KEY, LOG_ERROR_KEY, LOG_EVENT_SOURCE_KEY, LOG_PATH_KEY,
};

/// Install a JSON subscriber on stdout logging `INFO` and above
pub fn set_default_logger() -> Result<()> {
    configure_logger(&LoggingConfig::default())
}

/// Install a global subscriber built from `config`
///
/// Fails if a global subscriber has already been installed.
pub fn configure_logger(config: &LoggingConfig) -> Result<()> {
    let dispatch = match config.target {
        LogTarget::Stdout => build_dispatch(config, std::io::stdout),
        LogTarget::Stderr => build_dispatch(config, std::io::stderr),
    };

    tracing::dispatcher::set_global_default(dispatch)
        .map_err(|e| Error::logging(e.to_string()))?;

    debug!("Logging initialized at level: {}", config.level);
    Ok(())
}

/// Build a subscriber for `config` writing through `make_writer`
pub fn build_dispatch<W>(config: &LoggingConfig, make_writer: W) -> Dispatch
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let builder = tracing_subscriber::fmt()
        .with_env_filter(build_filter(config))
        .with_writer(make_writer)
        .with_ansi(config.target == LogTarget::Stderr)
        .with_target(false)
        .with_level(true);

    match config.format {
        LogFormat::Json => Dispatch::new(builder.json().finish()),
        LogFormat::Pretty => Dispatch::new(builder.pretty().finish()),
        LogFormat::Compact => Dispatch::new(builder.compact().finish()),
    }
}

fn build_filter(config: &LoggingConfig) -> EnvFilter {
    if config.respect_env {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.filter_directive()))
    } else {
        EnvFilter::new(config.filter_directive())
    }
}

/// Log the time elapsed since `start_time` for `event_name`
///
/// The event carries `event_source` and `elapsed_time` (seconds) fields.
pub fn log_elapsed_time(level: Level, event_name: &str, start_time: Instant) {
    let elapsed = format_seconds(start_time.elapsed());

    if level == Level::ERROR {
        error!(event_source = event_name, elapsed_time = %elapsed, "elapsed time");
    } else if level == Level::WARN {
        warn!(event_source = event_name, elapsed_time = %elapsed, "elapsed time");
    } else if level == Level::INFO {
        info!(event_source = event_name, elapsed_time = %elapsed, "elapsed time");
    } else if level == Level::DEBUG {
        debug!(event_source = event_name, elapsed_time = %elapsed, "elapsed time");
    } else {
        trace!(event_source = event_name, elapsed_time = %elapsed, "elapsed time");
    }
}

fn format_seconds(elapsed: Duration) -> String {
    format!("{:.*}", LOG_ELAPSED_PRECISION, elapsed.as_secs_f64())
}

/// Logs the elapsed time of a scope when dropped
///
/// ```
/// use utilkit::logging::ElapsedTimer;
///
/// fn add(x: i32, y: i32) -> i32 {
///     let _timer = ElapsedTimer::start(tracing::Level::INFO, "add");
///     x + y
/// }
/// assert_eq!(add(1, 2), 3);
/// ```
#[derive(Debug)]
pub struct ElapsedTimer {
    level: Level,
    event_name: String,
    start_time: Instant,
}

impl ElapsedTimer {
    pub fn start(level: Level, event_name: impl Into<String>) -> Self {
        Self {
            level,
            event_name: event_name.into(),
            start_time: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

impl Drop for ElapsedTimer {
    fn drop(&mut self) {
        log_elapsed_time(self.level, &self.event_name, self.start_time);
    }
}
