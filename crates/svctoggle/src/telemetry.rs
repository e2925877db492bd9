//! Process-wide log output for harnesses driving the controller.
//!
//! The controller only emits `tracing` events. A harness that wants them on
//! stderr calls [`initialise`] once with the same [`ToggleConfig`] it hands to
//! the controller; later calls are no-ops that report the format already in
//! effect.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use svctoggle_config::{LogFormat, ToggleConfig};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, registry};

static INSTALLED_FORMAT: OnceCell<LogFormat> = OnceCell::new();

/// Proof that log output is installed, carrying the format that won.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryHandle {
    format: LogFormat,
}

impl TelemetryHandle {
    /// Format of the installed subscriber.
    #[must_use]
    pub const fn format(self) -> LogFormat {
        self.format
    }
}

/// Failures installing log output.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// `log_filter` is not a valid filter directive.
    #[error("invalid log filter '{filter}': {message}")]
    Filter {
        /// Directive as configured.
        filter: String,
        /// Parser diagnostic.
        message: String,
    },
    /// Some other global subscriber was installed first.
    #[error("failed to install log subscriber: {0}")]
    Install(#[from] TryInitError),
}

/// Installs the stderr subscriber described by `config`.
///
/// Only the first successful call installs anything. Every later call returns
/// a handle for the format chosen then, whatever `config` now says.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] when `log_filter` cannot be parsed and
/// [`TelemetryError::Install`] when another subscriber already owns the
/// process.
pub fn initialise(config: &ToggleConfig) -> Result<TelemetryHandle, TelemetryError> {
    let format = INSTALLED_FORMAT.get_or_try_init(|| {
        let filter = parse_filter(config.log_filter())?;
        install(filter, config.log_format())?;
        Ok::<_, TelemetryError>(config.log_format())
    })?;
    Ok(TelemetryHandle { format: *format })
}

fn parse_filter(directive: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(directive).map_err(|error| TelemetryError::Filter {
        filter: directive.to_owned(),
        message: error.to_string(),
    })
}

fn install(filter: EnvFilter, format: LogFormat) -> Result<(), TryInitError> {
    let layer = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(true)
        .with_timer(UtcTime::rfc_3339());
    match format {
        LogFormat::Json => registry()
            .with(filter)
            .with(layer.json().flatten_event(true))
            .try_init(),
        LogFormat::Compact => registry().with(filter).with(layer.compact()).try_init(),
    }
}
