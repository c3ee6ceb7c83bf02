use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub enum TelemetryError {
    LogFilter { value: String, source: ParseError },
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::LogFilter { value, .. } => {
                write!(f, "invalid log level/filter '{value}'")
            }
            TelemetryError::Subscriber(err) => write!(f, "telemetry error: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::LogFilter { source, .. } => Some(source),
            TelemetryError::Subscriber(err) => Some(&**err),
        }
    }
}

/// HTTP-stack crates whose debug chatter drowns out scoring events when
/// the service level is lowered; they stay at warn unless `RUST_LOG`
/// overrides the whole filter.
const QUIET_DEPENDENCIES: &[&str] = &["hyper=warn", "tower=warn", "mio=warn"];

fn build_filter(log_level: &str) -> Result<EnvFilter, TelemetryError> {
    let mut directives = vec![log_level.to_string()];
    directives.extend(QUIET_DEPENDENCIES.iter().map(|d| (*d).to_string()));

    EnvFilter::try_new(directives.join(",")).map_err(|source| TelemetryError::LogFilter {
        value: log_level.to_string(),
        source,
    })
}

/// Installs the global tracing subscriber. `RUST_LOG` wins over the
/// configured level when both are present; otherwise the configured level
/// applies to this service with noisy dependencies held back.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => build_filter(&config.log_level)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}
