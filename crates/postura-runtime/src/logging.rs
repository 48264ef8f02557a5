//! Tracing bootstrap

use postura_core::{PosturaError, PosturaResult};
use tracing_subscriber::EnvFilter;

use crate::{LogFormat, SessionConfig};

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins over the configured filter. Fails if a subscriber is
/// already installed.
pub fn init_logging(config: &SessionConfig) -> PosturaResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .map_err(|e| PosturaError::Config(format!("invalid log filter: {e}")))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = match config.log_format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    result.map_err(|e| PosturaError::Config(format!("logging already initialized: {e}")))
}
