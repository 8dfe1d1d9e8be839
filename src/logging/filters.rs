use tracing_subscriber::EnvFilter;

use super::config::LoggingConfig;
use crate::error::LoggingError;

/// Фильтр событий: `RUST_LOG`, если задана, иначе директива из конфигурации.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let directive = config.filter_directive();
    EnvFilter::try_new(&directive).map_err(|e| {
        LoggingError::InvalidConfig(format!("invalid filter directive `{directive}`: {e}"))
    })
}
