//! Логирование на базе `tracing`.
//!
//! [`init_logging`] устанавливает глобальный подписчик: консольный слой в
//! выбранном формате, опционально файловый слой и `EnvFilter`.

pub mod config;
mod file;
mod filters;
mod formatter;
pub mod handle;

pub use config::{LogFormat, LoggingConfig};
pub use handle::LoggingHandle;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry};

use crate::error::LoggingError;

/// Инициализация логирования с конфигурацией.
///
/// Повторный вызов в том же процессе возвращает [`LoggingError::Init`].
pub fn init_logging(mut config: LoggingConfig) -> Result<LoggingHandle, LoggingError> {
    config.apply_env_overrides();
    config.validate()?;

    let env_filter = filters::build_filter(&config)?;
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    layers.push(formatter::console_layer(&config));

    let file_guard = match &config.log_dir {
        Some(dir) => {
            let (layer, guard) = file::file_layer(dir, &config.file_name)?;
            layers.push(layer);
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_level = %config.level,
        format = %config.format,
        file_enabled = file_guard.is_some(),
        "Logging system initialized"
    );

    Ok(LoggingHandle::new(file_guard))
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    /// Тест проверяет, что первый вызов устанавливает глобальный подписчик с
    /// файловым слоем, а повторный возвращает `LoggingError::Init`.
    #[test]
    #[serial]
    fn test_init_logging_installs_once() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoggingConfig {
            format: LogFormat::Compact,
            with_ansi: false,
            log_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };

        let handle = init_logging(config.clone()).unwrap();
        assert!(handle.has_file_sink());

        let err = init_logging(config).unwrap_err();
        assert!(matches!(err, LoggingError::Init(_)), "got {err:?}");

        handle.shutdown();
    }
}
