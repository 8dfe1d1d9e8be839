use std::{path::Path, time::Duration};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::{error::SettingsError, logging::LoggingConfig};

const DEFAULT_INTERVAL_MS: u64 = 1000;

/// Настройки периодического нотификатора.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifierSettings {
    pub interval_ms: u64,
}

impl Default for NotifierSettings {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
        }
    }
}

impl NotifierSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub notifier: NotifierSettings,
    pub logging: LoggingConfig,
}

impl Settings {
    /// Загружает настройки из значений по умолчанию и переменных окружения
    /// с префиксом `CHANLINK_` (вложенные ключи через `__`, например
    /// `CHANLINK_NOTIFIER__INTERVAL_MS`).
    pub fn load() -> Result<Self, SettingsError> {
        Self::build(None)
    }

    /// Как [`load`](Self::load), но сначала читает файл (формат по
    /// расширению); переменные окружения имеют приоритет.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        Self::build(Some(path.as_ref()))
    }

    fn build(path: Option<&Path>) -> Result<Self, SettingsError> {
        let mut builder = Config::builder()
            // Добавляем значения по умолчанию
            .set_default("notifier.interval_ms", DEFAULT_INTERVAL_MS)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let cfg = builder
            // Добавляем переменные окружения с префиксом CHANLINK_
            .add_source(
                Environment::with_prefix("CHANLINK")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        // Десериализуем конфигурацию в нашу структуру
        let settings: Self = cfg.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.notifier.interval_ms == 0 {
            return Err(SettingsError::Invalid {
                key: "notifier.interval_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
