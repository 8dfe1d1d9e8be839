use std::{env, fmt, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::LoggingError;

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Формат вывода событий.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
    Compact,
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            other => Err(LoggingError::InvalidConfig(format!(
                "unknown log format `{other}`"
            ))),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Pretty => "pretty",
            Self::Compact => "compact",
        })
    }
}

/// Настройки логирования.
///
/// Консольный вывод включён всегда; файловый включается, если задан
/// `log_dir`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Минимальный уровень событий (`trace` .. `error`).
    pub level: String,
    pub format: LogFormat,
    pub with_target: bool,
    pub with_thread_ids: bool,
    pub with_ansi: bool,
    /// Каталог для ежедневно ротируемых файлов логов.
    pub log_dir: Option<PathBuf>,
    pub file_name: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            with_target: true,
            with_thread_ids: false,
            with_ansi: true,
            log_dir: None,
            file_name: "chanlink.log".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Переопределения из окружения: `CHANLINK_LOG_LEVEL`,
    /// `CHANLINK_LOG_FORMAT`, `CHANLINK_LOG_DIR`.
    ///
    /// Некорректный формат игнорируется с предупреждением в stderr, так как
    /// подписчик ещё не установлен.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(level) = env::var("CHANLINK_LOG_LEVEL") {
            self.level = level.to_ascii_lowercase();
        }

        if let Ok(format) = env::var("CHANLINK_LOG_FORMAT") {
            match format.parse() {
                Ok(format) => self.format = format,
                Err(e) => eprintln!("Ignoring CHANLINK_LOG_FORMAT: {e}"),
            }
        }

        if let Ok(dir) = env::var("CHANLINK_LOG_DIR") {
            self.log_dir = Some(PathBuf::from(dir));
        }
    }

    pub fn validate(&self) -> Result<(), LoggingError> {
        if !LEVELS.contains(&self.level.as_str()) {
            return Err(LoggingError::InvalidConfig(format!(
                "unknown log level `{}`",
                self.level
            )));
        }
        if self.log_dir.is_some() && self.file_name.trim().is_empty() {
            return Err(LoggingError::InvalidConfig(
                "file_name must not be empty when log_dir is set".to_string(),
            ));
        }
        Ok(())
    }

    /// Директива для `EnvFilter`, если `RUST_LOG` не задана.
    pub fn filter_directive(&self) -> String {
        self.level.clone()
    }
}
