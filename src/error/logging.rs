use std::any::Any;

use chanlink_error::{ErrorExt, StatusCode};
use thiserror::Error;

/// Ошибка инициализации логирования.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid logging config: {0}")]
    InvalidConfig(String),

    #[error("log directory is not usable: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to install subscriber: {0}")]
    Init(String),
}

impl ErrorExt for LoggingError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidConfig(_) => StatusCode::InvalidConfig,
            Self::Io(_) => StatusCode::Io,
            Self::Init(_) => StatusCode::LoggingInitFailed,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
