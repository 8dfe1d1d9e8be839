use std::any::Any;

use thiserror::Error;

use crate::{ErrorExt, StatusCode};

/// Ошибки запуска периодического нотификатора.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifierError {
    /// Нулевой интервал превратил бы воркер в busy-loop.
    #[error("trigger interval must be greater than zero")]
    InvalidInterval,

    /// ОС отказала в создании фонового потока.
    #[error("failed to spawn notifier worker: {reason}")]
    SpawnFailed { reason: String },
}

impl From<std::io::Error> for NotifierError {
    fn from(err: std::io::Error) -> Self {
        NotifierError::SpawnFailed {
            reason: err.to_string(),
        }
    }
}

impl ErrorExt for NotifierError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInterval => StatusCode::InvalidInterval,
            Self::SpawnFailed { .. } => StatusCode::WorkerSpawnFailed,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
