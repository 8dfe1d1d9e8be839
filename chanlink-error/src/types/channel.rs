use std::any::Any;

use thiserror::Error;

use crate::{ErrorExt, StatusCode};

/// Ошибки установки и восстановления подписок.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    /// Сигнал с кардинальностью "один к одному" уже имеет подключённый слот.
    #[error("signal already has a connected slot (cardinality: {cardinality})")]
    AlreadyConnected { cardinality: &'static str },

    /// Подписка не является экземпляром ожидаемого конкретного типа.
    #[error("subscription is not a `{expected}`")]
    InvalidCast { expected: &'static str },
}

/// Ошибки доставки данных в режиме `try_publish`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublishError {
    /// Один или несколько слотов завершились паникой; остальные слоты были
    /// вызваны.
    #[error("{failed} of {total} slots failed during publish")]
    SlotsFailed {
        failed: usize,
        total: usize,
        messages: Vec<String>,
    },
}

impl PublishError {
    /// Сообщения паник, собранные во время доставки.
    pub fn messages(&self) -> &[String] {
        match self {
            Self::SlotsFailed { messages, .. } => messages,
        }
    }
}

impl ErrorExt for ChannelError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::AlreadyConnected { .. } => StatusCode::AlreadyConnected,
            Self::InvalidCast { .. } => StatusCode::InvalidCast,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        let mut tags = vec![
            ("error_type", "channel".to_string()),
            ("status_code", self.status_code().to_string()),
        ];

        match self {
            Self::AlreadyConnected { cardinality } => {
                tags.push(("cardinality", cardinality.to_string()));
            }
            Self::InvalidCast { expected } => {
                tags.push(("expected", expected.to_string()));
            }
        }

        tags
    }
}

impl ErrorExt for PublishError {
    fn status_code(&self) -> StatusCode {
        StatusCode::SlotFailed
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn client_message(&self) -> String {
        match self {
            Self::SlotsFailed { failed, total, .. } => {
                format!("{failed} of {total} subscribers failed")
            }
        }
    }

    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        let Self::SlotsFailed { failed, total, .. } = self;
        vec![
            ("error_type", "publish".to_string()),
            ("status_code", self.status_code().to_string()),
            ("failed", failed.to_string()),
            ("total", total.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_error_display() {
        let err = ChannelError::AlreadyConnected {
            cardinality: "one-to-one",
        };
        assert_eq!(
            err.to_string(),
            "signal already has a connected slot (cardinality: one-to-one)"
        );
        assert_eq!(err.status_code(), StatusCode::AlreadyConnected);

        let err = ChannelError::InvalidCast { expected: "Foo" };
        assert_eq!(err.to_string(), "subscription is not a `Foo`");
        assert_eq!(err.status_code(), StatusCode::InvalidCast);
    }

    #[test]
    fn test_publish_error_report() {
        let err = PublishError::SlotsFailed {
            failed: 1,
            total: 3,
            messages: vec!["boom".to_string()],
        };
        assert_eq!(err.to_string(), "1 of 3 slots failed during publish");
        assert_eq!(err.client_message(), "1 of 3 subscribers failed");
        assert_eq!(err.messages(), ["boom".to_string()]);
        assert!(err
            .metrics_tags()
            .contains(&("failed", "1".to_string())));
    }
}
