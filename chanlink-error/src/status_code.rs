use std::fmt;

use num_enum::TryFromPrimitive;
#[cfg(feature = "serde_repr")]
use serde_repr::{Deserialize_repr, Serialize_repr};
#[cfg(feature = "strum")]
use strum_macros::{AsRefStr, EnumIter};

/// Коды статуса для категоризации ошибок.
///
/// # Диапазоны:
/// - 0xxx: Успех
/// - 1xxx: Общие ошибки
/// - 2xxx: Каналы и подписки
/// - 3xxx: Доставка данных (publish)
/// - 5xxx: Конфигурация и логирование
/// - 9xxx: Периодический нотификатор
///
/// # Реализация:
/// - `num_enum::TryFromPrimitive` даёт реализацию `TryFrom<u32>`.
/// - опционально: `strum` для `AsRefStr`/`EnumIter` (feature = "strum").
/// - опционально: `serde_repr` для сериализации в виде числового значения
///   (feature = "serde_repr").
#[cfg_attr(feature = "strum", derive(AsRefStr, EnumIter))]
#[cfg_attr(feature = "serde_repr", derive(Serialize_repr, Deserialize_repr))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u32)]
#[non_exhaustive]
pub enum StatusCode {
    // === 0xxx: Успех ===
    Success = 0,

    // === 1xxx: Общие ошибки ===
    Unknown = 1000,
    Unexpected = 1002,
    Internal = 1003,

    // === 2xxx: Каналы и подписки ===
    InvalidCast = 2000,
    AlreadyConnected = 2001,

    // === 3xxx: Доставка ===
    SlotFailed = 3000,

    // === 5xxx: Конфигурация / логирование ===
    InvalidConfig = 5000,
    Io = 5001,
    LoggingInitFailed = 5002,

    // === 9xxx: Нотификатор ===
    InvalidInterval = 9000,
    WorkerSpawnFailed = 9001,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl StatusCode {
    /// Числовое представление кода статуса.
    pub const fn code(self) -> u32 {
        self as u32
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для StatusCode
////////////////////////////////////////////////////////////////////////////////

impl From<StatusCode> for u32 {
    fn from(c: StatusCode) -> Self {
        c.code()
    }
}

impl fmt::Display for StatusCode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        #[cfg(feature = "strum")]
        {
            write!(f, "{} ({})", self.as_ref(), self.code())
        }
        #[cfg(not(feature = "strum"))]
        {
            write!(f, "{:?} ({})", self, self.code())
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    /// Тест проверяет конвертацию через `TryFrom<u32>`.
    #[test]
    fn test_try_from_u32() {
        let n = StatusCode::InvalidCast.code();
        assert_eq!(StatusCode::try_from(n).unwrap(), StatusCode::InvalidCast);
        assert!(StatusCode::try_from(99999).is_err());
    }

    /// Тест проверяет получение числового представления и конвертацию
    /// `From<StatusCode> for u32`.
    #[test]
    fn test_code_and_into() {
        let c = StatusCode::AlreadyConnected;
        assert_eq!(c.code(), 2001);
        let n: u32 = c.into();
        assert_eq!(n, 2001);
    }

    /// Тест проверяет формат `Display`: строка должна содержать имя варианта и
    /// числовой код.
    #[test]
    fn test_display_contains_name_and_code() {
        let s = format!("{}", StatusCode::InvalidCast);
        assert!(
            s.contains("2000"),
            "Display must contain code 2000, got: {s}"
        );
        assert!(
            s.contains("InvalidCast"),
            "Display must contain variant name 'InvalidCast', got: {s}"
        );
    }
}
