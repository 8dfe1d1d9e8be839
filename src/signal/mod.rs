//! Примитивы уведомления (сигналы).
//!
//! Выходной канал не вызывает слоты сам, он делегирует это сигналу,
//! реализующему трейт [`Signal`]. Это позволяет подменять политику доставки:
//!
//! - `one_to_many`: [`OneToManySignal`]: любое число слотов, порядок
//!   регистрации (сигнал по умолчанию);
//! - `one_to_one`: [`OneToOneSignal`]: не более одного слота;
//! - `slot`: [`Slot`] и синхронизированные слоты.

use std::{any::Any, fmt};

use chanlink_error::ChannelError;

pub mod one_to_many;
pub mod one_to_one;
pub mod slot;

pub use one_to_many::OneToManySignal;
pub use one_to_one::OneToOneSignal;
pub use slot::{Slot, SlotLock};

/// Сигнал, используемый выходными каналами по умолчанию.
pub type DefaultSignal<T> = OneToManySignal<T>;

/// Максимальное число одновременно подключённых слотов.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalCardinality {
    OneToOne,
    OneToMany,
}

impl SignalCardinality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneToOne => "one-to-one",
            Self::OneToMany => "one-to-many",
        }
    }
}

impl fmt::Display for SignalCardinality {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Токен соединения для встроенных сигналов.
///
/// Не реализует `Clone`: закрыть соединение можно ровно один раз, передав
/// токен по значению в [`Signal::disconnect`].
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct SlotConnection {
    id: u64,
}

impl SlotConnection {
    pub(crate) fn new(id: u64) -> Self {
        Self { id }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Контракт примитива уведомления.
///
/// Реализация отвечает за хранение слотов, порядок доставки и собственную
/// синхронизацию. Ни один из методов не должен удерживать внутренние
/// блокировки во время вызова слота: слот вправе подписываться или
/// отписываться от того же канала.
pub trait Signal<T>: Default + Send + Sync + 'static {
    /// Специфичный для реализации токен одного соединения сигнал → слот.
    type Connection: Send + Sync + 'static;

    const CARDINALITY: SignalCardinality;

    /// Подключает слот и возвращает токен соединения.
    fn connect(
        &self,
        slot: Slot<T>,
    ) -> Result<Self::Connection, ChannelError>;

    /// Закрывает соединение. Эмиссии, начатые после возврата, слот
    /// пропускают; эмиссия в другом потоке, уже прошедшая проверку этого
    /// слота, может успеть его вызвать.
    fn disconnect(
        &self,
        connection: Self::Connection,
    );

    /// Передаёт `data` каждому подключённому слоту через `deliver`.
    ///
    /// `deliver` решает, как именно вызвать слот (например, перехватывая
    /// панику), а сигнал решает, кого и в каком порядке.
    fn emit(
        &self,
        data: T,
        deliver: &mut dyn FnMut(&Slot<T>, T),
    );

    /// Количество подключённых слотов.
    fn num_slots(&self) -> usize;

    /// Синхронно вызывает все слоты. Паника слота прерывает доставку и
    /// уходит вызывающему.
    fn publish(
        &self,
        data: T,
    ) where
        T: 'static,
    {
        self.emit(data, &mut |slot, data| slot.call(data))
    }
}

/// Текст паники для логов и отчётов об ошибках.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::panic;

    use super::*;

    #[test]
    fn test_cardinality_display() {
        assert_eq!(SignalCardinality::OneToOne.to_string(), "one-to-one");
        assert_eq!(SignalCardinality::OneToMany.as_str(), "one-to-many");
    }

    #[test]
    fn test_panic_message_extracts_text() {
        let payload = panic::catch_unwind(|| panic!("static text")).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "static text");

        let payload = panic::catch_unwind(|| panic!("formatted {}", 7)).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "formatted 7");

        let payload = panic::catch_unwind(|| std::panic::panic_any(42u8)).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "non-string panic payload");
    }
}
