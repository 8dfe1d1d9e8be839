use std::sync::atomic::{AtomicU64, Ordering};

use chanlink_error::ChannelError;
use parking_lot::Mutex;
use tracing::warn;

use super::{Signal, SignalCardinality, Slot, SlotConnection};

/// Сигнал "один к одному": не более одного подключённого слота.
///
/// Повторное подключение отклоняется с [`ChannelError::AlreadyConnected`],
/// пока текущее соединение не закрыто. Данные передаются слоту без
/// клонирования.
pub struct OneToOneSignal<T> {
    slot: Mutex<Option<(u64, Slot<T>)>>,
    next_id: AtomicU64,
}

impl<T> Default for OneToOneSignal<T> {
    fn default() -> Self {
        Self {
            slot: Mutex::new(None),
            next_id: AtomicU64::new(1),
        }
    }
}

impl<T> OneToOneSignal<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        self.slot.lock().is_some()
    }
}

impl<T> Signal<T> for OneToOneSignal<T>
where
    T: Send + 'static,
{
    type Connection = SlotConnection;

    const CARDINALITY: SignalCardinality = SignalCardinality::OneToOne;

    fn connect(
        &self,
        slot: Slot<T>,
    ) -> Result<SlotConnection, ChannelError> {
        let mut current = self.slot.lock();
        if current.is_some() {
            return Err(ChannelError::AlreadyConnected {
                cardinality: Self::CARDINALITY.as_str(),
            });
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        *current = Some((id, slot));
        Ok(SlotConnection::new(id))
    }

    fn disconnect(
        &self,
        connection: SlotConnection,
    ) {
        let removed = {
            let mut current = self.slot.lock();
            match current.as_ref() {
                Some((id, _)) if *id == connection.id() => current.take(),
                _ => None,
            }
        };

        if removed.is_none() {
            warn!(connection = connection.id(), "Disconnect of unknown slot");
        }
    }

    fn emit(
        &self,
        data: T,
        deliver: &mut dyn FnMut(&Slot<T>, T),
    ) {
        let slot = self.slot.lock().as_ref().map(|(_, slot)| slot.clone());
        if let Some(slot) = slot {
            deliver(&slot, data);
        }
    }

    fn num_slots(&self) -> usize {
        usize::from(self.is_connected())
    }
}
