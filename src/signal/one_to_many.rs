use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc,
};

use chanlink_error::ChannelError;
use parking_lot::Mutex;
use tracing::warn;

use super::{Signal, SignalCardinality, Slot, SlotConnection};

struct SlotEntry<T> {
    id: u64,
    slot: Slot<T>,
    /// Сбрасывается при `disconnect`; эмиссия, уже сделавшая снимок,
    /// пропускает слот, если ещё не дошла до него.
    live: Arc<AtomicBool>,
}

/// Сигнал "один ко многим": слоты вызываются синхронно в порядке
/// подключения.
///
/// `emit` копирует список слотов под блокировкой и вызывает их уже без неё,
/// поэтому слот может подписываться и отписываться от того же сигнала.
/// Слот, подключённый во время эмиссии, в ней не участвует.
pub struct OneToManySignal<T> {
    slots: Mutex<Vec<SlotEntry<T>>>,
    next_id: AtomicU64,
}

impl<T> Default for OneToManySignal<T> {
    fn default() -> Self {
        Self {
            slots: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl<T> OneToManySignal<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn snapshot(&self) -> Vec<(Slot<T>, Arc<AtomicBool>)> {
        self.slots
            .lock()
            .iter()
            .map(|entry| (entry.slot.clone(), Arc::clone(&entry.live)))
            .collect()
    }
}

impl<T> Signal<T> for OneToManySignal<T>
where
    T: Clone + Send + 'static,
{
    type Connection = SlotConnection;

    const CARDINALITY: SignalCardinality = SignalCardinality::OneToMany;

    fn connect(
        &self,
        slot: Slot<T>,
    ) -> Result<SlotConnection, ChannelError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.slots.lock().push(SlotEntry {
            id,
            slot,
            live: Arc::new(AtomicBool::new(true)),
        });
        Ok(SlotConnection::new(id))
    }

    fn disconnect(
        &self,
        connection: SlotConnection,
    ) {
        let removed = {
            let mut slots = self.slots.lock();
            slots
                .iter()
                .position(|entry| entry.id == connection.id())
                .map(|idx| slots.remove(idx))
        };

        match removed {
            Some(entry) => entry.live.store(false, Ordering::Release),
            None => warn!(connection = connection.id(), "Disconnect of unknown slot"),
        }
    }

    fn emit(
        &self,
        data: T,
        deliver: &mut dyn FnMut(&Slot<T>, T),
    ) {
        let snapshot = self.snapshot();
        let Some(((last, last_live), rest)) = snapshot.split_last() else {
            return;
        };

        for (slot, live) in rest {
            if live.load(Ordering::Acquire) {
                deliver(slot, data.clone());
            }
        }
        if last_live.load(Ordering::Acquire) {
            deliver(last, data);
        }
    }

    fn num_slots(&self) -> usize {
        self.slots.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    fn recording_slot(
        log: &Arc<Mutex<Vec<(&'static str, i32)>>>,
        name: &'static str,
    ) -> Slot<i32> {
        let log = log.clone();
        Slot::new(move |v| log.lock().push((name, v)))
    }

    #[test]
    fn test_emit_in_connection_order() {
        let signal = OneToManySignal::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        signal.connect(recording_slot(&log, "a")).unwrap();
        signal.connect(recording_slot(&log, "b")).unwrap();
        signal.connect(recording_slot(&log, "c")).unwrap();
        signal.publish(5);

        assert_eq!(*log.lock(), vec![("a", 5), ("b", 5), ("c", 5)]);
        assert_eq!(signal.num_slots(), 3);
    }

    #[test]
    fn test_emit_without_slots_is_noop() {
        let signal: OneToManySignal<i32> = OneToManySignal::new();
        signal.publish(1);
        assert_eq!(signal.num_slots(), 0);
    }

    #[test]
    fn test_disconnect_stops_delivery() {
        let signal = OneToManySignal::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let a = signal.connect(recording_slot(&log, "a")).unwrap();
        signal.connect(recording_slot(&log, "b")).unwrap();
        signal.disconnect(a);
        signal.publish(9);

        assert_eq!(*log.lock(), vec![("b", 9)]);
        assert_eq!(signal.num_slots(), 1);
    }

    /// Тест проверяет, что слот, отключённый во время эмиссии, не вызывается,
    /// если эмиссия до него ещё не дошла.
    #[test]
    fn test_slot_disconnected_mid_emit_is_skipped() {
        let signal = Arc::new(OneToManySignal::new());
        let log = Arc::new(Mutex::new(Vec::new()));
        let victim: Arc<Mutex<Option<SlotConnection>>> = Arc::new(Mutex::new(None));

        {
            let weak = Arc::downgrade(&signal);
            let victim = victim.clone();
            let log = log.clone();
            signal
                .connect(Slot::new(move |v| {
                    log.lock().push(("killer", v));
                    let conn = victim.lock().take();
                    if let (Some(conn), Some(signal)) = (conn, weak.upgrade()) {
                        signal.disconnect(conn);
                    }
                }))
                .unwrap();
        }
        let conn = signal.connect(recording_slot(&log, "victim")).unwrap();
        *victim.lock() = Some(conn);

        signal.publish(1);
        signal.publish(2);

        assert_eq!(*log.lock(), vec![("killer", 1), ("killer", 2)]);
    }

    /// Тест проверяет, что слот, подключённый во время эмиссии, получает
    /// только последующие публикации.
    #[test]
    fn test_slot_connected_mid_emit_waits_for_next_emit() {
        let signal = Arc::new(OneToManySignal::new());
        let late_hits = Arc::new(AtomicUsize::new(0));
        let armed = Arc::new(AtomicBool::new(true));

        {
            let weak = Arc::downgrade(&signal);
            let late_hits = late_hits.clone();
            let armed = armed.clone();
            signal
                .connect(Slot::new(move |_: i32| {
                    if armed.swap(false, Ordering::SeqCst) {
                        let late_hits = late_hits.clone();
                        if let Some(signal) = weak.upgrade() {
                            signal
                                .connect(Slot::new(move |_| {
                                    late_hits.fetch_add(1, Ordering::SeqCst);
                                }))
                                .unwrap();
                        }
                    }
                }))
                .unwrap();
        }

        signal.publish(1);
        assert_eq!(late_hits.load(Ordering::SeqCst), 0);

        signal.publish(2);
        assert_eq!(late_hits.load(Ordering::SeqCst), 1);
    }

    /// Тест проверяет, что эмиссия, начатая после возврата `disconnect` в
    /// другом потоке, пропускает отключённый слот.
    #[test]
    fn test_emit_after_disconnect_on_other_thread_skips_slot() {
        let signal = OneToManySignal::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let a = signal.connect(recording_slot(&log, "a")).unwrap();
        signal.connect(recording_slot(&log, "b")).unwrap();
        signal.publish(1);

        std::thread::scope(|scope| {
            scope.spawn(|| signal.disconnect(a));
        });
        signal.publish(2);

        assert_eq!(*log.lock(), vec![("a", 1), ("b", 1), ("b", 2)]);
    }

    #[test]
    fn test_double_disconnect_of_unknown_id_is_harmless() {
        let signal: OneToManySignal<i32> = OneToManySignal::new();
        signal.disconnect(SlotConnection::new(404));
        assert_eq!(signal.num_slots(), 0);
    }
}
