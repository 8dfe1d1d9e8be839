//! Компоненты для интеграционных тестов: производитель с выходным каналом,
//! потребитель, записывающий полученные данные, и сигнал со счётчиками
//! закрытых соединений.

#![allow(dead_code)]

use std::{
    cell::Cell,
    sync::{Arc, Weak},
};

use chanlink::{
    signal::{SignalCardinality, SlotConnection},
    ChannelConsumer, ChannelError, DefaultChannelId, In, OneToManySignal, Out, Signal, Sink, Slot,
    Source,
};
use parking_lot::Mutex;

/// Общий журнал доставки: (имя потребителя, значение).
pub type Log = Arc<Mutex<Vec<(&'static str, i32)>>>;

pub fn new_log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

////////////////////////////////////////////////////////////////////////////////
// Производитель
////////////////////////////////////////////////////////////////////////////////

/// Производитель с одним выходным каналом типа `i32`.
pub struct Producer<S: Signal<i32> = OneToManySignal<i32>> {
    source: Source<Producer<S>, (Arc<Out<Producer<S>, i32, 0, S>>,)>,
}

impl Producer {
    pub fn new() -> Arc<Self> {
        Self::with_signal()
    }
}

impl<S: Signal<i32>> Producer<S> {
    pub fn with_signal() -> Arc<Self> {
        Arc::new_cyclic(|me: &Weak<Self>| Self {
            source: Source::new(me, "producer"),
        })
    }

    pub fn output(&self) -> &Arc<Out<Producer<S>, i32, 0, S>> {
        self.source.output::<0>()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Потребитель
////////////////////////////////////////////////////////////////////////////////

/// Потребитель с одним входным каналом; пишет всё полученное в журнал.
pub struct Recorder {
    pub log: Log,
    sink: Sink<Recorder, (Arc<In<Recorder, i32, 0>>,)>,
    name: &'static str,
}

impl Recorder {
    pub fn new(
        name: &'static str,
        log: &Log,
    ) -> Arc<Self> {
        Arc::new_cyclic(|me: &Weak<Self>| Self {
            log: Arc::clone(log),
            sink: Sink::new(me, name),
            name,
        })
    }

    pub fn input(&self) -> &Arc<In<Recorder, i32, 0>> {
        self.sink.input::<0>()
    }
}

impl ChannelConsumer<DefaultChannelId, i32> for Recorder {
    fn consume(
        &self,
        data: i32,
    ) {
        self.log.lock().push((self.name, data));
    }
}

/// Потребитель, выполняющий произвольное действие на каждое значение.
pub struct Hook {
    action: Box<dyn Fn(i32) + Send + Sync>,
    sink: Sink<Hook, (Arc<In<Hook, i32, 0>>,)>,
}

impl Hook {
    pub fn new<F>(action: F) -> Arc<Self>
    where
        F: Fn(i32) + Send + Sync + 'static,
    {
        Arc::new_cyclic(|me: &Weak<Self>| Self {
            action: Box::new(action),
            sink: Sink::new(me, "hook"),
        })
    }

    pub fn input(&self) -> &Arc<In<Hook, i32, 0>> {
        self.sink.input::<0>()
    }
}

impl ChannelConsumer<DefaultChannelId, i32> for Hook {
    fn consume(
        &self,
        data: i32,
    ) {
        (self.action)(data);
    }
}

////////////////////////////////////////////////////////////////////////////////
// Сигнал со счётчиками
////////////////////////////////////////////////////////////////////////////////

thread_local! {
    static RELEASED: Cell<usize> = const { Cell::new(0) };
    static DISCONNECTS: Cell<usize> = const { Cell::new(0) };
}

/// Счётчики текущего потока: (освобождено соединений, вызовов disconnect).
pub fn connection_counters() -> (usize, usize) {
    (RELEASED.with(Cell::get), DISCONNECTS.with(Cell::get))
}

pub fn reset_connection_counters() {
    RELEASED.with(|c| c.set(0));
    DISCONNECTS.with(|c| c.set(0));
}

/// Соединение, считающее своё освобождение.
pub struct CountedConnection(Option<SlotConnection>);

impl Drop for CountedConnection {
    fn drop(&mut self) {
        RELEASED.with(|c| c.set(c.get() + 1));
    }
}

/// Обёртка над сигналом по умолчанию, считающая закрытия соединений.
pub struct CountingSignal<T>(OneToManySignal<T>);

impl<T> Default for CountingSignal<T> {
    fn default() -> Self {
        Self(OneToManySignal::default())
    }
}

impl<T: Clone + Send + 'static> Signal<T> for CountingSignal<T> {
    type Connection = CountedConnection;

    const CARDINALITY: SignalCardinality = SignalCardinality::OneToMany;

    fn connect(
        &self,
        slot: Slot<T>,
    ) -> Result<CountedConnection, ChannelError> {
        self.0
            .connect(slot)
            .map(|connection| CountedConnection(Some(connection)))
    }

    fn disconnect(
        &self,
        mut connection: CountedConnection,
    ) {
        DISCONNECTS.with(|c| c.set(c.get() + 1));
        if let Some(inner) = connection.0.take() {
            self.0.disconnect(inner);
        }
    }

    fn emit(
        &self,
        data: T,
        deliver: &mut dyn FnMut(&Slot<T>, T),
    ) {
        self.0.emit(data, deliver);
    }

    fn num_slots(&self) -> usize {
        self.0.num_slots()
    }
}
