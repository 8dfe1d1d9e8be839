use std::{
    fmt,
    marker::PhantomData,
    sync::{Arc, Weak},
};

use chanlink_error::ChannelError;
use parking_lot::ReentrantMutex;
use tracing::trace;

use super::{
    id::{ChannelIdentity, DefaultChannelId},
    registry::{Channel, Direction},
    subscription::{SubscriptionId, SubscriptionPtr},
    traits::{ChannelEndpoint, Publisher, Subscriber},
};
use crate::signal::{Slot, SlotLock};

/// Обработчик данных одного входного канала.
///
/// Потребитель реализует трейт для каждой пары (идентичность, тип данных),
/// которую принимает. Канал без такой реализации не компилируется.
pub trait ChannelConsumer<Id: ChannelIdentity, T>: Send + Sync + 'static {
    fn consume(
        &self,
        data: T,
    );
}

/// Типизированный входной порт компонента-потребителя.
pub struct InputChannel<C, T, Id = DefaultChannelId> {
    base: Channel<C>,
    lock: Option<SlotLock>,
    this: Weak<Self>,
    _marker: PhantomData<fn(T) -> Id>,
}

impl<C, T, Id> InputChannel<C, T, Id>
where
    C: ChannelConsumer<Id, T>,
    T: Send + 'static,
    Id: ChannelIdentity,
{
    pub fn new(consumer: &Weak<C>) -> Arc<Self> {
        Self::build(consumer, None)
    }

    /// Канал, слот которого не выполняется параллельно сам с собой, даже
    /// если на него подписаны издатели из разных потоков.
    pub fn new_synchronized(consumer: &Weak<C>) -> Arc<Self> {
        Self::build(consumer, Some(Arc::new(ReentrantMutex::new(()))))
    }

    /// Канал, разделяющий блокировку с другими входами того же потребителя:
    /// обработчики всех таких каналов выполняются по одному.
    pub fn with_lock(
        consumer: &Weak<C>,
        lock: SlotLock,
    ) -> Arc<Self> {
        Self::build(consumer, Some(lock))
    }

    fn build(
        consumer: &Weak<C>,
        lock: Option<SlotLock>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            base: Channel::new(consumer, Direction::Input),
            lock,
            this: this.clone(),
            _marker: PhantomData,
        })
    }

    pub fn consumer(&self) -> Option<Arc<C>> {
        self.base.bound_component()
    }

    pub fn is_synchronized(&self) -> bool {
        self.lock.is_some()
    }

    /// Слот, передающий данные обработчику потребителя.
    ///
    /// Держит только слабую ссылку: данные, пришедшие после уничтожения
    /// потребителя, отбрасываются.
    pub fn slot(&self) -> Slot<T> {
        let consumer = self.base.component().clone();
        let slot = Slot::new(move |data: T| match consumer.upgrade() {
            Some(consumer) => <C as ChannelConsumer<Id, T>>::consume(&consumer, data),
            None => trace!(channel_id = Id::VALUE, "Consumer gone, data dropped"),
        });

        match &self.lock {
            Some(lock) => slot.guarded(Arc::clone(lock)),
            None => slot,
        }
    }

    /// Подписывает канал на `publisher`. Подписку создаёт издатель.
    pub fn subscribe<P>(
        &self,
        publisher: &P,
    ) -> Result<SubscriptionPtr, ChannelError>
    where
        P: Publisher<Data = T>,
    {
        publisher.subscribe(self)
    }

    pub fn num_subscriptions(&self) -> usize {
        self.base.num_subscriptions()
    }

    pub fn subscription_ids(&self) -> Vec<SubscriptionId> {
        self.base.subscription_ids()
    }

    pub fn has_subscription(
        &self,
        id: SubscriptionId,
    ) -> bool {
        self.base.has_subscription(id)
    }
}

impl<C, T, Id> ChannelEndpoint for InputChannel<C, T, Id>
where
    C: ChannelConsumer<Id, T>,
    T: Send + 'static,
    Id: ChannelIdentity,
{
    type Component = C;
    type Id = Id;

    const DIRECTION: Direction = Direction::Input;

    fn channel(&self) -> &Channel<C> {
        &self.base
    }

    fn weak_ref(&self) -> Weak<Self> {
        self.this.clone()
    }
}

impl<C, T, Id> Subscriber for InputChannel<C, T, Id>
where
    C: ChannelConsumer<Id, T>,
    T: Send + 'static,
    Id: ChannelIdentity,
{
    type Data = T;

    fn slot(&self) -> Slot<T> {
        Self::slot(self)
    }
}

impl<C, T, Id> fmt::Debug for InputChannel<C, T, Id>
where
    Id: ChannelIdentity,
{
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("InputChannel")
            .field("id", &Id::VALUE)
            .field("synchronized", &self.lock.is_some())
            .field("base", &self.base)
            .finish()
    }
}
