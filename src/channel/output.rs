use std::{
    fmt,
    marker::PhantomData,
    panic::{self, AssertUnwindSafe},
    sync::{Arc, Weak},
};

use chanlink_error::{ChannelError, PublishError};
use tracing::{debug, warn};

use super::{
    id::{ChannelIdentity, DefaultChannelId},
    registry::{Channel, Direction},
    subscription::{Subscription, SubscriptionId, SubscriptionPtr},
    traits::{ChannelEndpoint, Publisher, Subscriber},
};
use crate::signal::{panic_message, DefaultSignal, Signal};

/// Типизированный выходной порт компонента-производителя.
///
/// Хранит сигнал и подписки. Создаётся только через [`OutputChannel::new`],
/// который возвращает `Arc`: каналу нужна слабая ссылка на себя для подписок.
pub struct OutputChannel<P, T, Id = DefaultChannelId, S = DefaultSignal<T>> {
    // `base` объявлен первым: при уничтожении подписки закрываются, пока
    // сигнал ещё жив.
    base: Channel<P>,
    signal: S,
    this: Weak<Self>,
    _marker: PhantomData<fn() -> (T, Id)>,
}

impl<P, T, Id, S> OutputChannel<P, T, Id, S>
where
    P: Send + Sync + 'static,
    T: Send + 'static,
    Id: ChannelIdentity,
    S: Signal<T>,
{
    pub fn new(producer: &Weak<P>) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            base: Channel::new(producer, Direction::Output),
            signal: S::default(),
            this: this.clone(),
            _marker: PhantomData,
        })
    }

    /// Компонент-производитель, если он ещё жив.
    pub fn producer(&self) -> Option<Arc<P>> {
        self.base.bound_component()
    }

    /// Синхронно передаёт `data` всем подключённым слотам в порядке
    /// подписки.
    ///
    /// Паника слота не перехватывается: она уходит вызывающему, а
    /// оставшиеся слоты в этой публикации не вызываются. Для доставки
    /// всем слотам независимо от сбоев см. [`try_publish`](Self::try_publish).
    pub fn publish(
        &self,
        data: T,
    ) {
        self.signal.publish(data);
    }

    /// Передаёт `data` всем слотам, перехватывая паники.
    ///
    /// Каждый слот вызывается, даже если предыдущий завершился паникой.
    /// Сбои собираются в [`PublishError::SlotsFailed`].
    pub fn try_publish(
        &self,
        data: T,
    ) -> Result<(), PublishError> {
        let mut total = 0usize;
        let mut messages = Vec::new();

        self.signal.emit(data, &mut |slot, data| {
            total += 1;
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| slot.call(data))) {
                messages.push(panic_message(payload.as_ref()));
            }
        });

        if messages.is_empty() {
            return Ok(());
        }

        warn!(
            failed = messages.len(),
            total,
            "Slots panicked during publish"
        );
        Err(PublishError::SlotsFailed {
            failed: messages.len(),
            total,
            messages,
        })
    }

    /// Подписывает `subscriber` на этот канал.
    ///
    /// Слот подключается к сигналу до того, как подписка попадает в
    /// реестры; отказ сигнала (например, у сигнала "один к одному") не
    /// оставляет следов ни в одном реестре.
    pub fn subscribe<Sub>(
        &self,
        subscriber: &Sub,
    ) -> Result<SubscriptionPtr, ChannelError>
    where
        Sub: Subscriber<Data = T>,
    {
        let connection = self.signal.connect(subscriber.slot())?;
        let subscription: SubscriptionPtr = Subscription::create(self, subscriber, connection);

        self.base.add_subscription(Arc::clone(&subscription));
        subscriber.add_subscription(Arc::clone(&subscription));

        debug!(
            subscription = %subscription.id(),
            channel_id = Id::VALUE,
            cardinality = %S::CARDINALITY,
            "Subscribed"
        );
        Ok(subscription)
    }

    pub fn num_slots(&self) -> usize {
        self.signal.num_slots()
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

    pub(crate) fn disconnect(
        &self,
        connection: S::Connection,
    ) {
        self.signal.disconnect(connection);
    }
}

impl<P, T, Id, S> ChannelEndpoint for OutputChannel<P, T, Id, S>
where
    P: Send + Sync + 'static,
    T: Send + 'static,
    Id: ChannelIdentity,
    S: Signal<T>,
{
    type Component = P;
    type Id = Id;

    const DIRECTION: Direction = Direction::Output;

    fn channel(&self) -> &Channel<P> {
        &self.base
    }

    fn weak_ref(&self) -> Weak<Self> {
        self.this.clone()
    }
}

impl<P, T, Id, S> Publisher for OutputChannel<P, T, Id, S>
where
    P: Send + Sync + 'static,
    T: Send + 'static,
    Id: ChannelIdentity,
    S: Signal<T>,
{
    type Data = T;
    type Connection = S::Connection;

    fn publish(
        &self,
        data: T,
    ) {
        Self::publish(self, data);
    }

    fn subscribe<Sub>(
        &self,
        subscriber: &Sub,
    ) -> Result<SubscriptionPtr, ChannelError>
    where
        Sub: Subscriber<Data = T>,
    {
        Self::subscribe(self, subscriber)
    }

    fn disconnect(
        &self,
        connection: S::Connection,
    ) {
        Self::disconnect(self, connection);
    }
}

impl<P, T, Id, S> fmt::Debug for OutputChannel<P, T, Id, S>
where
    Id: ChannelIdentity,
{
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("OutputChannel")
            .field("id", &Id::VALUE)
            .field("base", &self.base)
            .finish()
    }
}
