//! Трейты возможностей каналов.
//!
//! Подписка и каналы работают с концами связи только через эти трейты,
//! статически (generic-параметры). Динамическая диспетчеризация
//! используется лишь в [`SubscriptionHandle`](super::SubscriptionHandle).

use std::sync::{Arc, Weak};

use chanlink_error::ChannelError;

use super::{
    id::ChannelIdentity,
    registry::{Channel, Direction},
    subscription::{SubscriptionId, SubscriptionPtr},
};
use crate::signal::Slot;

/// Общая возможность любого конца связи: реестр подписок и привязка к
/// компоненту.
pub trait ChannelEndpoint: Send + Sync + Sized + 'static {
    /// Компонент, которому принадлежит канал.
    type Component: Send + Sync + 'static;

    type Id: ChannelIdentity;

    const DIRECTION: Direction;

    fn channel(&self) -> &Channel<Self::Component>;

    /// Слабая ссылка на сам канал; подписка хранит только её.
    fn weak_ref(&self) -> Weak<Self>;

    fn bound_component(&self) -> Option<Arc<Self::Component>> {
        self.channel().bound_component()
    }

    fn num_subscriptions(&self) -> usize {
        self.channel().num_subscriptions()
    }

    /// Регистрирует подписку. Вызывается издателем при `subscribe`.
    fn add_subscription(
        &self,
        subscription: SubscriptionPtr,
    ) {
        self.channel().add_subscription(subscription);
    }

    /// Снимает подписку с регистрации. Вызывается подпиской при закрытии;
    /// отсутствие подписки в реестре не является ошибкой.
    fn remove_subscription(
        &self,
        id: SubscriptionId,
    ) {
        self.channel().remove_subscription(id);
    }
}

/// Источник данных: владеет сигналом и создаёт подписки.
pub trait Publisher: ChannelEndpoint {
    type Data: Send + 'static;

    /// Токен соединения используемого сигнала.
    type Connection: Send + Sync + 'static;

    fn publish(
        &self,
        data: Self::Data,
    );

    /// Подключает слот подписчика и регистрирует подписку у обеих сторон.
    fn subscribe<S>(
        &self,
        subscriber: &S,
    ) -> Result<SubscriptionPtr, ChannelError>
    where
        S: Subscriber<Data = Self::Data>;

    /// Закрывает соединение в сигнале. Вызывается только подпиской.
    fn disconnect(
        &self,
        connection: Self::Connection,
    );
}

/// Приёмник данных: предоставляет слот, привязанный к компоненту.
pub trait Subscriber: ChannelEndpoint {
    type Data: Send + 'static;

    fn slot(&self) -> Slot<Self::Data>;

    /// Подписка создаётся издателем, так как он владеет сигналом.
    fn subscribe<P>(
        &self,
        publisher: &P,
    ) -> Result<SubscriptionPtr, ChannelError>
    where
        P: Publisher<Data = Self::Data>,
    {
        publisher.subscribe(self)
    }
}
