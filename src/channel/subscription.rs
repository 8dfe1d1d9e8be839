use std::{
    any::{type_name, Any},
    fmt,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc, Weak,
    },
};

use chanlink_error::ChannelError;
use parking_lot::Mutex;
use tracing::debug;

use super::traits::{ChannelEndpoint, Publisher, Subscriber};

static NEXT_SUBSCRIPTION_ID: AtomicU64 = AtomicU64::new(1);

/// Уникальный в пределах процесса идентификатор подписки.
///
/// Монотонно растёт, поэтому упорядочивание по нему совпадает с порядком
/// создания подписок.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub(crate) fn next() -> Self {
        Self(NEXT_SUBSCRIPTION_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

/// Типо-стёртый handle подписки.
///
/// Единственный trait object слоя каналов: реестры хранят подписки
/// разных конкретных типов.
pub trait SubscriptionHandle: Send + Sync + 'static {
    fn id(&self) -> SubscriptionId;

    /// Разрывает связь. Повторные вызовы ничего не делают.
    fn close(&self);

    fn is_connected(&self) -> bool;

    /// Нужен для восстановления конкретного типа, см.
    /// [`downcast_subscription`].
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl fmt::Debug for dyn SubscriptionHandle {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("SubscriptionHandle")
            .field("id", &self.id())
            .field("connected", &self.is_connected())
            .finish()
    }
}

/// Разделяемый handle подписки, возвращаемый `subscribe`.
pub type SubscriptionPtr = Arc<dyn SubscriptionHandle>;

/// Связь одного издателя с одним подписчиком.
///
/// Владеет соединением сигнала и хранит слабые ссылки на оба конца, так что
/// подписка никогда не продлевает жизнь каналам. Переход в состояние
/// "отключена" происходит ровно один раз: через [`close`], при уничтожении
/// подписки или при уничтожении любого из каналов.
///
/// [`close`]: SubscriptionHandle::close
pub struct Subscription<P, S>
where
    P: Publisher,
    S: Subscriber<Data = P::Data>,
{
    id: SubscriptionId,
    publisher: Weak<P>,
    subscriber: Weak<S>,
    connection: Mutex<Option<P::Connection>>,
    connected: AtomicBool,
}

impl<P, S> Subscription<P, S>
where
    P: Publisher,
    S: Subscriber<Data = P::Data>,
{
    pub(crate) fn create(
        publisher: &P,
        subscriber: &S,
        connection: P::Connection,
    ) -> Arc<Self> {
        Arc::new(Self {
            id: SubscriptionId::next(),
            publisher: publisher.weak_ref(),
            subscriber: subscriber.weak_ref(),
            connection: Mutex::new(Some(connection)),
            connected: AtomicBool::new(true),
        })
    }

    pub fn publisher(&self) -> Option<Arc<P>> {
        self.publisher.upgrade()
    }

    pub fn subscriber(&self) -> Option<Arc<S>> {
        self.subscriber.upgrade()
    }

    /// Вызывается напрямую и из `close`, и из `Drop`.
    fn close_subscription(&self) {
        if !self.connected.swap(false, Ordering::AcqRel) {
            return;
        }

        let connection = self.connection.lock().take();
        match self.publisher.upgrade() {
            Some(publisher) => {
                if let Some(connection) = connection {
                    publisher.disconnect(connection);
                }
                publisher.remove_subscription(self.id);
            }
            // Издатель уже уничтожается: соединение просто освобождается.
            None => drop(connection),
        }

        if let Some(subscriber) = self.subscriber.upgrade() {
            subscriber.remove_subscription(self.id);
        }

        debug!(subscription = %self.id, "Subscription closed");
    }
}

impl<P, S> SubscriptionHandle for Subscription<P, S>
where
    P: Publisher,
    S: Subscriber<Data = P::Data>,
{
    fn id(&self) -> SubscriptionId {
        self.id
    }

    fn close(&self) {
        self.close_subscription();
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

impl<P, S> Drop for Subscription<P, S>
where
    P: Publisher,
    S: Subscriber<Data = P::Data>,
{
    fn drop(&mut self) {
        self.close_subscription();
    }
}

impl<P, S> fmt::Debug for Subscription<P, S>
where
    P: Publisher,
    S: Subscriber<Data = P::Data>,
{
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("connected", &self.is_connected())
            .finish()
    }
}

/// Восстанавливает конкретный тип подписки из handle.
pub fn downcast_subscription<P, S>(
    subscription: &SubscriptionPtr
) -> Result<Arc<Subscription<P, S>>, ChannelError>
where
    P: Publisher,
    S: Subscriber<Data = P::Data>,
{
    Arc::clone(subscription)
        .into_any()
        .downcast::<Subscription<P, S>>()
        .map_err(|_| ChannelError::InvalidCast {
            expected: type_name::<Subscription<P, S>>(),
        })
}
