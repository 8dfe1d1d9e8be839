use std::{
    collections::BTreeMap,
    fmt,
    sync::{Arc, Weak},
};

use parking_lot::Mutex;
use tracing::{debug, trace};

use super::subscription::{SubscriptionId, SubscriptionPtr};

/// Направление канала относительно его компонента.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Input,
    Output,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Output => "output",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Множество активных подписок одного канала.
///
/// Реестр владеет подписками (strong `Arc`). Удалённая подписка
/// возвращается вызывающему и уничтожается уже вне блокировки: её `Drop`
/// может снова обратиться к этому же реестру.
#[derive(Default)]
pub struct Registry {
    subscriptions: Mutex<BTreeMap<SubscriptionId, SubscriptionPtr>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Добавляет подписку. Повторное добавление того же идентификатора
    /// ничего не меняет.
    pub fn add(
        &self,
        subscription: SubscriptionPtr,
    ) {
        let id = subscription.id();
        self.subscriptions.lock().entry(id).or_insert(subscription);
    }

    /// Удаляет подписку, если она есть.
    pub fn remove(
        &self,
        id: SubscriptionId,
    ) -> Option<SubscriptionPtr> {
        self.subscriptions.lock().remove(&id)
    }

    pub fn contains(
        &self,
        id: SubscriptionId,
    ) -> bool {
        self.subscriptions.lock().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.subscriptions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.lock().is_empty()
    }

    /// Идентификаторы подписок в порядке создания.
    pub fn ids(&self) -> Vec<SubscriptionId> {
        self.subscriptions.lock().keys().copied().collect()
    }

    fn pop(&self) -> Option<SubscriptionPtr> {
        self.subscriptions
            .lock()
            .pop_first()
            .map(|(_, subscription)| subscription)
    }

    /// Закрывает все подписки по одной: извлечь, затем закрыть.
    ///
    /// `close` удаляет подписку из реестров обеих сторон, поэтому множество
    /// может сокращаться во время обхода.
    pub fn close_all(&self) -> usize {
        let mut closed = 0;
        while let Some(subscription) = self.pop() {
            trace!(subscription = %subscription.id(), "Closing drained subscription");
            subscription.close();
            closed += 1;
        }
        closed
    }
}

impl fmt::Debug for Registry {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Registry")
            .field("subscriptions", &self.ids())
            .finish()
    }
}

/// Общая часть входного и выходного каналов: привязка к компоненту и реестр
/// подписок.
///
/// При уничтожении канал закрывает все свои подписки.
pub struct Channel<C> {
    component: Weak<C>,
    registry: Registry,
    direction: Direction,
}

impl<C> Channel<C> {
    pub fn new(
        component: &Weak<C>,
        direction: Direction,
    ) -> Self {
        Self {
            component: component.clone(),
            registry: Registry::new(),
            direction,
        }
    }

    /// Компонент-владелец, если он ещё жив.
    pub fn bound_component(&self) -> Option<Arc<C>> {
        self.component.upgrade()
    }

    pub(crate) fn component(&self) -> &Weak<C> {
        &self.component
    }

    pub fn num_subscriptions(&self) -> usize {
        self.registry.len()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn subscription_ids(&self) -> Vec<SubscriptionId> {
        self.registry.ids()
    }

    pub fn has_subscription(
        &self,
        id: SubscriptionId,
    ) -> bool {
        self.registry.contains(id)
    }

    pub(crate) fn add_subscription(
        &self,
        subscription: SubscriptionPtr,
    ) {
        self.registry.add(subscription);
    }

    pub(crate) fn remove_subscription(
        &self,
        id: SubscriptionId,
    ) {
        // Удалённый `Arc` уничтожается после освобождения блокировки.
        let removed = self.registry.remove(id);
        drop(removed);
    }
}

impl<C> fmt::Debug for Channel<C> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Channel")
            .field("direction", &self.direction)
            .field("registry", &self.registry)
            .finish()
    }
}

impl<C> Drop for Channel<C> {
    fn drop(&mut self) {
        if self.registry.is_empty() {
            return;
        }
        let closed = self.registry.close_all();
        debug!(
            direction = %self.direction,
            closed,
            "Channel dropped, subscriptions closed"
        );
    }
}
