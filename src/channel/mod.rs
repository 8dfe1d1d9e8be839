//! Типизированные каналы и подписки.
//!
//! - `id`: идентичность канала;
//! - `registry`: реестр подписок и общая часть каналов;
//! - `subscription`: подписка и её типо-стёртый handle;
//! - `traits`: возможности издателя и подписчика;
//! - `output` / `input`: выходной и входной каналы;
//! - `connect`: соединение пары каналов в любом порядке;
//! - `component`: именованные компоненты с группами каналов (`Source`,
//!   `Sink`, `Flow`).
//!
//! Подписка держит слабые ссылки на оба канала, реестры каналов держат
//! подписку сильной ссылкой. Закрытие подписки (явное, при её уничтожении
//! или при уничтожении любого канала) выполняется ровно один раз.

pub mod component;
pub mod connect;
pub mod id;
pub mod input;
pub mod output;
pub mod registry;
pub mod subscription;
pub mod traits;

pub use component::{ChannelAt, ChannelGroup, Flow, GroupMember, In, Out, Sink, Source};
pub use connect::{connect_channels, ConnectTo};
pub use id::{ChannelId, ChannelIdValue, ChannelIdentity, DefaultChannelId};
pub use input::{ChannelConsumer, InputChannel};
pub use output::OutputChannel;
pub use registry::{Channel, Direction, Registry};
pub use subscription::{
    downcast_subscription, Subscription, SubscriptionHandle, SubscriptionId, SubscriptionPtr,
};
pub use traits::{ChannelEndpoint, Publisher, Subscriber};
