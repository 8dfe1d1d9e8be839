use chanlink_error::ChannelError;

use super::{
    id::ChannelIdentity,
    input::{ChannelConsumer, InputChannel},
    output::OutputChannel,
    subscription::SubscriptionPtr,
};
use crate::signal::Signal;

/// Соединение двух каналов противоположного направления.
///
/// Реализован только для пар выход → вход и вход → выход, поэтому попытка
/// соединить два входа или два выхода не компилируется.
pub trait ConnectTo<Other> {
    fn connect_to(
        &self,
        other: &Other,
    ) -> Result<SubscriptionPtr, ChannelError>;
}

impl<P, T, PId, S, C, CId> ConnectTo<InputChannel<C, T, CId>> for OutputChannel<P, T, PId, S>
where
    P: Send + Sync + 'static,
    T: Send + 'static,
    PId: ChannelIdentity,
    S: Signal<T>,
    C: ChannelConsumer<CId, T>,
    CId: ChannelIdentity,
{
    fn connect_to(
        &self,
        input: &InputChannel<C, T, CId>,
    ) -> Result<SubscriptionPtr, ChannelError> {
        self.subscribe(input)
    }
}

impl<P, T, PId, S, C, CId> ConnectTo<OutputChannel<P, T, PId, S>> for InputChannel<C, T, CId>
where
    P: Send + Sync + 'static,
    T: Send + 'static,
    PId: ChannelIdentity,
    S: Signal<T>,
    C: ChannelConsumer<CId, T>,
    CId: ChannelIdentity,
{
    fn connect_to(
        &self,
        output: &OutputChannel<P, T, PId, S>,
    ) -> Result<SubscriptionPtr, ChannelError> {
        self.subscribe(output)
    }
}

/// Соединяет выходной и входной каналы, переданные в любом порядке.
pub fn connect_channels<A, B>(
    a: &A,
    b: &B,
) -> Result<SubscriptionPtr, ChannelError>
where
    A: ConnectTo<B>,
{
    a.connect_to(b)
}
