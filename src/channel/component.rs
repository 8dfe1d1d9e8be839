//! Компоненты с группами каналов.
//!
//! [`Source`] владеет группой выходных каналов, [`Sink`] группой входных,
//! [`Flow`] обеими. Группа задаётся кортежем `Arc`-каналов; идентичность
//! канала совпадает с его позицией в кортеже, и доступ по ней проверяется
//! при компиляции:
//!
//! ```
//! use std::sync::{Arc, Weak};
//!
//! use chanlink::channel::{ChannelConsumer, ChannelId, Flow, In, Out};
//!
//! struct Doubler {
//!     flow: Flow<Doubler, (Arc<In<Doubler, i32, 0>>,), (Arc<Out<Doubler, i32, 0>>,)>,
//! }
//!
//! impl ChannelConsumer<ChannelId<0>, i32> for Doubler {
//!     fn consume(&self, data: i32) {
//!         self.flow.output::<0>().publish(data * 2);
//!     }
//! }
//!
//! let doubler = Arc::new_cyclic(|me: &Weak<Doubler>| Doubler {
//!     flow: Flow::new(me, "doubler"),
//! });
//! assert_eq!(doubler.flow.name(), "doubler");
//! ```

use std::{
    fmt,
    marker::PhantomData,
    sync::{Arc, Weak},
};

use tracing::debug;

use super::{
    id::{ChannelId, ChannelIdValue, ChannelIdentity},
    input::{ChannelConsumer, InputChannel},
    output::OutputChannel,
    traits::ChannelEndpoint,
};
use crate::signal::{DefaultSignal, Signal};

/// Выходной канал на позиции `N` группы.
pub type Out<P, T, const N: ChannelIdValue, S = DefaultSignal<T>> =
    OutputChannel<P, T, ChannelId<N>, S>;

/// Входной канал на позиции `N` группы.
pub type In<C, T, const N: ChannelIdValue> = InputChannel<C, T, ChannelId<N>>;

/// Канал, который группа умеет создать для своего компонента.
pub trait GroupMember<C>: ChannelEndpoint<Component = C> {
    fn create(component: &Weak<C>) -> Arc<Self>;
}

impl<P, T, Id, S> GroupMember<P> for OutputChannel<P, T, Id, S>
where
    P: Send + Sync + 'static,
    T: Send + 'static,
    Id: ChannelIdentity,
    S: Signal<T>,
{
    fn create(component: &Weak<P>) -> Arc<Self> {
        OutputChannel::new(component)
    }
}

impl<C, T, Id> GroupMember<C> for InputChannel<C, T, Id>
where
    C: ChannelConsumer<Id, T>,
    T: Send + 'static,
    Id: ChannelIdentity,
{
    fn create(component: &Weak<C>) -> Arc<Self> {
        InputChannel::new(component)
    }
}

/// Группа каналов одного компонента, создаваемых вместе.
pub trait ChannelGroup<C>: Send + Sync + Sized + 'static {
    /// Количество каналов в группе.
    const LEN: usize;

    fn create(component: &Weak<C>) -> Self;

    /// Суммарное число подписок по всем каналам группы.
    fn num_subscriptions(&self) -> usize;
}

/// Доступ к каналу группы по идентичности `N`.
///
/// Реализован только для позиций, где канал имеет идентичность
/// `ChannelId<N>`, поэтому запрос несуществующего канала не компилируется.
pub trait ChannelAt<const N: ChannelIdValue> {
    type Channel;

    fn channel_at(&self) -> &Arc<Self::Channel>;
}

macro_rules! channel_group {
    ($len:expr; $($idx:tt => $T:ident),+) => {
        impl<Comp, $($T),+> ChannelGroup<Comp> for ($(Arc<$T>,)+)
        where
            Comp: Send + Sync + 'static,
            $($T: GroupMember<Comp>),+
        {
            const LEN: usize = $len;

            fn create(component: &Weak<Comp>) -> Self {
                ($(<$T as GroupMember<Comp>>::create(component),)+)
            }

            fn num_subscriptions(&self) -> usize {
                0 $(+ ChannelEndpoint::num_subscriptions(&*self.$idx))+
            }
        }
    };
}

macro_rules! channel_at {
    (($($T:ident),+); $idx:tt => $Sel:ident) => {
        impl<$($T),+> ChannelAt<$idx> for ($(Arc<$T>,)+)
        where
            $Sel: ChannelEndpoint<Id = ChannelId<$idx>>,
        {
            type Channel = $Sel;

            fn channel_at(&self) -> &Arc<$Sel> {
                &self.$idx
            }
        }
    };
}

channel_group!(1; 0 => A);
channel_group!(2; 0 => A, 1 => B);
channel_group!(3; 0 => A, 1 => B, 2 => C);
channel_group!(4; 0 => A, 1 => B, 2 => C, 3 => D);

channel_at!((A); 0 => A);
channel_at!((A, B); 0 => A);
channel_at!((A, B); 1 => B);
channel_at!((A, B, C); 0 => A);
channel_at!((A, B, C); 1 => B);
channel_at!((A, B, C); 2 => C);
channel_at!((A, B, C, D); 0 => A);
channel_at!((A, B, C, D); 1 => B);
channel_at!((A, B, C, D); 2 => C);
channel_at!((A, B, C, D); 3 => D);

////////////////////////////////////////////////////////////////////////////////
// Source
////////////////////////////////////////////////////////////////////////////////

/// Именованный производитель с группой выходных каналов `O`.
///
/// Встраивается в компонент `P`, который создаётся через
/// `Arc::new_cyclic`: каналам нужна слабая ссылка на владельца.
pub struct Source<P, O> {
    name: String,
    outputs: O,
    _component: PhantomData<fn() -> P>,
}

impl<P, O> Source<P, O>
where
    P: Send + Sync + 'static,
    O: ChannelGroup<P>,
{
    pub const NUM_OUTPUT_CHANNELS: usize = O::LEN;

    pub fn new(
        producer: &Weak<P>,
        name: impl Into<String>,
    ) -> Self {
        let name = name.into();
        debug!(source = %name, outputs = O::LEN, "Output channels created");
        Self {
            name,
            outputs: O::create(producer),
            _component: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Выходной канал с идентичностью `N`.
    pub fn output<const N: ChannelIdValue>(&self) -> &Arc<<O as ChannelAt<N>>::Channel>
    where
        O: ChannelAt<N>,
    {
        <O as ChannelAt<N>>::channel_at(&self.outputs)
    }

    pub fn num_subscriptions(&self) -> usize {
        self.outputs.num_subscriptions()
    }
}

impl<P, O> fmt::Debug for Source<P, O> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Source").field("name", &self.name).finish()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Sink
////////////////////////////////////////////////////////////////////////////////

/// Именованный потребитель с группой входных каналов `I`.
///
/// Компонент `C` реализует [`ChannelConsumer`] для каждого входа группы.
pub struct Sink<C, I> {
    name: String,
    inputs: I,
    _component: PhantomData<fn() -> C>,
}

impl<C, I> Sink<C, I>
where
    C: Send + Sync + 'static,
    I: ChannelGroup<C>,
{
    pub const NUM_INPUT_CHANNELS: usize = I::LEN;

    pub fn new(
        consumer: &Weak<C>,
        name: impl Into<String>,
    ) -> Self {
        let name = name.into();
        debug!(sink = %name, inputs = I::LEN, "Input channels created");
        Self {
            name,
            inputs: I::create(consumer),
            _component: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Входной канал с идентичностью `N`.
    pub fn input<const N: ChannelIdValue>(&self) -> &Arc<<I as ChannelAt<N>>::Channel>
    where
        I: ChannelAt<N>,
    {
        <I as ChannelAt<N>>::channel_at(&self.inputs)
    }

    pub fn num_subscriptions(&self) -> usize {
        self.inputs.num_subscriptions()
    }
}

impl<C, I> fmt::Debug for Sink<C, I> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Sink").field("name", &self.name).finish()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Flow
////////////////////////////////////////////////////////////////////////////////

/// Промежуточный компонент: принимает данные через `I` и публикует через
/// `O`. Оба набора каналов делят одно имя.
pub struct Flow<C, I, O> {
    sink: Sink<C, I>,
    source: Source<C, O>,
}

impl<C, I, O> Flow<C, I, O>
where
    C: Send + Sync + 'static,
    I: ChannelGroup<C>,
    O: ChannelGroup<C>,
{
    pub fn new(
        component: &Weak<C>,
        name: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            sink: Sink::new(component, name.clone()),
            source: Source::new(component, name),
        }
    }

    pub fn name(&self) -> &str {
        self.source.name()
    }

    pub fn input<const N: ChannelIdValue>(&self) -> &Arc<<I as ChannelAt<N>>::Channel>
    where
        I: ChannelAt<N>,
    {
        self.sink.input::<N>()
    }

    pub fn output<const N: ChannelIdValue>(&self) -> &Arc<<O as ChannelAt<N>>::Channel>
    where
        O: ChannelAt<N>,
    {
        self.source.output::<N>()
    }

    pub fn sink(&self) -> &Sink<C, I> {
        &self.sink
    }

    pub fn source(&self) -> &Source<C, O> {
        &self.source
    }
}

impl<C, I, O> fmt::Debug for Flow<C, I, O> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Flow")
            .field("name", &self.source.name)
            .finish()
    }
}
