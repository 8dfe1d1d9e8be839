use std::fmt;

/// Числовое значение идентичности канала.
pub type ChannelIdValue = u32;

/// Идентичность канала, известная на этапе компиляции.
///
/// Различает каналы с одинаковым типом данных у одного компонента: потребитель
/// реализует отдельный обработчик для каждой пары (идентичность, тип).
pub trait ChannelIdentity: Send + Sync + 'static {
    const VALUE: ChannelIdValue;
}

/// Стандартная идентичность, параметризованная константой.
///
/// ```
/// use chanlink::channel::{ChannelId, ChannelIdentity};
///
/// type Prices = ChannelId<1>;
/// type Volumes = ChannelId<2>;
///
/// assert_ne!(Prices::VALUE, Volumes::VALUE);
/// ```
#[derive(Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelId<const N: ChannelIdValue>;

impl<const N: ChannelIdValue> ChannelIdentity for ChannelId<N> {
    const VALUE: ChannelIdValue = N;
}

impl<const N: ChannelIdValue> fmt::Debug for ChannelId<N> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "ChannelId<{N}>")
    }
}

/// Идентичность канала по умолчанию.
pub type DefaultChannelId = ChannelId<0>;
