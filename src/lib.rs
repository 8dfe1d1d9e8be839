/// Typed input/output channels, subscriptions and their teardown.
pub mod channel;
/// Settings loading (defaults, files, environment).
pub mod config;
/// Error types re-exported from `chanlink-error` plus settings/logging errors.
pub mod error;
/// Logging setup (formatting, filters, file sink).
pub mod logging;
/// Periodic callbacks: thread-based notifier and tokio task.
pub mod notifier;
/// Notification primitives (signals) and slots.
pub mod signal;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

/// Channels, subscriptions and capability traits.
pub use channel::{
    connect_channels, downcast_subscription, ChannelConsumer, ChannelEndpoint, ChannelId,
    ChannelIdentity, DefaultChannelId, Direction, Flow, In, InputChannel, Out, OutputChannel,
    Publisher, Sink, Source, Subscriber, Subscription, SubscriptionHandle, SubscriptionId,
    SubscriptionPtr,
};
/// Settings for the notifier and logging, loaded from defaults, file and env.
pub use config::{NotifierSettings, Settings};
/// Operation errors and result types.
pub use error::{
    ChannelError, ErrorExt, LoggingError, NotifierError, PublishError, SettingsError, StatusCode,
};
/// Logging entry point.
pub use logging::{init_logging, LogFormat, LoggingConfig, LoggingHandle};
/// Periodic notification.
pub use notifier::{spawn_periodic, PeriodicNotifier};
/// Signals and slots.
pub use signal::{DefaultSignal, OneToManySignal, OneToOneSignal, Signal, Slot, SlotLock};
