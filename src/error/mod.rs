pub mod logging;
pub mod settings;

pub use chanlink_error::{ChannelError, ErrorExt, NotifierError, PublishError, StatusCode};
pub use logging::LoggingError;
pub use settings::SettingsError;
