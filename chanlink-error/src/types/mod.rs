pub mod channel;
pub mod notifier;

// Публичный экспорт всех типов ошибок из вложенных модулей, чтобы
// упростить доступ к ним из внешнего кода.
pub use channel::*;
pub use notifier::*;
