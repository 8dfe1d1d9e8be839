//! Периодический запуск callbacks.
//!
//! [`PeriodicNotifier`] работает в собственном потоке и подходит для
//! синхронного кода; [`spawn_periodic`] запускает то же самое как задачу
//! tokio.

pub mod periodic;
pub mod task;

pub use periodic::{NotifierCallback, PeriodicNotifier};
pub use task::spawn_periodic;
