use std::time::Duration;

use chanlink_error::NotifierError;
use tokio::{
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};

/// Запускает периодическую задачу на текущем tokio runtime.
///
/// Асинхронный аналог [`PeriodicNotifier`](super::PeriodicNotifier) для
/// хостов, уже работающих внутри tokio. Первый вызов происходит через
/// `period`, а не сразу. Возвращает `JoinHandle`, `abort()` останавливает
/// задачу.
pub fn spawn_periodic<F>(
    period: Duration,
    mut callback: F,
) -> Result<JoinHandle<()>, NotifierError>
where
    F: FnMut() + Send + 'static,
{
    if period.is_zero() {
        return Err(NotifierError::InvalidInterval);
    }

    Ok(tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // Первый тик `interval` срабатывает немедленно.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            callback();
            tracing::trace!("Periodic task fired");
        }
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use super::*;

    #[tokio::test]
    async fn test_zero_period_rejected() {
        assert_eq!(
            spawn_periodic(Duration::ZERO, || {}).unwrap_err(),
            NotifierError::InvalidInterval
        );
    }

    #[tokio::test]
    async fn test_periodic_task_fires_and_aborts() {
        tokio::time::pause();

        let hits = Arc::new(AtomicUsize::new(0));
        let handle = {
            let hits = hits.clone();
            spawn_periodic(Duration::from_secs(5), move || {
                hits.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap()
        };
        // Даём задаче стартовать и создать интервал в момент t = 0
        tokio::task::yield_now().await;

        // Спим 11 секунд виртуального времени: срабатывания на 5 и 10 секундах
        tokio::time::sleep(Duration::from_secs(11)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 2);

        handle.abort();
        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }
}
