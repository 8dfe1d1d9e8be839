use std::{
    panic::{self, AssertUnwindSafe},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use chanlink_error::NotifierError;
use parking_lot::{Condvar, Mutex};
use tracing::{debug, error};

use crate::{config::NotifierSettings, signal::panic_message};

/// Callback, вызываемый нотификатором на каждом тике.
pub type NotifierCallback = Arc<dyn Fn() + Send + Sync>;

const WORKER_NAME: &str = "chanlink-notifier";

////////////////////////////////////////////////////////////////////////////////
// Структуры
////////////////////////////////////////////////////////////////////////////////

/// Состояние, разделяемое с фоновым потоком.
struct Shared {
    interrupted: Mutex<bool>,
    wakeup: Condvar,
    callbacks: Mutex<Vec<NotifierCallback>>,
    ticks: AtomicU64,
    failures: AtomicU64,
}

/// Активный компонент, вызывающий callbacks с фиксированным интервалом.
///
/// Фоновый поток стартует в [`PeriodicNotifier::new`] и останавливается при
/// уничтожении: флаг прерывания выставляется, поток будится и к нему
/// присоединяются. Ожидание между тиками прерывается сразу, поэтому
/// остановка не ждёт окончания интервала, только текущего вызова callback.
///
/// Паника в callback перехватывается, логируется и учитывается в
/// [`failures`](Self::failures); остальные callbacks и следующие тики
/// выполняются как обычно.
pub struct PeriodicNotifier {
    shared: Arc<Shared>,
    interval: Duration,
    worker: Option<JoinHandle<()>>,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl PeriodicNotifier {
    /// Запускает нотификатор с одним callback.
    pub fn new<F>(
        callback: F,
        interval: Duration,
    ) -> Result<Self, NotifierError>
    where
        F: Fn() + Send + Sync + 'static,
    {
        if interval.is_zero() {
            return Err(NotifierError::InvalidInterval);
        }

        let shared = Arc::new(Shared {
            interrupted: Mutex::new(false),
            wakeup: Condvar::new(),
            callbacks: Mutex::new(vec![Arc::new(callback) as NotifierCallback]),
            ticks: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        });

        let worker = {
            let shared = Arc::clone(&shared);
            thread::Builder::new()
                .name(WORKER_NAME.to_string())
                .spawn(move || run_worker(&shared, interval))?
        };

        debug!(?interval, "Periodic notifier started");
        Ok(Self {
            shared,
            interval,
            worker: Some(worker),
        })
    }

    /// Запускает нотификатор с интервалом из настроек.
    pub fn from_settings<F>(
        settings: &NotifierSettings,
        callback: F,
    ) -> Result<Self, NotifierError>
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self::new(callback, settings.interval())
    }

    /// Добавляет ещё один callback. Он вызывается начиная со следующего тика,
    /// после уже зарегистрированных.
    pub fn connect<F>(
        &self,
        callback: F,
    ) where
        F: Fn() + Send + Sync + 'static,
    {
        self.shared.callbacks.lock().push(Arc::new(callback));
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Количество завершённых тиков.
    pub fn ticks(&self) -> u64 {
        self.shared.ticks.load(Ordering::Acquire)
    }

    /// Количество вызовов callback, завершившихся паникой.
    pub fn failures(&self) -> u64 {
        self.shared.failures.load(Ordering::Acquire)
    }

    pub fn num_callbacks(&self) -> usize {
        self.shared.callbacks.lock().len()
    }

    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|worker| !worker.is_finished())
    }

    /// Останавливает фоновый поток и дожидается его завершения.
    ///
    /// Повторный вызов ничего не делает. Вызванный из самого callback,
    /// только выставляет флаг: присоединиться к своему потоку нельзя.
    pub fn stop(&mut self) {
        {
            let mut interrupted = self.shared.interrupted.lock();
            *interrupted = true;
        }
        self.shared.wakeup.notify_all();

        let Some(worker) = self.worker.take() else {
            return;
        };
        if worker.thread().id() == thread::current().id() {
            return;
        }
        if worker.join().is_err() {
            error!("Notifier worker terminated abnormally");
        }
        debug!(ticks = self.ticks(), "Periodic notifier stopped");
    }
}

////////////////////////////////////////////////////////////////////////////////
// Реализация трейтов
////////////////////////////////////////////////////////////////////////////////

impl Drop for PeriodicNotifier {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for PeriodicNotifier {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("PeriodicNotifier")
            .field("interval", &self.interval)
            .field("ticks", &self.ticks())
            .field("failures", &self.failures())
            .finish()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Внутренние функции
////////////////////////////////////////////////////////////////////////////////

/// Цикл фонового потока. Дедлайны отсчитываются от старта, так что время
/// выполнения callbacks не накапливает дрейф.
fn run_worker(
    shared: &Shared,
    interval: Duration,
) {
    let mut deadline = Instant::now() + interval;

    loop {
        {
            let mut interrupted = shared.interrupted.lock();
            while !*interrupted {
                if shared
                    .wakeup
                    .wait_until(&mut interrupted, deadline)
                    .timed_out()
                {
                    break;
                }
            }
            if *interrupted {
                return;
            }
        }

        fire(shared);
        deadline += interval;

        // Тик, пропущенный из-за долгого callback, не догоняется.
        let now = Instant::now();
        if deadline < now {
            deadline = now + interval;
        }
    }
}

fn fire(shared: &Shared) {
    let callbacks = shared.callbacks.lock().clone();

    for callback in &callbacks {
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| callback())) {
            shared.failures.fetch_add(1, Ordering::AcqRel);
            error!(
                reason = %panic_message(payload.as_ref()),
                "Notifier callback panicked"
            );
        }
    }

    shared.ticks.fetch_add(1, Ordering::AcqRel);
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
