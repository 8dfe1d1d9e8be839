use std::{fmt, sync::Arc};

use parking_lot::ReentrantMutex;

/// Блокировка, сериализующая вызовы синхронизированных слотов.
///
/// Реентерабельная: слот, который в процессе обработки публикует данные,
/// снова приходящие в него же, не попадёт в deadlock.
pub type SlotLock = Arc<ReentrantMutex<()>>;

/// Слот: callback, принимающий данные, опубликованные в канал.
///
/// Дешёвый в клонировании handle (`Arc` внутри): сигнал хранит свою копию,
/// а при публикации делает снимок списка слотов.
pub struct Slot<T> {
    inner: Arc<dyn Fn(T) + Send + Sync>,
}

impl<T: 'static> Slot<T> {
    /// Создаёт слот из произвольной функции.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// Вызывает слот с данными.
    pub fn call(
        &self,
        data: T,
    ) {
        (self.inner)(data)
    }

    /// Оборачивает слот в собственную реентерабельную блокировку.
    ///
    /// Одновременные вызовы из разных потоков выполняются по одному.
    pub fn synchronized(self) -> Self {
        self.guarded(Arc::new(ReentrantMutex::new(())))
    }

    /// Оборачивает слот в переданную блокировку. Несколько слотов с общей
    /// блокировкой никогда не выполняются параллельно.
    pub fn guarded(
        self,
        lock: SlotLock,
    ) -> Self {
        let inner = self.inner;
        Self::new(move |data| {
            let _guard = lock.lock();
            inner(data);
        })
    }
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Slot<T> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Slot")
            .field("refs", &Arc::strong_count(&self.inner))
            .finish()
    }
}
