//! Периодический нотификатор публикует счётчик в выходной канал, два
//! потребителя принимают его: один считает сумму, другой печатает
//! чётные значения и отписывается после пятого.
//!
//! Запуск: `cargo run -p chanlink_demos --bin ticker_pipeline`
//! (интервал задаётся `CHANLINK_NOTIFIER__INTERVAL_MS`).

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Weak,
    },
    thread,
    time::Duration,
};

use chanlink::{
    init_logging, ChannelConsumer, DefaultChannelId, In, Out, PeriodicNotifier, Settings, Sink,
    Source, SubscriptionPtr,
};
use parking_lot::Mutex;
use tracing::info;

struct Ticker {
    next: AtomicU64,
    source: Source<Ticker, (Arc<Out<Ticker, u64, 0>>,)>,
}

impl Ticker {
    fn new() -> Arc<Self> {
        Arc::new_cyclic(|me: &Weak<Self>| Self {
            next: AtomicU64::new(1),
            source: Source::new(me, "ticker"),
        })
    }

    fn tick(&self) {
        self.source
            .output::<0>()
            .publish(self.next.fetch_add(1, Ordering::Relaxed));
    }
}

struct Summer {
    total: AtomicU64,
    sink: Sink<Summer, (Arc<In<Summer, u64, 0>>,)>,
}

impl ChannelConsumer<DefaultChannelId, u64> for Summer {
    fn consume(
        &self,
        data: u64,
    ) {
        let total = self.total.fetch_add(data, Ordering::Relaxed) + data;
        info!(data, total, "summer");
    }
}

struct EvenPrinter {
    seen: AtomicU64,
    subscription: Mutex<Option<SubscriptionPtr>>,
    sink: Sink<EvenPrinter, (Arc<In<EvenPrinter, u64, 0>>,)>,
}

impl ChannelConsumer<DefaultChannelId, u64> for EvenPrinter {
    fn consume(
        &self,
        data: u64,
    ) {
        if data % 2 != 0 {
            return;
        }
        info!(data, "even value");
        if self.seen.fetch_add(1, Ordering::Relaxed) + 1 < 5 {
            return;
        }
        let subscription = self.subscription.lock().take();
        if let Some(sub) = subscription {
            info!(subscription = %sub.id(), "printer unsubscribes");
            sub.close();
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load()?;
    let logging = init_logging(settings.logging.clone())?;

    let ticker = Ticker::new();
    let summer = Arc::new_cyclic(|me: &Weak<Summer>| Summer {
        total: AtomicU64::new(0),
        sink: Sink::new(me, "summer"),
    });
    let printer = Arc::new_cyclic(|me: &Weak<EvenPrinter>| EvenPrinter {
        seen: AtomicU64::new(0),
        subscription: Mutex::new(None),
        sink: Sink::new(me, "even-printer"),
    });

    let output = ticker.source.output::<0>();
    summer.sink.input::<0>().subscribe(&**output)?;
    let sub = printer.sink.input::<0>().subscribe(&**output)?;
    *printer.subscription.lock() = Some(sub);

    let notifier = {
        let ticker = Arc::downgrade(&ticker);
        PeriodicNotifier::from_settings(&settings.notifier, move || {
            if let Some(ticker) = ticker.upgrade() {
                ticker.tick();
            }
        })?
    };

    thread::sleep(settings.notifier.interval() * 15 + Duration::from_millis(10));
    drop(notifier);

    info!(
        total = summer.total.load(Ordering::Relaxed),
        subscriptions = ticker.source.num_subscriptions(),
        "pipeline finished"
    );

    logging.shutdown();
    Ok(())
}
