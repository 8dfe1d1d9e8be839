use std::{
    hint::black_box,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Weak,
    },
};

use chanlink::{ChannelConsumer, DefaultChannelId, In, Out, Sink, Source, SubscriptionPtr};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

struct Emitter {
    source: Source<Emitter, (Arc<Out<Emitter, u64, 0>>,)>,
}

impl Emitter {
    fn new() -> Arc<Self> {
        Arc::new_cyclic(|me: &Weak<Self>| Self {
            source: Source::new(me, "emitter"),
        })
    }

    fn output(&self) -> &Out<Emitter, u64, 0> {
        self.source.output::<0>()
    }
}

struct Adder {
    sum: AtomicU64,
    sink: Sink<Adder, (Arc<In<Adder, u64, 0>>,)>,
}

impl Adder {
    fn new() -> Arc<Self> {
        Arc::new_cyclic(|me: &Weak<Self>| Self {
            sum: AtomicU64::new(0),
            sink: Sink::new(me, "adder"),
        })
    }

    fn input(&self) -> &In<Adder, u64, 0> {
        self.sink.input::<0>()
    }
}

impl ChannelConsumer<DefaultChannelId, u64> for Adder {
    fn consume(
        &self,
        data: u64,
    ) {
        self.sum.fetch_add(data, Ordering::Relaxed);
    }
}

fn bench_subscribe_close(c: &mut Criterion) {
    let source = Emitter::new();
    let sink = Adder::new();
    c.bench_function("subscribe_close", |b| {
        b.iter(|| {
            let sub = source.output().subscribe(sink.input()).unwrap();
            sub.close();
            black_box(sub);
        })
    });
}

fn bench_publish_fanout(c: &mut Criterion) {
    let mut group = c.benchmark_group("publish");

    for subscribers in [1usize, 10, 100] {
        let source = Emitter::new();
        // создаём подписчиков заранее
        let sinks: Vec<_> = (0..subscribers).map(|_| Adder::new()).collect();
        let _subs: Vec<SubscriptionPtr> = sinks
            .iter()
            .map(|sink| source.output().subscribe(sink.input()).unwrap())
            .collect();

        group.bench_with_input(
            BenchmarkId::from_parameter(subscribers),
            &subscribers,
            |b, _| b.iter(|| source.output().publish(black_box(1))),
        );
    }

    group.finish();
}

fn bench_try_publish(c: &mut Criterion) {
    let source = Emitter::new();
    let sinks: Vec<_> = (0..10).map(|_| Adder::new()).collect();
    let _subs: Vec<SubscriptionPtr> = sinks
        .iter()
        .map(|sink| source.output().subscribe(sink.input()).unwrap())
        .collect();

    c.bench_function("try_publish_10_sub", |b| {
        b.iter(|| source.output().try_publish(black_box(1)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_subscribe_close,
    bench_publish_fanout,
    bench_try_publish
);
criterion_main!(benches);
