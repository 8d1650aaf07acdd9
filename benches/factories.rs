use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ferrous_factory::*;
use std::sync::Arc;

struct Oscillator {
    frequency: f32,
    gain: f32,
}

impl Component for Oscillator {
    type Overrides = Option<f32>;

    fn apply_overrides(&mut self, gain: Option<f32>) {
        if let Some(gain) = gain {
            self.gain = gain;
        }
    }
}

fn oscillator() -> Constructor<Oscillator, f32> {
    Constructor::of(|_, frequency| Oscillator { frequency, gain: 1.0 })
}

// ===== Micro Benchmarks =====

fn bench_singleton_hit(c: &mut Criterion) {
    let registry = FactoryRegistry::new();
    let factory = registry.singleton_factory(&oscillator()).bind(&Context::new());

    // Prime the singleton
    let _ = factory.get_instance(440.0);

    c.bench_function("singleton_hit", |b| {
        b.iter(|| {
            let v = factory.get_instance(440.0);
            black_box(v.frequency);
        })
    });
}

fn bench_singleton_bind_cached(c: &mut Criterion) {
    let registry = FactoryRegistry::new();
    let ctx = Context::new();
    let unbound = registry.singleton_factory(&oscillator());
    let _ = unbound.bind(&ctx).get_instance(440.0);

    c.bench_function("singleton_bind_cached", |b| {
        b.iter(|| {
            let v = unbound.bind(&ctx).get_instance(440.0);
            black_box(v.frequency);
        })
    });
}

fn bench_class_create(c: &mut Criterion) {
    let mut group = c.benchmark_group("class_create");

    let registry = FactoryRegistry::new();
    let plain_ctx = Context::new();
    let override_ctx = Context::new();
    let replace_ctx = Context::new();
    registry.extend("Oscillator", Extension::<Oscillator>::override_with(|_| Some(0.5)), &override_ctx);
    registry.extend(
        "Oscillator",
        Extension::<Oscillator>::replace_with(|_| Oscillator { frequency: 220.0, gain: 0.25 }),
        &replace_ctx,
    );

    for (label, ctx) in [("plain", &plain_ctx), ("override", &override_ctx), ("replace", &replace_ctx)] {
        let factory = registry.class_factory(&oscillator()).bind(ctx);
        group.bench_function(label, |b| {
            b.iter(|| {
                let v = factory.create(black_box(440.0));
                black_box(v.gain);
            })
        });
    }

    group.finish();
}

fn bench_contention(c: &mut Criterion) {
    let mut group = c.benchmark_group("contention");

    let registry = FactoryRegistry::new();
    let ctx = Context::new();
    let _ = registry.singleton_factory(&oscillator()).bind(&ctx).get_instance(440.0);

    for &thread_count in &[1, 2, 4, 8] {
        group.bench_with_input(
            BenchmarkId::new("singleton_lookup_threads", thread_count),
            &thread_count,
            |b, &threads| {
                b.iter_custom(|iters| {
                    let start = std::time::Instant::now();
                    crossbeam_utils::thread::scope(|s| {
                        for _ in 0..threads {
                            let registry = &registry;
                            let ctx = &ctx;
                            s.spawn(move |_| {
                                for _ in 0..iters / threads as u64 {
                                    let v = registry.get_singleton_instance::<Oscillator>(ctx, "Oscillator");
                                    black_box(v);
                                }
                            });
                        }
                    })
                    .unwrap();
                    start.elapsed()
                })
            },
        );
    }

    group.finish();
}

// ===== Macro Benchmarks =====

fn bench_many_contexts(c: &mut Criterion) {
    let mut group = c.benchmark_group("many_contexts");

    for &context_count in &[10, 100, 1000] {
        let registry = FactoryRegistry::new();
        let contexts: Vec<Context> = (0..context_count).map(|_| Context::new()).collect();
        for ctx in &contexts {
            registry.set_singleton_instance(ctx, "Oscillator", Arc::new(Oscillator { frequency: 440.0, gain: 1.0 }));
            registry.extend("Oscillator", Extension::<Oscillator>::override_with(|_| None), ctx);
        }
        let last = &contexts[contexts.len() - 1];

        group.bench_with_input(
            BenchmarkId::new("lookup_last_context", context_count),
            &context_count,
            |b, _| {
                b.iter(|| {
                    let v = registry.get_singleton_instance::<Oscillator>(last, "Oscillator");
                    black_box(v);
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    micro_benches,
    bench_singleton_hit,
    bench_singleton_bind_cached,
    bench_class_create,
    bench_contention
);

criterion_group!(macro_benches, bench_many_contexts);

criterion_main!(micro_benches, macro_benches);
