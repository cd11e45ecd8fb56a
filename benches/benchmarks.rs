use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use hookbox::{deps, new_hook_key, shallow_equal, Runtime};

fn hook_acquisition_benchmark(c: &mut Criterion) {
    let runtime = Runtime::new();
    let key = new_hook_key(Some("bench"));

    c.bench_function("hook_acquisition", |b| {
        b.iter(|| {
            let hooks = runtime.hooks(&key);
            black_box(hooks.use_state(0).get())
        });
    });
}

fn state_read_benchmark(c: &mut Criterion) {
    let runtime = Runtime::new();
    let state = runtime.hooks("reader").use_state(42);

    c.bench_function("state_read", |b| {
        b.iter(|| {
            black_box(state.get());
        });
    });
}

fn state_write_benchmark(c: &mut Criterion) {
    let runtime = Runtime::new();
    let state = runtime.hooks("writer").use_state_with(0, |_| {});

    c.bench_function("state_write", |b| {
        let mut i = 0;
        b.iter(|| {
            state.set(black_box(i));
            i += 1;
        });
    });
}

fn full_render_benchmark(c: &mut Criterion) {
    let runtime = Runtime::new();
    let key = new_hook_key(Some("render"));

    c.bench_function("full_render", |b| {
        b.iter(|| {
            let hooks = runtime.hooks(&key);
            let count = hooks.use_state(5);
            let latest = hooks.use_ref(0);
            let doubled = hooks.use_memo(|_| count.get() * 2, deps![count.get()]);
            hooks.use_effect(
                |_| {
                    latest.set(doubled);
                    None
                },
                deps![doubled],
            );
            black_box(doubled)
        });
    });
}

fn memo_hit_benchmark(c: &mut Criterion) {
    let runtime = Runtime::new();
    let key = new_hook_key(Some("memo"));

    c.bench_function("memo_hit", |b| {
        b.iter(|| {
            let hooks = runtime.hooks(&key);
            black_box(hooks.use_memo(|_| 5 + 10, deps![5, 10]))
        });
    });
}

fn shallow_equal_benchmark(c: &mut Criterion) {
    let a = deps![1, "two", 3.0, true];
    let b = deps![1, "two", 3.0, true];

    c.bench_function("shallow_equal", |bench| {
        bench.iter(|| black_box(shallow_equal(Some(&a[..]), Some(&b[..]))));
    });
}

fn context_broadcast_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("context_broadcast");

    for subscriber_count in [1, 10, 100].iter() {
        let runtime = Runtime::new();
        let tick = runtime.hooks("app").use_context("tick", 0usize);

        for _ in 0..*subscriber_count {
            tick.subscribe(|_| {
                // Empty subscriber
            });
        }

        group.bench_with_input(
            BenchmarkId::from_parameter(subscriber_count),
            subscriber_count,
            |b, _| {
                let mut i = 0;
                b.iter(|| {
                    tick.set(black_box(i));
                    i += 1;
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    hook_acquisition_benchmark,
    state_read_benchmark,
    state_write_benchmark,
    full_render_benchmark,
    memo_hit_benchmark,
    shallow_equal_benchmark,
    context_broadcast_benchmark,
);
criterion_main!(benches);
