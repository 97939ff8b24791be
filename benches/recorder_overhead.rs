//! Recorder overhead benchmark
//!
//! Measures the per-event cost of tracing a recursive workload, compared to
//! running the same workload on a runtime with no listener attached.
//!
//! ```bash
//! cargo bench --bench recorder_overhead
//! ```

use calltrace::recorder::Recorder;
use calltrace::{frame, EventKind, FrameContext, Runtime, TracerConfig};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::cell::RefCell;
use std::rc::Rc;

fn fib(rt: &mut Runtime, n: i64) -> i64 {
    rt.scope(frame!("fib", n => n), |rt| {
        if n < 2 {
            n
        } else {
            fib(rt, n - 1) + fib(rt, n - 2)
        }
    })
}

fn attach(rt: &mut Runtime, config: TracerConfig) -> Rc<RefCell<Recorder>> {
    let recorder = Rc::new(RefCell::new(Recorder::new()));
    let shared = Rc::clone(&recorder);
    rt.register(Box::new(move |kind: EventKind, ctx: FrameContext<'_>| {
        shared.borrow_mut().observe(kind, ctx, &config)
    }))
    .unwrap();
    recorder
}

fn bench_untraced(c: &mut Criterion) {
    c.bench_function("fib_untraced", |b| {
        let mut rt = Runtime::new();
        b.iter(|| fib(&mut rt, black_box(15)))
    });
}

fn bench_traced(c: &mut Criterion) {
    let mut group = c.benchmark_group("fib_traced");
    for max_depth in [2i64, 8, 64] {
        group.bench_with_input(
            BenchmarkId::from_parameter(max_depth),
            &max_depth,
            |b, &max_depth| {
                let mut config = TracerConfig::default();
                config.set_max_depth(max_depth);
                let mut rt = Runtime::new();
                let recorder = attach(&mut rt, config);
                b.iter(|| {
                    recorder.borrow_mut().reset();
                    fib(&mut rt, black_box(15))
                })
            },
        );
    }
    group.finish();
}

fn bench_show_args(c: &mut Criterion) {
    c.bench_function("fib_traced_show_args", |b| {
        let mut config = TracerConfig::default();
        config.set_max_depth(64);
        config.set_show_args(true);
        let mut rt = Runtime::new();
        let recorder = attach(&mut rt, config);
        b.iter(|| {
            recorder.borrow_mut().reset();
            fib(&mut rt, black_box(15))
        })
    });
}

criterion_group!(benches, bench_untraced, bench_traced, bench_show_args);
criterion_main!(benches);
