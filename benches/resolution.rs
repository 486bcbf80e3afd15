use beancan::{
    ContainerBuilder, Export, Injectable, InjectionPoints, LibraryProvider, ProviderDescriptor,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;

static QUALIFIERS: [&str; 32] = [
    "b00", "b01", "b02", "b03", "b04", "b05", "b06", "b07", "b08", "b09", "b10", "b11", "b12",
    "b13", "b14", "b15", "b16", "b17", "b18", "b19", "b20", "b21", "b22", "b23", "b24", "b25",
    "b26", "b27", "b28", "b29", "b30", "b31",
];

// ===== Micro Benchmarks =====

fn bench_cached_hit(c: &mut Criterion) {
    struct Greeting(u64);

    let mut builder = ContainerBuilder::new();
    builder.register_provider(
        ProviderDescriptor::new("bench")
            .mark(LibraryProvider)
            .export(Export::of::<Greeting, _>(|_| Ok(Greeting(42)))),
    );
    let container = builder.build().unwrap();

    // Prime the cache
    let _ = container.get_bean::<Greeting>().unwrap();

    c.bench_function("cached_bean_hit", |b| {
        b.iter(|| {
            let v = container.get_bean::<Greeting>().unwrap();
            black_box(v.0);
        })
    });
}

fn bench_cold_resolution(c: &mut Criterion) {
    struct Expensive {
        data: Vec<u64>,
    }

    c.bench_function("cold_bean_first_request", |b| {
        b.iter_batched(
            || {
                let mut builder = ContainerBuilder::new();
                builder.register_provider(
                    ProviderDescriptor::new("bench")
                        .mark(LibraryProvider)
                        .export(Export::of::<Expensive, _>(|_| {
                            Ok(Expensive {
                                data: (0..1000).collect(),
                            })
                        })),
                );
                builder.build().unwrap()
            },
            |container| {
                let v = container.get_bean::<Expensive>().unwrap();
                black_box(v.data.len());
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench_dependency_chain(c: &mut Criterion) {
    struct S1;
    struct S2 {
        _p: Arc<S1>,
    }
    struct S3 {
        _p: Arc<S2>,
    }
    struct S4 {
        _p: Arc<S3>,
    }
    struct S5 {
        _p: Arc<S4>,
    }
    struct S6 {
        _p: Arc<S5>,
    }
    struct S7 {
        _p: Arc<S6>,
    }
    struct S8 {
        _p: Arc<S7>,
    }

    let mut builder = ContainerBuilder::new();
    builder.register_provider(
        ProviderDescriptor::new("chain")
            .mark(LibraryProvider)
            .export(Export::of::<S1, _>(|_| Ok(S1)))
            .export(Export::of::<S2, _>(|cx| Ok(S2 { _p: cx.get()? })).requires::<S1>())
            .export(Export::of::<S3, _>(|cx| Ok(S3 { _p: cx.get()? })).requires::<S2>())
            .export(Export::of::<S4, _>(|cx| Ok(S4 { _p: cx.get()? })).requires::<S3>())
            .export(Export::of::<S5, _>(|cx| Ok(S5 { _p: cx.get()? })).requires::<S4>())
            .export(Export::of::<S6, _>(|cx| Ok(S6 { _p: cx.get()? })).requires::<S5>())
            .export(Export::of::<S7, _>(|cx| Ok(S7 { _p: cx.get()? })).requires::<S6>())
            .export(Export::of::<S8, _>(|cx| Ok(S8 { _p: cx.get()? })).requires::<S7>()),
    );
    let container = builder.build().unwrap();

    // First request walks and builds the whole chain; afterwards it is one
    // cache hit, so the planner cost dominates here
    c.bench_function("chain_depth_8_cached", |b| {
        let _ = container.get_bean::<S8>().unwrap();
        b.iter(|| {
            let v = container.get_bean::<S8>().unwrap();
            black_box(&v);
        })
    });
}

fn bench_catalog_scaling(c: &mut Criterion) {
    struct Entry;

    let mut group = c.benchmark_group("catalog_scaling");

    // 8 stays on the linear-scan path, 32 spills into the hash map
    for &count in &[8usize, 32] {
        let mut builder = ContainerBuilder::new();
        let mut descriptor = ProviderDescriptor::new("wide").mark(LibraryProvider);
        for &q in QUALIFIERS.iter().take(count) {
            descriptor = descriptor.export(Export::of::<Entry, _>(|_| Ok(Entry)).qualified(q));
        }
        builder.register_provider(descriptor);
        let container = builder.build().unwrap();
        let _ = container.get_bean_qualified::<Entry>(QUALIFIERS[count - 1]);

        group.bench_with_input(BenchmarkId::new("lookup", count), &count, |b, &n| {
            b.iter(|| {
                let v = container
                    .get_bean_qualified::<Entry>(QUALIFIERS[n - 1])
                    .unwrap();
                black_box(&v);
            })
        });
    }

    group.finish();
}

fn bench_class_wiring(c: &mut Criterion) {
    struct Mailer;

    #[derive(Default)]
    struct Newsletter {
        mailer: Option<Arc<Mailer>>,
    }

    impl Injectable for Newsletter {
        fn inject(points: &mut InjectionPoints<Self>) {
            points.bean_setter::<Mailer>(|n, mailer| n.mailer = Some(mailer));
        }
    }

    let mut builder = ContainerBuilder::new();
    builder.register_provider(
        ProviderDescriptor::new("mail")
            .mark(LibraryProvider)
            .export(Export::of::<Mailer, _>(|_| Ok(Mailer))),
    );
    let container = builder.build().unwrap();
    let _ = container.get_instance::<Newsletter>().unwrap();

    c.bench_function("cached_class_hit", |b| {
        b.iter(|| {
            let v = container.get_instance::<Newsletter>().unwrap();
            black_box(v.mailer.is_some());
        })
    });
}

fn bench_contention(c: &mut Criterion) {
    struct Hot(u64);

    let mut group = c.benchmark_group("contention");

    let mut builder = ContainerBuilder::new();
    builder.register_provider(
        ProviderDescriptor::new("hot")
            .mark(LibraryProvider)
            .export(Export::of::<Hot, _>(|_| Ok(Hot(7)))),
    );
    let container = builder.build().unwrap();
    let _ = container.get_bean::<Hot>().unwrap();

    for &thread_count in &[1, 2, 4, 8] {
        group.bench_with_input(
            BenchmarkId::new("cached_hit_threads", thread_count),
            &thread_count,
            |b, &threads| {
                b.iter_custom(|iters| {
                    let start = std::time::Instant::now();
                    crossbeam_utils::thread::scope(|s| {
                        for _ in 0..threads {
                            let container = &container;
                            s.spawn(move |_| {
                                for _ in 0..iters / threads as u64 {
                                    let v = container.get_bean::<Hot>().unwrap();
                                    black_box(v.0);
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

fn bench_bootstrap(c: &mut Criterion) {
    struct Entry;

    let mut group = c.benchmark_group("bootstrap");

    for &count in &[4usize, 16, 32] {
        group.bench_with_input(BenchmarkId::new("scan_and_build", count), &count, |b, &n| {
            b.iter(|| {
                let mut builder = ContainerBuilder::new();
                let mut descriptor = ProviderDescriptor::new("wide").mark(LibraryProvider);
                for &q in QUALIFIERS.iter().take(n) {
                    descriptor =
                        descriptor.export(Export::of::<Entry, _>(|_| Ok(Entry)).qualified(q));
                }
                builder.register_provider(descriptor);
                let container = builder.build().unwrap();
                black_box(&container);
            })
        });
    }

    group.finish();
}

criterion_group!(
    micro_benches,
    bench_cached_hit,
    bench_cold_resolution,
    bench_dependency_chain,
    bench_catalog_scaling,
    bench_class_wiring,
    bench_contention
);

criterion_group!(macro_benches, bench_bootstrap);

criterion_main!(micro_benches, macro_benches);
