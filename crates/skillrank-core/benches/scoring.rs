use criterion::{black_box, criterion_group, criterion_main, Criterion};

use skillrank_core::model::Point;
use skillrank_core::results::ResultSummary;
use skillrank_core::scoring::{evaluate_circle_accuracy, final_drawing_score, final_mash_score};

fn wobbly_circle(n: usize, radius: f64) -> Vec<Point> {
    (0..n)
        .map(|i| {
            let a = std::f64::consts::TAU * i as f64 / n as f64;
            let r = radius + 0.05 * radius * (5.0 * a).sin();
            Point::new(r * a.cos(), r * a.sin())
        })
        .collect()
}

fn bench_circle_accuracy(c: &mut Criterion) {
    let mut group = c.benchmark_group("circle_accuracy");

    let small = wobbly_circle(100, 3.0);
    let typical = wobbly_circle(400, 3.0);
    let large = wobbly_circle(5_000, 3.0);
    let too_few = wobbly_circle(39, 3.0);

    group.bench_function("100_points", |b| {
        b.iter(|| evaluate_circle_accuracy(black_box(&small)))
    });

    group.bench_function("400_points", |b| {
        b.iter(|| evaluate_circle_accuracy(black_box(&typical)))
    });

    group.bench_function("5000_points", |b| {
        b.iter(|| evaluate_circle_accuracy(black_box(&large)))
    });

    group.bench_function("below_threshold", |b| {
        b.iter(|| evaluate_circle_accuracy(black_box(&too_few)))
    });

    group.bench_function("final_with_bonus", |b| {
        b.iter(|| final_drawing_score(black_box(&typical), black_box(12.5)))
    });

    group.finish();
}

fn bench_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregation");

    group.bench_function("mash_score", |b| {
        b.iter(|| final_mash_score(black_box(29), black_box(0.5)))
    });

    group.bench_function("result_summary", |b| {
        b.iter(|| ResultSummary::compute(black_box(80), black_box(60), black_box(67)))
    });

    group.finish();
}

criterion_group!(benches, bench_circle_accuracy, bench_aggregation);
criterion_main!(benches);
