//! Benchmarks for streaming indicators.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use trading_indicators::{StreamingEma, StreamingIndicator, StreamingSma};

fn generate_test_data(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| 100.0 + (i as f64 * 0.1).sin() * 10.0)
        .collect()
}

fn run(indicator: &mut dyn StreamingIndicator, data: &[f64]) -> Option<f64> {
    indicator.reset();
    for &value in data {
        indicator.update(value);
    }
    indicator.current()
}

fn benchmark_moving_averages(c: &mut Criterion) {
    let mut group = c.benchmark_group("moving_average");

    for size in [1000, 10000, 100000].iter() {
        let data = generate_test_data(*size);

        group.bench_with_input(BenchmarkId::new("sma", size), &data, |b, data| {
            let mut sma = StreamingSma::new(20);
            b.iter(|| run(&mut sma, black_box(data)))
        });

        group.bench_with_input(BenchmarkId::new("ema", size), &data, |b, data| {
            let mut ema = StreamingEma::new(20);
            b.iter(|| run(&mut ema, black_box(data)))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_moving_averages);
criterion_main!(benches);
