use contrast_scan::estimation::{evaluate_all_sequential, HierarchicalEstimator};
use contrast_scan::{evaluate_all, Estimator, EstimatorConfig};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{Rgb, RgbImage};
use palette::Srgb;

/// Text-like capture: dark bars over a soft vertical gradient
fn synthetic_capture(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let in_line = (y % 24) >= 6 && (y % 24) < 18;
        if in_line && (x % 7) < 3 {
            Rgb([25, 25, 30])
        } else {
            let shade = 200 + (y * 40 / height.max(1)) as u8;
            Rgb([shade, shade, 245])
        }
    })
}

fn benchmark_estimators(c: &mut Criterion) {
    let image = synthetic_capture(320, 96);
    let foreground = Srgb::new(25, 25, 30);
    let config = EstimatorConfig::default();

    let mut group = c.benchmark_group("estimators");
    for estimator in Estimator::ALL {
        group.bench_with_input(
            BenchmarkId::from_parameter(estimator.id()),
            &estimator,
            |b, estimator| b.iter(|| estimator.estimate(black_box(&image), foreground, &config)),
        );
    }
    group.finish();
}

fn benchmark_batch(c: &mut Criterion) {
    let image = synthetic_capture(320, 96);
    let foreground = Srgb::new(25, 25, 30);
    let config = EstimatorConfig::default();

    c.bench_function("evaluate_all_parallel", |b| {
        b.iter(|| evaluate_all(black_box(&image), foreground, &config))
    });
    c.bench_function("evaluate_all_sequential", |b| {
        b.iter(|| evaluate_all_sequential(black_box(&image), foreground, &config))
    });
}

fn benchmark_coarse_histogram(c: &mut Criterion) {
    let image = synthetic_capture(640, 192);
    let estimator = HierarchicalEstimator::new();
    c.bench_function("hierarchical_coarse_level", |b| {
        b.iter(|| estimator.coarse_level(black_box(&image)))
    });
}

criterion_group!(
    benches,
    benchmark_estimators,
    benchmark_batch,
    benchmark_coarse_histogram
);
criterion_main!(benches);
