//! Benchmarks for rasterlab operations.
//!
//! Run with: `cargo bench -p rasterlab-bench`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

use rasterlab_core::PixelBuffer;
use rasterlab_ops::catalog::{self, SharpenOrder, SmoothingMode, Strength};
use rasterlab_ops::filter::{Kernel, convolve};
use rasterlab_ops::histogram::{histogram, render};
use rasterlab_ops::point;
use rasterlab_ops::resize::resize;

const SIZES: [u32; 3] = [256, 512, 1024];

/// Gradient with a diagonal stripe pattern, alpha varying by row.
fn test_image(size: u32) -> PixelBuffer {
    PixelBuffer::from_fn(size, size, |x, y| {
        let stripe = if (x + y) / 8 % 2 == 0 { 40 } else { 0 };
        [
            (x * 255 / size) as u8,
            (y * 255 / size) as u8,
            (((x ^ y) & 0xff) as u8).saturating_add(stripe),
            (255 - (y & 0x3f)) as u8,
        ]
    })
    .unwrap()
}

/// Benchmark raw convolution with increasing repeat counts.
fn bench_convolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("convolve");
    let kernel = Kernel::weighted();

    for size in SIZES {
        let img = test_image(size);
        group.throughput(Throughput::Elements(size as u64 * size as u64));

        for repeat in 1..=3u32 {
            group.bench_with_input(
                BenchmarkId::new(format!("weighted_x{}", repeat), size),
                &img,
                |b, img| b.iter(|| convolve(black_box(img), &kernel, 1.0 / 16.0, 0.0, repeat)),
            );
        }
    }

    group.finish();
}

/// Benchmark catalog filters at medium strength.
fn bench_catalog(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalog");
    let img = test_image(512);
    group.throughput(Throughput::Elements(512 * 512));

    group.bench_function("smooth_mean", |b| {
        b.iter(|| catalog::smooth(black_box(&img), SmoothingMode::Mean, Strength::Medium))
    });
    group.bench_function("sharpen_first", |b| {
        b.iter(|| catalog::sharpen(black_box(&img), SharpenOrder::First, Strength::Medium))
    });
    group.bench_function("sharpen_second", |b| {
        b.iter(|| catalog::sharpen(black_box(&img), SharpenOrder::Second, Strength::Medium))
    });
    group.bench_function("laplacian_edge", |b| {
        b.iter(|| catalog::laplacian_edge(black_box(&img)))
    });

    group.finish();
}

/// Benchmark point transforms.
fn bench_point(c: &mut Criterion) {
    let mut group = c.benchmark_group("point");

    for size in SIZES {
        let img = test_image(size);
        group.throughput(Throughput::Elements(size as u64 * size as u64));

        group.bench_with_input(BenchmarkId::new("negative", size), &img, |b, img| {
            b.iter(|| point::negative(black_box(img)))
        });
        group.bench_with_input(BenchmarkId::new("threshold", size), &img, |b, img| {
            b.iter(|| point::threshold(black_box(img), 150))
        });
        group.bench_with_input(BenchmarkId::new("gamma_2.2", size), &img, |b, img| {
            b.iter(|| point::gamma_transform(black_box(img), 2.2))
        });
        group.bench_with_input(BenchmarkId::new("log", size), &img, |b, img| {
            b.iter(|| point::log_transform(black_box(img)))
        });
    }

    group.finish();
}

/// Benchmark nearest-neighbor resize (2x up, 2x down).
fn bench_resize(c: &mut Criterion) {
    let mut group = c.benchmark_group("resize");
    let img = test_image(512);

    group.bench_function("up_1024", |b| b.iter(|| resize(black_box(&img), 1024, 1024)));
    group.bench_function("down_256", |b| b.iter(|| resize(black_box(&img), 256, 256)));

    group.finish();
}

/// Benchmark histogram accumulation and chart rendering.
fn bench_histogram(c: &mut Criterion) {
    let mut group = c.benchmark_group("histogram");

    for size in SIZES {
        let img = test_image(size);
        group.throughput(Throughput::Elements(size as u64 * size as u64));
        group.bench_with_input(BenchmarkId::new("count", size), &img, |b, img| {
            b.iter(|| histogram(black_box(img)))
        });
    }

    let hist = histogram(&test_image(512));
    group.bench_function("render_800x240", |b| b.iter(|| render(black_box(&hist), 800, 240)));

    group.finish();
}

criterion_group!(
    benches,
    bench_convolve,
    bench_catalog,
    bench_point,
    bench_resize,
    bench_histogram
);
criterion_main!(benches);
