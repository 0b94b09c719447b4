//! Criterion benchmarks for the prediction hot paths.
//!
//! Run with: cargo bench --bench prediction_benchmark

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;
use zenvp8::{MbMode, MotionVector, Raster};

fn make_raster(width: usize, height: usize) -> Raster {
    let mut raster = Raster::new(width, height).unwrap();
    for row in 0..raster.y().height() {
        for column in 0..raster.y().width() {
            raster
                .y_mut()
                .put(column, row, ((column * 7 + row * 13) & 0xff) as u8);
        }
    }
    raster
}

fn bench_intra(c: &mut Criterion) {
    let mut group = c.benchmark_group("intra_16x16");
    group.throughput(Throughput::Bytes(16 * 16));

    for (name, mode) in [
        ("dc", MbMode::DC),
        ("vertical", MbMode::V),
        ("true_motion", MbMode::TM),
    ] {
        group.bench_function(name, |b| {
            let mut raster = make_raster(640, 480);
            let mb = raster.macroblock(10, 10);
            b.iter(|| {
                mb.y.intra_predict(black_box(raster.y_mut()), black_box(mode));
            });
        });
    }
    group.finish();
}

fn bench_inter(c: &mut Criterion) {
    let mut group = c.benchmark_group("inter_16x16");
    group.throughput(Throughput::Bytes(16 * 16));

    let reference = make_raster(640, 480);
    for (name, mb_at, mv) in [
        ("integer", (10, 10), MotionVector::new(8, -16)),
        ("half_pel", (10, 10), MotionVector::new(4, 4)),
        ("eighth_pel", (10, 10), MotionVector::new(3, -5)),
        // window pushed past the frame origin
        ("edge_extended", (0, 0), MotionVector::new(-20, -20)),
    ] {
        group.bench_function(name, |b| {
            let mut raster = make_raster(640, 480);
            let mb = raster.macroblock(mb_at.0, mb_at.1);
            b.iter(|| {
                mb.y.safe_inter_predict(
                    black_box(raster.y_mut()),
                    black_box(mv),
                    black_box(reference.y()),
                );
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_intra, bench_inter);
criterion_main!(benches);
