//! Benchmarks for lutlab operations.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use lutlab_lut::{
    Dimensionality, Domain, FormatHandler, Interpolation, Lut, LutFormat, ResampleOptions,
    WriteOptions,
};
use lutlab_transfer::{log_c, pq, srgb};

fn graded_cube(size: usize) -> Lut {
    let identity = Lut::identity(Dimensionality::ThreeD, size).unwrap();
    let lattice = identity
        .lattice()
        .unwrap()
        .iter()
        .map(|&[r, g, b]| [r.powf(0.9), 0.8 * g + 0.1 * b, b * b])
        .collect();
    Lut::three_d(size, lattice, [Domain::UNIT; 3]).unwrap()
}

/// Transfer functions behind the curve registry.
fn bench_transfer(c: &mut Criterion) {
    let mut group = c.benchmark_group("transfer");

    for size in [1024, 16384, 65536].iter() {
        let values: Vec<f32> = (0..*size).map(|i| i as f32 / *size as f32).collect();

        group.throughput(Throughput::Elements(*size as u64));

        group.bench_with_input(BenchmarkId::new("srgb_encode", size), &values, |b, v| {
            b.iter(|| v.iter().map(|&x| srgb::encode(black_box(x))).collect::<Vec<_>>())
        });

        group.bench_with_input(BenchmarkId::new("pq_encode", size), &values, |b, v| {
            b.iter(|| v.iter().map(|&x| pq::encode(black_box(x))).collect::<Vec<_>>())
        });

        group.bench_with_input(BenchmarkId::new("logc_decode", size), &values, |b, v| {
            b.iter(|| v.iter().map(|&x| log_c::decode(black_box(x))).collect::<Vec<_>>())
        });
    }

    group.finish();
}

/// Sampling registered curves into 1D LUTs.
fn bench_curve_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("curve_sample");

    for size in [1024, 4096, 65536].iter() {
        group.throughput(Throughput::Elements(*size as u64));

        group.bench_with_input(BenchmarkId::new("sRGB", size), size, |b, &n| {
            b.iter(|| lutlab_lut::sample(black_box("sRGB"), n, Domain::UNIT).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("LogC3", size), size, |b, &n| {
            b.iter(|| lutlab_lut::sample(black_box("LogC3"), n, Domain::UNIT).unwrap())
        });
    }

    group.finish();
}

/// 3D resampling, trilinear against tetrahedral.
fn bench_resample(c: &mut Criterion) {
    let mut group = c.benchmark_group("resample_3d");
    let source = graded_cube(17);

    for target in [17, 33, 65].iter() {
        group.throughput(Throughput::Elements((*target * *target * *target) as u64));

        for interpolation in [Interpolation::Trilinear, Interpolation::Tetrahedral] {
            let options = ResampleOptions { interpolation, domain: None };
            group.bench_with_input(
                BenchmarkId::new(interpolation.to_string(), target),
                target,
                |b, &n| b.iter(|| lutlab_lut::resample(black_box(&source), n, None, &options).unwrap()),
            );
        }
    }

    group.finish();
}

/// Parsing and serializing text formats.
fn bench_formats(c: &mut Criterion) {
    let mut group = c.benchmark_group("formats");

    for size in [17, 33].iter() {
        let lut = graded_cube(*size);
        let cube = LutFormat::Cube.write(&lut, &WriteOptions::default()).unwrap();
        let three_dl = LutFormat::ThreeDl.write(&lut, &WriteOptions::default()).unwrap();

        group.throughput(Throughput::Bytes(cube.len() as u64));

        group.bench_with_input(BenchmarkId::new("cube_parse", size), &cube, |b, bytes| {
            b.iter(|| LutFormat::Cube.read(black_box(bytes)).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("cube_write", size), &lut, |b, lut| {
            b.iter(|| LutFormat::Cube.write(black_box(lut), &WriteOptions::default()).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("3dl_parse", size), &three_dl, |b, bytes| {
            b.iter(|| LutFormat::ThreeDl.read(black_box(bytes)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_transfer,
    bench_curve_sampling,
    bench_resample,
    bench_formats,
);

criterion_main!(benches);
