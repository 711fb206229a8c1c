use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use pvalplot::plot::linspace;
use pvalplot::{Density, GaussianKde, ReflectingKde, TransformingKde, parsing};
use std::hint::black_box;
use std::io::Write as IoWrite;
use tempfile::NamedTempFile;

/// Evenly stratified p-values, strictly inside (0, 1).
fn pvalues(n: usize) -> Vec<f64> {
    (0..n).map(|i| (i as f64 + 0.5) / n as f64).collect()
}

fn generate_test_file(n: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for v in pvalues(n) {
        writeln!(file, "{}", v).unwrap();
    }
    file.flush().unwrap();
    file
}

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");

    for size in [1_000, 10_000, 100_000, 1_000_000] {
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("read_file_mmap", size), &size, |b, &size| {
            let temp_file = generate_test_file(size);
            b.iter(|| {
                let file = temp_file.reopen().unwrap();
                black_box(parsing::read_file_mmap(&file).unwrap())
            });
        });
    }

    group.finish();
}

fn bench_kde(c: &mut Criterion) {
    let mut group = c.benchmark_group("kde");

    for size in [1_000, 10_000, 100_000] {
        let data = pvalues(size);

        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("gaussian_new", size), &data, |b, data| {
            b.iter(|| black_box(GaussianKde::new(black_box(data)).unwrap()));
        });

        let kde = GaussianKde::new(&data).unwrap();
        group.bench_with_input(BenchmarkId::new("gaussian_pdf", size), &kde, |b, kde| {
            b.iter(|| black_box(kde.pdf(black_box(0.5))));
        });
    }

    group.finish();
}

fn bench_bounded(c: &mut Criterion) {
    let mut group = c.benchmark_group("bounded");
    // The grid a density chart evaluates
    let grid = linspace(-0.25, 1.25, 500);
    let open_grid: Vec<f64> = grid.iter().copied().filter(|&x| x > 0.0 && x < 1.0).collect();

    for size in [1_000, 10_000, 100_000] {
        let data = pvalues(size);

        group.throughput(Throughput::Elements(size as u64));

        let reflecting = ReflectingKde::new(&data).unwrap();
        group.bench_with_input(
            BenchmarkId::new("reflect_500_points", size),
            &reflecting,
            |b, kde| b.iter(|| black_box(kde.pdf_many(&grid))),
        );

        let transforming = TransformingKde::with_bounds(&data, 0.0, 1.0).unwrap();
        group.bench_with_input(
            BenchmarkId::new("logit_500_points", size),
            &transforming,
            |b, kde| b.iter(|| black_box(kde.pdf_many(&open_grid))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_parsing, bench_kde, bench_bounded);
criterion_main!(benches);
