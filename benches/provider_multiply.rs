use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use linkern::{Matrix, ProviderKind, Settings, Vector, set_settings};

fn bench_multiply(c: &mut Criterion) {
    let mut group = c.benchmark_group("dense multiply");
    for n in [32usize, 128, 256] {
        let a = Matrix::dense_from_fn(n, n, |i, j| ((i * n + j) as f64).sin());
        let b = Matrix::dense_from_fn(n, n, |i, j| ((i + j) as f64).cos());
        for provider in [ProviderKind::Managed, ProviderKind::Faer] {
            set_settings(Settings { provider, ..Settings::default() });
            group.bench_with_input(BenchmarkId::new(format!("{provider:?}"), n), &n, |ben, _| {
                ben.iter(|| black_box(&a).multiply(black_box(&b)).unwrap())
            });
        }
    }
    group.finish();
    set_settings(Settings::default());
}

fn bench_sparse_vector(c: &mut Criterion) {
    let n = 20_000;
    let mut row_ptr = vec![0];
    let mut col_idx = Vec::new();
    for i in 0..n {
        col_idx.extend(i.saturating_sub(1)..(i + 2).min(n));
        row_ptr.push(col_idx.len());
    }
    let values = vec![1.0; col_idx.len()];
    let a = Matrix::sparse_from_csr(n, n, row_ptr, col_idx, values).unwrap();
    let x = Vector::dense_from_fn(n, |i| i as f64);
    c.bench_function("sparse tridiagonal matvec", |ben| {
        ben.iter(|| black_box(&a).multiply_vector(black_box(&x)).unwrap())
    });
}

criterion_group!(benches, bench_multiply, bench_sparse_vector);
criterion_main!(benches);
