//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::sync::{Mutex, MutexGuard};

use linkern::Matrix;
use rand::SeedableRng;
use rand::distributions::Uniform;
use rand::rngs::StdRng;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

static SETTINGS_LOCK: Mutex<()> = Mutex::new(());

/// Serializes tests that change the process-wide settings or the
/// `LINKERN_*` environment. Hold the guard for the whole test.
pub fn settings_guard() -> MutexGuard<'static, ()> {
    SETTINGS_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Random dense matrix with roughly a third of its entries zeroed.
pub fn patterned(rows: usize, cols: usize, seed: u64) -> Matrix<f64> {
    let mut rng = rng(seed);
    let values = Matrix::random(rows, cols, &Uniform::new(-4.0, 4.0), &mut rng);
    Matrix::dense_from_fn(rows, cols, |i, j| {
        let v = values.at(i, j).unwrap();
        if (i + 2 * j) % 3 == 0 { 0.0 } else { v }
    })
}

/// The same values held by a dense and by a sparse matrix.
pub fn both_representations(rows: usize, cols: usize, seed: u64) -> (Matrix<f64>, Matrix<f64>) {
    let dense = patterned(rows, cols, seed);
    let sparse = Matrix::sparse_from_rows(rows, cols, &dense.to_row_major_vec()).unwrap();
    (dense, sparse)
}

pub fn assert_close(a: &Matrix<f64>, b: &Matrix<f64>, epsilon: f64) {
    assert_eq!(a.shape(), b.shape());
    for (x, y) in a.enumerate().zip(b.enumerate()) {
        approx::assert_abs_diff_eq!(x, y, epsilon = epsilon);
    }
}
