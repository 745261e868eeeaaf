//! A user-defined representation only supplies the primitive accessors; every
//! operation must still work through the generic hooks.

mod common;

use std::any::Any;

use common::assert_close;
use linkern::{
    DenseVectorStorage, Extent, LinalgError, Matrix, MatrixStorage, Origin, Permutation, StorageFlags, Vector,
    VectorStorage,
};

/// Row-major buffer: fully mutable but without a column-major view.
#[derive(Debug, Clone)]
struct RowMajor {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl RowMajor {
    fn zeros(rows: usize, cols: usize) -> Self {
        RowMajor { rows, cols, data: vec![0.0; rows * cols] }
    }

    fn from_matrix(m: &Matrix<f64>) -> Matrix<f64> {
        let (rows, cols) = m.shape();
        Matrix::from_storage(Box::new(RowMajor { rows, cols, data: m.to_row_major_vec() }))
    }
}

impl MatrixStorage<f64> for RowMajor {
    fn row_count(&self) -> usize {
        self.rows
    }

    fn column_count(&self) -> usize {
        self.cols
    }

    fn flags(&self) -> StorageFlags {
        StorageFlags::FULLY_MUTABLE
    }

    fn at(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    fn set_at(&mut self, row: usize, col: usize, value: f64) -> Result<(), LinalgError> {
        self.data[row * self.cols + col] = value;
        Ok(())
    }

    fn clear(&mut self) {
        self.data.fill(0.0);
    }

    fn clear_region(&mut self, origin: Origin, extent: Extent) {
        for i in origin.0..origin.0 + extent.0 {
            for j in origin.1..origin.1 + extent.1 {
                self.data[i * self.cols + j] = 0.0;
            }
        }
    }

    fn clone_boxed(&self) -> Box<dyn MatrixStorage<f64>> {
        Box::new(self.clone())
    }

    fn create_like(&self, rows: usize, cols: usize, _fully_mutable: bool) -> Box<dyn MatrixStorage<f64>> {
        Box::new(RowMajor::zeros(rows, cols))
    }

    fn create_vector_like(&self, len: usize, _fully_mutable: bool) -> Box<dyn VectorStorage<f64>> {
        Box::new(DenseVectorStorage::zeros(len))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A storage that implements only element access gets correct arithmetic from the default hooks.
#[test]
fn generic_hooks_match_dense() {
    common::init_logging();
    let a = common::patterned(4, 3, 31);
    let b = common::patterned(3, 5, 32);
    let (ra, rb) = (RowMajor::from_matrix(&a), RowMajor::from_matrix(&b));

    let product = ra.multiply(&rb).unwrap();
    assert!(product.storage().as_any().is::<RowMajor>());
    assert_close(&product, &a.multiply(&b).unwrap(), 1e-12);
    assert_close(&ra.transpose_this_and_multiply(&ra).unwrap(), &a.transpose_this_and_multiply(&a).unwrap(), 1e-12);
    assert_close(&ra.transpose_and_multiply(&ra).unwrap(), &a.transpose_and_multiply(&a).unwrap(), 1e-12);
    assert_eq!(ra.add(&ra).unwrap(), a.multiply_scalar(2.0).unwrap());
    assert_eq!(ra.negate().unwrap(), a.negate().unwrap());
    assert_eq!(ra.transpose(), a.transpose());
    assert_eq!(ra.kronecker_product(&rb).unwrap(), a.kronecker_product(&b).unwrap());

    let x = Vector::dense_from_fn(3, |i| i as f64 + 1.0);
    assert_eq!(ra.multiply_vector(&x).unwrap(), a.multiply_vector(&x).unwrap());
}

/// Structural operations work on the same user-defined storage.
#[test]
fn composition_through_element_access() {
    let a = common::patterned(3, 3, 40);
    let mut r = RowMajor::from_matrix(&a);
    let p = Permutation::new(vec![1, 2, 0]).unwrap();
    let mut expected = a.clone();
    expected.permute_rows(&p).unwrap();
    r.permute_rows(&p).unwrap();
    assert_eq!(r, expected);

    let block = r.sub_matrix(1, 2, 0, 2).unwrap();
    assert!(block.storage().as_any().is::<RowMajor>());
    assert_eq!(block, expected.sub_matrix(1, 2, 0, 2).unwrap());
    assert_eq!(r.upper_triangle().unwrap(), expected.upper_triangle().unwrap());
}
