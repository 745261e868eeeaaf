//! Storage-agnostic matrix.
//!
//! [`Matrix`] owns a boxed [`MatrixStorage`]. Public methods validate shapes
//! and indices, handle the scalar identities, then dispatch to the storage's
//! unchecked `do_*` hooks. Composition (`compose`) and derived properties
//! (`properties`) are written purely against element access, rows, columns
//! and sub-matrices, so they work for any representation.

mod arithmetic;
mod compose;
pub mod dense;
pub mod diagonal;
mod ops;
mod properties;
pub mod sparse;
pub mod square;

pub use compose::{Columns, Rows};
pub use dense::DenseColumnMajor;
pub use diagonal::DiagonalStorage;
pub use sparse::SparseCompressedRow;
pub use square::SquareMatrix;

use std::hash::{Hash, Hasher};

use rand::Rng;
use rand::distributions::Distribution;

use crate::core::generic;
use crate::core::scalar::Scalar;
use crate::core::traits::MatrixStorage;
use crate::error::LinalgError;
use crate::parallel;
use crate::vector::Vector;

/// Number of leading column-major elements folded into the hash.
const HASH_PREFIX: usize = 25;

#[derive(Debug)]
pub struct Matrix<T: Scalar> {
    storage: Box<dyn MatrixStorage<T>>,
}

impl<T: Scalar> Matrix<T> {
    /// Wrap a storage. User-defined representations enter here.
    pub fn from_storage(storage: Box<dyn MatrixStorage<T>>) -> Self {
        Matrix { storage }
    }

    pub fn dense(rows: usize, cols: usize) -> Self {
        Self::from_storage(Box::new(DenseColumnMajor::zeros(rows, cols)))
    }

    pub fn dense_from_column_major(rows: usize, cols: usize, values: Vec<T>) -> Result<Self, LinalgError> {
        Ok(Self::from_storage(Box::new(DenseColumnMajor::from_column_major(rows, cols, values)?)))
    }

    /// Dense matrix from row-major `values`.
    pub fn dense_from_rows(rows: usize, cols: usize, values: &[T]) -> Result<Self, LinalgError> {
        if values.len() != rows * cols {
            return Err(LinalgError::length("Matrix::dense_from_rows", rows * cols, values.len()));
        }
        Ok(Self::dense_from_fn(rows, cols, |i, j| values[i * cols + j]))
    }

    pub fn dense_from_fn(rows: usize, cols: usize, f: impl Fn(usize, usize) -> T) -> Self {
        Self::from_storage(Box::new(DenseColumnMajor::from_fn(rows, cols, f)))
    }

    pub fn dense_identity(order: usize) -> Self {
        Self::dense_from_fn(order, order, |i, j| if i == j { T::one() } else { T::zero() })
    }

    pub fn sparse(rows: usize, cols: usize) -> Self {
        Self::from_storage(Box::new(SparseCompressedRow::zeros(rows, cols)))
    }

    /// Sparse matrix keeping the non-zero entries of row-major `values`.
    pub fn sparse_from_rows(rows: usize, cols: usize, values: &[T]) -> Result<Self, LinalgError> {
        if values.len() != rows * cols {
            return Err(LinalgError::length("Matrix::sparse_from_rows", rows * cols, values.len()));
        }
        Ok(Self::from_storage(Box::new(SparseCompressedRow::from_fn(rows, cols, |i, j| {
            values[i * cols + j]
        }))))
    }

    pub fn sparse_from_csr(
        rows: usize,
        cols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self, LinalgError> {
        let storage = SparseCompressedRow::from_csr(rows, cols, row_ptr, col_idx, values)?;
        Ok(Self::from_storage(Box::new(storage)))
    }

    pub fn sparse_identity(order: usize) -> Self {
        Self::from_storage(Box::new(SparseCompressedRow::from_fn(order, order, |i, j| {
            if i == j { T::one() } else { T::zero() }
        })))
    }

    pub fn diagonal(rows: usize, cols: usize) -> Self {
        Self::from_storage(Box::new(DiagonalStorage::zeros(rows, cols)))
    }

    pub fn diagonal_from_slice(rows: usize, cols: usize, diagonal: &[T]) -> Result<Self, LinalgError> {
        let storage = DiagonalStorage::from_diagonal(rows, cols, diagonal.to_vec())?;
        Ok(Self::from_storage(Box::new(storage)))
    }

    pub fn diagonal_identity(order: usize) -> Self {
        Self::from_storage(Box::new(DiagonalStorage::identity(order)))
    }

    /// Dense matrix of samples drawn from `distribution`, column by column.
    pub fn random<D: Distribution<T>, R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        distribution: &D,
        rng: &mut R,
    ) -> Self {
        let values = crate::utils::random::sample(rows * cols, distribution, rng);
        Self::from_storage(Box::new(DenseColumnMajor::from_parts(rows, cols, values)))
    }

    pub fn row_count(&self) -> usize {
        self.storage.row_count()
    }

    pub fn column_count(&self) -> usize {
        self.storage.column_count()
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.row_count(), self.column_count())
    }

    pub fn is_square(&self) -> bool {
        self.row_count() == self.column_count()
    }

    pub fn storage(&self) -> &dyn MatrixStorage<T> {
        &*self.storage
    }

    fn check_cell(&self, row: usize, col: usize) -> Result<(), LinalgError> {
        if row >= self.row_count() {
            return Err(LinalgError::IndexOutOfRange { index: row, bound: self.row_count() });
        }
        if col >= self.column_count() {
            return Err(LinalgError::IndexOutOfRange { index: col, bound: self.column_count() });
        }
        Ok(())
    }

    pub fn at(&self, row: usize, col: usize) -> Result<T, LinalgError> {
        self.check_cell(row, col)?;
        Ok(self.storage.at(row, col))
    }

    pub fn set_at(&mut self, row: usize, col: usize, value: T) -> Result<(), LinalgError> {
        self.check_cell(row, col)?;
        self.storage.set_at(row, col, value)
    }

    /// Zero matrix of the same representation.
    pub fn create_matrix(&self, rows: usize, cols: usize) -> Matrix<T> {
        self.create_matrix_with(rows, cols, false)
    }

    /// Zero matrix from this matrix's factory; `fully_mutable` asks for a
    /// representation able to hold any value.
    pub fn create_matrix_with(&self, rows: usize, cols: usize, fully_mutable: bool) -> Matrix<T> {
        Matrix::from_storage(self.storage.create_like(rows, cols, fully_mutable))
    }

    /// Zero vector whose representation matches this matrix's.
    pub fn create_vector(&self, len: usize) -> Vector<T> {
        Vector::from_storage(self.storage.create_vector_like(len, false))
    }

    pub fn clear(&mut self) {
        self.storage.clear();
    }

    /// Copy every element into a same-shape `target`.
    pub fn copy_to(&self, target: &mut Matrix<T>) -> Result<(), LinalgError> {
        if target.shape() != self.shape() {
            return Err(LinalgError::shape("Matrix::copy_to", self.shape(), target.shape()));
        }
        self.storage.copy_to(&mut *target.storage, false)
    }

    /// Overwrite every element from column-major `values`.
    pub fn assign_column_major(&mut self, values: &[T]) -> Result<(), LinalgError> {
        let len = self.row_count() * self.column_count();
        if values.len() != len {
            return Err(LinalgError::length("Matrix::assign_column_major", len, values.len()));
        }
        if let Some(dst) = self.storage.as_column_major_slice_mut() {
            parallel::assign(dst, values);
            return Ok(());
        }
        generic::write_matrix(&mut *self.storage, values)
    }

    /// Every element, column after column.
    pub fn to_column_major_vec(&self) -> Vec<T> {
        if let Some(slice) = self.storage.as_column_major_slice() {
            return slice.to_vec();
        }
        let rows = self.row_count();
        let storage = &*self.storage;
        parallel::collect(rows * self.column_count(), |k| storage.at(k % rows, k / rows))
    }

    /// Every element, row after row.
    pub fn to_row_major_vec(&self) -> Vec<T> {
        let cols = self.column_count();
        let storage = &*self.storage;
        parallel::collect(self.row_count() * cols, |k| storage.at(k / cols, k % cols))
    }

    /// Every element in column-major order.
    pub fn enumerate(&self) -> impl Iterator<Item = T> + '_ {
        self.storage.enumerate()
    }

    /// Every element with its `(row, col)`, column-major.
    pub fn enumerate_indexed(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        self.storage.enumerate_indexed()
    }

    /// Stored elements with coordinates; sparse and diagonal matrices skip zeros.
    pub fn enumerate_non_zero_indexed(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        self.storage.enumerate_non_zero_indexed()
    }

    /// New matrix holding column-major `values`, preferring this family.
    /// Falls back to dense when the family cannot hold the pattern.
    pub(crate) fn materialize(&self, rows: usize, cols: usize, values: Vec<T>) -> Matrix<T> {
        let mut storage = self.storage.create_like(rows, cols, false);
        match generic::write_matrix(&mut *storage, &values) {
            Ok(()) => Matrix::from_storage(storage),
            Err(err) => {
                log::trace!("materializing {rows}x{cols} result as dense: {err}");
                Matrix::from_storage(Box::new(DenseColumnMajor::from_parts(rows, cols, values)))
            }
        }
    }
}

impl<T: Scalar> Clone for Matrix<T> {
    fn clone(&self) -> Self {
        Matrix { storage: self.storage.clone_boxed() }
    }
}

impl<T: Scalar> PartialEq for Matrix<T> {
    fn eq(&self, other: &Self) -> bool {
        self.storage.storage_eq(&*other.storage)
    }
}

impl<T: Scalar> Hash for Matrix<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.row_count());
        state.write_usize(self.column_count());
        for v in self.enumerate().take(HASH_PREFIX) {
            (v + T::zero()).hash_bits(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(m: &Matrix<f64>) -> u64 {
        let mut h = DefaultHasher::new();
        m.hash(&mut h);
        h.finish()
    }

    #[test]
    fn row_major_construction() {
        let m = Matrix::dense_from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(m.at(1, 0).unwrap(), 4.0);
        assert_eq!(m.to_column_major_vec(), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
        assert_eq!(m.to_row_major_vec(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert!(Matrix::dense_from_rows(2, 2, &[1.0]).is_err());
    }

    #[test]
    fn equality_and_hash_ignore_representation() {
        let values = [1.0, 0.0, 0.0, -0.0];
        let d = Matrix::dense_from_rows(2, 2, &values).unwrap();
        let s = Matrix::sparse_from_rows(2, 2, &values).unwrap();
        let g = Matrix::diagonal_from_slice(2, 2, &[1.0, 0.0]).unwrap();
        assert_eq!(d, s);
        assert_eq!(d, g);
        assert_eq!(hash_of(&d), hash_of(&s));
        assert_eq!(hash_of(&d), hash_of(&g));
    }

    #[test]
    fn checked_cells() {
        let mut m = Matrix::<f64>::diagonal(2, 2);
        assert!(matches!(m.at(2, 0), Err(LinalgError::IndexOutOfRange { .. })));
        assert!(matches!(m.set_at(0, 1, 1.0), Err(LinalgError::Unsupported(_))));
        m.set_at(1, 1, 4.0).unwrap();
        assert_eq!(m.at(1, 1).unwrap(), 4.0);
    }

    #[test]
    fn assign_column_major_respects_pattern() {
        let mut g = Matrix::<f64>::diagonal(2, 2);
        assert!(g.assign_column_major(&[1.0, 1.0, 0.0, 2.0]).is_err());
        assert_eq!(g, Matrix::diagonal(2, 2));
        g.assign_column_major(&[1.0, 0.0, 0.0, 2.0]).unwrap();
        assert_eq!(g.at(1, 1).unwrap(), 2.0);
    }

    #[test]
    fn factories_follow_family() {
        let s = Matrix::<f64>::sparse(2, 2);
        assert!(!s.create_matrix(3, 3).storage().is_dense());
        let g = Matrix::<f64>::diagonal(2, 2);
        assert!(g.create_matrix_with(2, 2, true).storage().is_fully_mutable());
        assert!(Matrix::<f64>::dense(1, 1).create_vector(4).storage().is_dense());
    }

    #[test]
    fn random_fill_uses_distribution() {
        use rand::SeedableRng;
        use rand::distributions::Uniform;
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let m = Matrix::random(3, 4, &Uniform::new(-1.0, 1.0), &mut rng);
        assert_eq!(m.shape(), (3, 4));
        assert!(m.enumerate().all(|v| (-1.0..1.0).contains(&v)));
    }
}
