//! Diagonal-only matrix storage.
//!
//! Only the main diagonal is materialized. Writing a non-zero value anywhere
//! else fails with [`LinalgError::Unsupported`]; zero writes are accepted and
//! ignored. Requests for a fully mutable sibling fall back to
//! [`SparseCompressedRow`].

use std::any::Any;

use crate::core::generic;
use crate::core::scalar::{Scalar, is_zero};
use crate::core::traits::{Extent, MatrixStorage, Origin, StorageFlags, VectorStorage, OUTSIDE_PATTERN};
use crate::error::LinalgError;
use crate::matrix::SparseCompressedRow;
use crate::vector::DenseVectorStorage;

#[derive(Debug, Clone, PartialEq)]
pub struct DiagonalStorage<T> {
    rows: usize,
    cols: usize,
    diagonal: Vec<T>,
}

impl<T: Scalar> DiagonalStorage<T> {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        DiagonalStorage { rows, cols, diagonal: vec![T::zero(); rows.min(cols)] }
    }

    /// Diagonal matrix with `diagonal` on its main diagonal.
    pub fn from_diagonal(rows: usize, cols: usize, diagonal: Vec<T>) -> Result<Self, LinalgError> {
        let len = rows.min(cols);
        if diagonal.len() != len {
            return Err(LinalgError::length("DiagonalStorage::from_diagonal", len, diagonal.len()));
        }
        Ok(DiagonalStorage { rows, cols, diagonal })
    }

    pub fn identity(order: usize) -> Self {
        DiagonalStorage { rows: order, cols: order, diagonal: vec![T::one(); order] }
    }

    pub fn diagonal(&self) -> &[T] {
        &self.diagonal
    }

    /// `y[i] = d[i] * x[i]` on the shared prefix, zero beyond it.
    fn scale_vector(&self, vector: &dyn VectorStorage<T>, result: &mut dyn VectorStorage<T>) -> Result<(), LinalgError> {
        let mut values = vec![T::zero(); result.len()];
        for (i, d) in self.diagonal.iter().enumerate() {
            values[i] = *d * vector.at(i);
        }
        generic::write_vector(result, &values)
    }
}

impl<T: Scalar> MatrixStorage<T> for DiagonalStorage<T> {
    fn row_count(&self) -> usize {
        self.rows
    }

    fn column_count(&self) -> usize {
        self.cols
    }

    fn flags(&self) -> StorageFlags {
        StorageFlags::DIAGONAL
    }

    fn is_mutable_at(&self, row: usize, col: usize) -> bool {
        row == col
    }

    fn at(&self, row: usize, col: usize) -> T {
        if row == col { self.diagonal[row] } else { T::zero() }
    }

    fn set_at(&mut self, row: usize, col: usize, value: T) -> Result<(), LinalgError> {
        if row == col {
            self.diagonal[row] = value;
            Ok(())
        } else if is_zero(value) {
            Ok(())
        } else {
            Err(LinalgError::Unsupported(OUTSIDE_PATTERN))
        }
    }

    fn clear(&mut self) {
        self.diagonal.fill(T::zero());
    }

    fn clear_region(&mut self, origin: Origin, extent: Extent) {
        let (r0, c0) = origin;
        for (i, d) in self.diagonal.iter_mut().enumerate() {
            if i >= r0 && i - r0 < extent.0 && i >= c0 && i - c0 < extent.1 {
                *d = T::zero();
            }
        }
    }

    fn enumerate_non_zero_indexed(&self) -> Box<dyn Iterator<Item = (usize, usize, T)> + '_> {
        Box::new(
            self.diagonal
                .iter()
                .enumerate()
                .filter(|(_, d)| !is_zero(**d))
                .map(|(i, d)| (i, i, *d)),
        )
    }

    fn clone_boxed(&self) -> Box<dyn MatrixStorage<T>> {
        Box::new(self.clone())
    }

    fn create_like(&self, rows: usize, cols: usize, fully_mutable: bool) -> Box<dyn MatrixStorage<T>> {
        if fully_mutable {
            Box::new(SparseCompressedRow::zeros(rows, cols))
        } else {
            Box::new(DiagonalStorage::zeros(rows, cols))
        }
    }

    fn create_vector_like(&self, len: usize, _fully_mutable: bool) -> Box<dyn VectorStorage<T>> {
        Box::new(DenseVectorStorage::zeros(len))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn do_multiply_vector(
        &self,
        vector: &dyn VectorStorage<T>,
        result: &mut dyn VectorStorage<T>,
    ) -> Result<(), LinalgError> {
        self.scale_vector(vector, result)
    }

    fn do_transpose_this_and_multiply_vector(
        &self,
        vector: &dyn VectorStorage<T>,
        result: &mut dyn VectorStorage<T>,
    ) -> Result<(), LinalgError> {
        self.scale_vector(vector, result)
    }
}
