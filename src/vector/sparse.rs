//! Sparse vector storage: sorted index/value pairs, zeros never stored.

use std::any::Any;

use crate::core::scalar::{Scalar, is_zero};
use crate::core::traits::{MatrixStorage, StorageFlags, VectorStorage, OUTSIDE_PATTERN};
use crate::error::LinalgError;
use crate::matrix::SparseCompressedRow;

#[derive(Debug, Clone, PartialEq)]
pub struct SparseVectorStorage<T> {
    len: usize,
    indices: Vec<usize>,
    values: Vec<T>,
}

impl<T: Scalar> SparseVectorStorage<T> {
    pub fn zeros(len: usize) -> Self {
        SparseVectorStorage { len, indices: Vec::new(), values: Vec::new() }
    }

    /// Keep the non-zero entries of `values`.
    pub fn from_slice(values: &[T]) -> Self {
        let (indices, stored): (Vec<usize>, Vec<T>) = values
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, v)| !is_zero(*v))
            .unzip();
        SparseVectorStorage { len: values.len(), indices, values: stored }
    }

    /// Build from `(index, value)` pairs; a repeated index keeps the last value.
    pub fn from_pairs(len: usize, pairs: &[(usize, T)]) -> Result<Self, LinalgError> {
        let mut storage = SparseVectorStorage::zeros(len);
        for &(index, value) in pairs {
            if index >= len {
                return Err(LinalgError::IndexOutOfRange { index, bound: len });
            }
            storage.set_at(index, value)?;
        }
        Ok(storage)
    }

    /// Number of stored (non-zero) entries.
    pub fn non_zero_count(&self) -> usize {
        self.values.len()
    }

    /// Apply `f` to the stored entries only; `f(0)` is assumed to be zero.
    fn map_stored(&self, result: &mut dyn VectorStorage<T>, f: impl Fn(T) -> T) -> Result<(), LinalgError> {
        if let Some(dst) = result.as_mut_slice() {
            dst.fill(T::zero());
            for (&i, &v) in self.indices.iter().zip(&self.values) {
                dst[i] = f(v);
            }
            return Ok(());
        }
        if !result.is_fully_mutable() && self.indices.iter().any(|&i| !result.is_mutable_at(i)) {
            return Err(LinalgError::Unsupported(OUTSIDE_PATTERN));
        }
        result.clear();
        for (&i, &v) in self.indices.iter().zip(&self.values) {
            let y = f(v);
            if !is_zero(y) {
                result.set_at(i, y)?;
            }
        }
        Ok(())
    }
}

impl<T: Scalar> VectorStorage<T> for SparseVectorStorage<T> {
    fn len(&self) -> usize {
        self.len
    }

    fn flags(&self) -> StorageFlags {
        StorageFlags::FULLY_MUTABLE
    }

    fn at(&self, index: usize) -> T {
        match self.indices.binary_search(&index) {
            Ok(pos) => self.values[pos],
            Err(_) => T::zero(),
        }
    }

    fn set_at(&mut self, index: usize, value: T) -> Result<(), LinalgError> {
        match self.indices.binary_search(&index) {
            Ok(pos) if is_zero(value) => {
                self.indices.remove(pos);
                self.values.remove(pos);
            }
            Ok(pos) => self.values[pos] = value,
            Err(pos) if !is_zero(value) => {
                self.indices.insert(pos, index);
                self.values.insert(pos, value);
            }
            Err(_) => {}
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.indices.clear();
        self.values.clear();
    }

    fn clear_range(&mut self, index: usize, count: usize) {
        let start = self.indices.partition_point(|&i| i < index);
        let end = self.indices.partition_point(|&i| i < index + count);
        self.indices.drain(start..end);
        self.values.drain(start..end);
    }

    fn enumerate_non_zero(&self) -> Box<dyn Iterator<Item = (usize, T)> + '_> {
        Box::new(self.indices.iter().copied().zip(self.values.iter().copied()))
    }

    fn clone_boxed(&self) -> Box<dyn VectorStorage<T>> {
        Box::new(self.clone())
    }

    fn create_like(&self, len: usize, _fully_mutable: bool) -> Box<dyn VectorStorage<T>> {
        Box::new(SparseVectorStorage::zeros(len))
    }

    fn create_matrix_like(&self, rows: usize, cols: usize, _fully_mutable: bool) -> Box<dyn MatrixStorage<T>> {
        Box::new(SparseCompressedRow::zeros(rows, cols))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn do_multiply_scalar(&self, scalar: T, result: &mut dyn VectorStorage<T>) -> Result<(), LinalgError> {
        self.map_stored(result, |x| x * scalar)
    }

    fn do_divide_scalar(&self, scalar: T, result: &mut dyn VectorStorage<T>) -> Result<(), LinalgError> {
        self.map_stored(result, |x| x / scalar)
    }

    fn do_negate(&self, result: &mut dyn VectorStorage<T>) -> Result<(), LinalgError> {
        self.map_stored(result, |x| -x)
    }

    fn do_conjugate(&self, result: &mut dyn VectorStorage<T>) -> Result<(), LinalgError> {
        self.map_stored(result, |x| x.conjugate())
    }
}
