//! Storage-agnostic vector.
//!
//! [`Vector`] owns a boxed [`VectorStorage`] and is the only place where
//! arguments are validated. Once lengths and bounds check out, work goes to
//! the storage's unchecked `do_*` hooks.

mod arithmetic;
pub mod dense;
mod norms;
mod ops;
pub mod sparse;

pub use dense::DenseVectorStorage;
pub use sparse::SparseVectorStorage;
pub(crate) use norms::p_norm;

use std::hash::{Hash, Hasher};

use rand::Rng;
use rand::distributions::Distribution;

use crate::core::generic;
use crate::core::scalar::Scalar;
use crate::core::traits::VectorStorage;
use crate::error::LinalgError;
use crate::matrix::Matrix;
use crate::parallel;

/// Number of leading elements folded into the hash.
const HASH_PREFIX: usize = 25;

#[derive(Debug)]
pub struct Vector<T: Scalar> {
    storage: Box<dyn VectorStorage<T>>,
}

impl<T: Scalar> Vector<T> {
    /// Wrap a storage. User-defined representations enter here.
    pub fn from_storage(storage: Box<dyn VectorStorage<T>>) -> Self {
        Vector { storage }
    }

    pub fn dense(len: usize) -> Self {
        Self::from_storage(Box::new(DenseVectorStorage::zeros(len)))
    }

    pub fn dense_from_vec(values: Vec<T>) -> Self {
        Self::from_storage(Box::new(DenseVectorStorage::from_vec(values)))
    }

    pub fn dense_from_slice(values: &[T]) -> Self {
        Self::dense_from_vec(values.to_vec())
    }

    pub fn dense_from_fn(len: usize, f: impl Fn(usize) -> T + Send + Sync) -> Self {
        Self::dense_from_vec(parallel::collect(len, f))
    }

    pub fn sparse(len: usize) -> Self {
        Self::from_storage(Box::new(SparseVectorStorage::zeros(len)))
    }

    pub fn sparse_from_slice(values: &[T]) -> Self {
        Self::from_storage(Box::new(SparseVectorStorage::from_slice(values)))
    }

    /// Dense vector of `len` samples drawn from `distribution`.
    pub fn random<D: Distribution<T>, R: Rng + ?Sized>(len: usize, distribution: &D, rng: &mut R) -> Self {
        Self::dense_from_vec(crate::utils::random::sample(len, distribution, rng))
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn storage(&self) -> &dyn VectorStorage<T> {
        &*self.storage
    }

    pub(crate) fn storage_mut(&mut self) -> &mut dyn VectorStorage<T> {
        &mut *self.storage
    }

    fn check_index(&self, index: usize) -> Result<(), LinalgError> {
        if index >= self.len() {
            return Err(LinalgError::IndexOutOfRange { index, bound: self.len() });
        }
        Ok(())
    }

    pub fn at(&self, index: usize) -> Result<T, LinalgError> {
        self.check_index(index)?;
        Ok(self.storage.at(index))
    }

    pub fn set_at(&mut self, index: usize, value: T) -> Result<(), LinalgError> {
        self.check_index(index)?;
        self.storage.set_at(index, value)
    }

    /// Zero vector of the same representation.
    pub fn create_vector(&self, len: usize) -> Vector<T> {
        Vector::from_storage(self.storage.create_like(len, false))
    }

    /// Zero matrix whose representation matches this vector's.
    pub fn create_matrix(&self, rows: usize, cols: usize) -> Matrix<T> {
        Matrix::from_storage(self.storage.create_matrix_like(rows, cols, false))
    }

    /// Every element, materialized in order.
    pub fn to_vec(&self) -> Vec<T> {
        if let Some(slice) = self.storage.as_slice() {
            return slice.to_vec();
        }
        let storage = &*self.storage;
        parallel::collect(self.len(), |i| storage.at(i))
    }

    /// Overwrite every element from `values`.
    pub fn set_values(&mut self, values: &[T]) -> Result<(), LinalgError> {
        if values.len() != self.len() {
            return Err(LinalgError::length("Vector::set_values", self.len(), values.len()));
        }
        if let Some(dst) = self.storage.as_mut_slice() {
            parallel::assign(dst, values);
            return Ok(());
        }
        generic::write_vector(&mut *self.storage, values)
    }

    fn check_range(&self, index: usize, count: usize) -> Result<(), LinalgError> {
        if index.checked_add(count).is_none_or(|end| end > self.len()) {
            return Err(LinalgError::IndexOutOfRange { index: index.saturating_add(count), bound: self.len() });
        }
        Ok(())
    }

    /// `count` elements starting at `index`, in the same representation.
    pub fn sub_vector(&self, index: usize, count: usize) -> Result<Vector<T>, LinalgError> {
        self.check_range(index, count)?;
        let mut result = self.create_vector(count);
        if let (Some(src), Some(dst)) = (self.storage.as_slice(), result.storage.as_mut_slice()) {
            parallel::assign(dst, &src[index..index + count]);
        } else {
            self.storage.copy_sub_vector_to(&mut *result.storage, index, 0, count, true)?;
        }
        Ok(result)
    }

    /// Copy `count` elements from `source_index` into `target` at `target_index`.
    ///
    /// # Arguments
    /// * `target` - Destination vector; elements outside the range are kept
    /// * `source_index` - First element read from `self`
    /// * `target_index` - First element written in `target`
    /// * `count` - Number of elements
    pub fn copy_sub_vector_to(
        &self,
        target: &mut Vector<T>,
        source_index: usize,
        target_index: usize,
        count: usize,
    ) -> Result<(), LinalgError> {
        self.check_range(source_index, count)?;
        target.check_range(target_index, count)?;
        self.storage
            .copy_sub_vector_to(&mut *target.storage, source_index, target_index, count, false)
    }

    /// Copy every element into a same-length `target`.
    pub fn copy_to(&self, target: &mut Vector<T>) -> Result<(), LinalgError> {
        if target.len() != self.len() {
            return Err(LinalgError::length("Vector::copy_to", self.len(), target.len()));
        }
        self.storage.copy_to(&mut *target.storage, false)
    }

    pub fn clear(&mut self) {
        self.storage.clear();
    }

    pub fn clear_sub_vector(&mut self, index: usize, count: usize) -> Result<(), LinalgError> {
        self.check_range(index, count)?;
        self.storage.clear_range(index, count);
        Ok(())
    }

    pub fn enumerate(&self) -> impl Iterator<Item = T> + '_ {
        self.storage.enumerate()
    }

    pub fn enumerate_indexed(&self) -> impl Iterator<Item = (usize, T)> + '_ {
        self.storage.enumerate().enumerate()
    }

    /// Stored elements with their index; sparse vectors skip zeros.
    pub fn enumerate_non_zero(&self) -> impl Iterator<Item = (usize, T)> + '_ {
        self.storage.enumerate_non_zero()
    }
}

impl<T: Scalar> Clone for Vector<T> {
    fn clone(&self) -> Self {
        Vector { storage: self.storage.clone_boxed() }
    }
}

impl<T: Scalar> PartialEq for Vector<T> {
    fn eq(&self, other: &Self) -> bool {
        self.storage.storage_eq(&*other.storage)
    }
}

impl<T: Scalar> Hash for Vector<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for i in 0..self.len().min(HASH_PREFIX) {
            // `+ 0` folds -0.0 onto 0.0 so equal vectors hash alike
            (self.storage.at(i) + T::zero()).hash_bits(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_access() {
        let mut v = Vector::dense_from_vec(vec![1.0, 2.0]);
        assert!(matches!(v.at(2), Err(LinalgError::IndexOutOfRange { index: 2, bound: 2 })));
        v.set_at(1, 5.0).unwrap();
        assert_eq!(v.to_vec(), vec![1.0, 5.0]);
    }

    #[test]
    fn equality_ignores_representation() {
        let d = Vector::dense_from_vec(vec![0.0, 3.0, 0.0]);
        let s = Vector::sparse_from_slice(&[0.0, 3.0, 0.0]);
        assert_eq!(d, s);
    }

    #[test]
    fn sub_vector_keeps_family() {
        let s = Vector::sparse_from_slice(&[1.0, 0.0, 2.0, 3.0]);
        let sub = s.sub_vector(1, 2).unwrap();
        assert!(!sub.storage().is_dense());
        assert_eq!(sub.to_vec(), vec![0.0, 2.0]);
        assert!(s.sub_vector(3, 2).is_err());
    }

    #[test]
    fn set_values_validates_length() {
        let mut v = Vector::<f64>::sparse(3);
        assert!(v.set_values(&[1.0]).is_err());
        v.set_values(&[0.0, 4.0, 0.0]).unwrap();
        assert_eq!(v.enumerate_non_zero().collect::<Vec<_>>(), vec![(1, 4.0)]);
    }

    #[test]
    fn copy_sub_vector_between_families() {
        let d = Vector::dense_from_vec(vec![1.0, 2.0, 3.0]);
        let mut s = Vector::sparse_from_slice(&[9.0, 9.0, 9.0, 9.0]);
        d.copy_sub_vector_to(&mut s, 1, 2, 2).unwrap();
        assert_eq!(s.to_vec(), vec![9.0, 9.0, 2.0, 3.0]);
    }
}
