//! Contiguous vector storage.

use std::any::Any;

use crate::core::generic;
use crate::core::scalar::Scalar;
use crate::core::traits::{MatrixStorage, StorageFlags, VectorStorage};
use crate::error::LinalgError;
use crate::matrix::DenseColumnMajor;
use crate::parallel;

/// Every element materialized in one `Vec`.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseVectorStorage<T> {
    data: Vec<T>,
}

impl<T: Scalar> DenseVectorStorage<T> {
    pub fn zeros(len: usize) -> Self {
        DenseVectorStorage { data: vec![T::zero(); len] }
    }

    pub fn from_vec(data: Vec<T>) -> Self {
        DenseVectorStorage { data }
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    // Slice fast paths: both report whether `result` was dense and written.

    fn unary(&self, result: &mut dyn VectorStorage<T>, f: impl Fn(T) -> T + Send + Sync) -> bool {
        match result.as_mut_slice() {
            Some(dst) => {
                parallel::map_into(&self.data, dst, f);
                true
            }
            None => false,
        }
    }

    fn binary(
        &self,
        other: &dyn VectorStorage<T>,
        result: &mut dyn VectorStorage<T>,
        f: impl Fn(T, T) -> T + Send + Sync,
    ) -> bool {
        if let (Some(b), Some(dst)) = (other.as_slice(), result.as_mut_slice()) {
            parallel::zip_into(&self.data, b, dst, f);
            return true;
        }
        false
    }
}

impl<T: Scalar> VectorStorage<T> for DenseVectorStorage<T> {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn flags(&self) -> StorageFlags {
        StorageFlags::DENSE | StorageFlags::FULLY_MUTABLE
    }

    fn at(&self, index: usize) -> T {
        self.data[index]
    }

    fn set_at(&mut self, index: usize, value: T) -> Result<(), LinalgError> {
        self.data[index] = value;
        Ok(())
    }

    fn clear(&mut self) {
        self.data.fill(T::zero());
    }

    fn clear_range(&mut self, index: usize, count: usize) {
        self.data[index..index + count].fill(T::zero());
    }

    fn as_slice(&self) -> Option<&[T]> {
        Some(&self.data)
    }

    fn as_mut_slice(&mut self) -> Option<&mut [T]> {
        Some(&mut self.data)
    }

    fn enumerate(&self) -> Box<dyn Iterator<Item = T> + '_> {
        Box::new(self.data.iter().copied())
    }

    fn clone_boxed(&self) -> Box<dyn VectorStorage<T>> {
        Box::new(self.clone())
    }

    fn create_like(&self, len: usize, _fully_mutable: bool) -> Box<dyn VectorStorage<T>> {
        Box::new(DenseVectorStorage::zeros(len))
    }

    fn create_matrix_like(&self, rows: usize, cols: usize, _fully_mutable: bool) -> Box<dyn MatrixStorage<T>> {
        Box::new(DenseColumnMajor::zeros(rows, cols))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn do_add_scalar(&self, scalar: T, result: &mut dyn VectorStorage<T>) -> Result<(), LinalgError> {
        if self.unary(result, |x| x + scalar) {
            return Ok(());
        }
        generic::vector_add_scalar(self, scalar, result)
    }

    fn do_add(
        &self,
        other: &dyn VectorStorage<T>,
        result: &mut dyn VectorStorage<T>,
    ) -> Result<(), LinalgError> {
        if self.binary(other, result, |x, y| x + y) {
            return Ok(());
        }
        generic::vector_add(self, other, result)
    }

    fn do_subtract(
        &self,
        other: &dyn VectorStorage<T>,
        result: &mut dyn VectorStorage<T>,
    ) -> Result<(), LinalgError> {
        if self.binary(other, result, |x, y| x - y) {
            return Ok(());
        }
        generic::vector_subtract(self, other, result)
    }

    fn do_multiply_scalar(&self, scalar: T, result: &mut dyn VectorStorage<T>) -> Result<(), LinalgError> {
        if self.unary(result, |x| x * scalar) {
            return Ok(());
        }
        generic::vector_multiply_scalar(self, scalar, result)
    }

    fn do_divide_scalar(&self, scalar: T, result: &mut dyn VectorStorage<T>) -> Result<(), LinalgError> {
        if self.unary(result, |x| x / scalar) {
            return Ok(());
        }
        generic::vector_divide_scalar(self, scalar, result)
    }

    fn do_divide_by_scalar(&self, scalar: T, result: &mut dyn VectorStorage<T>) -> Result<(), LinalgError> {
        if self.unary(result, |x| scalar / x) {
            return Ok(());
        }
        generic::vector_divide_by_scalar(self, scalar, result)
    }

    fn do_dot(&self, other: &dyn VectorStorage<T>) -> T {
        match other.as_slice() {
            Some(b) => T::provider().dot_product(&self.data, b),
            None => generic::vector_dot(self, other),
        }
    }

    fn do_conjugate_dot(&self, other: &dyn VectorStorage<T>) -> T {
        match other.as_slice() {
            Some(b) => T::provider().conjugate_dot_product(&self.data, b),
            None => generic::vector_conjugate_dot(self, other),
        }
    }

    fn do_pointwise_multiply(
        &self,
        other: &dyn VectorStorage<T>,
        result: &mut dyn VectorStorage<T>,
    ) -> Result<(), LinalgError> {
        if self.binary(other, result, |x, y| x * y) {
            return Ok(());
        }
        generic::vector_pointwise_multiply(self, other, result)
    }

    fn do_pointwise_divide(
        &self,
        other: &dyn VectorStorage<T>,
        result: &mut dyn VectorStorage<T>,
    ) -> Result<(), LinalgError> {
        if self.binary(other, result, |x, y| x / y) {
            return Ok(());
        }
        generic::vector_pointwise_divide(self, other, result)
    }

    fn do_modulus(&self, divisor: T, result: &mut dyn VectorStorage<T>) -> Result<(), LinalgError> {
        if self.unary(result, |x| x.modulo(divisor).unwrap_or_else(T::zero)) {
            return Ok(());
        }
        generic::vector_modulus(self, divisor, result)
    }

    fn do_remainder(&self, divisor: T, result: &mut dyn VectorStorage<T>) -> Result<(), LinalgError> {
        if self.unary(result, |x| x.remainder(divisor).unwrap_or_else(T::zero)) {
            return Ok(());
        }
        generic::vector_remainder(self, divisor, result)
    }

    fn do_pointwise_modulus(
        &self,
        divisor: &dyn VectorStorage<T>,
        result: &mut dyn VectorStorage<T>,
    ) -> Result<(), LinalgError> {
        if self.binary(divisor, result, |x, d| x.modulo(d).unwrap_or_else(T::zero)) {
            return Ok(());
        }
        generic::vector_pointwise_modulus(self, divisor, result)
    }

    fn do_pointwise_remainder(
        &self,
        divisor: &dyn VectorStorage<T>,
        result: &mut dyn VectorStorage<T>,
    ) -> Result<(), LinalgError> {
        if self.binary(divisor, result, |x, d| x.remainder(d).unwrap_or_else(T::zero)) {
            return Ok(());
        }
        generic::vector_pointwise_remainder(self, divisor, result)
    }

    fn do_negate(&self, result: &mut dyn VectorStorage<T>) -> Result<(), LinalgError> {
        if self.unary(result, |x| -x) {
            return Ok(());
        }
        generic::vector_negate(self, result)
    }

    fn do_conjugate(&self, result: &mut dyn VectorStorage<T>) -> Result<(), LinalgError> {
        if self.unary(result, |x| x.conjugate()) {
            return Ok(());
        }
        generic::vector_conjugate(self, result)
    }
}
