//! Dense column-major matrix storage.
//!
//! Elementwise hooks run over the backing slice through [`crate::parallel`];
//! products go to the active [`LinearAlgebraProvider`](crate::provider::LinearAlgebraProvider)
//! whenever every operand is dense.

use std::any::Any;

use crate::core::generic;
use crate::core::scalar::{Scalar, is_zero};
use crate::core::traits::{Extent, MatrixStorage, Origin, StorageFlags, VectorStorage, OUTSIDE_PATTERN};
use crate::error::LinalgError;
use crate::parallel;
use crate::provider::{ColumnMajor, Transpose};
use crate::vector::DenseVectorStorage;

/// `rows x cols` values, column after column.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseColumnMajor<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Scalar> DenseColumnMajor<T> {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        DenseColumnMajor { rows, cols, data: vec![T::zero(); rows * cols] }
    }

    /// Wrap column-major `data`; its length must be `rows * cols`.
    pub fn from_column_major(rows: usize, cols: usize, data: Vec<T>) -> Result<Self, LinalgError> {
        if data.len() != rows * cols {
            return Err(LinalgError::length("DenseColumnMajor::from_column_major", rows * cols, data.len()));
        }
        Ok(DenseColumnMajor { rows, cols, data })
    }

    pub(crate) fn from_parts(rows: usize, cols: usize, data: Vec<T>) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        DenseColumnMajor { rows, cols, data }
    }

    pub fn from_fn(rows: usize, cols: usize, f: impl Fn(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for j in 0..cols {
            for i in 0..rows {
                data.push(f(i, j));
            }
        }
        DenseColumnMajor { rows, cols, data }
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    fn view(&self) -> ColumnMajor<'_, T> {
        ColumnMajor::new(&self.data, self.rows, self.cols)
    }

    fn unary(&self, result: &mut dyn MatrixStorage<T>, f: impl Fn(T) -> T + Send + Sync) -> bool {
        match result.as_column_major_slice_mut() {
            Some(dst) => {
                parallel::map_into(&self.data, dst, f);
                true
            }
            None => false,
        }
    }

    fn binary(
        &self,
        other: &dyn MatrixStorage<T>,
        result: &mut dyn MatrixStorage<T>,
        f: impl Fn(T, T) -> T + Send + Sync,
    ) -> bool {
        if let (Some(b), Some(dst)) = (other.as_column_major_slice(), result.as_column_major_slice_mut()) {
            parallel::zip_into(&self.data, b, dst, f);
            return true;
        }
        false
    }

    /// `result = op_a(self) * op_b(other)` when both the other operand and the result are dense.
    fn product(
        &self,
        op_a: Transpose,
        other: &dyn MatrixStorage<T>,
        op_b: Transpose,
        result: &mut dyn MatrixStorage<T>,
    ) -> bool {
        let (rows, cols) = (other.row_count(), other.column_count());
        if let (Some(b), Some(dst)) = (other.as_column_major_slice(), result.as_column_major_slice_mut()) {
            let b = ColumnMajor::new(b, rows, cols);
            T::provider().matrix_multiply(op_a, self.view(), op_b, b, dst);
            return true;
        }
        false
    }

    fn vector_product(
        &self,
        op: Transpose,
        vector: &dyn VectorStorage<T>,
        result: &mut dyn VectorStorage<T>,
    ) -> bool {
        let len = vector.len();
        if let (Some(x), Some(dst)) = (vector.as_slice(), result.as_mut_slice()) {
            let x = ColumnMajor::new(x, len, 1);
            T::provider().matrix_multiply(op, self.view(), Transpose::No, x, dst);
            return true;
        }
        false
    }
}

impl<T: Scalar> MatrixStorage<T> for DenseColumnMajor<T> {
    fn row_count(&self) -> usize {
        self.rows
    }

    fn column_count(&self) -> usize {
        self.cols
    }

    fn flags(&self) -> StorageFlags {
        StorageFlags::DENSE | StorageFlags::FULLY_MUTABLE
    }

    fn at(&self, row: usize, col: usize) -> T {
        self.data[col * self.rows + row]
    }

    fn set_at(&mut self, row: usize, col: usize, value: T) -> Result<(), LinalgError> {
        self.data[col * self.rows + row] = value;
        Ok(())
    }

    fn clear(&mut self) {
        self.data.fill(T::zero());
    }

    fn clear_region(&mut self, origin: Origin, extent: Extent) {
        let (r0, c0) = origin;
        let (rows, cols) = extent;
        for j in c0..c0 + cols {
            let start = j * self.rows + r0;
            self.data[start..start + rows].fill(T::zero());
        }
    }

    fn as_column_major_slice(&self) -> Option<&[T]> {
        Some(&self.data)
    }

    fn as_column_major_slice_mut(&mut self) -> Option<&mut [T]> {
        Some(&mut self.data)
    }

    fn enumerate(&self) -> Box<dyn Iterator<Item = T> + '_> {
        Box::new(self.data.iter().copied())
    }

    fn copy_sub_matrix_to(
        &self,
        target: &mut dyn MatrixStorage<T>,
        source: Origin,
        target_origin: Origin,
        extent: Extent,
        skip_clearing: bool,
    ) -> Result<(), LinalgError> {
        let (sr, sc) = source;
        let (tr, tc) = target_origin;
        let (rows, cols) = extent;
        let target_rows = target.row_count();
        if let Some(dst) = target.as_column_major_slice_mut() {
            for j in 0..cols {
                let from = (sc + j) * self.rows + sr;
                let to = (tc + j) * target_rows + tr;
                dst[to..to + rows].copy_from_slice(&self.data[from..from + rows]);
            }
            return Ok(());
        }
        let values: Vec<(usize, usize, T)> = (0..cols)
            .flat_map(|j| (0..rows).map(move |i| (i, j)))
            .map(|(i, j)| (tr + i, tc + j, self.at(sr + i, sc + j)))
            .filter(|(_, _, v)| !is_zero(*v))
            .collect();
        if !target.is_fully_mutable() && values.iter().any(|&(i, j, _)| !target.is_mutable_at(i, j)) {
            return Err(LinalgError::Unsupported(OUTSIDE_PATTERN));
        }
        if !skip_clearing {
            target.clear_region(target_origin, extent);
        }
        for (i, j, v) in values {
            target.set_at(i, j, v)?;
        }
        Ok(())
    }

    fn clone_boxed(&self) -> Box<dyn MatrixStorage<T>> {
        Box::new(self.clone())
    }

    fn create_like(&self, rows: usize, cols: usize, _fully_mutable: bool) -> Box<dyn MatrixStorage<T>> {
        Box::new(DenseColumnMajor::zeros(rows, cols))
    }

    fn create_vector_like(&self, len: usize, _fully_mutable: bool) -> Box<dyn VectorStorage<T>> {
        Box::new(DenseVectorStorage::zeros(len))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn do_add_scalar(&self, scalar: T, result: &mut dyn MatrixStorage<T>) -> Result<(), LinalgError> {
        if self.unary(result, |x| x + scalar) {
            return Ok(());
        }
        generic::matrix_add_scalar(self, scalar, result)
    }

    fn do_add(
        &self,
        other: &dyn MatrixStorage<T>,
        result: &mut dyn MatrixStorage<T>,
    ) -> Result<(), LinalgError> {
        if self.binary(other, result, |x, y| x + y) {
            return Ok(());
        }
        generic::matrix_add(self, other, result)
    }

    fn do_subtract(
        &self,
        other: &dyn MatrixStorage<T>,
        result: &mut dyn MatrixStorage<T>,
    ) -> Result<(), LinalgError> {
        if self.binary(other, result, |x, y| x - y) {
            return Ok(());
        }
        generic::matrix_subtract(self, other, result)
    }

    fn do_multiply_scalar(&self, scalar: T, result: &mut dyn MatrixStorage<T>) -> Result<(), LinalgError> {
        if self.unary(result, |x| x * scalar) {
            return Ok(());
        }
        generic::matrix_multiply_scalar(self, scalar, result)
    }

    fn do_divide_scalar(&self, scalar: T, result: &mut dyn MatrixStorage<T>) -> Result<(), LinalgError> {
        if self.unary(result, |x| x / scalar) {
            return Ok(());
        }
        generic::matrix_divide_scalar(self, scalar, result)
    }

    fn do_divide_by_scalar(&self, scalar: T, result: &mut dyn MatrixStorage<T>) -> Result<(), LinalgError> {
        if self.unary(result, |x| scalar / x) {
            return Ok(());
        }
        generic::matrix_divide_by_scalar(self, scalar, result)
    }

    fn do_multiply_vector(
        &self,
        vector: &dyn VectorStorage<T>,
        result: &mut dyn VectorStorage<T>,
    ) -> Result<(), LinalgError> {
        if self.vector_product(Transpose::No, vector, result) {
            return Ok(());
        }
        generic::matrix_multiply_vector(self, vector, result)
    }

    fn do_transpose_this_and_multiply_vector(
        &self,
        vector: &dyn VectorStorage<T>,
        result: &mut dyn VectorStorage<T>,
    ) -> Result<(), LinalgError> {
        if self.vector_product(Transpose::Yes, vector, result) {
            return Ok(());
        }
        generic::matrix_transpose_this_and_multiply_vector(self, vector, result)
    }

    fn do_multiply(
        &self,
        other: &dyn MatrixStorage<T>,
        result: &mut dyn MatrixStorage<T>,
    ) -> Result<(), LinalgError> {
        if self.product(Transpose::No, other, Transpose::No, result) {
            return Ok(());
        }
        generic::matrix_multiply(self, other, result)
    }

    fn do_transpose_and_multiply(
        &self,
        other: &dyn MatrixStorage<T>,
        result: &mut dyn MatrixStorage<T>,
    ) -> Result<(), LinalgError> {
        if self.product(Transpose::No, other, Transpose::Yes, result) {
            return Ok(());
        }
        generic::matrix_transpose_and_multiply(self, other, result)
    }

    fn do_transpose_this_and_multiply(
        &self,
        other: &dyn MatrixStorage<T>,
        result: &mut dyn MatrixStorage<T>,
    ) -> Result<(), LinalgError> {
        if self.product(Transpose::Yes, other, Transpose::No, result) {
            return Ok(());
        }
        generic::matrix_transpose_this_and_multiply(self, other, result)
    }

    fn do_negate(&self, result: &mut dyn MatrixStorage<T>) -> Result<(), LinalgError> {
        if self.unary(result, |x| -x) {
            return Ok(());
        }
        generic::matrix_negate(self, result)
    }

    fn do_conjugate(&self, result: &mut dyn MatrixStorage<T>) -> Result<(), LinalgError> {
        if self.unary(result, |x| x.conjugate()) {
            return Ok(());
        }
        generic::matrix_conjugate(self, result)
    }

    fn do_pointwise_multiply(
        &self,
        other: &dyn MatrixStorage<T>,
        result: &mut dyn MatrixStorage<T>,
    ) -> Result<(), LinalgError> {
        if self.binary(other, result, |x, y| x * y) {
            return Ok(());
        }
        generic::matrix_pointwise_multiply(self, other, result)
    }

    fn do_pointwise_divide(
        &self,
        other: &dyn MatrixStorage<T>,
        result: &mut dyn MatrixStorage<T>,
    ) -> Result<(), LinalgError> {
        if self.binary(other, result, |x, y| x / y) {
            return Ok(());
        }
        generic::matrix_pointwise_divide(self, other, result)
    }

    fn do_modulus(&self, divisor: T, result: &mut dyn MatrixStorage<T>) -> Result<(), LinalgError> {
        if self.unary(result, |x| x.modulo(divisor).unwrap_or_else(T::zero)) {
            return Ok(());
        }
        generic::matrix_modulus(self, divisor, result)
    }

    fn do_remainder(&self, divisor: T, result: &mut dyn MatrixStorage<T>) -> Result<(), LinalgError> {
        if self.unary(result, |x| x.remainder(divisor).unwrap_or_else(T::zero)) {
            return Ok(());
        }
        generic::matrix_remainder(self, divisor, result)
    }

    fn do_pointwise_modulus(
        &self,
        divisor: &dyn MatrixStorage<T>,
        result: &mut dyn MatrixStorage<T>,
    ) -> Result<(), LinalgError> {
        if self.binary(divisor, result, |x, d| x.modulo(d).unwrap_or_else(T::zero)) {
            return Ok(());
        }
        generic::matrix_pointwise_modulus(self, divisor, result)
    }

    fn do_pointwise_remainder(
        &self,
        divisor: &dyn MatrixStorage<T>,
        result: &mut dyn MatrixStorage<T>,
    ) -> Result<(), LinalgError> {
        if self.binary(divisor, result, |x, d| x.remainder(d).unwrap_or_else(T::zero)) {
            return Ok(());
        }
        generic::matrix_pointwise_remainder(self, divisor, result)
    }
}
