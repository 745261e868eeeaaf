//! Validated matrix arithmetic.
//!
//! Same three-form layout as the vector arithmetic: a new-result form, an
//! `_into` form and, where it is useful, an `_in_place` form. Shapes are
//! checked before any element is touched. In-place forms run into a scratch
//! matrix first, so `A = A * B` never reads an element it already overwrote.

use super::Matrix;
use crate::core::scalar::{Scalar, is_one, is_zero};
use crate::core::traits::MatrixStorage;
use crate::error::LinalgError;
use crate::vector::Vector;

const NO_MODULUS: &str = "modulus is undefined for complex scalars";

type Shape = (usize, usize);

impl<T: Scalar> Matrix<T> {
    fn check_shape(&self, op: &'static str, expected: Shape, found: Shape) -> Result<(), LinalgError> {
        if expected != found {
            return Err(LinalgError::shape(op, expected, found));
        }
        Ok(())
    }

    fn check_same_shape(&self, op: &'static str, other: &Matrix<T>) -> Result<(), LinalgError> {
        self.check_shape(op, self.shape(), other.shape())
    }

    fn check_vector(op: &'static str, expected: usize, found: &Vector<T>) -> Result<(), LinalgError> {
        if found.len() != expected {
            return Err(LinalgError::length(op, expected, found.len()));
        }
        Ok(())
    }

    pub(super) fn create_general(&self, rows: usize, cols: usize) -> Matrix<T> {
        self.create_matrix_with(rows, cols, true)
    }

    /// Result of a binary operation: dense wins, then any fully mutable operand.
    pub(super) fn create_result_with(&self, other: &Matrix<T>, rows: usize, cols: usize) -> Matrix<T> {
        let (a, b) = (&*self.storage, &*other.storage);
        let storage = if a.is_dense() {
            a.create_like(rows, cols, false)
        } else if b.is_dense() {
            b.create_like(rows, cols, false)
        } else if a.is_fully_mutable() {
            a.create_like(rows, cols, false)
        } else if b.is_fully_mutable() {
            b.create_like(rows, cols, false)
        } else {
            a.create_like(rows, cols, true)
        };
        Matrix::from_storage(storage)
    }

    /// Vector result of a matrix-vector product.
    fn create_vector_result(&self, vector: &Vector<T>, len: usize) -> Vector<T> {
        if vector.storage().is_dense() {
            vector.create_vector(len)
        } else {
            self.create_vector(len)
        }
    }

    /// Overwrite this matrix's storage with `computed`.
    pub(super) fn assign_from(&mut self, computed: Matrix<T>) -> Result<(), LinalgError> {
        computed.storage.copy_to(&mut *self.storage, false)
    }

    fn unary_into(
        &self,
        op: &'static str,
        result: &mut Matrix<T>,
        hook: impl FnOnce(&dyn MatrixStorage<T>, &mut dyn MatrixStorage<T>) -> Result<(), LinalgError>,
    ) -> Result<(), LinalgError> {
        self.check_same_shape(op, result)?;
        hook(&*self.storage, &mut *result.storage)
    }

    fn binary_into(
        &self,
        op: &'static str,
        other: &Matrix<T>,
        result: &mut Matrix<T>,
        hook: impl FnOnce(&dyn MatrixStorage<T>, &dyn MatrixStorage<T>, &mut dyn MatrixStorage<T>) -> Result<(), LinalgError>,
    ) -> Result<(), LinalgError> {
        self.check_same_shape(op, other)?;
        self.check_same_shape(op, result)?;
        hook(&*self.storage, &*other.storage, &mut *result.storage)
    }

    // ---- scalar addition -------------------------------------------------

    pub fn add_scalar(&self, scalar: T) -> Result<Matrix<T>, LinalgError> {
        if is_zero(scalar) {
            return Ok(self.clone());
        }
        let (rows, cols) = self.shape();
        let mut result = self.create_general(rows, cols);
        self.storage.do_add_scalar(scalar, &mut *result.storage)?;
        Ok(result)
    }

    pub fn add_scalar_into(&self, scalar: T, result: &mut Matrix<T>) -> Result<(), LinalgError> {
        self.check_same_shape("Matrix::add_scalar", result)?;
        if is_zero(scalar) {
            return self.storage.copy_to(&mut *result.storage, false);
        }
        self.storage.do_add_scalar(scalar, &mut *result.storage)
    }

    pub fn add_scalar_in_place(&mut self, scalar: T) -> Result<(), LinalgError> {
        if is_zero(scalar) {
            return Ok(());
        }
        let computed = self.add_scalar(scalar)?;
        self.assign_from(computed)
    }

    pub fn subtract_scalar(&self, scalar: T) -> Result<Matrix<T>, LinalgError> {
        self.add_scalar(-scalar)
    }

    pub fn subtract_scalar_into(&self, scalar: T, result: &mut Matrix<T>) -> Result<(), LinalgError> {
        self.add_scalar_into(-scalar, result)
    }

    /// `scalar - self`, elementwise.
    pub fn subtract_from_scalar(&self, scalar: T) -> Result<Matrix<T>, LinalgError> {
        let (rows, cols) = self.shape();
        let mut result = self.create_general(rows, cols);
        self.storage.do_negate(&mut *result.storage)?;
        result.add_scalar(scalar)
    }

    pub fn subtract_from_scalar_into(&self, scalar: T, result: &mut Matrix<T>) -> Result<(), LinalgError> {
        self.check_same_shape("Matrix::subtract_from_scalar", result)?;
        let computed = self.subtract_from_scalar(scalar)?;
        result.assign_from(computed)
    }

    // ---- matrix addition -------------------------------------------------

    pub fn add(&self, other: &Matrix<T>) -> Result<Matrix<T>, LinalgError> {
        self.check_same_shape("Matrix::add", other)?;
        let (rows, cols) = self.shape();
        let mut result = self.create_result_with(other, rows, cols);
        self.storage.do_add(&*other.storage, &mut *result.storage)?;
        Ok(result)
    }

    pub fn add_into(&self, other: &Matrix<T>, result: &mut Matrix<T>) -> Result<(), LinalgError> {
        self.binary_into("Matrix::add", other, result, |a, b, r| a.do_add(b, r))
    }

    pub fn add_in_place(&mut self, other: &Matrix<T>) -> Result<(), LinalgError> {
        let computed = self.add(other)?;
        self.assign_from(computed)
    }

    pub fn subtract(&self, other: &Matrix<T>) -> Result<Matrix<T>, LinalgError> {
        self.check_same_shape("Matrix::subtract", other)?;
        let (rows, cols) = self.shape();
        let mut result = self.create_result_with(other, rows, cols);
        self.storage.do_subtract(&*other.storage, &mut *result.storage)?;
        Ok(result)
    }

    pub fn subtract_into(&self, other: &Matrix<T>, result: &mut Matrix<T>) -> Result<(), LinalgError> {
        self.binary_into("Matrix::subtract", other, result, |a, b, r| a.do_subtract(b, r))
    }

    pub fn subtract_in_place(&mut self, other: &Matrix<T>) -> Result<(), LinalgError> {
        let computed = self.subtract(other)?;
        self.assign_from(computed)
    }

    // ---- scaling ---------------------------------------------------------

    pub fn multiply_scalar(&self, scalar: T) -> Result<Matrix<T>, LinalgError> {
        if is_one(scalar) {
            return Ok(self.clone());
        }
        let (rows, cols) = self.shape();
        let mut result = self.create_matrix(rows, cols);
        if is_zero(scalar) {
            return Ok(result);
        }
        self.storage.do_multiply_scalar(scalar, &mut *result.storage)?;
        Ok(result)
    }

    pub fn multiply_scalar_into(&self, scalar: T, result: &mut Matrix<T>) -> Result<(), LinalgError> {
        self.check_same_shape("Matrix::multiply_scalar", result)?;
        if is_one(scalar) {
            return self.storage.copy_to(&mut *result.storage, false);
        }
        if is_zero(scalar) {
            result.clear();
            return Ok(());
        }
        self.storage.do_multiply_scalar(scalar, &mut *result.storage)
    }

    pub fn multiply_scalar_in_place(&mut self, scalar: T) -> Result<(), LinalgError> {
        if is_one(scalar) {
            return Ok(());
        }
        if is_zero(scalar) {
            self.clear();
            return Ok(());
        }
        let computed = self.multiply_scalar(scalar)?;
        self.assign_from(computed)
    }

    /// `self / scalar`; a zero divisor is rejected.
    pub fn divide_scalar(&self, scalar: T) -> Result<Matrix<T>, LinalgError> {
        if is_zero(scalar) {
            return Err(LinalgError::DivideByZero);
        }
        if is_one(scalar) {
            return Ok(self.clone());
        }
        let (rows, cols) = self.shape();
        let mut result = self.create_matrix(rows, cols);
        self.storage.do_divide_scalar(scalar, &mut *result.storage)?;
        Ok(result)
    }

    pub fn divide_scalar_into(&self, scalar: T, result: &mut Matrix<T>) -> Result<(), LinalgError> {
        self.check_same_shape("Matrix::divide_scalar", result)?;
        if is_zero(scalar) {
            return Err(LinalgError::DivideByZero);
        }
        if is_one(scalar) {
            return self.storage.copy_to(&mut *result.storage, false);
        }
        self.storage.do_divide_scalar(scalar, &mut *result.storage)
    }

    pub fn divide_scalar_in_place(&mut self, scalar: T) -> Result<(), LinalgError> {
        let computed = self.divide_scalar(scalar)?;
        self.assign_from(computed)
    }

    /// `scalar / self`, elementwise.
    pub fn scalar_divide(&self, scalar: T) -> Result<Matrix<T>, LinalgError> {
        let (rows, cols) = self.shape();
        let mut result = self.create_general(rows, cols);
        self.storage.do_divide_by_scalar(scalar, &mut *result.storage)?;
        Ok(result)
    }

    pub fn scalar_divide_into(&self, scalar: T, result: &mut Matrix<T>) -> Result<(), LinalgError> {
        self.unary_into("Matrix::scalar_divide", result, |a, r| a.do_divide_by_scalar(scalar, r))
    }

    // ---- matrix-vector ---------------------------------------------------

    /// `self * vector`
    pub fn multiply_vector(&self, vector: &Vector<T>) -> Result<Vector<T>, LinalgError> {
        Self::check_vector("Matrix::multiply_vector", self.column_count(), vector)?;
        let mut result = self.create_vector_result(vector, self.row_count());
        self.storage.do_multiply_vector(vector.storage(), result.storage_mut())?;
        Ok(result)
    }

    pub fn multiply_vector_into(&self, vector: &Vector<T>, result: &mut Vector<T>) -> Result<(), LinalgError> {
        Self::check_vector("Matrix::multiply_vector", self.column_count(), vector)?;
        Self::check_vector("Matrix::multiply_vector", self.row_count(), result)?;
        self.storage.do_multiply_vector(vector.storage(), result.storage_mut())
    }

    /// `vector = self * vector`; needs a square matrix.
    pub fn multiply_vector_in_place(&self, vector: &mut Vector<T>) -> Result<(), LinalgError> {
        Self::check_vector("Matrix::multiply_vector", self.column_count(), vector)?;
        Self::check_vector("Matrix::multiply_vector", self.row_count(), vector)?;
        let computed = self.multiply_vector(vector)?;
        vector.assign_from(computed)
    }

    /// `self^T * vector`
    pub fn transpose_this_and_multiply_vector(&self, vector: &Vector<T>) -> Result<Vector<T>, LinalgError> {
        Self::check_vector("Matrix::transpose_this_and_multiply_vector", self.row_count(), vector)?;
        let mut result = self.create_vector_result(vector, self.column_count());
        self.storage
            .do_transpose_this_and_multiply_vector(vector.storage(), result.storage_mut())?;
        Ok(result)
    }

    pub fn transpose_this_and_multiply_vector_into(
        &self,
        vector: &Vector<T>,
        result: &mut Vector<T>,
    ) -> Result<(), LinalgError> {
        let op = "Matrix::transpose_this_and_multiply_vector";
        Self::check_vector(op, self.row_count(), vector)?;
        Self::check_vector(op, self.column_count(), result)?;
        self.storage
            .do_transpose_this_and_multiply_vector(vector.storage(), result.storage_mut())
    }

    /// Row vector times matrix, `vector^T * self`.
    pub fn left_multiply(&self, vector: &Vector<T>) -> Result<Vector<T>, LinalgError> {
        self.transpose_this_and_multiply_vector(vector)
    }

    pub fn left_multiply_into(&self, vector: &Vector<T>, result: &mut Vector<T>) -> Result<(), LinalgError> {
        self.transpose_this_and_multiply_vector_into(vector, result)
    }

    // ---- matrix-matrix ---------------------------------------------------

    /// `self * other`
    pub fn multiply(&self, other: &Matrix<T>) -> Result<Matrix<T>, LinalgError> {
        if self.column_count() != other.row_count() {
            return Err(LinalgError::shape(
                "Matrix::multiply",
                (self.column_count(), other.column_count()),
                other.shape(),
            ));
        }
        let mut result = self.create_result_with(other, self.row_count(), other.column_count());
        self.storage.do_multiply(&*other.storage, &mut *result.storage)?;
        Ok(result)
    }

    pub fn multiply_into(&self, other: &Matrix<T>, result: &mut Matrix<T>) -> Result<(), LinalgError> {
        if self.column_count() != other.row_count() {
            return Err(LinalgError::shape(
                "Matrix::multiply",
                (self.column_count(), other.column_count()),
                other.shape(),
            ));
        }
        self.check_shape("Matrix::multiply", (self.row_count(), other.column_count()), result.shape())?;
        self.storage.do_multiply(&*other.storage, &mut *result.storage)
    }

    /// `self = self * other`; `other` must be square.
    pub fn multiply_in_place(&mut self, other: &Matrix<T>) -> Result<(), LinalgError> {
        let order = self.column_count();
        self.check_shape("Matrix::multiply_in_place", (order, order), other.shape())?;
        log::trace!("multiply_in_place: {:?} product through scratch", self.shape());
        let computed = self.multiply(other)?;
        self.assign_from(computed)
    }

    /// `self * other^T`
    pub fn transpose_and_multiply(&self, other: &Matrix<T>) -> Result<Matrix<T>, LinalgError> {
        if self.column_count() != other.column_count() {
            return Err(LinalgError::shape(
                "Matrix::transpose_and_multiply",
                (other.row_count(), self.column_count()),
                other.shape(),
            ));
        }
        let mut result = self.create_result_with(other, self.row_count(), other.row_count());
        self.storage.do_transpose_and_multiply(&*other.storage, &mut *result.storage)?;
        Ok(result)
    }

    pub fn transpose_and_multiply_into(&self, other: &Matrix<T>, result: &mut Matrix<T>) -> Result<(), LinalgError> {
        let op = "Matrix::transpose_and_multiply";
        if self.column_count() != other.column_count() {
            return Err(LinalgError::shape(op, (other.row_count(), self.column_count()), other.shape()));
        }
        self.check_shape(op, (self.row_count(), other.row_count()), result.shape())?;
        self.storage.do_transpose_and_multiply(&*other.storage, &mut *result.storage)
    }

    /// `self^T * other`
    pub fn transpose_this_and_multiply(&self, other: &Matrix<T>) -> Result<Matrix<T>, LinalgError> {
        if self.row_count() != other.row_count() {
            return Err(LinalgError::shape(
                "Matrix::transpose_this_and_multiply",
                (self.row_count(), other.column_count()),
                other.shape(),
            ));
        }
        let mut result = self.create_result_with(other, self.column_count(), other.column_count());
        self.storage.do_transpose_this_and_multiply(&*other.storage, &mut *result.storage)?;
        Ok(result)
    }

    pub fn transpose_this_and_multiply_into(
        &self,
        other: &Matrix<T>,
        result: &mut Matrix<T>,
    ) -> Result<(), LinalgError> {
        let op = "Matrix::transpose_this_and_multiply";
        if self.row_count() != other.row_count() {
            return Err(LinalgError::shape(op, (self.row_count(), other.column_count()), other.shape()));
        }
        self.check_shape(op, (self.column_count(), other.column_count()), result.shape())?;
        self.storage.do_transpose_this_and_multiply(&*other.storage, &mut *result.storage)
    }

    /// Block matrix whose `(i, j)` block is `self[i, j] * other`.
    ///
    /// # Arguments
    /// * `other` - Right factor, any shape
    ///
    /// # Returns
    /// A fully mutable `(rows * other.rows) x (cols * other.cols)` matrix.
    pub fn kronecker_product(&self, other: &Matrix<T>) -> Result<Matrix<T>, LinalgError> {
        let (rows, cols) = (self.row_count() * other.row_count(), self.column_count() * other.column_count());
        let mut result = self.create_result_with(other, rows, cols);
        if !result.storage.is_fully_mutable() {
            result = self.create_general(rows, cols);
        }
        for (i, j, a) in self.enumerate_non_zero_indexed() {
            let block = other.multiply_scalar(a)?;
            result.set_sub_matrix(i * other.row_count(), j * other.column_count(), &block)?;
        }
        Ok(result)
    }

    pub fn kronecker_product_into(&self, other: &Matrix<T>, result: &mut Matrix<T>) -> Result<(), LinalgError> {
        let expected = (self.row_count() * other.row_count(), self.column_count() * other.column_count());
        self.check_shape("Matrix::kronecker_product", expected, result.shape())?;
        let computed = self.kronecker_product(other)?;
        result.assign_from(computed)
    }

    // ---- pointwise -------------------------------------------------------

    pub fn pointwise_multiply(&self, other: &Matrix<T>) -> Result<Matrix<T>, LinalgError> {
        self.check_same_shape("Matrix::pointwise_multiply", other)?;
        let (rows, cols) = self.shape();
        let mut result = self.create_result_with(other, rows, cols);
        self.storage.do_pointwise_multiply(&*other.storage, &mut *result.storage)?;
        Ok(result)
    }

    pub fn pointwise_multiply_into(&self, other: &Matrix<T>, result: &mut Matrix<T>) -> Result<(), LinalgError> {
        self.binary_into("Matrix::pointwise_multiply", other, result, |a, b, r| {
            a.do_pointwise_multiply(b, r)
        })
    }

    pub fn pointwise_divide(&self, other: &Matrix<T>) -> Result<Matrix<T>, LinalgError> {
        self.check_same_shape("Matrix::pointwise_divide", other)?;
        let (rows, cols) = self.shape();
        let mut result = self.create_general(rows, cols);
        self.storage.do_pointwise_divide(&*other.storage, &mut *result.storage)?;
        Ok(result)
    }

    pub fn pointwise_divide_into(&self, other: &Matrix<T>, result: &mut Matrix<T>) -> Result<(), LinalgError> {
        self.binary_into("Matrix::pointwise_divide", other, result, |a, b, r| {
            a.do_pointwise_divide(b, r)
        })
    }

    fn check_modulus(divisor: Option<T>) -> Result<(), LinalgError> {
        if !T::supports_modulus() {
            return Err(LinalgError::Unsupported(NO_MODULUS));
        }
        match divisor {
            Some(d) if is_zero(d) => Err(LinalgError::DivideByZero),
            _ => Ok(()),
        }
    }

    /// Canonical modulus: each result carries the sign of `divisor`.
    pub fn modulus(&self, divisor: T) -> Result<Matrix<T>, LinalgError> {
        Self::check_modulus(Some(divisor))?;
        let (rows, cols) = self.shape();
        let mut result = self.create_matrix(rows, cols);
        self.storage.do_modulus(divisor, &mut *result.storage)?;
        Ok(result)
    }

    pub fn modulus_into(&self, divisor: T, result: &mut Matrix<T>) -> Result<(), LinalgError> {
        Self::check_modulus(Some(divisor))?;
        self.unary_into("Matrix::modulus", result, |a, r| a.do_modulus(divisor, r))
    }

    /// Truncated remainder: each result carries the sign of the dividend.
    pub fn remainder(&self, divisor: T) -> Result<Matrix<T>, LinalgError> {
        Self::check_modulus(Some(divisor))?;
        let (rows, cols) = self.shape();
        let mut result = self.create_matrix(rows, cols);
        self.storage.do_remainder(divisor, &mut *result.storage)?;
        Ok(result)
    }

    pub fn remainder_into(&self, divisor: T, result: &mut Matrix<T>) -> Result<(), LinalgError> {
        Self::check_modulus(Some(divisor))?;
        self.unary_into("Matrix::remainder", result, |a, r| a.do_remainder(divisor, r))
    }

    pub fn pointwise_modulus(&self, divisor: &Matrix<T>) -> Result<Matrix<T>, LinalgError> {
        Self::check_modulus(None)?;
        self.check_same_shape("Matrix::pointwise_modulus", divisor)?;
        let (rows, cols) = self.shape();
        let mut result = self.create_general(rows, cols);
        self.storage.do_pointwise_modulus(&*divisor.storage, &mut *result.storage)?;
        Ok(result)
    }

    pub fn pointwise_modulus_into(&self, divisor: &Matrix<T>, result: &mut Matrix<T>) -> Result<(), LinalgError> {
        Self::check_modulus(None)?;
        self.binary_into("Matrix::pointwise_modulus", divisor, result, |a, b, r| {
            a.do_pointwise_modulus(b, r)
        })
    }

    pub fn pointwise_remainder(&self, divisor: &Matrix<T>) -> Result<Matrix<T>, LinalgError> {
        Self::check_modulus(None)?;
        self.check_same_shape("Matrix::pointwise_remainder", divisor)?;
        let (rows, cols) = self.shape();
        let mut result = self.create_general(rows, cols);
        self.storage.do_pointwise_remainder(&*divisor.storage, &mut *result.storage)?;
        Ok(result)
    }

    pub fn pointwise_remainder_into(&self, divisor: &Matrix<T>, result: &mut Matrix<T>) -> Result<(), LinalgError> {
        Self::check_modulus(None)?;
        self.binary_into("Matrix::pointwise_remainder", divisor, result, |a, b, r| {
            a.do_pointwise_remainder(b, r)
        })
    }

    // ---- unary -----------------------------------------------------------

    pub fn negate(&self) -> Result<Matrix<T>, LinalgError> {
        let (rows, cols) = self.shape();
        let mut result = self.create_matrix(rows, cols);
        self.storage.do_negate(&mut *result.storage)?;
        Ok(result)
    }

    pub fn negate_into(&self, result: &mut Matrix<T>) -> Result<(), LinalgError> {
        self.unary_into("Matrix::negate", result, |a, r| a.do_negate(r))
    }

    pub fn negate_in_place(&mut self) -> Result<(), LinalgError> {
        let computed = self.negate()?;
        self.assign_from(computed)
    }

    pub fn conjugate(&self) -> Result<Matrix<T>, LinalgError> {
        let (rows, cols) = self.shape();
        let mut result = self.create_matrix(rows, cols);
        self.storage.do_conjugate(&mut *result.storage)?;
        Ok(result)
    }

    pub fn conjugate_into(&self, result: &mut Matrix<T>) -> Result<(), LinalgError> {
        self.unary_into("Matrix::conjugate", result, |a, r| a.do_conjugate(r))
    }

    pub fn conjugate_in_place(&mut self) -> Result<(), LinalgError> {
        let computed = self.conjugate()?;
        self.assign_from(computed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a() -> Matrix<f64> {
        Matrix::dense_from_rows(2, 2, &[2.0, 0.0, 1.0, 3.0]).unwrap()
    }

    fn b() -> Matrix<f64> {
        Matrix::dense_from_rows(2, 2, &[1.0, 2.0, 0.0, 1.0]).unwrap()
    }

    #[test]
    fn in_place_product_reads_before_writing() {
        let mut lhs = a();
        lhs.multiply_in_place(&b()).unwrap();
        assert_eq!(lhs, Matrix::dense_from_rows(2, 2, &[2.0, 4.0, 1.0, 5.0]).unwrap());
        assert_eq!(lhs, a().multiply(&b()).unwrap());
    }

    #[test]
    fn in_place_product_on_sparse_receiver() {
        let mut lhs = Matrix::sparse_from_rows(2, 2, &[2.0, 0.0, 1.0, 3.0]).unwrap();
        lhs.multiply_in_place(&b()).unwrap();
        assert_eq!(lhs, Matrix::dense_from_rows(2, 2, &[2.0, 4.0, 1.0, 5.0]).unwrap());
        assert!(!lhs.storage().is_dense());
    }

    #[test]
    fn in_place_matrix_vector_product() {
        let mut v = Vector::dense_from_vec(vec![1.0, 1.0]);
        a().multiply_vector_in_place(&mut v).unwrap();
        assert_eq!(v.to_vec(), vec![2.0, 4.0]);
    }

    #[test]
    fn transposed_products() {
        // a * b^T = [[2,0],[1,3]] * [[1,0],[2,1]] = [[2,0],[7,3]]
        let abt = a().transpose_and_multiply(&b()).unwrap();
        assert_eq!(abt, Matrix::dense_from_rows(2, 2, &[2.0, 0.0, 7.0, 3.0]).unwrap());
        // a^T * b = [[2,1],[0,3]] * [[1,2],[0,1]] = [[2,5],[0,3]]
        let atb = a().transpose_this_and_multiply(&b()).unwrap();
        assert_eq!(atb, Matrix::dense_from_rows(2, 2, &[2.0, 5.0, 0.0, 3.0]).unwrap());
        let sparse = Matrix::sparse_from_rows(2, 2, &[2.0, 0.0, 1.0, 3.0]).unwrap();
        assert_eq!(sparse.transpose_this_and_multiply(&b()).unwrap(), atb);
    }

    #[test]
    fn left_multiply_is_row_vector_product() {
        let v = Vector::dense_from_vec(vec![1.0, 2.0]);
        // [1,2] * [[2,0],[1,3]] = [4,6]
        assert_eq!(a().left_multiply(&v).unwrap().to_vec(), vec![4.0, 6.0]);
    }

    #[test]
    fn wrong_result_shape_leaves_sentinel() {
        let mut result = Matrix::dense_from_fn(3, 2, |_, _| 42.0);
        let before = result.clone();
        assert!(matches!(a().multiply_into(&b(), &mut result), Err(LinalgError::DimensionMismatch { .. })));
        assert!(matches!(a().add_into(&b(), &mut result), Err(LinalgError::DimensionMismatch { .. })));
        assert!(matches!(a().negate_into(&mut result), Err(LinalgError::DimensionMismatch { .. })));
        assert_eq!(result, before);
    }

    #[test]
    fn kronecker_blocks() {
        let lhs = Matrix::dense_from_rows(1, 2, &[1.0, 2.0]).unwrap();
        let rhs = Matrix::dense_from_rows(2, 2, &[0.0, 1.0, 1.0, 0.0]).unwrap();
        let k = lhs.kronecker_product(&rhs).unwrap();
        assert_eq!(k.shape(), (2, 4));
        assert_eq!(k.to_row_major_vec(), vec![0.0, 1.0, 0.0, 2.0, 1.0, 0.0, 2.0, 0.0]);
    }

    #[test]
    fn diagonal_scaling_stays_diagonal() {
        let d = Matrix::diagonal_from_slice(3, 3, &[1.0, 2.0, 3.0]).unwrap();
        let scaled = d.multiply_scalar(2.0).unwrap();
        assert!(scaled.storage().flags().contains(crate::core::traits::StorageFlags::DIAGONAL));
        assert_eq!(scaled.at(2, 2).unwrap(), 6.0);
        let shifted = d.add_scalar(1.0).unwrap();
        assert_eq!(shifted.at(0, 1).unwrap(), 1.0);
    }
}
