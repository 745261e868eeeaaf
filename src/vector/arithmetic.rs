//! Validated vector arithmetic.
//!
//! Every primitive comes in three forms: one returning a new vector, an
//! `_into` form writing a caller-supplied result, and for the common ones an
//! `_in_place` form. Lengths are checked before any element is touched, and
//! the zero/one scalar identities never reach the storage hooks.
//!
//! A `&mut` result can never alias a borrowed operand, so `_into` forms call
//! the hooks directly. `_in_place` forms compute into a scratch vector and
//! copy it back into the receiver's own storage.

use super::Vector;
use crate::core::scalar::{Scalar, is_one, is_zero};
use crate::core::traits::VectorStorage;
use crate::error::LinalgError;
use crate::matrix::Matrix;

const NO_MODULUS: &str = "modulus is undefined for complex scalars";

impl<T: Scalar> Vector<T> {
    fn check_len(&self, op: &'static str, other: &Vector<T>) -> Result<(), LinalgError> {
        if other.len() != self.len() {
            return Err(LinalgError::length(op, self.len(), other.len()));
        }
        Ok(())
    }

    /// Zero vector able to hold any value, in this vector's family when possible.
    fn create_general(&self) -> Vector<T> {
        Vector::from_storage(self.storage.create_like(self.len(), true))
    }

    /// Result of a binary operation: dense wins, then any fully mutable operand.
    fn create_result_with(&self, other: &Vector<T>) -> Vector<T> {
        let (a, b) = (&*self.storage, &*other.storage);
        let len = self.len();
        let storage = if a.is_dense() {
            a.create_like(len, false)
        } else if b.is_dense() {
            b.create_like(len, false)
        } else if a.is_fully_mutable() {
            a.create_like(len, false)
        } else if b.is_fully_mutable() {
            b.create_like(len, false)
        } else {
            a.create_like(len, true)
        };
        Vector::from_storage(storage)
    }

    /// Overwrite this vector's storage with `computed`.
    pub(crate) fn assign_from(&mut self, computed: Vector<T>) -> Result<(), LinalgError> {
        computed.storage.copy_to(&mut *self.storage, false)
    }

    fn unary_into(
        &self,
        op: &'static str,
        result: &mut Vector<T>,
        hook: impl FnOnce(&dyn VectorStorage<T>, &mut dyn VectorStorage<T>) -> Result<(), LinalgError>,
    ) -> Result<(), LinalgError> {
        self.check_len(op, result)?;
        hook(&*self.storage, &mut *result.storage)
    }

    fn binary_into(
        &self,
        op: &'static str,
        other: &Vector<T>,
        result: &mut Vector<T>,
        hook: impl FnOnce(&dyn VectorStorage<T>, &dyn VectorStorage<T>, &mut dyn VectorStorage<T>) -> Result<(), LinalgError>,
    ) -> Result<(), LinalgError> {
        self.check_len(op, other)?;
        self.check_len(op, result)?;
        hook(&*self.storage, &*other.storage, &mut *result.storage)
    }

    // ---- scalar addition -------------------------------------------------

    pub fn add_scalar(&self, scalar: T) -> Result<Vector<T>, LinalgError> {
        if is_zero(scalar) {
            return Ok(self.clone());
        }
        let mut result = self.create_general();
        self.storage.do_add_scalar(scalar, &mut *result.storage)?;
        Ok(result)
    }

    pub fn add_scalar_into(&self, scalar: T, result: &mut Vector<T>) -> Result<(), LinalgError> {
        self.check_len("Vector::add_scalar", result)?;
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

    pub fn subtract_scalar(&self, scalar: T) -> Result<Vector<T>, LinalgError> {
        self.add_scalar(-scalar)
    }

    pub fn subtract_scalar_into(&self, scalar: T, result: &mut Vector<T>) -> Result<(), LinalgError> {
        self.add_scalar_into(-scalar, result)
    }

    /// `scalar - self`
    pub fn subtract_from_scalar(&self, scalar: T) -> Result<Vector<T>, LinalgError> {
        let mut result = self.create_general();
        self.storage.do_negate(&mut *result.storage)?;
        result.add_scalar(scalar)
    }

    pub fn subtract_from_scalar_into(&self, scalar: T, result: &mut Vector<T>) -> Result<(), LinalgError> {
        self.check_len("Vector::subtract_from_scalar", result)?;
        let computed = self.subtract_from_scalar(scalar)?;
        result.assign_from(computed)
    }

    pub fn subtract_from_scalar_in_place(&mut self, scalar: T) -> Result<(), LinalgError> {
        let computed = self.subtract_from_scalar(scalar)?;
        self.assign_from(computed)
    }

    // ---- vector addition -------------------------------------------------

    pub fn add(&self, other: &Vector<T>) -> Result<Vector<T>, LinalgError> {
        self.check_len("Vector::add", other)?;
        let mut result = self.create_result_with(other);
        self.storage.do_add(&*other.storage, &mut *result.storage)?;
        Ok(result)
    }

    pub fn add_into(&self, other: &Vector<T>, result: &mut Vector<T>) -> Result<(), LinalgError> {
        self.binary_into("Vector::add", other, result, |a, b, r| a.do_add(b, r))
    }

    pub fn add_in_place(&mut self, other: &Vector<T>) -> Result<(), LinalgError> {
        let computed = self.add(other)?;
        self.assign_from(computed)
    }

    pub fn subtract(&self, other: &Vector<T>) -> Result<Vector<T>, LinalgError> {
        self.check_len("Vector::subtract", other)?;
        let mut result = self.create_result_with(other);
        self.storage.do_subtract(&*other.storage, &mut *result.storage)?;
        Ok(result)
    }

    pub fn subtract_into(&self, other: &Vector<T>, result: &mut Vector<T>) -> Result<(), LinalgError> {
        self.binary_into("Vector::subtract", other, result, |a, b, r| a.do_subtract(b, r))
    }

    pub fn subtract_in_place(&mut self, other: &Vector<T>) -> Result<(), LinalgError> {
        let computed = self.subtract(other)?;
        self.assign_from(computed)
    }

    // ---- scaling ---------------------------------------------------------

    pub fn multiply_scalar(&self, scalar: T) -> Result<Vector<T>, LinalgError> {
        if is_one(scalar) {
            return Ok(self.clone());
        }
        if is_zero(scalar) {
            return Ok(self.create_vector(self.len()));
        }
        let mut result = self.create_vector(self.len());
        self.storage.do_multiply_scalar(scalar, &mut *result.storage)?;
        Ok(result)
    }

    pub fn multiply_scalar_into(&self, scalar: T, result: &mut Vector<T>) -> Result<(), LinalgError> {
        self.check_len("Vector::multiply_scalar", result)?;
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
    pub fn divide_scalar(&self, scalar: T) -> Result<Vector<T>, LinalgError> {
        if is_zero(scalar) {
            return Err(LinalgError::DivideByZero);
        }
        if is_one(scalar) {
            return Ok(self.clone());
        }
        let mut result = self.create_vector(self.len());
        self.storage.do_divide_scalar(scalar, &mut *result.storage)?;
        Ok(result)
    }

    pub fn divide_scalar_into(&self, scalar: T, result: &mut Vector<T>) -> Result<(), LinalgError> {
        self.check_len("Vector::divide_scalar", result)?;
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
    pub fn scalar_divide(&self, scalar: T) -> Result<Vector<T>, LinalgError> {
        let mut result = self.create_general();
        self.storage.do_divide_by_scalar(scalar, &mut *result.storage)?;
        Ok(result)
    }

    pub fn scalar_divide_into(&self, scalar: T, result: &mut Vector<T>) -> Result<(), LinalgError> {
        self.unary_into("Vector::scalar_divide", result, |a, r| a.do_divide_by_scalar(scalar, r))
    }

    // ---- products --------------------------------------------------------

    /// `sum(self[i] * other[i])`
    pub fn dot(&self, other: &Vector<T>) -> Result<T, LinalgError> {
        self.check_len("Vector::dot", other)?;
        Ok(self.storage.do_dot(&*other.storage))
    }

    /// `sum(conj(self[i]) * other[i])`
    pub fn conjugate_dot(&self, other: &Vector<T>) -> Result<T, LinalgError> {
        self.check_len("Vector::conjugate_dot", other)?;
        Ok(self.storage.do_conjugate_dot(&*other.storage))
    }

    /// `u v^T`, built row by row in `self`'s matrix family.
    pub fn outer_product(&self, other: &Vector<T>) -> Result<Matrix<T>, LinalgError> {
        let mut result = self.create_matrix(self.len(), other.len());
        for (i, u) in self.enumerate_non_zero() {
            let row = other.multiply_scalar(u)?;
            result.set_row(i, &row)?;
        }
        Ok(result)
    }

    pub fn pointwise_multiply(&self, other: &Vector<T>) -> Result<Vector<T>, LinalgError> {
        self.check_len("Vector::pointwise_multiply", other)?;
        let mut result = self.create_result_with(other);
        self.storage.do_pointwise_multiply(&*other.storage, &mut *result.storage)?;
        Ok(result)
    }

    pub fn pointwise_multiply_into(&self, other: &Vector<T>, result: &mut Vector<T>) -> Result<(), LinalgError> {
        self.binary_into("Vector::pointwise_multiply", other, result, |a, b, r| {
            a.do_pointwise_multiply(b, r)
        })
    }

    pub fn pointwise_multiply_in_place(&mut self, other: &Vector<T>) -> Result<(), LinalgError> {
        let computed = self.pointwise_multiply(other)?;
        self.assign_from(computed)
    }

    pub fn pointwise_divide(&self, other: &Vector<T>) -> Result<Vector<T>, LinalgError> {
        self.check_len("Vector::pointwise_divide", other)?;
        let mut result = self.create_general();
        self.storage.do_pointwise_divide(&*other.storage, &mut *result.storage)?;
        Ok(result)
    }

    pub fn pointwise_divide_into(&self, other: &Vector<T>, result: &mut Vector<T>) -> Result<(), LinalgError> {
        self.binary_into("Vector::pointwise_divide", other, result, |a, b, r| {
            a.do_pointwise_divide(b, r)
        })
    }

    // ---- modulus ---------------------------------------------------------

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
    pub fn modulus(&self, divisor: T) -> Result<Vector<T>, LinalgError> {
        Self::check_modulus(Some(divisor))?;
        let mut result = self.create_vector(self.len());
        self.storage.do_modulus(divisor, &mut *result.storage)?;
        Ok(result)
    }

    pub fn modulus_into(&self, divisor: T, result: &mut Vector<T>) -> Result<(), LinalgError> {
        Self::check_modulus(Some(divisor))?;
        self.unary_into("Vector::modulus", result, |a, r| a.do_modulus(divisor, r))
    }

    /// Truncated remainder: each result carries the sign of the dividend.
    pub fn remainder(&self, divisor: T) -> Result<Vector<T>, LinalgError> {
        Self::check_modulus(Some(divisor))?;
        let mut result = self.create_vector(self.len());
        self.storage.do_remainder(divisor, &mut *result.storage)?;
        Ok(result)
    }

    pub fn remainder_into(&self, divisor: T, result: &mut Vector<T>) -> Result<(), LinalgError> {
        Self::check_modulus(Some(divisor))?;
        self.unary_into("Vector::remainder", result, |a, r| a.do_remainder(divisor, r))
    }

    pub fn pointwise_modulus(&self, divisor: &Vector<T>) -> Result<Vector<T>, LinalgError> {
        Self::check_modulus(None)?;
        self.check_len("Vector::pointwise_modulus", divisor)?;
        let mut result = self.create_general();
        self.storage.do_pointwise_modulus(&*divisor.storage, &mut *result.storage)?;
        Ok(result)
    }

    pub fn pointwise_modulus_into(&self, divisor: &Vector<T>, result: &mut Vector<T>) -> Result<(), LinalgError> {
        Self::check_modulus(None)?;
        self.binary_into("Vector::pointwise_modulus", divisor, result, |a, b, r| {
            a.do_pointwise_modulus(b, r)
        })
    }

    pub fn pointwise_remainder(&self, divisor: &Vector<T>) -> Result<Vector<T>, LinalgError> {
        Self::check_modulus(None)?;
        self.check_len("Vector::pointwise_remainder", divisor)?;
        let mut result = self.create_general();
        self.storage.do_pointwise_remainder(&*divisor.storage, &mut *result.storage)?;
        Ok(result)
    }

    pub fn pointwise_remainder_into(&self, divisor: &Vector<T>, result: &mut Vector<T>) -> Result<(), LinalgError> {
        Self::check_modulus(None)?;
        self.binary_into("Vector::pointwise_remainder", divisor, result, |a, b, r| {
            a.do_pointwise_remainder(b, r)
        })
    }

    // ---- unary -----------------------------------------------------------

    pub fn negate(&self) -> Result<Vector<T>, LinalgError> {
        let mut result = self.create_vector(self.len());
        self.storage.do_negate(&mut *result.storage)?;
        Ok(result)
    }

    pub fn negate_into(&self, result: &mut Vector<T>) -> Result<(), LinalgError> {
        self.unary_into("Vector::negate", result, |a, r| a.do_negate(r))
    }

    pub fn negate_in_place(&mut self) -> Result<(), LinalgError> {
        let computed = self.negate()?;
        self.assign_from(computed)
    }

    pub fn conjugate(&self) -> Result<Vector<T>, LinalgError> {
        let mut result = self.create_vector(self.len());
        self.storage.do_conjugate(&mut *result.storage)?;
        Ok(result)
    }

    pub fn conjugate_into(&self, result: &mut Vector<T>) -> Result<(), LinalgError> {
        self.unary_into("Vector::conjugate", result, |a, r| a.do_conjugate(r))
    }

    pub fn conjugate_in_place(&mut self) -> Result<(), LinalgError> {
        let computed = self.conjugate()?;
        self.assign_from(computed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    #[test]
    fn add_then_subtract_round_trips() {
        let a = Vector::dense_from_vec(vec![1.0, -2.0, 3.5]);
        let b = Vector::sparse_from_slice(&[0.0, 4.0, -1.0]);
        assert_eq!(a.add(&b).unwrap().subtract(&b).unwrap(), a);
    }

    #[test]
    fn scalar_identities_short_circuit() {
        for v in [Vector::dense_from_vec(vec![1.0, 0.0, 2.0]), Vector::sparse_from_slice(&[1.0, 0.0, 2.0])] {
            assert_eq!(v.multiply_scalar(1.0).unwrap(), v);
            assert_eq!(v.add_scalar(0.0).unwrap(), v);
            let zero = v.multiply_scalar(0.0).unwrap();
            assert_eq!(zero.len(), 3);
            assert_eq!(zero.enumerate_non_zero().count(), 0);
        }
    }

    #[test]
    fn mismatched_result_is_untouched() {
        let a = Vector::dense_from_vec(vec![1.0, 2.0, 3.0]);
        let b = Vector::dense_from_vec(vec![1.0, 1.0, 1.0]);
        let mut result = Vector::dense_from_vec(vec![-7.0; 2]);
        assert!(matches!(
            a.add_into(&b, &mut result),
            Err(LinalgError::DimensionMismatch { .. })
        ));
        assert_eq!(result.to_vec(), vec![-7.0, -7.0]);
    }

    #[test]
    fn divide_by_zero_is_fatal() {
        let a = Vector::dense_from_vec(vec![1.0, 2.0]);
        assert_eq!(a.divide_scalar(0.0).unwrap_err(), LinalgError::DivideByZero);
        assert_eq!(a.modulus(0.0).unwrap_err(), LinalgError::DivideByZero);
    }

    #[test]
    fn subtract_from_scalar_in_place() {
        let mut a = Vector::sparse_from_slice(&[1.0, 0.0, 3.0]);
        a.subtract_from_scalar_in_place(1.0).unwrap();
        assert_eq!(a.to_vec(), vec![0.0, 1.0, -2.0]);
        assert!(!a.storage().is_dense());
    }

    #[test]
    fn modulus_and_remainder_signs() {
        let a = Vector::dense_from_vec(vec![-7.0, 7.0]);
        assert_eq!(a.modulus(3.0).unwrap().to_vec(), vec![2.0, 1.0]);
        assert_eq!(a.remainder(3.0).unwrap().to_vec(), vec![-1.0, 1.0]);
        let d = Vector::dense_from_vec(vec![3.0, -3.0]);
        assert_eq!(a.pointwise_modulus(&d).unwrap().to_vec(), vec![2.0, -2.0]);
    }

    #[test]
    fn complex_modulus_is_unsupported() {
        let a = Vector::dense_from_vec(vec![Complex64::new(1.0, 1.0)]);
        assert!(matches!(a.modulus(Complex64::new(2.0, 0.0)), Err(LinalgError::Unsupported(_))));
    }

    #[test]
    fn dot_products() {
        let a = Vector::dense_from_vec(vec![1.0, 2.0, 3.0]);
        let b = Vector::sparse_from_slice(&[4.0, 0.0, 6.0]);
        assert_eq!(a.dot(&b).unwrap(), 22.0);
        assert_eq!(b.dot(&a).unwrap(), 22.0);
        assert!(a.dot(&Vector::dense(2)).is_err());

        let z = Vector::dense_from_vec(vec![Complex64::new(0.0, 1.0)]);
        assert_eq!(z.conjugate_dot(&z).unwrap(), Complex64::new(1.0, 0.0));
        assert_eq!(z.dot(&z).unwrap(), Complex64::new(-1.0, 0.0));
    }

    #[test]
    fn outer_product_cells() {
        let u = Vector::dense_from_vec(vec![1.0, 2.0, 3.0]);
        let v = Vector::dense_from_vec(vec![1.0, 0.0, -1.0]);
        let m = u.outer_product(&v).unwrap();
        assert_eq!((m.row_count(), m.column_count()), (3, 3));
        assert_eq!(m.at(2, 2).unwrap(), -3.0);
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(m.at(i, j).unwrap(), u.at(i).unwrap() * v.at(j).unwrap());
            }
        }
    }

    #[test]
    fn in_place_forms_keep_representation() {
        let mut s = Vector::sparse_from_slice(&[0.0, 2.0, 0.0, 4.0]);
        s.multiply_scalar_in_place(0.5).unwrap();
        s.negate_in_place().unwrap();
        assert_eq!(s.to_vec(), vec![0.0, -1.0, 0.0, -2.0]);
        assert!(!s.storage().is_dense());
    }
}
