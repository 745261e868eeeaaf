//! Provider backed by faer's dense kernels: matmul, full-pivoting LU and SVD.
//!
//! Only real scalars route here (see [`Scalar::provider`](crate::Scalar::provider));
//! complex element types always use the managed provider.
//!
//! # References
//! - [faer crate documentation](https://docs.rs/faer)

use super::managed::ManagedProvider;
use super::{ColumnMajor, LinearAlgebraProvider, Transpose};
use crate::core::scalar::RealScalar;
use crate::error::LinalgError;
use faer::linalg::solvers::{FullPivLu, SolveCore};
use faer::traits::{ComplexField, RealField};
use faer::{Conj, Mat, MatRef};
use num_traits::Float;

/// Dense multiply, LU inverse and singular values through faer.
#[derive(Debug, Clone, Copy, Default)]
pub struct FaerProvider;

fn as_faer<'a, T: ComplexField>(m: ColumnMajor<'a, T>, op: Transpose) -> MatRef<'a, T> {
    let view = MatRef::from_column_major_slice(m.data, m.rows, m.cols);
    match op {
        Transpose::No => view,
        Transpose::Yes => view.transpose(),
    }
}

impl<T> LinearAlgebraProvider<T> for FaerProvider
where
    T: RealScalar + ComplexField + RealField,
{
    fn name(&self) -> &'static str {
        "faer"
    }

    fn dot_product(&self, x: &[T], y: &[T]) -> T {
        LinearAlgebraProvider::<T>::dot_product(&ManagedProvider, x, y)
    }

    fn conjugate_dot_product(&self, x: &[T], y: &[T]) -> T {
        LinearAlgebraProvider::<T>::dot_product(&ManagedProvider, x, y)
    }

    fn matrix_multiply(
        &self,
        op_a: Transpose,
        a: ColumnMajor<'_, T>,
        op_b: Transpose,
        b: ColumnMajor<'_, T>,
        c: &mut [T],
    ) {
        let (m, _) = a.op_shape(op_a);
        let lhs = as_faer(a, op_a);
        let rhs = as_faer(b, op_b);
        assert_eq!(lhs.ncols(), rhs.nrows(), "inner dimensions must agree");
        let prod: Mat<T> = lhs * rhs;
        assert_eq!(c.len(), prod.nrows() * prod.ncols(), "output buffer has incorrect length");
        for j in 0..prod.ncols() {
            for i in 0..prod.nrows() {
                c[j * m + i] = prod[(i, j)];
            }
        }
    }

    fn lu_inverse(&self, a: &mut [T], order: usize) -> Result<(), LinalgError> {
        let factor = FullPivLu::new(MatRef::from_column_major_slice(a, order, order));
        let mut inv = Mat::<T>::identity(order, order);
        factor.solve_in_place_with_conj(Conj::No, inv.as_mut());
        let mut values = Vec::with_capacity(order * order);
        for j in 0..order {
            for i in 0..order {
                let v = inv[(i, j)];
                if !Float::is_finite(v) {
                    return Err(LinalgError::Singular);
                }
                values.push(v);
            }
        }
        a.copy_from_slice(&values);
        Ok(())
    }

    fn singular_values(&self, a: ColumnMajor<'_, T>) -> Result<Vec<T>, LinalgError> {
        if a.rows == 0 || a.cols == 0 {
            return Ok(Vec::new());
        }
        as_faer(a, Transpose::No)
            .singular_values()
            .map_err(|e| LinalgError::Factorization(format!("faer SVD failed: {e:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn singular_values_of_wide_matrix() {
        // [[3,0,0],[0,0,4]] column-major
        let a = [3.0, 0.0, 0.0, 0.0, 0.0, 4.0];
        let s = FaerProvider.singular_values(ColumnMajor::new(&a, 2, 3)).unwrap();
        assert_eq!(s.len(), 2);
        assert_abs_diff_eq!(s[0], 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(s[1], 3.0, epsilon = 1e-12);
        assert!(FaerProvider.singular_values(ColumnMajor::new(&[] as &[f64], 0, 3)).unwrap().is_empty());
    }

    #[test]
    fn singular_inverse_is_rejected() {
        let mut a = [1.0, 2.0, 2.0, 4.0];
        assert_eq!(FaerProvider.lu_inverse(&mut a, 2), Err(LinalgError::Singular));
    }
}
