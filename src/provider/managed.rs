//! Pure-Rust provider, parallelized over output columns with rayon.

use super::{ColumnMajor, LinearAlgebraProvider, Transpose};
use crate::core::scalar::Scalar;
use crate::error::LinalgError;
use crate::factorization::{lu, svd};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Default provider: portable loops, no external kernels.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManagedProvider;

impl<T: Scalar> LinearAlgebraProvider<T> for ManagedProvider {
    fn name(&self) -> &'static str {
        "managed"
    }

    fn dot_product(&self, x: &[T], y: &[T]) -> T {
        assert_eq!(x.len(), y.len(), "Vectors must have the same length");
        #[cfg(feature = "rayon")]
        if crate::config::parallel_enabled(x.len()) {
            return x
                .par_iter()
                .zip(y.par_iter())
                .map(|(xi, yi)| *xi * *yi)
                .reduce(T::zero, |acc, v| acc + v);
        }
        x.iter()
            .zip(y.iter())
            .fold(T::zero(), |acc, (xi, yi)| acc + *xi * *yi)
    }

    fn conjugate_dot_product(&self, x: &[T], y: &[T]) -> T {
        assert_eq!(x.len(), y.len(), "Vectors must have the same length");
        x.iter()
            .zip(y.iter())
            .fold(T::zero(), |acc, (xi, yi)| acc + xi.conjugate() * *yi)
    }

    fn matrix_multiply(
        &self,
        op_a: Transpose,
        a: ColumnMajor<'_, T>,
        op_b: Transpose,
        b: ColumnMajor<'_, T>,
        c: &mut [T],
    ) {
        let (m, k) = a.op_shape(op_a);
        let (kb, n) = b.op_shape(op_b);
        assert_eq!(k, kb, "inner dimensions must agree");
        assert_eq!(c.len(), m * n, "output buffer has incorrect length");
        if m == 0 || n == 0 {
            return;
        }
        let column = |j: usize, out: &mut [T]| {
            for (i, slot) in out.iter_mut().enumerate() {
                let mut sum = T::zero();
                for l in 0..k {
                    sum = sum + a.op_at(op_a, i, l) * b.op_at(op_b, l, j);
                }
                *slot = sum;
            }
        };
        #[cfg(feature = "rayon")]
        if crate::config::parallel_enabled(m * n * k.max(1)) {
            c.par_chunks_mut(m)
                .enumerate()
                .for_each(|(j, out)| column(j, out));
            return;
        }
        for (j, out) in c.chunks_mut(m).enumerate() {
            column(j, out);
        }
    }

    fn lu_inverse(&self, a: &mut [T], order: usize) -> Result<(), LinalgError> {
        let mut packed = a.to_vec();
        let mut perm = vec![0; order];
        let info = lu::lu_in_place(&mut packed, order, &mut perm);
        if info.singular {
            return Err(LinalgError::Singular);
        }
        let mut e = vec![T::zero(); order];
        let mut x = vec![T::zero(); order];
        for j in 0..order {
            e.iter_mut().for_each(|v| *v = T::zero());
            e[j] = T::one();
            lu::lu_solve(&packed, order, &perm, &e, &mut x);
            a[j * order..(j + 1) * order].copy_from_slice(&x);
        }
        Ok(())
    }

    fn singular_values(&self, a: ColumnMajor<'_, T>) -> Result<Vec<T::Real>, LinalgError> {
        svd::jacobi_singular_values(a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiply_with_transposed_operands() {
        // a = [[1,2],[3,4]] column-major, b = [[5,6],[7,8]]
        let a = [1.0, 3.0, 2.0, 4.0];
        let b = [5.0, 7.0, 6.0, 8.0];
        let mut c = [0.0; 4];
        let p = ManagedProvider;
        p.matrix_multiply(
            Transpose::No,
            ColumnMajor::new(&a, 2, 2),
            Transpose::No,
            ColumnMajor::new(&b, 2, 2),
            &mut c,
        );
        assert_eq!(c, [19.0, 43.0, 22.0, 50.0]);
        p.matrix_multiply(
            Transpose::Yes,
            ColumnMajor::new(&a, 2, 2),
            Transpose::No,
            ColumnMajor::new(&b, 2, 2),
            &mut c,
        );
        // a^T b = [[26,30],[38,44]]
        assert_eq!(c, [26.0, 38.0, 30.0, 44.0]);
    }

    #[test]
    fn inverse_of_singular_is_rejected() {
        let mut a = [1.0, 2.0, 2.0, 4.0];
        let p = ManagedProvider;
        assert_eq!(p.lu_inverse(&mut a, 2), Err(LinalgError::Singular));
    }
}
