//! Singular values and the queries derived from them.
//!
//! [`Svd`] takes its singular values from the active provider. The managed
//! provider uses the one-sided (Hestenes) Jacobi kernel below: columns of a
//! working copy are orthogonalized pairwise until every pair is numerically
//! orthogonal, and the singular values are then the column norms.
//! Complex input is handled by rotating against the phase of the column
//! inner product, so the same sweep serves every scalar type.

use crate::core::scalar::Scalar;
use crate::error::LinalgError;
use crate::matrix::Matrix;
use crate::provider::ColumnMajor;
use num_traits::{Float, One, Zero};

const MAX_SWEEPS: usize = 80;

/// Singular values of a matrix, sorted in descending order.
#[derive(Debug, Clone)]
pub struct Svd<T: Scalar> {
    rows: usize,
    cols: usize,
    singular_values: Vec<T::Real>,
}

impl<T: Scalar> Svd<T> {
    /// Factor `matrix`.
    ///
    /// `compute_vectors` is accepted for interface parity; only the singular
    /// values are needed by the derived queries, so vectors are never formed.
    pub fn new(matrix: &Matrix<T>, compute_vectors: bool) -> Result<Self, LinalgError> {
        let (rows, cols) = (matrix.row_count(), matrix.column_count());
        log::debug!("SVD of a {rows}x{cols} matrix (vectors requested: {compute_vectors})");
        let values = matrix.to_column_major_vec();
        let mut singular_values = T::provider().singular_values(ColumnMajor::new(&values, rows, cols))?;
        singular_values.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
        Ok(Svd { rows, cols, singular_values })
    }

    pub fn singular_values(&self) -> &[T::Real] {
        &self.singular_values
    }

    /// Largest singular value (zero for an empty matrix).
    pub fn norm2(&self) -> T::Real {
        self.singular_values.first().copied().unwrap_or_else(T::Real::zero)
    }

    /// Ratio of the largest to the smallest singular value; infinite when
    /// the smallest is zero.
    pub fn condition_number(&self) -> T::Real {
        match (self.singular_values.first(), self.singular_values.last()) {
            (Some(&max), Some(&min)) if !min.is_zero() => max / min,
            (Some(_), Some(_)) => T::Real::infinity(),
            _ => T::Real::zero(),
        }
    }

    /// Number of singular values above `max(rows, cols) * s_max * eps`.
    pub fn rank(&self) -> usize {
        let tol = self.tolerance();
        self.singular_values.iter().filter(|&&s| s > tol).count()
    }

    fn tolerance(&self) -> T::Real {
        let dim = <T::Real as Scalar>::from_f64(self.rows.max(self.cols) as f64);
        dim * self.norm2() * T::Real::epsilon()
    }
}

/// Singular values of a column-major `rows x cols` buffer, unsorted.
pub(crate) fn jacobi_singular_values<T: Scalar>(a: ColumnMajor<'_, T>) -> Result<Vec<T::Real>, LinalgError> {
    // Work on the orientation with at least as many rows as columns.
    let (m, n, mut work) = if a.rows >= a.cols {
        (a.rows, a.cols, a.data.to_vec())
    } else {
        let mut t = Vec::with_capacity(a.data.len());
        for i in 0..a.rows {
            t.extend((0..a.cols).map(|j| a.data[j * a.rows + i].conjugate()));
        }
        (a.cols, a.rows, t)
    };
    jacobi_sweeps(&mut work, m, n)?;
    Ok((0..n).map(|j| column_norm_sq(&work, m, j).sqrt()).collect())
}

fn column_norm_sq<T: Scalar>(a: &[T], m: usize, j: usize) -> T::Real {
    a[j * m..(j + 1) * m]
        .iter()
        .fold(T::Real::zero(), |acc, v| {
            let r = v.magnitude();
            acc + r * r
        })
}

fn jacobi_sweeps<T: Scalar>(a: &mut [T], m: usize, n: usize) -> Result<(), LinalgError> {
    let eps = T::Real::epsilon();
    let one = T::Real::one();
    let two = one + one;
    for _ in 0..MAX_SWEEPS {
        let mut rotated = false;
        for p in 0..n {
            for q in (p + 1)..n {
                let alpha = column_norm_sq(a, m, p);
                let beta = column_norm_sq(a, m, q);
                let gamma = (0..m).fold(T::zero(), |acc, i| {
                    acc + a[p * m + i].conjugate() * a[q * m + i]
                });
                let g = gamma.magnitude();
                if g.is_zero() || g <= eps * (alpha * beta).sqrt() {
                    continue;
                }
                rotated = true;
                let zeta = (beta - alpha) / (two * g);
                let t = zeta.signum() / (zeta.abs() + (one + zeta * zeta).sqrt());
                let c = one / (one + t * t).sqrt();
                let s = c * t;
                let phase = gamma / T::from_real(g);
                let (c, s) = (T::from_real(c), T::from_real(s));
                for i in 0..m {
                    let ap = a[p * m + i];
                    let bq = a[q * m + i] * phase.conjugate();
                    a[p * m + i] = ap * c - bq * s;
                    a[q * m + i] = (ap * s + bq * c) * phase;
                }
            }
        }
        if !rotated {
            return Ok(());
        }
    }
    Err(LinalgError::Factorization(format!(
        "one-sided Jacobi SVD did not converge in {MAX_SWEEPS} sweeps"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use num_complex::Complex64;

    #[test]
    fn diagonal_singular_values_sorted() {
        let a = Matrix::dense_from_rows(3, 3, &[1.0, 0.0, 0.0, 0.0, -5.0, 0.0, 0.0, 0.0, 3.0]).unwrap();
        let svd = Svd::new(&a, false).unwrap();
        let s = svd.singular_values();
        assert_abs_diff_eq!(s[0], 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(s[1], 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(s[2], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(svd.condition_number(), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn known_2x2() {
        // [[3,0],[4,5]] has singular values sqrt(45), sqrt(5)
        let a = Matrix::dense_from_rows(2, 2, &[3.0, 0.0, 4.0, 5.0]).unwrap();
        let svd = Svd::new(&a, false).unwrap();
        assert_abs_diff_eq!(svd.norm2(), 45f64.sqrt(), epsilon = 1e-10);
        assert_abs_diff_eq!(svd.singular_values()[1], 5f64.sqrt(), epsilon = 1e-10);
        assert_eq!(svd.rank(), 2);
    }

    #[test]
    fn wide_rank_deficient() {
        let a = Matrix::dense_from_rows(2, 3, &[1.0, 2.0, 3.0, 2.0, 4.0, 6.0]).unwrap();
        let svd = Svd::new(&a, false).unwrap();
        assert_eq!(svd.rank(), 1);
        assert_eq!(svd.singular_values().len(), 2);
    }

    #[test]
    fn complex_unitary_scaling() {
        // i * I has all singular values equal to one
        let i = Complex64::new(0.0, 1.0);
        let z = Complex64::new(0.0, 0.0);
        let a = Matrix::dense_from_rows(2, 2, &[i, z, z, i]).unwrap();
        let svd = Svd::new(&a, true).unwrap();
        assert_abs_diff_eq!(svd.norm2(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(svd.condition_number(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn complex_general() {
        // [[1, i],[i, 1]] has orthogonal columns of norm sqrt(2)
        let one = Complex64::new(1.0, 0.0);
        let i = Complex64::new(0.0, 1.0);
        let a = Matrix::dense_from_rows(2, 2, &[one, i, i, one]).unwrap();
        let svd = Svd::new(&a, false).unwrap();
        assert_abs_diff_eq!(svd.singular_values()[0], 2f64.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(svd.singular_values()[1], 2f64.sqrt(), epsilon = 1e-12);
    }
}
