//! Derived scalar queries, reductions and structural predicates.
//!
//! Factorization-backed queries build a fresh [`Lu`] or [`Svd`] on every
//! call; nothing is cached on the matrix.

use num_traits::{Float, Zero};

use super::Matrix;
use crate::core::scalar::Scalar;
use crate::error::LinalgError;
use crate::factorization::{Lu, Svd};
use crate::vector::{Vector, p_norm};

impl<T: Scalar> Matrix<T> {
    fn require_square(&self) -> Result<(), LinalgError> {
        if !self.is_square() {
            return Err(LinalgError::NotSquare { rows: self.row_count(), cols: self.column_count() });
        }
        Ok(())
    }

    /// Sum of the diagonal elements.
    pub fn trace(&self) -> Result<T, LinalgError> {
        self.require_square()?;
        Ok((0..self.row_count()).fold(T::zero(), |acc, i| acc + self.storage.at(i, i)))
    }

    /// Singular values in descending order, from the active provider.
    pub fn singular_values(&self) -> Result<Vec<T::Real>, LinalgError> {
        Ok(Svd::new(self, false)?.singular_values().to_vec())
    }

    /// Numerical rank from the singular values.
    pub fn rank(&self) -> Result<usize, LinalgError> {
        Ok(Svd::new(self, false)?.rank())
    }

    /// Ratio of the largest to the smallest singular value.
    pub fn condition_number(&self) -> Result<T::Real, LinalgError> {
        Ok(Svd::new(self, false)?.condition_number())
    }

    /// Spectral norm (largest singular value).
    pub fn l2_norm(&self) -> Result<T::Real, LinalgError> {
        Ok(Svd::new(self, false)?.norm2())
    }

    pub fn determinant(&self) -> Result<T, LinalgError> {
        Ok(Lu::new(self)?.determinant())
    }

    /// Inverse in this matrix's representation family, computed by the
    /// active provider.
    pub fn inverse(&self) -> Result<Matrix<T>, LinalgError> {
        self.require_square()?;
        let n = self.row_count();
        let mut values = self.to_column_major_vec();
        T::provider().lu_inverse(&mut values, n)?;
        let mut result = self.create_matrix(n, n);
        result.assign_column_major(&values)?;
        Ok(result)
    }

    fn magnitudes_by(&self, by_row: bool) -> Vec<Vec<T::Real>> {
        let lanes = if by_row { self.row_count() } else { self.column_count() };
        let mut grouped = vec![Vec::new(); lanes];
        for (i, j, v) in self.enumerate_non_zero_indexed() {
            grouped[if by_row { i } else { j }].push(v.magnitude());
        }
        grouped
    }

    /// Maximum absolute column sum.
    pub fn l1_norm(&self) -> T::Real {
        self.magnitudes_by(false)
            .into_iter()
            .map(|col| col.into_iter().fold(T::Real::zero(), |acc, m| acc + m))
            .fold(T::Real::zero(), Float::max)
    }

    /// Maximum absolute row sum.
    pub fn infinity_norm(&self) -> T::Real {
        self.magnitudes_by(true)
            .into_iter()
            .map(|row| row.into_iter().fold(T::Real::zero(), |acc, m| acc + m))
            .fold(T::Real::zero(), Float::max)
    }

    pub fn frobenius_norm(&self) -> T::Real {
        self.enumerate_non_zero_indexed()
            .fold(T::Real::zero(), |acc, (_, _, v)| {
                let m = v.magnitude();
                acc + m * m
            })
            .sqrt()
    }

    /// `p`-norm of every row.
    pub fn row_norms(&self, p: f64) -> Result<Vector<T::Real>, LinalgError> {
        let norms = self
            .magnitudes_by(true)
            .into_iter()
            .map(|row| p_norm(row.into_iter(), p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Vector::dense_from_vec(norms))
    }

    /// `p`-norm of every column.
    pub fn column_norms(&self, p: f64) -> Result<Vector<T::Real>, LinalgError> {
        let norms = self
            .magnitudes_by(false)
            .into_iter()
            .map(|col| p_norm(col.into_iter(), p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Vector::dense_from_vec(norms))
    }

    pub fn row_sums(&self) -> Vector<T> {
        let mut sums = vec![T::zero(); self.row_count()];
        for (i, _, v) in self.enumerate_non_zero_indexed() {
            sums[i] = sums[i] + v;
        }
        Vector::dense_from_vec(sums)
    }

    pub fn column_sums(&self) -> Vector<T> {
        let mut sums = vec![T::zero(); self.column_count()];
        for (_, j, v) in self.enumerate_non_zero_indexed() {
            sums[j] = sums[j] + v;
        }
        Vector::dense_from_vec(sums)
    }

    pub fn is_symmetric(&self) -> bool {
        self.is_square()
            && self
                .enumerate_non_zero_indexed()
                .all(|(i, j, v)| self.storage.at(j, i) == v)
    }

    /// Equal to its own conjugate transpose.
    pub fn is_hermitian(&self) -> bool {
        self.is_square()
            && self
                .enumerate_non_zero_indexed()
                .all(|(i, j, v)| self.storage.at(j, i) == v.conjugate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use num_complex::Complex64;

    #[test]
    fn singular_three_by_three() {
        let a = Matrix::dense_from_rows(3, 3, &[1.0, 1.0, 2.0, 1.0, 1.0, 2.0, 1.0, 1.0, 2.0]).unwrap();
        assert_eq!(a.trace().unwrap(), 4.0);
        assert_eq!(a.determinant().unwrap(), 0.0);
        assert_eq!(a.rank().unwrap(), 1);
        assert!(matches!(a.inverse(), Err(LinalgError::Singular)));
    }

    #[test]
    fn square_only_queries() {
        let a = Matrix::<f64>::dense(2, 3);
        assert!(matches!(a.trace(), Err(LinalgError::NotSquare { rows: 2, cols: 3 })));
        assert!(matches!(a.determinant(), Err(LinalgError::NotSquare { .. })));
        assert!(matches!(a.inverse(), Err(LinalgError::NotSquare { .. })));
    }

    #[test]
    fn inverse_keeps_family() {
        let a = Matrix::sparse_from_rows(2, 2, &[4.0, 7.0, 2.0, 6.0]).unwrap();
        let inv = a.inverse().unwrap();
        assert!(!inv.storage().is_dense());
        let id = a.multiply(&inv).unwrap();
        for i in 0..2 {
            for j in 0..2 {
                let e = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(id.at(i, j).unwrap(), e, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn norms() {
        let a = Matrix::dense_from_rows(2, 2, &[1.0, -2.0, -3.0, 4.0]).unwrap();
        assert_eq!(a.l1_norm(), 6.0);
        assert_eq!(a.infinity_norm(), 7.0);
        assert_abs_diff_eq!(a.frobenius_norm(), 30f64.sqrt(), epsilon = 1e-12);
        assert_eq!(a.row_norms(1.0).unwrap().to_vec(), vec![3.0, 7.0]);
        assert_eq!(a.column_norms(f64::INFINITY).unwrap().to_vec(), vec![3.0, 4.0]);
        assert!(a.row_norms(0.0).is_err());
        assert_eq!(a.row_sums().to_vec(), vec![-1.0, 1.0]);
        assert_eq!(a.column_sums().to_vec(), vec![-2.0, 2.0]);
    }

    #[test]
    fn l2_norm_of_diagonal() {
        let d = Matrix::diagonal_from_slice(3, 3, &[2.0, -7.0, 1.0]).unwrap();
        assert_abs_diff_eq!(d.l2_norm().unwrap(), 7.0, epsilon = 1e-12);
        let s = d.singular_values().unwrap();
        assert_eq!(s.len(), 3);
        assert_abs_diff_eq!(s[1], 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(s[2], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn symmetry_predicates() {
        let s = Matrix::dense_from_rows(2, 2, &[1.0, 2.0, 2.0, 3.0]).unwrap();
        assert!(s.is_symmetric());
        assert!(!Matrix::dense_from_rows(2, 2, &[1.0, 2.0, 0.0, 3.0]).unwrap().is_symmetric());
        assert!(!Matrix::<f64>::dense(2, 3).is_symmetric());

        let i = Complex64::new(0.0, 1.0);
        let one = Complex64::new(1.0, 0.0);
        let h = Matrix::dense_from_rows(2, 2, &[one, i, -i, one]).unwrap();
        assert!(h.is_hermitian());
        assert!(!h.is_symmetric());
    }
}
