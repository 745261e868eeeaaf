//! Matrices whose row count equals their column count.

use std::ops::Deref;

use super::Matrix;
use crate::core::scalar::Scalar;
use crate::error::LinalgError;
use crate::factorization::Lu;

/// A [`Matrix`] checked to be square at construction.
///
/// Square-only queries (`trace`, `determinant`) cannot fail on shape here.
/// Everything else is reachable through `Deref`.
#[derive(Debug, Clone, PartialEq)]
pub struct SquareMatrix<T: Scalar>(Matrix<T>);

impl<T: Scalar> SquareMatrix<T> {
    pub fn new(matrix: Matrix<T>) -> Result<Self, LinalgError> {
        if !matrix.is_square() {
            return Err(LinalgError::NotSquare { rows: matrix.row_count(), cols: matrix.column_count() });
        }
        Ok(SquareMatrix(matrix))
    }

    /// Dense identity of the given order.
    pub fn identity(order: usize) -> Self {
        SquareMatrix(Matrix::dense_identity(order))
    }

    pub fn order(&self) -> usize {
        self.0.row_count()
    }

    pub fn trace(&self) -> T {
        (0..self.order()).fold(T::zero(), |acc, i| acc + self.0.storage.at(i, i))
    }

    pub fn determinant(&self) -> T {
        Lu::factor_square(&self.0).determinant()
    }

    pub fn inverse(&self) -> Result<SquareMatrix<T>, LinalgError> {
        Ok(SquareMatrix(self.0.inverse()?))
    }

    pub fn as_matrix(&self) -> &Matrix<T> {
        &self.0
    }

    pub fn into_matrix(self) -> Matrix<T> {
        self.0
    }
}

impl<T: Scalar> Deref for SquareMatrix<T> {
    type Target = Matrix<T>;

    fn deref(&self) -> &Matrix<T> {
        &self.0
    }
}

impl<T: Scalar> TryFrom<Matrix<T>> for SquareMatrix<T> {
    type Error = LinalgError;

    fn try_from(matrix: Matrix<T>) -> Result<Self, LinalgError> {
        SquareMatrix::new(matrix)
    }
}

impl<T: Scalar> From<SquareMatrix<T>> for Matrix<T> {
    fn from(square: SquareMatrix<T>) -> Matrix<T> {
        square.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn rejects_rectangular() {
        let err = SquareMatrix::new(Matrix::<f64>::dense(2, 3)).unwrap_err();
        assert_eq!(err, LinalgError::NotSquare { rows: 2, cols: 3 });
    }

    #[test]
    fn trace_and_determinant() {
        let m = Matrix::dense_from_rows(3, 3, &[1.0, 1.0, 2.0, 1.0, 1.0, 2.0, 1.0, 1.0, 2.0]).unwrap();
        let sq = SquareMatrix::new(m).unwrap();
        assert_eq!(sq.order(), 3);
        assert_eq!(sq.trace(), 4.0);
        assert_eq!(sq.determinant(), 0.0);

        let swapped = SquareMatrix::new(Matrix::dense_from_rows(2, 2, &[0.0, 1.0, 1.0, 0.0]).unwrap()).unwrap();
        assert_abs_diff_eq!(swapped.determinant(), -1.0, epsilon = 1e-12);
        assert_eq!(swapped.determinant(), swapped.as_matrix().determinant().unwrap());
    }

    #[test]
    fn deref_reaches_matrix_surface() {
        let id = SquareMatrix::<f64>::identity(3);
        assert!(id.is_symmetric());
        assert_eq!(id.inverse().unwrap(), id);
        let m: Matrix<f64> = id.into();
        assert_eq!(m.shape(), (3, 3));
    }
}
