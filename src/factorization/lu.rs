//! LU factorization with partial pivoting.
//!
//! The packed kernels operate on column-major buffers: on return the upper
//! triangle (with the diagonal) holds U and the strict lower triangle holds
//! the multipliers of L (unit diagonal implied).

use crate::core::scalar::Scalar;
use crate::error::LinalgError;
use crate::matrix::Matrix;
use crate::permutation::Permutation;
use crate::vector::Vector;
use num_traits::Zero;

/// Outcome of [`lu_in_place`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct LuInfo {
    /// A zero pivot was met; the factors are still usable for the determinant.
    pub singular: bool,
    /// Number of row interchanges performed.
    pub swaps: usize,
}

/// Factor the column-major `n x n` buffer `a` in place.
///
/// `perm[i]` receives the original row that ended up in row `i`.
pub(crate) fn lu_in_place<T: Scalar>(a: &mut [T], n: usize, perm: &mut [usize]) -> LuInfo {
    debug_assert_eq!(a.len(), n * n);
    for (i, p) in perm.iter_mut().enumerate() {
        *p = i;
    }
    let mut info = LuInfo { singular: false, swaps: 0 };

    for col in 0..n {
        // Partial pivoting: largest modulus in this column
        let mut max_row = col;
        let mut max_val = a[col * n + col].magnitude();
        for row in (col + 1)..n {
            let val = a[col * n + row].magnitude();
            if val > max_val {
                max_val = val;
                max_row = row;
            }
        }
        if max_val.is_zero() {
            info.singular = true;
            continue;
        }

        if max_row != col {
            for j in 0..n {
                a.swap(j * n + col, j * n + max_row);
            }
            perm.swap(col, max_row);
            info.swaps += 1;
        }

        let pivot = a[col * n + col];
        for row in (col + 1)..n {
            a[col * n + row] = a[col * n + row] / pivot;
        }
        for j in (col + 1)..n {
            let f = a[j * n + col];
            if f.is_zero() {
                continue;
            }
            for row in (col + 1)..n {
                a[j * n + row] = a[j * n + row] - a[col * n + row] * f;
            }
        }
    }
    info
}

/// Solve `A x = b` from the packed factors of [`lu_in_place`].
pub(crate) fn lu_solve<T: Scalar>(lu: &[T], n: usize, perm: &[usize], b: &[T], x: &mut [T]) {
    // Forward substitution (L y = P b)
    for i in 0..n {
        let mut sum = b[perm[i]];
        for j in 0..i {
            sum = sum - lu[j * n + i] * x[j];
        }
        x[i] = sum;
    }
    // Back substitution (U x = y)
    for i in (0..n).rev() {
        let mut sum = x[i];
        for j in (i + 1)..n {
            sum = sum - lu[j * n + i] * x[j];
        }
        x[i] = sum / lu[i * n + i];
    }
}

/// LU factorization of a square matrix.
#[derive(Debug, Clone)]
pub struct Lu<T: Scalar> {
    /// Zero matrix in the input's representation, used to shape the inverse.
    template: Matrix<T>,
    packed: Vec<T>,
    perm: Vec<usize>,
    info: LuInfo,
}

impl<T: Scalar> Lu<T> {
    /// Factor `matrix` with partial pivoting.
    ///
    /// # Arguments
    /// * `matrix` - Square matrix in any representation; it is read once
    ///
    /// # Errors
    /// [`LinalgError::NotSquare`] for rectangular input. A singular matrix
    /// still factors; see [`Lu::is_singular`].
    pub fn new(matrix: &Matrix<T>) -> Result<Self, LinalgError> {
        let n = matrix.row_count();
        if n != matrix.column_count() {
            return Err(LinalgError::NotSquare { rows: n, cols: matrix.column_count() });
        }
        Ok(Self::factor_square(matrix))
    }

    /// Factor a matrix already known to be square.
    pub(crate) fn factor_square(matrix: &Matrix<T>) -> Self {
        let n = matrix.row_count();
        debug_assert_eq!(n, matrix.column_count());
        log::debug!("LU factorization of a {n}x{n} matrix");
        let mut packed = matrix.to_column_major_vec();
        let mut perm = vec![0; n];
        let info = lu_in_place(&mut packed, n, &mut perm);
        Lu { template: matrix.create_matrix(n, n), packed, perm, info }
    }

    pub fn order(&self) -> usize {
        self.perm.len()
    }

    /// True when a zero pivot was met.
    pub fn is_singular(&self) -> bool {
        self.info.singular
    }

    /// Product of the pivots, signed by the parity of the row interchanges.
    pub fn determinant(&self) -> T {
        if self.info.singular {
            return T::zero();
        }
        let n = self.order();
        let mut det = (0..n).fold(T::one(), |acc, i| acc * self.packed[i * n + i]);
        if self.info.swaps % 2 == 1 {
            det = -det;
        }
        det
    }

    /// Row permutation `P` with `P A = L U`.
    pub fn permutation(&self) -> Permutation {
        Permutation::from_unchecked(self.perm.clone())
    }

    /// Unit lower-triangular factor.
    pub fn lower(&self) -> Matrix<T> {
        let n = self.order();
        Matrix::dense_from_fn(n, n, |i, j| match i.cmp(&j) {
            std::cmp::Ordering::Greater => self.packed[j * n + i],
            std::cmp::Ordering::Equal => T::one(),
            std::cmp::Ordering::Less => T::zero(),
        })
    }

    /// Upper-triangular factor.
    pub fn upper(&self) -> Matrix<T> {
        let n = self.order();
        Matrix::dense_from_fn(n, n, |i, j| if i <= j { self.packed[j * n + i] } else { T::zero() })
    }

    /// Solve `A x = b`.
    pub fn solve(&self, b: &Vector<T>) -> Result<Vector<T>, LinalgError> {
        let n = self.order();
        if b.len() != n {
            return Err(LinalgError::length("Lu::solve", n, b.len()));
        }
        if self.info.singular {
            return Err(LinalgError::Singular);
        }
        let mut x = vec![T::zero(); n];
        lu_solve(&self.packed, n, &self.perm, &b.to_vec(), &mut x);
        Ok(Vector::dense_from_vec(x))
    }

    /// Inverse from the stored factors, one identity column per solve, in
    /// the representation of the factored matrix.
    pub fn inverse(&self) -> Result<Matrix<T>, LinalgError> {
        if self.info.singular {
            return Err(LinalgError::Singular);
        }
        let n = self.order();
        let mut values = vec![T::zero(); n * n];
        let mut e = vec![T::zero(); n];
        for (j, column) in values.chunks_mut(n.max(1)).enumerate().take(n) {
            e.fill(T::zero());
            e[j] = T::one();
            lu_solve(&self.packed, n, &self.perm, &e, column);
        }
        let mut result = self.template.clone();
        result.assign_column_major(&values)?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn packed_factors_reconstruct() {
        // [[2,1,1],[4,3,3],[8,7,9]]
        let a = Matrix::dense_from_rows(3, 3, &[2.0, 1.0, 1.0, 4.0, 3.0, 3.0, 8.0, 7.0, 9.0]).unwrap();
        let lu = Lu::new(&a).unwrap();
        let pa = {
            let mut m = a.clone();
            m.permute_rows(&lu.permutation().inverse()).unwrap();
            m
        };
        let prod = lu.lower().multiply(&lu.upper()).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                assert_abs_diff_eq!(prod.at(i, j).unwrap(), pa.at(i, j).unwrap(), epsilon = 1e-12);
            }
        }
        assert_abs_diff_eq!(lu.determinant(), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn solve_dense_system() {
        // [[2,1,1],[1,3,2],[1,0,0]] x = [4,5,6] -> x = [6,15,-23]
        let a = Matrix::dense_from_rows(3, 3, &[2.0, 1.0, 1.0, 1.0, 3.0, 2.0, 1.0, 0.0, 0.0]).unwrap();
        let b = Vector::dense_from_vec(vec![4.0, 5.0, 6.0]);
        let x = Lu::new(&a).unwrap().solve(&b).unwrap();
        let expected = [6.0, 15.0, -23.0];
        for (i, e) in expected.iter().enumerate() {
            assert_abs_diff_eq!(x.at(i).unwrap(), *e, epsilon = 1e-10);
        }
    }

    #[test]
    fn inverse_reuses_factors() {
        let a = Matrix::sparse_from_rows(3, 3, &[4.0, 0.0, 1.0, 0.0, 2.0, 0.0, 1.0, 0.0, 3.0]).unwrap();
        let lu = Lu::new(&a).unwrap();
        let inv = lu.inverse().unwrap();
        assert!(!inv.storage().is_dense());
        let identity = a.multiply(&inv).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(identity.at(i, j).unwrap(), expected, epsilon = 1e-12);
            }
        }
        assert_abs_diff_eq!(inv.at(1, 1).unwrap(), 0.5, epsilon = 1e-12);

        let singular = Matrix::dense_from_rows(2, 2, &[1.0, 2.0, 2.0, 4.0]).unwrap();
        assert!(matches!(Lu::new(&singular).unwrap().inverse(), Err(LinalgError::Singular)));
    }

    #[test]
    fn rectangular_is_rejected() {
        let a = Matrix::<f64>::dense(2, 3);
        assert!(matches!(Lu::new(&a), Err(LinalgError::NotSquare { rows: 2, cols: 3 })));
    }
}
