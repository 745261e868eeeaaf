//! Representation-agnostic composition.
//!
//! Everything here is built from element access, row and column writes and
//! sub-matrix copies. Results come from the source's factory; operations that
//! may leave a structural pattern (append, stack, insertions) ask for a fully
//! mutable representation.

use super::Matrix;
use crate::core::scalar::{Scalar, is_zero};
use crate::core::traits::{Extent, Origin, OUTSIDE_PATTERN};
use crate::error::LinalgError;
use crate::permutation::Permutation;
use crate::vector::Vector;

const CONSTRAINED_PERMUTATION: &str = "permutation of a structurally constrained matrix";

impl<T: Scalar> Matrix<T> {
    fn check_row(&self, row: usize) -> Result<(), LinalgError> {
        if row >= self.row_count() {
            return Err(LinalgError::IndexOutOfRange { index: row, bound: self.row_count() });
        }
        Ok(())
    }

    fn check_column(&self, col: usize) -> Result<(), LinalgError> {
        if col >= self.column_count() {
            return Err(LinalgError::IndexOutOfRange { index: col, bound: self.column_count() });
        }
        Ok(())
    }

    fn check_block(&self, origin: Origin, extent: Extent) -> Result<(), LinalgError> {
        if origin.0.checked_add(extent.0).is_none_or(|end| end > self.row_count()) {
            return Err(LinalgError::IndexOutOfRange {
                index: origin.0.saturating_add(extent.0),
                bound: self.row_count(),
            });
        }
        if origin.1.checked_add(extent.1).is_none_or(|end| end > self.column_count()) {
            return Err(LinalgError::IndexOutOfRange {
                index: origin.1.saturating_add(extent.1),
                bound: self.column_count(),
            });
        }
        Ok(())
    }

    /// Clear the block at `origin` and write `cells` into it. Fails before
    /// touching anything if a non-zero cell is outside the storage's pattern.
    fn write_block(&mut self, origin: Origin, extent: Extent, cells: Vec<(usize, usize, T)>) -> Result<(), LinalgError> {
        if !self.storage.is_fully_mutable()
            && cells.iter().any(|&(i, j, v)| !is_zero(v) && !self.storage.is_mutable_at(i, j))
        {
            return Err(LinalgError::Unsupported(OUTSIDE_PATTERN));
        }
        self.storage.clear_region(origin, extent);
        for (i, j, v) in cells {
            if !is_zero(v) {
                self.storage.set_at(i, j, v)?;
            }
        }
        Ok(())
    }

    /// Vector in this matrix's vector family holding `values`.
    fn vector_from_values(&self, values: Vec<T>) -> Vector<T> {
        let mut vector = self.create_vector(values.len());
        match vector.set_values(&values) {
            Ok(()) => vector,
            Err(_) => Vector::dense_from_vec(values),
        }
    }

    fn row_values(&self, row: usize) -> Vec<T> {
        (0..self.column_count()).map(|j| self.storage.at(row, j)).collect()
    }

    fn column_values(&self, col: usize) -> Vec<T> {
        (0..self.row_count()).map(|i| self.storage.at(i, col)).collect()
    }

    // ---- transpose -------------------------------------------------------

    fn transposed_values(&self, f: impl Fn(T) -> T) -> Vec<T> {
        let cols = self.column_count();
        let mut values = vec![T::zero(); self.row_count() * cols];
        for (i, j, v) in self.enumerate_non_zero_indexed() {
            values[i * cols + j] = f(v);
        }
        values
    }

    pub fn transpose(&self) -> Matrix<T> {
        let (rows, cols) = self.shape();
        self.materialize(cols, rows, self.transposed_values(|v| v))
    }

    pub fn transpose_into(&self, result: &mut Matrix<T>) -> Result<(), LinalgError> {
        let expected = (self.column_count(), self.row_count());
        if result.shape() != expected {
            return Err(LinalgError::shape("Matrix::transpose", expected, result.shape()));
        }
        result.assign_from(self.transpose())
    }

    /// Transpose with every element conjugated.
    pub fn conjugate_transpose(&self) -> Matrix<T> {
        let (rows, cols) = self.shape();
        self.materialize(cols, rows, self.transposed_values(|v| v.conjugate()))
    }

    pub fn conjugate_transpose_into(&self, result: &mut Matrix<T>) -> Result<(), LinalgError> {
        let expected = (self.column_count(), self.row_count());
        if result.shape() != expected {
            return Err(LinalgError::shape("Matrix::conjugate_transpose", expected, result.shape()));
        }
        result.assign_from(self.conjugate_transpose())
    }

    // ---- sub-matrices ----------------------------------------------------

    /// Copy of the `row_count x column_count` block at `(row, col)`.
    ///
    /// The block keeps this matrix's representation when it can; otherwise
    /// it comes from the fully mutable factory.
    ///
    /// # Arguments
    /// * `row`, `col` - Top-left corner of the block
    /// * `row_count`, `column_count` - Extent of the block
    ///
    /// # Errors
    /// [`LinalgError::IndexOutOfRange`] when the block leaves the matrix.
    pub fn sub_matrix(
        &self,
        row: usize,
        row_count: usize,
        col: usize,
        column_count: usize,
    ) -> Result<Matrix<T>, LinalgError> {
        let extent = (row_count, column_count);
        self.check_block((row, col), extent)?;
        let mut result = self.create_matrix(row_count, column_count);
        if self
            .storage
            .copy_sub_matrix_to(&mut *result.storage, (row, col), (0, 0), extent, true)
            .is_err()
        {
            log::debug!("sub_matrix at ({row}, {col}) leaves the source pattern, using a general result");
            result = self.create_general(row_count, column_count);
            self.storage
                .copy_sub_matrix_to(&mut *result.storage, (row, col), (0, 0), extent, true)?;
        }
        Ok(result)
    }

    /// Overwrite the block at `(row, col)` with `block`.
    pub fn set_sub_matrix(&mut self, row: usize, col: usize, block: &Matrix<T>) -> Result<(), LinalgError> {
        self.check_block((row, col), block.shape())?;
        block
            .storage
            .copy_sub_matrix_to(&mut *self.storage, (0, 0), (row, col), block.shape(), false)
    }

    pub fn clear_sub_matrix(
        &mut self,
        row: usize,
        row_count: usize,
        col: usize,
        column_count: usize,
    ) -> Result<(), LinalgError> {
        self.check_block((row, col), (row_count, column_count))?;
        self.storage.clear_region((row, col), (row_count, column_count));
        Ok(())
    }

    // ---- rows and columns ------------------------------------------------

    pub fn row(&self, row: usize) -> Result<Vector<T>, LinalgError> {
        self.check_row(row)?;
        Ok(self.vector_from_values(self.row_values(row)))
    }

    pub fn row_into(&self, row: usize, result: &mut Vector<T>) -> Result<(), LinalgError> {
        self.check_row(row)?;
        if result.len() != self.column_count() {
            return Err(LinalgError::length("Matrix::row", self.column_count(), result.len()));
        }
        result.set_values(&self.row_values(row))
    }

    pub fn column(&self, col: usize) -> Result<Vector<T>, LinalgError> {
        self.check_column(col)?;
        Ok(self.vector_from_values(self.column_values(col)))
    }

    pub fn column_into(&self, col: usize, result: &mut Vector<T>) -> Result<(), LinalgError> {
        self.check_column(col)?;
        if result.len() != self.row_count() {
            return Err(LinalgError::length("Matrix::column", self.row_count(), result.len()));
        }
        result.set_values(&self.column_values(col))
    }

    pub fn set_row(&mut self, row: usize, values: &Vector<T>) -> Result<(), LinalgError> {
        self.set_row_slice(row, &values.to_vec())
    }

    pub fn set_row_slice(&mut self, row: usize, values: &[T]) -> Result<(), LinalgError> {
        self.check_row(row)?;
        let cols = self.column_count();
        if values.len() != cols {
            return Err(LinalgError::length("Matrix::set_row", cols, values.len()));
        }
        let cells = values.iter().enumerate().map(|(j, v)| (row, j, *v)).collect();
        self.write_block((row, 0), (1, cols), cells)
    }

    pub fn set_column(&mut self, col: usize, values: &Vector<T>) -> Result<(), LinalgError> {
        self.set_column_slice(col, &values.to_vec())
    }

    pub fn set_column_slice(&mut self, col: usize, values: &[T]) -> Result<(), LinalgError> {
        self.check_column(col)?;
        let rows = self.row_count();
        if values.len() != rows {
            return Err(LinalgError::length("Matrix::set_column", rows, values.len()));
        }
        let cells = values.iter().enumerate().map(|(i, v)| (i, col, *v)).collect();
        self.write_block((0, col), (rows, 1), cells)
    }

    pub fn clear_row(&mut self, row: usize) -> Result<(), LinalgError> {
        self.check_row(row)?;
        self.storage.clear_rows(&[row]);
        Ok(())
    }

    pub fn clear_column(&mut self, col: usize) -> Result<(), LinalgError> {
        self.check_column(col)?;
        self.storage.clear_columns(&[col]);
        Ok(())
    }

    pub fn clear_rows(&mut self, rows: &[usize]) -> Result<(), LinalgError> {
        for &row in rows {
            self.check_row(row)?;
        }
        self.storage.clear_rows(rows);
        Ok(())
    }

    pub fn clear_columns(&mut self, cols: &[usize]) -> Result<(), LinalgError> {
        for &col in cols {
            self.check_column(col)?;
        }
        self.storage.clear_columns(cols);
        Ok(())
    }

    /// Elements `(i, i)` for `i < min(rows, cols)`.
    pub fn main_diagonal(&self) -> Vector<T> {
        let len = self.row_count().min(self.column_count());
        self.vector_from_values((0..len).map(|i| self.storage.at(i, i)).collect())
    }

    pub fn set_main_diagonal(&mut self, values: &Vector<T>) -> Result<(), LinalgError> {
        let len = self.row_count().min(self.column_count());
        if values.len() != len {
            return Err(LinalgError::length("Matrix::set_main_diagonal", len, values.len()));
        }
        let cells = (0..len).map(|i| (i, i, values.storage().at(i)));
        if cells.clone().any(|(i, j, v)| !is_zero(v) && !self.storage.is_mutable_at(i, j)) {
            return Err(LinalgError::Unsupported(OUTSIDE_PATTERN));
        }
        for (i, j, v) in cells {
            self.storage.set_at(i, j, v)?;
        }
        Ok(())
    }

    /// Lazy iterator over the rows.
    pub fn rows(&self) -> Rows<'_, T> {
        Rows { matrix: self, next: 0 }
    }

    /// Lazy iterator over the columns.
    pub fn columns(&self) -> Columns<'_, T> {
        Columns { matrix: self, next: 0 }
    }

    // ---- insertion and removal -------------------------------------------

    /// New matrix with `values` inserted as row `row`; later rows shift down.
    ///
    /// # Arguments
    /// * `row` - Index of the new row, `0..=row_count()`
    /// * `values` - Row contents, of length `column_count()`
    pub fn insert_row(&self, row: usize, values: &Vector<T>) -> Result<Matrix<T>, LinalgError> {
        let (rows, cols) = self.shape();
        if row > rows {
            return Err(LinalgError::IndexOutOfRange { index: row, bound: rows + 1 });
        }
        if values.len() != cols {
            return Err(LinalgError::length("Matrix::insert_row", cols, values.len()));
        }
        let mut result = self.create_general(rows + 1, cols);
        self.storage.copy_sub_matrix_to(&mut *result.storage, (0, 0), (0, 0), (row, cols), true)?;
        result.set_row(row, values)?;
        self.storage
            .copy_sub_matrix_to(&mut *result.storage, (row, 0), (row + 1, 0), (rows - row, cols), true)?;
        Ok(result)
    }

    /// New matrix with `values` inserted as column `col`; later columns shift right.
    pub fn insert_column(&self, col: usize, values: &Vector<T>) -> Result<Matrix<T>, LinalgError> {
        let (rows, cols) = self.shape();
        if col > cols {
            return Err(LinalgError::IndexOutOfRange { index: col, bound: cols + 1 });
        }
        if values.len() != rows {
            return Err(LinalgError::length("Matrix::insert_column", rows, values.len()));
        }
        let mut result = self.create_general(rows, cols + 1);
        self.storage.copy_sub_matrix_to(&mut *result.storage, (0, 0), (0, 0), (rows, col), true)?;
        result.set_column(col, values)?;
        self.storage
            .copy_sub_matrix_to(&mut *result.storage, (0, col), (0, col + 1), (rows, cols - col), true)?;
        Ok(result)
    }

    pub fn remove_row(&self, row: usize) -> Result<Matrix<T>, LinalgError> {
        self.check_row(row)?;
        let (rows, cols) = self.shape();
        let mut result = self.create_general(rows - 1, cols);
        self.storage.copy_sub_matrix_to(&mut *result.storage, (0, 0), (0, 0), (row, cols), true)?;
        self.storage
            .copy_sub_matrix_to(&mut *result.storage, (row + 1, 0), (row, 0), (rows - row - 1, cols), true)?;
        Ok(result)
    }

    pub fn remove_column(&self, col: usize) -> Result<Matrix<T>, LinalgError> {
        self.check_column(col)?;
        let (rows, cols) = self.shape();
        let mut result = self.create_general(rows, cols - 1);
        self.storage.copy_sub_matrix_to(&mut *result.storage, (0, 0), (0, 0), (rows, col), true)?;
        self.storage
            .copy_sub_matrix_to(&mut *result.storage, (0, col + 1), (0, col), (rows, cols - col - 1), true)?;
        Ok(result)
    }

    // ---- triangles -------------------------------------------------------

    fn triangle(&self, keep: impl Fn(usize, usize) -> bool) -> Result<Matrix<T>, LinalgError> {
        let (rows, cols) = self.shape();
        let mut result = self.create_matrix(rows, cols);
        self.triangle_write(&mut result, keep)?;
        Ok(result)
    }

    fn triangle_into(
        &self,
        op: &'static str,
        result: &mut Matrix<T>,
        keep: impl Fn(usize, usize) -> bool,
    ) -> Result<(), LinalgError> {
        if result.shape() != self.shape() {
            return Err(LinalgError::shape(op, self.shape(), result.shape()));
        }
        self.triangle_write(result, keep)
    }

    fn triangle_write(&self, result: &mut Matrix<T>, keep: impl Fn(usize, usize) -> bool) -> Result<(), LinalgError> {
        let cells = self
            .enumerate_non_zero_indexed()
            .filter(|&(i, j, _)| keep(i, j))
            .collect();
        result.write_block((0, 0), result.shape(), cells)
    }

    /// Elements on and above the diagonal.
    pub fn upper_triangle(&self) -> Result<Matrix<T>, LinalgError> {
        self.triangle(|i, j| i <= j)
    }

    pub fn upper_triangle_into(&self, result: &mut Matrix<T>) -> Result<(), LinalgError> {
        self.triangle_into("Matrix::upper_triangle", result, |i, j| i <= j)
    }

    /// Elements on and below the diagonal.
    pub fn lower_triangle(&self) -> Result<Matrix<T>, LinalgError> {
        self.triangle(|i, j| i >= j)
    }

    pub fn lower_triangle_into(&self, result: &mut Matrix<T>) -> Result<(), LinalgError> {
        self.triangle_into("Matrix::lower_triangle", result, |i, j| i >= j)
    }

    pub fn strictly_upper_triangle(&self) -> Result<Matrix<T>, LinalgError> {
        self.triangle(|i, j| i < j)
    }

    pub fn strictly_upper_triangle_into(&self, result: &mut Matrix<T>) -> Result<(), LinalgError> {
        self.triangle_into("Matrix::strictly_upper_triangle", result, |i, j| i < j)
    }

    pub fn strictly_lower_triangle(&self) -> Result<Matrix<T>, LinalgError> {
        self.triangle(|i, j| i > j)
    }

    pub fn strictly_lower_triangle_into(&self, result: &mut Matrix<T>) -> Result<(), LinalgError> {
        self.triangle_into("Matrix::strictly_lower_triangle", result, |i, j| i > j)
    }

    // ---- concatenation ---------------------------------------------------

    /// `[self | right]`
    pub fn append(&self, right: &Matrix<T>) -> Result<Matrix<T>, LinalgError> {
        if right.row_count() != self.row_count() {
            return Err(LinalgError::shape(
                "Matrix::append",
                (self.row_count(), right.column_count()),
                right.shape(),
            ));
        }
        let (rows, cols) = self.shape();
        let mut result = self.create_general(rows, cols + right.column_count());
        self.storage.copy_sub_matrix_to(&mut *result.storage, (0, 0), (0, 0), self.shape(), true)?;
        right
            .storage
            .copy_sub_matrix_to(&mut *result.storage, (0, 0), (0, cols), right.shape(), true)?;
        Ok(result)
    }

    pub fn append_into(&self, right: &Matrix<T>, result: &mut Matrix<T>) -> Result<(), LinalgError> {
        let expected = (self.row_count(), self.column_count() + right.column_count());
        if result.shape() != expected {
            return Err(LinalgError::shape("Matrix::append", expected, result.shape()));
        }
        result.assign_from(self.append(right)?)
    }

    /// `self` on top of `lower`.
    pub fn stack(&self, lower: &Matrix<T>) -> Result<Matrix<T>, LinalgError> {
        if lower.column_count() != self.column_count() {
            return Err(LinalgError::shape(
                "Matrix::stack",
                (lower.row_count(), self.column_count()),
                lower.shape(),
            ));
        }
        let (rows, cols) = self.shape();
        let mut result = self.create_general(rows + lower.row_count(), cols);
        self.storage.copy_sub_matrix_to(&mut *result.storage, (0, 0), (0, 0), self.shape(), true)?;
        lower
            .storage
            .copy_sub_matrix_to(&mut *result.storage, (0, 0), (rows, 0), lower.shape(), true)?;
        Ok(result)
    }

    pub fn stack_into(&self, lower: &Matrix<T>, result: &mut Matrix<T>) -> Result<(), LinalgError> {
        let expected = (self.row_count() + lower.row_count(), self.column_count());
        if result.shape() != expected {
            return Err(LinalgError::shape("Matrix::stack", expected, result.shape()));
        }
        result.assign_from(self.stack(lower)?)
    }

    /// Block-diagonal `[[self, 0], [0, other]]`.
    pub fn diagonal_stack(&self, other: &Matrix<T>) -> Result<Matrix<T>, LinalgError> {
        let (rows, cols) = self.shape();
        let mut result = self.create_general(rows + other.row_count(), cols + other.column_count());
        self.storage.copy_sub_matrix_to(&mut *result.storage, (0, 0), (0, 0), self.shape(), true)?;
        other
            .storage
            .copy_sub_matrix_to(&mut *result.storage, (0, 0), (rows, cols), other.shape(), true)?;
        Ok(result)
    }

    pub fn diagonal_stack_into(&self, other: &Matrix<T>, result: &mut Matrix<T>) -> Result<(), LinalgError> {
        let expected = (self.row_count() + other.row_count(), self.column_count() + other.column_count());
        if result.shape() != expected {
            return Err(LinalgError::shape("Matrix::diagonal_stack", expected, result.shape()));
        }
        result.assign_from(self.diagonal_stack(other)?)
    }

    // ---- permutations ----------------------------------------------------

    fn swap_rows(&mut self, a: usize, b: usize) -> Result<(), LinalgError> {
        let (row_a, row_b) = (self.row_values(a), self.row_values(b));
        for (j, (va, vb)) in row_a.into_iter().zip(row_b).enumerate() {
            self.storage.set_at(a, j, vb)?;
            self.storage.set_at(b, j, va)?;
        }
        Ok(())
    }

    fn swap_columns(&mut self, a: usize, b: usize) -> Result<(), LinalgError> {
        let (col_a, col_b) = (self.column_values(a), self.column_values(b));
        for (i, (va, vb)) in col_a.into_iter().zip(col_b).enumerate() {
            self.storage.set_at(i, a, vb)?;
            self.storage.set_at(i, b, va)?;
        }
        Ok(())
    }

    /// Move row `i` to row `permutation[i]`, in place.
    ///
    /// # Errors
    /// - [`LinalgError::DimensionMismatch`] if the permutation length differs from `row_count()`
    /// - [`LinalgError::Unsupported`] if the storage is not fully mutable; the matrix is unchanged
    pub fn permute_rows(&mut self, permutation: &Permutation) -> Result<(), LinalgError> {
        if permutation.len() != self.row_count() {
            return Err(LinalgError::length("Matrix::permute_rows", self.row_count(), permutation.len()));
        }
        if !self.storage.is_fully_mutable() {
            return Err(LinalgError::Unsupported(CONSTRAINED_PERMUTATION));
        }
        for (k, j) in permutation.inversions().into_iter().enumerate() {
            if j != k {
                self.swap_rows(k, j)?;
            }
        }
        Ok(())
    }

    /// Move column `j` to column `permutation[j]`, in place.
    pub fn permute_columns(&mut self, permutation: &Permutation) -> Result<(), LinalgError> {
        if permutation.len() != self.column_count() {
            return Err(LinalgError::length("Matrix::permute_columns", self.column_count(), permutation.len()));
        }
        if !self.storage.is_fully_mutable() {
            return Err(LinalgError::Unsupported(CONSTRAINED_PERMUTATION));
        }
        for (k, j) in permutation.inversions().into_iter().enumerate() {
            if j != k {
                self.swap_columns(k, j)?;
            }
        }
        Ok(())
    }

    // ---- normalization ---------------------------------------------------

    /// Copy with every row scaled to unit `p`-norm.
    ///
    /// # Arguments
    /// * `p` - Norm order; positive, `f64::INFINITY` for the max norm
    ///
    /// Zero rows are copied unchanged.
    pub fn normalize_rows(&self, p: f64) -> Result<Matrix<T>, LinalgError> {
        let mut result = self.clone();
        for (i, row) in self.rows().enumerate() {
            result.set_row(i, &row.normalize(p)?)?;
        }
        Ok(result)
    }

    /// Copy with every column scaled to unit `p`-norm.
    pub fn normalize_columns(&self, p: f64) -> Result<Matrix<T>, LinalgError> {
        let mut result = self.clone();
        for (j, col) in self.columns().enumerate() {
            result.set_column(j, &col.normalize(p)?)?;
        }
        Ok(result)
    }
}

/// Rows of a matrix, produced one at a time.
#[derive(Debug, Clone)]
pub struct Rows<'a, T: Scalar> {
    matrix: &'a Matrix<T>,
    next: usize,
}

impl<T: Scalar> Iterator for Rows<'_, T> {
    type Item = Vector<T>;

    fn next(&mut self) -> Option<Vector<T>> {
        if self.next >= self.matrix.row_count() {
            return None;
        }
        let row = self.matrix.vector_from_values(self.matrix.row_values(self.next));
        self.next += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.matrix.row_count() - self.next;
        (left, Some(left))
    }
}

impl<T: Scalar> ExactSizeIterator for Rows<'_, T> {}

/// Columns of a matrix, produced one at a time.
#[derive(Debug, Clone)]
pub struct Columns<'a, T: Scalar> {
    matrix: &'a Matrix<T>,
    next: usize,
}

impl<T: Scalar> Iterator for Columns<'_, T> {
    type Item = Vector<T>;

    fn next(&mut self) -> Option<Vector<T>> {
        if self.next >= self.matrix.column_count() {
            return None;
        }
        let col = self.matrix.vector_from_values(self.matrix.column_values(self.next));
        self.next += 1;
        Some(col)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.matrix.column_count() - self.next;
        (left, Some(left))
    }
}

impl<T: Scalar> ExactSizeIterator for Columns<'_, T> {}
