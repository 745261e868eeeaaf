//! Compressed sparse row storage.

use std::any::Any;
use std::ops::Range;

use crate::core::generic;
use crate::core::scalar::{Scalar, is_zero};
use crate::core::traits::{Extent, MatrixStorage, Origin, StorageFlags, VectorStorage, OUTSIDE_PATTERN};
use crate::error::LinalgError;
use crate::parallel;
use crate::vector::SparseVectorStorage;

/// CSR matrix: `row_ptr[i]..row_ptr[i + 1]` indexes the stored entries of
/// row `i`, with strictly increasing column indices. Zeros are never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseCompressedRow<T> {
    rows: usize,
    cols: usize,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Vec<T>,
}

impl<T: Scalar> SparseCompressedRow<T> {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        SparseCompressedRow {
            rows,
            cols,
            row_ptr: vec![0; rows + 1],
            col_idx: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Build a CSR from raw row pointers, column indices and values.
    /// Explicit zeros are dropped.
    pub fn from_csr(
        rows: usize,
        cols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self, LinalgError> {
        if row_ptr.len() != rows + 1 {
            return Err(LinalgError::length("SparseCompressedRow::from_csr", rows + 1, row_ptr.len()));
        }
        if col_idx.len() != values.len() {
            return Err(LinalgError::length("SparseCompressedRow::from_csr", col_idx.len(), values.len()));
        }
        if row_ptr[0] != 0 || row_ptr[rows] != values.len() || row_ptr.windows(2).any(|w| w[0] > w[1]) {
            return Err(LinalgError::InvalidArgument("row pointers must rise from 0 to the entry count"));
        }
        for i in 0..rows {
            let row = &col_idx[row_ptr[i]..row_ptr[i + 1]];
            if row.windows(2).any(|w| w[0] >= w[1]) {
                return Err(LinalgError::InvalidArgument("column indices must increase within a row"));
            }
            if let Some(&last) = row.last() {
                if last >= cols {
                    return Err(LinalgError::IndexOutOfRange { index: last, bound: cols });
                }
            }
        }
        let mut m = SparseCompressedRow { rows, cols, row_ptr, col_idx, values };
        m.retain(|_, _, v| !is_zero(v));
        Ok(m)
    }

    /// Keep the non-zero values produced by `f(row, col)`.
    pub fn from_fn(rows: usize, cols: usize, f: impl Fn(usize, usize) -> T) -> Self {
        let mut m = SparseCompressedRow::zeros(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                let v = f(i, j);
                if !is_zero(v) {
                    m.col_idx.push(j);
                    m.values.push(v);
                }
            }
            m.row_ptr[i + 1] = m.values.len();
        }
        m
    }

    pub fn non_zero_count(&self) -> usize {
        self.values.len()
    }

    fn row_range(&self, row: usize) -> Range<usize> {
        self.row_ptr[row]..self.row_ptr[row + 1]
    }

    /// Position of `(row, col)` in the entry arrays, or where it would be inserted.
    fn find(&self, row: usize, col: usize) -> Result<usize, usize> {
        let range = self.row_range(row);
        let start = range.start;
        match self.col_idx[range].binary_search(&col) {
            Ok(k) => Ok(start + k),
            Err(k) => Err(start + k),
        }
    }

    /// Drop every stored entry for which `keep` is false.
    fn retain(&mut self, keep: impl Fn(usize, usize, T) -> bool) {
        let mut write = 0;
        let mut read = 0;
        for i in 0..self.rows {
            let end = self.row_ptr[i + 1];
            while read < end {
                let (j, v) = (self.col_idx[read], self.values[read]);
                if keep(i, j, v) {
                    self.col_idx[write] = j;
                    self.values[write] = v;
                    write += 1;
                }
                read += 1;
            }
            self.row_ptr[i + 1] = write;
        }
        self.col_idx.truncate(write);
        self.values.truncate(write);
    }

    fn map_stored(&self, result: &mut dyn MatrixStorage<T>, f: impl Fn(T) -> T) -> Result<(), LinalgError> {
        let rows = self.rows;
        if let Some(dst) = result.as_column_major_slice_mut() {
            dst.fill(T::zero());
            for (i, j, v) in self.enumerate_non_zero_indexed() {
                dst[j * rows + i] = f(v);
            }
            return Ok(());
        }
        if !result.is_fully_mutable()
            && self.enumerate_non_zero_indexed().any(|(i, j, _)| !result.is_mutable_at(i, j))
        {
            return Err(LinalgError::Unsupported(OUTSIDE_PATTERN));
        }
        result.clear();
        for (i, j, v) in self.enumerate_non_zero_indexed() {
            let y = f(v);
            if !is_zero(y) {
                result.set_at(i, j, y)?;
            }
        }
        Ok(())
    }
}

impl<T: Scalar> MatrixStorage<T> for SparseCompressedRow<T> {
    fn row_count(&self) -> usize {
        self.rows
    }

    fn column_count(&self) -> usize {
        self.cols
    }

    fn flags(&self) -> StorageFlags {
        StorageFlags::FULLY_MUTABLE
    }

    fn at(&self, row: usize, col: usize) -> T {
        match self.find(row, col) {
            Ok(pos) => self.values[pos],
            Err(_) => T::zero(),
        }
    }

    fn set_at(&mut self, row: usize, col: usize, value: T) -> Result<(), LinalgError> {
        match self.find(row, col) {
            Ok(pos) if is_zero(value) => {
                self.col_idx.remove(pos);
                self.values.remove(pos);
                for p in &mut self.row_ptr[row + 1..] {
                    *p -= 1;
                }
            }
            Ok(pos) => self.values[pos] = value,
            Err(pos) if !is_zero(value) => {
                self.col_idx.insert(pos, col);
                self.values.insert(pos, value);
                for p in &mut self.row_ptr[row + 1..] {
                    *p += 1;
                }
            }
            Err(_) => {}
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.row_ptr.fill(0);
        self.col_idx.clear();
        self.values.clear();
    }

    fn clear_region(&mut self, origin: Origin, extent: Extent) {
        let rows = origin.0..origin.0.saturating_add(extent.0);
        let cols = origin.1..origin.1.saturating_add(extent.1);
        self.retain(|i, j, _| !(rows.contains(&i) && cols.contains(&j)));
    }

    fn clear_rows(&mut self, rows: &[usize]) {
        self.retain(|i, _, _| !rows.contains(&i));
    }

    fn clear_columns(&mut self, cols: &[usize]) {
        self.retain(|_, j, _| !cols.contains(&j));
    }

    fn enumerate_non_zero_indexed(&self) -> Box<dyn Iterator<Item = (usize, usize, T)> + '_> {
        Box::new((0..self.rows).flat_map(move |i| {
            self.row_range(i).map(move |k| (i, self.col_idx[k], self.values[k]))
        }))
    }

    fn clone_boxed(&self) -> Box<dyn MatrixStorage<T>> {
        Box::new(self.clone())
    }

    fn create_like(&self, rows: usize, cols: usize, _fully_mutable: bool) -> Box<dyn MatrixStorage<T>> {
        Box::new(SparseCompressedRow::zeros(rows, cols))
    }

    fn create_vector_like(&self, len: usize, _fully_mutable: bool) -> Box<dyn VectorStorage<T>> {
        Box::new(SparseVectorStorage::zeros(len))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn do_multiply_scalar(&self, scalar: T, result: &mut dyn MatrixStorage<T>) -> Result<(), LinalgError> {
        self.map_stored(result, |x| x * scalar)
    }

    fn do_divide_scalar(&self, scalar: T, result: &mut dyn MatrixStorage<T>) -> Result<(), LinalgError> {
        self.map_stored(result, |x| x / scalar)
    }

    fn do_negate(&self, result: &mut dyn MatrixStorage<T>) -> Result<(), LinalgError> {
        self.map_stored(result, |x| -x)
    }

    fn do_conjugate(&self, result: &mut dyn MatrixStorage<T>) -> Result<(), LinalgError> {
        self.map_stored(result, |x| x.conjugate())
    }

    /// Row-parallel SpMV when both vectors are dense.
    fn do_multiply_vector(
        &self,
        vector: &dyn VectorStorage<T>,
        result: &mut dyn VectorStorage<T>,
    ) -> Result<(), LinalgError> {
        if let (Some(x), Some(dst)) = (vector.as_slice(), result.as_mut_slice()) {
            let y = parallel::collect(self.rows, |i| {
                self.row_range(i)
                    .fold(T::zero(), |acc, k| acc + self.values[k] * x[self.col_idx[k]])
            });
            dst.copy_from_slice(&y);
            return Ok(());
        }
        generic::matrix_multiply_vector(self, vector, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::DenseVectorStorage;

    #[test]
    fn identity_spmv() {
        // 3x3 identity in CSR: row_ptr=[0,1,2,3], col_idx=[0,1,2], vals=[1,1,1]
        let m = SparseCompressedRow::from_csr(3, 3, vec![0, 1, 2, 3], vec![0, 1, 2], vec![1.0, 1.0, 1.0]).unwrap();
        let x = DenseVectorStorage::from_vec(vec![2.0, 3.0, 5.0]);
        let mut y = DenseVectorStorage::zeros(3);
        m.do_multiply_vector(&x, &mut y).unwrap();
        assert_eq!(y.into_vec(), vec![2.0, 3.0, 5.0]);
    }

    #[test]
    fn simple_pattern() {
        // 2x3 matrix [[1,2,0],[0,3,4]]
        let m = SparseCompressedRow::from_csr(2, 3, vec![0, 2, 4], vec![0, 1, 1, 2], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let x = DenseVectorStorage::from_vec(vec![1.0, 1.0, 1.0]);
        let mut y = DenseVectorStorage::zeros(2);
        m.do_multiply_vector(&x, &mut y).unwrap();
        assert_eq!(y.into_vec(), vec![3.0, 7.0]);
        assert_eq!(m.at(1, 0), 0.0);
        assert_eq!(m.at(1, 2), 4.0);
    }

    #[test]
    fn malformed_csr_is_rejected() {
        assert!(SparseCompressedRow::<f64>::from_csr(2, 2, vec![0, 1], vec![0], vec![1.0]).is_err());
        assert!(SparseCompressedRow::from_csr(1, 2, vec![0, 2], vec![1, 0], vec![1.0, 2.0]).is_err());
        assert!(SparseCompressedRow::from_csr(1, 2, vec![0, 1], vec![2], vec![1.0]).is_err());
    }

    #[test]
    fn explicit_zeros_are_dropped() {
        let m = SparseCompressedRow::from_csr(1, 3, vec![0, 2], vec![0, 2], vec![0.0, 5.0]).unwrap();
        assert_eq!(m.non_zero_count(), 1);
    }

    #[test]
    fn inserting_and_removing_keeps_rows_consistent() {
        let mut m = SparseCompressedRow::zeros(3, 3);
        m.set_at(2, 1, 4.0).unwrap();
        m.set_at(0, 2, 1.0).unwrap();
        m.set_at(0, 0, 3.0).unwrap();
        assert_eq!(
            m.enumerate_non_zero_indexed().collect::<Vec<_>>(),
            vec![(0, 0, 3.0), (0, 2, 1.0), (2, 1, 4.0)]
        );
        m.set_at(0, 2, 0.0).unwrap();
        assert_eq!(m.non_zero_count(), 2);
        assert_eq!(m.at(2, 1), 4.0);
        m.clear_region((1, 0), (2, 3));
        assert_eq!(m.enumerate_non_zero_indexed().collect::<Vec<_>>(), vec![(0, 0, 3.0)]);
    }
}
