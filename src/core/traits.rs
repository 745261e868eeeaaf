//! Storage capability traits for linkern.
//!
//! A storage owns the element data of one matrix or vector. The wrappers in
//! [`crate::matrix`] and [`crate::vector`] validate every argument and then
//! call the unchecked `do_*` hooks declared here; a hook may assume that all
//! shapes already agree and that indices are in bounds.
//!
//! Every hook has a generic default written against element access and the
//! non-zero traversal only, so a new representation only has to provide the
//! primitive accessors. Concrete families override the hooks they can do
//! faster (slices for dense, stored entries for sparse, the main diagonal for
//! diagonal storage).

use std::any::Any;
use std::fmt;

use bitflags::bitflags;

use crate::core::generic;
use crate::core::scalar::{Scalar, is_zero};
use crate::error::LinalgError;

bitflags! {
    /// Static description of a storage family.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct StorageFlags: u32 {
        /// Every logical slot is materialized.
        const DENSE         = 0b0001;
        /// Any value may be written at any position.
        const FULLY_MUTABLE = 0b0010;
        /// Only the main diagonal can hold non-zero values.
        const DIAGONAL      = 0b0100;
    }
}

/// Top-left corner `(row, col)` of a block.
pub type Origin = (usize, usize);
/// Row and column extents of a block.
pub type Extent = (usize, usize);

pub(crate) const OUTSIDE_PATTERN: &str = "value outside the storage's structural pattern";

/// Backing store of a vector.
pub trait VectorStorage<T: Scalar>: fmt::Debug + Send + Sync {
    /// Number of logical elements.
    fn len(&self) -> usize;

    /// True for a zero-length storage.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Family description.
    fn flags(&self) -> StorageFlags;

    fn is_dense(&self) -> bool {
        self.flags().contains(StorageFlags::DENSE)
    }

    fn is_fully_mutable(&self) -> bool {
        self.flags().contains(StorageFlags::FULLY_MUTABLE)
    }

    /// Whether a non-zero value may be written at `index`.
    fn is_mutable_at(&self, _index: usize) -> bool {
        self.is_fully_mutable()
    }

    /// Element at `index` (bounds already checked).
    fn at(&self, index: usize) -> T;

    /// Write `value` at `index` (bounds already checked).
    fn set_at(&mut self, index: usize, value: T) -> Result<(), LinalgError>;

    /// Reset every element to zero.
    fn clear(&mut self);

    /// Reset `count` elements starting at `index` to zero.
    fn clear_range(&mut self, index: usize, count: usize);

    /// Contiguous view for dense storages.
    fn as_slice(&self) -> Option<&[T]> {
        None
    }

    fn as_mut_slice(&mut self) -> Option<&mut [T]> {
        None
    }

    /// Every logical element in order.
    fn enumerate(&self) -> Box<dyn Iterator<Item = T> + '_> {
        Box::new((0..self.len()).map(move |i| self.at(i)))
    }

    /// Stored elements with their index. Sparse storages may skip zeros, so
    /// callers needing every slot must index by position instead.
    fn enumerate_non_zero(&self) -> Box<dyn Iterator<Item = (usize, T)> + '_> {
        Box::new(
            (0..self.len())
                .map(move |i| (i, self.at(i)))
                .filter(|(_, v)| !is_zero(*v)),
        )
    }

    /// Copy into a same-length target. With `skip_clearing` the target is
    /// assumed to be all zero already.
    fn copy_to(
        &self,
        target: &mut dyn VectorStorage<T>,
        skip_clearing: bool,
    ) -> Result<(), LinalgError> {
        if let (Some(src), Some(dst)) = (self.as_slice(), target.as_mut_slice()) {
            dst.copy_from_slice(src);
            return Ok(());
        }
        if !target.is_fully_mutable() {
            for (i, _) in self.enumerate_non_zero() {
                if !target.is_mutable_at(i) {
                    return Err(LinalgError::Unsupported(OUTSIDE_PATTERN));
                }
            }
        }
        if !skip_clearing {
            target.clear();
        }
        for (i, v) in self.enumerate_non_zero() {
            target.set_at(i, v)?;
        }
        Ok(())
    }

    /// Copy `count` elements from `source_index` into `target` at `target_index`.
    fn copy_sub_vector_to(
        &self,
        target: &mut dyn VectorStorage<T>,
        source_index: usize,
        target_index: usize,
        count: usize,
        skip_clearing: bool,
    ) -> Result<(), LinalgError> {
        let values: Vec<T> = (source_index..source_index + count).map(|i| self.at(i)).collect();
        if !target.is_fully_mutable() {
            for (k, v) in values.iter().enumerate() {
                if !is_zero(*v) && !target.is_mutable_at(target_index + k) {
                    return Err(LinalgError::Unsupported(OUTSIDE_PATTERN));
                }
            }
        }
        if !skip_clearing {
            target.clear_range(target_index, count);
        }
        for (k, v) in values.into_iter().enumerate() {
            if !is_zero(v) {
                target.set_at(target_index + k, v)?;
            }
        }
        Ok(())
    }

    /// Value-based equality, independent of representation.
    fn storage_eq(&self, other: &dyn VectorStorage<T>) -> bool {
        self.len() == other.len() && (0..self.len()).all(|i| self.at(i) == other.at(i))
    }

    fn clone_boxed(&self) -> Box<dyn VectorStorage<T>>;

    /// Fresh zero storage of the same family (or a fully mutable one when requested).
    fn create_like(&self, len: usize, fully_mutable: bool) -> Box<dyn VectorStorage<T>>;

    /// Fresh zero matrix storage matching this vector's family.
    fn create_matrix_like(&self, rows: usize, cols: usize, fully_mutable: bool) -> Box<dyn MatrixStorage<T>>;

    fn as_any(&self) -> &dyn Any;

    // ---- per-representation hooks -------------------------------------

    fn do_add_scalar(
        &self,
        scalar: T,
        result: &mut dyn VectorStorage<T>,
    ) -> Result<(), LinalgError> {
        generic::vector_add_scalar(self, scalar, result)
    }

    fn do_add(
        &self,
        other: &dyn VectorStorage<T>,
        result: &mut dyn VectorStorage<T>,
    ) -> Result<(), LinalgError> {
        generic::vector_add(self, other, result)
    }

    fn do_subtract(
        &self,
        other: &dyn VectorStorage<T>,
        result: &mut dyn VectorStorage<T>,
    ) -> Result<(), LinalgError> {
        generic::vector_subtract(self, other, result)
    }

    fn do_multiply_scalar(
        &self,
        scalar: T,
        result: &mut dyn VectorStorage<T>,
    ) -> Result<(), LinalgError> {
        generic::vector_multiply_scalar(self, scalar, result)
    }

    /// `self / scalar`, scalar already known to be non-zero.
    fn do_divide_scalar(
        &self,
        scalar: T,
        result: &mut dyn VectorStorage<T>,
    ) -> Result<(), LinalgError> {
        generic::vector_divide_scalar(self, scalar, result)
    }

    /// `scalar / self`, elementwise.
    fn do_divide_by_scalar(
        &self,
        scalar: T,
        result: &mut dyn VectorStorage<T>,
    ) -> Result<(), LinalgError> {
        generic::vector_divide_by_scalar(self, scalar, result)
    }

    fn do_dot(&self, other: &dyn VectorStorage<T>) -> T {
        generic::vector_dot(self, other)
    }

    /// `conj(self) . other`
    fn do_conjugate_dot(&self, other: &dyn VectorStorage<T>) -> T {
        generic::vector_conjugate_dot(self, other)
    }

    fn do_pointwise_multiply(
        &self,
        other: &dyn VectorStorage<T>,
        result: &mut dyn VectorStorage<T>,
    ) -> Result<(), LinalgError> {
        generic::vector_pointwise_multiply(self, other, result)
    }

    fn do_pointwise_divide(
        &self,
        other: &dyn VectorStorage<T>,
        result: &mut dyn VectorStorage<T>,
    ) -> Result<(), LinalgError> {
        generic::vector_pointwise_divide(self, other, result)
    }

    fn do_modulus(&self, divisor: T, result: &mut dyn VectorStorage<T>) -> Result<(), LinalgError> {
        generic::vector_modulus(self, divisor, result)
    }

    fn do_remainder(
        &self,
        divisor: T,
        result: &mut dyn VectorStorage<T>,
    ) -> Result<(), LinalgError> {
        generic::vector_remainder(self, divisor, result)
    }

    fn do_pointwise_modulus(
        &self,
        divisor: &dyn VectorStorage<T>,
        result: &mut dyn VectorStorage<T>,
    ) -> Result<(), LinalgError> {
        generic::vector_pointwise_modulus(self, divisor, result)
    }

    fn do_pointwise_remainder(
        &self,
        divisor: &dyn VectorStorage<T>,
        result: &mut dyn VectorStorage<T>,
    ) -> Result<(), LinalgError> {
        generic::vector_pointwise_remainder(self, divisor, result)
    }

    fn do_negate(&self, result: &mut dyn VectorStorage<T>) -> Result<(), LinalgError> {
        generic::vector_negate(self, result)
    }

    fn do_conjugate(&self, result: &mut dyn VectorStorage<T>) -> Result<(), LinalgError> {
        generic::vector_conjugate(self, result)
    }
}

/// Backing store of a matrix.
pub trait MatrixStorage<T: Scalar>: fmt::Debug + Send + Sync {
    fn row_count(&self) -> usize;

    fn column_count(&self) -> usize;

    /// Family description.
    fn flags(&self) -> StorageFlags;

    fn is_dense(&self) -> bool {
        self.flags().contains(StorageFlags::DENSE)
    }

    fn is_fully_mutable(&self) -> bool {
        self.flags().contains(StorageFlags::FULLY_MUTABLE)
    }

    /// Whether a non-zero value may be written at `(row, col)`.
    fn is_mutable_at(&self, _row: usize, _col: usize) -> bool {
        self.is_fully_mutable()
    }

    /// Element at `(row, col)` (bounds already checked).
    fn at(&self, row: usize, col: usize) -> T;

    /// Write `value` at `(row, col)` (bounds already checked). Writing zero is
    /// always accepted; a non-zero value outside the structural pattern fails
    /// with [`LinalgError::Unsupported`].
    fn set_at(&mut self, row: usize, col: usize, value: T) -> Result<(), LinalgError>;

    /// Reset every element to zero.
    fn clear(&mut self);

    /// Reset the block at `origin` with `extent` to zero.
    fn clear_region(&mut self, origin: Origin, extent: Extent);

    fn clear_rows(&mut self, rows: &[usize]) {
        let cols = self.column_count();
        for &r in rows {
            self.clear_region((r, 0), (1, cols));
        }
    }

    fn clear_columns(&mut self, cols: &[usize]) {
        let rows = self.row_count();
        for &c in cols {
            self.clear_region((0, c), (rows, 1));
        }
    }

    /// Column-major contiguous view for dense storages.
    fn as_column_major_slice(&self) -> Option<&[T]> {
        None
    }

    fn as_column_major_slice_mut(&mut self) -> Option<&mut [T]> {
        None
    }

    /// Every logical element in column-major order.
    fn enumerate(&self) -> Box<dyn Iterator<Item = T> + '_> {
        Box::new(self.enumerate_indexed().map(|(_, _, v)| v))
    }

    /// Every logical element with its coordinates, column-major.
    fn enumerate_indexed(&self) -> Box<dyn Iterator<Item = (usize, usize, T)> + '_> {
        let rows = self.row_count();
        Box::new(
            (0..self.column_count())
                .flat_map(move |j| (0..rows).map(move |i| (i, j, self.at(i, j)))),
        )
    }

    /// Stored elements with coordinates; may skip zeros.
    fn enumerate_non_zero_indexed(&self) -> Box<dyn Iterator<Item = (usize, usize, T)> + '_> {
        Box::new(self.enumerate_indexed().filter(|(_, _, v)| !is_zero(*v)))
    }

    /// Copy into a same-shape target. With `skip_clearing` the target is
    /// assumed to be all zero already.
    fn copy_to(
        &self,
        target: &mut dyn MatrixStorage<T>,
        skip_clearing: bool,
    ) -> Result<(), LinalgError> {
        if let (Some(src), Some(dst)) = (self.as_column_major_slice(), target.as_column_major_slice_mut()) {
            dst.copy_from_slice(src);
            return Ok(());
        }
        if !target.is_fully_mutable() {
            for (i, j, _) in self.enumerate_non_zero_indexed() {
                if !target.is_mutable_at(i, j) {
                    return Err(LinalgError::Unsupported(OUTSIDE_PATTERN));
                }
            }
        }
        if !skip_clearing {
            target.clear();
        }
        for (i, j, v) in self.enumerate_non_zero_indexed() {
            target.set_at(i, j, v)?;
        }
        Ok(())
    }

    /// Copy the block at `source` with `extent` into `target` at `target_origin`.
    fn copy_sub_matrix_to(
        &self,
        target: &mut dyn MatrixStorage<T>,
        source: Origin,
        target_origin: Origin,
        extent: Extent,
        skip_clearing: bool,
    ) -> Result<(), LinalgError> {
        let (sr, sc) = source;
        let (tr, tc) = target_origin;
        let (rows, cols) = extent;
        let values: Vec<(usize, usize, T)> = self
            .enumerate_non_zero_indexed()
            .filter(|&(i, j, _)| i >= sr && i < sr + rows && j >= sc && j < sc + cols)
            .map(|(i, j, v)| (i - sr + tr, j - sc + tc, v))
            .collect();
        if !target.is_fully_mutable() {
            for &(i, j, _) in &values {
                if !target.is_mutable_at(i, j) {
                    return Err(LinalgError::Unsupported(OUTSIDE_PATTERN));
                }
            }
        }
        if !skip_clearing {
            target.clear_region(target_origin, extent);
        }
        for (i, j, v) in values {
            target.set_at(i, j, v)?;
        }
        Ok(())
    }

    /// Value-based equality, independent of representation.
    fn storage_eq(&self, other: &dyn MatrixStorage<T>) -> bool {
        self.row_count() == other.row_count()
            && self.column_count() == other.column_count()
            && self.enumerate_indexed().all(|(i, j, v)| v == other.at(i, j))
    }

    fn clone_boxed(&self) -> Box<dyn MatrixStorage<T>>;

    /// Fresh zero storage of the same family. With `fully_mutable`, families
    /// that cannot hold arbitrary values return a general one instead.
    fn create_like(&self, rows: usize, cols: usize, fully_mutable: bool) -> Box<dyn MatrixStorage<T>>;

    /// Fresh zero vector storage matching this matrix's family.
    fn create_vector_like(&self, len: usize, fully_mutable: bool) -> Box<dyn VectorStorage<T>>;

    fn as_any(&self) -> &dyn Any;

    // ---- per-representation hooks -------------------------------------

    fn do_add_scalar(
        &self,
        scalar: T,
        result: &mut dyn MatrixStorage<T>,
    ) -> Result<(), LinalgError> {
        generic::matrix_add_scalar(self, scalar, result)
    }

    fn do_add(
        &self,
        other: &dyn MatrixStorage<T>,
        result: &mut dyn MatrixStorage<T>,
    ) -> Result<(), LinalgError> {
        generic::matrix_add(self, other, result)
    }

    fn do_subtract(
        &self,
        other: &dyn MatrixStorage<T>,
        result: &mut dyn MatrixStorage<T>,
    ) -> Result<(), LinalgError> {
        generic::matrix_subtract(self, other, result)
    }

    fn do_multiply_scalar(
        &self,
        scalar: T,
        result: &mut dyn MatrixStorage<T>,
    ) -> Result<(), LinalgError> {
        generic::matrix_multiply_scalar(self, scalar, result)
    }

    /// `self / scalar`, scalar already known to be non-zero.
    fn do_divide_scalar(
        &self,
        scalar: T,
        result: &mut dyn MatrixStorage<T>,
    ) -> Result<(), LinalgError> {
        generic::matrix_divide_scalar(self, scalar, result)
    }

    /// `scalar / self`, elementwise.
    fn do_divide_by_scalar(
        &self,
        scalar: T,
        result: &mut dyn MatrixStorage<T>,
    ) -> Result<(), LinalgError> {
        generic::matrix_divide_by_scalar(self, scalar, result)
    }

    /// `result = self * vector`
    fn do_multiply_vector(
        &self,
        vector: &dyn VectorStorage<T>,
        result: &mut dyn VectorStorage<T>,
    ) -> Result<(), LinalgError> {
        generic::matrix_multiply_vector(self, vector, result)
    }

    /// `result = self^T * vector`
    fn do_transpose_this_and_multiply_vector(
        &self,
        vector: &dyn VectorStorage<T>,
        result: &mut dyn VectorStorage<T>,
    ) -> Result<(), LinalgError> {
        generic::matrix_transpose_this_and_multiply_vector(self, vector, result)
    }

    /// `result = self * other`
    fn do_multiply(
        &self,
        other: &dyn MatrixStorage<T>,
        result: &mut dyn MatrixStorage<T>,
    ) -> Result<(), LinalgError> {
        generic::matrix_multiply(self, other, result)
    }

    /// `result = self * other^T`
    fn do_transpose_and_multiply(
        &self,
        other: &dyn MatrixStorage<T>,
        result: &mut dyn MatrixStorage<T>,
    ) -> Result<(), LinalgError> {
        generic::matrix_transpose_and_multiply(self, other, result)
    }

    /// `result = self^T * other`
    fn do_transpose_this_and_multiply(
        &self,
        other: &dyn MatrixStorage<T>,
        result: &mut dyn MatrixStorage<T>,
    ) -> Result<(), LinalgError> {
        generic::matrix_transpose_this_and_multiply(self, other, result)
    }

    fn do_negate(&self, result: &mut dyn MatrixStorage<T>) -> Result<(), LinalgError> {
        generic::matrix_negate(self, result)
    }

    fn do_conjugate(&self, result: &mut dyn MatrixStorage<T>) -> Result<(), LinalgError> {
        generic::matrix_conjugate(self, result)
    }

    fn do_pointwise_multiply(
        &self,
        other: &dyn MatrixStorage<T>,
        result: &mut dyn MatrixStorage<T>,
    ) -> Result<(), LinalgError> {
        generic::matrix_pointwise_multiply(self, other, result)
    }

    fn do_pointwise_divide(
        &self,
        other: &dyn MatrixStorage<T>,
        result: &mut dyn MatrixStorage<T>,
    ) -> Result<(), LinalgError> {
        generic::matrix_pointwise_divide(self, other, result)
    }

    fn do_modulus(&self, divisor: T, result: &mut dyn MatrixStorage<T>) -> Result<(), LinalgError> {
        generic::matrix_modulus(self, divisor, result)
    }

    fn do_remainder(
        &self,
        divisor: T,
        result: &mut dyn MatrixStorage<T>,
    ) -> Result<(), LinalgError> {
        generic::matrix_remainder(self, divisor, result)
    }

    fn do_pointwise_modulus(
        &self,
        divisor: &dyn MatrixStorage<T>,
        result: &mut dyn MatrixStorage<T>,
    ) -> Result<(), LinalgError> {
        generic::matrix_pointwise_modulus(self, divisor, result)
    }

    fn do_pointwise_remainder(
        &self,
        divisor: &dyn MatrixStorage<T>,
        result: &mut dyn MatrixStorage<T>,
    ) -> Result<(), LinalgError> {
        generic::matrix_pointwise_remainder(self, divisor, result)
    }
}
