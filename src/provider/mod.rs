//! Linear algebra providers: swappable execution strategies for the hot
//! primitives (dot product, dense multiply, LU inverse, singular values).
//!
//! The contract is array-in/array-out over column-major buffers with explicit
//! shapes; the leading dimension of every operand equals its row count. The
//! active provider for an element type is resolved through
//! [`Scalar::provider`](crate::Scalar::provider) from the process-wide
//! [`Settings`](crate::config::Settings).

use crate::core::scalar::Scalar;
use crate::error::LinalgError;

pub mod faer;
pub mod managed;

pub use self::faer::FaerProvider;
pub use managed::ManagedProvider;

/// Whether an operand enters a product as-is or transposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transpose {
    No,
    Yes,
}

/// Borrowed column-major operand with explicit shape.
#[derive(Debug, Clone, Copy)]
pub struct ColumnMajor<'a, T> {
    pub data: &'a [T],
    pub rows: usize,
    pub cols: usize,
}

impl<'a, T> ColumnMajor<'a, T> {
    pub fn new(data: &'a [T], rows: usize, cols: usize) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        ColumnMajor { data, rows, cols }
    }

    /// Shape after applying `op`.
    pub fn op_shape(&self, op: Transpose) -> (usize, usize) {
        match op {
            Transpose::No => (self.rows, self.cols),
            Transpose::Yes => (self.cols, self.rows),
        }
    }

    /// Element `(i, j)` of `op(self)`.
    #[inline]
    pub(crate) fn op_at(&self, op: Transpose, i: usize, j: usize) -> T
    where
        T: Copy,
    {
        match op {
            Transpose::No => self.data[j * self.rows + i],
            Transpose::Yes => self.data[i * self.rows + j],
        }
    }
}

/// Execution strategy for the primitives the dense storages delegate.
pub trait LinearAlgebraProvider<T: Scalar>: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// `sum(x[i] * y[i])`
    fn dot_product(&self, x: &[T], y: &[T]) -> T;

    /// `sum(conj(x[i]) * y[i])`
    fn conjugate_dot_product(&self, x: &[T], y: &[T]) -> T;

    /// `c = op_a(a) * op_b(b)`, with `c` column-major of shape
    /// `(rows of op_a(a), cols of op_b(b))`.
    fn matrix_multiply(
        &self,
        op_a: Transpose,
        a: ColumnMajor<'_, T>,
        op_b: Transpose,
        b: ColumnMajor<'_, T>,
        c: &mut [T],
    );

    /// Replace the square column-major matrix `a` of `order` with its inverse.
    fn lu_inverse(&self, a: &mut [T], order: usize) -> Result<(), LinalgError>;

    /// The `min(rows, cols)` singular values of `a`, in any order.
    fn singular_values(&self, a: ColumnMajor<'_, T>) -> Result<Vec<T::Real>, LinalgError>;
}
