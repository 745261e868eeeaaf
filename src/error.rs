use thiserror::Error;

// Unified error type for linkern

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LinalgError {
    #[error("dimension mismatch in {op}: expected {expected:?}, found {found:?}")]
    DimensionMismatch {
        op: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },
    #[error("index {index} out of range (bound {bound})")]
    IndexOutOfRange { index: usize, bound: usize },
    #[error("matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },
    #[error("division by zero")]
    DivideByZero,
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("invalid permutation: {0}")]
    InvalidPermutation(String),
    #[error("matrix is singular")]
    Singular,
    #[error("factorization error: {0}")]
    Factorization(String),
}

impl LinalgError {
    /// Length mismatch between two vectors (or a vector and a matrix side).
    pub(crate) fn length(op: &'static str, expected: usize, found: usize) -> Self {
        LinalgError::DimensionMismatch {
            op,
            expected: (expected, 1),
            found: (found, 1),
        }
    }

    /// Shape mismatch between two matrices.
    pub(crate) fn shape(op: &'static str, expected: (usize, usize), found: (usize, usize)) -> Self {
        LinalgError::DimensionMismatch { op, expected, found }
    }
}
