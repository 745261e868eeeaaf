//! linkern: representation-agnostic matrix and vector kernel.
//!
//! [`Matrix`] and [`Vector`] own a boxed storage (dense column-major,
//! compressed sparse row, diagonal, or any user type implementing
//! [`MatrixStorage`] / [`VectorStorage`]) and expose one validated
//! arithmetic surface over all of them. Every public operation checks its
//! operands before delegating to the storage's hook, so a failed call never
//! leaves a partially written result.
//!
//! Hot primitives (dot product, dense multiply, LU inverse) run through a
//! swappable [`LinearAlgebraProvider`], selected per process via [`Settings`].

mod parallel;

pub mod config;
pub mod core;
pub mod error;
pub mod factorization;
pub mod matrix;
pub mod permutation;
pub mod provider;
pub mod utils;
pub mod vector;

// Re-exports for convenience
pub use config::{ProviderKind, Settings, set_settings, settings};
pub use crate::core::{Extent, MatrixStorage, Origin, RealScalar, Scalar, StorageFlags, VectorStorage};
pub use error::LinalgError;
pub use factorization::{Lu, Svd};
pub use matrix::{Columns, DenseColumnMajor, DiagonalStorage, Matrix, Rows, SparseCompressedRow, SquareMatrix};
pub use permutation::Permutation;
pub use provider::{FaerProvider, LinearAlgebraProvider, ManagedProvider};
pub use vector::{DenseVectorStorage, SparseVectorStorage, Vector};
