//! Element types and the storage capability every representation implements.

pub(crate) mod generic;
pub mod scalar;
pub mod traits;

pub use scalar::{RealScalar, Scalar};
pub use traits::{Extent, MatrixStorage, Origin, StorageFlags, VectorStorage};
