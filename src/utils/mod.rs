//! Small helpers shared by matrices and vectors.

pub mod format;
pub(crate) mod random;
