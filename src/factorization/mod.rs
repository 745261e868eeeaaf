//! Factorizations used to answer derived scalar queries.
//!
//! [`Lu`] answers determinant and inverse, [`Svd`] answers rank, condition
//! number and 2-norm. Matrices never cache them: every query builds a fresh
//! factorization, so callers issuing repeated queries should keep their own.

pub mod lu;
pub mod svd;

pub use lu::Lu;
pub use svd::Svd;
