//! Representation-agnostic fallbacks for the storage hooks.
//!
//! Each function is written only against element access and the non-zero
//! traversal. The trait defaults in [`super::traits`] delegate here, and
//! concrete storages call back into these when an operand has no fast path.

use crate::core::scalar::{Scalar, is_zero};
use crate::core::traits::{MatrixStorage, VectorStorage, OUTSIDE_PATTERN};
use crate::error::LinalgError;

pub(crate) fn vector_add_scalar<T: Scalar>(
    this: &(impl VectorStorage<T> + ?Sized),
    scalar: T,
    result: &mut dyn VectorStorage<T>,
) -> Result<(), LinalgError> {
    write_vector(result, &map_all(this, |x| x + scalar))
}

pub(crate) fn vector_add<T: Scalar>(
    this: &(impl VectorStorage<T> + ?Sized),
    other: &dyn VectorStorage<T>,
    result: &mut dyn VectorStorage<T>,
) -> Result<(), LinalgError> {
    let mut acc = collect_non_zero(this);
    for (i, v) in other.enumerate_non_zero() {
        acc[i] = acc[i] + v;
    }
    write_vector(result, &acc)
}

pub(crate) fn vector_subtract<T: Scalar>(
    this: &(impl VectorStorage<T> + ?Sized),
    other: &dyn VectorStorage<T>,
    result: &mut dyn VectorStorage<T>,
) -> Result<(), LinalgError> {
    let mut acc = collect_non_zero(this);
    for (i, v) in other.enumerate_non_zero() {
        acc[i] = acc[i] - v;
    }
    write_vector(result, &acc)
}

pub(crate) fn vector_multiply_scalar<T: Scalar>(
    this: &(impl VectorStorage<T> + ?Sized),
    scalar: T,
    result: &mut dyn VectorStorage<T>,
) -> Result<(), LinalgError> {
    write_vector(result, &map_non_zero(this, |x| x * scalar))
}

pub(crate) fn vector_divide_scalar<T: Scalar>(
    this: &(impl VectorStorage<T> + ?Sized),
    scalar: T,
    result: &mut dyn VectorStorage<T>,
) -> Result<(), LinalgError> {
    write_vector(result, &map_non_zero(this, |x| x / scalar))
}

pub(crate) fn vector_divide_by_scalar<T: Scalar>(
    this: &(impl VectorStorage<T> + ?Sized),
    scalar: T,
    result: &mut dyn VectorStorage<T>,
) -> Result<(), LinalgError> {
    write_vector(result, &map_all(this, |x| scalar / x))
}

pub(crate) fn vector_dot<T: Scalar>(
    this: &(impl VectorStorage<T> + ?Sized),
    other: &dyn VectorStorage<T>,
) -> T {
    this.enumerate_non_zero()
        .fold(T::zero(), |acc, (i, v)| acc + v * other.at(i))
}

pub(crate) fn vector_conjugate_dot<T: Scalar>(
    this: &(impl VectorStorage<T> + ?Sized),
    other: &dyn VectorStorage<T>,
) -> T {
    this.enumerate_non_zero()
        .fold(T::zero(), |acc, (i, v)| acc + v.conjugate() * other.at(i))
}

pub(crate) fn vector_pointwise_multiply<T: Scalar>(
    this: &(impl VectorStorage<T> + ?Sized),
    other: &dyn VectorStorage<T>,
    result: &mut dyn VectorStorage<T>,
) -> Result<(), LinalgError> {
    let mut acc = vec![T::zero(); this.len()];
    for (i, v) in this.enumerate_non_zero() {
        acc[i] = v * other.at(i);
    }
    write_vector(result, &acc)
}

pub(crate) fn vector_pointwise_divide<T: Scalar>(
    this: &(impl VectorStorage<T> + ?Sized),
    other: &dyn VectorStorage<T>,
    result: &mut dyn VectorStorage<T>,
) -> Result<(), LinalgError> {
    let acc: Vec<T> = (0..this.len()).map(|i| this.at(i) / other.at(i)).collect();
    write_vector(result, &acc)
}

pub(crate) fn vector_modulus<T: Scalar>(
    this: &(impl VectorStorage<T> + ?Sized),
    divisor: T,
    result: &mut dyn VectorStorage<T>,
) -> Result<(), LinalgError> {
    write_vector(result, &map_all(this, |x| x.modulo(divisor).unwrap_or_else(T::zero)))
}

pub(crate) fn vector_remainder<T: Scalar>(
    this: &(impl VectorStorage<T> + ?Sized),
    divisor: T,
    result: &mut dyn VectorStorage<T>,
) -> Result<(), LinalgError> {
    write_vector(result, &map_all(this, |x| x.remainder(divisor).unwrap_or_else(T::zero)))
}

pub(crate) fn vector_pointwise_modulus<T: Scalar>(
    this: &(impl VectorStorage<T> + ?Sized),
    divisor: &dyn VectorStorage<T>,
    result: &mut dyn VectorStorage<T>,
) -> Result<(), LinalgError> {
    let acc: Vec<T> = (0..this.len())
        .map(|i| this.at(i).modulo(divisor.at(i)).unwrap_or_else(T::zero))
        .collect();
    write_vector(result, &acc)
}

pub(crate) fn vector_pointwise_remainder<T: Scalar>(
    this: &(impl VectorStorage<T> + ?Sized),
    divisor: &dyn VectorStorage<T>,
    result: &mut dyn VectorStorage<T>,
) -> Result<(), LinalgError> {
    let acc: Vec<T> = (0..this.len())
        .map(|i| this.at(i).remainder(divisor.at(i)).unwrap_or_else(T::zero))
        .collect();
    write_vector(result, &acc)
}

pub(crate) fn vector_negate<T: Scalar>(
    this: &(impl VectorStorage<T> + ?Sized),
    result: &mut dyn VectorStorage<T>,
) -> Result<(), LinalgError> {
    write_vector(result, &map_non_zero(this, |x| -x))
}

pub(crate) fn vector_conjugate<T: Scalar>(
    this: &(impl VectorStorage<T> + ?Sized),
    result: &mut dyn VectorStorage<T>,
) -> Result<(), LinalgError> {
    write_vector(result, &map_non_zero(this, |x| x.conjugate()))
}

pub(crate) fn matrix_add_scalar<T: Scalar>(
    this: &(impl MatrixStorage<T> + ?Sized),
    scalar: T,
    result: &mut dyn MatrixStorage<T>,
) -> Result<(), LinalgError> {
    let values: Vec<T> = this.enumerate().map(|x| x + scalar).collect();
    write_matrix(result, &values)
}

pub(crate) fn matrix_add<T: Scalar>(
    this: &(impl MatrixStorage<T> + ?Sized),
    other: &dyn MatrixStorage<T>,
    result: &mut dyn MatrixStorage<T>,
) -> Result<(), LinalgError> {
    let rows = this.row_count();
    let mut acc = collect_matrix_non_zero(this);
    for (i, j, v) in other.enumerate_non_zero_indexed() {
        acc[j * rows + i] = acc[j * rows + i] + v;
    }
    write_matrix(result, &acc)
}

pub(crate) fn matrix_subtract<T: Scalar>(
    this: &(impl MatrixStorage<T> + ?Sized),
    other: &dyn MatrixStorage<T>,
    result: &mut dyn MatrixStorage<T>,
) -> Result<(), LinalgError> {
    let rows = this.row_count();
    let mut acc = collect_matrix_non_zero(this);
    for (i, j, v) in other.enumerate_non_zero_indexed() {
        acc[j * rows + i] = acc[j * rows + i] - v;
    }
    write_matrix(result, &acc)
}

pub(crate) fn matrix_multiply_scalar<T: Scalar>(
    this: &(impl MatrixStorage<T> + ?Sized),
    scalar: T,
    result: &mut dyn MatrixStorage<T>,
) -> Result<(), LinalgError> {
    write_matrix(result, &map_matrix_non_zero(this, |x| x * scalar))
}

pub(crate) fn matrix_divide_scalar<T: Scalar>(
    this: &(impl MatrixStorage<T> + ?Sized),
    scalar: T,
    result: &mut dyn MatrixStorage<T>,
) -> Result<(), LinalgError> {
    write_matrix(result, &map_matrix_non_zero(this, |x| x / scalar))
}

pub(crate) fn matrix_divide_by_scalar<T: Scalar>(
    this: &(impl MatrixStorage<T> + ?Sized),
    scalar: T,
    result: &mut dyn MatrixStorage<T>,
) -> Result<(), LinalgError> {
    let values: Vec<T> = this.enumerate().map(|x| scalar / x).collect();
    write_matrix(result, &values)
}

pub(crate) fn matrix_multiply_vector<T: Scalar>(
    this: &(impl MatrixStorage<T> + ?Sized),
    vector: &dyn VectorStorage<T>,
    result: &mut dyn VectorStorage<T>,
) -> Result<(), LinalgError> {
    let mut acc = vec![T::zero(); this.row_count()];
    for (i, k, a) in this.enumerate_non_zero_indexed() {
        acc[i] = acc[i] + a * vector.at(k);
    }
    write_vector(result, &acc)
}

pub(crate) fn matrix_transpose_this_and_multiply_vector<T: Scalar>(
    this: &(impl MatrixStorage<T> + ?Sized),
    vector: &dyn VectorStorage<T>,
    result: &mut dyn VectorStorage<T>,
) -> Result<(), LinalgError> {
    let mut acc = vec![T::zero(); this.column_count()];
    for (k, j, a) in this.enumerate_non_zero_indexed() {
        acc[j] = acc[j] + a * vector.at(k);
    }
    write_vector(result, &acc)
}

pub(crate) fn matrix_multiply<T: Scalar>(
    this: &(impl MatrixStorage<T> + ?Sized),
    other: &dyn MatrixStorage<T>,
    result: &mut dyn MatrixStorage<T>,
) -> Result<(), LinalgError> {
    let rows = this.row_count();
    let cols = other.column_count();
    let mut acc = vec![T::zero(); rows * cols];
    for (i, k, a) in this.enumerate_non_zero_indexed() {
        for j in 0..cols {
            acc[j * rows + i] = acc[j * rows + i] + a * other.at(k, j);
        }
    }
    write_matrix(result, &acc)
}

pub(crate) fn matrix_transpose_and_multiply<T: Scalar>(
    this: &(impl MatrixStorage<T> + ?Sized),
    other: &dyn MatrixStorage<T>,
    result: &mut dyn MatrixStorage<T>,
) -> Result<(), LinalgError> {
    let rows = this.row_count();
    let cols = other.row_count();
    let mut acc = vec![T::zero(); rows * cols];
    for (i, k, a) in this.enumerate_non_zero_indexed() {
        for j in 0..cols {
            acc[j * rows + i] = acc[j * rows + i] + a * other.at(j, k);
        }
    }
    write_matrix(result, &acc)
}

pub(crate) fn matrix_transpose_this_and_multiply<T: Scalar>(
    this: &(impl MatrixStorage<T> + ?Sized),
    other: &dyn MatrixStorage<T>,
    result: &mut dyn MatrixStorage<T>,
) -> Result<(), LinalgError> {
    let rows = this.column_count();
    let cols = other.column_count();
    let mut acc = vec![T::zero(); rows * cols];
    for (k, i, a) in this.enumerate_non_zero_indexed() {
        for j in 0..cols {
            acc[j * rows + i] = acc[j * rows + i] + a * other.at(k, j);
        }
    }
    write_matrix(result, &acc)
}

pub(crate) fn matrix_negate<T: Scalar>(
    this: &(impl MatrixStorage<T> + ?Sized),
    result: &mut dyn MatrixStorage<T>,
) -> Result<(), LinalgError> {
    write_matrix(result, &map_matrix_non_zero(this, |x| -x))
}

pub(crate) fn matrix_conjugate<T: Scalar>(
    this: &(impl MatrixStorage<T> + ?Sized),
    result: &mut dyn MatrixStorage<T>,
) -> Result<(), LinalgError> {
    write_matrix(result, &map_matrix_non_zero(this, |x| x.conjugate()))
}

pub(crate) fn matrix_pointwise_multiply<T: Scalar>(
    this: &(impl MatrixStorage<T> + ?Sized),
    other: &dyn MatrixStorage<T>,
    result: &mut dyn MatrixStorage<T>,
) -> Result<(), LinalgError> {
    let rows = this.row_count();
    let mut acc = vec![T::zero(); rows * this.column_count()];
    for (i, j, v) in this.enumerate_non_zero_indexed() {
        acc[j * rows + i] = v * other.at(i, j);
    }
    write_matrix(result, &acc)
}

pub(crate) fn matrix_pointwise_divide<T: Scalar>(
    this: &(impl MatrixStorage<T> + ?Sized),
    other: &dyn MatrixStorage<T>,
    result: &mut dyn MatrixStorage<T>,
) -> Result<(), LinalgError> {
    let values: Vec<T> = this.enumerate_indexed().map(|(i, j, v)| v / other.at(i, j)).collect();
    write_matrix(result, &values)
}

pub(crate) fn matrix_modulus<T: Scalar>(
    this: &(impl MatrixStorage<T> + ?Sized),
    divisor: T,
    result: &mut dyn MatrixStorage<T>,
) -> Result<(), LinalgError> {
    let values: Vec<T> = this
        .enumerate()
        .map(|x| x.modulo(divisor).unwrap_or_else(T::zero))
        .collect();
    write_matrix(result, &values)
}

pub(crate) fn matrix_remainder<T: Scalar>(
    this: &(impl MatrixStorage<T> + ?Sized),
    divisor: T,
    result: &mut dyn MatrixStorage<T>,
) -> Result<(), LinalgError> {
    let values: Vec<T> = this
        .enumerate()
        .map(|x| x.remainder(divisor).unwrap_or_else(T::zero))
        .collect();
    write_matrix(result, &values)
}

pub(crate) fn matrix_pointwise_modulus<T: Scalar>(
    this: &(impl MatrixStorage<T> + ?Sized),
    divisor: &dyn MatrixStorage<T>,
    result: &mut dyn MatrixStorage<T>,
) -> Result<(), LinalgError> {
    let values: Vec<T> = this
        .enumerate_indexed()
        .map(|(i, j, v)| v.modulo(divisor.at(i, j)).unwrap_or_else(T::zero))
        .collect();
    write_matrix(result, &values)
}

pub(crate) fn matrix_pointwise_remainder<T: Scalar>(
    this: &(impl MatrixStorage<T> + ?Sized),
    divisor: &dyn MatrixStorage<T>,
    result: &mut dyn MatrixStorage<T>,
) -> Result<(), LinalgError> {
    let values: Vec<T> = this
        .enumerate_indexed()
        .map(|(i, j, v)| v.remainder(divisor.at(i, j)).unwrap_or_else(T::zero))
        .collect();
    write_matrix(result, &values)
}
// ---- accumulation and write-back ----------------------------------------

pub(crate) fn map_all<T: Scalar>(
    src: &(impl VectorStorage<T> + ?Sized),
    f: impl Fn(T) -> T,
) -> Vec<T> {
    (0..src.len()).map(|i| f(src.at(i))).collect()
}

pub(crate) fn map_non_zero<T: Scalar>(
    src: &(impl VectorStorage<T> + ?Sized),
    f: impl Fn(T) -> T,
) -> Vec<T> {
    let mut acc = vec![T::zero(); src.len()];
    for (i, v) in src.enumerate_non_zero() {
        acc[i] = f(v);
    }
    acc
}

pub(crate) fn collect_non_zero<T: Scalar>(src: &(impl VectorStorage<T> + ?Sized)) -> Vec<T> {
    map_non_zero(src, |x| x)
}

pub(crate) fn map_matrix_non_zero<T: Scalar>(
    src: &(impl MatrixStorage<T> + ?Sized),
    f: impl Fn(T) -> T,
) -> Vec<T> {
    let rows = src.row_count();
    let mut acc = vec![T::zero(); rows * src.column_count()];
    for (i, j, v) in src.enumerate_non_zero_indexed() {
        acc[j * rows + i] = f(v);
    }
    acc
}

pub(crate) fn collect_matrix_non_zero<T: Scalar>(src: &(impl MatrixStorage<T> + ?Sized)) -> Vec<T> {
    map_matrix_non_zero(src, |x| x)
}

/// Overwrite `result` with `values`, refusing up front if a non-zero value
/// falls outside the destination's structural pattern.
pub(crate) fn write_vector<T: Scalar>(
    result: &mut dyn VectorStorage<T>,
    values: &[T],
) -> Result<(), LinalgError> {
    if let Some(dst) = result.as_mut_slice() {
        dst.copy_from_slice(values);
        return Ok(());
    }
    if !result.is_fully_mutable() {
        for (i, v) in values.iter().enumerate() {
            if !is_zero(*v) && !result.is_mutable_at(i) {
                return Err(LinalgError::Unsupported(OUTSIDE_PATTERN));
            }
        }
    }
    result.clear();
    for (i, v) in values.iter().enumerate() {
        if !is_zero(*v) {
            result.set_at(i, *v)?;
        }
    }
    Ok(())
}

/// Overwrite `result` with column-major `values` (same checks as [`write_vector`]).
pub(crate) fn write_matrix<T: Scalar>(
    result: &mut dyn MatrixStorage<T>,
    values: &[T],
) -> Result<(), LinalgError> {
    if let Some(dst) = result.as_column_major_slice_mut() {
        dst.copy_from_slice(values);
        return Ok(());
    }
    let rows = result.row_count();
    if !result.is_fully_mutable() {
        for (idx, v) in values.iter().enumerate() {
            if !is_zero(*v) && !result.is_mutable_at(idx % rows, idx / rows) {
                return Err(LinalgError::Unsupported(OUTSIDE_PATTERN));
            }
        }
    }
    result.clear();
    for (idx, v) in values.iter().enumerate() {
        if !is_zero(*v) {
            result.set_at(idx % rows, idx / rows, *v)?;
        }
    }
    Ok(())
}
