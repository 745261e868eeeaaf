//! Norms and reductions over vectors.

use num_traits::{Float, One, Zero};

use super::Vector;
use crate::core::scalar::{RealScalar, Scalar};
use crate::error::LinalgError;

/// `p`-norm of magnitudes yielded by `mags`.
pub(crate) fn p_norm<R: RealScalar>(mags: impl Iterator<Item = R>, p: f64) -> Result<R, LinalgError> {
    if p.is_nan() || p <= 0.0 {
        return Err(LinalgError::InvalidArgument("norm order must be positive"));
    }
    let norm = if p == 1.0 {
        mags.fold(R::zero(), |acc, m| acc + m)
    } else if p == 2.0 {
        mags.fold(R::zero(), |acc, m| acc + m * m).sqrt()
    } else if p.is_infinite() {
        mags.fold(R::zero(), Float::max)
    } else {
        let p = <R as Scalar>::from_f64(p);
        mags.fold(R::zero(), |acc, m| acc + m.powf(p)).powf(R::one() / p)
    };
    Ok(norm)
}

impl<T: Scalar> Vector<T> {
    /// `p`-norm: 1, 2, `f64::INFINITY` or any other positive order.
    pub fn norm(&self, p: f64) -> Result<T::Real, LinalgError> {
        p_norm(self.enumerate_non_zero().map(|(_, v)| v.magnitude()), p)
    }

    pub fn l1_norm(&self) -> T::Real {
        self.enumerate_non_zero()
            .fold(T::Real::zero(), |acc, (_, v)| acc + v.magnitude())
    }

    pub fn l2_norm(&self) -> T::Real {
        self.enumerate_non_zero()
            .fold(T::Real::zero(), |acc, (_, v)| {
                let m = v.magnitude();
                acc + m * m
            })
            .sqrt()
    }

    pub fn infinity_norm(&self) -> T::Real {
        self.enumerate_non_zero()
            .fold(T::Real::zero(), |acc, (_, v)| acc.max(v.magnitude()))
    }

    /// Copy scaled to unit `p`-norm. A zero vector comes back unchanged.
    pub fn normalize(&self, p: f64) -> Result<Vector<T>, LinalgError> {
        let norm = self.norm(p)?;
        if norm.is_zero() {
            return Ok(self.clone());
        }
        self.divide_scalar(T::from_real(norm))
    }

    pub fn sum(&self) -> T {
        self.enumerate_non_zero().fold(T::zero(), |acc, (_, v)| acc + v)
    }

    /// Index of the first element with the largest magnitude.
    pub fn abs_maximum_index(&self) -> Option<usize> {
        let mut best: Option<(usize, T::Real)> = None;
        for (i, v) in self.enumerate_indexed() {
            let m = v.magnitude();
            if best.is_none_or(|(_, b)| m > b) {
                best = Some((i, m));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Index of the first element with the smallest magnitude.
    pub fn abs_minimum_index(&self) -> Option<usize> {
        let mut best: Option<(usize, T::Real)> = None;
        for (i, v) in self.enumerate_indexed() {
            let m = v.magnitude();
            if best.is_none_or(|(_, b)| m < b) {
                best = Some((i, m));
            }
        }
        best.map(|(i, _)| i)
    }

    pub fn abs_maximum(&self) -> T::Real {
        self.infinity_norm()
    }

    pub fn abs_minimum(&self) -> Option<T::Real> {
        self.abs_minimum_index().map(|i| self.storage.at(i).magnitude())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use num_complex::Complex64;

    #[test]
    fn standard_norms() {
        let v = Vector::dense_from_vec(vec![3.0, -4.0]);
        assert_relative_eq!(v.norm(1.0).unwrap(), 7.0);
        assert_relative_eq!(v.norm(2.0).unwrap(), 5.0);
        assert_relative_eq!(v.norm(f64::INFINITY).unwrap(), 4.0);
        assert_relative_eq!(v.norm(3.0).unwrap(), 91.0f64.powf(1.0 / 3.0), epsilon = 1e-12);
        assert!(v.norm(0.0).is_err());
    }

    #[test]
    fn complex_norm_uses_modulus() {
        let v = Vector::sparse_from_slice(&[Complex64::new(3.0, 4.0), Complex64::new(0.0, 0.0)]);
        assert_relative_eq!(v.l2_norm(), 5.0);
    }

    #[test]
    fn normalize_and_zero_vector() {
        let v = Vector::dense_from_vec(vec![0.0, 2.0]);
        assert_eq!(v.normalize(2.0).unwrap().to_vec(), vec![0.0, 1.0]);
        let z = Vector::<f64>::dense(3);
        assert_eq!(z.normalize(2.0).unwrap(), z);
    }

    #[test]
    fn extremes_include_implicit_zeros() {
        let v = Vector::sparse_from_slice(&[2.0, 0.0, -5.0]);
        assert_eq!(v.abs_maximum_index(), Some(2));
        assert_eq!(v.abs_minimum_index(), Some(1));
        assert_eq!(v.abs_minimum(), Some(0.0));
        assert_eq!(v.sum(), -3.0);
        assert_eq!(Vector::<f64>::dense(0).abs_maximum_index(), None);
    }
}
