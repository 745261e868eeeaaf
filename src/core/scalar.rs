//! Scalar strategies: one implementation per supported element type.
//!
//! The zero/one identities come from `num-traits` and are fixed per type.
//! Everything the representation-agnostic code needs beyond field arithmetic
//! (conjugation, magnitude, canonical modulus, provider lookup) lives here so
//! that no operation ever inspects the element type at runtime.

use crate::config::{self, ProviderKind};
use crate::provider::{FaerProvider, LinearAlgebraProvider, ManagedProvider};
use num_complex::Complex;
use num_traits::{Float, Num};
use std::fmt::{Debug, Display};
use std::hash::Hasher;
use std::ops::Neg;

/// Element type of a [`Matrix`](crate::Matrix) or [`Vector`](crate::Vector).
///
/// Implemented for `f32`, `f64`, `Complex<f32>` and `Complex<f64>`.
pub trait Scalar:
    Copy + Debug + Display + PartialEq + Num + Neg<Output = Self> + Send + Sync + 'static
{
    /// Real counterpart (`Self` for reals, the component type for complex).
    type Real: RealScalar;

    /// Complex conjugate (identity for reals).
    fn conjugate(self) -> Self;

    /// Absolute value / complex modulus.
    fn magnitude(self) -> Self::Real;

    /// Real part.
    fn real(self) -> Self::Real;

    /// Promote a real value into `Self`.
    fn from_real(r: Self::Real) -> Self;

    /// Lossy conversion from `f64`.
    fn from_f64(v: f64) -> Self;

    /// Canonical modulus: the result carries the sign of `divisor`.
    /// `None` when the type has no ordering (complex).
    fn modulo(self, divisor: Self) -> Option<Self>;

    /// Truncated remainder: the result carries the sign of `self`.
    /// `None` when the type has no ordering (complex).
    fn remainder(self, divisor: Self) -> Option<Self>;

    /// Feed the bit pattern of the value into `state`.
    fn hash_bits<H: Hasher>(&self, state: &mut H);

    /// Provider currently selected for this element type.
    fn provider() -> &'static dyn LinearAlgebraProvider<Self>;

    /// Whether [`Scalar::modulo`] and [`Scalar::remainder`] are defined.
    fn supports_modulus() -> bool {
        Self::one().modulo(Self::one()).is_some()
    }
}

/// Real floating-point scalars.
pub trait RealScalar: Scalar<Real = Self> + Float {}

impl<T: Scalar<Real = T> + Float> RealScalar for T {}

fn real_provider<T>() -> &'static dyn LinearAlgebraProvider<T>
where
    T: Scalar,
    ManagedProvider: LinearAlgebraProvider<T>,
    FaerProvider: LinearAlgebraProvider<T>,
{
    match config::provider_kind() {
        ProviderKind::Faer => &FaerProvider,
        ProviderKind::Managed => &ManagedProvider,
    }
}

macro_rules! impl_scalar_real {
    ($($t:ty => $bits:ident),*) => {
        $(
            impl Scalar for $t {
                type Real = $t;

                #[inline] fn conjugate(self) -> $t { self }
                #[inline] fn magnitude(self) -> $t { Float::abs(self) }
                #[inline] fn real(self) -> $t { self }
                #[inline] fn from_real(r: $t) -> $t { r }
                #[inline] fn from_f64(v: f64) -> $t { v as $t }

                #[inline]
                fn modulo(self, divisor: $t) -> Option<$t> {
                    Some(((self % divisor) + divisor) % divisor)
                }

                #[inline]
                fn remainder(self, divisor: $t) -> Option<$t> {
                    Some(self % divisor)
                }

                #[inline]
                fn hash_bits<H: Hasher>(&self, state: &mut H) {
                    state.$bits(self.to_bits());
                }

                fn provider() -> &'static dyn LinearAlgebraProvider<$t> {
                    real_provider::<$t>()
                }
            }
        )*
    };
}

impl_scalar_real!(f32 => write_u32, f64 => write_u64);

macro_rules! impl_scalar_complex {
    ($($t:ty),*) => {
        $(
            impl Scalar for Complex<$t> {
                type Real = $t;

                #[inline] fn conjugate(self) -> Self { self.conj() }
                #[inline] fn magnitude(self) -> $t { self.norm() }
                #[inline] fn real(self) -> $t { self.re }
                #[inline] fn from_real(r: $t) -> Self { Complex::new(r, 0.0) }
                #[inline] fn from_f64(v: f64) -> Self { Complex::new(v as $t, 0.0) }
                #[inline] fn modulo(self, _divisor: Self) -> Option<Self> { None }
                #[inline] fn remainder(self, _divisor: Self) -> Option<Self> { None }

                #[inline]
                fn hash_bits<H: Hasher>(&self, state: &mut H) {
                    self.re.hash_bits(state);
                    self.im.hash_bits(state);
                }

                // faer acceleration is wired for real types only.
                fn provider() -> &'static dyn LinearAlgebraProvider<Self> {
                    &ManagedProvider
                }
            }
        )*
    };
}

impl_scalar_complex!(f32, f64);

/// `true` when `value` equals the additive identity.
#[inline]
pub(crate) fn is_zero<T: Scalar>(value: T) -> bool {
    value.is_zero()
}

/// `true` when `value` equals the multiplicative identity.
#[inline]
pub(crate) fn is_one<T: Scalar>(value: T) -> bool {
    value == T::one()
}
