//! `std::ops` overloads for [`Vector`].
//!
//! Operators panic on invalid arguments. Scalar `*`, `/`, `+` and `-` apply
//! their own zero/one short-circuits before touching the storage hooks,
//! independently of the methods in `arithmetic`; tests keep both in step.

use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, Sub, SubAssign};

use num_complex::Complex;

use super::Vector;
use crate::core::scalar::Scalar;
use crate::error::LinalgError;

fn expect<R>(op: &str, result: Result<R, LinalgError>) -> R {
    match result {
        Ok(value) => value,
        Err(err) => panic!("vector {op} failed: {err}"),
    }
}

impl<T: Scalar> Add<&Vector<T>> for &Vector<T> {
    type Output = Vector<T>;

    fn add(self, rhs: &Vector<T>) -> Vector<T> {
        expect("+", Vector::add(self, rhs))
    }
}

impl<T: Scalar> Sub<&Vector<T>> for &Vector<T> {
    type Output = Vector<T>;

    fn sub(self, rhs: &Vector<T>) -> Vector<T> {
        expect("-", Vector::subtract(self, rhs))
    }
}

impl<T: Scalar> Add<T> for &Vector<T> {
    type Output = Vector<T>;

    fn add(self, rhs: T) -> Vector<T> {
        if rhs == T::zero() {
            return self.clone();
        }
        let mut result = Vector::from_storage(self.storage.create_like(self.len(), true));
        expect("+", self.storage.do_add_scalar(rhs, &mut *result.storage));
        result
    }
}

impl<T: Scalar> Sub<T> for &Vector<T> {
    type Output = Vector<T>;

    fn sub(self, rhs: T) -> Vector<T> {
        self + (-rhs)
    }
}

impl<T: Scalar> Mul<T> for &Vector<T> {
    type Output = Vector<T>;

    fn mul(self, rhs: T) -> Vector<T> {
        if rhs == T::one() {
            return self.clone();
        }
        let mut result = self.create_vector(self.len());
        if rhs == T::zero() {
            return result;
        }
        expect("*", self.storage.do_multiply_scalar(rhs, &mut *result.storage));
        result
    }
}

impl<T: Scalar> Div<T> for &Vector<T> {
    type Output = Vector<T>;

    fn div(self, rhs: T) -> Vector<T> {
        if rhs == T::zero() {
            panic!("vector / failed: {}", LinalgError::DivideByZero);
        }
        if rhs == T::one() {
            return self.clone();
        }
        let mut result = self.create_vector(self.len());
        expect("/", self.storage.do_divide_scalar(rhs, &mut *result.storage));
        result
    }
}

/// Dot product.
impl<T: Scalar> Mul<&Vector<T>> for &Vector<T> {
    type Output = T;

    fn mul(self, rhs: &Vector<T>) -> T {
        expect("dot", self.dot(rhs))
    }
}

/// Truncated remainder, sign of the dividend.
impl<T: Scalar> Rem<T> for &Vector<T> {
    type Output = Vector<T>;

    fn rem(self, rhs: T) -> Vector<T> {
        expect("%", self.remainder(rhs))
    }
}

impl<T: Scalar> Rem<T> for Vector<T> {
    type Output = Vector<T>;

    fn rem(self, rhs: T) -> Vector<T> {
        &self % rhs
    }
}

impl<T: Scalar> Neg for &Vector<T> {
    type Output = Vector<T>;

    fn neg(self) -> Vector<T> {
        expect("negate", self.negate())
    }
}

macro_rules! forward_owned {
    ($($imp:ident :: $method:ident),*) => {
        $(
            impl<T: Scalar> $imp<Vector<T>> for Vector<T> {
                type Output = Vector<T>;

                fn $method(self, rhs: Vector<T>) -> Vector<T> {
                    $imp::$method(&self, &rhs)
                }
            }

            impl<T: Scalar> $imp<T> for Vector<T> {
                type Output = Vector<T>;

                fn $method(self, rhs: T) -> Vector<T> {
                    $imp::$method(&self, rhs)
                }
            }
        )*
    };
}

forward_owned!(Add::add, Sub::sub);

impl<T: Scalar> Mul<T> for Vector<T> {
    type Output = Vector<T>;

    fn mul(self, rhs: T) -> Vector<T> {
        &self * rhs
    }
}

impl<T: Scalar> Div<T> for Vector<T> {
    type Output = Vector<T>;

    fn div(self, rhs: T) -> Vector<T> {
        &self / rhs
    }
}

impl<T: Scalar> Neg for Vector<T> {
    type Output = Vector<T>;

    fn neg(self) -> Vector<T> {
        -&self
    }
}

impl<T: Scalar> AddAssign<&Vector<T>> for Vector<T> {
    fn add_assign(&mut self, rhs: &Vector<T>) {
        expect("+=", self.add_in_place(rhs));
    }
}

impl<T: Scalar> SubAssign<&Vector<T>> for Vector<T> {
    fn sub_assign(&mut self, rhs: &Vector<T>) {
        expect("-=", self.subtract_in_place(rhs));
    }
}

impl<T: Scalar> MulAssign<T> for Vector<T> {
    fn mul_assign(&mut self, rhs: T) {
        if rhs == T::one() {
            return;
        }
        if rhs == T::zero() {
            self.clear();
            return;
        }
        let computed = &*self * rhs;
        expect("*=", self.assign_from(computed));
    }
}

impl<T: Scalar> DivAssign<T> for Vector<T> {
    fn div_assign(&mut self, rhs: T) {
        let computed = &*self / rhs;
        expect("/=", self.assign_from(computed));
    }
}

macro_rules! scalar_lhs {
    ($($t:ty),*) => {
        $(
            impl Mul<&Vector<$t>> for $t {
                type Output = Vector<$t>;

                fn mul(self, rhs: &Vector<$t>) -> Vector<$t> {
                    rhs * self
                }
            }

            impl Mul<Vector<$t>> for $t {
                type Output = Vector<$t>;

                fn mul(self, rhs: Vector<$t>) -> Vector<$t> {
                    &rhs * self
                }
            }
        )*
    };
}

scalar_lhs!(f32, f64, Complex<f32>, Complex<f64>);
