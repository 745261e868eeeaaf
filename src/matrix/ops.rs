//! `std::ops` overloads for [`Matrix`].
//!
//! Same contract as the vector operators: invalid operands panic, and the
//! scalar forms carry their own zero/one short-circuits.

use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, Sub, SubAssign};

use num_complex::Complex;

use super::Matrix;
use crate::core::scalar::Scalar;
use crate::error::LinalgError;
use crate::vector::Vector;

fn expect<R>(op: &str, result: Result<R, LinalgError>) -> R {
    match result {
        Ok(value) => value,
        Err(err) => panic!("matrix {op} failed: {err}"),
    }
}

impl<T: Scalar> Add<&Matrix<T>> for &Matrix<T> {
    type Output = Matrix<T>;

    fn add(self, rhs: &Matrix<T>) -> Matrix<T> {
        expect("+", Matrix::add(self, rhs))
    }
}

impl<T: Scalar> Sub<&Matrix<T>> for &Matrix<T> {
    type Output = Matrix<T>;

    fn sub(self, rhs: &Matrix<T>) -> Matrix<T> {
        expect("-", Matrix::subtract(self, rhs))
    }
}

impl<T: Scalar> Mul<&Matrix<T>> for &Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, rhs: &Matrix<T>) -> Matrix<T> {
        expect("*", self.multiply(rhs))
    }
}

impl<T: Scalar> Mul<&Vector<T>> for &Matrix<T> {
    type Output = Vector<T>;

    fn mul(self, rhs: &Vector<T>) -> Vector<T> {
        expect("*", self.multiply_vector(rhs))
    }
}

/// Row vector times matrix.
impl<T: Scalar> Mul<&Matrix<T>> for &Vector<T> {
    type Output = Vector<T>;

    fn mul(self, rhs: &Matrix<T>) -> Vector<T> {
        expect("*", rhs.left_multiply(self))
    }
}

impl<T: Scalar> Add<T> for &Matrix<T> {
    type Output = Matrix<T>;

    fn add(self, rhs: T) -> Matrix<T> {
        if rhs == T::zero() {
            return self.clone();
        }
        let (rows, cols) = self.shape();
        let mut result = Matrix::from_storage(self.storage.create_like(rows, cols, true));
        expect("+", self.storage.do_add_scalar(rhs, &mut *result.storage));
        result
    }
}

impl<T: Scalar> Sub<T> for &Matrix<T> {
    type Output = Matrix<T>;

    fn sub(self, rhs: T) -> Matrix<T> {
        self + (-rhs)
    }
}

impl<T: Scalar> Mul<T> for &Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, rhs: T) -> Matrix<T> {
        if rhs == T::one() {
            return self.clone();
        }
        let (rows, cols) = self.shape();
        let mut result = self.create_matrix(rows, cols);
        if rhs == T::zero() {
            return result;
        }
        expect("*", self.storage.do_multiply_scalar(rhs, &mut *result.storage));
        result
    }
}

impl<T: Scalar> Div<T> for &Matrix<T> {
    type Output = Matrix<T>;

    fn div(self, rhs: T) -> Matrix<T> {
        if rhs == T::zero() {
            panic!("matrix / failed: {}", LinalgError::DivideByZero);
        }
        if rhs == T::one() {
            return self.clone();
        }
        let (rows, cols) = self.shape();
        let mut result = self.create_matrix(rows, cols);
        expect("/", self.storage.do_divide_scalar(rhs, &mut *result.storage));
        result
    }
}

/// Truncated remainder, sign of the dividend.
impl<T: Scalar> Rem<T> for &Matrix<T> {
    type Output = Matrix<T>;

    fn rem(self, rhs: T) -> Matrix<T> {
        expect("%", self.remainder(rhs))
    }
}

impl<T: Scalar> Rem<T> for Matrix<T> {
    type Output = Matrix<T>;

    fn rem(self, rhs: T) -> Matrix<T> {
        &self % rhs
    }
}

impl<T: Scalar> Neg for &Matrix<T> {
    type Output = Matrix<T>;

    fn neg(self) -> Matrix<T> {
        expect("negate", self.negate())
    }
}

impl<T: Scalar> Neg for Matrix<T> {
    type Output = Matrix<T>;

    fn neg(self) -> Matrix<T> {
        -&self
    }
}

macro_rules! forward_owned {
    ($($imp:ident :: $method:ident),*) => {
        $(
            impl<T: Scalar> $imp<Matrix<T>> for Matrix<T> {
                type Output = Matrix<T>;

                fn $method(self, rhs: Matrix<T>) -> Matrix<T> {
                    $imp::$method(&self, &rhs)
                }
            }

            impl<T: Scalar> $imp<T> for Matrix<T> {
                type Output = Matrix<T>;

                fn $method(self, rhs: T) -> Matrix<T> {
                    $imp::$method(&self, rhs)
                }
            }
        )*
    };
}

forward_owned!(Add::add, Sub::sub, Mul::mul);

impl<T: Scalar> Div<T> for Matrix<T> {
    type Output = Matrix<T>;

    fn div(self, rhs: T) -> Matrix<T> {
        &self / rhs
    }
}

impl<T: Scalar> AddAssign<&Matrix<T>> for Matrix<T> {
    fn add_assign(&mut self, rhs: &Matrix<T>) {
        expect("+=", self.add_in_place(rhs));
    }
}

impl<T: Scalar> SubAssign<&Matrix<T>> for Matrix<T> {
    fn sub_assign(&mut self, rhs: &Matrix<T>) {
        expect("-=", self.subtract_in_place(rhs));
    }
}

impl<T: Scalar> MulAssign<&Matrix<T>> for Matrix<T> {
    fn mul_assign(&mut self, rhs: &Matrix<T>) {
        expect("*=", self.multiply_in_place(rhs));
    }
}

impl<T: Scalar> MulAssign<T> for Matrix<T> {
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

impl<T: Scalar> DivAssign<T> for Matrix<T> {
    fn div_assign(&mut self, rhs: T) {
        let computed = &*self / rhs;
        expect("/=", self.assign_from(computed));
    }
}

macro_rules! scalar_lhs {
    ($($t:ty),*) => {
        $(
            impl Mul<&Matrix<$t>> for $t {
                type Output = Matrix<$t>;

                fn mul(self, rhs: &Matrix<$t>) -> Matrix<$t> {
                    rhs * self
                }
            }

            impl Mul<Matrix<$t>> for $t {
                type Output = Matrix<$t>;

                fn mul(self, rhs: Matrix<$t>) -> Matrix<$t> {
                    &rhs * self
                }
            }
        )*
    };
}

scalar_lhs!(f32, f64, Complex<f32>, Complex<f64>);
