mod common;

use approx::assert_abs_diff_eq;
use linkern::{LinalgError, Vector};
use num_complex::Complex64;
use rand::distributions::Uniform;

fn pair(seed: u64) -> (Vector<f64>, Vector<f64>) {
    let mut rng = common::rng(seed);
    let values: Vec<f64> = Vector::random(9, &Uniform::new(-3.0, 3.0), &mut rng)
        .to_vec()
        .into_iter()
        .enumerate()
        .map(|(i, v)| if i % 3 == 1 { 0.0 } else { v })
        .collect();
    (Vector::dense_from_slice(&values), Vector::sparse_from_slice(&values))
}

/// Dense and sparse vectors holding the same values give the same results.
#[test]
fn dense_and_sparse_agree() {
    common::init_logging();
    let (d, s) = pair(5);
    let (e, t) = pair(6);
    assert_eq!(d, s);
    assert_eq!(d.add(&e).unwrap(), s.add(&t).unwrap());
    assert_eq!(d.pointwise_multiply(&e).unwrap(), s.pointwise_multiply(&t).unwrap());
    assert_abs_diff_eq!(d.dot(&e).unwrap(), s.dot(&t).unwrap(), epsilon = 1e-12);
    assert_eq!(d.norm(3.0).unwrap(), s.norm(3.0).unwrap());
    assert_eq!(d.abs_maximum_index(), s.abs_maximum_index());
    assert!(!s.multiply_scalar(0.0).unwrap().storage().is_dense());
}

/// A length mismatch fails before the result is written.
#[test]
fn length_mismatch_leaves_result_untouched() {
    let a = Vector::dense_from_vec(vec![1.0, 2.0, 3.0]);
    let mut result = Vector::dense_from_vec(vec![7.0, 7.0]);
    let err = a.add_into(&a, &mut result).unwrap_err();
    assert!(matches!(err, LinalgError::DimensionMismatch { .. }));
    assert!(a.negate_into(&mut result).is_err());
    assert_eq!(result.to_vec(), vec![7.0, 7.0]);
}

/// Every `_into` form rejects a bad call before touching a dense or sparse result.
#[test]
fn failed_into_calls_leave_result_untouched() {
    let sentinel = -3.5;
    let (d, s) = pair(8);
    let short = Vector::dense_from_vec(vec![1.0; 8]);
    for v in [&d, &s] {
        for mut result in [Vector::dense_from_vec(vec![sentinel; 9]), Vector::sparse_from_slice(&[sentinel; 9])] {
            assert!(matches!(v.add_into(&short, &mut result), Err(LinalgError::DimensionMismatch { .. })));
            assert!(v.subtract_into(&short, &mut result).is_err());
            assert!(v.pointwise_multiply_into(&short, &mut result).is_err());
            assert!(v.pointwise_divide_into(&short, &mut result).is_err());
            assert!(v.pointwise_modulus_into(&short, &mut result).is_err());
            assert!(v.pointwise_remainder_into(&short, &mut result).is_err());
            assert!(matches!(v.modulus_into(0.0, &mut result), Err(LinalgError::DivideByZero)));
            assert!(matches!(v.remainder_into(0.0, &mut result), Err(LinalgError::DivideByZero)));
            assert!(matches!(v.divide_scalar_into(0.0, &mut result), Err(LinalgError::DivideByZero)));
            assert!(result.enumerate().all(|x| x == sentinel));
        }

        let mut wrong = Vector::sparse_from_slice(&[sentinel; 4]);
        assert!(v.multiply_scalar_into(2.0, &mut wrong).is_err());
        assert!(v.conjugate_into(&mut wrong).is_err());
        assert!(v.modulus_into(3.0, &mut wrong).is_err());
        assert!(wrong.enumerate().all(|x| x == sentinel));
    }
}

/// Modulus follows the divisor's sign, remainder the dividend's.
#[test]
fn modulus_and_remainder_signs() {
    let v = Vector::dense_from_vec(vec![-7.0, 7.0]);
    assert_eq!(v.modulus(3.0).unwrap().to_vec(), vec![2.0, 1.0]);
    assert_eq!(v.remainder(3.0).unwrap().to_vec(), vec![-1.0, 1.0]);
    assert_eq!(v.modulus(-3.0).unwrap().to_vec(), vec![-1.0, -2.0]);
    assert!(matches!(v.modulus(0.0), Err(LinalgError::DivideByZero)));

    let z = Vector::dense_from_vec(vec![Complex64::new(1.0, 1.0)]);
    assert!(matches!(z.modulus(Complex64::new(2.0, 0.0)), Err(LinalgError::Unsupported(_))));
}

/// The conjugating dot differs from the plain one on complex input.
#[test]
fn complex_dot_products() {
    let i = Complex64::new(0.0, 1.0);
    let one = Complex64::new(1.0, 0.0);
    let u = Vector::dense_from_vec(vec![i, one]);
    let v = Vector::sparse_from_slice(&[i, one]);
    assert_eq!(u.dot(&v).unwrap(), Complex64::new(0.0, 0.0));
    assert_eq!(u.conjugate_dot(&v).unwrap(), Complex64::new(2.0, 0.0));
    assert_eq!(u.conjugate().unwrap().to_vec(), vec![-i, one]);
}

/// Outer products keep zero rows of a sparse factor.
#[test]
fn outer_product_of_sparse_factors() {
    let u = Vector::sparse_from_slice(&[0.0, 2.0]);
    let v = Vector::dense_from_vec(vec![3.0, 0.0, -1.0]);
    let m = u.outer_product(&v).unwrap();
    assert_eq!(m.to_row_major_vec(), vec![0.0, 0.0, 0.0, 6.0, 0.0, -2.0]);
}

/// Sub-vector extraction and copying agree across representations.
#[test]
fn sub_vectors() {
    let (d, s) = pair(12);
    assert_eq!(d.sub_vector(2, 5).unwrap(), s.sub_vector(2, 5).unwrap());
    assert!(d.sub_vector(6, 5).is_err());
    let mut target = Vector::sparse(9);
    d.copy_sub_vector_to(&mut target, 0, 4, 5).unwrap();
    assert_eq!(target.sub_vector(4, 5).unwrap(), d.sub_vector(0, 5).unwrap());
}

/// Ranges whose end overflows `usize` are reported, not panicked on.
#[test]
fn overflowing_range_is_out_of_range() {
    let mut v = Vector::<f64>::dense(4);
    assert!(matches!(
        v.sub_vector(1, usize::MAX),
        Err(LinalgError::IndexOutOfRange { bound: 4, .. })
    ));
    assert!(matches!(v.clear_sub_vector(usize::MAX, 2), Err(LinalgError::IndexOutOfRange { .. })));
    let mut target = Vector::sparse(4);
    assert!(v.copy_sub_vector_to(&mut target, 0, usize::MAX, 1).is_err());
}
