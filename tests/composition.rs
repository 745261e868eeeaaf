//! Structural operations behave the same whatever the backing representation.

mod common;

use linkern::{LinalgError, Matrix, Permutation, SquareMatrix, StorageFlags, Vector};

/// Blocks read and written through either representation match.
#[test]
fn sub_matrix_and_set_sub_matrix_agree_across_representations() {
    let (dense, sparse) = common::both_representations(5, 6, 3);
    let block_d = dense.sub_matrix(1, 3, 2, 4).unwrap();
    let block_s = sparse.sub_matrix(1, 3, 2, 4).unwrap();
    assert_eq!(block_d, block_s);
    assert!(block_d.storage().is_dense());
    assert!(!block_s.storage().is_dense());

    let mut target_d = Matrix::dense(5, 6);
    let mut target_s = Matrix::sparse(5, 6);
    target_d.set_sub_matrix(1, 2, &block_s).unwrap();
    target_s.set_sub_matrix(1, 2, &block_d).unwrap();
    assert_eq!(target_d, target_s);
    assert_eq!(target_d.sub_matrix(1, 3, 2, 4).unwrap(), block_d);
}

/// Removing an inserted row or column restores the matrix.
#[test]
fn insert_remove_round_trip() {
    let (dense, sparse) = common::both_representations(3, 4, 9);
    let row = Vector::dense_from_vec(vec![1.0, 0.0, -1.0, 2.0]);
    let col = Vector::sparse_from_slice(&[0.0, 5.0, 0.0]);
    for m in [dense, sparse] {
        for at in 0..=3 {
            let grown = m.insert_row(at, &row).unwrap();
            assert_eq!(grown.row(at).unwrap(), row);
            assert_eq!(grown.remove_row(at).unwrap(), m);
        }
        let widened = m.insert_column(1, &col).unwrap();
        assert_eq!(widened.column(1).unwrap(), col);
        assert_eq!(widened.remove_column(1).unwrap(), m);
        assert!(matches!(m.insert_column(1, &row), Err(LinalgError::DimensionMismatch { .. })));
    }
}

/// `stack`, `append` and `diagonal_stack` place each operand in its block.
#[test]
fn stacking_shapes() {
    let top = common::patterned(2, 3, 1);
    let bottom = common::patterned(4, 3, 2);
    let stacked = top.stack(&bottom).unwrap();
    assert_eq!(stacked.shape(), (6, 3));
    assert_eq!(stacked.sub_matrix(2, 4, 0, 3).unwrap(), bottom);

    let right = common::patterned(2, 5, 3);
    let appended = top.append(&right).unwrap();
    assert_eq!(appended.shape(), (2, 8));
    assert_eq!(appended.sub_matrix(0, 2, 3, 5).unwrap(), right);

    let block = top.diagonal_stack(&bottom).unwrap();
    assert_eq!(block.shape(), (6, 6));
    assert!(block.sub_matrix(0, 2, 3, 3).unwrap().enumerate().all(|v| v == 0.0));
    assert!(block.sub_matrix(2, 4, 0, 3).unwrap().enumerate().all(|v| v == 0.0));

    let mut wrong = Matrix::dense(2, 2);
    assert!(top.append_into(&right, &mut wrong).is_err());
    assert!(top.stack(&right).is_err());
}

/// Permuting and then applying the inverse permutation restores the matrix.
#[test]
fn permutation_round_trip() {
    let (dense, sparse) = common::both_representations(4, 4, 17);
    let p = Permutation::new(vec![3, 0, 2, 1]).unwrap();
    for m in [dense, sparse] {
        let mut permuted = m.clone();
        permuted.permute_rows(&p).unwrap();
        for i in 0..4 {
            assert_eq!(permuted.row(p.get(i)).unwrap(), m.row(i).unwrap());
        }
        permuted.permute_rows(&p.inverse()).unwrap();
        assert_eq!(permuted, m);

        permuted.permute_columns(&p).unwrap();
        assert_eq!(permuted.column(p.get(0)).unwrap(), m.column(0).unwrap());
        assert!(permuted.permute_columns(&Permutation::identity(3)).is_err());
    }
    let mut diagonal = Matrix::<f64>::diagonal_identity(4);
    assert!(matches!(diagonal.permute_rows(&p), Err(LinalgError::Unsupported(_))));
    assert_eq!(diagonal, Matrix::diagonal_identity(4));
}

#[test]
fn normalized_rows_have_unit_norm() {
    let (dense, sparse) = common::both_representations(4, 5, 23);
    for m in [dense, sparse] {
        let rows = m.normalize_rows(2.0).unwrap();
        for row in rows.rows() {
            approx::assert_abs_diff_eq!(row.l2_norm(), 1.0, epsilon = 1e-12);
        }
        let cols = m.normalize_columns(1.0).unwrap();
        for col in cols.columns() {
            let norm = col.l1_norm();
            assert!(norm == 0.0 || (norm - 1.0).abs() < 1e-12);
        }
    }
}

/// Diagonal storage survives operations that stay on the diagonal.
#[test]
fn diagonal_keeps_its_pattern_when_it_can() {
    let d = Matrix::diagonal_from_slice(3, 3, &[1.0, 2.0, 3.0]).unwrap();
    assert!(d.transpose().storage().flags().contains(StorageFlags::DIAGONAL));
    assert!(d.upper_triangle().unwrap().storage().flags().contains(StorageFlags::DIAGONAL));
    assert!(d.normalize_rows(2.0).unwrap().storage().flags().contains(StorageFlags::DIAGONAL));
    let grown = d.insert_row(0, &Vector::dense_from_vec(vec![1.0, 1.0, 1.0])).unwrap();
    assert!(grown.storage().is_fully_mutable());
    assert_eq!(grown.row(1).unwrap().to_vec(), vec![1.0, 0.0, 0.0]);
}

#[test]
fn square_matrix_wraps_checked_matrix() {
    let m = Matrix::dense_from_rows(2, 2, &[4.0, 7.0, 2.0, 6.0]).unwrap();
    let sq = SquareMatrix::new(m.clone()).unwrap();
    assert_eq!(sq.trace(), 10.0);
    approx::assert_abs_diff_eq!(sq.determinant(), 10.0, epsilon = 1e-12);
    assert_eq!(sq.transpose(), m.transpose());
    assert!(SquareMatrix::new(Matrix::<f64>::sparse(2, 1)).is_err());
}

/// Block requests whose end overflows `usize` fail with `IndexOutOfRange`.
#[test]
fn overflowing_block_is_out_of_range() {
    let (dense, sparse) = common::both_representations(3, 3, 31);
    for mut m in [dense, sparse, Matrix::diagonal_identity(3)] {
        let before = m.clone();
        assert!(matches!(m.sub_matrix(1, usize::MAX, 0, 1), Err(LinalgError::IndexOutOfRange { .. })));
        assert!(matches!(m.sub_matrix(0, 1, usize::MAX, 2), Err(LinalgError::IndexOutOfRange { .. })));
        assert!(matches!(m.clear_sub_matrix(2, usize::MAX, 0, 3), Err(LinalgError::IndexOutOfRange { .. })));
        assert_eq!(m, before);
    }
}
