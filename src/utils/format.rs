//! Bounded text previews.
//!
//! Large matrices and vectors are elided to the first
//! `max_display_rows` x `max_display_columns` elements taken from
//! [`settings`](crate::config::settings), with `...` marking what was cut.

use std::fmt;

use crate::config;
use crate::core::scalar::Scalar;
use crate::matrix::Matrix;
use crate::vector::Vector;

const ELLIPSIS: &str = "...";

fn render<T: Scalar>(value: T, precision: Option<usize>) -> String {
    match precision {
        Some(p) => format!("{value:.p$}"),
        None => format!("{value}"),
    }
}

impl<T: Scalar> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let settings = config::settings();
        let (rows, cols) = self.shape();
        let shown_rows = rows.min(settings.max_display_rows);
        let shown_cols = cols.min(settings.max_display_columns);
        let elide_cols = shown_cols < cols;

        let cells: Vec<Vec<String>> = (0..shown_rows)
            .map(|i| {
                (0..shown_cols)
                    .map(|j| render(self.storage().at(i, j), f.precision()))
                    .collect()
            })
            .collect();
        let mut widths = vec![0; shown_cols];
        for row in &cells {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.len());
            }
        }

        write!(f, "{rows}x{cols} matrix")?;
        for row in &cells {
            writeln!(f)?;
            write!(f, "│")?;
            for (j, cell) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, "  ")?;
                }
                write!(f, "{cell:>width$}", width = widths[j])?;
            }
            if elide_cols {
                write!(f, "  {ELLIPSIS}")?;
            }
            write!(f, "│")?;
        }
        if shown_rows < rows {
            writeln!(f)?;
            write!(f, "{ELLIPSIS}")?;
        }
        Ok(())
    }
}

impl<T: Scalar> fmt::Display for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = self.len().min(config::settings().max_display_rows);
        write!(f, "[")?;
        for i in 0..shown {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", render(self.storage().at(i), f.precision()))?;
        }
        if shown < self.len() {
            write!(f, ", {ELLIPSIS}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_matrix_is_aligned() {
        let m = Matrix::dense_from_rows(2, 2, &[1.0, -10.0, 100.0, 2.0]).unwrap();
        assert_eq!(m.to_string(), "2x2 matrix\n│  1  -10│\n│100    2│");
    }

    #[test]
    fn precision_is_forwarded() {
        let v = Vector::dense_from_vec(vec![0.5, 1.26]);
        assert_eq!(format!("{v:.1}"), "[0.5, 1.3]");
    }

    #[test]
    fn long_previews_are_elided() {
        let limits = config::settings();
        let v = Vector::<f64>::dense(limits.max_display_rows + 3);
        assert!(v.to_string().ends_with(", ...]"));
        let m = Matrix::<f64>::dense(limits.max_display_rows + 1, limits.max_display_columns + 1);
        let text = m.to_string();
        assert!(text.ends_with(ELLIPSIS));
        assert_eq!(text.lines().count(), limits.max_display_rows + 2);
    }
}
