//! Borrowed views over raw model output buffers.
//!
//! `TensorView` is a read-only, row-major 2D view into a flat `f32` slice
//! owned by the inference backend. The declared shape is checked against the
//! slice length on construction, so indexing never reads past the buffer.

use crate::util::{DetPostError, DetPostResult};

/// Borrowed row-major 2D view of `rows x cols` values.
#[derive(Copy, Clone, Debug)]
pub struct TensorView<'a> {
    data: &'a [f32],
    rows: usize,
    cols: usize,
}

impl<'a> TensorView<'a> {
    /// Creates a view; `data.len()` must equal `rows * cols` exactly.
    pub fn new(data: &'a [f32], rows: usize, cols: usize) -> DetPostResult<Self> {
        let expected = rows
            .checked_mul(cols)
            .ok_or(DetPostError::InvalidDimensions {
                width: cols,
                height: rows,
            })?;
        if data.len() != expected {
            return Err(DetPostError::ShapeMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self { data, rows, cols })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the backing slice.
    pub fn as_slice(&self) -> &'a [f32] {
        self.data
    }

    /// Returns the value at `(row, col)` if it is within bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.data.get(row * self.cols + col).copied()
    }

    /// Returns row `row` as a contiguous slice.
    pub fn row(&self, row: usize) -> Option<&'a [f32]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        self.data.get(start..start + self.cols)
    }

    /// Iterates over column `col` from the first row to the last.
    pub fn column(&self, col: usize) -> impl Iterator<Item = f32> + 'a {
        let data = self.data;
        let cols = self.cols;
        let rows = if col < cols { self.rows } else { 0 };
        (0..rows).map(move |row| data[row * cols + col])
    }

    /// Iterates over rows `start..end` of column `col`.
    pub fn column_range(
        &self,
        col: usize,
        start: usize,
        end: usize,
    ) -> impl Iterator<Item = f32> + 'a {
        let data = self.data;
        let cols = self.cols;
        let end = if col < cols { end.min(self.rows) } else { 0 };
        (start.min(end)..end).map(move |row| data[row * cols + col])
    }
}

#[cfg(test)]
mod tests {
    use super::TensorView;
    use crate::util::DetPostError;

    #[test]
    fn rejects_length_mismatch() {
        let data = [0.0f32; 5];
        let err = TensorView::new(&data, 2, 3).unwrap_err();
        assert_eq!(
            err,
            DetPostError::ShapeMismatch {
                expected: 6,
                got: 5
            }
        );
    }

    #[test]
    fn columns_walk_rows() {
        let data: Vec<f32> = (0..6).map(|v| v as f32).collect();
        let view = TensorView::new(&data, 2, 3).unwrap();
        assert_eq!(view.column(1).collect::<Vec<_>>(), vec![1.0, 4.0]);
        assert_eq!(view.column(3).count(), 0);
        assert_eq!(view.column_range(2, 1, 5).collect::<Vec<_>>(), vec![5.0]);
        assert_eq!(view.row(1).unwrap(), &[3.0, 4.0, 5.0]);
        assert_eq!(view.get(1, 0), Some(3.0));
        assert!(view.get(2, 0).is_none());
    }
}
