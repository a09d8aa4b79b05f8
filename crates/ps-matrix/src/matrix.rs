use std::fmt;
use std::ops::{Index, IndexMut};
use std::ptr::NonNull;

use crate::error::{MatrixError, Result};
use crate::scalar::Scalar;
use crate::surface::{check_index, Surface, SurfaceMut};
use crate::view::{View, ViewMut};

/// A dense matrix that owns its storage.
///
/// Holds `rows * cols` elements in a contiguous, row-major buffer. Element
/// access goes through [`Surface`] / [`SurfaceMut`] or through views minted
/// from it.
///
/// `Matrix` does not implement `Clone`.
#[derive(Debug, PartialEq)]
pub struct Matrix<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

/// Number of elements of a `rows x cols` matrix.
fn element_count(rows: usize, cols: usize) -> Result<usize> {
    rows.checked_mul(cols).ok_or(MatrixError::DimensionOverflow { rows, cols })
}

/// Like [`element_count`], panicking on overflow.
fn element_count_or_panic(rows: usize, cols: usize) -> usize {
    match element_count(rows, cols) {
        Ok(len) => len,
        Err(e) => panic!("{}", e),
    }
}

impl<T: Scalar> Matrix<T> {
    /// Create a zero-filled matrix with the given dimensions.
    ///
    /// # Panics
    /// Panics if `rows * cols` overflows `usize`.
    pub fn new(rows: usize, cols: usize) -> Self {
        Matrix {
            data: vec![T::zero(); element_count_or_panic(rows, cols)],
            rows,
            cols,
        }
    }

    /// Create the `n x n` identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::new(n, n);
        for i in 0..n {
            m.data[i * n + i] = T::one();
        }
        m
    }
}

impl<T> Matrix<T> {
    /// Create a matrix from row-major data.
    ///
    /// # Errors
    /// Returns `DimensionOverflow` if `rows * cols` overflows `usize` and
    /// `ShapeMismatch` if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        let len = element_count(rows, cols)?;
        if data.len() != len {
            return Err(MatrixError::ShapeMismatch {
                expected: len,
                got: data.len(),
            });
        }
        Ok(Matrix { data, rows, cols })
    }

    /// Create a matrix whose element `(r, c)` is `f(r, c)`.
    ///
    /// Elements are generated in memory order.
    ///
    /// # Panics
    /// Panics if `rows * cols` overflows `usize`.
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        let mut data = Vec::with_capacity(element_count_or_panic(rows, cols));
        for r in 0..rows {
            for c in 0..cols {
                data.push(f(r, c));
            }
        }
        Matrix { data, rows, cols }
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.cols
    }

    /// Returns true if the matrix has as many rows as columns.
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Returns the element at `(row, col)`.
    ///
    /// # Errors
    /// Returns `OutOfBounds` if the position is outside the matrix.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Result<&T> {
        check_index(row, col, self.rows, self.cols)?;
        Ok(&self.data[row * self.cols + col])
    }

    /// Returns a mutable reference to the element at `(row, col)`.
    ///
    /// # Errors
    /// Returns `OutOfBounds` if the position is outside the matrix.
    #[inline]
    pub fn get_mut(&mut self, row: usize, col: usize) -> Result<&mut T> {
        check_index(row, col, self.rows, self.cols)?;
        Ok(&mut self.data[row * self.cols + col])
    }

    /// Returns the underlying row-major data.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Returns the underlying row-major data mutably.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consumes the matrix, returning its row-major buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T> Surface<T> for Matrix<T> {
    fn nrows(&self) -> usize {
        self.rows
    }

    fn ncols(&self) -> usize {
        self.cols
    }

    fn get(&self, row: usize, col: usize) -> Result<&T> {
        Matrix::get(self, row, col)
    }

    fn view(&self) -> View<'_, T> {
        // SAFETY: the buffer holds exactly `rows * cols` initialized elements
        // with stride `cols`, and `&self` freezes it for the view's lifetime.
        unsafe {
            View::from_raw_parts(
                NonNull::from(self.data.as_slice()).cast(),
                self.cols,
                0,
                0,
                self.rows,
                self.cols,
            )
        }
    }
}

impl<T> SurfaceMut<T> for Matrix<T> {
    fn get_mut(&mut self, row: usize, col: usize) -> Result<&mut T> {
        Matrix::get_mut(self, row, col)
    }

    fn view_mut(&mut self) -> ViewMut<'_, T> {
        // SAFETY: as for `view`, and `&mut self` makes the view exclusive.
        unsafe {
            ViewMut::from_raw_parts(
                NonNull::from(self.data.as_mut_slice()).cast(),
                self.cols,
                0,
                0,
                self.rows,
                self.cols,
            )
        }
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        match self.get(row, col) {
            Ok(value) => value,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        match self.get_mut(row, col) {
            Ok(value) => value,
            Err(e) => panic!("{}", e),
        }
    }
}

/// One row per line, entries separated by a single space.
impl<T: fmt::Display> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.view().iter_rows() {
            for (i, value) in row.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_matrix() {
        let m = Matrix::<i32>::new(2, 3);
        assert_eq!(m.nrows(), 2);
        assert_eq!(m.ncols(), 3);
        assert!(!m.is_square());
        assert_eq!(m.as_slice(), &[0; 6]);
    }

    #[test]
    fn test_identity() {
        let m = Matrix::<f64>::identity(3);
        assert!(m.is_square());
        assert_eq!(m.as_slice(), &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_from_vec() {
        let m = Matrix::from_vec(2, 2, vec![1, 2, 3, 4]).unwrap();
        assert_eq!(m[(0, 1)], 2);
        assert_eq!(m[(1, 0)], 3);
        assert_eq!(m.into_vec(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_from_vec_mismatch() {
        assert_eq!(
            Matrix::from_vec(2, 2, vec![1, 2, 3]).unwrap_err(),
            MatrixError::ShapeMismatch {
                expected: 4,
                got: 3
            }
        );
    }

    #[test]
    fn test_from_vec_dimension_overflow() {
        // The wrapped product of these dimensions would match the empty buffer.
        let half = 1usize << (usize::BITS / 2);
        assert_eq!(
            Matrix::<u8>::from_vec(half, half, vec![]).unwrap_err(),
            MatrixError::DimensionOverflow {
                rows: half,
                cols: half
            }
        );
        assert!(matches!(
            Matrix::<u8>::from_vec(usize::MAX, 2, vec![]),
            Err(MatrixError::DimensionOverflow { .. })
        ));
    }

    #[test]
    #[should_panic(expected = "overflow usize")]
    fn test_new_dimension_overflow_panics() {
        let half = 1usize << (usize::BITS / 2);
        let _ = Matrix::<u8>::new(half, half);
    }

    #[test]
    #[should_panic(expected = "overflow usize")]
    fn test_from_fn_dimension_overflow_panics() {
        let _ = Matrix::from_fn(usize::MAX, 3, |_, _| 0u8);
    }

    #[test]
    fn test_from_fn_row_major() {
        let m = Matrix::from_fn(2, 3, |r, c| 10 * r + c);
        assert_eq!(m.as_slice(), &[0, 1, 2, 10, 11, 12]);
    }

    #[test]
    fn test_get_and_get_mut() {
        let mut m = Matrix::<i64>::new(2, 2);
        *m.get_mut(1, 0).unwrap() = 7;
        m[(0, 1)] = 5;
        assert_eq!(*m.get(1, 0).unwrap(), 7);
        assert_eq!(m.as_slice(), &[0, 5, 7, 0]);
        assert_eq!(
            m.get(2, 0).unwrap_err(),
            MatrixError::OutOfBounds { row: 2, col: 0 }
        );
        assert!(m.get_mut(0, 2).is_err());
    }

    #[test]
    #[should_panic(expected = "bad array access at (0, 5)")]
    fn test_index_out_of_bounds_panics() {
        let m = Matrix::<u8>::new(1, 1);
        let _ = m[(0, 5)];
    }

    #[test]
    fn test_full_view_matches_matrix() {
        let mut m = Matrix::from_fn(3, 2, |r, c| (r + c) as f32);
        let v = m.view();
        assert_eq!(v.nrows(), 3);
        assert_eq!(v.ncols(), 2);
        assert_eq!(v.to_vec(), m.as_slice());
        m.view_mut().fill(2.5);
        assert_eq!(m.as_slice(), &[2.5; 6]);
    }

    #[test]
    fn test_surface_trait_dispatch() {
        fn corner<S: Surface<i32>>(s: &S) -> i32 {
            *s.get(s.nrows() - 1, s.ncols() - 1).unwrap()
        }
        let m = Matrix::from_fn(3, 3, |r, c| (r * 3 + c) as i32);
        assert_eq!(corner(&m), 8);
        assert_eq!(corner(&m.make_view(0, 0, 2, 2).unwrap()), 4);
    }

    #[test]
    fn test_display() {
        let m = Matrix::from_vec(2, 2, vec![19, 22, 43, 50]).unwrap();
        assert_eq!(m.to_string(), "19 22\n43 50\n");
    }

    #[test]
    fn test_empty_matrix() {
        let m = Matrix::<i32>::new(0, 0);
        assert!(m.view().is_empty());
        assert_eq!(m.to_string(), "");
    }
}
