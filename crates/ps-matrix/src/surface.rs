use crate::error::{MatrixError, Result};
use crate::view::{View, ViewMut};

/// Anything offering bounds-checked `(row, col)` access and able to carve a
/// sub-rectangular [`View`] of itself.
///
/// Implemented by [`Matrix`](crate::Matrix), [`View`] and [`ViewMut`], so the
/// multiplication routines treat a freshly allocated temporary and a quadrant
/// of a caller's matrix the same way.
pub trait Surface<T> {
    /// Number of rows of the surface.
    fn nrows(&self) -> usize;

    /// Number of columns of the surface.
    fn ncols(&self) -> usize;

    /// Returns the element at `(row, col)`.
    ///
    /// # Errors
    /// Returns [`MatrixError::OutOfBounds`] if `row >= nrows()` or
    /// `col >= ncols()`.
    fn get(&self, row: usize, col: usize) -> Result<&T>;

    /// A view covering the whole surface.
    fn view(&self) -> View<'_, T>;

    /// A view of the `rows x cols` window whose top-left corner sits at
    /// `(row, col)` of this surface.
    ///
    /// # Errors
    /// Returns [`MatrixError::IllegalViewSize`] if any part of the window
    /// falls outside the surface.
    fn make_view(&self, row: usize, col: usize, rows: usize, cols: usize) -> Result<View<'_, T>> {
        self.view().into_view(row, col, rows, cols)
    }
}

/// The mutable half of [`Surface`].
pub trait SurfaceMut<T>: Surface<T> {
    /// Returns a mutable reference to the element at `(row, col)`.
    ///
    /// # Errors
    /// Returns [`MatrixError::OutOfBounds`] if the position is outside the
    /// surface.
    fn get_mut(&mut self, row: usize, col: usize) -> Result<&mut T>;

    /// An exclusive view covering the whole surface.
    fn view_mut(&mut self) -> ViewMut<'_, T>;

    /// An exclusive view of a sub-window, see [`Surface::make_view`].
    fn make_view_mut(
        &mut self,
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    ) -> Result<ViewMut<'_, T>> {
        self.view_mut().into_view_mut(row, col, rows, cols)
    }
}

/// Checks that `(row, col)` addresses an element of a `nrows x ncols` surface.
#[inline]
pub(crate) fn check_index(row: usize, col: usize, nrows: usize, ncols: usize) -> Result<()> {
    if row >= nrows || col >= ncols {
        return Err(MatrixError::OutOfBounds { row, col });
    }
    Ok(())
}

/// Checks that a `rows x cols` window at `(row, col)` lies inside a
/// `nrows x ncols` surface.
#[inline]
pub(crate) fn check_window(
    row: usize,
    col: usize,
    rows: usize,
    cols: usize,
    nrows: usize,
    ncols: usize,
) -> Result<()> {
    match (row.checked_add(rows), col.checked_add(cols)) {
        (Some(row_end), Some(col_end)) if row_end <= nrows && col_end <= ncols => Ok(()),
        _ => Err(MatrixError::IllegalViewSize { rows, cols }),
    }
}
