use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};
use std::ptr::NonNull;
use std::slice;

use crate::error::Result;
use crate::surface::{check_index, check_window, Surface, SurfaceMut};

/// The four equal `half x half` sub-views obtained by halving both dimensions
/// of a surface.
#[derive(Debug, Clone, Copy)]
pub struct Quadrants<V> {
    /// Top-left.
    pub q11: V,
    /// Top-right.
    pub q12: V,
    /// Bottom-left.
    pub q21: V,
    /// Bottom-right.
    pub q22: V,
}

/// A shared rectangular window into a row-major [`Matrix`](crate::Matrix).
///
/// A view holds the base storage pointer, its row stride, and the window's
/// offset and extent in base-matrix coordinates. A view of a view is flattened
/// to base coordinates at construction, so access never walks a chain.
///
/// Views are `Copy`: passing one around costs a handful of words and the
/// borrow checker keeps it from outliving the matrix it reads from.
pub struct View<'a, T> {
    base: NonNull<T>,
    stride: usize,
    row_offset: usize,
    col_offset: usize,
    rows: usize,
    cols: usize,
    _marker: PhantomData<&'a T>,
}

// SAFETY: a `View` only hands out shared references to `T`, exactly like `&[T]`.
unsafe impl<T: Sync> Send for View<'_, T> {}
// SAFETY: as above.
unsafe impl<T: Sync> Sync for View<'_, T> {}

impl<T> Clone for View<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for View<'_, T> {}

impl<'a, T> View<'a, T> {
    /// # Safety
    ///
    /// `base` must point to a row-major buffer with row stride `stride` in which
    /// every element of the window `[row_offset, row_offset + rows) x
    /// [col_offset, col_offset + cols)` is initialized, readable, and not
    /// mutated for the lifetime `'a`.
    pub(crate) unsafe fn from_raw_parts(
        base: NonNull<T>,
        stride: usize,
        row_offset: usize,
        col_offset: usize,
        rows: usize,
        cols: usize,
    ) -> Self {
        View {
            base,
            stride,
            row_offset,
            col_offset,
            rows,
            cols,
            _marker: PhantomData,
        }
    }

    /// Number of rows in the window.
    pub fn nrows(&self) -> usize {
        self.rows
    }

    /// Number of columns in the window.
    pub fn ncols(&self) -> usize {
        self.cols
    }

    /// The window's top-left corner in base-matrix coordinates.
    pub fn offset(&self) -> (usize, usize) {
        (self.row_offset, self.col_offset)
    }

    /// Returns true if the window holds no elements.
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    #[inline]
    fn linear(&self, row: usize, col: usize) -> usize {
        (row + self.row_offset) * self.stride + col + self.col_offset
    }

    /// Returns the element at `(row, col)` of the window.
    ///
    /// # Errors
    /// Returns `OutOfBounds` if the position is outside the window.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Result<&'a T> {
        check_index(row, col, self.rows, self.cols)?;
        // SAFETY: the index was checked against the window, which lies inside
        // the base buffer by construction.
        Ok(unsafe { &*self.base.as_ptr().add(self.linear(row, col)) })
    }

    /// Returns row `row` of the window as a contiguous slice of `ncols()`
    /// elements.
    ///
    /// # Panics
    /// Panics if `row >= nrows()`.
    #[inline]
    pub fn row(&self, row: usize) -> &'a [T] {
        assert!(
            row < self.rows,
            "row {} out of range for view with {} rows",
            row,
            self.rows
        );
        // SAFETY: the row lies inside the window, and each window row is a
        // contiguous run of `cols` elements in the row-major base buffer.
        unsafe { slice::from_raw_parts(self.base.as_ptr().add(self.linear(row, 0)), self.cols) }
    }

    /// Iterates over the rows of the window, top to bottom.
    pub fn iter_rows(&self) -> impl Iterator<Item = &'a [T]> + '_ {
        (0..self.rows).map(move |r| self.row(r))
    }

    /// Narrows this view to a sub-window, keeping the original borrow.
    ///
    /// # Errors
    /// Returns `IllegalViewSize` if the sub-window does not fit in this view.
    pub fn into_view(self, row: usize, col: usize, rows: usize, cols: usize) -> Result<View<'a, T>> {
        check_window(row, col, rows, cols, self.rows, self.cols)?;
        Ok(View {
            row_offset: self.row_offset + row,
            col_offset: self.col_offset + col,
            rows,
            cols,
            ..self
        })
    }

    /// Splits the top-left `2*half x 2*half` block of this view into
    /// quadrants.
    ///
    /// # Errors
    /// Returns `IllegalViewSize` if the view is smaller than `2*half` in
    /// either dimension.
    pub fn quadrants(self, half: usize) -> Result<Quadrants<View<'a, T>>> {
        Ok(Quadrants {
            q11: self.into_view(0, 0, half, half)?,
            q12: self.into_view(0, half, half, half)?,
            q21: self.into_view(half, 0, half, half)?,
            q22: self.into_view(half, half, half, half)?,
        })
    }

    /// Copies the window's elements out in row-major order.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        let mut out = Vec::with_capacity(self.rows * self.cols);
        for row in self.iter_rows() {
            out.extend_from_slice(row);
        }
        out
    }
}

impl<T> Surface<T> for View<'_, T> {
    fn nrows(&self) -> usize {
        self.rows
    }

    fn ncols(&self) -> usize {
        self.cols
    }

    fn get(&self, row: usize, col: usize) -> Result<&T> {
        View::get(self, row, col)
    }

    fn view(&self) -> View<'_, T> {
        *self
    }
}

impl<T> Index<(usize, usize)> for View<'_, T> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        match self.get(row, col) {
            Ok(value) => value,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<T> fmt::Debug for View<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("row_offset", &self.row_offset)
            .field("col_offset", &self.col_offset)
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .finish()
    }
}

/// An exclusive rectangular window into a row-major [`Matrix`](crate::Matrix).
///
/// Unlike [`View`], a `ViewMut` is not `Copy`. Use [`ViewMut::rb`] and
/// [`ViewMut::rb_mut`] to reborrow it, or split it into disjoint pieces with
/// [`ViewMut::split_at_row`], [`ViewMut::split_at_col`] and
/// [`ViewMut::into_quadrants`]. Disjoint pieces can be written from different
/// threads at the same time.
pub struct ViewMut<'a, T> {
    base: NonNull<T>,
    stride: usize,
    row_offset: usize,
    col_offset: usize,
    rows: usize,
    cols: usize,
    _marker: PhantomData<&'a mut T>,
}

// SAFETY: a `ViewMut` behaves like `&mut [T]` restricted to its window.
unsafe impl<T: Send> Send for ViewMut<'_, T> {}
// SAFETY: shared access to a `ViewMut` only yields `&T`.
unsafe impl<T: Sync> Sync for ViewMut<'_, T> {}

impl<'a, T> ViewMut<'a, T> {
    /// # Safety
    ///
    /// Same as [`View::from_raw_parts`], and additionally no other reference
    /// may access the window's elements for the lifetime `'a`.
    pub(crate) unsafe fn from_raw_parts(
        base: NonNull<T>,
        stride: usize,
        row_offset: usize,
        col_offset: usize,
        rows: usize,
        cols: usize,
    ) -> Self {
        ViewMut {
            base,
            stride,
            row_offset,
            col_offset,
            rows,
            cols,
            _marker: PhantomData,
        }
    }

    /// Number of rows in the window.
    pub fn nrows(&self) -> usize {
        self.rows
    }

    /// Number of columns in the window.
    pub fn ncols(&self) -> usize {
        self.cols
    }

    /// The window's top-left corner in base-matrix coordinates.
    pub fn offset(&self) -> (usize, usize) {
        (self.row_offset, self.col_offset)
    }

    #[inline]
    fn linear(&self, row: usize, col: usize) -> usize {
        (row + self.row_offset) * self.stride + col + self.col_offset
    }

    /// Reborrows the window immutably.
    #[inline]
    pub fn rb(&self) -> View<'_, T> {
        // SAFETY: `&self` keeps every mutable path to the window frozen for
        // the lifetime of the returned view.
        unsafe {
            View::from_raw_parts(
                self.base,
                self.stride,
                self.row_offset,
                self.col_offset,
                self.rows,
                self.cols,
            )
        }
    }

    /// Reborrows the window mutably for a shorter lifetime.
    #[inline]
    pub fn rb_mut(&mut self) -> ViewMut<'_, T> {
        // SAFETY: `&mut self` is exclusive for the lifetime of the result.
        unsafe {
            ViewMut::from_raw_parts(
                self.base,
                self.stride,
                self.row_offset,
                self.col_offset,
                self.rows,
                self.cols,
            )
        }
    }

    /// Gives up mutability, keeping the full borrow.
    pub fn into_const(self) -> View<'a, T> {
        // SAFETY: `self` is consumed, so nothing can write through it anymore.
        unsafe {
            View::from_raw_parts(
                self.base,
                self.stride,
                self.row_offset,
                self.col_offset,
                self.rows,
                self.cols,
            )
        }
    }

    /// Returns the element at `(row, col)` of the window.
    ///
    /// # Errors
    /// Returns `OutOfBounds` if the position is outside the window.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Result<&T> {
        check_index(row, col, self.rows, self.cols)?;
        // SAFETY: bounds checked; see `View::get`.
        Ok(unsafe { &*self.base.as_ptr().add(self.linear(row, col)) })
    }

    /// Returns a mutable reference to the element at `(row, col)`.
    ///
    /// # Errors
    /// Returns `OutOfBounds` if the position is outside the window.
    #[inline]
    pub fn get_mut(&mut self, row: usize, col: usize) -> Result<&mut T> {
        check_index(row, col, self.rows, self.cols)?;
        // SAFETY: bounds checked, and `&mut self` guarantees exclusivity.
        Ok(unsafe { &mut *self.base.as_ptr().add(self.linear(row, col)) })
    }

    /// Returns row `row` of the window as a slice.
    ///
    /// # Panics
    /// Panics if `row >= nrows()`.
    #[inline]
    pub fn row(&self, row: usize) -> &[T] {
        self.rb().row(row)
    }

    /// Returns row `row` of the window as a mutable slice.
    ///
    /// # Panics
    /// Panics if `row >= nrows()`.
    #[inline]
    pub fn row_mut(&mut self, row: usize) -> &mut [T] {
        assert!(
            row < self.rows,
            "row {} out of range for view with {} rows",
            row,
            self.rows
        );
        // SAFETY: the row lies inside the window and `&mut self` is exclusive.
        unsafe {
            slice::from_raw_parts_mut(self.base.as_ptr().add(self.linear(row, 0)), self.cols)
        }
    }

    /// Narrows this view to a sub-window, keeping the original borrow.
    ///
    /// # Errors
    /// Returns `IllegalViewSize` if the sub-window does not fit in this view.
    pub fn into_view_mut(
        self,
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    ) -> Result<ViewMut<'a, T>> {
        check_window(row, col, rows, cols, self.rows, self.cols)?;
        Ok(ViewMut {
            row_offset: self.row_offset + row,
            col_offset: self.col_offset + col,
            rows,
            cols,
            ..self
        })
    }

    /// Splits the window into the rows above `mid` and the rows from `mid`
    /// down.
    ///
    /// # Panics
    /// Panics if `mid > nrows()`.
    pub fn split_at_row(self, mid: usize) -> (ViewMut<'a, T>, ViewMut<'a, T>) {
        assert!(mid <= self.rows, "split row {} out of range", mid);
        // SAFETY: the two windows share no row, and `self` is consumed.
        unsafe {
            (
                ViewMut::from_raw_parts(
                    self.base,
                    self.stride,
                    self.row_offset,
                    self.col_offset,
                    mid,
                    self.cols,
                ),
                ViewMut::from_raw_parts(
                    self.base,
                    self.stride,
                    self.row_offset + mid,
                    self.col_offset,
                    self.rows - mid,
                    self.cols,
                ),
            )
        }
    }

    /// Splits the window into the columns left of `mid` and the columns from
    /// `mid` rightwards.
    ///
    /// # Panics
    /// Panics if `mid > ncols()`.
    pub fn split_at_col(self, mid: usize) -> (ViewMut<'a, T>, ViewMut<'a, T>) {
        assert!(mid <= self.cols, "split column {} out of range", mid);
        // SAFETY: the two windows share no column, and `self` is consumed.
        unsafe {
            (
                ViewMut::from_raw_parts(
                    self.base,
                    self.stride,
                    self.row_offset,
                    self.col_offset,
                    self.rows,
                    mid,
                ),
                ViewMut::from_raw_parts(
                    self.base,
                    self.stride,
                    self.row_offset,
                    self.col_offset + mid,
                    self.rows,
                    self.cols - mid,
                ),
            )
        }
    }

    /// Splits the top-left `2*half x 2*half` block into four disjoint
    /// exclusive quadrants.
    ///
    /// # Errors
    /// Returns `IllegalViewSize` if the view is smaller than `2*half` in
    /// either dimension.
    pub fn into_quadrants(self, half: usize) -> Result<Quadrants<ViewMut<'a, T>>> {
        check_window(half, half, half, half, self.rows, self.cols)?;
        let block = self.into_view_mut(0, 0, 2 * half, 2 * half)?;
        let (top, bottom) = block.split_at_row(half);
        let (q11, q12) = top.split_at_col(half);
        let (q21, q22) = bottom.split_at_col(half);
        Ok(Quadrants { q11, q12, q21, q22 })
    }

    /// Overwrites every element of the window with `value`.
    pub fn fill(&mut self, value: T)
    where
        T: Clone,
    {
        for r in 0..self.rows {
            self.row_mut(r).fill(value.clone());
        }
    }
}

impl<T> Surface<T> for ViewMut<'_, T> {
    fn nrows(&self) -> usize {
        self.rows
    }

    fn ncols(&self) -> usize {
        self.cols
    }

    fn get(&self, row: usize, col: usize) -> Result<&T> {
        ViewMut::get(self, row, col)
    }

    fn view(&self) -> View<'_, T> {
        self.rb()
    }
}

impl<T> SurfaceMut<T> for ViewMut<'_, T> {
    fn get_mut(&mut self, row: usize, col: usize) -> Result<&mut T> {
        ViewMut::get_mut(self, row, col)
    }

    fn view_mut(&mut self) -> ViewMut<'_, T> {
        self.rb_mut()
    }
}

impl<T> Index<(usize, usize)> for ViewMut<'_, T> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        match self.get(row, col) {
            Ok(value) => value,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<T> IndexMut<(usize, usize)> for ViewMut<'_, T> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        match self.get_mut(row, col) {
            Ok(value) => value,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<T> fmt::Debug for ViewMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewMut")
            .field("row_offset", &self.row_offset)
            .field("col_offset", &self.col_offset)
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .finish()
    }
}
