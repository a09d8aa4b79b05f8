//! Elementwise combination of equally sized views.
//!
//! Every kernel writes into a `ViewMut` and reads rows of its source views.
//! Output rows are split in half with `rayon::join` until at most `row_grain`
//! rows remain, so the halves write disjoint memory without any locking.

use ps_matrix::{Scalar, View, ViewMut};

/// Sign of an operand in [`combine_into`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    #[inline]
    fn apply<T: Scalar>(self, acc: T, x: T) -> T {
        match self {
            Sign::Plus => acc.plus(x),
            Sign::Minus => acc.minus(x),
        }
    }
}

/// Runs `f(row_index, row)` for every row of `dst`, where `row_index` counts
/// from the top of the original destination.
fn for_each_row<T, F>(mut dst: ViewMut<'_, T>, first_row: usize, row_grain: usize, f: &F)
where
    T: Scalar,
    F: Fn(usize, &mut [T]) + Sync,
{
    let rows = dst.nrows();
    if rows <= row_grain.max(1) {
        for r in 0..rows {
            f(first_row + r, dst.row_mut(r));
        }
        return;
    }
    let mid = rows / 2;
    let (top, bottom) = dst.split_at_row(mid);
    rayon::join(
        || for_each_row(top, first_row, row_grain, f),
        || for_each_row(bottom, first_row + mid, row_grain, f),
    );
}

/// `dst = a + b`.
pub fn add_into<T: Scalar>(a: View<'_, T>, b: View<'_, T>, dst: ViewMut<'_, T>, row_grain: usize) {
    debug_assert!(same_extent(&a, &dst) && same_extent(&b, &dst));
    for_each_row(dst, 0, row_grain, &|r, out: &mut [T]| {
        for ((o, &x), &y) in out.iter_mut().zip(a.row(r)).zip(b.row(r)) {
            *o = x.plus(y);
        }
    });
}

/// `dst = a - b`.
pub fn sub_into<T: Scalar>(a: View<'_, T>, b: View<'_, T>, dst: ViewMut<'_, T>, row_grain: usize) {
    debug_assert!(same_extent(&a, &dst) && same_extent(&b, &dst));
    for_each_row(dst, 0, row_grain, &|r, out: &mut [T]| {
        for ((o, &x), &y) in out.iter_mut().zip(a.row(r)).zip(b.row(r)) {
            *o = x.minus(y);
        }
    });
}

/// `dst = first (+|-) rest[0] (+|-) rest[1] ...`, evaluated left to right.
pub fn combine_into<T: Scalar>(
    first: View<'_, T>,
    rest: &[(Sign, View<'_, T>)],
    dst: ViewMut<'_, T>,
    row_grain: usize,
) {
    debug_assert!(same_extent(&first, &dst));
    debug_assert!(rest.iter().all(|(_, v)| same_extent(v, &dst)));
    for_each_row(dst, 0, row_grain, &|r, out: &mut [T]| {
        out.copy_from_slice(first.row(r));
        for (sign, view) in rest {
            for (o, &x) in out.iter_mut().zip(view.row(r)) {
                *o = sign.apply(*o, x);
            }
        }
    });
}

fn same_extent<T>(v: &View<'_, T>, dst: &ViewMut<'_, T>) -> bool {
    v.nrows() == dst.nrows() && v.ncols() == dst.ncols()
}
