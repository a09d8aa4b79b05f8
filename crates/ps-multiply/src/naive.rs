use ps_matrix::{Scalar, View, ViewMut};

/// Triple-loop matrix product: `c = a * b` over the top-left `size x size`
/// blocks of the three views.
///
/// Each `c(i, j)` is overwritten with `0 + a(i,0)*b(0,j) + ... +
/// a(i,size-1)*b(size-1,j)`, accumulated in increasing `k`. The views must
/// each cover at least `size x size`; this is the fallback of the recursive
/// algorithm and does not re-validate its inputs beyond the panicking row
/// accessors.
pub fn multiply<T: Scalar>(a: View<'_, T>, b: View<'_, T>, mut c: ViewMut<'_, T>, size: usize) {
    debug_assert!(a.nrows() >= size && a.ncols() >= size);
    debug_assert!(b.nrows() >= size && b.ncols() >= size);
    debug_assert!(c.nrows() >= size && c.ncols() >= size);

    for i in 0..size {
        let a_row = &a.row(i)[..size];
        let c_row = &mut c.row_mut(i)[..size];
        for (j, out) in c_row.iter_mut().enumerate() {
            let mut sum = T::zero();
            for (k, &x) in a_row.iter().enumerate() {
                sum = sum.plus(x.times(b[(k, j)]));
            }
            *out = sum;
        }
    }
}
