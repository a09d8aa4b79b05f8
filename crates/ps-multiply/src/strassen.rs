use ps_matrix::{Matrix, Quadrants, Scalar, Surface, SurfaceMut, View, ViewMut};
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::backend::check_extents;
use crate::config::StrassenConfig;
use crate::error::Result;
use crate::kernels::{self, Sign};
use crate::naive;

/// Parallel Strassen product `c = a * b` of `size x size` views, using the
/// default [`StrassenConfig`].
///
/// Callers outside this crate pass `level = 0`.
pub fn strassen<T: Scalar>(
    a: View<'_, T>,
    b: View<'_, T>,
    c: ViewMut<'_, T>,
    size: usize,
    level: usize,
) -> Result<()> {
    strassen_with(&StrassenConfig::default(), a, b, c, size, level)
}

/// Parallel Strassen product with explicit limits.
///
/// - `size == 1`: scalar product.
/// - odd `size`, or `level > config.max_parallel_level`: naive product.
/// - otherwise the views are split into quadrants, the ten sums `s1..s10`
///   and then the seven products `p1..p7` are computed concurrently (the
///   products by recursion at `level + 1`), and the four output quadrants
///   are combined concurrently once every product is done.
///
/// Runs on the current rayon pool. Every concurrent task writes to its own
/// temporary or its own output quadrant, so the result does not depend on
/// scheduling.
///
/// # Errors
/// Returns `ExtentTooSmall` if a view is smaller than `size x size`, on every
/// path including the naive fallbacks.
pub fn strassen_with<T: Scalar>(
    config: &StrassenConfig,
    a: View<'_, T>,
    b: View<'_, T>,
    mut c: ViewMut<'_, T>,
    size: usize,
    level: usize,
) -> Result<()> {
    if level == 0 {
        let kind = T::KIND;
        debug!(
            size,
            %kind,
            max_parallel_level = config.max_parallel_level,
            "strassen: starting product"
        );
    }

    check_extents(&a, &b, &c, size)?;
    if size == 0 {
        return Ok(());
    }
    if size == 1 {
        *c.get_mut(0, 0)? = a.get(0, 0)?.times(*b.get(0, 0)?);
        return Ok(());
    }
    if size % 2 != 0 {
        trace!(size, level, "strassen: odd size, naive fallback");
        naive::multiply(a, b, c, size);
        return Ok(());
    }
    if level > config.max_parallel_level {
        trace!(size, level, "strassen: depth limit reached, naive fallback");
        naive::multiply(a, b, c, size);
        return Ok(());
    }

    let half = size / 2;
    let grain = config.row_grain;
    let qa = a.quadrants(half)?;
    let qb = b.quadrants(half)?;
    let Quadrants {
        q11: c11,
        q12: c12,
        q21: c21,
        q22: c22,
    } = c.into_quadrants(half)?;

    let mut s: [Matrix<T>; 10] = std::array::from_fn(|_| Matrix::new(half, half));
    let s_terms: [(View<'_, T>, Sign, View<'_, T>); 10] = [
        (qb.q12, Sign::Minus, qb.q22),
        (qa.q11, Sign::Plus, qa.q12),
        (qa.q21, Sign::Plus, qa.q22),
        (qb.q21, Sign::Minus, qb.q11),
        (qa.q11, Sign::Plus, qa.q22),
        (qb.q11, Sign::Plus, qb.q22),
        (qa.q12, Sign::Minus, qa.q22),
        (qb.q21, Sign::Plus, qb.q22),
        (qa.q11, Sign::Minus, qa.q21),
        (qb.q11, Sign::Plus, qb.q12),
    ];
    s.par_iter_mut()
        .zip(s_terms.par_iter())
        .for_each(|(dst, &(x, sign, y))| match sign {
            Sign::Plus => kernels::add_into(x, y, dst.view_mut(), grain),
            Sign::Minus => kernels::sub_into(x, y, dst.view_mut(), grain),
        });

    let [s1, s2, s3, s4, s5, s6, s7, s8, s9, s10]: [View<'_, T>; 10] =
        std::array::from_fn(|i| s[i].view());

    let mut p: [Matrix<T>; 7] = std::array::from_fn(|_| Matrix::new(half, half));
    let p_terms: [(View<'_, T>, View<'_, T>); 7] = [
        (qa.q11, s1),
        (s2, qb.q22),
        (s3, qb.q11),
        (qa.q22, s4),
        (s5, s6),
        (s7, s8),
        (s9, s10),
    ];
    // try_for_each returns only once all seven products are written.
    p.par_iter_mut()
        .zip(p_terms.par_iter())
        .try_for_each(|(dst, &(x, y))| {
            strassen_with(config, x, y, dst.view_mut(), half, level + 1)
        })?;

    let [p1, p2, p3, p4, p5, p6, p7]: [View<'_, T>; 7] = std::array::from_fn(|i| p[i].view());

    rayon::join(
        || {
            rayon::join(
                || {
                    kernels::combine_into(
                        p5,
                        &[(Sign::Plus, p4), (Sign::Minus, p2), (Sign::Plus, p6)],
                        c11,
                        grain,
                    )
                },
                || kernels::add_into(p1, p2, c12, grain),
            )
        },
        || {
            rayon::join(
                || kernels::add_into(p3, p4, c21, grain),
                || {
                    kernels::combine_into(
                        p5,
                        &[(Sign::Plus, p1), (Sign::Minus, p3), (Sign::Minus, p7)],
                        c22,
                        grain,
                    )
                },
            )
        },
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MultiplyError;
    use crate::naive::multiply;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_matrix(n: usize, seed: u64) -> Matrix<i64> {
        let mut rng = StdRng::seed_from_u64(seed);
        Matrix::from_fn(n, n, |_, _| rng.gen_range(-100..=100))
    }

    fn naive_product(a: &Matrix<i64>, b: &Matrix<i64>) -> Matrix<i64> {
        let n = a.nrows();
        let mut c = Matrix::new(n, n);
        multiply(a.view(), b.view(), c.view_mut(), n);
        c
    }

    fn strassen_product<T: Scalar>(
        config: &StrassenConfig,
        a: &Matrix<T>,
        b: &Matrix<T>,
    ) -> Matrix<T> {
        let n = a.nrows();
        let mut c = Matrix::new(n, n);
        strassen_with(config, a.view(), b.view(), c.view_mut(), n, 0).unwrap();
        c
    }

    #[test]
    fn test_scenario_2x2() {
        let a = Matrix::from_vec(2, 2, vec![1, 2, 3, 4]).unwrap();
        let b = Matrix::from_vec(2, 2, vec![5, 6, 7, 8]).unwrap();
        let mut c = Matrix::new(2, 2);
        strassen(a.view(), b.view(), c.view_mut(), 2, 0).unwrap();
        assert_eq!(c.as_slice(), &[19, 22, 43, 50]);
    }

    #[test]
    fn test_scenario_odd_identity() {
        let a = Matrix::<i32>::identity(3);
        let b = Matrix::from_vec(3, 3, vec![1, 2, 3, 4, 5, 6, 7, 8, 9]).unwrap();
        let mut c = Matrix::new(3, 3);
        strassen(a.view(), b.view(), c.view_mut(), 3, 0).unwrap();
        assert_eq!(c, b);
    }

    #[test]
    fn test_size_one() {
        let a = Matrix::from_vec(1, 1, vec![-7]).unwrap();
        let b = Matrix::from_vec(1, 1, vec![6]).unwrap();
        let mut c = Matrix::from_vec(1, 1, vec![123]).unwrap();
        strassen(a.view(), b.view(), c.view_mut(), 1, 0).unwrap();
        assert_eq!(c.as_slice(), &[-42]);
    }

    #[test]
    fn test_size_zero() {
        let a = Matrix::<i32>::new(0, 0);
        let mut c = Matrix::<i32>::new(0, 0);
        strassen(a.view(), a.view(), c.view_mut(), 0, 0).unwrap();
        assert!(c.as_slice().is_empty());
    }

    #[test]
    fn test_matches_naive_across_sizes() {
        // Powers of two, odd sizes, and even sizes with odd factors (6, 12,
        // 20, 48) that recurse once or twice before falling back.
        let config = StrassenConfig::default();
        for n in (1..=20).chain([24, 32, 48, 64]) {
            let a = random_matrix(n, n as u64);
            let b = random_matrix(n, 1000 + n as u64);
            assert_eq!(
                strassen_product(&config, &a, &b),
                naive_product(&a, &b),
                "size {}",
                n
            );
        }
    }

    #[test]
    fn test_depth_limits() {
        let a = random_matrix(32, 1);
        let b = random_matrix(32, 2);
        let expected = naive_product(&a, &b);
        for max_level in [0, 1, 2, 5] {
            let config = StrassenConfig::new()
                .with_max_parallel_level(max_level)
                .with_row_grain(2);
            assert_eq!(
                strassen_product(&config, &a, &b),
                expected,
                "max level {}",
                max_level
            );
        }
    }

    #[test]
    fn test_identity_and_zero() {
        let a = random_matrix(16, 7);
        let id = Matrix::<i64>::identity(16);
        let zero = Matrix::<i64>::new(16, 16);
        let config = StrassenConfig::default();
        assert_eq!(strassen_product(&config, &a, &id), a);
        assert_eq!(strassen_product(&config, &id, &a), a);
        assert_eq!(strassen_product(&config, &a, &zero), zero);
        assert_eq!(strassen_product(&config, &zero, &a), zero);
    }

    #[test]
    fn test_deterministic_under_parallelism() {
        let a = random_matrix(64, 11);
        let b = random_matrix(64, 12);
        let config = StrassenConfig::new().with_row_grain(1);
        let first = strassen_product(&config, &a, &b);
        for _ in 0..5 {
            assert_eq!(strassen_product(&config, &a, &b), first);
        }
    }

    #[test]
    fn test_wraparound_matches_naive() {
        let mut rng = StdRng::seed_from_u64(99);
        let a = Matrix::from_fn(8, 8, |_, _| rng.gen::<i8>());
        let b = Matrix::from_fn(8, 8, |_, _| rng.gen::<i8>());
        let mut expected = Matrix::new(8, 8);
        multiply(a.view(), b.view(), expected.view_mut(), 8);
        assert_eq!(strassen_product(&StrassenConfig::default(), &a, &b), expected);
    }

    #[test]
    fn test_f64_agrees_within_rounding() {
        let mut rng = StdRng::seed_from_u64(5);
        let a = Matrix::from_fn(16, 16, |_, _| rng.gen_range(-1.0..1.0));
        let b = Matrix::from_fn(16, 16, |_, _| rng.gen_range(-1.0..1.0));
        let mut expected = Matrix::<f64>::new(16, 16);
        multiply(a.view(), b.view(), expected.view_mut(), 16);
        let got = strassen_product(&StrassenConfig::default(), &a, &b);
        approx::assert_relative_eq!(got.as_slice(), expected.as_slice(), epsilon = 1e-9);
    }

    #[test]
    fn test_f16_small_integers_exact() {
        use half::f16;
        let a = Matrix::from_fn(4, 4, |r, c| f16::from_f32((r + c) as f32));
        let b = Matrix::from_fn(4, 4, |r, c| f16::from_f32(r as f32 - c as f32));
        let mut expected = Matrix::<f16>::new(4, 4);
        multiply(a.view(), b.view(), expected.view_mut(), 4);
        assert_eq!(strassen_product(&StrassenConfig::default(), &a, &b), expected);
    }

    #[test]
    fn test_operates_on_sub_views() {
        // Multiply the 4x4 blocks at (1, 2) of two 6x6 matrices into the
        // block at (2, 0) of a 6x6 output.
        let big_a = random_matrix(6, 21);
        let big_b = random_matrix(6, 22);
        let a = big_a.make_view(1, 2, 4, 4).unwrap();
        let b = big_b.make_view(1, 2, 4, 4).unwrap();

        let mut expected = Matrix::<i64>::new(4, 4);
        multiply(a, b, expected.view_mut(), 4);

        let mut out = Matrix::from_vec(6, 6, vec![-1; 36]).unwrap();
        strassen(a, b, out.make_view_mut(2, 0, 4, 4).unwrap(), 4, 0).unwrap();
        assert_eq!(out.make_view(2, 0, 4, 4).unwrap().to_vec(), expected.as_slice());
        assert_eq!(out.make_view(0, 0, 2, 6).unwrap().to_vec(), vec![-1; 12]);
        assert_eq!(out.make_view(2, 4, 4, 2).unwrap().to_vec(), vec![-1; 8]);
    }

    #[test]
    fn test_view_too_small_is_an_error() {
        let a = Matrix::<i32>::new(4, 4);
        let b = Matrix::<i32>::new(2, 2);
        let mut c = Matrix::<i32>::new(4, 4);
        assert!(matches!(
            strassen(a.view(), b.view(), c.view_mut(), 4, 0),
            Err(MultiplyError::ExtentTooSmall {
                size: 4,
                rows: 2,
                cols: 2
            })
        ));
    }

    #[test]
    fn test_view_too_small_on_odd_size() {
        let a = Matrix::<i32>::identity(3);
        let b = Matrix::<i32>::identity(2);
        let mut c = Matrix::<i32>::new(3, 3);
        assert!(matches!(
            strassen(a.view(), b.view(), c.view_mut(), 3, 0),
            Err(MultiplyError::ExtentTooSmall { size: 3, .. })
        ));

        let mut small_c = Matrix::<i32>::new(3, 2);
        assert!(matches!(
            strassen(a.view(), a.view(), small_c.view_mut(), 3, 0),
            Err(MultiplyError::ExtentTooSmall {
                size: 3,
                rows: 3,
                cols: 2
            })
        ));
    }

    #[test]
    fn test_view_too_small_past_depth_limit() {
        let a = Matrix::<i32>::identity(4);
        let b = Matrix::<i32>::new(4, 3);
        let mut c = Matrix::<i32>::new(4, 4);
        // Level 2 is past the default limit and goes straight to the naive
        // product.
        assert!(matches!(
            strassen(a.view(), b.view(), c.view_mut(), 4, 2),
            Err(MultiplyError::ExtentTooSmall { size: 4, .. })
        ));
        let config = StrassenConfig::new().with_max_parallel_level(0);
        assert!(matches!(
            strassen_with(&config, a.view(), b.view(), c.view_mut(), 4, 1),
            Err(MultiplyError::ExtentTooSmall { size: 4, .. })
        ));
        assert_eq!(c.as_slice(), &[0; 16]);
    }
}
