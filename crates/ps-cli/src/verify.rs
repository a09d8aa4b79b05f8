use std::fmt;

use num_traits::ToPrimitive;
use ps_matrix::{Matrix, Scalar, ScalarKind};

/// Allowed error of a product of `kind`, as a fraction of [`magnitude_bound`].
///
/// Integer products must agree exactly. Float products differ in summation
/// order, and Strassen's subtractions cancel terms as large as the operands,
/// so the rounding error tracks the operand magnitudes rather than the entry
/// being compared.
pub fn tolerance(kind: ScalarKind) -> f64 {
    match kind {
        ScalarKind::F16 => 1e-2,
        ScalarKind::F32 => 1e-5,
        ScalarKind::F64 => 1e-11,
        _ => 0.0,
    }
}

/// `n * max|a| * max|b|`, an upper bound on every partial sum of `a * b`.
pub fn magnitude_bound<T>(a: &Matrix<T>, b: &Matrix<T>) -> f64
where
    T: Scalar + ToPrimitive,
{
    let max_abs = |m: &Matrix<T>| {
        m.as_slice()
            .iter()
            .filter_map(|x| x.to_f64())
            .fold(0.0f64, |acc, x| acc.max(x.abs()))
    };
    a.ncols() as f64 * max_abs(a) * max_abs(b)
}

/// The first element at which two products disagree.
#[derive(Debug, PartialEq)]
pub struct Mismatch<T> {
    pub row: usize,
    pub col: usize,
    pub expected: T,
    pub got: T,
}

impl<T: fmt::Display> fmt::Display for Mismatch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "results differ at ({}, {}): expected {}, got {}",
            self.row, self.col, self.expected, self.got
        )
    }
}

fn close<T: Scalar + ToPrimitive>(x: T, y: T, max_error: f64) -> bool {
    if x == y {
        return true;
    }
    if max_error == 0.0 {
        return false;
    }
    match (x.to_f64(), y.to_f64()) {
        (Some(x), Some(y)) => (x - y).abs() <= max_error,
        _ => false,
    }
}

/// Compares two equally sized products element by element.
///
/// `bound` is the [`magnitude_bound`] of the operands the products were
/// computed from.
pub fn first_mismatch<T>(
    expected: &Matrix<T>,
    got: &Matrix<T>,
    bound: f64,
) -> Option<Mismatch<T>>
where
    T: Scalar + ToPrimitive,
{
    let max_error = tolerance(T::KIND) * bound.max(1.0);
    let cols = expected.ncols().max(1);
    expected
        .as_slice()
        .iter()
        .zip(got.as_slice())
        .position(|(&x, &y)| !close(x, y, max_error))
        .map(|i| Mismatch {
            row: i / cols,
            col: i % cols,
            expected: expected.as_slice()[i],
            got: got.as_slice()[i],
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use half::f16;

    #[test]
    fn test_integers_must_match_exactly() {
        let a = Matrix::from_vec(2, 2, vec![1, 2, 3, 4]).unwrap();
        let b = Matrix::from_vec(2, 2, vec![1, 2, 3, 5]).unwrap();
        assert_eq!(first_mismatch(&a, &a, 1e9), None);
        assert_eq!(
            first_mismatch(&a, &b, 1e9),
            Some(Mismatch {
                row: 1,
                col: 1,
                expected: 4,
                got: 5
            })
        );
    }

    #[test]
    fn test_magnitude_bound() {
        let a = Matrix::from_vec(2, 2, vec![1.0f32, -100.0, 3.0, 4.0]).unwrap();
        let b = Matrix::from_vec(2, 2, vec![0.5f32, 2.0, -7.0, 1.0]).unwrap();
        assert_eq!(magnitude_bound(&a, &b), 2.0 * 100.0 * 7.0);
    }

    #[test]
    fn test_small_entry_judged_against_operand_magnitude() {
        // Operands of magnitude 100 at n = 16: an f16 entry of 9 computed as
        // 24 is within rounding of the partial sums that produced it.
        let expected = Matrix::from_vec(1, 2, vec![f16::from_f32(9.0), f16::ZERO]).unwrap();
        let got = Matrix::from_vec(1, 2, vec![f16::from_f32(24.0), f16::ZERO]).unwrap();
        let bound = 16.0 * 100.0 * 100.0;
        assert_eq!(first_mismatch(&expected, &got, bound), None);

        let far = Matrix::from_vec(1, 2, vec![f16::from_f32(9.0), f16::from_f32(5000.0)]).unwrap();
        let m = first_mismatch(&expected, &far, bound).unwrap();
        assert_eq!((m.row, m.col), (0, 1));
    }

    #[test]
    fn test_f64_tolerance() {
        let a = Matrix::from_vec(1, 2, vec![1000.0f64, -2.0]).unwrap();
        let b = Matrix::from_vec(1, 2, vec![1000.0f64 + 1e-8, -2.0]).unwrap();
        let c = Matrix::from_vec(1, 2, vec![1000.0f64, -2.1]).unwrap();
        let bound = 2.0 * 1000.0 * 1000.0;
        assert_eq!(first_mismatch(&a, &b, bound), None);
        let m = first_mismatch(&a, &c, bound).unwrap();
        assert_eq!((m.row, m.col), (0, 1));
    }

    #[test]
    fn test_mismatch_display() {
        let m = Mismatch {
            row: 0,
            col: 3,
            expected: 7,
            got: 8,
        };
        assert_eq!(m.to_string(), "results differ at (0, 3): expected 7, got 8");
    }
}
