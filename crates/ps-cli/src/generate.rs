use std::ops::RangeInclusive;

use anyhow::{anyhow, ensure, Result};
use num_traits::FromPrimitive;
use ps_matrix::{Matrix, Scalar};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Range the random entries are drawn from.
pub const ENTRY_RANGE: RangeInclusive<i32> = -100..=100;

pub fn create_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// An `n x n` matrix of integers drawn uniformly from [`ENTRY_RANGE`],
/// converted to `T`, which must be signed.
pub fn random_matrix<T>(n: usize, rng: &mut StdRng) -> Result<Matrix<T>>
where
    T: Scalar + FromPrimitive,
{
    ensure!(
        T::KIND.is_signed(),
        "random entries in {:?} need a signed type, got {}",
        ENTRY_RANGE,
        T::KIND
    );
    let len = n
        .checked_mul(n)
        .ok_or_else(|| anyhow!("size {} is too large", n))?;
    let data = (0..len)
        .map(|_| {
            let value = rng.gen_range(ENTRY_RANGE);
            T::from_i32(value)
                .ok_or_else(|| anyhow!("{} cannot be represented as {}", value, T::KIND))
        })
        .collect::<Result<Vec<T>>>()?;
    Ok(Matrix::from_vec(n, n, data)?)
}
