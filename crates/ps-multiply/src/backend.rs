use std::fmt::Debug;

use ps_matrix::{Matrix, Scalar, Surface, SurfaceMut, View, ViewMut};
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::info;

use crate::config::StrassenConfig;
use crate::error::{MultiplyError, Result};
use crate::naive;
use crate::strassen::strassen_with;

/// Trait for interchangeable square matrix multiplication backends.
///
/// Both backends compute the ordinary matrix product; they differ only in
/// how the work is scheduled.
pub trait Multiplier<T: Scalar>: Send + Sync + Debug {
    /// Returns the name of this backend (e.g., "naive", "strassen").
    fn name(&self) -> &str;

    /// Matrix multiplication over views: `c = a * b` for the top-left
    /// `size x size` blocks.
    ///
    /// # Errors
    /// Returns `ExtentTooSmall` if any view is smaller than `size x size`.
    fn multiply(&self, a: View<'_, T>, b: View<'_, T>, c: ViewMut<'_, T>, size: usize)
        -> Result<()>;

    /// Multiply two square matrices of equal size into a fresh matrix.
    ///
    /// # Errors
    /// Returns `NotSquare` or `SizeMismatch` for incompatible operands.
    fn product(&self, a: &Matrix<T>, b: &Matrix<T>) -> Result<Matrix<T>> {
        if !a.is_square() {
            return Err(MultiplyError::NotSquare {
                rows: a.nrows(),
                cols: a.ncols(),
            });
        }
        if !b.is_square() {
            return Err(MultiplyError::NotSquare {
                rows: b.nrows(),
                cols: b.ncols(),
            });
        }
        if a.nrows() != b.nrows() {
            return Err(MultiplyError::SizeMismatch {
                a: a.nrows(),
                b: b.nrows(),
            });
        }

        let size = a.nrows();
        let mut c = Matrix::new(size, size);
        self.multiply(a.view(), b.view(), c.view_mut(), size)?;
        Ok(c)
    }
}

fn check_extent(rows: usize, cols: usize, size: usize) -> Result<()> {
    if rows < size || cols < size {
        return Err(MultiplyError::ExtentTooSmall { size, rows, cols });
    }
    Ok(())
}

pub(crate) fn check_extents<T>(
    a: &View<'_, T>,
    b: &View<'_, T>,
    c: &ViewMut<'_, T>,
    size: usize,
) -> Result<()> {
    check_extent(a.nrows(), a.ncols(), size)?;
    check_extent(b.nrows(), b.ncols(), size)?;
    check_extent(c.nrows(), c.ncols(), size)
}

/// Sequential triple-loop backend.
#[derive(Debug, Clone, Default)]
pub struct NaiveMultiplier;

impl NaiveMultiplier {
    pub fn new() -> Self {
        NaiveMultiplier
    }
}

impl<T: Scalar> Multiplier<T> for NaiveMultiplier {
    fn name(&self) -> &str {
        "naive"
    }

    fn multiply(
        &self,
        a: View<'_, T>,
        b: View<'_, T>,
        c: ViewMut<'_, T>,
        size: usize,
    ) -> Result<()> {
        check_extents(&a, &b, &c, size)?;
        naive::multiply(a, b, c, size);
        Ok(())
    }
}

/// Parallel Strassen backend.
///
/// Runs on rayon's global pool unless the configuration asks for a
/// dedicated pool, which is then built once and owned by the backend.
#[derive(Debug)]
pub struct StrassenMultiplier {
    config: StrassenConfig,
    pool: Option<ThreadPool>,
}

impl StrassenMultiplier {
    /// Create a backend with the given configuration.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if the configuration does not validate and
    /// `ThreadPool` if the dedicated pool cannot be started.
    pub fn new(config: StrassenConfig) -> Result<Self> {
        config.validate()?;
        let pool = match config.num_threads {
            Some(threads) => {
                let pool = ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("strassen-{}", i))
                    .build()
                    .map_err(|e| MultiplyError::ThreadPool(e.to_string()))?;
                info!(threads, "strassen: using dedicated thread pool");
                Some(pool)
            }
            None => None,
        };
        Ok(StrassenMultiplier { config, pool })
    }

    /// Returns the configuration this backend runs with.
    pub fn config(&self) -> &StrassenConfig {
        &self.config
    }

    /// Number of worker threads products will run on.
    pub fn num_threads(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }
}

impl<T: Scalar> Multiplier<T> for StrassenMultiplier {
    fn name(&self) -> &str {
        "strassen"
    }

    fn multiply(
        &self,
        a: View<'_, T>,
        b: View<'_, T>,
        c: ViewMut<'_, T>,
        size: usize,
    ) -> Result<()> {
        match &self.pool {
            Some(pool) => pool.install(|| strassen_with(&self.config, a, b, c, size, 0)),
            None => strassen_with(&self.config, a, b, c, size, 0),
        }
    }
}
