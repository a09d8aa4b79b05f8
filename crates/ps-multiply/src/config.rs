use crate::error::{MultiplyError, Result};

/// Default recursion level above which Strassen falls back to the naive
/// product. Parallel recursion happens at levels 0 and 1 only.
pub const DEFAULT_MAX_PARALLEL_LEVEL: usize = 1;

/// Default minimum number of rows before an elementwise loop is split across
/// the thread pool.
pub const DEFAULT_ROW_GRAIN: usize = 64;

/// Tuning knobs for [`strassen_with`](crate::strassen_with) and
/// [`StrassenMultiplier`](crate::StrassenMultiplier).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrassenConfig {
    /// Deepest recursion level that still splits into seven sub-products.
    /// Calls with `level > max_parallel_level` run the naive product.
    pub max_parallel_level: usize,
    /// Elementwise loops over fewer rows than this run on the calling thread.
    pub row_grain: usize,
    /// Size of a dedicated thread pool. `None` runs on rayon's global pool.
    pub num_threads: Option<usize>,
}

impl Default for StrassenConfig {
    fn default() -> Self {
        StrassenConfig {
            max_parallel_level: DEFAULT_MAX_PARALLEL_LEVEL,
            row_grain: DEFAULT_ROW_GRAIN,
            num_threads: None,
        }
    }
}

impl StrassenConfig {
    /// Create a configuration with the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the recursion depth limit.
    pub fn with_max_parallel_level(mut self, level: usize) -> Self {
        self.max_parallel_level = level;
        self
    }

    /// Set the elementwise splitting threshold.
    pub fn with_row_grain(mut self, rows: usize) -> Self {
        self.row_grain = rows;
        self
    }

    /// Request a dedicated thread pool with `threads` workers.
    pub fn with_num_threads(mut self, threads: usize) -> Self {
        self.num_threads = Some(threads);
        self
    }

    /// Check that every knob holds a usable value.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if `row_grain` is zero or a dedicated pool of
    /// zero threads is requested.
    pub fn validate(&self) -> Result<()> {
        if self.row_grain == 0 {
            return Err(MultiplyError::InvalidConfig(
                "row_grain must be > 0".to_string(),
            ));
        }
        if self.num_threads == Some(0) {
            return Err(MultiplyError::InvalidConfig(
                "num_threads must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StrassenConfig::default();
        assert_eq!(config.max_parallel_level, 1);
        assert_eq!(config.row_grain, DEFAULT_ROW_GRAIN);
        assert_eq!(config.num_threads, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = StrassenConfig::new()
            .with_max_parallel_level(3)
            .with_row_grain(8)
            .with_num_threads(2);
        assert_eq!(config.max_parallel_level, 3);
        assert_eq!(config.row_grain, 8);
        assert_eq!(config.num_threads, Some(2));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero() {
        assert!(StrassenConfig::new().with_row_grain(0).validate().is_err());
        assert!(StrassenConfig::new().with_num_threads(0).validate().is_err());
    }
}
