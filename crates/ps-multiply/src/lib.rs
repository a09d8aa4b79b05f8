//! `ps-multiply` - Naive and parallel Strassen multiplication over
//! `ps-matrix` views.
//!
//! The entry points are [`multiply`] (the triple loop) and [`strassen`] (the
//! recursive, rayon-parallel seven-product scheme). Both write the product of
//! two square views into a third view in place. [`Multiplier`] wraps them as
//! interchangeable backends operating on whole matrices.

pub mod backend;
pub mod config;
pub mod error;
pub mod kernels;
pub mod naive;
pub mod strassen;

pub use backend::{Multiplier, NaiveMultiplier, StrassenMultiplier};
pub use config::StrassenConfig;
pub use error::{MultiplyError, Result};
pub use naive::multiply;
pub use strassen::{strassen, strassen_with};
