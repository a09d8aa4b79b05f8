//! `ps-matrix` - Dense matrices and zero-copy submatrix views for par-strassen.
//!
//! This crate provides:
//! - A row-major, non-`Clone` `Matrix` that owns its storage
//! - `View` (shared, `Copy`) and `ViewMut` (exclusive, splittable) windows into it
//! - The `Surface` / `SurfaceMut` traits both flavours implement
//! - The `Scalar` trait describing the element types the algorithms accept

pub mod error;
pub mod matrix;
pub mod scalar;
pub mod surface;
pub mod view;

// Re-export primary types at the crate root for convenience.
pub use error::{MatrixError, Result};
pub use matrix::Matrix;
pub use scalar::{Scalar, ScalarKind};
pub use surface::{Surface, SurfaceMut};
pub use view::{Quadrants, View, ViewMut};
