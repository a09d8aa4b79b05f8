use thiserror::Error;

#[derive(Error, Debug)]
pub enum MultiplyError {
    #[error("matrix error: {0}")]
    Matrix(#[from] ps_matrix::MatrixError),
    #[error("matrix is not square: {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },
    #[error("operand size mismatch: {a}x{a} @ {b}x{b}")]
    SizeMismatch { a: usize, b: usize },
    #[error("view of {rows}x{cols} is too small for a product of size {size}")]
    ExtentTooSmall {
        size: usize,
        rows: usize,
        cols: usize,
    },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to build thread pool: {0}")]
    ThreadPool(String),
}

pub type Result<T> = std::result::Result<T, MultiplyError>;
