use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    #[error("bad array access at ({row}, {col})")]
    OutOfBounds { row: usize, col: usize },
    #[error("illegal view size: {rows}x{cols} does not fit in the parent surface")]
    IllegalViewSize { rows: usize, cols: usize },
    #[error("shape mismatch: expected {expected} elements, got {got}")]
    ShapeMismatch { expected: usize, got: usize },
    #[error("matrix dimensions {rows}x{cols} overflow usize")]
    DimensionOverflow { rows: usize, cols: usize },
}

pub type Result<T> = std::result::Result<T, MatrixError>;
