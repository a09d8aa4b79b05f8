use clap::ValueEnum;
use ps_matrix::ScalarKind;

/// Element type of the generated matrices.
///
/// Half precision is not offered: with entries in [-100, 100] the partial
/// sums exceed the largest finite `f16` already at modest sizes.
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
pub enum DataType {
    /// Signed 32-bit integer.
    I32,

    /// Signed 64-bit integer.
    I64,

    /// 32 bit float.
    F32,

    /// 64 bit float.
    F64,
}

impl DataType {
    pub fn kind(self) -> ScalarKind {
        match self {
            DataType::I32 => ScalarKind::I32,
            DataType::I64 => ScalarKind::I64,
            DataType::F32 => ScalarKind::F32,
            DataType::F64 => ScalarKind::F64,
        }
    }
}

/// Which products the driver computes.
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
pub enum Algorithm {
    /// Parallel Strassen, then the naive triple loop, then compare.
    Both,

    /// Parallel Strassen only.
    Strassen,

    /// Naive triple loop only.
    Naive,
}

impl Algorithm {
    pub fn runs_strassen(self) -> bool {
        matches!(self, Algorithm::Both | Algorithm::Strassen)
    }

    pub fn runs_naive(self) -> bool {
        matches!(self, Algorithm::Both | Algorithm::Naive)
    }
}
