use std::fmt;

use half::f16;
use num_traits::{One, Zero};

/// Element types a matrix can be instantiated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    I8,
    I16,
    I32,
    I64,
    I128,
    Isize,
    U8,
    U16,
    U32,
    U64,
    U128,
    Usize,
    /// 16-bit floating point (IEEE 754 half-precision, via the `half` crate).
    F16,
    F32,
    F64,
}

impl ScalarKind {
    /// Returns the size in bytes of a single element.
    pub fn size_in_bytes(&self) -> usize {
        match self {
            ScalarKind::I8 | ScalarKind::U8 => 1,
            ScalarKind::I16 | ScalarKind::U16 | ScalarKind::F16 => 2,
            ScalarKind::I32 | ScalarKind::U32 | ScalarKind::F32 => 4,
            ScalarKind::I64 | ScalarKind::U64 | ScalarKind::F64 => 8,
            ScalarKind::I128 | ScalarKind::U128 => 16,
            ScalarKind::Isize | ScalarKind::Usize => std::mem::size_of::<usize>(),
        }
    }

    /// Returns true for floating point kinds, whose products are only
    /// reproducible up to rounding across different evaluation orders.
    pub fn is_float(&self) -> bool {
        matches!(self, ScalarKind::F16 | ScalarKind::F32 | ScalarKind::F64)
    }

    /// Returns true if the kind can represent negative values.
    pub fn is_signed(&self) -> bool {
        !matches!(
            self,
            ScalarKind::U8
                | ScalarKind::U16
                | ScalarKind::U32
                | ScalarKind::U64
                | ScalarKind::U128
                | ScalarKind::Usize
        )
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarKind::I8 => "i8",
            ScalarKind::I16 => "i16",
            ScalarKind::I32 => "i32",
            ScalarKind::I64 => "i64",
            ScalarKind::I128 => "i128",
            ScalarKind::Isize => "isize",
            ScalarKind::U8 => "u8",
            ScalarKind::U16 => "u16",
            ScalarKind::U32 => "u32",
            ScalarKind::U64 => "u64",
            ScalarKind::U128 => "u128",
            ScalarKind::Usize => "usize",
            ScalarKind::F16 => "f16",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
        };
        write!(f, "{}", name)
    }
}

/// A matrix element.
///
/// `plus`, `minus` and `times` carry the type's native arithmetic: fixed-width
/// integers wrap around on overflow, floats round per IEEE 754. Overflow is
/// never treated as an error, and it never panics in debug builds either.
pub trait Scalar:
    Copy + Send + Sync + fmt::Debug + fmt::Display + PartialEq + Zero + One + 'static
{
    /// The runtime tag for this element type.
    const KIND: ScalarKind;

    fn plus(self, rhs: Self) -> Self;
    fn minus(self, rhs: Self) -> Self;
    fn times(self, rhs: Self) -> Self;
}

macro_rules! impl_int_scalar {
    ($($t:ty => $kind:ident),* $(,)?) => {
        $(
            impl Scalar for $t {
                const KIND: ScalarKind = ScalarKind::$kind;

                #[inline]
                fn plus(self, rhs: Self) -> Self {
                    self.wrapping_add(rhs)
                }

                #[inline]
                fn minus(self, rhs: Self) -> Self {
                    self.wrapping_sub(rhs)
                }

                #[inline]
                fn times(self, rhs: Self) -> Self {
                    self.wrapping_mul(rhs)
                }
            }
        )*
    };
}

macro_rules! impl_float_scalar {
    ($($t:ty => $kind:ident),* $(,)?) => {
        $(
            impl Scalar for $t {
                const KIND: ScalarKind = ScalarKind::$kind;

                #[inline]
                fn plus(self, rhs: Self) -> Self {
                    self + rhs
                }

                #[inline]
                fn minus(self, rhs: Self) -> Self {
                    self - rhs
                }

                #[inline]
                fn times(self, rhs: Self) -> Self {
                    self * rhs
                }
            }
        )*
    };
}

impl_int_scalar!(
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
    usize => Usize,
);

impl_float_scalar!(f16 => F16, f32 => F32, f64 => F64);
