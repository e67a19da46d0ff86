//! Numeric traits the kernels are generic over.
//!
//! - [`Element`]: anything that can live in a matrix and be zeroed/set to one.
//! - [`Accumulate`]: elements with a wider accumulator for reductions.
//! - [`Real`]: floating point elements for the probability helpers.
//! - [`RowIndex`]: integer types usable as labels and row ids.
//!
//! Reductions widen on read and narrow once on the final write.

use core::fmt::Debug;
use core::ops::{Add, Div, Mul, Neg, Sub};
use half::{bf16, f16};

/// A matrix element.
pub trait Element: Copy + Send + Sync + PartialEq + PartialOrd + Debug + 'static {
    /// Additive identity.
    const ZERO: Self;
    /// Multiplicative identity, the "hot" value of a one-hot row.
    const ONE: Self;
}

macro_rules! impl_element {
    ($($t:ty => $zero:expr, $one:expr);* $(;)?) => {
        $(
            impl Element for $t {
                const ZERO: Self = $zero;
                const ONE: Self = $one;
            }
        )*
    };
}

impl_element! {
    u8 => 0, 1;
    i32 => 0, 1;
    i64 => 0, 1;
    u32 => 0, 1;
    f32 => 0.0, 1.0;
    f64 => 0.0, 1.0;
    f16 => f16::ZERO, f16::ONE;
    bf16 => bf16::ZERO, bf16::ONE;
}

/// An element that can be summed in a wider intermediate.
///
/// Long weighted sums lose precision quickly in narrow types, so reductions
/// accumulate in [`Accumulate::Acc`] and only narrow when the result is stored.
pub trait Accumulate: Element {
    /// Accumulator type, never narrower than `Self`.
    type Acc: Copy + Send + Sync;

    /// Zero of the accumulator.
    const ACC_ZERO: Self::Acc;

    /// Converts into the accumulator.
    fn widen(self) -> Self::Acc;

    /// Converts an accumulated value back, rounding or saturating as needed.
    fn narrow(acc: Self::Acc) -> Self;

    /// `acc + w * x` in the accumulator. Integer accumulators saturate.
    fn mul_add(acc: Self::Acc, w: Self::Acc, x: Self::Acc) -> Self::Acc;

    /// `constant + var * sum`, the final scale and bias of a reduction.
    #[inline]
    fn affine(constant: Self::Acc, var: Self::Acc, sum: Self::Acc) -> Self::Acc {
        Self::mul_add(constant, var, sum)
    }
}

macro_rules! float_mul_add {
    () => {
        #[inline]
        fn mul_add(acc: Self::Acc, w: Self::Acc, x: Self::Acc) -> Self::Acc {
            acc + w * x
        }
    };
}

macro_rules! saturating_mul_add {
    () => {
        #[inline]
        fn mul_add(acc: Self::Acc, w: Self::Acc, x: Self::Acc) -> Self::Acc {
            acc.saturating_add(w.saturating_mul(x))
        }
    };
}

impl Accumulate for f16 {
    type Acc = f32;
    const ACC_ZERO: f32 = 0.0;

    fn widen(self) -> f32 {
        self.to_f32()
    }

    fn narrow(acc: f32) -> Self {
        Self::from_f32(acc)
    }

    float_mul_add!();
}

impl Accumulate for bf16 {
    type Acc = f32;
    const ACC_ZERO: f32 = 0.0;

    fn widen(self) -> f32 {
        self.to_f32()
    }

    fn narrow(acc: f32) -> Self {
        Self::from_f32(acc)
    }

    float_mul_add!();
}

impl Accumulate for f32 {
    type Acc = f64;
    const ACC_ZERO: f64 = 0.0;

    fn widen(self) -> f64 {
        f64::from(self)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn narrow(acc: f64) -> Self {
        acc as Self
    }

    float_mul_add!();
}

impl Accumulate for f64 {
    type Acc = f64;
    const ACC_ZERO: f64 = 0.0;

    fn widen(self) -> f64 {
        self
    }

    fn narrow(acc: f64) -> Self {
        acc
    }

    float_mul_add!();
}

impl Accumulate for i32 {
    type Acc = i64;
    const ACC_ZERO: i64 = 0;

    fn widen(self) -> i64 {
        i64::from(self)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn narrow(acc: i64) -> Self {
        acc.clamp(i64::from(Self::MIN), i64::from(Self::MAX)) as Self
    }

    saturating_mul_add!();
}

impl Accumulate for i64 {
    type Acc = i64;
    const ACC_ZERO: i64 = 0;

    fn widen(self) -> i64 {
        self
    }

    fn narrow(acc: i64) -> Self {
        acc
    }

    saturating_mul_add!();
}

/// Floating point elements used by the softmax and cross-entropy helpers.
pub trait Real:
    Element
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    /// Negative infinity, the identity of `max`.
    const NEG_INFINITY: Self;

    /// `e^self`.
    fn exp(self) -> Self;
    /// Natural logarithm.
    fn ln(self) -> Self;
    /// Larger of two values, ignoring NaN like `f32::max`.
    fn max_of(self, other: Self) -> Self;
    /// Lossy conversion from `f64`.
    fn from_f64(x: f64) -> Self;
}

impl Real for f32 {
    const NEG_INFINITY: Self = f32::NEG_INFINITY;

    #[inline]
    fn exp(self) -> Self {
        libm::expf(self)
    }

    #[inline]
    fn ln(self) -> Self {
        libm::logf(self)
    }

    #[inline]
    fn max_of(self, other: Self) -> Self {
        f32::max(self, other)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn from_f64(x: f64) -> Self {
        x as Self
    }
}

impl Real for f64 {
    const NEG_INFINITY: Self = f64::NEG_INFINITY;

    #[inline]
    fn exp(self) -> Self {
        libm::exp(self)
    }

    #[inline]
    fn ln(self) -> Self {
        libm::log(self)
    }

    #[inline]
    fn max_of(self, other: Self) -> Self {
        f64::max(self, other)
    }

    fn from_f64(x: f64) -> Self {
        x
    }
}

/// Integer types accepted as class labels and row ids.
///
/// Negative values are representable on purpose: they are rejected by the
/// checked kernels instead of wrapping around.
pub trait RowIndex: Copy + Send + Sync + Debug + 'static {
    /// The row this value addresses, or `None` if it is negative or does not fit.
    fn to_row(self) -> Option<usize>;

    /// The index value for a row, or `None` if the type cannot hold it.
    fn from_row(row: usize) -> Option<Self>;

    /// Widened value for error reporting.
    fn wide(self) -> i128;
}

macro_rules! impl_row_index {
    ($($t:ty),*) => {
        $(
            impl RowIndex for $t {
                #[inline]
                fn to_row(self) -> Option<usize> {
                    usize::try_from(self).ok()
                }

                #[inline]
                fn from_row(row: usize) -> Option<Self> {
                    Self::try_from(row).ok()
                }

                #[allow(clippy::cast_lossless)]
                fn wide(self) -> i128 {
                    self as i128
                }
            }
        )*
    };
}

impl_row_index!(i32, i64, u32, u64, usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_index_has_no_row() {
        assert_eq!((-1i32).to_row(), None);
        assert_eq!(7i64.to_row(), Some(7));
        assert_eq!(i32::from_row(usize::MAX), None);
        assert_eq!((-3i32).wide(), -3);
    }

    #[test]
    fn narrow_saturates_integers() {
        assert_eq!(i32::narrow(i64::MAX), i32::MAX);
        assert_eq!(i32::narrow(-5), -5);
    }

    #[test]
    fn half_widens_to_f32() {
        let x = f16::from_f32(0.5);
        assert_eq!(x.widen(), 0.5);
        assert_eq!(bf16::narrow(2.0), bf16::from_f32(2.0));
    }
}
