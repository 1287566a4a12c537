use std::fmt::Debug;
use std::iter::Sum;
use std::ops::AddAssign;

use num_complex::Complex;
use num_traits::{NumAssign, Zero};

/// Element types the floating-point kernels operate on.
pub trait Element: Copy + Debug + PartialEq + NumAssign + Send + Sync + 'static {
    /// Accumulator used by reductions; at least as wide as `Self`.
    type Acc: Copy + Debug + Zero + AddAssign + Sum + Send;

    /// Complex conjugate, identity for real types.
    fn conj(self) -> Self;

    fn widen(self) -> Self::Acc;

    fn narrow(acc: Self::Acc) -> Self;
}

impl Element for f32 {
    type Acc = f64;

    #[inline]
    fn conj(self) -> Self {
        self
    }

    #[inline]
    fn widen(self) -> f64 {
        self as f64
    }

    #[inline]
    fn narrow(acc: f64) -> Self {
        acc as f32
    }
}

impl Element for f64 {
    type Acc = f64;

    #[inline]
    fn conj(self) -> Self {
        self
    }

    #[inline]
    fn widen(self) -> f64 {
        self
    }

    #[inline]
    fn narrow(acc: f64) -> Self {
        acc
    }
}

impl Element for Complex<f32> {
    type Acc = Complex<f64>;

    #[inline]
    fn conj(self) -> Self {
        Complex::conj(&self)
    }

    #[inline]
    fn widen(self) -> Complex<f64> {
        Complex::new(self.re as f64, self.im as f64)
    }

    #[inline]
    fn narrow(acc: Complex<f64>) -> Self {
        Complex::new(acc.re as f32, acc.im as f32)
    }
}

impl Element for Complex<f64> {
    type Acc = Complex<f64>;

    #[inline]
    fn conj(self) -> Self {
        Complex::conj(&self)
    }

    #[inline]
    fn widen(self) -> Complex<f64> {
        self
    }

    #[inline]
    fn narrow(acc: Complex<f64>) -> Self {
        acc
    }
}

/// Integer element types for the dtype-dispatched integer kernels.
pub trait IntElement: Copy + Debug + PartialOrd + Send + Sync + 'static {
    /// Value as i64. `u64` values above `i64::MAX` wrap.
    fn to_i64(self) -> i64;

    /// An element index stored in this type, truncating like an `as` cast.
    fn from_index(i: usize) -> Self;
}

macro_rules! impl_int_element {
    ($($t:ty),* $(,)?) => {
        $(
            impl IntElement for $t {
                #[inline]
                fn to_i64(self) -> i64 {
                    self as i64
                }

                #[inline]
                fn from_index(i: usize) -> Self {
                    i as $t
                }
            }
        )*
    };
}

impl_int_element!(i8, i16, i32, i64, u8, u16, u32, u64);
