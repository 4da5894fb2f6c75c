//! Numeric sample types.
//!
//! A [`Sample`] is one value of a discretely sampled signal: either a real
//! scalar or a complex number over a chosen floating-point precision.
//!
//! The element-width rule for in-place overlap operations (the signal must be
//! able to hold values of the filter's type) is expressed with `Into`:
//! `f32 -> f64`, `f64 -> Complex<f64>` and so on are allowed, while
//! `Complex<f64> -> f64` does not exist and is rejected by the compiler.

use num_complex::Complex;
use num_traits::{Float, FloatConst, NumCast, Zero};
use std::fmt::{Debug, Display};
use std::ops::{Add, AddAssign, Mul};

/// A real or complex sample value.
pub trait Sample:
    Copy
    + Zero
    + Add<Output = Self>
    + Mul<Output = Self>
    + AddAssign
    + PartialEq
    + Debug
    + Send
    + Sync
    + 'static
{
    /// Working precision of the sample.
    type Real: Float + FloatConst + Display + Debug + Send + Sync + 'static;

    /// Whether the sample carries an imaginary part.
    const IS_COMPLEX: bool;

    /// Complex conjugate. Identity for real samples.
    fn conj(self) -> Self;

    /// Real part.
    fn re(self) -> Self::Real;

    /// Imaginary part. Zero for real samples.
    fn im(self) -> Self::Real;

    /// Widen to a complex value of the same precision.
    #[inline]
    fn to_complex(self) -> Complex<Self::Real> {
        Complex::new(self.re(), self.im())
    }
}

macro_rules! impl_real_sample {
    ($($t:ty),*) => {$(
        impl Sample for $t {
            type Real = $t;
            const IS_COMPLEX: bool = false;

            #[inline]
            fn conj(self) -> Self {
                self
            }

            #[inline]
            fn re(self) -> Self::Real {
                self
            }

            #[inline]
            fn im(self) -> Self::Real {
                0.0
            }
        }
    )*};
}

macro_rules! impl_complex_sample {
    ($($t:ty),*) => {$(
        impl Sample for Complex<$t> {
            type Real = $t;
            const IS_COMPLEX: bool = true;

            #[inline]
            fn conj(self) -> Self {
                Complex::conj(&self)
            }

            #[inline]
            fn re(self) -> Self::Real {
                self.re
            }

            #[inline]
            fn im(self) -> Self::Real {
                self.im
            }

            #[inline]
            fn to_complex(self) -> Complex<Self::Real> {
                self
            }
        }
    )*};
}

impl_real_sample!(f32, f64);
impl_complex_sample!(f32, f64);

/// Convert a sample count or index into the working precision.
#[inline]
pub fn real_from_count<R: Float>(n: usize) -> R {
    <R as NumCast>::from(n).unwrap_or_else(R::nan)
}

/// Short type name used in signal reports, e.g. `f64` or `Complex<f32>`.
pub fn type_label<T: Sample>() -> String {
    let precision = std::any::type_name::<T::Real>();
    if T::IS_COMPLEX {
        format!("Complex<{}>", precision)
    } else {
        precision.to_string()
    }
}
