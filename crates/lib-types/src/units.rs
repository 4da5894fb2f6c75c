//! Time and frequency newtypes.
//!
//! Sample rates are stored as integer samples per unit time; these wrappers
//! keep sample instants and frequency bins from being mixed up with raw
//! sample values.

use serde::{Deserialize, Serialize};
use std::ops::Mul;

/// Time in units of the signal's time base (seconds unless stated otherwise).
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Seconds(pub f64);

impl Mul<f64> for Seconds {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self(self.0 * rhs)
    }
}

/// Frequency in cycles per unit time.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Hertz(pub f64);

impl Hertz {
    /// Frequency of a sample rate given in samples per unit time.
    #[inline]
    pub fn from_sample_rate(rate: u32) -> Self {
        Self(rate as f64)
    }

    /// Convert to period (reciprocal).
    #[inline]
    pub fn to_period(&self) -> Seconds {
        Seconds(1.0 / self.0)
    }
}

impl Mul<f64> for Hertz {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self(self.0 * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_of_sample_rate() {
        let t = Hertz::from_sample_rate(32).to_period();
        assert!((t.0 - 1.0 / 32.0).abs() < 1e-15);
        assert!(((t * 64.0).0 - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_scaled_bin_frequency() {
        let f = Hertz::from_sample_rate(32) * (2.0 / 16.0);
        assert!((f.0 - 4.0).abs() < 1e-12);
    }
}
