//! Sliding-window convolution and correlation.
//!
//! Both operations slide a short filter across a longer signal and
//! accumulate `Σ filter[k] * signal[p + k]` at each alignment. They share one
//! kernel and differ only in the direction the signal is walked:
//!
//! - **Convolution** walks the signal back to front, which time-reverses the
//!   filter relative to the signal.
//! - **Correlation** walks front to back, after conjugating complex taps.
//!
//! The in-place variants overwrite the signal as they go and return the
//! range of the (possibly padded) signal that holds the result. Every write
//! lands on a sample the kernel will not read again, so no scratch buffer
//! is needed. [`convolved`] and [`correlated`] run the same code on copies
//! and leave their inputs untouched.
//!
//! # Boundary modes
//!
//! With `d = filter_len - 1` (the filter delay) and `N` the signal length:
//!
//! ```text
//! Full:  [0 0 s s s s s 0 0]   pad d front, d back   -> N + d samples
//! Valid: [s s s s s]           no padding            -> N - d samples
//! Same:  [0 0 s s s s s]       pad d front           -> N samples
//! ```
//!
//! Padding means inserting zeros, so Full and Same need a sequence that can
//! grow. The growth check runs before anything is mutated: a failed call
//! leaves both the signal and the filter exactly as they were.

use crate::error::{DspError, DspResult};
use lib_types::{Sample, SampleBuffer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

/// Boundary handling for the filter overhang at the signal edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapMode {
    /// Every alignment with any overlap. Result length `N + M - 1`.
    Full,

    /// Only alignments with complete overlap. Result length `N - M + 1`.
    Valid,

    /// Leading edge effects only. Result length `N`.
    Same,
}

impl OverlapMode {
    /// Zeros inserted before and after the signal for a filter of `filter_len` taps.
    pub fn padding(self, filter_len: usize) -> (usize, usize) {
        let delay = filter_len.saturating_sub(1);
        match self {
            OverlapMode::Full => (delay, delay),
            OverlapMode::Valid => (0, 0),
            OverlapMode::Same => (delay, 0),
        }
    }

    /// Number of result samples for a signal of `signal_len` and a filter of `filter_len`.
    pub fn output_len(self, signal_len: usize, filter_len: usize) -> usize {
        match self {
            OverlapMode::Full => (signal_len + filter_len).saturating_sub(1),
            OverlapMode::Valid => (signal_len + 1).saturating_sub(filter_len),
            OverlapMode::Same => signal_len,
        }
    }
}

impl fmt::Display for OverlapMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OverlapMode::Full => "full",
            OverlapMode::Valid => "valid",
            OverlapMode::Same => "same",
        };
        f.write_str(name)
    }
}

impl FromStr for OverlapMode {
    type Err = DspError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(OverlapMode::Full),
            "valid" => Ok(OverlapMode::Valid),
            "same" => Ok(OverlapMode::Same),
            _ => Err(DspError::UnknownMode(s.to_string())),
        }
    }
}

/// Direction in which the kernel walks the signal.
#[derive(Clone, Copy, Debug)]
enum Traversal {
    Forward,
    Reverse,
}

impl Traversal {
    /// Physical index of the `step`-th sample along this traversal.
    #[inline]
    fn position(self, len: usize, step: usize) -> usize {
        match self {
            Traversal::Forward => step,
            Traversal::Reverse => len - 1 - step,
        }
    }
}

/// Shared compute kernel.
///
/// For each step `p` in `0..=len - taps`, accumulates
/// `Σ filter[k] * signal[pos(p + k)]` and stores it at `signal[pos(p)]`.
/// Requires `0 < filter.len() <= signal.len()`.
fn overlap_kernel<A, B>(signal: &mut [A], filter: &[B], traversal: Traversal)
where
    A: Sample,
    B: Copy + Into<A>,
{
    let len = signal.len();
    let steps = len + 1 - filter.len();

    tracing::trace!(
        "overlap kernel: {:?} over {} samples, {} taps, {} outputs",
        traversal,
        len,
        filter.len(),
        steps
    );

    for step in 0..steps {
        let mut acc = A::zero();
        for (k, &tap) in filter.iter().enumerate() {
            acc += tap.into() * signal[traversal.position(len, step + k)];
        }
        signal[traversal.position(len, step)] = acc;
    }
}

fn check_lengths(signal_len: usize, filter_len: usize) -> DspResult<()> {
    if filter_len == 0 {
        return Err(DspError::EmptyFilter);
    }
    if filter_len >= signal_len {
        return Err(DspError::FilterTooLong {
            signal_len,
            filter_len,
        });
    }
    Ok(())
}

/// Validate the call and confirm the signal can take the mode's padding.
///
/// Returns `(pre, post)` padding; nothing has been mutated yet.
fn prepare<A, S>(signal: &S, filter_len: usize, mode: OverlapMode) -> DspResult<(usize, usize)>
where
    S: SampleBuffer<A> + ?Sized,
{
    check_lengths(signal.len(), filter_len)?;

    let (pre, post) = mode.padding(filter_len);
    signal.check_growth(pre + post)?;

    tracing::debug!(
        "overlap: mode={}, signal_len={}, taps={}, padding=({}, {})",
        mode,
        signal.len(),
        filter_len,
        pre,
        post
    );

    Ok((pre, post))
}

fn pad<A, S>(signal: &mut S, pre: usize, post: usize) -> DspResult<()>
where
    A: Sample,
    S: SampleBuffer<A> + ?Sized,
{
    if pre > 0 {
        signal.insert_run(0, pre, A::zero())?;
    }
    if post > 0 {
        let end = signal.len();
        signal.insert_run(end, post, A::zero())?;
    }
    Ok(())
}

/// Convolve `a` with `b` in place, `a = a * b`.
///
/// Requires `0 < b.len() < a.len()`. Full and Same modes grow `a` with zero
/// padding. Returns the range of `a` holding the result; samples outside it
/// are padding remnants.
///
/// # Errors
///
/// - [`DspError::EmptyFilter`] / [`DspError::FilterTooLong`] on bad lengths.
/// - [`DspError::NotResizable`] if the mode needs padding that `a` cannot
///   hold. `a` is left unchanged.
pub fn convolve<A, B, S>(a: &mut S, b: &[B], mode: OverlapMode) -> DspResult<Range<usize>>
where
    A: Sample,
    B: Copy + Into<A>,
    S: SampleBuffer<A> + ?Sized,
{
    let (pre, post) = prepare(a, b.len(), mode)?;
    pad(a, pre, post)?;

    overlap_kernel(a.samples_mut(), b, Traversal::Reverse);

    let delay = b.len() - 1;
    Ok(delay..a.len())
}

/// Correlate `a` with `b` in place, `a = a ⋆ b`.
///
/// Complex taps of `b` are conjugated **in place** before use, so the
/// caller's filter holds `conj(b)` afterwards. Use [`correlated`] to keep
/// both inputs intact.
///
/// # Errors
///
/// Same as [`convolve`]. On error neither `a` nor `b` has been modified.
pub fn correlate<A, B, S>(a: &mut S, b: &mut [B], mode: OverlapMode) -> DspResult<Range<usize>>
where
    A: Sample,
    B: Sample + Into<A>,
    S: SampleBuffer<A> + ?Sized,
{
    let (pre, post) = prepare(a, b.len(), mode)?;

    if B::IS_COMPLEX {
        for tap in b.iter_mut() {
            *tap = tap.conj();
        }
    }

    pad(a, pre, post)?;

    overlap_kernel(a.samples_mut(), b, Traversal::Forward);

    let delay = b.len() - 1;
    Ok(0..a.len() - delay)
}

/// Convolution that returns a new vector and leaves both inputs untouched.
pub fn convolved<A, B>(a: &[A], b: &[B], mode: OverlapMode) -> DspResult<Vec<A>>
where
    A: Sample,
    B: Copy + Into<A>,
{
    let mut out = a.to_vec();
    let range = convolve(&mut out, b, mode)?;
    Ok(extract(out, range))
}

/// Correlation that returns a new vector and leaves both inputs untouched.
pub fn correlated<A, B>(a: &[A], b: &[B], mode: OverlapMode) -> DspResult<Vec<A>>
where
    A: Sample,
    B: Sample + Into<A>,
{
    let mut filter = b.to_vec();
    let mut out = a.to_vec();
    let range = correlate(&mut out, &mut filter, mode)?;
    Ok(extract(out, range))
}

fn extract<T>(mut samples: Vec<T>, range: Range<usize>) -> Vec<T> {
    samples.truncate(range.end);
    samples.drain(..range.start);
    samples
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib_types::{Capacity, CapacityError, Complex64, Signal};

    const TAPS: [f64; 3] = [0.1, 0.2, 0.3];

    fn ramp(n: usize) -> Vec<f64> {
        (1..=n).map(|i| i as f64).collect()
    }

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len(), "length mismatch: {:?}", actual);
        for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
            assert!((a - e).abs() < 1e-12, "Mismatch at index {}: {} vs {}", i, a, e);
        }
    }

    #[test]
    fn test_convolve_valid() {
        let mut sig = Signal::from_fn(5, 5, |i| (i + 1) as f32);
        let taps = [0.1f32, 0.2, 0.3];

        let range = convolve(&mut sig, &taps, OverlapMode::Valid).unwrap();

        assert_eq!(range, 2..5);
        let expected = [1.0f32, 1.6, 2.2];
        for (got, want) in sig.as_slice()[range].iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-6, "{} vs {}", got, want);
        }
    }

    #[test]
    fn test_convolve_full() {
        let mut sig = ramp(5);
        let range = convolve(&mut sig, &TAPS, OverlapMode::Full).unwrap();

        assert_eq!(sig.len(), 9);
        assert_close(&sig[range], &[0.1, 0.4, 1.0, 1.6, 2.2, 2.2, 1.5]);
    }

    #[test]
    fn test_convolve_same() {
        let mut sig = ramp(5);
        let range = convolve(&mut sig, &TAPS, OverlapMode::Same).unwrap();

        assert_eq!(range.len(), 5);
        assert_close(&sig[range], &[0.1, 0.4, 1.0, 1.6, 2.2]);
    }

    #[test]
    fn test_correlate_modes() {
        let mut taps = TAPS;

        let mut sig = ramp(5);
        let range = correlate(&mut sig, &mut taps, OverlapMode::Valid).unwrap();
        assert_close(&sig[range], &[1.4, 2.0, 2.6]);

        let mut sig = ramp(5);
        let range = correlate(&mut sig, &mut taps, OverlapMode::Full).unwrap();
        assert_close(&sig[range], &[0.3, 0.8, 1.4, 2.0, 2.6, 1.4, 0.5]);

        let mut sig = ramp(5);
        let range = correlate(&mut sig, &mut taps, OverlapMode::Same).unwrap();
        assert_close(&sig[range], &[0.3, 0.8, 1.4, 2.0, 2.6]);

        // Real taps are never touched.
        assert_eq!(taps, TAPS);
    }

    #[test]
    fn test_single_tap_identity() {
        let mut sig = ramp(4);
        let range = convolve(&mut sig, &[1.0], OverlapMode::Full).unwrap();
        assert_close(&sig[range], &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_widening_filter() {
        // f32 taps into an f64 signal.
        let mut sig = ramp(5);
        let taps = [0.5f32, 0.5];
        let range = convolve(&mut sig, &taps, OverlapMode::Valid).unwrap();
        assert_close(&sig[range], &[1.5, 2.5, 3.5, 4.5]);
    }

    #[test]
    fn test_filter_too_long() {
        let mut sig = ramp(3);
        let err = convolve(&mut sig, &TAPS, OverlapMode::Valid).unwrap_err();
        assert!(matches!(
            err,
            DspError::FilterTooLong {
                signal_len: 3,
                filter_len: 3
            }
        ));
        assert_eq!(sig, ramp(3));
    }

    #[test]
    fn test_empty_filter() {
        let mut sig = ramp(3);
        let taps: [f64; 0] = [];
        let err = convolve(&mut sig, &taps, OverlapMode::Same).unwrap_err();
        assert!(matches!(err, DspError::EmptyFilter));
    }

    #[test]
    fn test_fixed_signal_rejects_padding() {
        let original = ramp(5);
        let mut sig = Signal::fixed(original.clone(), 5);

        for mode in [OverlapMode::Full, OverlapMode::Same] {
            let err = convolve(&mut sig, &TAPS, mode).unwrap_err();
            assert!(matches!(
                err,
                DspError::NotResizable(CapacityError::NotResizable { .. })
            ));
            assert_eq!(sig.as_slice(), original.as_slice());
        }

        assert!(convolve(&mut sig, &TAPS, OverlapMode::Valid).is_ok());
    }

    #[test]
    fn test_fixed_signal_with_headroom() {
        let sig = Signal::new(ramp(5), 5);
        let mut sig = sig.with_capacity_policy(Capacity::Fixed(7)).unwrap();

        let range = convolve(&mut sig, &TAPS, OverlapMode::Same).unwrap();
        assert_close(&sig.as_slice()[range], &[0.1, 0.4, 1.0, 1.6, 2.2]);

        // Full would need two more samples than the capacity allows.
        let mut sig = Signal::new(ramp(5), 5)
            .with_capacity_policy(Capacity::Fixed(8))
            .unwrap();
        assert!(convolve(&mut sig, &TAPS, OverlapMode::Full).is_err());
        assert_eq!(sig.as_slice(), ramp(5).as_slice());
    }

    #[test]
    fn test_slice_buffer() {
        let mut data = [1.0, 2.0, 3.0, 4.0, 5.0];

        let range = convolve(&mut data[..], &TAPS, OverlapMode::Valid).unwrap();
        assert_close(&data[range], &[1.0, 1.6, 2.2]);

        let mut data = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert!(convolve(&mut data[..], &TAPS, OverlapMode::Full).is_err());
        assert_eq!(data, [1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_correlate_conjugates_filter_in_place() {
        let mut sig: Vec<Complex64> = ramp(4).into_iter().map(Complex64::from).collect();
        let mut taps = [Complex64::new(1.0, 1.0), Complex64::new(0.0, -2.0)];

        let range = correlate(&mut sig, &mut taps, OverlapMode::Valid).unwrap();

        assert_eq!(taps, [Complex64::new(1.0, -1.0), Complex64::new(0.0, 2.0)]);

        // conj(b0) * a[i] + conj(b1) * a[i + 1]
        let expected = [
            Complex64::new(1.0, -1.0 + 4.0),
            Complex64::new(2.0, -2.0 + 6.0),
            Complex64::new(3.0, -3.0 + 8.0),
        ];
        for (got, want) in sig[range].iter().zip(expected.iter()) {
            assert!((got - want).norm() < 1e-12, "{} vs {}", got, want);
        }
    }

    #[test]
    fn test_failed_correlate_leaves_filter() {
        let mut sig = Signal::fixed(vec![Complex64::new(1.0, 0.0); 4], 4);
        let mut taps = [Complex64::new(1.0, 1.0), Complex64::new(2.0, 2.0)];

        assert!(correlate(&mut sig, &mut taps, OverlapMode::Full).is_err());
        assert_eq!(taps, [Complex64::new(1.0, 1.0), Complex64::new(2.0, 2.0)]);
    }

    #[test]
    fn test_non_mutating_variants() {
        let sig = ramp(5);
        let taps = [Complex64::new(0.0, 1.0), Complex64::new(1.0, 0.0)];
        let sig_c: Vec<Complex64> = sig.iter().copied().map(Complex64::from).collect();

        let conv = convolved(&sig, &TAPS, OverlapMode::Full).unwrap();
        assert_close(&conv, &[0.1, 0.4, 1.0, 1.6, 2.2, 2.2, 1.5]);
        assert_eq!(sig, ramp(5));

        let corr = correlated(&sig_c, &taps, OverlapMode::Valid).unwrap();
        assert_eq!(corr.len(), 4);
        assert_eq!(taps[0], Complex64::new(0.0, 1.0));
        // conj(i) * 1 + 1 * 2
        assert!((corr[0] - Complex64::new(2.0, -1.0)).norm() < 1e-12);
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("Full".parse::<OverlapMode>().unwrap(), OverlapMode::Full);
        assert_eq!("same".parse::<OverlapMode>().unwrap(), OverlapMode::Same);
        assert!(matches!(
            "circular".parse::<OverlapMode>(),
            Err(DspError::UnknownMode(_))
        ));
        assert_eq!(OverlapMode::Valid.to_string(), "valid");
    }

    #[test]
    fn test_padding_table() {
        assert_eq!(OverlapMode::Full.padding(4), (3, 3));
        assert_eq!(OverlapMode::Valid.padding(4), (0, 0));
        assert_eq!(OverlapMode::Same.padding(4), (3, 0));

        assert_eq!(OverlapMode::Full.output_len(10, 4), 13);
        assert_eq!(OverlapMode::Valid.output_len(10, 4), 7);
        assert_eq!(OverlapMode::Same.output_len(10, 4), 10);
    }
}
