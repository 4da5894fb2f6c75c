//! Brute-force discrete Fourier transform via the Vandermonde matrix.
//!
//! The `n x n` matrix `M[r][c] = exp(-2πi·r·c/n)` is built once and then
//! applied by plain matrix-vector multiplication:
//!
//! ```text
//! X = M · x            (forward)
//! x = Mᴴ · X / n       (inverse)
//! ```
//!
//! Construction and every application are O(n²). This is a reference
//! implementation for verifying faster transforms, not for large `n`.
//!
//! The matrix is immutable after construction, so one [`Vandermonde`] can be
//! shared read-only across threads; [`Vandermonde::apply_batch`] does exactly
//! that with rayon.

use crate::error::{DspError, DspResult};
use lib_types::sample::real_from_count;
use lib_types::{Hertz, Sample, Signal};
use ndarray::{Array2, ArrayView2, Axis};
use num_complex::Complex;
use num_traits::{Float, FloatConst, Zero};
use rayon::prelude::*;

/// How the transform length is declared.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MatrixStorage {
    /// Length supplied at construction time; required.
    #[default]
    Dynamic,

    /// Declared upper bound on the length. A missing runtime length
    /// means the full capacity.
    Fixed(usize),
}

impl MatrixStorage {
    /// Resolve the transform length for an optional runtime request.
    pub fn resolve(self, dft_length: Option<usize>) -> DspResult<usize> {
        let len = match (self, dft_length) {
            (MatrixStorage::Dynamic, None) => return Err(DspError::UnspecifiedLength),
            (MatrixStorage::Dynamic, Some(len)) => len,
            (MatrixStorage::Fixed(capacity), None) => capacity,
            (MatrixStorage::Fixed(capacity), Some(len)) if len > capacity => {
                return Err(DspError::ExceedsCapacity { len, capacity })
            }
            (MatrixStorage::Fixed(_), Some(len)) => len,
        };

        if len == 0 {
            return Err(DspError::InvalidTransformLength(len));
        }
        Ok(len)
    }
}

/// Dense DFT matrix of roots-of-unity powers.
#[derive(Clone, Debug)]
pub struct Vandermonde<T> {
    matrix: Array2<Complex<T>>,
    storage: MatrixStorage,
}

impl<T> Vandermonde<T>
where
    T: Float + FloatConst + Send + Sync,
{
    /// Build the transform matrix.
    ///
    /// # Errors
    ///
    /// - [`DspError::UnspecifiedLength`] for dynamic storage without a length.
    /// - [`DspError::ExceedsCapacity`] if the length is above a fixed capacity.
    /// - [`DspError::InvalidTransformLength`] for a length of zero.
    pub fn new(storage: MatrixStorage, dft_length: Option<usize>) -> DspResult<Self> {
        let len = storage.resolve(dft_length)?;

        // Reduce r·c modulo n so the phase stays in [0, 2π) for large indices.
        let step = -(T::PI() + T::PI()) / real_from_count::<T>(len);
        let matrix = Array2::from_shape_fn((len, len), |(row, col)| {
            Complex::from_polar(T::one(), step * real_from_count::<T>((row * col) % len))
        });

        tracing::debug!(
            "Vandermonde: built {}x{} DFT matrix ({:?} storage)",
            len,
            len,
            storage
        );

        Ok(Self { matrix, storage })
    }

    /// Dynamically sized transform of length `len`.
    pub fn with_len(len: usize) -> DspResult<Self> {
        Self::new(MatrixStorage::Dynamic, Some(len))
    }

    /// Transform length `n`.
    #[inline]
    pub fn len(&self) -> usize {
        self.matrix.nrows()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.matrix.is_empty()
    }

    #[inline]
    pub fn storage(&self) -> MatrixStorage {
        self.storage
    }

    /// Read-only view of the matrix.
    pub fn matrix(&self) -> ArrayView2<'_, Complex<T>> {
        self.matrix.view()
    }

    fn check_len(&self, actual: usize) -> DspResult<()> {
        if actual != self.len() {
            return Err(DspError::LengthMismatch {
                expected: self.len(),
                actual,
            });
        }
        Ok(())
    }

    /// Forward transform, `X[k] = Σ_j x[j]·exp(-2πi·j·k/n)`.
    pub fn apply<S>(&self, samples: &[S]) -> DspResult<Vec<Complex<T>>>
    where
        S: Sample<Real = T>,
    {
        self.check_len(samples.len())?;

        let coefficients = self
            .matrix
            .outer_iter()
            .map(|row| {
                row.iter()
                    .zip(samples)
                    .fold(Complex::zero(), |acc, (&w, &x)| acc + w * x.to_complex())
            })
            .collect();

        Ok(coefficients)
    }

    /// Inverse transform, `x = Mᴴ·X / n`.
    ///
    /// The result is complex even for real input signals; the imaginary
    /// parts are then only rounding noise.
    pub fn inverse(&self, coefficients: &[Complex<T>]) -> DspResult<Vec<Complex<T>>> {
        self.check_len(coefficients.len())?;

        let scale = T::one() / real_from_count::<T>(self.len());
        let samples = self
            .matrix
            .axis_iter(Axis(1))
            .map(|col| {
                let sum = col
                    .iter()
                    .zip(coefficients)
                    .fold(Complex::zero(), |acc, (w, &x)| acc + w.conj() * x);
                sum * scale
            })
            .collect();

        Ok(samples)
    }

    /// Forward transform of a signal, keeping its sample rate for bin lookup.
    pub fn spectrum<S>(&self, signal: &Signal<S>) -> DspResult<Spectrum<T>>
    where
        S: Sample<Real = T>,
    {
        Ok(Spectrum {
            coefficients: self.apply(signal.as_slice())?,
            sample_rate: signal.sample_rate(),
        })
    }

    /// Forward transforms of independent sequences, in parallel.
    ///
    /// Fails with the first length mismatch encountered.
    pub fn apply_batch<S, V>(&self, batch: &[V]) -> DspResult<Vec<Vec<Complex<T>>>>
    where
        S: Sample<Real = T>,
        V: AsRef<[S]> + Sync,
    {
        batch
            .par_iter()
            .map(|samples| self.apply(samples.as_ref()))
            .collect()
    }
}

/// Fourier coefficients of a sampled signal.
#[derive(Clone, Debug, PartialEq)]
pub struct Spectrum<T> {
    /// Coefficient `k` belongs to frequency `k · sample_rate / n`.
    pub coefficients: Vec<Complex<T>>,

    /// Sample rate of the transformed signal, in samples per unit time.
    pub sample_rate: u32,
}

impl<T> Spectrum<T>
where
    T: Float + FloatConst + Send + Sync,
{
    #[inline]
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Frequency of bin `k`.
    pub fn bin_frequency(&self, k: usize) -> Hertz {
        Hertz::from_sample_rate(self.sample_rate) * (k as f64 / self.len() as f64)
    }

    /// Magnitude of every coefficient.
    pub fn magnitudes(&self) -> Vec<T> {
        self.coefficients.iter().map(|c| c.norm()).collect()
    }

    /// Run the inverse transform on these coefficients.
    pub fn reconstruct(&self, dft: &Vandermonde<T>) -> DspResult<Vec<Complex<T>>> {
        dft.inverse(&self.coefficients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib_types::{Complex32, Complex64};
    use rustfft::FftPlanner;
    use std::f64::consts::PI;

    fn cosine(n: usize, period: f64) -> Vec<f64> {
        (0..n).map(|i| (2.0 * PI * i as f64 / period).cos()).collect()
    }

    #[test]
    fn test_dynamic_requires_length() {
        let result = Vandermonde::<f64>::new(MatrixStorage::Dynamic, None);
        assert!(matches!(result, Err(DspError::UnspecifiedLength)));
    }

    #[test]
    fn test_fixed_capacity_overflow() {
        let result = Vandermonde::<f64>::new(MatrixStorage::Fixed(16), Some(32));
        assert!(matches!(
            result,
            Err(DspError::ExceedsCapacity {
                len: 32,
                capacity: 16
            })
        ));
    }

    #[test]
    fn test_fixed_defaults_to_capacity() {
        let dft = Vandermonde::<f32>::new(MatrixStorage::Fixed(16), None).unwrap();
        assert_eq!(dft.len(), 16);
        assert_eq!(dft.storage(), MatrixStorage::Fixed(16));

        let dft = Vandermonde::<f32>::new(MatrixStorage::Fixed(16), Some(8)).unwrap();
        assert_eq!(dft.len(), 8);
    }

    #[test]
    fn test_zero_length() {
        assert!(matches!(
            Vandermonde::<f64>::with_len(0),
            Err(DspError::InvalidTransformLength(0))
        ));
        assert!(matches!(
            Vandermonde::<f64>::new(MatrixStorage::Fixed(0), None),
            Err(DspError::InvalidTransformLength(0))
        ));
    }

    #[test]
    fn test_matrix_entries() {
        let n = 8;
        let dft = Vandermonde::<f64>::with_len(n).unwrap();
        let m = dft.matrix();

        assert_eq!(m.dim(), (n, n));
        for i in 0..n {
            assert!((m[[0, i]] - Complex64::new(1.0, 0.0)).norm() < 1e-15);
            assert!((m[[i, 0]] - Complex64::new(1.0, 0.0)).norm() < 1e-15);
        }

        let w = Complex64::from_polar(1.0, -2.0 * PI / n as f64);
        assert!((m[[1, 1]] - w).norm() < 1e-12);
        assert!((m[[3, 5]] - w.powu(15)).norm() < 1e-12);
    }

    #[test]
    fn test_impulse_is_flat() {
        let dft = Vandermonde::<f64>::with_len(8).unwrap();
        let mut impulse = vec![0.0f64; 8];
        impulse[0] = 1.0;

        let coefficients = dft.apply(&impulse).unwrap();
        for c in &coefficients {
            assert!((c - Complex64::new(1.0, 0.0)).norm() < 1e-12);
        }
    }

    #[test]
    fn test_single_frequency_spike() {
        // cos(2πi/8) over 16 samples: frequency bin 2.
        let n = 16;
        let dft = Vandermonde::<f64>::with_len(n).unwrap();
        let coefficients = dft.apply(&cosine(n, 8.0)).unwrap();

        for (k, c) in coefficients.iter().enumerate() {
            if k == 2 || k == n - 2 {
                assert!((c.norm() - n as f64 / 2.0).abs() < 1e-9, "bin {}: {}", k, c);
            } else {
                assert!(c.norm() < 1e-9, "bin {} should be empty: {}", k, c);
            }
        }
    }

    #[test]
    fn test_roundtrip_real() {
        let n = 16;
        let dft = Vandermonde::<f64>::with_len(n).unwrap();
        let signal: Vec<f64> = (0..n).map(|i| (i as f64 * 0.37).sin() + 0.25).collect();

        let coefficients = dft.apply(&signal).unwrap();
        let recovered = dft.inverse(&coefficients).unwrap();

        for (orig, rec) in signal.iter().zip(recovered.iter()) {
            assert!((orig - rec.re).abs() < 1e-10);
            assert!(rec.im.abs() < 1e-10);
        }
    }

    #[test]
    fn test_roundtrip_single_precision() {
        let n = 12;
        let dft = Vandermonde::<f32>::with_len(n).unwrap();
        let signal: Vec<Complex32> = (0..n)
            .map(|i| Complex32::new(i as f32, -(i as f32) * 0.5))
            .collect();

        let recovered = dft.inverse(&dft.apply(&signal).unwrap()).unwrap();
        for (orig, rec) in signal.iter().zip(recovered.iter()) {
            assert!((orig - rec).norm() < 1e-4, "{} vs {}", orig, rec);
        }
    }

    #[test]
    fn test_length_mismatch() {
        let dft = Vandermonde::<f64>::with_len(8).unwrap();
        let result = dft.apply(&[1.0f64; 7]);
        assert!(matches!(
            result,
            Err(DspError::LengthMismatch {
                expected: 8,
                actual: 7
            })
        ));

        let result = dft.inverse(&[Complex64::new(0.0, 0.0); 9]);
        assert!(matches!(result, Err(DspError::LengthMismatch { .. })));
    }

    #[test]
    fn test_matches_rustfft() {
        let n = 12; // not a power of two
        let dft = Vandermonde::<f64>::with_len(n).unwrap();
        let signal: Vec<Complex64> = (0..n)
            .map(|i| Complex64::new((i as f64 * 0.7).cos(), (i as f64 * 1.3).sin()))
            .collect();

        let ours = dft.apply(&signal).unwrap();

        let mut reference = signal.clone();
        FftPlanner::<f64>::new()
            .plan_fft_forward(n)
            .process(&mut reference);

        for (a, b) in ours.iter().zip(reference.iter()) {
            assert!((a - b).norm() < 1e-10, "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_spectrum_bins() {
        let n = 16;
        let signal = Signal::new(cosine(n, 8.0), 32);
        let dft = Vandermonde::<f64>::new(MatrixStorage::Fixed(16), None).unwrap();

        let spectrum = dft.spectrum(&signal).unwrap();
        assert_eq!(spectrum.len(), n);
        assert_eq!(spectrum.sample_rate, 32);
        assert!((spectrum.bin_frequency(2).0 - 4.0).abs() < 1e-12);

        let magnitudes = spectrum.magnitudes();
        assert!((magnitudes[2] - 8.0).abs() < 1e-9);

        let recovered = spectrum.reconstruct(&dft).unwrap();
        for (orig, rec) in signal.iter().zip(recovered.iter()) {
            assert!((orig - rec.re).abs() < 1e-10);
        }
    }

    #[test]
    fn test_apply_batch() {
        let dft = Vandermonde::<f64>::with_len(8).unwrap();
        let batch: Vec<Vec<f64>> = (0..6).map(|p| cosine(8, 1.0 + p as f64)).collect();

        let results = dft.apply_batch(&batch).unwrap();
        assert_eq!(results.len(), batch.len());
        for (signal, result) in batch.iter().zip(results.iter()) {
            assert_eq!(&dft.apply(signal).unwrap(), result);
        }

        let ragged = vec![vec![0.0f64; 8], vec![0.0; 4]];
        assert!(dft.apply_batch(&ragged).is_err());
    }
}
