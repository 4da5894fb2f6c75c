//! Discretely sampled signal container.
//!
//! A [`Signal`] owns its samples together with the sample rate they were
//! acquired at, in samples per unit time. Sample `i` sits at time
//! `i / sample_rate`.
//!
//! # Capacity
//!
//! Whether a signal may change length is an explicit per-instance
//! [`Capacity`] policy rather than a property of its type:
//!
//! - [`Capacity::Growable`] signals resize and accept padding freely.
//! - [`Capacity::Fixed`] signals may only change length within their
//!   capacity; anything beyond fails fast with
//!   [`CapacityError::NotResizable`] and leaves the signal untouched.

use crate::buffer::SampleBuffer;
use crate::error::{CapacityError, SignalError};
use crate::sample::{real_from_count, Sample};
use crate::units::{Hertz, Seconds};
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Storage policy for a signal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capacity {
    /// Length can change without bound.
    #[default]
    Growable,

    /// Length can never exceed the given number of samples.
    Fixed(usize),
}

/// A uniformly sampled signal of real or complex samples.
///
/// Deserialized signals are validated like constructed ones: the sample rate
/// must be positive and a fixed capacity must hold every stored sample.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSignal<T>")]
pub struct Signal<T> {
    samples: Vec<T>,

    /// Acquisition rate in samples per unit time.
    sample_rate: u32,

    #[serde(default)]
    capacity: Capacity,
}

/// Unvalidated wire form of [`Signal`].
#[derive(Deserialize)]
struct RawSignal<T> {
    samples: Vec<T>,
    sample_rate: u32,
    #[serde(default)]
    capacity: Capacity,
}

impl<T> TryFrom<RawSignal<T>> for Signal<T> {
    type Error = SignalError;

    fn try_from(raw: RawSignal<T>) -> Result<Self, Self::Error> {
        if raw.sample_rate == 0 {
            return Err(SignalError::ZeroSampleRate);
        }
        Ok(Signal::new(raw.samples, raw.sample_rate).with_capacity_policy(raw.capacity)?)
    }
}

impl<T> Signal<T> {
    /// Create a growable signal that takes ownership of `samples`.
    ///
    /// `sample_rate` must be positive; with a rate of zero every sample time
    /// and the duration are infinite.
    pub fn new(samples: Vec<T>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
            capacity: Capacity::Growable,
        }
    }

    /// Create a signal whose capacity is pinned to its initial length.
    ///
    /// `sample_rate` must be positive, as for [`Signal::new`].
    pub fn fixed(samples: Vec<T>, sample_rate: u32) -> Self {
        let capacity = Capacity::Fixed(samples.len());
        Self {
            samples,
            sample_rate,
            capacity,
        }
    }

    /// Create a growable signal by evaluating `f` at each sample index.
    pub fn from_fn(num_samples: usize, sample_rate: u32, f: impl FnMut(usize) -> T) -> Self {
        Self::new((0..num_samples).map(f).collect(), sample_rate)
    }

    /// Switch to a different capacity policy.
    pub fn with_capacity_policy(mut self, capacity: Capacity) -> Result<Self, CapacityError> {
        if let Capacity::Fixed(limit) = capacity {
            if limit < self.samples.len() {
                return Err(CapacityError::BelowLength {
                    capacity: limit,
                    len: self.samples.len(),
                });
            }
        }
        self.capacity = capacity;
        Ok(self)
    }

    /// Number of samples in the signal.
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the signal is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Acquisition rate in samples per unit time.
    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    #[inline]
    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    #[inline]
    pub fn is_growable(&self) -> bool {
        self.capacity == Capacity::Growable
    }

    /// Time of the sample at `index`.
    #[inline]
    pub fn time_at(&self, index: usize) -> Seconds {
        Seconds(index as f64 / self.sample_rate as f64)
    }

    /// Span covered by the samples (`len / sample_rate`).
    #[inline]
    pub fn duration(&self) -> Seconds {
        Hertz::from_sample_rate(self.sample_rate).to_period() * self.samples.len() as f64
    }

    pub fn as_slice(&self) -> &[T] {
        &self.samples
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.samples
    }

    /// Consume the signal, returning its samples.
    pub fn into_samples(self) -> Vec<T> {
        self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.samples.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.samples.iter_mut()
    }

    fn growth_allowed(&self, count: usize) -> Result<(), CapacityError> {
        match self.capacity {
            Capacity::Growable => Ok(()),
            Capacity::Fixed(limit) if self.samples.len() + count <= limit => Ok(()),
            Capacity::Fixed(limit) => Err(CapacityError::NotResizable {
                len: self.samples.len(),
                capacity: limit,
                requested: count,
            }),
        }
    }
}

impl<T: Clone> Signal<T> {
    /// Create a growable signal by copying samples from an existing buffer.
    pub fn from_slice(src: &[T], sample_rate: u32) -> Self {
        Self::new(src.to_vec(), sample_rate)
    }
}

impl<T: Sample> Signal<T> {
    /// Frequency resolution (`sample_rate / len`) in inverse units of time.
    pub fn resolution(&self) -> T::Real {
        real_from_count::<T::Real>(self.sample_rate as usize)
            / real_from_count::<T::Real>(self.samples.len())
    }

    /// Resize to `num_samples`, zero-filling any new samples.
    ///
    /// Fixed-capacity signals can only resize within their capacity.
    pub fn resize(&mut self, num_samples: usize) -> Result<(), CapacityError> {
        let growth = num_samples.saturating_sub(self.samples.len());
        self.growth_allowed(growth)?;
        self.samples.resize(num_samples, T::zero());
        Ok(())
    }
}

impl<T: Clone> SampleBuffer<T> for Signal<T> {
    #[inline]
    fn samples(&self) -> &[T] {
        &self.samples
    }

    #[inline]
    fn samples_mut(&mut self) -> &mut [T] {
        &mut self.samples
    }

    fn check_growth(&self, count: usize) -> Result<(), CapacityError> {
        self.growth_allowed(count)
    }

    fn insert_run(&mut self, at: usize, count: usize, value: T) -> Result<(), CapacityError> {
        if at > self.samples.len() {
            return Err(CapacityError::OutOfBounds {
                at,
                len: self.samples.len(),
            });
        }
        self.growth_allowed(count)?;
        self.samples.insert_run(at, count, value)
    }
}

impl<T> Index<usize> for Signal<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        &self.samples[index]
    }
}

impl<T> IndexMut<usize> for Signal<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.samples[index]
    }
}

impl<'a, T> IntoIterator for &'a Signal<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Signal<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter_mut()
    }
}
