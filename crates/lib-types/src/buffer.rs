//! The sample-sequence contract consumed by the DSP core.
//!
//! Anything that exposes its samples as a contiguous slice can be read,
//! written and traversed in either direction. Growth is the only optional
//! capability: overlap modes that pad the signal need to insert runs of
//! zeros, and a sequence that cannot grow must say so *before* anything is
//! mutated. [`SampleBuffer::check_growth`] is that side-effect-free probe.

use crate::error::CapacityError;

/// An ordered, indexable, mutable sequence of samples.
pub trait SampleBuffer<T> {
    /// Read-only view of the samples.
    fn samples(&self) -> &[T];

    /// Mutable view of the samples.
    fn samples_mut(&mut self) -> &mut [T];

    /// Number of samples currently held.
    #[inline]
    fn len(&self) -> usize {
        self.samples().len()
    }

    /// Check if the sequence is empty.
    #[inline]
    fn is_empty(&self) -> bool {
        self.samples().is_empty()
    }

    /// Check whether `count` more samples could be inserted, without
    /// touching the sequence.
    fn check_growth(&self, count: usize) -> Result<(), CapacityError>;

    /// Insert `count` copies of `value` before position `at`.
    ///
    /// `at == len()` appends. On error the sequence is unchanged.
    fn insert_run(&mut self, at: usize, count: usize, value: T) -> Result<(), CapacityError>;
}

impl<T: Clone> SampleBuffer<T> for Vec<T> {
    #[inline]
    fn samples(&self) -> &[T] {
        self
    }

    #[inline]
    fn samples_mut(&mut self) -> &mut [T] {
        self
    }

    fn check_growth(&self, _count: usize) -> Result<(), CapacityError> {
        Ok(())
    }

    fn insert_run(&mut self, at: usize, count: usize, value: T) -> Result<(), CapacityError> {
        if at > self.len() {
            return Err(CapacityError::OutOfBounds { at, len: self.len() });
        }
        self.splice(at..at, std::iter::repeat(value).take(count));
        Ok(())
    }
}

/// Slices (and arrays, via `&mut array[..]`) have a fixed length.
impl<T> SampleBuffer<T> for [T] {
    #[inline]
    fn samples(&self) -> &[T] {
        self
    }

    #[inline]
    fn samples_mut(&mut self) -> &mut [T] {
        self
    }

    fn check_growth(&self, count: usize) -> Result<(), CapacityError> {
        if count == 0 {
            return Ok(());
        }
        Err(CapacityError::NotResizable {
            len: self.len(),
            capacity: self.len(),
            requested: count,
        })
    }

    fn insert_run(&mut self, at: usize, count: usize, _value: T) -> Result<(), CapacityError> {
        if at > self.len() {
            return Err(CapacityError::OutOfBounds { at, len: self.len() });
        }
        self.check_growth(count)
    }
}
