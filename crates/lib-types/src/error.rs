//! Error types for sample containers.

use thiserror::Error;

/// Errors raised when a sample sequence cannot change shape as requested.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CapacityError {
    /// The sequence has a fixed capacity that the request would exceed.
    #[error(
        "sequence not resizable: holds {len} samples with fixed capacity {capacity}, \
         {requested} more requested"
    )]
    NotResizable {
        len: usize,
        capacity: usize,
        requested: usize,
    },

    /// Insertion position lies past the end of the sequence.
    #[error("insert position {at} out of bounds for sequence of length {len}")]
    OutOfBounds { at: usize, len: usize },

    /// A fixed capacity smaller than the samples already held.
    #[error("fixed capacity {capacity} is below the current length {len}")]
    BelowLength { capacity: usize, len: usize },
}

/// Errors raised when a stored signal fails validation on load.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SignalError {
    /// Sample times are undefined without a positive sample rate.
    #[error("sample rate must be > 0")]
    ZeroSampleRate,

    #[error(transparent)]
    Capacity(#[from] CapacityError),
}
