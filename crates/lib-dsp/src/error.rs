//! Error types for DSP operations.

use lib_types::CapacityError;
use thiserror::Error;

/// Errors that can occur during DSP operations.
///
/// Every variant is reported before the operation mutates any caller data.
#[derive(Debug, Error)]
pub enum DspError {
    /// Filter is not strictly shorter than the signal it slides over.
    #[error("Filter too long: {filter_len} taps against a signal of {signal_len} samples")]
    FilterTooLong {
        signal_len: usize,
        filter_len: usize,
    },

    /// Filter has no taps.
    #[error("Filter must have at least one tap")]
    EmptyFilter,

    /// Overlap mode name not recognized.
    #[error("Unknown overlap mode: {0}")]
    UnknownMode(String),

    /// Input length mismatch.
    #[error("Input length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Dynamically sized transform requested without a runtime length.
    #[error("Transform matrix is dynamically allocated but no length was given")]
    UnspecifiedLength,

    /// Runtime transform length larger than the declared fixed capacity.
    #[error("Transform length {len} exceeds fixed capacity {capacity}")]
    ExceedsCapacity { len: usize, capacity: usize },

    /// Transform length of zero.
    #[error("Invalid transform length: {0}")]
    InvalidTransformLength(usize),

    /// Sequence cannot grow to hold the requested boundary padding.
    #[error("Operation not supported: {0}")]
    NotResizable(#[from] CapacityError),
}

/// Result type for DSP operations.
pub type DspResult<T> = Result<T, DspError>;
