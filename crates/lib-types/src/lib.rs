//! # lib-types
//!
//! Sample types and the signal container for the sigdsp workspace.
//!
//! - [`Sample`]: real or complex sample values over `f32`/`f64`
//! - [`SampleBuffer`]: the sequence contract the DSP core operates on
//! - [`Signal`]: an owned, sample-rate-aware container with an explicit
//!   capacity policy
//! - [`report`]: condensed text and XML reports of a signal

pub mod buffer;
pub mod error;
pub mod report;
pub mod sample;
pub mod signal;
pub mod units;

pub use buffer::SampleBuffer;
pub use error::{CapacityError, SignalError};
pub use report::write_xml;
pub use sample::Sample;
pub use signal::{Capacity, Signal};
pub use units::{Hertz, Seconds};

/// Re-export num_complex for convenience
pub use num_complex::{Complex, Complex32, Complex64};
