//! # lib-dsp
//!
//! Computational core of sigdsp:
//!
//! - **Overlap**: in-place sliding-window convolution and correlation with
//!   Full/Valid/Same boundary handling
//! - **Fourier**: brute-force DFT/IDFT through an explicit Vandermonde matrix
//!
//! Both operate on the sample types and containers from `lib-types`.

pub mod error;
pub mod fourier;
pub mod overlap;

pub use error::{DspError, DspResult};
pub use fourier::{MatrixStorage, Spectrum, Vandermonde};
pub use overlap::{convolve, convolved, correlate, correlated, OverlapMode};
