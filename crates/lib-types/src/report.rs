//! Text and XML reports of a signal.

use crate::sample::{type_label, Sample};
use crate::signal::{Capacity, Signal};
use std::fmt;
use std::io::{self, Write};

/// Condensed summary: storage policy, length and datatypes.
impl<T: Sample> fmt::Display for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.capacity() {
            Capacity::Growable => write!(f, "Signal data is growable: ")?,
            Capacity::Fixed(limit) => write!(f, "Signal data has fixed capacity {}: ", limit)?,
        }
        writeln!(f, "holds {} samples.", self.len())?;
        writeln!(f, "Signal datatype: {}", type_label::<T>())?;
        write!(
            f,
            "Fourier datatype: Complex<{}>",
            std::any::type_name::<T::Real>()
        )
    }
}

/// Write every sample of `signal`, with its sample time, as an XML document.
///
/// Times and values are printed with eight fixed decimal places; complex
/// samples are written as `re,im`.
pub fn write_xml<T, W>(signal: &Signal<T>, mut writer: W) -> io::Result<()>
where
    T: Sample,
    W: Write,
{
    writeln!(writer, "<?xml version=\"1.0\"?>")?;
    writeln!(writer)?;

    let kind = if T::IS_COMPLEX { "complex" } else { "real" };
    writeln!(
        writer,
        "<Signal num_samples=\"{}\" sample_rate=\"{}\" type=\"{}\">",
        signal.len(),
        signal.sample_rate(),
        kind
    )?;

    writeln!(writer, "\t<Samples>")?;
    for (i, value) in signal.iter().enumerate() {
        write!(writer, "\t\t<Sample t=\"{:.8}\"> ", signal.time_at(i).0)?;
        if T::IS_COMPLEX {
            write!(writer, "{:.8},{:.8}", value.re(), value.im())?;
        } else {
            write!(writer, "{:.8}", value.re())?;
        }
        writeln!(writer, " </Sample>")?;
    }
    writeln!(writer, "\t</Samples>")?;
    writeln!(writer, "</Signal>")?;

    Ok(())
}
