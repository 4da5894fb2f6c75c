//! Job orchestration.

use crate::config::{FilterSpec, JobConfig, Operation, SignalSpec};
use anyhow::{Context, Result};
use lib_dsp::{convolve, correlate, MatrixStorage, OverlapMode, Vandermonde};
use lib_types::{write_xml, Complex64, Sample, Signal};
use serde::Serialize;
use std::path::Path;

/// The job's input signal, real or complex.
#[derive(Clone, Debug)]
pub enum JobSignal {
    Real(Signal<f64>),
    Complex(Signal<Complex64>),
}

impl JobSignal {
    pub fn len(&self) -> usize {
        match self {
            JobSignal::Real(s) => s.len(),
            JobSignal::Complex(s) => s.len(),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        match self {
            JobSignal::Real(s) => s.sample_rate(),
            JobSignal::Complex(s) => s.sample_rate(),
        }
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, JobSignal::Complex(_))
    }

    /// Multi-line storage and datatype summary.
    pub fn summary(&self) -> String {
        match self {
            JobSignal::Real(s) => s.to_string(),
            JobSignal::Complex(s) => s.to_string(),
        }
    }
}

/// What an operation output holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    Samples,
    Spectrum,
}

/// Result of one operation.
#[derive(Clone, Debug, Serialize)]
pub struct OperationOutput {
    pub label: String,
    pub kind: OutputKind,
    pub values: Vec<Complex64>,

    /// Bin frequencies, for spectra.
    pub frequencies: Option<Vec<f64>>,

    /// Largest deviation of the inverse transform from the input.
    pub roundtrip_error: Option<f64>,
}

/// Job results.
#[derive(Clone, Debug, Serialize)]
pub struct JobResults {
    pub name: String,
    pub sample_rate: u32,
    pub signal_len: usize,
    pub complex: bool,
    pub summary: String,
    pub outputs: Vec<OperationOutput>,
}

/// Job orchestrator.
pub struct Orchestrator {
    config: JobConfig,
    signal: JobSignal,
    filter: Option<FilterTaps>,
}

#[derive(Clone, Debug)]
enum FilterTaps {
    Real(Vec<f64>),
    Complex(Vec<Complex64>),
}

impl Orchestrator {
    /// Build the input signal and filter described by `config`.
    pub fn new(config: JobConfig) -> Result<Self> {
        // Either side being complex promotes both.
        let complex = config.signal.imag.is_some()
            || config.filter.as_ref().map_or(false, |f| f.imag.is_some());

        let signal = build_signal(&config.signal, complex)?;
        let filter = config.filter.as_ref().map(|f| build_filter(f, complex));

        tracing::debug!(
            "Orchestrator: name={}, samples={}, complex={}",
            config.name,
            signal.len(),
            complex
        );

        Ok(Self {
            config,
            signal,
            filter,
        })
    }

    pub fn signal(&self) -> &JobSignal {
        &self.signal
    }

    /// Run every operation against a fresh copy of the input signal.
    pub fn run(&self) -> Result<JobResults> {
        tracing::info!("Starting job: {}", self.config.name);

        if self.config.operations.is_empty() {
            tracing::warn!("Job '{}' has no operations", self.config.name);
        }

        let mut outputs = Vec::with_capacity(self.config.operations.len());
        for op in &self.config.operations {
            let label = op.label();
            tracing::info!("Running {}", label);

            let output = match *op {
                Operation::Convolve { mode } => self.run_overlap(mode, false),
                Operation::Correlate { mode } => self.run_overlap(mode, true),
                Operation::Dft { length, capacity } => self.run_dft(length, capacity),
            }
            .with_context(|| format!("{} failed", label))?;

            outputs.push(OperationOutput { label, ..output });
        }

        if let Some(path) = &self.config.output.xml {
            self.write_xml(path)?;
        }

        tracing::info!("Job complete: {} operation(s)", outputs.len());

        Ok(JobResults {
            name: self.config.name.clone(),
            sample_rate: self.signal.sample_rate(),
            signal_len: self.signal.len(),
            complex: self.signal.is_complex(),
            summary: self.signal.summary(),
            outputs,
        })
    }

    /// Write the XML report of the input signal.
    pub fn write_xml(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create {:?}", path))?;
        let writer = std::io::BufWriter::new(file);

        match &self.signal {
            JobSignal::Real(s) => write_xml(s, writer)?,
            JobSignal::Complex(s) => write_xml(s, writer)?,
        }

        tracing::info!("Wrote XML report to {:?}", path);
        Ok(())
    }

    fn run_overlap(&self, mode: OverlapMode, correlation: bool) -> Result<OperationOutput> {
        let filter = self
            .filter
            .as_ref()
            .context("operation requires a filter")?;

        let values = match (&self.signal, filter) {
            (JobSignal::Real(s), FilterTaps::Real(taps)) => {
                overlap_copy(s, taps, mode, correlation)?
                    .into_iter()
                    .map(Complex64::from)
                    .collect()
            }
            (JobSignal::Complex(s), FilterTaps::Complex(taps)) => {
                overlap_copy(s, taps, mode, correlation)?
            }
            _ => anyhow::bail!("signal and filter sample types differ"),
        };

        Ok(OperationOutput {
            label: String::new(),
            kind: OutputKind::Samples,
            values,
            frequencies: None,
            roundtrip_error: None,
        })
    }

    fn run_dft(&self, length: Option<usize>, capacity: Option<usize>) -> Result<OperationOutput> {
        let storage = capacity.map_or(MatrixStorage::Dynamic, MatrixStorage::Fixed);

        // A fixed matrix without an explicit length takes its capacity.
        let length = match storage {
            MatrixStorage::Dynamic => length.or(Some(self.signal.len())),
            MatrixStorage::Fixed(_) => length,
        };

        let dft = Vandermonde::<f64>::new(storage, length)?;

        let (spectrum, input) = match &self.signal {
            JobSignal::Real(s) => (dft.spectrum(s)?, to_complex(s.as_slice())),
            JobSignal::Complex(s) => (dft.spectrum(s)?, s.as_slice().to_vec()),
        };

        let recovered = spectrum.reconstruct(&dft)?;
        let roundtrip_error = input
            .iter()
            .zip(recovered.iter())
            .map(|(a, b)| (a - b).norm())
            .fold(0.0, f64::max);

        tracing::debug!(
            "DFT: n={}, roundtrip_error={:.3e}",
            spectrum.len(),
            roundtrip_error
        );

        let frequencies = (0..spectrum.len())
            .map(|k| spectrum.bin_frequency(k).0)
            .collect();

        Ok(OperationOutput {
            label: String::new(),
            kind: OutputKind::Spectrum,
            values: spectrum.coefficients,
            frequencies: Some(frequencies),
            roundtrip_error: Some(roundtrip_error),
        })
    }
}

/// Run one overlap operation on a copy of `signal` and return the result range.
fn overlap_copy<A: Sample>(
    signal: &Signal<A>,
    taps: &[A],
    mode: OverlapMode,
    correlation: bool,
) -> Result<Vec<A>> {
    let mut work = signal.clone();

    let range = if correlation {
        let mut taps = taps.to_vec();
        correlate(&mut work, &mut taps, mode)?
    } else {
        convolve(&mut work, taps, mode)?
    };

    Ok(work.as_slice()[range].to_vec())
}

fn to_complex(values: &[f64]) -> Vec<Complex64> {
    values.iter().copied().map(Complex64::from).collect()
}

fn zip_complex(re: &[f64], im: &[f64]) -> Vec<Complex64> {
    re.iter()
        .zip(im.iter())
        .map(|(&r, &i)| Complex64::new(r, i))
        .collect()
}

fn build_signal(spec: &SignalSpec, complex: bool) -> Result<JobSignal> {
    let real = match (&spec.values, &spec.generator) {
        (Some(values), _) => values.clone(),
        (None, Some(generator)) => generator.generate(),
        (None, None) => anyhow::bail!("signal has neither values nor a generator"),
    };

    let signal = if complex {
        let samples = match &spec.imag {
            Some(imag) => zip_complex(&real, imag),
            None => to_complex(&real),
        };
        JobSignal::Complex(make_signal(samples, spec))
    } else {
        JobSignal::Real(make_signal(real, spec))
    };

    Ok(signal)
}

fn make_signal<T>(samples: Vec<T>, spec: &SignalSpec) -> Signal<T> {
    if spec.fixed {
        Signal::fixed(samples, spec.sample_rate)
    } else {
        Signal::new(samples, spec.sample_rate)
    }
}

fn build_filter(spec: &FilterSpec, complex: bool) -> FilterTaps {
    if !complex {
        return FilterTaps::Real(spec.values.clone());
    }

    match &spec.imag {
        Some(imag) => FilterTaps::Complex(zip_complex(&spec.values, imag)),
        None => FilterTaps::Complex(to_complex(&spec.values)),
    }
}
