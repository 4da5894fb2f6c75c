//! Job configuration loading and validation.

use anyhow::{Context, Result};
use lib_dsp::OverlapMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level job configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JobConfig {
    /// Job name/description.
    pub name: String,

    /// Signal the operations run against.
    pub signal: SignalSpec,

    /// Filter taps for convolution and correlation.
    pub filter: Option<FilterSpec>,

    /// Operations, each applied to a fresh copy of the signal.
    #[serde(default)]
    pub operations: Vec<Operation>,

    /// Output configuration.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Where the signal samples come from.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignalSpec {
    /// Sample rate in samples per unit time.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Literal real parts.
    pub values: Option<Vec<f64>>,

    /// Literal imaginary parts; makes the signal complex.
    pub imag: Option<Vec<f64>>,

    /// Generated samples, instead of `values`.
    pub generator: Option<Generator>,

    /// Pin the signal's capacity to its initial length.
    #[serde(default)]
    pub fixed: bool,
}

fn default_sample_rate() -> u32 {
    1
}

/// Sample generators.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Generator {
    /// `amplitude * cos(2π i / period)`.
    Cosine {
        samples: usize,
        period: f64,
        #[serde(default = "default_amplitude")]
        amplitude: f64,
    },

    /// `1, 2, ..., samples`.
    Ramp { samples: usize },
}

fn default_amplitude() -> f64 {
    1.0
}

impl Generator {
    /// Number of samples the generator produces.
    pub fn num_samples(&self) -> usize {
        match *self {
            Generator::Cosine { samples, .. } | Generator::Ramp { samples } => samples,
        }
    }

    pub fn generate(&self) -> Vec<f64> {
        match *self {
            Generator::Cosine {
                samples,
                period,
                amplitude,
            } => (0..samples)
                .map(|i| amplitude * (2.0 * std::f64::consts::PI * i as f64 / period).cos())
                .collect(),
            Generator::Ramp { samples } => (1..=samples).map(|i| i as f64).collect(),
        }
    }
}

/// Filter taps.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Real parts of the taps.
    pub values: Vec<f64>,

    /// Imaginary parts; makes the filter complex.
    pub imag: Option<Vec<f64>>,
}

/// One operation of a job.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Operation {
    /// In-place convolution with the filter.
    Convolve { mode: OverlapMode },

    /// In-place correlation with the filter.
    Correlate { mode: OverlapMode },

    /// Vandermonde DFT of the signal, checked by an inverse round trip.
    Dft {
        /// Transform length; defaults to the signal length (or the capacity).
        length: Option<usize>,

        /// Declared fixed capacity of the transform matrix.
        capacity: Option<usize>,
    },
}

impl Operation {
    pub fn label(&self) -> String {
        match self {
            Operation::Convolve { mode } => format!("convolve {}", mode),
            Operation::Correlate { mode } => format!("correlate {}", mode),
            Operation::Dft { .. } => "dft".to_string(),
        }
    }
}

/// Output configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Write an XML report of the input signal here.
    pub xml: Option<PathBuf>,
}

/// Load configuration from file.
pub fn load_config(path: &Path) -> Result<JobConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: JobConfig = if path.extension().map_or(false, |e| e == "json") {
        serde_json::from_str(&content)?
    } else {
        // Assume TOML
        toml::from_str(&content).with_context(|| "Failed to parse config as TOML")?
    };

    validate_config(&config)?;

    Ok(config)
}

/// Validate configuration.
pub fn validate_config(config: &JobConfig) -> Result<()> {
    let signal = &config.signal;

    if signal.sample_rate == 0 {
        anyhow::bail!("signal.sample_rate must be > 0");
    }

    let signal_len = match (&signal.values, &signal.generator) {
        (Some(values), None) => values.len(),
        (None, Some(generator)) => generator.num_samples(),
        (Some(_), Some(_)) => {
            anyhow::bail!("signal: give either 'values' or 'generator', not both")
        }
        (None, None) => anyhow::bail!("signal: one of 'values' or 'generator' is required"),
    };

    if signal_len == 0 {
        anyhow::bail!("signal has no samples");
    }

    if let Some(imag) = &signal.imag {
        if imag.len() != signal_len {
            anyhow::bail!(
                "signal.imag has {} values but the signal has {} samples",
                imag.len(),
                signal_len
            );
        }
    }

    if let Some(filter) = &config.filter {
        if let Some(imag) = &filter.imag {
            if imag.len() != filter.values.len() {
                anyhow::bail!(
                    "filter.imag has {} values but the filter has {} taps",
                    imag.len(),
                    filter.values.len()
                );
            }
        }
    }

    let needs_filter = config
        .operations
        .iter()
        .any(|op| matches!(op, Operation::Convolve { .. } | Operation::Correlate { .. }));
    if needs_filter && config.filter.is_none() {
        anyhow::bail!("convolve/correlate operations require a [filter] section");
    }

    Ok(())
}
