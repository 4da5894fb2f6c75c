//! sigdsp: sliding-window convolution, correlation and Vandermonde DFT from
//! the command line.
//!
//! Jobs are described in a TOML or JSON file (`sigdsp run -c job.toml`), or
//! assembled from arguments by the single-operation subcommands.

mod config;
mod orchestrator;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::{FilterSpec, JobConfig, Operation, OutputConfig, SignalSpec};
use lib_dsp::OverlapMode;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "sigdsp")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a job file
    Run {
        /// Path to the job configuration file (.toml or .json)
        #[arg(short, long)]
        config: PathBuf,

        /// Write results here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convolve a signal with a filter
    Convolve {
        /// Comma-separated signal samples
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        signal: Vec<f64>,

        /// Comma-separated filter taps
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        filter: Vec<f64>,

        /// Boundary mode: full, valid or same
        #[arg(short, long, default_value = "valid")]
        mode: OverlapMode,
    },

    /// Correlate a signal with a filter
    Correlate {
        /// Comma-separated signal samples
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        signal: Vec<f64>,

        /// Comma-separated filter taps
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        filter: Vec<f64>,

        /// Boundary mode: full, valid or same
        #[arg(short, long, default_value = "valid")]
        mode: OverlapMode,
    },

    /// Fourier transform a signal with the Vandermonde matrix
    Dft {
        /// Comma-separated signal samples
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        samples: Vec<f64>,

        /// Transform length (defaults to the number of samples)
        #[arg(short = 'n', long)]
        length: Option<usize>,

        /// Fixed matrix capacity
        #[arg(long)]
        capacity: Option<usize>,

        /// Sample rate, for bin frequencies
        #[arg(
            short = 'r',
            long,
            default_value = "1",
            value_parser = clap::value_parser!(u32).range(1..)
        )]
        sample_rate: u32,
    },

    /// Summarize a signal and optionally write its XML report
    Report {
        /// Comma-separated signal samples
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        samples: Vec<f64>,

        /// Sample rate
        #[arg(
            short = 'r',
            long,
            default_value = "1",
            value_parser = clap::value_parser!(u32).range(1..)
        )]
        sample_rate: u32,

        /// Pin the capacity to the number of samples
        #[arg(long)]
        fixed: bool,

        /// XML report path
        #[arg(long)]
        xml: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match cli.command {
        Commands::Run { config, output } => {
            run_job(&config, output.as_deref(), cli.format)?;
        }
        Commands::Convolve { signal, filter, mode } => {
            let ops = vec![Operation::Convolve { mode }];
            let job = inline_job("convolve", signal, 1, Some(filter), ops)?;
            execute(job, None, cli.format)?;
        }
        Commands::Correlate { signal, filter, mode } => {
            let ops = vec![Operation::Correlate { mode }];
            let job = inline_job("correlate", signal, 1, Some(filter), ops)?;
            execute(job, None, cli.format)?;
        }
        Commands::Dft {
            samples,
            length,
            capacity,
            sample_rate,
        } => {
            let ops = vec![Operation::Dft { length, capacity }];
            let job = inline_job("dft", samples, sample_rate, None, ops)?;
            execute(job, None, cli.format)?;
        }
        Commands::Report {
            samples,
            sample_rate,
            fixed,
            xml,
        } => {
            report(samples, sample_rate, fixed, xml)?;
        }
    }

    Ok(())
}

fn run_job(config_path: &Path, output: Option<&Path>, format: OutputFormat) -> Result<()> {
    tracing::info!("Loading configuration from {:?}", config_path);

    let config = config::load_config(config_path)?;
    execute(config, output, format)
}

/// Run an already validated job and write its results.
fn execute(config: JobConfig, output: Option<&Path>, format: OutputFormat) -> Result<()> {
    let orchestrator = orchestrator::Orchestrator::new(config)?;
    let results = orchestrator.run()?;

    match output {
        Some(path) => {
            let mut f = std::io::BufWriter::new(std::fs::File::create(path)?);
            output::write_results(&results, &mut f, format)?;
            f.flush()?;
            tracing::info!("Results written to {:?}", path);
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            output::write_results(&results, &mut lock, format)?;
        }
    }

    Ok(())
}

/// Build and validate a job from command-line samples.
fn inline_job(
    name: &str,
    samples: Vec<f64>,
    sample_rate: u32,
    filter: Option<Vec<f64>>,
    operations: Vec<Operation>,
) -> Result<JobConfig> {
    let job = JobConfig {
        name: name.to_string(),
        signal: SignalSpec {
            sample_rate,
            values: Some(samples),
            imag: None,
            generator: None,
            fixed: false,
        },
        filter: filter.map(|values| FilterSpec { values, imag: None }),
        operations,
        output: OutputConfig::default(),
    };

    config::validate_config(&job)?;
    Ok(job)
}

fn report(samples: Vec<f64>, sample_rate: u32, fixed: bool, xml: Option<PathBuf>) -> Result<()> {
    let mut job = inline_job("report", samples, sample_rate, None, Vec::new())?;
    job.signal.fixed = fixed;

    let orchestrator = orchestrator::Orchestrator::new(job)?;
    println!("{}", orchestrator.signal().summary());

    if let Some(path) = xml {
        orchestrator.write_xml(&path)?;
        println!("XML report written to: {:?}", path);
    }

    Ok(())
}
