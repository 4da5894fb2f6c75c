//! Result output formatting and writing.

use crate::orchestrator::{JobResults, OutputKind};
use crate::OutputFormat;
use anyhow::Result;
use std::io::Write;

/// Write job results to `out` in the requested format.
pub fn write_results(
    results: &JobResults,
    out: &mut dyn Write,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => write_text(results, out)?,
        OutputFormat::Json => {
            let outputs: Vec<_> = results
                .outputs
                .iter()
                .map(|o| {
                    serde_json::json!({
                        "operation": o.label,
                        "kind": o.kind,
                        "re": o.values.iter().map(|v| v.re).collect::<Vec<_>>(),
                        "im": o.values.iter().map(|v| v.im).collect::<Vec<_>>(),
                        "frequencies": o.frequencies,
                        "roundtrip_error": o.roundtrip_error,
                    })
                })
                .collect();

            let json = serde_json::json!({
                "name": results.name,
                "sample_rate": results.sample_rate,
                "num_samples": results.signal_len,
                "complex": results.complex,
                "outputs": outputs,
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&json)?)?;
        }
        OutputFormat::Csv => {
            writeln!(out, "operation,index,re,im")?;
            for o in &results.outputs {
                for (i, v) in o.values.iter().enumerate() {
                    writeln!(out, "{},{},{},{}", o.label, i, v.re, v.im)?;
                }
            }
        }
    }

    Ok(())
}

fn write_text(results: &JobResults, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "Job: {}", results.name)?;
    writeln!(out, "{}", results.summary)?;

    for o in &results.outputs {
        writeln!(out)?;
        writeln!(out, "{} ({} values)", o.label, o.values.len())?;

        match o.kind {
            OutputKind::Samples => {
                for (i, v) in o.values.iter().enumerate() {
                    if results.complex {
                        writeln!(out, "  [{:>4}] {:>14.8} {:>+14.8}i", i, v.re, v.im)?;
                    } else {
                        writeln!(out, "  [{:>4}] {:>14.8}", i, v.re)?;
                    }
                }
            }
            OutputKind::Spectrum => {
                let frequencies = o.frequencies.as_deref().unwrap_or(&[]);
                for (i, v) in o.values.iter().enumerate() {
                    let f = frequencies.get(i).copied().unwrap_or(f64::NAN);
                    writeln!(
                        out,
                        "  bin {:>4} @ {:>10.4}: {:>14.8} {:>+14.8}i  |X| = {:.8}",
                        i,
                        f,
                        v.re,
                        v.im,
                        v.norm()
                    )?;
                }
                if let Some(err) = o.roundtrip_error {
                    writeln!(out, "  Round-trip error: {:.3e}", err)?;
                }
            }
        }
    }

    Ok(())
}
