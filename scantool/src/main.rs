use anyhow::Context;
use clap::Parser;
use log::error;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use workflow::config::CleanSettings;
use workflow::runner::{Outcome, RunSummary, Runner};

mod exporter;
mod importer;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Offline cleaning driver for pump-probe transient scans")]
struct Args {
    /// Raw scan files to process (.mat matrix containers or .txt exports)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Directory receiving the exported artifacts
    #[arg(long, default_value = "cleaned")]
    output_dir: PathBuf,
    /// Load cleaning settings from YAML
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Import and export only, skip the cleaning recipe
    #[arg(long, default_value_t = false)]
    no_clean: bool,
    /// Offset subtracted from the time axis (redefines t = 0)
    #[arg(long)]
    shift: Option<f64>,
    /// Metadata field to normalize the trace by (e.g. pump_power)
    #[arg(long)]
    normalize: Option<String>,
    /// Append a one-line summary per scan to this report file
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let settings = if let Some(path) = args.settings {
        CleanSettings::load(path)?
    } else {
        CleanSettings::from_args(args.shift, args.normalize.as_deref())
    };
    let config = settings.to_clean_config()?;

    let runner = Runner::new(config, args.output_dir.clone(), !args.no_clean);
    let mut summary = RunSummary::default();
    let mut report_lines = Vec::new();

    for input in &args.inputs {
        match runner.process(input) {
            Ok(Outcome::Processed {
                save_name,
                artifact,
                samples,
                unrecognized_keys,
                provenance,
            }) => {
                summary.record_processed();
                println!(
                    "{} -> {} ({} samples, {} unknown keys)",
                    input.display(),
                    artifact.display(),
                    samples,
                    unrecognized_keys
                );
                report_lines.push(format!(
                    "scan={save_name} samples={samples} unknown_keys={unrecognized_keys} log={provenance}\n"
                ));
            }
            Ok(Outcome::SkippedCalibration) => {
                summary.record_skipped();
            }
            Err(err) => {
                summary.record_failed();
                error!("{}: {err:#}", input.display());
            }
        }
    }

    println!(
        "Processed {} scans ({} skipped, {} failed)",
        summary.processed, summary.skipped, summary.failed
    );

    if let Some(report_path) = args.report {
        if let Some(parent) = report_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&report_path)
            .with_context(|| format!("opening report {}", report_path.display()))?;
        for line in &report_lines {
            file.write_all(line.as_bytes())?;
        }
    }

    Ok(())
}
