#![allow(clippy::doc_markdown)]
//! `transposer` - out-of-core 3-D array layout converter
//!
//! Usage:
//!   `transposer -1 512 -2 64 -3 512 -i cube.jki -o cube.jik -a matrix`
//!   `transposer -1 4 -2 4 -3 4 -i seed.jki -I`
//!
//! Exits with 0 on success, the OS error number for I/O failures, `ENOMEM`
//! when a scratch buffer cannot be allocated and `EINVAL` for everything else.

mod args;
mod logging;

use std::path::Path;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::Parser;
use tracing::error;
use transposer_core::config::{LoggingConfig, DEFAULT_CONFIG_FILE};
use transposer_core::{pipeline, Job, RunReport, TransposerConfig};

use crate::args::Cli;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => libc::EINVAL,
            };
            // Printing to a closed terminal is not worth a different status.
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            logging::init(&LoggingConfig::default(), cli.verbose);
            exit_with(&err);
        }
    };
    logging::init(&config.logging, cli.verbose);

    if let Err(err) = run(&cli, &config) {
        exit_with(&err);
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<TransposerConfig> {
    let path = cli
        .config
        .as_deref()
        .unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
    let loaded = match &cli.config {
        Some(path) => TransposerConfig::load_from_path(path),
        None => TransposerConfig::load(),
    };
    let config = loaded
        .map_err(transposer_core::Error::from)
        .with_context(|| format!("loading {}", path.display()))?;
    config
        .validate()
        .map_err(transposer_core::Error::from)
        .with_context(|| format!("validating {}", path.display()))?;
    Ok(config)
}

fn run(cli: &Cli, config: &TransposerConfig) -> anyhow::Result<()> {
    let job = cli.to_job(&config.conversion)?;
    let report = pipeline::run(&job)?;
    print_summary(&job, &report);
    Ok(())
}

fn print_summary(job: &Job, report: &RunReport) {
    if let Some(init) = report.init {
        println!(
            "initialized {} with {} in {:.3} s ({} writes)",
            job.dims,
            report.algorithm,
            init.elapsed.as_secs_f64(),
            init.stats.input.writes
        );
    }
    if let Some(conversion) = report.conversion {
        let stats = conversion.stats;
        println!(
            "converted {} {} with {} over {} in {:.3} s (input: {} reads, {} seeks; output: {} writes, {} seeks)",
            job.dims,
            job.transform,
            report.algorithm,
            report.driver,
            conversion.elapsed.as_secs_f64(),
            stats.input.reads,
            stats.input.seeks,
            stats.output.writes,
            stats.output.seeks
        );
    }
}

/// Reports `err` and exits with its status.
///
/// The message also goes straight to stderr so that a filter such as
/// `RUST_LOG=off` cannot hide it.
fn exit_with(err: &anyhow::Error) -> ! {
    error!("{err:#}");
    eprintln!("transposer: {err:#}");
    let code = err
        .downcast_ref::<transposer_core::Error>()
        .map_or(libc::EINVAL, transposer_core::Error::exit_code);
    std::process::exit(code);
}
