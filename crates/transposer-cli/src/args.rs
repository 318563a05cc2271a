//! Command-line surface.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use transposer_core::config::ConversionConfig;
use transposer_core::{Algorithm, Dimensions, DriverKind, Job, SizePolicy, Transform};

#[derive(Parser, Debug)]
#[command(name = "transposer")]
#[command(
    author,
    version,
    about = "Reorder a 3-D f64 array file from JKI to JIK layout without loading it in memory"
)]
pub struct Cli {
    /// Extent of axis i (decimal, 0x-hex or 0-octal)
    #[arg(short = '1', long = "n1", value_parser = parse_dimension)]
    pub n1: usize,

    /// Extent of axis j
    #[arg(short = '2', long = "n2", value_parser = parse_dimension)]
    pub n2: usize,

    /// Extent of axis k
    #[arg(short = '3', long = "n3", value_parser = parse_dimension)]
    pub n3: usize,

    /// Input file (JKI layout)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output file (JIK layout); optional with --init-input
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Require file sizes to equal the cube size exactly
    #[arg(short = 'x', long)]
    pub exact_dims: bool,

    /// Conversion algorithm [default: jki_map]
    #[arg(short, long, value_enum, ignore_case = true)]
    pub algorithm: Option<AlgorithmArg>,

    /// I/O driver [default: fd]
    #[arg(short = 'd', long = "io-driver", value_enum, ignore_case = true)]
    pub driver: Option<DriverArg>,

    /// Fill the input file with generated values before converting
    #[arg(short = 'I', long)]
    pub init_input: bool,

    /// Convert JIK back to JKI instead
    #[arg(long)]
    pub reverse: bool,

    /// Defaults file [default: ./transposer.toml]
    #[arg(long, env = "TRANSPOSER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long)]
    pub verbose: bool,
}

/// CLI algorithm option
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum AlgorithmArg {
    IjkMap,
    JkiMap,
    JikMap,
    VectorInput,
    VectorOutput,
    Matrix,
}

impl From<AlgorithmArg> for Algorithm {
    fn from(a: AlgorithmArg) -> Self {
        match a {
            AlgorithmArg::IjkMap => Algorithm::IjkMap,
            AlgorithmArg::JkiMap => Algorithm::JkiMap,
            AlgorithmArg::JikMap => Algorithm::JikMap,
            AlgorithmArg::VectorInput => Algorithm::VectorInput,
            AlgorithmArg::VectorOutput => Algorithm::VectorOutput,
            AlgorithmArg::Matrix => Algorithm::Matrix,
        }
    }
}

/// CLI driver option
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DriverArg {
    #[value(name = "fd", alias = "descriptor")]
    Descriptor,
    #[value(name = "stream", alias = "buffered-stream")]
    Stream,
}

impl From<DriverArg> for DriverKind {
    fn from(d: DriverArg) -> Self {
        match d {
            DriverArg::Descriptor => DriverKind::Descriptor,
            DriverArg::Stream => DriverKind::Stream,
        }
    }
}

/// Parses an unsigned extent with the radix prefixes of `strtoul(s, NULL, 0)`:
/// `0x` for hex, a leading `0` for octal, decimal otherwise.
///
/// Unlike `strtoul` the whole argument must be a number: surrounding
/// whitespace is ignored, but trailing characters such as `12abc` are
/// rejected.
pub fn parse_dimension(s: &str) -> Result<usize, String> {
    let trimmed = s.trim();
    let (digits, radix) = if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        (hex, 16)
    } else if trimmed.len() > 1 && trimmed.starts_with('0') {
        (&trimmed[1..], 8)
    } else {
        (trimmed, 10)
    };
    usize::from_str_radix(digits, radix).map_err(|e| format!("invalid dimension '{s}': {e}"))
}

impl Cli {
    /// Builds the job, falling back to `defaults` for anything not given.
    pub fn to_job(&self, defaults: &ConversionConfig) -> transposer_core::Result<Job> {
        let mut job = Job::new(Dimensions::new(self.n1, self.n2, self.n3)?);
        job.input.clone_from(&self.input);
        job.output.clone_from(&self.output);
        job.algorithm = self.algorithm.map_or(defaults.algorithm, Algorithm::from);
        job.driver = self.driver.map_or(defaults.driver, DriverKind::from);
        job.size_policy = if self.exact_dims {
            SizePolicy::Exact
        } else {
            defaults.size_policy()
        };
        job.init_input = self.init_input;
        if self.reverse {
            job.transform = Transform::JKI_TO_JIK.inverse();
        }
        Ok(job)
    }
}
