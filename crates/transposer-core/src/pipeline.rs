//! Run orchestration.
//!
//! A [`Job`] is the immutable description of one run. [`run`] validates it,
//! picks the I/O backend once, optionally seeds the input, then sizes both
//! files and converts. Failures are returned, never turned into a process exit
//! here.

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::info;

use crate::algorithm::Algorithm;
use crate::engine::{self, IoStats, TransferStats};
use crate::error::{Error, FileRole, Result};
use crate::init;
use crate::layout::{Dimensions, Transform};
use crate::sizing::{check_file_size, SizePolicy};
use crate::storage::{DescriptorFile, DriverKind, FileHandle, OpenFlags, StreamFile};

/// Everything one run needs, fixed before any file is touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Cube extents.
    pub dims: Dimensions,
    /// File read during conversion (and seeded when `init_input` is set).
    pub input: Option<PathBuf>,
    /// File written during conversion; optional for init-only runs.
    pub output: Option<PathBuf>,
    /// Traversal and buffering strategy, used for both phases.
    pub algorithm: Algorithm,
    /// Backend used for both files.
    pub driver: DriverKind,
    /// Size check applied to the input and to a pre-existing output.
    pub size_policy: SizePolicy,
    /// Seed the input with generated values before converting.
    pub init_input: bool,
    /// Source and destination layouts.
    pub transform: Transform,
}

impl Job {
    /// Creates a job with default algorithm, driver, policy and transform.
    #[must_use]
    pub fn new(dims: Dimensions) -> Self {
        Self {
            dims,
            input: None,
            output: None,
            algorithm: Algorithm::default(),
            driver: DriverKind::default(),
            size_policy: SizePolicy::default(),
            init_input: false,
            transform: Transform::default(),
        }
    }

    /// Checks everything that can be checked without I/O.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingInput`], [`Error::MissingOutput`] (unless this
    /// is an init-only run) or [`Error::UnsupportedTransform`].
    pub fn validate(&self) -> Result<()> {
        if self.input.is_none() {
            return Err(Error::MissingInput);
        }
        if self.output.is_none() && !self.init_input {
            return Err(Error::MissingOutput);
        }
        self.algorithm.check_transform(self.transform)
    }
}

/// Timing and counters of one phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseReport {
    /// Wall-clock time of the phase, excluding opening and sizing.
    pub elapsed: Duration,
    /// Requests issued per file.
    pub stats: TransferStats,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Backend that was used.
    pub driver: DriverKind,
    /// Algorithm that was used.
    pub algorithm: Algorithm,
    /// Initialization phase, if requested.
    pub init: Option<PhaseReport>,
    /// Conversion phase; `None` for init-only runs.
    pub conversion: Option<PhaseReport>,
}

impl RunReport {
    /// Requests summed over both phases and both files.
    #[must_use]
    pub fn total_stats(&self) -> IoStats {
        let mut total = IoStats::default();
        for phase in [self.init, self.conversion].into_iter().flatten() {
            total += phase.stats.input;
            total += phase.stats.output;
        }
        total
    }
}

/// Executes `job`.
///
/// # Errors
///
/// Returns the first configuration, sizing, I/O or allocation error. Nothing
/// is retried and partially written output is left as is.
pub fn run(job: &Job) -> Result<RunReport> {
    job.validate()?;
    info!(driver = %job.driver, "using i/o driver");
    match job.driver {
        DriverKind::Descriptor => run_with::<DescriptorFile>(job),
        DriverKind::Stream => run_with::<StreamFile>(job),
    }
}

fn run_with<H: FileHandle>(job: &Job) -> Result<RunReport> {
    let input = job.input.as_deref().ok_or(Error::MissingInput)?;
    let mut report = RunReport {
        driver: job.driver,
        algorithm: job.algorithm,
        init: None,
        conversion: None,
    };

    if job.init_input {
        report.init = Some(initialize_input::<H>(input, &job.dims, job.algorithm)?);
    }

    let Some(output) = job.output.as_deref() else {
        // validate() only lets this through for init-only runs.
        return Ok(report);
    };

    report.conversion = Some(convert_files::<H>(
        input,
        output,
        &job.dims,
        job.algorithm,
        job.size_policy,
        job.transform,
    )?);
    Ok(report)
}

/// Creates (or truncates) `path` and seeds it with generated values.
///
/// # Errors
///
/// Returns [`Error::Open`] if the file cannot be created or truncated, or any
/// error from [`init::initialize`].
pub fn initialize_input<H: FileHandle>(
    path: &Path,
    dims: &Dimensions,
    algorithm: Algorithm,
) -> Result<PhaseReport> {
    let mut file = match H::open(path, OpenFlags::create_new().truncated()) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            H::open(path, OpenFlags::read_write().truncated()).map_err(|source| Error::Open {
                role: FileRole::Input,
                action: "truncate",
                source,
            })?
        }
        Err(source) => {
            return Err(Error::Open {
                role: FileRole::Input,
                action: "create",
                source,
            })
        }
    };
    info!(%algorithm, path = %path.display(), "init input file");

    let start = Instant::now();
    let stats = init::initialize(&mut file, dims, algorithm)?;
    file.close().map_err(|source| Error::Close {
        role: FileRole::Input,
        source,
    })?;
    let elapsed = start.elapsed();

    info!(
        elapsed_s = elapsed.as_secs_f64(),
        writes = stats.writes,
        "elapsed file init time"
    );
    Ok(PhaseReport {
        elapsed,
        stats: TransferStats {
            input: stats,
            output: IoStats::default(),
        },
    })
}

/// Opens both files, checks their sizes, and converts `input` into `output`.
///
/// The output is created when absent. An existing output is opened without
/// truncation and must pass the same size check as the input.
///
/// # Errors
///
/// Returns any open, stat, sizing, conversion or close error.
pub fn convert_files<H: FileHandle>(
    input: &Path,
    output: &Path,
    dims: &Dimensions,
    algorithm: Algorithm,
    policy: SizePolicy,
    transform: Transform,
) -> Result<PhaseReport> {
    let mut in_file = H::open(input, OpenFlags::read_only()).map_err(|source| Error::Open {
        role: FileRole::Input,
        action: "open",
        source,
    })?;
    info!(path = %input.display(), "input file open for reading");
    check_file_size(&in_file, FileRole::Input, dims, policy)?;

    let mut out_file = open_output::<H>(output, dims, policy)?;
    info!(path = %output.display(), "output file open for writing");

    info!(%algorithm, %transform, "converting");
    let start = Instant::now();
    let stats = engine::convert(&mut in_file, &mut out_file, dims, algorithm, transform)?;
    out_file.close().map_err(|source| Error::Close {
        role: FileRole::Output,
        source,
    })?;
    let elapsed = start.elapsed();
    info!(
        elapsed_s = elapsed.as_secs_f64(),
        input_reads = stats.input.reads,
        input_seeks = stats.input.seeks,
        output_writes = stats.output.writes,
        output_seeks = stats.output.seeks,
        "elapsed file processing time"
    );

    in_file.close().map_err(|source| Error::Close {
        role: FileRole::Input,
        source,
    })?;
    Ok(PhaseReport { elapsed, stats })
}

fn open_output<H: FileHandle>(path: &Path, dims: &Dimensions, policy: SizePolicy) -> Result<H> {
    match H::open(path, OpenFlags::create_new()) {
        Ok(file) => Ok(file),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            let file = H::open(path, OpenFlags::read_write()).map_err(|source| Error::Open {
                role: FileRole::Output,
                action: "open",
                source,
            })?;
            check_file_size(&file, FileRole::Output, dims, policy)?;
            Ok(file)
        }
        Err(source) => Err(Error::Open {
            role: FileRole::Output,
            action: "create",
            source,
        }),
    }
}
