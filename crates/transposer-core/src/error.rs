//! Error types for `transposer`.
//!
//! Every failure in the core is fatal: nothing is retried and nothing is
//! recovered locally. Errors travel back to a single top-level handler which
//! maps them to a process exit status via [`Error::exit_code`].

use std::fmt;
use std::io;

use thiserror::Error;

use crate::layout::Dimensions;

/// Result type alias for `transposer` operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Which of the two files an operation was acting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRole {
    /// The source file (read during conversion, written during init).
    Input,
    /// The destination file.
    Output,
}

impl fmt::Display for FileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => f.write_str("input"),
            Self::Output => f.write_str("output"),
        }
    }
}

/// Coordinate (or batch of coordinates) an I/O call was servicing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// A single element `(i, j, k)`.
    Element {
        /// Index along axis 0.
        i: usize,
        /// Index along axis 1.
        j: usize,
        /// Index along axis 2.
        k: usize,
    },
    /// The `n0`-long run with fixed `(j, k)`.
    Run {
        /// Index along axis 1.
        j: usize,
        /// Index along axis 2.
        k: usize,
    },
    /// The `n2`-long row with fixed `(i, j)`.
    Row {
        /// Index along axis 0.
        i: usize,
        /// Index along axis 1.
        j: usize,
    },
    /// The `n0 x n2` block with fixed `j`.
    Block {
        /// Index along axis 1.
        j: usize,
    },
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Element { i, j, k } => write!(f, "({i}, {j}, {k})"),
            Self::Run { j, k } => write!(f, "(..., {j}, {k})"),
            Self::Row { i, j } => write!(f, "({i}, {j}, ...)"),
            Self::Block { j } => write!(f, "(..., {j}, ...)"),
        }
    }
}

/// Errors that can occur while sizing, initializing or converting files.
///
/// Error codes follow the pattern `XPOSE-NNN`.
#[derive(Error, Debug)]
pub enum Error {
    /// A dimension is zero (XPOSE-001).
    #[error("[XPOSE-001] Invalid dimension n{axis}: {value}")]
    InvalidDimension {
        /// One-based axis number.
        axis: usize,
        /// Rejected value.
        value: usize,
    },

    /// The cube's byte length cannot be represented (XPOSE-002).
    #[error("[XPOSE-002] Dimensions ({0}, {1}, {2}) overflow the addressable byte range")]
    DimensionOverflow(usize, usize, usize),

    /// No input file name was provided (XPOSE-003).
    #[error("[XPOSE-003] No input file name provided")]
    MissingInput,

    /// No output file name was provided (XPOSE-004).
    #[error("[XPOSE-004] No output file name provided")]
    MissingOutput,

    /// Unknown algorithm name (XPOSE-005).
    #[error("[XPOSE-005] Invalid algorithm name: {0}")]
    UnknownAlgorithm(String),

    /// Unknown I/O driver name (XPOSE-006).
    #[error("[XPOSE-006] Invalid i/o driver name: {0}")]
    UnknownDriver(String),

    /// The algorithm cannot batch I/O for the requested layouts (XPOSE-007).
    #[error("[XPOSE-007] Algorithm '{algorithm}' cannot convert {from} to {to}")]
    UnsupportedTransform {
        /// Algorithm name.
        algorithm: &'static str,
        /// Source layout name.
        from: &'static str,
        /// Destination layout name.
        to: &'static str,
    },

    /// File is smaller than the cube (XPOSE-008).
    #[error("[XPOSE-008] {role} file is too small for dimensions {dims}: {actual} bytes")]
    FileTooSmall {
        /// File that failed the check.
        role: FileRole,
        /// Dimensions the file was checked against.
        dims: Dimensions,
        /// Actual size in bytes.
        actual: u64,
    },

    /// File is larger than the cube in exact-dimensions mode (XPOSE-009).
    #[error("[XPOSE-009] {role} file is too large for dimensions {dims}: {actual} bytes")]
    FileTooLarge {
        /// File that failed the check.
        role: FileRole,
        /// Dimensions the file was checked against.
        dims: Dimensions,
        /// Actual size in bytes.
        actual: u64,
    },

    /// Opening (or creating) a file failed (XPOSE-010).
    #[error("[XPOSE-010] Unable to {action} {role} file: {source}")]
    Open {
        /// File that failed to open.
        role: FileRole,
        /// What was attempted ("open", "create", "truncate").
        action: &'static str,
        /// Backend error.
        #[source]
        source: io::Error,
    },

    /// Reading file metadata failed (XPOSE-011).
    #[error("[XPOSE-011] Unable to get metadata for {role} file: {source}")]
    Stat {
        /// File being inspected.
        role: FileRole,
        /// Backend error.
        #[source]
        source: io::Error,
    },

    /// Seeking failed (XPOSE-012).
    #[error("[XPOSE-012] Unable to seek to {at} = {byte_offset} in {role} file: {source}")]
    Seek {
        /// File being positioned.
        role: FileRole,
        /// Coordinate being serviced.
        at: Position,
        /// Target byte offset.
        byte_offset: u64,
        /// Backend error.
        #[source]
        source: io::Error,
    },

    /// Reading failed (XPOSE-013).
    #[error("[XPOSE-013] Unable to read {at} from {role} file: {source}")]
    Read {
        /// File being read.
        role: FileRole,
        /// Coordinate being serviced.
        at: Position,
        /// Backend error.
        #[source]
        source: io::Error,
    },

    /// Writing failed (XPOSE-014).
    #[error("[XPOSE-014] Unable to write {at} to {role} file: {source}")]
    Write {
        /// File being written.
        role: FileRole,
        /// Coordinate being serviced.
        at: Position,
        /// Backend error.
        #[source]
        source: io::Error,
    },

    /// Flushing or closing a file failed (XPOSE-015).
    #[error("[XPOSE-015] Unable to close {role} file: {source}")]
    Close {
        /// File being closed.
        role: FileRole,
        /// Backend error.
        #[source]
        source: io::Error,
    },

    /// A read hit end-of-file before the cube was exhausted (XPOSE-016).
    #[error("[XPOSE-016] Unexpected end-of-file on {role} file at {at}")]
    UnexpectedEof {
        /// File being read.
        role: FileRole,
        /// Coordinate being serviced.
        at: Position,
    },

    /// A scratch buffer could not be allocated (XPOSE-017).
    #[error("[XPOSE-017] Unable to allocate {what} of {bytes} bytes")]
    Allocation {
        /// Buffer description.
        what: &'static str,
        /// Requested size in bytes.
        bytes: u64,
    },

    /// Configuration file or environment error (XPOSE-018).
    #[error("[XPOSE-018] Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns the error code (e.g., "XPOSE-001").
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidDimension { .. } => "XPOSE-001",
            Self::DimensionOverflow(..) => "XPOSE-002",
            Self::MissingInput => "XPOSE-003",
            Self::MissingOutput => "XPOSE-004",
            Self::UnknownAlgorithm(_) => "XPOSE-005",
            Self::UnknownDriver(_) => "XPOSE-006",
            Self::UnsupportedTransform { .. } => "XPOSE-007",
            Self::FileTooSmall { .. } => "XPOSE-008",
            Self::FileTooLarge { .. } => "XPOSE-009",
            Self::Open { .. } => "XPOSE-010",
            Self::Stat { .. } => "XPOSE-011",
            Self::Seek { .. } => "XPOSE-012",
            Self::Read { .. } => "XPOSE-013",
            Self::Write { .. } => "XPOSE-014",
            Self::Close { .. } => "XPOSE-015",
            Self::UnexpectedEof { .. } => "XPOSE-016",
            Self::Allocation { .. } => "XPOSE-017",
            Self::Config(_) => "XPOSE-018",
        }
    }

    /// Returns the process exit status for this error.
    ///
    /// I/O failures report the backend's OS error number, allocation failures
    /// report `ENOMEM`, everything else reports `EINVAL`.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Open { source, .. }
            | Self::Stat { source, .. }
            | Self::Seek { source, .. }
            | Self::Read { source, .. }
            | Self::Write { source, .. }
            | Self::Close { source, .. } => source.raw_os_error().unwrap_or(libc::EIO),
            Self::Allocation { .. } => libc::ENOMEM,
            _ => libc::EINVAL,
        }
    }

    /// Returns true if the error was detected before any file was touched.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidDimension { .. }
                | Self::DimensionOverflow(..)
                | Self::MissingInput
                | Self::MissingOutput
                | Self::UnknownAlgorithm(_)
                | Self::UnknownDriver(_)
                | Self::UnsupportedTransform { .. }
                | Self::Config(_)
        )
    }
}
