//! Conversion engine.
//!
//! All six algorithms perform the same semantic transform: the value stored at
//! `transform.source.offset(i, j, k)` in the input is written at
//! `transform.destination.offset(i, j, k)` in the output, for every coordinate
//! of the cube. They differ only in the loop nesting that drives the seeks and
//! in how many elements one I/O call moves.
//!
//! | Algorithm       | Nesting          | Batching                          |
//! |-----------------|------------------|-----------------------------------|
//! | `ijk_map`       | i, j, k          | 1 element                         |
//! | `jki_map`       | j, k, i          | 1 element                         |
//! | `jik_map`       | j, i, k          | 1 element                         |
//! | `vector_input`  | j, k; i inner    | `n0` run read, scattered writes   |
//! | `vector_output` | j, i; k inner    | scattered reads, `n2` run written |
//! | `matrix`        | j                | `n0 x n2` block read and written  |

mod map;
mod matrix;
mod vector;

use std::io;
use std::ops::AddAssign;

use tracing::{debug, info};

use crate::algorithm::Algorithm;
use crate::error::{Error, FileRole, Position, Result};
use crate::layout::{Dimensions, Layout, Transform, ELEMENT_SIZE};
use crate::storage::element_bytes::{elements_as_bytes, elements_as_bytes_mut};
use crate::storage::FileHandle;
use crate::util::format_bytes;

/// Requests the engine issued against one file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IoStats {
    /// Seek requests.
    pub seeks: u64,
    /// Read requests (one per element, run, row or block).
    pub reads: u64,
    /// Write requests (one per element, run, row or block).
    pub writes: u64,
    /// Bytes read.
    pub bytes_read: u64,
    /// Bytes written.
    pub bytes_written: u64,
}

impl AddAssign for IoStats {
    fn add_assign(&mut self, rhs: Self) {
        self.seeks += rhs.seeks;
        self.reads += rhs.reads;
        self.writes += rhs.writes;
        self.bytes_read += rhs.bytes_read;
        self.bytes_written += rhs.bytes_written;
    }
}

/// Per-file counters of one conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferStats {
    /// Requests against the input file.
    pub input: IoStats,
    /// Requests against the output file.
    pub output: IoStats,
}

/// A file handle paired with its role and request counters.
///
/// Turns backend errors into [`Error`] values tagged with the coordinate being
/// serviced.
pub(crate) struct TrackedFile<'a, H> {
    file: &'a mut H,
    role: FileRole,
    stats: IoStats,
}

impl<'a, H: FileHandle> TrackedFile<'a, H> {
    pub(crate) fn new(file: &'a mut H, role: FileRole) -> Self {
        Self {
            file,
            role,
            stats: IoStats::default(),
        }
    }

    pub(crate) fn stats(&self) -> IoStats {
        self.stats
    }

    pub(crate) fn seek_to(&mut self, byte_offset: u64, at: Position) -> Result<()> {
        self.stats.seeks += 1;
        self.file
            .seek(byte_offset)
            .map(|_| ())
            .map_err(|source| Error::Seek {
                role: self.role,
                at,
                byte_offset,
                source,
            })
    }

    /// Fills `elements` completely, retrying short reads.
    pub(crate) fn read_elements(&mut self, elements: &mut [f64], at: Position) -> Result<()> {
        self.stats.reads += 1;
        let bytes = elements_as_bytes_mut(elements);
        let mut filled = 0;
        while filled < bytes.len() {
            match self.file.read(&mut bytes[filled..]) {
                Ok(0) => {
                    return Err(Error::UnexpectedEof {
                        role: self.role,
                        at,
                    })
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(source) => {
                    return Err(Error::Read {
                        role: self.role,
                        at,
                        source,
                    })
                }
            }
        }
        self.stats.bytes_read += filled as u64;
        Ok(())
    }

    /// Writes all of `elements`, retrying short writes.
    pub(crate) fn write_elements(&mut self, elements: &[f64], at: Position) -> Result<()> {
        self.stats.writes += 1;
        let bytes = elements_as_bytes(elements);
        let mut written = 0;
        while written < bytes.len() {
            match self.file.write(&bytes[written..]) {
                Ok(0) => {
                    return Err(Error::Write {
                        role: self.role,
                        at,
                        source: io::Error::from(io::ErrorKind::WriteZero),
                    })
                }
                Ok(n) => written += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(source) => {
                    return Err(Error::Write {
                        role: self.role,
                        at,
                        source,
                    })
                }
            }
        }
        self.stats.bytes_written += written as u64;
        Ok(())
    }
}

/// Allocates a zeroed scratch buffer of `len` elements.
///
/// Allocation failure is reported as [`Error::Allocation`] instead of aborting.
pub(crate) fn allocate_scratch(len: usize, what: &'static str) -> Result<Vec<f64>> {
    let bytes = len as u64 * ELEMENT_SIZE;
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| Error::Allocation { what, bytes })?;
    buffer.resize(len, 0.0);
    info!(size = %format_bytes(bytes), "{what} allocated");
    Ok(buffer)
}

/// Converts the whole cube from `input` to `output` using `algorithm`.
///
/// The output is written only at the offsets the destination layout assigns;
/// nothing is truncated, so a fresh output may be sparse until complete.
///
/// # Errors
///
/// Returns [`Error::UnsupportedTransform`] before any I/O if the algorithm
/// cannot batch for `transform`, [`Error::Allocation`] if scratch storage is
/// unavailable, and the first seek/read/write failure otherwise. Output already
/// written is left in place.
pub fn convert<H: FileHandle>(
    input: &mut H,
    output: &mut H,
    dims: &Dimensions,
    algorithm: Algorithm,
    transform: Transform,
) -> Result<TransferStats> {
    algorithm.check_transform(transform)?;
    debug!(%algorithm, %transform, %dims, "starting conversion");

    let mut source = TrackedFile::new(input, FileRole::Input);
    let mut destination = TrackedFile::new(output, FileRole::Output);

    match algorithm {
        Algorithm::IjkMap => {
            map::convert_elements(&mut source, &mut destination, dims, transform, Layout::Ijk)?;
        }
        Algorithm::JkiMap => {
            map::convert_elements(&mut source, &mut destination, dims, transform, Layout::Jki)?;
        }
        Algorithm::JikMap => {
            map::convert_elements(&mut source, &mut destination, dims, transform, Layout::Jik)?;
        }
        Algorithm::VectorInput => {
            vector::convert_input_runs(&mut source, &mut destination, dims, transform)?;
        }
        Algorithm::VectorOutput => {
            vector::convert_output_rows(&mut source, &mut destination, dims, transform)?;
        }
        Algorithm::Matrix => {
            matrix::convert_planes(&mut source, &mut destination, dims, transform)?;
        }
    }

    Ok(TransferStats {
        input: source.stats(),
        output: destination.stats(),
    })
}
