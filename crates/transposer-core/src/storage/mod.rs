//! I/O capability and its backends.
//!
//! The engine is written against [`FileHandle`] only. Exactly one backend is
//! chosen per run (see [`DriverKind`]) and used for both files.
//!
//! # Public Types
//!
//! - [`FileHandle`]: open/stat/seek/read/write/close contract
//! - [`OpenFlags`]: how a file is opened
//! - [`DescriptorFile`]: unbuffered, one syscall per call
//! - [`StreamFile`]: buffered stream, switching between read and write buffers
//! - [`DriverKind`]: backend selector

mod descriptor;
pub mod element_bytes;
mod stream;
#[cfg(test)]
mod tests;

use std::fmt;
use std::io;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

pub use descriptor::DescriptorFile;
pub use stream::StreamFile;

/// How a file should be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpenFlags {
    /// Open for reading only; otherwise read + write.
    pub read_only: bool,
    /// Create the file; fails with [`io::ErrorKind::AlreadyExists`] if it exists.
    pub create: bool,
    /// Truncate the file to zero length.
    pub truncate: bool,
}

impl OpenFlags {
    /// Existing file, read only.
    #[must_use]
    pub const fn read_only() -> Self {
        Self {
            read_only: true,
            create: false,
            truncate: false,
        }
    }

    /// Existing file, read + write, contents kept.
    #[must_use]
    pub const fn read_write() -> Self {
        Self {
            read_only: false,
            create: false,
            truncate: false,
        }
    }

    /// New file, read + write.
    #[must_use]
    pub const fn create_new() -> Self {
        Self {
            read_only: false,
            create: true,
            truncate: false,
        }
    }

    /// Returns these flags with truncation requested.
    #[must_use]
    pub const fn truncated(self) -> Self {
        Self {
            truncate: true,
            ..self
        }
    }
}

/// Uniform file contract the conversion engine is built against.
///
/// `read` and `write` follow the usual convention: `Ok(0)` from `read` means
/// end-of-file, short counts are allowed, and every failure is an `Err`.
/// `close` is idempotent; any call other than `close` on a closed handle fails
/// with `EBADF`.
pub trait FileHandle: Sized {
    /// Opens `path` according to `flags`.
    ///
    /// # Errors
    ///
    /// Returns the backend error; an existing file with `flags.create` set
    /// yields [`io::ErrorKind::AlreadyExists`].
    fn open(path: &Path, flags: OpenFlags) -> io::Result<Self>;

    /// Current size of the file in bytes.
    ///
    /// # Errors
    ///
    /// Returns the backend error if metadata cannot be read.
    fn size(&self) -> io::Result<u64>;

    /// Moves to absolute byte `offset`, returning the new position.
    ///
    /// # Errors
    ///
    /// Returns the backend error if the seek fails.
    fn seek(&mut self, offset: u64) -> io::Result<u64>;

    /// Reads up to `buf.len()` bytes.
    ///
    /// # Errors
    ///
    /// Returns the backend error if the read fails.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Writes up to `buf.len()` bytes.
    ///
    /// # Errors
    ///
    /// Returns the backend error if the write fails.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Flushes pending data and releases the file.
    ///
    /// # Errors
    ///
    /// Returns the backend error if buffered data cannot be flushed.
    fn close(&mut self) -> io::Result<()>;
}

pub(crate) fn closed_handle() -> io::Error {
    io::Error::from_raw_os_error(libc::EBADF)
}

/// Selects the [`FileHandle`] implementation for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DriverKind {
    /// [`DescriptorFile`].
    #[default]
    #[serde(rename = "fd", alias = "descriptor")]
    Descriptor,
    /// [`StreamFile`].
    #[serde(rename = "stream", alias = "buffered-stream", alias = "buffered_stream")]
    Stream,
}

impl DriverKind {
    /// All drivers, in the order they are listed to users.
    pub const ALL: [DriverKind; 2] = [DriverKind::Descriptor, DriverKind::Stream];

    /// Short name used on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Descriptor => "fd",
            Self::Stream => "stream",
        }
    }

    const fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Descriptor => &["fd", "descriptor"],
            Self::Stream => &["stream", "buffered-stream", "buffered_stream"],
        }
    }
}

impl fmt::Display for DriverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DriverKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.aliases().iter().any(|a| a.eq_ignore_ascii_case(s)))
            .ok_or_else(|| Error::UnknownDriver(s.to_string()))
    }
}
