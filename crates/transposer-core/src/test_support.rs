//! In-memory [`FileHandle`] double with fault injection.

use std::io;
use std::path::Path;

use crate::layout::Dimensions;
use crate::storage::FileHandle;

/// A growable byte vector behind the [`FileHandle`] contract.
///
/// Faults are armed by request number (1-based) and fire once.
#[derive(Debug, Default)]
pub(crate) struct MemoryFile {
    pub(crate) bytes: Vec<u8>,
    pub(crate) position: usize,
    /// Every call other than `close` fails with `EBADF`.
    pub(crate) closed: bool,
    /// Return at most this many bytes per read/write call.
    pub(crate) max_chunk: Option<usize>,
    /// Fail the n-th write call with `ENOSPC`.
    pub(crate) fail_write_at: Option<u64>,
    /// Fail the n-th read call with `EIO`.
    pub(crate) fail_read_at: Option<u64>,
    /// Fail the n-th seek call with `EINVAL`.
    pub(crate) fail_seek_at: Option<u64>,
    /// Return `Interrupted` once before every successful read/write.
    pub(crate) interrupt: bool,
    pub(crate) interrupted: bool,
    pub(crate) writes: u64,
    pub(crate) reads: u64,
    pub(crate) seeks: u64,
}

impl MemoryFile {
    pub(crate) fn with_elements(values: &[f64]) -> Self {
        Self {
            bytes: values.iter().flat_map(|v| v.to_ne_bytes()).collect(),
            ..Self::default()
        }
    }

    /// Input file whose element `p` holds `p`.
    pub(crate) fn sequential(dims: &Dimensions) -> Self {
        let values: Vec<f64> = (0..dims.element_count()).map(|p| p as f64).collect();
        Self::with_elements(&values)
    }

    pub(crate) fn elements(&self) -> Vec<f64> {
        crate::storage::element_bytes::bytes_to_elements(&self.bytes)
    }

    fn chunk(&self, len: usize) -> usize {
        self.max_chunk.map_or(len, |max| len.min(max))
    }

    fn interrupt_once(&mut self) -> io::Result<()> {
        if self.interrupt && !self.interrupted {
            self.interrupted = true;
            return Err(io::Error::from(io::ErrorKind::Interrupted));
        }
        self.interrupted = false;
        Ok(())
    }

    fn check_open(&self) -> io::Result<()> {
        if self.closed {
            Err(io::Error::from_raw_os_error(libc::EBADF))
        } else {
            Ok(())
        }
    }
}

impl FileHandle for MemoryFile {
    fn open(_path: &Path, _flags: crate::storage::OpenFlags) -> io::Result<Self> {
        Err(io::Error::from(io::ErrorKind::Unsupported))
    }

    fn size(&self) -> io::Result<u64> {
        self.check_open()?;
        Ok(self.bytes.len() as u64)
    }

    fn seek(&mut self, offset: u64) -> io::Result<u64> {
        self.check_open()?;
        self.seeks += 1;
        if self.fail_seek_at == Some(self.seeks) {
            return Err(io::Error::from_raw_os_error(libc::EINVAL));
        }
        self.position = offset as usize;
        Ok(offset)
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.check_open()?;
        self.interrupt_once()?;
        self.reads += 1;
        if self.fail_read_at == Some(self.reads) {
            return Err(io::Error::from_raw_os_error(libc::EIO));
        }
        let available = self.bytes.len().saturating_sub(self.position);
        let n = self.chunk(buf.len()).min(available);
        buf[..n].copy_from_slice(&self.bytes[self.position..self.position + n]);
        self.position += n;
        Ok(n)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.check_open()?;
        self.interrupt_once()?;
        self.writes += 1;
        if self.fail_write_at == Some(self.writes) {
            return Err(io::Error::from_raw_os_error(libc::ENOSPC));
        }
        let n = self.chunk(buf.len());
        let end = self.position + n;
        if self.bytes.len() < end {
            self.bytes.resize(end, 0);
        }
        self.bytes[self.position..end].copy_from_slice(&buf[..n]);
        self.position = end;
        Ok(n)
    }

    fn close(&mut self) -> io::Result<()> {
        self.closed = true;
        Ok(())
    }
}
