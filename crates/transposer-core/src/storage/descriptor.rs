//! Unbuffered descriptor backend.
//!
//! Every trait call maps to exactly one open/fstat/lseek/read/write/close on
//! the underlying [`File`].

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use super::{closed_handle, FileHandle, OpenFlags};

/// Unbuffered file handle.
#[derive(Debug)]
pub struct DescriptorFile {
    file: Option<File>,
}

impl DescriptorFile {
    fn file(&self) -> io::Result<&File> {
        self.file.as_ref().ok_or_else(closed_handle)
    }

    fn file_mut(&mut self) -> io::Result<&mut File> {
        self.file.as_mut().ok_or_else(closed_handle)
    }

    /// Returns true once [`FileHandle::close`] has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.file.is_none()
    }
}

impl FileHandle for DescriptorFile {
    fn open(path: &Path, flags: OpenFlags) -> io::Result<Self> {
        let mut options = OpenOptions::new();
        options.read(true).write(!flags.read_only);
        if flags.create {
            options.create_new(true);
        }
        if flags.truncate {
            options.truncate(true);
        }
        let file = options.open(path)?;
        Ok(Self { file: Some(file) })
    }

    fn size(&self) -> io::Result<u64> {
        Ok(self.file()?.metadata()?.len())
    }

    fn seek(&mut self, offset: u64) -> io::Result<u64> {
        self.file_mut()?.seek(SeekFrom::Start(offset))
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file_mut()?.read(buf)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file_mut()?.write(buf)
    }

    fn close(&mut self) -> io::Result<()> {
        // Dropping the File closes the descriptor.
        self.file.take();
        Ok(())
    }
}
