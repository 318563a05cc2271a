//! Buffered stream backend.
//!
//! Behaves like a stdio stream: reads are served from a read-ahead buffer,
//! writes are collected in a write-behind buffer, and switching direction
//! flushes (or discards) the active buffer while keeping the logical file
//! position.

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use super::{closed_handle, FileHandle, OpenFlags};

/// Capacity of the read-ahead and write-behind buffers.
pub const STREAM_BUFFER_SIZE: usize = 8 * 1024;

#[derive(Debug)]
enum Mode {
    Reading(BufReader<File>),
    Writing(BufWriter<File>),
}

impl Mode {
    fn get_ref(&self) -> &File {
        match self {
            Self::Reading(r) => r.get_ref(),
            Self::Writing(w) => w.get_ref(),
        }
    }
}

/// Buffered file handle.
///
/// A failed direction switch leaves the handle closed; every later call other
/// than `close` then fails with `EBADF`.
#[derive(Debug)]
pub struct StreamFile {
    mode: Option<Mode>,
}

impl StreamFile {
    fn reader(&mut self) -> io::Result<&mut BufReader<File>> {
        if let Some(Mode::Writing(_)) = self.mode {
            self.switch_to_reading()?;
        }
        match &mut self.mode {
            Some(Mode::Reading(reader)) => Ok(reader),
            Some(Mode::Writing(_)) | None => Err(closed_handle()),
        }
    }

    fn writer(&mut self) -> io::Result<&mut BufWriter<File>> {
        if let Some(Mode::Reading(_)) = self.mode {
            self.switch_to_writing()?;
        }
        match &mut self.mode {
            Some(Mode::Writing(writer)) => Ok(writer),
            Some(Mode::Reading(_)) | None => Err(closed_handle()),
        }
    }

    fn switch_to_reading(&mut self) -> io::Result<()> {
        if let Some(Mode::Writing(writer)) = self.mode.take() {
            // into_inner flushes; the descriptor is then at the logical position.
            let file = writer.into_inner().map_err(io::IntoInnerError::into_error)?;
            self.mode = Some(Mode::Reading(BufReader::with_capacity(
                STREAM_BUFFER_SIZE,
                file,
            )));
        }
        Ok(())
    }

    fn switch_to_writing(&mut self) -> io::Result<()> {
        if let Some(Mode::Reading(mut reader)) = self.mode.take() {
            // The descriptor is ahead of the logical position by the unread
            // part of the read-ahead buffer.
            let position = reader.stream_position()?;
            let mut file = reader.into_inner();
            file.seek(SeekFrom::Start(position))?;
            self.mode = Some(Mode::Writing(BufWriter::with_capacity(
                STREAM_BUFFER_SIZE,
                file,
            )));
        }
        Ok(())
    }

    /// Returns true once [`FileHandle::close`] has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.mode.is_none()
    }
}

impl FileHandle for StreamFile {
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
        let mode = if flags.read_only {
            Mode::Reading(BufReader::with_capacity(STREAM_BUFFER_SIZE, file))
        } else {
            Mode::Writing(BufWriter::with_capacity(STREAM_BUFFER_SIZE, file))
        };
        Ok(Self { mode: Some(mode) })
    }

    fn size(&self) -> io::Result<u64> {
        // Like fstat on a stdio stream: bytes still in the write buffer are
        // not counted.
        let mode = self.mode.as_ref().ok_or_else(closed_handle)?;
        Ok(mode.get_ref().metadata()?.len())
    }

    fn seek(&mut self, offset: u64) -> io::Result<u64> {
        match self.mode.as_mut().ok_or_else(closed_handle)? {
            Mode::Reading(reader) => reader.seek(SeekFrom::Start(offset)),
            Mode::Writing(writer) => writer.seek(SeekFrom::Start(offset)),
        }
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader()?.read(buf)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer()?.write(buf)
    }

    fn close(&mut self) -> io::Result<()> {
        match self.mode.take() {
            Some(Mode::Writing(mut writer)) => writer.flush(),
            Some(Mode::Reading(_)) | None => Ok(()),
        }
    }
}
