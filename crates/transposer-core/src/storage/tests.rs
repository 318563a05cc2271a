//! Tests for the storage backends.

use std::io::ErrorKind;
use std::path::Path;

use tempfile::TempDir;

use super::*;

fn write_all<H: FileHandle>(handle: &mut H, mut bytes: &[u8]) {
    while !bytes.is_empty() {
        let n = handle.write(bytes).expect("write");
        assert!(n > 0, "write returned 0");
        bytes = &bytes[n..];
    }
}

fn read_exact<H: FileHandle>(handle: &mut H, buf: &mut [u8]) {
    let mut filled = 0;
    while filled < buf.len() {
        let n = handle.read(&mut buf[filled..]).expect("read");
        assert!(n > 0, "unexpected EOF");
        filled += n;
    }
}

fn create_then_reopen_exists<H: FileHandle>(path: &Path) {
    // Arrange
    let mut first = H::open(path, OpenFlags::create_new()).expect("create");
    first.close().expect("close");

    // Act
    let second = H::open(path, OpenFlags::create_new());

    // Assert
    let err = second.err().expect("second create must fail");
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
}

#[test]
fn test_descriptor_create_existing_reports_already_exists() {
    let dir = TempDir::new().unwrap();
    create_then_reopen_exists::<DescriptorFile>(&dir.path().join("a.bin"));
}

#[test]
fn test_stream_create_existing_reports_already_exists() {
    let dir = TempDir::new().unwrap();
    create_then_reopen_exists::<StreamFile>(&dir.path().join("a.bin"));
}

fn seek_write_read_roundtrip<H: FileHandle>(path: &Path) {
    // Arrange
    let mut handle = H::open(path, OpenFlags::create_new()).expect("create");

    // Act - write out of order, leaving a hole at the front
    assert_eq!(handle.seek(16).expect("seek"), 16);
    write_all(&mut handle, &[3u8; 8]);
    assert_eq!(handle.seek(0).expect("seek"), 0);
    write_all(&mut handle, &[1u8; 8]);
    handle.close().expect("close");

    let mut reader = H::open(path, OpenFlags::read_only()).expect("open");
    let mut buf = [0u8; 24];
    read_exact(&mut reader, &mut buf);

    // Assert
    assert_eq!(reader.size().expect("size"), 24);
    assert_eq!(&buf[..8], &[1u8; 8]);
    assert_eq!(&buf[8..16], &[0u8; 8]);
    assert_eq!(&buf[16..], &[3u8; 8]);
    assert_eq!(reader.read(&mut buf).expect("read at EOF"), 0);
}

#[test]
fn test_descriptor_seek_write_read_roundtrip() {
    let dir = TempDir::new().unwrap();
    seek_write_read_roundtrip::<DescriptorFile>(&dir.path().join("a.bin"));
}

#[test]
fn test_stream_seek_write_read_roundtrip() {
    let dir = TempDir::new().unwrap();
    seek_write_read_roundtrip::<StreamFile>(&dir.path().join("a.bin"));
}

fn close_is_idempotent<H: FileHandle>(path: &Path) {
    let mut handle = H::open(path, OpenFlags::create_new()).expect("create");
    handle.close().expect("first close");
    handle.close().expect("second close");

    let err = handle.seek(0).expect_err("seek on closed handle");
    assert_eq!(err.raw_os_error(), Some(libc::EBADF));
    let err = handle.size().expect_err("size on closed handle");
    assert_eq!(err.raw_os_error(), Some(libc::EBADF));
}

#[test]
fn test_descriptor_close_is_idempotent() {
    let dir = TempDir::new().unwrap();
    close_is_idempotent::<DescriptorFile>(&dir.path().join("a.bin"));
}

#[test]
fn test_stream_close_is_idempotent() {
    let dir = TempDir::new().unwrap();
    close_is_idempotent::<StreamFile>(&dir.path().join("a.bin"));
}

#[test]
fn test_open_missing_file_reports_not_found() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.bin");

    let err = DescriptorFile::open(&path, OpenFlags::read_only()).expect_err("descriptor");
    assert_eq!(err.kind(), ErrorKind::NotFound);
    let err = StreamFile::open(&path, OpenFlags::read_only()).expect_err("stream");
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_truncate_discards_existing_content() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.bin");
    std::fs::write(&path, [9u8; 32]).unwrap();

    let mut handle =
        StreamFile::open(&path, OpenFlags::read_write().truncated()).expect("truncate");
    assert_eq!(handle.size().unwrap(), 0);
    handle.close().unwrap();
}

#[test]
fn test_stream_switching_direction_keeps_position() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.bin");
    std::fs::write(&path, (0u8..64).collect::<Vec<_>>()).unwrap();
    let mut handle = StreamFile::open(&path, OpenFlags::read_write()).expect("open");

    // Act - read 4 bytes (fills the read-ahead), then write, then read again
    let mut head = [0u8; 4];
    handle.read(&mut head).unwrap();
    write_all(&mut handle, &[0xAA; 4]);
    let mut next = [0u8; 4];
    read_exact(&mut handle, &mut next);
    handle.close().unwrap();

    // Assert
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(head, [0, 1, 2, 3]);
    assert_eq!(&bytes[4..8], &[0xAA; 4]);
    assert_eq!(next, [8, 9, 10, 11]);
    assert_eq!(bytes.len(), 64);
}

#[test]
fn test_stream_buffers_writes_until_close() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.bin");
    let mut handle = StreamFile::open(&path, OpenFlags::create_new()).unwrap();

    write_all(&mut handle, &[1u8; 16]);
    assert_eq!(handle.size().unwrap(), 0);
    handle.close().unwrap();

    assert_eq!(std::fs::metadata(&path).unwrap().len(), 16);
}

#[test]
fn test_descriptor_writes_are_immediate() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.bin");
    let mut handle = DescriptorFile::open(&path, OpenFlags::create_new()).unwrap();

    write_all(&mut handle, &[1u8; 16]);

    assert_eq!(handle.size().unwrap(), 16);
    assert!(!handle.is_closed());
}

// -------------------------------------------------------------------------
// DriverKind
// -------------------------------------------------------------------------

#[test]
fn test_driver_default_is_descriptor() {
    assert_eq!(DriverKind::default(), DriverKind::Descriptor);
}

#[test]
fn test_driver_parse_accepts_aliases_case_insensitively() {
    assert_eq!("fd".parse::<DriverKind>().unwrap(), DriverKind::Descriptor);
    assert_eq!("FD".parse::<DriverKind>().unwrap(), DriverKind::Descriptor);
    assert_eq!(
        "descriptor".parse::<DriverKind>().unwrap(),
        DriverKind::Descriptor
    );
    assert_eq!("Stream".parse::<DriverKind>().unwrap(), DriverKind::Stream);
    assert_eq!(
        "buffered-stream".parse::<DriverKind>().unwrap(),
        DriverKind::Stream
    );
}

#[test]
fn test_driver_parse_rejects_unknown() {
    let err = "mmap".parse::<DriverKind>().unwrap_err();
    assert_eq!(err.code(), "XPOSE-006");
    assert!(err.to_string().contains("mmap"));
}

#[test]
fn test_driver_display_uses_short_name() {
    assert_eq!(DriverKind::Descriptor.to_string(), "fd");
    assert_eq!(DriverKind::Stream.to_string(), "stream");
}
