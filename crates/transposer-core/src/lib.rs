//! # `transposer` Core
//!
//! Out-of-core reordering of dense three-dimensional `f64` arrays stored as
//! flat binary files.
//!
//! A cube of extents `(n0, n1, n2)` stored in one linear layout (JKI by
//! default) is rewritten into another (JIK by default) without ever holding
//! the whole cube in memory. Six interchangeable algorithms trade memory for
//! I/O locality, and two interchangeable backends (unbuffered descriptor,
//! buffered stream) carry the bytes. All combinations produce byte-identical
//! output.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use transposer_core::{pipeline, Algorithm, Dimensions, Job};
//!
//! let mut job = Job::new(Dimensions::new(512, 64, 512)?);
//! job.input = Some("cube.jki".into());
//! job.output = Some("cube.jik".into());
//! job.algorithm = Algorithm::Matrix;
//!
//! let report = pipeline::run(&job)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
// =============================================================================
// NUMERIC CAST LINTS
// =============================================================================
// Offsets are computed in usize and stored as f64 seed values; the cube's byte
// length is checked once in Dimensions::new, so the casts below cannot wrap.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_lossless)]
// =============================================================================
// STYLISTIC LINTS
// =============================================================================
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::similar_names)]

pub mod algorithm;
#[cfg(test)]
mod algorithm_tests;
pub mod config;
pub mod engine;
pub mod error;
pub mod init;
pub mod layout;
pub mod pipeline;
pub mod sizing;
pub mod storage;
#[cfg(test)]
mod test_support;
pub mod util;

pub use algorithm::{Algorithm, Batching};
pub use config::{ConfigError, TransposerConfig};
pub use engine::{convert, IoStats, TransferStats};
pub use error::{Error, FileRole, Position, Result};
pub use init::initialize;
pub use layout::{Dimensions, Layout, Transform, ELEMENT_SIZE};
pub use pipeline::{run, Job, PhaseReport, RunReport};
pub use sizing::SizePolicy;
pub use storage::{DescriptorFile, DriverKind, FileHandle, OpenFlags, StreamFile};
