//! Input initializer.
//!
//! Fills a freshly truncated input file with self-describing values using the
//! same traversal and buffering as the selected algorithm. Writes are purely
//! sequential (no seeks), so after `n` elements the file position is `8·n`.
//!
//! The value generated for `(i, j, k)` is its JKI offset, except under
//! `ijk_map`, which seeds with the IJK offset instead. Traversals that visit
//! coordinates in increasing JKI order (`jki_map`, `vector_input`, `matrix`)
//! therefore produce a file whose element `p` holds `p`.

use std::slice;

use tracing::debug;

use crate::algorithm::Algorithm;
use crate::engine::{allocate_scratch, IoStats, TrackedFile};
use crate::error::{FileRole, Position, Result};
use crate::layout::{Dimensions, Layout};
use crate::storage::FileHandle;

/// Layout whose offsets are written as values when seeding with `algorithm`.
#[must_use]
pub const fn seed_layout(algorithm: Algorithm) -> Layout {
    match algorithm {
        Algorithm::IjkMap => Layout::Ijk,
        _ => Layout::Jki,
    }
}

/// Writes the whole cube of generated values to `file` from its current
/// position.
///
/// # Errors
///
/// Returns [`Error::Allocation`](crate::Error::Allocation) before writing if
/// scratch storage is unavailable, or the first write failure.
pub fn initialize<H: FileHandle>(
    file: &mut H,
    dims: &Dimensions,
    algorithm: Algorithm,
) -> Result<IoStats> {
    let seed = seed_layout(algorithm);
    debug!(%algorithm, %seed, %dims, "seeding input");

    let mut target = TrackedFile::new(file, FileRole::Input);
    match algorithm {
        Algorithm::IjkMap => seed_elements(&mut target, dims, seed, Layout::Ijk)?,
        Algorithm::JkiMap => seed_elements(&mut target, dims, seed, Layout::Jki)?,
        Algorithm::JikMap => seed_elements(&mut target, dims, seed, Layout::Jik)?,
        Algorithm::VectorInput => seed_runs(&mut target, dims, seed)?,
        Algorithm::VectorOutput => seed_rows(&mut target, dims, seed)?,
        Algorithm::Matrix => seed_planes(&mut target, dims, seed)?,
    }
    Ok(target.stats())
}

fn seed_value(seed: Layout, dims: &Dimensions, i: usize, j: usize, k: usize) -> f64 {
    seed.offset(dims, i, j, k) as f64
}

fn seed_elements<H: FileHandle>(
    target: &mut TrackedFile<'_, H>,
    dims: &Dimensions,
    seed: Layout,
    nesting: Layout,
) -> Result<()> {
    nesting.traverse(dims, |i, j, k| {
        let value = seed_value(seed, dims, i, j, k);
        target.write_elements(slice::from_ref(&value), Position::Element { i, j, k })
    })
}

fn seed_runs<H: FileHandle>(
    target: &mut TrackedFile<'_, H>,
    dims: &Dimensions,
    seed: Layout,
) -> Result<()> {
    let mut run = allocate_scratch(dims.n0(), "init vector")?;
    for j in 0..dims.n1() {
        for k in 0..dims.n2() {
            for (i, slot) in run.iter_mut().enumerate() {
                *slot = seed_value(seed, dims, i, j, k);
            }
            target.write_elements(&run, Position::Run { j, k })?;
        }
    }
    Ok(())
}

fn seed_rows<H: FileHandle>(
    target: &mut TrackedFile<'_, H>,
    dims: &Dimensions,
    seed: Layout,
) -> Result<()> {
    let mut row = allocate_scratch(dims.n2(), "init vector")?;
    for j in 0..dims.n1() {
        for i in 0..dims.n0() {
            for (k, slot) in row.iter_mut().enumerate() {
                *slot = seed_value(seed, dims, i, j, k);
            }
            target.write_elements(&row, Position::Row { i, j })?;
        }
    }
    Ok(())
}

fn seed_planes<H: FileHandle>(
    target: &mut TrackedFile<'_, H>,
    dims: &Dimensions,
    seed: Layout,
) -> Result<()> {
    let mut plane = allocate_scratch(dims.plane_len(), "init matrix")?;
    for j in 0..dims.n1() {
        for i in 0..dims.n0() {
            for k in 0..dims.n2() {
                plane[Layout::Jki.plane_index(dims, i, k)] = seed_value(seed, dims, i, j, k);
            }
        }
        target.write_elements(&plane, Position::Block { j })?;
    }
    Ok(())
}
