//! One-dimensional buffering (`vector_input`, `vector_output`).

use std::slice;

use crate::error::{Position, Result};
use crate::layout::{Dimensions, Transform};
use crate::storage::FileHandle;

use super::{allocate_scratch, TrackedFile};

/// Reads each `(j, k)` run of `n0` elements with one request, then scatters it
/// to the output element by element.
///
/// Requires a source layout contiguous in `i`.
pub(super) fn convert_input_runs<H: FileHandle>(
    input: &mut TrackedFile<'_, H>,
    output: &mut TrackedFile<'_, H>,
    dims: &Dimensions,
    transform: Transform,
) -> Result<()> {
    let mut run = allocate_scratch(dims.n0(), "read vector")?;

    for j in 0..dims.n1() {
        for k in 0..dims.n2() {
            let at = Position::Run { j, k };
            input.seek_to(transform.source.byte_offset(dims, 0, j, k), at)?;
            input.read_elements(&mut run, at)?;

            for (i, value) in run.iter().enumerate() {
                let at = Position::Element { i, j, k };
                output.seek_to(transform.destination.byte_offset(dims, i, j, k), at)?;
                output.write_elements(slice::from_ref(value), at)?;
            }
        }
    }
    Ok(())
}

/// Gathers each `(i, j)` row of `n2` elements with per-element reads, then
/// writes it to the output with one request.
///
/// Requires a destination layout contiguous in `k`.
pub(super) fn convert_output_rows<H: FileHandle>(
    input: &mut TrackedFile<'_, H>,
    output: &mut TrackedFile<'_, H>,
    dims: &Dimensions,
    transform: Transform,
) -> Result<()> {
    let mut row = allocate_scratch(dims.n2(), "write vector")?;

    for j in 0..dims.n1() {
        for i in 0..dims.n0() {
            for (k, slot) in row.iter_mut().enumerate() {
                let at = Position::Element { i, j, k };
                input.seek_to(transform.source.byte_offset(dims, i, j, k), at)?;
                input.read_elements(slice::from_mut(slot), at)?;
            }

            let at = Position::Row { i, j };
            output.seek_to(transform.destination.byte_offset(dims, i, j, 0), at)?;
            output.write_elements(&row, at)?;
        }
    }
    Ok(())
}
