//! Two-dimensional buffering (`matrix`).
//!
//! For plane-major layouts every j-plane is one contiguous `n0 x n2` block in
//! both files, so the whole plane moves with one read and one write and the
//! reordering happens in memory.

use tracing::trace;

use crate::error::{Position, Result};
use crate::layout::{Dimensions, Transform};
use crate::storage::FileHandle;

use super::{allocate_scratch, TrackedFile};

pub(super) fn convert_planes<H: FileHandle>(
    input: &mut TrackedFile<'_, H>,
    output: &mut TrackedFile<'_, H>,
    dims: &Dimensions,
    transform: Transform,
) -> Result<()> {
    let mut source_plane = allocate_scratch(dims.plane_len(), "read matrix")?;
    let mut destination_plane = allocate_scratch(dims.plane_len(), "write matrix")?;

    for j in 0..dims.n1() {
        let at = Position::Block { j };
        input.seek_to(transform.source.byte_offset(dims, 0, j, 0), at)?;
        input.read_elements(&mut source_plane, at)?;

        reorder_plane(dims, transform, &source_plane, &mut destination_plane);

        output.seek_to(transform.destination.byte_offset(dims, 0, j, 0), at)?;
        output.write_elements(&destination_plane, at)?;
        trace!(j, "plane written");
    }
    Ok(())
}

/// Moves every `(i, k)` of one plane from its source slot to its destination
/// slot. For JKI to JIK this is `to[i·n2 + k] = from[k·n0 + i]`.
pub(super) fn reorder_plane(dims: &Dimensions, transform: Transform, from: &[f64], to: &mut [f64]) {
    debug_assert_eq!(from.len(), dims.plane_len());
    debug_assert_eq!(to.len(), dims.plane_len());

    for i in 0..dims.n0() {
        for k in 0..dims.n2() {
            to[transform.destination.plane_index(dims, i, k)] =
                from[transform.source.plane_index(dims, i, k)];
        }
    }
}
