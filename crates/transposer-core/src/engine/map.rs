//! Element-wise algorithms (`ijk_map`, `jki_map`, `jik_map`).

use crate::error::{Position, Result};
use crate::layout::{Dimensions, Layout, Transform};
use crate::storage::FileHandle;

use super::TrackedFile;

/// Moves one element per seek/read/seek/write, visiting coordinates in the
/// loop order given by `nesting`.
pub(super) fn convert_elements<H: FileHandle>(
    input: &mut TrackedFile<'_, H>,
    output: &mut TrackedFile<'_, H>,
    dims: &Dimensions,
    transform: Transform,
    nesting: Layout,
) -> Result<()> {
    let mut value = [0.0f64];
    nesting.traverse(dims, |i, j, k| {
        let at = Position::Element { i, j, k };
        input.seek_to(transform.source.byte_offset(dims, i, j, k), at)?;
        input.read_elements(&mut value, at)?;
        output.seek_to(transform.destination.byte_offset(dims, i, j, k), at)?;
        output.write_elements(&value, at)
    })
}
