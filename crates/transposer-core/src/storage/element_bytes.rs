//! Element to bytes views for file I/O.
//!
//! Elements are stored as raw native-endian `f64`, so a scratch buffer can be
//! handed to the backend as bytes without copying.

/// Views an element slice as its raw bytes.
#[inline]
#[must_use]
pub fn elements_as_bytes(elements: &[f64]) -> &[u8] {
    bytemuck::cast_slice(elements)
}

/// Views a mutable element slice as its raw bytes.
#[inline]
pub fn elements_as_bytes_mut(elements: &mut [f64]) -> &mut [u8] {
    bytemuck::cast_slice_mut(elements)
}

/// Decodes a byte buffer into elements.
///
/// Trailing bytes that do not fill a whole element are ignored.
#[must_use]
pub fn bytes_to_elements(bytes: &[u8]) -> Vec<f64> {
    bytes
        .chunks_exact(std::mem::size_of::<f64>())
        .map(|chunk| {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(chunk);
            f64::from_ne_bytes(raw)
        })
        .collect()
}
