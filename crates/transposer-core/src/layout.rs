//! Layout/offset model.
//!
//! A [`Layout`] is a bijection from the index cube `[0,n0)×[0,n1)×[0,n2)` onto
//! the flat element range `[0, n0·n1·n2)`. Element `e` of a file lives at byte
//! address `e · ELEMENT_SIZE`; files carry no header.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Size in bytes of one stored element (`f64`, native byte order).
pub const ELEMENT_SIZE: u64 = std::mem::size_of::<f64>() as u64;

/// Extents of the three axes, validated non-zero at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    n: [usize; 3],
}

impl Dimensions {
    /// Creates dimensions `(n0, n1, n2)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if any axis is zero and
    /// [`Error::DimensionOverflow`] if the cube's byte length does not fit in
    /// `u64`/`usize`.
    pub fn new(n0: usize, n1: usize, n2: usize) -> Result<Self> {
        for (axis, value) in [n0, n1, n2].into_iter().enumerate() {
            if value == 0 {
                return Err(Error::InvalidDimension {
                    axis: axis + 1,
                    value,
                });
            }
        }

        let overflow = || Error::DimensionOverflow(n0, n1, n2);
        let elements = n0
            .checked_mul(n1)
            .and_then(|v| v.checked_mul(n2))
            .ok_or_else(overflow)?;
        // Byte length must be addressable both as a file offset and in memory.
        elements
            .checked_mul(std::mem::size_of::<f64>())
            .ok_or_else(overflow)?;
        u64::try_from(elements)
            .ok()
            .and_then(|e| e.checked_mul(ELEMENT_SIZE))
            .ok_or_else(overflow)?;

        Ok(Self { n: [n0, n1, n2] })
    }

    /// Extent of axis 0 (index `i`).
    #[inline]
    #[must_use]
    pub const fn n0(&self) -> usize {
        self.n[0]
    }

    /// Extent of axis 1 (index `j`).
    #[inline]
    #[must_use]
    pub const fn n1(&self) -> usize {
        self.n[1]
    }

    /// Extent of axis 2 (index `k`).
    #[inline]
    #[must_use]
    pub const fn n2(&self) -> usize {
        self.n[2]
    }

    /// Number of elements in the cube.
    #[inline]
    #[must_use]
    pub const fn element_count(&self) -> usize {
        self.n[0] * self.n[1] * self.n[2]
    }

    /// Number of elements in one j-plane (`n0 · n2`).
    #[inline]
    #[must_use]
    pub const fn plane_len(&self) -> usize {
        self.n[0] * self.n[2]
    }

    /// Expected file length in bytes (`8 · n0 · n1 · n2`).
    #[inline]
    #[must_use]
    pub const fn byte_len(&self) -> u64 {
        self.element_count() as u64 * ELEMENT_SIZE
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.n[0], self.n[1], self.n[2])
    }
}

/// Linear storage ordering of the cube.
///
/// The name lists the axes from slowest to fastest varying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    /// `i·n2·n1 + j·n2 + k`
    Ijk,
    /// `j·n0·n2 + k·n0 + i`
    Jki,
    /// `j·n0·n2 + i·n2 + k`
    Jik,
}

impl Layout {
    /// All supported layouts.
    pub const ALL: [Layout; 3] = [Layout::Ijk, Layout::Jki, Layout::Jik];

    /// Canonical upper-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ijk => "IJK",
            Self::Jki => "JKI",
            Self::Jik => "JIK",
        }
    }

    /// Flat element index of `(i, j, k)`.
    #[inline]
    #[must_use]
    pub fn offset(self, dims: &Dimensions, i: usize, j: usize, k: usize) -> usize {
        let [n0, n1, n2] = dims.n;
        match self {
            Self::Ijk => i * n2 * n1 + j * n2 + k,
            Self::Jki => j * n0 * n2 + k * n0 + i,
            Self::Jik => j * n0 * n2 + i * n2 + k,
        }
    }

    /// Byte address of `(i, j, k)`.
    #[inline]
    #[must_use]
    pub fn byte_offset(self, dims: &Dimensions, i: usize, j: usize, k: usize) -> u64 {
        self.offset(dims, i, j, k) as u64 * ELEMENT_SIZE
    }

    /// Whether consecutive `i` (fixed `j`, `k`) are adjacent in storage.
    #[must_use]
    pub const fn is_contiguous_in_i(self) -> bool {
        matches!(self, Self::Jki)
    }

    /// Whether consecutive `k` (fixed `i`, `j`) are adjacent in storage.
    #[must_use]
    pub const fn is_contiguous_in_k(self) -> bool {
        matches!(self, Self::Ijk | Self::Jik)
    }

    /// Whether every j-plane occupies one contiguous `n0·n2` block.
    #[must_use]
    pub const fn is_plane_major(self) -> bool {
        matches!(self, Self::Jki | Self::Jik)
    }

    /// Index of `(i, k)` inside its j-plane block.
    ///
    /// Only meaningful for plane-major layouts (see [`Layout::is_plane_major`]).
    #[inline]
    #[must_use]
    pub fn plane_index(self, dims: &Dimensions, i: usize, k: usize) -> usize {
        match self {
            Self::Jki => k * dims.n0() + i,
            Self::Ijk | Self::Jik => i * dims.n2() + k,
        }
    }

    /// Visits every coordinate in increasing order of this layout's offset.
    ///
    /// The loop nesting is the layout name read left to right (outermost
    /// first), so `Jki` nests `j`, then `k`, then `i`.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first error produced by `visit`.
    pub fn traverse<E, F>(self, dims: &Dimensions, mut visit: F) -> std::result::Result<(), E>
    where
        F: FnMut(usize, usize, usize) -> std::result::Result<(), E>,
    {
        let [n0, n1, n2] = dims.n;
        match self {
            Self::Ijk => {
                for i in 0..n0 {
                    for j in 0..n1 {
                        for k in 0..n2 {
                            visit(i, j, k)?;
                        }
                    }
                }
            }
            Self::Jki => {
                for j in 0..n1 {
                    for k in 0..n2 {
                        for i in 0..n0 {
                            visit(i, j, k)?;
                        }
                    }
                }
            }
            Self::Jik => {
                for j in 0..n1 {
                    for i in 0..n0 {
                        for k in 0..n2 {
                            visit(i, j, k)?;
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|layout| layout.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown layout '{s}', expected one of IJK, JKI, JIK"))
    }
}

/// Source and destination layouts of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transform {
    /// Layout the input file is stored in.
    pub source: Layout,
    /// Layout the output file is written in.
    pub destination: Layout,
}

impl Transform {
    /// The default transform: read JKI, write JIK.
    pub const JKI_TO_JIK: Transform = Transform {
        source: Layout::Jki,
        destination: Layout::Jik,
    };

    /// Creates a transform between two layouts.
    #[must_use]
    pub const fn new(source: Layout, destination: Layout) -> Self {
        Self {
            source,
            destination,
        }
    }

    /// Returns the transform with source and destination swapped.
    #[must_use]
    pub const fn inverse(self) -> Self {
        Self {
            source: self.destination,
            destination: self.source,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::JKI_TO_JIK
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.destination)
    }
}
