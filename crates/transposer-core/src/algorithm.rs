//! Algorithm descriptors.
//!
//! Each algorithm fixes the nesting order of the index loops (which decides
//! where seeks land on each file) and how many elements one physical I/O call
//! moves.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::layout::{Dimensions, Layout, Transform};

/// Shape of the scratch storage an algorithm owns while it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Batching {
    /// One element per I/O call, no scratch buffer.
    Element,
    /// One `n0`-long vector read from the input per `(j, k)`.
    InputVector,
    /// One `n2`-long vector written to the output per `(i, j)`.
    OutputVector,
    /// One `n0 x n2` block read and one written per `j`.
    Matrix,
}

/// Traversal and buffering strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Nest `i, j, k`; element-wise.
    IjkMap,
    /// Nest `j, k, i`; element-wise.
    #[default]
    JkiMap,
    /// Nest `j, i, k`; element-wise.
    JikMap,
    /// Nest `j, k` with an `n0` input vector.
    VectorInput,
    /// Nest `j, i` with an `n2` output vector.
    VectorOutput,
    /// Nest `j` with two `n0 x n2` blocks and an in-memory transpose.
    Matrix,
}

impl Algorithm {
    /// All algorithms, in the order they are listed to users.
    pub const ALL: [Algorithm; 6] = [
        Algorithm::IjkMap,
        Algorithm::JkiMap,
        Algorithm::JikMap,
        Algorithm::VectorInput,
        Algorithm::VectorOutput,
        Algorithm::Matrix,
    ];

    /// Name used on the command line and in config files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::IjkMap => "ijk_map",
            Self::JkiMap => "jki_map",
            Self::JikMap => "jik_map",
            Self::VectorInput => "vector_input",
            Self::VectorOutput => "vector_output",
            Self::Matrix => "matrix",
        }
    }

    /// Loop nesting of the element-wise algorithms, outermost axis first.
    ///
    /// Returns `None` for the buffered algorithms, whose loops are fixed by
    /// their batching.
    #[must_use]
    pub const fn nesting(self) -> Option<Layout> {
        match self {
            Self::IjkMap => Some(Layout::Ijk),
            Self::JkiMap => Some(Layout::Jki),
            Self::JikMap => Some(Layout::Jik),
            Self::VectorInput | Self::VectorOutput | Self::Matrix => None,
        }
    }

    /// Buffering granularity.
    #[must_use]
    pub const fn batching(self) -> Batching {
        match self {
            Self::IjkMap | Self::JkiMap | Self::JikMap => Batching::Element,
            Self::VectorInput => Batching::InputVector,
            Self::VectorOutput => Batching::OutputVector,
            Self::Matrix => Batching::Matrix,
        }
    }

    /// Number of `f64` scratch elements the conversion phase allocates.
    #[must_use]
    pub const fn scratch_elements(self, dims: &Dimensions) -> usize {
        match self.batching() {
            Batching::Element => 0,
            Batching::InputVector => dims.n0(),
            Batching::OutputVector => dims.n2(),
            Batching::Matrix => 2 * dims.plane_len(),
        }
    }

    /// Checks that this algorithm's batching is valid for `transform`.
    ///
    /// Element-wise algorithms accept every layout pair. Batched reads need the
    /// batch to be contiguous in the source, batched writes need it to be
    /// contiguous in the destination.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedTransform`] when a batch would not be
    /// contiguous.
    pub fn check_transform(self, transform: Transform) -> Result<()> {
        let supported = match self.batching() {
            Batching::Element => true,
            Batching::InputVector => transform.source.is_contiguous_in_i(),
            Batching::OutputVector => transform.destination.is_contiguous_in_k(),
            Batching::Matrix => {
                transform.source.is_plane_major() && transform.destination.is_plane_major()
            }
        };
        if supported {
            Ok(())
        } else {
            Err(Error::UnsupportedTransform {
                algorithm: self.name(),
                from: transform.source.name(),
                to: transform.destination.name(),
            })
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownAlgorithm(s.to_string()))
    }
}
