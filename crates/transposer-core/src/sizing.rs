//! Validation of file sizes against the cube's byte length.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, FileRole, Result};
use crate::layout::Dimensions;
use crate::storage::FileHandle;
use crate::util::format_bytes;

/// How strictly a file's size must match `8 · n0 · n1 · n2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizePolicy {
    /// The file may be longer than the cube (lenient, the default).
    #[default]
    AtLeast,
    /// The file must be exactly as long as the cube.
    Exact,
}

impl SizePolicy {
    /// Maps the exact-dimensions flag to a policy.
    #[must_use]
    pub const fn from_exact_dims(exact: bool) -> Self {
        if exact {
            Self::Exact
        } else {
            Self::AtLeast
        }
    }

    /// Checks a file of `actual` bytes against `dims`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileTooSmall`] if the file is shorter than the cube and
    /// [`Error::FileTooLarge`] if it is longer under [`SizePolicy::Exact`].
    pub fn check(self, role: FileRole, dims: &Dimensions, actual: u64) -> Result<()> {
        let expected = dims.byte_len();
        if actual < expected {
            return Err(Error::FileTooSmall {
                role,
                dims: *dims,
                actual,
            });
        }
        if actual > expected && self == Self::Exact {
            return Err(Error::FileTooLarge {
                role,
                dims: *dims,
                actual,
            });
        }
        Ok(())
    }
}

/// Stats an open file and checks its size.
///
/// Returns the file size in bytes.
///
/// # Errors
///
/// Returns [`Error::Stat`] if the size cannot be read, otherwise the result of
/// [`SizePolicy::check`].
pub fn check_file_size<H: FileHandle>(
    file: &H,
    role: FileRole,
    dims: &Dimensions,
    policy: SizePolicy,
) -> Result<u64> {
    let actual = file.size().map_err(|source| Error::Stat { role, source })?;
    policy.check(role, dims, actual)?;
    info!(
        %dims,
        data = %format_bytes(dims.byte_len()),
        file = %format_bytes(actual),
        "{role} file size accepted"
    );
    Ok(actual)
}
