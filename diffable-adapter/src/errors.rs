use alloc::string::String;

use diffable::{DiffError, IndexPath};
use thiserror::Error;

/// Failures reported by a surface or by the caller's cell configurer.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// The surface refused or could not apply an edit script.
    #[error("surface rejected the edit script: {reason}")]
    Rejected { reason: String },

    /// Painting a payload onto a rendered element failed.
    #[error("refresh failed at {at}: {reason}")]
    RefreshFailed { at: IndexPath, reason: String },
}

impl SurfaceError {
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }

    pub fn refresh_failed(at: IndexPath, reason: impl Into<String>) -> Self {
        Self::RefreshFailed {
            at,
            reason: reason.into(),
        }
    }
}

/// Error returned by [`crate::DataSource`] updates.
///
/// Whatever the variant, the data source keeps the snapshot it had before the call.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum UpdateError {
    #[error(transparent)]
    Diff(#[from] DiffError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

impl UpdateError {
    pub fn is_diff_error(&self) -> bool {
        matches!(self, Self::Diff(_))
    }

    pub fn is_surface_error(&self) -> bool {
        matches!(self, Self::Surface(_))
    }
}
