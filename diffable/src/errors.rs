use alloc::string::String;

use thiserror::Error;

use crate::IdentityKind;

/// Errors produced while building snapshots or diffing them.
///
/// Keys are rendered with their `Debug` representation so the error stays independent of the
/// caller's key type.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DiffError {
    /// Two sections, or two items anywhere in the snapshot, share a key.
    #[error("duplicate {kind} key {key} at {first} and {second}")]
    DuplicateIdentity {
        kind: IdentityKind,
        key: String,
        first: String,
        second: String,
    },

    /// A key resolved to more than one position while diffing.
    #[error("{kind} key {key} maps to more than one position")]
    IdentityAmbiguity { kind: IdentityKind, key: String },

    /// A prepared reconciliation was committed after the reconciler had moved on.
    #[error("reconciliation prepared at generation {prepared} but reconciler is at {current}")]
    StaleReconciliation { prepared: u64, current: u64 },
}

impl DiffError {
    pub fn is_duplicate_identity(&self) -> bool {
        matches!(self, Self::DuplicateIdentity { .. })
    }

    pub fn is_identity_ambiguity(&self) -> bool {
        matches!(self, Self::IdentityAmbiguity { .. })
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, Self::StaleReconciliation { .. })
    }

    /// Which kind of key caused the error, when a key is involved.
    pub fn kind(&self) -> Option<IdentityKind> {
        match self {
            Self::DuplicateIdentity { kind, .. } | Self::IdentityAmbiguity { kind, .. } => {
                Some(*kind)
            }
            Self::StaleReconciliation { .. } => None,
        }
    }
}
