//! A headless reconciliation engine for keyed, sectioned list and grid surfaces.
//!
//! For the caller-facing data source (surface binding, cell providers), see the
//! `diffable-adapter` crate.
//!
//! Given the previously applied [`Snapshot`] and a new one, the [`Reconciler`] computes:
//! - an [`EditScript`] of section/item inserts, removals and moves, keyed by identity
//! - in-place [`Refresh`] instructions for rendered elements whose identity survived but
//!   whose payload changed
//! - whether the transition should animate (never into a detached surface)
//!
//! It is UI-agnostic. A list/grid layer is expected to provide:
//! - a [`VisibleElements`] view answering "what is rendered at this position"
//! - a way to apply the edit script and paint refreshed payloads
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod diff;
mod emitter;
mod errors;
mod key;
mod options;
mod reconciler;
mod refresh;
mod snapshot;
mod state;
mod types;
mod visible;


pub use errors::DiffError;
pub use key::{DiffKey, ItemKey, Keyed, SectionKey, SectionModel};
pub use options::{OnChangeCallback, ReconcilerOptions};
pub use reconciler::{ReconcileResult, ReconcileResultFor, Reconciler, Reconciliation};
pub use snapshot::Snapshot;
pub use state::{ReconcileSummary, ReconcilerState};
pub use types::{Edit, EditScript, IdentityKind, IndexPath, Refresh};
pub use visible::VisibleElements;
