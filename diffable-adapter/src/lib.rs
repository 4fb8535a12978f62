//! Surface adapters for the `diffable` crate.
//!
//! The `diffable` crate is UI-agnostic and only computes transitions. This crate binds it to a
//! rendering surface:
//!
//! - [`Surface`]: the capability a list/grid widget implements (visibility queries plus
//!   applying an edit script, optionally animated)
//! - [`DataSource`]: the caller-facing `update(sections)` entry point that paints in-place
//!   refreshes, hands the script to the surface, and commits only on success
//!
//! This crate is intentionally framework-agnostic (no widget toolkit bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod data_source;
mod errors;
mod surface;

#[cfg(test)]
mod tests;

pub use data_source::{CellConfigurer, CellProvider, DataSource};
pub use errors::{SurfaceError, UpdateError};
pub use surface::{Completion, Surface};
