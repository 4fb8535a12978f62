use alloc::boxed::Box;

use diffable::{EditScript, VisibleElements};

use crate::SurfaceError;

/// Invoked by the surface once an applied script has finished (animating or not).
pub type Completion = Box<dyn FnOnce() + 'static>;

/// A list or grid surface that can render keyed sections.
///
/// Each surface kind (table, collection, TUI list, ...) implements this once; the data source
/// is generic over it and never over a concrete widget type.
pub trait Surface<SK, IK>: VisibleElements {
    /// Applies `script`, animated or not, then runs `completion` when done.
    ///
    /// Called exactly once per successful update, after all refreshes have been painted.
    fn apply(
        &self,
        script: &EditScript<SK, IK>,
        animated: bool,
        completion: Option<Completion>,
    ) -> Result<(), SurfaceError>;
}
