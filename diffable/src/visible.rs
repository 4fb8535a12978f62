use crate::IndexPath;

/// Read-only view of a rendering surface, queried live during reconciliation.
///
/// Implementations answer from the surface's current state; the reconciler never caches
/// answers across calls. Both methods are called synchronously and should be cheap.
pub trait VisibleElements {
    /// A handle to a rendered element (a cell, a row widget, a node id).
    type Element;

    /// Whether the surface is part of an active, visible presentation context.
    fn is_attached(&self) -> bool;

    /// The element currently rendered at `at`, if any.
    ///
    /// `at` is always a position in the previously applied snapshot.
    fn element_at(&self, at: IndexPath) -> Option<Self::Element>;
}
