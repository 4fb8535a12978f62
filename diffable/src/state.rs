use crate::{Edit, EditScript};

/// The two states a reconciler can be in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReconcilerState {
    /// No previous snapshot; the next reconcile is a reload.
    Empty,
    /// Holds exactly one previous snapshot.
    Populated,
}

/// A lightweight, serializable record of one reconcile call.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReconcileSummary {
    pub inserted_sections: usize,
    pub removed_sections: usize,
    pub moved_sections: usize,
    pub inserted_items: usize,
    pub removed_items: usize,
    pub moved_items: usize,
    pub refreshed: usize,
    pub animated: bool,
    pub reload: bool,
    /// Reconciler generation once this call is committed.
    pub generation: u64,
}

impl ReconcileSummary {
    pub fn structural_edits(&self) -> usize {
        self.inserted_sections
            + self.removed_sections
            + self.moved_sections
            + self.inserted_items
            + self.removed_items
            + self.moved_items
    }

    /// `true` when nothing had to change on the surface.
    pub fn is_noop(&self) -> bool {
        self.structural_edits() == 0 && self.refreshed == 0
    }
}

impl<SK, IK> EditScript<SK, IK> {
    /// Counts edits by kind. Refresh, animation and generation fields are left at defaults.
    pub fn summary(&self) -> ReconcileSummary {
        let mut out = ReconcileSummary {
            reload: self.is_reload(),
            ..ReconcileSummary::default()
        };
        for edit in self {
            match edit {
                Edit::InsertSection { .. } => out.inserted_sections += 1,
                Edit::RemoveSection { .. } => out.removed_sections += 1,
                Edit::MoveSection { .. } => out.moved_sections += 1,
                Edit::InsertItem { .. } => out.inserted_items += 1,
                Edit::RemoveItem { .. } => out.removed_items += 1,
                Edit::MoveItem { .. } => out.moved_items += 1,
            }
        }
        out
    }
}
