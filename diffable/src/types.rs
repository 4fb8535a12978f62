use alloc::vec::Vec;
use core::fmt;

/// A visual position: section index plus item index inside that section.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexPath {
    pub section: usize,
    pub item: usize,
}

impl IndexPath {
    pub const fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }
}

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.section, self.item)
    }
}

/// Whether a key names a section or an item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IdentityKind {
    Section,
    Item,
}

impl fmt::Display for IdentityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Section => f.write_str("section"),
            Self::Item => f.write_str("item"),
        }
    }
}

/// A single structural operation.
///
/// Sources (`index`/`at` of removals, `from` of moves) are positions in the previous
/// snapshot. Targets (`index`/`at` of inserts, `to` of moves) are positions in the next one.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Edit<SK, IK> {
    InsertSection { key: SK, index: usize },
    RemoveSection { key: SK, index: usize },
    MoveSection { key: SK, from: usize, to: usize },
    InsertItem { key: IK, at: IndexPath },
    RemoveItem { key: IK, at: IndexPath },
    MoveItem { key: IK, from: IndexPath, to: IndexPath },
}

impl<SK, IK> Edit<SK, IK> {
    pub fn is_section(&self) -> bool {
        matches!(
            self,
            Self::InsertSection { .. } | Self::RemoveSection { .. } | Self::MoveSection { .. }
        )
    }

    pub fn is_insert(&self) -> bool {
        matches!(self, Self::InsertSection { .. } | Self::InsertItem { .. })
    }

    pub fn is_remove(&self) -> bool {
        matches!(self, Self::RemoveSection { .. } | Self::RemoveItem { .. })
    }

    pub fn is_move(&self) -> bool {
        matches!(self, Self::MoveSection { .. } | Self::MoveItem { .. })
    }

    pub fn section_key(&self) -> Option<&SK> {
        match self {
            Self::InsertSection { key, .. }
            | Self::RemoveSection { key, .. }
            | Self::MoveSection { key, .. } => Some(key),
            _ => None,
        }
    }

    pub fn item_key(&self) -> Option<&IK> {
        match self {
            Self::InsertItem { key, .. }
            | Self::RemoveItem { key, .. }
            | Self::MoveItem { key, .. } => Some(key),
            _ => None,
        }
    }
}

/// An ordered set of structural operations turning one snapshot's ordering into another's.
///
/// Ordering: item removals (descending source), section removals (descending source),
/// section inserts (ascending target), item inserts (ascending target), section moves, item
/// moves.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EditScript<SK, IK> {
    edits: Vec<Edit<SK, IK>>,
    reload: bool,
}

impl<SK, IK> Default for EditScript<SK, IK> {
    fn default() -> Self {
        Self {
            edits: Vec::new(),
            reload: false,
        }
    }
}

impl<SK, IK> EditScript<SK, IK> {
    pub(crate) fn from_edits(edits: Vec<Edit<SK, IK>>, reload: bool) -> Self {
        Self { edits, reload }
    }

    pub fn edits(&self) -> &[Edit<SK, IK>] {
        &self.edits
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Edit<SK, IK>> {
        self.edits.iter()
    }

    pub fn into_edits(self) -> Vec<Edit<SK, IK>> {
        self.edits
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// `true` when the script replaces everything because there was no previous snapshot.
    ///
    /// A reload script still lists every insert, so surfaces that can't "reload data" in one
    /// step can replay it like any other script.
    pub fn is_reload(&self) -> bool {
        self.reload
    }
}

impl<'a, SK, IK> IntoIterator for &'a EditScript<SK, IK> {
    type Item = &'a Edit<SK, IK>;
    type IntoIter = core::slice::Iter<'a, Edit<SK, IK>>;

    fn into_iter(self) -> Self::IntoIter {
        self.edits.iter()
    }
}

/// An in-place content refresh for an element that stays rendered.
///
/// `at` is where the element is rendered now (previous snapshot); `target` is where the item
/// lives in the next snapshot, which is where its new payload is read from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Refresh<K, E> {
    pub key: K,
    pub at: IndexPath,
    pub target: IndexPath,
    pub element: E,
}
