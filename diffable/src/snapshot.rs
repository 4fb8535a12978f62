use alloc::format;
use alloc::vec::Vec;

use crate::key::KeyMap;
use crate::{DiffError, IdentityKind, IndexPath, ItemKey, Keyed, SectionKey, SectionModel};

/// One validated, ordered, sectioned state.
///
/// A snapshot owns its sections and never changes after [`Snapshot::build`]. Section keys are
/// unique, and item keys are unique across the whole snapshot (an item can't live in two
/// sections at once). Both are indexed once at construction so lookups by key are O(1)
/// amortized.
#[derive(Clone, Debug)]
pub struct Snapshot<S: SectionModel> {
    sections: Vec<S>,
    section_positions: KeyMap<SectionKey<S>, usize>,
    item_positions: KeyMap<ItemKey<S>, IndexPath>,
    total_items: usize,
}

impl<S: SectionModel> Snapshot<S> {
    /// Validates and indexes `sections`.
    ///
    /// Fails with [`DiffError::DuplicateIdentity`] on the first colliding section or item key.
    pub fn build(sections: impl IntoIterator<Item = S>) -> Result<Self, DiffError> {
        let sections: Vec<S> = sections.into_iter().collect();
        let mut section_positions = KeyMap::new();
        let mut item_positions = KeyMap::new();
        let mut total_items = 0usize;

        for (section_index, section) in sections.iter().enumerate() {
            let key = section.key();
            if let Some(first) = section_positions.get(&key) {
                dwarn!(key = ?key, first, second = section_index, "duplicate section key");
                return Err(DiffError::DuplicateIdentity {
                    kind: IdentityKind::Section,
                    key: format!("{key:?}"),
                    first: format!("{first}"),
                    second: format!("{section_index}"),
                });
            }
            section_positions.insert(key, section_index);

            for (item_index, item) in section.items().iter().enumerate() {
                let key = item.key();
                let at = IndexPath::new(section_index, item_index);
                if let Some(first) = item_positions.get(&key) {
                    dwarn!(key = ?key, %first, second = %at, "duplicate item key");
                    return Err(DiffError::DuplicateIdentity {
                        kind: IdentityKind::Item,
                        key: format!("{key:?}"),
                        first: format!("{first}"),
                        second: format!("{at}"),
                    });
                }
                item_positions.insert(key, at);
            }
            total_items = total_items.saturating_add(section.items().len());
        }

        dtrace!(
            sections = sections.len(),
            items = total_items,
            "Snapshot::build"
        );
        Ok(Self {
            sections,
            section_positions,
            item_positions,
            total_items,
        })
    }

    pub fn empty() -> Self {
        Self {
            sections: Vec::new(),
            section_positions: KeyMap::new(),
            item_positions: KeyMap::new(),
            total_items: 0,
        }
    }

    pub fn sections(&self) -> &[S] {
        &self.sections
    }

    pub fn into_sections(self) -> Vec<S> {
        self.sections
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Number of items in `section`, or 0 when the section index is out of range.
    pub fn item_count(&self, section: usize) -> usize {
        self.sections.get(section).map_or(0, |s| s.items().len())
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    /// `true` when there are no sections at all. A snapshot of empty sections is not empty.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn section_at(&self, index: usize) -> Option<&S> {
        self.sections.get(index)
    }

    pub fn section_position(&self, key: &SectionKey<S>) -> Option<usize> {
        self.section_positions.get(key).copied()
    }

    pub fn items_in(&self, section: usize) -> &[S::Item] {
        self.sections.get(section).map(|s| s.items()).unwrap_or_default()
    }

    pub fn item_at(&self, at: IndexPath) -> Option<&S::Item> {
        self.sections.get(at.section)?.items().get(at.item)
    }

    /// Where the item with `key` lives, if it is part of this snapshot.
    pub fn locate(&self, key: &ItemKey<S>) -> Option<IndexPath> {
        self.item_positions.get(key).copied()
    }

    pub fn contains_item(&self, key: &ItemKey<S>) -> bool {
        self.item_positions.contains_key(key)
    }

    /// Iterates items in visual order (section by section, top to bottom).
    pub fn iter_items(&self) -> impl Iterator<Item = (IndexPath, &S::Item)> + '_ {
        self.sections.iter().enumerate().flat_map(|(s, section)| {
            section
                .items()
                .iter()
                .enumerate()
                .map(move |(i, item)| (IndexPath::new(s, i), item))
        })
    }
}

impl<S: SectionModel> Default for Snapshot<S> {
    fn default() -> Self {
        Self::empty()
    }
}
