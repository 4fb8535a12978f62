use alloc::format;
use alloc::vec::Vec;
use core::fmt;

use crate::key::KeySet;
use crate::{DiffError, DiffKey, Edit, EditScript, IdentityKind, IndexPath};

/// Collects edits into their script buckets while enforcing the script contract:
/// - Every key gets at most one edit.
/// - Callers emit in ascending position order; removals are reversed on `finish`.
///
/// A second edit for an already-touched key means the key resolved to two positions, which
/// fails with [`DiffError::IdentityAmbiguity`] instead of producing a script that would
/// animate the same row twice.
pub(crate) struct EditEmitter<SK, IK> {
    item_removals: Vec<Edit<SK, IK>>,
    section_removals: Vec<Edit<SK, IK>>,
    section_inserts: Vec<Edit<SK, IK>>,
    item_inserts: Vec<Edit<SK, IK>>,
    section_moves: Vec<Edit<SK, IK>>,
    item_moves: Vec<Edit<SK, IK>>,
    touched_sections: KeySet<SK>,
    touched_items: KeySet<IK>,
}

impl<SK, IK> EditEmitter<SK, IK>
where
    SK: DiffKey + Clone + fmt::Debug,
    IK: DiffKey + Clone + fmt::Debug,
{
    pub(crate) fn new() -> Self {
        Self {
            item_removals: Vec::new(),
            section_removals: Vec::new(),
            section_inserts: Vec::new(),
            item_inserts: Vec::new(),
            section_moves: Vec::new(),
            item_moves: Vec::new(),
            touched_sections: KeySet::new(),
            touched_items: KeySet::new(),
        }
    }

    fn touch_section(&mut self, key: &SK) -> Result<(), DiffError> {
        if self.touched_sections.insert(key.clone()) {
            return Ok(());
        }
        dwarn!(key = ?key, "EditEmitter: section key edited twice");
        Err(ambiguity(IdentityKind::Section, key))
    }

    fn touch_item(&mut self, key: &IK) -> Result<(), DiffError> {
        if self.touched_items.insert(key.clone()) {
            return Ok(());
        }
        dwarn!(key = ?key, "EditEmitter: item key edited twice");
        Err(ambiguity(IdentityKind::Item, key))
    }

    pub(crate) fn insert_section(&mut self, key: SK, index: usize) -> Result<(), DiffError> {
        self.touch_section(&key)?;
        self.section_inserts.push(Edit::InsertSection { key, index });
        Ok(())
    }

    pub(crate) fn remove_section(&mut self, key: SK, index: usize) -> Result<(), DiffError> {
        self.touch_section(&key)?;
        self.section_removals.push(Edit::RemoveSection { key, index });
        Ok(())
    }

    pub(crate) fn move_section(&mut self, key: SK, from: usize, to: usize) -> Result<(), DiffError> {
        self.touch_section(&key)?;
        self.section_moves.push(Edit::MoveSection { key, from, to });
        Ok(())
    }

    pub(crate) fn insert_item(&mut self, key: IK, at: IndexPath) -> Result<(), DiffError> {
        self.touch_item(&key)?;
        self.item_inserts.push(Edit::InsertItem { key, at });
        Ok(())
    }

    pub(crate) fn remove_item(&mut self, key: IK, at: IndexPath) -> Result<(), DiffError> {
        self.touch_item(&key)?;
        self.item_removals.push(Edit::RemoveItem { key, at });
        Ok(())
    }

    pub(crate) fn move_item(
        &mut self,
        key: IK,
        from: IndexPath,
        to: IndexPath,
    ) -> Result<(), DiffError> {
        self.touch_item(&key)?;
        self.item_moves.push(Edit::MoveItem { key, from, to });
        Ok(())
    }

    pub(crate) fn finish(self, reload: bool) -> EditScript<SK, IK> {
        let Self {
            mut item_removals,
            mut section_removals,
            section_inserts,
            item_inserts,
            section_moves,
            item_moves,
            ..
        } = self;

        // Removals go back to front so earlier sources keep their indexes.
        item_removals.reverse();
        section_removals.reverse();

        let mut edits = item_removals;
        edits.extend(section_removals);
        edits.extend(section_inserts);
        edits.extend(item_inserts);
        edits.extend(section_moves);
        edits.extend(item_moves);
        EditScript::from_edits(edits, reload)
    }
}

pub(crate) fn ambiguity(kind: IdentityKind, key: &impl fmt::Debug) -> DiffError {
    DiffError::IdentityAmbiguity {
        kind,
        key: format!("{key:?}"),
    }
}
