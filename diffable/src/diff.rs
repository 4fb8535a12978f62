use crate::emitter::{EditEmitter, ambiguity};
use crate::{
    DiffError, EditScript, IdentityKind, IndexPath, ItemKey, Keyed, SectionKey, SectionModel,
    Snapshot,
};

pub(crate) type ScriptFor<S> = EditScript<SectionKey<S>, ItemKey<S>>;

/// Script for a first render: every section and every item is inserted.
pub(crate) fn reload<S: SectionModel>(next: &Snapshot<S>) -> Result<ScriptFor<S>, DiffError> {
    let mut out = EditEmitter::new();
    for (index, section) in next.sections().iter().enumerate() {
        out.insert_section(section.key(), index)?;
    }
    for (at, item) in next.iter_items() {
        out.insert_item(item.key(), at)?;
    }
    Ok(out.finish(true))
}

/// Structural diff from `old` to `new`.
///
/// A section moves when its index changes. An item moves when its containing section key or
/// its index inside the section changes. Every such identity is reported, not a minimal
/// subset, so a removal near the top also moves everything below it.
pub(crate) fn diff<S: SectionModel>(
    old: &Snapshot<S>,
    new: &Snapshot<S>,
) -> Result<ScriptFor<S>, DiffError> {
    let mut out = EditEmitter::new();

    for (from, section) in old.sections().iter().enumerate() {
        let key = section.key();
        if old.section_position(&key) != Some(from) {
            return Err(ambiguity(IdentityKind::Section, &key));
        }
        match new.section_position(&key) {
            None => out.remove_section(key, from)?,
            Some(to) if to != from => out.move_section(key, from, to)?,
            Some(_) => {}
        }
    }

    for (to, section) in new.sections().iter().enumerate() {
        let key = section.key();
        if new.section_position(&key) != Some(to) {
            return Err(ambiguity(IdentityKind::Section, &key));
        }
        if old.section_position(&key).is_none() {
            out.insert_section(key, to)?;
        }
    }

    for (from, item) in old.iter_items() {
        let key = item.key();
        if old.locate(&key) != Some(from) {
            return Err(ambiguity(IdentityKind::Item, &key));
        }
        match new.locate(&key) {
            None => out.remove_item(key, from)?,
            Some(to) if item_moved(old, new, from, to) => out.move_item(key, from, to)?,
            Some(_) => {}
        }
    }

    for (to, item) in new.iter_items() {
        let key = item.key();
        if new.locate(&key) != Some(to) {
            return Err(ambiguity(IdentityKind::Item, &key));
        }
        if !old.contains_item(&key) {
            out.insert_item(key, to)?;
        }
    }

    Ok(out.finish(false))
}

fn item_moved<S: SectionModel>(
    old: &Snapshot<S>,
    new: &Snapshot<S>,
    from: IndexPath,
    to: IndexPath,
) -> bool {
    if from.item != to.item {
        return true;
    }
    let old_section = old.section_at(from.section).map(Keyed::key);
    let new_section = new.section_at(to.section).map(Keyed::key);
    old_section != new_section
}
