use alloc::vec::Vec;

use crate::{ItemKey, Keyed, Refresh, SectionModel, Snapshot, VisibleElements};

/// Plans in-place refreshes by scanning the previous snapshot.
///
/// Only items that survive into `new` with a different payload are considered, and only
/// when `view` reports an element rendered at the item's previous position. Items that
/// aren't rendered get fresh content from the element factory when they next appear.
pub(crate) fn plan_refreshes<S, V>(
    old: &Snapshot<S>,
    new: &Snapshot<S>,
    view: &V,
) -> Vec<Refresh<ItemKey<S>, V::Element>>
where
    S: SectionModel,
    V: VisibleElements + ?Sized,
{
    let mut out = Vec::new();
    for (at, item) in old.iter_items() {
        let key = item.key();
        let Some(target) = new.locate(&key) else {
            continue;
        };
        let Some(next) = new.item_at(target) else {
            continue;
        };
        if next == item {
            continue;
        }
        match view.element_at(at) {
            Some(element) => out.push(Refresh {
                key,
                at,
                target,
                element,
            }),
            None => {
                dtrace!(key = ?key, %at, "refresh skipped, element not rendered");
            }
        }
    }
    out
}
