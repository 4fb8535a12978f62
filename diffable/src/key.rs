use core::fmt;

#[cfg(not(feature = "std"))]
use alloc::collections::{BTreeMap, BTreeSet};
#[cfg(feature = "std")]
use std::collections::{HashMap, HashSet};

#[cfg(feature = "std")]
pub(crate) type KeyMap<K, V> = HashMap<K, V>;
#[cfg(not(feature = "std"))]
pub(crate) type KeyMap<K, V> = BTreeMap<K, V>;

#[cfg(feature = "std")]
pub(crate) type KeySet<K> = HashSet<K>;
#[cfg(not(feature = "std"))]
pub(crate) type KeySet<K> = BTreeSet<K>;

/// Bound for identity keys.
///
/// With `std` this is `Hash + Eq` (indexes are `HashMap`s); without it, `Ord` (indexes are
/// `BTreeMap`s).
#[cfg(feature = "std")]
pub trait DiffKey: core::hash::Hash + Eq {}
#[cfg(feature = "std")]
impl<K: core::hash::Hash + Eq> DiffKey for K {}

#[cfg(not(feature = "std"))]
pub trait DiffKey: Ord {}
#[cfg(not(feature = "std"))]
impl<K: Ord> DiffKey for K {}

/// A value that carries a stable identity.
///
/// Two values with equal keys are the same logical row across snapshots, whatever their
/// payloads are.
pub trait Keyed {
    type Key: DiffKey + Clone + fmt::Debug;

    fn key(&self) -> Self::Key;
}

/// A keyed section holding an ordered run of keyed items.
///
/// Item payload equality is `PartialEq` on the item itself and is independent of key
/// equality.
pub trait SectionModel: Keyed {
    type Item: Keyed + PartialEq;

    fn items(&self) -> &[Self::Item];
}

pub type SectionKey<S> = <S as Keyed>::Key;
pub type ItemKey<S> = <<S as SectionModel>::Item as Keyed>::Key;
