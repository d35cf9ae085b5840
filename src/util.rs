//! Hash container aliases with a fixed-seed hasher.
//!
//! Every map in this crate is keyed either by [`TypeId`] or by small strings,
//! and iteration determinism matters more than DoS resistance, so all of them
//! share one fixed [`foldhash`] state.

use core::any::TypeId;

// -----------------------------------------------------------------------------
// Aliases

/// The fixed hash state used by every container in this crate.
pub type FixedState = foldhash::fast::FixedState;

/// A [`hashbrown::HashMap`] with a fixed-seed hasher.
pub type HashMap<K, V> = hashbrown::HashMap<K, V, FixedState>;

/// A [`hashbrown::HashSet`] with a fixed-seed hasher.
pub type HashSet<T> = hashbrown::HashSet<T, FixedState>;

/// A map keyed by [`TypeId`].
///
/// `TypeId` is already a high-quality hash, but routing it through the fixed
/// state keeps every container in the crate on one hasher.
pub type TypeIdMap<V> = HashMap<TypeId, V>;

/// Creates an empty map with the fixed hash state.
#[inline]
pub fn new_map<K, V>() -> HashMap<K, V> {
    HashMap::with_hasher(FixedState::default())
}

/// Creates an empty set with the fixed hash state.
#[inline]
pub fn new_set<T>() -> HashSet<T> {
    HashSet::with_hasher(FixedState::default())
}
