//! Erased collection operations captured at description time.
//!
//! The converter only ever sees `dyn Any`; these tables carry the typed
//! construction, insertion, and visiting closures for sequence and
//! association members, captured while the member's static type is known.

use alloc::boxed::Box;
use alloc::collections::{BTreeMap, BTreeSet, VecDeque};
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::hash::{BuildHasher, Hash};

// -----------------------------------------------------------------------------
// Sequence

/// A homogeneous growable collection usable as an element-list member.
pub trait Sequence: Any {
    /// The entry type.
    type Entry: Any;

    /// Creates the empty collection.
    fn empty() -> Self;

    /// Appends one entry.
    fn append(&mut self, entry: Self::Entry);

    /// Visits the entries in iteration order.
    fn entries(&self) -> Box<dyn Iterator<Item = &Self::Entry> + '_>;
}

impl<V: Any> Sequence for Vec<V> {
    type Entry = V;

    #[inline]
    fn empty() -> Self {
        Vec::new()
    }

    #[inline]
    fn append(&mut self, entry: V) {
        self.push(entry);
    }

    fn entries(&self) -> Box<dyn Iterator<Item = &V> + '_> {
        Box::new(self.iter())
    }
}

impl<V: Any> Sequence for VecDeque<V> {
    type Entry = V;

    #[inline]
    fn empty() -> Self {
        VecDeque::new()
    }

    #[inline]
    fn append(&mut self, entry: V) {
        self.push_back(entry);
    }

    fn entries(&self) -> Box<dyn Iterator<Item = &V> + '_> {
        Box::new(self.iter())
    }
}

impl<V: Any + Ord> Sequence for BTreeSet<V> {
    type Entry = V;

    #[inline]
    fn empty() -> Self {
        BTreeSet::new()
    }

    #[inline]
    fn append(&mut self, entry: V) {
        self.insert(entry);
    }

    fn entries(&self) -> Box<dyn Iterator<Item = &V> + '_> {
        Box::new(self.iter())
    }
}

// -----------------------------------------------------------------------------
// Association

/// A key/value collection usable as an element-map member.
pub trait Association: Any {
    /// The key type; must be primitive-transformable to become an entry
    /// attribute.
    type Key: Any;
    /// The value type.
    type Value: Any;

    /// Creates the empty association.
    fn empty() -> Self;

    /// Inserts one entry.
    fn put(&mut self, key: Self::Key, value: Self::Value);

    /// Visits the entries in iteration order.
    fn entries(&self) -> Box<dyn Iterator<Item = (&Self::Key, &Self::Value)> + '_>;
}

impl<K, V, S> Association for std::collections::HashMap<K, V, S>
where
    K: Any + Eq + Hash,
    V: Any,
    S: BuildHasher + Default + 'static,
{
    type Key = K;
    type Value = V;

    #[inline]
    fn empty() -> Self {
        Self::default()
    }

    #[inline]
    fn put(&mut self, key: K, value: V) {
        self.insert(key, value);
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&K, &V)> + '_> {
        Box::new(self.iter())
    }
}

impl<K: Any + Ord, V: Any> Association for BTreeMap<K, V> {
    type Key = K;
    type Value = V;

    #[inline]
    fn empty() -> Self {
        BTreeMap::new()
    }

    #[inline]
    fn put(&mut self, key: K, value: V) {
        self.insert(key, value);
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&K, &V)> + '_> {
        Box::new(self.iter())
    }
}

// -----------------------------------------------------------------------------
// ListOps

/// The erased operation table for one sequence member.
pub struct ListOps {
    entry_ty: TypeId,
    entry_type_name: &'static str,
    new: Box<dyn Fn() -> Box<dyn Any> + Send + Sync>,
    push: Box<dyn Fn(&mut dyn Any, Box<dyn Any>) -> bool + Send + Sync>,
    visit: Box<dyn for<'a> Fn(&'a dyn Any) -> Option<Vec<&'a dyn Any>> + Send + Sync>,
}

impl ListOps {
    /// Builds the table for a concrete [`Sequence`] type.
    pub fn of<C: Sequence>() -> Self {
        Self {
            entry_ty: TypeId::of::<C::Entry>(),
            entry_type_name: core::any::type_name::<C::Entry>(),
            new: Box::new(|| Box::new(C::empty())),
            push: Box::new(|collection, entry| {
                match (
                    collection.downcast_mut::<C>(),
                    entry.downcast::<C::Entry>(),
                ) {
                    (Some(c), Ok(e)) => {
                        c.append(*e);
                        true
                    }
                    _ => false,
                }
            }),
            visit: Box::new(|collection| {
                collection
                    .downcast_ref::<C>()
                    .map(|c| c.entries().map(|e| e as &dyn Any).collect())
            }),
        }
    }

    /// Returns the `TypeId` of the entry type.
    #[inline]
    pub const fn entry_ty(&self) -> TypeId {
        self.entry_ty
    }

    /// Returns the entry type name, for diagnostics.
    #[inline]
    pub const fn entry_type_name(&self) -> &'static str {
        self.entry_type_name
    }

    /// Creates the empty erased collection.
    #[inline]
    pub fn new_value(&self) -> Box<dyn Any> {
        (self.new)()
    }

    /// Appends an erased entry; `false` on a type mismatch.
    #[inline]
    pub fn push(&self, collection: &mut dyn Any, entry: Box<dyn Any>) -> bool {
        (self.push)(collection, entry)
    }

    /// Collects borrows of the entries; `None` on a type mismatch.
    #[inline]
    pub fn visit<'a>(&self, collection: &'a dyn Any) -> Option<Vec<&'a dyn Any>> {
        (self.visit)(collection)
    }
}

impl core::fmt::Debug for ListOps {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListOps")
            .field("entry", &self.entry_type_name)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// MapOps

/// The erased operation table for one association member.
pub struct MapOps {
    key_ty: TypeId,
    key_type_name: &'static str,
    value_ty: TypeId,
    value_type_name: &'static str,
    new: Box<dyn Fn() -> Box<dyn Any> + Send + Sync>,
    put: Box<dyn Fn(&mut dyn Any, Box<dyn Any>, Box<dyn Any>) -> bool + Send + Sync>,
    visit: Box<
        dyn for<'a> Fn(&'a dyn Any) -> Option<Vec<(&'a dyn Any, &'a dyn Any)>> + Send + Sync,
    >,
}

impl MapOps {
    /// Builds the table for a concrete [`Association`] type.
    pub fn of<C: Association>() -> Self {
        Self {
            key_ty: TypeId::of::<C::Key>(),
            key_type_name: core::any::type_name::<C::Key>(),
            value_ty: TypeId::of::<C::Value>(),
            value_type_name: core::any::type_name::<C::Value>(),
            new: Box::new(|| Box::new(C::empty())),
            put: Box::new(|map, key, value| {
                match (
                    map.downcast_mut::<C>(),
                    key.downcast::<C::Key>(),
                    value.downcast::<C::Value>(),
                ) {
                    (Some(m), Ok(k), Ok(v)) => {
                        m.put(*k, *v);
                        true
                    }
                    _ => false,
                }
            }),
            visit: Box::new(|map| {
                map.downcast_ref::<C>()
                    .map(|m| m.entries().map(|(k, v)| (k as &dyn Any, v as &dyn Any)).collect())
            }),
        }
    }

    /// Returns the `TypeId` of the key type.
    #[inline]
    pub const fn key_ty(&self) -> TypeId {
        self.key_ty
    }

    /// Returns the key type name, for diagnostics.
    #[inline]
    pub const fn key_type_name(&self) -> &'static str {
        self.key_type_name
    }

    /// Returns the `TypeId` of the value type.
    #[inline]
    pub const fn value_ty(&self) -> TypeId {
        self.value_ty
    }

    /// Returns the value type name, for diagnostics.
    #[inline]
    pub const fn value_type_name(&self) -> &'static str {
        self.value_type_name
    }

    /// Creates the empty erased association.
    #[inline]
    pub fn new_value(&self) -> Box<dyn Any> {
        (self.new)()
    }

    /// Inserts an erased entry; `false` on a type mismatch.
    #[inline]
    pub fn put(&self, map: &mut dyn Any, key: Box<dyn Any>, value: Box<dyn Any>) -> bool {
        (self.put)(map, key, value)
    }

    /// Collects borrows of the entries; `None` on a type mismatch.
    #[inline]
    pub fn visit<'a>(&self, map: &'a dyn Any) -> Option<Vec<(&'a dyn Any, &'a dyn Any)>> {
        (self.visit)(map)
    }
}

impl core::fmt::Debug for MapOps {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MapOps")
            .field("key", &self.key_type_name)
            .field("value", &self.value_type_name)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Shape

/// The value shape of a label: a single value, a sequence, or an
/// association.
#[derive(Debug)]
pub enum Shape {
    /// One value, primitive or composite.
    Scalar,
    /// A sequence accumulated from repeated entry elements.
    List(ListOps),
    /// An association accumulated from repeated entry elements with a key
    /// attribute.
    Map(MapOps),
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;

    #[test]
    fn list_ops_build_and_visit() {
        let ops = ListOps::of::<Vec<String>>();
        let mut value = ops.new_value();

        assert!(ops.push(value.as_mut(), Box::new(String::from("a"))));
        assert!(ops.push(value.as_mut(), Box::new(String::from("b"))));
        assert!(!ops.push(value.as_mut(), Box::new(1u8)));

        let seen = ops.visit(value.as_ref()).unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].downcast_ref::<String>().unwrap(), "a");
    }

    #[test]
    fn map_ops_build_and_visit() {
        let ops = MapOps::of::<BTreeMap<String, u32>>();
        let mut value = ops.new_value();

        assert!(ops.put(
            value.as_mut(),
            Box::new(String::from("k")),
            Box::new(3u32)
        ));
        let seen = ops.visit(value.as_ref()).unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(*seen[0].1.downcast_ref::<u32>().unwrap(), 3);
    }
}
