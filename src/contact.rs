//! Uniform accessors over described members.
//!
//! A [`Contact`] pairs an erased getter and setter for one member of an
//! owning type. Contacts are built from typed closures by the description
//! builder and are immutable once scanned: the closures capture the member
//! projection while the contact itself only records names and type ids.
//!
//! A contact with no setter is *read-only*; its value can only be supplied
//! through constructor injection.

use alloc::boxed::Box;
use core::any::{Any, TypeId};

// -----------------------------------------------------------------------------
// Accessor closures

/// Borrows the member value out of an erased owner.
///
/// Returns `None` when the owner is of the wrong type or when an optional
/// member holds no value.
pub type Getter = Box<dyn for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Any> + Send + Sync>;

/// Moves an erased value into the member. Returns `false` when either the
/// owner or the value is of the wrong type.
pub type Setter = Box<dyn Fn(&mut dyn Any, Box<dyn Any>) -> bool + Send + Sync>;

// -----------------------------------------------------------------------------
// Contact

/// An erased accessor for one member of an owning type.
pub struct Contact {
    name: &'static str,
    ty: TypeId,
    type_name: &'static str,
    owner: TypeId,
    owner_name: &'static str,
    get: Getter,
    set: Option<Setter>,
}

impl core::fmt::Debug for Contact {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Contact")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("owner_name", &self.owner_name)
            .field("writable", &self.set.is_some())
            .finish()
    }
}

impl Contact {
    /// Creates a contact over a plain member of `T` with type `V`.
    pub fn field<T, V>(
        name: &'static str,
        get: impl Fn(&T) -> &V + Send + Sync + 'static,
        set: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> Self
    where
        T: Any,
        V: Any,
    {
        Self::build::<T, V>(
            name,
            Box::new(move |owner| owner.downcast_ref::<T>().map(|t| get(t) as &dyn Any)),
            Some(Box::new(move |owner, value| {
                match (owner.downcast_mut::<T>(), value.downcast::<V>()) {
                    (Some(t), Ok(v)) => {
                        set(t, *v);
                        true
                    }
                    _ => false,
                }
            })),
        )
    }

    /// Creates a contact over an `Option<V>` member of `T`.
    ///
    /// The getter flattens: an absent member reads as no value, and a set
    /// value of `V` is stored as `Some`.
    pub fn optional<T, V>(
        name: &'static str,
        get: impl Fn(&T) -> Option<&V> + Send + Sync + 'static,
        set: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> Self
    where
        T: Any,
        V: Any,
    {
        Self::build::<T, V>(
            name,
            Box::new(move |owner| {
                owner
                    .downcast_ref::<T>()
                    .and_then(|t| get(t).map(|v| v as &dyn Any))
            }),
            Some(Box::new(move |owner, value| {
                match (owner.downcast_mut::<T>(), value.downcast::<V>()) {
                    (Some(t), Ok(v)) => {
                        set(t, *v);
                        true
                    }
                    _ => false,
                }
            })),
        )
    }

    /// Creates a getter-only contact. The member can only be populated by
    /// constructor injection.
    pub fn read_only<T, V>(
        name: &'static str,
        get: impl Fn(&T) -> &V + Send + Sync + 'static,
    ) -> Self
    where
        T: Any,
        V: Any,
    {
        Self::build::<T, V>(
            name,
            Box::new(move |owner| owner.downcast_ref::<T>().map(|t| get(t) as &dyn Any)),
            None,
        )
    }

    fn build<T: Any, V: Any>(name: &'static str, get: Getter, set: Option<Setter>) -> Self {
        Self {
            name,
            ty: TypeId::of::<V>(),
            type_name: core::any::type_name::<V>(),
            owner: TypeId::of::<T>(),
            owner_name: core::any::type_name::<T>(),
            get,
            set,
        }
    }

    /// Returns the declared member name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the `TypeId` of the member value.
    #[inline]
    pub const fn ty(&self) -> TypeId {
        self.ty
    }

    /// Returns the full type name of the member value, for diagnostics.
    #[inline]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the `TypeId` of the owning type.
    #[inline]
    pub const fn owner(&self) -> TypeId {
        self.owner
    }

    /// Returns the full type name of the owning type, for diagnostics.
    #[inline]
    pub const fn owner_name(&self) -> &'static str {
        self.owner_name
    }

    /// Whether the member can be assigned after construction.
    #[inline]
    pub fn is_writable(&self) -> bool {
        self.set.is_some()
    }

    /// Borrows the member value out of `owner`.
    #[inline]
    pub fn get<'a>(&self, owner: &'a dyn Any) -> Option<&'a dyn Any> {
        (self.get)(owner)
    }

    /// Moves `value` into the member of `owner`. Returns `false` when the
    /// contact is read-only or a type does not match.
    pub fn set(&self, owner: &mut dyn Any, value: Box<dyn Any>) -> bool {
        match &self.set {
            Some(set) => set(owner, value),
            None => false,
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;

    struct Sample {
        id: u32,
        note: Option<String>,
    }

    #[test]
    fn field_round_trip() {
        let contact = Contact::field::<Sample, u32>("id", |s| &s.id, |s, v| s.id = v);
        let mut sample = Sample { id: 1, note: None };

        assert_eq!(contact.name(), "id");
        assert!(contact.is_writable());
        assert!(contact.set(&mut sample, Box::new(7u32)));

        let got = contact.get(&sample).unwrap().downcast_ref::<u32>().unwrap();
        assert_eq!(*got, 7);
    }

    #[test]
    fn optional_flattens() {
        let contact = Contact::optional::<Sample, String>(
            "note",
            |s| s.note.as_ref(),
            |s, v| s.note = Some(v),
        );
        let mut sample = Sample { id: 0, note: None };

        assert!(contact.get(&sample).is_none());
        assert!(contact.set(&mut sample, Box::new(String::from("x"))));
        assert!(contact.get(&sample).is_some());
    }

    #[test]
    fn read_only_rejects_set() {
        let contact = Contact::read_only::<Sample, u32>("id", |s| &s.id);
        let mut sample = Sample { id: 3, note: None };

        assert!(!contact.is_writable());
        assert!(!contact.set(&mut sample, Box::new(9u32)));
        assert_eq!(sample.id, 3);
    }

    #[test]
    fn wrong_value_type_is_rejected() {
        let contact = Contact::field::<Sample, u32>("id", |s| &s.id, |s, v| s.id = v);
        let mut sample = Sample { id: 3, note: None };

        assert!(!contact.set(&mut sample, Box::new("nope")));
        assert_eq!(sample.id, 3);
    }
}
