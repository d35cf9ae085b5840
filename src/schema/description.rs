//! The registration API: declarative type descriptions.
//!
//! A [`Description`] is the explicit descriptor table a type supplies in
//! place of runtime member reflection: each builder call captures one tagged
//! member as a [`Contact`] plus its [`Tag`], and the scanner later compiles
//! the whole table into a cached [`Schema`](super::Schema).
//!
//! # Examples
//!
//! ```
//! use docbind::schema::{Describe, Description};
//! use docbind::tag::Tag;
//!
//! #[derive(Default)]
//! struct Person {
//!     id: String,
//!     name: String,
//! }
//!
//! impl Describe for Person {
//!     fn describe() -> Description {
//!         Description::of::<Person>("person")
//!             .default_with(Person::default)
//!             .attribute("id", Tag::new(), |p: &Person| &p.id, |p, v| p.id = v)
//!             .element("name", Tag::new(), |p: &Person| &p.name, |p, v| p.name = v)
//!     }
//! }
//! ```

use alloc::string::String;
use alloc::vec::Vec;
use core::any::{Any, TypeId};

use super::hooks::{Hooks, Replaced};
use crate::construct::Initializer;
use crate::contact::Contact;
use crate::label::{Association, ListOps, MapOps, Sequence, Shape, Variant};
use crate::structure::Order;
use crate::tag::{Tag, TagKind};

// -----------------------------------------------------------------------------
// Describe

/// A type that supplies its own description.
///
/// Implementations are usually registered once with a
/// [`Registry`](super::Registry), either explicitly or through the
/// [`auto_register!`](crate::auto_register) macro.
pub trait Describe: Any {
    /// Builds the description. Called at most once per registry.
    fn describe() -> Description;
}

// -----------------------------------------------------------------------------
// Member

/// One tagged member as captured by the builder.
pub(crate) struct Member {
    pub contact: Contact,
    pub tag: Tag,
    pub shape: Shape,
    pub variants: Vec<Variant>,
    pub generation: u32,
}

// -----------------------------------------------------------------------------
// Description

/// The descriptor table for one type: tagged members, constructor
/// candidates, lifecycle hooks, strictness, and ordering.
pub struct Description {
    pub(crate) ty: TypeId,
    pub(crate) type_name: &'static str,
    pub(crate) name: &'static str,
    pub(crate) strict: bool,
    pub(crate) order: Option<Order>,
    pub(crate) members: Vec<Member>,
    pub(crate) initializers: Vec<Initializer>,
    pub(crate) default_init: Option<Initializer>,
    pub(crate) hooks: Hooks,
    generation: u32,
}

impl Description {
    /// Starts a description of `T`, rooted at the given element name.
    pub fn of<T: Any>(name: &'static str) -> Self {
        Self {
            ty: TypeId::of::<T>(),
            type_name: core::any::type_name::<T>(),
            name,
            strict: true,
            order: None,
            members: Vec::new(),
            initializers: Vec::new(),
            default_init: None,
            hooks: Hooks::default(),
            generation: 0,
        }
    }

    /// Sets strict mode. Strict schemas treat unknown document nodes as
    /// errors; non-strict schemas skip them. Defaults to strict.
    #[inline]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Declares the explicit element/attribute write order.
    #[inline]
    pub fn order(mut self, order: Order) -> Self {
        self.order = Some(order);
        self
    }

    /// Merges a base description's members below this one's, so members
    /// declared here shadow base members of the same resolved name. Call
    /// before declaring any members.
    pub fn extend(mut self, base: Description) -> Self {
        let mut inherited = base.members;
        inherited.append(&mut self.members);
        self.members = inherited;
        self.generation = base.generation + 1;
        self
    }

    fn member(mut self, contact: Contact, tag: Tag, shape: Shape, variants: Vec<Variant>) -> Self {
        let generation = self.generation;
        self.members.push(Member {
            contact,
            tag,
            shape,
            variants,
            generation,
        });
        self
    }

    fn scalar(self, contact: Contact, kind: TagKind, tag: Tag) -> Self {
        self.member(contact, tag.with_kind(kind), Shape::Scalar, Vec::new())
    }

    // -- Attributes -----------------------------------------------------------

    /// Declares an attribute member.
    pub fn attribute<T: Any, V: Any>(
        self,
        name: &'static str,
        tag: Tag,
        get: impl Fn(&T) -> &V + Send + Sync + 'static,
        set: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> Self {
        self.scalar(Contact::field(name, get, set), TagKind::Attribute, tag)
    }

    /// Declares an attribute member stored as `Option<V>`.
    pub fn attribute_opt<T: Any, V: Any>(
        self,
        name: &'static str,
        tag: Tag,
        get: impl Fn(&T) -> Option<&V> + Send + Sync + 'static,
        set: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> Self {
        self.scalar(Contact::optional(name, get, set), TagKind::Attribute, tag)
    }

    /// Declares a getter-only attribute member, populated through a
    /// constructor parameter of the same name and type.
    pub fn attribute_read_only<T: Any, V: Any>(
        self,
        name: &'static str,
        tag: Tag,
        get: impl Fn(&T) -> &V + Send + Sync + 'static,
    ) -> Self {
        self.scalar(Contact::read_only(name, get), TagKind::Attribute, tag)
    }

    // -- Elements -------------------------------------------------------------

    /// Declares an element member, primitive or composite.
    pub fn element<T: Any, V: Any>(
        self,
        name: &'static str,
        tag: Tag,
        get: impl Fn(&T) -> &V + Send + Sync + 'static,
        set: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> Self {
        self.scalar(Contact::field(name, get, set), TagKind::Element, tag)
    }

    /// Declares an element member stored as `Option<V>`.
    pub fn element_opt<T: Any, V: Any>(
        self,
        name: &'static str,
        tag: Tag,
        get: impl Fn(&T) -> Option<&V> + Send + Sync + 'static,
        set: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> Self {
        self.scalar(Contact::optional(name, get, set), TagKind::Element, tag)
    }

    /// Declares a getter-only element member, populated through a
    /// constructor parameter of the same name and type.
    pub fn element_read_only<T: Any, V: Any>(
        self,
        name: &'static str,
        tag: Tag,
        get: impl Fn(&T) -> &V + Send + Sync + 'static,
    ) -> Self {
        self.scalar(Contact::read_only(name, get), TagKind::Element, tag)
    }

    /// Declares a union element member: the member holds one of several
    /// alternatives, selected by element name on read and by the held
    /// alternative on write.
    pub fn union<T: Any, U: Any>(
        self,
        name: &'static str,
        tag: Tag,
        get: impl Fn(&T) -> &U + Send + Sync + 'static,
        set: impl Fn(&mut T, U) + Send + Sync + 'static,
        variants: impl IntoIterator<Item = Variant>,
    ) -> Self {
        self.member(
            Contact::field(name, get, set),
            tag.with_kind(TagKind::Element),
            Shape::Scalar,
            variants.into_iter().collect(),
        )
    }

    // -- Collections ----------------------------------------------------------

    /// Declares a sequence member accumulated from repeated entry elements.
    pub fn list<T: Any, C: Sequence>(
        self,
        name: &'static str,
        tag: Tag,
        get: impl Fn(&T) -> &C + Send + Sync + 'static,
        set: impl Fn(&mut T, C) + Send + Sync + 'static,
    ) -> Self {
        self.member(
            Contact::field(name, get, set),
            tag.with_kind(TagKind::ElementList),
            Shape::List(ListOps::of::<C>()),
            Vec::new(),
        )
    }

    /// Declares a sequence member whose entries dispatch over union
    /// alternatives by element name.
    pub fn union_list<T: Any, C: Sequence>(
        self,
        name: &'static str,
        tag: Tag,
        get: impl Fn(&T) -> &C + Send + Sync + 'static,
        set: impl Fn(&mut T, C) + Send + Sync + 'static,
        variants: impl IntoIterator<Item = Variant>,
    ) -> Self {
        self.member(
            Contact::field(name, get, set),
            tag.with_kind(TagKind::ElementList),
            Shape::List(ListOps::of::<C>()),
            variants.into_iter().collect(),
        )
    }

    /// Declares an association member accumulated from repeated entry
    /// elements carrying a key attribute.
    pub fn map<T: Any, C: Association>(
        self,
        name: &'static str,
        tag: Tag,
        get: impl Fn(&T) -> &C + Send + Sync + 'static,
        set: impl Fn(&mut T, C) + Send + Sync + 'static,
    ) -> Self {
        self.member(
            Contact::field(name, get, set),
            tag.with_kind(TagKind::ElementMap),
            Shape::Map(MapOps::of::<C>()),
            Vec::new(),
        )
    }

    // -- Text and version -----------------------------------------------------

    /// Declares the text member: the owning element's character content.
    /// At most one per type, and only alongside attributes.
    pub fn text<T: Any, V: Any>(
        self,
        name: &'static str,
        tag: Tag,
        get: impl Fn(&T) -> &V + Send + Sync + 'static,
        set: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> Self {
        self.scalar(Contact::field(name, get, set), TagKind::Text, tag)
    }

    /// Declares the version member: a revision attribute enabling lenient
    /// matching across document revisions. The tag's `revision` is the
    /// revision this description expects.
    pub fn version<T: Any>(
        self,
        name: &'static str,
        tag: Tag,
        get: impl Fn(&T) -> &f64 + Send + Sync + 'static,
        set: impl Fn(&mut T, f64) + Send + Sync + 'static,
    ) -> Self {
        self.scalar(Contact::field(name, get, set), TagKind::Version, tag)
    }

    // -- Construction ---------------------------------------------------------

    /// Adds a constructor candidate for immutable or read-only members.
    #[inline]
    pub fn ctor(mut self, initializer: Initializer) -> Self {
        self.initializers.push(initializer);
        self
    }

    /// Supplies the default (no-argument) constructor. Used when no
    /// parameterized candidate is selected; every value is then applied
    /// through setters.
    pub fn default_with<T: Any>(mut self, make: impl Fn() -> T + Send + Sync + 'static) -> Self {
        self.default_init = Some(Initializer::default_for(make));
        self
    }

    // -- Lifecycle hooks ------------------------------------------------------

    /// Runs after a read pass produced the instance, before `commit`.
    pub fn on_validate<T: Any>(
        mut self,
        hook: impl Fn(&T) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.hooks.validate = Some(alloc::boxed::Box::new(move |value| {
            match value.downcast_ref::<T>() {
                Some(v) => hook(v),
                None => Ok(()),
            }
        }));
        self
    }

    /// Runs after `validate`, with mutable access to the instance.
    pub fn on_commit<T: Any>(
        mut self,
        hook: impl Fn(&mut T) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.hooks.commit = Some(alloc::boxed::Box::new(move |value| {
            match value.downcast_mut::<T>() {
                Some(v) => hook(v),
                None => Ok(()),
            }
        }));
        self
    }

    /// Runs before any output is produced for an instance being written.
    pub fn on_persist<T: Any>(
        mut self,
        hook: impl Fn(&T) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.hooks.persist = Some(alloc::boxed::Box::new(move |value| {
            match value.downcast_ref::<T>() {
                Some(v) => hook(v),
                None => Ok(()),
            }
        }));
        self
    }

    /// Runs after an instance was written, regardless of failure.
    pub fn on_complete<T: Any>(
        mut self,
        hook: impl Fn(&T) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.hooks.complete = Some(alloc::boxed::Box::new(move |value| {
            match value.downcast_ref::<T>() {
                Some(v) => hook(v),
                None => Ok(()),
            }
        }));
        self
    }

    /// Chooses a substitute (or suppression) for an instance about to be
    /// written.
    pub fn on_replace<T: Any>(
        mut self,
        hook: impl Fn(&T) -> Replaced + Send + Sync + 'static,
    ) -> Self {
        self.hooks.replace = Some(alloc::boxed::Box::new(move |value| {
            match value.downcast_ref::<T>() {
                Some(v) => hook(v),
                None => Replaced::Keep,
            }
        }));
        self
    }

    /// Substitutes the instance produced by a read pass.
    pub fn on_resolve<T: Any>(mut self, hook: impl Fn(T) -> T + Send + Sync + 'static) -> Self {
        self.hooks.resolve = Some(alloc::boxed::Box::new(move |value| {
            match value.downcast::<T>() {
                Ok(v) => Ok(alloc::boxed::Box::new(hook(*v))),
                Err(v) => Ok(v),
            }
        }));
        self
    }

    /// Returns the declared root element name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the `TypeId` of the described type.
    #[inline]
    pub const fn ty(&self) -> TypeId {
        self.ty
    }

    /// Returns the described type's name, for diagnostics.
    #[inline]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl core::fmt::Debug for Description {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Description")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("members", &self.members.len())
            .field("initializers", &self.initializers.len())
            .finish()
    }
}
