//! The label model: a contact plus its tag semantics.
//!
//! A [`Label`] binds one [`Contact`] to one [`Tag`], resolving the external
//! name through the naming style, parsing the placement path, and fixing
//! derived values (entry name, key name, union alternative names) once at
//! schema build. Labels are immutable afterwards and shared via `Arc`
//! between the schema's flat maps and the structure tree.

mod map;
mod shape;
mod variant;

pub use map::LabelMap;
pub use shape::{Association, ListOps, MapOps, Sequence, Shape};
pub use variant::Variant;

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::TypeId;

use crate::contact::Contact;
use crate::error::SchemaError;
use crate::structure::Expression;
use crate::style::Style;
use crate::tag::{Tag, TagKind};
use crate::util::new_set;

// -----------------------------------------------------------------------------
// Label

/// One tagged member of a described type, with all derived values resolved.
pub struct Label {
    contact: Contact,
    tag: Tag,
    name: String,
    expression: Option<Expression>,
    entry: String,
    key: String,
    shape: Shape,
    variants: Vec<Variant>,
}

impl Label {
    /// Resolves a label from its contact, tag, shape, and union
    /// alternatives, applying the naming style to every external name.
    pub(crate) fn build(
        contact: Contact,
        tag: Tag,
        shape: Shape,
        mut variants: Vec<Variant>,
        style: &dyn Style,
    ) -> Result<Self, SchemaError> {
        let declared = tag.name_override().unwrap_or(contact.name());
        let name = if tag.kind().is_attribute() {
            style.attribute(declared)
        } else {
            style.element(declared)
        };

        let expression = match tag.path_expression() {
            Some(path) => {
                let mut expression = Expression::parse(path)?;
                expression.restyle(|segment| style.element(segment));
                Some(expression)
            }
            None => None,
        };

        let entry = style.element(tag.entry_name().unwrap_or("entry"));
        let key = style.attribute(tag.key_name().unwrap_or("key"));

        let mut seen = new_set();
        for variant in &mut variants {
            variant.set_name(style.element(variant.declared()));
            if !seen.insert(String::from(variant.name())) {
                return Err(SchemaError::DuplicateAlternative {
                    name: Cow::Borrowed(variant.declared()),
                    owner: Cow::Borrowed(contact.owner_name()),
                });
            }
        }

        Ok(Self {
            contact,
            tag,
            name,
            expression,
            entry,
            key,
            shape,
            variants,
        })
    }

    /// Returns the contact this label reads and writes through.
    #[inline]
    pub const fn contact(&self) -> &Contact {
        &self.contact
    }

    /// Returns the declarative tag.
    #[inline]
    pub const fn tag(&self) -> &Tag {
        &self.tag
    }

    /// Returns the resolved external name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the name values can be matched under when selecting a
    /// constructor: the member name itself.
    #[inline]
    pub const fn criteria_key(&self) -> &'static str {
        self.contact.name()
    }

    /// Returns the names this label occupies in the document: the
    /// alternative names for a union, the entry name for an inline
    /// collection, otherwise the resolved name.
    pub fn document_names(&self) -> impl Iterator<Item = &str> {
        let single = if self.is_union() {
            None
        } else if self.is_collection() && self.is_inline() {
            Some(self.entry.as_str())
        } else {
            Some(self.name.as_str())
        };
        self.variants.iter().map(Variant::name).chain(single)
    }

    /// Returns the parsed placement path, if the tag declared one.
    #[inline]
    pub const fn expression(&self) -> Option<&Expression> {
        self.expression.as_ref()
    }

    /// Returns the entry element name for collections.
    #[inline]
    pub fn entry(&self) -> &str {
        &self.entry
    }

    /// Returns the key attribute name for associations.
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the value shape.
    #[inline]
    pub const fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the union alternatives; empty for ordinary labels.
    #[inline]
    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    /// Whether this label is a union over several alternatives.
    #[inline]
    pub fn is_union(&self) -> bool {
        !self.variants.is_empty()
    }

    /// Finds the alternative with the given external name.
    pub fn variant_named(&self, name: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.name() == name)
    }

    /// Finds the alternative the member value currently holds.
    pub fn variant_of<'a>(
        &'a self,
        member: &'a dyn core::any::Any,
    ) -> Option<(&'a Variant, &'a dyn core::any::Any)> {
        self.variants
            .iter()
            .find_map(|v| v.project(member).map(|value| (v, value)))
    }

    /// Whether the member must be present in the document.
    #[inline]
    pub const fn is_required(&self) -> bool {
        self.tag.is_required()
    }

    /// Whether the label maps to an attribute.
    #[inline]
    pub const fn is_attribute(&self) -> bool {
        self.tag.kind().is_attribute()
    }

    /// Whether the label accumulates repeated occurrences.
    #[inline]
    pub const fn is_collection(&self) -> bool {
        self.tag.kind().is_collection()
    }

    /// Whether a collection label writes entries without a wrapper element.
    #[inline]
    pub const fn is_inline(&self) -> bool {
        self.tag.is_inline()
    }

    /// Whether text is written as character data.
    #[inline]
    pub const fn is_data(&self) -> bool {
        self.tag.is_data()
    }

    /// Whether this is the text label.
    #[inline]
    pub fn is_text(&self) -> bool {
        self.tag.kind() == TagKind::Text
    }

    /// Whether this is the version label.
    #[inline]
    pub fn is_version(&self) -> bool {
        self.tag.kind() == TagKind::Version
    }

    /// Returns the default value text for an absent optional member.
    #[inline]
    pub const fn empty_value(&self) -> Option<&'static str> {
        self.tag.empty_value()
    }

    /// Returns the `TypeId` of the member value.
    #[inline]
    pub const fn ty(&self) -> TypeId {
        self.contact.ty()
    }

    /// Returns the member value type name, for diagnostics.
    #[inline]
    pub const fn type_name(&self) -> &'static str {
        self.contact.type_name()
    }
}

impl core::fmt::Debug for Label {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Label")
            .field("name", &self.name)
            .field("kind", &self.tag.kind())
            .field("required", &self.is_required())
            .field("type_name", &self.type_name())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests
