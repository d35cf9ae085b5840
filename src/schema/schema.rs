//! The compiled, immutable form of a description.

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId};

use super::hooks::Hooks;
use crate::construct::{Criteria, Initializer, select_initializer};
use crate::error::{ConstructorError, Error};
use crate::label::{Label, LabelMap};
use crate::structure::{ModelId, Structure};

// -----------------------------------------------------------------------------
// Section

/// The label maps of one model: attributes and elements addressable at that
/// position of the document. Stored as templates; every pass clones them.
#[derive(Debug, Clone, Default)]
pub struct Section {
    pub(crate) attributes: LabelMap,
    pub(crate) elements: LabelMap,
}

impl Section {
    /// Returns the attribute label template.
    #[inline]
    pub const fn attributes(&self) -> &LabelMap {
        &self.attributes
    }

    /// Returns the element label template.
    #[inline]
    pub const fn elements(&self) -> &LabelMap {
        &self.elements
    }
}

// -----------------------------------------------------------------------------
// Schema

/// The compiled schema of one described type.
///
/// A schema is built once per type by scanning its description, cached by
/// the registry, and shared read-only between passes: the structure tree
/// gives element positions, each position's [`Section`] holds the labels
/// addressable there, and the constructor candidates plus hooks drive
/// instantiation.
pub struct Schema {
    pub(crate) ty: TypeId,
    pub(crate) type_name: &'static str,
    pub(crate) name: String,
    pub(crate) revision: f64,
    pub(crate) strict: bool,
    pub(crate) structure: Structure,
    pub(crate) sections: Vec<Section>,
    pub(crate) text: Option<Arc<Label>>,
    pub(crate) version: Option<Arc<Label>>,
    pub(crate) read_only: Vec<Arc<Label>>,
    pub(crate) initializers: Vec<Initializer>,
    pub(crate) default_init: Option<Initializer>,
    pub(crate) hooks: Hooks,
}

impl Schema {
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

    /// Returns the styled root element name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the revision this schema expects.
    #[inline]
    pub const fn revision(&self) -> f64 {
        self.revision
    }

    /// Whether unknown document nodes are errors.
    #[inline]
    pub const fn is_strict(&self) -> bool {
        self.strict
    }

    /// Returns the structure tree.
    #[inline]
    pub const fn structure(&self) -> &Structure {
        &self.structure
    }

    /// Returns the label maps for one model of the structure.
    #[inline]
    pub fn section(&self, at: ModelId) -> &Section {
        &self.sections[at]
    }

    /// Returns the text label, if the type declares one.
    #[inline]
    pub const fn text(&self) -> Option<&Arc<Label>> {
        self.text.as_ref()
    }

    /// Returns the version label, if the type declares one.
    #[inline]
    pub const fn version(&self) -> Option<&Arc<Label>> {
        self.version.as_ref()
    }

    /// Returns the getter-only labels, which can only be populated through
    /// a constructor.
    #[inline]
    pub fn read_only(&self) -> &[Arc<Label>] {
        &self.read_only
    }

    /// Returns the lifecycle hooks.
    #[inline]
    pub const fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    /// Instantiates the type from the deserialized values.
    ///
    /// Selects the best-scoring constructor candidate and runs its factory;
    /// when no candidate is viable the default constructor is used instead.
    /// Values the factory did not consume stay in `criteria` for the caller
    /// to flush through setters.
    pub fn construct(&self, criteria: &mut Criteria) -> Result<Box<dyn Any>, Error> {
        let read_only: Vec<&Label> = self.read_only.iter().map(Arc::as_ref).collect();
        if let Some((initializer, _)) = select_initializer(&self.initializers, criteria, &read_only)
        {
            return initializer.construct(criteria);
        }
        match &self.default_init {
            Some(initializer) => initializer.construct(criteria),
            None => Err(ConstructorError::NoMatch {
                owner: Cow::Borrowed(self.type_name),
            }
            .into()),
        }
    }
}

impl core::fmt::Debug for Schema {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("revision", &self.revision)
            .field("strict", &self.strict)
            .field("sections", &self.sections.len())
            .finish()
    }
}
