//! The model tree built from path-qualified labels and order declarations.

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;

use super::expression::{Expression, Segment};
use crate::error::SchemaError;

// -----------------------------------------------------------------------------
// Order

/// An explicit ordering declaration for a described type.
///
/// Entries are path expressions; intermediate segments address nested
/// models, the leaf names the element or attribute slot. Every entry must
/// eventually be backed by a registered label or validation fails.
///
/// # Examples
///
/// ```
/// use docbind::structure::Order;
///
/// let order = Order::new()
///     .elements(["c", "a", "b"])
///     .attributes(["id"]);
/// assert_eq!(order.element_entries().len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Order {
    elements: Vec<&'static str>,
    attributes: Vec<&'static str>,
}

impl Order {
    /// Creates an empty declaration.
    #[inline]
    pub const fn new() -> Self {
        Self {
            elements: Vec::new(),
            attributes: Vec::new(),
        }
    }

    /// Declares the element write order.
    pub fn elements(mut self, names: impl IntoIterator<Item = &'static str>) -> Self {
        self.elements.extend(names);
        self
    }

    /// Declares the attribute write order.
    pub fn attributes(mut self, names: impl IntoIterator<Item = &'static str>) -> Self {
        self.attributes.extend(names);
        self
    }

    /// Returns the declared element entries.
    #[inline]
    pub fn element_entries(&self) -> &[&'static str] {
        &self.elements
    }

    /// Returns the declared attribute entries.
    #[inline]
    pub fn attribute_entries(&self) -> &[&'static str] {
        &self.attributes
    }
}

// -----------------------------------------------------------------------------
// Model

/// Identifies one [`Model`] within a [`Structure`] arena.
pub type ModelId = usize;

/// One ordered element slot of a model: either a label leaf or a nested
/// model the writer descends into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// An element label registered at this depth, by external name.
    /// `backed` is `false` while the slot only exists from an order
    /// declaration.
    Element { name: String, backed: bool },
    /// A nested model, written as one child element.
    Model(ModelId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttributeSlot {
    name: String,
    backed: bool,
}

/// A node in the structure tree: an element position with its registered
/// attribute names and ordered element slots.
#[derive(Debug, Clone)]
pub struct Model {
    name: String,
    index: usize,
    attributes: Vec<AttributeSlot>,
    elements: Vec<Slot>,
    children: Vec<ModelId>,
}

impl Model {
    fn new(name: String, index: usize) -> Self {
        Self {
            name,
            index,
            attributes: Vec::new(),
            elements: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Returns the element name of this model; empty for the root.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the one-based repetition index of this model.
    #[inline]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Returns the ordered element slots.
    #[inline]
    pub fn slots(&self) -> &[Slot] {
        &self.elements
    }

    /// Returns the registered attribute names in write order.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|a| a.name.as_str())
    }
}

// -----------------------------------------------------------------------------
// Structure

/// The tree of addressable models for one schema, stored as an arena with
/// the root at id `0`. Built during the scan, then read-only.
#[derive(Debug, Clone)]
pub struct Structure {
    models: Vec<Model>,
}

impl Default for Structure {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Structure {
    /// Creates a structure holding only the root model.
    pub fn new() -> Self {
        Self {
            models: alloc::vec![Model::new(String::new(), 1)],
        }
    }

    /// Returns the root model id.
    #[inline]
    pub const fn root(&self) -> ModelId {
        0
    }

    /// Returns the model with the given id.
    #[inline]
    pub fn model(&self, id: ModelId) -> &Model {
        &self.models[id]
    }

    /// The number of models, including the root.
    #[inline]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Whether the structure holds only the root model.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.models.len() == 1
    }

    fn ensure_child(&mut self, at: ModelId, name: &str, index: usize) -> ModelId {
        let found = self.models[at]
            .children
            .iter()
            .copied()
            .find(|&c| self.models[c].name == name && self.models[c].index == index);
        if let Some(id) = found {
            return id;
        }
        let id = self.models.len();
        self.models.push(Model::new(String::from(name), index));
        self.models[at].children.push(id);
        self.models[at].elements.push(Slot::Model(id));
        id
    }

    /// Creates or reuses the models along `segments`, returning the deepest.
    pub fn resolve(&mut self, segments: &[Segment]) -> ModelId {
        let mut at = self.root();
        for segment in segments {
            at = self.ensure_child(at, &segment.name, segment.index);
        }
        at
    }

    /// Returns the model addressed by `expression` without creating any,
    /// or `None` when the path is not part of this structure.
    pub fn lookup(&self, expression: &Expression) -> Option<ModelId> {
        let mut at = self.root();
        for segment in expression.segments() {
            at = self.models[at]
                .children
                .iter()
                .copied()
                .find(|&c| self.models[c].name == segment.name && self.models[c].index == segment.index)?;
        }
        Some(at)
    }

    /// Registers an element label at `at`, backing a pre-registered order
    /// slot of the same name when one exists.
    pub fn register_element(&mut self, at: ModelId, name: &str) {
        for slot in &mut self.models[at].elements {
            if let Slot::Element { name: n, backed } = slot
                && n == name
            {
                *backed = true;
                return;
            }
        }
        self.models[at].elements.push(Slot::Element {
            name: String::from(name),
            backed: true,
        });
    }

    /// Pre-registers an element slot from an order declaration.
    pub fn expect_element(&mut self, at: ModelId, name: &str) {
        let exists = self.models[at]
            .elements
            .iter()
            .any(|s| matches!(s, Slot::Element { name: n, .. } if n == name));
        if !exists {
            self.models[at].elements.push(Slot::Element {
                name: String::from(name),
                backed: false,
            });
        }
    }

    /// Registers an attribute label at `at`.
    pub fn register_attribute(&mut self, at: ModelId, name: &str) {
        for slot in &mut self.models[at].attributes {
            if slot.name == name {
                slot.backed = true;
                return;
            }
        }
        self.models[at].attributes.push(AttributeSlot {
            name: String::from(name),
            backed: true,
        });
    }

    /// Pre-registers an attribute slot from an order declaration.
    pub fn expect_attribute(&mut self, at: ModelId, name: &str) {
        let exists = self.models[at].attributes.iter().any(|s| s.name == name);
        if !exists {
            self.models[at].attributes.push(AttributeSlot {
                name: String::from(name),
                backed: false,
            });
        }
    }

    /// Returns the child model for one more occurrence of `name` under
    /// `at`. The occurrence count is one-based and selects among repeated
    /// same-name models.
    pub fn child(&self, at: ModelId, name: &str, occurrence: usize) -> Option<ModelId> {
        self.models[at]
            .children
            .iter()
            .copied()
            .find(|&c| self.models[c].name == name && self.models[c].index == occurrence)
    }

    /// Whether any child model under `at` has the given name.
    pub fn is_child(&self, at: ModelId, name: &str) -> bool {
        self.models[at]
            .children
            .iter()
            .any(|&c| self.models[c].name == name)
    }

    /// Checks that every slot created by an order declaration was backed by
    /// a real label registration.
    pub fn validate(&self, owner: &'static str) -> Result<(), SchemaError> {
        for model in &self.models {
            for slot in &model.elements {
                if let Slot::Element {
                    name,
                    backed: false,
                } = slot
                {
                    return Err(SchemaError::UnknownOrderEntry {
                        name: name.clone(),
                        owner: Cow::Borrowed(owner),
                    });
                }
            }
            for slot in &model.attributes {
                if !slot.backed {
                    return Err(SchemaError::UnknownOrderEntry {
                        name: slot.name.clone(),
                        owner: Cow::Borrowed(owner),
                    });
                }
            }
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_slots_precede_labels() {
        let mut structure = Structure::new();
        let root = structure.root();
        structure.expect_element(root, "c");
        structure.expect_element(root, "a");
        structure.register_element(root, "a");
        structure.register_element(root, "b");
        structure.register_element(root, "c");

        let names: Vec<&str> = structure
            .model(root)
            .slots()
            .iter()
            .map(|s| match s {
                Slot::Element { name, .. } => name.as_str(),
                Slot::Model(_) => "<model>",
            })
            .collect();
        assert_eq!(names, ["c", "a", "b"]);
        assert!(structure.validate("tests::T").is_ok());
    }

    #[test]
    fn unbacked_order_entry_fails_validation() {
        let mut structure = Structure::new();
        let root = structure.root();
        structure.expect_element(root, "ghost");

        let err = structure.validate("tests::T").unwrap_err();
        assert!(matches!(
            err,
            SchemaError::UnknownOrderEntry { name, .. } if name == "ghost"
        ));
    }

    #[test]
    fn nested_models_are_reused() {
        let mut structure = Structure::new();
        let path = Expression::parse("a/b").unwrap();
        let deep = structure.resolve(path.segments());
        let again = structure.resolve(path.segments());
        assert_eq!(deep, again);

        structure.register_element(deep, "leaf");
        assert_eq!(structure.lookup(&path), Some(deep));
        assert!(structure.lookup(&Expression::parse("a/x").unwrap()).is_none());
    }

    #[test]
    fn repeated_sections_by_index() {
        let mut structure = Structure::new();
        let first = structure.resolve(Expression::parse("entry[1]").unwrap().segments());
        let second = structure.resolve(Expression::parse("entry[2]").unwrap().segments());
        assert_ne!(first, second);

        let root = structure.root();
        assert_eq!(structure.child(root, "entry", 1), Some(first));
        assert_eq!(structure.child(root, "entry", 2), Some(second));
        assert_eq!(structure.child(root, "entry", 3), None);
        assert!(structure.is_child(root, "entry"));
    }
}
