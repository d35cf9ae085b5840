//! Ordered, name-indexed label collections.

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use super::Label;
use crate::error::SchemaError;
use crate::util::HashMap;

// -----------------------------------------------------------------------------
// LabelMap

/// An ordered map of labels indexed by every document name they occupy.
///
/// The schema holds one immutable template per model; each read or write
/// pass clones it and consumes entries with [`take`](Self::take) as document
/// nodes are matched, so whatever remains afterwards is exactly the set of
/// unsatisfied labels.
#[derive(Debug, Clone, Default)]
pub struct LabelMap {
    labels: Vec<Option<Arc<Label>>>,
    index: HashMap<String, usize>,
}

impl LabelMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a label under all of its document names, preserving
    /// registration order. Fails on a duplicate name.
    pub fn insert(&mut self, label: Arc<Label>) -> Result<(), SchemaError> {
        let at = self.labels.len();
        for name in label.document_names() {
            if self.index.contains_key(name) {
                return Err(SchemaError::DuplicateName {
                    name: String::from(name),
                    owner: label.contact().owner_name().into(),
                });
            }
            self.index.insert(String::from(name), at);
        }
        self.labels.push(Some(label));
        Ok(())
    }

    /// Returns the label occupying `name`, if present and not consumed.
    pub fn get(&self, name: &str) -> Option<&Arc<Label>> {
        let &at = self.index.get(name)?;
        self.labels[at].as_ref()
    }

    /// Consumes and returns the label occupying `name`. All of the label's
    /// names stop matching afterwards.
    pub fn take(&mut self, name: &str) -> Option<Arc<Label>> {
        let &at = self.index.get(name)?;
        self.labels[at].take()
    }

    /// Whether any label occupies `name`.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns the remaining labels in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Label>> {
        self.labels.iter().filter_map(Option::as_ref)
    }

    /// The number of remaining labels.
    pub fn len(&self) -> usize {
        self.labels.iter().filter(|l| l.is_some()).count()
    }

    /// Whether no labels remain.
    pub fn is_empty(&self) -> bool {
        self.labels.iter().all(Option::is_none)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::Contact;
    use crate::label::Shape;
    use crate::style::Identity;
    use crate::tag::{TagKind, implicit};

    struct Sample {
        a: u32,
        b: u32,
    }

    fn label(name: &'static str) -> Arc<Label> {
        let contact = match name {
            "a" => Contact::field::<Sample, u32>("a", |s| &s.a, |s, v| s.a = v),
            _ => Contact::field::<Sample, u32>("b", |s| &s.b, |s, v| s.b = v),
        };
        Arc::new(
            Label::build(
                contact,
                implicit(TagKind::Element).name(name),
                Shape::Scalar,
                Vec::new(),
                &Identity,
            )
            .unwrap(),
        )
    }

    #[test]
    fn keeps_registration_order() {
        let mut map = LabelMap::new();
        map.insert(label("b")).unwrap();
        map.insert(label("a")).unwrap();

        let names: Vec<&str> = map.iter().map(|l| l.name()).collect();
        assert_eq!(names, ["b", "a"]);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut map = LabelMap::new();
        map.insert(label("a")).unwrap();
        let err = map.insert(label("a")).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateName { name, .. } if name == "a"));
    }

    #[test]
    fn take_consumes_for_the_whole_pass() {
        let mut template = LabelMap::new();
        template.insert(label("a")).unwrap();
        template.insert(label("b")).unwrap();

        let mut pass = template.clone();
        assert!(pass.take("a").is_some());
        assert!(pass.take("a").is_none());
        assert_eq!(pass.len(), 1);

        // The template is untouched.
        assert_eq!(template.len(), 2);
    }
}
