//! Polymorphic type substitution over document nodes.
//!
//! A [`Strategy`] gets the first and last look at every composite node: on
//! read it may override which registered type gets instantiated, on write it
//! may mark the node with the actual type so a later read can restore it.
//! The stock [`TypeStrategy`] does exactly that through a type attribute;
//! [`NullStrategy`] opts out entirely.

use alloc::string::String;
use core::any::TypeId;

use crate::convert::Session;
use crate::error::Error;
use crate::node::Element;
use crate::schema::Registry;

// -----------------------------------------------------------------------------
// Strategy

/// Hooks into composite conversion for type substitution.
pub trait Strategy: Send + Sync {
    /// Chooses the type to instantiate for `node`, declared as `base`.
    ///
    /// Returning `None` keeps the declared type. Runs before any label
    /// matching, so the strategy sees the node exactly as the document
    /// carries it.
    fn resolve(
        &self,
        base: TypeId,
        node: &Element,
        registry: &Registry,
        session: &mut Session,
    ) -> Result<Option<TypeId>, Error>;

    /// Marks `node` with the actual type of the value being written,
    /// declared as `base`.
    ///
    /// Returning `true` claims the node is complete as marked and the
    /// converter must not write the value's body; reference-tracking
    /// strategies use this to short-circuit repeated values.
    fn mark(
        &self,
        actual: TypeId,
        base: TypeId,
        node: &mut Element,
        registry: &Registry,
        session: &mut Session,
    ) -> Result<bool, Error>;

    /// Whether the named attribute belongs to this strategy and must be
    /// ignored by label matching.
    fn is_marker(&self, name: &str) -> bool {
        let _ = name;
        false
    }
}

// -----------------------------------------------------------------------------
// NullStrategy

/// The no-op strategy: declared types only, no markers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStrategy;

impl Strategy for NullStrategy {
    fn resolve(
        &self,
        _base: TypeId,
        _node: &Element,
        _registry: &Registry,
        _session: &mut Session,
    ) -> Result<Option<TypeId>, Error> {
        Ok(None)
    }

    fn mark(
        &self,
        _actual: TypeId,
        _base: TypeId,
        _node: &mut Element,
        _registry: &Registry,
        _session: &mut Session,
    ) -> Result<bool, Error> {
        Ok(false)
    }
}

// -----------------------------------------------------------------------------
// TypeStrategy

/// Class-attribute substitution: writes the registered name of the actual
/// type into a marker attribute, and resolves that attribute back to the
/// registered type on read.
///
/// Unknown names resolve to the declared type rather than failing, so a
/// document written by a build with more registered types stays readable.
///
/// # Examples
///
/// ```
/// use docbind::strategy::{Strategy, TypeStrategy};
///
/// let strategy = TypeStrategy::new();
/// assert!(strategy.is_marker("class"));
/// let custom = TypeStrategy::with_attribute("type");
/// assert!(custom.is_marker("type"));
/// ```
#[derive(Debug, Clone)]
pub struct TypeStrategy {
    attribute: String,
}

impl Default for TypeStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeStrategy {
    /// Creates the strategy with the conventional `class` attribute.
    pub fn new() -> Self {
        Self::with_attribute("class")
    }

    /// Creates the strategy with a custom marker attribute name.
    pub fn with_attribute(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
        }
    }

    /// Returns the marker attribute name.
    #[inline]
    pub fn attribute(&self) -> &str {
        &self.attribute
    }
}

impl Strategy for TypeStrategy {
    fn resolve(
        &self,
        _base: TypeId,
        node: &Element,
        registry: &Registry,
        _session: &mut Session,
    ) -> Result<Option<TypeId>, Error> {
        match node.attribute(&self.attribute) {
            Some(name) => Ok(registry.find(name)),
            None => Ok(None),
        }
    }

    fn mark(
        &self,
        actual: TypeId,
        base: TypeId,
        node: &mut Element,
        registry: &Registry,
        _session: &mut Session,
    ) -> Result<bool, Error> {
        if actual != base
            && let Some(name) = registry.name_of(actual)
        {
            node.set_attribute(self.attribute.clone(), name);
        }
        Ok(false)
    }

    fn is_marker(&self, name: &str) -> bool {
        name == self.attribute
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Describe, Description};
    use crate::tag::Tag;

    #[derive(Default)]
    struct Base {
        name: String,
    }

    #[derive(Default)]
    struct Special {
        name: String,
    }

    impl Describe for Base {
        fn describe() -> Description {
            Description::of::<Base>("base")
                .default_with(Base::default)
                .element("name", Tag::new(), |b: &Base| &b.name, |b, v| b.name = v)
        }
    }

    impl Describe for Special {
        fn describe() -> Description {
            Description::of::<Special>("special")
                .default_with(Special::default)
                .element("name", Tag::new(), |s: &Special| &s.name, |s, v| s.name = v)
        }
    }

    fn registry() -> Registry {
        let registry = Registry::new();
        registry.register::<Base>();
        registry.register::<Special>();
        registry
    }

    #[test]
    fn resolve_follows_the_marker_attribute() {
        let registry = registry();
        let strategy = TypeStrategy::new();
        let mut session = Session::new();

        let mut node = Element::new("base");
        assert_eq!(
            strategy
                .resolve(TypeId::of::<Base>(), &node, &registry, &mut session)
                .unwrap(),
            None
        );

        node.set_attribute("class", "special");
        assert_eq!(
            strategy
                .resolve(TypeId::of::<Base>(), &node, &registry, &mut session)
                .unwrap(),
            Some(TypeId::of::<Special>())
        );

        // Unknown names fall back to the declared type.
        node.set_attribute("class", "ghost");
        assert_eq!(
            strategy
                .resolve(TypeId::of::<Base>(), &node, &registry, &mut session)
                .unwrap(),
            None
        );
    }

    #[test]
    fn mark_records_only_substituted_types() {
        let registry = registry();
        let strategy = TypeStrategy::new();
        let mut session = Session::new();

        let mut node = Element::new("base");
        strategy
            .mark(
                TypeId::of::<Base>(),
                TypeId::of::<Base>(),
                &mut node,
                &registry,
                &mut session,
            )
            .unwrap();
        assert_eq!(node.attribute("class"), None);

        strategy
            .mark(
                TypeId::of::<Special>(),
                TypeId::of::<Base>(),
                &mut node,
                &registry,
                &mut session,
            )
            .unwrap();
        assert_eq!(node.attribute("class"), Some("special"));
    }
}
