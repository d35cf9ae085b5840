//! Sequential read cursor over an [`Element`].

use super::element::{Attribute, Element};

// -----------------------------------------------------------------------------
// InputNode

/// A cursor over one element, consuming its children in document order.
///
/// Each call to [`next`](Self::next) yields a fresh cursor positioned on the
/// following child; [`skip`](Self::skip) discards one child without
/// descending into it.
///
/// # Examples
///
/// ```
/// use docbind::node::{Element, InputNode};
///
/// let mut root = Element::new("root");
/// root.add_child(Element::with_value("a", "1"));
/// root.add_child(Element::with_value("b", "2"));
///
/// let mut input = InputNode::new(&root);
/// assert_eq!(input.next().unwrap().name(), "a");
/// assert_eq!(input.next().unwrap().name(), "b");
/// assert!(input.next().is_none());
/// ```
#[derive(Debug)]
pub struct InputNode<'a> {
    element: &'a Element,
    position: usize,
}

impl<'a> InputNode<'a> {
    /// Creates a cursor positioned before the first child of `element`.
    #[inline]
    pub const fn new(element: &'a Element) -> Self {
        Self {
            element,
            position: 0,
        }
    }

    /// Returns the element this cursor reads.
    #[inline]
    pub const fn element(&self) -> &'a Element {
        self.element
    }

    /// Returns the element name.
    #[inline]
    pub fn name(&self) -> &'a str {
        self.element.name()
    }

    /// Returns the element's text value, if any.
    #[inline]
    pub fn value(&self) -> Option<&'a str> {
        self.element.value()
    }

    /// Returns the element's attributes in document order.
    #[inline]
    pub fn attributes(&self) -> &'a [Attribute] {
        self.element.attributes()
    }

    /// Returns the source line of the element, if attached.
    #[inline]
    pub const fn line(&self) -> Option<u32> {
        self.element.line()
    }

    /// Consumes and returns the next child, or `None` when exhausted.
    pub fn next(&mut self) -> Option<InputNode<'a>> {
        let child = self.element.children().get(self.position)?;
        self.position += 1;
        Some(InputNode::new(child))
    }

    /// Consumes and returns the next child only if it has the given name.
    pub fn next_named(&mut self, name: &str) -> Option<InputNode<'a>> {
        let child = self.element.children().get(self.position)?;
        if child.name() != name {
            return None;
        }
        self.position += 1;
        Some(InputNode::new(child))
    }

    /// Discards the next child without descending into it.
    #[inline]
    pub fn skip(&mut self) {
        if self.position < self.element.children().len() {
            self.position += 1;
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_named_only_matches_in_order() {
        let mut root = Element::new("root");
        root.add_child(Element::new("a"));
        root.add_child(Element::new("b"));

        let mut input = InputNode::new(&root);
        assert!(input.next_named("b").is_none());
        assert!(input.next_named("a").is_some());
        assert!(input.next_named("b").is_some());
        assert!(input.next().is_none());
    }

    #[test]
    fn skip_discards_one_child() {
        let mut root = Element::new("root");
        root.add_child(Element::new("a"));
        root.add_child(Element::new("b"));

        let mut input = InputNode::new(&root);
        input.skip();
        assert_eq!(input.next().unwrap().name(), "b");
    }
}
