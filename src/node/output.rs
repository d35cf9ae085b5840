//! Append-only write handle over an [`Element`] under construction.

use alloc::string::String;

use super::element::Element;

// -----------------------------------------------------------------------------
// OutputNode

/// A write handle appending attributes, children, and text to one element.
///
/// [`commit`](Self::commit) finalizes the node; with the in-memory tree it
/// is a no-op, but converters call it so a streaming writer behind the same
/// surface could flush.
#[derive(Debug)]
pub struct OutputNode<'a> {
    element: &'a mut Element,
}

impl<'a> OutputNode<'a> {
    /// Creates a write handle over `element`.
    #[inline]
    pub const fn new(element: &'a mut Element) -> Self {
        Self { element }
    }

    /// Returns the element being written.
    #[inline]
    pub const fn element(&mut self) -> &mut Element {
        self.element
    }

    /// Returns the element name.
    #[inline]
    pub fn name(&self) -> &str {
        self.element.name()
    }

    /// Sets an attribute on the element.
    #[inline]
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.element.set_attribute(name, value);
    }

    /// Appends a child element and returns a handle writing into it.
    #[inline]
    pub fn child(&mut self, name: impl Into<String>) -> OutputNode<'_> {
        OutputNode::new(self.element.new_child(name))
    }

    /// Sets the element's text value.
    #[inline]
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.element.set_value(value);
    }

    /// Marks the text value as character data.
    #[inline]
    pub const fn set_data(&mut self, data: bool) {
        self.element.set_data(data);
    }

    /// Finalizes the node.
    #[inline]
    pub fn commit(self) {}
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_through_to_element() {
        let mut element = Element::new("root");
        let mut output = OutputNode::new(&mut element);
        output.set_attribute("a", "1");
        {
            let mut child = output.child("c");
            child.set_value("text");
            child.set_data(true);
            child.commit();
        }
        output.commit();

        assert_eq!(element.attribute("a"), Some("1"));
        let child = element.child("c").unwrap();
        assert_eq!(child.value(), Some("text"));
        assert!(child.is_data());
    }
}
