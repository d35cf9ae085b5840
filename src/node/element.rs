//! The document tree node.

use alloc::string::String;
use alloc::vec::Vec;

// -----------------------------------------------------------------------------
// Attribute

/// A single name/value attribute on an [`Element`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    /// Creates an attribute.
    #[inline]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

// -----------------------------------------------------------------------------
// Element

/// One node of the hierarchical document: a name, ordered attributes,
/// ordered child elements, and an optional text value.
///
/// The optional source line is diagnostic data a tokenizer may attach; the
/// engine only reads it back into error positions.
///
/// # Examples
///
/// ```
/// use docbind::node::Element;
///
/// let mut root = Element::new("person");
/// root.set_attribute("id", "7");
/// root.add_child(Element::with_value("name", "x"));
///
/// assert_eq!(root.attribute("id"), Some("7"));
/// assert_eq!(root.children()[0].value(), Some("x"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: String,
    attributes: Vec<Attribute>,
    children: Vec<Element>,
    value: Option<String>,
    data: bool,
    line: Option<u32>,
}

impl Element {
    /// Creates an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            value: None,
            data: false,
            line: None,
        }
    }

    /// Creates an element holding only a text value.
    pub fn with_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut element = Self::new(name);
        element.value = Some(value.into());
        element
    }

    /// Returns the element name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the text value, if any.
    #[inline]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Sets the text value.
    #[inline]
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = Some(value.into());
    }

    /// Whether the text value is marked as character data.
    #[inline]
    pub const fn is_data(&self) -> bool {
        self.data
    }

    /// Marks the text value as character data.
    #[inline]
    pub const fn set_data(&mut self, data: bool) {
        self.data = data;
    }

    /// Returns the attributes in document order.
    #[inline]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Returns the value of the named attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Sets an attribute, replacing an existing one of the same name.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value,
            None => self.attributes.push(Attribute::new(name, value)),
        }
    }

    /// Removes and returns the named attribute value.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let at = self.attributes.iter().position(|a| a.name == name)?;
        Some(self.attributes.remove(at).value)
    }

    /// Returns the child elements in document order.
    #[inline]
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Appends a child element.
    #[inline]
    pub fn add_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Appends an empty child element and returns a mutable reference to it.
    pub fn new_child(&mut self, name: impl Into<String>) -> &mut Element {
        self.children.push(Element::new(name));
        self.children.last_mut().unwrap()
    }

    /// Returns the first child with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Returns the source line, if the producer attached one.
    #[inline]
    pub const fn line(&self) -> Option<u32> {
        self.line
    }

    /// Attaches a source line for diagnostics.
    #[inline]
    pub const fn set_line(&mut self, line: u32) {
        self.line = Some(line);
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_replace_by_name() {
        let mut element = Element::new("e");
        element.set_attribute("a", "1");
        element.set_attribute("a", "2");

        assert_eq!(element.attributes().len(), 1);
        assert_eq!(element.attribute("a"), Some("2"));
        assert_eq!(element.remove_attribute("a").as_deref(), Some("2"));
        assert_eq!(element.attribute("a"), None);
    }

    #[test]
    fn children_keep_order() {
        let mut element = Element::new("e");
        element.new_child("b");
        element.new_child("a");

        let names: Vec<&str> = element.children().iter().map(Element::name).collect();
        assert_eq!(names, ["b", "a"]);
        assert!(element.child("a").is_some());
        assert!(element.child("c").is_none());
    }
}
