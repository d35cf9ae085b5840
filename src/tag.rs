//! Declarative tags attached to described members.
//!
//! A [`Tag`] is the annotation data of a member: its external name override,
//! required-ness, default value, collection entry naming, CDATA flag, nested
//! placement path, and version revision. Tags are plain values built with a
//! small builder API and stored on the label once the type is scanned.
//!
//! # Examples
//!
//! ```
//! use docbind::tag::Tag;
//!
//! let tag = Tag::new().name("member-id").required(false).empty("0");
//! assert_eq!(tag.name_override(), Some("member-id"));
//! assert!(!tag.is_required());
//! ```

// -----------------------------------------------------------------------------
// TagKind

/// The kind of document construct a tag maps its member to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    /// An attribute on the owning element.
    Attribute,
    /// A child element.
    Element,
    /// A repeated child element accumulated into a sequence.
    ElementList,
    /// Repeated entry elements accumulated into an association.
    ElementMap,
    /// The text value of the owning element.
    Text,
    /// The version attribute of the owning element.
    Version,
}

impl TagKind {
    /// Whether this kind maps to an attribute on the owning element.
    #[inline]
    pub const fn is_attribute(self) -> bool {
        matches!(self, Self::Attribute | Self::Version)
    }

    /// Whether this kind accumulates repeated occurrences.
    #[inline]
    pub const fn is_collection(self) -> bool {
        matches!(self, Self::ElementList | Self::ElementMap)
    }
}

// -----------------------------------------------------------------------------
// Tag

/// The declarative data carried by one tagged member.
///
/// A fresh tag is an element-kind tag with `required = true` and no
/// overrides; the description builder that receives it fixes the kind.
#[derive(Debug, Clone)]
pub struct Tag {
    kind: TagKind,
    name: Option<&'static str>,
    required: bool,
    empty: Option<&'static str>,
    entry: Option<&'static str>,
    key: Option<&'static str>,
    data: bool,
    inline: bool,
    path: Option<&'static str>,
    revision: f64,
}

/// The revision a schema carries when no version label declares one.
pub const DEFAULT_REVISION: f64 = 1.0;

impl Default for Tag {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Tag {
    /// Creates a tag with no overrides. Members are required by default.
    #[inline]
    pub const fn new() -> Self {
        Self {
            kind: TagKind::Element,
            name: None,
            required: true,
            empty: None,
            entry: None,
            key: None,
            data: false,
            inline: false,
            path: None,
            revision: DEFAULT_REVISION,
        }
    }

    /// Overrides the external name of the member.
    #[inline]
    pub const fn name(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    /// Marks the member optional or required. Members default to required.
    #[inline]
    pub const fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Supplies a default value text used when an optional primitive member
    /// is absent from the document.
    #[inline]
    pub const fn empty(mut self, empty: &'static str) -> Self {
        self.empty = Some(empty);
        self
    }

    /// Names the entry elements of a collection member.
    #[inline]
    pub const fn entry(mut self, entry: &'static str) -> Self {
        self.entry = Some(entry);
        self
    }

    /// Names the key attribute of an association member's entries.
    #[inline]
    pub const fn key(mut self, key: &'static str) -> Self {
        self.key = Some(key);
        self
    }

    /// Writes the member's text as a CDATA section.
    #[inline]
    pub const fn data(mut self, data: bool) -> Self {
        self.data = data;
        self
    }

    /// Inlines a collection: entries appear directly under the owning
    /// element instead of being wrapped by the member's element.
    #[inline]
    pub const fn inline(mut self, inline: bool) -> Self {
        self.inline = inline;
        self
    }

    /// Places the member at a nested location, e.g. `"contact/address"`.
    /// A trailing `@` segment is not allowed here; the kind of the member
    /// decides whether the leaf is an element or an attribute.
    #[inline]
    pub const fn path(mut self, path: &'static str) -> Self {
        self.path = Some(path);
        self
    }

    /// Sets the revision carried by a version member.
    #[inline]
    pub const fn revision(mut self, revision: f64) -> Self {
        self.revision = revision;
        self
    }

    pub(crate) const fn with_kind(mut self, kind: TagKind) -> Self {
        self.kind = kind;
        self
    }

    /// Returns the kind of document construct the member maps to.
    #[inline]
    pub const fn kind(&self) -> TagKind {
        self.kind
    }

    /// Returns the explicit name override, if any.
    #[inline]
    pub const fn name_override(&self) -> Option<&'static str> {
        self.name
    }

    /// Whether the member must be present in the document.
    #[inline]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Returns the default value text for an absent optional member.
    #[inline]
    pub const fn empty_value(&self) -> Option<&'static str> {
        self.empty
    }

    /// Returns the entry element name override.
    #[inline]
    pub const fn entry_name(&self) -> Option<&'static str> {
        self.entry
    }

    /// Returns the key attribute name override.
    #[inline]
    pub const fn key_name(&self) -> Option<&'static str> {
        self.key
    }

    /// Whether text is written as CDATA.
    #[inline]
    pub const fn is_data(&self) -> bool {
        self.data
    }

    /// Whether a collection is written without a wrapping element.
    #[inline]
    pub const fn is_inline(&self) -> bool {
        self.inline
    }

    /// Returns the nested placement path, if any.
    #[inline]
    pub const fn path_expression(&self) -> Option<&'static str> {
        self.path
    }

    /// Returns the revision of a version member.
    #[inline]
    pub const fn version_revision(&self) -> f64 {
        self.revision
    }
}

// -----------------------------------------------------------------------------
// Implicit tags

/// Produces the tag an untagged member of the given kind would carry.
///
/// Union alternatives and entry values frequently need no explicit tag; this
/// factory inspects the statically known shape and returns the plain
/// descriptor value for it.
#[inline]
pub fn implicit(kind: TagKind) -> Tag {
    Tag::new().with_kind(kind)
}
