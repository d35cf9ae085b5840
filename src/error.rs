//! Error taxonomy for schema building and document conversion.
//!
//! All errors are synchronous and fail-fast: a failing scan or conversion
//! aborts the current call and propagates to the caller with the offending
//! label, type, and (for document errors) the source line when the node
//! carries one. Schema errors are cached by the registry as permanent
//! failures for their type, so every error here is cheaply cloneable.

use alloc::borrow::Cow;
use alloc::string::String;
use core::{error, fmt};

// -----------------------------------------------------------------------------
// Error

/// Top-level error returned by every fallible operation in this crate.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The type's description is inconsistent; raised at first scan and
    /// cached as a permanent failure for that type.
    Schema(SchemaError),
    /// No constructor candidate can be satisfied by the deserialized values.
    Constructor(ConstructorError),
    /// The document does not match the schema.
    Document(DocumentError),
    /// A primitive string/value transform failed.
    Transform(TransformError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schema(e) => e.fmt(f),
            Self::Constructor(e) => e.fmt(f),
            Self::Document(e) => e.fmt(f),
            Self::Transform(e) => e.fmt(f),
        }
    }
}

impl error::Error for Error {}

impl From<SchemaError> for Error {
    #[inline]
    fn from(value: SchemaError) -> Self {
        Self::Schema(value)
    }
}

impl From<ConstructorError> for Error {
    #[inline]
    fn from(value: ConstructorError) -> Self {
        Self::Constructor(value)
    }
}

impl From<DocumentError> for Error {
    #[inline]
    fn from(value: DocumentError) -> Self {
        Self::Document(value)
    }
}

impl From<TransformError> for Error {
    #[inline]
    fn from(value: TransformError) -> Self {
        Self::Transform(value)
    }
}

// -----------------------------------------------------------------------------
// SchemaError

/// An inconsistency in a type's description, detected while scanning it into
/// a schema or while resolving a label's converter.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// Two labels resolved to the same external name.
    DuplicateName {
        name: String,
        owner: Cow<'static, str>,
    },
    /// More than one text label was declared.
    MultipleText { owner: Cow<'static, str> },
    /// More than one version label was declared.
    MultipleVersion { owner: Cow<'static, str> },
    /// A text label coexists with element labels.
    TextConflict { owner: Cow<'static, str> },
    /// An order declaration names an element or attribute never registered.
    UnknownOrderEntry {
        name: String,
        owner: Cow<'static, str>,
    },
    /// A getter-only label has no constructor parameter with a matching
    /// name and type, so it could never be populated.
    ReadOnlyWithoutParameter {
        name: Cow<'static, str>,
        owner: Cow<'static, str>,
    },
    /// Two union alternatives share a name.
    DuplicateAlternative {
        name: Cow<'static, str>,
        owner: Cow<'static, str>,
    },
    /// The label's type is neither primitive nor described, so no converter
    /// can represent it.
    CannotRepresent {
        label: Cow<'static, str>,
        ty: Cow<'static, str>,
    },
    /// A path expression failed to parse.
    InvalidPath {
        path: String,
        offset: usize,
        reason: Cow<'static, str>,
    },
    /// The type was never registered with the registry.
    NotDescribed { ty: Cow<'static, str> },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateName { name, owner } => {
                write!(f, "duplicate label name `{name}` in `{owner}`")
            }
            Self::MultipleText { owner } => {
                write!(f, "more than one text label declared in `{owner}`")
            }
            Self::MultipleVersion { owner } => {
                write!(f, "more than one version label declared in `{owner}`")
            }
            Self::TextConflict { owner } => {
                write!(f, "text label cannot coexist with elements in `{owner}`")
            }
            Self::UnknownOrderEntry { name, owner } => {
                write!(f, "order entry `{name}` is never registered in `{owner}`")
            }
            Self::ReadOnlyWithoutParameter { name, owner } => {
                write!(
                    f,
                    "read-only label `{name}` in `{owner}` has no matching constructor parameter"
                )
            }
            Self::DuplicateAlternative { name, owner } => {
                write!(f, "duplicate union alternative `{name}` in `{owner}`")
            }
            Self::CannotRepresent { label, ty } => {
                write!(
                    f,
                    "type `{ty}` of label `{label}` is neither primitive nor described"
                )
            }
            Self::InvalidPath {
                path,
                offset,
                reason,
            } => {
                write!(f, "invalid path `{path}` at offset {offset}: {reason}")
            }
            Self::NotDescribed { ty } => {
                write!(f, "no description registered for type `{ty}`")
            }
        }
    }
}

impl error::Error for SchemaError {}

// -----------------------------------------------------------------------------
// ConstructorError

/// A failure to instantiate a type from deserialized values.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstructorError {
    /// No initializer scored acceptably and no default initializer exists.
    NoMatch { owner: Cow<'static, str> },
    /// An initializer parameter had no value and no default.
    MissingParameter {
        name: Cow<'static, str>,
        owner: Cow<'static, str>,
    },
    /// A criteria value could not be moved into the parameter's type.
    ParameterType {
        name: Cow<'static, str>,
        expected: Cow<'static, str>,
    },
    /// A leftover value belongs to a label with no setter.
    NoSetter {
        name: Cow<'static, str>,
        owner: Cow<'static, str>,
    },
}

impl fmt::Display for ConstructorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMatch { owner } => {
                write!(f, "no usable constructor for `{owner}`")
            }
            Self::MissingParameter { name, owner } => {
                write!(f, "constructor parameter `{name}` of `{owner}` has no value")
            }
            Self::ParameterType { name, expected } => {
                write!(f, "parameter `{name}` is not of the expected type `{expected}`")
            }
            Self::NoSetter { name, owner } => {
                write!(f, "value `{name}` of `{owner}` cannot be assigned after construction")
            }
        }
    }
}

impl error::Error for ConstructorError {}

// -----------------------------------------------------------------------------
// DocumentError

/// A structural mismatch between a document and a schema.
///
/// Every variant carries the offending name and, when the node provides one,
/// its source line.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentError {
    /// A required attribute is absent from the document.
    MissingAttribute { name: String, line: Option<u32> },
    /// A required element is absent from the document.
    MissingElement { name: String, line: Option<u32> },
    /// A required text value is absent from the document.
    MissingText { owner: Cow<'static, str>, line: Option<u32> },
    /// An attribute not present in the schema was found under strict mode.
    UnexpectedAttribute { name: String, line: Option<u32> },
    /// An element not present in the schema was found under strict mode.
    UnexpectedElement { name: String, line: Option<u32> },
    /// A single-valued element occurred more than once.
    DuplicateElement { name: String, line: Option<u32> },
    /// A value to be written is absent but its label is required.
    MissingValue { name: String, owner: Cow<'static, str> },
    /// The produced or substituted value does not have the expected type.
    TypeMismatch {
        expected: Cow<'static, str>,
        found: Cow<'static, str>,
        line: Option<u32>,
    },
    /// A union member holds a value no alternative covers.
    UnknownAlternative {
        label: String,
        ty: Cow<'static, str>,
    },
    /// A lifecycle hook rejected the instance.
    Invalid { reason: String },
}

impl DocumentError {
    /// Returns the source line the error refers to, if the node carried one.
    pub fn line(&self) -> Option<u32> {
        match self {
            Self::MissingAttribute { line, .. }
            | Self::MissingElement { line, .. }
            | Self::MissingText { line, .. }
            | Self::UnexpectedAttribute { line, .. }
            | Self::UnexpectedElement { line, .. }
            | Self::DuplicateElement { line, .. }
            | Self::TypeMismatch { line, .. } => *line,
            _ => None,
        }
    }
}

fn at(f: &mut fmt::Formatter<'_>, line: &Option<u32>) -> fmt::Result {
    match line {
        Some(line) => write!(f, " at line {line}"),
        None => Ok(()),
    }
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingAttribute { name, line } => {
                write!(f, "required attribute `{name}` is missing")?;
                at(f, line)
            }
            Self::MissingElement { name, line } => {
                write!(f, "required element `{name}` is missing")?;
                at(f, line)
            }
            Self::MissingText { owner, line } => {
                write!(f, "required text for `{owner}` is missing")?;
                at(f, line)
            }
            Self::UnexpectedAttribute { name, line } => {
                write!(f, "attribute `{name}` is not expected")?;
                at(f, line)
            }
            Self::UnexpectedElement { name, line } => {
                write!(f, "element `{name}` is not expected")?;
                at(f, line)
            }
            Self::DuplicateElement { name, line } => {
                write!(f, "element `{name}` occurs more than once")?;
                at(f, line)
            }
            Self::MissingValue { name, owner } => {
                write!(f, "required value `{name}` of `{owner}` is absent")
            }
            Self::TypeMismatch {
                expected,
                found,
                line,
            } => {
                write!(f, "expected a value of `{expected}`, found `{found}`")?;
                at(f, line)
            }
            Self::UnknownAlternative { label, ty } => {
                write!(f, "no alternative of `{label}` covers type `{ty}`")
            }
            Self::Invalid { reason } => {
                write!(f, "instance rejected: {reason}")
            }
        }
    }
}

impl error::Error for DocumentError {}

// -----------------------------------------------------------------------------
// TransformError

/// A failure converting between a string and a primitive value.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformError {
    /// No transform is registered for the type.
    Unsupported { ty: Cow<'static, str> },
    /// The text could not be parsed as a value of the type.
    Parse {
        ty: Cow<'static, str>,
        text: String,
    },
    /// The value handed to a transform was not of the type it serves.
    Value { ty: Cow<'static, str> },
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported { ty } => {
                write!(f, "no transform registered for `{ty}`")
            }
            Self::Parse { ty, text } => {
                write!(f, "cannot parse `{text}` as `{ty}`")
            }
            Self::Value { ty } => {
                write!(f, "value is not of the transformed type `{ty}`")
            }
        }
    }
}

impl error::Error for TransformError {}
