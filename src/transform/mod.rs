//! The string ⇄ value transform registry for primitive types.
//!
//! Primitive here means "representable as one document string": language
//! scalars, `String`, and any user type registered with a transform. The
//! composite converter degrades to attribute/text conversion for these
//! instead of structural traversal.
//!
//! # Examples
//!
//! ```
//! use docbind::transform::Transforms;
//!
//! let transforms = Transforms::new();
//! let value = transforms.read_as(core::any::TypeId::of::<u32>(), "u32", "42").unwrap();
//! assert_eq!(*value.downcast_ref::<u32>().unwrap(), 42);
//! assert_eq!(transforms.write_value(&42u32, "u32").unwrap(), "42");
//! ```

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::{String, ToString};
use core::any::{Any, TypeId};
use core::fmt::Display;
use core::marker::PhantomData;
use core::str::FromStr;

use crate::error::TransformError;
use crate::util::TypeIdMap;

// -----------------------------------------------------------------------------
// Transform

/// A string ⇄ value conversion for one primitive type.
pub trait Transform: Send + Sync {
    /// Parses the document text into an erased value of the served type.
    fn read(&self, text: &str) -> Result<Box<dyn Any>, TransformError>;

    /// Formats a value of the served type as document text.
    fn write(&self, value: &dyn Any) -> Result<String, TransformError>;
}

// -----------------------------------------------------------------------------
// Scalar

/// A [`Transform`] adapter over `FromStr` + `Display`.
pub struct Scalar<V>(PhantomData<fn() -> V>);

impl<V> Scalar<V> {
    /// Creates the adapter.
    #[inline]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<V: FromStr + Display + Any> Transform for Scalar<V> {
    fn read(&self, text: &str) -> Result<Box<dyn Any>, TransformError> {
        match text.parse::<V>() {
            Ok(value) => Ok(Box::new(value)),
            Err(_) => Err(TransformError::Parse {
                ty: Cow::Borrowed(core::any::type_name::<V>()),
                text: text.to_string(),
            }),
        }
    }

    fn write(&self, value: &dyn Any) -> Result<String, TransformError> {
        match value.downcast_ref::<V>() {
            Some(v) => Ok(v.to_string()),
            None => Err(TransformError::Value {
                ty: Cow::Borrowed(core::any::type_name::<V>()),
            }),
        }
    }
}

// -----------------------------------------------------------------------------
// Transforms

struct Entry {
    type_name: &'static str,
    transform: Box<dyn Transform>,
}

/// The registry of primitive transforms, keyed by `TypeId`.
pub struct Transforms {
    table: TypeIdMap<Entry>,
}

impl Default for Transforms {
    /// See [`Transforms::new`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Transforms {
    /// Creates an empty registry with no transforms at all.
    pub fn empty() -> Self {
        Self {
            table: TypeIdMap::default(),
        }
    }

    /// Creates a registry covering the language scalars and `String`:
    ///
    /// - `bool` `char`
    /// - `i8 - i128` `isize`
    /// - `u8 - u128` `usize`
    /// - `f32` `f64`
    /// - `String`
    pub fn new() -> Self {
        let mut transforms = Self::empty();
        transforms.register_scalar::<bool>();
        transforms.register_scalar::<char>();
        transforms.register_scalar::<u8>();
        transforms.register_scalar::<u16>();
        transforms.register_scalar::<u32>();
        transforms.register_scalar::<u64>();
        transforms.register_scalar::<u128>();
        transforms.register_scalar::<usize>();
        transforms.register_scalar::<i8>();
        transforms.register_scalar::<i16>();
        transforms.register_scalar::<i32>();
        transforms.register_scalar::<i64>();
        transforms.register_scalar::<i128>();
        transforms.register_scalar::<isize>();
        transforms.register_scalar::<f32>();
        transforms.register_scalar::<f64>();
        transforms.register_scalar::<String>();
        transforms
    }

    /// Registers a transform for `V`, replacing any existing one.
    pub fn register<V: Any>(&mut self, transform: impl Transform + 'static) {
        self.table.insert(
            TypeId::of::<V>(),
            Entry {
                type_name: core::any::type_name::<V>(),
                transform: Box::new(transform),
            },
        );
    }

    /// Registers the [`Scalar`] adapter for a `FromStr` + `Display` type.
    #[inline]
    pub fn register_scalar<V: FromStr + Display + Any>(&mut self) {
        self.register::<V>(Scalar::<V>::new());
    }

    /// Whether the type converts to and from one document string.
    #[inline]
    pub fn is_primitive(&self, ty: TypeId) -> bool {
        self.table.contains_key(&ty)
    }

    /// Parses `text` into an erased value of the type `ty`. The type name
    /// is carried for diagnostics only.
    pub fn read_as(
        &self,
        ty: TypeId,
        type_name: &'static str,
        text: &str,
    ) -> Result<Box<dyn Any>, TransformError> {
        match self.table.get(&ty) {
            Some(entry) => entry.transform.read(text),
            None => Err(TransformError::Unsupported {
                ty: Cow::Borrowed(type_name),
            }),
        }
    }

    /// Formats an erased primitive value as document text. The type name
    /// is carried for diagnostics only.
    pub fn write_value(
        &self,
        value: &dyn Any,
        type_name: &'static str,
    ) -> Result<String, TransformError> {
        match self.table.get(&value.type_id()) {
            Some(entry) => entry.transform.write(value),
            None => Err(TransformError::Unsupported {
                ty: Cow::Borrowed(type_name),
            }),
        }
    }

    /// Returns the registered type name for diagnostics.
    pub fn type_name(&self, ty: TypeId) -> Option<&'static str> {
        self.table.get(&ty).map(|e| e.type_name)
    }
}

// -----------------------------------------------------------------------------
// Tests
