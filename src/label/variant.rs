//! Union alternatives: one member, several possible tag declarations.
//!
//! A union member is typically a Rust enum whose variants wrap the
//! alternative value types. Each [`Variant`] carries the external name for
//! one alternative, a projection that recognizes it on write, and a wrap
//! closure that rebuilds the member value on read.

use alloc::boxed::Box;
use alloc::string::String;
use core::any::{Any, TypeId};

// -----------------------------------------------------------------------------
// Variant

/// One alternative of a union label.
pub struct Variant {
    declared: &'static str,
    name: String,
    ty: TypeId,
    type_name: &'static str,
    project: Box<dyn for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Any> + Send + Sync>,
    wrap: Box<dyn Fn(Box<dyn Any>) -> Option<Box<dyn Any>> + Send + Sync>,
}

impl Variant {
    /// Creates an alternative for value type `V` inside member type `U`.
    ///
    /// `project` returns the alternative's value when the member currently
    /// holds it; `wrap` rebuilds the member from a read value.
    ///
    /// # Examples
    ///
    /// ```
    /// use docbind::label::Variant;
    ///
    /// enum Shape { Circle(f64), Label(String) }
    ///
    /// let circle = Variant::of::<Shape, f64>(
    ///     "circle",
    ///     |s| match s { Shape::Circle(r) => Some(r), _ => None },
    ///     Shape::Circle,
    /// );
    /// assert_eq!(circle.declared(), "circle");
    /// ```
    pub fn of<U, V>(
        name: &'static str,
        project: impl Fn(&U) -> Option<&V> + Send + Sync + 'static,
        wrap: impl Fn(V) -> U + Send + Sync + 'static,
    ) -> Self
    where
        U: Any,
        V: Any,
    {
        Self {
            declared: name,
            name: String::from(name),
            ty: TypeId::of::<V>(),
            type_name: core::any::type_name::<V>(),
            project: Box::new(move |member| {
                member
                    .downcast_ref::<U>()
                    .and_then(|u| project(u).map(|v| v as &dyn Any))
            }),
            wrap: Box::new(move |value| {
                value
                    .downcast::<V>()
                    .ok()
                    .map(|v| Box::new(wrap(*v)) as Box<dyn Any>)
            }),
        }
    }

    /// Returns the declared (pre-style) alternative name.
    #[inline]
    pub const fn declared(&self) -> &'static str {
        self.declared
    }

    /// Returns the styled external name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// Returns the `TypeId` of the alternative's value type.
    #[inline]
    pub const fn ty(&self) -> TypeId {
        self.ty
    }

    /// Returns the alternative's value type name, for diagnostics.
    #[inline]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Borrows the alternative's value out of the member, when the member
    /// currently holds this alternative.
    #[inline]
    pub fn project<'a>(&self, member: &'a dyn Any) -> Option<&'a dyn Any> {
        (self.project)(member)
    }

    /// Rebuilds the member value from a read alternative value.
    #[inline]
    pub fn wrap(&self, value: Box<dyn Any>) -> Option<Box<dyn Any>> {
        (self.wrap)(value)
    }
}

impl core::fmt::Debug for Variant {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Variant")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests
