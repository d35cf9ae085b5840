//! Constructor candidates and their parameter lists.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::{Any, TypeId};

use super::Criteria;
use crate::error::Error;

// -----------------------------------------------------------------------------
// Parameter

/// One parameter of a constructor candidate, matched against criteria by
/// member name and value type.
#[derive(Debug, Clone)]
pub struct Parameter {
    name: &'static str,
    ty: TypeId,
    type_name: &'static str,
    required: bool,
}

impl Parameter {
    /// Declares a required parameter of type `V` for the named member.
    pub fn new<V: Any>(name: &'static str) -> Self {
        Self {
            name,
            ty: TypeId::of::<V>(),
            type_name: core::any::type_name::<V>(),
            required: true,
        }
    }

    /// Marks the parameter optional: the candidate stays viable when no
    /// value was deserialized, and its factory falls back to a default.
    #[inline]
    pub const fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Returns the member name this parameter consumes.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the `TypeId` of the parameter value.
    #[inline]
    pub const fn ty(&self) -> TypeId {
        self.ty
    }

    /// Returns the parameter type name, for diagnostics.
    #[inline]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether the candidate is disqualified when no value exists.
    #[inline]
    pub const fn is_required(&self) -> bool {
        self.required
    }
}

// -----------------------------------------------------------------------------
// Initializer

/// A constructor candidate: an ordered parameter list plus the factory that
/// consumes matched values out of the [`Criteria`] and builds the instance.
pub struct Initializer {
    params: Vec<Parameter>,
    factory: Box<dyn Fn(&mut Criteria) -> Result<Box<dyn Any>, Error> + Send + Sync>,
}

impl Initializer {
    /// Creates a candidate building `T` from the declared parameters.
    ///
    /// # Examples
    ///
    /// ```
    /// use docbind::construct::{Criteria, Initializer, Parameter};
    ///
    /// struct Point { x: i32, y: i32 }
    ///
    /// let init = Initializer::new::<Point>(
    ///     [Parameter::new::<i32>("x"), Parameter::new::<i32>("y")],
    ///     |c| Ok(Point { x: c.take("x")?, y: c.take("y")? }),
    /// );
    /// assert_eq!(init.params().len(), 2);
    /// ```
    pub fn new<T: Any>(
        params: impl IntoIterator<Item = Parameter>,
        factory: impl Fn(&mut Criteria) -> Result<T, Error> + Send + Sync + 'static,
    ) -> Self {
        Self {
            params: params.into_iter().collect(),
            factory: Box::new(move |criteria| {
                factory(criteria).map(|value| Box::new(value) as Box<dyn Any>)
            }),
        }
    }

    /// Creates the no-argument candidate for a default-constructible type.
    pub fn default_for<T: Any>(make: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Self::new::<T>([], move |_| Ok(make()))
    }

    /// Returns the ordered parameter list.
    #[inline]
    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    /// Whether this candidate takes no parameters.
    #[inline]
    pub fn is_default(&self) -> bool {
        self.params.is_empty()
    }

    /// Runs the factory, consuming matched values from `criteria`.
    pub fn construct(&self, criteria: &mut Criteria) -> Result<Box<dyn Any>, Error> {
        (self.factory)(criteria)
    }
}

impl core::fmt::Debug for Initializer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Initializer")
            .field("params", &self.params)
            .finish()
    }
}
