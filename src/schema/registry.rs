//! The registry: descriptions in, cached schemas out.
//!
//! Types are registered up front (explicitly or through
//! [`auto_register!`](crate::auto_register)) and compiled lazily: the first
//! request for a type's schema runs the scan and caches the outcome, success
//! or failure, so a broken description fails the same way on every use.

use alloc::borrow::Cow;
use alloc::sync::Arc;
use core::any::TypeId;
use std::sync::{PoisonError, RwLock};

use super::description::{Describe, Description};
use super::scanner::scan;
use super::schema::Schema;
use crate::error::{Error, SchemaError};
use crate::style::Style;
use crate::util::{HashMap, HashSet, TypeIdMap};

// -----------------------------------------------------------------------------
// Registry

#[derive(Default)]
struct Inner {
    pending: TypeIdMap<Description>,
    schemas: TypeIdMap<Result<Arc<Schema>, SchemaError>>,
    names: HashMap<&'static str, TypeId>,
    registered: TypeIdMap<&'static str>,
    ambiguous: HashSet<&'static str>,
}

/// The central store of described types.
///
/// Shared behind a lock so converters can resolve nested schemas while a
/// pass is running. Scans happen at most once per type; their result is
/// cached permanently, including failures.
///
/// # Examples
///
/// ```
/// use docbind::schema::{Describe, Description, Registry};
/// use docbind::style::Identity;
/// use docbind::tag::Tag;
///
/// #[derive(Default)]
/// struct Person {
///     name: String,
/// }
///
/// impl Describe for Person {
///     fn describe() -> Description {
///         Description::of::<Person>("person")
///             .default_with(Person::default)
///             .element("name", Tag::new(), |p: &Person| &p.name, |p, v| p.name = v)
///     }
/// }
///
/// let registry = Registry::new();
/// registry.register::<Person>();
/// let schema = registry.schema_of::<Person>(&Identity).unwrap();
/// assert_eq!(schema.name(), "person");
/// ```
#[derive(Default)]
pub struct Registry {
    inner: RwLock<Inner>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers `T` by its [`Describe`] implementation. Registering a type
    /// twice is a no-op; the first description wins.
    pub fn register<T: Describe>(&self) {
        self.register_description(T::describe());
    }

    /// Registers an explicitly built description.
    pub fn register_description(&self, description: Description) {
        let mut inner = self.write();
        let ty = description.ty();
        if inner.pending.contains_key(&ty) || inner.schemas.contains_key(&ty) {
            return;
        }

        let name = description.name();
        if !inner.ambiguous.contains(name) {
            if inner.names.contains_key(name) {
                inner.names.remove(name);
                inner.ambiguous.insert(name);
            } else {
                inner.names.insert(name, ty);
            }
        }
        inner.registered.insert(ty, name);
        inner.pending.insert(ty, description);
    }

    /// Registers every type submitted through
    /// [`auto_register!`](crate::auto_register) across the linked program.
    /// Repeated calls are cheap.
    #[cfg(feature = "auto_register")]
    pub fn auto_register(&self) {
        for registration in inventory::iter::<Registration> {
            self.register_description((registration.0)());
        }
    }

    /// Whether the type was registered, compiled or not.
    pub fn contains(&self, ty: TypeId) -> bool {
        let inner = self.read();
        inner.pending.contains_key(&ty) || inner.schemas.contains_key(&ty)
    }

    /// Looks up a registered type by its declared root name.
    ///
    /// Returns `None` when the name is unknown or shared by several
    /// registered types.
    pub fn find(&self, name: &str) -> Option<TypeId> {
        self.read().names.get(name).copied()
    }

    /// Returns the declared root name a type was registered under.
    pub fn name_of(&self, ty: TypeId) -> Option<&'static str> {
        self.read().registered.get(&ty).copied()
    }

    /// Returns the schema of the type registered as `T`.
    pub fn schema_of<T: 'static>(&self, style: &dyn Style) -> Result<Arc<Schema>, Error> {
        self.schema(TypeId::of::<T>(), core::any::type_name::<T>(), style)
    }

    /// Returns the schema of a registered type, compiling it on first use.
    ///
    /// `type_name` is only used for the error raised when the type was
    /// never registered.
    pub fn schema(
        &self,
        ty: TypeId,
        type_name: &'static str,
        style: &dyn Style,
    ) -> Result<Arc<Schema>, Error> {
        if let Some(cached) = self.read().schemas.get(&ty) {
            return cached.clone().map_err(Into::into);
        }

        let mut inner = self.write();
        // Raced with another compiling thread.
        if let Some(cached) = inner.schemas.get(&ty) {
            return cached.clone().map_err(Into::into);
        }
        let Some(description) = inner.pending.remove(&ty) else {
            return Err(SchemaError::NotDescribed {
                ty: Cow::Borrowed(type_name),
            }
            .into());
        };

        let compiled = scan(description, style).map(Arc::new);
        inner.schemas.insert(ty, compiled.clone());
        compiled.map_err(Into::into)
    }
}

impl core::fmt::Debug for Registry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let inner = self.read();
        f.debug_struct("Registry")
            .field("pending", &inner.pending.len())
            .field("compiled", &inner.schemas.len())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Static registration

/// One statically submitted description source. Collected across the whole
/// program by [`Registry::auto_register`].
#[cfg(feature = "auto_register")]
pub struct Registration(pub fn() -> Description);

#[cfg(feature = "auto_register")]
inventory::collect!(Registration);

/// Submits types for [`Registry::auto_register`].
///
/// # Examples
///
/// ```
/// use docbind::auto_register;
/// use docbind::schema::{Describe, Description};
/// use docbind::tag::Tag;
///
/// #[derive(Default)]
/// struct Marker {
///     id: u32,
/// }
///
/// impl Describe for Marker {
///     fn describe() -> Description {
///         Description::of::<Marker>("marker")
///             .default_with(Marker::default)
///             .attribute("id", Tag::new(), |m: &Marker| &m.id, |m, v| m.id = v)
///     }
/// }
///
/// auto_register!(Marker);
/// ```
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! auto_register {
    ($($ty:ty),+ $(,)?) => {
        $(
            $crate::inventory::submit! {
                $crate::schema::Registration(<$ty as $crate::schema::Describe>::describe)
            }
        )+
    };
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Identity;
    use crate::tag::Tag;
    use alloc::string::String;

    #[derive(Default)]
    struct Person {
        name: String,
    }

    impl Describe for Person {
        fn describe() -> Description {
            Description::of::<Person>("person")
                .default_with(Person::default)
                .element("name", Tag::new(), |p: &Person| &p.name, |p, v| p.name = v)
        }
    }

    #[test]
    fn schemas_are_compiled_once_and_shared() {
        let registry = Registry::new();
        registry.register::<Person>();

        let first = registry.schema_of::<Person>(&Identity).unwrap();
        let second = registry.schema_of::<Person>(&Identity).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.name(), "person");
    }

    #[test]
    fn unregistered_types_are_reported() {
        struct Unknown;
        let registry = Registry::new();
        let err = registry.schema_of::<Unknown>(&Identity).unwrap_err();
        assert!(matches!(
            err,
            Error::Schema(SchemaError::NotDescribed { .. })
        ));
    }

    #[test]
    fn failed_scans_are_cached_permanently() {
        #[derive(Default)]
        struct Broken {
            a: u32,
            b: u32,
        }
        let description = Description::of::<Broken>("broken")
            .default_with(Broken::default)
            .element("a", Tag::new().name("same"), |x: &Broken| &x.a, |x, v| x.a = v)
            .element("b", Tag::new().name("same"), |x: &Broken| &x.b, |x, v| x.b = v);

        let registry = Registry::new();
        registry.register_description(description);

        let first = registry.schema_of::<Broken>(&Identity).unwrap_err();
        let second = registry.schema_of::<Broken>(&Identity).unwrap_err();
        assert_eq!(first, second);
        assert!(matches!(
            first,
            Error::Schema(SchemaError::DuplicateName { .. })
        ));
    }

    #[test]
    fn first_registration_wins() {
        let registry = Registry::new();
        registry.register::<Person>();
        registry.register_description(Description::of::<Person>("other"));

        let schema = registry.schema_of::<Person>(&Identity).unwrap();
        assert_eq!(schema.name(), "person");
    }

    #[test]
    fn ambiguous_names_stop_resolving() {
        struct Other;
        let registry = Registry::new();
        registry.register::<Person>();
        assert_eq!(registry.find("person"), Some(TypeId::of::<Person>()));

        registry.register_description(Description::of::<Other>("person"));
        assert_eq!(registry.find("person"), None);
        assert_eq!(registry.find("ghost"), None);
    }
}
