//! The engine: the public entry point tying registry, transforms, naming
//! style, and strategy together.
//!
//! An engine owns one [`Registry`] and is cheap to share behind a reference;
//! each read, write, or validate call opens its own [`Session`] and runs the
//! composite converter over the engine's collaborators.
//!
//! # Examples
//!
//! ```
//! use docbind::Engine;
//! use docbind::schema::{Describe, Description};
//! use docbind::tag::Tag;
//!
//! #[derive(Default, PartialEq, Debug)]
//! struct Person {
//!     id: u32,
//!     name: String,
//! }
//!
//! impl Describe for Person {
//!     fn describe() -> Description {
//!         Description::of::<Person>("person")
//!             .default_with(Person::default)
//!             .attribute("id", Tag::new(), |p: &Person| &p.id, |p, v| p.id = v)
//!             .element("name", Tag::new(), |p: &Person| &p.name, |p, v| p.name = v)
//!     }
//! }
//!
//! let engine = Engine::new();
//! engine.register::<Person>();
//!
//! let person = Person { id: 7, name: "Niall".into() };
//! let element = engine.write(&person).unwrap();
//! assert_eq!(element.attribute("id"), Some("7"));
//!
//! let back: Person = engine.read(&element).unwrap();
//! assert_eq!(back, person);
//! ```

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::String;
use core::any::{Any, TypeId};

use crate::convert::{Composite, Session};
use crate::error::{DocumentError, Error};
use crate::node::Element;
use crate::schema::{Describe, Registry};
use crate::strategy::{NullStrategy, Strategy};
use crate::style::{Identity, Style};
use crate::transform::Transforms;

// -----------------------------------------------------------------------------
// Engine

/// Binds values to document elements and back, driven by registered
/// descriptions.
pub struct Engine {
    registry: Registry,
    transforms: Transforms,
    style: Box<dyn Style>,
    strategy: Box<dyn Strategy>,
}

impl Default for Engine {
    /// See [`Engine::new`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Creates an engine with identity naming, no strategy, and the stock
    /// primitive transforms.
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            transforms: Transforms::new(),
            style: Box::new(Identity),
            strategy: Box::new(NullStrategy),
        }
    }

    /// Replaces the naming style applied to every external name.
    ///
    /// Must be set before any schema is compiled; styles are baked into
    /// cached schemas.
    pub fn with_style(mut self, style: impl Style + 'static) -> Self {
        self.style = Box::new(style);
        self
    }

    /// Replaces the type substitution strategy.
    pub fn with_strategy(mut self, strategy: impl Strategy + 'static) -> Self {
        self.strategy = Box::new(strategy);
        self
    }

    /// Replaces the primitive transform registry.
    pub fn with_transforms(mut self, transforms: Transforms) -> Self {
        self.transforms = transforms;
        self
    }

    /// Returns the type registry.
    #[inline]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Returns the primitive transforms for further registration.
    #[inline]
    pub const fn transforms_mut(&mut self) -> &mut Transforms {
        &mut self.transforms
    }

    /// Registers `T` by its [`Describe`] implementation.
    #[inline]
    pub fn register<T: Describe>(&self) {
        self.registry.register::<T>();
    }

    /// Registers every type submitted through
    /// [`auto_register!`](crate::auto_register).
    #[cfg(feature = "auto_register")]
    #[inline]
    pub fn auto_register(&self) {
        self.registry.auto_register();
    }

    fn composite(&self) -> Composite<'_> {
        Composite::new(
            &self.registry,
            &self.transforms,
            self.style.as_ref(),
            self.strategy.as_ref(),
        )
    }

    /// Reads `element` as a value of `T`.
    pub fn read<T: Any>(&self, element: &Element) -> Result<T, Error> {
        let value = self.read_erased(TypeId::of::<T>(), core::any::type_name::<T>(), element)?;
        match value.downcast::<T>() {
            Ok(value) => Ok(*value),
            // The strategy substituted a type that is not T.
            Err(_) => Err(DocumentError::TypeMismatch {
                expected: Cow::Borrowed(core::any::type_name::<T>()),
                found: Cow::Borrowed("<substituted type>"),
                line: element.line(),
            }
            .into()),
        }
    }

    /// Reads `element` as a value of the declared type, keeping the result
    /// erased so a strategy may substitute any registered type.
    pub fn read_erased(
        &self,
        declared: TypeId,
        type_name: &'static str,
        element: &Element,
    ) -> Result<Box<dyn Any>, Error> {
        let mut session = Session::new();
        self.composite().read(declared, type_name, element, &mut session)
    }

    /// Checks `element` against the schema of `T` without instantiating
    /// anything.
    pub fn validate<T: Any>(&self, element: &Element) -> Result<(), Error> {
        let mut session = Session::new();
        self.composite().validate(
            TypeId::of::<T>(),
            core::any::type_name::<T>(),
            element,
            &mut session,
        )
    }

    /// Writes `value` as a document element rooted at its schema's name.
    pub fn write<T: Any>(&self, value: &T) -> Result<Element, Error> {
        self.write_erased(TypeId::of::<T>(), core::any::type_name::<T>(), value)
    }

    /// Writes an erased value declared as `declared`; the strategy marks
    /// the element when the value's actual type differs.
    pub fn write_erased(
        &self,
        declared: TypeId,
        type_name: &'static str,
        value: &dyn Any,
    ) -> Result<Element, Error> {
        let schema = self
            .registry
            .schema(value.type_id(), type_name, self.style.as_ref())?;
        let mut root = Element::new(schema.name());
        let mut session = Session::new();
        let written = self
            .composite()
            .write(declared, type_name, value, &mut root, &mut session)?;
        if !written {
            // The root value suppressed itself; there is nothing to return.
            return Err(DocumentError::MissingValue {
                name: String::from(schema.name()),
                owner: Cow::Borrowed(schema.type_name()),
            }
            .into());
        }
        Ok(root)
    }
}

impl core::fmt::Debug for Engine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Engine")
            .field("registry", &self.registry)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construct::{Initializer, Parameter};
    use crate::label::Variant;
    use crate::schema::{Describe, Description, Replaced};
    use crate::strategy::TypeStrategy;
    use crate::structure::Order;
    use crate::tag::Tag;
    use alloc::collections::BTreeMap;
    use alloc::string::ToString;
    use alloc::vec::Vec;

    fn engine_with<T: Describe>() -> Engine {
        let engine = Engine::new();
        engine.register::<T>();
        engine
    }

    // -- Scalars and attributes -----------------------------------------------

    #[derive(Default, Debug, PartialEq)]
    struct Person {
        id: u32,
        name: String,
        age: u32,
    }

    impl Describe for Person {
        fn describe() -> Description {
            Description::of::<Person>("person")
                .default_with(Person::default)
                .attribute("id", Tag::new(), |p: &Person| &p.id, |p, v| p.id = v)
                .element("name", Tag::new(), |p: &Person| &p.name, |p, v| p.name = v)
                .element("age", Tag::new(), |p: &Person| &p.age, |p, v| p.age = v)
        }
    }

    #[test]
    fn scalar_round_trip() {
        let engine = engine_with::<Person>();
        let person = Person {
            id: 7,
            name: "Niall".into(),
            age: 30,
        };

        let element = engine.write(&person).unwrap();
        assert_eq!(element.name(), "person");
        assert_eq!(element.attribute("id"), Some("7"));
        assert_eq!(element.child("name").unwrap().value(), Some("Niall"));
        assert_eq!(element.child("age").unwrap().value(), Some("30"));

        let back: Person = engine.read(&element).unwrap();
        assert_eq!(back, person);
    }

    #[test]
    fn validate_accepts_without_instantiating() {
        let engine = engine_with::<Person>();
        let element = engine
            .write(&Person {
                id: 1,
                name: "x".into(),
                age: 2,
            })
            .unwrap();
        engine.validate::<Person>(&element).unwrap();
    }

    #[test]
    fn strict_schema_rejects_unknown_nodes() {
        let engine = engine_with::<Person>();
        let mut element = engine
            .write(&Person {
                id: 1,
                name: "x".into(),
                age: 2,
            })
            .unwrap();
        element.add_child(Element::new("ghost"));

        let err = engine.read::<Person>(&element).unwrap_err();
        assert!(matches!(
            err,
            Error::Document(DocumentError::UnexpectedElement { name, .. }) if name == "ghost"
        ));
    }

    #[test]
    fn duplicate_single_valued_element_is_rejected() {
        let engine = engine_with::<Person>();
        let mut element = engine
            .write(&Person {
                id: 1,
                name: "x".into(),
                age: 2,
            })
            .unwrap();
        element.add_child(Element::with_value("name", "again"));

        let err = engine.read::<Person>(&element).unwrap_err();
        assert!(matches!(
            err,
            Error::Document(DocumentError::DuplicateElement { name, .. }) if name == "name"
        ));
    }

    #[test]
    fn missing_required_element_is_reported() {
        let engine = engine_with::<Person>();
        let mut element = Element::new("person");
        element.set_attribute("id", "1");
        element.add_child(Element::with_value("name", "x"));

        let err = engine.read::<Person>(&element).unwrap_err();
        assert!(matches!(
            err,
            Error::Document(DocumentError::MissingElement { name, .. }) if name == "age"
        ));
    }

    // -- Lenient matching and defaults ----------------------------------------

    #[derive(Default, Debug, PartialEq)]
    struct Relaxed {
        name: String,
        note: Option<String>,
        retries: u32,
    }

    impl Describe for Relaxed {
        fn describe() -> Description {
            Description::of::<Relaxed>("relaxed")
                .strict(false)
                .default_with(Relaxed::default)
                .element("name", Tag::new(), |r: &Relaxed| &r.name, |r, v| r.name = v)
                .element_opt(
                    "note",
                    Tag::new().required(false),
                    |r: &Relaxed| r.note.as_ref(),
                    |r, v| r.note = Some(v),
                )
                .attribute(
                    "retries",
                    Tag::new().required(false).empty("3"),
                    |r: &Relaxed| &r.retries,
                    |r, v| r.retries = v,
                )
        }
    }

    #[test]
    fn non_strict_schema_skips_unknown_nodes() {
        let engine = engine_with::<Relaxed>();
        let mut element = Element::new("relaxed");
        element.set_attribute("legacy", "yes");
        element.add_child(Element::with_value("name", "x"));
        element.add_child(Element::new("ghost"));

        let back: Relaxed = engine.read(&element).unwrap();
        assert_eq!(back.name, "x");
        assert_eq!(back.note, None);
    }

    #[test]
    fn absent_optionals_take_the_declared_empty_value() {
        let engine = engine_with::<Relaxed>();
        let mut element = Element::new("relaxed");
        element.add_child(Element::with_value("name", "x"));

        let back: Relaxed = engine.read(&element).unwrap();
        assert_eq!(back.retries, 3);
    }

    // -- Versioned types -------------------------------------------------------

    #[derive(Debug, PartialEq)]
    struct Config {
        version: f64,
        host: String,
        port: u16,
    }

    impl Default for Config {
        fn default() -> Self {
            Self {
                version: 2.0,
                host: String::new(),
                port: 0,
            }
        }
    }

    impl Describe for Config {
        fn describe() -> Description {
            Description::of::<Config>("config")
                .default_with(Config::default)
                .version(
                    "version",
                    Tag::new().revision(2.0),
                    |c: &Config| &c.version,
                    |c, v| c.version = v,
                )
                .element("host", Tag::new(), |c: &Config| &c.host, |c, v| c.host = v)
                .element("port", Tag::new(), |c: &Config| &c.port, |c, v| c.port = v)
        }
    }

    #[test]
    fn version_attribute_is_written_for_revised_types() {
        let engine = engine_with::<Config>();
        let element = engine
            .write(&Config {
                version: 2.0,
                host: "a".into(),
                port: 1,
            })
            .unwrap();
        assert_eq!(element.attribute("version"), Some("2"));
    }

    #[test]
    fn older_revisions_are_read_leniently() {
        let engine = engine_with::<Config>();

        // A revision 1 document lacks `port`; strict matching is waived.
        let mut element = Element::new("config");
        element.set_attribute("version", "1");
        element.add_child(Element::with_value("host", "a"));
        element.add_child(Element::new("obsolete"));

        let back: Config = engine.read(&element).unwrap();
        assert_eq!(back.version, 1.0);
        assert_eq!(back.host, "a");
        assert_eq!(back.port, 0);
    }

    #[test]
    fn matching_revision_stays_strict() {
        let engine = engine_with::<Config>();
        let mut element = Element::new("config");
        element.set_attribute("version", "2");
        element.add_child(Element::with_value("host", "a"));

        let err = engine.read::<Config>(&element).unwrap_err();
        assert!(matches!(
            err,
            Error::Document(DocumentError::MissingElement { name, .. }) if name == "port"
        ));
    }

    // -- Ordering and nested placement ----------------------------------------

    #[derive(Default, Debug, PartialEq)]
    struct Ordered {
        a: u32,
        b: u32,
        c: u32,
    }

    impl Describe for Ordered {
        fn describe() -> Description {
            Description::of::<Ordered>("ordered")
                .order(Order::new().elements(["c", "a", "b"]))
                .default_with(Ordered::default)
                .element("a", Tag::new(), |o: &Ordered| &o.a, |o, v| o.a = v)
                .element("b", Tag::new(), |o: &Ordered| &o.b, |o, v| o.b = v)
                .element("c", Tag::new(), |o: &Ordered| &o.c, |o, v| o.c = v)
        }
    }

    #[test]
    fn declared_order_wins_over_member_order() {
        let engine = engine_with::<Ordered>();
        let element = engine.write(&Ordered { a: 1, b: 2, c: 3 }).unwrap();

        let names: Vec<&str> = element.children().iter().map(Element::name).collect();
        assert_eq!(names, ["c", "a", "b"]);
    }

    #[derive(Default, Debug, PartialEq)]
    struct Customer {
        name: String,
        phone: String,
        street: String,
    }

    impl Describe for Customer {
        fn describe() -> Description {
            Description::of::<Customer>("customer")
                .default_with(Customer::default)
                .element("name", Tag::new(), |c: &Customer| &c.name, |c, v| c.name = v)
                .element(
                    "phone",
                    Tag::new().path("contact"),
                    |c: &Customer| &c.phone,
                    |c, v| c.phone = v,
                )
                .element(
                    "street",
                    Tag::new().path("contact/address"),
                    |c: &Customer| &c.street,
                    |c, v| c.street = v,
                )
        }
    }

    #[test]
    fn pathed_members_nest_and_round_trip() {
        let engine = engine_with::<Customer>();
        let customer = Customer {
            name: "n".into(),
            phone: "p".into(),
            street: "s".into(),
        };

        let element = engine.write(&customer).unwrap();
        let contact = element.child("contact").unwrap();
        assert_eq!(contact.child("phone").unwrap().value(), Some("p"));
        let address = contact.child("address").unwrap();
        assert_eq!(address.child("street").unwrap().value(), Some("s"));

        let back: Customer = engine.read(&element).unwrap();
        assert_eq!(back, customer);
    }

    // -- Unions ----------------------------------------------------------------

    #[derive(Debug, PartialEq)]
    enum Reach {
        Email(String),
        Phone(u64),
    }

    #[derive(Debug, PartialEq)]
    struct Card {
        reach: Reach,
    }

    fn reach_variants() -> [Variant; 2] {
        [
            Variant::of::<Reach, String>(
                "email",
                |r| match r {
                    Reach::Email(e) => Some(e),
                    _ => None,
                },
                Reach::Email,
            ),
            Variant::of::<Reach, u64>(
                "phone",
                |r| match r {
                    Reach::Phone(p) => Some(p),
                    _ => None,
                },
                Reach::Phone,
            ),
        ]
    }

    impl Describe for Card {
        fn describe() -> Description {
            Description::of::<Card>("card")
                .default_with(|| Card {
                    reach: Reach::Email(String::new()),
                })
                .union(
                    "reach",
                    Tag::new(),
                    |c: &Card| &c.reach,
                    |c, v| c.reach = v,
                    reach_variants(),
                )
        }
    }

    #[test]
    fn union_members_dispatch_by_element_name() {
        let engine = engine_with::<Card>();

        let element = engine
            .write(&Card {
                reach: Reach::Phone(123),
            })
            .unwrap();
        assert_eq!(element.child("phone").unwrap().value(), Some("123"));
        assert!(element.child("email").is_none());

        let mut other = Element::new("card");
        other.add_child(Element::with_value("email", "a@b"));
        let back: Card = engine.read(&other).unwrap();
        assert_eq!(back.reach, Reach::Email("a@b".into()));
    }

    // -- Collections -----------------------------------------------------------

    #[derive(Default, Debug, PartialEq)]
    struct Roster {
        names: Vec<String>,
        tags: Vec<String>,
    }

    impl Describe for Roster {
        fn describe() -> Description {
            Description::of::<Roster>("roster")
                .default_with(Roster::default)
                .list::<Roster, Vec<String>>(
                    "names",
                    Tag::new().entry("name"),
                    |r| &r.names,
                    |r, v| r.names = v,
                )
                .list::<Roster, Vec<String>>(
                    "tags",
                    Tag::new().inline(true).entry("tag"),
                    |r| &r.tags,
                    |r, v| r.tags = v,
                )
        }
    }

    #[test]
    fn wrapped_and_inline_lists_round_trip() {
        let engine = engine_with::<Roster>();
        let roster = Roster {
            names: ["a", "b"].map(String::from).into(),
            tags: ["x", "y"].map(String::from).into(),
        };

        let element = engine.write(&roster).unwrap();
        let names = element.child("names").unwrap();
        assert_eq!(names.children().len(), 2);
        assert_eq!(names.children()[0].name(), "name");
        // Inline entries sit directly under the root.
        assert_eq!(element.child("tag").unwrap().value(), Some("x"));

        let back: Roster = engine.read(&element).unwrap();
        assert_eq!(back, roster);
    }

    #[test]
    fn split_wrappers_fold_into_one_collection() {
        let engine = engine_with::<Roster>();
        let mut element = Element::new("roster");
        element.new_child("names").add_child(Element::with_value("name", "a"));
        element.new_child("names").add_child(Element::with_value("name", "b"));
        element.add_child(Element::with_value("tag", "t"));

        let back: Roster = engine.read(&element).unwrap();
        assert_eq!(back.names, ["a", "b"]);
        assert_eq!(back.tags, ["t"]);
    }

    #[test]
    fn empty_wrapper_reads_as_empty_collection() {
        let engine = engine_with::<Roster>();
        let mut element = Element::new("roster");
        element.add_child(Element::new("names"));
        element.add_child(Element::with_value("tag", "t"));

        let back: Roster = engine.read(&element).unwrap();
        assert!(back.names.is_empty());
        assert_eq!(back.tags, ["t"]);
    }

    #[derive(Default, Debug, PartialEq)]
    struct Scores {
        by_player: BTreeMap<String, u32>,
    }

    impl Describe for Scores {
        fn describe() -> Description {
            Description::of::<Scores>("scores")
                .default_with(Scores::default)
                .map::<Scores, BTreeMap<String, u32>>(
                    "by_player",
                    Tag::new().name("table").entry("score").key("player"),
                    |s| &s.by_player,
                    |s, v| s.by_player = v,
                )
        }
    }

    #[test]
    fn maps_carry_keys_as_entry_attributes() {
        let engine = engine_with::<Scores>();
        let mut scores = Scores::default();
        scores.by_player.insert("ann".into(), 3);
        scores.by_player.insert("bob".into(), 5);

        let element = engine.write(&scores).unwrap();
        let table = element.child("table").unwrap();
        assert_eq!(table.children().len(), 2);
        assert_eq!(table.children()[0].attribute("player"), Some("ann"));
        assert_eq!(table.children()[0].value(), Some("3"));

        let back: Scores = engine.read(&element).unwrap();
        assert_eq!(back, scores);
    }

    #[test]
    fn map_entries_without_keys_are_rejected() {
        let engine = engine_with::<Scores>();
        let mut element = Element::new("scores");
        let table = element.new_child("table");
        table.add_child(Element::with_value("score", "3"));

        let err = engine.read::<Scores>(&element).unwrap_err();
        assert!(matches!(
            err,
            Error::Document(DocumentError::MissingAttribute { name, .. }) if name == "player"
        ));
    }

    // -- Constructor injection -------------------------------------------------

    #[derive(Debug, PartialEq)]
    struct Token {
        id: u32,
        note: String,
    }

    impl Describe for Token {
        fn describe() -> Description {
            Description::of::<Token>("token")
                .attribute_read_only("id", Tag::new(), |t: &Token| &t.id)
                .element("note", Tag::new(), |t: &Token| &t.note, |t, v| t.note = v)
                .ctor(Initializer::new::<Token>(
                    [Parameter::new::<u32>("id")],
                    |c| {
                        Ok(Token {
                            id: c.take("id")?,
                            note: String::new(),
                        })
                    },
                ))
        }
    }

    #[test]
    fn read_only_members_are_injected_through_the_constructor() {
        let engine = engine_with::<Token>();
        let mut element = Element::new("token");
        element.set_attribute("id", "9");
        element.add_child(Element::with_value("note", "n"));

        let back: Token = engine.read(&element).unwrap();
        assert_eq!(
            back,
            Token {
                id: 9,
                note: "n".into()
            }
        );
    }

    // -- Nested composites -----------------------------------------------------

    #[derive(Default, Debug, PartialEq)]
    struct Address {
        city: String,
    }

    impl Describe for Address {
        fn describe() -> Description {
            Description::of::<Address>("address")
                .default_with(Address::default)
                .element("city", Tag::new(), |a: &Address| &a.city, |a, v| a.city = v)
        }
    }

    #[derive(Default, Debug, PartialEq)]
    struct Company {
        name: String,
        address: Address,
    }

    impl Describe for Company {
        fn describe() -> Description {
            Description::of::<Company>("company")
                .default_with(Company::default)
                .element("name", Tag::new(), |c: &Company| &c.name, |c, v| c.name = v)
                .element(
                    "address",
                    Tag::new(),
                    |c: &Company| &c.address,
                    |c, v| c.address = v,
                )
        }
    }

    #[test]
    fn nested_composites_round_trip() {
        let engine = Engine::new();
        engine.register::<Address>();
        engine.register::<Company>();

        let company = Company {
            name: "n".into(),
            address: Address { city: "c".into() },
        };
        let element = engine.write(&company).unwrap();
        assert_eq!(
            element.child("address").unwrap().child("city").unwrap().value(),
            Some("c")
        );

        let back: Company = engine.read(&element).unwrap();
        assert_eq!(back, company);
    }

    // -- Hooks -----------------------------------------------------------------

    #[derive(Default, Debug, PartialEq)]
    struct Bounded {
        value: u32,
    }

    impl Describe for Bounded {
        fn describe() -> Description {
            Description::of::<Bounded>("bounded")
                .default_with(Bounded::default)
                .element("value", Tag::new(), |b: &Bounded| &b.value, |b, v| b.value = v)
                .on_validate(|b: &Bounded| {
                    if b.value > 100 {
                        Err("value out of range".to_string())
                    } else {
                        Ok(())
                    }
                })
                .on_resolve(|mut b: Bounded| {
                    b.value *= 2;
                    b
                })
        }
    }

    #[test]
    fn validate_hook_rejects_and_resolve_substitutes() {
        let engine = engine_with::<Bounded>();

        let mut element = Element::new("bounded");
        element.add_child(Element::with_value("value", "21"));
        let back: Bounded = engine.read(&element).unwrap();
        assert_eq!(back.value, 42);

        let mut element = Element::new("bounded");
        element.add_child(Element::with_value("value", "200"));
        let err = engine.read::<Bounded>(&element).unwrap_err();
        assert!(matches!(
            err,
            Error::Document(DocumentError::Invalid { reason }) if reason.contains("out of range")
        ));
    }

    #[derive(Default, Debug, PartialEq)]
    struct Redacted {
        secret: String,
    }

    impl Describe for Redacted {
        fn describe() -> Description {
            Description::of::<Redacted>("redacted")
                .default_with(Redacted::default)
                .element(
                    "secret",
                    Tag::new(),
                    |r: &Redacted| &r.secret,
                    |r, v| r.secret = v,
                )
                .on_replace(|_: &Redacted| {
                    Replaced::Substitute(Box::new(Redacted {
                        secret: "***".into(),
                    }))
                })
        }
    }

    #[test]
    fn replace_hook_substitutes_the_written_value() {
        let engine = engine_with::<Redacted>();
        let element = engine
            .write(&Redacted {
                secret: "hunter2".into(),
            })
            .unwrap();
        assert_eq!(element.child("secret").unwrap().value(), Some("***"));
    }

    // -- Text and character data -----------------------------------------------

    #[derive(Default, Debug, PartialEq)]
    struct Note {
        lang: String,
        body: String,
    }

    impl Describe for Note {
        fn describe() -> Description {
            Description::of::<Note>("note")
                .default_with(Note::default)
                .attribute("lang", Tag::new(), |n: &Note| &n.lang, |n, v| n.lang = v)
                .text(
                    "body",
                    Tag::new().data(true),
                    |n: &Note| &n.body,
                    |n, v| n.body = v,
                )
        }
    }

    #[test]
    fn text_members_use_the_element_value() {
        let engine = engine_with::<Note>();
        let note = Note {
            lang: "en".into(),
            body: "a < b".into(),
        };

        let element = engine.write(&note).unwrap();
        assert_eq!(element.value(), Some("a < b"));
        assert!(element.is_data());
        assert_eq!(element.attribute("lang"), Some("en"));

        let back: Note = engine.read(&element).unwrap();
        assert_eq!(back, note);
    }

    #[derive(Default, Debug, PartialEq)]
    struct LooseNote {
        body: String,
    }

    impl Describe for LooseNote {
        fn describe() -> Description {
            Description::of::<LooseNote>("loose_note")
                .strict(false)
                .default_with(LooseNote::default)
                .text("body", Tag::new(), |n: &LooseNote| &n.body, |n, v| n.body = v)
        }
    }

    #[test]
    fn required_text_is_enforced_on_non_strict_schemas() {
        let engine = engine_with::<LooseNote>();
        let element = Element::new("loose_note");

        let err = engine.read::<LooseNote>(&element).unwrap_err();
        assert!(matches!(
            err,
            Error::Document(DocumentError::MissingText { .. })
        ));
    }

    // -- Polymorphic strategies ------------------------------------------------

    #[derive(Default, Debug, PartialEq)]
    struct Shape {
        label: String,
    }

    #[derive(Default, Debug, PartialEq)]
    struct Circle {
        label: String,
        radius: u32,
    }

    impl Describe for Shape {
        fn describe() -> Description {
            Description::of::<Shape>("shape")
                .default_with(Shape::default)
                .element("label", Tag::new(), |s: &Shape| &s.label, |s, v| s.label = v)
        }
    }

    impl Describe for Circle {
        fn describe() -> Description {
            Description::of::<Circle>("circle")
                .default_with(Circle::default)
                .element("label", Tag::new(), |c: &Circle| &c.label, |c, v| c.label = v)
                .element(
                    "radius",
                    Tag::new(),
                    |c: &Circle| &c.radius,
                    |c, v| c.radius = v,
                )
        }
    }

    #[test]
    fn type_strategy_restores_the_marked_type() {
        let engine = Engine::new().with_strategy(TypeStrategy::new());
        engine.register::<Shape>();
        engine.register::<Circle>();

        let circle = Circle {
            label: "c".into(),
            radius: 4,
        };
        let element = engine
            .write_erased(TypeId::of::<Shape>(), "Shape", &circle)
            .unwrap();
        assert_eq!(element.attribute("class"), Some("circle"));

        let back = engine
            .read_erased(TypeId::of::<Shape>(), "Shape", &element)
            .unwrap();
        assert_eq!(back.downcast_ref::<Circle>(), Some(&circle));
    }

    #[test]
    fn typed_read_refuses_a_substituted_type() {
        let engine = Engine::new().with_strategy(TypeStrategy::new());
        engine.register::<Shape>();
        engine.register::<Circle>();

        let mut element = Element::new("shape");
        element.set_attribute("class", "circle");
        element.add_child(Element::with_value("label", "c"));
        element.add_child(Element::with_value("radius", "4"));

        let err = engine.read::<Shape>(&element).unwrap_err();
        assert!(matches!(
            err,
            Error::Document(DocumentError::TypeMismatch { .. })
        ));
    }

    // -- Naming styles ---------------------------------------------------------

    #[derive(Default, Debug, PartialEq)]
    struct StyledType {
        member_name: String,
    }

    impl Describe for StyledType {
        fn describe() -> Description {
            Description::of::<StyledType>("styled_type")
                .default_with(StyledType::default)
                .element(
                    "member_name",
                    Tag::new(),
                    |s: &StyledType| &s.member_name,
                    |s, v| s.member_name = v,
                )
        }
    }

    #[test]
    fn styles_apply_to_every_external_name() {
        let engine = Engine::new().with_style(crate::style::Hyphen);
        engine.register::<StyledType>();

        let element = engine
            .write(&StyledType {
                member_name: "x".into(),
            })
            .unwrap();
        assert_eq!(element.name(), "styled-type");
        assert_eq!(element.child("member-name").unwrap().value(), Some("x"));

        let back: StyledType = engine.read(&element).unwrap();
        assert_eq!(back.member_name, "x");
    }
}
