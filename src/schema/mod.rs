//! Type descriptions, their compiled schemas, and the registry.
//!
//! A type states what it looks like in a document through a [`Description`];
//! the [`Registry`] compiles each description once into an immutable
//! [`Schema`] and hands it to the conversion layer. Compilation is where
//! every cross-member consistency rule is enforced.

mod description;
mod hooks;
mod registry;
mod scanner;
mod schema;

pub use description::{Describe, Description};
pub use hooks::{Hooks, Replaced};
#[cfg(feature = "auto_register")]
pub use registry::Registration;
pub use registry::Registry;
pub use schema::{Schema, Section};
