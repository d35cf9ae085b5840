//! The in-memory document tree and its read/write surfaces.
//!
//! The engine never parses or prints raw text; it walks [`Element`] trees a
//! tokenizer or writer on the outside would produce or consume. Reading goes
//! through the [`InputNode`] cursor, which consumes child elements in
//! document order, and writing goes through [`OutputNode`], which appends to
//! an element under construction.

mod element;
mod input;
mod output;

pub use element::{Attribute, Element};
pub use input::InputNode;
pub use output::OutputNode;
