//! The path-addressable structure model.
//!
//! Labels with multi-segment paths are placed below intermediate [`Model`]
//! nodes, and explicit order declarations pre-register element and attribute
//! slots before any label registration so serialization order is fixed up
//! front. Reading never consults the order; it matches names against the
//! flattened label maps.

mod expression;
mod model;

pub use expression::{Expression, ParseError, Segment};
pub use model::{Model, ModelId, Order, Slot, Structure};
