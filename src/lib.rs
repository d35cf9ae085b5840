#![doc = include_str!("../README.md")]

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod engine;
mod util;

pub mod construct;
pub mod contact;
pub mod convert;
pub mod error;
pub mod label;
pub mod node;
pub mod schema;
pub mod strategy;
pub mod structure;
pub mod style;
pub mod tag;
pub mod transform;

// -----------------------------------------------------------------------------
// Top-level exports

pub use engine::Engine;
pub use error::Error;

// Required by the expansion of `auto_register!`.
#[cfg(feature = "auto_register")]
#[doc(hidden)]
pub use inventory;
