//! Constructor resolution for immutable and read-only types.
//!
//! During a read pass values land in a [`Criteria`] store before the owning
//! instance exists. An [`Initializer`] describes one constructor candidate;
//! [`select_initializer`] scores every candidate against the criteria and
//! picks the most specific satisfiable one. Values the constructor consumes
//! leave the criteria; the rest are flushed through setters afterwards.

mod criteria;
mod initializer;
mod resolver;

pub use criteria::{Criteria, Variable};
pub use initializer::{Initializer, Parameter};
pub use resolver::{score_initializer, select_initializer};
pub(crate) use resolver::param_matches;
