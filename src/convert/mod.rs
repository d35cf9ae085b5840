//! Document conversion: the composite converter and its per-call context.

mod composite;
mod session;
pub(crate) mod trace;

pub use composite::Composite;
pub use session::Session;
