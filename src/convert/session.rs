//! Per-call conversion context.

use alloc::boxed::Box;
use core::any::{Any, TypeId};

use crate::util::TypeIdMap;

// -----------------------------------------------------------------------------
// Session

/// The mutable context of one top-level read or write.
///
/// Created by the entry point and threaded as an argument through the whole
/// conversion call graph; nested composite conversions reuse it, so the
/// depth distinguishes the outermost call from recursive ones. Strategies
/// park their own bookkeeping (reference tables, visit sets) in the typed
/// state store. A session is never shared across threads.
#[derive(Debug, Default)]
pub struct Session {
    depth: usize,
    state: TypeIdMap<Box<dyn Any>>,
}

impl Session {
    /// Opens a fresh session.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current recursion depth; `0` outside any conversion.
    #[inline]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) const fn enter(&mut self) {
        self.depth += 1;
    }

    pub(crate) const fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Returns the state value of type `S`, if one was created.
    pub fn state<S: Any>(&self) -> Option<&S> {
        self.state
            .get(&TypeId::of::<S>())
            .and_then(|boxed| boxed.downcast_ref())
    }

    /// Returns the state value of type `S`, creating it on first access.
    pub fn state_mut<S: Any + Default>(&mut self) -> &mut S {
        self.state
            .entry(TypeId::of::<S>())
            .or_insert_with(|| Box::<S>::default())
            .downcast_mut()
            .expect("session state is keyed by its own type")
    }
}

// -----------------------------------------------------------------------------
// Tests
