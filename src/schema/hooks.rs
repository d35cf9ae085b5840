//! Lifecycle callback hooks attached to a description.
//!
//! Hooks run at fixed points of a read or write pass:
//!
//! - read: `validate`, then `commit`, then `resolve` (which may substitute
//!   the instance);
//! - write: `replace` (which may substitute or suppress the value), then
//!   `persist` before any output, then `complete` as a cleanup step that
//!   runs regardless of failure.

use alloc::boxed::Box;
use alloc::string::String;
use core::any::Any;

// -----------------------------------------------------------------------------
// Hook closures

pub(crate) type InspectHook = Box<dyn Fn(&dyn Any) -> Result<(), String> + Send + Sync>;
pub(crate) type MutateHook = Box<dyn Fn(&mut dyn Any) -> Result<(), String> + Send + Sync>;
pub(crate) type ReplaceHook = Box<dyn Fn(&dyn Any) -> Replaced + Send + Sync>;
pub(crate) type ResolveHook = Box<dyn Fn(Box<dyn Any>) -> Result<Box<dyn Any>, String> + Send + Sync>;

/// The outcome of the `replace` hook for one value about to be written.
pub enum Replaced {
    /// Write the original value.
    Keep,
    /// Write this value instead.
    Substitute(Box<dyn Any>),
    /// Write nothing; an error is still raised when the label is required.
    Skip,
}

// -----------------------------------------------------------------------------
// Hooks

/// The lifecycle hooks of one described type. All default to absent.
#[derive(Default)]
pub struct Hooks {
    pub(crate) validate: Option<InspectHook>,
    pub(crate) commit: Option<MutateHook>,
    pub(crate) persist: Option<InspectHook>,
    pub(crate) complete: Option<InspectHook>,
    pub(crate) replace: Option<ReplaceHook>,
    pub(crate) resolve: Option<ResolveHook>,
}

impl Hooks {
    /// Runs the `validate` hook, if registered.
    pub fn validate(&self, value: &dyn Any) -> Result<(), String> {
        match &self.validate {
            Some(hook) => hook(value),
            None => Ok(()),
        }
    }

    /// Runs the `commit` hook, if registered.
    pub fn commit(&self, value: &mut dyn Any) -> Result<(), String> {
        match &self.commit {
            Some(hook) => hook(value),
            None => Ok(()),
        }
    }

    /// Runs the `persist` hook, if registered.
    pub fn persist(&self, value: &dyn Any) -> Result<(), String> {
        match &self.persist {
            Some(hook) => hook(value),
            None => Ok(()),
        }
    }

    /// Runs the `complete` hook, if registered.
    pub fn complete(&self, value: &dyn Any) -> Result<(), String> {
        match &self.complete {
            Some(hook) => hook(value),
            None => Ok(()),
        }
    }

    /// Runs the `replace` hook, if registered.
    pub fn replace(&self, value: &dyn Any) -> Replaced {
        match &self.replace {
            Some(hook) => hook(value),
            None => Replaced::Keep,
        }
    }

    /// Runs the `resolve` hook, if registered, returning the (possibly
    /// substituted) instance.
    pub fn resolve(&self, value: Box<dyn Any>) -> Result<Box<dyn Any>, String> {
        match &self.resolve {
            Some(hook) => hook(value),
            None => Ok(value),
        }
    }
}

impl core::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hooks")
            .field("validate", &self.validate.is_some())
            .field("commit", &self.commit.is_some())
            .field("persist", &self.persist.is_some())
            .field("complete", &self.complete.is_some())
            .field("replace", &self.replace.is_some())
            .field("resolve", &self.resolve.is_some())
            .finish()
    }
}
