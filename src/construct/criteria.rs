//! The transient name → value store of one read pass.

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::Any;

use crate::error::ConstructorError;
use crate::label::Label;
use crate::util::HashMap;

// -----------------------------------------------------------------------------
// Criteria

/// A value deserialized for one label, held until the owning instance can
/// absorb it.
#[derive(Debug)]
pub struct Variable {
    pub label: Arc<Label>,
    pub value: Box<dyn Any>,
}

/// Holds deserialized values before the owning object exists.
///
/// Keys are member names ([`Label::criteria_key`]); constructor factories
/// consume values with [`take`](Self::take), and whatever remains is flushed
/// through setters by [`commit`](Self::commit).
#[derive(Debug)]
pub struct Criteria {
    owner: &'static str,
    values: HashMap<&'static str, Variable>,
}

impl Criteria {
    /// Creates an empty store for instances of the named type.
    pub fn new(owner: &'static str) -> Self {
        Self {
            owner,
            values: HashMap::default(),
        }
    }

    /// Returns the owning type name, for diagnostics.
    #[inline]
    pub const fn owner(&self) -> &'static str {
        self.owner
    }

    /// Stores a value for a label, replacing an earlier one.
    pub fn set(&mut self, label: Arc<Label>, value: Box<dyn Any>) {
        self.values.insert(label.criteria_key(), Variable { label, value });
    }

    /// Returns the variable stored under the member name.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.values.get(name)
    }

    /// Whether a value is stored under the member name.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Removes and returns the variable stored under the member name.
    pub fn remove(&mut self, name: &str) -> Option<Variable> {
        self.values.remove(name)
    }

    /// Consumes the value stored under `name` as a `V`.
    ///
    /// Fails when the value is absent or of another type; constructor
    /// factories use this for their required parameters.
    pub fn take<V: Any>(&mut self, name: &'static str) -> Result<V, ConstructorError> {
        match self.take_opt::<V>(name)? {
            Some(value) => Ok(value),
            None => Err(ConstructorError::MissingParameter {
                name: Cow::Borrowed(name),
                owner: Cow::Borrowed(self.owner),
            }),
        }
    }

    /// Consumes the value stored under `name` as a `V`, or `None` when the
    /// document did not provide one.
    pub fn take_opt<V: Any>(&mut self, name: &'static str) -> Result<Option<V>, ConstructorError> {
        let Some(variable) = self.values.remove(name) else {
            return Ok(None);
        };
        match variable.value.downcast::<V>() {
            Ok(value) => Ok(Some(*value)),
            Err(value) => {
                // Put it back so a later setter pass still sees it.
                self.values.insert(
                    name,
                    Variable {
                        label: variable.label,
                        value,
                    },
                );
                Err(ConstructorError::ParameterType {
                    name: Cow::Borrowed(name),
                    expected: Cow::Borrowed(core::any::type_name::<V>()),
                })
            }
        }
    }

    /// Iterates the stored variables in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.values.values()
    }

    /// The number of stored values.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Flushes every remaining value into `owner` through its label's
    /// setter. Fails on a read-only label, since such values can only be
    /// injected through a constructor.
    pub fn commit(&mut self, owner: &mut dyn Any) -> Result<(), ConstructorError> {
        for (name, variable) in self.values.drain() {
            if !variable.label.contact().is_writable() {
                return Err(ConstructorError::NoSetter {
                    name: Cow::Borrowed(name),
                    owner: Cow::Borrowed(self.owner),
                });
            }
            if !variable.label.contact().set(owner, variable.value) {
                return Err(ConstructorError::ParameterType {
                    name: Cow::Borrowed(name),
                    expected: Cow::Borrowed(variable.label.type_name()),
                });
            }
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests
