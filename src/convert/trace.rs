//! A per-thread label path kept while converting, for error context.
//!
//! Only active in builds with `debug_assertions` and the `debug` feature;
//! release builds compile every call here down to nothing.

use alloc::string::String;
use core::fmt::Display;

#[cfg(all(debug_assertions, feature = "debug"))]
mod stack {
    use alloc::string::String;
    use alloc::vec::Vec;
    use core::fmt::{Debug, Formatter};

    /// The names of the labels currently being converted, outermost first.
    #[derive(Default)]
    pub(super) struct LabelStack {
        stack: Vec<String>,
    }

    impl LabelStack {
        pub const fn new() -> Self {
            Self { stack: Vec::new() }
        }

        pub fn push(&mut self, name: &str) {
            self.stack.push(String::from(name));
        }

        pub fn pop(&mut self) {
            self.stack.pop();
        }

        pub fn clear(&mut self) {
            self.stack.clear();
        }

        pub fn is_empty(&self) -> bool {
            self.stack.is_empty()
        }
    }

    impl Debug for LabelStack {
        fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
            let mut iter = self.stack.iter();
            if let Some(first) = iter.next() {
                write!(f, "`{first}`")?;
            }
            for name in iter {
                write!(f, " -> `{name}`")?;
            }
            Ok(())
        }
    }

    std::thread_local! {
        pub(super) static LABEL_STACK: core::cell::RefCell<LabelStack> =
            const { core::cell::RefCell::new(LabelStack::new()) };
    }
}

/// Pushes a label name for the duration of its conversion.
#[inline]
pub(crate) fn push(name: &str) {
    #[cfg(all(debug_assertions, feature = "debug"))]
    stack::LABEL_STACK.with_borrow_mut(|stack| stack.push(name));
    #[cfg(not(all(debug_assertions, feature = "debug")))]
    let _ = name;
}

/// Pops the innermost label name.
#[inline]
pub(crate) fn pop() {
    #[cfg(all(debug_assertions, feature = "debug"))]
    stack::LABEL_STACK.with_borrow_mut(|stack| stack.pop());
}

/// Clears the stack when a top-level conversion aborts.
#[inline]
pub(crate) fn clear() {
    #[cfg(all(debug_assertions, feature = "debug"))]
    stack::LABEL_STACK.with_borrow_mut(|stack| stack.clear());
}

/// Annotates a hook failure message with the current label path.
///
/// Prefer this over stringifying the message directly; in debug builds the
/// result names where in the document tree the failure happened.
pub(crate) fn annotate(msg: impl Display) -> String {
    #[cfg(all(debug_assertions, feature = "debug"))]
    {
        stack::LABEL_STACK.with_borrow(|stack| {
            if stack.is_empty() {
                alloc::format!("{msg}")
            } else {
                alloc::format!("{msg} (at {stack:?})")
            }
        })
    }
    #[cfg(not(all(debug_assertions, feature = "debug")))]
    {
        alloc::format!("{msg}")
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(all(debug_assertions, feature = "debug"))]
    fn annotate_names_the_current_path() {
        clear();
        push("person");
        push("address");
        assert_eq!(
            annotate("boom"),
            "boom (at `person` -> `address`)"
        );
        pop();
        assert_eq!(annotate("boom"), "boom (at `person`)");
        clear();
        assert_eq!(annotate("boom"), "boom");
    }
}
