//! Naming styles applied to resolved label names.
//!
//! A [`Style`] turns a member name into the external spelling used in the
//! document. Explicit name overrides in a [`Tag`](crate::tag::Tag) pass
//! through the style as well, so one description serializes consistently
//! under any style.

use alloc::string::String;

// -----------------------------------------------------------------------------
// Style

/// A naming style for element and attribute names.
pub trait Style: Send + Sync {
    /// Formats an element name.
    fn element(&self, name: &str) -> String;

    /// Formats an attribute name.
    fn attribute(&self, name: &str) -> String;
}

// -----------------------------------------------------------------------------
// Identity

/// Leaves names exactly as declared.
#[derive(Debug, Default, Clone, Copy)]
pub struct Identity;

impl Style for Identity {
    #[inline]
    fn element(&self, name: &str) -> String {
        String::from(name)
    }

    #[inline]
    fn attribute(&self, name: &str) -> String {
        String::from(name)
    }
}

// -----------------------------------------------------------------------------
// Camel

/// Renames `member_name` style identifiers to `memberName`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Camel;

fn camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '_' || c == '-' {
            upper = !out.is_empty();
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

impl Style for Camel {
    #[inline]
    fn element(&self, name: &str) -> String {
        camel(name)
    }

    #[inline]
    fn attribute(&self, name: &str) -> String {
        camel(name)
    }
}

// -----------------------------------------------------------------------------
// Hyphen

/// Renames `member_name` and `memberName` style identifiers to `member-name`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Hyphen;

fn hyphen(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    let mut prev_lower = false;
    for c in name.chars() {
        if c == '_' || c == '-' {
            if !out.ends_with('-') && !out.is_empty() {
                out.push('-');
            }
            prev_lower = false;
        } else if c.is_uppercase() {
            if prev_lower && !out.ends_with('-') {
                out.push('-');
            }
            out.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_lowercase();
        }
    }
    out
}

impl Style for Hyphen {
    #[inline]
    fn element(&self, name: &str) -> String {
        hyphen(name)
    }

    #[inline]
    fn attribute(&self, name: &str) -> String {
        hyphen(name)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_renames() {
        assert_eq!(camel("member_name"), "memberName");
        assert_eq!(camel("a"), "a");
        assert_eq!(camel("_leading"), "leading");
        assert_eq!(camel("two_part_name"), "twoPartName");
    }

    #[test]
    fn hyphen_renames() {
        assert_eq!(hyphen("member_name"), "member-name");
        assert_eq!(hyphen("memberName"), "member-name");
        assert_eq!(hyphen("name"), "name");
    }

    #[test]
    fn identity_keeps_names() {
        assert_eq!(Identity.element("member_name"), "member_name");
        assert_eq!(Identity.attribute("memberName"), "memberName");
    }
}
