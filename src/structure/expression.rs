//! Path expression parsing for nested label placement.
//!
//! A path addresses a location below the owning element, one element name
//! per segment, with an optional one-based repetition index:
//!
//! ```text
//! contact/address[2]/city
//! ```
//!
//! Segment names must start with a letter or underscore and may contain
//! letters, digits, `_`, `-`, `.` and `:`. The index defaults to `1`.

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::error::SchemaError;

// -----------------------------------------------------------------------------
// ParseError

/// An error raised while parsing a path expression, carrying the offset of
/// the offending character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Position in `path`.
    pub offset: usize,
    /// The path that the error occurred in.
    pub path: String,
    /// The underlying error.
    pub error: Cow<'static, str>,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "encountered an error at offset {} while parsing `{}`: {}",
            self.offset, self.path, self.error,
        )
    }
}

impl core::error::Error for ParseError {}

impl From<ParseError> for SchemaError {
    fn from(value: ParseError) -> Self {
        SchemaError::InvalidPath {
            path: value.path,
            offset: value.offset,
            reason: value.error,
        }
    }
}

// -----------------------------------------------------------------------------
// Segment

/// One element step of a path: a name plus a one-based repetition index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment {
    pub name: String,
    pub index: usize,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.index > 1 {
            write!(f, "{}[{}]", self.name, self.index)
        } else {
            f.write_str(&self.name)
        }
    }
}

// -----------------------------------------------------------------------------
// Expression

/// A parsed path expression.
///
/// # Examples
///
/// ```
/// use docbind::structure::Expression;
///
/// let expression = Expression::parse("contact/address[2]/city").unwrap();
/// assert_eq!(expression.segments().len(), 3);
/// assert_eq!(expression.segments()[1].name, "address");
/// assert_eq!(expression.segments()[1].index, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    path: String,
    segments: Vec<Segment>,
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_part(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':')
}

impl Expression {
    /// Parses a path expression.
    pub fn parse(path: &str) -> Result<Self, ParseError> {
        let fail = |offset: usize, error: &'static str| ParseError {
            offset,
            path: String::from(path),
            error: Cow::Borrowed(error),
        };

        if path.is_empty() {
            return Err(fail(0, "path is empty"));
        }

        let mut segments = Vec::new();
        let mut chars = path.char_indices().peekable();

        loop {
            // Segment name.
            let start = match chars.next() {
                Some((at, c)) if is_name_start(c) => at,
                Some((at, _)) => return Err(fail(at, "segment must start with a letter")),
                None => return Err(fail(path.len(), "trailing separator")),
            };
            let mut end = path.len();
            let mut index: usize = 1;

            while let Some(&(at, c)) = chars.peek() {
                if is_name_part(c) {
                    chars.next();
                    continue;
                }
                end = at;
                break;
            }

            // Optional `[index]`.
            if let Some(&(_, '[')) = chars.peek() {
                chars.next();
                let mut digits = String::new();
                loop {
                    match chars.next() {
                        Some((_, c)) if c.is_ascii_digit() => digits.push(c),
                        Some((at, ']')) => {
                            index = digits
                                .parse()
                                .map_err(|_| fail(at, "index must be a positive number"))?;
                            if index == 0 {
                                return Err(fail(at, "index is one-based"));
                            }
                            break;
                        }
                        Some((at, _)) => return Err(fail(at, "index must be a positive number")),
                        None => return Err(fail(path.len(), "unclosed index")),
                    }
                }
            }

            segments.push(Segment {
                name: String::from(&path[start..end]),
                index,
            });

            match chars.next() {
                None => break,
                Some((_, '/')) => continue,
                Some((at, _)) => return Err(fail(at, "expected `/` between segments")),
            }
        }

        Ok(Self {
            path: String::from(path),
            segments,
        })
    }

    /// Returns the original path text.
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the parsed segments in order.
    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Splits the expression into the intermediate steps and the leaf.
    pub fn split_target(&self) -> (&[Segment], &Segment) {
        let (last, prefix) = self.segments.split_last().unwrap();
        (prefix, last)
    }

    /// Rewrites each segment name through a naming function. Used to apply
    /// the naming style to intermediate element names.
    pub(crate) fn restyle(&mut self, style: impl Fn(&str) -> String) {
        for segment in &mut self.segments {
            segment.name = style(&segment.name);
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_segment() {
        let e = Expression::parse("name").unwrap();
        assert_eq!(e.segments().len(), 1);
        assert_eq!(e.segments()[0].name, "name");
        assert_eq!(e.segments()[0].index, 1);
    }

    #[test]
    fn nested_with_index() {
        let e = Expression::parse("a/b[3]/c").unwrap();
        let (prefix, target) = e.split_target();
        assert_eq!(prefix.len(), 2);
        assert_eq!(prefix[1].name, "b");
        assert_eq!(prefix[1].index, 3);
        assert_eq!(target.name, "c");
    }

    #[test]
    fn rejects_malformed_paths() {
        assert_eq!(Expression::parse("").unwrap_err().offset, 0);
        assert_eq!(Expression::parse("a//b").unwrap_err().offset, 2);
        assert!(Expression::parse("a/").is_err());
        assert!(Expression::parse("1abc").is_err());
        assert!(Expression::parse("a[0]").is_err());
        assert!(Expression::parse("a[x]").is_err());
        assert!(Expression::parse("a[1").is_err());
    }

    #[test]
    fn segment_display_includes_index() {
        let e = Expression::parse("a/b[2]").unwrap();
        assert_eq!(alloc::format!("{}", e.segments()[0]), "a");
        assert_eq!(alloc::format!("{}", e.segments()[1]), "b[2]");
    }
}
