//! Placeholder names and the grammar they follow.
//!
//! A selector is an identifier optionally followed by any mix of `.field`
//! and `[index]` segments, e.g. `user`, `user.id` or `items[0].sku`. Numeric
//! segments must use bracket notation: `items.0` is rejected.

use alloc::string::String;
use core::borrow::Borrow;
use core::fmt::{self, Display};
use core::str::FromStr;

use crate::errors::Error;

/// A validated placeholder name, possibly a dotted/bracketed path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct Selector(String);

/// A selector made of a single identifier segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct Identifier(String);

/// One step of a selector path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// A named field, e.g. `id` in `user.id`.
    Field(&'a str),
    /// The digits of a bracketed index, e.g. `0` in `items[0]`.
    Index(&'a str),
}

impl Segment<'_> {
    /// Returns the numeric position of an index segment.
    ///
    /// Returns `None` for field segments and for indices that overflow `usize`.
    #[must_use]
    pub fn position(&self) -> Option<usize> {
        match self {
            Segment::Field(_) => None,
            Segment::Index(digits) => digits.parse().ok(),
        }
    }
}

/// Iterator over the segments of a [`Selector`].
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Segment<'a>> {
        let s = self.rest;
        let (segment, consumed) = match s.as_bytes().first()? {
            b'[' => {
                let end = read_index(s, 1)?;
                (Segment::Index(&s[1..end - 1]), end)
            }
            b'.' => {
                let end = read_ident(s, 1)?;
                (Segment::Field(&s[1..end]), end)
            }
            _ => {
                let end = read_ident(s, 0)?;
                (Segment::Field(&s[..end]), end)
            }
        };
        self.rest = &s[consumed..];
        Some(segment)
    }
}

impl Selector {
    /// Validate `name` and wrap it as a selector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSelector`] if `name` is empty, does not start
    /// with an identifier, or contains a malformed `.` or `[...]` segment.
    pub fn new(name: impl Into<String>) -> Result<Self, Error> {
        let name = name.into();
        if is_valid_selector(&name) {
            Ok(Self(name))
        } else {
            Err(Error::InvalidSelector(name))
        }
    }

    /// Wrap a name already checked with [`is_valid_selector`].
    pub(crate) fn new_unchecked(name: String) -> Self {
        debug_assert!(is_valid_selector(&name));
        Self(name)
    }

    /// The selector text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the selector is a bare identifier with no path segments.
    #[must_use]
    pub fn is_identifier(&self) -> bool {
        !self.0.contains(['.', '['])
    }

    /// The selector as an [`Identifier`], if it has a single segment.
    #[must_use]
    pub fn as_identifier(&self) -> Option<Identifier> {
        self.is_identifier().then(|| Identifier(self.0.clone()))
    }

    /// Iterate over the path segments in order.
    #[must_use]
    pub fn segments(&self) -> Segments<'_> {
        Segments { rest: &self.0 }
    }
}

impl Identifier {
    /// Validate `name` as a plain identifier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSelector`] if `name` is not a single identifier.
    pub fn new(name: impl Into<String>) -> Result<Self, Error> {
        let name = name.into();
        if read_ident(&name, 0) == Some(name.len()) {
            Ok(Self(name))
        } else {
            Err(Error::InvalidSelector(name))
        }
    }

    /// The identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Check `name` against the grammar `ident ('.' ident | '[' digits ']')*`.
#[must_use]
pub fn is_valid_selector(name: &str) -> bool {
    let Some(mut pos) = read_ident(name, 0) else {
        return false;
    };
    while pos < name.len() {
        let next = match name.as_bytes()[pos] {
            b'.' => read_ident(name, pos + 1),
            b'[' => read_index(name, pos + 1),
            _ => None,
        };
        match next {
            Some(end) => pos = end,
            None => return false,
        }
    }
    true
}

/// Read an identifier starting at `pos`, returning the offset just past it.
fn read_ident(s: &str, pos: usize) -> Option<usize> {
    let mut chars = s.get(pos..)?.char_indices();
    let (_, first) = chars.next()?;
    if !is_ident_start(first) {
        return None;
    }
    Some(
        chars
            .find(|&(_, c)| !is_ident_cont(c))
            .map_or(s.len(), |(i, _)| pos + i),
    )
}

/// Read `digits ']'` starting at `pos`, returning the offset past the `]`.
fn read_index(s: &str, pos: usize) -> Option<usize> {
    let bytes = s.as_bytes().get(pos..)?;
    let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 || bytes.get(digits) != Some(&b']') {
        return None;
    }
    Some(pos + digits + 1)
}

fn is_ident_start(c: char) -> bool {
    c == '_' || is_letter(c)
}

/// Letters of any script, but only ASCII digits.
fn is_ident_cont(c: char) -> bool {
    c == '_' || is_letter(c) || c.is_ascii_digit()
}

/// `char::is_alphabetic` minus the letter-like numerals (`Nl`), e.g. `Ⅻ`.
fn is_letter(c: char) -> bool {
    c.is_alphabetic()
        && !matches!(
            c,
            '\u{16EE}'..='\u{16F0}'
                | '\u{2160}'..='\u{2182}'
                | '\u{2185}'..='\u{2188}'
                | '\u{3007}'
                | '\u{3021}'..='\u{3029}'
                | '\u{3038}'..='\u{303A}'
                | '\u{A6E6}'..='\u{A6EF}'
                | '\u{10140}'..='\u{10174}'
                | '\u{10341}'
                | '\u{1034A}'
                | '\u{103D1}'..='\u{103D5}'
                | '\u{12400}'..='\u{1246E}'
        )
}

impl Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Selector {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Selector {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Selector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Selector {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Selector {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Selector> for String {
    fn from(value: Selector) -> Self {
        value.0
    }
}

impl From<Identifier> for Selector {
    fn from(value: Identifier) -> Self {
        Self(value.0)
    }
}

impl TryFrom<String> for Identifier {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Identifier> for String {
    fn from(value: Identifier) -> Self {
        value.0
    }
}

impl PartialEq<str> for Selector {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Selector {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn test_valid_selectors() {
        for name in [
            "id",
            "_private",
            "user_id2",
            "user.id",
            "body.event",
            "items[0]",
            "items[0].id",
            "items[99].deeply.nested[5].value",
            "matrix[1][2]",
            "café.prix",
        ] {
            assert!(is_valid_selector(name), "{name} should be valid");
        }
    }

    #[test]
    fn test_invalid_selectors() {
        for name in [
            "",
            "0id",
            "[0]",
            ".id",
            "items.0.id",
            "items.",
            "items[",
            "items[]",
            "items[a]",
            "items[0",
            "items]0",
            "user..id",
        ] {
            assert!(!is_valid_selector(name), "{name} should be invalid");
        }
    }

    #[test]
    fn test_segments() {
        let selector = Selector::new("items[12].sku.code").unwrap();
        let segments: Vec<Segment<'_>> = selector.segments().collect();
        assert_eq!(
            segments,
            vec![
                Segment::Field("items"),
                Segment::Index("12"),
                Segment::Field("sku"),
                Segment::Field("code"),
            ]
        );
        assert_eq!(segments[1].position(), Some(12));
        assert_eq!(segments[0].position(), None);
    }

    #[test]
    fn test_identifier_classification() {
        assert!(Selector::new("since").unwrap().is_identifier());
        assert!(!Selector::new("user.id").unwrap().is_identifier());
        assert!(!Selector::new("items[0]").unwrap().is_identifier());
        assert_eq!(
            Selector::new("since").unwrap().as_identifier(),
            Some(Identifier::new("since").unwrap())
        );
        assert!(Identifier::new("user.id").is_err());
    }

    #[test]
    fn test_new_rejects_with_name() {
        assert_eq!(
            Selector::new("items.0.id"),
            Err(Error::InvalidSelector("items.0.id".into()))
        );
    }

    #[test]
    fn test_non_decimal_numerics_rejected() {
        for name in ["a\u{b2}", "x\u{216b}", "items[0].n\u{bd}"] {
            assert!(!is_valid_selector(name), "{name} should be invalid");
            assert!(Selector::new(name).is_err());
        }
        assert!(Identifier::new("v\u{b3}").is_err());
        assert!(Identifier::new("caf\u{e9}2").is_ok());
        assert!(is_valid_selector("a2.b3[4]"));
    }
}
