//! Single-pass scanner rewriting `:name` placeholders.
//!
//! The scanner walks the source once, byte by byte. Quoted literals, quoted
//! identifiers, comments, dollar-quoted and Oracle-quoted strings are skipped
//! as a whole so that a `:` inside them is never taken for a placeholder, and
//! `::` is always a cast. Every step moves the cursor forward, so the scan
//! terminates in linear time on any input.

mod skip;

use alloc::string::String;
use alloc::vec::Vec;

use crate::errors::ParseError;
use crate::format::PlaceholderFormat;
use crate::parsed::{ParsedSql, QueryToken};
use crate::registry::ParameterRegistry;
use crate::rewrite::{Edit, apply_edits};
use crate::selector::{Selector, is_valid_selector};

/// Rewrite the named placeholders of `sql` with `format`.
///
/// Each `:name` outside of literals, identifiers and comments is replaced
/// with the text `format` renders for its parameter index. Repeated names
/// share the index of their first occurrence.
///
/// ```
/// use sql_named_params::{PlaceholderFormat, parse_sql};
///
/// let pg = |i: usize| format!("${i}");
/// let parsed = parse_sql(
///     "SELECT name::text FROM users WHERE id = :id OR parent = :id",
///     Some(&pg as &dyn PlaceholderFormat),
/// )
/// .unwrap();
/// assert_eq!(
///     parsed.sql(),
///     "SELECT name::text FROM users WHERE id = $1 OR parent = $1"
/// );
/// assert_eq!(parsed.parameters().len(), 1);
/// assert_eq!(parsed.occurrences().len(), 2);
/// ```
///
/// # Errors
///
/// * [`ParseError::FormatFunctionRequired`] if `format` is `None`.
/// * [`ParseError::InvalidPlaceholderName`] if a placeholder name does not
///   follow the selector grammar, e.g. `:items.0.id`. No partial result is
///   returned.
pub fn parse_sql(
    sql: &str,
    format: Option<&dyn PlaceholderFormat>,
) -> Result<ParsedSql, ParseError> {
    let format = format.ok_or(ParseError::FormatFunctionRequired)?;
    let mut scanner = Scanner::new(sql, format);
    scanner.run()?;
    Ok(scanner.finish())
}

/// The state of one scan.
struct Scanner<'src, 'fmt> {
    src: &'src str,
    pos: usize,
    format: &'fmt dyn PlaceholderFormat,
    registry: ParameterRegistry,
    edits: Vec<Edit>,
    tokens: Vec<QueryToken>,
}

impl<'src, 'fmt> Scanner<'src, 'fmt> {
    fn new(src: &'src str, format: &'fmt dyn PlaceholderFormat) -> Self {
        Self {
            src,
            pos: 0,
            format,
            registry: ParameterRegistry::new(),
            edits: Vec::new(),
            tokens: Vec::new(),
        }
    }

    fn peek(&self, offset: usize) -> Option<u8> {
        self.src.as_bytes().get(self.pos + offset).copied()
    }

    fn run(&mut self) -> Result<(), ParseError> {
        while self.pos < self.src.len() {
            let before = self.pos;
            self.step()?;
            debug_assert!(self.pos > before, "scanner stalled at {before}");
        }
        Ok(())
    }

    /// Dispatch on the byte under the cursor and advance past it.
    fn step(&mut self) -> Result<(), ParseError> {
        let src = self.src;
        let pos = self.pos;
        self.pos = match src.as_bytes()[pos] {
            b'-' if self.peek(1) == Some(b'-') => skip::line_comment(src, pos, 2),
            b'#' => skip::line_comment(src, pos, 1),
            b'/' if self.peek(1) == Some(b'*') => skip::block_comment(src, pos),
            b'\'' => skip::single_quoted(src, pos),
            b'"' => skip::delimited(src, pos, b'"'),
            b'`' => skip::delimited(src, pos, b'`'),
            b'[' => skip::delimited(src, pos, b']'),
            b'$' => skip::dollar_quoted(src, pos),
            b'q' | b'Q' => skip::oracle_quoted(src, pos),
            b':' => match self.peek(1) {
                Some(b':') => pos + 2,
                Some(b) if is_name_start(b) => self.placeholder(pos)?,
                _ => pos + 1,
            },
            _ => pos + 1,
        };
        Ok(())
    }

    /// Recognize the placeholder whose colon is at `start`.
    ///
    /// Returns the offset just past the name.
    fn placeholder(&mut self, start: usize) -> Result<usize, ParseError> {
        let bytes = self.src.as_bytes();
        let name_start = start + 1;
        let end = bytes[name_start..]
            .iter()
            .position(|&b| !is_name_byte(b))
            .map_or(bytes.len(), |n| name_start + n);
        let name = &self.src[name_start..end];

        if !is_valid_selector(name) {
            tracing::debug!(name, offset = start, "rejecting invalid placeholder name");
            return Err(ParseError::InvalidPlaceholderName {
                name: name.into(),
                offset: start,
            });
        }

        let index = self.registry.index_of(name);
        tracing::trace!(name, index, offset = start, "placeholder");
        self.tokens.push(QueryToken {
            name: Selector::new_unchecked(name.into()),
            index,
            start,
            end,
            raw: self.src[start..end].into(),
        });
        self.edits.push(Edit {
            start,
            end,
            replacement: self.format.format_placeholder(index),
        });
        Ok(end)
    }

    fn finish(self) -> ParsedSql {
        let sql: String = apply_edits(self.src, &self.edits);
        tracing::debug!(
            input_len = self.src.len(),
            parameters = self.registry.len(),
            occurrences = self.tokens.len(),
            "rewrote named placeholders"
        );
        ParsedSql::new(sql, self.registry.into_parameters(), self.tokens)
    }
}

/// Bytes that may follow the `:` of a placeholder.
fn is_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

/// Bytes scanned as part of a candidate placeholder name.
fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'[' | b']')
}
