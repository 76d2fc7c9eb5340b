//! Testing utilities shared by the fuzz harnesses and the regression tests.
//!
//! This module is gated behind the `testing` feature.
//!
//! # Provided helpers
//!
//! - [`check_parse_invariants`]: parse arbitrary text and assert every
//!   structural property of the result
//! - [`test_parse_sql`]: the same check on raw bytes, as fed by the fuzzers
//! - [`FuzzQuery`]: an `arbitrary`-generated query mixing placeholders with
//!   every quoting and comment form
//! - [`run_crash_dir_regression`]: replay a directory of crash inputs with a
//!   per-input time limit

extern crate std;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write;
use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;

use arbitrary::{Arbitrary, Unstructured};

use crate::errors::ParseError;
use crate::format::PlaceholderFormat;
use crate::scanner::parse_sql;
use crate::selector::is_valid_selector;

/// Parse `sql` with a numbered format and assert the invariants of the
/// result.
///
/// # Panics
///
/// Panics with a description of the first violated invariant.
pub fn check_parse_invariants(sql: &str) {
    let format = |i: usize| format!("${i}");
    let parsed = match parse_sql(sql, Some(&format as &dyn PlaceholderFormat)) {
        Ok(parsed) => parsed,
        Err(ParseError::InvalidPlaceholderName { name, offset }) => {
            assert_eq!(sql.as_bytes()[offset], b':', "error offset must point at a colon");
            assert!(
                sql[offset + 1..].starts_with(name.as_str()),
                "error name {name:?} must follow the colon at {offset}"
            );
            assert!(!is_valid_selector(&name), "{name:?} was rejected but is valid");
            return;
        }
        Err(ParseError::FormatFunctionRequired) => {
            panic!("a format was supplied but the parse reported it missing")
        }
    };

    let parameters = parsed.parameters();
    let occurrences = parsed.occurrences();
    assert!(occurrences.len() >= parameters.len());

    for (position, parameter) in parameters.iter().enumerate() {
        assert_eq!(parameter.index, position + 1, "indices must be dense from 1");
        let first = occurrences
            .iter()
            .find(|t| t.name == parameter.name)
            .expect("every parameter has an occurrence");
        assert_eq!(first.index, parameter.index);
    }

    let mut expected = String::with_capacity(sql.len());
    let mut last = 0;
    for token in occurrences {
        assert!(token.start >= last, "occurrences overlap or go backwards");
        assert!(token.end > token.start);
        assert_eq!(&sql[token.start..token.end], token.raw);
        assert_eq!(&token.raw[1..], token.name.as_str());
        assert!(is_valid_selector(token.name.as_str()));
        assert_eq!(
            parameters.get(token.index - 1).map(|p| &p.name),
            Some(&token.name),
            "occurrence index must point at its parameter"
        );
        expected.push_str(&sql[last..token.start]);
        write!(expected, "${}", token.index).expect("writing to a String cannot fail");
        last = token.end;
    }
    expected.push_str(&sql[last..]);
    assert_eq!(parsed.sql(), expected, "text outside placeholders must be preserved");
}

/// Run [`check_parse_invariants`] on raw fuzzer bytes.
pub fn test_parse_sql(data: &[u8]) {
    check_parse_invariants(&String::from_utf8_lossy(data));
}

/// A query assembled from fragments that exercise the scanner.
#[derive(Debug, Clone)]
pub struct FuzzQuery {
    fragments: Vec<Fragment>,
}

#[derive(Debug, Clone)]
enum Fragment {
    Text(String),
    Placeholder(NameShape),
    Cast,
    SingleQuoted(String),
    DoubleQuoted(String),
    Backtick(String),
    Bracket(String),
    LineComment(String),
    HashComment(String),
    BlockComment(String),
    Dollar { tag: u8, body: String },
    Oracle { delimiter: u8, body: String },
}

#[derive(Debug, Clone, Copy)]
enum NameShape {
    Plain(u8),
    Dotted(u8, u8),
    Indexed(u8, u16),
    DigitAfterDot(u8),
}

// Manual implementations: the derive expands to `::std` paths that a
// `no_std` crate root does not provide.
impl<'a> Arbitrary<'a> for NameShape {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        Ok(match u.int_in_range(0..=3u8)? {
            0 => Self::Plain(u.arbitrary()?),
            1 => Self::Dotted(u.arbitrary()?, u.arbitrary()?),
            2 => Self::Indexed(u.arbitrary()?, u.arbitrary()?),
            _ => Self::DigitAfterDot(u.arbitrary()?),
        })
    }
}

impl<'a> Arbitrary<'a> for Fragment {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        Ok(match u.int_in_range(0..=11u8)? {
            0 => Self::Text(u.arbitrary()?),
            1 => Self::Placeholder(u.arbitrary()?),
            2 => Self::Cast,
            3 => Self::SingleQuoted(u.arbitrary()?),
            4 => Self::DoubleQuoted(u.arbitrary()?),
            5 => Self::Backtick(u.arbitrary()?),
            6 => Self::Bracket(u.arbitrary()?),
            7 => Self::LineComment(u.arbitrary()?),
            8 => Self::HashComment(u.arbitrary()?),
            9 => Self::BlockComment(u.arbitrary()?),
            10 => Self::Dollar {
                tag: u.arbitrary()?,
                body: u.arbitrary()?,
            },
            _ => Self::Oracle {
                delimiter: u.arbitrary()?,
                body: u.arbitrary()?,
            },
        })
    }
}

impl<'a> Arbitrary<'a> for FuzzQuery {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        Ok(Self {
            fragments: u.arbitrary()?,
        })
    }
}

const NAMES: [&str; 6] = ["id", "since", "user", "items", "q", "_x1"];

fn pick(n: u8) -> &'static str {
    NAMES[usize::from(n) % NAMES.len()]
}

impl NameShape {
    fn write(self, out: &mut String) {
        match self {
            NameShape::Plain(a) => out.push_str(pick(a)),
            NameShape::Dotted(a, b) => {
                write!(out, "{}.{}", pick(a), pick(b)).expect("writing to a String cannot fail");
            }
            NameShape::Indexed(a, i) => {
                write!(out, "{}[{i}]", pick(a)).expect("writing to a String cannot fail");
            }
            NameShape::DigitAfterDot(a) => {
                write!(out, "{}.0", pick(a)).expect("writing to a String cannot fail");
            }
        }
    }
}

impl FuzzQuery {
    /// Render the fragments as SQL text.
    #[must_use]
    pub fn to_sql(&self) -> String {
        let mut out = String::new();
        for fragment in &self.fragments {
            match fragment {
                Fragment::Text(text) => out.push_str(text),
                Fragment::Placeholder(shape) => {
                    out.push_str(" :");
                    shape.write(&mut out);
                    out.push(' ');
                }
                Fragment::Cast => out.push_str("::int"),
                Fragment::SingleQuoted(body) => {
                    write!(out, "'{}'", body.replace('\'', "''"))
                        .expect("writing to a String cannot fail");
                }
                Fragment::DoubleQuoted(body) => {
                    write!(out, "\"{}\"", body.replace('"', ""))
                        .expect("writing to a String cannot fail");
                }
                Fragment::Backtick(body) => {
                    write!(out, "`{}`", body.replace('`', ""))
                        .expect("writing to a String cannot fail");
                }
                Fragment::Bracket(body) => {
                    write!(out, "[{}]", body.replace(']', ""))
                        .expect("writing to a String cannot fail");
                }
                Fragment::LineComment(body) => {
                    writeln!(out, "-- {}", body.replace('\n', " "))
                        .expect("writing to a String cannot fail");
                }
                Fragment::HashComment(body) => {
                    writeln!(out, "# {}", body.replace('\n', " "))
                        .expect("writing to a String cannot fail");
                }
                Fragment::BlockComment(body) => {
                    write!(out, "/* {} */", body.replace("*/", ""))
                        .expect("writing to a String cannot fail");
                }
                Fragment::Dollar { tag, body } => {
                    let tag = if tag % 2 == 0 { "" } else { pick(*tag) };
                    write!(out, "${tag}${body}${tag}$").expect("writing to a String cannot fail");
                }
                Fragment::Oracle { delimiter, body } => {
                    write!(out, "q'{}{body}", char::from(*delimiter))
                        .expect("writing to a String cannot fail");
                }
            }
        }
        out
    }

    /// Render the query and check it.
    pub fn check(&self) {
        check_parse_invariants(&self.to_sql());
    }
}

/// Replay every file of `crash_dir` through `test_fn`.
///
/// Files with the `.fuzz` extension found in `fuzz_workspace` (the honggfuzz
/// output directory) are copied into `crash_dir` first, so new crashes become
/// regression inputs on the next run. Each input runs on its own thread and
/// must finish within `time_limit`.
///
/// # Panics
///
/// Panics if an input panics, exceeds the time limit, or a directory cannot
/// be read.
pub fn run_crash_dir_regression(
    crash_dir: &str,
    fuzz_workspace: &str,
    time_limit: Duration,
    test_fn: fn(&[u8]),
) {
    let crash_dir = Path::new(crash_dir);
    std::fs::create_dir_all(crash_dir).expect("create crash input directory");

    if let Ok(entries) = std::fs::read_dir(fuzz_workspace) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "fuzz") {
                let target = crash_dir.join(entry.file_name());
                if !target.exists() {
                    std::fs::copy(&path, &target).expect("copy crash input");
                }
            }
        }
    }

    let mut paths: Vec<_> = std::fs::read_dir(crash_dir)
        .expect("read crash input directory")
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    for path in paths {
        let data = std::fs::read(&path).expect("read crash input");
        let (done, finished) = mpsc::channel();
        let worker = std::thread::spawn(move || {
            test_fn(&data);
            let _ = done.send(());
        });
        match finished.recv_timeout(time_limit) {
            Ok(()) => worker.join().expect("crash input worker"),
            Err(mpsc::RecvTimeoutError::Timeout) => {
                panic!("{} exceeded {time_limit:?}", path.display())
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                panic!("{} panicked", path.display())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashbrown::HashSet;

    #[test]
    fn test_invariants_on_samples() {
        for sql in [
            "",
            "SELECT * FROM users WHERE id = :id",
            "a = :x AND b = :y AND c = :x",
            "q'<:fake>' :real $$ :no $$ :yes",
            ":items.0.id",
            "\u{0}:\u{ff}é:é",
        ] {
            check_parse_invariants(sql);
        }
    }

    #[test]
    fn test_fuzz_query_from_fixed_bytes() {
        let bytes: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        let mut u = Unstructured::new(&bytes);
        for _ in 0..64 {
            let Ok(query) = FuzzQuery::arbitrary(&mut u) else {
                break;
            };
            query.check();
            if u.is_empty() {
                break;
            }
        }
    }

    #[test]
    fn test_fuzz_query_rendering() {
        let query = FuzzQuery {
            fragments: alloc::vec![
                Fragment::Text("SELECT".into()),
                Fragment::Placeholder(NameShape::Indexed(3, 2)),
                Fragment::SingleQuoted("it's :x".into()),
                Fragment::Cast,
            ],
        };
        assert_eq!(query.to_sql(), "SELECT :items[2] 'it''s :x'::int");
        query.check();
    }

    #[test]
    fn test_arbitrary_reaches_every_fragment() {
        let mut fragments = HashSet::new();
        let mut shapes = HashSet::new();
        for seed in 0..=255u8 {
            let bytes = [seed, seed, 3, 1, 4, 1, 5, 9, 2, 6];
            let fragment = Fragment::arbitrary(&mut Unstructured::new(&bytes))
                .expect("enough bytes for one fragment");
            fragments.insert(core::mem::discriminant(&fragment));
            let shape = NameShape::arbitrary(&mut Unstructured::new(&bytes))
                .expect("enough bytes for one name");
            shapes.insert(core::mem::discriminant(&shape));
        }
        assert_eq!(fragments.len(), 12);
        assert_eq!(shapes.len(), 4);
    }
}
