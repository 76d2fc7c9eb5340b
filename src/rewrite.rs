//! Splicing rendered placeholders back into the source text.

use alloc::string::String;

/// A half-open byte range of the source and the text replacing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Edit {
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) replacement: String,
}

/// Apply `edits` to `src`.
///
/// The edits must be sorted, non-overlapping and fall on character
/// boundaries; the scanner only produces edits starting at an ASCII `:` and
/// ending after an ASCII name, so both hold.
pub(crate) fn apply_edits(src: &str, edits: &[Edit]) -> String {
    if edits.is_empty() {
        return src.into();
    }

    let replaced: usize = edits.iter().map(|e| e.end - e.start).sum();
    let inserted: usize = edits.iter().map(|e| e.replacement.len()).sum();
    let mut out = String::with_capacity(src.len() - replaced + inserted);

    let mut last = 0;
    for edit in edits {
        debug_assert!(edit.start >= last && edit.end >= edit.start);
        out.push_str(&src[last..edit.start]);
        out.push_str(&edit.replacement);
        last = edit.end;
    }
    out.push_str(&src[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn edit(start: usize, end: usize, replacement: &str) -> Edit {
        Edit {
            start,
            end,
            replacement: replacement.into(),
        }
    }

    #[test]
    fn test_no_edits_is_identity() {
        let src = "SELECT 'a:b' -- :c";
        assert_eq!(apply_edits(src, &[]), src);
    }

    #[test]
    fn test_splices_in_order() {
        let src = "a = :a AND b = :bb";
        let edits = vec![edit(4, 6, "$1"), edit(15, 18, "$2")];
        assert_eq!(apply_edits(src, &edits), "a = $1 AND b = $2");
    }

    #[test]
    fn test_edits_at_boundaries() {
        let src = ":a,:b";
        let edits = vec![edit(0, 2, "?"), edit(3, 5, "?")];
        assert_eq!(apply_edits(src, &edits), "?,?");
    }

    #[test]
    fn test_keeps_multibyte_text_between_edits() {
        let src = "naïve = :x ✓ ok";
        let start = src.find(':').unwrap();
        let edits = vec![edit(start, start + 2, "@p1")];
        assert_eq!(apply_edits(src, &edits), "naïve = @p1 ✓ ok");
    }
}
