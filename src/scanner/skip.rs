//! Skip routines for the spans that can hide a `:` from the scanner.
//!
//! Every routine takes the source and the offset of its opening marker and
//! returns the offset just past the span, or `src.len()` when the span is
//! unterminated. The returned offset is always strictly greater than `pos`,
//! including when a routine rejects its trigger.

/// `'...'` with `''` as an escaped quote.
pub(super) fn single_quoted(src: &str, pos: usize) -> usize {
    let bytes = src.as_bytes();
    let mut i = pos + 1;
    while i < bytes.len() {
        if bytes[i] == b'\'' {
            if bytes.get(i + 1) == Some(&b'\'') {
                i += 2;
                continue;
            }
            return i + 1;
        }
        i += 1;
    }
    bytes.len()
}

/// `"..."`, `` `...` `` and `[...]`: everything up to the first `close`.
pub(super) fn delimited(src: &str, pos: usize, close: u8) -> usize {
    let bytes = src.as_bytes();
    bytes[pos + 1..]
        .iter()
        .position(|&b| b == close)
        .map_or(bytes.len(), |n| pos + 1 + n + 1)
}

/// `--` and `#` comments, up to (not including) the newline.
pub(super) fn line_comment(src: &str, pos: usize, marker_len: usize) -> usize {
    let bytes = src.as_bytes();
    let body = (pos + marker_len).min(bytes.len());
    bytes[body..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(bytes.len(), |n| body + n)
}

/// `/* ... */`, closed by the first `*/` after the opener.
pub(super) fn block_comment(src: &str, pos: usize) -> usize {
    let bytes = src.as_bytes();
    let body = (pos + 2).min(bytes.len());
    bytes[body..]
        .windows(2)
        .position(|w| w == b"*/")
        .map_or(bytes.len(), |n| body + n + 2)
}

/// `$tag$ ... $tag$`, where the tag may be empty.
///
/// A `$` not followed by tag characters and a second `$` (e.g. the `$1`
/// positional parameter) is ordinary text and only the `$` is skipped.
pub(super) fn dollar_quoted(src: &str, pos: usize) -> usize {
    let bytes = src.as_bytes();
    let Some(tag_len) = bytes[pos + 1..].iter().position(|&b| !is_tag_byte(b)) else {
        return bytes.len();
    };
    if bytes[pos + 1 + tag_len] != b'$' {
        return pos + 1;
    }
    let body = pos + tag_len + 2;
    let tag = &src[pos..body];
    src[body..]
        .find(tag)
        .map_or(bytes.len(), |n| body + n + tag.len())
}

/// Oracle alternative quoting: `q'<...>'`, `q'(...)'`, `q'[...]'`,
/// `q'{...}'` or `q'X...X'`, optionally with whitespace before the quote.
///
/// Anything else starting with `q`/`Q` is rejected and only the `q` is
/// skipped.
pub(super) fn oracle_quoted(src: &str, pos: usize) -> usize {
    let bytes = src.as_bytes();
    let mut i = pos + 1;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    if bytes.get(i) != Some(&b'\'') {
        return pos + 1;
    }
    i += 1;
    let Some(&open) = bytes.get(i) else {
        return bytes.len();
    };
    let close = match open {
        b'<' => b'>',
        b'(' => b')',
        b'[' => b']',
        b'{' => b'}',
        other => other,
    };
    let body = i + 1;
    bytes[body..]
        .windows(2)
        .position(|w| w[0] == close && w[1] == b'\'')
        .map_or(bytes.len(), |n| body + n + 2)
}

fn is_tag_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
