//! Value normalization
//!
//! Values are rewritten inside the buffer they were parsed from: escape
//! sequences collapse to one byte and line continuations disappear, so the
//! result is always a prefix of the original span.

use std::ops::Range;

/// Whitespace as C's `isspace` sees it (includes vertical tab)
pub(crate) fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\x0b' | b'\x0c' | b'\r')
}

/// Narrow `range` so it excludes leading and trailing whitespace in `buf`
///
/// The returned range always starts inside the original one; an all-blank
/// range becomes empty.
pub(crate) fn trim_range(buf: &[u8], range: Range<usize>) -> Range<usize> {
    let span = &buf[range.clone()];
    let Some(first) = span.iter().position(|&b| !is_space(b)) else {
        return range.start..range.start;
    };
    let last = span.iter().rposition(|&b| !is_space(b)).unwrap_or(first);
    range.start + first..range.start + last + 1
}

fn control_for(b: u8) -> Option<u8> {
    match b {
        b'n' => Some(b'\n'),
        b't' => Some(b'\t'),
        b'r' => Some(b'\r'),
        b'v' => Some(b'\x0b'),
        b'f' => Some(b'\x0c'),
        b'b' => Some(b'\x08'),
        _ => None,
    }
}

/// Resolve escapes in `span` in place and return the new length
///
/// A backslash-newline pair is dropped; a backslash before one of
/// `n t r v f b` becomes the matching control byte. Anything else,
/// including a trailing lone backslash, is copied through.
pub fn unescape_in_place(span: &mut [u8]) -> usize {
    let len = span.len();
    let mut read = 0;
    let mut write = 0;

    while read < len {
        let b = span[read];
        if b == b'\\' && read + 1 < len {
            let next = span[read + 1];
            if next == b'\n' {
                read += 2;
                continue;
            }
            if let Some(c) = control_for(next) {
                span[write] = c;
                write += 1;
                read += 2;
                continue;
            }
        }
        span[write] = b;
        write += 1;
        read += 1;
    }

    write
}

/// Owned-string convenience over [`unescape_in_place`]
pub fn unescape(value: &str) -> String {
    let mut bytes = value.as_bytes().to_vec();
    let len = unescape_in_place(&mut bytes);
    bytes.truncate(len);
    // Only ASCII pairs are rewritten, so valid UTF-8 stays valid
    String::from_utf8_lossy(&bytes).into_owned()
}
