//! Two-pass entry parser
//!
//! Source format, one statement per logical line:
//! ```text
//! # comment
//! key = value
//! motd = first line\n\
//!        second line
//! ```
//!
//! A newline ends a logical line unless a backslash sits right before it.
//! Pass one counts qualifying statements so the entry vector is reserved
//! once; pass two fills it, rewriting values inside the source buffer.
//!
//! Keys and values are stored as `String`. Bytes that are not valid UTF-8
//! become U+FFFD, and both hashes are taken over the stored text, so a key
//! is found by the replaced spelling, not the raw bytes.

use std::ops::Range;

use tracing::debug;

use crate::entry::Entry;
use crate::error::Result;
use crate::escape::{trim_range, unescape_in_place};

/// Key and value spans of one statement, both already trimmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Statement {
    pub key: Range<usize>,
    pub value: Range<usize>,
}

/// Span of the logical line starting at `start`, without its terminator
///
/// The last line of the buffer counts even when it has no newline.
pub(crate) fn next_logical_line(buf: &[u8], start: usize) -> Option<Range<usize>> {
    if start >= buf.len() {
        return None;
    }

    let end = (start..buf.len())
        .find(|&i| buf[i] == b'\n' && (i == 0 || buf[i - 1] != b'\\'))
        .unwrap_or(buf.len());

    Some(start..end)
}

/// Split a logical line at its first `=`
///
/// Blank lines, `#` comments, lines without `=` and lines with an empty key
/// are not statements.
pub(crate) fn split_statement(buf: &[u8], line: Range<usize>) -> Option<Statement> {
    let line = trim_range(buf, line);
    if line.is_empty() || buf[line.start] == b'#' {
        return None;
    }

    let eq = line.start + buf[line.clone()].iter().position(|&b| b == b'=')?;

    let key = trim_range(buf, line.start..eq);
    if key.is_empty() {
        return None;
    }

    let value = trim_range(buf, eq + 1..line.end);
    Some(Statement { key, value })
}

fn statements(buf: &[u8]) -> impl Iterator<Item = Statement> + '_ {
    let mut pos = 0;
    std::iter::from_fn(move || next_logical_line(buf, pos).map(|line| {
        pos = line.end + 1;
        line
    }))
    .filter_map(move |line| split_statement(buf, line))
}

/// Number of entries `buf` will produce
pub(crate) fn count_statements(buf: &[u8]) -> usize {
    statements(buf).count()
}

/// Parse `buf` into entries in source order
///
/// The buffer is consumed; values are unescaped in place before being
/// copied out.
pub(crate) fn parse_entries(mut buf: Vec<u8>) -> Result<Vec<Entry>> {
    let count = count_statements(&buf);

    let mut entries = Vec::new();
    entries.try_reserve_exact(count)?;

    let mut pos = 0;
    while let Some(line) = next_logical_line(&buf, pos) {
        pos = line.end + 1;
        let Some(stmt) = split_statement(&buf, line) else {
            continue;
        };

        let key = String::from_utf8_lossy(&buf[stmt.key]).into_owned();
        let value = if stmt.value.is_empty() {
            None
        } else {
            let len = unescape_in_place(&mut buf[stmt.value.clone()]);
            let start = stmt.value.start;
            Some(String::from_utf8_lossy(&buf[start..start + len]).into_owned())
        };

        entries.push(Entry::new(key, value));
    }

    debug_assert_eq!(entries.len(), count);
    debug!(entries = entries.len(), bytes = buf.len(), "parsed buffer");
    Ok(entries)
}
