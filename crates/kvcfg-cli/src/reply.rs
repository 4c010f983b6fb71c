//! Replies printed by the inspector
//!
//! Rendering follows redis-cli conventions: quoted strings, `(nil)`,
//! `(integer) n` and numbered list items.

use std::fmt;

/// Result of one command
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Plain status line: OK
    Status(String),
    /// Error line, already prefixed with `ERR`
    Error(String),
    /// Signed integer: (integer) 42
    Integer(i64),
    /// Unsigned integer: (integer) 42
    Unsigned(u64),
    /// Float: (float) 0.5
    Float(f64),
    /// Stored string, `None` when not found: "value" / (nil)
    Text(Option<String>),
    /// Numbered items
    List(Vec<Reply>),
    /// Pretty-printed JSON document
    Json(serde_json::Value),
}

impl Reply {
    /// Error reply with the `ERR` prefix
    pub fn error(msg: impl fmt::Display) -> Self {
        Reply::Error(format!("ERR {}", msg))
    }

    /// `OK` status
    pub fn ok() -> Self {
        Reply::Status("OK".to_string())
    }

    /// Text reply from a borrowed lookup result
    pub fn text(value: Option<&str>) -> Self {
        Reply::Text(value.map(str::to_string))
    }

    /// Is this an error reply?
    pub fn is_error(&self) -> bool {
        matches!(self, Reply::Error(_))
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Status(s) => write!(f, "{}", s),
            Reply::Error(e) => write!(f, "{}", e),
            Reply::Integer(i) => write!(f, "(integer) {}", i),
            Reply::Unsigned(u) => write!(f, "(integer) {}", u),
            Reply::Float(x) => write!(f, "(float) {}", x),
            Reply::Text(None) => write!(f, "(nil)"),
            Reply::Text(Some(s)) => write!(f, "\"{}\"", s.escape_debug()),
            Reply::List(items) if items.is_empty() => write!(f, "(empty list)"),
            Reply::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}) {}", i + 1, item)?;
                }
                Ok(())
            }
            Reply::Json(value) => match serde_json::to_string_pretty(value) {
                Ok(s) => write!(f, "{}", s),
                Err(_) => Err(fmt::Error),
            },
        }
    }
}
