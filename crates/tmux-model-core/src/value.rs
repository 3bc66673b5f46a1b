//! Attribute and option values.

use serde::{Deserialize, Serialize};

/// A value reported by tmux, either an attribute of an entity or an option.
///
/// tmux prints everything as text. Values that read as base-10 integers are
/// coerced to [`Value::Int`] so callers can compare `history-limit` against
/// `20` rather than `"20"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Integer value
    Int(i64),
    /// Any other value, verbatim
    Str(String),
}

impl Value {
    /// Coerce raw tmux output into a value.
    pub fn coerce(raw: &str) -> Self {
        match parse_int(raw) {
            Some(n) => Value::Int(n),
            None => Value::Str(raw.to_string()),
        }
    }

    /// Integer content, if this is an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Str(_) => None,
        }
    }

    /// String content, if this is not an integer.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            Value::Int(_) => None,
        }
    }

    /// Interpret a tmux flag (`1`/`0`, `on`/`off`).
    pub fn as_flag(&self) -> bool {
        match self {
            Value::Int(n) => *n != 0,
            Value::Str(s) => matches!(s.as_str(), "on" | "yes" | "true"),
        }
    }

    /// Render the value the way it is passed back to tmux.
    pub fn to_arg(&self) -> String {
        self.to_string()
    }
}

// Leading '+' or zero-padded strings are rejected so the value round-trips to
// the same text tmux printed.
fn parse_int(raw: &str) -> Option<i64> {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.starts_with('0') && (digits.len() > 1 || digits.len() != raw.len()) {
        return None;
    }
    raw.parse().ok()
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(n.into())
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Value::Str(if flag { "on" } else { "off" }.to_string())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl PartialEq<i64> for Value {
    fn eq(&self, other: &i64) -> bool {
        self.as_int() == Some(*other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}
