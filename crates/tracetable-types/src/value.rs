use serde::{Deserialize, Serialize};
use std::fmt;

/// A dynamically tagged runtime value.
///
/// Variables may hold a different tag after every write; only the
/// evaluator produces values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Number(f64),
    String(String),
    Seq(Vec<Value>),
}

impl Value {
    /// Human-readable tag name, used in type mismatch messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Seq(_) => "sequence",
        }
    }

    /// Truthiness used by conditions and the logical operators.
    ///
    /// `False`, zero, the empty string and the empty sequence are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Seq(items) => !items.is_empty(),
        }
    }

    /// Number of elements for sequences and characters for strings.
    pub fn length(&self) -> Option<usize> {
        match self {
            Value::Seq(items) => Some(items.len()),
            Value::String(s) => Some(s.chars().count()),
            _ => None,
        }
    }

    /// Element at `index` for sequences and strings; `None` when out of range
    /// or when the value cannot be indexed.
    pub fn element(&self, index: usize) -> Option<Value> {
        match self {
            Value::Seq(items) => items.get(index).cloned(),
            Value::String(s) => s.chars().nth(index).map(|c| Value::String(c.to_string())),
            _ => None,
        }
    }

    /// Form used when a value is nested inside a sequence: strings are quoted.
    fn write_nested(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "'{s}'"),
            other => write!(f, "{other}"),
        }
    }
}

/// The display string form: what `SEND ... TO DISPLAY` records.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            Value::String(s) => write!(f, "{s}"),
            Value::Seq(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    item.write_nested(f)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}
