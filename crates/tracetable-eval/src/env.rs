//! Variable binding contexts the evaluator reads through.

use std::collections::BTreeMap;
use tracetable_types::{ExprError, Value};

/// Read access to variables for the evaluator.
///
/// Reads take `&mut self` because a read is also an observation: the trace
/// state records which variables each step looked at.
pub trait Bindings {
    /// Current value of `name`, or [`ExprError::UnboundVariable`].
    fn read(&mut self, name: &str) -> Result<Value, ExprError>;
}

/// Plain name → value map without trace bookkeeping.
///
/// Useful for evaluating a standalone expression.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    bindings: BTreeMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind or rebind a variable.
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }
}

impl Bindings for Environment {
    fn read(&mut self, name: &str) -> Result<Value, ExprError> {
        self.bindings
            .get(name)
            .cloned()
            .ok_or_else(|| ExprError::UnboundVariable(name.to_string()))
    }
}

impl FromIterator<(String, Value)> for Environment {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
        }
    }
}
