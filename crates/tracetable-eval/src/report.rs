//! Flat, renderable view of a [`RunOutcome`] for hosts that speak JSON.
//!
//! ```json
//! {
//!   "success": false,
//!   "error": { "category": "expression", "line": 2, "message": "line 2: name 'z' is not defined" },
//!   "columns": ["x", "Display"],
//!   "rows": [[1.0, "1"]],
//!   "bindings": { "x": 1.0, "Display": "1" },
//!   "steps": 2
//! }
//! ```

use crate::engine::RunOutcome;
use serde::Serialize;
use std::collections::BTreeMap;
use tracetable_types::{ErrorCategory, TraceError, Value};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    pub category: ErrorCategory,
    pub line: Option<u32>,
    pub message: String,
}

impl From<&TraceError> for ErrorReport {
    fn from(err: &TraceError) -> Self {
        Self {
            category: err.category(),
            line: err.line(),
            message: err.to_string(),
        }
    }
}

/// Rows are laid out against `columns`; `null` marks a missing value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport<'a> {
    pub success: bool,
    pub error: Option<ErrorReport>,
    pub columns: &'a [String],
    pub rows: Vec<Vec<Option<&'a Value>>>,
    pub bindings: &'a BTreeMap<String, Value>,
    pub steps: u64,
}

impl RunOutcome {
    pub fn report(&self) -> RunReport<'_> {
        RunReport {
            success: self.error.is_none(),
            error: self.error.as_ref().map(ErrorReport::from),
            columns: self.table.columns(),
            rows: self.table.rows(),
            bindings: &self.bindings,
            steps: self.steps,
        }
    }
}
