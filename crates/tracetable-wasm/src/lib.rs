//! Trace table interpreter as a WASM module for browser environments.
//!
//! The page that collects a program and draws the table lives in
//! JavaScript; this crate only runs the program and hands back JSON.
//!
//! # Usage (JavaScript)
//!
//! ```js
//! import init, { run } from 'tracetable-wasm';
//!
//! await init();
//!
//! const report = JSON.parse(run("SET x TO 1\nSEND x TO DISPLAY", 10000));
//! // { success: true, error: null, columns: ["x", "Display"], rows: [[1, "1"]], ... }
//! ```

use tracetable_eval::{run_with_options, RunOptions};
use wasm_bindgen::prelude::*;

/// Run a program and return its `RunReport` as a JSON string.
///
/// Browsers cannot interrupt a busy module, so hosts should pass
/// `max_steps`; `undefined` runs without a limit.
///
/// ```json
/// {
///   "success": false,
///   "error": { "category": "expression", "line": 2, "message": "..." },
///   "columns": ["x", "Display"],
///   "rows": [[1, "1"]],
///   "bindings": { "x": 1, "Display": "1" },
///   "steps": 2
/// }
/// ```
#[wasm_bindgen]
pub fn run(source: &str, max_steps: Option<u32>) -> String {
    let options = RunOptions {
        step_limit: max_steps.map(u64::from),
    };
    let outcome = run_with_options(source, options);
    serde_json::to_string(&outcome.report()).unwrap_or_else(|e| {
        format!(
            r#"{{"success":false,"error":{{"category":null,"line":null,"message":"Serialization error: {}"}},"columns":[],"rows":[],"bindings":{{}},"steps":0}}"#,
            e
        )
    })
}

/// Return the interpreter version string.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> serde_json::Value {
        serde_json::from_str(json).expect("run returns valid JSON")
    }

    #[test]
    fn run_returns_report_json() {
        let report = parse(&run("SET x TO 1\nSEND x TO DISPLAY", None));
        assert_eq!(report["success"], true);
        assert_eq!(report["columns"], serde_json::json!(["x", "Display"]));
        assert_eq!(report["bindings"]["Display"], "1");
    }

    #[test]
    fn step_limit_is_reported() {
        let report = parse(&run("WHILE True DO\nEND WHILE", Some(20)));
        assert_eq!(report["success"], false);
        assert_eq!(report["error"]["category"], "limit");
        assert!(report["error"]["line"].is_null());
        assert_eq!(report["steps"], 20);
    }

    #[test]
    fn version_matches_package() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }
}
