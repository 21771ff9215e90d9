//! Trace table execution engine.
//!
//! Runs a matched program statement by statement and records how its
//! variables change as an ordered table of frames. A failing statement
//! stops the run; the outcome still carries the bindings and the table
//! built up to that statement.
//!
//! ```
//! let outcome = tracetable_eval::run("SET x TO 2\nSEND x * 3 TO DISPLAY");
//! assert!(outcome.is_ok());
//! assert_eq!(outcome.get("Display").map(|v| v.to_string()), Some("6".into()));
//! ```

mod engine;
pub mod env;
pub mod error;
pub mod evaluator;
pub mod navigator;
mod report;
pub mod state;

pub use engine::{Engine, RunOptions, RunOutcome};
pub use env::{Bindings, Environment};
pub use error::{ErrorCategory, EvalResult, ExprError, ExprResult, TraceError};
pub use evaluator::{evaluate, Evaluator, MAX_REPEAT_LEN};
pub use report::{ErrorReport, RunReport};
pub use state::{TraceFrame, TraceState, TraceTable};

use tracetable_parser::parse_program;
use tracetable_types::ast::Program;

/// Match and run newline-delimited program text with no step limit.
pub fn run(source: &str) -> RunOutcome {
    run_with_options(source, RunOptions::default())
}

pub fn run_with_options(source: &str, options: RunOptions) -> RunOutcome {
    run_program(&parse_program(source), options)
}

/// Run an already matched program, e.g. one built by
/// [`tracetable_parser::read_program`].
pub fn run_program(program: &Program, options: RunOptions) -> RunOutcome {
    Engine::new(program, options).run()
}
