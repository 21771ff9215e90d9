//! Expression evaluator tests: arithmetic, comparisons, logic, strings,
//! sequences, error kinds and what each expression reads.

use tracetable_eval::{evaluate, Bindings, Environment, ExprError, MAX_REPEAT_LEN};
use tracetable_types::Value;

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

/// `x = 3`, `name = "ada"`, `xs = [10, 20, 30]`.
fn env() -> Environment {
    let mut env = Environment::new();
    env.define("x", Value::Number(3.0));
    env.define("name", Value::from("ada"));
    env.define(
        "xs",
        Value::Seq(vec![
            Value::Number(10.0),
            Value::Number(20.0),
            Value::Number(30.0),
        ]),
    );
    env
}

fn eval(source: &str) -> Value {
    evaluate(source, &mut env()).unwrap_or_else(|e| panic!("'{source}' failed: {e}"))
}

fn eval_err(source: &str) -> ExprError {
    match evaluate(source, &mut env()) {
        Ok(v) => panic!("expected '{source}' to fail, got {v:?}"),
        Err(e) => e,
    }
}

fn num(n: f64) -> Value {
    Value::Number(n)
}

/// Records every name the evaluator asks for.
struct Recorder {
    env: Environment,
    reads: Vec<String>,
}

impl Bindings for Recorder {
    fn read(&mut self, name: &str) -> Result<Value, ExprError> {
        self.reads.push(name.to_string());
        self.env.read(name)
    }
}

fn reads_of(source: &str) -> Vec<String> {
    let mut recorder = Recorder {
        env: env(),
        reads: Vec::new(),
    };
    // Errors are fine here; only the reads matter.
    let _ = evaluate(source, &mut recorder);
    recorder.reads
}

// ══════════════════════════════════════════════════════════════════════════════
// Arithmetic
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_arithmetic_precedence() {
    assert_eq!(eval("1 + 2 * 3"), num(7.0));
    assert_eq!(eval("(1 + 2) * 3"), num(9.0));
    assert_eq!(eval("x * x - 1"), num(8.0));
}

#[test]
fn test_caret_is_power() {
    assert_eq!(eval("2 ^ 10"), num(1024.0));
    assert_eq!(eval("2 ^ 3 ^ 2"), num(512.0));
    assert_eq!(eval("-2 ^ 2"), num(-4.0));
}

#[test]
fn test_true_division_and_floor_forms() {
    assert_eq!(eval("7 / 2"), num(3.5));
    assert_eq!(eval("7 // 2"), num(3.0));
    assert_eq!(eval("-7 // 2"), num(-4.0));
    assert_eq!(eval("-7 % 3"), num(2.0));
    assert_eq!(eval("7 % -3"), num(-2.0));
}

#[test]
fn test_unary_signs() {
    assert_eq!(eval("-x"), num(-3.0));
    assert_eq!(eval("+x"), num(3.0));
    assert_eq!(eval("2 ** -1"), num(0.5));
}

// ══════════════════════════════════════════════════════════════════════════════
// Comparisons and logic
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_single_equals_compares() {
    assert_eq!(eval("x = 3"), Value::Bool(true));
    assert_eq!(eval("x != 3"), Value::Bool(false));
    assert_eq!(eval("x >= 3"), Value::Bool(true));
    assert_eq!(eval("x <= 2"), Value::Bool(false));
}

#[test]
fn test_chained_comparisons() {
    assert_eq!(eval("1 < x < 5"), Value::Bool(true));
    assert_eq!(eval("1 < x < 3"), Value::Bool(false));
    assert_eq!(eval("3 = x = 3"), Value::Bool(true));
}

#[test]
fn test_equality_is_strict_across_types() {
    assert_eq!(eval("'3' = 3"), Value::Bool(false));
    assert_eq!(eval("1 = True"), Value::Bool(false));
    assert_eq!(eval("[1, 2] = [1, 2]"), Value::Bool(true));
}

#[test]
fn test_ordering_strings_and_sequences() {
    assert_eq!(eval("'apple' < 'banana'"), Value::Bool(true));
    assert_eq!(eval("[1, 2] < [1, 3]"), Value::Bool(true));
    assert_eq!(eval("[1, 2] < [1, 2, 0]"), Value::Bool(true));
}

#[test]
fn test_logical_keywords_any_case() {
    assert_eq!(eval("TRUE AND false"), Value::Bool(false));
    assert_eq!(eval("Not (x = 4)"), Value::Bool(true));
    assert_eq!(eval("x > 1 OR x < 0"), Value::Bool(true));
}

#[test]
fn test_and_or_yield_deciding_operand() {
    assert_eq!(eval("0 or 'fallback'"), Value::from("fallback"));
    assert_eq!(eval("x and 'yes'"), Value::from("yes"));
    assert_eq!(eval("'' and missing"), Value::from(""));
    assert_eq!(eval("not []"), Value::Bool(true));
}

// ══════════════════════════════════════════════════════════════════════════════
// Strings and sequences
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_string_concatenation_and_repeat() {
    assert_eq!(eval("name + '!'"), Value::from("ada!"));
    assert_eq!(eval("'ab' * 3"), Value::from("ababab"));
    assert_eq!(eval("2 * 'ab'"), Value::from("abab"));
}

#[test]
fn test_sequence_operations() {
    assert_eq!(
        eval("[1] + [2, 3]"),
        Value::Seq(vec![num(1.0), num(2.0), num(3.0)])
    );
    assert_eq!(eval("[0] * 3"), Value::Seq(vec![num(0.0); 3]));
    assert_eq!(eval("[1, 'a', True,]").to_string(), "[1, 'a', True]");
}

#[test]
fn test_indexing() {
    assert_eq!(eval("xs[0]"), num(10.0));
    assert_eq!(eval("xs[-1]"), num(30.0));
    assert_eq!(eval("xs[x - 2] + 1"), num(21.0));
    assert_eq!(eval("name[1]"), Value::from("d"));
    assert_eq!(eval("[[1, 2], [3, 4]][1][0]"), num(3.0));
}

// ══════════════════════════════════════════════════════════════════════════════
// Errors
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_unbound_variable() {
    assert_eq!(eval_err("y + 1"), ExprError::UnboundVariable("y".into()));
}

#[test]
fn test_type_mismatches() {
    for source in ["1 + 'a'", "'a' - 'b'", "1 < 'a'", "-name", "x[0]", "xs[1.5]", "'ab' * 1.5"] {
        assert!(
            matches!(eval_err(source), ExprError::TypeMismatch(_)),
            "'{source}' should be a type mismatch"
        );
    }
}

#[test]
fn test_division_by_zero() {
    for source in ["1 / 0", "1 // 0", "5 % 0", "0 ^ -1"] {
        assert_eq!(eval_err(source), ExprError::DivisionByZero, "'{source}'");
    }
}

#[test]
fn test_repeat_size_limit() {
    let too_large = ExprError::TooLarge {
        limit: MAX_REPEAT_LEN,
    };
    for source in [
        "[1, 2] * 10000000000000000000",
        "'ab' * 1e18",
        "1e300 * name",
        "'a' * 1048577",
    ] {
        assert_eq!(eval_err(source), too_large, "'{source}'");
    }
    assert_eq!(eval("[] * 1e19"), Value::Seq(Vec::new()));
    assert_eq!(eval("'' * 1e300"), Value::from(""));
    assert_eq!(eval("'ab' * -1e19"), Value::from(""));
    match eval("'a' * 1048576") {
        Value::String(s) => assert_eq!(s.len(), MAX_REPEAT_LEN),
        other => panic!("expected a string, got {other:?}"),
    }
}

#[test]
fn test_index_out_of_range() {
    assert_eq!(
        eval_err("xs[3]"),
        ExprError::IndexOutOfRange { index: 3, length: 3 }
    );
    assert_eq!(
        eval_err("xs[-4]"),
        ExprError::IndexOutOfRange { index: -4, length: 3 }
    );
}

#[test]
fn test_syntax_errors_surface() {
    assert!(matches!(eval_err("1 +"), ExprError::Syntax { .. }));
    assert!(matches!(eval_err("print(x)"), ExprError::Syntax { .. }));
}

// ══════════════════════════════════════════════════════════════════════════════
// Reads
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_every_identifier_is_read() {
    assert_eq!(reads_of("x + xs[x - 3]"), vec!["x", "xs", "x"]);
}

#[test]
fn test_short_circuit_skips_reads() {
    assert_eq!(reads_of("False and x"), Vec::<String>::new());
    assert_eq!(reads_of("x or name"), vec!["x"]);
    assert_eq!(reads_of("x > 5 > name"), vec!["x"]);
}
