//! Expression grammar tests: precedence, associativity, chained
//! comparisons, indexing, literals and syntax errors.

use tracetable_parser::{parse_expression, MAX_EXPR_DEPTH, MAX_EXPR_HEIGHT};
use tracetable_types::ast::{BinOp, CmpOp, Expr, ExprKind, UnaryOp};
use tracetable_types::ExprError;

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

fn parse(source: &str) -> Expr {
    parse_expression(source).unwrap_or_else(|e| panic!("parse of '{source}' failed: {e}"))
}

fn parse_err(source: &str) -> ExprError {
    match parse_expression(source) {
        Ok(expr) => panic!("expected '{source}' to fail, got {expr:?}"),
        Err(e) => e,
    }
}

/// Render an expression fully parenthesised, to check tree shape.
fn shape(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::NumberLit(n) => format!("{n}"),
        ExprKind::StringLit(s) => format!("'{s}'"),
        ExprKind::BoolLit(b) => format!("{b}"),
        ExprKind::Identifier(name) => name.clone(),
        ExprKind::SeqLit(items) => {
            let parts: Vec<String> = items.iter().map(shape).collect();
            format!("[{}]", parts.join(", "))
        }
        ExprKind::Index { target, index } => format!("{}[{}]", shape(target), shape(index)),
        ExprKind::Unary { op, operand } => {
            let op = match op {
                UnaryOp::Neg => "-",
                UnaryOp::Plus => "+",
                UnaryOp::Not => "not ",
            };
            format!("({op}{})", shape(operand))
        }
        ExprKind::Binary { left, op, right } => {
            format!("({} {} {})", shape(left), op.symbol(), shape(right))
        }
        ExprKind::Compare { first, rest } => {
            let mut out = format!("({}", shape(first));
            for (op, operand) in rest {
                out.push_str(&format!(" {} {}", op.symbol(), shape(operand)));
            }
            out.push(')');
            out
        }
        ExprKind::Paren(inner) => shape(inner),
    }
}

fn shape_of(source: &str) -> String {
    shape(&parse(source))
}

// ══════════════════════════════════════════════════════════════════════════════
// Precedence
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    assert_eq!(shape_of("1 + 2 * 3"), "(1 + (2 * 3))");
}

#[test]
fn test_parentheses_override_precedence() {
    assert_eq!(shape_of("(1 + 2) * 3"), "((1 + 2) * 3)");
}

#[test]
fn test_left_associative_subtraction() {
    assert_eq!(shape_of("10 - 4 - 3"), "((10 - 4) - 3)");
}

#[test]
fn test_power_is_right_associative() {
    assert_eq!(shape_of("2 ^ 3 ^ 2"), "(2 ** (3 ** 2))");
}

#[test]
fn test_unary_minus_is_looser_than_power() {
    assert_eq!(shape_of("-2 ** 2"), "(-(2 ** 2))");
    assert_eq!(shape_of("2 ** -1"), "(2 ** (-1))");
}

#[test]
fn test_logical_precedence() {
    assert_eq!(
        shape_of("a or b and not c"),
        "(a or (b and (not c)))"
    );
}

#[test]
fn test_not_is_looser_than_comparison() {
    assert_eq!(shape_of("not x = 1"), "(not (x == 1))");
}

#[test]
fn test_floor_div_and_modulo() {
    assert_eq!(shape_of("7 // 2 % 3"), "((7 // 2) % 3)");
}

// ══════════════════════════════════════════════════════════════════════════════
// Comparisons
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_single_equals_is_comparison() {
    match parse("x = 3").kind {
        ExprKind::Compare { rest, .. } => {
            assert_eq!(rest.len(), 1);
            assert_eq!(rest[0].0, CmpOp::Eq);
        }
        other => panic!("expected comparison, got {other:?}"),
    }
}

#[test]
fn test_chained_comparison() {
    assert_eq!(shape_of("0 <= i < n"), "(0 <= i < n)");
}

#[test]
fn test_comparison_operands_are_arithmetic() {
    assert_eq!(shape_of("x + 1 >= y * 2"), "((x + 1) >= (y * 2))");
}

#[test]
fn test_double_equals_is_a_syntax_error() {
    assert!(matches!(parse_err("x == 1"), ExprError::Syntax { .. }));
}

// ══════════════════════════════════════════════════════════════════════════════
// Literals and postfix
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_sequence_literal_and_indexing() {
    assert_eq!(shape_of("[1, 2, 3][0]"), "[1, 2, 3][0]");
    assert_eq!(shape_of("grid[i][j + 1]"), "grid[i][(j + 1)]");
}

#[test]
fn test_trailing_comma_in_sequence() {
    assert_eq!(shape_of("[1, 2,]"), "[1, 2]");
    assert_eq!(shape_of("[]"), "[]");
}

#[test]
fn test_string_and_bool_literals() {
    assert_eq!(shape_of("'a' + \"b\""), "('a' + 'b')");
    assert_eq!(shape_of("TRUE and False"), "(true and false)");
}

#[test]
fn test_binop_symbols_round_trip_in_shape() {
    let expr = parse("a * b");
    match expr.kind {
        ExprKind::Binary { op, .. } => assert_eq!(op, BinOp::Mul),
        other => panic!("expected binary, got {other:?}"),
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Errors
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_empty_expression() {
    assert!(matches!(parse_err(""), ExprError::Syntax { .. }));
    assert!(matches!(parse_err("   "), ExprError::Syntax { .. }));
}

#[test]
fn test_unclosed_parenthesis() {
    match parse_err("(1 + 2") {
        ExprError::Syntax { message, .. } => assert!(message.contains("expected ')'"), "{message}"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_trailing_tokens() {
    match parse_err("1 2") {
        ExprError::Syntax { message, span } => {
            assert!(message.contains("after expression"), "{message}");
            assert_eq!(span.start_col, 3);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_dangling_operator() {
    assert!(matches!(parse_err("1 +"), ExprError::Syntax { .. }));
}

#[test]
fn test_nesting_limit() {
    let deep = format!("{}1{}", "(".repeat(MAX_EXPR_DEPTH as usize + 1), ")".repeat(MAX_EXPR_DEPTH as usize + 1));
    match parse_err(&deep) {
        ExprError::Syntax { message, .. } => assert!(message.contains("nested"), "{message}"),
        other => panic!("unexpected {other:?}"),
    }
    let ok = format!("{}1{}", "(".repeat(10), ")".repeat(10));
    assert_eq!(shape_of(&ok), "1");
}

fn assert_too_deep(source: &str) {
    match parse_err(source) {
        ExprError::Syntax { message, .. } => assert!(message.contains("deeper"), "{message}"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_power_chain_limit() {
    assert_too_deep(&vec!["1"; 10_000].join(" ** "));
    assert_too_deep(&vec!["2"; MAX_EXPR_DEPTH as usize + 1].join(" ** -"));
    assert!(parse_expression(&vec!["1"; 20].join(" ** ")).is_ok());
}

#[test]
fn test_operator_chain_limit() {
    assert_too_deep(&vec!["1"; 10_000].join(" + "));
    assert_too_deep(&vec!["a"; 10_000].join(" and "));
    assert_too_deep(&format!("xs{}", "[0]".repeat(10_000)));

    // Comparison chains stay one node wide.
    assert_eq!(parse(&vec!["1"; 10_000].join(" < ")).height(), 2);

    let longest = vec!["1"; MAX_EXPR_HEIGHT as usize].join(" + ");
    assert_eq!(parse(&longest).height(), MAX_EXPR_HEIGHT);
    assert_too_deep(&format!("{longest} + 1"));
}
