//! Expression evaluator.
//!
//! The only thing an expression can reach outside itself is variable
//! lookup through [`Bindings`]; there are no calls, attributes or host
//! functions in the grammar, so there is nothing else to sandbox.

use std::cmp::Ordering;

use crate::env::Bindings;
use crate::error::ExprResult;
use tracetable_parser::parse_expression;
use tracetable_types::ast::*;
use tracetable_types::{ExprError, Value};

/// Largest string (in bytes) or sequence that `*` may build.
pub const MAX_REPEAT_LEN: usize = 1 << 20;

/// Parse and evaluate a captured expression string.
pub fn evaluate<B: Bindings + ?Sized>(expression: &str, bindings: &mut B) -> ExprResult<Value> {
    let expr = parse_expression(expression)?;
    Evaluator::new(bindings).eval_expr(&expr)
}

/// Walks expression nodes and produces values, reading variables through
/// a [`Bindings`] context.
pub struct Evaluator<'b, B: Bindings + ?Sized> {
    bindings: &'b mut B,
}

impl<'b, B: Bindings + ?Sized> Evaluator<'b, B> {
    pub fn new(bindings: &'b mut B) -> Self {
        Self { bindings }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expression evaluation
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate an expression to a Value.
    pub fn eval_expr(&mut self, expr: &Expr) -> ExprResult<Value> {
        match &expr.kind {
            ExprKind::NumberLit(n) => Ok(Value::Number(*n)),
            ExprKind::StringLit(s) => Ok(Value::String(s.clone())),
            ExprKind::BoolLit(b) => Ok(Value::Bool(*b)),
            ExprKind::SeqLit(elems) => {
                let mut values = Vec::with_capacity(elems.len());
                for elem in elems {
                    values.push(self.eval_expr(elem)?);
                }
                Ok(Value::Seq(values))
            }
            ExprKind::Identifier(name) => self.bindings.read(name),
            ExprKind::Index { target, index } => {
                let target = self.eval_expr(target)?;
                let index = self.eval_expr(index)?;
                index_value(&target, &index)
            }
            ExprKind::Unary { op, operand } => self.eval_unary(*op, operand),
            ExprKind::Binary { left, op, right } => self.eval_binary(left, *op, right),
            ExprKind::Compare { first, rest } => self.eval_compare(first, rest),
            ExprKind::Paren(inner) => self.eval_expr(inner),
        }
    }

    // ── Operators ────────────────────────────────────────────────────────

    fn eval_unary(&mut self, op: UnaryOp, operand: &Expr) -> ExprResult<Value> {
        let val = self.eval_expr(operand)?;
        match (op, &val) {
            (UnaryOp::Not, _) => Ok(Value::Bool(!val.is_truthy())),
            (UnaryOp::Neg, Value::Number(n)) => Ok(Value::Number(-n)),
            (UnaryOp::Plus, Value::Number(n)) => Ok(Value::Number(*n)),
            (UnaryOp::Neg | UnaryOp::Plus, _) => Err(ExprError::TypeMismatch(format!(
                "bad operand type for unary {}: {}",
                if op == UnaryOp::Neg { "-" } else { "+" },
                val.type_name()
            ))),
        }
    }

    fn eval_binary(&mut self, left: &Expr, op: BinOp, right: &Expr) -> ExprResult<Value> {
        // `and` / `or` short-circuit and yield the deciding operand, so the
        // right side is neither evaluated nor read when it is not needed.
        match op {
            BinOp::And => {
                let lv = self.eval_expr(left)?;
                return if lv.is_truthy() { self.eval_expr(right) } else { Ok(lv) };
            }
            BinOp::Or => {
                let lv = self.eval_expr(left)?;
                return if lv.is_truthy() { Ok(lv) } else { self.eval_expr(right) };
            }
            _ => {}
        }

        let lv = self.eval_expr(left)?;
        let rv = self.eval_expr(right)?;
        match op {
            BinOp::Add => eval_add(lv, rv),
            BinOp::Sub => eval_arith(&lv, &rv, op, |a, b| Ok(a - b)),
            BinOp::Mul => eval_mul(lv, rv),
            BinOp::Div => eval_arith(&lv, &rv, op, |a, b| {
                if b == 0.0 {
                    Err(ExprError::DivisionByZero)
                } else {
                    Ok(a / b)
                }
            }),
            BinOp::FloorDiv => eval_arith(&lv, &rv, op, |a, b| {
                if b == 0.0 {
                    Err(ExprError::DivisionByZero)
                } else {
                    Ok((a / b).floor())
                }
            }),
            BinOp::Mod => eval_arith(&lv, &rv, op, |a, b| {
                if b == 0.0 {
                    Err(ExprError::DivisionByZero)
                } else {
                    Ok(a - b * (a / b).floor())
                }
            }),
            BinOp::Pow => eval_arith(&lv, &rv, op, |a, b| {
                if a == 0.0 && b < 0.0 {
                    Err(ExprError::DivisionByZero)
                } else if a < 0.0 && b.fract() != 0.0 {
                    Err(ExprError::TypeMismatch(
                        "negative number cannot be raised to a fractional power".into(),
                    ))
                } else {
                    Ok(a.powf(b))
                }
            }),
            BinOp::And | BinOp::Or => unreachable!("handled above"),
        }
    }

    /// `a < b <= c` evaluates each operand at most once and stops at the
    /// first false link.
    fn eval_compare(&mut self, first: &Expr, rest: &[(CmpOp, Expr)]) -> ExprResult<Value> {
        let mut left = self.eval_expr(first)?;
        for (op, operand) in rest {
            let right = self.eval_expr(operand)?;
            if !compare(&left, *op, &right)? {
                return Ok(Value::Bool(false));
            }
            left = right;
        }
        Ok(Value::Bool(true))
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Operator helpers
// ══════════════════════════════════════════════════════════════════════════

fn mismatch(op: &str, lv: &Value, rv: &Value) -> ExprError {
    ExprError::TypeMismatch(format!(
        "unsupported operand types for {op}: {} and {}",
        lv.type_name(),
        rv.type_name()
    ))
}

fn eval_arith(
    lv: &Value,
    rv: &Value,
    op: BinOp,
    f: impl FnOnce(f64, f64) -> ExprResult<f64>,
) -> ExprResult<Value> {
    match (lv, rv) {
        (Value::Number(a), Value::Number(b)) => f(*a, *b).map(Value::Number),
        _ => Err(mismatch(op.symbol(), lv, rv)),
    }
}

fn eval_add(lv: Value, rv: Value) -> ExprResult<Value> {
    match (lv, rv) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
        (Value::String(a), Value::String(b)) => Ok(Value::String(a + &b)),
        (Value::Seq(mut a), Value::Seq(b)) => {
            a.extend(b);
            Ok(Value::Seq(a))
        }
        (lv, rv) => Err(mismatch("+", &lv, &rv)),
    }
}

/// Numbers multiply; a string or sequence times a whole number repeats.
fn eval_mul(lv: Value, rv: Value) -> ExprResult<Value> {
    match (lv, rv) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a * b)),
        (Value::String(s), Value::Number(n)) | (Value::Number(n), Value::String(s)) => {
            let count = repeat_count(n)?;
            if repeated_len(s.len(), count)? == 0 {
                return Ok(Value::String(String::new()));
            }
            Ok(Value::String(s.repeat(count)))
        }
        (Value::Seq(items), Value::Number(n)) | (Value::Number(n), Value::Seq(items)) => {
            let total = repeated_len(items.len(), repeat_count(n)?)?;
            Ok(Value::Seq(items.iter().cloned().cycle().take(total).collect()))
        }
        (lv, rv) => Err(mismatch("*", &lv, &rv)),
    }
}

/// Negative counts repeat zero times; counts past `usize::MAX` saturate.
fn repeat_count(n: f64) -> ExprResult<usize> {
    if n.fract() != 0.0 || !n.is_finite() {
        return Err(ExprError::TypeMismatch(format!(
            "can only repeat by a whole number, not {n}"
        )));
    }
    Ok(if n < 0.0 { 0 } else { n as usize })
}

fn repeated_len(len: usize, count: usize) -> ExprResult<usize> {
    match len.checked_mul(count) {
        Some(total) if total <= MAX_REPEAT_LEN => Ok(total),
        _ => Err(ExprError::TooLarge {
            limit: MAX_REPEAT_LEN,
        }),
    }
}

fn compare(lv: &Value, op: CmpOp, rv: &Value) -> ExprResult<bool> {
    match op {
        CmpOp::Eq => return Ok(lv == rv),
        CmpOp::NotEq => return Ok(lv != rv),
        _ => {}
    }
    let ordering = order(lv, rv).ok_or_else(|| {
        ExprError::TypeMismatch(format!(
            "'{}' not supported between {} and {}",
            op.symbol(),
            lv.type_name(),
            rv.type_name()
        ))
    })?;
    Ok(match op {
        CmpOp::Less => ordering == Ordering::Less,
        CmpOp::LessEq => ordering != Ordering::Greater,
        CmpOp::Greater => ordering == Ordering::Greater,
        CmpOp::GreaterEq => ordering != Ordering::Less,
        CmpOp::Eq | CmpOp::NotEq => unreachable!("handled above"),
    })
}

/// Ordering between two values of the same tag; sequences compare
/// element by element.
fn order(lv: &Value, rv: &Value) -> Option<Ordering> {
    match (lv, rv) {
        (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Seq(a), Value::Seq(b)) => {
            for (x, y) in a.iter().zip(b.iter()) {
                if x != y {
                    return order(x, y);
                }
            }
            Some(a.len().cmp(&b.len()))
        }
        _ => None,
    }
}

/// `target[index]` with whole-number indices; negative indices count from
/// the end.
fn index_value(target: &Value, index: &Value) -> ExprResult<Value> {
    let length = target.length().ok_or_else(|| {
        ExprError::TypeMismatch(format!("{} is not indexable", target.type_name()))
    })?;
    let n = match index {
        Value::Number(n) if n.fract() == 0.0 && n.is_finite() => *n as i64,
        other => {
            return Err(ExprError::TypeMismatch(format!(
                "indices must be whole numbers, not {}",
                match other {
                    Value::Number(n) => n.to_string(),
                    v => v.type_name().to_string(),
                }
            )))
        }
    };
    let resolved = if n < 0 { n + length as i64 } else { n };
    usize::try_from(resolved)
        .ok()
        .and_then(|i| target.element(i))
        .ok_or(ExprError::IndexOutOfRange { index: n, length })
}
