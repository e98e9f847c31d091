//! Expression reduction.
//!
//! Reduction is total: every operator has a neutral result for operand
//! kinds it cannot handle, so an expression always produces a value.
//! Function panics are caught at the call site, logged, and become Null.

use crate::arguments::{CallArgs, check_args};
use crate::context::Context;
use crate::functions::Function;
use crate::parsing::ast::{BinaryOp, Expression, FunctionCall, Literal};
use crate::scope::{Binding, Scope};
use crate::types::Value;
use crate::types::coercion::{is_int_like, to_float, to_int64};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

/// Reduces an expression to a concrete value against a scope.
pub fn reduce(expr: &Expression, ctx: &Context, scope: &Scope) -> Value {
    match expr {
        Expression::Literal(literal) => literal_value(literal),

        Expression::Symbol(name) => match scope.resolve(name) {
            Some(Binding::Value(value)) => value,
            Some(Binding::Lazy(lazy)) => lazy.reduce(ctx),
            // A stored query in scalar position exposes its rows as a
            // list, evaluated against the current scope.
            Some(Binding::Stored(stored)) => stored.materialize(ctx, scope),
            None => {
                scope.trace(&format!("symbol {} not found", name));
                Value::Null
            }
        },

        Expression::Call(call) => call_function(call, ctx, scope),

        Expression::Subquery(query) => {
            let stmt = Arc::new(query.as_ref().clone());
            Value::List(
                super::select::eval_select_arc(stmt, ctx, scope)
                    .map(Value::Dict)
                    .collect(),
            )
        }

        Expression::List(items) => {
            let values: Vec<Value> = items.iter().map(|item| reduce(item, ctx, scope)).collect();
            Value::List(promote_numeric(values))
        }

        Expression::Not(operand) => {
            let value = reduce(operand, ctx, scope);
            Value::Bool(!scope.is_true(&value))
        }

        Expression::Negate(operand) => {
            let value = reduce(operand, ctx, scope);
            if is_int_like(&value) {
                return Value::Int(to_int64(&value).unwrap_or(0).wrapping_neg());
            }
            match to_float(&value) {
                Some(v) => Value::Float(-v),
                None => {
                    scope.trace(&format!("cannot negate {}", value.kind()));
                    Value::Null
                }
            }
        }

        Expression::Binary(op, lhs, rhs) => reduce_binary(*op, lhs, rhs, ctx, scope),

        Expression::Member(base, field) => {
            let base = reduce(base, ctx, scope);
            let (value, _present) = scope.associative(&base, &Value::String(field.clone()));
            value
        }

        Expression::Index(base, index) => {
            let base = reduce(base, ctx, scope);
            let index = reduce(index, ctx, scope);
            let (value, _present) = scope.associative(&base, &index);
            value
        }
    }
}

fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::Null => Value::Null,
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Int(i) => Value::Int(*i),
        Literal::Float(v) => Value::Float(*v),
        Literal::String(s) => Value::String(s.clone()),
    }
}

fn reduce_binary(
    op: BinaryOp,
    lhs: &Expression,
    rhs: &Expression,
    ctx: &Context,
    scope: &Scope,
) -> Value {
    // AND and OR short-circuit; the right side stays unevaluated when the
    // left side decides the outcome.
    match op {
        BinaryOp::And => {
            let l = reduce(lhs, ctx, scope);
            if !scope.is_true(&l) {
                return Value::Bool(false);
            }
            let r = reduce(rhs, ctx, scope);
            return Value::Bool(scope.is_true(&r));
        }
        BinaryOp::Or => {
            let l = reduce(lhs, ctx, scope);
            if scope.is_true(&l) {
                return Value::Bool(true);
            }
            let r = reduce(rhs, ctx, scope);
            return Value::Bool(scope.is_true(&r));
        }
        _ => {}
    }

    let l = reduce(lhs, ctx, scope);
    let r = reduce(rhs, ctx, scope);
    match op {
        BinaryOp::Add => scope.add(&l, &r),
        BinaryOp::Subtract => scope.sub(&l, &r),
        BinaryOp::Multiply => scope.mul(&l, &r),
        BinaryOp::Divide => scope.div(&l, &r),
        BinaryOp::Equal => Value::Bool(scope.eq(&l, &r)),
        BinaryOp::NotEqual => Value::Bool(!scope.eq(&l, &r)),
        BinaryOp::LessThan => Value::Bool(scope.lt(&l, &r)),
        BinaryOp::LessThanOrEqual => Value::Bool(scope.lt(&l, &r) || scope.eq(&l, &r)),
        BinaryOp::GreaterThan => Value::Bool(scope.lt(&r, &l)),
        BinaryOp::GreaterThanOrEqual => Value::Bool(scope.lt(&r, &l) || scope.eq(&l, &r)),
        BinaryOp::In => Value::Bool(scope.contains(&l, &r)),
        // The pattern is the right operand: `target =~ pattern`.
        BinaryOp::Regex => Value::Bool(scope.matches(&r, &l)),
        BinaryOp::And | BinaryOp::Or => unreachable!("handled above"),
    }
}

/// A list literal of integer literals stays integer; a single float
/// element promotes the whole container to floats.
fn promote_numeric(mut values: Vec<Value>) -> Vec<Value> {
    let any_float = values.iter().any(|v| matches!(v, Value::Float(_)));
    let all_numeric = values
        .iter()
        .all(|v| matches!(v, Value::Int(_) | Value::Float(_)));
    if any_float && all_numeric {
        for value in &mut values {
            if let Value::Int(i) = value {
                *value = Value::Float(*i as f64);
            }
        }
    }
    values
}

fn call_function(call: &FunctionCall, ctx: &Context, scope: &Scope) -> Value {
    let Some(function) = scope.get_function(&call.name) else {
        scope.log(&format!("no such function: {}", call.name));
        return Value::Null;
    };
    let args = CallArgs::from_args(&call.args, scope);
    invoke(function.as_ref(), &call.name, ctx, scope, &args)
}

/// Invokes a function with schema checking and panic containment. A
/// failed schema check or a panic neutralizes the call to Null.
pub(crate) fn invoke(
    function: &dyn Function,
    name: &str,
    ctx: &Context,
    scope: &Scope,
    args: &CallArgs,
) -> Value {
    if !check_args(scope, name, function.args(), args) {
        return Value::Null;
    }
    match catch_unwind(AssertUnwindSafe(|| function.call(ctx, scope, args))) {
        Ok(value) => value,
        Err(_) => {
            scope.log(&format!("function {} panicked, returning NULL", name));
            Value::Null
        }
    }
}
