//! Lazy expressions.
//!
//! A lazy expression is a deferred thunk carrying an unevaluated AST
//! subtree plus the scope at creation. Forcing reduces it to a concrete
//! value; the thunk memoizes the result and returns the same value on
//! every later force. Scalar arguments to functions and the select-list
//! entries of a row envelope are all lazy expressions.

use crate::context::Context;
use crate::parsing::ast::Expression;
use crate::scope::Scope;
use crate::types::Value;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

#[derive(Clone)]
pub struct LazyExpr {
    inner: Arc<Inner>,
}

enum Inner {
    /// An already-concrete value, used when a caller passes data rather
    /// than an expression.
    Value(Value),
    Thunk {
        expr: Arc<Expression>,
        scope: Scope,
        state: Mutex<ThunkState>,
    },
}

enum ThunkState {
    Pending,
    /// Currently being reduced; hitting this state again means the
    /// expression refers to itself.
    Forcing,
    Done(Value),
}

impl LazyExpr {
    pub fn new(expr: Arc<Expression>, scope: &Scope) -> Self {
        Self {
            inner: Arc::new(Inner::Thunk {
                expr,
                scope: scope.clone(),
                state: Mutex::new(ThunkState::Pending),
            }),
        }
    }

    /// Wraps a concrete value; forcing returns it unchanged.
    pub fn from_value(value: Value) -> Self {
        Self {
            inner: Arc::new(Inner::Value(value)),
        }
    }

    /// The unevaluated AST, when this is a thunk. Callees such as
    /// `foreach` inspect this to find subquery arguments without forcing
    /// them.
    pub fn expression(&self) -> Option<&Expression> {
        match self.inner.as_ref() {
            Inner::Thunk { expr, .. } => Some(expr),
            Inner::Value(_) => None,
        }
    }

    /// Forces the thunk. The first call reduces the expression against the
    /// captured scope; later calls return the memoized value.
    pub fn reduce(&self, ctx: &Context) -> Value {
        match self.inner.as_ref() {
            Inner::Value(value) => value.clone(),
            Inner::Thunk { expr, scope, state } => {
                {
                    let mut guard = state.lock();
                    match &*guard {
                        ThunkState::Done(value) => return value.clone(),
                        ThunkState::Forcing => {
                            scope.trace(&format!("cyclic lazy expression: {}", expr));
                            return Value::Null;
                        }
                        ThunkState::Pending => *guard = ThunkState::Forcing,
                    }
                }
                let value = super::expression::reduce(expr, ctx, scope);
                *state.lock() = ThunkState::Done(value.clone());
                value
            }
        }
    }
}

impl fmt::Debug for LazyExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.as_ref() {
            Inner::Value(value) => write!(f, "LazyExpr({:?})", value),
            Inner::Thunk { expr, .. } => write!(f, "LazyExpr({})", expr),
        }
    }
}
