//! Call argument handling.
//!
//! Plugins and functions receive named arguments only. Scalar arguments
//! arrive as lazy expressions and are reduced only for the fields the
//! callee actually reads. Callees declare a schema; the engine checks the
//! schema before invoking: a missing required field fails the call (the
//! caller substitutes the neutral result and logs), unknown extra fields
//! are silently ignored. An empty schema accepts arbitrary fields.

use crate::context::Context;
use crate::execution::LazyExpr;
use crate::parsing::ast::Expression;
use crate::scope::Scope;
use crate::types::Value;
use indexmap::IndexMap;

/// A hint describing the value a callee expects for a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeHint {
    Any,
    Bool,
    Int,
    Float,
    String,
    List,
    Dict,
    /// A `{ SELECT ... }` subquery or a stored query reference.
    Query,
}

/// One field of a callee's argument schema.
#[derive(Clone, Copy, Debug)]
pub struct ArgSpec {
    pub name: &'static str,
    pub required: bool,
    pub hint: TypeHint,
}

impl ArgSpec {
    pub const fn required(name: &'static str, hint: TypeHint) -> Self {
        Self {
            name,
            required: true,
            hint,
        }
    }

    pub const fn optional(name: &'static str, hint: TypeHint) -> Self {
        Self {
            name,
            required: false,
            hint,
        }
    }
}

/// The named arguments of a single call, each deferred as a lazy
/// expression.
#[derive(Clone, Debug, Default)]
pub struct CallArgs {
    entries: IndexMap<String, LazyExpr>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Defers each AST argument as a lazy expression bound to the calling
    /// scope.
    pub fn from_args(args: &[crate::parsing::ast::Arg], scope: &Scope) -> Self {
        let mut call_args = Self::new();
        for arg in args {
            call_args.insert(
                arg.name.clone(),
                LazyExpr::new(std::sync::Arc::new(arg.value.clone()), scope),
            );
        }
        call_args
    }

    pub fn insert(&mut self, name: impl Into<String>, value: LazyExpr) {
        self.entries.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&LazyExpr> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Forces the named argument. `None` means the argument was not given.
    pub fn reduce(&self, name: &str, ctx: &Context) -> Option<Value> {
        self.entries.get(name).map(|lazy| lazy.reduce(ctx))
    }

    /// The unevaluated AST of the named argument, when it has one.
    pub fn expression(&self, name: &str) -> Option<&Expression> {
        self.entries.get(name).and_then(|lazy| lazy.expression())
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &LazyExpr)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Checks the given arguments against a callee's schema. Returns false,
/// after logging, when a required field is missing. Extra fields beyond a
/// non-empty schema are ignored.
pub fn check_args(scope: &Scope, callee: &str, specs: &[ArgSpec], args: &CallArgs) -> bool {
    for spec in specs {
        if spec.required && !args.contains(spec.name) {
            scope.log(&format!(
                "{}: missing required argument '{}'",
                callee, spec.name
            ));
            return false;
        }
    }
    true
}
