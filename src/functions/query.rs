//! Runs an inner query and returns its rows as a list value.

use super::{Function, FunctionRegistry};
use crate::arguments::{ArgSpec, CallArgs, TypeHint};
use crate::context::Context;
use crate::execution::eval_select_arc;
use crate::parsing::ast::Expression;
use crate::scope::Scope;
use crate::types::Value;
use std::sync::Arc;

pub struct QueryFunction;

const ARGS: &[ArgSpec] = &[ArgSpec::required("vql", TypeHint::Query)];

impl Function for QueryFunction {
    fn name(&self) -> &str {
        "query"
    }

    fn doc(&self) -> &str {
        "Evaluate a subquery and return its rows as a list."
    }

    fn args(&self) -> &[ArgSpec] {
        ARGS
    }

    fn call(&self, ctx: &Context, scope: &Scope, args: &CallArgs) -> Value {
        // A literal subquery evaluates against the calling scope, so it
        // sees the current row's columns.
        if let Some(Expression::Subquery(query)) = args.expression("vql") {
            let stmt = Arc::new(query.as_ref().clone());
            return Value::List(
                eval_select_arc(stmt, ctx, scope).map(Value::Dict).collect(),
            );
        }
        // Otherwise the argument may reduce to a stored query's rows.
        match args.reduce("vql", ctx).unwrap_or(Value::Null) {
            list @ Value::List(_) => list,
            _ => {
                scope.log("query: vql must be a subquery");
                Value::Null
            }
        }
    }
}

pub(super) fn register(registry: &mut FunctionRegistry) {
    registry.register(Arc::new(QueryFunction));
}
