//! Row iteration: runs a query once per row of a row source.

use super::{Plugin, PluginRegistry};
use crate::arguments::{ArgSpec, CallArgs, TypeHint};
use crate::context::Context;
use crate::execution::{RowStream, eval_select_arc};
use crate::parsing::ast::Expression;
use crate::scope::Scope;
use crate::types::Value;
use std::sync::Arc;

pub struct ForeachPlugin;

const ARGS: &[ArgSpec] = &[
    ArgSpec::required("row", TypeHint::Any),
    ArgSpec::required("query", TypeHint::Query),
];

impl Plugin for ForeachPlugin {
    fn name(&self) -> &str {
        "foreach"
    }

    fn doc(&self) -> &str {
        "Evaluate the query once per row produced by the row source."
    }

    fn args(&self) -> &[ArgSpec] {
        ARGS
    }

    fn call(&self, ctx: &Context, scope: &Scope, args: &CallArgs) -> RowStream {
        let Some(Expression::Subquery(query)) = args.expression("query") else {
            scope.log("foreach: query must be a subquery");
            return Box::new(std::iter::empty());
        };
        let query = Arc::new(query.as_ref().clone());

        // A subquery row source streams; a concrete value is a single
        // dict row or a list of dict rows.
        let source: RowStream = match args.expression("row") {
            Some(Expression::Subquery(row_query)) => {
                eval_select_arc(Arc::new(row_query.as_ref().clone()), ctx, scope)
            }
            _ => match args.reduce("row", ctx).unwrap_or(Value::Null) {
                Value::List(items) => Box::new(items.into_iter().filter_map(|item| match item {
                    Value::Dict(dict) => Some(dict),
                    _ => None,
                })),
                Value::Dict(dict) => Box::new(std::iter::once(dict)),
                Value::Null => Box::new(std::iter::empty()),
                value => {
                    scope.log(&format!("foreach: cannot iterate {}", value.kind()));
                    Box::new(std::iter::empty())
                }
            },
        };

        let ctx = ctx.clone();
        let cancel = ctx.cancellation_token();
        let scope = scope.clone();
        Box::new(
            source
                .take_while(move |_| !cancel.is_cancelled())
                .flat_map(move |row| {
                    // The query sees the row's columns in a fresh top
                    // frame of its evaluation scope.
                    let child = scope.with_vars(row);
                    eval_select_arc(query.clone(), &ctx, &child)
                }),
        )
    }
}

pub(super) fn register(registry: &mut PluginRegistry) {
    registry.register(Arc::new(ForeachPlugin));
}
