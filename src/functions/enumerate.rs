//! The enumerate aggregate: collects its items into a list.

use super::{Function, FunctionRegistry};
use crate::arguments::{ArgSpec, CallArgs, TypeHint};
use crate::context::Context;
use crate::scope::Scope;
use crate::types::Value;
use std::sync::Arc;

pub struct EnumerateFunction;

const ARGS: &[ArgSpec] = &[ArgSpec::required("items", TypeHint::Any)];

impl Function for EnumerateFunction {
    fn name(&self) -> &str {
        "enumerate"
    }

    fn doc(&self) -> &str {
        "Collect the items into a list."
    }

    fn args(&self) -> &[ArgSpec] {
        ARGS
    }

    fn is_aggregate(&self) -> bool {
        true
    }

    fn call(&self, ctx: &Context, _scope: &Scope, args: &CallArgs) -> Value {
        match args.reduce("items", ctx).unwrap_or(Value::Null) {
            Value::Null => Value::List(Vec::new()),
            list @ Value::List(_) => list,
            value => Value::List(vec![value]),
        }
    }
}

pub(super) fn register(registry: &mut FunctionRegistry) {
    registry.register(Arc::new(EnumerateFunction));
}
