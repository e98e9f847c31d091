//! The count aggregate.

use super::{Function, FunctionRegistry};
use crate::arguments::{ArgSpec, CallArgs, TypeHint};
use crate::context::Context;
use crate::scope::Scope;
use crate::types::Value;
use std::sync::Arc;

pub struct CountFunction;

const ARGS: &[ArgSpec] = &[ArgSpec::required("items", TypeHint::Any)];

impl Function for CountFunction {
    fn name(&self) -> &str {
        "count"
    }

    fn doc(&self) -> &str {
        "Count the items in a row set or list."
    }

    fn args(&self) -> &[ArgSpec] {
        ARGS
    }

    fn is_aggregate(&self) -> bool {
        true
    }

    fn call(&self, ctx: &Context, _scope: &Scope, args: &CallArgs) -> Value {
        match args.reduce("items", ctx).unwrap_or(Value::Null) {
            Value::Null => Value::Int(0),
            Value::List(items) => Value::Int(items.len() as i64),
            _ => Value::Int(1),
        }
    }
}

pub(super) fn register(registry: &mut FunctionRegistry) {
    registry.register(Arc::new(CountFunction));
}
