//! The max aggregate.

use super::{Function, FunctionRegistry};
use crate::arguments::{ArgSpec, CallArgs, TypeHint};
use crate::context::Context;
use crate::scope::Scope;
use crate::types::Value;
use std::sync::Arc;

pub struct MaxFunction;

const ARGS: &[ArgSpec] = &[ArgSpec::required("items", TypeHint::Any)];

impl Function for MaxFunction {
    fn name(&self) -> &str {
        "max"
    }

    fn doc(&self) -> &str {
        "The largest item, by the engine's ordering."
    }

    fn args(&self) -> &[ArgSpec] {
        ARGS
    }

    fn is_aggregate(&self) -> bool {
        true
    }

    fn call(&self, ctx: &Context, scope: &Scope, args: &CallArgs) -> Value {
        match args.reduce("items", ctx).unwrap_or(Value::Null) {
            Value::List(items) => {
                let mut largest: Option<Value> = None;
                for item in items {
                    match &largest {
                        Some(current) if !scope.lt(current, &item) => {}
                        _ => largest = Some(item),
                    }
                }
                largest.unwrap_or(Value::Null)
            }
            value => value,
        }
    }
}

pub(super) fn register(registry: &mut FunctionRegistry) {
    registry.register(Arc::new(MaxFunction));
}
