//! The min aggregate.

use super::{Function, FunctionRegistry};
use crate::arguments::{ArgSpec, CallArgs, TypeHint};
use crate::context::Context;
use crate::scope::Scope;
use crate::types::Value;
use std::sync::Arc;

pub struct MinFunction;

const ARGS: &[ArgSpec] = &[ArgSpec::required("items", TypeHint::Any)];

impl Function for MinFunction {
    fn name(&self) -> &str {
        "min"
    }

    fn doc(&self) -> &str {
        "The smallest item, by the engine's ordering."
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
                let mut smallest: Option<Value> = None;
                for item in items {
                    match &smallest {
                        Some(current) if !scope.lt(&item, current) => {}
                        _ => smallest = Some(item),
                    }
                }
                smallest.unwrap_or(Value::Null)
            }
            value => value,
        }
    }
}

pub(super) fn register(registry: &mut FunctionRegistry) {
    registry.register(Arc::new(MinFunction));
}
