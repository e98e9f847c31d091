//! Path traversal: walks a dotted/indexed member path into a value.

use super::{Function, FunctionRegistry};
use crate::arguments::{ArgSpec, CallArgs, TypeHint};
use crate::context::Context;
use crate::scope::Scope;
use crate::types::Value;
use std::sync::Arc;

pub struct GetFunction;

const ARGS: &[ArgSpec] = &[
    ArgSpec::required("item", TypeHint::Any),
    ArgSpec::required("member", TypeHint::String),
];

impl Function for GetFunction {
    fn name(&self) -> &str {
        "get"
    }

    fn doc(&self) -> &str {
        "Walk a dotted member path, e.g. get(item=x, member='0.foo')."
    }

    fn args(&self) -> &[ArgSpec] {
        ARGS
    }

    fn call(&self, ctx: &Context, scope: &Scope, args: &CallArgs) -> Value {
        let mut value = args.reduce("item", ctx).unwrap_or(Value::Null);
        let member = match args.reduce("member", ctx) {
            Some(Value::String(member)) => member,
            _ => {
                scope.log("get: member must be a string");
                return Value::Null;
            }
        };
        for segment in member.split('.') {
            let key = match segment.parse::<i64>() {
                Ok(index) => Value::Int(index),
                Err(_) => Value::String(segment.to_string()),
            };
            let (next, _present) = scope.associative(&value, &key);
            value = next;
        }
        value
    }
}

pub(super) fn register(registry: &mut FunctionRegistry) {
    registry.register(Arc::new(GetFunction));
}
