//! Dict construction from named arguments.

use super::{Function, FunctionRegistry};
use crate::arguments::CallArgs;
use crate::context::Context;
use crate::scope::Scope;
use crate::types::{Dict, Value};
use std::sync::Arc;

pub struct DictFunction;

impl Function for DictFunction {
    fn name(&self) -> &str {
        "dict"
    }

    fn doc(&self) -> &str {
        "Build an ordered dict from the named arguments."
    }

    fn call(&self, ctx: &Context, _scope: &Scope, args: &CallArgs) -> Value {
        let mut dict = Dict::new();
        for (name, lazy) in args.iter() {
            dict.insert(name.clone(), lazy.reduce(ctx));
        }
        Value::Dict(dict)
    }
}

pub(super) fn register(registry: &mut FunctionRegistry) {
    registry.register(Arc::new(DictFunction));
}
