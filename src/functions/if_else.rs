//! Conditional selection. Only the chosen branch is ever forced.

use super::{Function, FunctionRegistry};
use crate::arguments::{ArgSpec, CallArgs, TypeHint};
use crate::context::Context;
use crate::scope::Scope;
use crate::types::Value;
use std::sync::Arc;

pub struct IfFunction;

const ARGS: &[ArgSpec] = &[
    ArgSpec::required("condition", TypeHint::Any),
    ArgSpec::required("then", TypeHint::Any),
    ArgSpec::optional("else", TypeHint::Any),
];

impl Function for IfFunction {
    fn name(&self) -> &str {
        "if"
    }

    fn doc(&self) -> &str {
        "Return then if the condition is truthy, else otherwise."
    }

    fn args(&self) -> &[ArgSpec] {
        ARGS
    }

    fn call(&self, ctx: &Context, scope: &Scope, args: &CallArgs) -> Value {
        let condition = args.reduce("condition", ctx).unwrap_or(Value::Null);
        if scope.is_true(&condition) {
            args.reduce("then", ctx).unwrap_or(Value::Null)
        } else {
            args.reduce("else", ctx).unwrap_or(Value::Null)
        }
    }
}

pub(super) fn register(registry: &mut FunctionRegistry) {
    registry.register(Arc::new(IfFunction));
}
