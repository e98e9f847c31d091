//! Builtin scalar and aggregate functions.
//!
//! Functions are named scalar computations invoked in expression
//! position. They take named arguments, passed as lazy expressions, and
//! always return a value. The registry built here is a process-wide
//! template used only to seed new root scopes; after seeding, all state
//! is scope-local.

use crate::arguments::{ArgSpec, CallArgs};
use crate::context::Context;
use crate::scope::Scope;
use crate::types::Value;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

mod count;
mod dict;
mod enumerate;
mod get;
mod if_else;
mod max;
mod min;
mod query;

/// A named scalar computation. `call` is total: failures degrade to Null
/// with a diagnostic rather than erroring.
pub trait Function: Send + Sync {
    fn name(&self) -> &str;

    fn doc(&self) -> &str {
        ""
    }

    /// The argument schema. An empty schema accepts arbitrary named
    /// arguments.
    fn args(&self) -> &[ArgSpec] {
        &[]
    }

    /// Aggregate-family functions receive the group's collected rows as
    /// their `items` argument under GROUP BY.
    fn is_aggregate(&self) -> bool {
        false
    }

    fn call(&self, ctx: &Context, scope: &Scope, args: &CallArgs) -> Value;
}

/// Registry of builtin functions, used as the seeding template.
pub struct FunctionRegistry {
    functions: HashMap<String, Arc<dyn Function>>,
}

impl FunctionRegistry {
    fn new() -> Self {
        let mut registry = Self {
            functions: HashMap::new(),
        };
        count::register(&mut registry);
        dict::register(&mut registry);
        enumerate::register(&mut registry);
        get::register(&mut registry);
        if_else::register(&mut registry);
        max::register(&mut registry);
        min::register(&mut registry);
        query::register(&mut registry);
        registry
    }

    pub fn register(&mut self, function: Arc<dyn Function>) {
        self.functions
            .insert(function.name().to_string(), function);
    }
}

static REGISTRY: LazyLock<FunctionRegistry> = LazyLock::new(FunctionRegistry::new);

/// A fresh copy of the builtin function table, for seeding a root scope.
pub(crate) fn builtins() -> HashMap<String, Arc<dyn Function>> {
    REGISTRY.functions.clone()
}
