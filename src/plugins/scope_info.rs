//! The scope plugin: a single row reflecting the current environment.

use super::{Plugin, PluginRegistry};
use crate::arguments::CallArgs;
use crate::context::Context;
use crate::execution::RowStream;
use crate::scope::Scope;
use std::sync::Arc;

/// Emits one row holding the concrete variables of the scope's top
/// frame. Queries use it as a one-row source when they only need
/// expressions evaluated, e.g. `SELECT 1 + 2 AS Three FROM scope()`.
pub struct ScopePlugin;

impl Plugin for ScopePlugin {
    fn name(&self) -> &str {
        "scope"
    }

    fn doc(&self) -> &str {
        "Emit a single row holding the current scope's top frame."
    }

    fn call(&self, _ctx: &Context, scope: &Scope, _args: &CallArgs) -> RowStream {
        Box::new(std::iter::once(scope.frame_vars()))
    }
}

pub(super) fn register(registry: &mut PluginRegistry) {
    registry.register(Arc::new(ScopePlugin));
}
