//! The dict plugin: echoes its named arguments back as a single row.

use super::{Plugin, PluginRegistry};
use crate::arguments::CallArgs;
use crate::context::Context;
use crate::execution::RowStream;
use crate::scope::Scope;
use crate::types::Row;
use std::sync::Arc;

pub struct DictPlugin;

impl Plugin for DictPlugin {
    fn name(&self) -> &str {
        "dict"
    }

    fn doc(&self) -> &str {
        "Emit the named arguments as a single row."
    }

    fn call(&self, ctx: &Context, _scope: &Scope, args: &CallArgs) -> RowStream {
        let mut row = Row::new();
        for (name, lazy) in args.iter() {
            row.insert(name.clone(), lazy.reduce(ctx));
        }
        Box::new(std::iter::once(row))
    }
}

pub(super) fn register(registry: &mut PluginRegistry) {
    registry.register(Arc::new(DictPlugin));
}
