//! Builtin row-producing plugins.
//!
//! Plugins are named row producers invoked in a FROM clause. They take
//! named arguments and return a lazy row stream. As with functions, the
//! registry here is a process-wide template used only to seed new root
//! scopes.

use crate::arguments::{ArgSpec, CallArgs};
use crate::context::Context;
use crate::execution::RowStream;
use crate::scope::Scope;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

mod dict;
mod foreach;
mod generic;
mod scope_info;

pub use generic::GenericListPlugin;

/// A named row producer. Argument problems degrade to an empty stream
/// with a diagnostic rather than erroring.
pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;

    fn doc(&self) -> &str {
        ""
    }

    /// The argument schema. An empty schema accepts arbitrary named
    /// arguments.
    fn args(&self) -> &[ArgSpec] {
        &[]
    }

    fn call(&self, ctx: &Context, scope: &Scope, args: &CallArgs) -> RowStream;
}

/// Registry of builtin plugins, used as the seeding template.
pub struct PluginRegistry {
    plugins: HashMap<String, Arc<dyn Plugin>>,
}

impl PluginRegistry {
    fn new() -> Self {
        let mut registry = Self {
            plugins: HashMap::new(),
        };
        dict::register(&mut registry);
        foreach::register(&mut registry);
        scope_info::register(&mut registry);
        registry
    }

    pub fn register(&mut self, plugin: Arc<dyn Plugin>) {
        self.plugins.insert(plugin.name().to_string(), plugin);
    }
}

static REGISTRY: LazyLock<PluginRegistry> = LazyLock::new(PluginRegistry::new);

/// A fresh copy of the builtin plugin table, for seeding a root scope.
pub(crate) fn builtins() -> HashMap<String, Arc<dyn Plugin>> {
    REGISTRY.plugins.clone()
}
