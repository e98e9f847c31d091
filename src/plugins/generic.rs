//! A host convenience: a plugin backed by a closure returning a row
//! list.

use super::Plugin;
use crate::arguments::CallArgs;
use crate::context::Context;
use crate::execution::RowStream;
use crate::scope::Scope;
use crate::types::Row;

type RowFn = Box<dyn Fn(&Context, &Scope, &CallArgs) -> Vec<Row> + Send + Sync>;

pub struct GenericListPlugin {
    name: String,
    doc: String,
    function: RowFn,
}

impl GenericListPlugin {
    pub fn new(
        name: impl Into<String>,
        function: impl Fn(&Context, &Scope, &CallArgs) -> Vec<Row> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            doc: String::new(),
            function: Box::new(function),
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }
}

impl Plugin for GenericListPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn doc(&self) -> &str {
        &self.doc
    }

    fn call(&self, ctx: &Context, scope: &Scope, args: &CallArgs) -> RowStream {
        Box::new((self.function)(ctx, scope, args).into_iter())
    }
}
