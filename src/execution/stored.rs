//! Stored queries.
//!
//! `LET name = q` binds the name to the unevaluated query AST. Every
//! reference re-evaluates the query against the scope current at the
//! reference, so side effects repeat per use. Materialized bindings
//! (`LET name <= q`) never appear here: they evaluate once at bind time
//! and live in the scope as a plain list of rows.

use crate::context::Context;
use crate::parsing::ast::SelectStatement;
use crate::scope::Scope;
use crate::types::Value;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct StoredQuery {
    stmt: Arc<SelectStatement>,
}

impl StoredQuery {
    pub fn new(stmt: Arc<SelectStatement>) -> Self {
        Self { stmt }
    }

    pub fn statement(&self) -> &Arc<SelectStatement> {
        &self.stmt
    }

    /// Evaluates the query, delivering its rows lazily.
    pub fn rows(&self, ctx: &Context, scope: &Scope) -> super::RowStream {
        super::select::eval_select_arc(self.stmt.clone(), ctx, scope)
    }

    /// Exposes the row stream as a list value, for references in scalar
    /// expression position.
    pub fn materialize(&self, ctx: &Context, scope: &Scope) -> Value {
        Value::List(self.rows(ctx, scope).map(Value::Dict).collect())
    }
}
