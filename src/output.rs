//! JSON rendering of query results.

use crate::context::Context;
use crate::error::Result;
use crate::execution::eval;
use crate::parsing::ast::Statement;
use crate::scope::Scope;
use crate::types::Value;

/// Evaluates a statement and renders all result rows as a JSON array of
/// objects, preserving each row's declared column order. A LET statement
/// binds as a side effect and renders an empty array.
pub fn output_json(stmt: &Statement, ctx: &Context, scope: &Scope) -> Result<Vec<u8>> {
    let rows: Vec<Value> = eval(stmt, ctx, scope).map(Value::Dict).collect();
    Ok(serde_json::to_vec(&rows)?)
}
