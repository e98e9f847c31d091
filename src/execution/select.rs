//! Query evaluation.
//!
//! A query reduces to a pull-based row stream. Each source row gets a
//! child scope whose frames hold the row's columns and a lazy expression
//! per select-list item, keyed by alias or source text. Aliases are
//! visible to the WHERE clause and to later select items without forcing
//! evaluation, so column expressions run only for rows that survive the
//! filter. GROUP BY and ORDER BY buffer; everything else streams.

use crate::arguments::{CallArgs, check_args};
use crate::context::Context;
use crate::execution::LazyExpr;
use crate::execution::expression;
use crate::execution::stored::StoredQuery;
use crate::functions::Function;
use crate::parsing::ast::{
    Expression, FunctionCall, SelectItem, SelectStatement, Statement,
};
use crate::scope::{Binding, Scope};
use crate::types::{Row, Value};
use indexmap::IndexMap;
use std::cmp::Ordering;
use std::sync::Arc;

/// A lazy sequence of rows. The consumer pulls; the producer works only
/// when asked.
pub type RowStream = Box<dyn Iterator<Item = Row>>;

/// Evaluates a statement. A LET statement binds into the given scope and
/// yields no rows.
pub fn eval(stmt: &Statement, ctx: &Context, scope: &Scope) -> RowStream {
    match stmt {
        Statement::Select(select) => eval_select(select, ctx, scope),
        Statement::Let(binding) => {
            let query = Arc::new(binding.query.clone());
            if binding.materialize {
                let rows: Vec<Value> = eval_select_arc(query, ctx, scope)
                    .map(Value::Dict)
                    .collect();
                scope.set(binding.name.clone(), Binding::Value(Value::List(rows)));
            } else {
                scope.set(binding.name.clone(), Binding::Stored(StoredQuery::new(query)));
            }
            Box::new(std::iter::empty())
        }
    }
}

/// Evaluates a SELECT query into a row stream.
pub fn eval_select(stmt: &SelectStatement, ctx: &Context, scope: &Scope) -> RowStream {
    eval_select_arc(Arc::new(stmt.clone()), ctx, scope)
}

pub(crate) fn eval_select_arc(
    stmt: Arc<SelectStatement>,
    ctx: &Context,
    scope: &Scope,
) -> RowStream {
    let envelopes = envelope_stream(stmt.clone(), ctx, scope);

    let mut rows: RowStream = match stmt.group_by.clone() {
        Some(group_expr) => {
            Box::new(group_rows(&stmt, &group_expr, envelopes, ctx).into_iter())
        }
        None => {
            let ctx = ctx.clone();
            Box::new(envelopes.map(move |envelope| force_row(&envelope, &ctx)))
        }
    };

    if let Some(order_by) = stmt.order_by.clone() {
        rows = sort_rows(rows, &order_by, stmt.desc, scope);
    }
    if let Some(limit) = stmt.limit {
        rows = Box::new(rows.take(limit.max(0) as usize));
    }
    rows
}

/// A source row wrapped with its evaluation scope and the per-item lazy
/// bindings.
struct Envelope {
    row: Row,
    scope: Scope,
    items: Vec<ItemBinding>,
}

enum ItemBinding {
    Wildcard,
    Column { name: String, lazy: LazyExpr },
}

/// Streams WHERE-filtered envelopes from the FROM source, observing
/// cancellation at each row boundary.
fn envelope_stream(
    stmt: Arc<SelectStatement>,
    ctx: &Context,
    scope: &Scope,
) -> Box<dyn Iterator<Item = Envelope>> {
    let source = eval_from(&stmt, ctx, scope);
    let ctx = ctx.clone();
    let cancel = ctx.cancellation_token();
    let scope = scope.clone();
    Box::new(
        source
            .take_while(move |_| !cancel.is_cancelled())
            .filter_map(move |row| {
                let envelope = build_envelope(&stmt, row, &scope);
                if let Some(where_clause) = &stmt.where_clause {
                    let value = expression::reduce(where_clause, &ctx, &envelope.scope);
                    if !envelope.scope.is_true(&value) {
                        return None;
                    }
                }
                Some(envelope)
            }),
    )
}

/// Builds the per-row envelope. Each select item's lazy expression
/// captures the scope as of its position, so an alias is visible to later
/// items (and to WHERE) while an item named after a source column still
/// sees the column, not itself.
fn build_envelope(stmt: &SelectStatement, row: Row, scope: &Scope) -> Envelope {
    let mut item_scope = scope.with_vars(row.clone());
    let mut items = Vec::with_capacity(stmt.select.len());
    for item in &stmt.select {
        match item {
            SelectItem::Wildcard => items.push(ItemBinding::Wildcard),
            SelectItem::Expr { expr, alias } => {
                let name = alias.clone().unwrap_or_else(|| expr.column_name());
                let lazy = LazyExpr::new(Arc::new(expr.clone()), &item_scope);
                item_scope = item_scope.with_binding(name.clone(), Binding::Lazy(lazy.clone()));
                items.push(ItemBinding::Column { name, lazy });
            }
        }
    }
    Envelope {
        row,
        scope: item_scope,
        items,
    }
}

/// Forces the select list of one envelope in declared order. Wildcards
/// expand against the arriving row's own column set.
fn force_row(envelope: &Envelope, ctx: &Context) -> Row {
    let mut out = Row::new();
    for item in &envelope.items {
        match item {
            ItemBinding::Wildcard => {
                for (column, value) in &envelope.row {
                    out.insert(column.clone(), value.clone());
                }
            }
            ItemBinding::Column { name, lazy } => {
                out.insert(name.clone(), lazy.reduce(ctx));
            }
        }
    }
    out
}

/// Resolves the FROM source: a registered plugin, or a stored or
/// materialized query bound in the scope. An unknown source yields no
/// rows.
fn eval_from(stmt: &SelectStatement, ctx: &Context, scope: &Scope) -> RowStream {
    let from = &stmt.from;
    if let Some(plugin) = scope.get_plugin(&from.name) {
        let args = CallArgs::from_args(&from.args, scope);
        if !check_args(scope, &from.name, plugin.args(), &args) {
            return Box::new(std::iter::empty());
        }
        return plugin.call(ctx, scope, &args);
    }
    match scope.resolve(&from.name) {
        Some(Binding::Stored(stored)) => stored.rows(ctx, scope),
        Some(Binding::Value(value)) => rows_from_value(value),
        Some(Binding::Lazy(lazy)) => rows_from_value(lazy.reduce(ctx)),
        None => {
            scope.log(&format!(
                "no such plugin or stored query: {}",
                from.name
            ));
            Box::new(std::iter::empty())
        }
    }
}

/// Iterates a materialized binding as rows. A list yields its dict
/// elements; a single dict is one row.
fn rows_from_value(value: Value) -> RowStream {
    match value {
        Value::List(items) => Box::new(items.into_iter().filter_map(|item| match item {
            Value::Dict(dict) => Some(dict),
            _ => None,
        })),
        Value::Dict(dict) => Box::new(std::iter::once(dict)),
        _ => Box::new(std::iter::empty()),
    }
}

/// Buffers the surviving envelopes, partitions them by the reduced group
/// expression, and emits one row per group in first-seen order.
/// Aggregate-family functions receive the group's collected `items`;
/// other select items reduce against the group's last row.
fn group_rows(
    stmt: &SelectStatement,
    group_expr: &Expression,
    envelopes: impl Iterator<Item = Envelope>,
    ctx: &Context,
) -> Vec<Row> {
    let mut groups: IndexMap<String, Vec<Envelope>> = IndexMap::new();
    for envelope in envelopes {
        let key_value = expression::reduce(group_expr, ctx, &envelope.scope);
        let key = serde_json::to_string(&key_value).unwrap_or_else(|_| key_value.to_string());
        groups.entry(key).or_default().push(envelope);
    }

    let mut rows = Vec::with_capacity(groups.len());
    for (_, group) in groups {
        let Some(last) = group.last() else { continue };
        let mut out = Row::new();
        for (idx, item) in stmt.select.iter().enumerate() {
            match (item, &last.items[idx]) {
                (SelectItem::Wildcard, _) => {
                    for (column, value) in &last.row {
                        out.insert(column.clone(), value.clone());
                    }
                }
                (SelectItem::Expr { expr, .. }, ItemBinding::Column { name, lazy }) => {
                    let value = match aggregate_call(expr, &last.scope) {
                        Some((function, call)) => {
                            eval_aggregate(function.as_ref(), call, &group, ctx, &last.scope)
                        }
                        None => lazy.reduce(ctx),
                    };
                    out.insert(name.clone(), value);
                }
                _ => {}
            }
        }
        rows.push(out);
    }
    rows
}

/// A select item that is a direct call to an aggregate-family function.
fn aggregate_call<'a>(
    expr: &'a Expression,
    scope: &Scope,
) -> Option<(Arc<dyn Function>, &'a FunctionCall)> {
    let Expression::Call(call) = expr else {
        return None;
    };
    let function = scope.get_function(&call.name)?;
    function.is_aggregate().then_some((function, call))
}

/// Calls an aggregate with `items` bound to the list of per-row
/// reductions of its items expression across the whole group.
fn eval_aggregate(
    function: &dyn Function,
    call: &FunctionCall,
    group: &[Envelope],
    ctx: &Context,
    scope: &Scope,
) -> Value {
    let mut args = CallArgs::new();
    for arg in &call.args {
        if arg.name == "items" {
            let collected: Vec<Value> = group
                .iter()
                .map(|envelope| expression::reduce(&arg.value, ctx, &envelope.scope))
                .collect();
            args.insert("items", LazyExpr::from_value(Value::List(collected)));
        } else {
            args.insert(
                arg.name.clone(),
                LazyExpr::new(Arc::new(arg.value.clone()), scope),
            );
        }
    }
    expression::invoke(function, &call.name, ctx, scope, &args)
}

/// Buffers and sorts by a named output column using the Lt dispatcher.
/// DESC reverses the sorted order.
fn sort_rows(rows: RowStream, column: &str, desc: bool, scope: &Scope) -> RowStream {
    let mut buffered: Vec<Row> = rows.collect();
    let scope = scope.clone();
    let column = column.to_string();
    buffered.sort_by(|a, b| {
        let a_value = a.get(&column).cloned().unwrap_or(Value::Null);
        let b_value = b.get(&column).cloned().unwrap_or(Value::Null);
        if scope.lt(&a_value, &b_value) {
            Ordering::Less
        } else if scope.lt(&b_value, &a_value) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    });
    if desc {
        buffered.reverse();
    }
    Box::new(buffered.into_iter())
}
