//! End-to-end query scenarios, compared against expected JSON output.

mod common;

use common::make_scope;
use serde_json::{Value as Json, json};
use vql::{Context, Dict, Row, Scope, Value};

fn run(scope: &Scope, ctx: &Context, query: &str) -> Json {
    let stmt = vql::parse(query).unwrap_or_else(|err| panic!("parse {}: {}", query, err));
    let bytes = vql::output_json(&stmt, ctx, scope)
        .unwrap_or_else(|err| panic!("eval {}: {}", query, err));
    serde_json::from_slice(&bytes).unwrap()
}

fn check(scope: &Scope, ctx: &Context, query: &str, expected: Json) {
    assert_eq!(run(scope, ctx, query), expected, "query: {}", query);
}

#[test]
fn plugin_rows_and_wildcards() {
    let (scope, _) = make_scope();
    let ctx = Context::new();

    check(
        &scope,
        &ctx,
        "select * from test()",
        json!([
            {"foo": 0, "bar": 0},
            {"foo": 2, "bar": 1},
            {"foo": 4, "bar": 2},
        ]),
    );
    check(
        &scope,
        &ctx,
        "select * from range(start=10, end=12)",
        json!([{"value": 10}, {"value": 11}, {"value": 12}]),
    );
    // Wildcard followed by an extra column.
    check(
        &scope,
        &ctx,
        "select *, 1 AS Extra from test()",
        json!([
            {"foo": 0, "bar": 0, "Extra": 1},
            {"foo": 2, "bar": 1, "Extra": 1},
            {"foo": 4, "bar": 2, "Extra": 1},
        ]),
    );
}

#[test]
fn aliases_and_shadowing() {
    let (scope, _) = make_scope();
    let ctx = Context::new();

    // The plugin's foo column shadows the environment's foo.
    check(
        &scope,
        &ctx,
        "select env_var as EnvVar, foo as FooColumn from test()",
        json!([
            {"EnvVar": "EnvironmentData", "FooColumn": 0},
            {"EnvVar": "EnvironmentData", "FooColumn": 2},
            {"EnvVar": "EnvironmentData", "FooColumn": 4},
        ]),
    );
    // Without a plugin column of that name, foo comes from the
    // environment.
    check(
        &scope,
        &ctx,
        "select foo as FooColumn from range(start=1, end=2)",
        json!([
            {"FooColumn": {"bar": {"baz": 5}, "bar2": 7}},
            {"FooColumn": {"bar": {"baz": 5}, "bar2": 7}},
        ]),
    );
    // Aliases are visible to the WHERE clause.
    check(
        &scope,
        &ctx,
        "select foo as FooColumn from test() where FooColumn = 2",
        json!([{"FooColumn": 2}]),
    );
    check(
        &scope,
        &ctx,
        "select foo as FooColumn from test() where NOT FooColumn = 2",
        json!([{"FooColumn": 0}, {"FooColumn": 4}]),
    );
    check(
        &scope,
        &ctx,
        "select foo as FooColumn from test() where foo = 4",
        json!([{"FooColumn": 4}]),
    );
}

#[test]
fn dict_plugin_and_missing_columns() {
    let (scope, _) = make_scope();
    let ctx = Context::new();

    check(
        &scope,
        &ctx,
        "select * from dict(env_var=15, foo=5)",
        json!([{"env_var": 15, "foo": 5}]),
    );
    check(
        &scope,
        &ctx,
        "select no_such_column from dict(env_var=15, foo=5)",
        json!([{"no_such_column": null}]),
    );
    check(
        &scope,
        &ctx,
        "select no_such_column + 'foo' from dict(env_var=15, foo=5)",
        json!([{"no_such_column + 'foo'": null}]),
    );
    check(
        &scope,
        &ctx,
        "select env_var + param as ConCat from dict(param='param')",
        json!([{"ConCat": "EnvironmentDataparam"}]),
    );
}

#[test]
fn subselects() {
    let (scope, _) = make_scope();
    let ctx = Context::new();

    check(
        &scope,
        &ctx,
        "select param from dict(param={select * from range(start=3, end=5)})",
        json!([{"param": [{"value": 3}, {"value": 4}, {"value": 5}]}]),
    );
    // Adding two row sets makes one longer sequence.
    check(
        &scope,
        &ctx,
        "select q1.value + q2.value as Sum from
             dict(q1={select * from range(start=3, end=5)},
                  q2={select * from range(start=10, end=14)})",
        json!([{"Sum": [3, 4, 5, 10, 11, 12, 13, 14]}]),
    );
    check(
        &scope,
        &ctx,
        "select func_foo(return=q1 + 4) from dict(q1=3)",
        json!([{"func_foo(return=(q1 + 4))": 7}]),
    );
    // The query() function runs per row and sees the row's columns.
    check(
        &scope,
        &ctx,
        "select bar, query(vql={select * from dict(column=bar)}) as Query from test()",
        json!([
            {"bar": 0, "Query": [{"column": 0}]},
            {"bar": 1, "Query": [{"column": 1}]},
            {"bar": 2, "Query": [{"column": 2}]},
        ]),
    );
    // The filter then reacts to the subquery's output.
    check(
        &scope,
        &ctx,
        "select bar, query(vql={select * from dict(column=bar)}) as Query
             from test() where 1 in Query.column",
        json!([{"bar": 1, "Query": [{"column": 1}]}]),
    );
    // A subquery directly in a column.
    check(
        &scope,
        &ctx,
        "select bar, { select column from dict(column=bar) } AS subquery from test()",
        json!([
            {"bar": 0, "subquery": [{"column": 0}]},
            {"bar": 1, "subquery": [{"column": 1}]},
            {"bar": 2, "subquery": [{"column": 2}]},
        ]),
    );
}

#[test]
fn stored_query_references() {
    let (scope, _) = make_scope();
    let ctx = Context::new();

    check(&scope, &ctx, "let result = select * from test()", json!([]));
    check(
        &scope,
        &ctx,
        "select * from result",
        json!([
            {"foo": 0, "bar": 0},
            {"foo": 2, "bar": 1},
            {"foo": 4, "bar": 2},
        ]),
    );
    // Unknown FROM sources yield no rows rather than failing.
    check(&scope, &ctx, "select * from no_such_result", json!([]));
    check(&scope, &ctx, "select foobar from no_such_result", json!([]));
}

#[test]
fn foreach_iteration() {
    let (scope, _) = make_scope();
    let ctx = Context::new();

    check(
        &scope,
        &ctx,
        "select * from foreach(
             row={ select * from test() },
             query={ select bar, foo, value from range(start=bar, end=foo) })",
        json!([
            {"bar": 0, "foo": 0, "value": 0},
            {"bar": 1, "foo": 2, "value": 1},
            {"bar": 1, "foo": 2, "value": 2},
            {"bar": 2, "foo": 4, "value": 2},
            {"bar": 2, "foo": 4, "value": 3},
            {"bar": 2, "foo": 4, "value": 4},
        ]),
    );
    // A list of dicts is a row stream; a single dict is one row.
    check(
        &scope,
        &ctx,
        "select * from foreach(
             row=[dict(bar=1, foo=2), dict(foo=1, bar=2)],
             query={ select bar, foo from scope() })",
        json!([{"bar": 1, "foo": 2}, {"bar": 2, "foo": 1}]),
    );
    check(
        &scope,
        &ctx,
        "select * from foreach(
             row=dict(bar=1, foo=2),
             query={ select bar, foo from scope() })",
        json!([{"bar": 1, "foo": 2}]),
    );
}

/// Wildcards expand against the column set of each arriving row, not the
/// schema of the first.
#[test]
fn wildcard_expands_per_row() {
    let (scope, _) = make_scope();
    let ctx = Context::new();

    check(
        &scope,
        &ctx,
        "select * from foreach(
             row=[dict(a=1), dict(b=2)],
             query={ select * from scope() })",
        json!([{"a": 1}, {"b": 2}]),
    );
}

/// An alias shadows a same-named value for downstream select items.
#[test]
fn aliases_shadow_for_later_items() {
    let (scope, _) = make_scope();
    let ctx = Context::new();

    check(
        &scope,
        &ctx,
        "select 1 as foo, foo + 1 as next from test() limit 1",
        json!([{"foo": 1, "next": 2}]),
    );
}

#[test]
fn unknown_dotted_plugins_yield_nothing() {
    let (scope, _) = make_scope();
    let ctx = Context::new();
    check(&scope, &ctx, "Select * from Artifact.Linux.Sys()", json!([]));
}

#[test]
fn order_and_limit() {
    let (scope, _) = make_scope();
    let ctx = Context::new();

    check(
        &scope,
        &ctx,
        "select * from test() order by foo",
        json!([
            {"foo": 0, "bar": 0},
            {"foo": 2, "bar": 1},
            {"foo": 4, "bar": 2},
        ]),
    );
    check(
        &scope,
        &ctx,
        "select * from test() order by foo DESC",
        json!([
            {"foo": 4, "bar": 2},
            {"foo": 2, "bar": 1},
            {"foo": 0, "bar": 0},
        ]),
    );
    check(
        &scope,
        &ctx,
        "select * from test() limit 1",
        json!([{"foo": 0, "bar": 0}]),
    );
    check(
        &scope,
        &ctx,
        "select * from test() order by foo desc limit 1",
        json!([{"foo": 4, "bar": 2}]),
    );
}

#[test]
fn comments_are_ignored() {
    let (scope, _) = make_scope();
    let ctx = Context::new();
    let expected = json!([{"foo": 0, "bar": 0}]);

    check(
        &scope,
        &ctx,
        "// This is a single line comment\nselect * from test() limit 1",
        expected.clone(),
    );
    check(
        &scope,
        &ctx,
        "-- This is a single line comment in sql style\nselect * from test() limit 1",
        expected.clone(),
    );
    check(
        &scope,
        &ctx,
        "/* This is a multiline comment\nthis is the rest of the comment */\nselect * from test() limit 1",
        expected,
    );
}

#[test]
fn not_combined_with_and_or() {
    let (scope, _) = make_scope();
    let ctx = Context::new();
    let all = json!([
        {"foo": 0, "bar": 0},
        {"foo": 2, "bar": 1},
        {"foo": 4, "bar": 2},
    ]);

    check(
        &scope,
        &ctx,
        "select * from test() WHERE 1 and not foo = 2",
        json!([{"foo": 0, "bar": 0}, {"foo": 4, "bar": 2}]),
    );
    check(
        &scope,
        &ctx,
        "select * from test() WHERE 0 and not foo = 2",
        json!([]),
    );
    check(
        &scope,
        &ctx,
        "select * from test() WHERE 1 or not foo = 20",
        all.clone(),
    );
    check(
        &scope,
        &ctx,
        "select * from test() WHERE 0 or not foo = 20",
        all,
    );
}

#[test]
fn group_by_with_aggregates() {
    let (scope, _) = make_scope();
    let ctx = Context::new();

    // Groups form in first-seen order; non-aggregate columns come from
    // the group's last row.
    check(
        &scope,
        &ctx,
        "select foo, bar from groupbytest() GROUP BY bar",
        json!([{"foo": 2, "bar": 5}, {"foo": 4, "bar": 2}]),
    );
    check(
        &scope,
        &ctx,
        "select foo, bar, count(items=bar) from groupbytest() GROUP BY bar",
        json!([
            {"foo": 2, "bar": 5, "count(items=bar)": 2},
            {"foo": 4, "bar": 2, "count(items=bar)": 2},
        ]),
    );
    // WHERE filters before grouping.
    check(
        &scope,
        &ctx,
        "select foo, bar, count(items=bar) from groupbytest() WHERE foo < 4 GROUP BY bar",
        json!([
            {"foo": 2, "bar": 5, "count(items=bar)": 2},
            {"foo": 3, "bar": 2, "count(items=bar)": 1},
        ]),
    );
    check(
        &scope,
        &ctx,
        "select foo, bar, min(items=foo) from groupbytest() GROUP BY bar",
        json!([
            {"foo": 2, "bar": 5, "min(items=foo)": 1},
            {"foo": 4, "bar": 2, "min(items=foo)": 3},
        ]),
    );
    check(
        &scope,
        &ctx,
        "select foo, bar, max(items=foo) from groupbytest() GROUP BY bar",
        json!([
            {"foo": 2, "bar": 5, "max(items=foo)": 2},
            {"foo": 4, "bar": 2, "max(items=foo)": 4},
        ]),
    );
    // Aggregates order strings lexically.
    check(
        &scope,
        &ctx,
        "select baz, bar, max(items=baz) from groupbytest() GROUP BY bar",
        json!([
            {"baz": "b", "bar": 5, "max(items=baz)": "b"},
            {"baz": "d", "bar": 2, "max(items=baz)": "d"},
        ]),
    );
    check(
        &scope,
        &ctx,
        "select baz, bar, min(items=baz) from groupbytest() GROUP BY bar",
        json!([
            {"baz": "b", "bar": 5, "min(items=baz)": "a"},
            {"baz": "d", "bar": 2, "min(items=baz)": "c"},
        ]),
    );
    check(
        &scope,
        &ctx,
        "select baz, bar, enumerate(items=baz) from groupbytest() GROUP BY bar",
        json!([
            {"baz": "b", "bar": 5, "enumerate(items=baz)": ["a", "b"]},
            {"baz": "d", "bar": 2, "enumerate(items=baz)": ["c", "d"]},
        ]),
    );
}

#[test]
fn string_quoting_and_get() {
    let (scope, _) = make_scope();
    let ctx = Context::new();

    check(
        &scope,
        &ctx,
        "select 'foo\\'s quote' from scope()",
        json!([{"'foo\\'s quote'": "foo's quote"}]),
    );
    check(
        &scope,
        &ctx,
        "select get(item=[dict(foo=3), 2, 3, 4], member='0.foo') AS Foo from scope()",
        json!([{"Foo": 3}]),
    );
}

#[test]
fn materialized_binding_as_value() {
    let (scope, _) = make_scope();
    let ctx = Context::new();

    check(&scope, &ctx, "LET BIN <= SELECT * FROM test()", json!([]));
    check(
        &scope,
        &ctx,
        "SELECT BIN, BIN[0] FROM scope()",
        json!([{
            "BIN": [
                {"foo": 0, "bar": 0},
                {"foo": 2, "bar": 1},
                {"foo": 4, "bar": 2},
            ],
            "BIN[0]": {"foo": 0, "bar": 0},
        }]),
    );
}

#[test]
fn array_concatenation_in_queries() {
    let (scope, _) = make_scope();
    let ctx = Context::new();

    check(
        &scope,
        &ctx,
        "SELECT (1,2) + (3,4) FROM scope()",
        json!([{"[1, 2] + [3, 4]": [1, 2, 3, 4]}]),
    );
    check(
        &scope,
        &ctx,
        "SELECT (1,2) + 4 FROM scope()",
        json!([{"[1, 2] + 4": [1, 2, 4]}]),
    );
    check(
        &scope,
        &ctx,
        "SELECT (1,2) + if(condition=1, then=(3,4)) AS Field FROM scope()",
        json!([{"Field": [1, 2, 3, 4]}]),
    );
    // Null from the untaken branch acts as the empty array.
    check(
        &scope,
        &ctx,
        "SELECT (1,2) + if(condition=0, then=(3,4)) AS Field FROM scope()",
        json!([{"Field": [1, 2]}]),
    );
}

#[test]
fn whitespace_forms() {
    let (scope, _) = make_scope();
    let ctx = Context::new();
    check(
        &scope,
        &ctx,
        "SELECT  \n1\n+\n2\tAS\nFooBar\t\n FROM\n scope(\n)\nWHERE\n FooBar >\n1\nAND\nTRUE\n",
        json!([{"FooBar": 3}]),
    );
}

#[test]
fn columns_from_environment_rows() {
    let (scope, _) = make_scope();
    let ctx = Context::new();
    let scope = scope.with_vars(Dict::new().set(
        "TestDict",
        vec![Value::Dict(Row::new().set("Field", 2i64))],
    ));

    check(
        &scope,
        &ctx,
        "select Field from TestDict",
        json!([{"Field": 2}]),
    );
    check(&scope, &ctx, "select * from TestDict", json!([{"Field": 2}]));
}

/// Rows serialize in declared column order.
#[test]
fn output_preserves_column_order() {
    let (scope, _) = make_scope();
    let ctx = Context::new();

    let stmt = vql::parse("select bar as B, foo as A from test() limit 1").unwrap();
    let bytes = vql::output_json(&stmt, &ctx, &scope).unwrap();
    assert_eq!(bytes, br#"[{"B":0,"A":0}]"#);
}
