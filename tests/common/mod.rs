//! Shared test environment: a scope populated with the variables,
//! functions and plugins the scenario tests run against.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use vql::{
    ArgSpec, CallArgs, Context, Dict, Function, GenericListPlugin, Plugin, Row, Scope, TypeHint,
    Value,
};

/// Returns its `return` argument, or a fixed default when called without
/// arguments.
pub struct TestFunction {
    pub return_value: Value,
}

impl Function for TestFunction {
    fn name(&self) -> &str {
        "func_foo"
    }

    fn call(&self, ctx: &Context, _scope: &Scope, args: &CallArgs) -> Value {
        match args.reduce("return", ctx) {
            Some(value) => value,
            None => self.return_value.clone(),
        }
    }
}

/// Counts invocations, for observing laziness and materialization.
pub struct CounterFunction {
    pub count: Arc<AtomicUsize>,
}

impl Function for CounterFunction {
    fn name(&self) -> &str {
        "counter"
    }

    fn call(&self, _ctx: &Context, _scope: &Scope, _args: &CallArgs) -> Value {
        let count = self.count.fetch_add(1, Ordering::SeqCst) + 1;
        Value::Int(count as i64)
    }
}

const PANIC_ARGS: &[ArgSpec] = &[
    ArgSpec::optional("column", TypeHint::Any),
    ArgSpec::optional("value", TypeHint::Any),
];

/// Panics when its two arguments compare equal.
pub struct PanicFunction;

impl Function for PanicFunction {
    fn name(&self) -> &str {
        "panic"
    }

    fn args(&self) -> &[ArgSpec] {
        PANIC_ARGS
    }

    fn call(&self, ctx: &Context, scope: &Scope, args: &CallArgs) -> Value {
        let column = args.reduce("column", ctx).unwrap_or(Value::Null);
        let value = args.reduce("value", ctx).unwrap_or(Value::Null);
        if scope.eq(&value, &column) {
            panic!("panic because I got {}", value);
        }
        value
    }
}

fn test_plugin() -> GenericListPlugin {
    GenericListPlugin::new("test", |_ctx, _scope, _args| {
        (0..3i64)
            .map(|i| Row::new().set("foo", i * 2).set("bar", i))
            .collect()
    })
}

fn range_plugin() -> GenericListPlugin {
    GenericListPlugin::new("range", |ctx, scope, args| {
        let bound = |name: &str| match args.reduce(name, ctx) {
            Some(Value::Int(i)) => Some(i),
            Some(Value::Float(f)) => Some(f as i64),
            _ => None,
        };
        let (Some(start), Some(end)) = (bound("start"), bound("end")) else {
            scope.log("range: start and end must be numbers");
            return Vec::new();
        };
        (start..=end).map(|i| Row::new().set("value", i)).collect()
    })
}

fn groupby_plugin() -> GenericListPlugin {
    GenericListPlugin::new("groupbytest", |_ctx, _scope, _args| {
        vec![
            Row::new().set("foo", 1i64).set("bar", 5i64).set("baz", "a"),
            Row::new().set("foo", 2i64).set("bar", 5i64).set("baz", "b"),
            Row::new().set("foo", 3i64).set("bar", 2i64).set("baz", "c"),
            Row::new().set("foo", 4i64).set("bar", 2i64).set("baz", "d"),
        ]
    })
}

/// A scope with the test environment bound, plus the shared invocation
/// counter of its `counter()` function.
pub fn make_scope() -> (Scope, Arc<AtomicUsize>) {
    let counter = Arc::new(AtomicUsize::new(0));
    let env = Dict::new()
        .set("const_foo", 1i64)
        .set(
            "my_list_obj",
            Dict::new().set(
                "my_list",
                vec![
                    Value::Int(1),
                    Value::Int(2),
                    Value::Int(3),
                    Value::Dict(Dict::new().set("Foo", "Bar")),
                ],
            ),
        )
        .set("env_var", "EnvironmentData")
        .set(
            "foo",
            Dict::new()
                .set("bar", Dict::new().set("baz", 5i64))
                .set("bar2", 7i64),
        );

    let functions: Vec<Arc<dyn Function>> = vec![
        Arc::new(TestFunction {
            return_value: Value::Int(1),
        }),
        Arc::new(CounterFunction {
            count: counter.clone(),
        }),
        Arc::new(PanicFunction),
    ];
    let plugins: Vec<Arc<dyn Plugin>> =
        vec![Arc::new(test_plugin()), Arc::new(range_plugin()), Arc::new(groupby_plugin())];

    let scope = Scope::new()
        .with_vars(env)
        .with_functions(functions)
        .with_plugins(plugins);
    (scope, counter)
}
