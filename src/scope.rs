//! The evaluation environment.
//!
//! A scope is a lexical stack of variable frames plus function and plugin
//! registries, the protocol dispatcher bundle, and a regex cache shared
//! across the whole scope tree. Frames are reference counted so lazy
//! expressions can outlive the evaluation step that created them; shadowing
//! pushes a new frame rather than mutating a parent. Only LET bindings
//! mutate a frame, and only the frame the statement was issued in.

use crate::execution::{LazyExpr, StoredQuery};
use crate::functions::Function;
use crate::plugins::Plugin;
use crate::protocols::Protocols;
use crate::types::{Dict, Value};
use indexmap::IndexMap;
use lru::LruCache;
use parking_lot::{Mutex, RwLock};
use regex::Regex;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Capacity of the per-scope-tree compiled regex cache.
const REGEX_CACHE_CAPACITY: usize = 100;

/// A name bound in a scope frame.
#[derive(Clone, Debug)]
pub enum Binding {
    /// A concrete value.
    Value(Value),
    /// A deferred expression, reduced on first use.
    Lazy(LazyExpr),
    /// A stored query, re-evaluated on every reference.
    Stored(StoredQuery),
}

struct Shared {
    protocols: Protocols,
    regex_cache: Mutex<LruCache<String, Regex>>,
}

struct Frame {
    vars: RwLock<IndexMap<String, Binding>>,
    functions: HashMap<String, Arc<dyn Function>>,
    plugins: HashMap<String, Arc<dyn Plugin>>,
    parent: Option<Scope>,
    shared: Arc<Shared>,
}

/// A handle onto one frame of a scope tree.
#[derive(Clone)]
pub struct Scope {
    inner: Arc<Frame>,
}

impl Scope {
    /// A root scope with the baseline protocols and the builtin function
    /// and plugin registries.
    pub fn new() -> Self {
        Self::from_protocols(Protocols::new())
    }

    /// A root scope with a host-assembled protocol bundle. The bundle is
    /// immutable from here on.
    pub fn from_protocols(protocols: Protocols) -> Self {
        Self {
            inner: Arc::new(Frame {
                vars: RwLock::new(IndexMap::new()),
                functions: crate::functions::builtins(),
                plugins: crate::plugins::builtins(),
                parent: None,
                shared: Arc::new(Shared {
                    protocols,
                    regex_cache: Mutex::new(LruCache::new(
                        NonZeroUsize::new(REGEX_CACHE_CAPACITY).unwrap(),
                    )),
                }),
            }),
        }
    }

    fn derive(
        &self,
        vars: IndexMap<String, Binding>,
        functions: HashMap<String, Arc<dyn Function>>,
        plugins: HashMap<String, Arc<dyn Plugin>>,
    ) -> Scope {
        Scope {
            inner: Arc::new(Frame {
                vars: RwLock::new(vars),
                functions,
                plugins,
                parent: Some(self.clone()),
                shared: self.inner.shared.clone(),
            }),
        }
    }

    /// A short-lived derived frame, used per row during select-list and
    /// where evaluation.
    pub fn child(&self) -> Scope {
        self.derive(IndexMap::new(), HashMap::new(), HashMap::new())
    }

    /// Derives a scope with the given variables bound in a new frame.
    pub fn with_vars(&self, vars: Dict) -> Scope {
        let vars = vars
            .into_iter()
            .map(|(name, value)| (name, Binding::Value(value)))
            .collect();
        self.derive(vars, HashMap::new(), HashMap::new())
    }

    /// Derives a scope with a single extra binding.
    pub fn with_binding(&self, name: impl Into<String>, binding: Binding) -> Scope {
        let mut vars = IndexMap::new();
        vars.insert(name.into(), binding);
        self.derive(vars, HashMap::new(), HashMap::new())
    }

    /// Derives a scope with extra functions registered.
    pub fn with_functions(&self, functions: Vec<Arc<dyn Function>>) -> Scope {
        let functions = functions
            .into_iter()
            .map(|f| (f.name().to_string(), f))
            .collect();
        self.derive(IndexMap::new(), functions, HashMap::new())
    }

    /// Derives a scope with extra plugins registered.
    pub fn with_plugins(&self, plugins: Vec<Arc<dyn Plugin>>) -> Scope {
        let plugins = plugins
            .into_iter()
            .map(|p| (p.name().to_string(), p))
            .collect();
        self.derive(IndexMap::new(), HashMap::new(), plugins)
    }

    /// Binds a name in this frame. Used by LET statements and row
    /// envelopes; enclosing frames are never touched.
    pub fn set(&self, name: impl Into<String>, binding: Binding) {
        self.inner.vars.write().insert(name.into(), binding);
    }

    /// Resolves a symbol, walking frames nearest-first.
    pub fn resolve(&self, name: &str) -> Option<Binding> {
        if let Some(binding) = self.inner.vars.read().get(name) {
            return Some(binding.clone());
        }
        self.inner.parent.as_ref()?.resolve(name)
    }

    pub fn get_function(&self, name: &str) -> Option<Arc<dyn Function>> {
        if let Some(function) = self.inner.functions.get(name) {
            return Some(function.clone());
        }
        self.inner.parent.as_ref()?.get_function(name)
    }

    pub fn get_plugin(&self, name: &str) -> Option<Arc<dyn Plugin>> {
        if let Some(plugin) = self.inner.plugins.get(name) {
            return Some(plugin.clone());
        }
        self.inner.parent.as_ref()?.get_plugin(name)
    }

    /// A snapshot of this frame's concrete variables, in binding order.
    /// Lazy and stored bindings are not forced and not included.
    pub fn frame_vars(&self) -> Dict {
        self.inner
            .vars
            .read()
            .iter()
            .filter_map(|(name, binding)| match binding {
                Binding::Value(value) => Some((name.clone(), value.clone())),
                _ => None,
            })
            .collect()
    }

    /// Advisory diagnostic, for protocol dispatch misses and the like.
    pub fn trace(&self, message: &str) {
        tracing::trace!(target: "vql", "{}", message);
    }

    /// User-visible diagnostic.
    pub fn log(&self, message: &str) {
        tracing::warn!(target: "vql", "{}", message);
    }

    /// Compiles a pattern case-insensitively, consulting the scope's regex
    /// cache. Returns None (after logging) when the pattern is invalid.
    pub fn compiled_regex(&self, pattern: &str) -> Option<Regex> {
        let mut cache = self.inner.shared.regex_cache.lock();
        if let Some(re) = cache.get(pattern) {
            return Some(re.clone());
        }
        match Regex::new(&format!("(?i){}", pattern)) {
            Ok(re) => {
                cache.put(pattern.to_string(), re.clone());
                Some(re)
            }
            Err(err) => {
                self.log(&format!("failed to compile regex '{}': {}", pattern, err));
                None
            }
        }
    }

    // Protocol dispatch entry points.

    pub fn is_true(&self, a: &Value) -> bool {
        self.inner.shared.protocols.is_true(self, a)
    }

    pub fn eq(&self, a: &Value, b: &Value) -> bool {
        self.inner.shared.protocols.eq(self, a, b)
    }

    pub fn lt(&self, a: &Value, b: &Value) -> bool {
        self.inner.shared.protocols.lt(self, a, b)
    }

    pub fn add(&self, a: &Value, b: &Value) -> Value {
        self.inner.shared.protocols.add(self, a, b)
    }

    pub fn sub(&self, a: &Value, b: &Value) -> Value {
        self.inner.shared.protocols.sub(self, a, b)
    }

    pub fn mul(&self, a: &Value, b: &Value) -> Value {
        self.inner.shared.protocols.mul(self, a, b)
    }

    pub fn div(&self, a: &Value, b: &Value) -> Value {
        self.inner.shared.protocols.div(self, a, b)
    }

    /// `a IN b`.
    pub fn contains(&self, a: &Value, b: &Value) -> bool {
        self.inner.shared.protocols.contains(self, a, b)
    }

    /// Dereferences member `b` of `a`; the flag reports presence.
    pub fn associative(&self, a: &Value, b: &Value) -> (Value, bool) {
        self.inner.shared.protocols.associative(self, a, b)
    }

    /// The member names reachable from `a`.
    pub fn members(&self, a: &Value) -> Vec<String> {
        self.inner.shared.protocols.members(self, a)
    }

    /// `target =~ pattern`.
    pub fn matches(&self, pattern: &Value, target: &Value) -> bool {
        self.inner.shared.protocols.matches(self, pattern, target)
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_frame_shadows() {
        let scope = Scope::new().with_vars(Dict::new().set("x", 1i64));
        let child = scope.with_vars(Dict::new().set("x", 2i64));

        match child.resolve("x") {
            Some(Binding::Value(Value::Int(2))) => {}
            other => panic!("unexpected binding: {:?}", other),
        }
        match scope.resolve("x") {
            Some(Binding::Value(Value::Int(1))) => {}
            other => panic!("unexpected binding: {:?}", other),
        }
    }

    #[test]
    fn set_only_touches_own_frame() {
        let parent = Scope::new();
        let child = parent.child();
        child.set("y", Binding::Value(Value::Int(3)));

        assert!(child.resolve("y").is_some());
        assert!(parent.resolve("y").is_none());
    }

    #[test]
    fn regex_cache_returns_same_pattern() {
        let scope = Scope::new();
        let re = scope.compiled_regex("foo.*bar").unwrap();
        assert!(re.is_match("FOO middle BAR"));
        assert!(scope.compiled_regex("foo.*bar").is_some());
        assert!(scope.compiled_regex("(unclosed").is_none());
    }
}
