//! Associative access implementations: `a.field` and `a[i]`.
//!
//! Access reports presence separately from the value: a missing member is
//! `(Null, absent)`, a member that is present but empty is
//! `(Null, present)`.

use super::{AssociativeProtocol, Protocols};
use crate::scope::Scope;
use crate::types::Value;
use crate::types::coercion::{to_int64, to_string_like};

fn to_index(v: &Value) -> Option<i64> {
    match v {
        Value::Int(_) | Value::Float(_) | Value::Bool(_) => to_int64(v),
        _ => None,
    }
}

/// Key lookup on ordered dicts. This is the builtin accessor.
pub struct DictAssociative;

impl AssociativeProtocol for DictAssociative {
    fn applicable(&self, a: &Value, b: &Value) -> bool {
        matches!(a, Value::Dict(_)) && to_string_like(b).is_some()
    }

    fn associative(&self, _scope: &Scope, a: &Value, b: &Value) -> (Value, bool) {
        let (Value::Dict(dict), Some(key)) = (a, to_string_like(b)) else {
            return (Value::Null, false);
        };
        match dict.get(key.as_ref()) {
            Some(value) => (value.clone(), true),
            None => (Value::Null, false),
        }
    }

    fn members(&self, _scope: &Scope, a: &Value) -> Vec<String> {
        match a {
            Value::Dict(dict) => dict.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }
}

/// Integer indexing into lists. Out-of-range and negative indexes are
/// absent.
struct ListIndex;

impl AssociativeProtocol for ListIndex {
    fn applicable(&self, a: &Value, b: &Value) -> bool {
        matches!(a, Value::List(_)) && to_index(b).is_some()
    }

    fn associative(&self, _scope: &Scope, a: &Value, b: &Value) -> (Value, bool) {
        let (Value::List(items), Some(idx)) = (a, to_index(b)) else {
            return (Value::Null, false);
        };
        if idx < 0 || idx as usize >= items.len() {
            return (Value::Null, false);
        }
        (items[idx as usize].clone(), true)
    }

    fn members(&self, _scope: &Scope, _a: &Value) -> Vec<String> {
        Vec::new()
    }
}

/// Field access on a list maps the access over the elements and collects
/// the present results.
struct ListMap;

impl AssociativeProtocol for ListMap {
    fn applicable(&self, a: &Value, b: &Value) -> bool {
        matches!(a, Value::List(_)) && to_string_like(b).is_some()
    }

    fn associative(&self, scope: &Scope, a: &Value, b: &Value) -> (Value, bool) {
        let Value::List(items) = a else {
            return (Value::Null, false);
        };
        let mut collected = Vec::new();
        for item in items {
            let (value, present) = scope.associative(item, b);
            if present {
                collected.push(value);
            }
        }
        (Value::List(collected), true)
    }

    /// A list exposes the members of its first element. The common case is
    /// a materialized query stored in the scope: a list of rows sharing
    /// one column set.
    fn members(&self, scope: &Scope, a: &Value) -> Vec<String> {
        match a {
            Value::List(items) => items
                .first()
                .map(|item| scope.members(item))
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }
}

/// Host objects, routed through their registered accessor. Lookup retries
/// with an initial capital when the literal name is lowercase, so queries
/// written against exported Go-style field names keep working.
struct OpaqueAccess;

fn capitalize(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

impl AssociativeProtocol for OpaqueAccess {
    fn applicable(&self, a: &Value, b: &Value) -> bool {
        matches!(a, Value::Opaque(_)) && (to_string_like(b).is_some() || to_index(b).is_some())
    }

    fn associative(&self, _scope: &Scope, a: &Value, b: &Value) -> (Value, bool) {
        let Value::Opaque(object) = a else {
            return (Value::Null, false);
        };
        if let Some(field) = to_string_like(b) {
            if let Some(value) = object.get(field.as_ref()) {
                return (value, true);
            }
            let retry = capitalize(field.as_ref());
            if retry != field.as_ref() {
                if let Some(value) = object.get(&retry) {
                    return (value, true);
                }
            }
            return (Value::Null, false);
        }
        match (to_index(b), object.sequence_len()) {
            (Some(idx), Some(len)) if idx >= 0 && (idx as usize) < len => {
                match object.index(idx as usize) {
                    Some(value) => (value, true),
                    None => (Value::Null, false),
                }
            }
            _ => (Value::Null, false),
        }
    }

    fn members(&self, _scope: &Scope, a: &Value) -> Vec<String> {
        match a {
            Value::Opaque(object) => object.members(),
            _ => Vec::new(),
        }
    }
}

pub(super) fn register(protocols: &mut Protocols) {
    protocols.add_associative_impl(DictAssociative);
    protocols.add_associative_impl(ListIndex);
    protocols.add_associative_impl(ListMap);
    protocols.add_associative_impl(OpaqueAccess);
}
