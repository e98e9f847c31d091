//! Regex match (`=~`) implementations.
//!
//! Patterns are always compiled case-insensitively and cached on the scope
//! keyed by source string. A pattern that fails to compile matches nothing
//! and logs once per compile attempt.

use super::{Protocols, RegexProtocol};
use crate::scope::Scope;
use crate::types::Value;
use crate::types::coercion::{array_items, is_array, to_string_like};

struct StringRegex;

impl RegexProtocol for StringRegex {
    fn applicable(&self, pattern: &Value, target: &Value) -> bool {
        to_string_like(pattern).is_some() && to_string_like(target).is_some()
    }

    fn matches(&self, scope: &Scope, pattern: &Value, target: &Value) -> bool {
        let (Some(pattern), Some(target)) = (to_string_like(pattern), to_string_like(target))
        else {
            return false;
        };
        match scope.compiled_regex(pattern.as_ref()) {
            Some(re) => re.is_match(target.as_ref()),
            None => false,
        }
    }
}

/// A pattern matches an array when it matches any element.
struct ArrayRegex;

impl RegexProtocol for ArrayRegex {
    fn applicable(&self, pattern: &Value, target: &Value) -> bool {
        to_string_like(pattern).is_some() && is_array(target)
    }

    fn matches(&self, scope: &Scope, pattern: &Value, target: &Value) -> bool {
        let Some(items) = array_items(target) else {
            return false;
        };
        items.iter().any(|item| scope.matches(pattern, item))
    }
}

pub(super) fn register(protocols: &mut Protocols) {
    protocols.add_regex_impl(StringRegex);
    protocols.add_regex_impl(ArrayRegex);
}
