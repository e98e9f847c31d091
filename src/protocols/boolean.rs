//! Truth value implementations.

use super::{BoolProtocol, Protocols};
use crate::scope::Scope;
use crate::types::Value;
use crate::types::coercion::{array_len, is_array, to_float};

struct BoolImpl;

impl BoolProtocol for BoolImpl {
    fn applicable(&self, a: &Value) -> bool {
        matches!(a, Value::Bool(_))
    }

    fn as_bool(&self, _scope: &Scope, a: &Value) -> bool {
        matches!(a, Value::Bool(true))
    }
}

struct BoolNumber;

impl BoolProtocol for BoolNumber {
    fn applicable(&self, a: &Value) -> bool {
        to_float(a).is_some()
    }

    fn as_bool(&self, _scope: &Scope, a: &Value) -> bool {
        to_float(a).is_some_and(|v| v != 0.0)
    }
}

struct BoolString;

impl BoolProtocol for BoolString {
    fn applicable(&self, a: &Value) -> bool {
        matches!(a, Value::String(_) | Value::Bytes(_))
    }

    fn as_bool(&self, _scope: &Scope, a: &Value) -> bool {
        match a {
            Value::String(s) => !s.is_empty(),
            Value::Bytes(b) => !b.is_empty(),
            _ => false,
        }
    }
}

struct BoolSlice;

impl BoolProtocol for BoolSlice {
    fn applicable(&self, a: &Value) -> bool {
        is_array(a)
    }

    fn as_bool(&self, _scope: &Scope, a: &Value) -> bool {
        array_len(a).is_some_and(|len| len > 0)
    }
}

pub(super) fn register(protocols: &mut Protocols) {
    protocols.add_bool_impl(BoolImpl);
    protocols.add_bool_impl(BoolNumber);
    protocols.add_bool_impl(BoolString);
    protocols.add_bool_impl(BoolSlice);
}
