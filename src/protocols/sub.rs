//! Subtraction implementations.

use super::{Protocols, SubProtocol};
use crate::scope::Scope;
use crate::types::Value;
use crate::types::coercion::{is_int_like, to_float, to_int64};

struct SubInts;

impl SubProtocol for SubInts {
    fn applicable(&self, a: &Value, b: &Value) -> bool {
        is_int_like(a) && is_int_like(b)
    }

    fn sub(&self, _scope: &Scope, a: &Value, b: &Value) -> Value {
        match (to_int64(a), to_int64(b)) {
            (Some(x), Some(y)) => Value::Int(x.wrapping_sub(y)),
            _ => Value::Null,
        }
    }
}

struct SubFloats;

impl SubProtocol for SubFloats {
    fn applicable(&self, a: &Value, b: &Value) -> bool {
        to_float(a).is_some() && to_float(b).is_some()
    }

    fn sub(&self, _scope: &Scope, a: &Value, b: &Value) -> Value {
        match (to_float(a), to_float(b)) {
            (Some(x), Some(y)) => Value::Float(x - y),
            _ => Value::Null,
        }
    }
}

pub(super) fn register(protocols: &mut Protocols) {
    protocols.add_sub_impl(SubInts);
    protocols.add_sub_impl(SubFloats);
}
