//! Division implementations.
//!
//! A zero divisor is silently neutralized: the operation yields the
//! boolean `false` so a downstream filter can react.

use super::{DivProtocol, Protocols};
use crate::scope::Scope;
use crate::types::Value;
use crate::types::coercion::{is_int_like, to_float, to_int64};

struct DivInts;

impl DivProtocol for DivInts {
    fn applicable(&self, a: &Value, b: &Value) -> bool {
        is_int_like(a) && is_int_like(b)
    }

    fn div(&self, _scope: &Scope, a: &Value, b: &Value) -> Value {
        match (to_int64(a), to_int64(b)) {
            (Some(_), Some(0)) => Value::Bool(false),
            (Some(x), Some(y)) => Value::Int(x.wrapping_div(y)),
            _ => Value::Null,
        }
    }
}

struct DivFloats;

impl DivProtocol for DivFloats {
    fn applicable(&self, a: &Value, b: &Value) -> bool {
        to_float(a).is_some() && to_float(b).is_some()
    }

    fn div(&self, _scope: &Scope, a: &Value, b: &Value) -> Value {
        match (to_float(a), to_float(b)) {
            (Some(_), Some(y)) if y == 0.0 => Value::Bool(false),
            (Some(x), Some(y)) => Value::Float(x / y),
            _ => Value::Null,
        }
    }
}

pub(super) fn register(protocols: &mut Protocols) {
    protocols.add_div_impl(DivInts);
    protocols.add_div_impl(DivFloats);
}
