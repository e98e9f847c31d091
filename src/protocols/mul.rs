//! Multiplication implementations.

use super::{MulProtocol, Protocols};
use crate::scope::Scope;
use crate::types::Value;
use crate::types::coercion::{is_int_like, to_float, to_int64};

struct MulInts;

impl MulProtocol for MulInts {
    fn applicable(&self, a: &Value, b: &Value) -> bool {
        is_int_like(a) && is_int_like(b)
    }

    fn mul(&self, _scope: &Scope, a: &Value, b: &Value) -> Value {
        match (to_int64(a), to_int64(b)) {
            (Some(x), Some(y)) => Value::Int(x.wrapping_mul(y)),
            _ => Value::Null,
        }
    }
}

struct MulFloats;

impl MulProtocol for MulFloats {
    fn applicable(&self, a: &Value, b: &Value) -> bool {
        to_float(a).is_some() && to_float(b).is_some()
    }

    fn mul(&self, _scope: &Scope, a: &Value, b: &Value) -> Value {
        match (to_float(a), to_float(b)) {
            (Some(x), Some(y)) => Value::Float(x * y),
            _ => Value::Null,
        }
    }
}

pub(super) fn register(protocols: &mut Protocols) {
    protocols.add_mul_impl(MulInts);
    protocols.add_mul_impl(MulFloats);
}
