//! Ordering implementations, used by `<`-family comparisons and ORDER BY.

use super::{LtProtocol, Protocols};
use crate::scope::Scope;
use crate::types::Value;
use crate::types::coercion::{is_int_like, to_float, to_int64, to_string_like};

struct IntLt;

impl LtProtocol for IntLt {
    fn applicable(&self, a: &Value, b: &Value) -> bool {
        is_int_like(a) && is_int_like(b)
    }

    fn lt(&self, _scope: &Scope, a: &Value, b: &Value) -> bool {
        to_int64(a) < to_int64(b)
    }
}

struct NumericLt;

impl LtProtocol for NumericLt {
    fn applicable(&self, a: &Value, b: &Value) -> bool {
        to_float(a).is_some() && to_float(b).is_some()
    }

    fn lt(&self, _scope: &Scope, a: &Value, b: &Value) -> bool {
        match (to_float(a), to_float(b)) {
            (Some(x), Some(y)) => x < y,
            _ => false,
        }
    }
}

struct StringLt;

impl LtProtocol for StringLt {
    fn applicable(&self, a: &Value, b: &Value) -> bool {
        to_string_like(a).is_some() && to_string_like(b).is_some()
    }

    fn lt(&self, _scope: &Scope, a: &Value, b: &Value) -> bool {
        to_string_like(a) < to_string_like(b)
    }
}

pub(super) fn register(protocols: &mut Protocols) {
    protocols.add_lt_impl(IntLt);
    protocols.add_lt_impl(NumericLt);
    protocols.add_lt_impl(StringLt);
}
