//! Equality implementations.
//!
//! Integer equality must run before the floating-point comparison: two
//! int-like operands are never compared as doubles, which keeps equalities
//! such as `281462092005375 = 65535 * 65535 * 65535` exact.

use super::{EqProtocol, Protocols};
use crate::scope::Scope;
use crate::types::Value;
use crate::types::coercion::{
    array_items, is_array, is_int_like, is_null_like, to_float, to_int64, to_string_like,
};

struct NullEq;

impl EqProtocol for NullEq {
    fn applicable(&self, a: &Value, b: &Value) -> bool {
        is_null_like(a) && is_null_like(b)
    }

    fn eq(&self, _scope: &Scope, _a: &Value, _b: &Value) -> bool {
        true
    }
}

struct StringEq;

impl EqProtocol for StringEq {
    fn applicable(&self, a: &Value, b: &Value) -> bool {
        to_string_like(a).is_some() && to_string_like(b).is_some()
    }

    fn eq(&self, _scope: &Scope, a: &Value, b: &Value) -> bool {
        to_string_like(a) == to_string_like(b)
    }
}

struct IntEq;

impl EqProtocol for IntEq {
    fn applicable(&self, a: &Value, b: &Value) -> bool {
        is_int_like(a) && is_int_like(b)
    }

    fn eq(&self, _scope: &Scope, a: &Value, b: &Value) -> bool {
        to_int64(a) == to_int64(b)
    }
}

struct NumericEq;

impl EqProtocol for NumericEq {
    fn applicable(&self, a: &Value, b: &Value) -> bool {
        to_float(a).is_some() && to_float(b).is_some()
    }

    fn eq(&self, _scope: &Scope, a: &Value, b: &Value) -> bool {
        to_float(a) == to_float(b)
    }
}

struct ArrayEq;

impl EqProtocol for ArrayEq {
    fn applicable(&self, a: &Value, b: &Value) -> bool {
        is_array(a) && is_array(b)
    }

    fn eq(&self, scope: &Scope, a: &Value, b: &Value) -> bool {
        let (Some(a_items), Some(b_items)) = (array_items(a), array_items(b)) else {
            return false;
        };
        if a_items.len() != b_items.len() {
            return false;
        }
        a_items
            .iter()
            .zip(b_items.iter())
            .all(|(x, y)| scope.eq(x, y))
    }
}

struct DictEq;

impl EqProtocol for DictEq {
    fn applicable(&self, a: &Value, b: &Value) -> bool {
        matches!(a, Value::Dict(_)) && matches!(b, Value::Dict(_))
    }

    fn eq(&self, scope: &Scope, a: &Value, b: &Value) -> bool {
        let (Value::Dict(a_dict), Value::Dict(b_dict)) = (a, b) else {
            return false;
        };
        if a_dict.len() != b_dict.len() {
            return false;
        }
        a_dict
            .iter()
            .zip(b_dict.iter())
            .all(|((ak, av), (bk, bv))| ak == bk && scope.eq(av, bv))
    }
}

pub(super) fn register(protocols: &mut Protocols) {
    protocols.add_eq_impl(NullEq);
    protocols.add_eq_impl(StringEq);
    protocols.add_eq_impl(IntEq);
    protocols.add_eq_impl(NumericEq);
    protocols.add_eq_impl(ArrayEq);
    protocols.add_eq_impl(DictEq);
}
