//! Addition implementations.
//!
//! Addition doubles as concatenation: strings concatenate, arrays
//! concatenate, an array plus Null is the array, and an array plus a
//! scalar extends the array (scalar appended or prepended depending on
//! which side it appears).

use super::{AddProtocol, Protocols};
use crate::scope::Scope;
use crate::types::Value;
use crate::types::coercion::{
    array_items, is_array, is_int_like, is_null_like, to_float, to_int64, to_string_like,
};

struct AddStrings;

impl AddProtocol for AddStrings {
    fn applicable(&self, a: &Value, b: &Value) -> bool {
        to_string_like(a).is_some() && to_string_like(b).is_some()
    }

    fn add(&self, _scope: &Scope, a: &Value, b: &Value) -> Value {
        let (Some(a_str), Some(b_str)) = (to_string_like(a), to_string_like(b)) else {
            return Value::Null;
        };
        Value::String(format!("{}{}", a_str, b_str))
    }
}

struct AddInts;

impl AddProtocol for AddInts {
    fn applicable(&self, a: &Value, b: &Value) -> bool {
        is_int_like(a) && is_int_like(b)
    }

    fn add(&self, _scope: &Scope, a: &Value, b: &Value) -> Value {
        match (to_int64(a), to_int64(b)) {
            (Some(x), Some(y)) => Value::Int(x.wrapping_add(y)),
            _ => Value::Null,
        }
    }
}

struct AddFloats;

impl AddProtocol for AddFloats {
    fn applicable(&self, a: &Value, b: &Value) -> bool {
        to_float(a).is_some() && to_float(b).is_some()
    }

    fn add(&self, _scope: &Scope, a: &Value, b: &Value) -> Value {
        match (to_float(a), to_float(b)) {
            (Some(x), Some(y)) => Value::Float(x + y),
            _ => Value::Null,
        }
    }
}

struct AddSlices;

impl AddProtocol for AddSlices {
    fn applicable(&self, a: &Value, b: &Value) -> bool {
        is_array(a) && is_array(b)
    }

    fn add(&self, _scope: &Scope, a: &Value, b: &Value) -> Value {
        let (Some(mut items), Some(tail)) = (array_items(a), array_items(b)) else {
            return Value::Null;
        };
        items.extend(tail);
        Value::List(items)
    }
}

/// An array plus Null is the array: Null acts as the empty array.
struct AddNull;

impl AddProtocol for AddNull {
    fn applicable(&self, a: &Value, b: &Value) -> bool {
        (is_array(a) && is_null_like(b)) || (is_null_like(a) && is_array(b))
    }

    fn add(&self, _scope: &Scope, a: &Value, b: &Value) -> Value {
        if is_null_like(a) { b.clone() } else { a.clone() }
    }
}

/// An array plus a scalar extends the array with the scalar.
struct AddSliceAny;

impl AddProtocol for AddSliceAny {
    fn applicable(&self, a: &Value, b: &Value) -> bool {
        is_array(a) || is_array(b)
    }

    fn add(&self, _scope: &Scope, a: &Value, b: &Value) -> Value {
        if let Some(mut items) = array_items(a) {
            items.push(b.clone());
            return Value::List(items);
        }
        let Some(tail) = array_items(b) else {
            return Value::Null;
        };
        let mut items = vec![a.clone()];
        items.extend(tail);
        Value::List(items)
    }
}

pub(super) fn register(protocols: &mut Protocols) {
    protocols.add_add_impl(AddStrings);
    protocols.add_add_impl(AddInts);
    protocols.add_add_impl(AddFloats);
    protocols.add_add_impl(AddSlices);
    protocols.add_add_impl(AddNull);
    protocols.add_add_impl(AddSliceAny);
}
