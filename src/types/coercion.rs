//! Numeric and string coercion.
//!
//! Anything convertible to a signed 64-bit integer is int-like (booleans
//! count as 0/1). Int-like plus IEEE doubles is number-like. Strings and
//! byte buffers are string-like. The protocol dispatchers use these
//! predicates for applicability checks, so registration order matters:
//! int-like implementations must run before number-like ones to keep
//! integer comparisons exact at the edges of double precision.

use crate::types::value::Value;
use std::borrow::Cow;

/// True for values carrying an exact integer: booleans and ints.
pub fn is_int_like(v: &Value) -> bool {
    matches!(v, Value::Bool(_) | Value::Int(_))
}

pub fn to_int64(v: &Value) -> Option<i64> {
    match v {
        Value::Bool(true) => Some(1),
        Value::Bool(false) => Some(0),
        Value::Int(i) => Some(*i),
        Value::Float(f) => Some(*f as i64),
        _ => None,
    }
}

pub fn to_float(v: &Value) -> Option<f64> {
    match v {
        Value::Bool(true) => Some(1.0),
        Value::Bool(false) => Some(0.0),
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        _ => None,
    }
}

pub fn is_number_like(v: &Value) -> bool {
    to_float(v).is_some()
}

/// Strings and byte buffers; bytes decode lossily.
pub fn to_string_like(v: &Value) -> Option<Cow<'_, str>> {
    match v {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Bytes(b) => Some(String::from_utf8_lossy(b)),
        _ => None,
    }
}

pub fn is_string_like(v: &Value) -> bool {
    matches!(v, Value::String(_) | Value::Bytes(_))
}

pub fn is_null_like(v: &Value) -> bool {
    v.is_null()
}

/// True for lists and for opaque host objects that present as sequences.
pub fn is_array(v: &Value) -> bool {
    match v {
        Value::List(_) => true,
        Value::Opaque(o) => o.sequence_len().is_some(),
        _ => false,
    }
}

pub fn array_len(v: &Value) -> Option<usize> {
    match v {
        Value::List(items) => Some(items.len()),
        Value::Opaque(o) => o.sequence_len(),
        _ => None,
    }
}

/// Collects the elements of an array-like value.
pub fn array_items(v: &Value) -> Option<Vec<Value>> {
    match v {
        Value::List(items) => Some(items.clone()),
        Value::Opaque(o) => {
            let len = o.sequence_len()?;
            Some((0..len).map(|i| o.index(i).unwrap_or(Value::Null)).collect())
        }
        _ => None,
    }
}
