//! Dynamically typed query values.
//!
//! Every value flowing through the engine is a [`Value`]. Operators never
//! inspect these variants directly; they go through the protocol
//! dispatchers, which dispatch on the runtime kinds of their operands.

use crate::types::dict::Dict;
use crate::types::opaque::OpaqueValue;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// A dynamically typed value.
///
/// `Null` is a distinct sentinel: it is not the empty list, not zero and
/// not an absent column.
#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Dict(Dict),
    /// A host-owned object, accessed through its [`OpaqueValue`] accessor.
    Opaque(Arc<dyn OpaqueValue>),
}

impl Value {
    /// A short kind name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::List(_) => "list",
            Value::Dict(_) => "dict",
            Value::Opaque(o) => o.type_name(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Wraps a host object.
    pub fn opaque(object: impl OpaqueValue + 'static) -> Self {
        Value::Opaque(Arc::new(object))
    }
}

/// Structural equality, used by the AST and by tests. Query-level equality
/// goes through the Eq dispatcher instead, which coerces across numeric
/// kinds. Floats compare by bit pattern so values can live in hash maps.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(l), Value::Bool(r)) => l == r,
            (Value::Int(l), Value::Int(r)) => l == r,
            (Value::Float(l), Value::Float(r)) => l.to_bits() == r.to_bits(),
            (Value::String(l), Value::String(r)) => l == r,
            (Value::Bytes(l), Value::Bytes(r)) => l == r,
            (Value::List(l), Value::List(r)) => l == r,
            (Value::Dict(l), Value::Dict(r)) => l == r,
            (Value::Opaque(l), Value::Opaque(r)) => Arc::ptr_eq(l, r),
            (_, _) => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(true) => write!(f, "TRUE"),
            Value::Bool(false) => write!(f, "FALSE"),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{:?}", v),
            Value::String(s) => write!(f, "{}", s),
            Value::Bytes(b) => write!(f, "{:?}", b),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Dict(dict) => {
                write!(f, "{{")?;
                for (i, (k, v)) in dict.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
            Value::Opaque(o) => write!(f, "<{}>", o.type_name()),
        }
    }
}

/// Opaque values render as a map of their reachable members; everything
/// else maps straight onto the JSON data model. Dicts keep column order.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(v) => serializer.serialize_f64(*v),
            Value::String(s) => serializer.serialize_str(s),
            Value::Bytes(b) => {
                let mut seq = serializer.serialize_seq(Some(b.len()))?;
                for byte in b {
                    seq.serialize_element(byte)?;
                }
                seq.end()
            }
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Dict(dict) => dict.serialize(serializer),
            Value::Opaque(o) => {
                let members = o.members();
                let mut map = serializer.serialize_map(Some(members.len()))?;
                for member in members {
                    let value = o.get(&member).unwrap_or(Value::Null);
                    map.serialize_entry(&member, &value)?;
                }
                map.end()
            }
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl From<Dict> for Value {
    fn from(v: Dict) -> Self {
        Value::Dict(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_is_not_zero_or_empty() {
        assert_ne!(Value::Null, Value::Int(0));
        assert_ne!(Value::Null, Value::String(String::new()));
        assert_ne!(Value::Null, Value::List(vec![]));
    }

    #[test]
    fn serializes_to_json() {
        let value = Value::Dict(
            Dict::new()
                .set("a", Value::Null)
                .set("b", vec![Value::Int(1), Value::Float(2.5)]),
        );
        assert_eq!(
            serde_json::to_string(&value).unwrap(),
            r#"{"a":null,"b":[1,2.5]}"#
        );
    }
}
