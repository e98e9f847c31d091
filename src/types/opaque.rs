//! Host-owned opaque values.
//!
//! Hosts expose their own object types to queries by implementing the
//! accessor trait below and wrapping the object in [`Value::Opaque`]. All
//! associative access to an opaque value is routed through this trait; the
//! engine performs no reflection.

use crate::types::value::Value;
use std::fmt;

/// A host object reachable from queries through member access.
pub trait OpaqueValue: fmt::Debug + Send + Sync {
    /// Host type name, used in diagnostics.
    fn type_name(&self) -> &'static str;

    /// Dereferences a named member. `None` means the member is not present;
    /// `Some(Value::Null)` means it is present but empty.
    fn get(&self, field: &str) -> Option<Value>;

    /// The member names reachable through [`OpaqueValue::get`].
    fn members(&self) -> Vec<String>;

    /// Sequence view: `Some(len)` when this object behaves like an array.
    fn sequence_len(&self) -> Option<usize> {
        None
    }

    /// Element access for sequence-like objects.
    fn index(&self, idx: usize) -> Option<Value> {
        let _ = idx;
        None
    }
}
