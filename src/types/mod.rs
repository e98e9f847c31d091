//! Core value types.

pub mod coercion;
mod dict;
mod opaque;
mod value;

pub use dict::{Dict, Row};
pub use opaque::OpaqueValue;
pub use value::Value;
