//! Membership (`IN`) implementations.
//!
//! `a IN b` with two strings tests for a substring. The array case is the
//! dispatcher's fallback: any element of the right operand equal to the
//! left operand.

use super::{MembershipProtocol, Protocols};
use crate::scope::Scope;
use crate::types::Value;
use crate::types::coercion::to_string_like;

struct SubstringMembership;

impl MembershipProtocol for SubstringMembership {
    fn applicable(&self, a: &Value, b: &Value) -> bool {
        to_string_like(a).is_some() && to_string_like(b).is_some()
    }

    fn contains(&self, _scope: &Scope, a: &Value, b: &Value) -> bool {
        match (to_string_like(a), to_string_like(b)) {
            (Some(needle), Some(haystack)) => haystack.contains(needle.as_ref()),
            _ => false,
        }
    }
}

pub(super) fn register(protocols: &mut Protocols) {
    protocols.add_membership_impl(SubstringMembership);
}
