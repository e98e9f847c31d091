//! Polymorphic operator protocols.
//!
//! Every polymorphic operation (truth value, equality, ordering,
//! arithmetic, membership, associative access, regex match) is backed by an
//! ordered list of implementations. Dispatch walks the list in registration
//! order and picks the first applicable implementation; when none matches
//! the operation returns its neutral result and emits a trace, so a query
//! always completes.
//!
//! Registration order is significant: narrower applicability must be
//! registered before broader. In particular the integer implementations of
//! Eq, Lt, Add, Sub, Mul and Div precede the floating-point ones, keeping
//! integer comparisons exact at the edges of double precision.
//!
//! The lists are mutable only while the host assembles the engine; scopes
//! share them immutably afterwards.

mod add;
mod associative;
mod boolean;
mod div;
mod eq;
mod lt;
mod membership;
mod mul;
mod regex;
mod sub;

pub use associative::DictAssociative;

use crate::scope::Scope;
use crate::types::Value;
use crate::types::coercion::array_items;

/// The truth value of a single operand.
pub trait BoolProtocol: Send + Sync {
    fn applicable(&self, a: &Value) -> bool;
    fn as_bool(&self, scope: &Scope, a: &Value) -> bool;
}

pub trait EqProtocol: Send + Sync {
    fn applicable(&self, a: &Value, b: &Value) -> bool;
    fn eq(&self, scope: &Scope, a: &Value, b: &Value) -> bool;
}

pub trait LtProtocol: Send + Sync {
    fn applicable(&self, a: &Value, b: &Value) -> bool;
    fn lt(&self, scope: &Scope, a: &Value, b: &Value) -> bool;
}

pub trait AddProtocol: Send + Sync {
    fn applicable(&self, a: &Value, b: &Value) -> bool;
    fn add(&self, scope: &Scope, a: &Value, b: &Value) -> Value;
}

pub trait SubProtocol: Send + Sync {
    fn applicable(&self, a: &Value, b: &Value) -> bool;
    fn sub(&self, scope: &Scope, a: &Value, b: &Value) -> Value;
}

pub trait MulProtocol: Send + Sync {
    fn applicable(&self, a: &Value, b: &Value) -> bool;
    fn mul(&self, scope: &Scope, a: &Value, b: &Value) -> Value;
}

pub trait DivProtocol: Send + Sync {
    fn applicable(&self, a: &Value, b: &Value) -> bool;
    fn div(&self, scope: &Scope, a: &Value, b: &Value) -> Value;
}

/// `a IN b`.
pub trait MembershipProtocol: Send + Sync {
    fn applicable(&self, a: &Value, b: &Value) -> bool;
    fn contains(&self, scope: &Scope, a: &Value, b: &Value) -> bool;
}

/// Member and index access: `a.field`, `a[i]`.
pub trait AssociativeProtocol: Send + Sync {
    fn applicable(&self, a: &Value, b: &Value) -> bool;

    /// Dereferences field `b` from object `a`. The flag reports whether the
    /// member was present; an absent member carries `Value::Null`.
    fn associative(&self, scope: &Scope, a: &Value, b: &Value) -> (Value, bool);

    /// The member names reachable from `a`.
    fn members(&self, scope: &Scope, a: &Value) -> Vec<String>;
}

/// `target =~ pattern`.
pub trait RegexProtocol: Send + Sync {
    fn applicable(&self, pattern: &Value, target: &Value) -> bool;
    fn matches(&self, scope: &Scope, pattern: &Value, target: &Value) -> bool;
}

/// The dispatcher bundle held by every scope tree.
pub struct Protocols {
    bool_impls: Vec<Box<dyn BoolProtocol>>,
    eq_impls: Vec<Box<dyn EqProtocol>>,
    lt_impls: Vec<Box<dyn LtProtocol>>,
    add_impls: Vec<Box<dyn AddProtocol>>,
    sub_impls: Vec<Box<dyn SubProtocol>>,
    mul_impls: Vec<Box<dyn MulProtocol>>,
    div_impls: Vec<Box<dyn DivProtocol>>,
    membership_impls: Vec<Box<dyn MembershipProtocol>>,
    associative_impls: Vec<Box<dyn AssociativeProtocol>>,
    regex_impls: Vec<Box<dyn RegexProtocol>>,
}

impl Protocols {
    /// Builds the bundle with the baseline implementations registered in
    /// their mandated order.
    pub fn new() -> Self {
        let mut protocols = Self {
            bool_impls: Vec::new(),
            eq_impls: Vec::new(),
            lt_impls: Vec::new(),
            add_impls: Vec::new(),
            sub_impls: Vec::new(),
            mul_impls: Vec::new(),
            div_impls: Vec::new(),
            membership_impls: Vec::new(),
            associative_impls: Vec::new(),
            regex_impls: Vec::new(),
        };
        boolean::register(&mut protocols);
        eq::register(&mut protocols);
        lt::register(&mut protocols);
        add::register(&mut protocols);
        sub::register(&mut protocols);
        mul::register(&mut protocols);
        div::register(&mut protocols);
        membership::register(&mut protocols);
        associative::register(&mut protocols);
        regex::register(&mut protocols);
        protocols
    }

    pub fn add_bool_impl(&mut self, implementation: impl BoolProtocol + 'static) {
        self.bool_impls.push(Box::new(implementation));
    }

    pub fn add_eq_impl(&mut self, implementation: impl EqProtocol + 'static) {
        self.eq_impls.push(Box::new(implementation));
    }

    pub fn add_lt_impl(&mut self, implementation: impl LtProtocol + 'static) {
        self.lt_impls.push(Box::new(implementation));
    }

    pub fn add_add_impl(&mut self, implementation: impl AddProtocol + 'static) {
        self.add_impls.push(Box::new(implementation));
    }

    pub fn add_sub_impl(&mut self, implementation: impl SubProtocol + 'static) {
        self.sub_impls.push(Box::new(implementation));
    }

    pub fn add_mul_impl(&mut self, implementation: impl MulProtocol + 'static) {
        self.mul_impls.push(Box::new(implementation));
    }

    pub fn add_div_impl(&mut self, implementation: impl DivProtocol + 'static) {
        self.div_impls.push(Box::new(implementation));
    }

    pub fn add_membership_impl(&mut self, implementation: impl MembershipProtocol + 'static) {
        self.membership_impls.push(Box::new(implementation));
    }

    pub fn add_associative_impl(&mut self, implementation: impl AssociativeProtocol + 'static) {
        self.associative_impls.push(Box::new(implementation));
    }

    pub fn add_regex_impl(&mut self, implementation: impl RegexProtocol + 'static) {
        self.regex_impls.push(Box::new(implementation));
    }

    pub fn is_true(&self, scope: &Scope, a: &Value) -> bool {
        for implementation in &self.bool_impls {
            if implementation.applicable(a) {
                return implementation.as_bool(scope, a);
            }
        }
        scope.trace(&format!("protocol Bool not found for {}", a.kind()));
        false
    }

    pub fn eq(&self, scope: &Scope, a: &Value, b: &Value) -> bool {
        for implementation in &self.eq_impls {
            if implementation.applicable(a, b) {
                return implementation.eq(scope, a, b);
            }
        }
        scope.trace(&format!(
            "protocol Eq not found for {} and {}",
            a.kind(),
            b.kind()
        ));
        false
    }

    pub fn lt(&self, scope: &Scope, a: &Value, b: &Value) -> bool {
        for implementation in &self.lt_impls {
            if implementation.applicable(a, b) {
                return implementation.lt(scope, a, b);
            }
        }
        scope.trace(&format!(
            "protocol Lt not found for {} and {}",
            a.kind(),
            b.kind()
        ));
        false
    }

    pub fn add(&self, scope: &Scope, a: &Value, b: &Value) -> Value {
        for implementation in &self.add_impls {
            if implementation.applicable(a, b) {
                return implementation.add(scope, a, b);
            }
        }
        scope.trace(&format!(
            "protocol Add not found for {} and {}",
            a.kind(),
            b.kind()
        ));
        Value::Null
    }

    pub fn sub(&self, scope: &Scope, a: &Value, b: &Value) -> Value {
        for implementation in &self.sub_impls {
            if implementation.applicable(a, b) {
                return implementation.sub(scope, a, b);
            }
        }
        scope.trace(&format!(
            "protocol Sub not found for {} and {}",
            a.kind(),
            b.kind()
        ));
        Value::Null
    }

    pub fn mul(&self, scope: &Scope, a: &Value, b: &Value) -> Value {
        for implementation in &self.mul_impls {
            if implementation.applicable(a, b) {
                return implementation.mul(scope, a, b);
            }
        }
        scope.trace(&format!(
            "protocol Mul not found for {} and {}",
            a.kind(),
            b.kind()
        ));
        Value::Null
    }

    pub fn div(&self, scope: &Scope, a: &Value, b: &Value) -> Value {
        for implementation in &self.div_impls {
            if implementation.applicable(a, b) {
                return implementation.div(scope, a, b);
            }
        }
        scope.trace(&format!(
            "protocol Div not found for {} and {}",
            a.kind(),
            b.kind()
        ));
        Value::Null
    }

    pub fn contains(&self, scope: &Scope, a: &Value, b: &Value) -> bool {
        for implementation in &self.membership_impls {
            if implementation.applicable(a, b) {
                return implementation.contains(scope, a, b);
            }
        }
        // Fallback: test the left operand against each member of an
        // array-like right operand.
        if let Some(items) = array_items(b) {
            return items.iter().any(|item| scope.eq(a, item));
        }
        scope.trace(&format!(
            "protocol Membership not found for {} and {}",
            a.kind(),
            b.kind()
        ));
        false
    }

    pub fn associative(&self, scope: &Scope, a: &Value, b: &Value) -> (Value, bool) {
        for implementation in &self.associative_impls {
            if implementation.applicable(a, b) {
                return implementation.associative(scope, a, b);
            }
        }
        scope.trace(&format!(
            "protocol Associative not found for {} and {}",
            a.kind(),
            b.kind()
        ));
        (Value::Null, false)
    }

    pub fn members(&self, scope: &Scope, a: &Value) -> Vec<String> {
        let probe = Value::String(String::new());
        for implementation in &self.associative_impls {
            if implementation.applicable(a, &probe) {
                return implementation.members(scope, a);
            }
        }
        Vec::new()
    }

    pub fn matches(&self, scope: &Scope, pattern: &Value, target: &Value) -> bool {
        for implementation in &self.regex_impls {
            if implementation.applicable(pattern, target) {
                return implementation.matches(scope, pattern, target);
            }
        }
        scope.trace(&format!(
            "protocol Regex not found for {} and {}",
            pattern.kind(),
            target.kind()
        ));
        false
    }
}

impl Default for Protocols {
    fn default() -> Self {
        Self::new()
    }
}
