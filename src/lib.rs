//! An embeddable SQL-like query engine with lazy evaluation.
//!
//! The engine evaluates declarative SELECT-style queries against
//! pluggable data sources, deferring evaluation as long as possible. The
//! host extends it at three points: plugins (table-valued row producers),
//! functions (scalar computations over named arguments) and values
//! (ambient variables injected into a lexical scope).
//!
//! ```
//! use vql::{Context, Scope, output_json, parse};
//!
//! let scope = Scope::new();
//! let ctx = Context::new();
//! let stmt = parse("SELECT 1 + 2 AS Three FROM scope()").unwrap();
//! let json = output_json(&stmt, &ctx, &scope).unwrap();
//! assert_eq!(json, br#"[{"Three":3}]"#);
//! ```
//!
//! Expression evaluation is total: operators degrade to documented
//! neutral values on incompatible operands instead of failing, so a
//! query always completes. Only parsing and host-facing entry points
//! return errors.

mod arguments;
mod context;
mod error;
mod execution;
mod functions;
mod output;
mod parsing;
mod plugins;
mod protocols;
mod scope;
mod types;

pub use arguments::{ArgSpec, CallArgs, TypeHint, check_args};
pub use context::{CancellationToken, Context};
pub use error::{Error, Result};
pub use execution::{LazyExpr, RowStream, StoredQuery, eval, eval_select, reduce};
pub use functions::Function;
pub use output::output_json;
pub use parsing::{CachingParser, Parser, ast, parse};
pub use plugins::{GenericListPlugin, Plugin};
pub use protocols::{
    AddProtocol, AssociativeProtocol, BoolProtocol, DictAssociative, DivProtocol, EqProtocol,
    LtProtocol, MembershipProtocol, MulProtocol, Protocols, RegexProtocol, SubProtocol,
};
pub use scope::{Binding, Scope};
pub use types::{Dict, OpaqueValue, Row, Value};
