//! Query parsing: text to AST.
//!
//! The lexer and parser follow the toydb lineage: a hand-written token
//! scanner feeding a precedence-climbing expression parser. The AST only
//! captures well-formed syntax; name resolution happens at evaluation
//! time.

pub mod ast;
mod caching_parser;
mod lexer;
mod parser;

use crate::error::Result;

pub use caching_parser::CachingParser;
pub use lexer::{Keyword, Lexer, Token};
pub use parser::Parser;

/// Parse a query string into a statement AST.
pub fn parse(query: &str) -> Result<ast::Statement> {
    Parser::parse(query)
}
