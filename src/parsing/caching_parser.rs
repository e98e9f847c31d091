//! Caching wrapper around the parser.
//!
//! Hosts that evaluate the same query text repeatedly can keep an LRU
//! cache of parsed statements to avoid redundant parsing.

use super::Parser;
use super::ast::Statement;
use crate::error::Result;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Default capacity for the parse cache.
const DEFAULT_CACHE_CAPACITY: usize = 1000;

pub struct CachingParser {
    cache: LruCache<String, Arc<Statement>>,
}

impl CachingParser {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache: LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::new(100).unwrap()),
            ),
        }
    }

    /// Parses with caching, keyed by whitespace-trimmed source text.
    pub fn parse(&mut self, query: &str) -> Result<Arc<Statement>> {
        let normalized = query.trim().to_string();
        if let Some(statement) = self.cache.get(&normalized) {
            return Ok(statement.clone());
        }
        let statement = Arc::new(Parser::parse(query)?);
        self.cache.put(normalized, statement.clone());
        Ok(statement)
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

impl Default for CachingParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_parses_share_the_statement() {
        let mut parser = CachingParser::new();
        let first = parser.parse("SELECT * FROM test()").unwrap();
        let second = parser.parse("  SELECT * FROM test()  ").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn errors_are_not_cached() {
        let mut parser = CachingParser::new();
        assert!(parser.parse("SELECT FROM").is_err());
        assert!(parser.parse("SELECT FROM").is_err());
    }
}
