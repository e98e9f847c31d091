//! Error types for the query engine

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to the embedding host.
///
/// Expression evaluation is total and never returns an error: operators
/// degrade to neutral values instead (see the protocol dispatchers). Only
/// the parser and the host-facing entry points are fallible.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("parse error at {line}:{column}: {message}")]
    Parse {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Builds a parse error anchored at a source position.
    pub fn parse(message: impl Into<String>, line: usize, column: usize) -> Self {
        Error::Parse {
            message: message.into(),
            line,
            column,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
