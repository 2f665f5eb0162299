//! Error types.
//!
//! "No split found" is not an error: segmentation returns `Ok(None)` for it. The
//! variants here are load-time failures (a bad rule corpus, a missing lexicon),
//! configuration problems, and the hard resource ceiling on path enumeration.

use thiserror::Error;

/// Crate-wide error.
#[derive(Error, Debug)]
pub enum Error {
    /// A rule corpus line could not be parsed or expanded.
    #[error("invalid sandhi rule in {source_name}:{line}: {reason}")]
    InvalidRuleSpec {
        /// File (or in-memory source) name the rule came from
        source_name: String,
        /// 1-based line number
        line: usize,
        /// What was wrong with it
        reason: String,
    },

    /// The lexicon oracle could not be constructed.
    #[error("lexicon unavailable: {0}")]
    OracleUnavailable(String),

    /// Path enumeration would exceed the configured hard ceiling.
    #[error("path enumeration exceeded the ceiling of {limit} paths")]
    ResourceLimit {
        /// The configured ceiling
        limit: usize,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding/decoding of a serialized artifact failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Result type for crate operations
pub type Result<T> = std::result::Result<T, Error>;
