//! Error types shared by loading, resolution and flattening.
use std::path::PathBuf;

/// Failure to turn a key path into a literal.
///
/// All variants are recoverable: display code falls back to the raw key.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("key not found: {path}")]
    KeyNotFound { path: String },
    #[error("reference chain starting at {path} does not reach a literal within {max_depth} hops")]
    CyclicReference { path: String, max_depth: usize },
    #[error("malformed reference at {path}: {raw:?}")]
    MalformedReference { path: String, raw: String },
    #[error("resolved value at {path} exceeds {limit} bytes")]
    ValueTooLong { path: String, limit: usize },
}

impl ResolveError {
    /// Short stable code used in reports and JSON output.
    pub fn code(&self) -> &'static str {
        match self {
            ResolveError::KeyNotFound { .. } => "key_not_found",
            ResolveError::CyclicReference { .. } => "cyclic_reference",
            ResolveError::MalformedReference { .. } => "malformed_reference",
            ResolveError::ValueTooLong { .. } => "value_too_long",
        }
    }
}

/// Failure to read or parse a strings document.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse strings JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("strings document must be a JSON object")]
    NotAnObject,
    #[error("value at {path} must be a string or an object (got {kind})")]
    InvalidValue { path: String, kind: &'static str },
    #[error("invalid key {key:?} under {parent}")]
    InvalidKey { parent: String, key: String },
}

/// Eager flattening stopped at the first key that failed to resolve.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("resolve {key}: {source}")]
pub struct BuildError {
    pub key: String,
    #[source]
    pub source: ResolveError,
}
