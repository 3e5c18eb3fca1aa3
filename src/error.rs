//! Error types.
//!
//! Two kinds of failure exist in switchyard, and they never mix:
//!
//! - [`CompileError`]: a route pattern is malformed. Raised while the router
//!   is being built, never while a request is in flight.
//! - [`BoxError`]: whatever a handler or middleware fails with. The chain
//!   passes it through untouched; turning it into a `500` is the
//!   dispatcher's job.
//!
//! An unmatched request is not an error at all: [`Router::lookup`] returns
//! `None`.
//!
//! [`Router::lookup`]: crate::Router::lookup

use thiserror::Error;

/// The error type handlers and middleware fail with.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A route pattern that could not be compiled.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("invalid route pattern `{pattern}`: {kind}")]
pub struct CompileError {
    pattern: String,
    kind: CompileErrorKind,
}

impl CompileError {
    pub(crate) fn new(pattern: &str, kind: CompileErrorKind) -> Self {
        Self { pattern: pattern.to_owned(), kind }
    }

    /// The full pattern string that failed to compile.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// What was wrong with it.
    pub fn kind(&self) -> &CompileErrorKind {
        &self.kind
    }
}

/// The reason a pattern was rejected. Each variant carries the offending
/// segment.
#[non_exhaustive]
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum CompileErrorKind {
    #[error("unbalanced braces in segment `{0}`")]
    UnbalancedBrace(String),

    #[error("extension union in segment `{0}` must be a trailing `.{{ext,...}}`")]
    MisplacedExtension(String),

    #[error("empty or malformed extension in segment `{0}`")]
    InvalidExtension(String),

    #[error("extension union in segment `{0}` has nothing before it")]
    EmptyBase(String),

    #[error("segment `{0}` declares a parameter without a name")]
    MissingName(String),

    #[error("parameter name in segment `{0}` contains a reserved character")]
    InvalidName(String),

    #[error("multi-segment wildcard `{0}` must be the last segment")]
    MultiWildcardNotLast(String),

    #[error("multi-segment wildcard `{0}` cannot carry an extension union")]
    MultiWildcardExtension(String),
}
