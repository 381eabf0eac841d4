//! Crate error type.

use thiserror::Error;

/// Errors raised before or during a solver run.
///
/// Instance and configuration problems are rejected up front; the engines
/// themselves only fail on [`Error::DecoderInvariant`], which signals a bug
/// in chunk placement rather than a bad input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed instance data (zero-length day, demand length mismatch, ...).
    #[error("invalid instance: {0}")]
    InvalidInstance(String),

    /// A required named field was absent during ingestion.
    #[error("missing instance field `{0}`")]
    MissingField(&'static str),

    /// A named field had the wrong shape during ingestion.
    #[error("instance field `{field}` must be {expected}")]
    FieldType {
        field: &'static str,
        expected: &'static str,
    },

    /// The feasibility pre-check ruled the instance out.
    #[error("instance is infeasible: {0}")]
    Infeasible(String),

    /// Engine configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The chunk placement loop ran out of spare capacity.
    #[error("decoder invariant violated: {remaining} hour(s) left with no chunk below capacity ({chunks} chunks)")]
    DecoderInvariant { remaining: usize, chunks: usize },
}

/// Shorthand for results carrying [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
