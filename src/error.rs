//! Error taxonomy for the ADL core.
//!
//! `check_term`/`Tristate` never produce an error — a malformed query there
//! degrades to `Unknown`. Every other fallible operation returns
//! `Result<_, AdlError>`.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AdlError {
    #[error("unknown symbol `{name}`: not a declared predicate, function, or builtin")]
    UnknownSymbol { name: String },

    #[error("type mismatch: expected {expected}, got `{term}`")]
    TypeMismatch { expected: &'static str, term: String },

    #[error("`{symbol}` expects {expected} argument(s), got {got}")]
    Arity {
        symbol: String,
        expected: usize,
        got: usize,
    },

    #[error("malformed effect: {reason}")]
    MalformedEffect { reason: String },

    #[error("resolver exceeded max depth ({depth})")]
    ResolverLimit { depth: usize },

    #[error("schema `{schema}` exceeded max groundings ({cap})")]
    GroundingLimit { schema: String, cap: usize },

    #[error("ill-formed state: {reason}")]
    IllFormedState { reason: String },
}
