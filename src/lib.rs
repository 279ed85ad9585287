//! `adl_core`: term representation, logical inference, interpretation, and
//! grounding for classical action-description-language planning problems.
//!
//! This crate is the grounding/interpretation pipeline only — it has no
//! text syntax, no search strategy, and no file I/O. Callers bring their own
//! parser/writer and planning algorithm; this crate gives them a `Domain` +
//! `State` + `Problem` to work against and the operations in
//! [`interpreter`]/[`grounder`]/[`satisfaction`] to advance, query, and
//! instantiate them.

pub mod base;
pub mod clause;
pub mod config;
pub mod connective;
pub mod domain;
pub mod effect;
pub mod error;
pub mod evaluator;
pub mod funcs;
pub mod grounder;
pub mod interpreter;
pub mod problem;
pub mod resolver;
pub mod satisfaction;
pub mod state;
pub mod term;

pub use base::{Interner, Symbol};
pub use config::EngineConfig;
pub use domain::{ActionSchema, Domain, FuncDef, FuncSig};
pub use error::AdlError;
pub use evaluator::evaluate;
pub use grounder::{ground, groundactions, GroundAction, GroundActionGroup};
pub use interpreter::{available, execute, regress, relevant, transition};
pub use problem::{goalstate, initstate, Problem};
pub use satisfaction::{satisfiers, satisfy, Tristate};
pub use state::State;
pub use term::{Term, Value};
