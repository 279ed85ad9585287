//! Satisfaction engine: a three-valued fast path over ground propositional
//! queries, falling back to the resolver for quantifiers, free variables, or
//! derived predicates. The tri-state short-circuit distinguishes "false"
//! from "can't be decided without the resolver," so a ground query a single
//! fact lookup can settle never pays full resolution cost.

use crate::clause::Clause;
use crate::connective::*;
use crate::domain::Domain;
use crate::error::AdlError;
use crate::evaluator::evaluate;
use crate::resolver::{resolve, ResolveMode};
use crate::state::State;
use crate::term::{is_ground, substitute, Subst, Term};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tristate {
    True,
    False,
    Unknown,
}

impl Tristate {
    fn and(self, other: impl FnOnce() -> Tristate) -> Tristate {
        match self {
            Tristate::False => Tristate::False,
            Tristate::True => other(),
            Tristate::Unknown => match other() {
                Tristate::False => Tristate::False,
                _ => Tristate::Unknown,
            },
        }
    }

    fn or(self, other: impl FnOnce() -> Tristate) -> Tristate {
        match self {
            Tristate::True => Tristate::True,
            Tristate::False => other(),
            Tristate::Unknown => match other() {
                Tristate::True => Tristate::True,
                _ => Tristate::Unknown,
            },
        }
    }

    fn not(self) -> Tristate {
        match self {
            Tristate::True => Tristate::False,
            Tristate::False => Tristate::True,
            Tristate::Unknown => Tristate::Unknown,
        }
    }
}

/// Three-valued truth of `term` in `state`, without invoking the resolver.
pub fn check_term(domain: &Domain, state: &State, term: &Term) -> Tristate {
    match term {
        Term::Var(_) => Tristate::Unknown,
        Term::Const(name, literal) => {
            if let Some(v) = literal {
                if let Some(b) = v.0.as_bool() {
                    return if b { Tristate::True } else { Tristate::False };
                }
            }
            if state.facts.contains(term) || state.types.contains(term) {
                return Tristate::True;
            }
            if domain.is_func(*name) || domain.is_derived(*name) {
                return Tristate::Unknown;
            }
            Tristate::False
        }
        Term::Compound(name, args) => {
            let resolved = domain.resolve(*name);
            match resolved.as_str() {
                AND => {
                    let mut result = Tristate::True;
                    for a in args {
                        result = result.and(|| check_term(domain, state, a));
                        if result == Tristate::False {
                            break;
                        }
                    }
                    result
                }
                OR => {
                    let mut result = Tristate::False;
                    for a in args {
                        result = result.or(|| check_term(domain, state, a));
                        if result == Tristate::True {
                            break;
                        }
                    }
                    result
                }
                IMPLY => {
                    if let [a, b] = args.as_slice() {
                        check_term(domain, state, a).not().or(|| check_term(domain, state, b))
                    } else {
                        Tristate::Unknown
                    }
                }
                NOT => {
                    if let [inner] = args.as_slice() {
                        check_term(domain, state, inner).not()
                    } else {
                        Tristate::Unknown
                    }
                }
                FORALL | EXISTS => Tristate::Unknown,
                _ if !is_ground(term) => Tristate::Unknown,
                _ if domain.is_derived(*name) => Tristate::Unknown,
                _ if domain.is_type(state, *name) => {
                    if domain.has_subtypes(*name) {
                        Tristate::Unknown
                    } else if let [Term::Const(obj, _)] = args.as_slice() {
                        let declared = domain.constants.get(obj).copied();
                        let in_state = state.types.contains(&Term::compound(*name, args.clone()));
                        if declared == Some(*name) || in_state {
                            Tristate::True
                        } else {
                            Tristate::False
                        }
                    } else {
                        Tristate::Unknown
                    }
                }
                _ if is_comparison(&resolved) => match evaluate(domain, state, term) {
                    Ok(v) => bool_tristate(v.as_bool()),
                    Err(_) => Tristate::Unknown,
                },
                _ if domain.is_func(*name) || is_arithmetic(&resolved) => {
                    match evaluate(domain, state, term) {
                        Ok(v) => coerce_to_tristate(v),
                        Err(_) => Tristate::Unknown,
                    }
                }
                _ => {
                    let partial = partial_eval(domain, state, term);
                    if state.facts.contains(&partial) {
                        Tristate::True
                    } else if is_ground(&partial) {
                        Tristate::False
                    } else {
                        Tristate::Unknown
                    }
                }
            }
        }
    }
}

fn bool_tristate(b: Option<bool>) -> Tristate {
    match b {
        Some(true) => Tristate::True,
        Some(false) => Tristate::False,
        None => Tristate::Unknown,
    }
}

/// Coerce any evaluated `Value` to a truth value: booleans pass through,
/// numerics are truthy iff nonzero, symbols are always truthy (their mere
/// presence as a value is the assertion).
fn coerce_to_tristate(v: crate::term::Value) -> Tristate {
    use crate::term::Value;
    match v {
        Value::Bool(b) => bool_tristate(Some(b)),
        Value::Int(i) => bool_tristate(Some(i != 0)),
        Value::Float(f) => bool_tristate(Some(f != 0.0)),
        Value::Sym(_) => Tristate::True,
    }
}

/// Evaluate any ground subterm that is itself a function application, leave
/// the rest unchanged.
fn partial_eval(domain: &Domain, state: &State, term: &Term) -> Term {
    match term {
        Term::Compound(name, args) => {
            let new_args: Vec<Term> = args.iter().map(|a| partial_eval(domain, state, a)).collect();
            if is_ground(&Term::Compound(*name, new_args.clone()))
                && (domain.is_func(*name) || domain.is_builtin(*name))
            {
                if let Ok(v) = evaluate(domain, state, &Term::Compound(*name, new_args.clone())) {
                    return match v {
                        crate::term::Value::Sym(s) => Term::atom(s),
                        other => Term::literal(domain.intern("_value"), other),
                    };
                }
            }
            Term::Compound(*name, new_args)
        }
        other => other.clone(),
    }
}

/// Whether every term in `terms` holds in `state`, using the tri-state fast
/// path where possible and falling back to the resolver otherwise.
pub fn satisfy(domain: &Domain, state: &State, terms: &[Term]) -> Result<bool, AdlError> {
    let mut any_unknown = false;
    for t in terms {
        match check_term(domain, state, t) {
            Tristate::False => return Ok(false),
            Tristate::Unknown => any_unknown = true,
            Tristate::True => {}
        }
    }
    if !any_unknown {
        return Ok(true);
    }
    let (found, _) = satisfiers_raw(domain, state, terms)?;
    Ok(found)
}

/// Every variable substitution that satisfies `terms` in `state`: a full
/// resolver call, so it also handles free variables.
pub fn satisfiers(domain: &Domain, state: &State, terms: &[Term]) -> Result<Vec<Subst>, AdlError> {
    let (_, subs) = satisfiers_raw(domain, state, terms)?;
    Ok(subs)
}

fn satisfiers_raw(
    domain: &Domain,
    state: &State,
    terms: &[Term],
) -> Result<(bool, Vec<Subst>), AdlError> {
    let mut kb: Vec<Clause> = domain.axioms.clone();
    for t in &state.types {
        kb.push(Clause::fact(t.clone()));
    }
    for f in &state.facts {
        kb.push(Clause::fact(f.clone()));
    }
    resolve(domain, state, terms, &kb, ResolveMode::All, &domain.config)
}

/// Convenience used by the grounder: substitute then check satisfiability.
pub fn check_term_substituted(domain: &Domain, state: &State, term: &Term, subst: &Subst) -> Tristate {
    check_term(domain, state, &substitute(term, subst))
}
