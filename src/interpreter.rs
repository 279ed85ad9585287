//! Top-level interpreter operations: `available`, `execute`, `transition`,
//! `relevant`, `regress` — the five operations a planning caller actually
//! needs to drive a domain/state pair forward (or backward, for search).

use crate::connective::NOT;
use crate::domain::Domain;
use crate::effect::{apply_effect, Effect};
use crate::error::AdlError;
use crate::grounder::{groundactions, GroundAction};
use crate::problem::goal_literals;
use crate::satisfaction::{check_term, satisfy, Tristate};
use crate::state::State;
use crate::term::Term;
use std::collections::HashSet;

/// Grounded actions whose preconditions are satisfied in `state`.
pub fn available(domain: &Domain, state: &State) -> Result<Vec<GroundAction>, AdlError> {
    let grounded = groundactions(domain, state, None)?;
    let mut out = Vec::new();
    for ga in grounded {
        if precond_holds(domain, state, &ga.preconds)? {
            out.push(ga);
        }
    }
    Ok(out)
}

/// A CNF precondition holds iff every clause has at least one true literal,
/// falling back to the resolver (via `satisfy`) for any literal the
/// three-valued fast path can't decide directly.
fn precond_holds(domain: &Domain, state: &State, preconds: &[Vec<Term>]) -> Result<bool, AdlError> {
    for clause in preconds {
        let mut clause_true = false;
        for lit in clause {
            match check_term(domain, state, lit) {
                Tristate::True => {
                    clause_true = true;
                    break;
                }
                Tristate::False => {}
                Tristate::Unknown => {
                    if satisfy(domain, state, std::slice::from_ref(lit))? {
                        clause_true = true;
                        break;
                    }
                }
            }
        }
        if !clause_true {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Apply the ground action's diff, returning a new state.
pub fn execute(domain: &Domain, state: &State, ground_action: &GroundAction) -> Result<State, AdlError> {
    apply_effect(domain, state, &ground_action.effect)
}

/// Resolve `term` (a ground action head, e.g. `pickup(a)`) to a
/// `GroundAction` via a fresh grounding pass, then `execute` it. Grounds
/// once and looks the term up, so this always agrees with a separate
/// `ground`-then-`execute` call over the same term, by construction.
pub fn transition(domain: &Domain, state: &State, term: &Term) -> Result<State, AdlError> {
    let grounded = groundactions(domain, state, None)?;
    let ga = grounded
        .iter()
        .find(|g| &g.term == term)
        .ok_or_else(|| AdlError::UnknownSymbol {
            name: format!("no ground action matches `{term:?}`"),
        })?;
    execute(domain, state, ga)
}

/// The set of atoms an effect can add/delete, across every `ConditionalDiff`
/// branch (used by `relevant`/`regress`, which reason about an action's
/// footprint without knowing which branches will fire in a given state).
fn effect_footprint(effect: &Effect) -> (HashSet<Term>, HashSet<Term>) {
    match effect {
        Effect::Generic(d) => (d.adds.clone(), d.dels.clone()),
        Effect::Conditional(c) => {
            let mut adds = HashSet::new();
            let mut dels = HashSet::new();
            for d in &c.diffs {
                adds.extend(d.adds.iter().cloned());
                dels.extend(d.dels.iter().cloned());
            }
            (adds, dels)
        }
    }
}

/// Grounded actions whose effect footprint intersects the goal's
/// required-true or required-false atoms — the standard backward-search
/// relevance test (an action can only make progress toward a goal atom by
/// adding it, or toward a negated goal atom by deleting it).
pub fn relevant(domain: &Domain, state: &State, goal: &Term) -> Result<Vec<GroundAction>, AdlError> {
    let (must_true, must_false) = goal_literals(domain, goal)?;
    let grounded = groundactions(domain, state, None)?;
    Ok(grounded
        .into_iter()
        .filter(|ga| {
            let (adds, dels) = effect_footprint(&ga.effect);
            adds.iter().any(|a| must_true.contains(a)) || dels.iter().any(|d| must_false.contains(d))
        })
        .collect())
}

/// The classical STRIPS regression `(state \ adds) ∪ preconds`. Only
/// singleton, non-negated
/// precondition clauses contribute atoms back (a disjunctive or negated
/// clause has no single atom whose truth regression can assert); numeric
/// assignments are not regressed (undoing `increase`/`decrease` requires
/// knowing the pre-action value, which regression-from-a-goal does not
/// have) — both are documented simplifications, not full STRIPS regression.
pub fn regress(domain: &Domain, state: &State, ground_action: &GroundAction) -> Result<State, AdlError> {
    let (adds, _dels) = effect_footprint(&ground_action.effect);
    let mut next = state.copy();
    for a in &adds {
        next.facts.remove(a);
    }
    for clause in &ground_action.preconds {
        if let [single] = clause.as_slice() {
            let is_negated = matches!(single, Term::Compound(n, _) if domain.resolve(*n) == NOT);
            if !is_negated {
                next.facts.insert(single.clone());
            }
        }
    }
    Ok(next)
}
