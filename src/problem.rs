//! Problem definitions: objects, initial facts/values, and a goal condition,
//! plus the two constructors (`initstate`, `goalstate`) that are the only
//! things in the pipeline allowed to build a `State` from scratch.

use crate::base::Symbol;
use crate::connective::{AND, NOT};
use crate::domain::Domain;
use crate::error::AdlError;
use crate::state::State;
use crate::term::{Term, Value};
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct Problem {
    pub name: String,
    /// `(object, type)` pairs, in declaration order.
    pub objects: Vec<(Symbol, Symbol)>,
    pub init_facts: HashSet<Term>,
    pub init_values: Vec<(Term, Value)>,
    pub goal: Term,
}

impl Problem {
    pub fn new(name: impl Into<String>, goal: Term) -> Self {
        Self {
            name: name.into(),
            objects: Vec::new(),
            init_facts: HashSet::new(),
            init_values: Vec::new(),
            goal,
        }
    }
}

/// Builds the initial `State` from a problem's declared objects, facts, and
/// fluent values.
pub fn initstate(problem: &Problem) -> State {
    let mut state = State::new();
    for (obj, ty) in &problem.objects {
        state.types.insert(Term::compound(*ty, vec![Term::atom(*obj)]));
    }
    for f in &problem.init_facts {
        state.facts.insert(f.clone());
    }
    for (term, value) in &problem.init_values {
        state.set_fluent(term, value.clone());
    }
    state
}

/// The goal as a partial state: only the facts it requires are present.
/// Walks `and`/`not`/atomic structure in the goal
/// term and records every positively-required atom as a fact of the
/// returned state; negatively-required atoms are recorded only implicitly
/// (by omission — a fact absent from a correctly-constructed state already
/// reads as false). Comparisons/arithmetic terms are not representable as
/// "required facts" and are rejected with `MalformedEffect`, since a goal
/// of that shape needs `satisfy`, not state subsumption.
pub fn goalstate(domain: &Domain, problem: &Problem) -> Result<State, AdlError> {
    let mut state = State::new();
    let (must_true, _must_false) = goal_literals(domain, &problem.goal)?;
    for t in must_true {
        state.facts.insert(t);
    }
    Ok(state)
}

/// Split a goal term into `(atoms that must hold, atoms that must not
/// hold)`. Shared by `goalstate` and `interpreter::relevant`.
pub(crate) fn goal_literals(
    domain: &Domain,
    goal: &Term,
) -> Result<(HashSet<Term>, HashSet<Term>), AdlError> {
    let mut must_true = HashSet::new();
    let mut must_false = HashSet::new();
    collect_goal(domain, goal, false, &mut must_true, &mut must_false)?;
    Ok((must_true, must_false))
}

fn collect_goal(
    domain: &Domain,
    term: &Term,
    negated: bool,
    must_true: &mut HashSet<Term>,
    must_false: &mut HashSet<Term>,
) -> Result<(), AdlError> {
    match term {
        Term::Compound(name, args) => {
            let resolved = domain.resolve(*name);
            match resolved.as_str() {
                AND => {
                    for a in args {
                        collect_goal(domain, a, negated, must_true, must_false)?;
                    }
                    Ok(())
                }
                NOT => {
                    if let [inner] = args.as_slice() {
                        collect_goal(domain, inner, !negated, must_true, must_false)
                    } else {
                        Err(AdlError::MalformedEffect {
                            reason: "`not` takes exactly one argument".to_string(),
                        })
                    }
                }
                _ if crate::connective::is_comparison(&resolved)
                    || crate::connective::is_arithmetic(&resolved) =>
                {
                    Err(AdlError::MalformedEffect {
                        reason: format!(
                            "goal condition `{resolved}` is not representable as a partial state; use `satisfy` instead"
                        ),
                    })
                }
                _ => {
                    if negated {
                        must_false.insert(term.clone());
                    } else {
                        must_true.insert(term.clone());
                    }
                    Ok(())
                }
            }
        }
        Term::Const(..) => {
            if negated {
                must_false.insert(term.clone());
            } else {
                must_true.insert(term.clone());
            }
            Ok(())
        }
        Term::Var(_) => Err(AdlError::MalformedEffect {
            reason: "goal contains an unbound variable".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Domain;

    #[test]
    fn initstate_populates_types_facts_and_values() {
        let domain = Domain::new("blocks");
        let block = domain.intern("block");
        let a = domain.intern("a");
        let clear = domain.intern("clear");
        let cost = domain.intern("total-cost");

        let mut problem = Problem::new("p1", Term::atom(clear));
        problem.objects.push((a, block));
        problem.init_facts.insert(Term::compound(clear, vec![Term::atom(a)]));
        problem.init_values.push((Term::atom(cost), Value::Int(0)));

        let state = initstate(&problem);
        assert!(state.types.contains(&Term::compound(block, vec![Term::atom(a)])));
        assert!(state.facts.contains(&Term::compound(clear, vec![Term::atom(a)])));
        assert_eq!(state.get_fluent(&Term::atom(cost)), Value::Int(0));
    }

    #[test]
    fn goalstate_collects_positive_conjuncts() {
        let domain = Domain::new("blocks");
        let and = domain.intern(AND);
        let not = domain.intern(NOT);
        let on = domain.intern("on");
        let clear = domain.intern("clear");
        let a = domain.intern("a");
        let b = domain.intern("b");
        let goal = Term::compound(
            and,
            vec![
                Term::compound(on, vec![Term::atom(a), Term::atom(b)]),
                Term::compound(not, vec![Term::compound(clear, vec![Term::atom(b)])]),
            ],
        );
        let problem = Problem::new("p1", goal);
        let state = goalstate(&domain, &problem).unwrap();
        assert!(state.facts.contains(&Term::compound(on, vec![Term::atom(a), Term::atom(b)])));
        assert!(!state.facts.contains(&Term::compound(clear, vec![Term::atom(b)])));
    }
}
