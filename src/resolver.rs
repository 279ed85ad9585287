//! SLD resolution over a knowledge base of Horn clauses, with a pluggable
//! builtin function table. Implemented as an explicit choice-point stack
//! rather than native recursion, so `resolver_max_depth` bounds real memory
//! instead of the call stack.
//!
//! Forward-saturating a ruleset to a fixpoint answers only "is this ground
//! formula entailed?" — it has no notion of returning variable bindings.
//! `satisfiers` needs exactly that (`[{X=a, Y=b}]`), which is what SLD
//! resolution's goal-directed, substitution-carrying search provides and
//! forward saturation does not (see DESIGN.md).

use crate::clause::Clause;
use crate::config::EngineConfig;
use crate::connective::*;
use crate::domain::Domain;
use crate::error::AdlError;
use crate::evaluator::evaluate;
use crate::state::State;
use crate::term::{substitute, unify, Subst, Term};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveMode {
    All,
    Any,
}

struct Frame {
    goals: VecDeque<Term>,
    subst: Subst,
    depth: usize,
}

/// Resolve `goals` against `clauses`. The builtin/domain function table is
/// consulted implicitly by "ask the evaluator", since every builtin/domain
/// function is already reachable through `domain`/`state`.
pub fn resolve(
    domain: &Domain,
    state: &State,
    goals: &[Term],
    clauses: &[Clause],
    mode: ResolveMode,
    config: &EngineConfig,
) -> Result<(bool, Vec<Subst>), AdlError> {
    let mut stack = vec![Frame {
        goals: goals.iter().cloned().collect(),
        subst: Subst::new(),
        depth: 0,
    }];
    let mut solutions = Vec::new();
    let mut fresh_counter: u64 = 0;

    while let Some(Frame { mut goals, subst, depth }) = stack.pop() {
        if depth > config.resolver_max_depth {
            return Err(AdlError::ResolverLimit { depth });
        }
        let Some(goal) = goals.pop_front() else {
            solutions.push(normalize(&subst));
            if mode == ResolveMode::Any {
                return Ok((true, solutions));
            }
            continue;
        };
        let goal = substitute(&goal, &subst);
        let name = goal.head();
        let resolved_name = domain.resolve(name);

        match resolved_name.as_str() {
            AND => {
                let mut new_goals = goals.clone();
                for a in goal.args().iter().rev() {
                    new_goals.push_front(a.clone());
                }
                stack.push(Frame { goals: new_goals, subst, depth: depth + 1 });
            }
            OR => {
                // Push in reverse so the stack (LIFO) pops the first disjunct
                // first, matching the documented left-to-right goal order.
                for a in goal.args().iter().rev() {
                    let mut new_goals = goals.clone();
                    new_goals.push_front(a.clone());
                    stack.push(Frame { goals: new_goals, subst: subst.clone(), depth: depth + 1 });
                }
            }
            IMPLY => {
                // a => b  ==  not(a) or b
                if let [a, b] = goal.args() {
                    let not_a = Term::compound(domain.intern(NOT), vec![a.clone()]);
                    let disj = Term::compound(domain.intern(OR), vec![not_a, b.clone()]);
                    let mut new_goals = goals.clone();
                    new_goals.push_front(disj);
                    stack.push(Frame { goals: new_goals, subst, depth: depth + 1 });
                }
            }
            NOT => {
                if let [inner] = goal.args() {
                    let (found, _) =
                        resolve(domain, state, &[inner.clone()], clauses, ResolveMode::Any, config)?;
                    if !found {
                        stack.push(Frame { goals, subst, depth: depth + 1 });
                    }
                }
            }
            _ if is_comparison(&resolved_name) || is_arithmetic(&resolved_name) => {
                match evaluate(domain, state, &goal) {
                    Ok(v) if v.as_bool() == Some(true) => {
                        stack.push(Frame { goals, subst, depth: depth + 1 });
                    }
                    _ => {}
                }
            }
            _ => {
                // Collect matching clauses first, then push onto the stack in
                // reverse, so the stack (LIFO) pops clauses in knowledge-base
                // order — matching the documented clause-selection contract.
                let mut matched = Vec::new();
                for clause in clauses {
                    fresh_counter += 1;
                    let renamed = freshen(domain, clause, fresh_counter);
                    if let Some(unifier) = unify(&goal, &renamed.head) {
                        let mut combined = subst.clone();
                        for (k, v) in unifier {
                            combined.insert(k, substitute(&v, &subst));
                        }
                        let mut new_goals = goals.clone();
                        for b in renamed.body.iter().rev() {
                            new_goals.push_front(b.clone());
                        }
                        matched.push(Frame { goals: new_goals, subst: combined, depth: depth + 1 });
                    }
                }
                for frame in matched.into_iter().rev() {
                    stack.push(frame);
                }
            }
        }
    }

    Ok((!solutions.is_empty(), solutions))
}

/// Resolve every binding to a fixpoint: `substitute` only rewrites one level
/// of indirection, so a query variable bound to a freshened clause variable
/// (itself bound further down the chain) would otherwise come back as that
/// intermediate variable instead of the ground value it resolves to.
fn normalize(subst: &Subst) -> Subst {
    let mut out = Subst::new();
    for (k, v) in subst {
        let mut cur = v.clone();
        loop {
            let next = substitute(&cur, subst);
            if next == cur {
                break;
            }
            cur = next;
        }
        out.insert(*k, cur);
    }
    out
}

/// Rename every variable in `clause` to a fresh one, so recursive axioms
/// (e.g. S5's `above/2`) don't capture bindings across repeated uses of the
/// same clause within one resolution.
fn freshen(domain: &Domain, clause: &Clause, tag: u64) -> Clause {
    let mut seen = Subst::new();
    let head = freshen_term(domain, &clause.head, tag, &mut seen);
    let body = clause.body.iter().map(|t| freshen_term(domain, t, tag, &mut seen)).collect();
    Clause { head, body }
}

fn freshen_term(domain: &Domain, term: &Term, tag: u64, seen: &mut Subst) -> Term {
    match term {
        Term::Var(v) => seen
            .entry(*v)
            .or_insert_with(|| Term::Var(domain.intern(&format!("{}#{}", domain.resolve(*v), tag))))
            .clone(),
        Term::Const(..) => term.clone(),
        Term::Compound(name, args) => {
            Term::Compound(*name, args.iter().map(|a| freshen_term(domain, a, tag, seen)).collect())
        }
    }
}
