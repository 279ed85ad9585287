//! Effect engine: converts an effect term into a structured diff and
//! applies diffs to states. A structural recursion over a connective tree,
//! accumulating add/delete/assign sets as it walks.

use crate::connective::*;
use crate::domain::Domain;
use crate::error::AdlError;
use crate::evaluator::evaluate;
use crate::state::State;
use crate::term::Term;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Increase,
    Decrease,
    ScaleUp,
    ScaleDown,
}

impl AssignOp {
    fn from_name(name: &str) -> Option<AssignOp> {
        match name {
            ASSIGN => Some(AssignOp::Assign),
            INCREASE => Some(AssignOp::Increase),
            DECREASE => Some(AssignOp::Decrease),
            SCALE_UP => Some(AssignOp::ScaleUp),
            SCALE_DOWN => Some(AssignOp::ScaleDown),
            _ => None,
        }
    }

    /// Apply this op to `(current fluent value, recorded delta value)`.
    fn apply(self, current: &crate::term::Value, delta: &crate::term::Value) -> Result<crate::term::Value, AdlError> {
        use crate::term::Value;
        if self == AssignOp::Assign {
            return Ok(delta.clone());
        }
        let cur = current.as_f64().ok_or_else(|| AdlError::TypeMismatch {
            expected: "numeric fluent",
            term: format!("{current:?}"),
        })?;
        let d = delta.as_f64().ok_or_else(|| AdlError::TypeMismatch {
            expected: "numeric delta",
            term: format!("{delta:?}"),
        })?;
        let both_int = matches!((current, delta), (Value::Int(_), Value::Int(_)));
        let result = match self {
            AssignOp::Increase => cur + d,
            AssignOp::Decrease => cur - d,
            AssignOp::ScaleUp => cur * d,
            AssignOp::ScaleDown => cur / d,
            AssignOp::Assign => unreachable!(),
        };
        Ok(if both_int {
            Value::Int(result as i64)
        } else {
            Value::Float(result)
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct GenericDiff {
    pub adds: HashSet<Term>,
    pub dels: HashSet<Term>,
    /// Ordered `(fluent, op, delta value)` — delta is evaluated against the
    /// state passed to `effect_diff` at construction time; the fluent's
    /// *current* value is read at application time, so `increase`/`decrease`
    /// compose correctly across sequential `execute` calls.
    pub assigns: Vec<(Term, AssignOp, crate::term::Value)>,
}

impl GenericDiff {
    pub fn merge(&mut self, other: GenericDiff) {
        self.adds.extend(other.adds);
        self.dels.extend(other.dels);
        self.assigns.extend(other.assigns);
    }
}

#[derive(Debug, Clone)]
pub struct ConditionalDiff {
    /// Parallel to `diffs`: `conds[i]` gates `diffs[i]`, in declaration
    /// order (the tie-breaker used when more than one branch fires at once).
    pub conds: Vec<Vec<Term>>,
    pub diffs: Vec<GenericDiff>,
}

#[derive(Debug, Clone)]
pub enum Effect {
    Generic(GenericDiff),
    Conditional(ConditionalDiff),
}

/// Converts an effect term into a structured add/delete/assign diff.
pub fn effect_diff(domain: &Domain, state: &State, effect: &Term) -> Result<GenericDiff, AdlError> {
    let mut diff = GenericDiff::default();
    accumulate(domain, state, effect, &mut diff, false)?;
    Ok(diff)
}

fn accumulate(
    domain: &Domain,
    state: &State,
    effect: &Term,
    diff: &mut GenericDiff,
    negated: bool,
) -> Result<(), AdlError> {
    match effect {
        Term::Compound(name, args) => {
            let resolved = domain.resolve(*name);
            match resolved.as_str() {
                AND => {
                    for a in args {
                        accumulate(domain, state, a, diff, negated)?;
                    }
                    Ok(())
                }
                NOT => {
                    if let [inner] = args.as_slice() {
                        if negated {
                            return Err(AdlError::MalformedEffect {
                                reason: "double negation in effect".to_string(),
                            });
                        }
                        accumulate(domain, state, inner, diff, true)
                    } else {
                        Err(AdlError::MalformedEffect {
                            reason: "`not` takes exactly one argument".to_string(),
                        })
                    }
                }
                _ if AssignOp::from_name(&resolved).is_some() => {
                    if negated {
                        return Err(AdlError::MalformedEffect {
                            reason: "numeric update under negation".to_string(),
                        });
                    }
                    let op = AssignOp::from_name(&resolved).expect("checked above");
                    if let [fluent, value_expr] = args.as_slice() {
                        let value = evaluate(domain, state, value_expr)?;
                        diff.assigns.push((fluent.clone(), op, value));
                        Ok(())
                    } else {
                        Err(AdlError::Arity {
                            symbol: resolved,
                            expected: 2,
                            got: args.len(),
                        })
                    }
                }
                WHEN | FORALL | EXISTS => Err(AdlError::MalformedEffect {
                    reason: format!("`{resolved}` must be flattened before effect_diff"),
                }),
                _ => {
                    // Atomic proposition.
                    if negated {
                        diff.dels.insert(effect.clone());
                    } else {
                        diff.adds.insert(effect.clone());
                    }
                    Ok(())
                }
            }
        }
        Term::Const(..) => {
            if negated {
                diff.dels.insert(effect.clone());
            } else {
                diff.adds.insert(effect.clone());
            }
            Ok(())
        }
        Term::Var(_) => Err(AdlError::MalformedEffect {
            reason: "effect contains an unbound variable".to_string(),
        }),
    }
}

/// Apply a `GenericDiff` to `state`, returning a new state. Deletes are
/// applied before adds (so an atom both added and deleted in one diff ends
/// up present); numeric assignments apply last, in branch/declaration
/// order.
pub fn apply_generic(state: &State, diff: &GenericDiff) -> Result<State, AdlError> {
    let mut next = state.copy();
    for d in &diff.dels {
        next.facts.remove(d);
    }
    for a in &diff.adds {
        next.facts.insert(a.clone());
    }
    for (fluent, op, delta) in &diff.assigns {
        let current = next.get_fluent(fluent);
        let new_value = op.apply(&current, delta)?;
        next.set_fluent(fluent, new_value);
    }
    Ok(next)
}

/// Apply a `ConditionalDiff`: every branch whose condition holds in `state`
/// (evaluated against the pre-transition state) merges into one combined
/// `GenericDiff`, deletes collected before adds across all branches,
/// assignments in branch order.
pub fn apply_conditional(
    domain: &Domain,
    state: &State,
    cond_diff: &ConditionalDiff,
) -> Result<State, AdlError> {
    let mut merged = GenericDiff::default();
    for (cond, branch) in cond_diff.conds.iter().zip(cond_diff.diffs.iter()) {
        let cond_terms: Vec<Term> = cond.iter().flat_map(|clause| clause.iter().cloned()).collect();
        if crate::satisfaction::satisfy(domain, state, &cond_terms)? {
            merged.merge(branch.clone());
        }
    }
    apply_generic(state, &merged)
}

pub fn apply_effect(domain: &Domain, state: &State, effect: &Effect) -> Result<State, AdlError> {
    match effect {
        Effect::Generic(d) => apply_generic(state, d),
        Effect::Conditional(c) => apply_conditional(domain, state, c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Value;

    #[test]
    fn conjunctive_effect_collects_adds_and_deletes() {
        let domain = Domain::new("blocks");
        let state = State::new();
        let and = domain.intern(AND);
        let not = domain.intern(NOT);
        let on = domain.intern("on");
        let clear = domain.intern("clear");
        let a = domain.intern("a");
        let effect = Term::compound(
            and,
            vec![
                Term::compound(not, vec![Term::atom(clear)]),
                Term::compound(on, vec![Term::atom(a)]),
            ],
        );
        let diff = effect_diff(&domain, &state, &effect).unwrap();
        assert!(diff.dels.contains(&Term::atom(clear)));
        assert!(diff.adds.contains(&Term::compound(on, vec![Term::atom(a)])));
    }

    #[test]
    fn double_negation_is_malformed() {
        let domain = Domain::new("blocks");
        let state = State::new();
        let not = domain.intern(NOT);
        let clear = domain.intern("clear");
        let effect = Term::compound(
            not,
            vec![Term::compound(not, vec![Term::atom(clear)])],
        );
        assert!(effect_diff(&domain, &state, &effect).is_err());
    }

    #[test]
    fn increase_composes_across_applications() {
        let domain = Domain::new("cost");
        let cost = domain.intern("total-cost");
        let increase = domain.intern(INCREASE);
        let mut state = State::new();
        state.set_fluent(&Term::atom(cost), Value::Int(0));

        let three = Term::literal(domain.intern("_"), Value::Int(3));
        let effect = Term::compound(increase, vec![Term::atom(cost), three]);
        let diff = effect_diff(&domain, &state, &effect).unwrap();
        state = apply_generic(&state, &diff).unwrap();
        state = apply_generic(&state, &diff).unwrap();
        assert_eq!(state.get_fluent(&Term::atom(cost)), Value::Int(6));
    }
}
