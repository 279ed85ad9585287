//! Evaluator: reduces ground terms to `Value`s using the state and the
//! builtin/domain function registries. One small recursive match, no lookup
//! tables beyond the domain's own.

use crate::domain::Domain;
use crate::error::AdlError;
use crate::funcs::apply_builtin;
use crate::state::State;
use crate::term::{substitute, Subst, Term, Value};

pub fn evaluate(domain: &Domain, state: &State, term: &Term) -> Result<Value, AdlError> {
    match term {
        Term::Var(v) => Err(AdlError::UnknownSymbol {
            name: format!("unbound variable {}", domain.resolve(*v)),
        }),
        Term::Const(name, literal) => {
            if let Some(v) = literal {
                return Ok(v.0.clone());
            }
            // A bare name: if it is a declared 0-arity fluent, read its
            // current state value; otherwise it is an atomic symbol.
            if domain.predicates.contains_key(name) || domain.functions.contains_key(name) {
                Ok(state.get_fluent(term))
            } else {
                Ok(Value::Sym(*name))
            }
        }
        Term::Compound(name, args) => {
            let resolved = domain.resolve(*name);
            if let Some(result) = apply_builtin(&resolved, &eval_args(domain, state, args)?) {
                return result;
            }
            if let Some(def) = domain.funcdefs.get(name).cloned() {
                if def.params.len() != args.len() {
                    return Err(AdlError::Arity {
                        symbol: resolved,
                        expected: def.params.len(),
                        got: args.len(),
                    });
                }
                let mut subst = Subst::new();
                for (param, arg) in def.params.iter().zip(args.iter()) {
                    subst.insert(*param, arg.clone());
                }
                let bound_body = substitute(&def.body, &subst);
                return evaluate(domain, state, &bound_body);
            }
            // Not a builtin or defined function: a fluent lookup. Arguments
            // must already be ground (or ground after evaluation of nested
            // functions) to index the fluent's table.
            let ground_args: Result<Vec<Term>, AdlError> = args
                .iter()
                .map(|a| ground_subterm(domain, state, a))
                .collect();
            let ground_term = Term::Compound(*name, ground_args?);
            Ok(state.get_fluent(&ground_term))
        }
    }
}

fn eval_args(domain: &Domain, state: &State, args: &[Term]) -> Result<Vec<Value>, AdlError> {
    args.iter().map(|a| evaluate(domain, state, a)).collect()
}

/// Reduce a subterm to a ground `Const` if it is itself a function
/// application; leave already-ground/atomic terms untouched.
fn ground_subterm(domain: &Domain, state: &State, term: &Term) -> Result<Term, AdlError> {
    match term {
        Term::Compound(name, _) if domain.is_func(*name) || domain.is_builtin(*name) => {
            let v = evaluate(domain, state, term)?;
            Ok(value_to_term(domain, v))
        }
        other => Ok(other.clone()),
    }
}

fn value_to_term(domain: &Domain, v: Value) -> Term {
    match v {
        Value::Sym(s) => Term::atom(s),
        other => Term::literal(domain.intern("_value"), other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Value;

    #[test]
    fn evaluates_nested_arithmetic() {
        let domain = Domain::new("test");
        let state = State::new();
        let plus = domain.intern("+");
        let term = Term::compound(
            plus,
            vec![Term::literal(domain.intern("_"), Value::Int(2)), Term::literal(domain.intern("_"), Value::Int(3))],
        );
        assert_eq!(evaluate(&domain, &state, &term).unwrap(), Value::Int(5));
    }

    #[test]
    fn reads_scalar_fluent() {
        let mut domain = Domain::new("test");
        let cost = domain.intern("total-cost");
        domain.functions.insert(cost, crate::domain::FuncSig { argtypes: vec![] });
        let mut state = State::new();
        state.set_fluent(&Term::atom(cost), Value::Int(6));
        assert_eq!(evaluate(&domain, &state, &Term::atom(cost)).unwrap(), Value::Int(6));
    }
}
