//! Grounder: enumerates schema arguments against typed objects, substitutes,
//! simplifies against static fluents, normalises preconditions to CNF,
//! flattens conditional effects, and drops unsatisfiable branches.
//!
//! A fixed sequence of phases, each consuming the previous phase's output:
//! dequantify -> simplify-statics -> CNF -> flatten-conditions -> emit,
//! driven once per argument tuple.

use crate::connective::*;
use crate::domain::{ActionSchema, Domain};
use crate::effect::{effect_diff, ConditionalDiff, Effect};
use crate::error::AdlError;
use crate::state::State;
use crate::term::{substitute, Subst, Term};
use std::collections::HashMap;
use std::collections::HashSet;

pub type Cnf = Vec<Vec<Term>>;

#[derive(Debug, Clone)]
pub struct GroundAction {
    pub name: crate::base::Symbol,
    pub term: Term,
    pub preconds: Cnf,
    pub effect: Effect,
}

/// For one schema name, ground head term -> `GroundAction`.
pub type GroundActionGroup = HashMap<Term, GroundAction>;

/// Predicate symbols whose extension never appears on the left of any
/// effect in the domain (i.e. never added/deleted), across all schemas.
pub fn statics(domain: &Domain) -> HashSet<crate::base::Symbol> {
    let mut dynamic: HashSet<crate::base::Symbol> = HashSet::new();
    for action in &domain.actions {
        collect_dynamic(domain, &action.effect, &mut dynamic);
    }
    let mut statics = HashSet::new();
    for (&p, _) in &domain.predicates {
        if !dynamic.contains(&p) {
            statics.insert(p);
        }
    }
    statics
}

fn collect_dynamic(domain: &Domain, effect: &Term, out: &mut HashSet<crate::base::Symbol>) {
    if let Term::Compound(name, args) = effect {
        let resolved = domain.resolve(*name);
        match resolved.as_str() {
            AND => {
                for a in args {
                    collect_dynamic(domain, a, out);
                }
            }
            NOT => {
                if let [inner] = args.as_slice() {
                    out.insert(inner.head());
                }
            }
            WHEN => {
                if let [_cond, eff] = args.as_slice() {
                    collect_dynamic(domain, eff, out);
                }
            }
            FORALL | EXISTS => {
                if let [_v, _ty, body] = args.as_slice() {
                    collect_dynamic(domain, body, out);
                }
            }
            _ if crate::connective::is_assign_op(&resolved) => {
                if let [fluent, _] = args.as_slice() {
                    out.insert(fluent.head());
                }
            }
            _ => {
                out.insert(*name);
            }
        }
    }
}

/// Replace `forall`/`exists` over a declared type by the conjunction/
/// disjunction of substituted bodies ranging over that type's objects in
/// the given state.
/// Nullary ranges (no declared objects) yield the empty conjunction (`true`)
/// or empty disjunction (`false`), matching standard ADL semantics.
pub fn dequantify(domain: &Domain, state: &State, term: &Term) -> Term {
    match term {
        Term::Compound(name, args) => {
            let resolved = domain.resolve(*name);
            match resolved.as_str() {
                FORALL | EXISTS => {
                    if let [Term::Var(v), Term::Const(ty, _), body] = args.as_slice() {
                        let objects = domain.get_objects(state, Some(*ty));
                        let connective = if resolved == FORALL { AND } else { OR };
                        let conn_sym = domain.intern(connective);
                        let identity = if resolved == FORALL { TRUE } else { FALSE };
                        if objects.is_empty() {
                            let b = resolved == FORALL;
                            return Term::literal(domain.intern(identity), crate::term::Value::Bool(b));
                        }
                        let parts: Vec<Term> = objects
                            .iter()
                            .map(|obj| {
                                let mut subst = Subst::new();
                                subst.insert(*v, Term::atom(*obj));
                                let substituted = substitute(body, &subst);
                                dequantify(domain, state, &substituted)
                            })
                            .collect();
                        Term::Compound(conn_sym, parts)
                    } else {
                        term.clone()
                    }
                }
                WHEN => {
                    if let [cond, eff] = args.as_slice() {
                        Term::Compound(
                            *name,
                            vec![dequantify(domain, state, cond), dequantify(domain, state, eff)],
                        )
                    } else {
                        term.clone()
                    }
                }
                _ => Term::Compound(*name, args.iter().map(|a| dequantify(domain, state, a)).collect()),
            }
        }
        other => other.clone(),
    }
}

/// Fold `and`/`or`/`not`/`imply` and replace static atoms with their fixed
/// truth value in `state`. Non-static atoms and dynamic structure are left
/// as-is.
pub fn simplify_statics(
    domain: &Domain,
    state: &State,
    term: &Term,
    statics: &HashSet<crate::base::Symbol>,
) -> Term {
    let truth = |b: bool| Term::literal(domain.intern(if b { TRUE } else { FALSE }), crate::term::Value::Bool(b));
    match term {
        Term::Compound(name, args) => {
            let resolved = domain.resolve(*name);
            match resolved.as_str() {
                AND => {
                    let mut simplified = Vec::new();
                    for a in args {
                        let s = simplify_statics(domain, state, a, statics);
                        if is_false(domain, &s) {
                            return truth(false);
                        }
                        if !is_true(domain, &s) {
                            simplified.push(s);
                        }
                    }
                    if simplified.is_empty() {
                        truth(true)
                    } else if simplified.len() == 1 {
                        simplified.into_iter().next().unwrap()
                    } else {
                        Term::Compound(*name, simplified)
                    }
                }
                OR => {
                    let mut simplified = Vec::new();
                    for a in args {
                        let s = simplify_statics(domain, state, a, statics);
                        if is_true(domain, &s) {
                            return truth(true);
                        }
                        if !is_false(domain, &s) {
                            simplified.push(s);
                        }
                    }
                    if simplified.is_empty() {
                        truth(false)
                    } else if simplified.len() == 1 {
                        simplified.into_iter().next().unwrap()
                    } else {
                        Term::Compound(*name, simplified)
                    }
                }
                NOT => {
                    if let [inner] = args.as_slice() {
                        let s = simplify_statics(domain, state, inner, statics);
                        if is_true(domain, &s) {
                            truth(false)
                        } else if is_false(domain, &s) {
                            truth(true)
                        } else {
                            Term::Compound(*name, vec![s])
                        }
                    } else {
                        term.clone()
                    }
                }
                IMPLY => {
                    if let [a, b] = args.as_slice() {
                        let not_a = Term::compound(domain.intern(NOT), vec![a.clone()]);
                        let disj = Term::compound(domain.intern(OR), vec![not_a, b.clone()]);
                        simplify_statics(domain, state, &disj, statics)
                    } else {
                        term.clone()
                    }
                }
                _ if statics.contains(name) && crate::term::is_ground(term) => {
                    truth(state.facts.contains(term))
                }
                _ => term.clone(),
            }
        }
        Term::Const(name, _) if statics.contains(name) => truth(state.facts.contains(term)),
        other => other.clone(),
    }
}

fn is_true(domain: &Domain, term: &Term) -> bool {
    matches!(term, Term::Const(n, Some(v)) if domain.resolve(*n) == TRUE || v.0.as_bool() == Some(true))
}
fn is_false(domain: &Domain, term: &Term) -> bool {
    matches!(term, Term::Const(n, Some(v)) if domain.resolve(*n) == FALSE || v.0.as_bool() == Some(false))
}

/// Convert a quantifier-free boolean combination to CNF: negation normal
/// form, then distribute `or` over `and`. Sound for the modest formula sizes
/// ADL preconditions produce; not a general-purpose Tseytin transform.
pub fn to_cnf(domain: &Domain, term: &Term) -> Cnf {
    let nnf = to_nnf(domain, term, false);
    distribute(domain, &nnf)
}

fn to_nnf(domain: &Domain, term: &Term, negate: bool) -> Term {
    match term {
        Term::Compound(name, args) => {
            let resolved = domain.resolve(*name);
            match resolved.as_str() {
                AND if negate => Term::Compound(
                    domain.intern(OR),
                    args.iter().map(|a| to_nnf(domain, a, true)).collect(),
                ),
                AND => Term::Compound(*name, args.iter().map(|a| to_nnf(domain, a, false)).collect()),
                OR if negate => Term::Compound(
                    domain.intern(AND),
                    args.iter().map(|a| to_nnf(domain, a, true)).collect(),
                ),
                OR => Term::Compound(*name, args.iter().map(|a| to_nnf(domain, a, false)).collect()),
                NOT => {
                    if let [inner] = args.as_slice() {
                        to_nnf(domain, inner, !negate)
                    } else {
                        term.clone()
                    }
                }
                IMPLY => {
                    if let [a, b] = args.as_slice() {
                        let not_a = Term::compound(domain.intern(NOT), vec![a.clone()]);
                        let disj = Term::compound(domain.intern(OR), vec![not_a, b.clone()]);
                        to_nnf(domain, &disj, negate)
                    } else {
                        term.clone()
                    }
                }
                _ if negate => Term::compound(domain.intern(NOT), vec![term.clone()]),
                _ => term.clone(),
            }
        }
        other if negate => Term::compound(domain.intern(NOT), vec![other.clone()]),
        other => other.clone(),
    }
}

fn distribute(domain: &Domain, term: &Term) -> Cnf {
    match term {
        Term::Compound(name, args) if domain.resolve(*name) == AND => {
            args.iter().flat_map(|a| distribute(domain, a)).collect()
        }
        Term::Compound(name, args) if domain.resolve(*name) == OR => {
            let sub_cnfs: Vec<Cnf> = args.iter().map(|a| distribute(domain, a)).collect();
            cartesian_merge(&sub_cnfs)
        }
        literal => vec![vec![literal.clone()]],
    }
}

fn cartesian_merge(cnfs: &[Cnf]) -> Cnf {
    let mut acc: Cnf = vec![vec![]];
    for cnf in cnfs {
        let mut next = Vec::new();
        for clause in &acc {
            for disjunct_clause in cnf {
                let mut merged = clause.clone();
                merged.extend(disjunct_clause.clone());
                next.push(merged);
            }
        }
        acc = next;
    }
    acc
}

fn cnf_is_unsat(domain: &Domain, cnf: &Cnf) -> bool {
    cnf.iter().any(|clause| clause.iter().all(|lit| is_false(domain, lit)))
}

/// Top-level conjuncts become separate branches, `when(cond, eff)`
/// contributes `(cond, eff)`, unconditional effects contribute `(true,
/// eff)`.
pub fn flatten_conditions(domain: &Domain, effect: &Term) -> Vec<(Term, Term)> {
    match effect {
        Term::Compound(name, args) if domain.resolve(*name) == AND => {
            args.iter().flat_map(|a| flatten_conditions(domain, a)).collect()
        }
        Term::Compound(name, args) if domain.resolve(*name) == WHEN => {
            if let [cond, eff] = args.as_slice() {
                vec![(cond.clone(), eff.clone())]
            } else {
                vec![]
            }
        }
        other => vec![(Term::literal(domain.intern(TRUE), crate::term::Value::Bool(true)), other.clone())],
    }
}

/// Cartesian product of typed-object iterators over `params`, leftmost
/// parameter slowest, one empty-argument tuple for a nullary schema.
fn arg_tuples(domain: &Domain, state: &State, params: &[(crate::base::Symbol, crate::base::Symbol)]) -> Vec<Vec<crate::base::Symbol>> {
    if params.is_empty() {
        return vec![vec![]];
    }
    let per_param: Vec<Vec<crate::base::Symbol>> =
        params.iter().map(|(_, ty)| domain.get_objects(state, Some(*ty))).collect();
    let mut out: Vec<Vec<crate::base::Symbol>> = vec![vec![]];
    for objs in &per_param {
        let mut next = Vec::with_capacity(out.len() * objs.len());
        for prefix in &out {
            for &o in objs {
                let mut tuple = prefix.clone();
                tuple.push(o);
                next.push(tuple);
            }
        }
        out = next;
    }
    out
}

/// Grounds one action schema against the objects declared in `state`.
pub fn groundactions_for(
    domain: &Domain,
    state: &State,
    action: &ActionSchema,
    statics_set: Option<&HashSet<crate::base::Symbol>>,
) -> Result<Vec<GroundAction>, AdlError> {
    let owned_statics;
    let statics_set = match statics_set {
        Some(s) => s,
        None => {
            owned_statics = statics(domain);
            &owned_statics
        }
    };

    let dequant_precond = dequantify(domain, state, &action.precond);
    let dequant_effect = dequantify(domain, state, &action.effect);

    let mut out = Vec::new();
    let mut discarded = 0usize;
    let tuples = arg_tuples(domain, state, &action.params);
    if tuples.len() > domain.config.max_groundings_per_schema {
        tracing::warn!(schema = %domain.resolve(action.name), cap = domain.config.max_groundings_per_schema, "grounding limit hit");
        return Err(AdlError::GroundingLimit {
            schema: domain.resolve(action.name),
            cap: domain.config.max_groundings_per_schema,
        });
    }

    for args in tuples {
        let mut subst = Subst::new();
        for ((var, _), obj) in action.params.iter().zip(args.iter()) {
            subst.insert(*var, Term::atom(*obj));
        }

        let substituted_precond = substitute(&dequant_precond, &subst);
        let precond = simplify_statics(domain, state, &substituted_precond, statics_set);
        if is_false(domain, &precond) {
            discarded += 1;
            continue;
        }
        let precond_cnf = to_cnf(domain, &precond);
        if cnf_is_unsat(domain, &precond_cnf) {
            discarded += 1;
            continue;
        }
        let mut preconds: Cnf = precond_cnf
            .into_iter()
            .filter(|clause| !clause.iter().any(|lit| is_true(domain, lit)))
            .collect();

        let substituted_effect = substitute(&dequant_effect, &subst);
        let branches = flatten_conditions(domain, &substituted_effect);

        let mut conds = Vec::new();
        let mut diffs = Vec::new();
        for (cond, eff) in branches {
            let simplified_cond = simplify_statics(domain, state, &cond, statics_set);
            if is_false(domain, &simplified_cond) {
                continue;
            }
            let cond_cnf = to_cnf(domain, &simplified_cond);
            if cnf_is_unsat(domain, &cond_cnf) {
                continue;
            }
            let diff = effect_diff(domain, state, &eff)?;
            conds.push(cond_cnf);
            diffs.push(diff);
        }

        if diffs.is_empty() {
            discarded += 1;
            continue;
        }

        // Exactly one branch remains: fold its (already-simplified) cond into
        // `preconds` instead of carrying a one-branch `Conditional` around.
        let effect = if diffs.len() == 1 {
            for clause in conds.remove(0) {
                if !clause.iter().any(|lit| is_true(domain, lit)) {
                    preconds.push(clause);
                }
            }
            Effect::Generic(diffs.into_iter().next().unwrap())
        } else {
            Effect::Conditional(ConditionalDiff { conds, diffs })
        };

        let head_args: Vec<Term> = args.iter().map(|&o| Term::atom(o)).collect();
        let head = Term::compound(action.name, head_args);
        out.push(GroundAction {
            name: action.name,
            term: head,
            preconds,
            effect,
        });
    }

    if discarded > 0 {
        tracing::debug!(schema = %domain.resolve(action.name), discarded, "instantiations discarded (unsatisfiable precondition)");
    }

    Ok(out)
}

/// Grounds one action schema, keyed by its head term.
pub fn ground(domain: &Domain, state: &State, action: &ActionSchema) -> Result<GroundActionGroup, AdlError> {
    let actions = groundactions_for(domain, state, action, None)?;
    Ok(actions.into_iter().map(|ga| (ga.term.clone(), ga)).collect())
}

/// Grounds `action`, or every schema in the domain (flattened, in
/// declaration order) when `action` is `None`.
pub fn groundactions(
    domain: &Domain,
    state: &State,
    action: Option<&ActionSchema>,
) -> Result<Vec<GroundAction>, AdlError> {
    let statics_set = statics(domain);
    match action {
        Some(a) => groundactions_for(domain, state, a, Some(&statics_set)),
        None => {
            let mut out = Vec::new();
            for a in &domain.actions {
                out.extend(groundactions_for(domain, state, a, Some(&statics_set))?);
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FuncSig;

    fn blocks_domain() -> Domain {
        let mut domain = Domain::new("blocks");
        let block = domain.intern("block");
        let clear = domain.intern("clear");
        let ontable = domain.intern("ontable");
        let handempty = domain.intern("handempty");
        let holding = domain.intern("holding");
        domain.predicates.insert(clear, FuncSig { argtypes: vec![block] });
        domain.predicates.insert(ontable, FuncSig { argtypes: vec![block] });
        domain.predicates.insert(handempty, FuncSig { argtypes: vec![] });
        domain.predicates.insert(holding, FuncSig { argtypes: vec![block] });

        let pickup = domain.intern("pickup");
        let x = domain.intern("?x");
        let and = domain.intern(AND);
        let not = domain.intern(NOT);
        let precond = Term::compound(
            and,
            vec![
                Term::compound(clear, vec![Term::Var(x)]),
                Term::compound(ontable, vec![Term::Var(x)]),
                Term::atom(handempty),
            ],
        );
        let effect = Term::compound(
            and,
            vec![
                Term::compound(not, vec![Term::compound(ontable, vec![Term::Var(x)])]),
                Term::compound(not, vec![Term::compound(clear, vec![Term::Var(x)])]),
                Term::compound(not, vec![Term::atom(handempty)]),
                Term::compound(holding, vec![Term::Var(x)]),
            ],
        );
        domain.actions.push(ActionSchema {
            name: pickup,
            params: vec![(x, block)],
            precond,
            effect,
        });
        domain
    }

    fn blocks_state(domain: &Domain) -> State {
        let mut state = State::new();
        let block = domain.intern("block");
        let a = domain.intern("a");
        let b = domain.intern("b");
        let clear = domain.intern("clear");
        let ontable = domain.intern("ontable");
        let handempty = domain.intern("handempty");
        state.types.insert(Term::compound(block, vec![Term::atom(a)]));
        state.types.insert(Term::compound(block, vec![Term::atom(b)]));
        state.facts.insert(Term::compound(clear, vec![Term::atom(a)]));
        state.facts.insert(Term::compound(ontable, vec![Term::atom(a)]));
        state.facts.insert(Term::atom(handempty));
        state
    }

    #[test]
    fn grounds_one_action_per_object() {
        let domain = blocks_domain();
        let state = blocks_state(&domain);
        let action = &domain.actions[0];
        let grounded = groundactions_for(&domain, &state, action, None).unwrap();
        assert_eq!(grounded.len(), 2);
        let names: Vec<String> = grounded.iter().map(|ga| format!("{:?}", ga.term)).collect();
        assert!(names.iter().any(|n| n.contains('a')));
        assert!(names.iter().any(|n| n.contains('b')));
    }

    #[test]
    fn nullary_schema_yields_one_grounding() {
        let mut domain = Domain::new("noop");
        let noop = domain.intern("noop");
        let truth = Term::literal(domain.intern(TRUE), crate::term::Value::Bool(true));
        domain.actions.push(ActionSchema {
            name: noop,
            params: vec![],
            precond: truth.clone(),
            effect: truth,
        });
        let state = State::new();
        let grounded = groundactions_for(&domain, &state, &domain.actions[0], None).unwrap();
        assert_eq!(grounded.len(), 1);
    }
}
