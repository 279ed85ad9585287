//! Integration tests exercising the crate the way a caller would: build a
//! `Domain`/`State` (or `Problem`), then drive
//! `satisfy`/`groundactions`/`available`/`execute`.

use adl_core::clause::Clause;
use adl_core::connective::{AND, NOT, WHEN};
use adl_core::domain::{ActionSchema, Domain, FuncSig};
use adl_core::effect::Effect;
use adl_core::grounder::groundactions;
use adl_core::term::{Term, Value};
use adl_core::{available, execute, satisfiers, satisfy};
use adl_core::state::State;
use rstest::rstest;

fn blocks_objects(domain: &Domain, state: &mut State, names: &[&str]) -> Vec<adl_core::Symbol> {
    let block = domain.intern("block");
    names
        .iter()
        .map(|n| {
            let sym = domain.intern(n);
            state.types.insert(Term::compound(block, vec![Term::atom(sym)]));
            sym
        })
        .collect()
}

#[test]
fn s1_build_and_query_state() {
    let domain = Domain::new("blocks");
    let mut state = State::new();
    let objs = blocks_objects(&domain, &mut state, &["a", "b"]);
    let (a, b) = (objs[0], objs[1]);
    let on = domain.intern("on");
    let clear = domain.intern("clear");
    let ontable = domain.intern("ontable");

    state.facts.insert(Term::compound(on, vec![Term::atom(a), Term::atom(b)]));
    state.facts.insert(Term::compound(clear, vec![Term::atom(a)]));
    state.facts.insert(Term::compound(ontable, vec![Term::atom(b)]));

    assert!(satisfy(&domain, &state, &[Term::compound(on, vec![Term::atom(a), Term::atom(b)])]).unwrap());
    assert!(!satisfy(&domain, &state, &[Term::compound(on, vec![Term::atom(b), Term::atom(a)])]).unwrap());

    let x = domain.intern("X");
    let y = domain.intern("Y");
    let query = Term::compound(on, vec![Term::Var(x), Term::Var(y)]);
    let subs = satisfiers(&domain, &state, &[query]).unwrap();
    assert_eq!(subs.len(), 1);
    assert_eq!(subs[0].get(&x), Some(&Term::atom(a)));
    assert_eq!(subs[0].get(&y), Some(&Term::atom(b)));
}

fn pickup_domain_and_state_with(names: &[&str]) -> (Domain, State) {
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
    domain.actions.push(ActionSchema { name: pickup, params: vec![(x, block)], precond, effect });

    let mut state = State::new();
    let objs = blocks_objects(&domain, &mut state, names);
    let a = objs[0];
    state.facts.insert(Term::compound(clear, vec![Term::atom(a)]));
    state.facts.insert(Term::compound(ontable, vec![Term::atom(a)]));
    state.facts.insert(Term::atom(handempty));

    (domain, state)
}

fn pickup_domain_and_state() -> (Domain, State) {
    pickup_domain_and_state_with(&["a", "b"])
}

#[rstest]
#[case(&["a", "b"], 2)]
#[case(&["a", "b", "c"], 3)]
#[case(&["a"], 1)]
fn s2_ground_action_schema(#[case] objects: &[&str], #[case] expected_count: usize) {
    let (domain, state) = pickup_domain_and_state_with(objects);
    let action = &domain.actions[0];
    let grounded = groundactions(&domain, &state, Some(action)).unwrap();
    assert_eq!(grounded.len(), expected_count);
}

#[test]
fn s3_execute_and_observe() {
    let (domain, state) = pickup_domain_and_state();
    let avail = available(&domain, &state).unwrap();
    assert_eq!(avail.len(), 1);

    let a = domain.intern("a");
    let pickup = domain.intern("pickup");
    assert_eq!(avail[0].term, Term::compound(pickup, vec![Term::atom(a)]));

    let next = execute(&domain, &state, &avail[0]).unwrap();
    let holding = domain.intern("holding");
    let handempty = domain.intern("handempty");
    assert!(next.facts.contains(&Term::compound(holding, vec![Term::atom(a)])));
    assert!(!next.facts.contains(&Term::atom(handempty)));
}

#[test]
fn s4_conditional_effect_yields_two_branches() {
    let mut domain = Domain::new("blocks");
    let block = domain.intern("block");
    let on = domain.intern("on");
    let clear = domain.intern("clear");
    let ontable = domain.intern("ontable");
    domain.predicates.insert(on, FuncSig { argtypes: vec![block, block] });
    domain.predicates.insert(clear, FuncSig { argtypes: vec![block] });
    domain.predicates.insert(ontable, FuncSig { argtypes: vec![block] });

    let mv = domain.intern("move");
    let x = domain.intern("?x");
    let y = domain.intern("?y");
    let z = domain.intern("?z");
    let and = domain.intern(AND);
    let not = domain.intern(NOT);
    let when = domain.intern(WHEN);

    let precond = Term::compound(on, vec![Term::Var(x), Term::Var(y)]);
    let effect = Term::compound(
        and,
        vec![
            Term::compound(not, vec![Term::compound(on, vec![Term::Var(x), Term::Var(y)])]),
            Term::compound(on, vec![Term::Var(x), Term::Var(z)]),
            Term::compound(
                when,
                vec![
                    Term::compound(clear, vec![Term::Var(z)]),
                    Term::compound(not, vec![Term::compound(clear, vec![Term::Var(z)])]),
                ],
            ),
            Term::compound(
                when,
                vec![
                    Term::compound(ontable, vec![Term::Var(x)]),
                    Term::compound(not, vec![Term::compound(ontable, vec![Term::Var(x)])]),
                ],
            ),
        ],
    );
    domain.actions.push(ActionSchema {
        name: mv,
        params: vec![(x, block), (y, block), (z, block)],
        precond,
        effect,
    });

    let mut state = State::new();
    blocks_objects(&domain, &mut state, &["a", "b", "c"]);

    let grounded = groundactions(&domain, &state, Some(&domain.actions[0])).unwrap();
    assert!(!grounded.is_empty());
    match &grounded[0].effect {
        Effect::Conditional(cond_diff) => {
            assert_eq!(cond_diff.conds.len(), 2);
            assert_eq!(cond_diff.diffs.len(), 2);
        }
        Effect::Generic(_) => panic!("expected a conditional diff with two `when` branches"),
    }
}

#[test]
fn s5_derived_predicate_via_resolver() {
    let mut domain = Domain::new("blocks");
    let on = domain.intern("on");
    let above = domain.intern("above");
    let x = domain.intern("X");
    let y = domain.intern("Y");
    let z = domain.intern("Z");

    domain.axioms.push(Clause::new(
        Term::compound(above, vec![Term::Var(x), Term::Var(y)]),
        vec![Term::compound(on, vec![Term::Var(x), Term::Var(y)])],
    ));
    domain.axioms.push(Clause::new(
        Term::compound(above, vec![Term::Var(x), Term::Var(y)]),
        vec![
            Term::compound(on, vec![Term::Var(x), Term::Var(z)]),
            Term::compound(above, vec![Term::Var(z), Term::Var(y)]),
        ],
    ));

    let mut state = State::new();
    let objs = blocks_objects(&domain, &mut state, &["a", "b", "c"]);
    let (a, b, c) = (objs[0], objs[1], objs[2]);
    state.facts.insert(Term::compound(on, vec![Term::atom(a), Term::atom(b)]));
    state.facts.insert(Term::compound(on, vec![Term::atom(b), Term::atom(c)]));

    let free_y = domain.intern("?Y");
    let query = Term::compound(above, vec![Term::atom(a), Term::Var(free_y)]);
    let subs = satisfiers(&domain, &state, &[query]).unwrap();
    assert_eq!(subs.len(), 2);
    assert_eq!(subs[0].get(&free_y), Some(&Term::atom(b)));
    assert_eq!(subs[1].get(&free_y), Some(&Term::atom(c)));
}

#[test]
fn s6_numeric_fluent_increase_composes() {
    let domain = Domain::new("cost");
    let cost = domain.intern("total-cost");
    let increase = domain.intern(adl_core::connective::INCREASE);
    let mut state = State::new();
    state.set_fluent(&Term::atom(cost), Value::Int(0));

    let delta = Term::literal(domain.intern("_"), Value::Int(3));
    let effect_term = Term::compound(increase, vec![Term::atom(cost), delta]);
    let diff = adl_core::effect::effect_diff(&domain, &state, &effect_term).unwrap();
    state = adl_core::effect::apply_generic(&state, &diff).unwrap();
    state = adl_core::effect::apply_generic(&state, &diff).unwrap();

    assert_eq!(state.get_fluent(&Term::atom(cost)), Value::Int(6));
}
