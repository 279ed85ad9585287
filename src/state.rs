//! A planning state: typed objects, boolean facts, keyed numeric/structured
//! fluents. An explicit, clonable value rather than a hidden singleton, so a
//! search procedure can hold many states live at once.

use crate::base::Symbol;
use crate::term::{Term, Value};
use indexmap::IndexSet;
use std::collections::HashMap;

/// A fluent's value: a bare scalar (arity-0), or a sparse table keyed by
/// argument tuple (arity >= 1). Absence in the inner table means the
/// fluent's default (`false` for booleans would instead live in `facts`;
/// numeric defaults are `0`).
#[derive(Debug, Clone, PartialEq)]
pub enum ValueSlot {
    Scalar(Value),
    Table(HashMap<Vec<Value>, Value>),
}

#[derive(Debug, Clone)]
pub struct State {
    /// One entry per declared object: `Compound(type_sym, [Const(obj)])`.
    /// An `IndexSet` so `get_objects` can iterate in declaration order:
    /// grounding order depends on this, fact order does not.
    pub types: IndexSet<Term>,
    pub facts: std::collections::HashSet<Term>,
    pub values: HashMap<Symbol, ValueSlot>,
}

impl State {
    pub fn new() -> Self {
        Self {
            types: IndexSet::new(),
            facts: std::collections::HashSet::new(),
            values: HashMap::new(),
        }
    }

    /// Deep copy: `facts`/`types` are immutable terms so a shallow clone of
    /// the sets suffices, but `values`' inner tables are mutated in place by
    /// `set_fluent`, so they must be independently owned.
    pub fn copy(&self) -> State {
        self.clone()
    }

    fn arg_values(args: &[Term]) -> Vec<Value> {
        args.iter()
            .map(|t| match t {
                Term::Const(_, Some(v)) => v.0.clone(),
                Term::Const(s, None) => Value::Sym(*s),
                other => Value::Sym(other.head()),
            })
            .collect()
    }

    /// Read a fluent's current value; booleans live in `facts`, everything
    /// else in `values`.
    pub fn get_fluent(&self, term: &Term) -> Value {
        match term {
            Term::Const(name, _) => {
                if self.facts.contains(term) || self.types.contains(term) {
                    return Value::Bool(true);
                }
                match self.values.get(name) {
                    Some(ValueSlot::Scalar(v)) => v.clone(),
                    _ => Value::Bool(false),
                }
            }
            Term::Compound(name, args) => {
                if self.facts.contains(term) {
                    return Value::Bool(true);
                }
                match self.values.get(name) {
                    Some(ValueSlot::Table(tbl)) => {
                        tbl.get(&Self::arg_values(args)).cloned().unwrap_or(Value::Bool(false))
                    }
                    _ => Value::Bool(false),
                }
            }
            Term::Var(_) => Value::Bool(false),
        }
    }

    /// Boolean values route to `facts`; any other value routes to `values`,
    /// creating the inner table on demand.
    pub fn set_fluent(&mut self, term: &Term, value: Value) {
        if let Value::Bool(b) = value {
            if b {
                self.facts.insert(term.clone());
            } else {
                self.facts.remove(term);
            }
            return;
        }
        match term {
            Term::Const(name, _) => {
                self.values.insert(*name, ValueSlot::Scalar(value));
            }
            Term::Compound(name, args) => {
                let key = Self::arg_values(args);
                match self.values.entry(*name).or_insert_with(|| ValueSlot::Table(HashMap::new())) {
                    ValueSlot::Table(tbl) => {
                        tbl.insert(key, value);
                    }
                    slot @ ValueSlot::Scalar(_) => {
                        let mut tbl = HashMap::new();
                        tbl.insert(key, value);
                        *slot = ValueSlot::Table(tbl);
                    }
                }
            }
            Term::Var(_) => {}
        }
    }

    /// Enumerate all `(term, value)` pairs: `facts` (implicit `true`)
    /// followed by every entry of `values` expanded to a `Compound`/`Const`.
    pub fn get_fluents(&self, interner: &crate::base::Interner) -> Vec<(Term, Value)> {
        let mut out: Vec<(Term, Value)> = self
            .facts
            .iter()
            .map(|t| (t.clone(), Value::Bool(true)))
            .collect();
        for (&name, slot) in &self.values {
            match slot {
                ValueSlot::Scalar(v) => out.push((Term::atom(name), v.clone())),
                ValueSlot::Table(tbl) => {
                    for (args, v) in tbl {
                        let arg_terms = args
                            .iter()
                            .map(|av| match av {
                                Value::Sym(s) => Term::atom(*s),
                                other => {
                                    let placeholder = interner.intern("_value");
                                    Term::literal(placeholder, other.clone())
                                }
                            })
                            .collect();
                        out.push((Term::compound(name, arg_terms), v.clone()));
                    }
                }
            }
        }
        out
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

/// Set-equality on `types`/`facts` plus deep equality on `values`;
/// `IndexSet`/`HashSet` equality is already order-independent.
impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.types == other.types && self.facts == other.facts && self.values == other.values
    }
}
impl Eq for State {}

/// Order-independent: XOR the per-element hashes so insertion order never
/// affects the result.
impl std::hash::Hash for State {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        let mut acc: u64 = 0;
        for t in &self.types {
            acc ^= hash_one(t);
        }
        for f in &self.facts {
            acc ^= hash_one(f);
        }
        acc.hash(state);
        let mut vacc: u64 = 0;
        for (name, slot) in &self.values {
            match slot {
                ValueSlot::Scalar(v) => {
                    vacc ^= hash_one(&(*name, v));
                }
                ValueSlot::Table(tbl) => {
                    for (key, v) in tbl {
                        vacc ^= hash_one(&(*name, key, v));
                    }
                }
            }
        }
        vacc.hash(state);
    }
}

fn hash_one<T: std::hash::Hash>(t: &T) -> u64 {
    use std::hash::Hasher;
    let mut h = std::collections::hash_map::DefaultHasher::new();
    t.hash(&mut h);
    h.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Interner;

    #[test]
    fn fact_insertion_order_does_not_affect_equality_or_hash() {
        let interner = Interner::new();
        let on = interner.intern("on");
        let a = interner.intern("a");
        let b = interner.intern("b");
        let clear = interner.intern("clear");

        let mut s1 = State::new();
        s1.facts.insert(Term::compound(on, vec![Term::atom(a), Term::atom(b)]));
        s1.facts.insert(Term::atom(clear));

        let mut s2 = State::new();
        s2.facts.insert(Term::atom(clear));
        s2.facts.insert(Term::compound(on, vec![Term::atom(a), Term::atom(b)]));

        assert_eq!(s1, s2);
        assert_eq!(hash_one(&s1), hash_one(&s2));
    }

    #[test]
    fn get_set_fluent_roundtrip_scalar() {
        let interner = Interner::new();
        let cost = interner.intern("total-cost");
        let mut s = State::new();
        s.set_fluent(&Term::atom(cost), Value::Int(0));
        assert_eq!(s.get_fluent(&Term::atom(cost)), Value::Int(0));
        s.set_fluent(&Term::atom(cost), Value::Int(3));
        assert_eq!(s.get_fluent(&Term::atom(cost)), Value::Int(3));
    }

    #[test]
    fn copy_is_deep_for_nested_values() {
        let interner = Interner::new();
        let dist = interner.intern("distance");
        let a = interner.intern("a");
        let mut s1 = State::new();
        s1.set_fluent(&Term::compound(dist, vec![Term::atom(a)]), Value::Int(5));
        let mut s2 = s1.copy();
        s2.set_fluent(&Term::compound(dist, vec![Term::atom(a)]), Value::Int(9));
        assert_eq!(s1.get_fluent(&Term::compound(dist, vec![Term::atom(a)])), Value::Int(5));
        assert_eq!(s2.get_fluent(&Term::compound(dist, vec![Term::atom(a)])), Value::Int(9));
    }
}
