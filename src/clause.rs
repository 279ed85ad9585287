//! Horn clauses: a head `Term` and an ordered body. Used for derived-
//! predicate axioms and, during resolution, to encode facts/types as unit
//! clauses (empty body).

use crate::term::Term;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Clause {
    pub head: Term,
    pub body: Vec<Term>,
}

impl Clause {
    pub fn new(head: Term, body: Vec<Term>) -> Self {
        Self { head, body }
    }

    /// A unit clause (fact/type assertion): `head :- true.`
    pub fn fact(head: Term) -> Self {
        Self { head, body: Vec::new() }
    }
}
