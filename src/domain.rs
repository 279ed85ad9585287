//! Domain model: type hierarchy, predicate/function signatures, action
//! schemas, derived-predicate axioms, declared constants.

use crate::base::{Interner, Symbol};
use crate::clause::Clause;
use crate::config::EngineConfig;
use crate::error::AdlError;
use crate::funcs::apply_builtin;
use crate::state::State;
use crate::term::{is_ground, Term};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct ActionSchema {
    pub name: Symbol,
    /// Ordered `(var, type)` parameters.
    pub params: Vec<(Symbol, Symbol)>,
    pub precond: Term,
    pub effect: Term,
}

#[derive(Debug, Clone)]
pub struct FuncSig {
    pub argtypes: Vec<Symbol>,
}

/// A domain-defined numeric function (`funcdefs`): parameters plus a body
/// `Term` evaluated against the calling state.
#[derive(Debug, Clone)]
pub struct FuncDef {
    pub params: Vec<Symbol>,
    pub body: Term,
}

pub struct Domain {
    pub name: String,
    pub interner: Interner,
    pub config: EngineConfig,
    /// subtype -> supertypes (multiple supertypes permitted).
    pub type_hierarchy: HashMap<Symbol, Vec<Symbol>>,
    pub predicates: HashMap<Symbol, FuncSig>,
    pub functions: HashMap<Symbol, FuncSig>,
    pub funcdefs: HashMap<Symbol, FuncDef>,
    pub actions: Vec<ActionSchema>,
    pub axioms: Vec<Clause>,
    pub constants: HashMap<Symbol, Symbol>,
}

impl Domain {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            interner: Interner::new(),
            config: EngineConfig::default(),
            type_hierarchy: HashMap::new(),
            predicates: HashMap::new(),
            functions: HashMap::new(),
            funcdefs: HashMap::new(),
            actions: Vec::new(),
            axioms: Vec::new(),
            constants: HashMap::new(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn intern(&self, s: &str) -> Symbol {
        self.interner.intern(s)
    }

    pub fn resolve(&self, s: Symbol) -> String {
        self.interner.resolve(s)
    }

    /// All declared supertypes of `ty`, transitively, including `ty` itself.
    pub fn supertypes_of(&self, ty: Symbol) -> Vec<Symbol> {
        let mut out = vec![ty];
        let mut frontier = vec![ty];
        while let Some(t) = frontier.pop() {
            if let Some(supers) = self.type_hierarchy.get(&t) {
                for &s in supers {
                    if !out.contains(&s) {
                        out.push(s);
                        frontier.push(s);
                    }
                }
            }
        }
        out
    }

    /// Objects declared with `ty` or any of its subtypes, in declaration
    /// order (or every declared object, if `ty` is `None`).
    pub fn get_objects(&self, state: &State, ty: Option<Symbol>) -> Vec<Symbol> {
        let mut out = Vec::new();
        for t in &state.types {
            if let Term::Compound(type_sym, args) = t {
                if let Some(Term::Const(obj, _)) = args.first() {
                    let matches = match ty {
                        None => true,
                        Some(want) => *type_sym == want || self.has_subtype_of(*type_sym, want),
                    };
                    if matches {
                        out.push(*obj);
                    }
                }
            }
        }
        out
    }

    fn has_subtype_of(&self, declared: Symbol, ancestor: Symbol) -> bool {
        self.supertypes_of(declared).contains(&ancestor)
    }

    /// Object -> its declared type.
    pub fn get_objtypes(&self, state: &State) -> HashMap<Symbol, Symbol> {
        let mut out = HashMap::new();
        for t in &state.types {
            if let Term::Compound(type_sym, args) = t {
                if let Some(Term::Const(obj, _)) = args.first() {
                    out.insert(*obj, *type_sym);
                }
            }
        }
        out
    }

    pub fn get_clauses(&self) -> &[Clause] {
        &self.axioms
    }

    pub fn get_actions(&self) -> &[ActionSchema] {
        &self.actions
    }

    pub fn get_argtypes(&self, action: &ActionSchema) -> Vec<Symbol> {
        action.params.iter().map(|(_, t)| *t).collect()
    }

    pub fn get_argvars(&self, action: &ActionSchema) -> Vec<Symbol> {
        action.params.iter().map(|(v, _)| *v).collect()
    }

    /// A type predicate is one named after a declared type (e.g.
    /// `block(?x)`); `has_subtypes` says whether its truth is ambiguous
    /// without knowing the object's exact declared type. A leaf type with no
    /// sub/supertype relation (blocks-world's `block`, say) never appears in
    /// `type_hierarchy`, so it's also recognized by being the type of some
    /// declared object in `state` or some declared constant.
    pub fn is_type(&self, state: &State, name: Symbol) -> bool {
        self.type_hierarchy.contains_key(&name)
            || self.type_hierarchy.values().flatten().any(|s| *s == name)
            || self.constants.values().any(|t| *t == name)
            || state.types.iter().any(|t| matches!(t, Term::Compound(n, _) if *n == name))
    }

    pub fn has_subtypes(&self, ty: Symbol) -> bool {
        self.type_hierarchy.values().any(|supers| supers.contains(&ty))
    }

    pub fn is_func(&self, name: Symbol) -> bool {
        self.functions.contains_key(&name) || self.funcdefs.contains_key(&name)
    }

    pub fn is_builtin(&self, name: Symbol) -> bool {
        apply_builtin(&self.resolve(name), &[]).is_some()
            || matches!(self.resolve(name).as_str(), "+" | "-" | "*" | "/" | "=" | "<" | "<=" | ">" | ">=" | "!=")
    }

    pub fn is_derived(&self, name: Symbol) -> bool {
        self.axioms.iter().any(|c| c.head.head() == name)
    }

    pub fn get_constants(&self) -> &HashMap<Symbol, Symbol> {
        &self.constants
    }

    /// Structural sanity pass: every action's free variables appear among
    /// its parameters, and every predicate/function referenced in a
    /// precondition or effect is declared (or a reserved connective).
    pub fn validate(&self) -> Result<(), AdlError> {
        for action in &self.actions {
            let params: std::collections::HashSet<Symbol> =
                action.params.iter().map(|(v, _)| *v).collect();
            self.check_vars_bound(&action.precond, &params)?;
            self.check_vars_bound(&action.effect, &params)?;
        }
        Ok(())
    }

    fn check_vars_bound(
        &self,
        term: &Term,
        bound: &std::collections::HashSet<Symbol>,
    ) -> Result<(), AdlError> {
        match term {
            Term::Var(v) => {
                if !bound.contains(v) {
                    return Err(AdlError::UnknownSymbol {
                        name: format!("free variable {}", self.resolve(*v)),
                    });
                }
                Ok(())
            }
            Term::Const(..) => Ok(()),
            Term::Compound(name, args) => {
                let resolved = self.resolve(*name);
                let mut inner_bound = bound.clone();
                if matches!(resolved.as_str(), "forall" | "exists") {
                    if let [Term::Var(v), _ty, body] = args.as_slice() {
                        inner_bound.insert(*v);
                        return self.check_vars_bound(body, &inner_bound);
                    }
                }
                for a in args {
                    self.check_vars_bound(a, &inner_bound)?;
                }
                Ok(())
            }
        }
    }

    /// Used only to decide whether a ground non-builtin, non-derived
    /// `Compound`/`Const` is "well-formed enough" to check against facts.
    pub fn is_ground_query(term: &Term) -> bool {
        is_ground(term)
    }
}
