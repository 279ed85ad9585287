//! Symbol interning shared by every other module.
//!
//! A `lasso::Rodeo` owned by [`crate::domain::Domain`] hands out `Spur`s
//! instead of passing `String`s through the pipeline, since `Domain`
//! outlives every query made against it.

use lasso::Rodeo;
use std::cell::RefCell;
use std::fmt;

/// An interned symbol: a predicate, function, variable, object, or type name.
pub type Symbol = lasso::Spur;

/// Single-threaded symbol table. `State`/`Term` values refer to symbols by
/// handle; resolving back to text is only needed for connective dispatch and
/// diagnostics.
pub struct Interner {
    rodeo: RefCell<Rodeo>,
}

impl Interner {
    pub fn new() -> Self {
        Self {
            rodeo: RefCell::new(Rodeo::new()),
        }
    }

    pub fn intern(&self, s: &str) -> Symbol {
        self.rodeo.borrow_mut().get_or_intern(s)
    }

    /// Resolve a symbol back to its text. Panics if `sym` was not produced by
    /// this interner — every `Symbol` in a `Domain`/`State` pair always is.
    pub fn resolve(&self, sym: Symbol) -> String {
        self.rodeo.borrow().resolve(&sym).to_string()
    }

    pub fn get(&self, s: &str) -> Option<Symbol> {
        self.rodeo.borrow().get(s)
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Interner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Interner(..)")
    }
}
