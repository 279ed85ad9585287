//! Reserved compound names: connectives, quantifiers, and effect operators.
//! A `Compound` is one of these iff its functor resolves (via the domain's
//! interner) to one of these strings — user predicates never collide
//! because these names are reserved.

pub const AND: &str = "and";
pub const OR: &str = "or";
pub const NOT: &str = "not";
pub const IMPLY: &str = "imply";
pub const FORALL: &str = "forall";
pub const EXISTS: &str = "exists";
pub const WHEN: &str = "when";

pub const ASSIGN: &str = "assign";
pub const INCREASE: &str = "increase";
pub const DECREASE: &str = "decrease";
pub const SCALE_UP: &str = "scale-up";
pub const SCALE_DOWN: &str = "scale-down";

pub const EQ: &str = "=";
pub const LT: &str = "<";
pub const LE: &str = "<=";
pub const GT: &str = ">";
pub const GE: &str = ">=";
pub const NE: &str = "!=";
pub const PLUS: &str = "+";
pub const MINUS: &str = "-";
pub const TIMES: &str = "*";
pub const DIV: &str = "/";

pub const TRUE: &str = "true";
pub const FALSE: &str = "false";

pub fn is_comparison(name: &str) -> bool {
    matches!(name, EQ | LT | LE | GT | GE | NE)
}

pub fn is_arithmetic(name: &str) -> bool {
    matches!(name, PLUS | MINUS | TIMES | DIV)
}

pub fn is_assign_op(name: &str) -> bool {
    matches!(name, ASSIGN | INCREASE | DECREASE | SCALE_UP | SCALE_DOWN)
}
