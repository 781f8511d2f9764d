//! Operator vocabulary.
//!
//! The parser names operators by word (`"add"`, `"not"`, `"if"`) rather than by symbol, so the same registry serves
//! every backend. Each table lists the operators the *language* has; a backend may still reject an operator it cannot
//! lower yet.
//!
//! ## Notes
//! - Lookup via the `*_from_str` functions is **case-sensitive**.
//! - There is no precedence here: the upstream parser already encoded grouping in the tree shape.
//!
//! ## Examples
//! ```rust
//! use kiln_core::lang::operators::{self, UnaryOpId, TernaryOpId};
//!
//! assert_eq!(operators::unary_from_str("neg"), Some(UnaryOpId::Neg));
//! assert_eq!(operators::ternary_from_str("if"), Some(TernaryOpId::If));
//! assert_eq!(operators::unary_as_str(UnaryOpId::BNot), "bnot");
//! ```

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOpId {
    Not,
    Neg,
    BNot,
    Ref,
    Deref,
    Len,
    ToString,
}

/// Infix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOpId {
    // Logical
    Or,
    And,

    // Comparison
    Ne,
    Eq,
    Le,
    Ge,
    Lt,
    Gt,

    // Bitwise
    BOr,
    BXor,
    BAnd,
    Shl,
    Shr,

    // Arithmetic
    Concat,
    Add,
    Sub,
    Mul,
    Div,
    IDiv,
    Mod,
    Pow,
}

/// Three-operand operators. `a if cond else b` is the only one today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TernaryOpId {
    If,
}

/// Registry of unary operator names.
pub const UNARY_OPERATORS: &[(UnaryOpId, &str)] = &[
    (UnaryOpId::Not, "not"),
    (UnaryOpId::Neg, "neg"),
    (UnaryOpId::BNot, "bnot"),
    (UnaryOpId::Ref, "ref"),
    (UnaryOpId::Deref, "deref"),
    (UnaryOpId::Len, "len"),
    (UnaryOpId::ToString, "tostring"),
];

/// Registry of binary operator names.
pub const BINARY_OPERATORS: &[(BinaryOpId, &str)] = &[
    (BinaryOpId::Or, "or"),
    (BinaryOpId::And, "and"),
    (BinaryOpId::Ne, "ne"),
    (BinaryOpId::Eq, "eq"),
    (BinaryOpId::Le, "le"),
    (BinaryOpId::Ge, "ge"),
    (BinaryOpId::Lt, "lt"),
    (BinaryOpId::Gt, "gt"),
    (BinaryOpId::BOr, "bor"),
    (BinaryOpId::BXor, "bxor"),
    (BinaryOpId::BAnd, "band"),
    (BinaryOpId::Shl, "shl"),
    (BinaryOpId::Shr, "shr"),
    (BinaryOpId::Concat, "concat"),
    (BinaryOpId::Add, "add"),
    (BinaryOpId::Sub, "sub"),
    (BinaryOpId::Mul, "mul"),
    (BinaryOpId::Div, "div"),
    (BinaryOpId::IDiv, "idiv"),
    (BinaryOpId::Mod, "mod"),
    (BinaryOpId::Pow, "pow"),
];

pub const TERNARY_OPERATORS: &[(TernaryOpId, &str)] = &[(TernaryOpId::If, "if")];

/// Resolve a unary operator name.
pub fn unary_from_str(name: &str) -> Option<UnaryOpId> {
    UNARY_OPERATORS.iter().find(|(_, n)| *n == name).map(|(id, _)| *id)
}

/// Resolve a binary operator name.
pub fn binary_from_str(name: &str) -> Option<BinaryOpId> {
    BINARY_OPERATORS.iter().find(|(_, n)| *n == name).map(|(id, _)| *id)
}

/// Resolve a ternary operator name.
pub fn ternary_from_str(name: &str) -> Option<TernaryOpId> {
    TERNARY_OPERATORS.iter().find(|(_, n)| *n == name).map(|(id, _)| *id)
}

pub fn unary_as_str(id: UnaryOpId) -> &'static str {
    lookup_name(UNARY_OPERATORS, id)
}

pub fn binary_as_str(id: BinaryOpId) -> &'static str {
    lookup_name(BINARY_OPERATORS, id)
}

pub fn ternary_as_str(id: TernaryOpId) -> &'static str {
    lookup_name(TERNARY_OPERATORS, id)
}

fn lookup_name<T: PartialEq + Copy>(table: &[(T, &'static str)], id: T) -> &'static str {
    table
        .iter()
        .find(|(candidate, _)| *candidate == id)
        .map(|(_, name)| *name)
        .expect("INVARIANT: every operator id has a registry entry")
}
