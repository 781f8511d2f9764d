//! Builtin function vocabulary.
//!
//! Builtins are functions the backend lowers itself instead of calling a user definition. Whether a builtin is
//! lowered per call site is a backend decision; this registry only answers "is this name a builtin".
//!
//! ## Examples
//! ```rust
//! use kiln_core::lang::builtins::{self, BuiltinFnId};
//!
//! assert_eq!(builtins::from_str("print"), Some(BuiltinFnId::Print));
//! assert_eq!(builtins::as_str(BuiltinFnId::Print), "print");
//! ```

/// Stable identifier for a builtin function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinFnId {
    Print,
}

/// Metadata for a builtin function.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinFnInfo {
    pub id: BuiltinFnId,
    pub canonical: &'static str,
    pub description: &'static str,
}

/// Registry of all builtin functions.
pub const BUILTIN_FUNCTIONS: &[BuiltinFnInfo] = &[BuiltinFnInfo {
    id: BuiltinFnId::Print,
    canonical: "print",
    description: "Write the arguments to stdout separated by tabs, followed by a newline.",
}];

/// Resolve a callee name to a builtin. Lookup is case-sensitive.
pub fn from_str(name: &str) -> Option<BuiltinFnId> {
    BUILTIN_FUNCTIONS.iter().find(|b| b.canonical == name).map(|b| b.id)
}

/// Return the canonical spelling for a builtin.
pub fn as_str(id: BuiltinFnId) -> &'static str {
    match id {
        BuiltinFnId::Print => "print",
    }
}
