//! C spellings for source-level vocabulary: primitive types, operators, identifiers.
//!
//! Everything here is a pure table lookup keyed by `kiln_core` IDs or source spellings. A `None` from the operator
//! tables means the language has the operator but this backend cannot lower it yet.

use std::borrow::Cow;

use kiln_core::lang::c_keywords;
use kiln_core::lang::operators::{BinaryOpId, TernaryOpId, UnaryOpId};

/// Target spelling of a source type, plus what the spelling needs to compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeDescriptor {
    /// C type spelling
    pub ctype: &'static str,
    /// System header that declares the type
    pub include: Option<&'static str>,
    /// Builtin support code that defines the type
    pub builtin: Option<&'static str>,
}

impl TypeDescriptor {
    pub const fn plain(ctype: &'static str) -> Self {
        Self {
            ctype,
            include: None,
            builtin: None,
        }
    }

    pub const fn with_include(ctype: &'static str, include: &'static str) -> Self {
        Self {
            ctype,
            include: Some(include),
            builtin: None,
        }
    }

    pub const fn with_builtin(ctype: &'static str, builtin: &'static str) -> Self {
        Self {
            ctype,
            include: None,
            builtin: Some(builtin),
        }
    }
}

/// Source type name → C type. Numeric names match `kiln_core::lang::numerics` canonical spellings.
pub const PRIMITIVE_TYPES: &[(&str, TypeDescriptor)] = &[
    ("int", TypeDescriptor::with_include("intptr_t", "stdint.h")),
    ("isize", TypeDescriptor::with_include("intptr_t", "stdint.h")),
    ("int8", TypeDescriptor::with_include("int8_t", "stdint.h")),
    ("int16", TypeDescriptor::with_include("int16_t", "stdint.h")),
    ("int32", TypeDescriptor::with_include("int32_t", "stdint.h")),
    ("int64", TypeDescriptor::with_include("int64_t", "stdint.h")),
    ("uint", TypeDescriptor::with_include("uintptr_t", "stdint.h")),
    ("usize", TypeDescriptor::with_include("uintptr_t", "stdint.h")),
    ("uint8", TypeDescriptor::with_include("uint8_t", "stdint.h")),
    ("uint16", TypeDescriptor::with_include("uint16_t", "stdint.h")),
    ("uint32", TypeDescriptor::with_include("uint32_t", "stdint.h")),
    ("uint64", TypeDescriptor::with_include("uint64_t", "stdint.h")),
    ("float", TypeDescriptor::plain("double")),
    ("float32", TypeDescriptor::plain("float")),
    ("float64", TypeDescriptor::plain("double")),
    ("boolean", TypeDescriptor::with_include("bool", "stdbool.h")),
    ("bool", TypeDescriptor::with_include("bool", "stdbool.h")),
    ("string", TypeDescriptor::with_builtin("nlstring*", super::builtins::NLSTRING)),
    ("pointer", TypeDescriptor::plain("void*")),
    ("char", TypeDescriptor::plain("char")),
    ("cstring", TypeDescriptor::plain("char*")),
];

pub fn unary_spelling(id: UnaryOpId) -> Option<&'static str> {
    match id {
        UnaryOpId::Not => Some("!"),
        UnaryOpId::Neg => Some("-"),
        UnaryOpId::BNot => Some("~"),
        UnaryOpId::Ref => Some("&"),
        UnaryOpId::Deref => Some("*"),
        UnaryOpId::Len | UnaryOpId::ToString => None,
    }
}

pub fn binary_spelling(id: BinaryOpId) -> Option<&'static str> {
    match id {
        BinaryOpId::Or => Some("||"),
        BinaryOpId::And => Some("&&"),
        BinaryOpId::Ne => Some("!="),
        BinaryOpId::Eq => Some("=="),
        BinaryOpId::Le => Some("<="),
        BinaryOpId::Ge => Some(">="),
        BinaryOpId::Lt => Some("<"),
        BinaryOpId::Gt => Some(">"),
        BinaryOpId::BOr => Some("|"),
        BinaryOpId::BXor => Some("^"),
        BinaryOpId::BAnd => Some("&"),
        BinaryOpId::Shl => Some("<<"),
        BinaryOpId::Shr => Some(">>"),
        BinaryOpId::Add => Some("+"),
        BinaryOpId::Sub => Some("-"),
        BinaryOpId::Mul => Some("*"),
        BinaryOpId::Div => Some("/"),
        BinaryOpId::Mod => Some("%"),
        BinaryOpId::Concat | BinaryOpId::IDiv | BinaryOpId::Pow => None,
    }
}

/// The two separators of a ternary operator, e.g. `("?", ":")`.
pub fn ternary_spelling(id: TernaryOpId) -> Option<(&'static str, &'static str)> {
    match id {
        TernaryOpId::If => Some(("?", ":")),
    }
}

/// Library names referenced by the generated prelude and print helpers.
const RUNTIME_NAMES: &[&str] = &[
    super::builtins::NLSTRING,
    super::builtins::NLSTRING_PRINT,
    "printf",
    "fputc",
    "fflush",
    "fwrite",
    "stdout",
    "stderr",
    "stdin",
];

/// Whether a source identifier would clash with something the generated C already names.
///
/// Generated symbols (`__strlit_N`, `__print_N`, loop temporaries) all start with `__`, which is also reserved to the
/// C implementation, so user names with that prefix are never emitted verbatim.
pub fn is_reserved_identifier(name: &str) -> bool {
    c_keywords::is_keyword(name)
        || name.starts_with("__")
        || RUNTIME_NAMES.contains(&name)
        || PRIMITIVE_TYPES
            .iter()
            .any(|(_, desc)| desc.ctype.trim_end_matches('*') == name)
}

/// Escape reserved identifiers by adding a trailing `_`.
///
/// An escaped `__` name ends in `_`, which no generated symbol does, so escaping cannot create a new collision.
pub fn c_identifier(name: &str) -> Cow<'_, str> {
    if is_reserved_identifier(name) {
        Cow::Owned(format!("{name}_"))
    } else {
        Cow::Borrowed(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_core::lang::numerics::{self, NUMERIC_TYPES};

    fn lookup(name: &str) -> Option<TypeDescriptor> {
        PRIMITIVE_TYPES.iter().find(|(n, _)| *n == name).map(|(_, d)| *d)
    }

    #[test]
    fn test_every_numeric_type_has_a_ctype() {
        for t in NUMERIC_TYPES {
            assert!(lookup(numerics::as_str(t.id)).is_some(), "missing ctype for {}", t.canonical);
        }
    }

    #[test]
    fn test_pointer_sized_types_share_spelling() {
        assert_eq!(lookup("uint").map(|d| d.ctype), Some("uintptr_t"));
        assert_eq!(lookup("usize").map(|d| d.ctype), Some("uintptr_t"));
        assert_eq!(lookup("isize"), lookup("int"));
    }

    #[test]
    fn test_string_requires_builtin() {
        let string = lookup("string").unwrap();
        assert_eq!(string.builtin, Some("nlstring"));
        assert_eq!(string.include, None);
    }

    #[test]
    fn test_operator_gaps() {
        assert_eq!(binary_spelling(BinaryOpId::Pow), None);
        assert_eq!(binary_spelling(BinaryOpId::Shl), Some("<<"));
        assert_eq!(unary_spelling(UnaryOpId::Len), None);
        assert_eq!(unary_spelling(UnaryOpId::Not), Some("!"));
        assert_eq!(ternary_spelling(TernaryOpId::If), Some(("?", ":")));
    }

    #[test]
    fn test_c_identifier_escapes_keywords() {
        assert_eq!(c_identifier("int"), "int_");
        assert_eq!(c_identifier("main"), "main_");
        assert_eq!(c_identifier("count"), "count");
    }

    #[test]
    fn test_c_identifier_escapes_runtime_names() {
        for name in ["nlstring", "nlstring_print", "printf", "fputc", "fflush", "fwrite", "stdout"] {
            assert_eq!(c_identifier(name), format!("{name}_"));
        }
        assert_eq!(c_identifier("intptr_t"), "intptr_t_");
        assert_eq!(c_identifier("uint64_t"), "uint64_t_");
        assert_eq!(c_identifier("print"), "print");
        assert_eq!(c_identifier("string"), "string");
    }

    #[test]
    fn test_c_identifier_escapes_generated_prefix() {
        assert_eq!(c_identifier("__strlit_0"), "__strlit_0_");
        assert_eq!(c_identifier("__print_12"), "__print_12_");
        assert_eq!(c_identifier("__i_end"), "__i_end_");
        assert_eq!(c_identifier("_private"), "_private");
    }
}
