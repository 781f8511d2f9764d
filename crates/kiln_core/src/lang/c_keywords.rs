//! C keyword vocabulary (for codegen identifier escaping).

/// Reserved keywords of C99/C11, plus identifiers the generated prelude relies on.
pub const C_KEYWORDS: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else", "enum", "extern", "float",
    "for", "goto", "if", "inline", "int", "long", "register", "restrict", "return", "short", "signed", "sizeof",
    "static", "struct", "switch", "typedef", "union", "unsigned", "void", "volatile", "while", "_Alignas", "_Alignof",
    "_Atomic", "_Bool", "_Complex", "_Generic", "_Imaginary", "_Noreturn", "_Static_assert", "_Thread_local", "bool",
    "true", "false", "NULL", "main",
];

/// Check whether an identifier is reserved in generated C.
pub fn is_keyword(name: &str) -> bool {
    C_KEYWORDS.contains(&name)
}
