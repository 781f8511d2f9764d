//! Provide the canonical language vocabulary shared by the Kiln compiler and its tooling.
//!
//! This crate is intentionally small and dependency-free. It contains pure registries that describe the *source*
//! language: operator names, numeric type families and literal suffixes, builtin function names, and the reserved
//! words of the C target that generated identifiers must avoid.
//!
//! ## Notes
//!
//! - This is a vocabulary crate: **no IO**, no global state, and no AST or backend types.
//! - Target spellings (C operators, C types, `printf` directives) live in the backend, keyed by the stable IDs defined
//!   here.

pub mod lang;
