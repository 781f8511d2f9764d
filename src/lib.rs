#![forbid(unsafe_code)]
//! kiln: a C backend for a small Lua-like systems language
//!
//! This crate lowers a validated syntax tree into C source text that an external toolchain compiles. The syntax tree
//! and diagnostics live in `kiln_syntax`, the language vocabulary (operators, numeric types, builtin names) in
//! `kiln_core`.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: If a panic represents a compiler bug (logic error), use `.expect("INVARIANT: reason")` with a
//!   clear explanation.

pub mod backend;
pub mod cli;

pub use kiln_syntax::ast;
pub use kiln_syntax::diagnostics;

pub use backend::CGenerator;
