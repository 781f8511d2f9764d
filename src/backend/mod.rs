//! kiln compiler backend
//!
//! This module lowers a validated syntax tree to C source text. The pipeline is:
//! 1. Root `Block` node → `CGenerator` → C source text
//! 2. An external C toolchain finishes compilation (not part of this crate)
//!
//! ## Module Organization
//!
//! - `codegen/` - Code generation from the syntax tree to C
//!   - `mod.rs` - `CGenerator` entry point and the default handler registry
//!   - `traverser.rs` - Tag → handler dispatch
//!   - `context.rs` - Per-run generation state
//!   - `sink.rs` - Indent-aware output buffers and regions
//!   - `types.rs` - Primitive type table and operator spellings
//!   - `literals.rs` / `expressions.rs` / `statements.rs` - Node handlers
//!   - `builtins.rs` - Builtin support code and call-site specialization

pub mod codegen;

pub use codegen::{CGenerator, CodegenConfig, CodegenResult, GeneratorContext, Handler, Region, Sink, Traverser};
