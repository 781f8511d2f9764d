//! C code generation facade
//!
//! This module provides `CGenerator`, which lowers a validated AST (rooted at a `Block`) into C source text:
//!
//! ```text
//! Node tree → Traverser (tag → handler) → Sinks (six regions) → C source
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kiln::backend::CGenerator;
//!
//! let c_code = CGenerator::new().generate(&root)?;
//! ```
//!
//! ## Module Organization
//!
//! - `traverser.rs` - Tag → handler registry
//! - `context.rs` - Per-run state: includes, builtins, scopes, type table, regions
//! - `sink.rs` - Indent-aware text buffers and output regions
//! - `types.rs` - Primitive type table and operator spellings
//! - `literals.rs` - Number, string, boolean and nil lowering
//! - `expressions.rs` - Identifiers, indexing, calls and operators
//! - `statements.rs` - Blocks, control flow, declarations and local functions
//! - `builtins.rs` - Builtin support code and the `print` specializer
//!
//! ## Error Handling
//!
//! Every failure is fatal: `generate` returns the first [`CompileError`] and no partial output.

use kiln_syntax::ast::{Node, NodeTag};
use kiln_syntax::diagnostics::{CompileError, ErrorKind};

pub mod builtins;
pub mod config;
pub mod context;
pub mod expressions;
pub mod literals;
pub mod sink;
pub mod statements;
pub mod traverser;
pub mod types;

pub use config::CodegenConfig;
pub use context::{GeneratorContext, Scope};
pub use sink::{Fragment, Region, Sink};
pub use traverser::{Handler, Traverser};

/// Result type for code generation.
pub type CodegenResult<T> = Result<T, CompileError>;

/// Registry with a handler for every node tag.
pub fn default_traverser() -> Traverser {
    let mut traverser = Traverser::new();
    let handlers: [(NodeTag, Handler); 29] = [
        // Literals
        (NodeTag::Number, literals::emit_number),
        (NodeTag::String, literals::emit_string),
        (NodeTag::Boolean, literals::emit_boolean),
        (NodeTag::Nil, literals::emit_nil),
        // Expressions
        (NodeTag::Varargs, expressions::emit_varargs),
        (NodeTag::Id, expressions::emit_id),
        (NodeTag::Paren, expressions::emit_paren),
        (NodeTag::DotIndex, expressions::emit_dot_index),
        (NodeTag::ArrayIndex, expressions::emit_array_index),
        (NodeTag::Call, expressions::emit_call),
        (NodeTag::UnaryOp, expressions::emit_unary),
        (NodeTag::BinaryOp, expressions::emit_binary),
        (NodeTag::TernaryOp, expressions::emit_ternary),
        // Statements
        (NodeTag::Block, statements::emit_block),
        (NodeTag::Return, statements::emit_return),
        (NodeTag::If, statements::emit_if),
        (NodeTag::Switch, statements::emit_switch),
        (NodeTag::Do, statements::emit_do),
        (NodeTag::While, statements::emit_while),
        (NodeTag::Repeat, statements::emit_repeat),
        (NodeTag::ForNum, statements::emit_for_num),
        (NodeTag::ForIn, statements::emit_for_in),
        (NodeTag::Break, statements::emit_break),
        (NodeTag::Continue, statements::emit_continue),
        (NodeTag::Label, statements::emit_label),
        (NodeTag::Goto, statements::emit_goto),
        (NodeTag::VarDecl, statements::emit_var_decl),
        (NodeTag::Assign, statements::emit_assign),
        (NodeTag::FuncDef, statements::emit_func_def),
    ];
    for (tag, handler) in handlers {
        traverser.register(tag, handler);
    }
    traverser
}

/// C code generator.
///
/// Holds configuration and the handler registry; each call to [`generate`](Self::generate) creates a fresh
/// [`GeneratorContext`], so one generator can serve any number of independent runs.
#[derive(Clone, Debug)]
pub struct CGenerator {
    config: CodegenConfig,
    traverser: Traverser,
}

impl Default for CGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CGenerator {
    /// Generator with the default configuration and every handler registered.
    pub fn new() -> Self {
        Self::with_config(CodegenConfig::default())
    }

    pub fn with_config(config: CodegenConfig) -> Self {
        Self {
            config,
            traverser: default_traverser(),
        }
    }

    /// Generator with a caller-supplied registry, which may leave tags unhandled.
    pub fn with_traverser(config: CodegenConfig, traverser: Traverser) -> Self {
        Self { config, traverser }
    }

    /// Bind `handler` to `tag`, returning the handler it replaces.
    pub fn register(&mut self, tag: NodeTag, handler: Handler) -> Option<Handler> {
        self.traverser.register(tag, handler)
    }

    pub fn config(&self) -> &CodegenConfig {
        &self.config
    }

    /// Lower the program rooted at `root` to C source text.
    ///
    /// # Errors
    ///
    /// Returns the first diagnostic raised by any handler, or `UnknownConstruct` if `root` is not a block.
    #[tracing::instrument(skip_all, fields(indent_width = self.config.indent_width))]
    pub fn generate(&self, root: &Node) -> CodegenResult<String> {
        if root.tag() != NodeTag::Block {
            return Err(root.error(
                ErrorKind::UnknownConstruct,
                format!("program root must be a 'Block' node, found '{}'", root.tag()),
            ));
        }
        let mut ctx = GeneratorContext::new(self.config.clone(), self.traverser.clone());
        let mut body = ctx.new_sink();
        ctx.traverse(root, &mut body)?;
        let output = ctx.finish(body);
        tracing::debug!(bytes = output.len(), "generated C source");
        Ok(output)
    }
}
