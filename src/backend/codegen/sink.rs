//! Indent-aware text sinks and the output regions they back.
//!
//! A [`Sink`] is an append-only buffer with its own indentation counter. A run owns one sink per [`Region`] plus any
//! scratch sinks handlers create (a function body is rendered into a scratch sink and then appended to
//! [`Region::Definitions`]). Regions are concatenated in [`Region::ORDER`] no matter when content was appended, which is
//! what lets a statement deep in the body register a forward declaration that appears earlier in the output.

use std::fmt;

use kiln_syntax::ast::Node;

use super::CodegenResult;
use super::context::GeneratorContext;

/// A buffer for building C source text with indentation tracking
#[derive(Debug, Clone)]
pub struct Sink {
    buffer: String,
    indent_level: usize,
    indent_width: usize,
}

impl Default for Sink {
    fn default() -> Self {
        Self::new(4)
    }
}

impl Sink {
    pub fn new(indent_width: usize) -> Self {
        Self {
            buffer: String::new(),
            indent_level: 0,
            indent_width,
        }
    }

    /// Write text without newline
    pub fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    /// Write text followed by a newline
    pub fn add_ln(&mut self, text: &str) {
        self.buffer.push_str(text);
        self.buffer.push('\n');
    }

    /// Write formatted text
    pub fn add_fmt(&mut self, args: fmt::Arguments<'_>) {
        let _ = fmt::Write::write_fmt(&mut self.buffer, args);
    }

    /// Write indentation only
    pub fn add_indent(&mut self) {
        for _ in 0..self.indent_level * self.indent_width {
            self.buffer.push(' ');
        }
    }

    /// Write a line with current indentation
    pub fn add_indent_ln(&mut self, text: &str) {
        self.add_indent();
        self.add_ln(text);
    }

    /// Increase indent level
    pub fn inc_indent(&mut self) {
        self.indent_level += 1;
    }

    /// Decrease indent level
    pub fn dec_indent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    pub fn indent_level(&self) -> usize {
        self.indent_level
    }

    /// Append everything another sink has accumulated.
    pub fn append(&mut self, other: &Sink) {
        self.buffer.push_str(&other.buffer);
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Get current buffer as string slice
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Get the generated text
    pub fn generate(&self) -> String {
        self.buffer.clone()
    }
}

/// Named output regions of one run, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Includes,
    BuiltinDeclarations,
    BuiltinDefinitions,
    ForwardDeclarations,
    Definitions,
    EntryPoint,
}

impl Region {
    /// Final concatenation order.
    pub const ORDER: [Region; 6] = [
        Region::Includes,
        Region::BuiltinDeclarations,
        Region::BuiltinDefinitions,
        Region::ForwardDeclarations,
        Region::Definitions,
        Region::EntryPoint,
    ];

    pub(super) fn index(self) -> usize {
        match self {
            Region::Includes => 0,
            Region::BuiltinDeclarations => 1,
            Region::BuiltinDefinitions => 2,
            Region::ForwardDeclarations => 3,
            Region::Definitions => 4,
            Region::EntryPoint => 5,
        }
    }
}

/// Anything that can be appended to a sink: literal text, numbers, or nodes rendered by recursive dispatch.
///
/// See [`GeneratorContext::add`].
pub trait Fragment {
    fn render(&self, ctx: &mut GeneratorContext, sink: &mut Sink) -> CodegenResult<()>;
}

impl Fragment for str {
    fn render(&self, _ctx: &mut GeneratorContext, sink: &mut Sink) -> CodegenResult<()> {
        sink.add(self);
        Ok(())
    }
}

impl Fragment for String {
    fn render(&self, _ctx: &mut GeneratorContext, sink: &mut Sink) -> CodegenResult<()> {
        sink.add(self);
        Ok(())
    }
}

impl Fragment for usize {
    fn render(&self, _ctx: &mut GeneratorContext, sink: &mut Sink) -> CodegenResult<()> {
        sink.add_fmt(format_args!("{self}"));
        Ok(())
    }
}

impl Fragment for i64 {
    fn render(&self, _ctx: &mut GeneratorContext, sink: &mut Sink) -> CodegenResult<()> {
        sink.add_fmt(format_args!("{self}"));
        Ok(())
    }
}

impl Fragment for Node {
    fn render(&self, ctx: &mut GeneratorContext, sink: &mut Sink) -> CodegenResult<()> {
        ctx.traverse(self, sink)
    }
}

impl Fragment for Box<Node> {
    fn render(&self, ctx: &mut GeneratorContext, sink: &mut Sink) -> CodegenResult<()> {
        ctx.traverse(self, sink)
    }
}

impl<T: Fragment + ?Sized> Fragment for &T {
    fn render(&self, ctx: &mut GeneratorContext, sink: &mut Sink) -> CodegenResult<()> {
        (**self).render(ctx, sink)
    }
}
