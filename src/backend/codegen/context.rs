//! Per-run generation state.
//!
//! [`GeneratorContext`] is created fresh for every run and threaded explicitly through every handler. It owns:
//! - the include and builtin registries (monotonic, deduplicated, emitted in first-request order),
//! - the scope stack (strict push/pop nesting),
//! - the primitive type table,
//! - the output regions,
//! - the handler registry and the lineage of tags currently being rendered.
//!
//! Nothing here is shared between runs, so independent runs can proceed on separate threads.

use std::collections::{HashMap, HashSet};

use kiln_syntax::ast::{Node, NodeTag, Span};
use kiln_syntax::diagnostics::ErrorKind;

use super::CodegenResult;
use super::builtins;
use super::config::CodegenConfig;
use super::sink::{Fragment, Region, Sink};
use super::traverser::Traverser;
use super::types::{PRIMITIVE_TYPES, TypeDescriptor};

/// One entry of the scope stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Scope {
    /// Outermost block of the run.
    pub is_top: bool,
    /// Implicit program entry point.
    pub is_main: bool,
    /// Boundary of a local function body.
    pub is_function: bool,
    /// A return statement was emitted directly in this scope.
    pub has_return: bool,
}

impl Scope {
    /// The root block: top-level and program entry point.
    pub fn top() -> Self {
        Self {
            is_top: true,
            is_main: true,
            ..Self::default()
        }
    }

    pub fn nested() -> Self {
        Self::default()
    }

    pub fn function() -> Self {
        Self {
            is_function: true,
            ..Self::default()
        }
    }
}

/// Mutable state of one generation run.
pub struct GeneratorContext {
    config: CodegenConfig,
    traverser: Traverser,
    includes: HashSet<String>,
    builtins: HashSet<String>,
    /// Generated top-level symbols (string constants, specialized helpers) and the node that owns each.
    declared: HashMap<String, Span>,
    scopes: Vec<Scope>,
    ctypes: HashMap<String, TypeDescriptor>,
    regions: [Sink; 6],
    lineage: Vec<NodeTag>,
}

impl GeneratorContext {
    pub fn new(config: CodegenConfig, traverser: Traverser) -> Self {
        let ctypes = PRIMITIVE_TYPES.iter().map(|(name, desc)| (name.to_string(), *desc)).collect();
        let width = config.indent_width;
        Self {
            config,
            traverser,
            includes: HashSet::new(),
            builtins: HashSet::new(),
            declared: HashMap::new(),
            scopes: Vec::new(),
            ctypes,
            regions: std::array::from_fn(|_| Sink::new(width)),
            lineage: Vec::new(),
        }
    }

    pub fn config(&self) -> &CodegenConfig {
        &self.config
    }

    /// A scratch sink using the configured indentation.
    pub fn new_sink(&self) -> Sink {
        Sink::new(self.config.indent_width)
    }

    pub fn region(&self, region: Region) -> &Sink {
        &self.regions[region.index()]
    }

    pub fn region_mut(&mut self, region: Region) -> &mut Sink {
        &mut self.regions[region.index()]
    }

    /// Append a complete top-level definition, separated from the previous one by a blank line.
    pub fn add_definition(&mut self, def: &Sink) {
        let defs = self.region_mut(Region::Definitions);
        if !defs.is_empty() {
            defs.add_ln("");
        }
        defs.append(def);
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Render `node` into `sink` with the handler registered for its tag.
    pub fn traverse(&mut self, node: &Node, sink: &mut Sink) -> CodegenResult<()> {
        let tag = node.tag();
        let handler = self.traverser.handler(tag).ok_or_else(|| {
            node.error(
                ErrorKind::UnknownConstruct,
                format!("no generator registered for node '{tag}'"),
            )
        })?;
        tracing::trace!(%tag, span = %node.span, "dispatch");
        self.lineage.push(tag);
        let result = handler(self, node, sink);
        self.lineage.pop();
        result
    }

    /// Append a mix of text, numbers and nodes to `sink`, in order.
    pub fn add(&mut self, sink: &mut Sink, parts: &[&dyn Fragment]) -> CodegenResult<()> {
        for part in parts {
            part.render(self, sink)?;
        }
        Ok(())
    }

    /// Like [`add`](Self::add), followed by a newline.
    pub fn add_ln(&mut self, sink: &mut Sink, parts: &[&dyn Fragment]) -> CodegenResult<()> {
        self.add(sink, parts)?;
        sink.add_ln("");
        Ok(())
    }

    /// Tag of the immediate syntactic parent of the node being rendered.
    pub fn parent_tag(&self) -> Option<NodeTag> {
        self.lineage.iter().rev().nth(1).copied()
    }

    /// Whether the node being rendered sits directly inside an operator expression.
    pub fn parent_is_operator(&self) -> bool {
        self.parent_tag().is_some_and(NodeTag::is_operator)
    }

    // ------------------------------------------------------------------
    // Registries
    // ------------------------------------------------------------------

    /// Request `#include <name>`. Returns whether this was the first request.
    pub fn add_include(&mut self, name: &str) -> bool {
        if !self.includes.insert(name.to_string()) {
            return false;
        }
        tracing::debug!(include = name, "registered include");
        self.region_mut(Region::Includes).add_fmt(format_args!("#include <{name}>\n"));
        true
    }

    pub fn has_include(&self, name: &str) -> bool {
        self.includes.contains(name)
    }

    /// Materialize builtin support code `name`, at most once per run.
    ///
    /// `at` positions the diagnostic when no materializer is known by that name.
    pub fn add_builtin(&mut self, name: &str, at: &Node) -> CodegenResult<()> {
        if self.builtins.contains(name) {
            return Ok(());
        }
        let materialize = builtins::materializer(name)
            .ok_or_else(|| at.error(ErrorKind::UnknownConstruct, format!("unknown builtin '{name}'")))?;
        // Mark first so materializers that depend on each other terminate.
        self.builtins.insert(name.to_string());
        tracing::debug!(builtin = name, "materializing builtin");
        materialize(self, at)
    }

    pub fn has_builtin(&self, name: &str) -> bool {
        self.builtins.contains(name)
    }

    /// Claim a generated top-level symbol for the node at `owner`.
    ///
    /// Generated names are derived from source positions and every node is rendered once, so a
    /// second claim means two nodes share a position and would silently share one definition.
    pub fn declare(&mut self, symbol: &str, owner: &Node) -> CodegenResult<()> {
        if let Some(first) = self.declared.get(symbol) {
            return Err(owner
                .error(
                    ErrorKind::Internal,
                    format!("generated symbol '{symbol}' is already owned by the node at {first}"),
                )
                .with_hint("every string literal and print call needs a distinct source position"));
        }
        self.declared.insert(symbol.to_string(), owner.span);
        Ok(())
    }

    /// Resolve a source type name to its C spelling, registering what the spelling needs.
    pub fn get_ctype(&mut self, at: &Node, name: &str) -> CodegenResult<&'static str> {
        let desc = self
            .ctypes
            .get(name)
            .copied()
            .ok_or_else(|| at.error(ErrorKind::UnknownConstruct, format!("unknown type '{name}'")))?;
        if let Some(include) = desc.include {
            self.add_include(include);
        }
        if let Some(builtin) = desc.builtin {
            self.add_builtin(builtin, at)?;
        }
        Ok(desc.ctype)
    }

    /// Add or replace a primitive type mapping.
    pub fn register_ctype(&mut self, name: &str, desc: TypeDescriptor) -> Option<TypeDescriptor> {
        self.ctypes.insert(name.to_string(), desc)
    }

    // ------------------------------------------------------------------
    // Scopes
    // ------------------------------------------------------------------

    pub fn push_scope(&mut self, scope: Scope) {
        self.scopes.push(scope);
    }

    pub fn pop_scope(&mut self) -> Scope {
        self.scopes.pop().expect("INVARIANT: scope pushes and pops are paired")
    }

    pub fn current_scope(&self) -> Option<&Scope> {
        self.scopes.last()
    }

    pub fn scope_depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_top(&self) -> bool {
        self.current_scope().is_some_and(|s| s.is_top)
    }

    pub fn is_main(&self) -> bool {
        self.current_scope().is_some_and(|s| s.is_main)
    }

    /// Whether the innermost enclosing function is the program entry point.
    pub fn in_main_function(&self) -> bool {
        self.scopes
            .iter()
            .rev()
            .find(|s| s.is_main || s.is_function)
            .is_some_and(|s| s.is_main)
    }

    /// Flag the innermost scope as having emitted a return.
    pub fn mark_return(&mut self) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.has_return = true;
        }
    }

    // ------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------

    /// Place the entry-point body and concatenate every non-empty region in output order.
    pub fn finish(mut self, entry_point: Sink) -> String {
        self.region_mut(Region::EntryPoint).append(&entry_point);
        Region::ORDER
            .iter()
            .map(|region| self.region(*region))
            .filter(|sink| !sink.is_empty())
            .map(Sink::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_syntax::ast::NodeKind;

    fn ctx() -> GeneratorContext {
        GeneratorContext::new(CodegenConfig::default(), Traverser::new())
    }

    fn nil() -> Node {
        Node::new(NodeKind::Nil, Span::new(2, 5))
    }

    #[test]
    fn test_add_include_is_idempotent() {
        let mut ctx = ctx();
        assert!(ctx.add_include("stdio.h"));
        assert!(!ctx.add_include("stdio.h"));
        assert!(ctx.has_include("stdio.h"));
        assert_eq!(ctx.region(Region::Includes).as_str(), "#include <stdio.h>\n");
    }

    #[test]
    fn test_add_builtin_materializes_once() {
        let mut ctx = ctx();
        ctx.add_builtin("nlstring", &nil()).unwrap();
        let first = ctx.region(Region::BuiltinDeclarations).generate();
        ctx.add_builtin("nlstring", &nil()).unwrap();
        assert_eq!(ctx.region(Region::BuiltinDeclarations).generate(), first);
        assert_eq!(first.matches("typedef struct nlstring").count(), 1);
        assert!(ctx.has_include("stdint.h"));
    }

    #[test]
    fn test_unknown_builtin_fails_at_node() {
        let mut ctx = ctx();
        let err = ctx.add_builtin("nlvector", &nil()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownConstruct);
        assert_eq!(err.span, Span::new(2, 5));
        assert!(!ctx.has_builtin("nlvector"));
    }

    #[test]
    fn test_get_ctype_registers_include() {
        let mut ctx = ctx();
        assert_eq!(ctx.get_ctype(&nil(), "uint8").unwrap(), "uint8_t");
        assert!(ctx.has_include("stdint.h"));
        assert_eq!(ctx.get_ctype(&nil(), "float32").unwrap(), "float");
    }

    #[test]
    fn test_get_ctype_string_materializes_record() {
        let mut ctx = ctx();
        assert_eq!(ctx.get_ctype(&nil(), "string").unwrap(), "nlstring*");
        assert!(ctx.has_builtin("nlstring"));
    }

    #[test]
    fn test_get_ctype_unknown() {
        let mut ctx = ctx();
        let err = ctx.get_ctype(&nil(), "int128").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownConstruct);
        assert!(err.message.contains("int128"));
    }

    #[test]
    fn test_register_ctype_overrides() {
        let mut ctx = ctx();
        let previous = ctx.register_ctype("int", TypeDescriptor::plain("long"));
        assert_eq!(previous.map(|d| d.ctype), Some("intptr_t"));
        assert_eq!(ctx.get_ctype(&nil(), "int").unwrap(), "long");
        assert!(!ctx.has_include("stdint.h"));
    }

    #[test]
    fn test_scope_roles() {
        let mut ctx = ctx();
        assert!(!ctx.is_top());
        ctx.push_scope(Scope::top());
        assert!(ctx.is_top() && ctx.is_main() && ctx.in_main_function());
        ctx.push_scope(Scope::nested());
        assert!(!ctx.is_top() && !ctx.is_main());
        assert!(ctx.in_main_function());
        ctx.push_scope(Scope::function());
        ctx.push_scope(Scope::nested());
        assert!(!ctx.in_main_function());
        assert_eq!(ctx.scope_depth(), 4);
    }

    #[test]
    fn test_mark_return_is_not_inherited() {
        let mut ctx = ctx();
        ctx.push_scope(Scope::top());
        ctx.push_scope(Scope::nested());
        ctx.mark_return();
        let inner = ctx.pop_scope();
        assert!(inner.has_return);
        assert!(!ctx.current_scope().unwrap().has_return);
    }

    #[test]
    fn test_finish_orders_regions_regardless_of_append_order() {
        let mut ctx = ctx();
        ctx.region_mut(Region::Definitions).add_ln("void f(void) {}");
        ctx.region_mut(Region::ForwardDeclarations).add_ln("void f(void);");
        ctx.add_include("stdio.h");
        let mut body = ctx.new_sink();
        body.add_ln("int main() {}");
        let out = ctx.finish(body);
        assert_eq!(
            out,
            "#include <stdio.h>\n\nvoid f(void);\n\nvoid f(void) {}\n\nint main() {}\n"
        );
    }

    #[test]
    fn test_definitions_are_blank_line_separated() {
        let mut ctx = ctx();
        let mut def = ctx.new_sink();
        def.add_ln("void f(void) {}");
        ctx.add_definition(&def);
        ctx.add_definition(&def);
        assert_eq!(
            ctx.region(Region::Definitions).as_str(),
            "void f(void) {}\n\nvoid f(void) {}\n"
        );
    }

    #[test]
    fn test_declare_rejects_second_owner() {
        let mut ctx = ctx();
        ctx.declare("__strlit_4", &nil()).unwrap();
        let other = Node::new(NodeKind::Nil, Span::new(4, 9));
        let err = ctx.declare("__strlit_4", &other).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Internal);
        assert_eq!(err.span, Span::new(4, 9));
        assert!(err.message.contains("2..5"), "{}", err.message);
        ctx.declare("__strlit_5", &other).unwrap();
    }
}
