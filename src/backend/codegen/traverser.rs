//! Tag-dispatched handler registry.
//!
//! [`NodeKind`](kiln_syntax::ast::NodeKind) is a closed enum, so every node has a tag; what can be missing is a handler
//! for it. The default registry (see [`super::default_traverser`]) covers every tag. Custom registries may override or
//! leave tags out, and dispatching an unregistered tag fails with a diagnostic instead of silently emitting nothing.

use std::collections::HashMap;
use std::fmt;

use kiln_syntax::ast::{Node, NodeTag};

use super::CodegenResult;
use super::context::GeneratorContext;
use super::sink::Sink;

/// Render one node into a sink.
///
/// Handlers return nothing but success or a diagnostic; all output goes through the sink, so the same handler renders
/// a statement into a body sink or a sub-expression inline into an argument list.
pub type Handler = fn(&mut GeneratorContext, &Node, &mut Sink) -> CodegenResult<()>;

/// Registry mapping node tags to handlers.
#[derive(Clone, Default)]
pub struct Traverser {
    handlers: HashMap<NodeTag, Handler>,
}

impl Traverser {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `handler` to `tag`, returning the handler it replaces.
    pub fn register(&mut self, tag: NodeTag, handler: Handler) -> Option<Handler> {
        self.handlers.insert(tag, handler)
    }

    /// Look up the handler for `tag`.
    pub fn handler(&self, tag: NodeTag) -> Option<Handler> {
        self.handlers.get(&tag).copied()
    }

    pub fn is_registered(&self, tag: NodeTag) -> bool {
        self.handlers.contains_key(&tag)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for Traverser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<&str> = self.handlers.keys().map(|t| t.as_str()).collect();
        tags.sort_unstable();
        f.debug_struct("Traverser").field("tags", &tags).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emit_a(_: &mut GeneratorContext, _: &Node, sink: &mut Sink) -> CodegenResult<()> {
        sink.add("a");
        Ok(())
    }

    fn emit_b(_: &mut GeneratorContext, _: &Node, sink: &mut Sink) -> CodegenResult<()> {
        sink.add("b");
        Ok(())
    }

    #[test]
    fn test_empty_registry() {
        let traverser = Traverser::new();
        assert!(traverser.is_empty());
        assert!(traverser.handler(NodeTag::Id).is_none());
    }

    #[test]
    fn test_register_returns_previous_handler() {
        let mut traverser = Traverser::new();
        assert!(traverser.register(NodeTag::Id, emit_a).is_none());
        assert!(traverser.register(NodeTag::Id, emit_b).is_some());
        assert_eq!(traverser.len(), 1);
        assert!(traverser.is_registered(NodeTag::Id));
        assert!(!traverser.is_registered(NodeTag::Nil));
    }

    #[test]
    fn test_debug_lists_sorted_tags() {
        let mut traverser = Traverser::new();
        traverser.register(NodeTag::Nil, emit_a);
        traverser.register(NodeTag::Break, emit_b);
        assert_eq!(format!("{traverser:?}"), r#"Traverser { tags: ["Break", "Nil"] }"#);
    }
}
