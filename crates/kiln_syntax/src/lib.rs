//! Shared syntax types for the Kiln language: AST and diagnostics.
//!
//! The parser and semantic analysis live upstream; this crate only defines the tree they hand to the backend and the
//! diagnostic type every pass reports failures with.
//!
//! ## Notes
//! - The AST is (de)serializable with `serde`, so tools can exchange trees as JSON.
//! - Nodes carry byte-offset spans; the backend derives generated names from them.
//!
//! ## Examples
//! ```rust
//! use kiln_syntax::ast::{Node, NodeKind, NodeTag, Span};
//!
//! let node = Node::new(NodeKind::Id { name: "x".into() }, Span::new(3, 4));
//! assert_eq!(node.tag(), NodeTag::Id);
//! ```

pub mod ast;
pub mod diagnostics;
