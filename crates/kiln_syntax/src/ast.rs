//! Abstract Syntax Tree definitions for Kiln
//!
//! A [`Node`] is a tagged unit: its [`NodeKind`] variant is the tag, the variant fields are the tag-specific
//! arguments, and its [`Span`] is the source position. The tree is immutable once built.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::diagnostics::{CompileError, ErrorKind};

/// Source location span (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A node of the program tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(flatten)]
    pub kind: NodeKind,
    pub span: Span,
}

/// Tag-specific node arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tag")]
pub enum NodeKind {
    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------
    Number {
        form: NumberForm,
        #[serde(default)]
        suffix: Option<String>,
    },
    String {
        value: String,
    },
    Boolean {
        value: bool,
    },
    Nil,
    Varargs,
    Id {
        name: String,
    },
    Paren {
        expr: Box<Node>,
    },
    DotIndex {
        expr: Box<Node>,
        name: String,
    },
    ArrayIndex {
        expr: Box<Node>,
        index: Box<Node>,
    },
    Call {
        callee: Box<Node>,
        #[serde(default)]
        args: Vec<Node>,
    },
    UnaryOp {
        op: String,
        expr: Box<Node>,
    },
    BinaryOp {
        op: String,
        lhs: Box<Node>,
        rhs: Box<Node>,
    },
    /// `first if second else third` for op `"if"`.
    TernaryOp {
        op: String,
        first: Box<Node>,
        second: Box<Node>,
        third: Box<Node>,
    },

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------
    Block {
        #[serde(default)]
        statements: Vec<Node>,
    },
    Return {
        #[serde(default)]
        values: Vec<Node>,
    },
    If {
        branches: Vec<IfBranch>,
        #[serde(default)]
        else_block: Option<Box<Node>>,
    },
    Switch {
        value: Box<Node>,
        #[serde(default)]
        cases: Vec<SwitchCase>,
        #[serde(default)]
        default: Option<Box<Node>>,
    },
    Do {
        block: Box<Node>,
    },
    While {
        cond: Box<Node>,
        block: Box<Node>,
    },
    Repeat {
        block: Box<Node>,
        cond: Box<Node>,
    },
    ForNum {
        var: TypedId,
        begin: Box<Node>,
        /// Comparator name (`"le"`, `"lt"`, ...); absent means the default inclusive bound.
        #[serde(default)]
        comparator: Option<String>,
        end: Box<Node>,
        #[serde(default)]
        step: Option<Box<Node>>,
        block: Box<Node>,
    },
    ForIn {
        vars: Vec<TypedId>,
        exprs: Vec<Node>,
        block: Box<Node>,
    },
    Break,
    Continue,
    Label {
        name: String,
    },
    Goto {
        label: String,
    },
    VarDecl {
        #[serde(default)]
        scope: DeclScope,
        #[serde(default)]
        mutability: Mutability,
        vars: Vec<TypedId>,
        #[serde(default)]
        values: Vec<Node>,
    },
    Assign {
        targets: Vec<Node>,
        values: Vec<Node>,
    },
    FuncDef {
        #[serde(default)]
        scope: DeclScope,
        name: String,
        #[serde(default)]
        params: Vec<TypedId>,
        #[serde(default)]
        returns: Vec<String>,
        block: Box<Node>,
    },
}

/// Syntactic form of a number literal, with its digits as written (separators removed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberForm {
    /// `42`
    Integer(String),
    /// `3.25`
    Decimal(String),
    /// `1.5e-3`
    Scientific { mantissa: String, exponent: String },
    /// `0xff` (digits only, without the `0x` prefix)
    Hex(String),
    /// `0b101` (digits only, without the `0b` prefix)
    Binary(String),
}

/// One `if`/`elseif` arm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfBranch {
    pub cond: Node,
    pub block: Node,
}

/// One `case` arm of a `switch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchCase {
    pub value: Node,
    pub block: Node,
}

/// A declared name with an optional type annotation, e.g. `a: int32`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedId {
    pub name: String,
    #[serde(default)]
    pub ty: Option<String>,
}

impl TypedId {
    pub fn new(name: impl Into<String>, ty: Option<&str>) -> Self {
        Self {
            name: name.into(),
            ty: ty.map(str::to_string),
        }
    }
}

/// Declaration scope modifier (`local` / `global`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclScope {
    #[default]
    Local,
    Global,
}

/// Declaration mutability (`var` / `const` / `let`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mutability {
    #[default]
    Var,
    Const,
    Let,
}

/// Node discriminant, used as the dispatch key for node handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeTag {
    Number,
    String,
    Boolean,
    Nil,
    Varargs,
    Id,
    Paren,
    DotIndex,
    ArrayIndex,
    Call,
    UnaryOp,
    BinaryOp,
    TernaryOp,
    Block,
    Return,
    If,
    Switch,
    Do,
    While,
    Repeat,
    ForNum,
    ForIn,
    Break,
    Continue,
    Label,
    Goto,
    VarDecl,
    Assign,
    FuncDef,
}

impl NodeTag {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeTag::Number => "Number",
            NodeTag::String => "String",
            NodeTag::Boolean => "Boolean",
            NodeTag::Nil => "Nil",
            NodeTag::Varargs => "Varargs",
            NodeTag::Id => "Id",
            NodeTag::Paren => "Paren",
            NodeTag::DotIndex => "DotIndex",
            NodeTag::ArrayIndex => "ArrayIndex",
            NodeTag::Call => "Call",
            NodeTag::UnaryOp => "UnaryOp",
            NodeTag::BinaryOp => "BinaryOp",
            NodeTag::TernaryOp => "TernaryOp",
            NodeTag::Block => "Block",
            NodeTag::Return => "Return",
            NodeTag::If => "If",
            NodeTag::Switch => "Switch",
            NodeTag::Do => "Do",
            NodeTag::While => "While",
            NodeTag::Repeat => "Repeat",
            NodeTag::ForNum => "ForNum",
            NodeTag::ForIn => "ForIn",
            NodeTag::Break => "Break",
            NodeTag::Continue => "Continue",
            NodeTag::Label => "Label",
            NodeTag::Goto => "Goto",
            NodeTag::VarDecl => "VarDecl",
            NodeTag::Assign => "Assign",
            NodeTag::FuncDef => "FuncDef",
        }
    }

    /// Whether nodes with this tag are operator expressions.
    pub fn is_operator(self) -> bool {
        matches!(self, NodeTag::UnaryOp | NodeTag::BinaryOp | NodeTag::TernaryOp)
    }

    /// Whether nodes with this tag produce a value.
    pub fn is_expression(self) -> bool {
        matches!(
            self,
            NodeTag::Number
                | NodeTag::String
                | NodeTag::Boolean
                | NodeTag::Nil
                | NodeTag::Varargs
                | NodeTag::Id
                | NodeTag::Paren
                | NodeTag::DotIndex
                | NodeTag::ArrayIndex
                | NodeTag::Call
                | NodeTag::UnaryOp
                | NodeTag::BinaryOp
                | NodeTag::TernaryOp
        )
    }
}

impl fmt::Display for NodeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Node {
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// The node's discriminant.
    pub fn tag(&self) -> NodeTag {
        match &self.kind {
            NodeKind::Number { .. } => NodeTag::Number,
            NodeKind::String { .. } => NodeTag::String,
            NodeKind::Boolean { .. } => NodeTag::Boolean,
            NodeKind::Nil => NodeTag::Nil,
            NodeKind::Varargs => NodeTag::Varargs,
            NodeKind::Id { .. } => NodeTag::Id,
            NodeKind::Paren { .. } => NodeTag::Paren,
            NodeKind::DotIndex { .. } => NodeTag::DotIndex,
            NodeKind::ArrayIndex { .. } => NodeTag::ArrayIndex,
            NodeKind::Call { .. } => NodeTag::Call,
            NodeKind::UnaryOp { .. } => NodeTag::UnaryOp,
            NodeKind::BinaryOp { .. } => NodeTag::BinaryOp,
            NodeKind::TernaryOp { .. } => NodeTag::TernaryOp,
            NodeKind::Block { .. } => NodeTag::Block,
            NodeKind::Return { .. } => NodeTag::Return,
            NodeKind::If { .. } => NodeTag::If,
            NodeKind::Switch { .. } => NodeTag::Switch,
            NodeKind::Do { .. } => NodeTag::Do,
            NodeKind::While { .. } => NodeTag::While,
            NodeKind::Repeat { .. } => NodeTag::Repeat,
            NodeKind::ForNum { .. } => NodeTag::ForNum,
            NodeKind::ForIn { .. } => NodeTag::ForIn,
            NodeKind::Break => NodeTag::Break,
            NodeKind::Continue => NodeTag::Continue,
            NodeKind::Label { .. } => NodeTag::Label,
            NodeKind::Goto { .. } => NodeTag::Goto,
            NodeKind::VarDecl { .. } => NodeTag::VarDecl,
            NodeKind::Assign { .. } => NodeTag::Assign,
            NodeKind::FuncDef { .. } => NodeTag::FuncDef,
        }
    }

    /// Build a fatal diagnostic positioned at this node.
    pub fn error(&self, kind: ErrorKind, message: impl Into<String>) -> CompileError {
        CompileError::new(kind, message, self.span)
    }

    /// Diagnostic for a documented gap in the backend.
    pub fn unimplemented(&self, what: impl fmt::Display) -> CompileError {
        self.error(ErrorKind::Unimplemented, format!("{what} is not supported yet"))
    }

    /// Diagnostic for a handler invoked on a node of the wrong shape.
    pub fn unexpected(&self, expected: NodeTag) -> CompileError {
        self.error(
            ErrorKind::Internal,
            format!("expected a '{expected}' node, found '{}'", self.tag()),
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
