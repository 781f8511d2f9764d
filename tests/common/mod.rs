//! Syntax tree builders shared by the integration tests.
#![allow(dead_code)]

use kiln::ast::{DeclScope, IfBranch, Mutability, Node, NodeKind, NumberForm, Span, TypedId};

pub fn at(start: usize) -> Span {
    Span::new(start, start + 1)
}

/// Any node, positioned at `start`.
pub fn node_at(kind: NodeKind, start: usize) -> Node {
    Node::new(kind, at(start))
}

pub fn block(statements: Vec<Node>) -> Node {
    node_at(NodeKind::Block { statements }, 0)
}

pub fn int(digits: &str) -> Node {
    number(NumberForm::Integer(digits.to_string()), None, 0)
}

pub fn number(form: NumberForm, suffix: Option<&str>, start: usize) -> Node {
    node_at(
        NodeKind::Number {
            form,
            suffix: suffix.map(str::to_string),
        },
        start,
    )
}

pub fn string(value: &str, start: usize) -> Node {
    node_at(
        NodeKind::String {
            value: value.to_string(),
        },
        start,
    )
}

pub fn boolean(value: bool) -> Node {
    node_at(NodeKind::Boolean { value }, 0)
}

pub fn id(name: &str) -> Node {
    node_at(NodeKind::Id { name: name.to_string() }, 0)
}

pub fn paren(expr: Node) -> Node {
    node_at(NodeKind::Paren { expr: Box::new(expr) }, 0)
}

pub fn call(name: &str, args: Vec<Node>, start: usize) -> Node {
    node_at(
        NodeKind::Call {
            callee: Box::new(id(name)),
            args,
        },
        start,
    )
}

pub fn unop(op: &str, expr: Node) -> Node {
    node_at(
        NodeKind::UnaryOp {
            op: op.to_string(),
            expr: Box::new(expr),
        },
        0,
    )
}

pub fn binop(op: &str, lhs: Node, rhs: Node) -> Node {
    node_at(
        NodeKind::BinaryOp {
            op: op.to_string(),
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        },
        0,
    )
}

/// `first if second else third`
pub fn ternary(first: Node, second: Node, third: Node) -> Node {
    node_at(
        NodeKind::TernaryOp {
            op: "if".to_string(),
            first: Box::new(first),
            second: Box::new(second),
            third: Box::new(third),
        },
        0,
    )
}

pub fn ret(values: Vec<Node>) -> Node {
    node_at(NodeKind::Return { values }, 0)
}

pub fn if_then(cond: Node, then: Vec<Node>) -> Node {
    node_at(
        NodeKind::If {
            branches: vec![IfBranch {
                cond,
                block: block(then),
            }],
            else_block: None,
        },
        0,
    )
}

pub fn for_num(var: &str, begin: Node, comparator: Option<&str>, end: Node, body: Vec<Node>, start: usize) -> Node {
    node_at(
        NodeKind::ForNum {
            var: TypedId::new(var, None),
            begin: Box::new(begin),
            comparator: comparator.map(str::to_string),
            end: Box::new(end),
            step: None,
            block: Box::new(block(body)),
        },
        start,
    )
}

/// `for var = begin, end, step do ... end`
pub fn for_num_by(var: &str, begin: Node, end: Node, step: Node, body: Vec<Node>, start: usize) -> Node {
    node_at(
        NodeKind::ForNum {
            var: TypedId::new(var, None),
            begin: Box::new(begin),
            comparator: None,
            end: Box::new(end),
            step: Some(Box::new(step)),
            block: Box::new(block(body)),
        },
        start,
    )
}

pub fn local(name: &str, ty: Option<&str>, value: Option<Node>) -> Node {
    node_at(
        NodeKind::VarDecl {
            scope: DeclScope::Local,
            mutability: Mutability::Var,
            vars: vec![TypedId::new(name, ty)],
            values: value.into_iter().collect(),
        },
        0,
    )
}

pub fn declaration(
    scope: DeclScope,
    mutability: Mutability,
    vars: &[(&str, Option<&str>)],
    values: Vec<Node>,
    start: usize,
) -> Node {
    node_at(
        NodeKind::VarDecl {
            scope,
            mutability,
            vars: vars.iter().map(|(name, ty)| TypedId::new(*name, *ty)).collect(),
            values,
        },
        start,
    )
}

pub fn func_def(
    scope: DeclScope,
    name: &str,
    params: &[(&str, Option<&str>)],
    returns: &[&str],
    body: Vec<Node>,
    start: usize,
) -> Node {
    node_at(
        NodeKind::FuncDef {
            scope,
            name: name.to_string(),
            params: params.iter().map(|(name, ty)| TypedId::new(*name, *ty)).collect(),
            returns: returns.iter().map(|r| r.to_string()).collect(),
            block: Box::new(block(body)),
        },
        start,
    )
}

/// `expr[index]`
pub fn index(expr: Node, index: Node) -> Node {
    node_at(
        NodeKind::ArrayIndex {
            expr: Box::new(expr),
            index: Box::new(index),
        },
        0,
    )
}

pub fn assign(targets: Vec<Node>, values: Vec<Node>, start: usize) -> Node {
    node_at(NodeKind::Assign { targets, values }, start)
}

/// Lines of the `main` body, without indentation.
pub fn main_body(code: &str) -> Vec<String> {
    let start = code.find("int main() {\n").expect("no main function") + "int main() {\n".len();
    let body = &code[start..code.len() - "}\n".len()];
    body.lines().map(|l| l.trim().to_string()).collect()
}
