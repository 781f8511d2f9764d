//! Expression handlers.
//!
//! Expressions render inline into the sink they are given; the caller decides where the text lands. Operator
//! expressions consult the lineage to decide on parentheses: an operator whose immediate parent is itself an operator
//! wraps itself, anything else renders bare. This is sometimes redundant but never wrong.

use kiln_core::lang::operators;
use kiln_syntax::ast::{Node, NodeKind, NodeTag};
use kiln_syntax::diagnostics::ErrorKind;

use super::CodegenResult;
use super::builtins;
use super::context::GeneratorContext;
use super::sink::Sink;
use super::types::{binary_spelling, c_identifier, ternary_spelling, unary_spelling};

/// Render `nodes` separated by `, `.
pub fn emit_list(ctx: &mut GeneratorContext, nodes: &[Node], sink: &mut Sink) -> CodegenResult<()> {
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            sink.add(", ");
        }
        ctx.traverse(node, sink)?;
    }
    Ok(())
}

pub(super) fn emit_id(_ctx: &mut GeneratorContext, node: &Node, sink: &mut Sink) -> CodegenResult<()> {
    let NodeKind::Id { name } = &node.kind else {
        return Err(node.unexpected(NodeTag::Id));
    };
    sink.add(&c_identifier(name));
    Ok(())
}

pub(super) fn emit_paren(ctx: &mut GeneratorContext, node: &Node, sink: &mut Sink) -> CodegenResult<()> {
    let NodeKind::Paren { expr } = &node.kind else {
        return Err(node.unexpected(NodeTag::Paren));
    };
    ctx.add(sink, &[&"(", expr, &")"])
}

pub(super) fn emit_dot_index(ctx: &mut GeneratorContext, node: &Node, sink: &mut Sink) -> CodegenResult<()> {
    let NodeKind::DotIndex { expr, name } = &node.kind else {
        return Err(node.unexpected(NodeTag::DotIndex));
    };
    ctx.traverse(expr, sink)?;
    sink.add(".");
    sink.add(&c_identifier(name));
    Ok(())
}

pub(super) fn emit_array_index(ctx: &mut GeneratorContext, node: &Node, sink: &mut Sink) -> CodegenResult<()> {
    let NodeKind::ArrayIndex { expr, index } = &node.kind else {
        return Err(node.unexpected(NodeTag::ArrayIndex));
    };
    ctx.add(sink, &[expr, &"[", index, &"]"])
}

pub(super) fn emit_varargs(_ctx: &mut GeneratorContext, node: &Node, _sink: &mut Sink) -> CodegenResult<()> {
    Err(node.unimplemented("varargs"))
}

/// Calls to builtins with a specializer are lowered per call site; everything else is a plain C call.
pub(super) fn emit_call(ctx: &mut GeneratorContext, node: &Node, sink: &mut Sink) -> CodegenResult<()> {
    let NodeKind::Call { callee, args } = &node.kind else {
        return Err(node.unexpected(NodeTag::Call));
    };
    if let NodeKind::Id { name } = &callee.kind {
        if let Some(specialize) = builtins::specializer(name) {
            tracing::trace!(builtin = %name, span = %node.span, "specializing call");
            return specialize(ctx, node, args, sink);
        }
    }
    ctx.traverse(callee, sink)?;
    sink.add("(");
    emit_list(ctx, args, sink)?;
    sink.add(")");
    Ok(())
}

fn open_paren(ctx: &GeneratorContext, sink: &mut Sink) -> bool {
    let wrap = ctx.parent_is_operator();
    if wrap {
        sink.add("(");
    }
    wrap
}

fn close_paren(wrap: bool, sink: &mut Sink) {
    if wrap {
        sink.add(")");
    }
}

pub(super) fn emit_unary(ctx: &mut GeneratorContext, node: &Node, sink: &mut Sink) -> CodegenResult<()> {
    let NodeKind::UnaryOp { op, expr } = &node.kind else {
        return Err(node.unexpected(NodeTag::UnaryOp));
    };
    let id = operators::unary_from_str(op)
        .ok_or_else(|| node.error(ErrorKind::UnknownConstruct, format!("unknown unary operator '{op}'")))?;
    let spelling = unary_spelling(id).ok_or_else(|| node.unimplemented(format_args!("unary operator '{op}'")))?;

    let wrap = open_paren(ctx, sink);
    ctx.add(sink, &[&spelling, expr])?;
    close_paren(wrap, sink);
    Ok(())
}

pub(super) fn emit_binary(ctx: &mut GeneratorContext, node: &Node, sink: &mut Sink) -> CodegenResult<()> {
    let NodeKind::BinaryOp { op, lhs, rhs } = &node.kind else {
        return Err(node.unexpected(NodeTag::BinaryOp));
    };
    let id = operators::binary_from_str(op)
        .ok_or_else(|| node.error(ErrorKind::UnknownConstruct, format!("unknown binary operator '{op}'")))?;
    let spelling = binary_spelling(id).ok_or_else(|| node.unimplemented(format_args!("binary operator '{op}'")))?;

    let wrap = open_paren(ctx, sink);
    ctx.add(sink, &[lhs, &" ", &spelling, &" ", rhs])?;
    close_paren(wrap, sink);
    Ok(())
}

/// `first if second else third` becomes `second ? first : third`.
pub(super) fn emit_ternary(ctx: &mut GeneratorContext, node: &Node, sink: &mut Sink) -> CodegenResult<()> {
    let NodeKind::TernaryOp {
        op,
        first,
        second,
        third,
    } = &node.kind
    else {
        return Err(node.unexpected(NodeTag::TernaryOp));
    };
    let id = operators::ternary_from_str(op)
        .ok_or_else(|| node.error(ErrorKind::UnknownConstruct, format!("unknown ternary operator '{op}'")))?;
    let (question, colon) =
        ternary_spelling(id).ok_or_else(|| node.unimplemented(format_args!("ternary operator '{op}'")))?;

    let wrap = open_paren(ctx, sink);
    ctx.add(sink, &[second, &" ", &question, &" ", first, &" ", &colon, &" ", third])?;
    close_paren(wrap, sink);
    Ok(())
}
