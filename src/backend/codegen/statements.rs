//! Statement and scope generation.
//!
//! Statement handlers write whole lines, including their own indentation, into the sink they are given. Every block
//! pushes one [`Scope`]; the outermost block of a run is both top-level and the program entry point and is wrapped in
//! `int main() { ... }`. When the entry-point scope closes without having emitted a return, `return 0;` is synthesized
//! so the program always reports success on fall-through.

use kiln_core::lang::operators::{self, BinaryOpId};
use kiln_syntax::ast::{DeclScope, IfBranch, Mutability, Node, NodeKind, NodeTag, SwitchCase, TypedId};
use kiln_syntax::diagnostics::ErrorKind;

use super::CodegenResult;
use super::context::{GeneratorContext, Scope};
use super::literals::literal_ctype;
use super::sink::{Region, Sink};
use super::types::c_identifier;

// ============================================================================
// Blocks
// ============================================================================

pub(super) fn emit_block(ctx: &mut GeneratorContext, node: &Node, sink: &mut Sink) -> CodegenResult<()> {
    let NodeKind::Block { statements } = &node.kind else {
        return Err(node.unexpected(NodeTag::Block));
    };

    let top = ctx.scope_depth() == 0;
    if top {
        sink.add_ln("int main() {");
        sink.inc_indent();
        ctx.push_scope(Scope::top());
    } else {
        ctx.push_scope(Scope::nested());
    }

    for statement in statements {
        emit_statement(ctx, statement, sink)?;
    }

    if ctx.is_main() && !ctx.current_scope().is_some_and(|s| s.has_return) {
        sink.add_indent_ln("return 0;");
    }
    ctx.pop_scope();

    if top {
        sink.dec_indent();
        sink.add_ln("}");
    }
    Ok(())
}

/// Expressions in statement position (calls, mostly) get their own line and a `;`.
fn emit_statement(ctx: &mut GeneratorContext, statement: &Node, sink: &mut Sink) -> CodegenResult<()> {
    let tag = statement.tag();
    if tag.is_expression() {
        sink.add_indent();
        ctx.traverse(statement, sink)?;
        sink.add_ln(";");
        Ok(())
    } else if tag == NodeTag::Block {
        emit_braced(ctx, statement, sink)
    } else {
        ctx.traverse(statement, sink)
    }
}

/// Render `block` one level deeper than the surrounding line.
fn emit_nested(ctx: &mut GeneratorContext, block: &Node, sink: &mut Sink) -> CodegenResult<()> {
    sink.inc_indent();
    let result = ctx.traverse(block, sink);
    sink.dec_indent();
    result
}

fn emit_braced(ctx: &mut GeneratorContext, block: &Node, sink: &mut Sink) -> CodegenResult<()> {
    sink.add_indent_ln("{");
    emit_nested(ctx, block, sink)?;
    sink.add_indent_ln("}");
    Ok(())
}

pub(super) fn emit_do(ctx: &mut GeneratorContext, node: &Node, sink: &mut Sink) -> CodegenResult<()> {
    let NodeKind::Do { block } = &node.kind else {
        return Err(node.unexpected(NodeTag::Do));
    };
    emit_braced(ctx, block, sink)
}

// ============================================================================
// Control flow
// ============================================================================

pub(super) fn emit_if(ctx: &mut GeneratorContext, node: &Node, sink: &mut Sink) -> CodegenResult<()> {
    let NodeKind::If { branches, else_block } = &node.kind else {
        return Err(node.unexpected(NodeTag::If));
    };
    let Some((first, rest)) = branches.split_first() else {
        return Err(node.error(ErrorKind::Internal, "if statement has no branches"));
    };

    let IfBranch { cond, block } = first;
    sink.add_indent();
    ctx.add_ln(sink, &[&"if (", cond, &") {"])?;
    emit_nested(ctx, block, sink)?;

    for IfBranch { cond, block } in rest {
        sink.add_indent();
        ctx.add_ln(sink, &[&"} else if (", cond, &") {"])?;
        emit_nested(ctx, block, sink)?;
    }

    if let Some(block) = else_block {
        sink.add_indent_ln("} else {");
        emit_nested(ctx, block, sink)?;
    }
    sink.add_indent_ln("}");
    Ok(())
}

/// Every arm is braced and closed with a synthesized `break;`, so arms never fall through.
pub(super) fn emit_switch(ctx: &mut GeneratorContext, node: &Node, sink: &mut Sink) -> CodegenResult<()> {
    let NodeKind::Switch { value, cases, default } = &node.kind else {
        return Err(node.unexpected(NodeTag::Switch));
    };

    sink.add_indent();
    ctx.add_ln(sink, &[&"switch (", value, &") {"])?;
    sink.inc_indent();
    for SwitchCase { value, block } in cases {
        sink.add_indent();
        ctx.add_ln(sink, &[&"case ", value, &": {"])?;
        emit_arm(ctx, block, sink)?;
    }
    if let Some(block) = default {
        sink.add_indent_ln("default: {");
        emit_arm(ctx, block, sink)?;
    }
    sink.dec_indent();
    sink.add_indent_ln("}");
    Ok(())
}

fn emit_arm(ctx: &mut GeneratorContext, block: &Node, sink: &mut Sink) -> CodegenResult<()> {
    emit_nested(ctx, block, sink)?;
    sink.inc_indent();
    sink.add_indent_ln("break;");
    sink.dec_indent();
    sink.add_indent_ln("}");
    Ok(())
}

pub(super) fn emit_while(ctx: &mut GeneratorContext, node: &Node, sink: &mut Sink) -> CodegenResult<()> {
    let NodeKind::While { cond, block } = &node.kind else {
        return Err(node.unexpected(NodeTag::While));
    };
    sink.add_indent();
    ctx.add_ln(sink, &[&"while (", cond, &") {"])?;
    emit_nested(ctx, block, sink)?;
    sink.add_indent_ln("}");
    Ok(())
}

pub(super) fn emit_repeat(ctx: &mut GeneratorContext, node: &Node, sink: &mut Sink) -> CodegenResult<()> {
    let NodeKind::Repeat { block, cond } = &node.kind else {
        return Err(node.unexpected(NodeTag::Repeat));
    };
    sink.add_indent_ln("do {");
    emit_nested(ctx, block, sink)?;
    sink.add_indent();
    ctx.add_ln(sink, &[&"} while (!(", cond, &"));"])
}

/// Ascending, inclusive numeric loops only:
/// `for (T __i_begin = begin, __i_end = end, i = __i_begin; i <= __i_end; ++i)`.
pub(super) fn emit_for_num(ctx: &mut GeneratorContext, node: &Node, sink: &mut Sink) -> CodegenResult<()> {
    let NodeKind::ForNum {
        var,
        begin,
        comparator,
        end,
        step,
        block,
    } = &node.kind
    else {
        return Err(node.unexpected(NodeTag::ForNum));
    };
    let inclusive = |c: &&str| operators::binary_from_str(c) == Some(BinaryOpId::Le);
    if let Some(comparator) = comparator.as_deref().filter(|c| !inclusive(c)) {
        return Err(node
            .unimplemented(format_args!("for loop comparator '{comparator}'"))
            .with_hint("numeric for loops only support an ascending, inclusive '<=' bound"));
    }

    let ctype = match var.ty.as_deref() {
        Some(ty) => ctx.get_ctype(node, ty)?,
        None => literal_ctype(ctx, begin)?.ok_or_else(|| {
            node.unimplemented(format_args!("inferring the type of loop variable '{}'", var.name))
                .with_hint("annotate the loop variable or start it from a literal")
        })?,
    };
    // Bounds and step are evaluated once, before the loop variable shadows an outer binding of the same name.
    let name = c_identifier(&var.name).into_owned();
    let begin_name = format!("__{name}_begin");
    let end_name = format!("__{name}_end");

    sink.add_indent();
    ctx.add(sink, &[&"for (", &ctype, &" ", &begin_name, &" = ", begin])?;
    ctx.add(sink, &[&", ", &end_name, &" = ", end])?;
    let increment = match step {
        Some(step) => {
            let step_name = format!("__{name}_step");
            ctx.add(sink, &[&", ", &step_name, &" = ", step])?;
            format!("{name} += {step_name}")
        }
        None => format!("++{name}"),
    };
    ctx.add(sink, &[&", ", &name, &" = ", &begin_name])?;
    ctx.add(sink, &[&"; ", &name, &" <= ", &end_name, &"; ", &increment])?;
    sink.add_ln(") {");
    emit_nested(ctx, block, sink)?;
    sink.add_indent_ln("}");
    Ok(())
}

pub(super) fn emit_for_in(_ctx: &mut GeneratorContext, node: &Node, _sink: &mut Sink) -> CodegenResult<()> {
    Err(node.unimplemented("for in loops"))
}

// ============================================================================
// Jumps
// ============================================================================

pub(super) fn emit_break(_ctx: &mut GeneratorContext, _node: &Node, sink: &mut Sink) -> CodegenResult<()> {
    sink.add_indent_ln("break;");
    Ok(())
}

pub(super) fn emit_continue(_ctx: &mut GeneratorContext, _node: &Node, sink: &mut Sink) -> CodegenResult<()> {
    sink.add_indent_ln("continue;");
    Ok(())
}

pub(super) fn emit_label(_ctx: &mut GeneratorContext, node: &Node, sink: &mut Sink) -> CodegenResult<()> {
    let NodeKind::Label { name } = &node.kind else {
        return Err(node.unexpected(NodeTag::Label));
    };
    sink.add_indent();
    sink.add_fmt(format_args!("{}:;\n", c_identifier(name)));
    Ok(())
}

pub(super) fn emit_goto(_ctx: &mut GeneratorContext, node: &Node, sink: &mut Sink) -> CodegenResult<()> {
    let NodeKind::Goto { label } = &node.kind else {
        return Err(node.unexpected(NodeTag::Goto));
    };
    sink.add_indent();
    sink.add_fmt(format_args!("goto {};\n", c_identifier(label)));
    Ok(())
}

/// A bare `return` leaving the entry point still reports success.
pub(super) fn emit_return(ctx: &mut GeneratorContext, node: &Node, sink: &mut Sink) -> CodegenResult<()> {
    let NodeKind::Return { values } = &node.kind else {
        return Err(node.unexpected(NodeTag::Return));
    };
    sink.add_indent();
    match values.as_slice() {
        [] if ctx.in_main_function() => sink.add_ln("return 0;"),
        [] => sink.add_ln("return;"),
        [value] => ctx.add_ln(sink, &[&"return ", value, &";"])?,
        _ => return Err(node.unimplemented("multiple return values")),
    }
    ctx.mark_return();
    Ok(())
}

// ============================================================================
// Declarations
// ============================================================================

pub(super) fn emit_var_decl(ctx: &mut GeneratorContext, node: &Node, sink: &mut Sink) -> CodegenResult<()> {
    let NodeKind::VarDecl {
        scope,
        mutability,
        vars,
        values,
    } = &node.kind
    else {
        return Err(node.unexpected(NodeTag::VarDecl));
    };
    if *scope == DeclScope::Global {
        return Err(node.unimplemented("global variables"));
    }
    let qualifier = match mutability {
        Mutability::Var => "",
        Mutability::Const => " const",
        Mutability::Let => return Err(node.unimplemented("immutable declarations")),
    };
    if !values.is_empty() && values.len() != vars.len() {
        return Err(node.error(
            ErrorKind::ArityMismatch,
            format!("declaration of {} variables has {} values", vars.len(), values.len()),
        ));
    }

    for (i, var) in vars.iter().enumerate() {
        let value = values.get(i);
        let ctype = declared_ctype(ctx, node, var, value)?;
        sink.add_indent();
        sink.add_fmt(format_args!("{ctype}{qualifier} {} = ", c_identifier(&var.name)));
        match value {
            Some(value) => ctx.add_ln(sink, &[value, &";"])?,
            None => sink.add_ln("{0};"),
        }
    }
    Ok(())
}

fn declared_ctype(
    ctx: &mut GeneratorContext,
    node: &Node,
    var: &TypedId,
    value: Option<&Node>,
) -> CodegenResult<&'static str> {
    if let Some(ty) = var.ty.as_deref() {
        return ctx.get_ctype(node, ty);
    }
    let inferred = match value {
        Some(value) => literal_ctype(ctx, value)?,
        None => None,
    };
    inferred.ok_or_else(|| {
        node.unimplemented(format_args!("inferring the type of '{}'", var.name))
            .with_hint("annotate the variable or initialize it with a literal")
    })
}

/// Targets are assigned left to right, each from its own value.
///
/// Source semantics evaluate every value before any store. Sequential stores only agree with that when no later
/// value or target reads a variable an earlier store wrote, so swaps like `a, b = b, a` are rejected.
pub(super) fn emit_assign(ctx: &mut GeneratorContext, node: &Node, sink: &mut Sink) -> CodegenResult<()> {
    let NodeKind::Assign { targets, values } = &node.kind else {
        return Err(node.unexpected(NodeTag::Assign));
    };
    if targets.len() != values.len() {
        return Err(node.error(
            ErrorKind::ArityMismatch,
            format!("assignment to {} targets has {} values", targets.len(), values.len()),
        ));
    }
    for (i, target) in targets.iter().enumerate() {
        let Some(root) = assigned_root(target) else {
            continue;
        };
        let mut later = targets[i + 1..].iter().chain(&values[i + 1..]);
        if later.any(|n| reads_variable(n, root)) {
            return Err(node
                .unimplemented(format_args!("multiple assignment that reads '{root}' after assigning it"))
                .with_hint("split it into separate assignments, copying the old value into a local first"));
        }
    }
    for (target, value) in targets.iter().zip(values) {
        sink.add_indent();
        ctx.add_ln(sink, &[target, &" = ", value, &";"])?;
    }
    Ok(())
}

/// The variable a target stores through: `a` for `a`, `a.b` and `a[i]`.
fn assigned_root(target: &Node) -> Option<&str> {
    match &target.kind {
        NodeKind::Id { name } => Some(name.as_str()),
        NodeKind::Paren { expr } | NodeKind::DotIndex { expr, .. } | NodeKind::ArrayIndex { expr, .. } => {
            assigned_root(expr)
        }
        _ => None,
    }
}

fn reads_variable(node: &Node, name: &str) -> bool {
    match &node.kind {
        NodeKind::Id { name: id } => id == name,
        NodeKind::Paren { expr } | NodeKind::DotIndex { expr, .. } | NodeKind::UnaryOp { expr, .. } => {
            reads_variable(expr, name)
        }
        NodeKind::ArrayIndex { expr, index } => reads_variable(expr, name) || reads_variable(index, name),
        NodeKind::Call { callee, args } => {
            reads_variable(callee, name) || args.iter().any(|arg| reads_variable(arg, name))
        }
        NodeKind::BinaryOp { lhs, rhs, .. } => reads_variable(lhs, name) || reads_variable(rhs, name),
        NodeKind::TernaryOp {
            first, second, third, ..
        } => reads_variable(first, name) || reads_variable(second, name) || reads_variable(third, name),
        _ => false,
    }
}

/// Local functions become `static` C functions: the prototype goes to the forward declarations so calls may
/// precede the definition, and the body is rendered into its own sink and appended to the definitions.
pub(super) fn emit_func_def(ctx: &mut GeneratorContext, node: &Node, _sink: &mut Sink) -> CodegenResult<()> {
    let NodeKind::FuncDef {
        scope,
        name,
        params,
        returns,
        block,
    } = &node.kind
    else {
        return Err(node.unexpected(NodeTag::FuncDef));
    };
    if *scope == DeclScope::Global {
        return Err(node.unimplemented("global functions"));
    }
    if !ctx.is_top() {
        return Err(node.unimplemented("nested functions"));
    }
    let ret = match returns.as_slice() {
        [] => "void",
        [ty] => ctx.get_ctype(node, ty)?,
        _ => return Err(node.unimplemented("multiple return values")),
    };

    let mut rendered = Vec::with_capacity(params.len());
    for param in params {
        let ty = param.ty.as_deref().ok_or_else(|| {
            node.unimplemented(format_args!("untyped parameter '{}'", param.name))
                .with_hint("give every parameter of a local function a type")
        })?;
        let ctype = ctx.get_ctype(node, ty)?;
        rendered.push(format!("{ctype} {}", c_identifier(&param.name)));
    }
    let params = if rendered.is_empty() {
        "void".to_string()
    } else {
        rendered.join(", ")
    };
    let signature = format!("static {ret} {}({params})", c_identifier(name));
    tracing::debug!(function = %name, "emitting local function");

    ctx.region_mut(Region::ForwardDeclarations)
        .add_fmt(format_args!("{signature};\n"));

    let mut def = ctx.new_sink();
    def.add_fmt(format_args!("{signature} {{\n"));
    def.inc_indent();
    ctx.push_scope(Scope::function());
    let body = ctx.traverse(block, &mut def);
    ctx.pop_scope();
    body?;
    def.dec_indent();
    def.add_ln("}");
    ctx.add_definition(&def);
    Ok(())
}
