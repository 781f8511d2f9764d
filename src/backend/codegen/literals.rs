//! Literal lowering: numbers, strings, booleans, nil.
//!
//! Numbers resolve to a canonical numeric type (explicit suffix first, syntactic form otherwise) and are emitted bare
//! unless a suffix asked for a concrete type, in which case they are cast to exactly that type. Strings are never
//! inlined: each literal becomes a uniquely named static string record in the forward declarations.

use kiln_core::lang::numerics::{self, NumericTypeId};
use kiln_syntax::ast::{Node, NodeKind, NodeTag, NumberForm, Span};
use kiln_syntax::diagnostics::ErrorKind;

use super::CodegenResult;
use super::builtins::NLSTRING;
use super::context::GeneratorContext;
use super::sink::{Region, Sink};

/// A number literal after suffix/form resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedNumber {
    pub canonical: NumericTypeId,
    /// C spelling of the literal itself, without any cast.
    pub spelling: String,
    /// The canonical type came from an explicit suffix.
    pub explicit: bool,
}

/// Canonical type implied by a literal's form alone.
pub fn canonical_for_form(form: &NumberForm) -> NumericTypeId {
    match form {
        NumberForm::Integer(_) => NumericTypeId::Int,
        NumberForm::Decimal(_) | NumberForm::Scientific { .. } => NumericTypeId::Float,
        NumberForm::Hex(_) | NumberForm::Binary(_) => NumericTypeId::Uint,
    }
}

/// C spelling of a literal's digits.
pub fn number_spelling(node: &Node, form: &NumberForm) -> CodegenResult<String> {
    match form {
        NumberForm::Integer(digits) | NumberForm::Decimal(digits) => Ok(digits.clone()),
        NumberForm::Scientific { mantissa, exponent } => Ok(format!("{mantissa}e{exponent}")),
        NumberForm::Hex(digits) => Ok(format!("0x{digits}u")),
        NumberForm::Binary(digits) => u64::from_str_radix(digits, 2)
            .map(|value| format!("{value}u"))
            .map_err(|_| {
                node.error(
                    ErrorKind::UnknownConstruct,
                    format!("invalid binary literal '0b{digits}'"),
                )
            }),
    }
}

/// Resolve a number literal's canonical type and spelling.
pub fn resolve_number(node: &Node, form: &NumberForm, suffix: Option<&str>) -> CodegenResult<ResolvedNumber> {
    let spelling = number_spelling(node, form)?;
    let (canonical, explicit) = match suffix {
        Some(suffix) => {
            let canonical = numerics::from_suffix(suffix).ok_or_else(|| {
                node.error(
                    ErrorKind::UnknownConstruct,
                    format!("unknown suffix '{suffix}' on number literal '{}'", literal_text(form)),
                )
            })?;
            (canonical, true)
        }
        None => (canonical_for_form(form), false),
    };
    Ok(ResolvedNumber {
        canonical,
        spelling,
        explicit,
    })
}

/// The literal as the user wrote it (minus separators), for diagnostics.
fn literal_text(form: &NumberForm) -> String {
    match form {
        NumberForm::Integer(digits) | NumberForm::Decimal(digits) => digits.clone(),
        NumberForm::Scientific { mantissa, exponent } => format!("{mantissa}e{exponent}"),
        NumberForm::Hex(digits) => format!("0x{digits}"),
        NumberForm::Binary(digits) => format!("0b{digits}"),
    }
}

/// Name of the static record backing the string literal at `span`.
pub fn string_literal_name(span: Span) -> String {
    format!("__strlit_{}", span.start)
}

/// Escape raw string bytes for a C string literal.
pub fn escape_c_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'\\' => out.push_str("\\\\"),
            b'"' => out.push_str("\\\""),
            b'\n' => out.push_str("\\n"),
            b'\t' => out.push_str("\\t"),
            b'\r' => out.push_str("\\r"),
            0x20..=0x7e => out.push(byte as char),
            // Octal escapes stop after three digits, unlike `\x` which would swallow following hex digits.
            _ => out.push_str(&format!("\\{byte:03o}")),
        }
    }
    out
}

/// C type of a literal-valued expression, when it can be read off the literal itself.
pub fn literal_ctype(ctx: &mut GeneratorContext, value: &Node) -> CodegenResult<Option<&'static str>> {
    match &value.kind {
        NodeKind::Number { form, suffix } => {
            let number = resolve_number(value, form, suffix.as_deref())?;
            ctx.get_ctype(value, numerics::as_str(number.canonical)).map(Some)
        }
        NodeKind::Boolean { .. } => ctx.get_ctype(value, "boolean").map(Some),
        NodeKind::String { .. } => ctx.get_ctype(value, "string").map(Some),
        NodeKind::Paren { expr } => literal_ctype(ctx, expr),
        _ => Ok(None),
    }
}

// ============================================================================
// Handlers
// ============================================================================

pub(super) fn emit_number(ctx: &mut GeneratorContext, node: &Node, sink: &mut Sink) -> CodegenResult<()> {
    let NodeKind::Number { form, suffix } = &node.kind else {
        return Err(node.unexpected(NodeTag::Number));
    };
    let number = resolve_number(node, form, suffix.as_deref())?;
    let ctype = ctx.get_ctype(node, numerics::as_str(number.canonical))?;
    if number.explicit {
        sink.add_fmt(format_args!("(({ctype}){})", number.spelling));
    } else {
        sink.add(&number.spelling);
    }
    Ok(())
}

pub(super) fn emit_string(ctx: &mut GeneratorContext, node: &Node, sink: &mut Sink) -> CodegenResult<()> {
    let NodeKind::String { value } = &node.kind else {
        return Err(node.unexpected(NodeTag::String));
    };
    ctx.add_builtin(NLSTRING, node)?;
    let name = string_literal_name(node.span);
    ctx.declare(&name, node)?;
    let len = value.len();
    let escaped = escape_c_string(value);
    ctx.region_mut(Region::ForwardDeclarations).add_fmt(format_args!(
        "static const struct {{ uintptr_t len, res; char data[{}]; }} {name} = {{{len}, {len}, \"{escaped}\"}};\n",
        len + 1
    ));
    sink.add_fmt(format_args!("(({NLSTRING}*)&{name})"));
    Ok(())
}

pub(super) fn emit_boolean(ctx: &mut GeneratorContext, node: &Node, sink: &mut Sink) -> CodegenResult<()> {
    let NodeKind::Boolean { value } = &node.kind else {
        return Err(node.unexpected(NodeTag::Boolean));
    };
    ctx.add_include("stdbool.h");
    sink.add(if *value { "true" } else { "false" });
    Ok(())
}

pub(super) fn emit_nil(ctx: &mut GeneratorContext, _node: &Node, sink: &mut Sink) -> CodegenResult<()> {
    ctx.add_include("stddef.h");
    sink.add("NULL");
    Ok(())
}
