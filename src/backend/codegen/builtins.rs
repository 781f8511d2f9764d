//! Builtin support code and per-call-site specialization.
//!
//! Two mechanisms live here:
//! - **Materializers** append support code (types, inline helpers) to the builtin regions. They run through
//!   [`GeneratorContext::add_builtin`], which guarantees each one runs at most once per run.
//! - **Specializers** lower calls to builtins whose generated code depends on the concrete argument types. Each call
//!   site gets its own helper, named after the call's position, with parameters mirroring the arguments.

use kiln_core::lang::builtins::{self as builtin_names, BuiltinFnId};
use kiln_core::lang::numerics::{self, NumericTypeId};
use kiln_syntax::ast::{Node, NodeKind};
use kiln_syntax::diagnostics::ErrorKind;

use super::CodegenResult;
use super::context::GeneratorContext;
use super::expressions::emit_list;
use super::literals::resolve_number;
use super::sink::{Region, Sink};

/// Length/capacity/flexible-buffer string record.
pub const NLSTRING: &str = "nlstring";
/// Length-bounded write of a string record to stdout.
pub const NLSTRING_PRINT: &str = "nlstring_print";

/// Append one builtin's support code to the builtin regions.
pub type Materializer = fn(&mut GeneratorContext, &Node) -> CodegenResult<()>;

/// Lower one call site. Receives the call node and its arguments.
pub type Specializer = fn(&mut GeneratorContext, &Node, &[Node], &mut Sink) -> CodegenResult<()>;

/// Look up the materializer for builtin `name`.
pub fn materializer(name: &str) -> Option<Materializer> {
    match name {
        NLSTRING => Some(materialize_nlstring),
        NLSTRING_PRINT => Some(materialize_nlstring_print),
        _ => None,
    }
}

/// Look up the call-site specializer for a callee name.
pub fn specializer(callee: &str) -> Option<Specializer> {
    builtin_names::from_str(callee).map(|id| match id {
        BuiltinFnId::Print => specialize_print as Specializer,
    })
}

fn materialize_nlstring(ctx: &mut GeneratorContext, _at: &Node) -> CodegenResult<()> {
    ctx.add_include("stdint.h");
    let decls = ctx.region_mut(Region::BuiltinDeclarations);
    decls.add_ln("typedef struct nlstring {");
    decls.inc_indent();
    decls.add_indent_ln("uintptr_t len;");
    decls.add_indent_ln("uintptr_t res;");
    decls.add_indent_ln("char data[];");
    decls.dec_indent();
    decls.add_ln("} nlstring;");
    Ok(())
}

fn materialize_nlstring_print(ctx: &mut GeneratorContext, at: &Node) -> CodegenResult<()> {
    ctx.add_builtin(NLSTRING, at)?;
    ctx.add_include("stdio.h");
    let defs = ctx.region_mut(Region::BuiltinDefinitions);
    defs.add_ln("static inline void nlstring_print(const nlstring* s) {");
    defs.inc_indent();
    defs.add_indent_ln("fwrite(s->data, 1, s->len, stdout);");
    defs.dec_indent();
    defs.add_ln("}");
    Ok(())
}

/// `printf` directive for one canonical numeric type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatDirective {
    /// C expression for the format string, e.g. `"%" PRIiPTR`.
    pub format: &'static str,
    /// Header that defines the directive's macros.
    pub include: Option<&'static str>,
}

const fn inttypes(format: &'static str) -> FormatDirective {
    FormatDirective {
        format,
        include: Some("inttypes.h"),
    }
}

const fn plain(format: &'static str) -> FormatDirective {
    FormatDirective { format, include: None }
}

const FORMAT_DIRECTIVES: &[(NumericTypeId, FormatDirective)] = &[
    (NumericTypeId::Int, inttypes(r#""%" PRIiPTR"#)),
    (NumericTypeId::Int8, inttypes(r#""%" PRIi8"#)),
    (NumericTypeId::Int16, inttypes(r#""%" PRIi16"#)),
    (NumericTypeId::Int32, inttypes(r#""%" PRIi32"#)),
    (NumericTypeId::Int64, inttypes(r#""%" PRIi64"#)),
    (NumericTypeId::Uint, inttypes(r#""%" PRIuPTR"#)),
    (NumericTypeId::Uint8, inttypes(r#""%" PRIu8"#)),
    (NumericTypeId::Uint16, inttypes(r#""%" PRIu16"#)),
    (NumericTypeId::Uint32, inttypes(r#""%" PRIu32"#)),
    (NumericTypeId::Uint64, inttypes(r#""%" PRIu64"#)),
    (NumericTypeId::Float, plain(r#""%.14g""#)),
    (NumericTypeId::Float32, plain(r#""%.7g""#)),
    (NumericTypeId::Float64, plain(r#""%.14g""#)),
];

/// Look up the `printf` directive for a canonical numeric type.
pub fn format_directive(id: NumericTypeId) -> Option<FormatDirective> {
    FORMAT_DIRECTIVES.iter().find(|(t, _)| *t == id).map(|(_, d)| *d)
}

/// Name of the helper generated for the `print` call at `call`.
pub fn print_helper_name(call: &Node) -> String {
    format!("__print_{}", call.span.start)
}

/// Lower `print(a, b, ...)` to a call of a helper specialized for this call site's argument types.
fn specialize_print(ctx: &mut GeneratorContext, call: &Node, args: &[Node], sink: &mut Sink) -> CodegenResult<()> {
    let name = print_helper_name(call);
    ctx.declare(&name, call)?;
    let mut params = Vec::with_capacity(args.len());
    let mut writes = Vec::with_capacity(args.len());
    for (i, arg) in args.iter().enumerate() {
        let param = format!("a{}", i + 1);
        match &arg.kind {
            NodeKind::String { .. } => {
                ctx.add_builtin(NLSTRING_PRINT, call)?;
                params.push(format!("const {NLSTRING}* {param}"));
                writes.push(format!("{NLSTRING_PRINT}({param});"));
            }
            NodeKind::Number { form, suffix } => {
                let number = resolve_number(arg, form, suffix.as_deref())?;
                let type_name = numerics::as_str(number.canonical);
                let ctype = ctx.get_ctype(arg, type_name)?;
                let directive = format_directive(number.canonical).ok_or_else(|| {
                    call.error(
                        ErrorKind::UnsupportedArgument,
                        format!("print has no format directive for '{type_name}' values"),
                    )
                })?;
                if let Some(include) = directive.include {
                    ctx.add_include(include);
                }
                params.push(format!("{ctype} {param}"));
                writes.push(format!("printf({}, {param});", directive.format));
            }
            _ => {
                return Err(call
                    .error(
                        ErrorKind::UnsupportedArgument,
                        format!(
                            "print argument {} is a '{}' expression; only literal strings and numbers can be printed",
                            i + 1,
                            arg.tag()
                        ),
                    )
                    .with_hint("print specializes on literal argument types; bind other values with a literal"));
            }
        }
    }
    ctx.add_include("stdio.h");

    let params = if params.is_empty() {
        "void".to_string()
    } else {
        params.join(", ")
    };
    let signature = format!("static void {name}({params})");
    ctx.region_mut(Region::ForwardDeclarations)
        .add_fmt(format_args!("{signature};\n"));

    let mut def = ctx.new_sink();
    def.add_fmt(format_args!("{signature} {{\n"));
    def.inc_indent();
    for (i, write) in writes.iter().enumerate() {
        if i > 0 {
            def.add_indent_ln("fputc('\\t', stdout);");
        }
        def.add_indent_ln(write);
    }
    def.add_indent_ln("fputc('\\n', stdout);");
    def.add_indent_ln("fflush(stdout);");
    def.dec_indent();
    def.add_ln("}");
    ctx.add_definition(&def);

    sink.add(&name);
    sink.add("(");
    emit_list(ctx, args, sink)?;
    sink.add(")");
    Ok(())
}
