//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;
use std::path::Path;

use kiln_syntax::ast::Node;
use kiln_syntax::diagnostics::CompileError;

use crate::backend::{CGenerator, CodegenConfig};

use super::{CliError, CliResult, ExitCode};

/// Maximum input file size (100 MB) to prevent memory exhaustion
const MAX_INPUT_SIZE: u64 = 100 * 1024 * 1024;

/// Read an input file with a size guard.
pub fn read_input(path: &Path) -> CliResult<String> {
    let display = path.display();
    let metadata = fs::metadata(path).map_err(|e| CliError::failure(format!("Cannot access file '{display}': {e}")))?;

    if metadata.len() > MAX_INPUT_SIZE {
        return Err(CliError::failure(format!(
            "Input file '{display}' is too large ({} bytes, max {MAX_INPUT_SIZE} bytes)",
            metadata.len()
        )));
    }

    fs::read_to_string(path).map_err(|e| CliError::failure(format!("Error reading file '{display}': {e}")))
}

/// Deserialize a syntax tree from its JSON form.
pub fn parse_ast(json: &str, origin: &str) -> CliResult<Node> {
    serde_json::from_str(json).map_err(|e| CliError::failure(format!("Invalid syntax tree in '{origin}': {e}")))
}

/// Format a diagnostic for the terminal.
///
/// With the original source text the diagnostic is rendered by miette with a labeled span; without it, only the kind,
/// position and message are shown.
pub fn format_error(err: &CompileError, source: Option<(&str, &str)>) -> String {
    match source {
        Some((name, text)) => format!("{:?}", err.to_report(name, text)),
        None => {
            let mut msg = format!("error: {err}");
            for hint in &err.hints {
                msg.push_str(&format!("\n  help: {hint}"));
            }
            msg
        }
    }
}

fn generate(file: &Path, source: Option<&Path>, config: CodegenConfig) -> CliResult<String> {
    let json = read_input(file)?;
    let root = parse_ast(&json, &file.display().to_string())?;
    tracing::debug!(file = %file.display(), "loaded syntax tree");

    CGenerator::with_config(config).generate(&root).or_else(|err| {
        let message = match source {
            Some(path) => {
                let text = read_input(path)?;
                format_error(&err, Some((&path.display().to_string(), &text)))
            }
            None => format_error(&err, None),
        };
        Err(CliError::failure(message.trim_end()))
    })
}

/// Lower a syntax tree to C and print it to stdout.
pub fn emit_c(file: &Path, source: Option<&Path>, indent: usize) -> CliResult<ExitCode> {
    let code = generate(file, source, CodegenConfig::new().with_indent_width(indent))?;
    print!("{code}");
    Ok(ExitCode::SUCCESS)
}

/// Lower a syntax tree to C, discarding the output.
pub fn check(file: &Path, source: Option<&Path>) -> CliResult<ExitCode> {
    generate(file, source, CodegenConfig::default())?;
    println!("✓ {} lowers to C", file.display());
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use kiln_syntax::ast::Span;
    use kiln_syntax::diagnostics::ErrorKind;

    #[test]
    fn test_parse_ast_reports_origin() {
        let err = parse_ast("{\"tag\": \"Nope\"}", "bad.json").unwrap_err();
        assert!(err.message.contains("bad.json"));
        assert_eq!(err.exit_code, ExitCode::FAILURE);
    }

    #[test]
    fn test_parse_ast_accepts_block() {
        let root = parse_ast(
            r#"{"tag": "Block", "statements": [], "span": {"start": 0, "end": 0}}"#,
            "ok.json",
        )
        .unwrap();
        assert_eq!(root.tag().as_str(), "Block");
    }

    #[test]
    fn test_parse_ast_rejects_missing_span() {
        let err = parse_ast(r#"{"tag": "Block", "statements": []}"#, "nospan.json").unwrap_err();
        assert!(err.message.contains("nospan.json"));
        assert!(err.message.contains("span"), "{}", err.message);
    }

    #[test]
    fn test_format_error_without_source() {
        let err = CompileError::new(ErrorKind::Unimplemented, "varargs is not supported yet", Span::new(4, 7))
            .with_hint("remove the '...'");
        let msg = format_error(&err, None);
        assert!(msg.starts_with("error: unimplemented at 4..7: varargs is not supported yet"));
        assert!(msg.ends_with("help: remove the '...'"));
    }

    #[test]
    fn test_format_error_with_source_mentions_code() {
        let err = CompileError::new(ErrorKind::UnknownConstruct, "unknown type 'quux'", Span::new(6, 10));
        let msg = format_error(&err, Some(("main.kn", "local quux x = 1")));
        assert!(msg.contains("kiln::unknown_construct"));
        assert!(msg.contains("unknown type 'quux'"));
    }

    #[test]
    fn test_read_input_missing_file() {
        let err = read_input(Path::new("definitely/not/here.json")).unwrap_err();
        assert!(err.message.starts_with("Cannot access file"));
    }
}
