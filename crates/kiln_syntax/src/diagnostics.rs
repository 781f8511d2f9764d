//! Diagnostics and error reporting for Kiln
//!
//! Every pass reports failure through a single fatal [`CompileError`]: what went wrong, where, and which rule was
//! violated. Rendering against source text goes through `miette`.

use std::fmt;

use miette::{LabeledSpan, MietteDiagnostic, NamedSource, Report, Severity};

use crate::ast::Span;

/// A fatal compile-time error with location information
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at {span}: {message}")]
pub struct CompileError {
    pub kind: ErrorKind,
    pub message: String,
    pub span: Span,
    pub hints: Vec<String>,
}

impl CompileError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
            hints: Vec::new(),
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    /// Build a `miette` report that renders this error against `source`.
    pub fn to_report(&self, file_name: &str, source: &str) -> Report {
        let len = self.span.end.saturating_sub(self.span.start);
        let label = LabeledSpan::at((self.span.start, len), self.kind.to_string());
        let mut diagnostic = MietteDiagnostic::new(self.message.clone())
            .with_code(self.kind.code())
            .with_severity(Severity::Error)
            .with_label(label);
        if !self.hints.is_empty() {
            diagnostic = diagnostic.with_help(self.hints.join("\n"));
        }
        Report::new(diagnostic).with_source_code(NamedSource::new(file_name, source.to_string()))
    }
}

/// Category of a [`CompileError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Unregistered node tag, or an operator/suffix/type/builtin name absent from a lookup table.
    UnknownConstruct,
    /// A specializer received an argument it cannot monomorphize.
    UnsupportedArgument,
    /// A documented gap in the backend.
    Unimplemented,
    /// Left/right-hand-side count mismatch in an assignment or declaration.
    ArityMismatch,
    /// A handler ran on a node of the wrong shape (compiler bug).
    Internal,
}

impl ErrorKind {
    /// Stable diagnostic code.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::UnknownConstruct => "kiln::unknown_construct",
            ErrorKind::UnsupportedArgument => "kiln::unsupported_argument",
            ErrorKind::Unimplemented => "kiln::unimplemented",
            ErrorKind::ArityMismatch => "kiln::arity_mismatch",
            ErrorKind::Internal => "kiln::internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::UnknownConstruct => write!(f, "unknown construct"),
            ErrorKind::UnsupportedArgument => write!(f, "unsupported argument"),
            ErrorKind::Unimplemented => write!(f, "unimplemented"),
            ErrorKind::ArityMismatch => write!(f, "arity mismatch"),
            ErrorKind::Internal => write!(f, "internal error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind_and_span() {
        let err = CompileError::new(ErrorKind::ArityMismatch, "2 targets but 1 value", Span::new(3, 9));
        assert_eq!(err.to_string(), "arity mismatch at 3..9: 2 targets but 1 value");
    }

    #[test]
    fn test_hints_do_not_change_display() {
        let err = CompileError::new(ErrorKind::Unimplemented, "goto", Span::default()).with_hint("use a loop");
        assert_eq!(err.hints, vec!["use a loop".to_string()]);
        assert_eq!(err.to_string(), "unimplemented at 0..0: goto");
    }

    #[test]
    fn test_report_carries_code_and_message() {
        let source = "print(x)";
        let err = CompileError::new(ErrorKind::UnsupportedArgument, "cannot print 'x'", Span::new(6, 7))
            .with_hint("pass a literal");
        let report = err.to_report("main.kl", source);
        assert_eq!(report.to_string(), "cannot print 'x'");
        let code = report.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("kiln::unsupported_argument"));
    }
}
