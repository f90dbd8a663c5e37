//! Conversion of parser diagnostics into LSP diagnostics

use hyperql_parser::{Diagnostic, DiagnosticSeverity, Range, Tree};
use lsp_types::{NumberOrString, Position};

pub fn to_lsp_range(range: &Range) -> lsp_types::Range {
    lsp_types::Range {
        start: Position::new(range.start.line as u32, range.start.column as u32),
        end: Position::new(range.end.line as u32, range.end.column as u32),
    }
}

fn to_lsp_severity(severity: DiagnosticSeverity) -> lsp_types::DiagnosticSeverity {
    match severity {
        DiagnosticSeverity::Error => lsp_types::DiagnosticSeverity::ERROR,
        DiagnosticSeverity::Warning => lsp_types::DiagnosticSeverity::WARNING,
        DiagnosticSeverity::Information => lsp_types::DiagnosticSeverity::INFORMATION,
        DiagnosticSeverity::Hint => lsp_types::DiagnosticSeverity::HINT,
    }
}

pub fn to_lsp_diagnostic(diagnostic: &Diagnostic) -> lsp_types::Diagnostic {
    lsp_types::Diagnostic {
        range: to_lsp_range(&diagnostic.range),
        severity: Some(to_lsp_severity(diagnostic.severity)),
        code: diagnostic.code.clone().map(NumberOrString::String),
        source: Some(diagnostic.source.clone()),
        message: diagnostic.message.clone(),
        ..lsp_types::Diagnostic::default()
    }
}

pub fn collect_diagnostics(tree: &Tree, source: &str) -> Vec<lsp_types::Diagnostic> {
    tree.diagnostics(source)
        .iter()
        .map(to_lsp_diagnostic)
        .collect()
}
