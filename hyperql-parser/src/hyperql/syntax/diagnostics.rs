//! Diagnostic collection for editors and the command line
//!
//! The parser never fails: problems in the input are recorded in the tree as `ERROR`
//! nodes and zero-width `MISSING` nodes. This module turns those, plus a couple of
//! schema-level checks, into structured diagnostics that map directly onto LSP's.
//!
//! ## Checks
//!
//! 1. **Syntax**: every `ERROR` node (`syntax-error`) and `MISSING` node (`missing-token`)
//! 2. **Duplicate definitions**: the same name defined twice with the same definition kind
//! 3. **Empty definitions**: `DEFINE ENUM`, `STRUCT` or `TRAIT` with no members

use super::kind::SyntaxKind;
use super::node::Node;
use super::range::Range;
use super::tree::Tree;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Diagnostic severity levels matching LSP protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Information,
    Hint,
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticSeverity::Error => write!(f, "error"),
            DiagnosticSeverity::Warning => write!(f, "warning"),
            DiagnosticSeverity::Information => write!(f, "info"),
            DiagnosticSeverity::Hint => write!(f, "hint"),
        }
    }
}

/// Structured diagnostic for LSP consumption
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub range: Range,
    pub severity: DiagnosticSeverity,
    pub message: String,
    pub code: Option<String>,
    pub source: String,
}

impl Diagnostic {
    pub fn new(range: Range, severity: DiagnosticSeverity, message: String) -> Self {
        Self {
            range,
            severity,
            message,
            code: None,
            source: "hyperql".to_string(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}]: {} at {}",
            self.severity, self.source, self.message, self.range.start
        )
    }
}

impl Tree {
    /// All diagnostics for this tree, ordered by position.
    pub fn diagnostics(&self, source: &str) -> Vec<Diagnostic> {
        let mut diagnostics = validate_syntax(self.root_node(), source);
        diagnostics.extend(validate_definitions(self.root_node(), source));
        diagnostics.sort_by(|a, b| {
            (a.range.span.start, a.range.span.end).cmp(&(b.range.span.start, b.range.span.end))
        });
        diagnostics
    }
}

/// Report error and missing nodes.
///
/// Errors nested inside an `ERROR` node are not reported separately.
pub fn validate_syntax(root: &Node, source: &str) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    collect_syntax(root, source, &mut diagnostics);
    diagnostics
}

fn collect_syntax(node: &Node, source: &str, diagnostics: &mut Vec<Diagnostic>) {
    if node.is_error() {
        let text = excerpt(node.utf8_text(source));
        diagnostics.push(
            Diagnostic::new(
                node.range().clone(),
                DiagnosticSeverity::Error,
                format!("unexpected `{text}`"),
            )
            .with_code("syntax-error"),
        );
        return;
    }
    if node.is_missing() {
        let what = if node.is_named() {
            node.kind().to_string()
        } else {
            format!("`{}`", node.kind())
        };
        diagnostics.push(
            Diagnostic::new(
                node.range().clone(),
                DiagnosticSeverity::Error,
                format!("missing {what}"),
            )
            .with_code("missing-token"),
        );
        return;
    }
    for child in node.children() {
        collect_syntax(child, source, diagnostics);
    }
}

/// Report schema definitions that are duplicated or have no members.
pub fn validate_definitions(root: &Node, source: &str) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut seen: HashMap<(SyntaxKind, &str), &Node> = HashMap::new();

    for statement in root.descendants_of_kind(SyntaxKind::DefinitionStatement) {
        let Some(definition) = statement.named_children().find(|n| !n.is_extra()) else {
            continue;
        };
        let (Some(kind), Some(name)) = (
            definition.syntax_kind(),
            definition.child_by_field_name("name"),
        ) else {
            continue;
        };
        if name.is_missing() {
            continue;
        }
        let name_text = name.utf8_text(source);

        match seen.get(&(kind, name_text)) {
            Some(first) => diagnostics.push(
                Diagnostic::new(
                    name.range().clone(),
                    DiagnosticSeverity::Warning,
                    format!(
                        "`{name_text}` is already defined at line {}",
                        first.start_position().line + 1
                    ),
                )
                .with_code("duplicate-definition"),
            ),
            None => {
                seen.insert((kind, name_text), name);
            }
        }

        if matches!(
            kind,
            SyntaxKind::DefineEnum | SyntaxKind::DefineStruct | SyntaxKind::DefineTrait
        ) {
            let members = definition
                .named_children()
                .filter(|n| n.is(SyntaxKind::Identifier) && n.field_name().is_none())
                .count();
            if members == 0 && !definition.has_error() {
                let what = match kind {
                    SyntaxKind::DefineEnum => "enum",
                    SyntaxKind::DefineStruct => "struct",
                    _ => "trait",
                };
                diagnostics.push(
                    Diagnostic::new(
                        definition.range().clone(),
                        DiagnosticSeverity::Warning,
                        format!("{what} `{name_text}` has no members"),
                    )
                    .with_code("empty-definition"),
                );
            }
        }
    }

    diagnostics
}

/// First line of `text`, shortened for messages.
fn excerpt(text: &str) -> String {
    const LIMIT: usize = 40;
    let line = text.lines().next().unwrap_or("").trim();
    if line.chars().count() > LIMIT {
        let short: String = line.chars().take(LIMIT).collect();
        format!("{short}…")
    } else {
        line.to_string()
    }
}

/// Render the lines around a diagnostic: up to two lines before it, the line it starts on
/// marked with `>>` and underlined with carets, and one line after. Lines are numbered from 1.
/// A zero-width range, such as a missing token, gets a single caret.
pub fn format_source_context(source: &str, range: &Range) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let error_line = range.start.line;
    let text_of = |line: usize| lines.get(line).copied().unwrap_or("");

    let mut context = String::new();
    for line in error_line.saturating_sub(2)..=error_line {
        let marker = if line == error_line { ">>" } else { "  " };
        context.push_str(&format!("{} {:3} | {}\n", marker, line + 1, text_of(line)));
    }

    let text = text_of(error_line);
    let end_column = if range.end.line == error_line {
        range.end.column
    } else {
        text.len()
    };
    let columns = |column: usize| {
        text.get(..column)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(column)
    };
    let pad = columns(range.start.column);
    let width = columns(end_column).saturating_sub(pad).max(1);
    context.push_str(&format!("{:6} | {}{}\n", "", " ".repeat(pad), "^".repeat(width)));

    if let Some(after) = lines.get(error_line + 1) {
        context.push_str(&format!("   {:3} | {}\n", error_line + 2, after));
    }
    context
}
