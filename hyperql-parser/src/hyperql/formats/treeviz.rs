//! Treeviz formatter for syntax trees
//!
//! Treeviz is a visual representation of the tree, one line per node, which makes it quick
//! to scan a parse of a long query file. Nesting is drawn with box connectors:
//!
//!   ⧉ source_file
//!   └─ § manipulation_statement
//!     ├─ ¶ match_clause
//!     │ └─ ◇ pattern
//!     │   └─ ◇ path_pattern
//!     │     └─ ◇ node_pattern
//!     │       └─ • variable: identifier p
//!     └─ ¶ return_clause
//!       └─ • identifier p
//!
//! Leaves show their source text, truncated to 30 characters.
//!
//! Icons
//!     Statements: §
//!     Definitions: ≔
//!     Clauses: ¶
//!     Patterns: ◇
//!     Expressions: ƒ
//!     Literals: ◦
//!     Identifiers: •
//!     Comments: "
//!     Tokens: ·
//!     Errors: ✗
//!     Missing: ∅

use super::registry::FormatOptions;
use crate::hyperql::syntax::{Node, SyntaxKind, Tree};

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

/// Get the icon for a node
fn get_icon(node: &Node) -> &'static str {
    if node.is_missing() {
        return "∅";
    }
    if node.is_error() {
        return "✗";
    }
    let Some(kind) = node.syntax_kind() else {
        return "·";
    };
    let name = kind.as_str();
    match kind {
        SyntaxKind::SourceFile => "⧉",
        SyntaxKind::Comment => "\"",
        SyntaxKind::Identifier | SyntaxKind::NamespaceIdentifier => "•",
        SyntaxKind::Pattern
        | SyntaxKind::PathPattern
        | SyntaxKind::NodePattern
        | SyntaxKind::EdgePattern => "◇",
        SyntaxKind::StringLiteral
        | SyntaxKind::IntegerLiteral
        | SyntaxKind::FloatLiteral
        | SyntaxKind::BooleanLiteral
        | SyntaxKind::NullLiteral
        | SyntaxKind::MapLiteral
        | SyntaxKind::ListLiteral => "◦",
        _ if kind.is_statement() => "§",
        _ if name.starts_with("define_") => "≔",
        _ if name.ends_with("_clause") => "¶",
        _ => "ƒ",
    }
}

fn label(node: &Node, source: &str, options: &FormatOptions) -> String {
    let mut label = String::new();
    if let Some(field) = node.field_name() {
        label.push_str(field);
        label.push_str(": ");
    }
    label.push_str(node.kind());
    if node.child_count() == 0 && node.is_named() && !node.is_missing() {
        let text = node.utf8_text(source).replace('\n', "↵");
        label.push(' ');
        label.push_str(&truncate(&text, 30));
    }
    if options.ranges {
        let range = node.range();
        label.push_str(&format!(" [{}-{}]", range.start, range.end));
    }
    label
}

fn is_shown(node: &Node, options: &FormatOptions) -> bool {
    options.anonymous || node.is_named() || node.is_missing()
}

fn format_node(
    node: &Node,
    source: &str,
    prefix: &str,
    is_last: bool,
    options: &FormatOptions,
    output: &mut String,
) {
    let connector = if is_last { "└─" } else { "├─" };
    if options.line_numbers {
        output.push_str(&format!("{:02} ", node.start_position().line + 1));
    }
    output.push_str(&format!(
        "{}{} {} {}\n",
        prefix,
        connector,
        get_icon(node),
        label(node, source, options)
    ));

    let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
    format_children(node, source, &child_prefix, options, output);
}

fn format_children(
    node: &Node,
    source: &str,
    prefix: &str,
    options: &FormatOptions,
    output: &mut String,
) {
    let children: Vec<_> = node
        .children()
        .filter(|child| is_shown(child, options))
        .collect();
    let count = children.len();
    for (i, child) in children.into_iter().enumerate() {
        format_node(child, source, prefix, i + 1 == count, options, output);
    }
}

pub fn to_treeviz_str(tree: &Tree, source: &str) -> String {
    to_treeviz_str_with_options(tree, source, &FormatOptions::default())
}

pub fn to_treeviz_str_with_options(tree: &Tree, source: &str, options: &FormatOptions) -> String {
    let root = tree.root_node();
    let mut output = format!("{} {}\n", get_icon(root), label(root, source, options));
    format_children(root, source, "", options, &mut output);
    output
}
