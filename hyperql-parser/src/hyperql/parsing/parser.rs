//! Reusable parser front-end
//!
//!     [`Parser`] is what editors hold on to: it parses a source text, optionally against
//!     the previous tree of the same document, and remembers how much of that tree it
//!     could reuse.
//!
//!     let mut parser = Parser::new();
//!     let mut tree = parser.parse(old_source, None);
//!     tree.edit(&InputEdit::between(old_source, new_source).unwrap());
//!     let tree = parser.parse(new_source, Some(&tree));

use super::engine::Engine;
use crate::hyperql::language::{language, Language};
use crate::hyperql::syntax::{Node, Tree};
use serde::Serialize;

/// Top-level nodes of the last parse, split by origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    /// Statements carried over from the previous tree.
    pub reused: usize,
    /// Statements and error nodes built from scratch.
    pub parsed: usize,
}

#[derive(Debug, Default)]
pub struct Parser {
    stats: ParseStats,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn language(&self) -> &'static Language {
        language()
    }

    /// Parse `source`. When `old_tree` is given it must already have been adjusted with
    /// [`Tree::edit`] for every change between its text and `source`.
    pub fn parse(&mut self, source: &str, old_tree: Option<&Tree>) -> Tree {
        let span = tracing::debug_span!("parse", len = source.len(), incremental = old_tree.is_some());
        let _enter = span.enter();

        let reusable = old_tree.map(reusable_statements).unwrap_or_default();
        let (root, stats) = Engine::new(source, reusable).parse_source_file();
        self.stats = stats;

        tracing::debug!(reused = stats.reused, parsed = stats.parsed, "parsed source");
        Tree::new(root)
    }

    /// Reuse counts of the most recent [`Parser::parse`] call.
    pub fn stats(&self) -> ParseStats {
        self.stats
    }
}

/// Statements of an edited tree that a new parse may take over unchanged.
fn reusable_statements(tree: &Tree) -> Vec<Node> {
    tree.root_node()
        .children()
        .filter(|node| {
            !node.has_changes()
                && !node.has_error()
                && node.syntax_kind().is_some_and(|kind| kind.is_statement())
        })
        .cloned()
        .collect()
}
