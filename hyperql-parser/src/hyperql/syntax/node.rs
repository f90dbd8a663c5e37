//! Syntax tree nodes
//!
//!     A [`Node`] owns its children. Trees are small (one query file) and are rebuilt on
//!     every parse, so nodes are plain values: cloning a subtree is how incremental
//!     parsing carries unchanged statements into the next tree.

use super::kind::{Kind, SyntaxKind};
use super::range::{Position, Range};
use crate::hyperql::language::language;
use std::ops::Range as ByteRange;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub(crate) kind: Kind,
    pub(crate) field: Option<&'static str>,
    pub(crate) range: Range,
    pub(crate) missing: bool,
    pub(crate) has_changes: bool,
    pub(crate) children: Vec<Node>,
}

impl Node {
    pub(crate) fn leaf(kind: Kind, range: Range) -> Self {
        Self {
            kind,
            field: None,
            range,
            missing: false,
            has_changes: false,
            children: Vec::new(),
        }
    }

    pub(crate) fn branch(kind: Kind, range: Range, children: Vec<Node>) -> Self {
        Self {
            children,
            ..Self::leaf(kind, range)
        }
    }

    /// The kind name: a rule name, the literal text of an anonymous node, or `ERROR`.
    pub fn kind(&self) -> &'static str {
        self.kind.as_str()
    }

    pub fn node_kind(&self) -> Kind {
        self.kind
    }

    pub fn syntax_kind(&self) -> Option<SyntaxKind> {
        self.kind.syntax_kind()
    }

    /// Symbol id of this node's kind in the language descriptor.
    pub fn kind_id(&self) -> u16 {
        language().id_for_kind(self.kind)
    }

    pub fn is(&self, kind: SyntaxKind) -> bool {
        self.kind == Kind::Named(kind)
    }

    pub fn is_named(&self) -> bool {
        self.kind.is_named()
    }

    pub fn is_error(&self) -> bool {
        self.kind == Kind::Error
    }

    pub fn is_missing(&self) -> bool {
        self.missing
    }

    pub fn is_extra(&self) -> bool {
        self.is(SyntaxKind::Comment)
    }

    /// True if this node or any descendant is an error or missing node.
    pub fn has_error(&self) -> bool {
        self.is_error() || self.missing || self.children.iter().any(Node::has_error)
    }

    /// True if the node was touched by an edit since it was parsed.
    pub fn has_changes(&self) -> bool {
        self.has_changes
    }

    pub fn field_name(&self) -> Option<&'static str> {
        self.field
    }

    pub fn range(&self) -> &Range {
        &self.range
    }

    pub fn byte_range(&self) -> ByteRange<usize> {
        self.range.span.clone()
    }

    pub fn start_byte(&self) -> usize {
        self.range.span.start
    }

    pub fn end_byte(&self) -> usize {
        self.range.span.end
    }

    pub fn start_position(&self) -> Position {
        self.range.start
    }

    pub fn end_position(&self) -> Position {
        self.range.end
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.children.get(index)
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.children.iter()
    }

    pub fn named_children(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().filter(|child| child.is_named())
    }

    pub fn named_child(&self, index: usize) -> Option<&Node> {
        self.named_children().nth(index)
    }

    pub fn named_child_count(&self) -> usize {
        self.named_children().count()
    }

    /// First child carrying the given field name.
    pub fn child_by_field_name(&self, field: &str) -> Option<&Node> {
        self.children.iter().find(|child| child.field == Some(field))
    }

    pub fn children_by_field_name<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a Node> {
        self.children
            .iter()
            .filter(move |child| child.field == Some(field))
    }

    /// First named child of the given kind.
    pub fn child_of_kind(&self, kind: SyntaxKind) -> Option<&Node> {
        self.children.iter().find(|child| child.is(kind))
    }

    /// Source text covered by the node. Empty for missing nodes.
    pub fn utf8_text<'s>(&self, source: &'s str) -> &'s str {
        source.get(self.byte_range()).unwrap_or("")
    }

    /// Pre-order traversal of this node and all of its descendants.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// Smallest node that spans the given byte range.
    pub fn descendant_for_byte_range(&self, start: usize, end: usize) -> Option<&Node> {
        if start < self.start_byte() || end > self.end_byte() {
            return None;
        }
        let mut node = self;
        'descend: loop {
            for child in &node.children {
                if child.start_byte() <= start && end <= child.end_byte() && !child.missing {
                    node = child;
                    continue 'descend;
                }
            }
            return Some(node);
        }
    }

    /// Smallest named node containing the given position.
    pub fn named_descendant_for_position(&self, position: Position) -> Option<&Node> {
        if !self.range.contains(position) {
            return None;
        }
        let mut node = self;
        'descend: loop {
            for child in node.named_children() {
                if child.range.contains(position) && !child.missing {
                    node = child;
                    continue 'descend;
                }
            }
            return Some(node);
        }
    }

    /// Named descendants of a given kind, in pre-order.
    pub fn descendants_of_kind(&self, kind: SyntaxKind) -> impl Iterator<Item = &Node> {
        self.walk().filter(move |node| node.is(kind))
    }
}

/// Pre-order iterator returned by [`Node::walk`].
pub struct Walk<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hyperql::parsing::parse_source;

    #[test]
    fn test_fields_and_children() {
        let source = "DEFINE FIELD age: Int;";
        let tree = parse_source(source);
        let define = tree
            .root_node()
            .named_child(0)
            .and_then(|statement| statement.named_child(0))
            .unwrap();

        assert_eq!(define.kind(), "define_field");
        assert_eq!(
            define.child_by_field_name("name").unwrap().utf8_text(source),
            "age"
        );
        assert_eq!(
            define.child_by_field_name("type").unwrap().utf8_text(source),
            "Int"
        );
        assert_eq!(define.child(0).unwrap().kind(), "DEFINE");
        assert!(!define.child(0).unwrap().is_named());
    }

    #[test]
    fn test_walk_is_preorder() {
        let tree = parse_source("RETURN a;");
        let kinds: Vec<_> = tree.root_node().walk().map(Node::kind).collect();
        assert_eq!(
            kinds,
            vec![
                "source_file",
                "manipulation_statement",
                "return_clause",
                "RETURN",
                "identifier",
                ";"
            ]
        );
    }

    #[test]
    fn test_descendant_lookup() {
        let source = "MATCH (n:Person) RETURN n.name;";
        let tree = parse_source(source);
        let root = tree.root_node();

        let node = root.descendant_for_byte_range(9, 15).unwrap();
        assert_eq!(node.kind(), "identifier");
        assert_eq!(node.utf8_text(source), "Person");

        let named = root
            .named_descendant_for_position(Position::new(0, 27))
            .unwrap();
        assert_eq!(named.kind(), "identifier");
        assert_eq!(named.utf8_text(source), "name");

        assert!(root.descendant_for_byte_range(0, 999).is_none());
    }

    #[test]
    fn test_has_error() {
        assert!(!parse_source("RETURN 1;").root_node().has_error());
        assert!(parse_source("RETURN ;").root_node().has_error());
    }
}
