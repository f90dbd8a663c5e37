//! Tree construction
//!
//!     The parser drives a [`TreeBuilder`] with start/finish events, the way a stack
//!     machine would. Leaves are pushed onto the innermost open node; finishing a node
//!     pops it and appends it to its parent with a range covering its children.
//!
//!     Two grammar features need builder support:
//!
//!         - Wrapping after the fact. Left-recursive rules (binary expressions, window
//!           functions) only know their kind once the left operand is built, so the
//!           parser takes a [`Checkpoint`] before the operand and later opens a node at it.
//!         - Fields on hidden rules. `field("type", _data_type)` labels every node the
//!           hidden rule contributes, so a field scope stays active for all children
//!           added at its depth until it is closed.

use super::kind::Kind;
use super::node::Node;
use super::range::{Range, SourceLocation};
use std::ops::Range as ByteRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

#[derive(Debug)]
struct OpenNode {
    kind: Kind,
    field: Option<&'static str>,
    children: Vec<Node>,
}

#[derive(Debug)]
pub struct TreeBuilder {
    location: SourceLocation,
    len: usize,
    stack: Vec<OpenNode>,
    /// (stack depth, field) pairs; a scope labels children added at exactly its depth.
    field_scopes: Vec<(usize, &'static str)>,
    pending_field: Option<&'static str>,
    /// End of the last consumed token, where missing nodes are anchored.
    last_end: usize,
}

impl TreeBuilder {
    pub fn new(source: &str, root: Kind) -> Self {
        Self {
            location: SourceLocation::new(source),
            len: source.len(),
            stack: vec![OpenNode {
                kind: root,
                field: None,
                children: Vec::new(),
            }],
            field_scopes: Vec::new(),
            pending_field: None,
            last_end: 0,
        }
    }

    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    /// Label the next node or token with a field name.
    pub fn field(&mut self, name: &'static str) {
        self.pending_field = Some(name);
    }

    /// Label every node added to the current node until [`TreeBuilder::pop_field_scope`].
    pub fn push_field_scope(&mut self, name: &'static str) {
        self.field_scopes.push((self.stack.len(), name));
    }

    pub fn pop_field_scope(&mut self) {
        self.field_scopes.pop();
    }

    pub fn start_node(&mut self, kind: Kind) {
        let field = match kind {
            Kind::Error => None,
            _ => self.pending_field.take(),
        };
        self.stack.push(OpenNode {
            kind,
            field,
            children: Vec::new(),
        });
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.current().children.len())
    }

    /// Open a node that adopts every child added to the current node since `checkpoint`.
    pub fn start_node_at(&mut self, checkpoint: Checkpoint, kind: Kind) {
        let adopted = match self.stack.last_mut() {
            Some(parent) => {
                let at = checkpoint.0.min(parent.children.len());
                parent.children.split_off(at)
            }
            None => Vec::new(),
        };
        self.stack.push(OpenNode {
            kind,
            field: None,
            children: adopted,
        });
    }

    pub fn finish_node(&mut self) {
        // The root is finished by `finish`
        if self.stack.len() <= 1 {
            return;
        }
        if let Some(open) = self.stack.pop() {
            let range = self.covering_range(&open.children);
            let mut node = Node::branch(open.kind, range, open.children);
            node.field = open.field;
            self.push_child(node);
        }
    }

    /// Add a token leaf covering `span`.
    pub fn token(&mut self, kind: Kind, span: ByteRange<usize>) {
        let mut node = Node::leaf(kind, self.location.byte_range_to_range(&span));
        node.field = self.pending_field.take();
        self.last_end = span.end;
        self.push_child(node);
    }

    /// Add an extra (comment) leaf; extras never carry fields.
    pub fn extra(&mut self, kind: Kind, span: ByteRange<usize>) {
        let node = Node::leaf(kind, self.location.byte_range_to_range(&span));
        self.last_end = span.end;
        self.current_mut().children.push(node);
    }

    /// Add a zero-width node for a token the grammar required but the input lacked.
    pub fn missing(&mut self, kind: Kind) {
        let position = self.location.byte_to_position(self.last_end);
        let mut node = Node::leaf(kind, Range::empty_at(self.last_end, position));
        node.missing = true;
        node.field = self.pending_field.take();
        self.push_child(node);
    }

    /// Append an already built subtree, used for reused statements.
    pub fn subtree(&mut self, node: Node) {
        self.last_end = node.end_byte();
        self.current_mut().children.push(node);
    }

    /// Close any nodes left open and return the root, which always spans the whole input.
    pub fn finish(mut self) -> Node {
        while self.stack.len() > 1 {
            self.finish_node();
        }
        let open = self.stack.pop().unwrap_or(OpenNode {
            kind: Kind::Error,
            field: None,
            children: Vec::new(),
        });
        let range = self.location.byte_range_to_range(&(0..self.len));
        Node::branch(open.kind, range, open.children)
    }

    /// Number of open nodes, the root included.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn push_child(&mut self, mut node: Node) {
        let depth = self.stack.len();
        if node.field.is_none() && !node.is_error() {
            if let Some((scope_depth, name)) = self.field_scopes.last() {
                if *scope_depth == depth {
                    node.field = Some(name);
                }
            }
        }
        self.current_mut().children.push(node);
    }

    fn covering_range(&self, children: &[Node]) -> Range {
        match (children.first(), children.last()) {
            (Some(first), Some(last)) => Range::new(
                first.start_byte()..last.end_byte(),
                first.start_position(),
                last.end_position(),
            ),
            _ => Range::empty_at(self.last_end, self.location.byte_to_position(self.last_end)),
        }
    }

    fn current(&self) -> &OpenNode {
        // The root entry is only removed by `finish`, which consumes the builder
        &self.stack[self.stack.len() - 1]
    }

    fn current_mut(&mut self) -> &mut OpenNode {
        let top = self.stack.len() - 1;
        &mut self.stack[top]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hyperql::syntax::kind::SyntaxKind;

    #[test]
    fn test_checkpoint_wraps_children() {
        let mut builder = TreeBuilder::new("a + b", Kind::Named(SyntaxKind::SourceFile));
        let checkpoint = builder.checkpoint();
        builder.token(Kind::Named(SyntaxKind::Identifier), 0..1);
        builder.start_node_at(checkpoint, Kind::Named(SyntaxKind::BinaryExpression));
        builder.token(Kind::Anonymous("+"), 2..3);
        builder.token(Kind::Named(SyntaxKind::Identifier), 4..5);
        builder.finish_node();
        let root = builder.finish();

        assert_eq!(root.child_count(), 1);
        let binary = root.child(0).unwrap();
        assert_eq!(binary.kind(), "binary_expression");
        assert_eq!(binary.byte_range(), 0..5);
        assert_eq!(binary.child_count(), 3);
    }

    #[test]
    fn test_field_scope_labels_each_child() {
        let mut builder = TreeBuilder::new("List<Int>", Kind::Named(SyntaxKind::SourceFile));
        builder.push_field_scope("type");
        builder.token(Kind::Anonymous("List"), 0..4);
        builder.token(Kind::Anonymous("<"), 4..5);
        builder.pop_field_scope();
        builder.token(Kind::Anonymous(">"), 8..9);
        let root = builder.finish();

        let fields: Vec<_> = root.children().map(Node::field_name).collect();
        assert_eq!(fields, vec![Some("type"), Some("type"), None]);
    }

    #[test]
    fn test_missing_is_zero_width_after_last_token() {
        let mut builder = TreeBuilder::new("RETURN  ", Kind::Named(SyntaxKind::SourceFile));
        builder.token(Kind::Anonymous("RETURN"), 0..6);
        builder.missing(Kind::Anonymous(";"));
        let root = builder.finish();

        let missing = root.child(1).unwrap();
        assert!(missing.is_missing());
        assert_eq!(missing.byte_range(), 6..6);
        assert_eq!(root.byte_range(), 0..8);
    }
}
