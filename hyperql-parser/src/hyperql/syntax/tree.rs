//! The syntax tree of one source text

use super::edit::InputEdit;
use super::node::Node;
use crate::hyperql::language::{language, Language};

/// Tokens past its end the parser may inspect before closing a statement, as in `(a) <-`.
const LOOKAHEAD_TOKENS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    root: Node,
}

impl Tree {
    pub(crate) fn new(root: Node) -> Self {
        Self { root }
    }

    /// The `source_file` node, spanning the whole input.
    pub fn root_node(&self) -> &Node {
        &self.root
    }

    pub fn language(&self) -> &'static Language {
        language()
    }

    pub fn has_error(&self) -> bool {
        self.root.has_error()
    }

    /// Adjust the tree for an edit to its source text.
    ///
    /// Nodes after the edit are shifted, nodes spanning it are stretched, and every node
    /// touching it is marked with [`Node::has_changes`]. A top-level statement is also
    /// marked when the edit touches one of the tokens right after it: those tokens decided
    /// where the statement ended, so the statement cannot be reused if they changed.
    pub fn edit(&mut self, edit: &InputEdit) {
        let source_end = self.root.end_byte();
        let statements = &mut self.root.children;

        for index in 0..statements.len() {
            if statements[index].is_extra() {
                continue;
            }
            let lookahead_end = lookahead_end(&statements[index + 1..], source_end);
            if edit.touches(statements[index].start_byte(), lookahead_end) {
                statements[index].has_changes = true;
            }
        }

        edit_node(&mut self.root, edit);
        self.root.has_changes = true;
    }

    pub fn into_root(self) -> Node {
        self.root
    }
}

/// End of the last token after a statement that the parser may have looked at.
fn lookahead_end(following: &[Node], source_end: usize) -> usize {
    following
        .iter()
        .flat_map(|sibling| sibling.walk())
        .filter(|node| node.child_count() == 0 && !node.is_extra() && !node.is_missing())
        .nth(LOOKAHEAD_TOKENS - 1)
        .map(|token| token.end_byte())
        .unwrap_or(source_end)
}

fn edit_node(node: &mut Node, edit: &InputEdit) {
    if edit.touches(node.start_byte(), node.end_byte()) {
        node.has_changes = true;
    }

    // Nodes entirely before the edit are untouched, and so are their children
    if node.end_byte() < edit.start_byte {
        return;
    }

    let range = &mut node.range;
    range.span = edit.shift_byte(range.span.start)..edit.shift_byte(range.span.end);
    range.start = edit.shift_position(range.start);
    range.end = edit.shift_position(range.end);

    for child in &mut node.children {
        edit_node(child, edit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hyperql::parsing::parse_source;
    use crate::hyperql::syntax::range::Position;

    #[test]
    fn test_edit_shifts_following_statements() {
        let old = "RETURN a;\nRETURN b + 1;\nRETURN c;";
        let new = "RETURN a;\nRETURN b + 12;\nRETURN c;";
        let mut tree = parse_source(old);
        let edit = InputEdit::between(old, new).unwrap();
        tree.edit(&edit);

        let statements: Vec<_> = tree.root_node().children().collect();
        assert!(!statements[0].has_changes());
        assert!(statements[1].has_changes());
        assert!(!statements[2].has_changes());
        assert_eq!(statements[2].byte_range(), 25..34);
        assert_eq!(statements[2].start_position(), Position::new(2, 0));
        assert!(tree.root_node().has_changes());
    }

    #[test]
    fn test_edit_marks_statement_two_tokens_back() {
        // `(a) <` followed by `-` would continue the pattern
        let old = "MATCH (a) < x";
        let new = "MATCH (a) < -";
        let mut tree = parse_source(old);
        tree.edit(&InputEdit::between(old, new).unwrap());

        assert!(tree.root_node().child(0).unwrap().has_changes());
    }

    #[test]
    fn test_edit_marks_statement_before_lookahead() {
        // Editing the first token of a statement can change where the previous one ends
        let old = "MATCH (n)\nDEFINE FIELD a: Int;";
        let new = "MATCH (n)\nRETURN n;";
        let mut tree = parse_source(old);
        tree.edit(&InputEdit::between(old, new).unwrap());

        assert!(tree.root_node().children().all(Node::has_changes));
    }
}
