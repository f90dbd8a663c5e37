//! Fluent assertion API for syntax trees

use crate::hyperql::syntax::{Node, SyntaxKind, Tree};

/// Create an assertion builder for a parsed tree
pub fn assert_tree<'a>(tree: &'a Tree, source: &'a str) -> TreeAssertion<'a> {
    TreeAssertion { tree, source }
}

fn summarize(nodes: &[&Node]) -> String {
    nodes
        .iter()
        .map(|node| node.kind())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Top-level nodes, comments left out.
fn statements(root: &Node) -> Vec<&Node> {
    root.children().filter(|node| !node.is_extra()).collect()
}

pub struct TreeAssertion<'a> {
    tree: &'a Tree,
    source: &'a str,
}

impl<'a> TreeAssertion<'a> {
    pub fn no_errors(self) -> Self {
        if self.tree.has_error() {
            let problems: Vec<String> = self
                .tree
                .diagnostics(self.source)
                .into_iter()
                .filter(|diagnostic| diagnostic.is_error())
                .map(|diagnostic| format!("{}: {}", diagnostic.range.start, diagnostic.message))
                .collect();
            panic!("Expected a tree without errors, found: [{}]", problems.join("; "));
        }
        self
    }

    pub fn has_errors(self) -> Self {
        assert!(
            self.tree.has_error(),
            "Expected the tree to contain errors: {}",
            self.tree.root_node().to_sexp()
        );
        self
    }

    /// Assert the number of top-level statements (error nodes included)
    pub fn statement_count(self, expected: usize) -> Self {
        let actual = statements(self.tree.root_node());
        assert_eq!(
            actual.len(),
            expected,
            "Expected {} statements, found {}: [{}]",
            expected,
            actual.len(),
            summarize(&actual)
        );
        self
    }

    /// Assert the kinds of all top-level statements in order
    pub fn statement_kinds(self, expected: &[&str]) -> Self {
        let actual = statements(self.tree.root_node());
        let kinds: Vec<_> = actual.iter().map(|node| node.kind()).collect();
        assert_eq!(kinds, expected, "Unexpected statement kinds");
        self
    }

    /// Assert on a specific top-level statement by index
    pub fn statement<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        let all = statements(self.tree.root_node());
        assert!(
            index < all.len(),
            "Statement index {} out of bounds (tree has {} statements: [{}])",
            index,
            all.len(),
            summarize(&all)
        );
        assertion(NodeAssertion {
            node: all[index],
            source: self.source,
            context: format!("statements[{}]", index),
        });
        self
    }

    pub fn sexp(self, expected: &str) -> Self {
        assert_eq!(self.tree.root_node().to_sexp(), expected);
        self
    }
}

pub struct NodeAssertion<'a> {
    node: &'a Node,
    source: &'a str,
    context: String,
}

impl<'a> NodeAssertion<'a> {
    pub fn node(&self) -> &'a Node {
        self.node
    }

    pub fn kind(self, expected: &str) -> Self {
        assert_eq!(
            self.node.kind(),
            expected,
            "{}: Expected kind '{}', found '{}'",
            self.context,
            expected,
            self.node.kind()
        );
        self
    }

    pub fn text(self, expected: &str) -> Self {
        let actual = self.node.utf8_text(self.source);
        assert_eq!(
            actual, expected,
            "{}: Expected text '{}', found '{}'",
            self.context, expected, actual
        );
        self
    }

    pub fn missing(self) -> Self {
        assert!(
            self.node.is_missing(),
            "{}: Expected a missing {}",
            self.context,
            self.node.kind()
        );
        self
    }

    pub fn no_errors(self) -> Self {
        assert!(
            !self.node.has_error(),
            "{}: Expected no errors in {}",
            self.context,
            self.node.to_sexp()
        );
        self
    }

    /// Assert the kinds of the named children in order
    pub fn named_child_kinds(self, expected: &[&str]) -> Self {
        let actual: Vec<_> = self.node.named_children().map(|child| child.kind()).collect();
        assert_eq!(
            actual, expected,
            "{}: Unexpected named children",
            self.context
        );
        self
    }

    /// Assert on the child carrying a field
    pub fn field<F>(self, name: &str, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        let child = self.node.child_by_field_name(name).unwrap_or_else(|| {
            panic!(
                "{}: Expected field '{}' on {}",
                self.context,
                name,
                self.node.to_sexp()
            )
        });
        assertion(NodeAssertion {
            node: child,
            source: self.source,
            context: format!("{}.{}", self.context, name),
        });
        self
    }

    /// Assert on a named child by index
    pub fn named_child<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        let child = self.node.named_child(index).unwrap_or_else(|| {
            panic!(
                "{}: Named child index {} out of bounds (node has {})",
                self.context,
                index,
                self.node.named_child_count()
            )
        });
        assertion(NodeAssertion {
            node: child,
            source: self.source,
            context: format!("{}[{}]", self.context, index),
        });
        self
    }

    /// Assert on the first descendant of a kind
    pub fn descendant<F>(self, kind: SyntaxKind, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        let found = self
            .node
            .descendants_of_kind(kind)
            .next()
            .unwrap_or_else(|| panic!("{}: Expected a {} below this node", self.context, kind));
        assertion(NodeAssertion {
            node: found,
            source: self.source,
            context: format!("{}/{}", self.context, kind),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hyperql::parsing::parse_source;

    #[test]
    fn test_fluent_assertions() {
        let source = "-- people\nMATCH (p:Person) RETURN p.name;";
        let tree = parse_source(source);
        assert_tree(&tree, source)
            .no_errors()
            .statement_count(1)
            .statement(0, |statement| {
                statement
                    .kind("manipulation_statement")
                    .named_child_kinds(&["match_clause", "return_clause"])
                    .descendant(SyntaxKind::NodePattern, |pattern| {
                        pattern
                            .field("variable", |v| {
                                v.text("p");
                            })
                            .field("type", |t| {
                                t.text("Person");
                            });
                    });
            });
    }

    #[test]
    #[should_panic(expected = "Expected a tree without errors")]
    fn test_no_errors_reports_problems() {
        let source = "DEFINE FIELD a: Int";
        assert_tree(&parse_source(source), source).no_errors();
    }
}
