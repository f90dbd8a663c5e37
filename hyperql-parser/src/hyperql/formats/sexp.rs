//! S-expression rendering of syntax trees
//!
//! The format follows tree-sitter's: named nodes only, each child prefixed with its
//! field name when it has one. Anonymous tokens are left out unless the parser had to
//! insert them, in which case they show up as `(MISSING ";")`.
//!
//!     (source_file (definition_statement (define_field name: (identifier) (MISSING ";"))))

use crate::hyperql::syntax::{Kind, Node, Tree};

impl Node {
    pub fn to_sexp(&self) -> String {
        let mut output = String::new();
        write_node(self, &mut output);
        output
    }
}

/// S-expression of a whole tree.
pub fn to_sexp(tree: &Tree) -> String {
    tree.root_node().to_sexp()
}

fn write_node(node: &Node, output: &mut String) {
    if node.is_missing() {
        output.push_str("(MISSING ");
        match node.node_kind() {
            Kind::Anonymous(literal) => {
                output.push('"');
                output.push_str(literal);
                output.push('"');
            }
            kind => output.push_str(kind.as_str()),
        }
        output.push(')');
        return;
    }

    output.push('(');
    output.push_str(node.kind());
    for child in node.children().filter(|child| is_visible(child)) {
        output.push(' ');
        if let Some(field) = child.field_name() {
            output.push_str(field);
            output.push_str(": ");
        }
        write_node(child, output);
    }
    output.push(')');
}

fn is_visible(node: &Node) -> bool {
    node.is_named() || node.is_missing()
}

#[cfg(test)]
mod tests {
    use crate::hyperql::parsing::parse_source;

    #[test]
    fn test_missing_anonymous_is_quoted() {
        let tree = parse_source("DEFINE FIELD age: Int");
        insta::assert_snapshot!(
            tree.root_node().to_sexp(),
            @r#"(source_file (definition_statement (define_field name: (identifier) (MISSING ";"))))"#
        );
    }

    #[test]
    fn test_comments_are_named() {
        let tree = parse_source("-- all people\nMATCH (p) /* inline */ RETURN p");
        insta::assert_snapshot!(
            tree.root_node().to_sexp(),
            @"(source_file (comment) (manipulation_statement (match_clause (pattern (path_pattern (node_pattern variable: (identifier))))) (comment) (return_clause (identifier))))"
        );
    }

    #[test]
    fn test_unrecognised_input_is_a_bare_error() {
        let tree = parse_source("# SHOW ROLES");
        assert_eq!(
            tree.root_node().to_sexp(),
            "(source_file (ERROR) (system_statement))"
        );
    }
}
