//! Semantic highlighting
//!
//!     Tokens are classified from the syntax tree rather than from the lexer alone, since
//!     keywords are context sensitive: `Date` is a type in a field definition and an
//!     identifier inside a pattern. Identifiers take their class from where they sit (the
//!     `name` of a function call, the `property` of a property access, a `type` field).

use hyperql_parser::{Node, Range, SyntaxKind, Tree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HyperqlSemanticTokenKind {
    Keyword,
    Type,
    Identifier,
    Variable,
    Function,
    Property,
    String,
    Number,
    Comment,
    Operator,
    Decorator,
}

impl HyperqlSemanticTokenKind {
    /// Standard LSP token type names, so that existing editor themes apply.
    pub fn as_str(self) -> &'static str {
        match self {
            HyperqlSemanticTokenKind::Keyword => "keyword",
            HyperqlSemanticTokenKind::Type => "type",
            HyperqlSemanticTokenKind::Identifier => "variable",
            HyperqlSemanticTokenKind::Variable => "parameter",
            HyperqlSemanticTokenKind::Function => "function",
            HyperqlSemanticTokenKind::Property => "property",
            HyperqlSemanticTokenKind::String => "string",
            HyperqlSemanticTokenKind::Number => "number",
            HyperqlSemanticTokenKind::Comment => "comment",
            HyperqlSemanticTokenKind::Operator => "operator",
            HyperqlSemanticTokenKind::Decorator => "decorator",
        }
    }
}

pub const SEMANTIC_TOKEN_KINDS: &[HyperqlSemanticTokenKind] = &[
    HyperqlSemanticTokenKind::Keyword,
    HyperqlSemanticTokenKind::Type,
    HyperqlSemanticTokenKind::Identifier,
    HyperqlSemanticTokenKind::Variable,
    HyperqlSemanticTokenKind::Function,
    HyperqlSemanticTokenKind::Property,
    HyperqlSemanticTokenKind::String,
    HyperqlSemanticTokenKind::Number,
    HyperqlSemanticTokenKind::Comment,
    HyperqlSemanticTokenKind::Operator,
    HyperqlSemanticTokenKind::Decorator,
];

/// Anonymous literals that name a data type.
const TYPE_LITERALS: &[&str] = &[
    "String", "Int", "Int32", "Float", "Bool", "Date", "UUID", "Interval", "Time", "Decimal",
    "Path", "Vector", "List", "Enum", "Struct",
];

const OPERATORS: &[&str] = &[
    "=", "==", "!=", "!", "<", ">", "<=", ">=", "+", "-", "*", "/", "%", "&&", "||", "->", "<-",
    "=>", "+=", "-=",
];

#[derive(Debug, Clone, PartialEq)]
pub struct HyperqlSemanticToken {
    pub kind: HyperqlSemanticTokenKind,
    pub range: Range,
}

pub fn collect_semantic_tokens(tree: &Tree) -> Vec<HyperqlSemanticToken> {
    let mut collector = TokenCollector::new();
    collector.visit(tree.root_node(), None);
    collector.finish()
}

struct TokenCollector {
    tokens: Vec<HyperqlSemanticToken>,
}

impl TokenCollector {
    fn new() -> Self {
        Self { tokens: Vec::new() }
    }

    fn finish(mut self) -> Vec<HyperqlSemanticToken> {
        self.tokens
            .sort_by_key(|token| (token.range.span.start, token.range.span.end));
        self.tokens
    }

    fn push(&mut self, node: &Node, kind: HyperqlSemanticTokenKind) {
        if !node.range().is_empty() {
            self.tokens.push(HyperqlSemanticToken {
                kind,
                range: node.range().clone(),
            });
        }
    }

    fn visit(&mut self, node: &Node, parent: Option<&Node>) {
        if node.is_missing() || (node.is_error() && node.child_count() == 0) {
            return;
        }
        if node.child_count() == 0 {
            if let Some(kind) = classify_leaf(node, parent) {
                self.push(node, kind);
            }
            return;
        }
        for child in node.children() {
            self.visit(child, Some(node));
        }
    }
}

fn classify_leaf(node: &Node, parent: Option<&Node>) -> Option<HyperqlSemanticTokenKind> {
    use HyperqlSemanticTokenKind as K;

    let parent_kind = parent.and_then(Node::syntax_kind);
    match node.syntax_kind() {
        Some(SyntaxKind::Comment) => Some(K::Comment),
        Some(SyntaxKind::StringLiteral) => Some(K::String),
        Some(SyntaxKind::IntegerLiteral) | Some(SyntaxKind::FloatLiteral) => Some(K::Number),
        Some(SyntaxKind::NullLiteral) => Some(K::Keyword),
        Some(SyntaxKind::NamespaceIdentifier) => Some(K::Type),
        Some(SyntaxKind::Identifier) => Some(classify_identifier(node, parent_kind)),
        Some(_) => None,
        None => {
            let literal = node.kind();
            match parent_kind {
                Some(SyntaxKind::Decorator) if literal == "@" => Some(K::Decorator),
                Some(SyntaxKind::Variable) if literal == "$" => Some(K::Variable),
                _ if TYPE_LITERALS.contains(&literal) => Some(K::Type),
                _ if OPERATORS.contains(&literal) => Some(K::Operator),
                // Words, and the cardinalities `(ONE)` and `(MANY)`
                _ if literal.starts_with(|c: char| c.is_ascii_alphabetic())
                    || (literal.len() > 1 && literal.starts_with('(')) =>
                {
                    Some(K::Keyword)
                }
                _ => None,
            }
        }
    }
}

fn classify_identifier(node: &Node, parent: Option<SyntaxKind>) -> HyperqlSemanticTokenKind {
    use HyperqlSemanticTokenKind as K;

    match (parent, node.field_name()) {
        (Some(SyntaxKind::FunctionCall), Some("name")) => K::Function,
        (Some(SyntaxKind::PropertyAccess), Some("property")) => K::Property,
        (Some(SyntaxKind::Decorator), _) => K::Decorator,
        (Some(SyntaxKind::Variable), _) => K::Variable,
        (_, Some("type")) | (_, Some("role_type")) => K::Type,
        _ => K::Identifier,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::test_support::{sample_tree, SAMPLE};
    use hyperql_parser::parse_source;

    fn classify(source: &str) -> Vec<(&str, HyperqlSemanticTokenKind)> {
        collect_semantic_tokens(&parse_source(source))
            .into_iter()
            .map(|token| (&source[token.range.span.clone()], token.kind))
            .collect()
    }

    #[test]
    fn keywords_follow_context() {
        use HyperqlSemanticTokenKind as K;
        assert_eq!(
            classify("MATCH (Date:Person) RETURN Date.name;"),
            vec![
                ("MATCH", K::Keyword),
                ("Date", K::Identifier),
                ("Person", K::Type),
                ("RETURN", K::Keyword),
                ("Date", K::Identifier),
                ("name", K::Property),
            ]
        );
    }

    #[test]
    fn field_definition_tokens() {
        use HyperqlSemanticTokenKind as K;
        assert_eq!(
            classify("DEFINE FIELD age: Int @range(0, 150);"),
            vec![
                ("DEFINE", K::Keyword),
                ("FIELD", K::Keyword),
                ("age", K::Identifier),
                ("Int", K::Type),
                ("@", K::Decorator),
                ("range", K::Decorator),
                ("0", K::Number),
                ("150", K::Number),
            ]
        );
    }

    #[test]
    fn expressions() {
        use HyperqlSemanticTokenKind as K;
        assert_eq!(
            classify("RETURN count(x) >= $min && s IS NOT NULL, \"a\" -- tail"),
            vec![
                ("RETURN", K::Keyword),
                ("count", K::Function),
                ("x", K::Identifier),
                (">=", K::Operator),
                ("$", K::Variable),
                ("min", K::Variable),
                ("&&", K::Operator),
                ("s", K::Identifier),
                ("IS NOT NULL", K::Keyword),
                ("\"a\"", K::String),
                ("-- tail", K::Comment),
            ]
        );
    }

    #[test]
    fn sample_tokens_are_sorted_and_non_empty() {
        let tokens = collect_semantic_tokens(&sample_tree());
        assert!(tokens.windows(2).all(|w| w[0].range.span.start < w[1].range.span.start));
        assert!(tokens.iter().all(|t| !t.range.is_empty()));
        let comments = tokens
            .iter()
            .filter(|t| t.kind == HyperqlSemanticTokenKind::Comment)
            .count();
        assert_eq!(comments, 2);
        assert!(SAMPLE.contains("overdue books */"));
    }

    #[test]
    fn legend_covers_every_kind() {
        let names: Vec<_> = SEMANTIC_TOKEN_KINDS.iter().map(|k| k.as_str()).collect();
        assert_eq!(names.len(), 11);
        assert!(names.contains(&"decorator"));
    }
}
