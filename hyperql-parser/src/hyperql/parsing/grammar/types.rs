//! Data types, decorators and literals

use crate::hyperql::lexing::Token;
use crate::hyperql::parsing::engine::Engine;
use crate::hyperql::syntax::{Kind, SyntaxKind};

const SCALAR_TYPES: &[&str] = &[
    "String", "Int", "Int32", "Float", "Bool", "Date", "UUID", "Interval", "Time", "Decimal",
    "Path",
];

impl Engine<'_> {
    /// `_data_type`
    pub(crate) fn data_type(&mut self) {
        if let Some(scalar) = SCALAR_TYPES.iter().copied().find(|t| self.at_word(t)) {
            self.bump_as(Kind::Anonymous(scalar));
        } else if self.keyword("Vector") {
            self.expect(Token::Lt);
            if self.at(Token::Integer) {
                self.bump_as(Kind::Named(SyntaxKind::IntegerLiteral));
            } else {
                self.missing(Kind::Named(SyntaxKind::IntegerLiteral));
            }
            self.expect_closer(Token::Gt);
        } else if self.keyword("List") {
            self.expect(Token::Lt);
            if self.enter_nested(Kind::Anonymous("String")) {
                self.data_type();
                self.leave_nested();
            }
            self.expect_closer(Token::Gt);
        } else if self.keyword("Enum") || self.keyword("Struct") {
            self.expect(Token::Lt);
            self.identifier();
            self.expect_closer(Token::Gt);
        } else if self.at_identifier() {
            // A word that names no type
            self.error_until(|_| true);
        } else {
            self.missing(Kind::Anonymous("String"));
        }
    }

    /// `repeat(decorator)`
    pub(crate) fn decorators(&mut self) {
        while self.at(Token::At) {
            self.decorator();
        }
    }

    /// `@name` or `@name(args...)`
    fn decorator(&mut self) {
        self.start(SyntaxKind::Decorator);
        self.expect(Token::At);
        self.identifier();
        if self.punct(Token::LParen) {
            self.comma_separated(Self::expression);
            self.expect_closer(Token::RParen);
        }
        self.finish();
    }

    /// `_literal`. Returns false, consuming nothing, when no literal starts here.
    pub(crate) fn literal(&mut self) -> bool {
        if self.at(Token::String) {
            self.bump_as(Kind::Named(SyntaxKind::StringLiteral));
        } else if self.at(Token::Integer) {
            self.bump_as(Kind::Named(SyntaxKind::IntegerLiteral));
        } else if self.at(Token::Float) {
            self.bump_as(Kind::Named(SyntaxKind::FloatLiteral));
        } else if self.at_word("true") || self.at_word("false") {
            self.boolean_literal();
        } else if self.at_word("null") {
            self.bump_as(Kind::Named(SyntaxKind::NullLiteral));
        } else if self.at(Token::LBrace) {
            self.map_literal();
        } else if self.at(Token::LBracket) {
            self.list_literal();
        } else {
            return false;
        }
        true
    }

    pub(crate) fn expect_literal(&mut self) {
        if !self.literal() {
            self.missing(Kind::Named(SyntaxKind::NullLiteral));
        }
    }

    pub(crate) fn string_literal(&mut self) {
        if self.at(Token::String) {
            self.bump_as(Kind::Named(SyntaxKind::StringLiteral));
        } else {
            self.missing(Kind::Named(SyntaxKind::StringLiteral));
        }
    }

    pub(crate) fn boolean_literal(&mut self) {
        if self.at_word("true") || self.at_word("false") {
            self.start(SyntaxKind::BooleanLiteral);
            if !self.keyword("true") {
                self.keyword("false");
            }
            self.finish();
        } else {
            self.missing(Kind::Named(SyntaxKind::BooleanLiteral));
        }
    }

    /// `{ key: value, ... }`
    pub(crate) fn map_literal(&mut self) {
        self.start(SyntaxKind::MapLiteral);
        self.expect(Token::LBrace);
        self.optional_comma_separated(Self::at_identifier, |p| {
            p.identifier();
            p.expect(Token::Colon);
            p.expression();
        });
        self.expect_closer(Token::RBrace);
        self.finish();
    }

    /// `[ value, ... ]`
    pub(crate) fn list_literal(&mut self) {
        self.start(SyntaxKind::ListLiteral);
        self.expect(Token::LBracket);
        self.optional_comma_separated(Self::at_expression_start, Self::expression);
        self.expect_closer(Token::RBracket);
        self.finish();
    }

    /// `$name`
    pub(crate) fn variable(&mut self) {
        self.start(SyntaxKind::Variable);
        self.expect(Token::Dollar);
        self.identifier();
        self.finish();
    }

    /// Dotted names such as `app.core_v2`, written without spaces.
    pub(crate) fn namespace_identifier(&mut self) {
        if !self.at(Token::Identifier) {
            self.missing(Kind::Named(SyntaxKind::NamespaceIdentifier));
            return;
        }
        let mut count = 1;
        while self.touching(count - 1)
            && (self.nth(count, Token::Identifier)
                || self.nth(count, Token::Dot)
                || self.nth(count, Token::Integer)
                || self.nth(count, Token::Float))
        {
            count += 1;
        }
        self.bump_joined(Kind::Named(SyntaxKind::NamespaceIdentifier), count);
    }
}

#[cfg(test)]
mod tests {
    use crate::hyperql::parsing::parse_source;
    use rstest::rstest;

    fn field_type(source: &str) -> String {
        let tree = parse_source(source);
        let define = tree.root_node().child(0).unwrap().child(0).unwrap();
        define
            .children_by_field_name("type")
            .map(|n| n.utf8_text(source))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[rstest]
    #[case("DEFINE FIELD a: Int32;", "Int32")]
    #[case("DEFINE FIELD a: Vector<128>;", "Vector < 128 >")]
    #[case("DEFINE FIELD a: List<List<Date>>;", "List < List < Date > >")]
    #[case("DEFINE FIELD a: Enum<Color>;", "Enum < Color >")]
    #[case("DEFINE FIELD a: Struct<Address>;", "Struct < Address >")]
    fn test_data_types(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(field_type(source), expected);
        assert!(!parse_source(source).has_error());
    }

    #[test]
    fn test_unknown_type_is_an_error() {
        let source = "DEFINE FIELD a: Strng;";
        let tree = parse_source(source);
        assert_eq!(
            tree.root_node().to_sexp(),
            "(source_file (definition_statement (define_field name: (identifier) (ERROR (identifier)))))"
        );
    }

    #[test]
    fn test_decorator_arguments() {
        assert_eq!(
            parse_source("DEFINE FIELD age: Int @range(0, 150) @default(18);")
                .root_node()
                .to_sexp(),
            "(source_file (definition_statement (define_field name: (identifier) \
             (decorator (identifier) (integer_literal) (integer_literal)) \
             (decorator (identifier) (integer_literal)))))"
        );
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            parse_source(r#"RETURN "s", 1, 2.5, false, null, {a: 1}, [1, $x];"#)
                .root_node()
                .to_sexp(),
            "(source_file (manipulation_statement (return_clause (string_literal) (integer_literal) \
             (float_literal) (boolean_literal) (null_literal) (map_literal (identifier) (integer_literal)) \
             (list_literal (integer_literal) (variable (identifier))))))"
        );
    }

    #[test]
    fn test_namespace_identifier_stops_at_space() {
        let source = "DEFINE NAMESPACE a.b1.c d;";
        let tree = parse_source(source);
        let name = tree
            .root_node()
            .descendants_of_kind(crate::hyperql::syntax::SyntaxKind::NamespaceIdentifier)
            .next()
            .unwrap();
        assert_eq!(name.utf8_text(source), "a.b1.c");
        assert!(tree.has_error());
    }
}
