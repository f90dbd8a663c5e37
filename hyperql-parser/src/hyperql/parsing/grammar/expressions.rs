//! Expressions
//!
//!     Binary operators are parsed by precedence climbing. Every binary operator is left
//!     associative; binding power, loosest first:
//!
//!         1   ||
//!         2   &&
//!         3   == = != IS LIKE ILIKE MATCHES IMATCHES IN
//!         4   < > <= >=
//!         5   + -
//!         6   * / %
//!         10  prefix ! -
//!
//!     The postfix forms `IS NULL`, `IS NOT NULL` and a bare `IN` bind loosest of all: they
//!     apply to everything parsed so far at the outermost level, so `a + b IS NULL` tests
//!     `a + b`.
//!
//!     `x IN (MATCH ... RETURN ...)` is a membership test against a subquery. It becomes a
//!     binary expression whose right operand is the subquery expression, which carries the
//!     `IN` token itself.

use crate::hyperql::lexing::Token;
use crate::hyperql::parsing::engine::{Engine, CLAUSE_STARTS, TOP_LEVEL_STARTS};
use crate::hyperql::syntax::{Kind, SyntaxKind};

const UNARY_BINDING: u8 = 10;

const OPERAND_TOKENS: &[Token] = &[
    Token::Dollar,
    Token::Integer,
    Token::Float,
    Token::String,
    Token::LBrace,
    Token::LBracket,
    Token::LParen,
    Token::Bang,
    Token::Minus,
];

/// Words that end an expression rather than start one.
const STOP_WORDS: &[&str] = &[
    "AS", "ASC", "DESC", "THEN", "ELSE", "END", "WHEN", "IS", "LIKE", "ILIKE", "MATCHES",
    "IMATCHES", "IN", "OVER", "BY", "TO",
];

enum Operator {
    /// One or more tokens forming a binary operator.
    Binary {
        binding: u8,
        literal: &'static str,
        tokens: usize,
    },
    /// `IN ( statement )` used as a right operand.
    InSubquery,
    Postfix {
        literal: &'static str,
        tokens: usize,
    },
}

impl Engine<'_> {
    /// `_expression`
    pub(crate) fn expression(&mut self) {
        self.expression_with(0);
    }

    pub(crate) fn at_expression_start(&self) -> bool {
        self.starts_operand(0) || self.at_subquery() || self.at_word("MATCH")
    }

    /// Token n can begin an operand: a literal, a delimiter, a prefix operator or a word
    /// that is not reserved by the surrounding syntax.
    fn starts_operand(&self, n: usize) -> bool {
        match self.nth_text(n) {
            Some(word) => {
                !STOP_WORDS.contains(&word)
                    && !TOP_LEVEL_STARTS.contains(&word)
                    && !CLAUSE_STARTS.contains(&word)
            }
            None => OPERAND_TOKENS.iter().any(|token| self.nth(n, *token)),
        }
    }

    fn expression_with(&mut self, min_binding: u8) {
        if !self.enter_nested(Kind::Named(SyntaxKind::Identifier)) {
            return;
        }
        let checkpoint = self.checkpoint();
        self.prefix();

        while let Some(operator) = self.operator() {
            match operator {
                Operator::Binary {
                    binding,
                    literal,
                    tokens,
                } => {
                    if binding < min_binding {
                        break;
                    }
                    self.start_at(checkpoint, SyntaxKind::BinaryExpression);
                    self.bump_joined(Kind::Anonymous(literal), tokens);
                    self.expression_with(binding + 1);
                    self.finish();
                }
                Operator::InSubquery => {
                    if 3 < min_binding {
                        break;
                    }
                    self.start_at(checkpoint, SyntaxKind::BinaryExpression);
                    self.subquery_expression();
                    self.finish();
                }
                Operator::Postfix { literal, tokens } => {
                    if min_binding > 0 {
                        break;
                    }
                    self.start_at(checkpoint, SyntaxKind::BinaryExpression);
                    self.bump_joined(Kind::Anonymous(literal), tokens);
                    self.finish();
                }
            }
        }
        self.leave_nested();
    }

    fn operator(&self) -> Option<Operator> {
        let binary = |binding, literal| {
            Some(Operator::Binary {
                binding,
                literal,
                tokens: 1,
            })
        };

        let Some(word) = self.nth_text(0) else {
            return [
                (Token::OrOr, 1),
                (Token::AndAnd, 2),
                (Token::EqEq, 3),
                (Token::Eq, 3),
                (Token::NotEq, 3),
                (Token::Lt, 4),
                (Token::Gt, 4),
                (Token::LtEq, 4),
                (Token::GtEq, 4),
                (Token::Plus, 5),
                (Token::Minus, 5),
                (Token::Star, 6),
                (Token::Slash, 6),
                (Token::Percent, 6),
            ]
            .into_iter()
            .find(|(token, _)| self.at(*token))
            .and_then(|(token, binding)| binary(binding, token.literal()?));
        };

        match word {
            "IS" if self.at_words(&["IS", "NOT", "NULL"]) => Some(Operator::Postfix {
                literal: "IS NOT NULL",
                tokens: 3,
            }),
            "IS" if self.at_words(&["IS", "NULL"]) => Some(Operator::Postfix {
                literal: "IS NULL",
                tokens: 2,
            }),
            "IS" => binary(3, "IS"),
            "LIKE" => binary(3, "LIKE"),
            "ILIKE" => binary(3, "ILIKE"),
            "MATCHES" => binary(3, "MATCHES"),
            "IMATCHES" => binary(3, "IMATCHES"),
            "IN" if self.at_subquery() => Some(Operator::InSubquery),
            "IN" => {
                // Membership when an operand follows, the postfix form otherwise
                if self.starts_operand(1) {
                    binary(3, "IN")
                } else {
                    Some(Operator::Postfix {
                        literal: "IN",
                        tokens: 1,
                    })
                }
            }
            _ => None,
        }
    }

    /// Prefix operators and primaries.
    fn prefix(&mut self) {
        if self.at(Token::Bang) || self.at(Token::Minus) {
            self.start(SyntaxKind::UnaryExpression);
            if !self.punct(Token::Bang) {
                self.punct(Token::Minus);
            }
            self.expression_with(UNARY_BINDING + 1);
            self.finish();
        } else {
            self.primary();
        }
    }

    fn primary(&mut self) {
        if self.literal() {
            return;
        }
        if self.at_word("CASE") {
            self.case_expression();
        } else if self.at_subquery() {
            self.subquery_expression();
        } else if self.at_word("MATCH") {
            self.match_expression();
        } else if self.at(Token::Dollar) {
            self.variable();
        } else if self.at(Token::LParen) {
            // Parentheses are hidden: their tokens belong to the enclosing node
            self.expect(Token::LParen);
            self.expression();
            self.expect_closer(Token::RParen);
        } else if self.at_expression_start() && self.at(Token::Identifier) {
            if self.nth(1, Token::LParen) {
                self.call();
            } else if self.nth(1, Token::Dot) {
                self.property_access();
            } else {
                self.bump_as(Kind::Named(SyntaxKind::Identifier));
            }
        } else {
            self.missing(Kind::Named(SyntaxKind::Identifier));
        }
    }

    /// `object.property.property`
    pub(crate) fn property_access(&mut self) {
        self.start(SyntaxKind::PropertyAccess);
        self.field_identifier("object");
        if !self.at(Token::Dot) {
            self.missing(Kind::Anonymous("."));
            self.field("property");
            self.missing(Kind::Named(SyntaxKind::Identifier));
        }
        while self.punct(Token::Dot) {
            self.field("property");
            if self.at(Token::Identifier) {
                self.bump_as(Kind::Named(SyntaxKind::Identifier));
            } else {
                self.missing(Kind::Named(SyntaxKind::Identifier));
            }
        }
        self.finish();
    }

    /// A function call, optionally turned into a window function by `OVER (...)`.
    fn call(&mut self) {
        let checkpoint = self.checkpoint();
        self.function_call();
        if self.at_word("OVER") {
            self.start_at(checkpoint, SyntaxKind::WindowFunction);
            self.expect_keyword("OVER");
            self.expect(Token::LParen);
            if self.keyword("PARTITION") {
                self.expect_keyword("BY");
                self.comma_separated(Self::expression);
            }
            if self.keyword("ORDER") {
                self.expect_keyword("BY");
                self.comma_separated(|p| {
                    p.expression();
                    p.sort_direction();
                });
            }
            self.expect_closer(Token::RParen);
            self.finish();
        }
    }

    /// `name(args)`, where an argument may be `*`.
    fn function_call(&mut self) {
        self.start(SyntaxKind::FunctionCall);
        self.field("name");
        self.bump_as(Kind::Named(SyntaxKind::Identifier));
        self.expect(Token::LParen);
        self.optional_comma_separated(
            |p| p.at(Token::Star) || p.at_expression_start(),
            |p| {
                if !p.punct(Token::Star) {
                    p.expression();
                }
            },
        );
        self.expect_closer(Token::RParen);
        self.finish();
    }

    /// `MATCH subject { pattern => result, ... }`
    fn match_expression(&mut self) {
        self.start(SyntaxKind::MatchExpression);
        self.expect_keyword("MATCH");
        self.expression();
        self.expect(Token::LBrace);
        self.comma_separated(|p| {
            p.expression();
            p.expect(Token::FatArrow);
            p.expression();
        });
        self.expect_closer(Token::RBrace);
        self.finish();
    }

    /// `CASE WHEN c THEN v ... ELSE d END`
    fn case_expression(&mut self) {
        self.start(SyntaxKind::CaseExpression);
        self.expect_keyword("CASE");
        while self.keyword("WHEN") {
            self.expression();
            self.expect_keyword("THEN");
            self.expression();
        }
        if self.keyword("ELSE") {
            self.expression();
        }
        self.expect_keyword("END");
        self.finish();
    }

    /// `EXISTS (` or `IN (` followed by a clause. `MATCH` only counts as a clause when a
    /// pattern or `PATH` follows; otherwise it starts a match expression.
    fn at_subquery(&self) -> bool {
        let clause = match self.nth_text(2) {
            Some("MATCH") => self.nth(3, Token::LParen) || self.nth_word(3, "PATH"),
            Some(word) => CLAUSE_STARTS.contains(&word),
            None => false,
        };
        (self.at_word("EXISTS") || self.at_word("IN")) && self.nth(1, Token::LParen) && clause
    }

    /// `EXISTS|IN ( manipulation_statement )`
    fn subquery_expression(&mut self) {
        self.start(SyntaxKind::SubqueryExpression);
        if !self.keyword("EXISTS") {
            self.expect_keyword("IN");
        }
        self.expect(Token::LParen);
        if self.at_clause_start() {
            self.manipulation_statement();
        } else {
            self.missing(Kind::Named(SyntaxKind::ManipulationStatement));
        }
        self.expect_closer(Token::RParen);
        self.finish();
    }
}

#[cfg(test)]
mod tests {
    use crate::hyperql::parsing::parse_source;
    use rstest::rstest;

    /// S-expression of the first projection of `RETURN <expr>;`
    fn expr(source: &str) -> String {
        let source = format!("RETURN {source};");
        let tree = parse_source(&source);
        let sexp = tree.root_node().to_sexp();
        sexp.strip_prefix("(source_file (manipulation_statement (return_clause ")
            .and_then(|rest| rest.strip_suffix(")))"))
            .unwrap_or(&sexp)
            .to_string()
    }

    #[rstest]
    #[case("a + b * c", "(binary_expression (identifier) (binary_expression (identifier) (identifier)))")]
    #[case("a - b - c", "(binary_expression (binary_expression (identifier) (identifier)) (identifier))")]
    #[case("a || b && c", "(binary_expression (identifier) (binary_expression (identifier) (identifier)))")]
    #[case("a < b == c", "(binary_expression (binary_expression (identifier) (identifier)) (identifier))")]
    #[case("-a * b", "(binary_expression (unary_expression (identifier)) (identifier))")]
    #[case("!(a && b)", "(unary_expression (binary_expression (identifier) (identifier)))")]
    #[case("(a + b) * c", "(binary_expression (binary_expression (identifier) (identifier)) (identifier))")]
    fn test_precedence(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(expr(source), expected);
    }

    #[test]
    fn test_postfix_applies_to_whole_expression() {
        assert_eq!(
            expr("a + b IS NOT NULL"),
            "(binary_expression (binary_expression (identifier) (identifier)))"
        );
        assert_eq!(
            expr("a IS NULL && b"),
            "(binary_expression (binary_expression (identifier)) (identifier))"
        );
        assert_eq!(
            expr("a IS b"),
            "(binary_expression (identifier) (identifier))"
        );
    }

    #[test]
    fn test_in_forms() {
        assert_eq!(
            expr("x IN [1, 2]"),
            "(binary_expression (identifier) (list_literal (integer_literal) (integer_literal)))"
        );
        assert_eq!(expr("x IN"), "(binary_expression (identifier))");
        assert_eq!(
            expr("x IN (MATCH (n) RETURN n)"),
            "(binary_expression (identifier) (subquery_expression (manipulation_statement \
             (match_clause (pattern (path_pattern (node_pattern variable: (identifier))))) \
             (return_clause (identifier)))))"
        );
    }

    #[test]
    fn test_calls_and_access() {
        assert_eq!(
            expr("count(*)"),
            "(function_call name: (identifier))"
        );
        assert_eq!(
            expr("n.address.city"),
            "(property_access object: (identifier) property: (identifier) property: (identifier))"
        );
        assert_eq!(
            expr("rank() OVER (PARTITION BY n.team ORDER BY n.score DESC)"),
            "(window_function (function_call name: (identifier)) \
             (property_access object: (identifier) property: (identifier)) \
             (property_access object: (identifier) property: (identifier)))"
        );
    }

    #[test]
    fn test_case_and_match() {
        assert_eq!(
            expr("CASE WHEN a THEN 1 ELSE 2 END"),
            "(case_expression (identifier) (integer_literal) (integer_literal))"
        );
        assert_eq!(
            expr("MATCH s { \"a\" => 1, _ => 0 }"),
            "(match_expression (identifier) (string_literal) (integer_literal) (identifier) (integer_literal))"
        );
    }

    #[test]
    fn test_exists_subquery() {
        assert_eq!(
            expr("EXISTS (MATCH (n))"),
            "(subquery_expression (manipulation_statement (match_clause (pattern \
             (path_pattern (node_pattern variable: (identifier)))))))"
        );
    }

    #[test]
    fn test_missing_operand() {
        assert_eq!(
            expr("a +"),
            "(binary_expression (identifier) (MISSING identifier))"
        );
    }
}
