//! Schema definitions

use crate::hyperql::lexing::Token;
use crate::hyperql::parsing::engine::Engine;
use crate::hyperql::syntax::{Kind, SyntaxKind};

impl Engine<'_> {
    /// `DEFINE` followed by a word naming a definition kind.
    pub(crate) fn at_definition(&self) -> bool {
        const KINDS: &[&str] = &[
            "NAMESPACE", "ENUM", "FIELD", "ROLE", "STRUCT", "TRAIT", "ABSTRACT", "NODE", "EDGE",
            "INDEX",
        ];
        KINDS.iter().any(|kind| self.nth_word(1, kind))
    }

    pub(crate) fn definition_statement(&mut self) {
        self.start(SyntaxKind::DefinitionStatement);
        match self.nth_text(1) {
            Some("NAMESPACE") => self.define_namespace(),
            Some("ENUM") => self.define_member_list(SyntaxKind::DefineEnum, "ENUM"),
            Some("FIELD") => self.define_field(),
            Some("ROLE") => self.define_role(),
            Some("STRUCT") => self.define_member_list(SyntaxKind::DefineStruct, "STRUCT"),
            Some("TRAIT") => self.define_member_list(SyntaxKind::DefineTrait, "TRAIT"),
            Some("INDEX") => self.define_index(),
            Some("EDGE") => self.define_node_or_edge(SyntaxKind::DefineEdge, "EDGE"),
            Some("ABSTRACT") if self.nth_word(2, "EDGE") => {
                self.define_node_or_edge(SyntaxKind::DefineEdge, "EDGE")
            }
            _ => self.define_node_or_edge(SyntaxKind::DefineNode, "NODE"),
        }
        self.finish();
    }

    fn define_namespace(&mut self) {
        self.start(SyntaxKind::DefineNamespace);
        self.expect_keyword("DEFINE");
        self.expect_keyword("NAMESPACE");
        self.field("name");
        self.namespace_identifier();
        if self.keyword("STRICT_MODE") {
            self.expect(Token::Eq);
            self.boolean_literal();
        }
        self.expect_closer(Token::Semicolon);
        self.finish();
    }

    /// `DEFINE ENUM|STRUCT|TRAIT name { a, b, ... }`
    fn define_member_list(&mut self, kind: SyntaxKind, word: &'static str) {
        self.start(kind);
        self.expect_keyword("DEFINE");
        self.expect_keyword(word);
        self.field_identifier("name");
        self.expect(Token::LBrace);
        self.identifier_list();
        self.expect_closer(Token::RBrace);
        self.finish();
    }

    fn define_field(&mut self) {
        self.start(SyntaxKind::DefineField);
        self.expect_keyword("DEFINE");
        self.expect_keyword("FIELD");
        self.field_identifier("name");
        self.expect(Token::Colon);
        self.push_field_scope("type");
        self.data_type();
        self.pop_field_scope();
        self.decorators();
        self.expect_closer(Token::Semicolon);
        self.finish();
    }

    fn define_role(&mut self) {
        self.start(SyntaxKind::DefineRole);
        self.expect_keyword("DEFINE");
        self.expect_keyword("ROLE");
        self.field_identifier("name");
        self.expect_keyword("ALLOWS");
        self.expect(Token::LBracket);
        self.identifier_list();
        self.expect_closer(Token::RBracket);
        self.expect_closer(Token::Semicolon);
        self.finish();
    }

    fn define_node_or_edge(&mut self, kind: SyntaxKind, word: &'static str) {
        self.start(kind);
        self.expect_keyword("DEFINE");
        self.keyword("ABSTRACT");
        self.expect_keyword(word);
        self.field_identifier("name");
        if self.at_word("EXTENDS") {
            self.extends_clause();
        }
        self.schema_body();
        self.finish();
    }

    fn extends_clause(&mut self) {
        self.start(SyntaxKind::ExtendsClause);
        self.expect_keyword("EXTENDS");
        self.expect(Token::LBracket);
        self.identifier_list();
        self.expect_closer(Token::RBracket);
        self.finish();
    }

    fn schema_body(&mut self) {
        self.start(SyntaxKind::SchemaBody);
        self.expect(Token::LBrace);
        self.optional_comma_separated(Self::at_identifier, |p| {
            if p.nth(1, Token::Colon) {
                p.role_definition();
            } else {
                p.identifier();
            }
        });
        self.expect_closer(Token::RBrace);
        self.finish();
    }

    /// `author: Person (ONE) @required`
    fn role_definition(&mut self) {
        self.start(SyntaxKind::RoleDefinition);
        self.field_identifier("name");
        self.expect(Token::Colon);
        self.field_identifier("role_type");
        self.field("cardinality");
        if !self.cardinality("(ONE)", "ONE") && !self.cardinality("(MANY)", "MANY") {
            self.missing(Kind::Anonymous("(ONE)"));
        }
        self.decorators();
        self.finish();
    }

    /// `(ONE)` and `(MANY)` are single tokens of the grammar, written without spaces.
    fn cardinality(&mut self, literal: &'static str, word: &str) -> bool {
        let at = self.at(Token::LParen)
            && self.nth_word(1, word)
            && self.nth(2, Token::RParen)
            && self.touching(0)
            && self.touching(1);
        if at {
            self.bump_joined(Kind::Anonymous(literal), 3);
        }
        at
    }

    fn define_index(&mut self) {
        self.start(SyntaxKind::DefineIndex);
        self.expect_keyword("DEFINE");
        self.expect_keyword("INDEX");
        self.field_identifier("name");
        self.expect_keyword("ON");
        self.field_identifier("type");
        self.expect(Token::LParen);
        self.identifier_list();
        self.expect_closer(Token::RParen);
        self.expect_closer(Token::Semicolon);
        self.finish();
    }
}
