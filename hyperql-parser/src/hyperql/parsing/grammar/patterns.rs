//! Graph patterns

use crate::hyperql::lexing::Token;
use crate::hyperql::parsing::engine::Engine;
use crate::hyperql::syntax::{Kind, SyntaxKind};

impl Engine<'_> {
    /// `pattern: commaSep1(path_pattern)`
    pub(crate) fn pattern(&mut self) {
        self.start(SyntaxKind::Pattern);
        self.comma_separated(Self::path_pattern);
        self.finish();
    }

    /// A node pattern followed by any number of edge/node pairs.
    fn path_pattern(&mut self) {
        self.start(SyntaxKind::PathPattern);
        self.node_pattern();
        while self.at_edge_start() {
            self.edge_pattern();
            self.node_pattern();
        }
        self.finish();
    }

    /// `(variable:Type {props})`, every part optional.
    fn node_pattern(&mut self) {
        self.start(SyntaxKind::NodePattern);
        self.expect(Token::LParen);
        if self.at_identifier() {
            self.field_identifier("variable");
        }
        if self.punct(Token::Colon) {
            self.field_identifier("type");
        }
        if self.at(Token::LBrace) {
            self.field("properties");
            self.map_literal();
        }
        self.expect_closer(Token::RParen);
        self.finish();
    }

    fn at_left_arrow(&self) -> bool {
        self.at(Token::Lt) && self.nth(1, Token::Minus) && self.touching(0)
    }

    fn at_edge_start(&self) -> bool {
        self.at(Token::Minus) || self.at_left_arrow()
    }

    /// `-[r:TYPE* {props} WEIGHT BY w]->` and its `<-` / `-` variants.
    fn edge_pattern(&mut self) {
        self.start(SyntaxKind::EdgePattern);
        if self.at_left_arrow() {
            self.bump_joined(Kind::Anonymous("<-"), 2);
        } else {
            self.expect(Token::Minus);
        }
        self.expect(Token::LBracket);
        if self.at_identifier() && !self.at_weight_clause() {
            self.field_identifier("variable");
        }
        if self.punct(Token::Colon) {
            self.field_identifier("type");
        }
        self.punct(Token::Star);
        if self.at(Token::LBrace) {
            self.field("properties");
            self.map_literal();
        }
        if self.at_weight_clause() {
            self.weight_clause();
        }
        self.expect_closer(Token::RBracket);
        if !self.punct(Token::Arrow) {
            self.expect(Token::Minus);
        }
        self.finish();
    }

    pub(crate) fn at_weight_clause(&self) -> bool {
        self.at_word("WEIGHT") && self.nth_word(1, "BY")
    }

    /// `_weight_clause: WEIGHT BY field [USING SUM|MAX|MIN|AVG]`
    pub(crate) fn weight_clause(&mut self) {
        self.expect_keyword("WEIGHT");
        self.expect_keyword("BY");
        self.field_identifier("weight_field");
        if self.keyword("USING") {
            let aggregate = ["SUM", "MAX", "MIN", "AVG"]
                .into_iter()
                .find(|word| self.at_word(word));
            match aggregate {
                Some(word) => self.bump_as(Kind::Anonymous(word)),
                None => self.missing(Kind::Anonymous("SUM")),
            }
        }
    }
}
