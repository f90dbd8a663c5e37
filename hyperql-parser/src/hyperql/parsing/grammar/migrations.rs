//! Migrations, system statements, batches and transactions

use crate::hyperql::lexing::Token;
use crate::hyperql::parsing::engine::Engine;
use crate::hyperql::syntax::{Kind, SyntaxKind};

const SHOW_TARGETS: &[&str] = &["NODE TYPES", "EDGE TYPES", "FIELDS", "ROLES", "SCHEMA"];

const ISOLATION_LEVELS: &[&str] = &[
    "READ UNCOMMITTED",
    "READ COMMITTED",
    "REPEATABLE READ",
    "SERIALIZABLE",
];

impl Engine<'_> {
    pub(crate) fn migration_statement(&mut self) {
        self.start(SyntaxKind::MigrationStatement);
        match self.nth_text(0) {
            Some("VALIDATE") => {
                self.start(SyntaxKind::ValidateMigration);
                self.expect_keyword("VALIDATE");
                self.expect_keyword("MIGRATION");
                self.migration_body();
                self.finish();
            }
            Some("MIGRATE") => {
                self.start(SyntaxKind::Migrate);
                self.expect_keyword("MIGRATE");
                self.migration_body();
                self.finish();
            }
            _ => self.alter(),
        }
        self.finish();
    }

    /// `from TO to [MAP {...}] [DEFAULTS {...}]`
    fn migration_body(&mut self) {
        self.identifier();
        self.expect_keyword("TO");
        self.identifier();
        if self.at_word("MAP") {
            self.map_clause();
        }
        if self.at_word("DEFAULTS") {
            self.defaults_clause();
        }
    }

    /// `ALTER NODE|EDGE name { ADD f, DROP f, RENAME a TO b }`
    fn alter(&mut self) {
        self.start(SyntaxKind::Alter);
        self.expect_keyword("ALTER");
        if !self.keyword("NODE") {
            self.expect_keyword("EDGE");
        }
        self.identifier();
        self.expect(Token::LBrace);
        self.optional_comma_separated(Self::at_identifier, |p| {
            if p.keyword("ADD") || p.keyword("DROP") {
                p.identifier();
            } else if p.keyword("RENAME") {
                p.identifier();
                p.expect_keyword("TO");
                p.identifier();
            } else {
                p.missing(Kind::Anonymous("ADD"));
                p.identifier();
            }
        });
        self.expect_closer(Token::RBrace);
        self.finish();
    }

    fn map_clause(&mut self) {
        self.start(SyntaxKind::MapClause);
        self.expect_keyword("MAP");
        self.expect(Token::LBrace);
        self.optional_comma_separated(Self::at_identifier, Self::map_entry);
        self.expect_closer(Token::RBrace);
        self.finish();
    }

    /// `old: new` or `DROP [a, b]`
    fn map_entry(&mut self) {
        self.start(SyntaxKind::MapEntry);
        if self.at_word("DROP") && self.nth(1, Token::LBracket) {
            self.expect_keyword("DROP");
            self.expect(Token::LBracket);
            self.identifier_list();
            self.expect_closer(Token::RBracket);
        } else {
            self.identifier();
            self.expect(Token::Colon);
            self.identifier();
        }
        self.finish();
    }

    fn defaults_clause(&mut self) {
        self.start(SyntaxKind::DefaultsClause);
        self.expect_keyword("DEFAULTS");
        self.expect(Token::LBrace);
        self.optional_comma_separated(Self::at_identifier, |p| {
            p.identifier();
            p.expect(Token::Colon);
            p.expect_literal();
        });
        self.expect_closer(Token::RBrace);
        self.finish();
    }

    /// `SHOW target`, `EXPLAIN` or `ANALYZE`
    pub(crate) fn system_statement(&mut self) {
        self.start(SyntaxKind::SystemStatement);
        if self.keyword("SHOW") {
            if !SHOW_TARGETS.iter().any(|target| self.words(target)) {
                self.missing(Kind::Anonymous("SCHEMA"));
            }
        } else if !self.keyword("EXPLAIN") {
            self.expect_keyword("ANALYZE");
        }
        self.finish();
    }

    /// `BATCH { statements } RETURN ...;`
    pub(crate) fn batch_statement(&mut self) {
        self.start(SyntaxKind::BatchStatement);
        self.expect_keyword("BATCH");
        self.expect(Token::LBrace);
        if self.enter_nested(Kind::Named(SyntaxKind::ManipulationStatement)) {
            while !self.at_eof() && !self.at(Token::RBrace) {
                if !self.statement() {
                    self.error_until(|p| p.at_statement_start() || p.at(Token::RBrace));
                }
            }
            self.leave_nested();
        }
        self.expect_closer(Token::RBrace);
        if self.at_word("RETURN") {
            self.return_clause();
        } else {
            self.missing(Kind::Named(SyntaxKind::ReturnClause));
        }
        self.expect_closer(Token::Semicolon);
        self.finish();
    }

    /// `BEGIN [ISOLATION LEVEL level] [ON ERROR CONTINUE];`
    pub(crate) fn begin_transaction(&mut self) {
        self.start(SyntaxKind::BeginTransaction);
        self.expect_keyword("BEGIN");
        if self.keyword("ISOLATION") {
            self.expect_keyword("LEVEL");
            let level = ISOLATION_LEVELS
                .iter()
                .copied()
                .find(|level| self.at_words(&level.split(' ').collect::<Vec<_>>()));
            match level {
                Some(level) => {
                    self.start(SyntaxKind::IsolationLevel);
                    self.words(level);
                    self.finish();
                }
                None => self.missing(Kind::Named(SyntaxKind::IsolationLevel)),
            }
        }
        self.words("ON ERROR CONTINUE");
        self.expect_closer(Token::Semicolon);
        self.finish();
    }
}
