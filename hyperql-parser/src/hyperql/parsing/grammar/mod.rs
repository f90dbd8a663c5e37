//! HyperQL grammar rules
//!
//!     One method per grammar rule, grouped the way the language reference groups them:
//!
//!         definitions   schema definitions (DDL)
//!         migrations    migrations, system statements, batches and transactions
//!         clauses       manipulation statements and their clauses (DML)
//!         patterns      node, edge and path patterns
//!         expressions   operator precedence parsing and primaries
//!         types         data types, decorators and literals
//!
//!     Hidden rules (`_statement`, `_clause`, `_expression`, ...) do not open a node; their
//!     tokens land in the caller's node.

mod clauses;
mod definitions;
mod expressions;
mod migrations;
mod patterns;
mod types;

use super::engine::{Engine, CLAUSE_STARTS, TOP_LEVEL_STARTS};
use crate::hyperql::lexing::Token;
use crate::hyperql::syntax::{Kind, SyntaxKind};

impl Engine<'_> {
    /// `_statement`. Returns false, consuming nothing, when no statement starts here.
    pub(crate) fn statement(&mut self) -> bool {
        if self.at_word("DEFINE") && self.at_definition() {
            self.definition_statement();
        } else if self.at_any_word(&["VALIDATE", "MIGRATE", "ALTER"]) {
            self.migration_statement();
        } else if self.at_any_word(&["SHOW", "EXPLAIN", "ANALYZE"]) {
            self.system_statement();
        } else if self.at_word("BATCH") {
            self.batch_statement();
        } else if self.at_word("BEGIN") {
            self.begin_transaction();
        } else if self.at_clause_start() {
            self.manipulation_statement();
        } else {
            return false;
        }
        true
    }

    /// A name token. Words that start statements or clauses are not taken as names, so a
    /// missing name does not swallow the next clause.
    pub(crate) fn at_identifier(&self) -> bool {
        self.nth_text(0)
            .is_some_and(|word| !TOP_LEVEL_STARTS.contains(&word) && !CLAUSE_STARTS.contains(&word))
    }

    pub(crate) fn identifier(&mut self) {
        if self.at_identifier() {
            self.bump_as(Kind::Named(SyntaxKind::Identifier));
        } else {
            self.missing(Kind::Named(SyntaxKind::Identifier));
        }
    }

    pub(crate) fn field_identifier(&mut self, field: &'static str) {
        self.field(field);
        self.identifier();
    }

    /// `commaSep1(item)`
    pub(crate) fn comma_separated(&mut self, mut item: impl FnMut(&mut Self)) {
        item(self);
        while self.punct(Token::Comma) {
            item(self);
        }
    }

    /// `commaSep(item)`, where `present` tells whether the list is non-empty.
    pub(crate) fn optional_comma_separated(
        &mut self,
        present: impl Fn(&Self) -> bool,
        item: impl FnMut(&mut Self),
    ) {
        if present(self) {
            self.comma_separated(item);
        }
    }

    /// `commaSep(identifier)`
    pub(crate) fn identifier_list(&mut self) {
        self.optional_comma_separated(Self::at_identifier, Self::identifier);
    }

    /// Optional `ASC` / `DESC` after a sort key.
    pub(crate) fn sort_direction(&mut self) {
        if !self.keyword("ASC") {
            self.keyword("DESC");
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::hyperql::parsing::parse_source;

    fn sexp(source: &str) -> String {
        parse_source(source).root_node().to_sexp()
    }

    #[test]
    fn test_statement_kinds() {
        assert_eq!(
            sexp("SHOW SCHEMA EXPLAIN ANALYZE"),
            "(source_file (system_statement) (system_statement) (system_statement))"
        );
        assert_eq!(sexp(""), "(source_file)");
    }

    #[test]
    fn test_clause_words_are_not_names() {
        assert_eq!(
            sexp("DELETE RETURN n"),
            "(source_file (manipulation_statement (delete_clause (MISSING identifier)) (return_clause (identifier))))"
        );
    }

    #[test]
    fn test_unknown_definition_is_an_error() {
        assert_eq!(
            sexp("DEFINE WIDGET x; SHOW ROLES"),
            "(source_file (ERROR (identifier) (identifier)) (system_statement))"
        );
    }
}
