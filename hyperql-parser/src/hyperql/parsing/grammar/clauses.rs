//! Manipulation statements and their clauses

use crate::hyperql::lexing::Token;
use crate::hyperql::parsing::engine::Engine;
use crate::hyperql::syntax::{Kind, SyntaxKind};

impl Engine<'_> {
    /// `manipulation_statement: repeat1(_clause) optional(";")`
    ///
    /// Clauses keep attaching to the statement for as long as one follows, so
    /// `MATCH ... WHERE ... RETURN ...` is a single statement.
    pub(crate) fn manipulation_statement(&mut self) {
        self.start(SyntaxKind::ManipulationStatement);
        while self.at_clause_start() {
            self.clause();
        }
        self.punct(Token::Semicolon);
        self.finish();
    }

    fn clause(&mut self) {
        match self.nth_text(0) {
            Some("IMPORT") => self.import_clause(),
            Some("MATCH") if self.nth_word(1, "PATH") => self.match_path_clause(),
            Some("MATCH") => self.match_clause(),
            Some("OPTIONAL") => self.optional_match_clause(),
            Some("CREATE") if self.nth_word(1, "EDGE") => self.create_edge_clause(),
            Some("CREATE") => self.create_node_clause(),
            Some("MERGE") => self.merge_clause(),
            Some("SET") => self.set_clause(),
            Some("DELETE") => self.identifier_clause(SyntaxKind::DeleteClause, &["DELETE"]),
            Some("DETACH") => {
                self.identifier_clause(SyntaxKind::DetachDeleteClause, &["DETACH", "DELETE"])
            }
            Some("REMOVE") => self.identifier_clause(SyntaxKind::RemoveClause, &["REMOVE"]),
            Some("WITH") => self.with_clause(),
            Some("WHERE") => self.where_clause(),
            Some("RETURN") => self.return_clause(),
            Some("ORDER") => self.order_by_clause(),
            Some("GROUP") => self.group_by_clause(),
            Some("LIMIT") => self.expression_clause(SyntaxKind::LimitClause, "LIMIT"),
            Some("SKIP") => self.expression_clause(SyntaxKind::SkipClause, "SKIP"),
            Some("UNION") => self.union_clause(),
            Some("UNWIND") => self.unwind_clause(),
            _ => self.error_until(|_| true),
        }
    }

    /// `IMPORT "file.hql" AS name`
    fn import_clause(&mut self) {
        self.start(SyntaxKind::ImportClause);
        self.expect_keyword("IMPORT");
        self.string_literal();
        self.expect_keyword("AS");
        self.identifier();
        self.finish();
    }

    fn match_clause(&mut self) {
        self.start(SyntaxKind::MatchClause);
        self.expect_keyword("MATCH");
        self.pattern();
        self.keyword("CROSS_TYPE");
        if self.at_word("USE") {
            self.start(SyntaxKind::UseIndexHint);
            self.expect_keyword("USE");
            self.expect_keyword("INDEX");
            self.identifier();
            self.finish();
        }
        self.finish();
    }

    /// `MATCH PATH p = pattern [WEIGHT BY field [USING aggregate]]`
    fn match_path_clause(&mut self) {
        self.start(SyntaxKind::MatchPathClause);
        self.expect_keyword("MATCH");
        self.expect_keyword("PATH");
        self.field_identifier("path_var");
        self.expect(Token::Eq);
        self.pattern();
        if self.at_weight_clause() {
            self.weight_clause();
        }
        self.finish();
    }

    fn optional_match_clause(&mut self) {
        self.start(SyntaxKind::OptionalMatchClause);
        self.expect_keyword("OPTIONAL");
        self.expect_keyword("MATCH");
        self.pattern();
        self.finish();
    }

    /// `CREATE NODE v:Type {props};`
    fn create_node_clause(&mut self) {
        self.start(SyntaxKind::CreateNodeClause);
        self.expect_keyword("CREATE");
        self.expect_keyword("NODE");
        self.typed_variable();
        if self.at(Token::LBrace) {
            self.map_literal();
        } else {
            self.missing(Kind::Named(SyntaxKind::MapLiteral));
        }
        self.expect_closer(Token::Semicolon);
        self.finish();
    }

    /// `CREATE EDGE v:Type {prop: value, role -> node};`
    fn create_edge_clause(&mut self) {
        self.start(SyntaxKind::CreateEdgeClause);
        self.expect_keyword("CREATE");
        self.expect_keyword("EDGE");
        self.typed_variable();
        self.assignment_block();
        self.expect_closer(Token::Semicolon);
        self.finish();
    }

    /// `MERGE (v:Type {...}) ON CREATE SET ... ON MATCH SET ...`
    fn merge_clause(&mut self) {
        self.start(SyntaxKind::MergeClause);
        self.expect_keyword("MERGE");
        self.expect(Token::LParen);
        self.typed_variable();
        self.assignment_block();
        self.expect_closer(Token::RParen);
        while self.at_word("ON") && (self.nth_word(1, "CREATE") || self.nth_word(1, "MATCH")) {
            self.on_action();
        }
        self.finish();
    }

    fn on_action(&mut self) {
        self.start(SyntaxKind::OnAction);
        self.expect_keyword("ON");
        if !self.keyword("CREATE") {
            self.expect_keyword("MATCH");
        }
        self.expect_keyword("SET");
        self.comma_separated(|p| p.assignment(false));
        self.finish();
    }

    /// `variable: type` as used by CREATE and MERGE.
    fn typed_variable(&mut self) {
        self.field_identifier("variable");
        self.expect(Token::Colon);
        self.field_identifier("type");
    }

    /// `{ name: value, role -> node, ... }`
    fn assignment_block(&mut self) {
        self.expect(Token::LBrace);
        self.optional_comma_separated(Self::at_identifier, |p| {
            let kind = if p.nth(1, Token::Arrow) {
                SyntaxKind::RoleAssignment
            } else {
                SyntaxKind::PropertyAssignment
            };
            p.start(kind);
            p.identifier();
            if kind == SyntaxKind::RoleAssignment {
                p.expect(Token::Arrow);
            } else {
                p.expect(Token::Colon);
            }
            p.expression();
            p.finish();
        });
        self.expect_closer(Token::RBrace);
    }

    fn set_clause(&mut self) {
        self.start(SyntaxKind::SetClause);
        self.expect_keyword("SET");
        self.comma_separated(|p| p.assignment(true));
        self.finish();
    }

    /// `n.prop = value`, and with `atomic` also `n.prop += value` and `n.prop -= value`.
    fn assignment(&mut self, atomic: bool) {
        let checkpoint = self.checkpoint();
        self.property_access();
        let kind = if atomic && self.at(Token::PlusEq) {
            SyntaxKind::AtomicAppend
        } else if atomic && self.at(Token::MinusEq) {
            SyntaxKind::AtomicRemove
        } else {
            SyntaxKind::AssignmentExpression
        };
        self.start_at(checkpoint, kind);
        match kind {
            SyntaxKind::AtomicAppend => self.expect(Token::PlusEq),
            SyntaxKind::AtomicRemove => self.expect(Token::MinusEq),
            _ => self.expect(Token::Eq),
        }
        self.expression();
        self.finish();
    }

    /// DELETE, DETACH DELETE and REMOVE: keywords followed by names.
    fn identifier_clause(&mut self, kind: SyntaxKind, words: &[&'static str]) {
        self.start(kind);
        for word in words {
            self.expect_keyword(word);
        }
        self.comma_separated(Self::identifier);
        self.finish();
    }

    /// `WITH projections [WHERE condition]`
    fn with_clause(&mut self) {
        self.start(SyntaxKind::WithClause);
        self.expect_keyword("WITH");
        self.comma_separated(Self::projection);
        if self.at_word("WHERE") {
            self.where_clause();
        }
        self.finish();
    }

    fn where_clause(&mut self) {
        self.expression_clause(SyntaxKind::WhereClause, "WHERE");
    }

    /// A keyword followed by one expression: WHERE, LIMIT and SKIP.
    fn expression_clause(&mut self, kind: SyntaxKind, word: &'static str) {
        self.start(kind);
        self.expect_keyword(word);
        self.expression();
        self.finish();
    }

    fn group_by_clause(&mut self) {
        self.start(SyntaxKind::GroupByClause);
        self.expect_keyword("GROUP");
        self.expect_keyword("BY");
        self.comma_separated(Self::expression);
        self.finish();
    }

    fn order_by_clause(&mut self) {
        self.start(SyntaxKind::OrderByClause);
        self.expect_keyword("ORDER");
        self.expect_keyword("BY");
        self.comma_separated(|p| {
            p.expression();
            p.sort_direction();
        });
        self.finish();
    }

    /// `RETURN [DISTINCT] projections`
    pub(crate) fn return_clause(&mut self) {
        self.start(SyntaxKind::ReturnClause);
        self.expect_keyword("RETURN");
        self.keyword("DISTINCT");
        self.comma_separated(Self::projection);
        self.finish();
    }

    /// `_projection_element: expression [AS alias]`
    fn projection(&mut self) {
        self.expression();
        if self.keyword("AS") {
            self.identifier();
        }
    }

    fn union_clause(&mut self) {
        self.start(SyntaxKind::UnionClause);
        self.expect_keyword("UNION");
        self.keyword("ALL");
        self.finish();
    }

    /// `UNWIND list AS item`
    fn unwind_clause(&mut self) {
        self.start(SyntaxKind::UnwindClause);
        self.expect_keyword("UNWIND");
        self.expression();
        self.expect_keyword("AS");
        self.identifier();
        self.finish();
    }
}

#[cfg(test)]
mod tests {
    use crate::hyperql::parsing::parse_source;
    use crate::hyperql::syntax::SyntaxKind;

    fn sexp(source: &str) -> String {
        parse_source(source).root_node().to_sexp()
    }

    #[test]
    fn test_clauses_form_one_statement() {
        let source = "MATCH (p:Person) WHERE p.age > 30 RETURN p.name AS name ORDER BY name DESC LIMIT 10;";
        let tree = parse_source(source);
        assert!(!tree.has_error());
        let statement = tree.root_node().child(0).unwrap();
        let clauses: Vec<_> = statement.named_children().map(|c| c.kind()).collect();
        assert_eq!(
            clauses,
            vec!["match_clause", "where_clause", "return_clause", "order_by_clause", "limit_clause"]
        );
        assert_eq!(statement.child(statement.child_count() - 1).unwrap().kind(), ";");
    }

    #[test]
    fn test_match_clause_hints() {
        assert_eq!(
            sexp("MATCH (a:A) CROSS_TYPE USE INDEX by_name"),
            "(source_file (manipulation_statement (match_clause (pattern (path_pattern \
             (node_pattern variable: (identifier) type: (identifier)))) (use_index_hint (identifier)))))"
        );
    }

    #[test]
    fn test_optional_match_and_import() {
        assert_eq!(
            sexp("IMPORT \"lib.hql\" AS lib OPTIONAL MATCH (x)"),
            "(source_file (manipulation_statement (import_clause (string_literal) (identifier)) \
             (optional_match_clause (pattern (path_pattern (node_pattern variable: (identifier)))))))"
        );
    }

    #[test]
    fn test_create_clauses() {
        assert_eq!(
            sexp("CREATE NODE p:Person {name: \"Ada\"}; CREATE EDGE w:Wrote {since: 1843, author -> p};"),
            "(source_file (manipulation_statement \
             (create_node_clause variable: (identifier) type: (identifier) (map_literal (identifier) (string_literal))) \
             (create_edge_clause variable: (identifier) type: (identifier) \
             (property_assignment (identifier) (integer_literal)) (role_assignment (identifier) (identifier)))))"
        );
    }

    #[test]
    fn test_create_node_without_properties() {
        assert_eq!(
            sexp("CREATE NODE p:Person;"),
            "(source_file (manipulation_statement (create_node_clause variable: (identifier) \
             type: (identifier) (MISSING map_literal))))"
        );
    }

    #[test]
    fn test_merge_with_actions() {
        assert_eq!(
            sexp("MERGE (u:User {email: $e}) ON CREATE SET u.visits = 1 ON MATCH SET u.visits = u.visits + 1"),
            "(source_file (manipulation_statement (merge_clause variable: (identifier) type: (identifier) \
             (property_assignment (identifier) (variable (identifier))) \
             (on_action (assignment_expression (property_access object: (identifier) property: (identifier)) \
             (integer_literal))) \
             (on_action (assignment_expression (property_access object: (identifier) property: (identifier)) \
             (binary_expression (property_access object: (identifier) property: (identifier)) (integer_literal)))))))"
        );
    }

    #[test]
    fn test_set_operators() {
        let tree = parse_source("MATCH (n) SET n.a = 1, n.tags += \"x\", n.tags -= \"y\"");
        assert!(!tree.has_error());
        let set = tree
            .root_node()
            .descendants_of_kind(SyntaxKind::SetClause)
            .next()
            .unwrap();
        let kinds: Vec<_> = set.named_children().map(|c| c.kind()).collect();
        assert_eq!(kinds, vec!["assignment_expression", "atomic_append", "atomic_remove"]);
    }

    #[test]
    fn test_set_requires_property() {
        assert_eq!(
            sexp("SET n = 1"),
            "(source_file (manipulation_statement (set_clause (assignment_expression \
             (property_access object: (identifier) (MISSING \".\") property: (MISSING identifier)) \
             (integer_literal)))))"
        );
    }

    #[test]
    fn test_delete_remove_detach() {
        assert_eq!(
            sexp("MATCH (a) DETACH DELETE a, b REMOVE c DELETE d"),
            "(source_file (manipulation_statement (match_clause (pattern (path_pattern \
             (node_pattern variable: (identifier))))) (detach_delete_clause (identifier) (identifier)) \
             (remove_clause (identifier)) (delete_clause (identifier))))"
        );
    }

    #[test]
    fn test_with_owns_its_where() {
        assert_eq!(
            sexp("WITH a, count(b) AS c WHERE c > 1 RETURN DISTINCT a"),
            "(source_file (manipulation_statement (with_clause (identifier) \
             (function_call name: (identifier) (identifier)) (identifier) \
             (where_clause (binary_expression (identifier) (integer_literal)))) \
             (return_clause (identifier))))"
        );
    }

    #[test]
    fn test_group_skip_union_unwind() {
        assert_eq!(
            sexp("UNWIND [1, 2] AS x GROUP BY x SKIP 5 UNION ALL RETURN x"),
            "(source_file (manipulation_statement (unwind_clause (list_literal (integer_literal) \
             (integer_literal)) (identifier)) (group_by_clause (identifier)) (skip_clause (integer_literal)) \
             (union_clause) (return_clause (identifier))))"
        );
    }

    #[test]
    fn test_missing_pattern_closer() {
        let tree = parse_source("MATCH (a RETURN a");
        assert!(tree.has_error());
        assert_eq!(
            tree.root_node().to_sexp(),
            "(source_file (manipulation_statement (match_clause (pattern (path_pattern \
             (node_pattern variable: (identifier) (MISSING \")\"))))) (return_clause (identifier))))"
        );
    }
}
