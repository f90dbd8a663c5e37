//! Whole-file tests over the verified samples
//!
//! The valid samples must parse cleanly into the expected statement kinds; the recovery
//! sample must produce every class of diagnostic and still recover the statements that
//! follow each mistake.

use hyperql_parser::hyperql::testing::{assert_tree, Sample};
use hyperql_parser::{DiagnosticSeverity, SyntaxKind};

#[test]
fn test_valid_samples_parse_without_errors() {
    for sample in Sample::ALL.into_iter().filter(|sample| sample.is_valid()) {
        let tree = sample.parse();
        assert!(
            !tree.has_error(),
            "{} has errors: {}",
            sample.name(),
            tree.root_node().to_sexp()
        );
        assert!(
            tree.diagnostics(sample.source()).is_empty(),
            "{} has diagnostics",
            sample.name()
        );
    }
}

#[test]
fn test_schema_sample() {
    let tree = Sample::Schema.parse();
    assert_tree(&tree, Sample::Schema.source())
        .no_errors()
        .statement_count(15)
        .statement(0, |statement| {
            statement
                .kind("definition_statement")
                .named_child_kinds(&["define_namespace"])
                .descendant(SyntaxKind::NamespaceIdentifier, |name| {
                    name.text("app.publishing");
                });
        })
        .statement(13, |statement| {
            statement
                .kind("definition_statement")
                .descendant(SyntaxKind::DefineEdge, |edge| {
                    edge.descendant(SyntaxKind::RoleDefinition, |role| {
                        role.field("name", |n| {
                            n.text("author");
                        })
                        .field("role_type", |t| {
                            t.text("Person");
                        });
                    });
                });
        });

    let comments = tree
        .root_node()
        .children()
        .filter(|node| node.is_extra())
        .count();
    assert_eq!(comments, 2);
}

#[test]
fn test_queries_sample() {
    let tree = Sample::Queries.parse();
    let kinds = vec!["manipulation_statement"; 10];
    assert_tree(&tree, Sample::Queries.source())
        .no_errors()
        .statement_kinds(&kinds)
        .statement(0, |statement| {
            statement.named_child_kinds(&["import_clause"]);
        })
        .statement(8, |statement| {
            // `CREATE ...;` clauses end in their own `;`, so the following clauses join them
            statement.named_child_kinds(&["create_node_clause", "create_edge_clause", "merge_clause"]);
        })
        .statement(9, |statement| {
            statement.named_child_kinds(&[
                "match_clause",
                "detach_delete_clause",
                "union_clause",
                "match_clause",
                "delete_clause",
            ]);
        });
}

#[test]
fn test_migrations_sample() {
    let tree = Sample::Migrations.parse();
    assert_tree(&tree, Sample::Migrations.source())
        .no_errors()
        .statement_kinds(&[
            "migration_statement",
            "migration_statement",
            "migration_statement",
            "migration_statement",
            "system_statement",
            "system_statement",
            "system_statement",
            "system_statement",
            "system_statement",
            "system_statement",
            "system_statement",
        ])
        .statement(0, |statement| {
            statement
                .named_child_kinds(&["validate_migration"])
                .descendant(SyntaxKind::MapClause, |map| {
                    map.named_child_kinds(&["map_entry", "map_entry"]);
                });
        });
}

#[test]
fn test_transactions_sample() {
    let tree = Sample::Transactions.parse();
    assert_tree(&tree, Sample::Transactions.source())
        .no_errors()
        .statement_kinds(&[
            "begin_transaction",
            "batch_statement",
            "begin_transaction",
            "begin_transaction",
        ])
        .statement(0, |statement| {
            statement.descendant(SyntaxKind::IsolationLevel, |level| {
                level.text("READ COMMITTED");
            });
        })
        .statement(1, |statement| {
            statement
                .named_child_kinds(&["manipulation_statement", "return_clause"])
                .named_child(0, |body| {
                    body.named_child_kinds(&[
                        "create_node_clause",
                        "create_node_clause",
                        "match_clause",
                        "set_clause",
                    ]);
                });
        });
}

#[test]
fn test_recovery_sample_reports_every_problem() {
    let source = Sample::Recovery.source();
    let tree = Sample::Recovery.parse();
    assert_tree(&tree, source).has_errors();

    let diagnostics = tree.diagnostics(source);
    let has = |code: &str| {
        diagnostics
            .iter()
            .any(|diagnostic| diagnostic.code.as_deref() == Some(code))
    };
    assert!(has("syntax-error"));
    assert!(has("missing-token"));
    assert!(has("duplicate-definition"));
    assert!(has("empty-definition"));

    let duplicate = diagnostics
        .iter()
        .find(|diagnostic| diagnostic.code.as_deref() == Some("duplicate-definition"))
        .unwrap();
    assert_eq!(duplicate.severity, DiagnosticSeverity::Warning);
    assert_eq!(duplicate.range.start.line, 5);

    let positions: Vec<_> = diagnostics.iter().map(|d| d.range.span.start).collect();
    let mut sorted = positions.clone();
    sorted.sort();
    assert_eq!(positions, sorted, "diagnostics are ordered by position");
}

#[test]
fn test_recovery_resumes_after_errors() {
    let source = Sample::Recovery.source();
    let tree = Sample::Recovery.parse();
    let statements: Vec<_> = tree
        .root_node()
        .children()
        .filter(|node| node.is(SyntaxKind::DefinitionStatement) && !node.has_error())
        .map(|node| node.utf8_text(source))
        .collect();
    assert!(statements.contains(&"DEFINE FIELD name: String;"));
    assert!(statements.contains(&"DEFINE FIELD name: Int;"));

    let last = tree
        .root_node()
        .children()
        .filter(|node| !node.is_extra())
        .last()
        .unwrap();
    assert_eq!(last.kind(), "system_statement");
    assert_eq!(last.utf8_text(source), "SHOW ROLES");
}

#[test]
fn test_samples_tokenize_without_unrecognised_input() {
    for sample in Sample::ALL {
        let lexemes = sample.tokenize();
        assert!(!lexemes.is_empty());
        assert!(
            lexemes.iter().all(|lexeme| lexeme.token.is_some()),
            "{} has unrecognised input",
            sample.name()
        );
    }
}
