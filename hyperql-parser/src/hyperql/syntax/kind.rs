//! Node kinds
//!
//!     A node in the concrete syntax tree is one of three things:
//!         - a named node, produced by a visible grammar rule ([`SyntaxKind`]),
//!         - an anonymous node, produced by a literal string in the grammar (`"MATCH"`, `"{"`,
//!           `"IS NOT NULL"`); its kind is the literal itself,
//!         - an `ERROR` node wrapping input the parser could not fit into the grammar.
//!
//!     Hidden rules (`_statement`, `_expression`, ...) never appear as nodes, so they have no
//!     kind here.

use serde::Serialize;
use std::fmt;

macro_rules! syntax_kinds {
    ($($variant:ident => $name:literal,)*) => {
        /// Named node kinds, one per visible grammar rule.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(rename_all = "snake_case")]
        pub enum SyntaxKind {
            $($variant,)*
        }

        impl SyntaxKind {
            /// Every named kind in grammar order.
            pub const ALL: &'static [SyntaxKind] = &[$(SyntaxKind::$variant,)*];

            /// The rule name as written in the grammar.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(SyntaxKind::$variant => $name,)*
                }
            }

            /// Look up a named kind by its rule name.
            pub fn from_name(name: &str) -> Option<SyntaxKind> {
                match name {
                    $($name => Some(SyntaxKind::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

syntax_kinds! {
    SourceFile => "source_file",
    // Schema definitions
    DefinitionStatement => "definition_statement",
    DefineNamespace => "define_namespace",
    DefineEnum => "define_enum",
    DefineField => "define_field",
    DefineRole => "define_role",
    DefineStruct => "define_struct",
    DefineTrait => "define_trait",
    DefineNode => "define_node",
    DefineEdge => "define_edge",
    ExtendsClause => "extends_clause",
    SchemaBody => "schema_body",
    RoleDefinition => "role_definition",
    DefineIndex => "define_index",
    // Migration and system
    MigrationStatement => "migration_statement",
    ValidateMigration => "validate_migration",
    Migrate => "migrate",
    Alter => "alter",
    MapClause => "map_clause",
    MapEntry => "map_entry",
    DefaultsClause => "defaults_clause",
    SystemStatement => "system_statement",
    BatchStatement => "batch_statement",
    BeginTransaction => "begin_transaction",
    IsolationLevel => "isolation_level",
    // Query and manipulation
    ManipulationStatement => "manipulation_statement",
    ImportClause => "import_clause",
    MatchClause => "match_clause",
    MatchPathClause => "match_path_clause",
    OptionalMatchClause => "optional_match_clause",
    CreateNodeClause => "create_node_clause",
    CreateEdgeClause => "create_edge_clause",
    MergeClause => "merge_clause",
    OnAction => "on_action",
    SetClause => "set_clause",
    RemoveClause => "remove_clause",
    DeleteClause => "delete_clause",
    DetachDeleteClause => "detach_delete_clause",
    WithClause => "with_clause",
    WhereClause => "where_clause",
    GroupByClause => "group_by_clause",
    OrderByClause => "order_by_clause",
    LimitClause => "limit_clause",
    SkipClause => "skip_clause",
    ReturnClause => "return_clause",
    UnionClause => "union_clause",
    UnwindClause => "unwind_clause",
    UseIndexHint => "use_index_hint",
    // Patterns and expressions
    Pattern => "pattern",
    PathPattern => "path_pattern",
    NodePattern => "node_pattern",
    EdgePattern => "edge_pattern",
    BinaryExpression => "binary_expression",
    UnaryExpression => "unary_expression",
    PropertyAssignment => "property_assignment",
    RoleAssignment => "role_assignment",
    AssignmentExpression => "assignment_expression",
    AtomicAppend => "atomic_append",
    AtomicRemove => "atomic_remove",
    PropertyAccess => "property_access",
    FunctionCall => "function_call",
    WindowFunction => "window_function",
    MatchExpression => "match_expression",
    CaseExpression => "case_expression",
    SubqueryExpression => "subquery_expression",
    // Types and literals
    Decorator => "decorator",
    StringLiteral => "string_literal",
    IntegerLiteral => "integer_literal",
    FloatLiteral => "float_literal",
    BooleanLiteral => "boolean_literal",
    NullLiteral => "null_literal",
    Variable => "variable",
    MapLiteral => "map_literal",
    ListLiteral => "list_literal",
    Identifier => "identifier",
    NamespaceIdentifier => "namespace_identifier",
    Comment => "comment",
}

impl SyntaxKind {
    /// Statement-level kinds that may appear directly under `source_file`.
    pub fn is_statement(self) -> bool {
        matches!(
            self,
            SyntaxKind::DefinitionStatement
                | SyntaxKind::ManipulationStatement
                | SyntaxKind::MigrationStatement
                | SyntaxKind::SystemStatement
                | SyntaxKind::BatchStatement
                | SyntaxKind::BeginTransaction
        )
    }

    /// Kinds produced from a single token.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SyntaxKind::StringLiteral
                | SyntaxKind::IntegerLiteral
                | SyntaxKind::FloatLiteral
                | SyntaxKind::NullLiteral
                | SyntaxKind::Identifier
                | SyntaxKind::NamespaceIdentifier
                | SyntaxKind::Comment
        )
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of a syntax tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Named(SyntaxKind),
    Anonymous(&'static str),
    Error,
}

impl Kind {
    pub const ERROR_NAME: &'static str = "ERROR";

    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Named(kind) => kind.as_str(),
            Kind::Anonymous(literal) => literal,
            Kind::Error => Self::ERROR_NAME,
        }
    }

    /// Anonymous nodes are the only unnamed ones; `ERROR` counts as named.
    pub fn is_named(&self) -> bool {
        !matches!(self, Kind::Anonymous(_))
    }

    pub fn syntax_kind(&self) -> Option<SyntaxKind> {
        match self {
            Kind::Named(kind) => Some(*kind),
            _ => None,
        }
    }
}

impl From<SyntaxKind> for Kind {
    fn from(kind: SyntaxKind) -> Self {
        Kind::Named(kind)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for kind in SyntaxKind::ALL {
            assert_eq!(SyntaxKind::from_name(kind.as_str()), Some(*kind));
        }
        assert_eq!(SyntaxKind::from_name("_expression"), None);
    }

    #[test]
    fn test_kind_naming() {
        assert!(Kind::Named(SyntaxKind::Identifier).is_named());
        assert!(Kind::Error.is_named());
        assert!(!Kind::Anonymous("MATCH").is_named());
        assert_eq!(Kind::Anonymous("IS NOT NULL").as_str(), "IS NOT NULL");
        assert_eq!(Kind::Error.to_string(), "ERROR");
    }

    #[test]
    fn test_statement_kinds() {
        assert!(SyntaxKind::BatchStatement.is_statement());
        assert!(!SyntaxKind::MatchClause.is_statement());
        assert!(SyntaxKind::Comment.is_terminal());
        assert!(!SyntaxKind::BooleanLiteral.is_terminal());
    }
}
