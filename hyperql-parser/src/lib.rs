//! # hyperql-parser
//!
//! A parser for the HyperQL graph query language.
//!
//! File Layout
//!
//!     src/hyperql
//!       ├── lexing       logos token set and tokenization helpers
//!       ├── language     the grammar-language descriptor (symbols, fields, keywords)
//!       ├── syntax       concrete syntax tree, ranges, edits, diagnostics
//!       ├── parsing      recursive descent engine and the grammar rules
//!       ├── formats      s-expression, treeviz and serde dumps of a tree
//!       ├── ffi          the `tree_sitter_hyperql` C export
//!       └── testing      fluent tree assertions used by the test suites
//!
//! The entry points most callers need are re-exported at the crate root:
//!
//!     let tree = hyperql_parser::parse_source("MATCH (n:Person) RETURN n;");
//!     println!("{}", tree.root_node().to_sexp());
//!
//! For comprehensive testing guidelines, see the [testing module](hyperql::testing).

#![allow(rustdoc::invalid_html_tags)]

pub mod hyperql;

pub use hyperql::language::{language, Language};
pub use hyperql::parsing::{parse_source, ParseStats, Parser};
pub use hyperql::syntax::{
    Diagnostic, DiagnosticSeverity, InputEdit, Kind, Node, Position, Range, SyntaxKind, Tree,
};
