//! Testing utilities for syntax tree assertions
//!
//!     Grammar tests follow two rules:
//!
//!         1. Prefer the verified sample files (via [samples]) over ad-hoc query strings
//!            for anything larger than the construct under test. The samples parse without
//!            errors and cover every statement kind, so they are kept in step with the
//!            grammar in one place.
//!         2. Assert on structure, not on debug output. Use [assert_tree](fn@assert_tree)
//!            for fluent checks, or compare s-expressions for small, exact shapes.
//!
//!     Examples:
//!
//!     ```rust,ignore
//!     use hyperql_parser::hyperql::testing::{assert_tree, samples::Sample};
//!
//!     let tree = Sample::Schema.parse();
//!     assert_tree(&tree, Sample::Schema.source())
//!         .no_errors()
//!         .statement(0, |s| {
//!             s.kind("definition_statement");
//!         });
//!     ```

pub mod samples;
pub mod tree_assertions;

pub use samples::Sample;
pub use tree_assertions::{assert_tree, NodeAssertion, TreeAssertion};
