//! Parsing module for HyperQL
//!
//!     This module turns source text into a concrete syntax [`Tree`]:
//!         1. Lexing: logos tokenization, comments kept as extras. See [lexing](crate::hyperql::lexing).
//!         2. Parsing: recursive descent over the significant tokens, one method per grammar
//!            rule, with operator precedence climbing for expressions. See [grammar].
//!         3. Building: start/finish events are turned into nodes with byte ranges and
//!            line:column positions. See [builder](crate::hyperql::syntax::builder).
//!
//! Error Recovery
//!
//!     Parsing never fails. Input that does not fit the grammar ends up in the tree as
//!     `ERROR` nodes, and required tokens that are absent become zero-width `MISSING`
//!     nodes, so that the tree always covers the whole source text and editors can keep
//!     working on half-typed queries. Diagnostics are derived from the tree afterwards
//!     (see [`Tree::diagnostics`]).
//!
//! Incremental Parsing
//!
//!     [`Parser::parse`] accepts the previous tree of a document, adjusted with
//!     [`Tree::edit`]. Unchanged top-level statements are carried over; the result is
//!     identical to parsing the new text from scratch.

mod engine;
mod grammar;
pub mod parser;

pub use parser::{ParseStats, Parser};

use crate::hyperql::syntax::Tree;

/// Parse a complete source text.
pub fn parse_source(source: &str) -> Tree {
    Parser::new().parse(source, None)
}
