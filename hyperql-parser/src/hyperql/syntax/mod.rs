//! Concrete syntax tree
//!
//!     The tree keeps every token of the input: named nodes for grammar rules, anonymous
//!     nodes for keywords and punctuation, comment nodes for extras, and `ERROR`/`MISSING`
//!     nodes where the input did not fit the grammar.
//!
//!     Nodes know their byte span and line/column positions. Positions are zero-based;
//!     columns count bytes.

pub mod builder;
pub mod diagnostics;
pub mod edit;
pub mod kind;
pub mod node;
pub mod range;
pub mod tree;

pub use diagnostics::{format_source_context, Diagnostic, DiagnosticSeverity};
pub use edit::{EditError, InputEdit};
pub use kind::{Kind, SyntaxKind};
pub use node::{Node, Walk};
pub use range::{Position, Range, SourceLocation};
pub use tree::Tree;
