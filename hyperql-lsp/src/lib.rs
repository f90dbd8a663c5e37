//! Language Server Protocol (LSP) implementation for HyperQL
//!
//!     This crate provides language server capabilities for HyperQL files, for any
//!     LSP-compatible editor. The Zed extension launches the `hyperql-lsp` binary from `PATH`.
//!
//! Feature Set
//!
//!     1. Diagnostics (textDocument/publishDiagnostics):
//!         - Syntax errors and missing tokens from the parser
//!         - Duplicate and empty schema definitions
//!
//!     2. Document Symbols (textDocument/documentSymbol):
//!         - One symbol per `DEFINE` statement, members as children
//!
//!     3. Semantic Tokens (textDocument/semanticTokens/full):
//!         - Context-sensitive keywords, types, functions, properties, variables, literals
//!
//!     4. Folding Ranges (textDocument/foldingRange):
//!         - Multi-line statements, brace bodies, block comments
//!
//!     5. Hover (textDocument/hover):
//!         - The chain of syntax nodes under the cursor
//!
//!     Each feature can be switched off in the `[lsp]` section of the configuration.
//!
//! Architecture
//!
//!     LSP Layer (tower-lsp):
//!         - JSON-RPC, capability negotiation, request routing
//!
//!     Server Layer (this crate):
//!         - Implements LanguageServer
//!         - Keeps one syntax tree per open document and re-parses it incrementally on
//!           every change (full text sync; the change is diffed into a single edit)
//!         - Thin: calls the feature layer and converts the results to LSP types
//!
//!     Feature Layer:
//!         - Stateless functions over a tree and its source text
//!         - All logic and dense unit tests
//!
//! Usage
//!
//!     Binary:
//!         $ hyperql-lsp
//!         Starts the language server on stdin/stdout for editor integration. Logs go to
//!         stderr and honour `RUST_LOG`.

pub mod features;
pub mod server;

pub use server::HyperqlLanguageServer;
