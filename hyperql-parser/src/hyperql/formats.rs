//! Output format implementations for syntax trees
//!
//! - sexp: tree-sitter style s-expressions, the format grammar tests are written in
//! - treeviz: one line per node, for reading a parse at a glance
//! - json / yaml: serde dumps of [`serialize::NodeRecord`]s for tooling

pub mod registry;
pub mod serialize;
pub mod sexp;
pub mod treeviz;

pub use registry::{FormatError, FormatOptions, FormatRegistry, Formatter};
pub use serialize::{to_json, to_yaml, NodeRecord};
pub use sexp::to_sexp;
pub use treeviz::{to_treeviz_str, to_treeviz_str_with_options};
