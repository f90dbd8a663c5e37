//! Format registry for syntax tree output
//!
//! This module provides a pluggable registry of tree output formats. Each format implements
//! the `Formatter` trait and can be registered with `FormatRegistry`.

use super::serialize::{to_json, to_yaml};
use super::treeviz::to_treeviz_str_with_options;
use crate::hyperql::syntax::Tree;
use std::collections::HashMap;
use thiserror::Error;

/// Error that can occur during formatting
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Format not found in registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),
    /// Error during serialization
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// What a formatter includes beyond the named nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatOptions {
    /// Include anonymous tokens (keywords, punctuation).
    pub anonymous: bool,
    /// Include positions and byte spans.
    pub ranges: bool,
    /// Prefix lines with line numbers, where the format is line oriented.
    pub line_numbers: bool,
}

/// Trait for tree formatters
pub trait Formatter: Send + Sync {
    /// The name of this format (e.g., "sexp", "treeviz")
    fn name(&self) -> &str;

    fn format(&self, tree: &Tree, source: &str, options: &FormatOptions)
        -> Result<String, FormatError>;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }
}

pub struct SexpFormatter;

impl Formatter for SexpFormatter {
    fn name(&self) -> &str {
        "sexp"
    }

    fn format(&self, tree: &Tree, _source: &str, _options: &FormatOptions) -> Result<String, FormatError> {
        let mut output = tree.root_node().to_sexp();
        output.push('\n');
        Ok(output)
    }

    fn description(&self) -> &str {
        "Tree-sitter style s-expression of the named nodes"
    }
}

pub struct TreevizFormatter;

impl Formatter for TreevizFormatter {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn format(&self, tree: &Tree, source: &str, options: &FormatOptions) -> Result<String, FormatError> {
        Ok(to_treeviz_str_with_options(tree, source, options))
    }

    fn description(&self) -> &str {
        "Visual tree representation with box connectors and icons"
    }
}

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn format(&self, tree: &Tree, source: &str, options: &FormatOptions) -> Result<String, FormatError> {
        to_json(tree, source, options)
    }

    fn description(&self) -> &str {
        "Node records as pretty-printed JSON"
    }
}

pub struct YamlFormatter;

impl Formatter for YamlFormatter {
    fn name(&self) -> &str {
        "yaml"
    }

    fn format(&self, tree: &Tree, source: &str, options: &FormatOptions) -> Result<String, FormatError> {
        to_yaml(tree, source, options)
    }

    fn description(&self) -> &str {
        "Node records as YAML"
    }
}

/// Registry of tree formatters, looked up by name.
pub struct FormatRegistry {
    formatters: HashMap<String, Box<dyn Formatter>>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formatters: HashMap::new(),
        }
    }

    /// Register a formatter, replacing any formatter of the same name.
    pub fn register<F: Formatter + 'static>(&mut self, formatter: F) {
        self.formatters
            .insert(formatter.name().to_string(), Box::new(formatter));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Formatter> {
        self.formatters.get(name).map(|f| f.as_ref())
    }

    pub fn has(&self, name: &str) -> bool {
        self.formatters.contains_key(name)
    }

    pub fn format(
        &self,
        tree: &Tree,
        source: &str,
        format: &str,
        options: &FormatOptions,
    ) -> Result<String, FormatError> {
        let formatter = self
            .get(format)
            .ok_or_else(|| FormatError::FormatNotFound(format.to_string()))?;
        formatter.format(tree, source, options)
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formatters.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(SexpFormatter);
        registry.register(TreevizFormatter);
        registry.register(JsonFormatter);
        registry.register(YamlFormatter);
        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hyperql::parsing::parse_source;

    struct TestFormatter;
    impl Formatter for TestFormatter {
        fn name(&self) -> &str {
            "test"
        }
        fn format(&self, _tree: &Tree, _source: &str, _options: &FormatOptions) -> Result<String, FormatError> {
            Ok("test output".to_string())
        }
    }

    #[test]
    fn test_registry_register() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormatter);

        assert!(registry.has("test"));
        assert_eq!(registry.list_formats(), vec!["test"]);
        assert_eq!(registry.get("test").unwrap().description(), "");
    }

    #[test]
    fn test_defaults() {
        let registry = FormatRegistry::default();
        assert_eq!(registry.list_formats(), vec!["json", "sexp", "treeviz", "yaml"]);
    }

    #[test]
    fn test_format_by_name() {
        let source = "EXPLAIN";
        let tree = parse_source(source);
        let registry = FormatRegistry::with_defaults();
        let output = registry
            .format(&tree, source, "sexp", &FormatOptions::default())
            .unwrap();
        assert_eq!(output, "(source_file (system_statement))\n");
    }

    #[test]
    fn test_format_not_found() {
        let source = "EXPLAIN";
        let registry = FormatRegistry::new();
        let result = registry.format(&parse_source(source), source, "dot", &FormatOptions::default());
        assert_eq!(result, Err(FormatError::FormatNotFound("dot".to_string())));
        assert_eq!(result.unwrap_err().to_string(), "Format 'dot' not found");
    }
}
