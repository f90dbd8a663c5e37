//! Shared configuration loader for the HyperQL tools.
//!
//! `defaults/hyperql.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`HyperqlConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/hyperql.default.toml");

/// Top-level configuration consumed by HyperQL applications.
#[derive(Debug, Clone, Deserialize)]
pub struct HyperqlConfig {
    pub parse: ParseConfig,
    pub check: CheckConfig,
    pub lsp: LspConfig,
}

/// Defaults for `hyperql parse`.
#[derive(Debug, Clone, Deserialize)]
pub struct ParseConfig {
    pub format: OutputFormat,
    pub anonymous: bool,
    pub ranges: bool,
    pub line_numbers: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    Sexp,
    Treeviz,
    Json,
    Yaml,
}

impl OutputFormat {
    /// Name of the format in the tree format registry.
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Sexp => "sexp",
            OutputFormat::Treeviz => "treeviz",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckConfig {
    pub warnings_as_errors: bool,
    pub show_context: bool,
}

/// Language server features that can be switched off.
#[derive(Debug, Clone, Deserialize)]
pub struct LspConfig {
    pub diagnostics: bool,
    pub document_symbols: bool,
    pub semantic_tokens: bool,
    pub folding_ranges: bool,
    pub hover: bool,
}

impl Default for LspConfig {
    /// Everything enabled, matching the embedded defaults.
    fn default() -> Self {
        Self {
            diagnostics: true,
            document_symbols: true,
            semantic_tokens: true,
            folding_ranges: true,
            hover: true,
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<HyperqlConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<HyperqlConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.parse.format, OutputFormat::Sexp);
        assert!(!config.check.warnings_as_errors);
        assert!(config.lsp.diagnostics);
        assert!(config.lsp.hover);
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("parse.format", "treeviz")
            .expect("override to apply")
            .set_override("check.warnings_as_errors", true)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.parse.format, OutputFormat::Treeviz);
        assert_eq!(config.parse.format.as_str(), "treeviz");
        assert!(config.check.warnings_as_errors);
    }

    #[test]
    fn layers_user_files() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[lsp]\nsemantic_tokens = false\n\n[parse]\nranges = true").unwrap();

        let config = Loader::new()
            .with_file(file.path())
            .build()
            .expect("config to build");
        assert!(!config.lsp.semantic_tokens);
        assert!(config.lsp.document_symbols);
        assert!(config.parse.ranges);
    }

    #[test]
    fn missing_required_file_fails() {
        let result = Loader::new().with_file("/no/such/hyperql.toml").build();
        assert!(result.is_err());

        let config = Loader::new()
            .with_optional_file("/no/such/hyperql.toml")
            .build()
            .expect("optional file may be absent");
        assert_eq!(config.parse.format, OutputFormat::Sexp);
    }

    #[test]
    fn lsp_default_matches_embedded_defaults() {
        let config = load_defaults().expect("defaults to deserialize");
        let fallback = LspConfig::default();
        assert_eq!(config.lsp.diagnostics, fallback.diagnostics);
        assert_eq!(config.lsp.document_symbols, fallback.document_symbols);
        assert_eq!(config.lsp.semantic_tokens, fallback.semantic_tokens);
        assert_eq!(config.lsp.folding_ranges, fallback.folding_ranges);
        assert_eq!(config.lsp.hover, fallback.hover);
    }

    #[test]
    fn rejects_unknown_format() {
        let result = Loader::new()
            .set_override("parse.format", "dot")
            .expect("override to apply")
            .build();
        assert!(result.is_err());
    }
}
