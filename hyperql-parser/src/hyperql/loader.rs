//! Source loading utilities
//!
//! [`load_source`] reads a HyperQL file into a [`LoadedSource`], which remembers where the
//! text came from and offers the usual shortcuts. Used by the CLI and by tests that read
//! fixtures.
//!
//! ```rust,ignore
//! use hyperql_parser::hyperql::loader::{load_source, LoadedSource};
//!
//! // From file
//! let tree = load_source("schema.hql")?.parse();
//!
//! // From string
//! let tokens = LoadedSource::from_string("MATCH (n) RETURN n;").tokenize();
//! ```

use crate::hyperql::lexing::{tokenize, Lexeme};
use crate::hyperql::parsing::parse_source;
use crate::hyperql::syntax::Tree;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error that can occur when loading sources
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct LoadedSource {
    path: Option<PathBuf>,
    text: String,
}

/// Read a source file.
pub fn load_source<P: AsRef<Path>>(path: P) -> Result<LoadedSource, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "loaded source");
    Ok(LoadedSource {
        path: Some(path.to_path_buf()),
        text,
    })
}

impl LoadedSource {
    pub fn from_string<S: Into<String>>(text: S) -> Self {
        LoadedSource {
            path: None,
            text: text.into(),
        }
    }

    /// The file this source was read from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Name used in messages: the path, or `<input>` for in-memory sources.
    pub fn display_name(&self) -> String {
        match &self.path {
            Some(path) => path.display().to_string(),
            None => "<input>".to_string(),
        }
    }

    pub fn parse(&self) -> Tree {
        parse_source(&self.text)
    }

    pub fn tokenize(&self) -> Vec<Lexeme> {
        tokenize(&self.text)
    }

    pub fn into_text(self) -> String {
        self.text
    }
}
