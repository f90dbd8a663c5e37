//! Subcommand handlers
//!
//! Each handler writes its report to stdout and returns the exit code. Problems with the
//! invocation itself (unreadable files, bad configuration) are returned as [`CliError`].

use hyperql_config::CheckConfig;
use hyperql_parser::hyperql::formats::{FormatError, FormatOptions, FormatRegistry};
use hyperql_parser::hyperql::lexing::Token;
use hyperql_parser::hyperql::loader::{load_source, LoadError};
use hyperql_parser::hyperql::syntax::format_source_context;
use hyperql_parser::{language as descriptor, Diagnostic, DiagnosticSeverity};
use serde::Serialize;
use std::ops::Range;
use std::process::ExitCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub struct ParseOptions<'a> {
    pub format: &'a str,
    pub anonymous: bool,
    pub ranges: bool,
    pub line_numbers: bool,
}

/// Print the syntax tree of a file. Syntax errors do not fail the command.
pub fn parse(path: &str, options: &ParseOptions) -> Result<ExitCode, CliError> {
    let source = load_source(path)?;
    let tree = source.parse();
    let format_options = FormatOptions {
        anonymous: options.anonymous,
        ranges: options.ranges,
        line_numbers: options.line_numbers,
    };
    let output =
        FormatRegistry::with_defaults().format(&tree, source.text(), options.format, &format_options)?;
    print_block(&output);
    Ok(ExitCode::SUCCESS)
}

/// Print diagnostics for every file; fail if any error (or warning, when configured) was found.
pub fn check(paths: &[&str], config: &CheckConfig) -> Result<ExitCode, CliError> {
    let mut failed = false;
    let mut total = 0;

    for path in paths {
        let source = load_source(path)?;
        let diagnostics = source.parse().diagnostics(source.text());
        tracing::debug!(path = %path, count = diagnostics.len(), "checked file");

        for diagnostic in &diagnostics {
            println!("{}", render_diagnostic(&source.display_name(), diagnostic));
            if config.show_context {
                print!("{}", format_source_context(source.text(), &diagnostic.range));
            }
            failed |= match diagnostic.severity {
                DiagnosticSeverity::Error => true,
                DiagnosticSeverity::Warning => config.warnings_as_errors,
                _ => false,
            };
        }
        total += diagnostics.len();
    }

    if total == 0 {
        println!("No problems found");
    }
    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// `path:line:col: severity[code]: message`, with one-based line and column.
fn render_diagnostic(name: &str, diagnostic: &Diagnostic) -> String {
    let start = diagnostic.range.start;
    let code = diagnostic
        .code
        .as_deref()
        .map(|code| format!("[{code}]"))
        .unwrap_or_default();
    format!(
        "{}:{}:{}: {}{}: {}",
        name,
        start.line + 1,
        start.column + 1,
        diagnostic.severity,
        code,
        diagnostic.message
    )
}

#[derive(Serialize)]
struct TokenRecord<'s> {
    token: Option<Token>,
    span: Range<usize>,
    text: &'s str,
}

/// Print the lexemes of a file, comments and unrecognised input included.
pub fn tokens(path: &str, format: &str) -> Result<ExitCode, CliError> {
    let source = load_source(path)?;
    let text = source.text();
    let lexemes = source.tokenize();

    let output = match format {
        "simple" => lexemes
            .iter()
            .map(|lexeme| {
                let kind = lexeme
                    .token
                    .map(|token| token.to_string())
                    .unwrap_or_else(|| "ERROR".to_string());
                format!(
                    "{}..{} {} {:?}",
                    lexeme.span.start,
                    lexeme.span.end,
                    kind,
                    lexeme.text(text)
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
        _ => {
            let records: Vec<_> = lexemes
                .iter()
                .map(|lexeme| TokenRecord {
                    token: lexeme.token,
                    span: lexeme.span.clone(),
                    text: lexeme.text(text),
                })
                .collect();
            serde_json::to_string_pretty(&records)?
        }
    };
    print_block(&output);
    Ok(ExitCode::SUCCESS)
}

/// Print the language descriptor.
pub fn language() -> Result<ExitCode, CliError> {
    print_block(&serde_json::to_string_pretty(descriptor())?);
    Ok(ExitCode::SUCCESS)
}

fn print_block(output: &str) {
    if output.is_empty() || output.ends_with('\n') {
        print!("{}", output);
    } else {
        println!("{}", output);
    }
}
