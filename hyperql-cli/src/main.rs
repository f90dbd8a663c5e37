//! Command-line interface for HyperQL
//! This binary inspects HyperQL files: syntax trees, diagnostics, tokens and the language descriptor.
//!
//! Usage:
//!   hyperql parse `<path>` [--format `<format>`] [--ranges] [--anonymous]   - Print the syntax tree
//!   hyperql check `<path>`...                                             - Report problems
//!   hyperql tokens `<path>` [--format json|simple]                        - Print the lexemes
//!   hyperql language                                                    - Print the descriptor
//!
//! Every subcommand accepts `--config <file>`, layered over the built-in defaults, and `-v`
//! (repeatable) to raise the log level. `RUST_LOG` takes precedence over `-v`.

mod commands;

use clap::{Arg, ArgAction, ArgMatches, Command};
use hyperql_config::{HyperqlConfig, Loader};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use commands::CliError;

fn build_cli() -> Command {
    Command::new("hyperql")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for inspecting HyperQL files")
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_name("FILE")
                .help("Configuration file layered over the defaults"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("Increase log output (-v info, -vv debug, -vvv trace)"),
        )
        .subcommand(
            Command::new("parse")
                .about("Parse a file and print its syntax tree")
                .arg(Arg::new("path").help("Path to the HyperQL file").required(true))
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .value_parser(["sexp", "treeviz", "json", "yaml"])
                        .help("Output format (default from configuration: sexp)"),
                )
                .arg(
                    Arg::new("ranges")
                        .long("ranges")
                        .action(ArgAction::SetTrue)
                        .help("Include byte spans and positions"),
                )
                .arg(
                    Arg::new("anonymous")
                        .long("anonymous")
                        .action(ArgAction::SetTrue)
                        .help("Include keywords and punctuation"),
                )
                .arg(
                    Arg::new("line-numbers")
                        .long("line-numbers")
                        .action(ArgAction::SetTrue)
                        .help("Prefix treeviz lines with source line numbers"),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Report syntax errors and schema warnings")
                .arg(
                    Arg::new("paths")
                        .help("Files to check")
                        .required(true)
                        .num_args(1..),
                )
                .arg(
                    Arg::new("warnings-as-errors")
                        .long("warnings-as-errors")
                        .action(ArgAction::SetTrue)
                        .help("Fail when only warnings were reported"),
                ),
        )
        .subcommand(
            Command::new("tokens")
                .about("Print the lexemes of a file")
                .arg(Arg::new("path").help("Path to the HyperQL file").required(true))
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .value_parser(["json", "simple"])
                        .default_value("json"),
                ),
        )
        .subcommand(Command::new("language").about("Print the language descriptor as JSON"))
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // Logs go to stderr so they never mix with tree output
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn load_config(matches: &ArgMatches) -> Result<HyperqlConfig, CliError> {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        tracing::info!(path = %path, "loading configuration");
        loader = loader.with_file(path);
    }
    Ok(loader.build()?)
}

fn run(matches: &ArgMatches) -> Result<ExitCode, CliError> {
    let config = load_config(matches)?;

    match matches.subcommand() {
        Some(("parse", sub)) => {
            let path = required(sub, "path");
            let format = sub
                .get_one::<String>("format")
                .map(String::as_str)
                .unwrap_or(config.parse.format.as_str());
            let options = commands::ParseOptions {
                format,
                anonymous: sub.get_flag("anonymous") || config.parse.anonymous,
                ranges: sub.get_flag("ranges") || config.parse.ranges,
                line_numbers: sub.get_flag("line-numbers") || config.parse.line_numbers,
            };
            commands::parse(path, &options)
        }
        Some(("check", sub)) => {
            let paths: Vec<&str> = sub
                .get_many::<String>("paths")
                .into_iter()
                .flatten()
                .map(String::as_str)
                .collect();
            let mut check = config.check.clone();
            check.warnings_as_errors |= sub.get_flag("warnings-as-errors");
            commands::check(&paths, &check)
        }
        Some(("tokens", sub)) => {
            let format = sub
                .get_one::<String>("format")
                .map(String::as_str)
                .unwrap_or("json");
            commands::tokens(required(sub, "path"), format)
        }
        Some(("language", _)) => commands::language(),
        _ => Ok(ExitCode::SUCCESS),
    }
}

/// Value of an argument clap already enforces as required.
fn required<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .unwrap_or_default()
}

fn main() -> ExitCode {
    let matches = build_cli().get_matches();
    init_tracing(matches.get_count("verbose"));

    match run(&matches) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        build_cli().debug_assert();
    }

    #[test]
    fn parse_flags() {
        let matches = build_cli()
            .try_get_matches_from(["hyperql", "-vv", "parse", "q.hql", "--format", "json", "--ranges"])
            .unwrap();
        assert_eq!(matches.get_count("verbose"), 2);
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "parse");
        assert_eq!(sub.get_one::<String>("format").unwrap(), "json");
        assert!(sub.get_flag("ranges"));
        assert!(!sub.get_flag("anonymous"));
    }

    #[test]
    fn rejects_unknown_format() {
        let result = build_cli().try_get_matches_from(["hyperql", "parse", "q.hql", "-f", "dot"]);
        assert!(result.is_err());
    }

    #[test]
    fn check_takes_many_paths() {
        let matches = build_cli()
            .try_get_matches_from(["hyperql", "check", "a.hql", "b.hql", "--config", "x.toml"])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        assert_eq!(sub.get_many::<String>("paths").unwrap().count(), 2);
        assert_eq!(sub.get_one::<String>("config").unwrap(), "x.toml");
    }
}
