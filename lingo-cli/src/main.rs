//! Command-line interface for lingo
//! This binary inspects and validates Lingo level and init files.
//!
//! Usage:
//!   lingo parse `<file>` [--line `<n>`]    - Print canonical literals or the AST
//!   lingo level `<file>`                 - Load a level and summarize it
//!   lingo init `<file>` --kind `<kind>`    - Decode a tiles/props/materials/effects file
//!   lingo check `<files>`...             - Parse every line, reporting failures
//!
//! Global options: --config `<file>`, --format text|json|yaml, -v
//! Configuration keys can also be set with `LINGO_<SECTION>__<KEY>` variables.

mod output;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use lingo_config::{LingoConfig, Loader, OutputFormat};
use lingo_parser::lingo::init::{decode_init, DefinitionKind, InitSchema};
use lingo_parser::lingo::level::load_level;
use lingo_parser::lingo::parse;
use output::{Failure, ParsedLine};
use rayon::prelude::*;
use tracing::{debug, warn, warn_span};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    let matches = Command::new("lingo")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for inspecting Lingo level and init files")
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("Configuration file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .global(true)
                .value_parser(OutputFormat::NAMES)
                .help("Output format (default comes from the configuration)"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("Log more (-v for debug, -vv for trace)"),
        )
        .subcommand(
            Command::new("parse")
                .about("Parse each line and print it back in canonical form")
                .arg(Arg::new("path").help("File to parse").required(true).index(1))
                .arg(
                    Arg::new("line")
                        .long("line")
                        .short('l')
                        .value_parser(value_parser!(usize))
                        .help("Only parse this 1-based line"),
                ),
        )
        .subcommand(
            Command::new("level")
                .about("Load a level file and print a summary")
                .arg(Arg::new("path").help("Level file").required(true).index(1)),
        )
        .subcommand(
            Command::new("init")
                .about("Decode an init file of tile, prop, material or effect definitions")
                .arg(Arg::new("path").help("Init file").required(true).index(1))
                .arg(
                    Arg::new("kind")
                        .long("kind")
                        .short('k')
                        .required(true)
                        .help("Definition kind: tiles, props, materials or effects"),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Parse every line of every file and report failures")
                .arg(
                    Arg::new("paths")
                        .help("Files to check")
                        .required(true)
                        .num_args(1..)
                        .index(1),
                ),
        )
        .get_matches();

    let config = load_config(&matches);
    init_logging(&config, matches.get_count("verbose"));
    init_thread_pool(config.parallel.threads);

    let format = config.output.format;
    let rendered = match matches.subcommand() {
        Some(("parse", sub)) => handle_parse_command(sub, format),
        Some(("level", sub)) => handle_level_command(sub, format, &config),
        Some(("init", sub)) => handle_init_command(sub, format),
        Some(("check", sub)) => handle_check_command(sub, format),
        _ => unreachable!("clap requires a subcommand"),
    };

    match rendered {
        Ok(text) => print!("{}", text),
        Err(message) => fail(&message),
    }
}

/// Print an error and exit with a failure status
fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}

fn load_config(matches: &ArgMatches) -> LingoConfig {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    loader = loader.with_env();
    if let Some(name) = matches.get_one::<String>("format") {
        let format = OutputFormat::from_name(name)
            .unwrap_or_else(|| fail(&format!("Invalid --format: {}", name)));
        loader = loader
            .with_format(format)
            .unwrap_or_else(|e| fail(&format!("Invalid --format: {}", e)));
    }
    loader
        .build()
        .unwrap_or_else(|e| fail(&format!("Configuration error: {}", e)))
}

/// `RUST_LOG` wins over the configured level; `-v` raises the configured level
fn init_logging(config: &LingoConfig, verbosity: u8) {
    let level = match verbosity {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn init_thread_pool(threads: usize) {
    if threads == 0 {
        return;
    }
    if let Err(e) = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
    {
        warn!("could not size the thread pool: {}", e);
    }
}

fn read_source(path: &str) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("Error reading {}: {}", path, e))
}

/// Lines of a file numbered from 1, with every line ending style accepted
fn numbered_lines(source: &str) -> Vec<(usize, String)> {
    source
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.to_string()))
        .collect()
}

/// The literal part of a line, if it has one
///
/// Init files put a `-` before category headers and start comments with `--`;
/// bare-text headers carry no literal at all.
fn literal_of(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with("--") {
        return None;
    }
    match trimmed.strip_prefix('-') {
        Some(header) if header.trim_start().starts_with('[') => Some(header.trim_start()),
        Some(rest) if rest.starts_with(|c: char| c.is_ascii_digit()) => Some(trimmed),
        Some(_) => None,
        None => Some(trimmed),
    }
}

fn handle_parse_command(matches: &ArgMatches, format: OutputFormat) -> Result<String, String> {
    let path = matches
        .get_one::<String>("path")
        .ok_or("path is required")?;
    let source = read_source(path)?;
    let mut lines = numbered_lines(&source);

    if let Some(&wanted) = matches.get_one::<usize>("line") {
        lines.retain(|(number, _)| *number == wanted);
        if lines.is_empty() {
            return Err(format!("{} has no line {}", path, wanted));
        }
    }

    let parsed = lines
        .par_iter()
        .filter_map(|(number, line)| literal_of(line).map(|text| (*number, text)))
        .map(|(number, text)| {
            parse(text)
                .map(|node| ParsedLine { line: number, node })
                .map_err(|e| format!("{}:{}: {}", path, number, e))
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(path = %path, lines = parsed.len(), "parsed file");
    output::render(parsed.as_slice(), format, output::lines_text)
}

fn handle_level_command(
    matches: &ArgMatches,
    format: OutputFormat,
    config: &LingoConfig,
) -> Result<String, String> {
    let path = matches
        .get_one::<String>("path")
        .ok_or("path is required")?;
    let level = load_level(&read_source(path)?).map_err(|e| format!("{}: {}", path, e))?;

    if config.decode.report_fallbacks {
        let _span = warn_span!("level", path = %path).entered();
        level.log_fallbacks();
    }

    output::render(&level, format, output::level_text)
}

fn handle_init_command(matches: &ArgMatches, format: OutputFormat) -> Result<String, String> {
    let path = matches
        .get_one::<String>("path")
        .ok_or("path is required")?;
    let kind_name = matches
        .get_one::<String>("kind")
        .ok_or("kind is required")?;
    let kind = DefinitionKind::from_name(kind_name).ok_or_else(|| {
        let names: Vec<String> = DefinitionKind::ALL.iter().map(|k| k.to_string()).collect();
        format!(
            "Unknown kind '{}'. Available kinds: {}",
            kind_name,
            names.join(", ")
        )
    })?;

    let records = decode_init(&read_source(path)?, InitSchema::for_kind(kind))
        .map_err(|e| format!("{}:{}: {}", path, e.line, e.kind))?;
    output::render(records.as_slice(), format, output::records_text)
}

fn handle_check_command(matches: &ArgMatches, format: OutputFormat) -> Result<String, String> {
    let paths: Vec<&String> = matches
        .get_many::<String>("paths")
        .ok_or("at least one path is required")?
        .collect();

    let failures: Vec<Failure> = paths
        .par_iter()
        .flat_map(|path| check_file(path))
        .collect();

    debug!(files = paths.len(), failures = failures.len(), "checked files");

    if failures.is_empty() {
        return match format {
            OutputFormat::Text => Ok(format!("checked {} file(s), no failures\n", paths.len())),
            _ => output::render(failures.as_slice(), format, output::failures_text),
        };
    }

    let report = output::render(failures.as_slice(), format, output::failures_text)?;
    Err(format!(
        "{}{} failure(s) in {} file(s)",
        report,
        failures.len(),
        paths.len()
    ))
}

fn check_file(path: &str) -> Vec<Failure> {
    let source = match read_source(path) {
        Ok(source) => source,
        Err(message) => {
            return vec![Failure {
                path: path.to_string(),
                line: None,
                message,
            }]
        }
    };

    numbered_lines(&source)
        .par_iter()
        .filter_map(|(number, line)| {
            let text = literal_of(line)?;
            parse(text).err().map(|e| Failure {
                path: path.to_string(),
                line: Some(*number),
                message: e.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_carriage_returns_split_lines() {
        let lines = numbered_lines("[1]\r[2]\r\n[3]");
        assert_eq!(
            lines,
            vec![
                (1, "[1]".to_string()),
                (2, "[2]".to_string()),
                (3, "[3]".to_string())
            ]
        );
    }

    #[test]
    fn headers_and_comments() {
        assert_eq!(literal_of("-[\"Walls\", color(1, 2, 3)]"), Some("[\"Walls\", color(1, 2, 3)]"));
        assert_eq!(literal_of("-Walls"), None);
        assert_eq!(literal_of("-12"), Some("-12"));
        assert_eq!(literal_of("-- comment"), None);
        assert_eq!(literal_of("   "), None);
        assert_eq!(literal_of(" [#nm: \"A\"] "), Some("[#nm: \"A\"]"));
    }
}
