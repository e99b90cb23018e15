//! Output rendering for CLI commands
//!
//! Every command produces a serializable value. JSON and YAML dump it as is; text
//! output uses a per-command summary instead.

use lingo_config::OutputFormat;
use lingo_parser::lingo::init::InitRecord;
use lingo_parser::lingo::level::Level;
use lingo_parser::lingo::Node;
use serde::Serialize;
use std::fmt::Write;

/// One parsed line of a file, numbered from 1
#[derive(Debug, Serialize)]
pub struct ParsedLine {
    pub line: usize,
    pub node: Node,
}

/// A line that failed to parse or decode
#[derive(Debug, Serialize)]
pub struct Failure {
    pub path: String,
    pub line: Option<usize>,
    pub message: String,
}

pub fn render<T, F>(value: &T, format: OutputFormat, text: F) -> Result<String, String>
where
    T: Serialize + ?Sized,
    F: FnOnce(&T) -> String,
{
    match format {
        OutputFormat::Text => Ok(text(value)),
        OutputFormat::Json => serde_json::to_string_pretty(value)
            .map(|mut s| {
                s.push('\n');
                s
            })
            .map_err(|e| format!("JSON serialization failed: {}", e)),
        OutputFormat::Yaml => {
            serde_yaml::to_string(value).map_err(|e| format!("YAML serialization failed: {}", e))
        }
    }
}

/// Canonical literal text, one parsed line per output line
pub fn lines_text(lines: &[ParsedLine]) -> String {
    lines.iter().map(|parsed| format!("{}\n", parsed.node)).collect()
}

pub fn level_text(level: &Level) -> String {
    let mut out = String::new();
    let effects: Vec<&str> = level.effects.iter().map(|e| e.name.as_str()).collect();
    let _ = writeln!(out, "size: {}x{}", level.width(), level.height());
    let _ = writeln!(out, "effects: {}", effects.join(", "));
    let props: Vec<&str> = level.props.iter().map(|p| p.name.as_str()).collect();
    let _ = writeln!(out, "props: {}", props.join(", "));
    let _ = writeln!(out, "cameras: {}", level.cameras.len());
    let _ = writeln!(
        out,
        "water: {}",
        if level.water.has_water() {
            format!(
                "level {}, {}",
                level.water.level,
                if level.water.in_front { "in front" } else { "behind" }
            )
        } else {
            "none".to_string()
        }
    );
    let _ = writeln!(
        out,
        "terrain: {}",
        if level.default_terrain { "solid" } else { "open" }
    );
    let _ = writeln!(out, "fallbacks: {}", level.fallbacks.len());
    out
}

pub fn records_text(records: &[InitRecord]) -> String {
    let mut out = String::new();
    let mut category: Option<&str> = None;
    for record in records {
        if category != Some(record.category.as_str()) {
            let _ = writeln!(out, "{}", record.category);
            category = Some(&record.category);
        }
        let _ = writeln!(out, "  {:>4}  {}", record.line, record.name);
        for option in record.effect_options() {
            let _ = writeln!(
                out,
                "          {} = {} [{}]",
                option.name,
                option.default,
                option.values.join(", ")
            );
        }
    }
    out
}

pub fn failures_text(failures: &[Failure]) -> String {
    failures
        .iter()
        .map(|failure| match failure.line {
            Some(line) => format!("{}:{}: {}\n", failure.path, line, failure.message),
            None => format!("{}: {}\n", failure.path, failure.message),
        })
        .collect()
}
