//! Configuration for the lingo tools.
//!
//! Values resolve in layers, later ones winning:
//!
//! ```text
//! embedded defaults (`defaults/lingo.default.toml`)
//! the file given with `--config`
//! `LINGO_*` environment variables, `__` between section and key
//! command-line flags
//! ```
//!
//! `LINGO_DECODE__REPORT_FALLBACKS=false` therefore sets `decode.report_fallbacks`.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat, Map};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/lingo.default.toml");

const ENV_PREFIX: &str = "LINGO";

#[derive(Debug, Clone, Deserialize)]
pub struct LingoConfig {
    pub output: OutputConfig,
    pub logging: LoggingConfig,
    pub decode: DecodeConfig,
    pub parallel: ParallelConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

/// How command output is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

impl OutputFormat {
    pub const NAMES: [&'static str; 3] = ["text", "json", "yaml"];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            "yaml" => Some(OutputFormat::Yaml),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
}

/// Knobs for the lenient parts of decoding.
#[derive(Debug, Clone, Deserialize)]
pub struct DecodeConfig {
    pub report_fallbacks: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParallelConfig {
    /// Zero means one worker per core.
    pub threads: usize,
}

/// Builds a [`LingoConfig`] from the layers above.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a TOML file; a missing file is an error at [`Loader::build`].
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer `LINGO_*` variables from the process environment.
    pub fn with_env(self) -> Self {
        self.with_env_vars(None)
    }

    /// Layer `LINGO_*` variables from `vars`, or from the process environment when `None`.
    fn with_env_vars(mut self, vars: Option<Map<String, String>>) -> Self {
        let source = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .source(vars);
        self.builder = self.builder.add_source(source);
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Result<Self, ConfigError> {
        self.builder = self.builder.set_override("output.format", format.name())?;
        Ok(self)
    }

    pub fn build(self) -> Result<LingoConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}
