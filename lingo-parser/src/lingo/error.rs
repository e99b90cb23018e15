//! Error types for every stage of the pipeline
//!
//!     Each stage owns one tagged error type. Parse failures carry the byte offset into the
//!     line; decode failures carry a path into the structure being decoded (for example
//!     `geometry[3][5][1]`); init and level failures add the 1-based line number.
//!
//!     Nothing in this crate recovers from these errors. The only tolerated anomalies are
//!     unknown geometry type codes and feature IDs, which are reported as
//!     [GeoFallback](crate::lingo::decoding::geometry::GeoFallback) values instead.

use crate::lingo::init::DefinitionKind;
use thiserror::Error;

/// Failure to turn one line of text into a [Node](crate::lingo::ast::Node)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at offset {offset}")]
pub struct ParseError {
    /// Byte offset into the parsed line
    pub offset: usize,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(offset: usize, kind: ParseErrorKind) -> Self {
        Self { offset, kind }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("empty input")]
    EmptyInput,
    #[error("malformed token `{text}`")]
    MalformedToken { text: String },
    #[error("unterminated string")]
    UnterminatedString,
    #[error("symbol with empty identifier")]
    EmptySymbol,
    #[error("unbalanced brackets, expected {expected}")]
    UnbalancedBrackets { expected: String },
    #[error("trailing input {found}")]
    TrailingInput { found: String },
    #[error("expected `#key: value` entry in property list, found {found}")]
    AmbiguousPropertyList { found: String },
    #[error("expected {expected}, found {found}")]
    Unexpected { expected: String, found: String },
    #[error("nesting deeper than {limit} levels")]
    TooDeep { limit: usize },
}

/// Failure to decode a parsed node into a domain structure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("{context}: expected {expected}, found {found}")]
    Shape {
        context: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("{context}: expected {expected} elements, found {found}")]
    Arity {
        context: String,
        expected: usize,
        found: usize,
    },
    #[error("{context}: row {row} has {found} columns, expected {expected}")]
    RaggedMatrix {
        context: String,
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("{context}: matrix is {found_height}x{found_width}, expected {height}x{width}")]
    SizeMismatch {
        context: String,
        height: usize,
        width: usize,
        found_height: usize,
        found_width: usize,
    },
    #[error("{context}: missing required property `{property}`")]
    MissingProperty { context: String, property: String },
    #[error("{context}: invalid value `{value}` for `{field}`")]
    InvalidValue {
        context: String,
        field: String,
        value: String,
    },
}

/// Failure while decoding one line of an init file
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct InitError {
    /// 1-based line number in the init file
    pub line: usize,
    pub kind: InitErrorKind,
}

impl InitError {
    pub fn new(line: usize, kind: impl Into<InitErrorKind>) -> Self {
        Self {
            line,
            kind: kind.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InitErrorKind {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("definition must be a property list, found {found}")]
    NotPropertyList { found: &'static str },
    #[error("malformed category header `{text}`")]
    MalformedCategory { text: String },
    #[error("definition `{name}` appears before any category header")]
    NoCategory { name: String },
    #[error("unknown {kind} type `{value}`")]
    UnknownType { kind: DefinitionKind, value: String },
    #[error("{kind} `{name}` is missing required property `{property}`")]
    MissingProperty {
        kind: DefinitionKind,
        name: String,
        property: &'static str,
    },
    #[error("invalid value `{value}` for `{property}`")]
    InvalidValue { property: String, value: String },
}

/// Failure raised by a registry lookup or merge
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("{kind} `{name}` not found")]
    NotFound { kind: DefinitionKind, name: String },
    #[error("duplicate {kind} definition `{name}`")]
    DuplicateDefinition { kind: DefinitionKind, name: String },
    #[error("category `{name}` not found")]
    CategoryNotFound { name: String },
    #[error("effect `{effect}` has no option `{option}`")]
    UnknownOption { effect: String, option: String },
    #[error("effect `{effect}` is missing option `{option}`")]
    MissingOption { effect: String, option: String },
    #[error("effect `{effect}` option `{option}` does not allow `{value}`")]
    InvalidOptionValue {
        effect: String,
        option: String,
        value: String,
    },
}

/// Failure while loading a whole level file
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("level file has {found} lines, expected at least {expected}")]
    TooFewLines { expected: usize, found: usize },
    #[error("line {line}: {source}")]
    Parse { line: usize, source: ParseError },
    #[error("line {line}: {source}")]
    Decode { line: usize, source: DecodeError },
}

impl LevelError {
    /// 1-based line the failure belongs to, if any
    pub fn line(&self) -> Option<usize> {
        match self {
            LevelError::TooFewLines { .. } => None,
            LevelError::Parse { line, .. } | LevelError::Decode { line, .. } => Some(*line),
        }
    }
}
