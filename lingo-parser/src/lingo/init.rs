//! Init file decoder
//!
//!     Init files list resource definitions one per line, grouped under category headers:
//!
//!         -["Machinery", color(255, 0, 0)]
//!         [#nm: "Pipe", #sz: point(1, 1), #specs: [1], #tp: "voxelStruct", ...]
//!         [#nm: "Valve", ...]
//!         -Misc
//!         [#nm: "Rubble", ...]
//!
//!     A header sets the category (and color, when it carries one) for every following
//!     definition until the next header. Blank lines and `--` comments are skipped.
//!
//!     Decoding runs in two passes. Every line is first classified and parsed on its own,
//!     in parallel, since lines do not depend on each other textually. The category state
//!     is then threaded through the classified lines in file order as an explicit
//!     [InitState] accumulator, starting empty for every file. The first failure in file
//!     order wins, regardless of which worker hit it first.

pub mod definitions;
pub mod options;
pub mod schema;

use crate::lingo::ast::{lookup, Node};
use crate::lingo::decoding::Color;
use crate::lingo::error::{InitError, InitErrorKind};
use crate::lingo::parsing::parse;
use definitions::decode_category;
use rayon::prelude::*;
use serde::Serialize;
use std::fmt;
use tracing::debug;

pub use definitions::{
    decode_definition, ColorTreatment, Definition, EffectDefinition, MaterialDefinition,
    PropDefinition, PropKind, Size, Specs, Tag, TileDefinition, TileType,
};
pub use options::{generate_options, OptionSpec};
pub use schema::InitSchema;

/// The four kinds of init file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DefinitionKind {
    Tile,
    Prop,
    Material,
    Effect,
}

impl DefinitionKind {
    pub const ALL: [DefinitionKind; 4] = [
        DefinitionKind::Tile,
        DefinitionKind::Prop,
        DefinitionKind::Material,
        DefinitionKind::Effect,
    ];

    /// Accepts singular and plural spellings, e.g. `tile` or `tiles`
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "tile" | "tiles" => Some(DefinitionKind::Tile),
            "prop" | "props" => Some(DefinitionKind::Prop),
            "material" | "materials" => Some(DefinitionKind::Material),
            "effect" | "effects" => Some(DefinitionKind::Effect),
            _ => None,
        }
    }
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DefinitionKind::Tile => "tile",
            DefinitionKind::Prop => "prop",
            DefinitionKind::Material => "material",
            DefinitionKind::Effect => "effect",
        })
    }
}

/// One decoded definition line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InitRecord {
    pub name: String,
    pub category: String,
    /// Color of the last header that carried one
    pub color: Option<Color>,
    /// 1-based line in the init file
    pub line: usize,
    pub definition: Definition,
}

impl InitRecord {
    pub fn kind(&self) -> DefinitionKind {
        self.definition.kind()
    }

    /// Generated options of an effect definition; empty for every other kind
    pub fn effect_options(&self) -> Vec<OptionSpec> {
        match &self.definition {
            Definition::Effect(effect) => generate_options(&self.name, effect),
            _ => Vec::new(),
        }
    }
}

/// Category context carried from one line to the next
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitState {
    pub category: Option<String>,
    pub color: Option<Color>,
}

/// A physical line after the parallel pass
#[derive(Debug, Clone, PartialEq)]
enum InitLine {
    Skip,
    Header {
        category: String,
        color: Option<Color>,
    },
    Definition(Node),
}

/// Decode an init file, parsing its lines in parallel
pub fn decode_init(text: &str, schema: &InitSchema) -> Result<Vec<InitRecord>, InitError> {
    let lines: Vec<&str> = text.lines().collect();
    let classified: Vec<_> = lines
        .par_iter()
        .enumerate()
        .map(|(i, line)| classify(line).map_err(|kind| InitError::new(i + 1, kind)))
        .collect();
    fold_lines(classified, schema)
}

/// Same as [decode_init] on the calling thread, for callers already fanning out per file
pub fn decode_init_sequential(
    text: &str,
    schema: &InitSchema,
) -> Result<Vec<InitRecord>, InitError> {
    let classified = text
        .lines()
        .enumerate()
        .map(|(i, line)| classify(line).map_err(|kind| InitError::new(i + 1, kind)))
        .collect();
    fold_lines(classified, schema)
}

fn fold_lines(
    classified: Vec<Result<InitLine, InitError>>,
    schema: &InitSchema,
) -> Result<Vec<InitRecord>, InitError> {
    let mut records = Vec::new();

    classified
        .into_iter()
        .enumerate()
        .try_fold(
            InitState::default(),
            |state, (i, line)| -> Result<InitState, InitError> {
                match line? {
                    InitLine::Skip => Ok(state),
                    InitLine::Header { category, color } => Ok(InitState {
                        category: Some(category),
                        color,
                    }),
                    InitLine::Definition(node) => {
                        let record = decode_record(&state, &node, schema, i + 1)
                            .map_err(|kind| InitError::new(i + 1, kind))?;
                        records.push(record);
                        Ok(state)
                    }
                }
            },
        )?;

    debug!(kind = %schema.kind, records = records.len(), "decoded init file");
    Ok(records)
}

fn classify(line: &str) -> Result<InitLine, InitErrorKind> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with("--") {
        return Ok(InitLine::Skip);
    }

    if let Some(header) = trimmed.strip_prefix('-') {
        return classify_header(header.trim_start()).ok_or_else(|| {
            InitErrorKind::MalformedCategory {
                text: trimmed.to_string(),
            }
        });
    }

    Ok(InitLine::Definition(parse(trimmed)?))
}

fn classify_header(header: &str) -> Option<InitLine> {
    if header.starts_with('[') {
        let node = parse(header).ok()?;
        let (category, color) = decode_category(&node).ok()?;
        return Some(InitLine::Header {
            category,
            color: Some(color),
        });
    }
    if header.is_empty() {
        return None;
    }
    Some(InitLine::Header {
        category: header.to_string(),
        color: None,
    })
}

fn decode_record(
    state: &InitState,
    node: &Node,
    schema: &InitSchema,
    line: usize,
) -> Result<InitRecord, InitErrorKind> {
    let entries = node
        .as_property_list()
        .ok_or(InitErrorKind::NotPropertyList {
            found: node.kind_name(),
        })?;

    schema.validate(entries)?;

    let Some(category) = state.category.clone() else {
        let name = lookup(entries, "nm").and_then(Node::as_str).unwrap_or_default();
        return Err(InitErrorKind::NoCategory {
            name: name.to_string(),
        });
    };

    let (name, definition) = decode_definition(schema.kind, entries)?;
    Ok(InitRecord {
        name,
        category,
        color: state.color,
        line,
        definition,
    })
}
