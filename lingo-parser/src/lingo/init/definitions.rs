//! Typed init definitions
//!
//! Decoding assumes the schema already vouched for every required property, so missing
//! properties here only come from optional ones. Shape failures name the definition.

use super::DefinitionKind;
use crate::lingo::ast::Node;
use crate::lingo::decoding::{
    expect_arity, expect_color, expect_flag, expect_int, expect_int_point, expect_ints,
    expect_strings, expect_text, invalid, optional, required, Color,
};
use crate::lingo::error::DecodeError;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Definition {
    Tile(TileDefinition),
    Prop(PropDefinition),
    Material(MaterialDefinition),
    Effect(EffectDefinition),
}

impl Definition {
    pub fn kind(&self) -> DefinitionKind {
        match self {
            Definition::Tile(_) => DefinitionKind::Tile,
            Definition::Prop(_) => DefinitionKind::Prop,
            Definition::Material(_) => DefinitionKind::Material,
            Definition::Effect(_) => DefinitionKind::Effect,
        }
    }
}

/// Width and height in cells (or pixels, for `pxlSize`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Size {
    pub width: i64,
    pub height: i64,
}

/// Tags found in tile and prop definitions; unknown ones are kept verbatim
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Tag {
    NonSolid,
    NotTrashProp,
    NotProp,
    Ramp,
    ChainHolder,
    Colored,
    CustomColor,
    CustomColorRainbow,
    EffectColorA,
    EffectColorB,
    RandomRotat,
    RandomFlipX,
    RandomFlipY,
    SnapToGrid,
    Circular,
    Other(String),
}

impl Tag {
    pub fn from_name(name: &str) -> Self {
        match name {
            "nonSolid" => Tag::NonSolid,
            "notTrashProp" => Tag::NotTrashProp,
            "notProp" => Tag::NotProp,
            "ramp" => Tag::Ramp,
            "Chain Holder" => Tag::ChainHolder,
            "colored" => Tag::Colored,
            "customColor" => Tag::CustomColor,
            "customColorRainBow" => Tag::CustomColorRainbow,
            "effectColorA" => Tag::EffectColorA,
            "effectColorB" => Tag::EffectColorB,
            "randomRotat" => Tag::RandomRotat,
            "randomFlipX" => Tag::RandomFlipX,
            "randomFlipY" => Tag::RandomFlipY,
            "snapToGrid" => Tag::SnapToGrid,
            "circular" => Tag::Circular,
            other => Tag::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TileType {
    Box,
    VoxelStruct,
    VoxelStructRandomDisplaceHorizontal,
    VoxelStructRandomDisplaceVertical,
    VoxelStructRockType,
    VoxelStructSandType,
}

impl TileType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "box" => Some(TileType::Box),
            "voxelStruct" => Some(TileType::VoxelStruct),
            "voxelStructRandomDisplaceHorizontal" => {
                Some(TileType::VoxelStructRandomDisplaceHorizontal)
            }
            "voxelStructRandomDisplaceVertical" => {
                Some(TileType::VoxelStructRandomDisplaceVertical)
            }
            "voxelStructRockType" => Some(TileType::VoxelStructRockType),
            "voxelStructSandType" => Some(TileType::VoxelStructSandType),
            _ => None,
        }
    }
}

/// Collision specs of a tile, one column-major list per layer
///
/// Layers two and three are often absent (written as `0`); absent layers and cells past
/// the end of a list read as `-1`, like in the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Specs {
    pub size: Size,
    layers: [Option<Vec<i64>>; 3],
}

impl Specs {
    pub fn get(&self, row: usize, col: usize, layer: usize) -> i64 {
        let height = usize::try_from(self.size.height).unwrap_or(0);
        self.layers
            .get(layer)
            .and_then(Option::as_ref)
            .and_then(|values| values.get(col * height + row))
            .copied()
            .unwrap_or(-1)
    }

    pub fn has_layer(&self, layer: usize) -> bool {
        matches!(self.layers.get(layer), Some(Some(_)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileDefinition {
    pub kind: TileType,
    pub size: Size,
    pub buffer_tiles: i64,
    pub specs: Specs,
    /// Empty for box tiles
    pub repeat: Vec<i64>,
    pub tags: Vec<Tag>,
    pub rnd: i64,
}

/// How a standard prop is shaded; `Bevel` carries the bevel width in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ColorTreatment {
    #[default]
    Standard,
    Bevel(i64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PropKind {
    Standard {
        size: Size,
        repeat: Vec<i64>,
        color_treatment: ColorTreatment,
    },
    VariedStandard {
        size: Size,
        repeat: Vec<i64>,
        color_treatment: ColorTreatment,
        variations: i64,
        random: bool,
    },
    Soft,
    VariedSoft {
        pixel_size: Size,
        variations: i64,
        random: bool,
        colorize: bool,
    },
    SimpleDecal,
    VariedDecal {
        pixel_size: Size,
        variations: i64,
        random: bool,
    },
    Antimatter,
    SoftEffect,
    Long,
    ColoredSoft {
        pixel_size: Size,
        colorize: bool,
    },
}

impl PropKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            PropKind::Standard { .. } => "standard",
            PropKind::VariedStandard { .. } => "variedStandard",
            PropKind::Soft => "soft",
            PropKind::VariedSoft { .. } => "variedSoft",
            PropKind::SimpleDecal => "simpleDecal",
            PropKind::VariedDecal { .. } => "variedDecal",
            PropKind::Antimatter => "antimatter",
            PropKind::SoftEffect => "softEffect",
            PropKind::Long => "long",
            PropKind::ColoredSoft { .. } => "coloredSoft",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropDefinition {
    pub kind: PropKind,
    pub depth: i64,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MaterialDefinition {
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectDefinition {
    /// Effect type, e.g. `grower` or `wall`
    pub kind: String,
    pub pick_color: bool,
    pub can_3d: bool,
}

/// Decode a schema-validated definition into its name and typed body
pub fn decode_definition(
    kind: DefinitionKind,
    entries: &[(String, Node)],
) -> Result<(String, Definition), DecodeError> {
    let name = expect_text(required(entries, "nm", "definition")?, "nm")?.to_string();
    let context = name.as_str();

    let definition = match kind {
        DefinitionKind::Tile => Definition::Tile(decode_tile(entries, context)?),
        DefinitionKind::Prop => Definition::Prop(decode_prop(entries, context)?),
        DefinitionKind::Material => Definition::Material(MaterialDefinition {
            color: expect_color(required(entries, "color", context)?, &field(context, "color"))?,
        }),
        DefinitionKind::Effect => Definition::Effect(decode_effect(entries, context)?),
    };

    Ok((name, definition))
}

fn field(context: &str, name: &str) -> String {
    format!("{context}.{name}")
}

fn size(node: &Node, context: &str) -> Result<Size, DecodeError> {
    let (width, height) = expect_int_point(node, context)?;
    if width < 0 || height < 0 {
        return Err(invalid(context, "size", node));
    }
    Ok(Size { width, height })
}

fn tags(entries: &[(String, Node)], context: &str) -> Result<Vec<Tag>, DecodeError> {
    Ok(match optional(entries, "tags") {
        Some(node) => expect_strings(node, &field(context, "tags"))?
            .iter()
            .map(|name| Tag::from_name(name))
            .collect(),
        None => Vec::new(),
    })
}

fn int_or(
    entries: &[(String, Node)],
    key: &str,
    default: i64,
    context: &str,
) -> Result<i64, DecodeError> {
    optional(entries, key).map_or(Ok(default), |node| expect_int(node, &field(context, key)))
}

fn flag(entries: &[(String, Node)], key: &str, context: &str) -> Result<bool, DecodeError> {
    optional(entries, key).map_or(Ok(false), |node| expect_flag(node, &field(context, key)))
}

fn spec_layer(node: Option<&Node>, context: &str) -> Result<Option<Vec<i64>>, DecodeError> {
    match node {
        None | Some(Node::Number(_)) => Ok(None),
        Some(node) => expect_ints(node, context).map(Some),
    }
}

fn decode_tile(entries: &[(String, Node)], context: &str) -> Result<TileDefinition, DecodeError> {
    let type_name = expect_text(required(entries, "tp", context)?, &field(context, "tp"))?;
    let kind = TileType::from_name(type_name).ok_or_else(|| invalid(context, "tp", type_name))?;
    let size = size(required(entries, "sz", context)?, &field(context, "sz"))?;

    let specs = Specs {
        size,
        layers: [
            spec_layer(Some(required(entries, "specs", context)?), &field(context, "specs"))?,
            spec_layer(optional(entries, "specs2"), &field(context, "specs2"))?,
            spec_layer(optional(entries, "specs3"), &field(context, "specs3"))?,
        ],
    };

    let repeat = match optional(entries, "repeatL") {
        Some(node) => expect_ints(node, &field(context, "repeatL"))?,
        None => Vec::new(),
    };

    Ok(TileDefinition {
        kind,
        size,
        buffer_tiles: expect_int(
            required(entries, "bfTiles", context)?,
            &field(context, "bfTiles"),
        )?,
        specs,
        repeat,
        tags: tags(entries, context)?,
        rnd: int_or(entries, "rnd", 1, context)?,
    })
}

fn decode_prop(entries: &[(String, Node)], context: &str) -> Result<PropDefinition, DecodeError> {
    let type_name = expect_text(required(entries, "tp", context)?, &field(context, "tp"))?;
    let sz = || size(required(entries, "sz", context)?, &field(context, "sz"));
    let pixel_size = || size(required(entries, "pxlSize", context)?, &field(context, "pxlSize"));
    let repeat = || expect_ints(required(entries, "repeatL", context)?, &field(context, "repeatL"));
    let variations = || int_or(entries, "vars", 1, context);

    let kind = match type_name {
        "standard" => PropKind::Standard {
            size: sz()?,
            repeat: repeat()?,
            color_treatment: color_treatment(entries, context)?,
        },
        "variedStandard" => PropKind::VariedStandard {
            size: sz()?,
            repeat: repeat()?,
            color_treatment: color_treatment(entries, context)?,
            variations: variations()?,
            random: flag(entries, "random", context)?,
        },
        "soft" => PropKind::Soft,
        "variedSoft" => PropKind::VariedSoft {
            pixel_size: pixel_size()?,
            variations: variations()?,
            random: flag(entries, "random", context)?,
            colorize: flag(entries, "colorize", context)?,
        },
        "simpleDecal" => PropKind::SimpleDecal,
        "variedDecal" => PropKind::VariedDecal {
            pixel_size: pixel_size()?,
            variations: variations()?,
            random: flag(entries, "random", context)?,
        },
        "antimatter" => PropKind::Antimatter,
        "softEffect" => PropKind::SoftEffect,
        "long" => PropKind::Long,
        "coloredSoft" => PropKind::ColoredSoft {
            pixel_size: pixel_size()?,
            colorize: flag(entries, "colorize", context)?,
        },
        other => return Err(invalid(context, "tp", other)),
    };

    Ok(PropDefinition {
        kind,
        depth: int_or(entries, "depth", 0, context)?,
        tags: tags(entries, context)?,
    })
}

/// `#colorTreatment` defaults to standard; a bevel treatment must say how wide
fn color_treatment(
    entries: &[(String, Node)],
    context: &str,
) -> Result<ColorTreatment, DecodeError> {
    let Some(node) = optional(entries, "colorTreatment") else {
        return Ok(ColorTreatment::Standard);
    };
    match expect_text(node, &field(context, "colorTreatment"))? {
        "standard" => Ok(ColorTreatment::Standard),
        "bevel" => {
            let width = expect_int(required(entries, "bevel", context)?, &field(context, "bevel"))?;
            Ok(ColorTreatment::Bevel(width))
        }
        other => Err(invalid(context, "colorTreatment", other)),
    }
}

fn decode_effect(
    entries: &[(String, Node)],
    context: &str,
) -> Result<EffectDefinition, DecodeError> {
    let kind = expect_text(required(entries, "tp", context)?, &field(context, "tp"))?;
    // `#can3D: 2` marks 3D-capable effects; 1 is the plain wall variant
    let can_3d = optional(entries, "can3D")
        .map(|node| expect_int(node, &field(context, "can3D")))
        .transpose()?
        == Some(2);
    Ok(EffectDefinition {
        kind: kind.to_string(),
        pick_color: flag(entries, "pickColor", context)?,
        can_3d,
    })
}

/// Decode a category header payload: `["Name", color(r, g, b)]`
pub(crate) fn decode_category(node: &Node) -> Result<(String, Color), DecodeError> {
    let parts = expect_arity(node, 2, "category")?;
    let name = expect_text(&parts[0], "category.name")?;
    let color = expect_color(&parts[1], "category.color")?;
    Ok((name.to_string(), color))
}
