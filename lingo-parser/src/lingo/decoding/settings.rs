//! Level-wide settings spread over the smaller lines of a level file
//!
//! Light line: `[#lightAngle: 180, #flatness: 1]`
//! Terrain line: `[#defaultTerrain: 1]`
//! Settings line: `[#extraTiles: [12, 3, 12, 5], #tileSeed: 212, #light: 1, #size: point(72, 43)]`
//! Water line: `[#waterLevel: -1, #waterInFront: 1]`

use super::{
    expect_flag, expect_int, expect_int_point, expect_ints, expect_number, expect_props,
    optional, required,
};
use crate::lingo::ast::Node;
use crate::lingo::error::DecodeError;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LightSettings {
    pub angle: f64,
    pub flatness: f64,
}

/// Border of tiles around the playable area, in the order the file writes them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ExtraTiles {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelSettings {
    pub extra_tiles: ExtraTiles,
    pub tile_seed: i64,
    /// Defaults to on when the line omits `#light`
    pub light: bool,
    /// `(width, height)` when the line declares it
    pub size: Option<(i64, i64)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WaterSettings {
    /// `-1` means the level has no water
    pub level: i64,
    pub in_front: bool,
}

impl WaterSettings {
    pub fn has_water(&self) -> bool {
        self.level >= 0
    }
}

pub fn decode_light(node: &Node) -> Result<LightSettings, DecodeError> {
    let entries = expect_props(node, "light")?;
    Ok(LightSettings {
        angle: expect_number(required(entries, "lightAngle", "light")?, "lightAngle")?,
        flatness: expect_number(required(entries, "flatness", "light")?, "flatness")?,
    })
}

/// Whether the default terrain is solid
pub fn decode_terrain(node: &Node) -> Result<bool, DecodeError> {
    let entries = expect_props(node, "terrain")?;
    expect_flag(required(entries, "defaultTerrain", "terrain")?, "defaultTerrain")
}

pub fn decode_settings(node: &Node) -> Result<LevelSettings, DecodeError> {
    let entries = expect_props(node, "settings")?;

    let bounds = expect_ints(required(entries, "extraTiles", "settings")?, "extraTiles")?;
    let &[left, top, right, bottom] = bounds.as_slice() else {
        return Err(DecodeError::Arity {
            context: "extraTiles".into(),
            expected: 4,
            found: bounds.len(),
        });
    };

    let tile_seed = expect_int(required(entries, "tileSeed", "settings")?, "tileSeed")?;
    let light = match optional(entries, "light") {
        Some(node) => expect_flag(node, "light")?,
        None => true,
    };
    let size = optional(entries, "size")
        .map(|node| expect_int_point(node, "size"))
        .transpose()?;

    Ok(LevelSettings {
        extra_tiles: ExtraTiles {
            left,
            top,
            right,
            bottom,
        },
        tile_seed,
        light,
        size,
    })
}

pub fn decode_water(node: &Node) -> Result<WaterSettings, DecodeError> {
    let entries = expect_props(node, "water")?;
    Ok(WaterSettings {
        level: expect_int(required(entries, "waterLevel", "water")?, "waterLevel")?,
        in_front: expect_flag(required(entries, "waterInFront", "water")?, "waterInFront")?,
    })
}
