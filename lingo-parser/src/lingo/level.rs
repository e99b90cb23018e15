//! Level file loader
//!
//!     A level file is a fixed sequence of literal lines:
//!
//!         1  geometry matrix
//!         2  tile line (`#tlMatrix`, `#defaultMaterial`, `#bufferTiles`)
//!         3  effects (`#effects`)
//!         4  light (`#lightAngle`, `#flatness`)
//!         5  terrain (`#defaultTerrain`)
//!         6  settings (`#extraTiles`, `#tileSeed`, `#light`, `#size`)
//!         7  cameras
//!         8  water (`#waterLevel`, `#waterInFront`)
//!         9  placed props (`#props`), optional
//!
//!     Every line is parsed in parallel first; decoding then runs in file order because
//!     the effect matrices are sized from the geometry. The tile matrix and the `#size`
//!     recorded in the settings line must agree with the geometry as well.

use crate::lingo::ast::Node;
use crate::lingo::decoding::{
    decode_cameras, decode_effects, decode_geometry, decode_light, decode_props,
    decode_settings, decode_terrain, decode_tiles, decode_water, log_fallbacks, Camera, Effect,
    GeoFallback, GeoMatrix, LevelSettings, LightSettings, PlacedProp, TileLayer, WaterSettings,
};
use crate::lingo::error::{DecodeError, LevelError};
use crate::lingo::parsing::parse_lines;
use serde::Serialize;
use tracing::debug;

/// Lines a level file must have; the props line after them is optional
pub const LEVEL_LINES: usize = 8;

const GEOMETRY_LINE: usize = 0;
const TILES_LINE: usize = 1;
const EFFECTS_LINE: usize = 2;
const LIGHT_LINE: usize = 3;
const TERRAIN_LINE: usize = 4;
const SETTINGS_LINE: usize = 5;
const CAMERAS_LINE: usize = 6;
const WATER_LINE: usize = 7;
const PROPS_LINE: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Level {
    pub geometry: GeoMatrix,
    /// Lenient geometry fallbacks, for callers that want to report them
    pub fallbacks: Vec<GeoFallback>,
    pub tiles: TileLayer,
    pub effects: Vec<Effect>,
    pub light: LightSettings,
    pub default_terrain: bool,
    pub settings: LevelSettings,
    pub cameras: Vec<Camera>,
    pub water: WaterSettings,
    /// Empty when the file has no props line
    pub props: Vec<PlacedProp>,
}

impl Level {
    pub fn height(&self) -> usize {
        self.geometry.height
    }

    pub fn width(&self) -> usize {
        self.geometry.width
    }

    /// Report every geometry fallback at `warn`
    pub fn log_fallbacks(&self) {
        log_fallbacks(&self.fallbacks);
    }
}

pub fn load_level(text: &str) -> Result<Level, LevelError> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<&str> = normalized.lines().collect();

    if lines.len() < LEVEL_LINES {
        return Err(LevelError::TooFewLines {
            expected: LEVEL_LINES,
            found: lines.len(),
        });
    }

    let has_props = lines
        .get(PROPS_LINE)
        .is_some_and(|line| !line.trim().is_empty());
    let count = if has_props { LEVEL_LINES + 1 } else { LEVEL_LINES };

    let nodes = parse_lines(&lines[..count])
        .into_iter()
        .enumerate()
        .map(|(i, result)| result.map_err(|source| LevelError::Parse { line: i + 1, source }))
        .collect::<Result<Vec<Node>, _>>()?;

    let geometry = decode_line(&nodes, GEOMETRY_LINE, decode_geometry)?;
    let (height, width) = (geometry.matrix.height, geometry.matrix.width);

    let tiles = decode_line(&nodes, TILES_LINE, |node| {
        let tiles = decode_tiles(node)?;
        if (tiles.height, tiles.width) != (height, width) {
            return Err(DecodeError::SizeMismatch {
                context: "tlMatrix".into(),
                height,
                width,
                found_height: tiles.height,
                found_width: tiles.width,
            });
        }
        Ok(tiles)
    })?;

    let effects = decode_line(&nodes, EFFECTS_LINE, |node| decode_effects(node, height, width))?;
    let light = decode_line(&nodes, LIGHT_LINE, decode_light)?;
    let default_terrain = decode_line(&nodes, TERRAIN_LINE, decode_terrain)?;
    let settings = decode_line(&nodes, SETTINGS_LINE, |node| {
        let settings = decode_settings(node)?;
        match settings.size {
            Some((size_width, size_height))
                if (size_width, size_height) != (width as i64, height as i64) =>
            {
                Err(DecodeError::SizeMismatch {
                    context: "size".into(),
                    height,
                    width,
                    found_height: usize::try_from(size_height).unwrap_or_default(),
                    found_width: usize::try_from(size_width).unwrap_or_default(),
                })
            }
            _ => Ok(settings),
        }
    })?;
    let cameras = decode_line(&nodes, CAMERAS_LINE, decode_cameras)?;
    let water = decode_line(&nodes, WATER_LINE, decode_water)?;
    let props = if has_props {
        decode_line(&nodes, PROPS_LINE, decode_props)?
    } else {
        Vec::new()
    };

    debug!(
        height,
        width,
        effects = effects.len(),
        cameras = cameras.len(),
        props = props.len(),
        "loaded level"
    );

    Ok(Level {
        geometry: geometry.matrix,
        fallbacks: geometry.fallbacks,
        tiles,
        effects,
        light,
        default_terrain,
        settings,
        cameras,
        water,
        props,
    })
}

/// Decode one zero-indexed line, tagging failures with its 1-based number
fn decode_line<T>(
    nodes: &[Node],
    index: usize,
    decode: impl FnOnce(&Node) -> Result<T, DecodeError>,
) -> Result<T, LevelError> {
    decode(&nodes[index]).map_err(|source| LevelError::Decode {
        line: index + 1,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lingo::testing::{level_text, LevelParts};

    #[test]
    fn test_loads_small_level() {
        let level = load_level(&level_text(&LevelParts::new(2, 3))).unwrap();
        assert_eq!((level.height(), level.width()), (2, 3));
        assert_eq!(level.tiles.height, 2);
        assert_eq!(level.effects.len(), 1);
        assert_eq!(level.effects[0].matrix.width, 3);
        assert!(level.default_terrain);
        assert_eq!(level.cameras.len(), 1);
        assert!(level.fallbacks.is_empty());
    }

    #[test]
    fn test_crlf_line_endings() {
        let text = level_text(&LevelParts::new(1, 1)).replace('\n', "\r\n");
        assert!(load_level(&text).is_ok());
    }

    #[test]
    fn test_too_few_lines() {
        assert_eq!(
            load_level("[]\n[]"),
            Err(LevelError::TooFewLines {
                expected: LEVEL_LINES,
                found: 2
            })
        );
    }

    #[test]
    fn test_parse_error_carries_line() {
        let mut parts = LevelParts::new(1, 1);
        parts.light = "[#lightAngle: 180, #flatness: ".into();
        let err = load_level(&level_text(&parts)).unwrap_err();
        assert_eq!(err.line(), Some(4));
        assert!(matches!(err, LevelError::Parse { .. }));
    }

    #[test]
    fn test_effects_sized_from_geometry() {
        let mut parts = LevelParts::new(2, 2);
        parts.effect_size = Some((2, 3));
        let err = load_level(&level_text(&parts)).unwrap_err();
        assert_eq!(err.line(), Some(3));
        assert!(matches!(
            err,
            LevelError::Decode {
                source: DecodeError::SizeMismatch { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_settings_size_must_match_geometry() {
        let mut parts = LevelParts::new(2, 3);
        parts.settings = parts.settings.replace("point(3, 2)", "point(2, 3)");
        let err = load_level(&level_text(&parts)).unwrap_err();
        assert_eq!(
            err,
            LevelError::Decode {
                line: 6,
                source: DecodeError::SizeMismatch {
                    context: "size".into(),
                    height: 2,
                    width: 3,
                    found_height: 3,
                    found_width: 2,
                }
            }
        );
    }

    #[test]
    fn test_props_line_is_decoded() {
        let mut parts = LevelParts::new(1, 1);
        let props = concat!(
            r#"[#props: [[-1, "Crate", point(1, 1), "#,
            "[point(0, 0), point(20, 0), point(20, 20), point(0, 20)], ",
            "[#settings: [#renderorder: 0, #seed: 9]]]], #depth: 0]"
        );
        parts.props = Some(props.into());
        let level = load_level(&level_text(&parts)).unwrap();
        assert_eq!(level.props.len(), 1);
        assert_eq!(level.props[0].name, "Crate");

        parts.props = None;
        assert!(load_level(&level_text(&parts)).unwrap().props.is_empty());
    }

    #[test]
    fn test_props_errors_carry_line() {
        let mut parts = LevelParts::new(1, 1);
        parts.props = Some("[#props: [[-1, \"Crate\"]]]".into());
        let err = load_level(&level_text(&parts)).unwrap_err();
        assert_eq!(err.line(), Some(9));
    }

    #[test]
    fn test_tile_matrix_must_match_geometry() {
        let mut parts = LevelParts::new(2, 2);
        parts.tile_size = Some((1, 2));
        let err = load_level(&level_text(&parts)).unwrap_err();
        assert_eq!(err.line(), Some(2));
    }
}
