//! Testing utilities
//!
//!     Two sources of test input live here.
//!
//!     [Samples] loads the curated files under `lingo-parser/samples/`. They are written the
//!     way the authoring tool writes them and are the reference for anything that depends
//!     on real file layout: line order, spacing, key casing, header styles.
//!
//!         let level = Samples::level("small").load();
//!         let records = Samples::init("tiles").decode(InitSchema::tiles());
//!
//!     The generators build well-formed lines of any size, for tests that care about
//!     dimensions rather than content. [LevelParts] starts from a valid level and lets a
//!     test break exactly one line:
//!
//!         let mut parts = LevelParts::new(2, 2);
//!         parts.effect_size = Some((2, 3));
//!         let text = level_text(&parts);
//!
//!     Helpers in this module panic on failure; they are meant for tests only.

use crate::lingo::ast::Node;
use crate::lingo::init::{decode_init, InitRecord, InitSchema};
use crate::lingo::level::{load_level, Level};
use crate::lingo::parsing::parse_lines;
use std::fs;
use std::path::PathBuf;

/// Curated sample files
pub struct Samples;

/// A sample file, resolved lazily
pub struct Sample {
    path: PathBuf,
}

impl Samples {
    fn root() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("samples")
    }

    /// `samples/levels/<name>.txt`
    pub fn level(name: &str) -> Sample {
        Sample {
            path: Self::root().join("levels").join(format!("{name}.txt")),
        }
    }

    /// `samples/init/<name>.txt`
    pub fn init(name: &str) -> Sample {
        Sample {
            path: Self::root().join("init").join(format!("{name}.txt")),
        }
    }
}

impl Sample {
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn source(&self) -> String {
        fs::read_to_string(&self.path)
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", self.path.display(), e))
    }

    /// Every non-empty line, parsed. Bare `\r` line breaks count as line breaks.
    pub fn parse_lines(&self) -> Vec<Node> {
        let source = self.source().replace("\r\n", "\n").replace('\r', "\n");
        let lines: Vec<&str> = source.lines().filter(|l| !l.trim().is_empty()).collect();
        parse_lines(&lines)
            .into_iter()
            .enumerate()
            .map(|(i, result)| {
                result.unwrap_or_else(|e| {
                    panic!("Failed to parse {} line {}: {}", self.path.display(), i + 1, e)
                })
            })
            .collect()
    }

    /// The first line, parsed
    pub fn parse_first(&self) -> Node {
        self.parse_lines()
            .into_iter()
            .next()
            .unwrap_or_else(|| panic!("{} is empty", self.path.display()))
    }

    pub fn load(&self) -> Level {
        load_level(&self.source())
            .unwrap_or_else(|e| panic!("Failed to load {}: {}", self.path.display(), e))
    }

    pub fn decode(&self, schema: &InitSchema) -> Vec<InitRecord> {
        decode_init(&self.source(), schema)
            .unwrap_or_else(|e| panic!("Failed to decode {}: {}", self.path.display(), e))
    }
}

/// Geometry line of solid cells on the first layer; the top-left cell carries a pole
pub fn geometry_line(height: usize, width: usize) -> String {
    matrix(height, width, |row, col| {
        if row == 0 && col == 0 {
            "[[1, [1]], [0, []], [0, []]]".to_string()
        } else {
            "[[1, []], [0, []], [0, []]]".to_string()
        }
    })
}

/// Tile line with every cell set to the default material
pub fn tile_line(height: usize, width: usize) -> String {
    let cells = matrix(height, width, |_, _| {
        r#"[[#tp: "default", #Data: 0], [#tp: "default", #Data: 0], [#tp: "default", #Data: 0]]"#
            .to_string()
    });
    format!(r#"[#lastKeys: [], #Keys: [], #workLayer: 1, #lstMsPs: point(0, 0), #tlMatrix: {cells}, #defaultMaterial: "Concrete", #toolType: "material", #toolData: "Big Metal", #tmPos: point(1, 1), #tmSavPosL: [], #specialEdit: 0]"#)
}

/// Effects line with one erosion effect of the given matrix size
pub fn effects_line(height: usize, width: usize) -> String {
    let row = format!("[{}]", vec!["0"; width].join(", "));
    let mtrx = format!("[{}]", vec![row; height].join(", "));
    format!(
        r#"[#lastKeys: [], #Keys: [], #lstMsPs: point(0, 0), #effects: [[#nm: "Slime", #tp: "standardErosion", #crossScreen: 0, #mtrx: {mtrx}, #Options: [["Delete/Move", ["Delete", "Move Back", "Move Forth"], ""], ["Seed", [], 41]], #repeats: 130, #affectOpenAreas: 0.5000]], #emPos: point(1, 1), #editEffect: 0, #selectEditEffect: 0, #mode: "createNew", #brushSize: 5]"#
    )
}

fn matrix(height: usize, width: usize, cell: impl Fn(usize, usize) -> String) -> String {
    let rows: Vec<String> = (0..height)
        .map(|row| {
            let cols: Vec<String> = (0..width).map(|col| cell(row, col)).collect();
            format!("[{}]", cols.join(", "))
        })
        .collect();
    format!("[{}]", rows.join(", "))
}

/// The lines of a generated level, each replaceable on its own
#[derive(Debug, Clone)]
pub struct LevelParts {
    pub height: usize,
    pub width: usize,
    /// Tile matrix size when it should differ from the geometry
    pub tile_size: Option<(usize, usize)>,
    /// Effect matrix size when it should differ from the geometry
    pub effect_size: Option<(usize, usize)>,
    pub light: String,
    pub terrain: String,
    pub settings: String,
    pub cameras: String,
    pub water: String,
    pub props: Option<String>,
}

impl LevelParts {
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            tile_size: None,
            effect_size: None,
            light: "[#pos: point(0, 0), #rot: 0, #sz: point(50, 70), #col: 1, #Keys: 0, #lastKeys: 0, #lastTm: 0, #lightAngle: 180, #flatness: 1, #lightRect: rect(1000, 1000, -1000, -1000), #paintShape: \"pxl\"]".into(),
            terrain: "[#timeLimit: 4800, #defaultTerrain: 1, #maxFlies: 10, #flySpawnRate: 50, #lizards: [], #ambientSounds: [], #music: \"NONE\", #tags: [], #lightType: \"Static\", #waterDrips: 1, #lightRect: rect(0, 0, 1040, 800), #Matrix: []]".into(),
            settings: format!(
                "[#mouse: 1, #lastMouse: 0, #mouseClick: 0, #pal: 1, #pals: [[#detCol: color(255, 0, 0)]], #eCol1: 1, #eCol2: 2, #totEcols: 5, #tileSeed: 225, #colGlows: [0, 0], #size: point({}, {}), #extraTiles: [12, 3, 12, 5], #light: 1]",
                width, height
            ),
            cameras: "[#cameras: [point(0, 0)], #selectedCamera: 0, #quads: [[[0, 0], [0, 0], [0, 0], [0, 0]]], #Keys: [#n: 0, #d: 0, #e: 0, #p: 0], #lastKeys: [#n: 0, #d: 0, #e: 0, #p: 0]]".into(),
            water: "[#waterLevel: -1, #waterInFront: 1, #waveLength: 60, #waveAmplitude: 5, #waveSpeed: 10]".into(),
            props: Some("[#props: [], #lastKeys: [], #Keys: [], #workLayer: 1, #lstMsPs: point(0, 0), #pmPos: point(1, 1), #pmSavPosL: [], #propRotation: 0, #propStretchX: 1, #propStretchY: 1, #propFlipX: 1, #propFlipY: 1, #depth: 0, #color: 0]".into()),
        }
    }
}

/// Join the parts into level file text
pub fn level_text(parts: &LevelParts) -> String {
    let (tile_height, tile_width) = parts.tile_size.unwrap_or((parts.height, parts.width));
    let (effect_height, effect_width) = parts.effect_size.unwrap_or((parts.height, parts.width));

    let mut lines = vec![
        geometry_line(parts.height, parts.width),
        tile_line(tile_height, tile_width),
        effects_line(effect_height, effect_width),
        parts.light.clone(),
        parts.terrain.clone(),
        parts.settings.clone(),
        parts.cameras.clone(),
        parts.water.clone(),
    ];
    lines.extend(parts.props.clone());
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lingo::parsing::parse;

    #[test]
    fn test_generated_lines_parse() {
        let parts = LevelParts::new(3, 4);
        for line in level_text(&parts).lines() {
            assert!(parse(line).is_ok(), "failed to parse `{line}`");
        }
    }

    #[test]
    fn test_geometry_dimensions() {
        let node = parse(&geometry_line(3, 4)).unwrap();
        let rows = node.as_list().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].as_list().unwrap().len(), 4);
    }
}
