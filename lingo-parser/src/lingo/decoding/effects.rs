//! Effects decoder
//!
//!     Effects are an ordered stack; later entries are layered over earlier ones. Each
//!     entry is a property list:
//!
//!         [#nm: "Slime", #tp: "standardErosion", #mtrx: [[0, 12.5, ...], ...],
//!          #Options: [["Layers", ["All", "1", ...], "All"], ["Seed", [], 41]],
//!          #repeats: 130, #affectOpenAreas: 0.5]
//!
//!     `#mtrx` is row-major and must be exactly `height x width` of the level geometry.
//!     Anything else fails with [SizeMismatch](DecodeError::SizeMismatch); nothing is
//!     truncated or padded.

use super::{
    expect_arity, expect_int, expect_list, expect_number, expect_props, expect_strings,
    expect_text, invalid, optional, required, shape,
};
use crate::lingo::ast::Node;
use crate::lingo::error::DecodeError;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Chosen value of an effect option
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    Text(String),
    Number(i64),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Text(s) => f.write_str(s),
            OptionValue::Number(n) => write!(f, "{}", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectOption {
    pub name: String,
    /// Empty for free-form options such as seeds
    pub allowed: Vec<String>,
    pub value: OptionValue,
}

/// Row-major intensity values of one effect
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntensityMatrix {
    pub height: usize,
    pub width: usize,
    values: Vec<f64>,
}

impl IntensityMatrix {
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.values.get(row * self.width + col).copied()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Effect {
    pub name: String,
    pub kind: Option<String>,
    pub options: Vec<EffectOption>,
    pub matrix: IntensityMatrix,
    pub repeats: Option<i64>,
    pub affect_open_areas: Option<f64>,
}

impl Effect {
    pub fn option(&self, name: &str) -> Option<&EffectOption> {
        self.options.iter().find(|option| option.name == name)
    }
}

/// Decode the effects line against the level dimensions
///
/// Accepts either the whole line (a property list with `#effects`) or the effect list
/// itself.
pub fn decode_effects(
    node: &Node,
    height: usize,
    width: usize,
) -> Result<Vec<Effect>, DecodeError> {
    let list = match node {
        Node::PropertyList(entries) => required(entries, "effects", "effects")?,
        other => other,
    };
    let entries = expect_list(list, "effects")?;

    let effects = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| decode_effect(entry, height, width, &format!("effects[{i}]")))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(count = effects.len(), height, width, "decoded effects");
    Ok(effects)
}

fn decode_effect(
    node: &Node,
    height: usize,
    width: usize,
    context: &str,
) -> Result<Effect, DecodeError> {
    let entries = expect_props(node, context)?;

    let name = expect_text(required(entries, "nm", context)?, &format!("{context}.nm"))?;
    let kind = optional(entries, "tp")
        .map(|node| expect_text(node, &format!("{context}.tp")).map(str::to_string))
        .transpose()?;

    let options_context = format!("{context}.options");
    let options = expect_list(required(entries, "options", context)?, &options_context)?
        .iter()
        .enumerate()
        .map(|(i, option)| decode_option(option, &format!("{options_context}[{i}]")))
        .collect::<Result<Vec<_>, _>>()?;

    let matrix = decode_matrix(
        required(entries, "mtrx", context)?,
        height,
        width,
        &format!("{context}.mtrx"),
    )?;

    let repeats = optional(entries, "repeats")
        .map(|node| expect_int(node, &format!("{context}.repeats")))
        .transpose()?;
    let affect_open_areas = optional(entries, "affectOpenAreas")
        .map(|node| expect_number(node, &format!("{context}.affectOpenAreas")))
        .transpose()?;

    Ok(Effect {
        name: name.to_string(),
        kind,
        options,
        matrix,
        repeats,
        affect_open_areas,
    })
}

fn decode_option(node: &Node, context: &str) -> Result<EffectOption, DecodeError> {
    let parts = expect_arity(node, 3, context)?;
    let name = expect_text(&parts[0], &format!("{context}[0]"))?;
    let allowed = expect_strings(&parts[1], &format!("{context}[1]"))?;
    let value = match &parts[2] {
        Node::String(s) => OptionValue::Text(s.clone()),
        Node::Number(n) => OptionValue::Number(*n),
        other => return Err(shape(&format!("{context}[2]"), "string or integer", other)),
    };

    // An empty text choice means "nothing selected" and is written by the tool as ""
    if let OptionValue::Text(choice) = &value {
        if !choice.is_empty() && !allowed.is_empty() && !allowed.contains(choice) {
            return Err(invalid(context, name, choice));
        }
    }

    Ok(EffectOption {
        name: name.to_string(),
        allowed,
        value,
    })
}

fn decode_matrix(
    node: &Node,
    height: usize,
    width: usize,
    context: &str,
) -> Result<IntensityMatrix, DecodeError> {
    let rows = expect_list(node, context)?;
    let mismatch = |found_width: usize| DecodeError::SizeMismatch {
        context: context.to_string(),
        height,
        width,
        found_height: rows.len(),
        found_width,
    };

    if rows.len() != height {
        let found_width = rows.first().and_then(Node::as_list).map_or(0, <[Node]>::len);
        return Err(mismatch(found_width));
    }

    let mut values = Vec::with_capacity(height * width);
    for (row, row_node) in rows.iter().enumerate() {
        let cols = expect_list(row_node, &format!("{context}[{row}]"))?;
        if cols.len() != width {
            return Err(mismatch(cols.len()));
        }
        for (col, value) in cols.iter().enumerate() {
            values.push(expect_number(value, &format!("{context}[{row}][{col}]"))?);
        }
    }

    Ok(IntensityMatrix {
        height,
        width,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lingo::parsing::parse;

    fn decode(text: &str, height: usize, width: usize) -> Result<Vec<Effect>, DecodeError> {
        decode_effects(&parse(text).expect("effects line to parse"), height, width)
    }

    const SLIME: &str = r#"[#nm: "Slime", #tp: "standardErosion", #mtrx: [[0, 50.5], [100, 0]], #Options: [["Layers", ["All", "1"], "All"], ["Seed", [], 41]], #repeats: 130, #affectOpenAreas: 0.5]"#;

    #[test]
    fn test_decodes_entry() {
        let effects = decode(&format!("[#effects: [{SLIME}]]"), 2, 2).unwrap();
        assert_eq!(effects.len(), 1);
        let slime = &effects[0];
        assert_eq!(slime.name, "Slime");
        assert_eq!(slime.kind.as_deref(), Some("standardErosion"));
        assert_eq!(slime.matrix.get(0, 1), Some(50.5));
        assert_eq!(slime.matrix.get(1, 0), Some(100.0));
        assert_eq!(slime.repeats, Some(130));
        assert_eq!(slime.affect_open_areas, Some(0.5));
        assert_eq!(
            slime.option("Seed").map(|o| &o.value),
            Some(&OptionValue::Number(41))
        );
    }

    #[test]
    fn test_accepts_bare_list() {
        let effects = decode(&format!("[{SLIME}, {SLIME}]"), 2, 2).unwrap();
        assert_eq!(effects.len(), 2);
    }

    #[test]
    fn test_size_mismatch() {
        let err = decode(&format!("[{SLIME}]"), 2, 3).unwrap_err();
        assert_eq!(
            err,
            DecodeError::SizeMismatch {
                context: "effects[0].mtrx".into(),
                height: 2,
                width: 3,
                found_height: 2,
                found_width: 2
            }
        );
        assert!(matches!(
            decode(&format!("[{SLIME}]"), 3, 2),
            Err(DecodeError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn test_choice_outside_allowed_values() {
        let text = r#"[[#nm: "A", #mtrx: [], #Options: [["Layers", ["All", "1"], "4"]]]]"#;
        assert_eq!(
            decode(text, 0, 0).unwrap_err(),
            DecodeError::InvalidValue {
                context: "effects[0].options[0]".into(),
                field: "Layers".into(),
                value: "4".into()
            }
        );
    }

    #[test]
    fn test_empty_choice_is_accepted() {
        let text = r#"[[#nm: "A", #mtrx: [], #Options: [["Delete/Move", ["Delete", "Move Back"], ""]]]]"#;
        assert!(decode(text, 0, 0).is_ok());
    }

    #[test]
    fn test_missing_options() {
        let err = decode(r#"[[#nm: "A", #mtrx: []]]"#, 0, 0).unwrap_err();
        assert_eq!(
            err,
            DecodeError::MissingProperty {
                context: "effects[0]".into(),
                property: "options".into()
            }
        );
    }
}
