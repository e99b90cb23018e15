//! Required-field tables for init definitions
//!
//!     Each definition kind has a fixed schema: the key that selects the definition type,
//!     the properties every definition must carry, and the extra properties each type
//!     requires. The tables are built once, the same way for every caller.
//!
//!     Validation only checks presence. Value shapes are checked when the definition is
//!     decoded (see [definitions](super::definitions)).

use super::DefinitionKind;
use crate::lingo::ast::lookup;
use crate::lingo::ast::Node;
use crate::lingo::error::InitErrorKind;
use once_cell::sync::Lazy;

/// Extra required properties for one definition type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRule {
    pub name: &'static str,
    pub required: &'static [&'static str],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitSchema {
    pub kind: DefinitionKind,
    /// Property naming the definition type; `None` for untyped kinds
    pub type_key: Option<&'static str>,
    pub common: &'static [&'static str],
    /// Known types. Empty with `open_types` set means any type string is accepted.
    pub types: Vec<TypeRule>,
    pub open_types: bool,
}

pub static TILE_SCHEMA: Lazy<InitSchema> = Lazy::new(|| {
    InitSchema::new(DefinitionKind::Tile, Some("tp"))
        .common(&["nm", "sz", "specs", "tp", "bfTiles"])
        .rule("box", &[])
        .rule("voxelStruct", &["repeatL"])
        .rule("voxelStructRandomDisplaceHorizontal", &[])
        .rule("voxelStructRandomDisplaceVertical", &[])
        .rule("voxelStructRockType", &[])
        .rule("voxelStructSandType", &[])
});

pub static PROP_SCHEMA: Lazy<InitSchema> = Lazy::new(|| {
    InitSchema::new(DefinitionKind::Prop, Some("tp"))
        .common(&["nm", "tp"])
        .rule("standard", &["sz", "repeatL"])
        .rule("variedStandard", &["sz", "repeatL"])
        .rule("soft", &[])
        .rule("variedSoft", &["pxlSize"])
        .rule("simpleDecal", &[])
        .rule("variedDecal", &["pxlSize"])
        .rule("antimatter", &[])
        .rule("softEffect", &[])
        .rule("long", &[])
        .rule("coloredSoft", &["pxlSize"])
});

pub static MATERIAL_SCHEMA: Lazy<InitSchema> =
    Lazy::new(|| InitSchema::new(DefinitionKind::Material, None).common(&["nm", "color"]));

pub static EFFECT_SCHEMA: Lazy<InitSchema> = Lazy::new(|| {
    let mut schema = InitSchema::new(DefinitionKind::Effect, Some("tp")).common(&["nm", "tp"]);
    schema.open_types = true;
    schema
});

impl InitSchema {
    pub fn new(kind: DefinitionKind, type_key: Option<&'static str>) -> Self {
        Self {
            kind,
            type_key,
            common: &[],
            types: Vec::new(),
            open_types: false,
        }
    }

    pub fn common(mut self, required: &'static [&'static str]) -> Self {
        self.common = required;
        self
    }

    pub fn rule(mut self, name: &'static str, required: &'static [&'static str]) -> Self {
        self.types.push(TypeRule { name, required });
        self
    }

    pub fn tiles() -> &'static InitSchema {
        &TILE_SCHEMA
    }

    pub fn props() -> &'static InitSchema {
        &PROP_SCHEMA
    }

    pub fn materials() -> &'static InitSchema {
        &MATERIAL_SCHEMA
    }

    pub fn effects() -> &'static InitSchema {
        &EFFECT_SCHEMA
    }

    pub fn for_kind(kind: DefinitionKind) -> &'static InitSchema {
        match kind {
            DefinitionKind::Tile => Self::tiles(),
            DefinitionKind::Prop => Self::props(),
            DefinitionKind::Material => Self::materials(),
            DefinitionKind::Effect => Self::effects(),
        }
    }

    pub fn rule_for(&self, type_name: &str) -> Option<&TypeRule> {
        self.types.iter().find(|rule| rule.name == type_name)
    }

    /// Check that every required property is present
    ///
    /// The name is checked first so later failures can name the definition. Type names
    /// are matched exactly; property keys ignore ASCII case like every other lookup.
    pub fn validate(&self, entries: &[(String, Node)]) -> Result<(), InitErrorKind> {
        let name = match lookup(entries, "nm") {
            Some(Node::String(name)) => name.clone(),
            Some(other) => {
                return Err(InitErrorKind::InvalidValue {
                    property: "nm".into(),
                    value: other.to_string(),
                })
            }
            None => {
                return Err(InitErrorKind::MissingProperty {
                    kind: self.kind,
                    name: String::new(),
                    property: "nm",
                })
            }
        };

        let missing = |property: &'static str| InitErrorKind::MissingProperty {
            kind: self.kind,
            name: name.clone(),
            property,
        };

        let rule = match self.type_key {
            None => None,
            Some(key) => {
                let value = lookup(entries, key).ok_or_else(|| missing(key))?;
                let Node::String(type_name) = value else {
                    return Err(InitErrorKind::InvalidValue {
                        property: key.into(),
                        value: value.to_string(),
                    });
                };
                match self.rule_for(type_name) {
                    Some(rule) => Some(rule),
                    None if self.open_types => None,
                    None => {
                        return Err(InitErrorKind::UnknownType {
                            kind: self.kind,
                            value: type_name.clone(),
                        })
                    }
                }
            }
        };

        let extra = rule.map_or(&[][..], |rule| rule.required);
        for &property in self.common.iter().chain(extra) {
            if lookup(entries, property).is_none() {
                return Err(missing(property));
            }
        }
        Ok(())
    }
}
