//! Selectable options of custom effects
//!
//!     Options are derived from the effect definition once, when the definition is
//!     registered. The rules are additive: `Layers` always comes first, then `Color`,
//!     `3D`, `Slide` and `Require In-Bounds`, each present only when its rule matches.

use super::definitions::EffectDefinition;
use crate::lingo::decoding::{EffectOption, OptionValue};
use serde::Serialize;

pub const LAYER_VALUES: &[&str] = &["All", "1", "2", "3", "1:st and 2:nd", "2:nd and 3:rd"];
pub const COLOR_VALUES: &[&str] = &["Color1", "Color2", "Dead"];
pub const TOGGLE_3D_VALUES: &[&str] = &["On", "Off"];
pub const SLIDE_VALUES: &[&str] = &["Left", "Right", "Random"];
pub const YES_NO_VALUES: &[&str] = &["Yes", "No"];

/// Effect names whose `Layers` option defaults to the first layer.
/// `indiviualClinger` is the spelling shipped in the stock init files.
const INDIVIDUAL_EFFECTS: &[&str] = &[
    "individual",
    "individualHanger",
    "individualClinger",
    "indiviualClinger",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OptionSpec {
    pub name: &'static str,
    pub values: &'static [&'static str],
    pub default: &'static str,
}

impl OptionSpec {
    const fn new(
        name: &'static str,
        values: &'static [&'static str],
        default: &'static str,
    ) -> Self {
        Self {
            name,
            values,
            default,
        }
    }

    pub fn allows(&self, value: &str) -> bool {
        self.values.contains(&value)
    }

    /// The option as a level file would write it with its default chosen
    pub fn to_effect_option(&self) -> EffectOption {
        EffectOption {
            name: self.name.to_string(),
            allowed: self.values.iter().map(|v| v.to_string()).collect(),
            value: OptionValue::Text(self.default.to_string()),
        }
    }
}

pub fn generate_options(name: &str, effect: &EffectDefinition) -> Vec<OptionSpec> {
    let mut options = Vec::with_capacity(5);

    let layers_default = if INDIVIDUAL_EFFECTS.contains(&name) {
        "1"
    } else {
        "All"
    };
    options.push(OptionSpec::new("Layers", LAYER_VALUES, layers_default));

    if effect.pick_color {
        options.push(OptionSpec::new("Color", COLOR_VALUES, "Color1"));
    }

    let kind = effect.kind.as_str();
    if kind == "wall" && effect.can_3d {
        options.push(OptionSpec::new("3D", TOGGLE_3D_VALUES, "Off"));
    }
    if matches!(kind, "clinger" | "standardClinger" | "standard-clinger") {
        options.push(OptionSpec::new("Slide", SLIDE_VALUES, "Random"));
    }
    if matches!(kind, "grower" | "hanger" | "clinger") {
        options.push(OptionSpec::new("Require In-Bounds", YES_NO_VALUES, "No"));
    }

    options
}

#[cfg(test)]
mod tests {
    use super::*;

    fn effect(kind: &str, pick_color: bool, can_3d: bool) -> EffectDefinition {
        EffectDefinition {
            kind: kind.to_string(),
            pick_color,
            can_3d,
        }
    }

    fn summary(options: &[OptionSpec]) -> Vec<(&str, &str)> {
        options.iter().map(|o| (o.name, o.default)).collect()
    }

    #[test]
    fn test_individual_hanger() {
        let options = generate_options("individualHanger", &effect("hanger", true, false));
        assert_eq!(
            summary(&options),
            vec![
                ("Layers", "1"),
                ("Color", "Color1"),
                ("Require In-Bounds", "No")
            ]
        );
    }

    #[test]
    fn test_3d_only_for_capable_walls() {
        let wall = generate_options("Ivy", &effect("wall", false, true));
        assert_eq!(summary(&wall), vec![("Layers", "All"), ("3D", "Off")]);

        let flat = generate_options("Ivy", &effect("wall", false, false));
        assert_eq!(summary(&flat), vec![("Layers", "All")]);

        let grower = generate_options("Moss", &effect("grower", false, true));
        assert!(grower.iter().all(|o| o.name != "3D"));
    }

    #[test]
    fn test_clinger_slides_and_requires_bounds() {
        let options = generate_options("Vines", &effect("clinger", false, false));
        assert_eq!(
            summary(&options),
            vec![
                ("Layers", "All"),
                ("Slide", "Random"),
                ("Require In-Bounds", "No")
            ]
        );
        let standard = generate_options("Roots", &effect("standardClinger", false, false));
        assert_eq!(summary(&standard), vec![("Layers", "All"), ("Slide", "Random")]);
    }

    #[test]
    fn test_default_is_allowed() {
        let options = generate_options("individual", &effect("clinger", true, false));
        assert!(options.iter().all(|o| o.allows(o.default)));
        let layers = options[0].to_effect_option();
        assert_eq!(layers.allowed.len(), 6);
        assert_eq!(layers.value, OptionValue::Text("1".into()));
    }
}
