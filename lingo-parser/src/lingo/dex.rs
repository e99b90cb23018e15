//! Registries of init definitions
//!
//!     A dex indexes the records of one definition kind by name and remembers the
//!     categories they were declared under, in file order. [DexSet] holds one dex per kind
//!     and owns every cross-reference check between level data and definitions: decoders
//!     never look names up themselves.
//!
//!     Building is a single-threaded merge. Decode init files first (in parallel with
//!     [decode_init_files] if there are many), then feed the records to a [DexBuilder].

use crate::lingo::decoding::{Color, Effect, OptionValue, PlacedProp, TileCell, TileLayer};
use crate::lingo::error::{InitError, RegistryError};
use crate::lingo::init::{decode_init_sequential, DefinitionKind, InitRecord, InitSchema};
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::debug;

/// Options every placed effect carries besides the ones its definition generates
pub const COMMON_OPTIONS: &[&str] = &["Delete/Move", "Seed"];

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub name: String,
    pub color: Option<Color>,
    /// Member names in declaration order
    pub members: Vec<String>,
}

/// Definitions of one kind, indexed by name
#[derive(Debug, Clone)]
pub struct Dex {
    kind: DefinitionKind,
    records: Vec<InitRecord>,
    by_name: HashMap<String, usize>,
    categories: Vec<Category>,
}

impl Dex {
    fn new(kind: DefinitionKind) -> Self {
        Self {
            kind,
            records: Vec::new(),
            by_name: HashMap::new(),
            categories: Vec::new(),
        }
    }

    pub fn kind(&self) -> DefinitionKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Result<&InitRecord, RegistryError> {
        self.by_name
            .get(name)
            .map(|&i| &self.records[i])
            .ok_or_else(|| RegistryError::NotFound {
                kind: self.kind,
                name: name.to_string(),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &InitRecord> {
        self.records.iter()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, name: &str) -> Result<&Category, RegistryError> {
        self.categories
            .iter()
            .find(|category| category.name == name)
            .ok_or_else(|| RegistryError::CategoryNotFound {
                name: name.to_string(),
            })
    }

    /// Color of the category `name` was declared under
    pub fn color_of(&self, name: &str) -> Result<Option<Color>, RegistryError> {
        Ok(self.get(name)?.color)
    }

    fn insert(&mut self, record: InitRecord) -> Result<(), RegistryError> {
        if self.by_name.contains_key(&record.name) {
            return Err(RegistryError::DuplicateDefinition {
                kind: self.kind,
                name: record.name,
            });
        }

        match self
            .categories
            .iter_mut()
            .find(|category| category.name == record.category)
        {
            Some(category) => category.members.push(record.name.clone()),
            None => self.categories.push(Category {
                name: record.category.clone(),
                color: record.color,
                members: vec![record.name.clone()],
            }),
        }

        self.by_name.insert(record.name.clone(), self.records.len());
        self.records.push(record);
        Ok(())
    }
}

/// Merges init records into a [DexSet]
#[derive(Debug, Clone)]
pub struct DexBuilder {
    set: DexSet,
}

impl Default for DexBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DexBuilder {
    pub fn new() -> Self {
        Self { set: DexSet::empty() }
    }

    /// Add one record to the dex of its kind
    pub fn add(&mut self, record: InitRecord) -> Result<&mut Self, RegistryError> {
        self.set.dex_mut(record.kind()).insert(record)?;
        Ok(self)
    }

    pub fn extend(
        &mut self,
        records: impl IntoIterator<Item = InitRecord>,
    ) -> Result<&mut Self, RegistryError> {
        for record in records {
            self.add(record)?;
        }
        Ok(self)
    }

    pub fn build(self) -> DexSet {
        debug!(
            tiles = self.set.tiles.len(),
            props = self.set.props.len(),
            materials = self.set.materials.len(),
            effects = self.set.effects.len(),
            "built dex"
        );
        self.set
    }
}

/// Decode many init files at once, one worker per file
///
/// Results come back in input order so the merge that follows is deterministic.
pub fn decode_init_files<S: AsRef<str> + Sync>(
    files: &[(DefinitionKind, S)],
) -> Vec<Result<Vec<InitRecord>, InitError>> {
    files
        .par_iter()
        .map(|(kind, text)| decode_init_sequential(text.as_ref(), InitSchema::for_kind(*kind)))
        .collect()
}

/// One dex per definition kind
#[derive(Debug, Clone)]
pub struct DexSet {
    tiles: Dex,
    props: Dex,
    materials: Dex,
    effects: Dex,
}

impl DexSet {
    fn empty() -> Self {
        Self {
            tiles: Dex::new(DefinitionKind::Tile),
            props: Dex::new(DefinitionKind::Prop),
            materials: Dex::new(DefinitionKind::Material),
            effects: Dex::new(DefinitionKind::Effect),
        }
    }

    pub fn dex(&self, kind: DefinitionKind) -> &Dex {
        match kind {
            DefinitionKind::Tile => &self.tiles,
            DefinitionKind::Prop => &self.props,
            DefinitionKind::Material => &self.materials,
            DefinitionKind::Effect => &self.effects,
        }
    }

    fn dex_mut(&mut self, kind: DefinitionKind) -> &mut Dex {
        match kind {
            DefinitionKind::Tile => &mut self.tiles,
            DefinitionKind::Prop => &mut self.props,
            DefinitionKind::Material => &mut self.materials,
            DefinitionKind::Effect => &mut self.effects,
        }
    }

    pub fn tiles(&self) -> &Dex {
        &self.tiles
    }

    pub fn props(&self) -> &Dex {
        &self.props
    }

    pub fn materials(&self) -> &Dex {
        &self.materials
    }

    pub fn effects(&self) -> &Dex {
        &self.effects
    }

    /// Every tile head must name a known tile; the default material and every explicit
    /// material cell must name a known material
    pub fn check_tiles(&self, layer: &TileLayer) -> Result<(), RegistryError> {
        if let Some(material) = &layer.default_material {
            self.materials.get(material)?;
        }
        for (_, cell) in layer.heads() {
            if let TileCell::Head { name, .. } = cell {
                self.tiles.get(name)?;
            }
        }
        for material in layer.materials() {
            self.materials.get(material)?;
        }
        Ok(())
    }

    /// Every effect must be defined and carry exactly the options its definition
    /// generates, each with an allowed choice
    pub fn check_effects(&self, effects: &[Effect]) -> Result<(), RegistryError> {
        for effect in effects {
            let schema = self.effects.get(&effect.name)?.effect_options();

            for option in &effect.options {
                if COMMON_OPTIONS.contains(&option.name.as_str()) {
                    continue;
                }
                let spec = schema
                    .iter()
                    .find(|spec| spec.name == option.name)
                    .ok_or_else(|| RegistryError::UnknownOption {
                        effect: effect.name.clone(),
                        option: option.name.clone(),
                    })?;

                let allowed = match &option.value {
                    OptionValue::Text(choice) => choice.is_empty() || spec.allows(choice),
                    OptionValue::Number(_) => false,
                };
                if !allowed {
                    return Err(RegistryError::InvalidOptionValue {
                        effect: effect.name.clone(),
                        option: option.name.clone(),
                        value: option.value.to_string(),
                    });
                }
            }

            let missing = schema.iter().find(|spec| effect.option(spec.name).is_none());
            if let Some(missing) = missing {
                return Err(RegistryError::MissingOption {
                    effect: effect.name.clone(),
                    option: missing.name.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Placed props may name a prop or a tile drawn as a prop
    pub fn check_props(&self, props: &[PlacedProp]) -> Result<(), RegistryError> {
        for prop in props {
            if !self.props.contains(&prop.name) && !self.tiles.contains(&prop.name) {
                return Err(RegistryError::NotFound {
                    kind: DefinitionKind::Prop,
                    name: prop.name.clone(),
                });
            }
        }
        Ok(())
    }
}
