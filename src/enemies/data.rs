//! Creature data loading from RON files.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::core::{AnimationDef, Body, Direction, Hitbox, HitboxOffset};
use crate::world::{load_ron_file, ArenaConfig, ArenaError};

use super::ai::CreatureAnimations;
use super::components::{Creature, CreatureId, CreatureKind, CreatureTraits};

fn default_detection_radius() -> f32 {
    80.0
}

fn default_lose_interest_radius() -> f32 {
    120.0
}

fn default_attack_range() -> f32 {
    10.0
}

fn default_true() -> bool {
    true
}

/// Creature definition loaded from a RON file.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct CreatureDefinition {
    pub name: String,
    pub health: i32,
    pub damage: i32,
    pub speed: f32,
    /// Sprite box `(width, height)`
    pub size: (f32, f32),
    /// `(x, y, width, height)` added to the sprite box
    #[serde(default)]
    pub hitbox_offset: (f32, f32, f32, f32),
    #[serde(default)]
    pub can_chase: bool,
    #[serde(default = "default_detection_radius")]
    pub detection_radius: f32,
    #[serde(default = "default_lose_interest_radius")]
    pub lose_interest_radius: f32,
    #[serde(default = "default_attack_range")]
    pub attack_range: f32,
    #[serde(default = "default_true")]
    pub contact_damage: bool,
    #[serde(default)]
    pub flying: bool,
    #[serde(default)]
    pub render_priority: i32,
    #[serde(default)]
    pub animations: CreatureAnimations,
}

impl CreatureDefinition {
    /// Definition used when no data file overrides `kind`.
    pub fn builtin(kind: CreatureKind) -> Self {
        let base = Self {
            name: kind.name().to_string(),
            health: 1,
            damage: 1,
            speed: 15.0,
            size: (16.0, 16.0),
            hitbox_offset: (0.0, 0.0, 0.0, 0.0),
            can_chase: false,
            detection_radius: default_detection_radius(),
            lose_interest_radius: default_lose_interest_radius(),
            attack_range: default_attack_range(),
            contact_damage: true,
            flying: false,
            render_priority: 0,
            animations: CreatureAnimations::default(),
        };

        match kind {
            CreatureKind::Spider => base,
            CreatureKind::Skeleton => Self {
                health: 2,
                speed: 20.0,
                size: (64.0, 64.0),
                hitbox_offset: (24.0, 48.0, -48.0, -48.0),
                can_chase: true,
                attack_range: 20.0,
                contact_damage: false,
                animations: CreatureAnimations {
                    idle: AnimationDef::looping(vec![0], 1.0),
                    walking: AnimationDef::looping(vec![0, 1, 2, 3, 4, 5], 0.15),
                    chasing: None,
                    attacking: Some(AnimationDef::once(vec![6, 7, 8, 9, 10], 0.1)),
                },
                ..base
            },
            CreatureKind::Bat => Self {
                speed: 30.0,
                can_chase: true,
                detection_radius: 100.0,
                lose_interest_radius: 140.0,
                attack_range: 0.0,
                flying: true,
                render_priority: 1,
                ..base
            },
            CreatureKind::BigBoss => Self {
                health: 50,
                damage: 2,
                speed: 25.0,
                size: (128.0, 128.0),
                hitbox_offset: (32.0, 64.0, -64.0, -72.0),
                can_chase: true,
                detection_radius: 140.0,
                lose_interest_radius: 200.0,
                attack_range: 40.0,
                contact_damage: false,
                render_priority: -1,
                animations: CreatureAnimations {
                    idle: AnimationDef::looping(vec![0, 1], 0.5),
                    walking: AnimationDef::looping(vec![2, 3, 4, 5], 0.2),
                    chasing: Some(AnimationDef::looping(vec![2, 3, 4, 5], 0.12)),
                    attacking: Some(AnimationDef::once(vec![6, 7, 8, 9], 0.125)),
                },
                ..base
            },
        }
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), String> {
        if self.health <= 0 {
            return Err(format!("'{}' needs positive health, got {}", self.name, self.health));
        }
        if self.size.0 <= 0.0 || self.size.1 <= 0.0 {
            return Err(format!("'{}' needs a positive size, got {:?}", self.name, self.size));
        }

        let animations = &self.animations;
        let named = [
            ("idle", Some(&animations.idle)),
            ("walking", Some(&animations.walking)),
            ("chasing", animations.chasing.as_ref()),
            ("attacking", animations.attacking.as_ref()),
        ];
        for (state, def) in named {
            let Some(def) = def else { continue };
            if def.frames.is_empty() {
                return Err(format!("'{}' {} animation has no frames", self.name, state));
            }
            if !def.is_playable() {
                return Err(format!(
                    "'{}' {} animation needs a positive interval, got {}",
                    self.name, state, def.interval
                ));
            }
        }
        Ok(())
    }

    pub fn traits(&self) -> CreatureTraits {
        CreatureTraits {
            can_chase: self.can_chase,
            detection_radius: self.detection_radius,
            lose_interest_radius: self.lose_interest_radius,
            attack_range: self.attack_range,
            contact_damage: self.contact_damage,
            flying: self.flying,
        }
    }

    pub fn hitbox_offset(&self) -> HitboxOffset {
        let (x, y, width, height) = self.hitbox_offset;
        HitboxOffset::new(x, y, width, height)
    }

    pub fn dimensions(&self) -> Vec2 {
        Vec2::new(self.size.0, self.size.1)
    }

    pub fn body(&self, position: Vec2) -> Body {
        let mut body = Body::new(position, self.dimensions(), self.health, self.speed, self.damage)
            .with_hitbox_offset(self.hitbox_offset())
            .with_direction(Direction::Left);
        body.render_priority = self.render_priority;
        body
    }

    /// Hitbox a creature of this definition would have at `position`.
    pub fn hitbox_at(&self, position: Vec2) -> Hitbox {
        self.hitbox_offset().apply(position, self.dimensions())
    }
}

/// Resource holding every creature definition, keyed by kind. Doubles as
/// the creature factory.
#[derive(Resource, Debug, Clone)]
pub struct CreatureRegistry {
    pub definitions: HashMap<CreatureKind, CreatureDefinition>,
}

impl Default for CreatureRegistry {
    fn default() -> Self {
        Self {
            definitions: CreatureKind::ALL
                .into_iter()
                .map(|kind| (kind, CreatureDefinition::builtin(kind)))
                .collect(),
        }
    }
}

impl CreatureRegistry {
    pub fn get(&self, kind: CreatureKind) -> Option<&CreatureDefinition> {
        self.definitions.get(&kind)
    }

    fn definition(&self, kind: CreatureKind) -> Result<&CreatureDefinition, ArenaError> {
        self.get(kind)
            .ok_or_else(|| ArenaError::UnknownCreature(kind.name().to_string()))
    }

    /// Build a creature from its type name. Unknown names are a
    /// configuration error.
    pub fn create(&self, name: &str, id: CreatureId, position: Vec2) -> Result<Creature, ArenaError> {
        self.create_kind(CreatureKind::from_name(name)?, id, position)
    }

    pub fn create_kind(&self, kind: CreatureKind, id: CreatureId, position: Vec2) -> Result<Creature, ArenaError> {
        let definition = self.definition(kind)?;
        let creature = Creature::new(
            id,
            kind,
            definition.body(position),
            definition.traits(),
            definition.animations.clone(),
        )?;
        Ok(creature)
    }

    /// Read every `*.ron` file in `dir` over the built-in definitions.
    /// Invalid files are reported and skipped. Returns how many were loaded.
    pub fn load_dir(&mut self, dir: &Path) -> usize {
        let Ok(entries) = fs::read_dir(dir) else {
            warn!("Creature definitions directory not found: {:?}", dir);
            return 0;
        };

        let mut loaded = 0;
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.extension().is_some_and(|ext| ext == "ron") {
                continue;
            }

            match Self::load_file(&path) {
                Ok((kind, definition)) => {
                    info!("Loaded creature definition: {} ({:?})", definition.name, path);
                    self.definitions.insert(kind, definition);
                    loaded += 1;
                }
                Err(e) => error!("Skipping creature definition: {}", e),
            }
        }
        loaded
    }

    /// Parse and validate one definition file.
    pub fn load_file(path: &Path) -> Result<(CreatureKind, CreatureDefinition), ArenaError> {
        let definition: CreatureDefinition = load_ron_file(path)?;
        definition.validate().map_err(|details| ArenaError::ParseError {
            path: path.display().to_string(),
            details,
        })?;
        let kind = CreatureKind::from_name(&definition.name)?;
        Ok((kind, definition))
    }
}

/// Load creature definitions from `<data_dir>/creatures`.
pub fn load_creature_definitions(config: Res<ArenaConfig>, mut registry: ResMut<CreatureRegistry>) {
    let dir = config.data_dir.join("creatures");
    let loaded = registry.load_dir(&dir);
    info!(
        "Creature registry ready: {} kinds, {} from data files",
        registry.definitions.len(),
        loaded
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_builds_known_kinds() {
        let registry = CreatureRegistry::default();
        let skeleton = registry
            .create("skeleton", CreatureId(4), Vec2::new(100.0, 50.0))
            .unwrap();

        assert_eq!(skeleton.kind, CreatureKind::Skeleton);
        assert_eq!(skeleton.id, CreatureId(4));
        assert_eq!(skeleton.hitbox(), Hitbox::new(124.0, 98.0, 16.0, 16.0));
        assert!(skeleton.traits.can_chase);
        assert!(skeleton.state().is_none());
    }

    #[test]
    fn factory_rejects_unknown_names() {
        let registry = CreatureRegistry::default();
        assert!(matches!(
            registry.create("dragon", CreatureId(0), Vec2::ZERO),
            Err(ArenaError::UnknownCreature(name)) if name == "dragon"
        ));
    }

    #[test]
    fn definition_parses_with_defaults() {
        let definition: CreatureDefinition = ron::from_str(
            r#"(
                name: "bat",
                health: 2,
                damage: 1,
                speed: 40.0,
                size: (16.0, 16.0),
                flying: true,
            )"#,
        )
        .unwrap();

        assert_eq!(definition.detection_radius, 80.0);
        assert!(definition.contact_damage);
        assert!(definition.flying);
        assert_eq!(definition.animations, CreatureAnimations::default());
    }

    #[test]
    fn missing_directory_keeps_builtins() {
        let mut registry = CreatureRegistry::default();
        assert_eq!(registry.load_dir(Path::new("does/not/exist")), 0);
        assert_eq!(registry.definitions.len(), CreatureKind::ALL.len());
    }

    #[test]
    fn builtin_definitions_are_valid() {
        for kind in CreatureKind::ALL {
            assert_eq!(CreatureDefinition::builtin(kind).validate(), Ok(()));
        }
    }

    #[test]
    fn zero_interval_file_is_rejected() {
        let dir = std::env::temp_dir().join(format!("season-arena-creatures-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("spider.ron");
        fs::write(
            &path,
            r#"(
                name: "spider",
                health: 1,
                damage: 1,
                speed: 15.0,
                size: (16.0, 16.0),
                animations: (
                    idle: (frames: [0], interval: 1.0),
                    walking: (frames: [0, 1], interval: 0.0),
                ),
            )"#,
        )
        .unwrap();

        assert!(matches!(
            CreatureRegistry::load_file(&path),
            Err(ArenaError::ParseError { details, .. }) if details.contains("walking")
        ));

        let mut registry = CreatureRegistry::default();
        assert_eq!(registry.load_dir(&dir), 0);
        assert_eq!(
            registry.definitions[&CreatureKind::Spider],
            CreatureDefinition::builtin(CreatureKind::Spider)
        );
        fs::remove_dir_all(&dir).unwrap();
    }
}
