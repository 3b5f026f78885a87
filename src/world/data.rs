//! Region data structures and RON loading.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::core::{Hitbox, SoundName};

use super::config::ArenaConfig;
use super::error::ArenaError;

/// Seasonal theme of a region; picks its music.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Season {
    #[default]
    Summer,
    Winter,
}

impl Season {
    pub fn music(self) -> SoundName {
        match self {
            Season::Summer => SoundName::Summer,
            Season::Winter => SoundName::Winter,
        }
    }
}

fn default_tile_size() -> f32 {
    16.0
}

/// Item lying in the region from the start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPlacement {
    pub kind: String,
    pub position: (f32, f32),
}

/// Area that leads to another region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionExit {
    /// `(x, y, width, height)`
    pub area: (f32, f32, f32, f32),
    pub destination: String,
}

impl RegionExit {
    pub fn hitbox(&self) -> Hitbox {
        let (x, y, width, height) = self.area;
        Hitbox::new(x, y, width, height)
    }
}

/// A region as written in `regions/*.region.ron`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionDefinition {
    pub name: String,
    #[serde(default)]
    pub season: Season,
    #[serde(default = "default_tile_size")]
    pub tile_size: f32,
    /// Rows of `#` (blocking) and `.` (open)
    pub collision: Vec<String>,
    pub player_start: (f32, f32),
    /// `(creature kind, count)`
    #[serde(default)]
    pub creatures: Vec<(String, usize)>,
    /// Items handed to random creatures to drop on death
    #[serde(default)]
    pub drops: Vec<String>,
    #[serde(default)]
    pub items: Vec<ItemPlacement>,
    #[serde(default)]
    pub exit: Option<RegionExit>,
}

/// Walled grid with optional blocking rocks and gaps in the outer wall.
fn walled_rows(width: usize, height: usize, rocks: &[(usize, usize)], gaps: &[(usize, usize)]) -> Vec<String> {
    (0..height)
        .map(|y| {
            (0..width)
                .map(|x| {
                    let border = x == 0 || y == 0 || x == width - 1 || y == height - 1;
                    if gaps.contains(&(x, y)) {
                        '.'
                    } else if border || rocks.contains(&(x, y)) {
                        '#'
                    } else {
                        '.'
                    }
                })
                .collect()
        })
        .collect()
}

impl RegionDefinition {
    pub const DEFAULT_WIDTH: usize = 24;
    pub const DEFAULT_HEIGHT: usize = 14;

    /// Opening region: small creatures, the ability drops, a door east.
    pub fn summer() -> Self {
        Self {
            name: "summer".to_string(),
            season: Season::Summer,
            tile_size: default_tile_size(),
            collision: walled_rows(
                Self::DEFAULT_WIDTH,
                Self::DEFAULT_HEIGHT,
                &[(18, 4), (5, 9)],
                &[(23, 6), (23, 7)],
            ),
            player_start: (40.0, 180.0),
            creatures: vec![
                ("spider".to_string(), 4),
                ("bat".to_string(), 2),
                ("skeleton".to_string(), 2),
            ],
            drops: vec!["crystal".to_string()],
            items: vec![ItemPlacement {
                kind: "fire_torch".to_string(),
                position: (60.0, 150.0),
            }],
            exit: Some(RegionExit {
                area: (368.0, 96.0, 16.0, 32.0),
                destination: "winter".to_string(),
            }),
        }
    }

    /// Boss region. The boss keeps the key.
    pub fn winter() -> Self {
        Self {
            name: "winter".to_string(),
            season: Season::Winter,
            tile_size: default_tile_size(),
            collision: walled_rows(Self::DEFAULT_WIDTH, Self::DEFAULT_HEIGHT, &[(4, 4), (19, 10)], &[]),
            player_start: (40.0, 180.0),
            creatures: vec![
                ("big_boss".to_string(), 1),
                ("skeleton".to_string(), 2),
                ("bat".to_string(), 2),
            ],
            drops: Vec::new(),
            items: Vec::new(),
            exit: None,
        }
    }
}

/// Resource holding all region definitions by name.
#[derive(Resource, Debug, Clone)]
pub struct RegionRegistry {
    pub regions: HashMap<String, RegionDefinition>,
}

impl Default for RegionRegistry {
    fn default() -> Self {
        let mut regions = HashMap::new();
        for region in [RegionDefinition::summer(), RegionDefinition::winter()] {
            regions.insert(region.name.clone(), region);
        }
        Self { regions }
    }
}

impl RegionRegistry {
    pub fn get(&self, name: &str) -> Result<&RegionDefinition, ArenaError> {
        self.regions
            .get(name)
            .ok_or_else(|| ArenaError::UnknownRegion(name.to_string()))
    }

    /// Read every `*.region.ron` file in `dir`. Files override built-in
    /// regions of the same name.
    pub fn load_dir(&mut self, dir: &Path) -> usize {
        let Ok(entries) = fs::read_dir(dir) else {
            warn!("Regions directory not found: {:?}", dir);
            return 0;
        };

        let mut loaded = 0;
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.extension().is_some_and(|ext| ext == "ron") {
                continue;
            }

            match load_ron_file::<RegionDefinition>(&path) {
                Ok(region) => {
                    info!("Loaded region: {}", region.name);
                    self.regions.insert(region.name.clone(), region);
                    loaded += 1;
                }
                Err(e) => error!("{}", e),
            }
        }
        loaded
    }
}

pub fn load_ron_file<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ArenaError> {
    let contents = fs::read_to_string(path).map_err(|e| ArenaError::ReadError {
        path: path.display().to_string(),
        details: e.to_string(),
    })?;
    ron::from_str(&contents).map_err(|e| ArenaError::ParseError {
        path: path.display().to_string(),
        details: e.to_string(),
    })
}

/// Load region definitions from `<data_dir>/regions`.
pub fn load_region_definitions(config: Res<ArenaConfig>, mut registry: ResMut<RegionRegistry>) {
    let loaded = registry.load_dir(&config.data_dir.join("regions"));
    info!("Loaded {} region(s), {} available", loaded, registry.regions.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::TileMap;

    #[test]
    fn builtin_regions_are_well_formed() {
        let registry = RegionRegistry::default();
        for name in ["summer", "winter"] {
            let region = registry.get(name).unwrap();
            let map = TileMap::from_rows(&region.collision, region.tile_size).unwrap();
            assert_eq!(map.width(), RegionDefinition::DEFAULT_WIDTH);
            assert_eq!(map.height(), RegionDefinition::DEFAULT_HEIGHT);

            let (x, y) = region.player_start;
            assert!(map.is_valid_move(&Hitbox::new(x, y, 16.0, 16.0)));
        }
    }

    #[test]
    fn summer_exit_is_reachable_through_the_wall_gap() {
        let summer = RegionDefinition::summer();
        let map = TileMap::from_rows(&summer.collision, summer.tile_size).unwrap();
        assert!(!map.is_tile_blocking(23, 6));
        assert!(map.is_tile_blocking(23, 5));
        assert!(map.is_valid_move(&Hitbox::new(368.0, 100.0, 16.0, 16.0)));
        assert!(summer.exit.unwrap().hitbox().overlaps(&Hitbox::new(368.0, 100.0, 16.0, 16.0)));
    }

    #[test]
    fn unknown_region_is_an_error() {
        assert!(matches!(
            RegionRegistry::default().get("autumn"),
            Err(ArenaError::UnknownRegion(name)) if name == "autumn"
        ));
    }

    #[test]
    fn region_file_parses_with_defaults() {
        let region: RegionDefinition = ron::from_str(
            r####"(
                name: "cave",
                collision: ["###", "#.#", "###"],
                player_start: (16.0, 16.0),
                creatures: [("spider", 2)],
            )"####,
        )
        .unwrap();

        assert_eq!(region.season, Season::Summer);
        assert_eq!(region.tile_size, 16.0);
        assert_eq!(region.creatures, vec![("spider".to_string(), 2)]);
        assert!(region.exit.is_none());
    }
}
