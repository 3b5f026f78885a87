//! Arena configuration, loaded from RON with defaults as fallback.

use std::fs;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::player::PlayerConfig;

use super::error::ArenaError;

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Root of `creatures/` and `regions/` data files
    pub data_dir: PathBuf,
    pub start_region: String,
    /// Fixed seed for reproducible runs. Random when absent.
    pub seed: Option<u64>,
    /// Update rate of the headless runner
    pub tick_rate_hz: f64,
    /// Start from the last stored checkpoint if there is one
    pub resume_from_save: bool,
    pub player: PlayerConfig,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("assets/data"),
            start_region: "summer".to_string(),
            seed: None,
            tick_rate_hz: 60.0,
            resume_from_save: false,
            player: PlayerConfig::default(),
        }
    }
}

impl ArenaConfig {
    pub fn from_ron(contents: &str, path: &Path) -> Result<Self, ArenaError> {
        ron::from_str(contents).map_err(|e| ArenaError::ParseError {
            path: path.display().to_string(),
            details: e.to_string(),
        })
    }

    pub fn try_load(path: &Path) -> Result<Self, ArenaError> {
        if !path.exists() {
            return Err(ArenaError::FileNotFound(path.display().to_string()));
        }
        let contents = fs::read_to_string(path).map_err(|e| ArenaError::ReadError {
            path: path.display().to_string(),
            details: e.to_string(),
        })?;
        Self::from_ron(&contents, path)
    }

    /// Load from `path`, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(config) => {
                info!("Loaded arena config from {:?}", path);
                config
            }
            Err(e) => {
                warn!("Using default arena config: {}", e);
                Self::default()
            }
        }
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
