//! World module - regions, terrain, items, configuration and checkpoints.

mod config;
mod data;
mod error;
mod items;
mod map;
mod plugin;
mod region;
mod snapshot;
mod stage;

pub use config::ArenaConfig;
pub use data::{load_ron_file, ItemPlacement, RegionDefinition, RegionExit, RegionRegistry, Season};
pub use error::ArenaError;
pub use items::{Item, ItemKind};
pub use map::TileMap;
pub use plugin::{build_region, ActiveRegion, ArenaRng, WorldPlugin};
pub use region::{DrawRef, Drawable, EntityRef, Pose, Region, RegionEvent};
pub use snapshot::{MemoryStore, RegionSnapshot, SaveSlot, SaveStore};
pub use stage::Stage;
