//! Tile collision grid of a region.

use bevy::prelude::*;

use crate::core::Hitbox;

use super::error::ArenaError;

/// Blocking flags of a rectangular tile grid, in pixels of `tile_size`.
///
/// Coordinates outside the grid are treated as open; keeping entities inside
/// the arena is the job of the bounds check.
#[derive(Debug, Clone)]
pub struct TileMap {
    tile_size: f32,
    width: usize,
    height: usize,
    blocking: Vec<bool>,
    blocking_hitboxes: Vec<Hitbox>,
}

impl TileMap {
    pub const BLOCKING: char = '#';
    pub const OPEN: char = '.';

    /// A grid with no blocking tiles.
    pub fn open(width: usize, height: usize, tile_size: f32) -> Self {
        Self {
            tile_size,
            width,
            height,
            blocking: vec![false; width * height],
            blocking_hitboxes: Vec::new(),
        }
    }

    /// Parse rows of `#` (blocking) and `.` (open) characters.
    pub fn from_rows(rows: &[String], tile_size: f32) -> Result<Self, ArenaError> {
        let width = rows.first().map_or(0, |row| row.chars().count());
        let height = rows.len();
        let mut map = Self::open(width, height, tile_size);

        for (y, row) in rows.iter().enumerate() {
            let actual_width = row.chars().count();
            if actual_width != width {
                return Err(ArenaError::GridMismatch {
                    expected_width: width,
                    actual_width,
                    row: y,
                });
            }

            for (x, character) in row.chars().enumerate() {
                match character {
                    Self::BLOCKING => map.blocking[y * width + x] = true,
                    Self::OPEN | ' ' => {}
                    _ => return Err(ArenaError::UnknownTile { character, x, y }),
                }
            }
        }

        map.blocking_hitboxes = map.collect_blocking_hitboxes();
        Ok(map)
    }

    fn collect_blocking_hitboxes(&self) -> Vec<Hitbox> {
        let mut hitboxes = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                if self.blocking[y * self.width + x] {
                    hitboxes.push(Hitbox::new(
                        x as f32 * self.tile_size,
                        y as f32 * self.tile_size,
                        self.tile_size,
                        self.tile_size,
                    ));
                }
            }
        }
        hitboxes
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Arena rectangle covered by the grid.
    pub fn bounds(&self) -> Hitbox {
        Hitbox::new(
            0.0,
            0.0,
            self.width as f32 * self.tile_size,
            self.height as f32 * self.tile_size,
        )
    }

    pub fn is_tile_blocking(&self, tx: i32, ty: i32) -> bool {
        if tx < 0 || ty < 0 || tx as usize >= self.width || ty as usize >= self.height {
            return false;
        }
        self.blocking[ty as usize * self.width + tx as usize]
    }

    pub fn blocking_hitboxes(&self) -> &[Hitbox] {
        &self.blocking_hitboxes
    }

    /// True if `hitbox` covers any blocking tile. Shared edges don't count.
    pub fn overlaps_blocking(&self, hitbox: &Hitbox) -> bool {
        if hitbox.is_empty() || self.tile_size <= 0.0 {
            return false;
        }

        let (first_x, first_y) = self.tile_at(hitbox.position);
        let last_x = (hitbox.right() / self.tile_size).ceil() as i32 - 1;
        let last_y = (hitbox.bottom() / self.tile_size).ceil() as i32 - 1;

        (first_y..=last_y).any(|ty| (first_x..=last_x).any(|tx| self.is_tile_blocking(tx, ty)))
    }

    /// A box may be occupied if it stays inside the arena and off blocking
    /// tiles.
    pub fn is_valid_move(&self, hitbox: &Hitbox) -> bool {
        hitbox.is_within(&self.bounds()) && !self.overlaps_blocking(hitbox)
    }

    /// Tile coordinates containing `point`.
    pub fn tile_at(&self, point: Vec2) -> (i32, i32) {
        (
            (point.x / self.tile_size).floor() as i32,
            (point.y / self.tile_size).floor() as i32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|line| line.to_string()).collect()
    }

    #[test]
    fn parses_blocking_tiles() {
        let map = TileMap::from_rows(&rows(&["#..", "...", "..#"]), 16.0).unwrap();
        assert_eq!(map.bounds(), Hitbox::new(0.0, 0.0, 48.0, 48.0));
        assert!(map.is_tile_blocking(0, 0));
        assert!(map.is_tile_blocking(2, 2));
        assert!(!map.is_tile_blocking(1, 1));
        assert_eq!(map.blocking_hitboxes().len(), 2);
    }

    #[test]
    fn out_of_grid_tiles_are_open() {
        let map = TileMap::from_rows(&rows(&["##", "##"]), 16.0).unwrap();
        assert!(!map.is_tile_blocking(-1, 0));
        assert!(!map.is_tile_blocking(0, 5));
    }

    #[test]
    fn rejects_ragged_rows_and_unknown_characters() {
        assert!(matches!(
            TileMap::from_rows(&rows(&["...", ".."]), 16.0),
            Err(ArenaError::GridMismatch { row: 1, .. })
        ));
        assert!(matches!(
            TileMap::from_rows(&rows(&["..x"]), 16.0),
            Err(ArenaError::UnknownTile { character: 'x', x: 2, y: 0 })
        ));
    }

    #[test]
    fn touching_a_tile_edge_is_not_blocked() {
        let map = TileMap::from_rows(&rows(&["..#"]), 16.0).unwrap();
        assert!(!map.overlaps_blocking(&Hitbox::new(16.0, 0.0, 16.0, 16.0)));
        assert!(map.overlaps_blocking(&Hitbox::new(17.0, 0.0, 16.0, 16.0)));
    }

    #[test]
    fn valid_move_requires_bounds_and_open_tiles() {
        let map = TileMap::from_rows(&rows(&["....", ".#..", "...."]), 16.0).unwrap();
        assert!(map.is_valid_move(&Hitbox::new(32.0, 16.0, 16.0, 16.0)));
        assert!(!map.is_valid_move(&Hitbox::new(20.0, 16.0, 16.0, 16.0)));
        assert!(!map.is_valid_move(&Hitbox::new(-1.0, 0.0, 16.0, 16.0)));
        assert!(!map.is_valid_move(&Hitbox::new(50.0, 0.0, 16.0, 16.0)));
    }

    #[test]
    fn tile_at_floors_into_the_grid() {
        let map = TileMap::open(4, 4, 16.0);
        assert_eq!(map.tile_at(Vec2::new(0.0, 0.0)), (0, 0));
        assert_eq!(map.tile_at(Vec2::new(31.9, 16.0)), (1, 1));
        assert_eq!(map.tile_at(Vec2::new(-0.5, 70.0)), (-1, 4));
    }
}
