//! Per-cell collision flags derived from the ground layer

use super::{LevelData, TileLayer};
use crate::foundation::math::Vec2;
use std::ops::RangeInclusive;

/// Solidity of every map cell
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionGrid {
    width: u32,
    height: u32,
    tile_size: Vec2,
    solid: Vec<bool>,
}

impl CollisionGrid {
    /// Mark every cell of `layer` whose gid is listed in `level.colliding_tiles`
    pub fn from_layer(level: &LevelData, layer: &TileLayer) -> Self {
        let solid = layer
            .data
            .iter()
            .map(|gid| *gid != 0 && level.colliding_tiles.contains(gid))
            .collect();
        Self {
            width: level.width,
            height: level.height,
            tile_size: level.tile_size(),
            solid,
        }
    }

    /// Size of one cell in pixels
    pub fn tile_size(&self) -> Vec2 {
        self.tile_size
    }

    /// Map size in pixels
    pub fn size_in_pixels(&self) -> Vec2 {
        Vec2::new(
            self.width as f32 * self.tile_size.x,
            self.height as f32 * self.tile_size.y,
        )
    }

    /// Whether the cell at (`column`, `row`) blocks movement.
    /// Cells outside the map are open; world bounds are handled separately.
    pub fn is_solid(&self, column: i32, row: i32) -> bool {
        if column < 0 || row < 0 || column >= self.width as i32 || row >= self.height as i32 {
            return false;
        }
        let index = row as usize * self.width as usize + column as usize;
        self.solid.get(index).copied().unwrap_or(false)
    }

    /// Columns overlapped by the pixel span [`min_x`, `max_x`)
    pub fn columns_spanned(&self, min_x: f32, max_x: f32) -> RangeInclusive<i32> {
        cells_spanned(min_x, max_x, self.tile_size.x)
    }

    /// Rows overlapped by the pixel span [`min_y`, `max_y`)
    pub fn rows_spanned(&self, min_y: f32, max_y: f32) -> RangeInclusive<i32> {
        cells_spanned(min_y, max_y, self.tile_size.y)
    }

    /// Whether any cell of `column` within `rows` is solid
    pub fn column_blocked(&self, column: i32, mut rows: RangeInclusive<i32>) -> bool {
        rows.any(|row| self.is_solid(column, row))
    }

    /// Whether any cell of `row` within `columns` is solid
    pub fn row_blocked(&self, row: i32, mut columns: RangeInclusive<i32>) -> bool {
        columns.any(|column| self.is_solid(column, row))
    }
}

fn cells_spanned(min: f32, max: f32, tile: f32) -> RangeInclusive<i32> {
    let first = (min / tile).floor() as i32;
    let last = (max / tile).ceil() as i32 - 1;
    first..=last
}
