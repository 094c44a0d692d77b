//! Level data source
//!
//! A level is a tilemap exported to RON: tile layers hold one gid per cell,
//! object layers hold Tiled-style object records `{name, x, y, gid}`.
//! Object records are bottom-left anchored, as Tiled writes them for tile
//! objects.

pub mod grid;

pub use grid::CollisionGrid;

use crate::foundation::math::Vec2;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Tile layer carrying the solid ground and platforms
pub const GROUND_LAYER: &str = "Ground-n-Platforms";

/// Object layer holding coins
pub const COIN_LAYER: &str = "Objects";

/// Object layer holding keys
pub const KEY_LAYER: &str = "Object key";

/// Object layer holding locks
pub const LOCK_LAYER: &str = "Object lock";

/// Object layer holding water hazards
pub const HAZARD_LAYER: &str = "Object water";

/// Object layer holding non-interactive decorations
pub const BACKGROUND_LAYER: &str = "Objects background";

/// Level loading errors
#[derive(Error, Debug)]
pub enum LevelError {
    /// A layer the level cannot run without is absent
    #[error("required layer '{0}' not found")]
    MissingLayer(String),

    /// An optional layer is absent; callers recover locally
    #[error("asset '{0}' not found")]
    MissingAsset(String),

    /// Tile data does not cover the map exactly
    #[error("layer '{layer}' has {found} cells, expected {expected}")]
    InvalidLayerSize {
        /// Offending layer
        layer: String,
        /// `width * height`
        expected: usize,
        /// Cells actually present
        found: usize,
    },

    /// Level file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Level file could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),
}

/// One record of an object layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapObject {
    /// Object name used to filter spawns ("coin", "key", ...)
    pub name: String,
    /// Left edge in pixels
    pub x: f32,
    /// Bottom edge in pixels
    pub y: f32,
    /// Global tile id of the object's image (0 = none)
    #[serde(default)]
    pub gid: u32,
}

/// Grid of tile gids, row-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayer {
    /// Layer name
    pub name: String,
    /// One gid per cell, 0 = empty
    pub data: Vec<u32>,
}

/// Named list of object records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectLayer {
    /// Layer name
    pub name: String,
    /// Records in authoring order
    #[serde(default)]
    pub objects: Vec<MapObject>,
}

/// Decorative sprite placed from the background layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decoration {
    /// Bottom-right corner of the sprite
    pub position: Vec2,
    /// Frame in the tilemap sprite sheet
    pub frame: u32,
}

/// Complete level description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    /// Level name
    pub name: String,
    /// Width in cells
    pub width: u32,
    /// Height in cells
    pub height: u32,
    /// Cell width in pixels
    pub tile_width: f32,
    /// Cell height in pixels
    pub tile_height: f32,
    /// Gids whose tiles carry the `collides` property
    #[serde(default)]
    pub colliding_tiles: Vec<u32>,
    /// Tile layers
    #[serde(default)]
    pub tile_layers: Vec<TileLayer>,
    /// Object layers
    #[serde(default)]
    pub object_layers: Vec<ObjectLayer>,
}

impl LevelData {
    /// Parse a level from RON text
    pub fn from_ron_str(text: &str) -> Result<Self, LevelError> {
        let level: Self = ron::from_str(text).map_err(|e| LevelError::Parse(e.to_string()))?;
        level.validate()?;
        Ok(level)
    }

    /// Load a level from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let level = Self::from_ron_str(&text)?;
        log::info!(
            "Loaded level '{}' ({}x{} cells) from {}",
            level.name,
            level.width,
            level.height,
            path.display()
        );
        Ok(level)
    }

    /// Check that every tile layer covers the map exactly
    pub fn validate(&self) -> Result<(), LevelError> {
        let expected = self.cell_count();
        for layer in &self.tile_layers {
            if layer.data.len() != expected {
                return Err(LevelError::InvalidLayerSize {
                    layer: layer.name.clone(),
                    expected,
                    found: layer.data.len(),
                });
            }
        }
        Ok(())
    }

    /// Number of cells in the map
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Map size in pixels
    pub fn size_in_pixels(&self) -> Vec2 {
        Vec2::new(
            self.width as f32 * self.tile_width,
            self.height as f32 * self.tile_height,
        )
    }

    /// Size of one cell in pixels
    pub fn tile_size(&self) -> Vec2 {
        Vec2::new(self.tile_width, self.tile_height)
    }

    /// Look up a tile layer by name
    pub fn tile_layer(&self, name: &str) -> Result<&TileLayer, LevelError> {
        self.tile_layers
            .iter()
            .find(|layer| layer.name == name)
            .ok_or_else(|| LevelError::MissingLayer(name.to_string()))
    }

    /// Look up an object layer by name
    pub fn object_layer(&self, name: &str) -> Result<&ObjectLayer, LevelError> {
        self.object_layers
            .iter()
            .find(|layer| layer.name == name)
            .ok_or_else(|| LevelError::MissingAsset(name.to_string()))
    }

    /// Build the solidity grid from the ground layer
    pub fn collision_grid(&self) -> Result<CollisionGrid, LevelError> {
        let ground = self.tile_layer(GROUND_LAYER)?;
        Ok(CollisionGrid::from_layer(self, ground))
    }

    /// Objects of `layer` whose name matches `name`.
    /// An absent layer yields `MissingAsset`.
    pub fn objects_named<'a>(
        &'a self,
        layer: &str,
        name: &'a str,
    ) -> Result<impl Iterator<Item = &'a MapObject> + 'a, LevelError> {
        let layer = self.object_layer(layer)?;
        Ok(layer.objects.iter().filter(move |object| object.name == name))
    }

    /// Centre of a tile object given its bottom-left record position
    pub fn object_center(&self, object: &MapObject) -> Vec2 {
        Vec2::new(
            object.x + self.tile_width * 0.5,
            object.y - self.tile_height * 0.5,
        )
    }

    /// Decorations from the background layer, shifted right by `offset_x`
    pub fn background_objects(&self, offset_x: f32) -> Result<Vec<Decoration>, LevelError> {
        let layer = self.object_layer(BACKGROUND_LAYER)?;
        let decorations = layer
            .objects
            .iter()
            .filter_map(|object| match object.gid.checked_sub(1) {
                Some(frame) => Some(Decoration {
                    position: Vec2::new(object.x + offset_x, object.y),
                    frame,
                }),
                None => {
                    log::warn!("Skipping background object '{}' without a tile image", object.name);
                    None
                }
            })
            .collect();
        Ok(decorations)
    }
}
