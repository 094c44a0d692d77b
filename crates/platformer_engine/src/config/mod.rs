//! Configuration system
//!
//! Tuning constants for movement, physics, progression and display live in
//! [`GameConfig`]. Files may be TOML or RON; the format is picked from the
//! extension.

use std::path::Path;

pub use serde::{Serialize, Deserialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match extension(path) {
            Some("toml") => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Some("ron") => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match extension(path) {
            Some("toml") => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?,
            Some("ron") => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Top-level game configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Horizontal movement and jump tuning
    pub movement: MovementConfig,

    /// Reference physics backend settings
    pub physics: PhysicsConfig,

    /// Coin threshold and timer durations
    pub progression: ProgressionConfig,

    /// Spawn point and decoration offset
    pub level: LevelConfig,

    /// HUD strings
    pub display: DisplayConfig,
}

impl Config for GameConfig {}

impl GameConfig {
    /// Load configuration from file or return default if it can't be read
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load_from_file(path) {
            Ok(config) => {
                log::info!("Loaded game configuration from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Using default game configuration ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Movement configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Horizontal acceleration while walking (px/s²)
    pub acceleration: f32,

    /// Horizontal drag applied when no direction is held (px/s²)
    pub drag: f32,

    /// Vertical velocity assigned on jump (negative is up)
    pub jump_velocity: f32,

    /// Jump velocity while the power-up is active
    pub boosted_jump_velocity: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            acceleration: 400.0,
            drag: 500.0,
            jump_velocity: -600.0,
            boosted_jump_velocity: -900.0,
        }
    }
}

/// Physics configuration for the reference arcade backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward gravity (px/s²)
    pub gravity: f32,

    /// Player hitbox (width, height)
    pub player_size: (f32, f32),

    /// Fixed simulation rate used by the demo driver
    pub tick_rate: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 1500.0,
            player_size: (24.0, 24.0),
            tick_rate: 60,
        }
    }
}

/// Progression configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// Coins needed before the power-up activates
    pub coin_threshold: u32,

    /// Power-up lifetime in milliseconds
    pub power_up_duration_ms: u32,

    /// How long the level-complete banner stays up, in milliseconds
    pub banner_duration_ms: u32,
}

impl ProgressionConfig {
    /// Power-up lifetime in seconds
    pub fn power_up_duration(&self) -> f64 {
        f64::from(self.power_up_duration_ms) / 1000.0
    }

    /// Banner lifetime in seconds
    pub fn banner_duration(&self) -> f64 {
        f64::from(self.banner_duration_ms) / 1000.0
    }
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            coin_threshold: 15,
            power_up_duration_ms: 10_000,
            banner_duration_ms: 2_000,
        }
    }
}

/// Level placement configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Player spawn point (x, y)
    pub player_spawn: (f32, f32),

    /// Horizontal offset applied to background decorations
    pub background_offset_x: f32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            player_spawn: (30.0, 345.0),
            background_offset_x: 14.0,
        }
    }
}

/// HUD text configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Prefix of the coin counter text
    pub coin_text_prefix: String,

    /// Text shown while the power-up is active
    pub power_up_text: String,

    /// Banner text shown on level completion
    pub level_complete_text: String,
}

impl DisplayConfig {
    /// Coin counter text for the given tally
    pub fn coin_text(&self, coins: u32) -> String {
        format!("{}{}", self.coin_text_prefix, coins)
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            coin_text_prefix: "Coins: ".to_string(),
            power_up_text: "Power Up Active!".to_string(),
            level_complete_text: "Level Complete!".to_string(),
        }
    }
}
