// Character tuning and game configuration
//
// Every field has a built-in default; a JSON file only needs to list what it
// overrides.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::engine::physics::{ColliderShape, DEFAULT_GRAVITY, DEFAULT_TILE_SIZE, MAX_GRID_DIMENSION};

const DEFAULT_COLLIDER_WIDTH: f32 = 39.0;
const DEFAULT_COLLIDER_HEIGHT: f32 = 84.0;
const DEFAULT_COLLIDER_OFFSET_X: f32 = 27.0;
const DEFAULT_COLLIDER_OFFSET_Y: f32 = 0.0;
const DEFAULT_RENDER_OFFSET_X: f32 = 0.0;
const DEFAULT_RENDER_OFFSET_Y: f32 = -20.0;


/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Movement and combat tuning for the samurai
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CharacterStats {
    // Movement
    /// Horizontal run speed (units/second)
    pub run_speed: f32,
    /// Upward velocity applied on jump
    pub jump_speed: f32,
    /// Vertical acceleration (negative pulls down)
    pub gravity: f32,
    /// Speed held for the whole dash
    pub dash_speed: f32,
    /// Dash length in seconds
    pub dash_duration: f32,
    /// Fastest fall allowed while sliding down a wall
    pub wall_slide_max_fall: f32,
    /// Horizontal push away from the wall on a wall jump
    pub wall_jump_speed: f32,
    /// Horizontal speed multiplier while overlapping water
    pub water_speed_factor: f32,

    // Combat
    pub max_health: i32,
    /// Stagger after taking a hit
    pub hurt_duration: f32,
    /// Freeze applied to the combo timer after landing a hit
    pub hitstop_duration: f32,
    /// Forward distance from the collider center to the sword point
    pub attack_reach: f32,
    /// Height of the sword point above the collider center
    pub attack_height: f32,
    /// Extra radius added to an enemy's contact radius in melee tests
    pub attack_range: f32,
}

impl Default for CharacterStats {
    fn default() -> Self {
        Self {
            run_speed: 220.0,
            jump_speed: 620.0,
            gravity: DEFAULT_GRAVITY,
            dash_speed: 700.0,
            dash_duration: 0.25,
            wall_slide_max_fall: 120.0,
            wall_jump_speed: 260.0,
            water_speed_factor: 0.6,
            max_health: 100,
            hurt_duration: 0.4,
            hitstop_duration: 0.06,
            attack_reach: 68.0,
            attack_height: 0.0,
            attack_range: 38.0,
        }
    }
}

/// Player collider and sprite placement
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerConfig {
    pub collider_width: f32,
    pub collider_height: f32,
    pub collider_offset_x: f32,
    pub collider_offset_y: f32,
    pub render_offset_x: f32,
    pub render_offset_y: f32,
    /// Ground plane used when no collision grid is loaded
    pub ground_y: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            collider_width: DEFAULT_COLLIDER_WIDTH,
            collider_height: DEFAULT_COLLIDER_HEIGHT,
            collider_offset_x: DEFAULT_COLLIDER_OFFSET_X,
            collider_offset_y: DEFAULT_COLLIDER_OFFSET_Y,
            render_offset_x: DEFAULT_RENDER_OFFSET_X,
            render_offset_y: DEFAULT_RENDER_OFFSET_Y,
            ground_y: 0.0,
        }
    }
}

impl PlayerConfig {
    /// Collider shape built from this config
    pub fn collider(&self) -> ColliderShape {
        ColliderShape::new(
            self.collider_width,
            self.collider_height,
            self.collider_offset_x,
            self.collider_offset_y,
        )
    }

    fn sanitize(&mut self) {
        if self.collider_width <= 0.0 || self.collider_height <= 0.0 {
            log::warn!(
                "Invalid player collider {}x{}; using defaults",
                self.collider_width,
                self.collider_height
            );
            self.collider_width = DEFAULT_COLLIDER_WIDTH;
            self.collider_height = DEFAULT_COLLIDER_HEIGHT;
            self.collider_offset_x = DEFAULT_COLLIDER_OFFSET_X;
            self.collider_offset_y = DEFAULT_COLLIDER_OFFSET_Y;
        }
    }
}

/// Level dimensions for the collision grid
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LevelConfig {
    pub rows: usize,
    pub cols: usize,
    pub tile_size: f32,
    /// Player spawn tile (row 0 is the top row)
    pub spawn_row: i32,
    pub spawn_col: i32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            rows: 16,
            cols: 40,
            tile_size: DEFAULT_TILE_SIZE,
            spawn_row: 13,
            spawn_col: 2,
        }
    }
}

impl LevelConfig {
    fn sanitize(&mut self) {
        if self.rows > MAX_GRID_DIMENSION || self.cols > MAX_GRID_DIMENSION {
            log::warn!(
                "Level size {}x{} exceeds {} tiles per side; using {}x{}",
                self.rows,
                self.cols,
                MAX_GRID_DIMENSION,
                self.rows.min(MAX_GRID_DIMENSION),
                self.cols.min(MAX_GRID_DIMENSION)
            );
            self.rows = self.rows.min(MAX_GRID_DIMENSION);
            self.cols = self.cols.min(MAX_GRID_DIMENSION);
        }
    }
}

/// Top-level configuration document
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub player: PlayerConfig,
    pub stats: CharacterStats,
    pub level: LevelConfig,
}

impl GameConfig {
    /// Parse a configuration document and replace invalid values with defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let mut config: GameConfig = serde_json::from_str(json)?;
        config.player.sanitize();
        config.level.sanitize();
        Ok(config)
    }

    /// Load configuration from disk.
    /// A missing or malformed file yields the defaults.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            log::info!("Missing {}; using default config", path.display());
            return Self::default();
        }

        match std::fs::read_to_string(path)
            .map_err(ConfigError::from)
            .and_then(|contents| Self::from_json_str(&contents))
        {
            Ok(config) => {
                log::info!("Config loaded from {}", path.display());
                config
            }
            Err(e) => {
                log::error!("{} ({}); using default config", e, path.display());
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stats() {
        let stats = CharacterStats::default();
        assert_eq!(stats.run_speed, 220.0);
        assert_eq!(stats.jump_speed, 620.0);
        assert_eq!(stats.gravity, -1500.0);
        assert_eq!(stats.dash_speed, 700.0);
        assert_eq!(stats.dash_duration, 0.25);
        assert_eq!(stats.max_health, 100);
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config =
            GameConfig::from_json_str(r#"{"player": {"colliderWidth": 50}, "stats": {"runSpeed": 300}}"#)
                .unwrap();
        assert_eq!(config.player.collider_width, 50.0);
        assert_eq!(config.player.collider_height, DEFAULT_COLLIDER_HEIGHT);
        assert_eq!(config.stats.run_speed, 300.0);
        assert_eq!(config.stats.jump_speed, 620.0);
        assert_eq!(config.level, LevelConfig::default());
    }

    #[test]
    fn test_non_positive_collider_replaced() {
        let config =
            GameConfig::from_json_str(r#"{"player": {"colliderWidth": 0, "colliderOffsetX": 5}}"#)
                .unwrap();
        assert_eq!(config.player.collider_width, DEFAULT_COLLIDER_WIDTH);
        assert_eq!(config.player.collider_offset_x, DEFAULT_COLLIDER_OFFSET_X);
        assert_eq!(config.player.render_offset_y, DEFAULT_RENDER_OFFSET_Y);
    }

    #[test]
    fn test_oversized_level_clamped() {
        let config =
            GameConfig::from_json_str(r#"{"level": {"rows": 9000000000, "cols": 12}}"#).unwrap();
        assert_eq!(config.level.rows, MAX_GRID_DIMENSION);
        assert_eq!(config.level.cols, 12);
    }

    #[test]
    fn test_host_sections_are_ignored() {
        let config = GameConfig::from_json_str(r#"{"camera": {"zoom": 2}}"#).unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_malformed_is_error() {
        assert!(matches!(
            GameConfig::from_json_str("{oops"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = GameConfig::load(Path::new("no/such/config.json"));
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_collider_from_config() {
        let collider = PlayerConfig::default().collider();
        assert_eq!(collider.width(), 39.0);
        assert_eq!(collider.height(), 84.0);
        assert_eq!(collider.offset().x, 27.0);
    }
}
