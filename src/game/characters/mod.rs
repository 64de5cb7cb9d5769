// Character system
//
// This module contains everything related to the playable samurai:
// - The samurai entity and its trigger/query surface
// - Tuning values and configuration loading
// - State machine for character behavior
// - Animation clip timing and health tracking

pub mod animation;
pub mod character;
pub mod health;
pub mod state;
pub mod stats;

// Re-export commonly used types
pub use animation::{AnimationClip, AnimationLibrary, SamuraiAnimation};
pub use character::Samurai;
pub use health::{DamageOutcome, HealthComponent};
pub use state::{CharacterState, CharacterStateMachine, JumpPhase, StateError};
pub use stats::{CharacterStats, ConfigError, GameConfig, LevelConfig, PlayerConfig};
