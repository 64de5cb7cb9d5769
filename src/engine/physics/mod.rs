// Tile-grid kinematic physics
//
// No external physics library: bodies are integrated per frame and resolved
// axis-by-axis against a boolean tile grid.

pub mod body;
mod collision;
mod grid;

pub use body::{BodyBuilder, KinematicBody, DEFAULT_GRAVITY};
pub use collision::{Aabb, ColliderShape, COLLISION_EPSILON};
pub use grid::{CollisionGrid, TileFlags, DEFAULT_TILE_SIZE, MAX_GRID_DIMENSION};
