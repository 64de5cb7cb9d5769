// Simulation core for a 2D side-scrolling samurai action game
//
// - `core`: small math helpers
// - `engine`: tile physics, level snapshots, input state, frame clock
// - `game`: the samurai, combat, enemies and the session that ties them together

pub mod core;
pub mod engine;
pub mod game;
