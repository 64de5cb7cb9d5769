// Engine modules: physics, level data, input, frame timing

pub mod game_loop;
pub mod input;
pub mod level;
pub mod physics;
