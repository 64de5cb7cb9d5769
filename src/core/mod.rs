// Shared helpers used across the engine and game layers

pub mod math;
