// Input handling
//
// - `action`: the game actions a host can trigger
// - `player`: per-player pressed / just-pressed / just-released tracking
//
// The host presses and releases actions as device events arrive, the game
// reads the resulting `PlayerInput` once per fixed step, then calls
// `end_frame` so edge-triggered actions fire only once.

mod action;
mod player;

pub use action::{Action, UnknownAction};
pub use player::PlayerInput;
